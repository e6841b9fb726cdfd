//! Dead letter archive

use crate::api::{Body, CumulusClient, Invoke, Result};
use serde_json::{Map, Value};

/// Recover S3 dead letter objects written when granule status updates failed.
///
/// `bucket` defaults to the system bucket and `path` to
/// `<prefix>/dead-letter-archive/sqs/`; neither is sent unless given.
pub async fn recover_cumulus_messages<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    bucket: Option<&str>,
    path: Option<&str>,
) -> Result<Value> {
    let mut body = Map::new();
    if let Some(bucket) = bucket {
        body.insert("bucket".to_string(), Value::from(bucket));
    }
    if let Some(path) = path {
        body.insert("path".to_string(), Value::from(path));
    }

    let body = (!body.is_empty()).then(|| Body::Json(Value::Object(body)));
    client
        .post(prefix, "/deadLetterArchive/recoverCumulusMessages", body)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedInvoker;
    use crate::api::RawResponse;

    fn client() -> CumulusClient<ScriptedInvoker> {
        CumulusClient::new(ScriptedInvoker::new(vec![Ok(RawResponse::new(202, "{}"))]))
    }

    #[tokio::test]
    async fn no_options_sends_no_body() {
        let client = client();
        recover_cumulus_messages(&client, "p", None, None).await.unwrap();
        assert_eq!(client.invoker().calls()[0].payload.body, None);
    }

    #[tokio::test]
    async fn bucket_only() {
        let client = client();
        recover_cumulus_messages(&client, "p", Some("internal"), None)
            .await
            .unwrap();
        assert_eq!(
            client.invoker().calls()[0].payload.body.as_deref(),
            Some(r#"{"bucket":"internal"}"#)
        );
    }
}
