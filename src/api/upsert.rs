//! Replace-or-create for keyed resources
//!
//! Upserting never reads before writing: the document is PUT to its
//! canonical path and only a 404 answer leads to a POST on the collection.

use super::client::{Body, CumulusClient, Invoke};
use super::error::{ApiError, Result};
use super::path_segment;
use serde_json::Value;

/// A resource type whose documents carry their own identifying keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// Display name used in error messages
    pub name: &'static str,
    pub collection_path: &'static str,
    /// Document fields that make up the resource path, in order
    pub key_fields: &'static [&'static str],
}

pub const COLLECTION: ResourceKind = ResourceKind {
    name: "Collection",
    collection_path: "/collections",
    key_fields: &["name", "version"],
};

pub const PROVIDER: ResourceKind = ResourceKind {
    name: "Provider",
    collection_path: "/providers",
    key_fields: &["id"],
};

pub const RULE: ResourceKind = ResourceKind {
    name: "Rule",
    collection_path: "/rules",
    key_fields: &["name"],
};

impl ResourceKind {
    /// Canonical path of the resource described by `document`
    pub fn resource_path(&self, document: &Value) -> Result<String> {
        let mut path = self.collection_path.to_string();

        for &field in self.key_fields {
            let key = match document.get(field) {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    return Err(ApiError::MissingKey {
                        kind: self.name,
                        field,
                    })
                }
            };
            path.push('/');
            path.push_str(&path_segment(&key));
        }

        Ok(path)
    }
}

/// POST the document to the collection path
pub async fn create<I: Invoke>(
    client: &CumulusClient<I>,
    kind: &ResourceKind,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    client
        .post(prefix, kind.collection_path, Some(Body::Json(document.clone())))
        .await
}

/// PUT the full document to its canonical path
pub async fn replace<I: Invoke>(
    client: &CumulusClient<I>,
    kind: &ResourceKind,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    let path = kind.resource_path(document)?;
    client.put(prefix, &path, Body::Json(document.clone())).await
}

/// Replace the resource, or create it when the replace reports 404
pub async fn upsert<I: Invoke>(
    client: &CumulusClient<I>,
    kind: &ResourceKind,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    match replace(client, kind, prefix, document).await {
        Err(err) if err.is_not_found() => {
            tracing::info!("{} not found ({}), creating it", kind.name, err);
            create(client, kind, prefix, document).await
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{Method, RawResponse};
    use crate::api::testing::ScriptedInvoker;
    use serde_json::json;

    fn collection() -> Value {
        json!({ "name": "MOD09GQ", "version": "006", "granuleId": "^MOD09GQ\\..*$" })
    }

    #[test]
    fn builds_compound_paths() {
        assert_eq!(
            COLLECTION.resource_path(&collection()).unwrap(),
            "/collections/MOD09GQ/006"
        );
        assert_eq!(
            PROVIDER.resource_path(&json!({ "id": "s3 provider" })).unwrap(),
            "/providers/s3%20provider"
        );
    }

    #[test]
    fn missing_key_is_reported() {
        let err = COLLECTION
            .resource_path(&json!({ "name": "MOD09GQ" }))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Collection document is missing required field 'version'"
        );
    }

    #[tokio::test]
    async fn existing_resource_is_replaced_only() {
        let client = CumulusClient::new(ScriptedInvoker::new(vec![Ok(RawResponse::new(
            200,
            r#"{"name":"MOD09GQ","version":"006"}"#,
        ))]));

        upsert(&client, &COLLECTION, "p", &collection()).await.unwrap();

        let calls = client.invoker().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].payload.http_method, Method::Put);
        assert_eq!(calls[0].payload.path, "/collections/MOD09GQ/006");
    }

    #[tokio::test]
    async fn not_found_falls_back_to_create() {
        let client = CumulusClient::new(ScriptedInvoker::new(vec![
            Ok(RawResponse::new(
                404,
                r#"{"error":"Not Found","message":"Rule 'r1' not found","statusCode":404}"#,
            )),
            Ok(RawResponse::new(200, r#"{"message":"Record saved"}"#)),
        ]));
        let rule = json!({ "name": "r1", "state": "ENABLED" });

        let value = upsert(&client, &RULE, "p", &rule).await.unwrap();
        assert_eq!(value["message"], "Record saved");

        let calls = client.invoker().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].payload.http_method, Method::Put);
        assert_eq!(calls[0].payload.path, "/rules/r1");
        assert_eq!(calls[1].payload.http_method, Method::Post);
        assert_eq!(calls[1].payload.path, "/rules");

        let sent: Value = serde_json::from_str(calls[1].payload.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, rule);
    }

    #[tokio::test]
    async fn other_failures_do_not_create() {
        let client = CumulusClient::new(ScriptedInvoker::new(vec![Ok(RawResponse::new(
            500,
            r#"{"error":"Internal Server Error","message":"database unavailable","statusCode":500}"#,
        ))]));

        let err = upsert(&client, &PROVIDER, "p", &json!({ "id": "prov" }))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "database unavailable");
        assert_eq!(client.invoker().calls().len(), 1);
    }

    #[tokio::test]
    async fn transport_not_found_also_falls_back() {
        let client = CumulusClient::new(ScriptedInvoker::new(vec![
            Err(ApiError::Transport {
                status: Some(404),
                message: "Not Found".to_string(),
            }),
            Ok(RawResponse::new(200, "{}")),
        ]));

        upsert(&client, &PROVIDER, "p", &json!({ "id": "prov" }))
            .await
            .unwrap();
        assert_eq!(client.invoker().calls().len(), 2);
    }

    #[tokio::test]
    async fn undecodable_404_does_not_create() {
        let client = CumulusClient::new(ScriptedInvoker::new(vec![
            Ok(RawResponse::new(404, "<html>404 Not Found</html>")),
            Ok(RawResponse::new(200, r#"{"message":"Record saved"}"#)),
        ]));

        let err = upsert(&client, &COLLECTION, "p", &collection())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode { status: 404, .. }));
        assert_eq!(client.invoker().calls().len(), 1);
    }

    #[tokio::test]
    async fn create_failure_propagates() {
        let client = CumulusClient::new(ScriptedInvoker::new(vec![
            Ok(RawResponse::new(
                404,
                r#"{"error":"Not Found","message":"missing"}"#,
            )),
            Ok(RawResponse::new(
                409,
                r#"{"error":"Conflict","message":"A record already exists"}"#,
            )),
        ]));

        let err = upsert(&client, &COLLECTION, "p", &collection())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "A record already exists");
    }

    #[tokio::test]
    async fn invalid_document_sends_nothing() {
        let client = CumulusClient::new(ScriptedInvoker::new(vec![]));

        let err = upsert(&client, &RULE, "p", &json!(["not", "an", "object"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingKey { field: "name", .. }));
        assert!(client.invoker().calls().is_empty());
    }
}
