//! Command tree
//!
//! Declarative wiring from subcommands to the handlers in
//! [`cumulus_cli::resources`].

use clap::{Args, Subcommand, ValueEnum};
use cumulus_cli::api::{CumulusClient, Invoke, ListOptions, Result, SortOrder};
use cumulus_cli::resources::{
    self, async_operations, collections, dead_letter, elasticsearch, executions, granules,
    providers, reports, rules, stats,
};
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the Cumulus API version
    Version,
    /// Show async operations
    #[command(subcommand)]
    AsyncOperations(AsyncOperationsCommand),
    /// Show and manage collections
    #[command(subcommand)]
    Collections(CollectionsCommand),
    /// Manage the dead letter archive
    #[command(subcommand)]
    DeadLetterArchive(DeadLetterCommand),
    /// Show and manage Elasticsearch indices
    #[command(subcommand)]
    Elasticsearch(ElasticsearchCommand),
    /// Show workflow executions
    #[command(subcommand)]
    Executions(ExecutionsCommand),
    /// Show and manage granules
    #[command(subcommand)]
    Granules(GranulesCommand),
    /// Show and manage providers
    #[command(subcommand)]
    Providers(ProvidersCommand),
    /// Manage reconciliation reports
    #[command(subcommand)]
    ReconciliationReports(ReportsCommand),
    /// Show and manage rules
    #[command(subcommand)]
    Rules(RulesCommand),
    /// Show object statistics
    #[command(subcommand)]
    Stats(StatsCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Order {
    Asc,
    Desc,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortOrder::Asc,
            Order::Desc => SortOrder::Desc,
        }
    }
}

fn parse_param(param: &str) -> std::result::Result<(String, String), String> {
    match param.split('=').collect::<Vec<_>>().as_slice() {
        [name, value] if !name.is_empty() && !value.is_empty() => {
            Ok((name.to_string(), value.to_string()))
        }
        _ => Err("Option must be of the form NAME=VALUE".to_string()),
    }
}

fn parse_json(data: &str) -> std::result::Result<Value, String> {
    resources::parse_document(data).map_err(|err| err.to_string())
}

/// Options shared by every `list` command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// List ALL records, regardless of --limit
    #[arg(long)]
    all: bool,
    /// Number of records to return
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Name of field to sort records by
    #[arg(long, default_value = "timestamp")]
    sort_by: String,
    /// Sort order
    #[arg(long, value_enum, default_value = "asc")]
    order: Order,
    /// Query string parameter (may be specified multiple times)
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,
    /// Comma-separated list of field names to return in each record
    #[arg(long)]
    fields: Option<String>,
}

impl ListArgs {
    fn options(&self, prefix: &str) -> ListOptions {
        ListOptions {
            prefix: prefix.to_string(),
            params: self.params.clone(),
            sort_by: self.sort_by.clone(),
            order: self.order.into(),
            fields: self.fields.clone(),
            page: self.page,
            limit: self.limit,
            all: self.all,
        }
    }
}

/// JSON document given on the command line
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// JSON definition of the record
    #[arg(short, long, value_name = "JSON", value_parser = parse_json)]
    data: Value,
}

#[derive(Args, Debug, Clone)]
pub struct CollectionKey {
    /// Name of the collection
    #[arg(short, long)]
    name: String,
    /// Version of the collection
    #[arg(short, long)]
    version: String,
}

#[derive(Args, Debug, Clone)]
pub struct ProviderKey {
    /// ID of the provider
    #[arg(long)]
    id: String,
}

#[derive(Subcommand, Debug)]
pub enum CollectionsCommand {
    /// Add a collection
    Add(DataArgs),
    /// Replace a collection
    Replace(DataArgs),
    /// Update (replace) a collection, or insert (add) it, if not found
    Upsert(DataArgs),
    /// Delete a collection
    Delete(CollectionKey),
    /// List collections
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum ProvidersCommand {
    /// Add a provider
    Add(DataArgs),
    /// Replace a provider
    Replace(DataArgs),
    /// Update (replace) a provider, or insert (add) it, if not found
    Upsert(DataArgs),
    /// Delete a provider
    Delete(ProviderKey),
    /// List providers
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum AsyncOperationsCommand {
    /// Get information about an async operation
    Get {
        /// ID of an async operation
        #[arg(long)]
        id: String,
    },
    /// List async operations
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum DeadLetterCommand {
    /// Recover S3 dead letter objects written when DB updates of granule statuses fail
    RecoverCumulusMessages {
        /// The bucket to read records from (default: system bucket)
        #[arg(long)]
        bucket: Option<String>,
        /// The S3 prefix (path) to read DLQ records from
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ElasticsearchCommand {
    /// Show the current aliased index used by the Cumulus Elasticsearch instance
    CurrentIndex,
    /// Display information about Elasticsearch indices
    IndicesStatus,
    /// Re-index Elasticsearch from the database (run change-index afterwards)
    IndexFromDatabase {
        /// Name of an empty index (default: cumulus-YYYY-MM-DD)
        #[arg(long = "index")]
        index_name: Option<String>,
    },
    /// Change current Elasticsearch index
    ChangeIndex {
        /// Index to change the alias from
        #[arg(long)]
        current_index: String,
        /// Index to change the alias to
        #[arg(long)]
        new_index: String,
        /// Alias to use for --new-index (default index if not provided)
        #[arg(long)]
        alias_name: Option<String>,
        /// Delete the index specified for --current-index
        #[arg(long)]
        delete_source: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExecutionsCommand {
    /// Find executions associated with specified list of granules
    FindByList {
        #[command(flatten)]
        list: ListArgs,
        /// ID of the granule's collection
        #[arg(long)]
        collection_id: Option<String>,
        /// ID of the granule
        #[arg(long)]
        granule_id: Option<String>,
        /// Full search body (overrides the IDs)
        #[arg(short, long, value_name = "JSON", value_parser = parse_json)]
        data: Option<Value>,
    },
    /// List executions
    List(ListArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GranuleKey {
    /// ID of the collection containing the granule
    #[arg(long)]
    collection_id: String,
    /// ID of the granule
    #[arg(long)]
    granule_id: String,
}

#[derive(Subcommand, Debug)]
pub enum GranulesCommand {
    /// Get details about a granule
    Get(GranuleKey),
    /// Unpublish a granule from the CMR
    Unpublish(GranuleKey),
    /// Delete a granule (must first be unpublished)
    Delete(GranuleKey),
    /// Reingest a granule
    Reingest {
        #[command(flatten)]
        key: GranuleKey,
        /// ARN of the execution (alternatively, supply workflow-name)
        #[arg(long)]
        execution_arn: Option<String>,
        /// Name of the workflow (ignored if execution-arn supplied)
        #[arg(long)]
        workflow_name: Option<String>,
    },
    /// Process a granule via a workflow
    Process {
        #[command(flatten)]
        key: GranuleKey,
        /// Name of the workflow (step function) to run
        #[arg(long)]
        workflow: String,
    },
    /// List granules
    List(ListArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RuleName {
    /// Name of the rule
    #[arg(short, long)]
    name: String,
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Add a rule
    Add(DataArgs),
    /// Replace a rule
    Replace(DataArgs),
    /// Update (replace) a rule, or insert (add) it, if not found
    Upsert(DataArgs),
    /// Delete a rule
    Delete(RuleName),
    /// List rules
    List(ListArgs),
    /// Set a rule's state to 'ENABLED'
    Enable(RuleName),
    /// Set a rule's state to 'DISABLED'
    Disable(RuleName),
    /// Run a 'onetime' rule
    Run(RuleName),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportKind {
    Inventory,
    GranuleInventory,
    GranuleNotFound,
    OrcaBackup,
    Internal,
}

impl From<ReportKind> for reports::ReportType {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Inventory => reports::ReportType::Inventory,
            ReportKind::GranuleInventory => reports::ReportType::GranuleInventory,
            ReportKind::GranuleNotFound => reports::ReportType::GranuleNotFound,
            ReportKind::OrcaBackup => reports::ReportType::OrcaBackup,
            ReportKind::Internal => reports::ReportType::Internal,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommand {
    /// Create a reconciliation report
    Create {
        /// Name of the report (default: combination of report-type and creation date/time)
        #[arg(short = 'n', long)]
        report_name: Option<String>,
        /// Type of report to create
        #[arg(short = 't', long, value_enum, default_value = "inventory")]
        report_type: ReportKind,
        /// Collection ID(s) for comparison of collection and granule holdings
        #[arg(short = 'c', long = "collection-id")]
        collection_ids: Vec<String>,
        /// Granule ID(s) for comparison of collection and granule holdings
        #[arg(short = 'g', long = "granule-id")]
        granule_ids: Vec<String>,
        /// Provider name(s) for comparison of granule holdings
        #[arg(short = 'p', long = "provider")]
        providers: Vec<String>,
        /// Status filter for Granule Inventory reports
        #[arg(short, long)]
        status: Option<String>,
        /// Data older than this will be ignored in the generated report
        #[arg(long)]
        start_timestamp: Option<String>,
        /// Data newer than this will be ignored in the generated report
        #[arg(long)]
        end_timestamp: Option<String>,
    },
    /// Get a reconciliation report
    Get(ReportName),
    /// Delete a reconciliation report
    Delete(ReportName),
    /// List reconciliation reports
    List(ListArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReportName {
    /// Name of the report
    #[arg(short, long)]
    name: String,
}

#[derive(Subcommand, Debug)]
pub enum StatsCommand {
    /// Show summary of statistics related to granules in the system
    Summary,
    /// Count values for a given field, for a given record type
    Count,
}

fn listed(items: Vec<Value>) -> Value {
    Value::Array(items)
}

/// Run a command against the given stack
pub async fn run<I: Invoke>(client: &CumulusClient<I>, prefix: &str, command: Command) -> Result<Value> {
    match command {
        Command::Version => resources::version(client, prefix).await,
        Command::AsyncOperations(cmd) => match cmd {
            AsyncOperationsCommand::Get { id } => async_operations::get(client, prefix, &id).await,
            AsyncOperationsCommand::List(list) => {
                async_operations::list(client, &list.options(prefix)).await.map(listed)
            }
        },
        Command::Collections(cmd) => match cmd {
            CollectionsCommand::Add(args) => collections::add(client, prefix, &args.data).await,
            CollectionsCommand::Replace(args) => collections::replace(client, prefix, &args.data).await,
            CollectionsCommand::Upsert(args) => collections::upsert(client, prefix, &args.data).await,
            CollectionsCommand::Delete(key) => {
                collections::delete(client, prefix, &key.name, &key.version).await
            }
            CollectionsCommand::List(list) => {
                collections::list(client, &list.options(prefix)).await.map(listed)
            }
        },
        Command::DeadLetterArchive(DeadLetterCommand::RecoverCumulusMessages { bucket, path }) => {
            dead_letter::recover_cumulus_messages(client, prefix, bucket.as_deref(), path.as_deref())
                .await
        }
        Command::Elasticsearch(cmd) => match cmd {
            ElasticsearchCommand::CurrentIndex => elasticsearch::current_index(client, prefix).await,
            ElasticsearchCommand::IndicesStatus => elasticsearch::indices_status(client, prefix).await,
            ElasticsearchCommand::IndexFromDatabase { index_name } => {
                elasticsearch::index_from_database(client, prefix, index_name.as_deref()).await
            }
            ElasticsearchCommand::ChangeIndex {
                current_index,
                new_index,
                alias_name,
                delete_source,
            } => {
                let options = elasticsearch::ChangeIndex {
                    current_index,
                    new_index,
                    alias_name,
                    delete_source,
                };
                elasticsearch::change_index(client, prefix, &options).await
            }
        },
        Command::Executions(cmd) => match cmd {
            ExecutionsCommand::FindByList {
                list,
                collection_id,
                granule_id,
                data,
            } => {
                let query = executions::GranuleQuery {
                    collection_id,
                    granule_id,
                    data,
                };
                executions::find_by_granules(client, &list.options(prefix), &query)
                    .await
                    .map(listed)
            }
            ExecutionsCommand::List(list) => {
                executions::list(client, &list.options(prefix)).await.map(listed)
            }
        },
        Command::Granules(cmd) => match cmd {
            GranulesCommand::Get(key) => {
                granules::get(client, prefix, &key.collection_id, &key.granule_id).await
            }
            GranulesCommand::Unpublish(key) => {
                granules::unpublish(client, prefix, &key.collection_id, &key.granule_id).await
            }
            GranulesCommand::Delete(key) => {
                granules::delete(client, prefix, &key.collection_id, &key.granule_id).await
            }
            GranulesCommand::Reingest {
                key,
                execution_arn,
                workflow_name,
            } => {
                let options = granules::Reingest {
                    execution_arn,
                    workflow_name,
                };
                granules::reingest(client, prefix, &key.collection_id, &key.granule_id, &options)
                    .await
            }
            GranulesCommand::Process { key, workflow } => {
                granules::process(client, prefix, &key.collection_id, &key.granule_id, &workflow)
                    .await
            }
            GranulesCommand::List(list) => {
                granules::list(client, &list.options(prefix)).await.map(listed)
            }
        },
        Command::Providers(cmd) => match cmd {
            ProvidersCommand::Add(args) => providers::add(client, prefix, &args.data).await,
            ProvidersCommand::Replace(args) => providers::replace(client, prefix, &args.data).await,
            ProvidersCommand::Upsert(args) => providers::upsert(client, prefix, &args.data).await,
            ProvidersCommand::Delete(key) => providers::delete(client, prefix, &key.id).await,
            ProvidersCommand::List(list) => {
                providers::list(client, &list.options(prefix)).await.map(listed)
            }
        },
        Command::ReconciliationReports(cmd) => match cmd {
            ReportsCommand::Create {
                report_name,
                report_type,
                collection_ids,
                granule_ids,
                providers,
                status,
                start_timestamp,
                end_timestamp,
            } => {
                let report = reports::CreateReport {
                    report_name,
                    report_type: report_type.into(),
                    collection_ids,
                    granule_ids,
                    providers,
                    status,
                    start_timestamp,
                    end_timestamp,
                };
                reports::create(client, prefix, &report).await
            }
            ReportsCommand::Get(report) => reports::get(client, prefix, &report.name).await,
            ReportsCommand::Delete(report) => reports::delete(client, prefix, &report.name).await,
            ReportsCommand::List(list) => {
                reports::list(client, &list.options(prefix)).await.map(listed)
            }
        },
        Command::Rules(cmd) => match cmd {
            RulesCommand::Add(args) => rules::add(client, prefix, &args.data).await,
            RulesCommand::Replace(args) => rules::replace(client, prefix, &args.data).await,
            RulesCommand::Upsert(args) => rules::upsert(client, prefix, &args.data).await,
            RulesCommand::Delete(rule) => rules::delete(client, prefix, &rule.name).await,
            RulesCommand::List(list) => rules::list(client, &list.options(prefix)).await.map(listed),
            RulesCommand::Enable(rule) => {
                rules::set_state(client, prefix, &rule.name, rules::RuleState::Enabled).await
            }
            RulesCommand::Disable(rule) => {
                rules::set_state(client, prefix, &rule.name, rules::RuleState::Disabled).await
            }
            RulesCommand::Run(rule) => rules::run(client, prefix, &rule.name).await,
        },
        Command::Stats(cmd) => match cmd {
            StatsCommand::Summary => stats::summary(client, prefix).await,
            StatsCommand::Count => stats::count(client, prefix).await,
        },
    }
}
