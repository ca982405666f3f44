//! `cql2pg`: translate CQL queries from the command line.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CQL2PG_FIELDS` | | Field definition file (JSON) |
//! | `CQL2PG_TENANT` | | Tenant for `--table` |
//! | `CQL2PG_MODULE` | | Module for `--table` |
//! | `CQL2PG_LOG_LEVEL` | warn | Log level |
//!
//! Without `--table` the translation is printed as JSON:
//!
//! ```text
//! $ cql2pg --fields fields.json --query 'cost < 10 sortby title'
//! {
//!   "where": "cost<10",
//!   "order_by": "title ASC",
//!   "order_by_fields": "title"
//! }
//! ```
//!
//! With `--table` a complete `SELECT` is printed instead.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pgcql::{DefinitionConfig, ModuleName, PgCqlDefinition, TenantId, TenantSchema};
use tracing::{debug, info};

/// Command line configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "cql2pg")]
#[command(about = "Translate CQL queries into PostgreSQL WHERE and ORDER BY clauses")]
pub struct CliConfig {
    /// Field definition file.
    #[arg(short, long, env = "CQL2PG_FIELDS")]
    pub fields: PathBuf,

    /// CQL query.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Second CQL query, combined with the first using AND.
    #[arg(long)]
    pub query2: Option<String>,

    /// Print a SELECT over this table instead of the separate clauses.
    #[arg(long)]
    pub table: Option<String>,

    /// Tenant whose schema holds `--table`.
    #[arg(long, env = "CQL2PG_TENANT", requires = "module")]
    pub tenant: Option<String>,

    /// Module whose schema holds `--table`.
    #[arg(long, env = "CQL2PG_MODULE", requires = "tenant")]
    pub module: Option<String>,

    /// Print the parsed query tree as JSON.
    #[arg(long)]
    pub ast: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CQL2PG_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl CliConfig {
    /// Checks option combinations clap cannot express.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.tenant.is_some() && self.table.is_none() {
            errors.push("--tenant and --module require --table".to_string());
        }
        if self.ast && self.query.is_none() && self.query2.is_none() {
            errors.push("--ast requires --query or --query2".to_string());
        }
        if !["error", "warn", "info", "debug", "trace"].contains(&self.log_level.as_str()) {
            errors.push(format!("invalid log level: {}", self.log_level));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The table to select from, schema-qualified when a tenant is given.
    pub fn from_table(&self) -> anyhow::Result<Option<String>> {
        let Some(table) = &self.table else {
            return Ok(None);
        };
        match (&self.tenant, &self.module) {
            (Some(tenant), Some(module)) => {
                let schema = TenantSchema::new(TenantId::parse(tenant)?, ModuleName::parse(module)?);
                Ok(Some(schema.qualified_table(table)))
            }
            _ => Ok(Some(table.clone())),
        }
    }
}

/// Loads the field definitions named by the configuration.
pub fn load_definition(config: &CliConfig) -> anyhow::Result<PgCqlDefinition> {
    let definition = DefinitionConfig::load(&config.fields)
        .and_then(|c| c.build())
        .with_context(|| format!("loading {}", config.fields.display()))?;
    info!(fields = definition.len(), "Loaded field definitions");
    Ok(definition)
}

/// Translates the configured queries and returns the text to print.
pub fn run(config: &CliConfig) -> anyhow::Result<String> {
    let definition = load_definition(config)?;
    let query = definition.parse(config.query.as_deref(), config.query2.as_deref())?;

    if config.ast {
        debug!("Dumping query tree");
        return Ok(serde_json::to_string_pretty(&query.root())?);
    }

    if let Some(table) = config.from_table()? {
        return Ok(query.select_sql(&table)?);
    }

    let output = serde_json::json!({
        "where": query.where_clause()?,
        "order_by": query.order_by_clause()?,
        "order_by_fields": query.order_by_fields()?,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Initializes the tracing subscriber. Logs go to stderr so stdout stays
/// machine readable.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pgcql={level},pgcql_parser={level},pgcql_cli={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
