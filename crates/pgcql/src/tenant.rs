//! Tenant schema naming.
//!
//! Each tenant keeps a module's tables in its own schema named
//! `<tenant>_<module>`. Both parts are validated so they can be used as
//! unquoted PostgreSQL identifiers; each is at most 31 characters, keeping
//! the schema name within the 63 character identifier limit.
//!
//! Table names given to [`PgCqlQuery::select_sql`](crate::PgCqlQuery::select_sql)
//! are checked with [`check_table_name`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PgCqlError, PgCqlResult};

const TENANT_PATTERN: &str = "^[a-z][a-z0-9_]{0,30}$";

static TENANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TENANT_PATTERN).expect("tenant pattern is valid"));

static TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}(\.[A-Za-z_][A-Za-z0-9_]{0,62})?$")
        .expect("table pattern is valid")
});

/// Accepts a table name, optionally schema-qualified, made of unquoted
/// identifiers only.
pub fn check_table_name(table: &str) -> PgCqlResult<&str> {
    if TABLE.is_match(table) {
        Ok(table)
    } else {
        Err(PgCqlError::Name(format!("invalid table name: {}", table)))
    }
}

/// A validated tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    pub fn parse(tenant: &str) -> PgCqlResult<Self> {
        if TENANT.is_match(tenant) {
            Ok(Self(tenant.to_string()))
        } else {
            Err(PgCqlError::Name(format!("tenant must match {}", TENANT_PATTERN)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A module name normalised for use in a schema name: `-` and `.` become `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn parse(module: &str) -> PgCqlResult<Self> {
        if module.contains(['\'', '"']) {
            return Err(PgCqlError::Name(format!(
                "module name must not contain quotes: {}",
                module
            )));
        }
        Ok(Self(module.replace(['-', '.'], "_")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The schema holding one module's data for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantSchema {
    tenant: TenantId,
    module: ModuleName,
}

impl TenantSchema {
    pub fn new(tenant: TenantId, module: ModuleName) -> Self {
        Self { tenant, module }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn module(&self) -> &ModuleName {
        &self.module
    }

    /// `<tenant>_<module>`.
    pub fn schema(&self) -> String {
        format!("{}_{}", self.tenant, self.module)
    }

    /// `<tenant>_<module>.<table>`.
    pub fn qualified_table(&self, table: &str) -> String {
        format!("{}.{}", self.schema(), table)
    }

    /// Replaces every `{tenant}` in a connection setting such as a host or
    /// database name.
    pub fn substitute(&self, template: &str) -> String {
        template.replace("{tenant}", self.tenant.as_str())
    }
}
