//! Integration tests for loading field definitions from disk.

use std::io::Write;

use pgcql::{DefinitionConfig, FieldKind, ModuleName, PgCqlError, TenantId, TenantSchema};
use tempfile::NamedTempFile;

const LIBRARY: &str = r#"{
  "fields": [
    { "index": "cql.allRecords", "type": "always_matches" },
    { "index": "title", "type": "text", "full_text": true, "language": "english" },
    { "index": "isbn", "type": "text", "like_ops": true },
    { "index": "cost", "type": "number", "column": "price" },
    { "index": "paid", "type": "boolean" },
    { "index": "id", "type": "uuid" },
    { "index": "created", "type": "timestamp" }
  ]
}"#;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_and_query() {
    let file = write_config(LIBRARY);
    let config = DefinitionConfig::load(file.path()).unwrap();
    assert_eq!(config.fields.len(), 7);
    assert_eq!(config.fields[3].kind, FieldKind::Number);

    let definition = config.build().unwrap();
    let query = definition
        .parse_query("title=dylan and isbn=978* sortby cost/sort.descending")
        .unwrap();
    assert_eq!(
        query.where_clause().unwrap().as_deref(),
        Some(
            "(to_tsvector('english', title) @@ phraseto_tsquery('english', 'dylan') \
             AND isbn LIKE '978%')"
        )
    );
    assert_eq!(query.order_by_clause().unwrap().as_deref(), Some("price DESC"));
}

#[test]
fn test_config_serializes_back() {
    let config = DefinitionConfig::from_json(LIBRARY).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(DefinitionConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DefinitionConfig::load(dir.path().join("fields.json")).unwrap_err();
    assert!(matches!(err, PgCqlError::Io(_)));
}

#[test]
fn test_malformed_file() {
    let file = write_config("{ \"fields\": [ ");
    let err = DefinitionConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, PgCqlError::Config(_)));
}

#[test]
fn test_tenant_table_query() {
    let definition = DefinitionConfig::from_json(LIBRARY).unwrap().build().unwrap();
    let schema = TenantSchema::new(
        TenantId::parse("diku").unwrap(),
        ModuleName::parse("mod-books").unwrap(),
    );
    let query = definition.parse_query("paid=true").unwrap();
    assert_eq!(
        query.select_sql(&schema.qualified_table("book")).unwrap(),
        "SELECT * FROM diku_mod_books.book WHERE paid=TRUE"
    );
}
