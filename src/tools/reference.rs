// Reference data for the catalog (list_manifest_data_sources, describe_manifest_data_source).

use crate::catalog::catalog;
use crate::error::Result;
use serde_json::{json, Value};

pub fn list_data_sources() -> Value {
    let entries: Vec<Value> = catalog()
        .iter()
        .map(|(name, ds)| {
            json!({
                "name": name,
                "apiVersion": ds.identity.api_version(),
                "kind": ds.identity.kind,
                "description": ds.description,
            })
        })
        .collect();
    Value::Array(entries)
}

pub fn list_data_sources_json() -> String {
    let list = list_data_sources();
    serde_json::to_string_pretty(&list).unwrap_or_else(|_| list.to_string())
}

pub fn describe_data_source_json(data_source: &str) -> Result<String> {
    let description = catalog().lookup(data_source)?.describe();
    Ok(serde_json::to_string_pretty(&description).unwrap_or_else(|_| description.to_string()))
}
