// Registry of manifest data sources.
//
// Each entry pairs a CRD identity with the field schema of its `spec`. All
// entries share the same validate and render logic; only the table differs.

mod karmada;
mod networkfirewall;
mod temporal;

use crate::error::{Diagnostic, Diagnostics, ManifestError, Result};
use crate::schema::{self, check_object, Field, FieldType};
use crate::types::{CrdIdentity, Manifest, ManifestConfig, ObjectMeta, ResolvedManifest};
use crate::validation;
use once_cell::sync::Lazy;
use serde_json::{json, Map as JsonMap, Value};
use std::collections::BTreeMap;

const CONFIG_KEYS: [&str; 2] = ["metadata", "spec"];
const METADATA_KEYS: [&str; 4] = ["name", "namespace", "labels", "annotations"];

#[derive(Debug, Clone)]
pub struct DataSource {
    pub identity: CrdIdentity,
    pub description: &'static str,
    /// Whether the read also computes `id = "<namespace>/<name>"`.
    pub emits_id: bool,
    pub spec: Vec<Field>,
}

impl DataSource {
    /// Registry key: `<group>_<kind>_<version>_manifest`.
    pub fn name(&self) -> String {
        format!(
            "{}_{}_{}_manifest",
            self.identity.group.replace(['.', '-'], "_"),
            snake_case(self.identity.kind),
            self.identity.version
        )
    }

    /// `spec` must be present when any of its top-level fields is required.
    pub fn spec_required(&self) -> bool {
        self.spec.iter().any(|f| f.required)
    }

    /// Checks a raw configuration tree and normalizes it into a [`ManifestConfig`].
    /// Every problem found is reported, not just the first.
    pub fn validate(&self, input: &Value) -> Result<ManifestConfig> {
        let entries = match input {
            Value::Object(entries) => entries,
            other => {
                return Err(ManifestError::Validation(Diagnostics(vec![Diagnostic::new(
                    "",
                    format!("configuration must be an object, got {}", schema::json_type_name(other)),
                )])));
            }
        };

        let mut diags = Vec::new();
        for key in entries.keys() {
            if !CONFIG_KEYS.contains(&key.as_str()) {
                diags.push(schema::unsupported_attribute("", key, &CONFIG_KEYS));
            }
        }

        let metadata = check_metadata(entries.get("metadata"), &mut diags);

        let spec = match entries.get("spec") {
            None | Some(Value::Null) => {
                if self.spec_required() {
                    diags.push(Diagnostic::new("spec", "missing required attribute"));
                }
                None
            }
            Some(Value::Object(spec)) => {
                Some(Value::Object(check_object(spec, &self.spec, "spec", &mut diags)))
            }
            Some(other) => {
                diags.push(Diagnostic::new(
                    "spec",
                    format!("expected object, got {}", schema::json_type_name(other)),
                ));
                None
            }
        };

        match metadata {
            Some(metadata) if diags.is_empty() => Ok(ManifestConfig { metadata, spec }),
            _ => Err(ManifestError::Validation(Diagnostics(diags))),
        }
    }

    /// Stamps the CRD identity onto a validated config and serializes it.
    pub fn render(&self, config: &ManifestConfig) -> Result<ResolvedManifest> {
        let manifest = Manifest {
            api_version: self.identity.api_version(),
            kind: self.identity.kind,
            metadata: &config.metadata,
            spec: config.spec.as_ref(),
        };
        let yaml = serde_yaml::to_string(&manifest)?;
        let id = self
            .emits_id
            .then(|| format!("{}/{}", config.metadata.namespace, config.metadata.name));
        Ok(ResolvedManifest { id, yaml })
    }

    /// Validate then render.
    pub fn resolve(&self, input: &Value) -> Result<ResolvedManifest> {
        let config = self.validate(input)?;
        self.render(&config)
    }

    /// Schema of the configuration this data source accepts, as JSON.
    pub fn describe(&self) -> Value {
        let mut spec = FieldType::Object(self.spec.clone()).describe();
        if self.spec_required() {
            spec["required"] = Value::Bool(true);
        }
        let mut out = json!({
            "name": self.name(),
            "apiVersion": self.identity.api_version(),
            "kind": self.identity.kind,
            "description": self.description,
            "metadata": {
                "type": "object",
                "required": true,
                "fields": {
                    "name": {"type": "string", "required": true, "description": "Unique name of the object within its namespace (DNS-1123 subdomain)."},
                    "namespace": {"type": "string", "required": true, "description": "Namespace of the object (DNS-1123 label)."},
                    "labels": {"type": "map", "values": {"type": "string"}, "description": "Labels to organize and select objects. Number and boolean values are converted to strings."},
                    "annotations": {"type": "map", "values": {"type": "string"}, "description": "Arbitrary non-identifying metadata. Number and boolean values are converted to strings."}
                }
            },
            "spec": spec,
            "computed": ["yaml"],
        });
        if self.emits_id {
            out["computed"] = json!(["id", "yaml"]);
        }
        out
    }
}

fn check_metadata(value: Option<&Value>, diags: &mut Vec<Diagnostic>) -> Option<ObjectMeta> {
    let entries = match value {
        None | Some(Value::Null) => {
            diags.push(Diagnostic::new("metadata", "missing required attribute"));
            return None;
        }
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            diags.push(Diagnostic::new(
                "metadata",
                format!("expected object, got {}", schema::json_type_name(other)),
            ));
            return None;
        }
    };
    let before = diags.len();

    for key in entries.keys() {
        if !METADATA_KEYS.contains(&key.as_str()) {
            diags.push(schema::unsupported_attribute("metadata", key, &METADATA_KEYS));
        }
    }

    let name = required_string(entries, "name", diags);
    if let Some(msg) = name.as_deref().and_then(validation::validate_object_name) {
        diags.push(Diagnostic::new("metadata.name", msg));
    }
    let namespace = required_string(entries, "namespace", diags);
    if let Some(msg) = namespace.as_deref().and_then(validation::validate_namespace) {
        diags.push(Diagnostic::new("metadata.namespace", msg));
    }

    let labels = string_map(entries, "labels", diags);
    diags.extend(validation::validate_labels("metadata.labels", &labels));
    let annotations = string_map(entries, "annotations", diags);
    diags.extend(validation::validate_annotations("metadata.annotations", &annotations));

    match (name, namespace) {
        (Some(name), Some(namespace)) if diags.len() == before => Some(ObjectMeta {
            name,
            namespace,
            labels,
            annotations,
        }),
        _ => None,
    }
}

fn required_string(entries: &JsonMap<String, Value>, key: &str, diags: &mut Vec<Diagnostic>) -> Option<String> {
    let path = format!("metadata.{}", key);
    match entries.get(key) {
        None | Some(Value::Null) => {
            diags.push(Diagnostic::new(path, "missing required attribute"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            diags.push(Diagnostic::new(path, format!("expected string, got {}", schema::json_type_name(other))));
            None
        }
    }
}

fn string_map(entries: &JsonMap<String, Value>, key: &str, diags: &mut Vec<Diagnostic>) -> BTreeMap<String, String> {
    let path = format!("metadata.{}", key);
    let mut out = BTreeMap::new();
    match entries.get(key) {
        None | Some(Value::Null) => {}
        Some(Value::Object(map)) => {
            for (k, v) in map {
                // Scalars convert to their string form, as a map(string) attribute would.
                match v {
                    Value::String(s) => {
                        out.insert(k.clone(), s.clone());
                    }
                    Value::Number(_) | Value::Bool(_) => {
                        out.insert(k.clone(), v.to_string());
                    }
                    other => diags.push(Diagnostic::new(
                        path.clone(),
                        format!("value of '{}' must be a string, got {}", k, schema::json_type_name(other)),
                    )),
                }
            }
        }
        Some(other) => diags.push(Diagnostic::new(path, format!("expected map, got {}", schema::json_type_name(other)))),
    }
    out
}

/// `FirewallPolicy` -> `firewall_policy`, `HTTPRoute` -> `http_route`.
pub fn snake_case(kind: &str) -> String {
    let chars: Vec<char> = kind.chars().collect();
    let mut out = String::with_capacity(kind.len() + 4);
    for (i, c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase() || prev.is_ascii_digit() || (prev.is_ascii_uppercase() && next_lower) {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

pub struct Catalog {
    sources: BTreeMap<String, DataSource>,
}

impl Catalog {
    fn new(all: Vec<DataSource>) -> Self {
        let sources = all.into_iter().map(|ds| (ds.name(), ds)).collect();
        Self { sources }
    }

    pub fn lookup(&self, name: &str) -> Result<&DataSource> {
        self.sources
            .get(name)
            .ok_or_else(|| ManifestError::UnknownDataSource {
                name: name.to_string(),
                suggestion: schema::closest_match(name, self.sources.keys().map(String::as_str))
                    .map(str::to_string),
            })
    }

    /// Data sources in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataSource)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let mut all = Vec::new();
    all.extend(networkfirewall::data_sources());
    all.extend(temporal::data_sources());
    all.extend(karmada::data_sources());
    Catalog::new(all)
});

pub fn catalog() -> &'static Catalog {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn firewall_policy() -> &'static DataSource {
        catalog()
            .lookup("networkfirewall_services_k8s_aws_firewall_policy_v1alpha1_manifest")
            .unwrap()
    }

    fn scenario_config() -> Value {
        json!({
            "metadata": {"name": "my-policy", "namespace": "default"},
            "spec": {
                "firewallPolicyName": "fp1",
                "firewallPolicy": {
                    "statelessDefaultActions": ["aws:pass"],
                    "statelessFragmentDefaultActions": ["aws:pass"]
                }
            }
        })
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("FirewallPolicy"), "firewall_policy");
        assert_eq!(snake_case("TemporalClusterClient"), "temporal_cluster_client");
        assert_eq!(snake_case("HTTPRoute"), "http_route");
        assert_eq!(snake_case("Firewall"), "firewall");
    }

    #[test]
    fn test_registry_names() {
        let names: Vec<&str> = catalog().iter().map(|(n, _)| n).collect();
        assert!(names.contains(&"networkfirewall_services_k8s_aws_firewall_policy_v1alpha1_manifest"));
        assert!(names.contains(&"temporal_io_temporal_cluster_v1beta1_manifest"));
        assert!(names.contains(&"networking_karmada_io_multi_cluster_ingress_v1alpha1_manifest"));
        for (name, ds) in catalog().iter() {
            assert_eq!(name, ds.name());
            assert!(name.ends_with("_manifest"));
        }
    }

    #[test]
    fn test_lookup_unknown_suggests() {
        let err = catalog()
            .lookup("networkfirewall_services_k8s_aws_firewall_polcy_v1alpha1_manifest")
            .unwrap_err();
        match err {
            ManifestError::UnknownDataSource { suggestion, .. } => assert_eq!(
                suggestion.as_deref(),
                Some("networkfirewall_services_k8s_aws_firewall_policy_v1alpha1_manifest")
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_firewall_policy_scenario() {
        let out = firewall_policy().resolve(&scenario_config()).unwrap();
        assert_eq!(out.id.as_deref(), Some("default/my-policy"));
        assert!(out.yaml.contains("apiVersion: networkfirewall.services.k8s.aws/v1alpha1"));
        assert!(out.yaml.contains("kind: FirewallPolicy"));
        assert!(out.yaml.contains("name: my-policy"));
        assert!(out.yaml.contains("namespace: default"));
        assert!(out.yaml.contains("firewallPolicyName: fp1"));

        let parsed: Value = serde_yaml::from_str(&out.yaml).unwrap();
        assert_eq!(parsed["metadata"], json!({"name": "my-policy", "namespace": "default"}));
        assert_eq!(parsed["spec"], scenario_config()["spec"]);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let a = firewall_policy().resolve(&scenario_config()).unwrap();
        let b = firewall_policy().resolve(&scenario_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_concurrent_resolves_agree() {
        let expected = firewall_policy().resolve(&scenario_config()).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| firewall_policy().resolve(&scenario_config()).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_constant_stamping_for_every_source() {
        for (_, ds) in catalog().iter() {
            let config = json!({"metadata": {"name": "x", "namespace": "ns"}});
            let rendered = ds.render(&ds_config(&config)).unwrap();
            let parsed: Value = serde_yaml::from_str(&rendered.yaml).unwrap();
            assert_eq!(parsed["apiVersion"], Value::String(ds.identity.api_version()));
            assert_eq!(parsed["kind"], ds.identity.kind);
            assert_eq!(rendered.id.is_some(), ds.emits_id);
        }
    }

    fn ds_config(config: &Value) -> ManifestConfig {
        ManifestConfig {
            metadata: serde_json::from_value(config["metadata"].clone()).unwrap(),
            spec: None,
        }
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let out = firewall_policy().resolve(&scenario_config()).unwrap();
        let parsed: Value = serde_yaml::from_str(&out.yaml).unwrap();
        let metadata = parsed["metadata"].as_object().unwrap();
        assert!(!metadata.contains_key("labels"));
        assert!(!metadata.contains_key("annotations"));
        let spec = parsed["spec"].as_object().unwrap();
        assert!(!spec.contains_key("description"));
        assert!(!spec.contains_key("tags"));
        assert!(!out.yaml.contains("null"));
        assert!(!out.yaml.contains("~"));
    }

    #[test]
    fn test_null_optional_fields_are_dropped() {
        let mut config = scenario_config();
        config["spec"]["description"] = Value::Null;
        config["metadata"]["labels"] = Value::Null;
        let out = firewall_policy().resolve(&config).unwrap();
        assert!(!out.yaml.contains("description"));
        assert!(!out.yaml.contains("labels"));
    }

    #[test]
    fn test_labels_and_annotations_round_trip() {
        let mut config = scenario_config();
        config["metadata"]["labels"] = json!({"app.kubernetes.io/name": "firewall", "tier": ""});
        config["metadata"]["annotations"] = json!({"example.com/note": "free text: ok"});
        let out = firewall_policy().resolve(&config).unwrap();
        let parsed: Value = serde_yaml::from_str(&out.yaml).unwrap();
        assert_eq!(parsed["metadata"]["labels"], config["metadata"]["labels"]);
        assert_eq!(parsed["metadata"]["annotations"], config["metadata"]["annotations"]);
    }

    #[test]
    fn test_scalar_label_values_become_strings() {
        let yaml = "metadata:\n  name: my-policy\n  namespace: default\n  labels:\n    tier: 1\n    canary: true\n  annotations:\n    example.com/weight: 0.5\n";
        let mut config: Value = serde_yaml::from_str(yaml).unwrap();
        config["spec"] = scenario_config()["spec"].clone();
        let out = firewall_policy().resolve(&config).unwrap();
        let parsed: Value = serde_yaml::from_str(&out.yaml).unwrap();
        assert_eq!(parsed["metadata"]["labels"], json!({"tier": "1", "canary": "true"}));
        assert_eq!(parsed["metadata"]["annotations"], json!({"example.com/weight": "0.5"}));

        let mut config = scenario_config();
        config["metadata"]["labels"] = json!({"tier": ["a"]});
        let err = firewall_policy().resolve(&config).unwrap_err();
        assert!(err.diagnostics().unwrap().touches("metadata.labels"));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let too_long = "a".repeat(254);
        for bad in ["", "My-Policy", too_long.as_str()] {
            let mut config = scenario_config();
            config["metadata"]["name"] = Value::String(bad.to_string());
            let err = firewall_policy().resolve(&config).unwrap_err();
            assert!(err.diagnostics().unwrap().touches("metadata.name"), "{bad}");
        }
    }

    #[test]
    fn test_bad_label_key_rejected() {
        let mut config = scenario_config();
        config["metadata"]["labels"] = json!({"bad key": "value"});
        let err = firewall_policy().resolve(&config).unwrap_err();
        let diags = err.diagnostics().unwrap();
        assert!(diags.touches("metadata.labels"));
    }

    #[test]
    fn test_missing_metadata_fields() {
        let config = json!({"metadata": {"name": "x"}, "spec": scenario_config()["spec"]});
        let err = firewall_policy().resolve(&config).unwrap_err();
        assert!(err.diagnostics().unwrap().touches("metadata.namespace"));

        let config = json!({"spec": scenario_config()["spec"]});
        let err = firewall_policy().resolve(&config).unwrap_err();
        assert!(err.diagnostics().unwrap().touches("metadata"));
    }

    #[test]
    fn test_missing_required_spec_fields_collected() {
        let config = json!({
            "metadata": {"name": "x", "namespace": "ns"},
            "spec": {"firewallPolicy": {"statelessDefaultActions": ["aws:pass"]}}
        });
        let err = firewall_policy().resolve(&config).unwrap_err();
        let diags = err.diagnostics().unwrap();
        assert!(diags.touches("spec.firewallPolicyName"));
        assert!(diags.touches("spec.firewallPolicy.statelessFragmentDefaultActions"));
    }

    #[test]
    fn test_spec_required_when_fields_are() {
        let config = json!({"metadata": {"name": "x", "namespace": "ns"}});
        let err = firewall_policy().resolve(&config).unwrap_err();
        assert!(err.diagnostics().unwrap().touches("spec"));
    }

    #[test]
    fn test_unknown_top_level_and_metadata_keys() {
        let mut config = scenario_config();
        config["status"] = json!({});
        config["metadata"]["lables"] = json!({});
        let err = firewall_policy().resolve(&config).unwrap_err();
        let diags = err.diagnostics().unwrap();
        assert!(diags.touches("status"));
        assert!(diags
            .iter()
            .any(|d| d.path == "metadata.lables" && d.summary.contains("did you mean 'labels'")));
    }

    #[test]
    fn test_non_object_config() {
        let err = firewall_policy().resolve(&json!(["nope"])).unwrap_err();
        assert!(err.diagnostics().unwrap().touches(""));
    }

    #[test]
    fn test_describe() {
        let desc = firewall_policy().describe();
        assert_eq!(desc["kind"], "FirewallPolicy");
        assert_eq!(desc["spec"]["required"], true);
        assert_eq!(desc["spec"]["fields"]["firewallPolicyName"]["required"], true);
        assert_eq!(desc["computed"], json!(["id", "yaml"]));
    }
}
