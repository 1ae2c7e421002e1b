// Resolve and validate manifest data source configurations.

use crate::catalog::catalog;
use crate::error::{Diagnostic, Diagnostics, ManifestError, Result};
use crate::types::ResolvedManifest;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Parses configuration text. JSON is accepted as a subset of YAML.
pub fn parse_config(config: &str) -> Result<Value> {
    if config.trim().is_empty() {
        return Err(root_error("configuration is empty".to_string()));
    }
    serde_yaml::from_str(config).map_err(|e| root_error(format!("configuration is not valid JSON or YAML: {}", e)))
}

fn root_error(summary: String) -> ManifestError {
    ManifestError::Validation(Diagnostics(vec![Diagnostic::new("", summary)]))
}

/// Reads one manifest data source: validates `config` and renders the YAML manifest.
pub fn resolve_manifest(data_source: &str, config: &str) -> Result<ResolvedManifest> {
    info!(data_source, "resolving manifest");
    let ds = catalog().lookup(data_source)?;
    let input = parse_config(config)?;
    match ds.resolve(&input) {
        Ok(out) => {
            debug!(data_source, id = ?out.id, bytes = out.yaml.len(), "manifest rendered");
            Ok(out)
        }
        Err(e) => {
            let problems = e.diagnostics().map_or(0, |d| d.len());
            warn!(data_source, problems, error = %e, "manifest rejected");
            Err(e)
        }
    }
}

/// Validation only, without rendering.
pub fn validate_manifest_config(data_source: &str, config: &str) -> Result<()> {
    info!(data_source, "validating manifest config");
    let ds = catalog().lookup(data_source)?;
    let input = parse_config(config)?;
    ds.validate(&input).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIREWALL_POLICY: &str = "networkfirewall_services_k8s_aws_firewall_policy_v1alpha1_manifest";

    #[test]
    fn test_resolve_from_json() {
        let config = r#"{
            "metadata": {"name": "my-policy", "namespace": "default"},
            "spec": {
                "firewallPolicyName": "fp1",
                "firewallPolicy": {
                    "statelessDefaultActions": ["aws:pass"],
                    "statelessFragmentDefaultActions": ["aws:pass"]
                }
            }
        }"#;
        let out = resolve_manifest(FIREWALL_POLICY, config).unwrap();
        assert_eq!(out.id.as_deref(), Some("default/my-policy"));
        assert!(out.yaml.contains("apiVersion: networkfirewall.services.k8s.aws/v1alpha1"));
        assert!(out.yaml.contains("kind: FirewallPolicy"));
        assert!(out.yaml.contains("firewallPolicyName: fp1"));
        assert!(out.yaml.contains("statelessDefaultActions:"));
    }

    #[test]
    fn test_resolve_from_yaml_matches_json() {
        let json = r#"{"metadata": {"name": "web", "namespace": "apps"}, "spec": {"ingressClassName": "nginx"}}"#;
        let yaml = r#"
metadata:
  name: web
  namespace: apps
spec:
  ingressClassName: nginx
"#;
        let ds = "networking_karmada_io_multi_cluster_ingress_v1alpha1_manifest";
        assert_eq!(resolve_manifest(ds, json).unwrap(), resolve_manifest(ds, yaml).unwrap());
    }

    #[test]
    fn test_resolve_unknown_data_source() {
        let err = resolve_manifest("nope_manifest", "{}").unwrap_err();
        assert!(matches!(err, ManifestError::UnknownDataSource { .. }));
    }

    #[test]
    fn test_resolve_unparseable_config() {
        let err = resolve_manifest(FIREWALL_POLICY, "{not: [valid").unwrap_err();
        assert!(err.diagnostics().unwrap().touches(""));
        let err = resolve_manifest(FIREWALL_POLICY, "   ").unwrap_err();
        assert!(err.to_string().contains("configuration is empty"));
    }

    #[test]
    fn test_validate_reports_label_key() {
        let config = r#"{"metadata": {"name": "x", "namespace": "ns", "labels": {"bad key": "v"}}}"#;
        let err = validate_manifest_config(
            "networking_karmada_io_multi_cluster_ingress_v1alpha1_manifest",
            config,
        )
        .unwrap_err();
        assert!(err.diagnostics().unwrap().touches("metadata.labels"));
    }

    #[test]
    fn test_validate_ok() {
        let config = r#"{"metadata": {"name": "x", "namespace": "ns"}, "spec": {"clusterRef": {"name": "prod"}}}"#;
        assert!(validate_manifest_config("temporal_io_temporal_cluster_client_v1beta1_manifest", config).is_ok());
    }
}
