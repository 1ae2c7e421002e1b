// Syntax checks for Kubernetes object metadata.
//
// Names follow DNS-1123 rules, label and annotation keys are qualified
// names with an optional DNS subdomain prefix.

use crate::error::Diagnostic;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Maximum length of a DNS-1123 subdomain (object names, key prefixes).
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

/// Maximum length of a DNS-1123 label (namespaces).
pub const DNS1123_LABEL_MAX_LENGTH: usize = 63;

/// Maximum length of the name part of a qualified key, and of a label value.
pub const QUALIFIED_NAME_MAX_LENGTH: usize = 63;

/// Maximum combined size of all annotation keys and values.
pub const TOTAL_ANNOTATION_SIZE_LIMIT: usize = 256 * 1024;

static DNS1123_SUBDOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("static regex")
});

static DNS1123_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("static regex"));

static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").expect("static regex")
});

/// Object name: lowercase alphanumerics, `-` and `.`, at most 253 characters.
pub fn validate_object_name(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("must not be empty".to_string());
    }
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        return Some(format!(
            "must be no more than {} characters",
            DNS1123_SUBDOMAIN_MAX_LENGTH
        ));
    }
    if !DNS1123_SUBDOMAIN.is_match(value) {
        return Some(format!(
            "'{}' must consist of lower case alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character",
            value
        ));
    }
    None
}

/// Namespace: lowercase alphanumerics and `-`, at most 63 characters.
pub fn validate_namespace(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("must not be empty".to_string());
    }
    if value.len() > DNS1123_LABEL_MAX_LENGTH {
        return Some(format!(
            "must be no more than {} characters",
            DNS1123_LABEL_MAX_LENGTH
        ));
    }
    if !DNS1123_LABEL.is_match(value) {
        return Some(format!(
            "'{}' must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character",
            value
        ));
    }
    None
}

/// Label or annotation key: `[prefix/]name`.
pub fn validate_qualified_key(key: &str) -> Option<String> {
    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if let Some(prefix) = prefix {
        if prefix.is_empty() {
            return Some(format!("key '{}': prefix part must not be empty", key));
        }
        if prefix.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
            return Some(format!(
                "key '{}': prefix part must be no more than {} characters",
                key, DNS1123_SUBDOMAIN_MAX_LENGTH
            ));
        }
        if !DNS1123_SUBDOMAIN.is_match(prefix) {
            return Some(format!(
                "key '{}': prefix part must be a lowercase DNS subdomain",
                key
            ));
        }
    }

    if name.is_empty() {
        return Some(format!("key '{}': name part must not be empty", key));
    }
    if name.len() > QUALIFIED_NAME_MAX_LENGTH {
        return Some(format!(
            "key '{}': name part must be no more than {} characters",
            key, QUALIFIED_NAME_MAX_LENGTH
        ));
    }
    if !QUALIFIED_NAME.is_match(name) {
        return Some(format!(
            "key '{}': name part must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character",
            key
        ));
    }
    None
}

/// Label value: empty, or at most 63 characters of the qualified-name alphabet.
pub fn validate_label_value(key: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if value.len() > QUALIFIED_NAME_MAX_LENGTH {
        return Some(format!(
            "value of '{}' must be no more than {} characters",
            key, QUALIFIED_NAME_MAX_LENGTH
        ));
    }
    if !QUALIFIED_NAME.is_match(value) {
        return Some(format!(
            "value '{}' of '{}' must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character",
            value, key
        ));
    }
    None
}

pub fn validate_labels(path: &str, labels: &BTreeMap<String, String>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for (key, value) in labels {
        if let Some(msg) = validate_qualified_key(key) {
            diags.push(Diagnostic::new(path, msg));
        }
        if let Some(msg) = validate_label_value(key, value) {
            diags.push(Diagnostic::new(path, msg));
        }
    }
    diags
}

pub fn validate_annotations(path: &str, annotations: &BTreeMap<String, String>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let mut total = 0usize;
    for (key, value) in annotations {
        if let Some(msg) = validate_qualified_key(key) {
            diags.push(Diagnostic::new(path, msg));
        }
        total += key.len() + value.len();
    }
    if total > TOTAL_ANNOTATION_SIZE_LIMIT {
        diags.push(Diagnostic::new(
            path,
            format!(
                "total size {} bytes exceeds the limit of {} bytes",
                total, TOTAL_ANNOTATION_SIZE_LIMIT
            ),
        ));
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_accepts_dns_subdomain() {
        assert!(validate_object_name("my-policy").is_none());
        assert!(validate_object_name("a.b-c.d").is_none());
        assert!(validate_object_name("0abc").is_none());
    }

    #[test]
    fn test_object_name_rejections() {
        assert!(validate_object_name("").is_some());
        assert!(validate_object_name("My-Policy").is_some());
        assert!(validate_object_name("-leading").is_some());
        assert!(validate_object_name("trailing.").is_some());
        assert!(validate_object_name("under_score").is_some());
        assert!(validate_object_name(&"a".repeat(254)).is_some());
        assert!(validate_object_name(&"a".repeat(253)).is_none());
    }

    #[test]
    fn test_namespace_is_a_label() {
        assert!(validate_namespace("default").is_none());
        assert!(validate_namespace("kube.system").is_some());
        assert!(validate_namespace(&"n".repeat(64)).is_some());
        assert!(validate_namespace("").is_some());
    }

    #[test]
    fn test_qualified_keys() {
        assert!(validate_qualified_key("app").is_none());
        assert!(validate_qualified_key("app.kubernetes.io/name").is_none());
        assert!(validate_qualified_key("Some_Key.v1").is_none());
        assert!(validate_qualified_key("bad key").is_some());
        assert!(validate_qualified_key("/name").is_some());
        assert!(validate_qualified_key("example.com/").is_some());
        assert!(validate_qualified_key("Example.com/name").is_some());
        assert!(validate_qualified_key(&"k".repeat(64)).is_some());
    }

    #[test]
    fn test_label_values() {
        assert!(validate_label_value("k", "").is_none());
        assert!(validate_label_value("k", "v1.2_x-y").is_none());
        assert!(validate_label_value("k", "has space").is_some());
        assert!(validate_label_value("k", &"v".repeat(64)).is_some());
    }

    #[test]
    fn test_labels_report_at_path() {
        let mut labels = BTreeMap::new();
        labels.insert("bad key".to_string(), "ok".to_string());
        labels.insert("good".to_string(), "ok".to_string());
        let diags = validate_labels("metadata.labels", &labels);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path, "metadata.labels");
        assert!(diags[0].summary.contains("bad key"));
    }

    #[test]
    fn test_annotations_allow_free_form_values_but_limit_size() {
        let mut annotations = BTreeMap::new();
        annotations.insert("note".to_string(), "any text: with spaces!".to_string());
        assert!(validate_annotations("metadata.annotations", &annotations).is_empty());

        annotations.insert("big".to_string(), "x".repeat(TOTAL_ANNOTATION_SIZE_LIMIT));
        let diags = validate_annotations("metadata.annotations", &annotations);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].summary.contains("exceeds the limit"));
    }
}
