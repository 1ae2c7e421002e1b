// Field schema for CRD spec trees.
//
// A data source declares its `spec` as a tree of `Field`s. The tree is used
// twice: to check and normalize incoming configuration (dropping `null`
// values, rejecting unknown keys, enforcing required fields, enums and
// bounds) and to describe the data source to clients.

use crate::error::Diagnostic;
use serde_json::{json, Map as JsonMap, Value};

/// Maximum Levenshtein distance for "did you mean" hints.
const MAX_SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// String, optionally restricted to a set of allowed values.
    String { allowed: &'static [&'static str] },
    /// Integer with optional inclusive bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    Bool,
    List(Box<FieldType>),
    /// Map from string keys to values of the inner type.
    Map(Box<FieldType>),
    Object(Vec<Field>),
    /// Free-form subtree (`x-kubernetes-preserve-unknown-fields`).
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Manifest key, camelCase as in the CRD.
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub ty: FieldType,
}

impl Field {
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            description: "",
            required: false,
            ty,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn doc(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

// Constructors used by the catalog tables.

pub fn string(name: &'static str) -> Field {
    Field::new(name, FieldType::String { allowed: &[] })
}

pub fn enumeration(name: &'static str, allowed: &'static [&'static str]) -> Field {
    Field::new(name, FieldType::String { allowed })
}

pub fn integer(name: &'static str) -> Field {
    Field::new(name, FieldType::Integer { min: None, max: None })
}

pub fn bounded(name: &'static str, min: Option<i64>, max: Option<i64>) -> Field {
    Field::new(name, FieldType::Integer { min, max })
}

pub fn boolean(name: &'static str) -> Field {
    Field::new(name, FieldType::Bool)
}

pub fn string_list(name: &'static str) -> Field {
    Field::new(name, FieldType::List(Box::new(FieldType::String { allowed: &[] })))
}

pub fn string_map(name: &'static str) -> Field {
    Field::new(name, FieldType::Map(Box::new(FieldType::String { allowed: &[] })))
}

pub fn object(name: &'static str, fields: Vec<Field>) -> Field {
    Field::new(name, FieldType::Object(fields))
}

pub fn object_list(name: &'static str, fields: Vec<Field>) -> Field {
    Field::new(name, FieldType::List(Box::new(FieldType::Object(fields))))
}

pub fn object_map(name: &'static str, fields: Vec<Field>) -> Field {
    Field::new(name, FieldType::Map(Box::new(FieldType::Object(fields))))
}

pub fn any(name: &'static str) -> Field {
    Field::new(name, FieldType::Any)
}

impl FieldType {
    fn type_name(&self) -> &'static str {
        match self {
            FieldType::String { .. } => "string",
            FieldType::Integer { .. } => "integer",
            FieldType::Bool => "boolean",
            FieldType::List(_) => "list",
            FieldType::Map(_) => "map",
            FieldType::Object(_) => "object",
            FieldType::Any => "any",
        }
    }

    /// JSON description of this type, used by `describe_manifest_data_source`.
    pub fn describe(&self) -> Value {
        let mut out = JsonMap::new();
        out.insert("type".to_string(), Value::String(self.type_name().to_string()));
        match self {
            FieldType::String { allowed } if !allowed.is_empty() => {
                out.insert("allowedValues".to_string(), json!(allowed));
            }
            FieldType::Integer { min, max } => {
                if let Some(min) = min {
                    out.insert("minimum".to_string(), json!(min));
                }
                if let Some(max) = max {
                    out.insert("maximum".to_string(), json!(max));
                }
            }
            FieldType::List(inner) => {
                out.insert("items".to_string(), inner.describe());
            }
            FieldType::Map(inner) => {
                out.insert("values".to_string(), inner.describe());
            }
            FieldType::Object(fields) => {
                let mut props = JsonMap::new();
                for field in fields {
                    props.insert(field.name.to_string(), field.describe());
                }
                out.insert("fields".to_string(), Value::Object(props));
            }
            _ => {}
        }
        Value::Object(out)
    }
}

impl Field {
    pub fn describe(&self) -> Value {
        let mut out = match self.ty.describe() {
            Value::Object(map) => map,
            _ => JsonMap::new(),
        };
        if self.required {
            out.insert("required".to_string(), Value::Bool(true));
        }
        if !self.description.is_empty() {
            out.insert(
                "description".to_string(),
                Value::String(self.description.to_string()),
            );
        }
        Value::Object(out)
    }
}

/// Closest candidate to `input` within [`MAX_SUGGESTION_DISTANCE`] edits.
pub fn closest_match<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .into_iter()
        .map(|c| (strsim::levenshtein(input, c), c))
        .filter(|(d, _)| *d > 0 && *d <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(d, _)| *d)
        .map(|(_, c)| c)
}

pub fn unsupported_attribute(path: &str, key: &str, known: &[&str]) -> Diagnostic {
    let attr_path = join_key(path, key);
    let summary = match closest_match(key, known.iter().copied()) {
        Some(s) => format!("unsupported attribute '{}', did you mean '{}'?", key, s),
        None => format!("unsupported attribute '{}'", key),
    };
    Diagnostic::new(attr_path, summary)
}

pub fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Checks `value` against `ty`, returning the normalized value (nulls of
/// optional fields removed). Problems are appended to `diags`; the returned
/// value is only meaningful when none were added.
pub fn check_value(value: &Value, ty: &FieldType, path: &str, diags: &mut Vec<Diagnostic>) -> Value {
    match (ty, value) {
        (FieldType::Any, v) => v.clone(),
        (FieldType::String { allowed }, Value::String(s)) => {
            if !allowed.is_empty() && !allowed.contains(&s.as_str()) {
                diags.push(Diagnostic::new(
                    path,
                    format!("value '{}' must be one of: {}", s, allowed.join(", ")),
                ));
            }
            value.clone()
        }
        (FieldType::Integer { min, max }, Value::Number(n)) => {
            match n.as_i64() {
                Some(i) => {
                    if let Some(min) = min {
                        if i < *min {
                            diags.push(Diagnostic::new(path, format!("value {} must be at least {}", i, min)));
                        }
                    }
                    if let Some(max) = max {
                        if i > *max {
                            diags.push(Diagnostic::new(path, format!("value {} must be at most {}", i, max)));
                        }
                    }
                }
                None if n.is_u64() => diags.push(Diagnostic::new(
                    path,
                    format!("value {} is out of range for a 64-bit signed integer", n),
                )),
                None => diags.push(Diagnostic::new(path, format!("expected integer, got {}", n))),
            }
            value.clone()
        }
        (FieldType::Bool, Value::Bool(_)) => value.clone(),
        (FieldType::List(inner), Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                if item.is_null() {
                    diags.push(Diagnostic::new(item_path, "list elements must not be null"));
                    continue;
                }
                out.push(check_value(item, inner, &item_path, diags));
            }
            Value::Array(out)
        }
        (FieldType::Map(inner), Value::Object(entries)) => {
            let mut out = JsonMap::new();
            for (key, item) in entries {
                let item_path = format!("{}[\"{}\"]", path, key);
                if item.is_null() {
                    diags.push(Diagnostic::new(item_path, "map values must not be null"));
                    continue;
                }
                out.insert(key.clone(), check_value(item, inner, &item_path, diags));
            }
            Value::Object(out)
        }
        (FieldType::Object(fields), Value::Object(entries)) => {
            Value::Object(check_object(entries, fields, path, diags))
        }
        (ty, other) => {
            diags.push(Diagnostic::new(
                path,
                format!("expected {}, got {}", ty.type_name(), json_type_name(other)),
            ));
            Value::Null
        }
    }
}

/// Object rules: unknown keys rejected, nulls treated as unset, required fields present.
pub fn check_object(
    entries: &JsonMap<String, Value>,
    fields: &[Field],
    path: &str,
    diags: &mut Vec<Diagnostic>,
) -> JsonMap<String, Value> {
    let known: Vec<&str> = fields.iter().map(|f| f.name).collect();
    for key in entries.keys() {
        if !known.contains(&key.as_str()) {
            diags.push(unsupported_attribute(path, key, &known));
        }
    }

    let mut out = JsonMap::new();
    for field in fields {
        let field_path = join_key(path, field.name);
        match entries.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    diags.push(Diagnostic::new(field_path, "missing required attribute"));
                }
            }
            Some(v) => {
                let checked = check_value(v, &field.ty, &field_path, diags);
                out.insert(field.name.to_string(), checked);
            }
        }
    }
    out
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
