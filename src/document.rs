//! Document decoding with path context in error messages.
//!
//! YAML and JSON both end up as an order-preserving `serde_json::Value`, so the
//! schema layer only ever sees one generic tree.
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// `.json` is JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Yaml,
        }
    }
}

pub fn parse_document(src: &str, format: SourceFormat) -> Result<Value, DocumentError> {
    match format {
        SourceFormat::Json => from_json_with_path(src),
        SourceFormat::Yaml => from_yaml_with_path(src),
    }
}

fn from_json_with_path(src: &str) -> Result<Value, DocumentError> {
    let mut de = serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize::<_, Value>(&mut de).map_err(|err| {
        let path = err.path().to_string();
        DocumentError::Json { path, source: err.into_inner() }
    })?;
    de.end().map_err(|source| DocumentError::Json { path: ".".to_string(), source })?;
    Ok(value)
}

fn from_yaml_with_path(src: &str) -> Result<Value, DocumentError> {
    let de = serde_yaml::Deserializer::from_str(src);
    let mut value = serde_path_to_error::deserialize::<_, serde_yaml::Value>(de).map_err(|err| {
        let path = err.path().to_string();
        DocumentError::Yaml { path, source: err.into_inner() }
    })?;
    // `<<: *anchor` merge keys are not applied by the deserializer
    value
        .apply_merge()
        .map_err(|source| DocumentError::Yaml { path: ".".to_string(), source })?;
    lower_yaml(value, ".")
}

// YAML allows keys and scalars JSON does not; lower them into JSON shapes.
fn lower_yaml(value: serde_yaml::Value, path: &str) -> Result<Value, DocumentError> {
    use serde_yaml::Value as Y;
    Ok(match value {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Bool(b),
        Y::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                // NaN / infinities have no JSON form
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Y::String(s) => Value::String(s),
        Y::Sequence(xs) => Value::Array(
            xs.into_iter()
                .enumerate()
                .map(|(i, x)| lower_yaml(x, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Y::Mapping(m) => {
            let mut out = Map::new();
            for (k, v) in m {
                let key = yaml_key(k, path)?;
                let child = lower_yaml(v, &child_path(path, &key))?;
                out.insert(key, child);
            }
            Value::Object(out)
        }
        Y::Tagged(tagged) => lower_yaml(tagged.value, path)?,
    })
}

fn yaml_key(key: serde_yaml::Value, path: &str) -> Result<String, DocumentError> {
    use serde_yaml::Value as Y;
    match key {
        Y::String(s) => Ok(s),
        Y::Number(n) => Ok(n.to_string()),
        Y::Bool(b) => Ok(b.to_string()),
        Y::Null => Ok("null".to_string()),
        Y::Tagged(tagged) => yaml_key(tagged.value, path),
        Y::Sequence(_) | Y::Mapping(_) => {
            Err(DocumentError::UnsupportedKey { path: path.to_string() })
        }
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent == "." { key.to_string() } else { format!("{parent}.{key}") }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_keeps_key_order() {
        let src = "components:\n  schemas:\n    Zed: {type: string}\n    Alpha: {type: number}\n";
        let doc = parse_document(src, SourceFormat::Yaml).unwrap();
        let keys: Vec<_> = doc["components"]["schemas"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["Zed", "Alpha"]);
    }

    #[test]
    fn yaml_numeric_keys_become_strings() {
        let src = "responses:\n  200:\n    description: ok\n  true: 1\n";
        let doc = parse_document(src, SourceFormat::Yaml).unwrap();
        assert_eq!(doc["responses"]["200"]["description"], json!("ok"));
        assert_eq!(doc["responses"]["true"], json!(1));
    }

    #[test]
    fn yaml_merge_keys_are_applied() {
        let src = "base: &base\n  type: object\n  properties:\n    id: { type: string }\nderived:\n  <<: *base\n  description: copy\n";
        let doc = parse_document(src, SourceFormat::Yaml).unwrap();
        assert_eq!(doc["derived"]["type"], json!("object"));
        assert_eq!(doc["derived"]["properties"]["id"]["type"], json!("string"));
        assert_eq!(doc["derived"]["description"], json!("copy"));
        assert!(doc["derived"].get("<<").is_none());
    }

    #[test]
    fn yaml_complex_key_is_rejected_with_path() {
        let src = "a:\n  ? [1, 2]\n  : x\n";
        let err = parse_document(src, SourceFormat::Yaml).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedKey { ref path } if path == "a"));
    }

    #[test]
    fn json_errors_carry_a_path() {
        let err = parse_document(r#"{"components": {"schemas": [1, }}"#, SourceFormat::Json).unwrap_err();
        assert!(matches!(err, DocumentError::Json { .. }), "unexpected error: {err}");
        assert!(err.to_string().starts_with("invalid JSON at "));
    }

    #[test]
    fn json_trailing_garbage_is_an_error() {
        assert!(parse_document("{} {}", SourceFormat::Json).is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("api.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("api.yml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("api")), SourceFormat::Yaml);
    }
}
