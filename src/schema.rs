//! Typed schema nodes.
//!
//! Documents arrive as an untyped `serde_json::Value`. They are converted once,
//! up front, into [`SchemaNode`]s; nothing downstream inspects raw values. The
//! conversion is lenient: a key with the wrong kind of value is treated as
//! absent, so unusual documents degrade to [`Shape::Unknown`] instead of failing.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// The `type` keyword of a schema fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKeyword {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// Anything else (`"null"`, typos, non-string values). Falls through to composition.
    Other(String),
}

impl TypeKeyword {
    fn parse(text: &str) -> Self {
        match text {
            "string" => TypeKeyword::String,
            "integer" => TypeKeyword::Integer,
            "number" => TypeKeyword::Number,
            "boolean" => TypeKeyword::Boolean,
            "array" => TypeKeyword::Array,
            "object" => TypeKeyword::Object,
            other => TypeKeyword::Other(other.to_string()),
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::parse(s),
            // 3.1 style: `type: [string, "null"]`
            Value::Array(xs) => xs
                .iter()
                .filter_map(Value::as_str)
                .find(|s| *s != "null")
                .map(Self::parse)
                .unwrap_or_else(|| TypeKeyword::Other(value.to_string())),
            other => TypeKeyword::Other(other.to_string()),
        }
    }
}

/// One schema fragment, read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    pub type_: Option<TypeKeyword>,
    pub properties: Option<IndexMap<String, SchemaNode>>,
    pub items: Option<Box<SchemaNode>>,
    pub reference: Option<String>,
    pub one_of: Option<Vec<SchemaNode>>,
    pub all_of: Option<Vec<SchemaNode>>,
    pub any_of: Option<Vec<SchemaNode>>,
}

/// Primitive kinds after `integer` and `number` are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

/// What a node means, first match wins:
/// `type` → `oneOf` → `allOf` → `anyOf` → `$ref` → unknown.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Primitive(PrimitiveKind),
    Array(Option<&'a SchemaNode>),
    Object(Option<&'a IndexMap<String, SchemaNode>>),
    OneOf(&'a [SchemaNode]),
    AllOf(&'a [SchemaNode]),
    AnyOf(&'a [SchemaNode]),
    Ref(&'a str),
    Unknown,
}

impl SchemaNode {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let properties = map.get("properties").and_then(Value::as_object).map(|props| {
            props
                .iter()
                .map(|(k, v)| (k.clone(), SchemaNode::from_value(v)))
                .collect::<IndexMap<_, _>>()
        });
        Self {
            type_: map.get("type").map(TypeKeyword::from_value),
            properties,
            items: map.get("items").map(|v| Box::new(SchemaNode::from_value(v))),
            reference: map.get("$ref").and_then(Value::as_str).map(str::to_string),
            one_of: list_of(map, "oneOf"),
            all_of: list_of(map, "allOf"),
            any_of: list_of(map, "anyOf"),
        }
    }

    pub fn shape(&self) -> Shape<'_> {
        match &self.type_ {
            Some(TypeKeyword::String) => return Shape::Primitive(PrimitiveKind::String),
            Some(TypeKeyword::Integer | TypeKeyword::Number) => {
                return Shape::Primitive(PrimitiveKind::Number);
            }
            Some(TypeKeyword::Boolean) => return Shape::Primitive(PrimitiveKind::Boolean),
            Some(TypeKeyword::Array) => return Shape::Array(self.items.as_deref()),
            Some(TypeKeyword::Object) => return Shape::Object(self.properties.as_ref()),
            Some(TypeKeyword::Other(_)) | None => {}
        }
        if let Some(xs) = &self.one_of {
            Shape::OneOf(xs)
        } else if let Some(xs) = &self.all_of {
            Shape::AllOf(xs)
        } else if let Some(xs) = &self.any_of {
            Shape::AnyOf(xs)
        } else if let Some(r) = &self.reference {
            Shape::Ref(r)
        } else {
            Shape::Unknown
        }
    }
}

fn list_of(map: &Map<String, Value>, key: &str) -> Option<Vec<SchemaNode>> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|xs| xs.iter().map(SchemaNode::from_value).collect())
}

/// Named top-level schemas in document order (`components.schemas`).
pub type SchemaSet = IndexMap<String, SchemaNode>;

/// Pull `components.schemas` out of a whole document. Missing sections give an empty set.
pub fn component_schemas(document: &Value) -> SchemaSet {
    document
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .map(|schemas| {
            schemas
                .iter()
                .map(|(name, v)| (name.clone(), SchemaNode::from_value(v)))
                .collect()
        })
        .unwrap_or_default()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_wins_over_composition_keys() {
        let node = SchemaNode::from_value(&json!({
            "type": "string",
            "oneOf": [{"type": "number"}],
            "$ref": "#/components/schemas/Foo"
        }));
        assert!(matches!(node.shape(), Shape::Primitive(PrimitiveKind::String)));
    }

    #[test]
    fn unrecognised_type_falls_through_to_composition() {
        let node = SchemaNode::from_value(&json!({
            "type": "null",
            "anyOf": [{"type": "string"}],
            "$ref": "#/components/schemas/Foo"
        }));
        assert!(matches!(node.shape(), Shape::AnyOf(xs) if xs.len() == 1));
    }

    #[test]
    fn composition_priority_is_one_all_any_then_ref() {
        let node = SchemaNode::from_value(&json!({
            "anyOf": [{}],
            "allOf": [{}, {}],
            "$ref": "#/x"
        }));
        assert!(matches!(node.shape(), Shape::AllOf(xs) if xs.len() == 2));

        let node = SchemaNode::from_value(&json!({"$ref": "#/x"}));
        assert!(matches!(node.shape(), Shape::Ref("#/x")));
    }

    #[test]
    fn integer_and_number_merge() {
        for t in ["integer", "number"] {
            let node = SchemaNode::from_value(&json!({ "type": t }));
            assert!(matches!(node.shape(), Shape::Primitive(PrimitiveKind::Number)));
        }
    }

    #[test]
    fn list_form_type_skips_null() {
        let node = SchemaNode::from_value(&json!({ "type": ["null", "boolean"] }));
        assert_eq!(node.type_, Some(TypeKeyword::Boolean));
    }

    #[test]
    fn wrongly_typed_keys_are_ignored() {
        let node = SchemaNode::from_value(&json!({
            "properties": 5,
            "oneOf": "nope",
            "$ref": 12
        }));
        assert!(node.properties.is_none());
        assert!(matches!(node.shape(), Shape::Unknown));
        assert!(matches!(SchemaNode::from_value(&json!("scalar")).shape(), Shape::Unknown));
    }

    #[test]
    fn properties_keep_document_order() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": { "zeta": {}, "alpha": {}, "mid": {} }
        }));
        let keys: Vec<_> = node.properties.unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn missing_components_gives_empty_set() {
        assert!(component_schemas(&json!({"openapi": "3.0.0"})).is_empty());
        assert!(component_schemas(&json!({"components": {"schemas": []}})).is_empty());
        let set = component_schemas(&json!({"components": {"schemas": {"B": {}, "A": {}}}}));
        assert_eq!(set.keys().collect::<Vec<_>>(), ["B", "A"]);
    }
}
