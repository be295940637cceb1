//! OpenAPI component schemas → TypeScript declarations.
//!
//! Pipeline: decode (YAML/JSON) → typed [`schema::SchemaNode`]s → resolve into a
//! [`resolve::Registry`] of declarations → emit text.
pub mod codegen;
pub mod document;
pub mod error;
pub mod ir;
pub mod naming;
pub mod resolve;
pub mod schema;

use serde_json::Value;

pub use codegen::EmitOptions;
pub use document::SourceFormat;
pub use error::{ConvertError, DocumentError, ResolveError};
pub use resolve::{CollisionPolicy, ResolveOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    TypeScript,
    /// Declaration list as JSON, for debugging.
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::TypeScript => "ts",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub resolve: ResolveOptions,
    pub emit: EmitOptions,
    pub format: OutputFormat,
}

/// Decode `source` and generate output for its `components.schemas`.
pub fn convert(source: &str, format: SourceFormat, options: &Options) -> Result<String, ConvertError> {
    let document = document::parse_document(source, format)?;
    generate(&document, options)
}

/// Generate output for an already decoded document.
pub fn generate(document: &Value, options: &Options) -> Result<String, ConvertError> {
    let schemas = schema::component_schemas(document);
    let registry = resolve::resolve_schemas(&schemas, options.resolve)?;
    Ok(match options.format {
        OutputFormat::TypeScript => codegen::emit_typescript(registry.declarations(), options.emit),
        OutputFormat::Json => codegen::emit_json(registry.declarations())?,
    })
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(yaml: &str) -> String {
        convert(yaml, SourceFormat::Yaml, &Options::default()).unwrap()
    }

    #[test]
    fn pet_interface() {
        let out = ts(r#"
openapi: 3.0.0
components:
  schemas:
    Pet:
      type: object
      properties:
        name: { type: string }
        age: { type: integer }
"#);
        assert_eq!(out, "interface Pet {\n    name: string;\n    age: number;\n}\n\n");
    }

    #[test]
    fn wrapper_extends_base() {
        let out = ts(r##"
components:
  schemas:
    Wrapper:
      allOf:
        - $ref: "#/components/schemas/Base"
        - properties:
            extra: { type: boolean }
"##);
        assert_eq!(out, "interface Wrapper extends Base {\n    extra: boolean;\n}\n\n");
    }

    #[test]
    fn several_refs_share_one_extends_clause() {
        let out = ts(r##"
components:
  schemas:
    Wrapper:
      allOf:
        - $ref: "#/components/schemas/Base"
        - $ref: "#/components/schemas/Audit"
        - properties:
            extra: { type: boolean }
"##);
        assert_eq!(out.matches("interface").count(), 1);
        assert!(out.starts_with("interface Wrapper extends Base, Audit {\n"));
    }

    #[test]
    fn array_of_refs() {
        let out = ts(r##"
components:
  schemas:
    Cart:
      properties:
        items:
          type: array
          items: { $ref: "#/components/schemas/Item" }
"##);
        assert!(out.contains("    items: Item[];\n"));
    }

    #[test]
    fn nested_object_gets_its_own_interface() {
        let out = ts(r#"
components:
  schemas:
    Order:
      type: object
      properties:
        address:
          type: object
          properties:
            city: { type: string }
"#);
        assert_eq!(
            out,
            "interface Order {\n    address: Address;\n}\n\ninterface Address {\n    city: string;\n}\n\n"
        );
    }

    #[test]
    fn json_input_and_output() {
        let src = r#"{"components": {"schemas": {"Tag": {"type": "string"}}}}"#;
        let options = Options { format: OutputFormat::Json, ..Options::default() };
        let out = convert(src, SourceFormat::Json, &options).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v[0]["name"], "Tag");
        assert_eq!(v[0]["kind"], "alias");
    }

    #[test]
    fn document_without_schemas_is_empty() {
        assert_eq!(ts("openapi: 3.0.0\npaths: {}\n"), "");
    }

    #[test]
    fn byte_identical_across_runs() {
        let src = r##"
components:
  schemas:
    A:
      properties:
        x: { oneOf: [ { type: string }, { $ref: "#/components/schemas/B" } ] }
        y: { type: object, properties: { z: { type: array, items: { type: object, properties: { q: {} } } } } }
    B: { type: array, items: { type: number } }
"##;
        assert_eq!(ts(src), ts(src));
        assert_eq!(
            ts(src),
            "interface A {\n    x: string | B;\n    y: Y;\n}\n\ninterface Y {\n    z: YZ[];\n}\n\ninterface YZ {\n    q: any;\n}\n\ntype B = number[];\n\n"
        );
    }

    #[test]
    fn samples_match_their_golden_files() {
        let petstore = ts(include_str!("../samples/petstore.yaml"));
        assert_eq!(petstore, include_str!("../samples/petstore.ts"));

        let shapes = convert(include_str!("../samples/shapes.json"), SourceFormat::Json, &Options::default());
        assert_eq!(shapes.unwrap(), include_str!("../samples/shapes.ts"));
    }

    #[test]
    fn malformed_yaml_is_a_document_error() {
        let err = convert("components: [", SourceFormat::Yaml, &Options::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Document(_)));
    }
}
