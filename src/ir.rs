// Strongly-typed IR between resolution and emission. No serde_json::Value here.
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeExpr {
    Primitive(Primitive),
    ArrayOf(Box<TypeExpr>),
    Named(String),             // top-level schema, synthesized declaration or verbatim `$ref` target
    Union(Vec<TypeExpr>),      // oneOf / anyOf
    Intersection(Vec<TypeExpr>), // allOf outside a declaration body
    Unknown,                   // nothing recognised
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
        }
    }
}

impl TypeExpr {
    pub fn array_of(item: TypeExpr) -> Self {
        TypeExpr::ArrayOf(Box::new(item))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclarationBody {
    Interface {
        extends: Vec<String>,  // one combined clause, first occurrence wins
        members: Vec<Member>,  // schema property order
    },
    Alias {
        ty: TypeExpr,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    #[serde(flatten)]
    pub body: DeclarationBody,
}

impl Declaration {
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: DeclarationBody::Interface { extends: Vec::new(), members: Vec::new() },
        }
    }

    pub fn alias(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self { name: name.into(), body: DeclarationBody::Alias { ty } }
    }

    pub fn members(&self) -> &[Member] {
        match &self.body {
            DeclarationBody::Interface { members, .. } => members,
            DeclarationBody::Alias { .. } => &[],
        }
    }

    pub fn extends(&self) -> &[String] {
        match &self.body {
            DeclarationBody::Interface { extends, .. } => extends,
            DeclarationBody::Alias { .. } => &[],
        }
    }
}
