//! Schema resolution.
//!
//! Walks typed [`SchemaNode`]s and produces a [`TypeExpr`] per property, registering
//! a named [`Declaration`] for every inline object it meets along the way. The
//! [`Registry`] is the only state and is passed explicitly.
//!
//! Declarations are registered *before* their members are resolved, so the
//! registry's order is discovery order: a parent, then the nested objects its
//! properties introduce, then the next top-level schema.
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::ir::{Declaration, DeclarationBody, Member, Primitive, TypeExpr};
use crate::naming::{ref_target, synthesize_name};
use crate::schema::{PrimitiveKind, SchemaNode, SchemaSet, Shape, TypeKeyword};

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Property name used when a top-level alias needs to name an inline object.
const ALIAS_ITEM: &str = "item";

/// What to do when an inline object synthesizes a name that is already taken
/// by a structurally different schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Keep the first declaration and reference it; the later shape is dropped (logged).
    #[default]
    Reuse,
    /// Register the later shape under the first free `Name2`, `Name3`, ...
    Suffix,
    /// Stop with [`ResolveError::NameCollision`].
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub collisions: CollisionPolicy,
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { collisions: CollisionPolicy::default(), max_depth: DEFAULT_MAX_DEPTH }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

/// Declarations discovered during one run, in registration order.
#[derive(Debug)]
pub struct Registry<'a> {
    options: ResolveOptions,
    declarations: IndexMap<String, Declaration>,
    /// Every taken name → the node it came from. Top-level names are taken up front.
    origins: HashMap<String, &'a SchemaNode>,
}

enum Claim {
    Existing(String),
    Fresh(String),
}

impl<'a> Registry<'a> {
    pub fn new(options: ResolveOptions) -> Self {
        Self { options, declarations: IndexMap::new(), origins: HashMap::new() }
    }

    /// Take a top-level schema name without registering (ordering) it yet.
    pub fn reserve(&mut self, name: &str, node: &'a SchemaNode) {
        self.origins.insert(name.to_string(), node);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.origins.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    pub fn into_declarations(self) -> Vec<Declaration> {
        self.declarations.into_values().collect()
    }

    fn register(&mut self, declaration: Declaration, origin: &'a SchemaNode) {
        debug!(name = %declaration.name, "registered declaration");
        self.origins.insert(declaration.name.clone(), origin);
        self.declarations.insert(declaration.name.clone(), declaration);
    }

    fn set_body(&mut self, name: &str, body: DeclarationBody) {
        if let Some(declaration) = self.declarations.get_mut(name) {
            declaration.body = body;
        }
    }

    fn claim(&self, base: &str, node: &SchemaNode, path: &str) -> Result<Claim, ResolveError> {
        let Some(origin) = self.origins.get(base) else {
            return Ok(Claim::Fresh(base.to_string()));
        };
        let same_shape = *origin == node;
        match self.options.collisions {
            CollisionPolicy::Reuse => {
                if !same_shape {
                    warn!(
                        declaration = base,
                        path,
                        "inline object reuses an existing declaration of a different shape; its own properties are dropped"
                    );
                }
                Ok(Claim::Existing(base.to_string()))
            }
            CollisionPolicy::Fail if !same_shape => Err(ResolveError::NameCollision {
                name: base.to_string(),
                path: path.to_string(),
            }),
            CollisionPolicy::Fail => Ok(Claim::Existing(base.to_string())),
            CollisionPolicy::Suffix if same_shape => Ok(Claim::Existing(base.to_string())),
            CollisionPolicy::Suffix => {
                let mut n = 2usize;
                loop {
                    let candidate = format!("{base}{n}");
                    match self.origins.get(candidate.as_str()) {
                        None => {
                            debug!(declaration = base, renamed = %candidate, path, "disambiguated inline object");
                            return Ok(Claim::Fresh(candidate));
                        }
                        Some(other) if *other == node => return Ok(Claim::Existing(candidate)),
                        Some(_) => n += 1,
                    }
                }
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DRIVER
// ————————————————————————————————————————————————————————————————————————————

/// Resolve every top-level schema, in document order.
pub fn resolve_schemas<'a>(
    schemas: &'a SchemaSet,
    options: ResolveOptions,
) -> Result<Registry<'a>, ResolveError> {
    let mut registry = Registry::new(options);
    for (name, node) in schemas {
        registry.reserve(name, node);
    }
    for (name, node) in schemas {
        declare(name, node, &mut registry)?;
    }
    info!(schemas = schemas.len(), declarations = registry.len(), "resolved component schemas");
    Ok(registry)
}

/// Register the declaration for one top-level schema.
///
/// A body with `properties`, `allOf`, or `type: object` becomes an interface:
/// direct properties first, then for each `allOf` element its `$ref` (into one
/// shared `extends` list) and its own properties. Anything else becomes an alias.
pub fn declare<'a>(
    name: &str,
    node: &'a SchemaNode,
    registry: &mut Registry<'a>,
) -> Result<(), ResolveError> {
    let is_interface = node.properties.is_some()
        || node.all_of.is_some()
        || node.type_ == Some(TypeKeyword::Object);

    if !is_interface {
        registry.register(Declaration::alias(name, TypeExpr::Unknown), node);
        let context = vec![name.to_string()];
        let ty = resolve_at(node, ALIAS_ITEM, &context, 0, registry)?;
        registry.set_body(name, DeclarationBody::Alias { ty });
        return Ok(());
    }

    registry.register(Declaration::interface(name), node);
    let mut extends = Vec::<String>::new();
    let mut members = Vec::<Member>::new();

    if let Some(properties) = &node.properties {
        resolve_members(properties, &[], 1, registry, &mut members)?;
    }
    for part in node.all_of.iter().flatten() {
        if let Some(pointer) = &part.reference {
            let target = ref_target(pointer).to_string();
            if !target.is_empty() && !extends.contains(&target) {
                extends.push(target);
            }
        }
        if let Some(properties) = &part.properties {
            resolve_members(properties, &[], 1, registry, &mut members)?;
        }
    }

    registry.set_body(name, DeclarationBody::Interface { extends, members });
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// RESOLVER
// ————————————————————————————————————————————————————————————————————————————

/// Type expression for `node` found under `property`, with `context` the ancestor
/// property path from the nearest top-level schema.
pub fn resolve<'a>(
    node: &'a SchemaNode,
    property: &str,
    context: &[String],
    registry: &mut Registry<'a>,
) -> Result<TypeExpr, ResolveError> {
    resolve_at(node, property, context, 0, registry)
}

fn resolve_at<'a>(
    node: &'a SchemaNode,
    property: &str,
    context: &[String],
    depth: usize,
    registry: &mut Registry<'a>,
) -> Result<TypeExpr, ResolveError> {
    if depth > registry.options.max_depth {
        return Err(ResolveError::DepthExceeded {
            path: dotted_path(context, property),
            limit: registry.options.max_depth,
        });
    }

    let each = |xs: &'a [SchemaNode], registry: &mut Registry<'a>| {
        xs.iter()
            .map(|x| resolve_at(x, property, context, depth + 1, registry))
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(match node.shape() {
        Shape::Primitive(kind) => TypeExpr::Primitive(match kind {
            PrimitiveKind::String => Primitive::String,
            PrimitiveKind::Number => Primitive::Number,
            PrimitiveKind::Boolean => Primitive::Boolean,
        }),
        Shape::Array(Some(items)) => {
            TypeExpr::array_of(resolve_at(items, property, context, depth + 1, registry)?)
        }
        Shape::Array(None) => TypeExpr::array_of(TypeExpr::Unknown),
        Shape::Object(properties) => {
            return resolve_object(node, properties, property, context, depth, registry);
        }
        Shape::OneOf(xs) | Shape::AnyOf(xs) => TypeExpr::Union(each(xs, registry)?),
        Shape::AllOf(xs) => TypeExpr::Intersection(each(xs, registry)?),
        Shape::Ref(pointer) => match ref_target(pointer) {
            "" => TypeExpr::Unknown,
            target => TypeExpr::Named(target.to_string()),
        },
        Shape::Unknown => TypeExpr::Unknown,
    })
}

fn resolve_object<'a>(
    node: &'a SchemaNode,
    properties: Option<&'a IndexMap<String, SchemaNode>>,
    property: &str,
    context: &[String],
    depth: usize,
    registry: &mut Registry<'a>,
) -> Result<TypeExpr, ResolveError> {
    let base = synthesize_name(context, property);
    let name = match registry.claim(&base, node, &dotted_path(context, property))? {
        Claim::Existing(name) => return Ok(TypeExpr::Named(name)),
        Claim::Fresh(name) => name,
    };

    // registered before its members so it precedes the objects they introduce,
    // and a colliding sibling later in the walk finds it
    registry.register(Declaration::interface(&name), node);

    let mut child_context = context.to_vec();
    child_context.push(property.to_string());
    let mut members = Vec::new();
    if let Some(properties) = properties {
        resolve_members(properties, &child_context, depth + 1, registry, &mut members)?;
    }
    registry.set_body(&name, DeclarationBody::Interface { extends: Vec::new(), members });
    Ok(TypeExpr::Named(name))
}

fn resolve_members<'a>(
    properties: &'a IndexMap<String, SchemaNode>,
    context: &[String],
    depth: usize,
    registry: &mut Registry<'a>,
    members: &mut Vec<Member>,
) -> Result<(), ResolveError> {
    for (name, child) in properties {
        let ty = resolve_at(child, name, context, depth, registry)?;
        // a repeated name (e.g. across allOf parts) keeps its slot, last type wins
        match members.iter_mut().find(|m| m.name == *name) {
            Some(existing) => existing.ty = ty,
            None => members.push(Member { name: name.clone(), ty }),
        }
    }
    Ok(())
}

fn dotted_path(context: &[String], property: &str) -> String {
    context
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(property))
        .collect::<Vec<_>>()
        .join(".")
}

// ------------------------------- Tests ------------------------------------ //
