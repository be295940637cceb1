//! TypeScript emission from resolved declarations.
//!
//! Pure text generation: the emitter never looks at schema nodes again.
use tracing::warn;

use crate::ir::{Declaration, DeclarationBody, Member, TypeExpr};
use crate::naming::is_identifier;

pub const DEFAULT_INDENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per member line.
    pub indent: usize,
    /// Prefix every declaration with `export`.
    pub export: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { indent: DEFAULT_INDENT, export: false }
    }
}

pub struct Codegen {
    options: EmitOptions,
    out: String,
    /// Declaration names written as-is that TypeScript will not accept.
    invalid_names: Vec<String>,
}

impl Codegen {
    pub fn new(options: EmitOptions) -> Self {
        Self { options, out: String::new(), invalid_names: Vec::new() }
    }

    /// Emit declarations in the order given, each followed by a blank line.
    pub fn emit<'d>(&mut self, declarations: impl IntoIterator<Item = &'d Declaration>) {
        for declaration in declarations {
            self.emit_declaration(declaration);
        }
    }

    pub fn invalid_names(&self) -> &[String] {
        &self.invalid_names
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn emit_declaration(&mut self, declaration: &Declaration) {
        if !is_identifier(&declaration.name) {
            warn!(name = %declaration.name, "declaration name is not a valid TypeScript identifier");
            self.invalid_names.push(declaration.name.clone());
        }
        if self.options.export {
            self.out.push_str("export ");
        }
        match &declaration.body {
            DeclarationBody::Interface { extends, members } => {
                self.out.push_str("interface ");
                self.out.push_str(&declaration.name);
                if !extends.is_empty() {
                    self.out.push_str(" extends ");
                    self.out.push_str(&extends.join(", "));
                }
                self.out.push_str(" {\n");
                for member in members {
                    self.emit_member(member);
                }
                self.out.push_str("}\n\n");
            }
            DeclarationBody::Alias { ty } => {
                self.out.push_str(&format!("type {} = {};\n\n", declaration.name, render_type(ty)));
            }
        }
    }

    fn emit_member(&mut self, member: &Member) {
        let key = if is_identifier(&member.name) {
            member.name.clone()
        } else {
            // JSON string syntax is a valid TS string literal key
            serde_json::Value::String(member.name.clone()).to_string()
        };
        self.out.push_str(&format!(
            "{:indent$}{key}: {};\n",
            "",
            render_type(&member.ty),
            indent = self.options.indent
        ));
    }
}

/// Convenience: declarations → TypeScript source.
pub fn emit_typescript<'d>(
    declarations: impl IntoIterator<Item = &'d Declaration>,
    options: EmitOptions,
) -> String {
    let mut cg = Codegen::new(options);
    cg.emit(declarations);
    cg.into_string()
}

/// Debug view: the declaration list as pretty JSON.
pub fn emit_json<'d>(
    declarations: impl IntoIterator<Item = &'d Declaration>,
) -> Result<String, serde_json::Error> {
    let list = declarations.into_iter().collect::<Vec<_>>();
    serde_json::to_string_pretty(&list)
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

/// Where an expression sits; decides whether a union/intersection needs parens.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    InIntersection,
    ArrayElement,
}

pub fn render_type(ty: &TypeExpr) -> String {
    let mut out = String::new();
    render_into(ty, Position::Top, &mut out);
    out
}

fn render_into(ty: &TypeExpr, position: Position, out: &mut String) {
    match ty {
        TypeExpr::Primitive(p) => out.push_str(p.as_str()),
        TypeExpr::Named(name) => out.push_str(name),
        TypeExpr::Unknown => out.push_str("any"),
        TypeExpr::ArrayOf(item) => {
            render_into(item, Position::ArrayElement, out);
            out.push_str("[]");
        }
        TypeExpr::Union(arms) => render_joined(arms, " | ", "never", position != Position::Top, position, out),
        TypeExpr::Intersection(arms) => render_joined(
            arms,
            " & ",
            "unknown",
            position == Position::ArrayElement,
            position,
            out,
        ),
    }
}

fn render_joined(
    arms: &[TypeExpr],
    separator: &str,
    empty: &str,
    needs_parens: bool,
    position: Position,
    out: &mut String,
) {
    match arms {
        [] => out.push_str(empty),
        [single] => render_into(single, position, out),
        _ => {
            let inner = if separator == " & " { Position::InIntersection } else { Position::Top };
            if needs_parens {
                out.push('(');
            }
            for (i, arm) in arms.iter().enumerate() {
                if i > 0 {
                    out.push_str(separator);
                }
                render_into(arm, inner, out);
            }
            if needs_parens {
                out.push(')');
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
