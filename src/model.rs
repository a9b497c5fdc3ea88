//! Data model for extracted declarations — format-agnostic.

use std::collections::{BTreeMap, BTreeSet};

/// A free or member function, possibly an overload set sharing one doc comment.
///
/// `signatures` and `names` are sets: merging two overloads with identical
/// signatures collapses them, and warning/rendering paths want the names in a
/// stable order.
#[derive(Debug, Default, Clone)]
pub struct Function {
    /// Documentation-relative source path.
    pub file: String,
    /// Normalized signature text, one entry per overload.
    pub signatures: BTreeSet<String>,
    /// `identifier()` tokens, one per distinct call name in the set.
    pub names: BTreeSet<String>,
    pub desc: String,
}

impl Function {
    /// Fold another extracted overload into this one.
    pub fn absorb(&mut self, other: Function) {
        self.signatures.extend(other.signatures);
        self.names.extend(other.names);
    }

    /// First name in sorted order, for diagnostics and categorization.
    pub fn first_name(&self) -> &str {
        self.names.iter().next().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub desc: String,
    /// Decimal rendering of the resolved enumerator value, empty if the
    /// assignment expression could not be evaluated.
    pub val: String,
}

#[derive(Debug, Default, Clone)]
pub struct Enum {
    pub file: String,
    pub name: String,
    pub values: Vec<EnumValue>,
    pub desc: String,
}

/// A member variable, or several adjacent undocumented ones merged together.
#[derive(Debug, Default, Clone)]
pub struct Field {
    pub names: Vec<String>,
    pub signatures: Vec<String>,
    pub desc: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Struct,
}

impl std::fmt::Display for ClassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassKind::Class => f.write_str("class"),
            ClassKind::Struct => f.write_str("struct"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Class {
    pub file: String,
    pub kind: ClassKind,
    pub name: String,
    /// Raw declaration text up to the opening brace, for literal rendering.
    pub decl: String,
    pub enums: Vec<Enum>,
    pub fields: Vec<Field>,
    pub funs: Vec<Function>,
    pub desc: String,
}

#[derive(Debug, Clone)]
pub struct Constant {
    pub file: String,
    /// The C++ type token the constant group is keyed by.
    pub ctype: String,
    pub name: String,
    pub desc: String,
}

/// A named grouping of declarations rendered into one document.
#[derive(Debug, Default)]
pub struct Category {
    /// Output document name, `reference-<Name>.rst`.
    pub filename: String,
    pub classes: Vec<Class>,
    pub functions: Vec<Function>,
    pub enums: Vec<Enum>,
    pub constants: BTreeMap<String, Vec<Constant>>,
    pub overview: Option<String>,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Category {
            filename: format!("reference-{}.rst", name.replace(' ', "_")),
            ..Category::default()
        }
    }

    /// The rendered page this category's anchors live on.
    pub fn html_name(&self) -> String {
        self.filename.replace(".rst", ".html")
    }
}
