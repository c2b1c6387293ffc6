//! Owned schema model the converter works on.
//!
//! The parsed AST is lowered into these types once per conversion so that the
//! rest of the crate matches over a closed set of variants and never has to
//! care about extensions, directives or source spans.

use std::fmt;

/// A reference to a type as written on a field or argument.
///
/// `[Filter!]!` is `NonNull(List(NonNull(Named("Filter"))))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    #[must_use]
    pub fn non_null(inner: Self) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// The name at the bottom of the wrapper chain.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.leaf_name(),
        }
    }

    /// Whether the outermost non-null layer is a list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// An argument or an input object field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValueDefinition {
    pub name: String,
    pub ty: TypeRef,
}

impl InputValueDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeRef,
    pub arguments: Vec<InputValueDefinition>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Object and interface types both expose an ordered field list.
pub trait HasFields {
    fn name(&self) -> &str;
    fn fields(&self) -> &[FieldDefinition];

    fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl HasFields for ObjectType {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }
}

impl HasFields for InterfaceType {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectType {
    pub name: String,
    pub fields: Vec<InputValueDefinition>,
}

/// A top-level type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Scalar { name: String },
    Enum { name: String, values: Vec<String> },
    Object(ObjectType),
    Interface(InterfaceType),
    Union { name: String, members: Vec<String> },
    InputObject(InputObjectType),
}

/// Kind of a declaration, used for logging and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    Interface,
    Union,
    InputObject,
}

impl TypeDefinition {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name } | Self::Enum { name, .. } | Self::Union { name, .. } => name,
            Self::Object(object) => &object.name,
            Self::Interface(interface) => &interface.name,
            Self::InputObject(input) => &input.name,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar { .. } => TypeKind::Scalar,
            Self::Enum { .. } => TypeKind::Enum,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union { .. } => TypeKind::Union,
            Self::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// The field list for objects and interfaces.
    #[must_use]
    pub fn as_has_fields(&self) -> Option<&dyn HasFields> {
        match self {
            Self::Object(object) => Some(object),
            Self::Interface(interface) => Some(interface),
            _ => None,
        }
    }
}
