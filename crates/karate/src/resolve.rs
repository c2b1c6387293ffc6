//! Resolution of type references into Karate match expressions.

use crate::error::{ConversionError, Result};
use crate::index::SchemaIndex;
use crate::settings::CustomScalarMapping;
use crate::types::{TypeDefinition, TypeRef};
use std::fmt;
use std::str::FromStr;

/// Value families a scalar can be validated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarFamily {
    String,
    Number,
    Boolean,
}

impl ScalarFamily {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Scalars every schema can reference without declaring them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinScalar {
    Id,
    String,
    Int,
    Float,
    Boolean,
}

impl BuiltinScalar {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ID" => Some(Self::Id),
            "String" => Some(Self::String),
            "Int" => Some(Self::Int),
            "Float" => Some(Self::Float),
            "Boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    #[must_use]
    pub const fn family(self) -> ScalarFamily {
        match self {
            Self::Id | Self::String => ScalarFamily::String,
            Self::Int | Self::Float => ScalarFamily::Number,
            Self::Boolean => ScalarFamily::Boolean,
        }
    }
}

impl fmt::Display for ScalarFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown scalar family '{0}', expected one of: string, number, boolean")]
pub struct UnknownScalarFamily(pub String);

impl FromStr for ScalarFamily {
    type Err = UnknownScalarFamily;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            _ => Err(UnknownScalarFamily(s.trim().to_string())),
        }
    }
}

/// A resolved field type, mirroring the wrapper chain it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedExpr {
    Scalar(ScalarFamily),
    /// Reference to another type's shape.
    ShapeRef(String),
    /// Only presence is checked (unions, unmapped custom scalars).
    Present,
    Repeated(Box<ResolvedExpr>),
    Required(Box<ResolvedExpr>),
    Nullable(Box<ResolvedExpr>),
}

impl fmt::Display for ResolvedExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(family) => write!(f, "{family}"),
            Self::ShapeRef(name) => write!(f, "{}", shape_variable_name(name)),
            Self::Present => f.write_str("present"),
            Self::Repeated(inner) => write!(f, "[] {inner}"),
            Self::Required(inner) => write!(f, "#{inner}"),
            Self::Nullable(inner) => write!(f, "##{inner}"),
        }
    }
}

impl ResolvedExpr {
    /// Replace every reference to a shape that is not emitted with `present`.
    #[must_use]
    pub fn with_emitted_shapes<F>(self, emitted: &F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        match self {
            Self::ShapeRef(name) if !emitted(&name) => Self::Present,
            Self::Repeated(inner) => Self::Repeated(Box::new(inner.with_emitted_shapes(emitted))),
            Self::Required(inner) => Self::Required(Box::new(inner.with_emitted_shapes(emitted))),
            Self::Nullable(inner) => Self::Nullable(Box::new(inner.with_emitted_shapes(emitted))),
            other => other,
        }
    }
}

/// Name of the variable holding a type's shape: `UserProfile` -> `userProfileSchema`.
#[must_use]
pub fn shape_variable_name(type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => format!("{}{}Schema", first.to_lowercase(), chars.as_str()),
        None => "Schema".to_string(),
    }
}

/// Turns wrapper chains into [`ResolvedExpr`]s using only the schema index.
pub struct TypeResolver<'a> {
    index: &'a SchemaIndex,
    custom_scalars: &'a CustomScalarMapping,
}

impl<'a> TypeResolver<'a> {
    #[must_use]
    pub fn new(index: &'a SchemaIndex, custom_scalars: &'a CustomScalarMapping) -> Self {
        Self {
            index,
            custom_scalars,
        }
    }

    /// Resolve a full type reference. Every level that is not wrapped in
    /// `NonNull` becomes `Nullable`.
    pub fn resolve(&self, ty: &TypeRef) -> Result<ResolvedExpr> {
        match ty {
            TypeRef::NonNull(inner) => {
                let resolved = self.resolve_nullable_level(inner, ty)?;
                Ok(ResolvedExpr::Required(Box::new(resolved)))
            }
            other => {
                let resolved = self.resolve_nullable_level(other, ty)?;
                Ok(ResolvedExpr::Nullable(Box::new(resolved)))
            }
        }
    }

    fn resolve_nullable_level(&self, ty: &TypeRef, whole: &TypeRef) -> Result<ResolvedExpr> {
        match ty {
            TypeRef::Named(name) => self.resolve_named(name),
            TypeRef::List(inner) => Ok(ResolvedExpr::Repeated(Box::new(self.resolve(inner)?))),
            TypeRef::NonNull(_) => Err(ConversionError::UnrecognizedTypeShape(whole.to_string())),
        }
    }

    /// Resolve a bare type name.
    pub fn resolve_named(&self, name: &str) -> Result<ResolvedExpr> {
        if let Some(family) = self.custom_scalars.get(name) {
            return Ok(ResolvedExpr::Scalar(family));
        }
        if let Some(builtin) = BuiltinScalar::from_name(name) {
            return Ok(ResolvedExpr::Scalar(builtin.family()));
        }

        match self.index.get(name) {
            Some(TypeDefinition::Enum { .. }) => Ok(ResolvedExpr::Scalar(ScalarFamily::String)),
            Some(TypeDefinition::Object(_) | TypeDefinition::Interface(_)) => {
                Ok(ResolvedExpr::ShapeRef(name.to_string()))
            }
            Some(
                TypeDefinition::Union { .. }
                | TypeDefinition::Scalar { .. }
                | TypeDefinition::InputObject(_),
            ) => Ok(ResolvedExpr::Present),
            None => Err(ConversionError::UnknownNamedType {
                name: name.to_string(),
            }),
        }
    }
}
