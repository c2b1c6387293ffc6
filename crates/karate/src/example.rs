//! Literal example payloads for operation variables.
//!
//! Input types recurse through their fields. A recursive input type is cut
//! off with a placeholder literal, so the field is still present in the
//! payload.

use crate::error::{ConversionError, Result};
use crate::index::SchemaIndex;
use crate::resolve::{BuiltinScalar, ScalarFamily};
use crate::settings::CustomScalarMapping;
use crate::types::{TypeDefinition, TypeRef};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

const INT_RANGE: Range<i64> = 100..1000;
const FLOAT_RANGE: Range<f64> = 100.0..1000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ExampleValue {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    EnumMember(String),
    Object(Vec<(String, ExampleValue)>),
    List(Vec<ExampleValue>),
    /// Stand-in for a value that is not generated, named after its type.
    Placeholder(String),
}

impl ExampleValue {
    /// Placeholder mirroring every list layer of `ty`.
    #[must_use]
    pub fn placeholder_for(ty: &TypeRef) -> Self {
        match ty {
            TypeRef::Named(name) => Self::Placeholder(name.clone()),
            TypeRef::NonNull(inner) => Self::placeholder_for(inner),
            TypeRef::List(inner) => Self::List(vec![Self::placeholder_for(inner)]),
        }
    }
}

impl fmt::Display for ExampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) | Self::EnumMember(value) => write!(f, "\"{value}\""),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:.2}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Placeholder(type_name) => write!(f, "<some {type_name} value>"),
            Self::List(items) => {
                f.write_str("[ ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(" ]")
            }
            Self::Object(entries) => {
                if entries.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{name}\": {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// Generates [`ExampleValue`]s with a caller-supplied random source.
pub struct ExampleValueSynthesizer<'a, R> {
    index: &'a SchemaIndex,
    custom_scalars: &'a CustomScalarMapping,
    rng: R,
    /// (parent input type, child input type) edges on the current path.
    path: HashSet<(&'a str, &'a str)>,
}

impl<'a, R: Rng> ExampleValueSynthesizer<'a, R> {
    pub fn new(index: &'a SchemaIndex, custom_scalars: &'a CustomScalarMapping, rng: R) -> Self {
        Self {
            index,
            custom_scalars,
            rng,
            path: HashSet::new(),
        }
    }

    /// Example for one top-level argument. Cycle tracking starts fresh.
    pub fn value_for(&mut self, ty: &'a TypeRef) -> Result<ExampleValue> {
        self.path.clear();
        self.value_of(ty)
    }

    fn value_of(&mut self, ty: &'a TypeRef) -> Result<ExampleValue> {
        match ty {
            TypeRef::NonNull(inner) => self.value_of(inner),
            TypeRef::List(inner) => Ok(ExampleValue::List(vec![self.value_of(inner)?])),
            TypeRef::Named(name) => self.named_value(name),
        }
    }

    fn named_value(&mut self, name: &'a str) -> Result<ExampleValue> {
        if let Some(family) = self.custom_scalars.get(name) {
            return Ok(self.family_value(family));
        }
        if let Some(builtin) = BuiltinScalar::from_name(name) {
            return Ok(match builtin {
                BuiltinScalar::Float => ExampleValue::Float(self.float()),
                other => self.family_value(other.family()),
            });
        }

        let index = self.index;
        match index.get(name) {
            Some(TypeDefinition::Enum { values, .. }) => values
                .choose(&mut self.rng)
                .map(|value| ExampleValue::EnumMember(value.clone()))
                .ok_or_else(|| ConversionError::MissingEnumValues {
                    name: name.to_string(),
                }),
            Some(TypeDefinition::InputObject(input)) => {
                let mut entries = Vec::with_capacity(input.fields.len());
                for field in &input.fields {
                    let child = field.ty.leaf_name();
                    let value = if index.input_object(child).is_some() {
                        let edge = (input.name.as_str(), child);
                        if self.path.contains(&edge) {
                            tracing::trace!(parent = edge.0, child, "Recursive input replaced by placeholder");
                            ExampleValue::placeholder_for(&field.ty)
                        } else {
                            self.path.insert(edge);
                            let value = self.value_of(&field.ty);
                            self.path.remove(&edge);
                            value?
                        }
                    } else {
                        self.value_of(&field.ty)?
                    };
                    entries.push((field.name.clone(), value));
                }
                Ok(ExampleValue::Object(entries))
            }
            Some(_) => Ok(ExampleValue::Placeholder(name.to_string())),
            None => Err(ConversionError::UnknownNamedType {
                name: name.to_string(),
            }),
        }
    }

    fn family_value(&mut self, family: ScalarFamily) -> ExampleValue {
        match family {
            ScalarFamily::String => ExampleValue::String(self.token()),
            ScalarFamily::Number => ExampleValue::Int(self.rng.gen_range(INT_RANGE)),
            ScalarFamily::Boolean => ExampleValue::Boolean(self.rng.gen_bool(0.5)),
        }
    }

    /// Opaque string drawn from the rng so seeded runs repeat.
    fn token(&mut self) -> String {
        uuid::Builder::from_random_bytes(self.rng.gen())
            .into_uuid()
            .simple()
            .to_string()
    }

    fn float(&mut self) -> f64 {
        (self.rng.gen_range(FLOAT_RANGE) * 100.0).round() / 100.0
    }
}
