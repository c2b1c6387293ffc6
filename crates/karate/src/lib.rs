//! Karate feature generation from GraphQL schemas.
//!
//! A conversion builds a [`SchemaIndex`] from a parsed schema and produces
//! two kinds of artifacts from it:
//!
//! - one [`Shape`] per object and interface type, a response-validation template
//! - one [`QueryDocument`] per root operation field, with example variables
//!
//! Schemas with self-referencing or mutually referencing types are handled by
//! walking the type graph with a [`CycleGuardedWalker`], which drops every
//! field that would close a cycle. Example values for recursive input types
//! use a placeholder instead.
//!
//! ```no_run
//! use graphql_karate::{ConversionSettings, Converter};
//!
//! let sdl = "type User { id: ID! } type Query { user: User }";
//! let feature = Converter::new(ConversionSettings::default()).convert_source(sdl)?;
//! println!("{feature}");
//! # Ok::<(), graphql_karate::ConversionError>(())
//! ```

mod convert;
mod emit;
mod error;
mod example;
mod graph;
mod index;
mod lower;
mod query;
mod resolve;
mod settings;
mod shape;
mod types;
mod variables;
mod walker;

pub use convert::{parse_schema, Conversion, Converter};
pub use emit::{Feature, ResponseAssertion, Scenario};
pub use error::{ConversionError, Result};
pub use example::{ExampleValue, ExampleValueSynthesizer};
pub use graph::ReferenceGraph;
pub use index::{RootTypeNames, SchemaIndex};
pub use lower::lower_document;
pub use query::{operation_name, FieldSelection, OperationType, QueryDocument, QuerySynthesizer, Selection};
pub use resolve::{
    shape_variable_name, BuiltinScalar, ResolvedExpr, ScalarFamily, TypeResolver, UnknownScalarFamily,
};
pub use settings::{ConversionSettings, CustomScalarMapping, NameFilter, DEFAULT_BASE_URL};
pub use shape::{Shape, ShapeSynthesizer};
pub use types::{
    FieldDefinition, HasFields, InputObjectType, InputValueDefinition, InterfaceType, ObjectType,
    TypeDefinition, TypeKind, TypeRef,
};
pub use variables::{VariableDeclaration, VariableTable};
pub use walker::{CycleGuardedWalker, PrunedFields, Survivor, SurvivorTable, WalkObserver};
