//! Lowering from the apollo-compiler AST into the owned schema model.

use crate::types::{
    FieldDefinition, InputObjectType, InputValueDefinition, InterfaceType, ObjectType,
    TypeDefinition, TypeRef,
};
use apollo_compiler::ast;
use apollo_compiler::Node;
use std::collections::HashMap;

/// Directives that hide a schema element from clients.
const HIDDEN_DIRECTIVES: &[&str] = &["inaccessible"];

/// Directives that additionally hide a field (it is resolved by another subgraph).
const HIDDEN_FIELD_DIRECTIVES: &[&str] = &["inaccessible", "external"];

impl From<&ast::Type> for TypeRef {
    fn from(ty: &ast::Type) -> Self {
        match ty {
            ast::Type::Named(name) => Self::named(name.as_str()),
            ast::Type::NonNullNamed(name) => Self::non_null(Self::named(name.as_str())),
            ast::Type::List(inner) => Self::list(Self::from(inner.as_ref())),
            ast::Type::NonNullList(inner) => Self::non_null(Self::list(Self::from(inner.as_ref()))),
        }
    }
}

/// Lower every type-system declaration of `document`, in declaration order.
///
/// Extensions are appended to their base declaration. An extension without a
/// base becomes the declaration. Duplicate declarations keep the first one.
#[tracing::instrument(skip(document), fields(definitions = document.definitions.len()))]
pub fn lower_document(document: &ast::Document) -> Vec<TypeDefinition> {
    let mut lowering = Lowering::default();

    for definition in &document.definitions {
        if let Some(lowered) = lower_definition(definition) {
            lowering.declare(lowered);
        }
    }
    for definition in &document.definitions {
        if let Some(lowered) = lower_extension(definition) {
            lowering.extend(lowered);
        }
    }

    tracing::debug!(types = lowering.definitions.len(), "Lowered schema document");
    lowering.definitions
}

#[derive(Default)]
struct Lowering {
    definitions: Vec<TypeDefinition>,
    by_name: HashMap<String, usize>,
}

impl Lowering {
    fn declare(&mut self, definition: TypeDefinition) {
        if self.by_name.contains_key(definition.name()) {
            tracing::warn!(
                name = definition.name(),
                "Duplicate type declaration ignored"
            );
            return;
        }
        self.by_name
            .insert(definition.name().to_string(), self.definitions.len());
        self.definitions.push(definition);
    }

    fn extend(&mut self, extension: TypeDefinition) {
        let Some(&idx) = self.by_name.get(extension.name()) else {
            self.declare(extension);
            return;
        };

        match (&mut self.definitions[idx], extension) {
            (TypeDefinition::Object(base), TypeDefinition::Object(ext)) => {
                base.fields.extend(ext.fields);
            }
            (TypeDefinition::Interface(base), TypeDefinition::Interface(ext)) => {
                base.fields.extend(ext.fields);
            }
            (TypeDefinition::InputObject(base), TypeDefinition::InputObject(ext)) => {
                base.fields.extend(ext.fields);
            }
            (
                TypeDefinition::Enum { values, .. },
                TypeDefinition::Enum {
                    values: extra, ..
                },
            ) => values.extend(extra),
            (
                TypeDefinition::Union { members, .. },
                TypeDefinition::Union {
                    members: extra, ..
                },
            ) => members.extend(extra),
            (TypeDefinition::Scalar { .. }, TypeDefinition::Scalar { .. }) => {}
            (base, ext) => {
                tracing::warn!(
                    name = ext.name(),
                    base = ?base.kind(),
                    extension = ?ext.kind(),
                    "Extension kind does not match its declaration, ignored"
                );
            }
        }
    }
}

fn lower_definition(definition: &ast::Definition) -> Option<TypeDefinition> {
    let lowered = match definition {
        ast::Definition::ScalarTypeDefinition(def) => TypeDefinition::Scalar {
            name: def.name.to_string(),
        },
        ast::Definition::EnumTypeDefinition(def) => TypeDefinition::Enum {
            name: def.name.to_string(),
            values: lower_enum_values(&def.values),
        },
        ast::Definition::ObjectTypeDefinition(def) => TypeDefinition::Object(ObjectType {
            name: def.name.to_string(),
            fields: lower_fields(&def.fields),
        }),
        ast::Definition::InterfaceTypeDefinition(def) => {
            TypeDefinition::Interface(InterfaceType {
                name: def.name.to_string(),
                fields: lower_fields(&def.fields),
            })
        }
        ast::Definition::UnionTypeDefinition(def) => TypeDefinition::Union {
            name: def.name.to_string(),
            members: def.members.iter().map(ToString::to_string).collect(),
        },
        ast::Definition::InputObjectTypeDefinition(def) => {
            TypeDefinition::InputObject(InputObjectType {
                name: def.name.to_string(),
                fields: lower_input_values(&def.fields),
            })
        }
        _ => return None,
    };
    Some(lowered)
}

fn lower_extension(definition: &ast::Definition) -> Option<TypeDefinition> {
    let lowered = match definition {
        ast::Definition::ScalarTypeExtension(ext) => TypeDefinition::Scalar {
            name: ext.name.to_string(),
        },
        ast::Definition::EnumTypeExtension(ext) => TypeDefinition::Enum {
            name: ext.name.to_string(),
            values: lower_enum_values(&ext.values),
        },
        ast::Definition::ObjectTypeExtension(ext) => TypeDefinition::Object(ObjectType {
            name: ext.name.to_string(),
            fields: lower_fields(&ext.fields),
        }),
        ast::Definition::InterfaceTypeExtension(ext) => TypeDefinition::Interface(InterfaceType {
            name: ext.name.to_string(),
            fields: lower_fields(&ext.fields),
        }),
        ast::Definition::UnionTypeExtension(ext) => TypeDefinition::Union {
            name: ext.name.to_string(),
            members: ext.members.iter().map(ToString::to_string).collect(),
        },
        ast::Definition::InputObjectTypeExtension(ext) => {
            TypeDefinition::InputObject(InputObjectType {
                name: ext.name.to_string(),
                fields: lower_input_values(&ext.fields),
            })
        }
        _ => return None,
    };
    Some(lowered)
}

fn has_any_directive(directives: &ast::DirectiveList, names: &[&str]) -> bool {
    directives.iter().any(|directive| {
        names
            .iter()
            .any(|name| directive.name.as_str().eq_ignore_ascii_case(name))
    })
}

fn lower_fields(fields: &[Node<ast::FieldDefinition>]) -> Vec<FieldDefinition> {
    fields
        .iter()
        .filter(|field| !has_any_directive(&field.directives, HIDDEN_FIELD_DIRECTIVES))
        .map(|field| FieldDefinition {
            name: field.name.to_string(),
            ty: TypeRef::from(&field.ty),
            arguments: lower_input_values(&field.arguments),
        })
        .collect()
}

fn lower_input_values(values: &[Node<ast::InputValueDefinition>]) -> Vec<InputValueDefinition> {
    values
        .iter()
        .filter(|value| !has_any_directive(&value.directives, HIDDEN_DIRECTIVES))
        .map(|value| InputValueDefinition::new(value.name.as_str(), TypeRef::from(value.ty.as_ref())))
        .collect()
}

fn lower_enum_values(values: &[Node<ast::EnumValueDefinition>]) -> Vec<String> {
    values
        .iter()
        .filter(|value| !has_any_directive(&value.directives, HIDDEN_DIRECTIVES))
        .map(|value| value.value.to_string())
        .collect()
}
