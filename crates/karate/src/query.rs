//! Query document synthesis for root operation fields.
//!
//! The selection tree follows the same cycle-guarded descent as shape
//! pruning, starting from the field's return type, and leaves out every field
//! the shapes leave out. Every argument met on the way becomes an operation
//! variable.

use crate::error::Result;
use crate::example::ExampleValueSynthesizer;
use crate::index::SchemaIndex;
use crate::types::{FieldDefinition, InputValueDefinition, TypeRef};
use crate::variables::{VariableDeclaration, VariableTable};
use crate::walker::{CycleGuardedWalker, PrunedFields, SurvivorTable, WalkObserver};
use rand::Rng;
use std::fmt;

const TYPENAME: &str = "__typename";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
}

impl OperationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: String,
    /// (argument name, variable name) pairs.
    pub arguments: Vec<(String, String)>,
    pub selections: Vec<Selection>,
}

impl FieldSelection {
    fn leaf(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments: Vec::new(),
            selections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(FieldSelection),
    InlineFragment {
        type_condition: String,
        selections: Vec<Selection>,
    },
}

/// Synthesized operation for one root field.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDocument {
    pub operation_type: OperationType,
    pub operation_name: String,
    pub return_type: TypeRef,
    pub variables: Vec<VariableDeclaration>,
    pub root: FieldSelection,
    /// Members of a union return type that have fields, empty otherwise.
    pub union_members: Vec<String>,
}

impl QueryDocument {
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.root.name
    }

    #[must_use]
    pub fn is_union(&self) -> bool {
        !self.union_members.is_empty()
    }

    #[must_use]
    pub fn is_list(&self) -> bool {
        self.return_type.is_list()
    }
}

impl fmt::Display for QueryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operation_type, self.operation_name)?;
        if !self.variables.is_empty() {
            f.write_str("(")?;
            for (i, variable) in self.variables.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "${}: {}", variable.name, variable.ty)?;
            }
            f.write_str(")")?;
        }
        f.write_str(" {\n")?;
        write_field(f, &self.root, 1)?;
        f.write_str("}")
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, field: &FieldSelection, depth: usize) -> fmt::Result {
    write!(f, "{}{}", "  ".repeat(depth), field.name)?;
    if !field.arguments.is_empty() {
        f.write_str("(")?;
        for (i, (argument, variable)) in field.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{argument}: ${variable}")?;
        }
        f.write_str(")")?;
    }
    if field.selections.is_empty() {
        return writeln!(f);
    }
    f.write_str(" {\n")?;
    write_selections(f, &field.selections, depth + 1)?;
    writeln!(f, "{}}}", "  ".repeat(depth))
}

fn write_selections(f: &mut fmt::Formatter<'_>, selections: &[Selection], depth: usize) -> fmt::Result {
    for selection in selections {
        match selection {
            Selection::Field(field) => write_field(f, field, depth)?,
            Selection::InlineFragment {
                type_condition,
                selections,
            } => {
                writeln!(f, "{}... on {type_condition} {{", "  ".repeat(depth))?;
                write_selections(f, selections, depth + 1)?;
                writeln!(f, "{}}}", "  ".repeat(depth))?;
            }
        }
    }
    Ok(())
}

/// `user` -> `UserTest`.
#[must_use]
pub fn operation_name(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => format!("{}{}Test", first.to_uppercase(), chars.as_str()),
        None => "Test".to_string(),
    }
}

#[derive(Debug, Default)]
struct TraversalStats {
    kept: usize,
    pruned: usize,
}

impl<'a> WalkObserver<'a> for TraversalStats {
    fn field_kept(&mut self, _owner: &'a str, _field: &'a FieldDefinition) {
        self.kept += 1;
    }

    fn cycle_detected(&mut self, _owner: &'a str, _field: &'a FieldDefinition) {
        self.pruned += 1;
    }
}

/// Builds one [`QueryDocument`] per root field.
pub struct QuerySynthesizer<'a, R> {
    index: &'a SchemaIndex,
    pruned: &'a PrunedFields<'a>,
    examples: ExampleValueSynthesizer<'a, R>,
}

impl<'a, R: Rng> QuerySynthesizer<'a, R> {
    pub fn new(
        index: &'a SchemaIndex,
        pruned: &'a PrunedFields<'a>,
        examples: ExampleValueSynthesizer<'a, R>,
    ) -> Self {
        Self {
            index,
            pruned,
            examples,
        }
    }

    /// Each call owns its traversal and its variable table.
    #[tracing::instrument(skip(self, field), fields(field = %field.name))]
    pub fn synthesize(
        &mut self,
        operation_type: OperationType,
        field: &'a FieldDefinition,
    ) -> Result<QueryDocument> {
        let index = self.index;
        let target = field.ty.leaf_name();
        let mut variables = VariableTable::new();
        let mut stats = TraversalStats::default();

        let arguments = self.bind_arguments(&field.arguments, &mut variables)?;

        let mut union_members = Vec::new();
        let selections = if let Some(members) = index.union_members(target) {
            let mut fragments = Vec::with_capacity(members.len());
            for member in members.iter().filter(|m| index.has_fields(m)) {
                let table = CycleGuardedWalker::new(index).walk(&[member.as_str()], &mut stats);
                fragments.push(Selection::InlineFragment {
                    type_condition: member.clone(),
                    selections: self.selections_of(member, &table, &mut variables)?,
                });
                union_members.push(member.clone());
            }
            with_typename(fragments)
        } else if index.has_fields(target) {
            let table = CycleGuardedWalker::new(index).walk(&[target], &mut stats);
            self.selections_of(target, &table, &mut variables)?
        } else {
            Vec::new()
        };

        tracing::debug!(
            kept = stats.kept,
            pruned = stats.pruned,
            variables = variables.declarations().len(),
            "Synthesized query document"
        );

        Ok(QueryDocument {
            operation_type,
            operation_name: operation_name(&field.name),
            return_type: field.ty.clone(),
            variables: variables.into_declarations(),
            root: FieldSelection {
                name: field.name.clone(),
                arguments,
                selections,
            },
            union_members,
        })
    }

    fn bind_arguments(
        &mut self,
        arguments: &'a [InputValueDefinition],
        variables: &mut VariableTable,
    ) -> Result<Vec<(String, String)>> {
        let mut bound = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let example = self.examples.value_for(&argument.ty)?;
            let variable = variables.register(&argument.name, &argument.ty, example);
            bound.push((argument.name.clone(), variable));
        }
        Ok(bound)
    }

    /// Render the surviving fields of `owner`. Kept edges form an acyclic
    /// graph, so the recursion is finite.
    fn selections_of(
        &mut self,
        owner: &str,
        table: &SurvivorTable<'a>,
        variables: &mut VariableTable,
    ) -> Result<Vec<Selection>> {
        let Some(survivors) = table.get(owner) else {
            return Ok(with_typename(Vec::new()));
        };

        let mut selections = Vec::with_capacity(survivors.len());
        for survivor in survivors {
            let field = survivor.field;
            if self.pruned.contains(owner, &field.name) {
                continue;
            }
            let arguments = self.bind_arguments(&field.arguments, variables)?;
            let target = field.ty.leaf_name();

            let nested = if self.index.union_members(target).is_some() {
                let mut fragments = Vec::with_capacity(survivor.members.len());
                for &member in &survivor.members {
                    fragments.push(Selection::InlineFragment {
                        type_condition: member.to_string(),
                        selections: self.selections_of(member, table, variables)?,
                    });
                }
                with_typename(fragments)
            } else if self.index.has_fields(target) {
                self.selections_of(target, table, variables)?
            } else {
                Vec::new()
            };

            selections.push(Selection::Field(FieldSelection {
                name: field.name.clone(),
                arguments,
                selections: nested,
            }));
        }
        Ok(with_typename(selections))
    }
}

/// A composite selection emptied by pruning still needs one field.
fn with_typename(mut selections: Vec<Selection>) -> Vec<Selection> {
    if selections.is_empty() {
        selections.push(Selection::Field(FieldSelection::leaf(TYPENAME)));
    }
    selections
}
