//! Cycle-guarded descent over the field graph of a schema.
//!
//! The walker is shared by shape pruning and query synthesis. Each traversal
//! owns a fresh [`ReferenceGraph`] and records its decisions in a
//! [`SurvivorTable`] instead of touching the schema.

use crate::graph::ReferenceGraph;
use crate::index::SchemaIndex;
use crate::types::FieldDefinition;
use std::collections::{HashMap, HashSet};

/// Callbacks invoked while a traversal decides which fields to keep.
pub trait WalkObserver<'a> {
    fn field_kept(&mut self, _owner: &'a str, _field: &'a FieldDefinition) {}

    fn cycle_detected(&mut self, _owner: &'a str, _field: &'a FieldDefinition) {}
}

impl WalkObserver<'_> for () {}

/// A field that survived pruning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survivor<'a> {
    pub field: &'a FieldDefinition,
    /// Union members kept for a union-typed field, in declaration order.
    pub members: Vec<&'a str>,
}

/// Surviving fields per visited type for one traversal.
#[derive(Debug, Default)]
pub struct SurvivorTable<'a> {
    survivors: HashMap<&'a str, Vec<Survivor<'a>>>,
}

impl<'a> SurvivorTable<'a> {
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&[Survivor<'a>]> {
        self.survivors.get(type_name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.survivors.contains_key(type_name)
    }

    #[must_use]
    pub fn survives(&self, type_name: &str, field_name: &str) -> bool {
        self.get(type_name)
            .is_some_and(|fields| fields.iter().any(|s| s.field.name == field_name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }
}

/// Fields that close a cycle in at least one per-type traversal, keyed by
/// (owner, field). Shapes and query selections both leave these out, so a
/// query never selects a field its shape does not declare.
#[derive(Debug, Default)]
pub struct PrunedFields<'a> {
    pruned: HashSet<(&'a str, &'a str)>,
}

impl<'a> PrunedFields<'a> {
    /// Walk once from every non-root type with fields.
    #[must_use]
    pub fn collect(index: &'a SchemaIndex) -> Self {
        let mut pruned = Self::default();
        let mut traversals = 0usize;
        for ty in index.types_with_fields() {
            CycleGuardedWalker::new(index).walk(&[ty.name()], &mut pruned);
            traversals += 1;
        }
        tracing::debug!(traversals, pruned_fields = pruned.len(), "Collected pruned fields");
        pruned
    }

    #[must_use]
    pub fn contains(&self, owner: &str, field: &str) -> bool {
        self.pruned.contains(&(owner, field))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pruned.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pruned.is_empty()
    }
}

impl<'a> WalkObserver<'a> for PrunedFields<'a> {
    fn cycle_detected(&mut self, owner: &'a str, field: &'a FieldDefinition) {
        self.pruned.insert((owner, field.name.as_str()));
    }
}

/// One traversal over the types reachable from a set of roots.
pub struct CycleGuardedWalker<'a> {
    index: &'a SchemaIndex,
    graph: ReferenceGraph<'a>,
    visited: HashSet<&'a str>,
    table: SurvivorTable<'a>,
}

impl<'a> CycleGuardedWalker<'a> {
    #[must_use]
    pub fn new(index: &'a SchemaIndex) -> Self {
        Self {
            index,
            graph: ReferenceGraph::new(),
            visited: HashSet::new(),
            table: SurvivorTable::default(),
        }
    }

    /// Walk from every root in order, sharing one graph between them.
    pub fn walk<O>(mut self, roots: &[&'a str], observer: &mut O) -> SurvivorTable<'a>
    where
        O: WalkObserver<'a>,
    {
        for &root in roots {
            self.graph.add_vertex(root);
            self.descend(root, observer);
        }

        tracing::trace!(
            roots = ?roots,
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            types = self.table.len(),
            "Traversal finished"
        );
        self.table
    }

    fn descend<O>(&mut self, owner: &'a str, observer: &mut O)
    where
        O: WalkObserver<'a>,
    {
        let index = self.index;
        let Some(owner_type) = index.fields_of(owner) else {
            return;
        };
        if !self.visited.insert(owner) {
            return;
        }

        let mut survivors = Vec::with_capacity(owner_type.fields().len());
        for field in owner_type.fields() {
            let target = field.ty.leaf_name();

            if let Some(members) = index.union_members(target) {
                let mut composite_members = 0usize;
                let mut kept = Vec::new();
                for member in members {
                    if !index.has_fields(member) {
                        continue;
                    }
                    composite_members += 1;
                    if self.graph.try_add_edge(owner, member) {
                        kept.push(member.as_str());
                        self.descend(member, observer);
                    }
                }

                if composite_members > 0 && kept.is_empty() {
                    tracing::trace!(owner, field = %field.name, "Pruned union field closing a cycle");
                    observer.cycle_detected(owner, field);
                } else {
                    observer.field_kept(owner, field);
                    survivors.push(Survivor {
                        field,
                        members: kept,
                    });
                }
            } else if index.has_fields(target) {
                if self.graph.try_add_edge(owner, target) {
                    observer.field_kept(owner, field);
                    survivors.push(Survivor {
                        field,
                        members: Vec::new(),
                    });
                    self.descend(target, observer);
                } else {
                    tracing::trace!(owner, field = %field.name, target, "Pruned field closing a cycle");
                    observer.cycle_detected(owner, field);
                }
            } else {
                observer.field_kept(owner, field);
                survivors.push(Survivor {
                    field,
                    members: Vec::new(),
                });
            }
        }

        self.table.survivors.insert(owner, survivors);
    }
}
