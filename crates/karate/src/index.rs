use crate::lower::lower_document;
use crate::types::{HasFields, InputObjectType, ObjectType, TypeDefinition, TypeKind};
use apollo_compiler::ast;
use std::collections::HashMap;

/// Configured names of the root operation types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootTypeNames {
    pub query: String,
    pub mutation: String,
}

impl Default for RootTypeNames {
    fn default() -> Self {
        Self {
            query: "Query".to_string(),
            mutation: "Mutation".to_string(),
        }
    }
}

/// Name lookup over every declaration of one schema.
///
/// Built once per conversion and read-only afterwards. Lookups of unknown
/// names answer `None`, never an error.
#[derive(Debug)]
pub struct SchemaIndex {
    definitions: Vec<TypeDefinition>,
    by_name: HashMap<String, usize>,
    query_root: Option<usize>,
    mutation_root: Option<usize>,
}

impl SchemaIndex {
    pub fn new(definitions: Vec<TypeDefinition>, roots: &RootTypeNames) -> Self {
        let mut by_name = HashMap::with_capacity(definitions.len());
        for (idx, definition) in definitions.iter().enumerate() {
            by_name.entry(definition.name().to_string()).or_insert(idx);
        }

        let find_root = |name: &str| {
            definitions.iter().position(|definition| {
                definition.kind() == TypeKind::Object
                    && definition.name().eq_ignore_ascii_case(name)
            })
        };
        let query_root = find_root(&roots.query);
        let mutation_root = find_root(&roots.mutation);

        tracing::debug!(
            types = definitions.len(),
            has_query = query_root.is_some(),
            has_mutation = mutation_root.is_some(),
            "Built schema index"
        );

        Self {
            definitions,
            by_name,
            query_root,
            mutation_root,
        }
    }

    pub fn from_document(document: &ast::Document, roots: &RootTypeNames) -> Self {
        Self::new(lower_document(document), roots)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.by_name.get(name).map(|&idx| &self.definitions[idx])
    }

    /// Field list of an object or interface type.
    #[must_use]
    pub fn fields_of(&self, name: &str) -> Option<&dyn HasFields> {
        self.get(name).and_then(TypeDefinition::as_has_fields)
    }

    #[must_use]
    pub fn has_fields(&self, name: &str) -> bool {
        self.fields_of(name).is_some()
    }

    #[must_use]
    pub fn union_members(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            TypeDefinition::Union { members, .. } => Some(members),
            _ => None,
        }
    }

    #[must_use]
    pub fn input_object(&self, name: &str) -> Option<&InputObjectType> {
        match self.get(name)? {
            TypeDefinition::InputObject(input) => Some(input),
            _ => None,
        }
    }

    #[must_use]
    pub fn query_type(&self) -> Option<&ObjectType> {
        self.root_object(self.query_root)
    }

    #[must_use]
    pub fn mutation_type(&self) -> Option<&ObjectType> {
        self.root_object(self.mutation_root)
    }

    fn root_object(&self, idx: Option<usize>) -> Option<&ObjectType> {
        match &self.definitions[idx?] {
            TypeDefinition::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_root(&self, name: &str) -> bool {
        self.by_name
            .get(name)
            .is_some_and(|&idx| Some(idx) == self.query_root || Some(idx) == self.mutation_root)
    }

    /// Object types followed by interface types, each in declaration order,
    /// with the root operation types left out.
    pub fn types_with_fields(&self) -> impl Iterator<Item = &dyn HasFields> + '_ {
        let objects = self
            .definitions
            .iter()
            .filter(|def| def.kind() == TypeKind::Object);
        let interfaces = self
            .definitions
            .iter()
            .filter(|def| def.kind() == TypeKind::Interface);

        objects
            .chain(interfaces)
            .filter(|def| !self.is_root(def.name()))
            .filter_map(TypeDefinition::as_has_fields)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter()
    }
}
