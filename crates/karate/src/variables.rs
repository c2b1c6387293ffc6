use crate::example::ExampleValue;
use crate::types::TypeRef;
use std::collections::HashSet;

/// One `$name: Type` entry of an operation header.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// Name assigned in this document, unique within it.
    pub name: String,
    /// Argument the variable is bound to.
    pub argument_name: String,
    pub ty: TypeRef,
    pub example: ExampleValue,
}

/// Assigns unique variable names within one query document.
///
/// Names collide case-insensitively; a taken name gets the first free numeric
/// suffix (`id`, `id1`, `id2`, ...).
#[derive(Debug, Default)]
pub struct VariableTable {
    taken: HashSet<String>,
    declarations: Vec<VariableDeclaration>,
}

impl VariableTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an argument and return the variable name assigned to it.
    pub fn register(&mut self, argument_name: &str, ty: &TypeRef, example: ExampleValue) -> String {
        let mut name = argument_name.to_string();
        let mut suffix = 0usize;
        while self.taken.contains(&name.to_ascii_lowercase()) {
            suffix += 1;
            name = format!("{argument_name}{suffix}");
        }

        self.taken.insert(name.to_ascii_lowercase());
        self.declarations.push(VariableDeclaration {
            name: name.clone(),
            argument_name: argument_name.to_string(),
            ty: ty.clone(),
            example,
        });
        name
    }

    #[must_use]
    pub fn declarations(&self) -> &[VariableDeclaration] {
        &self.declarations
    }

    #[must_use]
    pub fn into_declarations(self) -> Vec<VariableDeclaration> {
        self.declarations
    }
}
