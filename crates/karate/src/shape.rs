use crate::error::Result;
use crate::index::SchemaIndex;
use crate::resolve::{shape_variable_name, ResolvedExpr, TypeResolver};
use crate::types::HasFields;
use crate::walker::PrunedFields;

/// Structural assertion for one object or interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: String,
    pub fields: Vec<(String, ResolvedExpr)>,
}

impl Shape {
    #[must_use]
    pub fn variable_name(&self) -> String {
        shape_variable_name(&self.name)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ResolvedExpr> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, expr)| expr)
    }
}

/// Produces one [`Shape`] per non-root type with fields.
pub struct ShapeSynthesizer<'a> {
    index: &'a SchemaIndex,
    resolver: &'a TypeResolver<'a>,
    pruned: &'a PrunedFields<'a>,
}

impl<'a> ShapeSynthesizer<'a> {
    #[must_use]
    pub fn new(
        index: &'a SchemaIndex,
        resolver: &'a TypeResolver<'a>,
        pruned: &'a PrunedFields<'a>,
    ) -> Self {
        Self {
            index,
            resolver,
            pruned,
        }
    }

    /// One shape per type, in declaration order, without the pruned fields.
    #[tracing::instrument(skip(self))]
    pub fn synthesize(&self) -> Result<Vec<Shape>> {
        let shapes = self
            .index
            .types_with_fields()
            .map(|ty| self.shape_of(ty))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            shapes = shapes.len(),
            pruned_fields = self.pruned.len(),
            "Synthesized shapes"
        );
        Ok(shapes)
    }

    fn shape_of(&self, ty: &dyn HasFields) -> Result<Shape> {
        let fields = ty
            .fields()
            .iter()
            .filter(|field| !self.pruned.contains(ty.name(), &field.name))
            .map(|field| Ok((field.name.clone(), self.resolver.resolve(&field.ty)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Shape {
            name: ty.name().to_string(),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RootTypeNames;
    use crate::settings::CustomScalarMapping;
    use crate::types::{FieldDefinition, ObjectType, TypeDefinition, TypeRef};

    fn object(name: &str, fields: &[(&str, &str)]) -> TypeDefinition {
        TypeDefinition::Object(ObjectType {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(field, ty)| FieldDefinition::new(*field, TypeRef::named(*ty)))
                .collect(),
        })
    }

    fn synthesize(definitions: Vec<TypeDefinition>) -> Vec<Shape> {
        let index = SchemaIndex::new(definitions, &RootTypeNames::default());
        let mapping = CustomScalarMapping::default();
        let resolver = TypeResolver::new(&index, &mapping);
        let pruned = PrunedFields::collect(&index);
        ShapeSynthesizer::new(&index, &resolver, &pruned).synthesize().unwrap()
    }

    fn field_names(shape: &Shape) -> Vec<&str> {
        shape.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_self_reference_is_dropped() {
        let shapes = synthesize(vec![
            object("User", &[("id", "ID"), ("name", "String"), ("friend", "User")]),
            object("Query", &[("user", "User")]),
        ]);

        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].variable_name(), "userSchema");
        assert_eq!(field_names(&shapes[0]), vec!["id", "name"]);
    }

    #[test]
    fn test_acyclic_reference_is_kept() {
        let shapes = synthesize(vec![
            object("Todo", &[("id", "ID"), ("owner", "User")]),
            object("User", &[("id", "ID")]),
        ]);

        assert_eq!(
            shapes[0].field("owner"),
            Some(&ResolvedExpr::Nullable(Box::new(ResolvedExpr::ShapeRef(
                "User".to_string()
            ))))
        );
    }

    #[test]
    fn test_unrelated_types_keep_every_field() {
        let shapes = synthesize(vec![
            object("A", &[("b", "B")]),
            object("B", &[("a", "A")]),
            object("C", &[("a", "A"), ("count", "Int")]),
        ]);

        let c = shapes.iter().find(|s| s.name == "C").unwrap();
        assert_eq!(field_names(c), vec!["a", "count"]);
    }
}
