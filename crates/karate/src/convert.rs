use crate::emit::{Feature, ResponseAssertion, Scenario};
use crate::error::{ConversionError, Result};
use crate::example::ExampleValueSynthesizer;
use crate::index::SchemaIndex;
use crate::query::{OperationType, QuerySynthesizer};
use crate::resolve::{ResolvedExpr, TypeResolver};
use crate::settings::{ConversionSettings, NameFilter};
use crate::shape::{Shape, ShapeSynthesizer};
use crate::types::{FieldDefinition, ObjectType};
use crate::walker::PrunedFields;
use apollo_compiler::ast;
use rand::Rng;
use std::collections::HashSet;

/// Everything a conversion produced, before it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub base_url: String,
    pub shapes: Vec<Shape>,
    pub scenarios: Vec<Scenario>,
}

impl Conversion {
    #[must_use]
    pub fn feature(&self) -> Feature<'_> {
        Feature {
            base_url: &self.base_url,
            shapes: &self.shapes,
            scenarios: &self.scenarios,
        }
    }
}

/// Converts a GraphQL schema into a Karate feature file.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    settings: ConversionSettings,
}

impl Converter {
    #[must_use]
    pub fn new(settings: ConversionSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Parse SDL text and convert it.
    pub fn convert_source(&self, source: &str) -> Result<String> {
        let document = parse_schema(source)?;
        self.convert(&document)
    }

    pub fn convert(&self, document: &ast::Document) -> Result<String> {
        self.convert_with_rng(document, rand::thread_rng())
    }

    /// Convert with a caller-supplied random source for example values.
    pub fn convert_with_rng<R: Rng>(&self, document: &ast::Document, rng: R) -> Result<String> {
        Ok(self.conversion(document, rng)?.feature().to_string())
    }

    /// Run every synthesis step. Nothing is returned unless all of them succeed.
    #[tracing::instrument(skip_all, fields(definitions = document.definitions.len()))]
    pub fn conversion<R: Rng>(&self, document: &ast::Document, rng: R) -> Result<Conversion> {
        let settings = &self.settings;
        let index = SchemaIndex::from_document(document, &settings.roots);
        let resolver = TypeResolver::new(&index, &settings.custom_scalars);

        let pruned = PrunedFields::collect(&index);

        let mut shapes = ShapeSynthesizer::new(&index, &resolver, &pruned)
            .synthesize()?
            .into_iter()
            .filter(|shape| settings.type_filter.allows(&shape.name))
            .collect::<Vec<_>>();
        let emitted: HashSet<String> = shapes.iter().map(|shape| shape.name.clone()).collect();
        let is_emitted = |name: &str| emitted.contains(name);
        for shape in &mut shapes {
            for (_, expr) in &mut shape.fields {
                let resolved = std::mem::replace(expr, ResolvedExpr::Present);
                *expr = resolved.with_emitted_shapes(&is_emitted);
            }
        }

        let mut operations = Vec::new();
        if !settings.exclude_queries {
            collect_operations(
                index.query_type(),
                &settings.roots.query,
                OperationType::Query,
                &settings.query_operation_filter,
                &mut operations,
            );
        }
        if settings.include_mutations {
            collect_operations(
                index.mutation_type(),
                &settings.roots.mutation,
                OperationType::Mutation,
                &settings.mutation_operation_filter,
                &mut operations,
            );
        }

        let examples = ExampleValueSynthesizer::new(&index, &settings.custom_scalars, rng);
        let mut queries = QuerySynthesizer::new(&index, &pruned, examples);
        let mut scenarios = Vec::with_capacity(operations.len());
        for (operation_type, field) in operations {
            let document = queries.synthesize(operation_type, field)?;
            let members_emitted = document.union_members.iter().all(|m| emitted.contains(m));
            let assertion = if document.is_union() && members_emitted {
                ResponseAssertion::OneOf {
                    members: document.union_members.clone(),
                    each: document.is_list(),
                }
            } else {
                ResponseAssertion::Matches(
                    resolver.resolve(&field.ty)?.with_emitted_shapes(&is_emitted),
                )
            };
            scenarios.push(Scenario {
                document,
                assertion,
            });
        }

        tracing::info!(
            shapes = shapes.len(),
            scenarios = scenarios.len(),
            "Conversion finished"
        );

        Ok(Conversion {
            base_url: settings.base_url.clone(),
            shapes,
            scenarios,
        })
    }
}

/// Parse SDL text into an AST document.
pub fn parse_schema(source: &str) -> Result<ast::Document> {
    ast::Document::parse(source, "schema.graphql")
        .map_err(|with_errors| ConversionError::Parse(with_errors.errors.to_string()))
}

fn collect_operations<'a>(
    root: Option<&'a ObjectType>,
    root_name: &str,
    operation_type: OperationType,
    filter: &NameFilter,
    operations: &mut Vec<(OperationType, &'a FieldDefinition)>,
) {
    let Some(root) = root else {
        tracing::warn!(
            root = root_name,
            operation = %operation_type,
            "No root type found, skipping operations"
        );
        return;
    };

    operations.extend(
        root.fields
            .iter()
            .filter(|field| filter.allows(&field.name))
            .map(|field| (operation_type, field)),
    );
}
