use crate::index::RootTypeNames;
use crate::resolve::ScalarFamily;
use std::collections::HashMap;

/// Default value emitted after `* url` in the background block.
pub const DEFAULT_BASE_URL: &str = "baseUrl";

/// Custom scalar name to value family, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomScalarMapping {
    families: HashMap<String, ScalarFamily>,
}

impl CustomScalarMapping {
    pub fn insert(&mut self, scalar: &str, family: ScalarFamily) {
        self.families.insert(scalar.to_ascii_lowercase(), family);
    }

    #[must_use]
    pub fn get(&self, scalar: &str) -> Option<ScalarFamily> {
        self.families.get(&scalar.to_ascii_lowercase()).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.families.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, ScalarFamily)> for CustomScalarMapping {
    fn from_iter<I: IntoIterator<Item = (S, ScalarFamily)>>(iter: I) -> Self {
        let mut mapping = Self::default();
        for (scalar, family) in iter {
            mapping.insert(scalar.as_ref(), family);
        }
        mapping
    }
}

/// Case-insensitive allow-list. An empty filter allows every name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    names: Vec<String>,
}

impl NameFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().trim().to_ascii_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Plain values steering one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConversionSettings {
    pub roots: RootTypeNames,
    pub type_filter: NameFilter,
    pub query_operation_filter: NameFilter,
    pub mutation_operation_filter: NameFilter,
    pub custom_scalars: CustomScalarMapping,
    pub base_url: String,
    pub exclude_queries: bool,
    pub include_mutations: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            roots: RootTypeNames::default(),
            type_filter: NameFilter::default(),
            query_operation_filter: NameFilter::default(),
            mutation_operation_filter: NameFilter::default(),
            custom_scalars: CustomScalarMapping::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            exclude_queries: false,
            include_mutations: false,
        }
    }
}

impl ConversionSettings {
    #[must_use]
    pub fn with_query_name(mut self, name: impl Into<String>) -> Self {
        self.roots.query = name.into();
        self
    }

    #[must_use]
    pub fn with_mutation_name(mut self, name: impl Into<String>) -> Self {
        self.roots.mutation = name.into();
        self
    }

    #[must_use]
    pub fn with_type_filter(mut self, filter: NameFilter) -> Self {
        self.type_filter = filter;
        self
    }

    #[must_use]
    pub fn with_query_operation_filter(mut self, filter: NameFilter) -> Self {
        self.query_operation_filter = filter;
        self
    }

    #[must_use]
    pub fn with_mutation_operation_filter(mut self, filter: NameFilter) -> Self {
        self.mutation_operation_filter = filter;
        self
    }

    #[must_use]
    pub fn with_custom_scalars(mut self, mapping: CustomScalarMapping) -> Self {
        self.custom_scalars = mapping;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_exclude_queries(mut self, exclude: bool) -> Self {
        self.exclude_queries = exclude;
        self
    }

    #[must_use]
    pub const fn with_include_mutations(mut self, include: bool) -> Self {
        self.include_mutations = include;
        self
    }
}
