//! Karate feature file assembly.

use crate::query::QueryDocument;
use crate::resolve::{shape_variable_name, ResolvedExpr};
use crate::shape::Shape;
use std::fmt;

const FEATURE_TITLE: &str = "Feature: Test GraphQL Endpoint with Karate";
const BACKGROUND_TITLE: &str = "Background: Base URL and Schemas";
const TRIPLE_QUOTE: &str = r#"""""#;

/// How the response data of a scenario is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAssertion {
    /// `match response.data.<field> == "<expr>"`.
    Matches(ResolvedExpr),
    /// The value must match one of the member shapes.
    OneOf { members: Vec<String>, each: bool },
}

/// One operation scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub document: QueryDocument,
    pub assertion: ResponseAssertion,
}

/// The complete feature file text.
#[derive(Debug, Clone, Copy)]
pub struct Feature<'a> {
    pub base_url: &'a str,
    pub shapes: &'a [Shape],
    pub scenarios: &'a [Scenario],
}

impl fmt::Display for Feature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{FEATURE_TITLE}")?;
        writeln!(f)?;
        writeln!(f, "{BACKGROUND_TITLE}")?;
        writeln!(f, "  * url {}", self.base_url)?;

        for shape in self.shapes {
            writeln!(f)?;
            write_shape(f, shape)?;
        }
        for scenario in self.scenarios {
            writeln!(f)?;
            write_scenario(f, scenario)?;
        }
        Ok(())
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth)
}

fn write_shape(f: &mut fmt::Formatter<'_>, shape: &Shape) -> fmt::Result {
    writeln!(f, "  * def {} =", shape.variable_name())?;
    writeln!(f, "    {TRIPLE_QUOTE}")?;
    if shape.fields.is_empty() {
        writeln!(f, "      {{}}")?;
    } else {
        writeln!(f, "      {{")?;
        let last = shape.fields.len() - 1;
        for (i, (name, expr)) in shape.fields.iter().enumerate() {
            let separator = if i == last { "" } else { "," };
            writeln!(f, "        {name}: '{expr}'{separator}")?;
        }
        writeln!(f, "      }}")?;
    }
    writeln!(f, "    {TRIPLE_QUOTE}")
}

fn write_scenario(f: &mut fmt::Formatter<'_>, scenario: &Scenario) -> fmt::Result {
    let document = &scenario.document;
    writeln!(
        f,
        "Scenario: Perform a {} {} and validate the response",
        document.field_name(),
        document.operation_type
    )?;

    writeln!(f, "  * text query =")?;
    writeln!(f, "    {TRIPLE_QUOTE}")?;
    for line in document.to_string().lines() {
        writeln!(f, "{}{line}", indent(6))?;
    }
    writeln!(f, "    {TRIPLE_QUOTE}")?;

    if !document.variables.is_empty() {
        writeln!(f)?;
        writeln!(f, "  * def variables =")?;
        writeln!(f, "    {TRIPLE_QUOTE}")?;
        writeln!(f, "      {{")?;
        let last = document.variables.len() - 1;
        for (i, variable) in document.variables.iter().enumerate() {
            let separator = if i == last { "" } else { "," };
            writeln!(f, "        {}: {}{separator}", variable.name, variable.example)?;
        }
        writeln!(f, "      }}")?;
        writeln!(f, "    {TRIPLE_QUOTE}")?;
    }

    if let ResponseAssertion::OneOf { members, .. } = &scenario.assertion {
        writeln!(f)?;
        writeln!(f, "  * def isValid =")?;
        writeln!(f, "    {TRIPLE_QUOTE}")?;
        writeln!(f, "    response =>")?;
        let last = members.len().saturating_sub(1);
        for (i, member) in members.iter().enumerate() {
            let separator = if i == last { "" } else { " ||" };
            writeln!(
                f,
                "      karate.match(response, {}).pass{separator}",
                shape_variable_name(member)
            )?;
        }
        writeln!(f, "    {TRIPLE_QUOTE}")?;
    }

    writeln!(f)?;
    writeln!(f, "  Given path \"/graphql\"")?;
    write!(
        f,
        "  And request {{ query: '#(query)', operationName: \"{}\"",
        document.operation_name
    )?;
    if !document.variables.is_empty() {
        write!(f, ", variables: '#(variables)'")?;
    }
    writeln!(f, " }}")?;
    writeln!(f, "  When method post")?;
    writeln!(f, "  Then status 200")?;

    match &scenario.assertion {
        ResponseAssertion::OneOf { each, .. } => writeln!(
            f,
            "  And match {}response.data.{} == \"#? isValid(_)\"",
            if *each { "each " } else { "" },
            document.field_name()
        ),
        ResponseAssertion::Matches(expr) => writeln!(
            f,
            "  And match response.data.{} == \"{expr}\"",
            document.field_name()
        ),
    }
}
