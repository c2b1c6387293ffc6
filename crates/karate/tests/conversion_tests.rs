//! End-to-end conversion tests: SDL in, shapes, query documents and feature text out.

use graphql_karate::{
    parse_schema, Conversion, ConversionError, ConversionSettings, Converter, CustomScalarMapping,
    NameFilter, ResolvedExpr, ResponseAssertion, ScalarFamily, Selection, Shape,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn convert_with(sdl: &str, settings: ConversionSettings, seed: u64) -> Conversion {
    let document = parse_schema(sdl).unwrap();
    Converter::new(settings)
        .conversion(&document, StdRng::seed_from_u64(seed))
        .unwrap()
}

fn convert(sdl: &str) -> Conversion {
    convert_with(sdl, ConversionSettings::default(), 42)
}

fn shape<'a>(conversion: &'a Conversion, name: &str) -> &'a Shape {
    conversion
        .shapes
        .iter()
        .find(|shape| shape.name == name)
        .unwrap_or_else(|| panic!("no shape for {name}"))
}

fn field_names(shape: &Shape) -> Vec<&str> {
    shape.fields.iter().map(|(name, _)| name.as_str()).collect()
}

/// Type name behind a shape reference, looking through every wrapper.
fn referenced_shape(expr: &ResolvedExpr) -> Option<&str> {
    match expr {
        ResolvedExpr::ShapeRef(name) => Some(name),
        ResolvedExpr::Repeated(inner) | ResolvedExpr::Required(inner) | ResolvedExpr::Nullable(inner) => {
            referenced_shape(inner)
        }
        ResolvedExpr::Scalar(_) | ResolvedExpr::Present => None,
    }
}

/// Every field selected under `owner` must be declared by the shape of `owner`.
fn assert_selections_match_shapes(conversion: &Conversion, owner: &str, selections: &[Selection]) {
    for selection in selections {
        match selection {
            Selection::Field(field) if field.name == "__typename" => {}
            Selection::Field(field) => {
                let expr = shape(conversion, owner)
                    .field(&field.name)
                    .unwrap_or_else(|| panic!("{owner}.{} is selected but not in the shape", field.name));
                if let Some(child) = referenced_shape(expr) {
                    assert_selections_match_shapes(conversion, child, &field.selections);
                }
            }
            Selection::InlineFragment {
                type_condition,
                selections,
            } => assert_selections_match_shapes(conversion, type_condition, selections),
        }
    }
}

fn fragment_count(selections: &[Selection]) -> usize {
    selections
        .iter()
        .filter(|s| matches!(s, Selection::InlineFragment { .. }))
        .count()
}

#[test]
fn test_self_referencing_type() {
    let conversion = convert(
        r"
        type User { id: ID! name: String! friend: User }
        type Query { user: User }
        ",
    );

    assert_eq!(conversion.shapes.len(), 1);
    assert_eq!(field_names(shape(&conversion, "User")), vec!["id", "name"]);

    let document = &conversion.scenarios[0].document;
    assert_eq!(
        document.to_string(),
        "query UserTest {\n  user {\n    id\n    name\n  }\n}"
    );
}

#[test]
fn test_list_of_input_argument_variable_type() {
    let conversion = convert(
        r"
        input Filter { tags: [String!] limit: Int }
        type Todo { id: ID! }
        type Query { todos(filters: [Filter!]!): [Todo!]! }
        ",
    );

    let document = &conversion.scenarios[0].document;
    assert_eq!(document.variables.len(), 1);
    assert_eq!(document.variables[0].ty.to_string(), "[Filter!]!");
    assert!(document
        .to_string()
        .starts_with("query TodosTest($filters: [Filter!]!) {\n  todos(filters: $filters) {"));

    let example = document.variables[0].example.to_string();
    assert!(example.starts_with(r#"[ { "tags": [ ""#), "{example}");
    assert!(example.contains(r#""limit": "#), "{example}");
}

#[test]
fn test_sibling_arguments_with_same_name() {
    let conversion = convert(
        r"
        type A { id: ID }
        type B { id: ID }
        type Holder { a(ids: [ID!]): A b(ids: [ID!]): B }
        type Query { holder: Holder }
        ",
    );

    let document = &conversion.scenarios[0].document;
    let names: Vec<_> = document.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["ids", "ids1"]);
    let text = document.to_string();
    assert!(text.contains("a(ids: $ids) {"), "{text}");
    assert!(text.contains("b(ids: $ids1) {"), "{text}");
}

#[test]
fn test_same_argument_at_two_depths() {
    let conversion = convert(
        r"
        type Comment { id: ID! body: String }
        type Post { id: ID! comment(id: ID!): Comment }
        type Query { post(id: ID!): Post }
        ",
    );

    let document = &conversion.scenarios[0].document;
    let bindings: Vec<_> = document
        .variables
        .iter()
        .map(|v| (v.name.as_str(), v.argument_name.as_str()))
        .collect();
    assert_eq!(bindings, vec![("id", "id"), ("id1", "id")]);

    let text = document.to_string();
    assert!(text.contains("  post(id: $id) {"), "{text}");
    assert!(text.contains("    comment(id: $id1) {"), "{text}");
}

#[test]
fn test_cycle_prunes_one_field_per_type_in_every_rotation() {
    let types = [
        "type T1 { name: String next: T2 }",
        "type T2 { count: Int next: T3 }",
        "type T3 { flag: Boolean next: T1 }",
    ];

    for rotation in 0..types.len() {
        let mut sdl = String::new();
        for offset in 0..types.len() {
            sdl.push_str(types[(rotation + offset) % types.len()]);
            sdl.push('\n');
        }
        let conversion = convert(&sdl);

        assert_eq!(field_names(shape(&conversion, "T1")), vec!["name"], "rotation {rotation}");
        assert_eq!(field_names(shape(&conversion, "T2")), vec!["count"], "rotation {rotation}");
        assert_eq!(field_names(shape(&conversion, "T3")), vec!["flag"], "rotation {rotation}");
    }
}

#[test]
fn test_shapes_referencing_cycle_members_keep_their_fields() {
    let conversion = convert(
        r"
        type A { b: B id: ID }
        type B { a: A id: ID }
        type Wrapper { a: A b: [B!] }
        ",
    );

    assert_eq!(field_names(shape(&conversion, "Wrapper")), vec!["a", "b"]);
    assert_eq!(
        shape(&conversion, "Wrapper").field("b").map(ToString::to_string),
        Some("##[] #bSchema".to_string())
    );
}

#[test]
fn test_queries_select_only_shape_fields() {
    let conversion = convert(
        r"
        type A { id: ID b: B }
        type B { id: ID a: A }
        type T1 { name: String next: T2 }
        type T2 { count: Int next: T3 }
        type T3 { flag: Boolean next: T1 }
        type Photo { url: String album: Album }
        type Album { title: String cover: Photo owner: A }
        union Media = Photo | Album
        type Holder { a: A t: T1 media: [Media] }
        type Query { a: A t2: T2 holder: Holder media: Media }
        ",
    );

    assert_eq!(field_names(shape(&conversion, "A")), vec!["id"]);
    let text = conversion.scenarios[0].document.to_string();
    assert_eq!(text, "query ATest {\n  a {\n    id\n  }\n}");
    assert_eq!(
        conversion.scenarios[0].assertion,
        ResponseAssertion::Matches(ResolvedExpr::Nullable(Box::new(ResolvedExpr::ShapeRef(
            "A".to_string()
        ))))
    );

    for scenario in &conversion.scenarios {
        let root = &scenario.document.root;
        match &scenario.assertion {
            ResponseAssertion::Matches(expr) => {
                let owner = referenced_shape(expr).expect("composite root field");
                assert_selections_match_shapes(&conversion, owner, &root.selections);
            }
            ResponseAssertion::OneOf { .. } => {
                assert_eq!(fragment_count(&root.selections), 2);
                assert_selections_match_shapes(&conversion, "Media", &root.selections);
            }
        }
    }
}

#[test]
fn test_filtered_shapes_are_not_referenced() {
    let conversion = convert_with(
        r"
        type User { id: ID! best: Post }
        type Post { id: ID! }
        type Photo { url: String }
        type Note { text: String }
        union Media = Photo | Note
        type Query { user: User post: Post media: Media }
        ",
        ConversionSettings::default().with_type_filter(NameFilter::new(["User", "Photo"])),
        3,
    );

    assert_eq!(
        shape(&conversion, "User").field("best").map(ToString::to_string),
        Some("##present".to_string())
    );
    let assertions: Vec<_> = conversion.scenarios.iter().map(|s| &s.assertion).collect();
    assert_eq!(
        assertions,
        vec![
            &ResponseAssertion::Matches(ResolvedExpr::Nullable(Box::new(ResolvedExpr::ShapeRef(
                "User".to_string()
            )))),
            &ResponseAssertion::Matches(ResolvedExpr::Nullable(Box::new(ResolvedExpr::Present))),
            &ResponseAssertion::Matches(ResolvedExpr::Nullable(Box::new(ResolvedExpr::Present))),
        ]
    );

    let feature = conversion.feature().to_string();
    assert!(!feature.contains("postSchema"), "{feature}");
    assert!(!feature.contains("noteSchema"), "{feature}");
    assert!(!feature.contains("isValid"), "{feature}");
}

#[test]
fn test_wrapper_fidelity_in_shapes() {
    let conversion = convert("type Matrix { cells: [[Int!]!] ids: [ID]! }");
    let matrix = shape(&conversion, "Matrix");

    assert_eq!(
        matrix.field("cells").map(ToString::to_string),
        Some("##[] #[] #number".to_string())
    );
    assert_eq!(
        matrix.field("ids").map(ToString::to_string),
        Some("#[] ##string".to_string())
    );
}

#[test]
fn test_output_is_deterministic_apart_from_examples() {
    let sdl = r"
        type User { id: ID! posts(first: Int): [Post] }
        type Post { id: ID! author: User tags(limit: Int, after: String): [String] }
        union Feed = User | Post
        type Query { user(id: ID!): User feed(kind: String): [Feed] }
    ";

    let first = convert_with(sdl, ConversionSettings::default(), 1);
    let second = convert_with(sdl, ConversionSettings::default(), 2);

    assert_eq!(first.shapes, second.shapes);
    let queries = |conversion: &Conversion| {
        conversion
            .scenarios
            .iter()
            .map(|s| s.document.to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(queries(&first), queries(&second));

    let again = convert_with(sdl, ConversionSettings::default(), 1);
    assert_eq!(first.feature().to_string(), again.feature().to_string());
}

#[test]
fn test_union_with_three_members() {
    let conversion = convert(
        r"
        type Photo { url: String album: Album }
        type Album { title: String cover: Photo }
        type Note { text: String }
        union Media = Photo | Album | Note
        type Query { media: [Media!]! }
        ",
    );

    let scenario = &conversion.scenarios[0];
    let root = &scenario.document.root;
    assert_eq!(fragment_count(&root.selections), 3);
    assert_eq!(
        scenario.assertion,
        ResponseAssertion::OneOf {
            members: vec!["Photo".to_string(), "Album".to_string(), "Note".to_string()],
            each: true,
        }
    );

    let text = scenario.document.to_string();
    assert!(text.contains("    ... on Photo {\n      url\n    }"), "{text}");
    assert!(text.contains("    ... on Album {\n      title\n    }"), "{text}");
    assert!(text.contains("    ... on Note {\n      text\n    }"), "{text}");
}

#[test]
fn test_nested_union_field_is_expanded() {
    let conversion = convert(
        r"
        type Image { src: String }
        type Video { length: Int }
        union Attachment = Image | Video
        type Message { body: String attachment: Attachment }
        type Query { message: Message }
        ",
    );

    let text = conversion.scenarios[0].document.to_string();
    assert_eq!(
        text,
        "query MessageTest {
  message {
    body
    attachment {
      ... on Image {
        src
      }
      ... on Video {
        length
      }
    }
  }
}"
    );
    assert_eq!(
        shape(&conversion, "Message").field("attachment"),
        Some(&ResolvedExpr::Nullable(Box::new(ResolvedExpr::Present)))
    );
}

#[test]
fn test_recursive_input_gets_placeholder() {
    let conversion = convert(
        r"
        input Criteria { name: String and: [Criteria!] }
        type Query { search(where: Criteria): [String] }
        ",
    );

    let example = conversion.scenarios[0].document.variables[0].example.to_string();
    assert!(example.contains(r#""and": [ <some Criteria value> ]"#), "{example}");
}

#[test]
fn test_interfaces_get_shapes() {
    let conversion = convert(
        r"
        interface Node { id: ID! }
        type User implements Node { id: ID! }
        type Query { node(id: ID!): Node }
        ",
    );

    let names: Vec<_> = conversion.shapes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["User", "Node"]);
    assert_eq!(
        conversion.scenarios[0].assertion,
        ResponseAssertion::Matches(ResolvedExpr::Nullable(Box::new(ResolvedExpr::ShapeRef(
            "Node".to_string()
        ))))
    );
}

#[test]
fn test_settings_filters_and_roots() {
    let sdl = r"
        type User { id: ID! }
        type Post { id: ID! }
        type RootQuery { user: User post: Post }
        type RootMutation { createUser(name: String!): User deletePost(id: ID!): Boolean }
    ";
    let settings = ConversionSettings::default()
        .with_query_name("rootquery")
        .with_mutation_name("ROOTMUTATION")
        .with_include_mutations(true)
        .with_type_filter(NameFilter::new(["user"]))
        .with_query_operation_filter(NameFilter::new(["POST"]))
        .with_mutation_operation_filter(NameFilter::new(["createUser"]));

    let conversion = convert_with(sdl, settings, 7);

    let shapes: Vec<_> = conversion.shapes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(shapes, vec!["User"]);
    let operations: Vec<_> = conversion
        .scenarios
        .iter()
        .map(|s| s.document.operation_name.as_str())
        .collect();
    assert_eq!(operations, vec!["PostTest", "CreateUserTest"]);
    assert_eq!(
        conversion.scenarios[0].assertion,
        ResponseAssertion::Matches(ResolvedExpr::Nullable(Box::new(ResolvedExpr::Present)))
    );
    assert_eq!(
        conversion.scenarios[1].assertion,
        ResponseAssertion::Matches(ResolvedExpr::Nullable(Box::new(ResolvedExpr::ShapeRef(
            "User".to_string()
        ))))
    );
    assert!(conversion.scenarios[1]
        .document
        .to_string()
        .starts_with("mutation CreateUserTest($name: String!) {"));
}

#[test]
fn test_exclude_queries_and_missing_roots() {
    let sdl = "type User { id: ID! } type Query { user: User }";
    let conversion = convert_with(
        sdl,
        ConversionSettings::default()
            .with_exclude_queries(true)
            .with_include_mutations(true),
        7,
    );
    assert_eq!(conversion.shapes.len(), 1);
    assert!(conversion.scenarios.is_empty());
}

#[test]
fn test_custom_scalar_mapping() {
    let mapping: CustomScalarMapping = [
        ("DateTime", ScalarFamily::String),
        ("Long", ScalarFamily::Number),
    ]
    .into_iter()
    .collect();
    let conversion = convert_with(
        r"
        scalar DateTime
        scalar Long
        scalar Json
        type Event { at: DateTime! size: Long meta: Json }
        type Query { events(since: DateTime, raw: Json): [Event] }
        ",
        ConversionSettings::default().with_custom_scalars(mapping),
        7,
    );

    let event = shape(&conversion, "Event");
    assert_eq!(event.field("at").map(ToString::to_string), Some("#string".to_string()));
    assert_eq!(event.field("size").map(ToString::to_string), Some("##number".to_string()));
    assert_eq!(event.field("meta").map(ToString::to_string), Some("##present".to_string()));

    let variables = &conversion.scenarios[0].document.variables;
    assert!(variables[0].example.to_string().starts_with('"'));
    assert_eq!(variables[1].example.to_string(), "<some Json value>");
}

#[test]
fn test_unknown_type_fails_the_whole_conversion() {
    let document = parse_schema("type User { id: ID! home: Address } type Query { user: User }").unwrap();
    let err = Converter::default()
        .conversion(&document, StdRng::seed_from_u64(1))
        .unwrap_err();
    assert_eq!(
        err,
        ConversionError::UnknownNamedType {
            name: "Address".to_string()
        }
    );
}

#[test]
fn test_enum_argument_without_values_fails() {
    let document = parse_schema(
        r"
        enum Status
        type Query { items(status: Status): [String] }
        ",
    )
    .unwrap();
    let err = Converter::default()
        .conversion(&document, StdRng::seed_from_u64(1))
        .unwrap_err();
    assert!(matches!(err, ConversionError::MissingEnumValues { name } if name == "Status"));
}

#[test]
fn test_invalid_sdl_is_a_parse_error() {
    let err = Converter::default().convert_source("type User {").unwrap_err();
    assert!(matches!(err, ConversionError::Parse(_)));
}

#[test]
fn test_full_feature_file() {
    let conversion = convert_with(
        r"
        enum Status { OPEN DONE }
        type Todo { id: ID! title: String! status: Status parent: Todo }
        type Query { todos: [Todo!]! }
        ",
        ConversionSettings::default().with_base_url("http://localhost:4000"),
        5,
    );

    insta::assert_snapshot!(conversion.feature().to_string(), @r###"
    Feature: Test GraphQL Endpoint with Karate

    Background: Base URL and Schemas
      * url http://localhost:4000

      * def todoSchema =
        """
          {
            id: '#string',
            title: '#string',
            status: '##string'
          }
        """

    Scenario: Perform a todos query and validate the response
      * text query =
        """
          query TodosTest {
            todos {
              id
              title
              status
            }
          }
        """

      Given path "/graphql"
      And request { query: '#(query)', operationName: "TodosTest" }
      When method post
      Then status 200
      And match response.data.todos == "#[] #todoSchema"
    "###);
}
