//! Integration tests for schema compilation

use datagen_compiler::{Ast, AstNode, CollectingReporter, CompileError, NodeKind, SchemaCompiler};
use datagen_core::{CompilerConfig, DiagnosticCode, PropertyKind, Type, TypeKind, TypeRegistry, UserDataType};
use pretty_assertions::assert_eq;
use std::path::Path;

fn quiet() -> CompilerConfig {
    CompilerConfig::default().with_quiet(true)
}

fn compile(nodes: Vec<AstNode>) -> TypeRegistry {
    SchemaCompiler::new(quiet())
        .compile(&Ast::new(nodes))
        .unwrap()
        .registry
}

fn record<'a>(registry: &'a TypeRegistry, name: &str) -> &'a UserDataType {
    registry.data(registry.lookup_exact(name).unwrap()).unwrap()
}

#[test]
fn compile_orders_fixture() {
    let ast = Ast::from_file(Path::new("tests/fixtures/orders.json")).unwrap();
    let compilation = SchemaCompiler::new(quiet()).compile(&ast).unwrap();
    let registry = &compilation.registry;

    let names: Vec<&str> = registry.user_types().map(|(_, d)| d.name()).collect();
    assert_eq!(names, vec!["Order", "Order.Item", "Order.Status", "Address"]);
    assert!(!compilation.report.has_errors());
    assert!(compilation.report.succeeded());

    let order = record(registry, "Order");
    assert_eq!(order.comment.as_deref(), Some("A customer order"));
    assert_eq!(order.identity_property().map(|p| p.name.as_str()), Some("id"));

    let property_names: Vec<&str> = order.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(property_names, vec!["id", "status", "items", "shipping_address", "tags"]);

    let status = order.property("status").unwrap();
    assert_eq!(status.kind, PropertyKind::UserEnum { enum_type: "Order.Status".to_string() });

    let item = registry.lookup_exact("Order.Item").unwrap();
    assert_eq!(order.property("items").unwrap().ty, Type::list(Type::UserData(item)));
    assert_eq!(order.property("items").unwrap().kind, PropertyKind::List);

    let address = order.property("shipping_address").unwrap();
    assert_eq!(address.ty, Type::UserData(registry.lookup_exact("Address").unwrap()));
    assert_eq!(address.comment.as_deref(), Some("where it goes"));

    let tags = order.property("tags").unwrap();
    assert_eq!(registry.describe(&tags.ty), "map<string, set<string>>");

    let item = record(registry, "Order.Item");
    assert_eq!(item.property("thumbnail").unwrap().ty, Type::Blob);
    assert_eq!(item.property("thumbnail").unwrap().kind, PropertyKind::Blob);
    assert!(item.identity_property().is_none());

    let status = registry.enumeration(registry.lookup_exact("Order.Status").unwrap()).unwrap();
    assert_eq!(status.values, vec!["OPEN", "PAID", "SHIPPED"]);
}

#[test]
fn every_declaration_registered_once_under_qualified_name() {
    let registry = compile(vec![
        AstNode::record("A", vec![
            AstNode::record("B", vec![AstNode::record("C", vec![]), AstNode::enumeration("E", &["X"])]),
        ]),
        AstNode::record("D", vec![AstNode::record("B", vec![])]),
        AstNode::eof(),
    ]);

    let names: Vec<&str> = registry.user_types().map(|(_, d)| d.name()).collect();
    assert_eq!(names, vec!["A", "A.B", "A.B.C", "A.B.E", "D", "D.B"]);
    assert!(names.iter().all(|n| !n.starts_with('.')));
}

#[test]
fn nested_container_expression() {
    let registry = compile(vec![AstNode::record("Holder", vec![
        AstNode::property("grid", "map<list<set<int>>, string>", vec![]),
    ])]);

    let grid = record(&registry, "Holder").property("grid").unwrap();
    assert_eq!(
        grid.ty,
        Type::map(Type::list(Type::set(Type::primitive("int"))), Type::primitive("string"))
    );
    assert_eq!(grid.kind, PropertyKind::Map);
}

#[test]
fn unknown_type_aborts_compile() {
    let failure = SchemaCompiler::new(quiet())
        .compile(&Ast::new(vec![AstNode::record("Order", vec![
            AstNode::property("id", "long", vec![]),
            AstNode::property("customer", "Customer", vec![]),
        ])]))
        .unwrap_err();

    assert_eq!(
        failure.error,
        CompileError::TypeNotFound {
            name: "Customer".to_string(),
            scope: Some("Order".to_string()),
        }
        .in_property("Order", "customer")
    );

    let last = failure.report.diagnostics.last().unwrap();
    assert_eq!(last.code, DiagnosticCode::TypeNotFound);
    assert!(last.message.contains("Order.customer"));
}

#[test]
fn malformed_type_expression_aborts_compile() {
    let truncated = AstNode::new(NodeKind::Property, "property").with_children(vec![
        AstNode::token("lookup"),
        AstNode::new(NodeKind::TypeMap, "map"),
        AstNode::new(NodeKind::TypePrimitive, "type"),
        AstNode::token("string"),
    ]);

    let failure = SchemaCompiler::new(quiet())
        .compile(&Ast::new(vec![AstNode::record("Index", vec![truncated])]))
        .unwrap_err();

    assert!(matches!(failure.error.root_cause(), CompileError::MalformedTypeExpression(_)));
    assert_eq!(failure.error.code(), DiagnosticCode::MalformedTypeExpression);
}

#[test]
fn identity_option_last_declared_wins() {
    let registry = compile(vec![AstNode::record("Account", vec![
        AstNode::property("id", "long", vec![AstNode::option("identity", vec![])]),
        AstNode::property("email", "string", vec![AstNode::option("identity", vec![])]),
        AstNode::property("name", "string", vec![]),
    ])]);

    let account = record(&registry, "Account");
    assert_eq!(account.identity_property().map(|p| p.name.as_str()), Some("email"));
}

#[test]
fn identity_option_on_container_property_is_accepted() {
    let registry = compile(vec![AstNode::record("Bag", vec![
        AstNode::property("keys", "set<string>", vec![AstNode::option("identity", vec![AstNode::token("1")])]),
    ])]);

    assert_eq!(
        record(&registry, "Bag").identity_property().map(|p| p.name.as_str()),
        Some("keys")
    );
}

#[test]
fn record_comment_does_not_touch_properties() {
    let properties = vec![
        AstNode::property("id", "long", vec![AstNode::option("identity", vec![])]),
        AstNode::property("tags", "list<string>", vec![]),
    ];

    let plain = compile(vec![AstNode::record("Doc", properties.clone())]);

    let mut commented_children = vec![AstNode::comment("first")];
    commented_children.extend(properties);
    commented_children.push(AstNode::comment("a stored document"));
    let commented = compile(vec![AstNode::record("Doc", commented_children)]);

    let plain_doc = record(&plain, "Doc");
    let commented_doc = record(&commented, "Doc");
    assert_eq!(plain_doc.comment, None);
    assert_eq!(commented_doc.comment.as_deref(), Some("a stored document"));
    assert_eq!(plain_doc.properties(), commented_doc.properties());
    assert_eq!(
        plain_doc.identity_property().map(|p| &p.name),
        commented_doc.identity_property().map(|p| &p.name)
    );
}

#[test]
fn last_property_comment_wins() {
    let registry = compile(vec![AstNode::record("Reading", vec![
        AstNode::property("value", "int", vec![
            AstNode::comment("first"),
            AstNode::option("default", vec![AstNode::token("0")]),
            AstNode::comment("second"),
        ]),
    ])]);

    let value = record(&registry, "Reading").property("value").unwrap();
    assert_eq!(value.comment.as_deref(), Some("second"));
}

#[test]
fn last_enum_comment_wins() {
    let level = AstNode::new(NodeKind::Enum, "enum").with_children(vec![
        AstNode::token("Level"),
        AstNode::comment("first"),
        AstNode::token("LOW"),
        AstNode::comment("second"),
        AstNode::token("HIGH"),
    ]);
    let registry = compile(vec![level]);

    let level = registry.enumeration(registry.lookup_exact("Level").unwrap()).unwrap();
    assert_eq!(level.comment.as_deref(), Some("second"));
    assert_eq!(level.values, vec!["LOW", "HIGH"]);
}

#[test]
fn registration_failure_spares_siblings() {
    let bad_name = AstNode::new(NodeKind::Record, "data").with_children(vec![
        AstNode::token("Bad Name").with_position(2, 6),
        AstNode::record("Hidden", vec![]),
    ]);
    let ast = Ast::new(vec![
        AstNode::record("First", vec![]),
        bad_name,
        AstNode::record("Last", vec![AstNode::record("Inner", vec![])]),
    ]);

    let mut reporter = CollectingReporter::new();
    let failure = SchemaCompiler::new(CompilerConfig::default())
        .with_reporter(&mut reporter)
        .compile(&ast)
        .unwrap_err();

    let registered: Vec<&str> = reporter.entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(registered, vec!["First", "Last", "Last.Inner"]);

    // The registration diagnostic is kept, then population stops on the same declaration
    let first = &failure.report.diagnostics[0];
    assert_eq!(first.code, DiagnosticCode::StructuralParseError);
    assert_eq!(first.location.as_ref().and_then(|l| l.line), Some(2));
    assert!(matches!(failure.error, CompileError::StructuralParse { .. }));
    assert_eq!(failure.report.summary.records_registered, 3);
}

#[test]
fn duplicate_sibling_declarations() {
    let ast = Ast::new(vec![AstNode::record("Outer", vec![
        AstNode::record("Twin", vec![AstNode::property("a", "int", vec![])]),
        AstNode::enumeration("Twin", &["X"]),
    ])]);

    let mut reporter = CollectingReporter::new();
    let failure = SchemaCompiler::new(CompilerConfig::default())
        .with_reporter(&mut reporter)
        .compile(&ast)
        .unwrap_err();

    assert_eq!(failure.report.diagnostics[0].code, DiagnosticCode::DuplicateType);
    assert_eq!(failure.report.summary.enums_registered, 0);
    assert_eq!(failure.error, CompileError::DuplicateType("Outer.Twin".to_string()));
    assert_eq!(reporter.entries.len(), 2);
}

#[test]
fn scoped_references_prefer_nearest_declaration() {
    let registry = compile(vec![
        AstNode::enumeration("Kind", &["ROOT"]),
        AstNode::record("Outer", vec![
            AstNode::enumeration("Kind", &["OUTER"]),
            AstNode::record("Inner", vec![
                AstNode::property("kind", "Kind", vec![]),
                AstNode::property("kinds", "list<Kind>", vec![]),
            ]),
            AstNode::property("inner", "Inner", vec![]),
            AstNode::property("qualified", "Outer.Inner", vec![]),
        ]),
        AstNode::record("Other", vec![AstNode::property("kind", "Kind", vec![])]),
    ]);

    let outer_kind = registry.lookup_exact("Outer.Kind").unwrap();
    let root_kind = registry.lookup_exact("Kind").unwrap();
    let inner = registry.lookup_exact("Outer.Inner").unwrap();

    let inner_record = record(&registry, "Outer.Inner");
    assert_eq!(inner_record.property("kind").unwrap().ty, Type::UserEnum(outer_kind));
    assert_eq!(inner_record.property("kinds").unwrap().ty, Type::list(Type::UserEnum(outer_kind)));

    let outer = record(&registry, "Outer");
    assert_eq!(outer.property("inner").unwrap().ty, Type::UserData(inner));
    assert_eq!(outer.property("qualified").unwrap().ty, Type::UserData(inner));

    assert_eq!(record(&registry, "Other").property("kind").unwrap().ty, Type::UserEnum(root_kind));
}

#[test]
fn custom_builtins_from_config() {
    let config = CompilerConfig::from_toml(
        r#"
        quiet = true
        camel_case_keys = true

        [types]
        primitives = ["text", "number"]
        blob = "bytes"
        "#,
    )
    .unwrap();

    let ast = Ast::new(vec![AstNode::record("File", vec![
        AstNode::property("file_name", "text", vec![]),
        AstNode::property("raw_data", "bytes", vec![]),
    ])]);
    let registry = SchemaCompiler::new(config).compile(&ast).unwrap().registry;

    let file = record(&registry, "File");
    assert_eq!(file.property("raw_data").unwrap().ty, Type::Blob);
    assert_eq!(file.property("file_name").unwrap().key(), "fileName");
    assert_eq!(registry.types_of(TypeKind::Primitive).count(), 2);

    let failure = SchemaCompiler::new(CompilerConfig::from_toml("quiet = true\n[types]\nprimitives = [\"text\"]\n").unwrap())
        .compile(&Ast::new(vec![AstNode::record("File", vec![AstNode::property("size", "int", vec![])])]))
        .unwrap_err();
    assert_eq!(failure.error.code(), DiagnosticCode::TypeNotFound);
}

#[test]
fn report_serializes_to_json() {
    let failure = SchemaCompiler::new(quiet())
        .compile(&Ast::new(vec![AstNode::record("R", vec![
            AstNode::property("x", "int", vec![AstNode::option("default", vec![AstNode::token("nope")])]),
        ])]))
        .unwrap_err();

    let json = failure.report.to_json().unwrap();
    assert!(!failure.report.succeeded());
    assert!(json.contains("\"outcome\": \"failed\""));
    assert!(json.contains("LITERAL_PARSE_ERROR"));
    assert!(json.contains("nope"));
}
