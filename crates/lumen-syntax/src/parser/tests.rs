//! Grammar shape and recovery tests. Whole-input properties (round-trip,
//! totality, the pinned recovery scenarios) live in `tests/`.

use crate::diagnostics::DiagnosticCode;
use crate::syntax_kind::SyntaxKind;
use crate::{Parse, ParseOptions};

fn parse_expr(text: &str) -> Parse {
    crate::parse_expression(text, &ParseOptions::default()).expect("small input")
}

fn parse_stmt(text: &str) -> Parse {
    crate::parse_statement(text, &ParseOptions::default()).expect("small input")
}

fn parse_unit(text: &str) -> Parse {
    crate::parse_compilation_unit(text, &ParseOptions::default()).expect("small input")
}

fn parse_ty(text: &str) -> Parse {
    crate::parse_type(text, &ParseOptions::default()).expect("small input")
}

fn node_kinds(parse: &Parse) -> Vec<SyntaxKind> {
    parse.syntax().descendants().map(|n| n.kind()).collect()
}

fn codes(parse: &Parse) -> Vec<DiagnosticCode> {
    parse.diagnostics().iter().map(|d| d.code).collect()
}

fn assert_clean(parse: &Parse, text: &str) {
    assert_eq!(parse.syntax().text(), text, "round trip");
    assert_eq!(parse.diagnostics(), &[], "expected no diagnostics");
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    let parse = parse_expr("1 + 2 * 3");
    assert_clean(&parse, "1 + 2 * 3");
    let root = parse.syntax();
    let outer = root.first_child().expect("binary node");
    assert_eq!(outer.kind(), SyntaxKind::BinaryExpression);
    let operands: Vec<SyntaxKind> = outer.children().map(|n| n.kind()).collect();
    assert_eq!(
        operands,
        [SyntaxKind::LiteralExpression, SyntaxKind::BinaryExpression]
    );
}

#[test]
fn shift_operator_is_two_adjacent_greater_thans() {
    let parse = parse_expr("a >> b");
    assert_clean(&parse, "a >> b");
    let expr = parse.syntax().first_child().expect("expr");
    assert_eq!(expr.kind(), SyntaxKind::BinaryExpression);
    let gt_count = expr
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::GreaterThan)
        .count();
    assert_eq!(gt_count, 2);
}

#[test]
fn separated_greater_thans_are_comparisons() {
    // `a > > b` cannot be a shift.
    let parse = parse_expr("a > > b");
    let expr = parse.syntax().first_child().expect("expr");
    assert_eq!(expr.kind(), SyntaxKind::BinaryExpression);
    assert!(parse.has_errors());
}

#[test]
fn generic_name_versus_comparison() {
    let parse = parse_expr("a<b>(c)");
    assert_clean(&parse, "a<b>(c)");
    assert!(node_kinds(&parse).contains(&SyntaxKind::GenericName));

    let parse = parse_expr("a < b");
    assert_clean(&parse, "a < b");
    assert!(!node_kinds(&parse).contains(&SyntaxKind::GenericName));
}

#[test]
fn parenthesized_prefix_classification() {
    let parse = parse_expr("(int)x");
    assert_clean(&parse, "(int)x");
    assert!(node_kinds(&parse).contains(&SyntaxKind::CastExpression));

    let parse = parse_expr("(x)");
    assert_clean(&parse, "(x)");
    assert!(node_kinds(&parse).contains(&SyntaxKind::ParenthesizedExpression));

    let parse = parse_expr("(a, b)");
    assert_clean(&parse, "(a, b)");
    assert!(node_kinds(&parse).contains(&SyntaxKind::TupleExpression));

    let parse = parse_expr("(a, b) => a");
    assert_clean(&parse, "(a, b) => a");
    assert!(node_kinds(&parse).contains(&SyntaxKind::LambdaExpression));
}

#[test]
fn conditional_and_coalesce() {
    let parse = parse_expr("a ?? b ? c : d");
    assert_clean(&parse, "a ?? b ? c : d");
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::ConditionalExpression));
    assert!(kinds.contains(&SyntaxKind::BinaryExpression));
}

#[test]
fn is_pattern_with_designation() {
    let parse = parse_expr("x is Foo f");
    assert_clean(&parse, "x is Foo f");
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::IsPatternExpression));
    assert!(kinds.contains(&SyntaxKind::DeclarationPattern));
    assert!(kinds.contains(&SyntaxKind::SingleVariableDesignation));
}

#[test]
fn is_type_without_designation_is_binary() {
    let parse = parse_expr("x is Foo");
    assert_clean(&parse, "x is Foo");
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::BinaryExpression));
    assert!(!kinds.contains(&SyntaxKind::IsPatternExpression));
}

#[test]
fn is_type_then_conditional() {
    let parse = parse_expr("x is T ? a : b");
    assert_clean(&parse, "x is T ? a : b");
    assert!(node_kinds(&parse).contains(&SyntaxKind::ConditionalExpression));
}

#[test]
fn query_expression_clauses() {
    let text = "from x in xs where x > 2 orderby x descending select x";
    let parse = parse_expr(text);
    assert_clean(&parse, text);
    let kinds = node_kinds(&parse);
    for kind in [
        SyntaxKind::QueryExpression,
        SyntaxKind::FromClause,
        SyntaxKind::WhereClause,
        SyntaxKind::OrderByClause,
        SyntaxKind::Ordering,
        SyntaxKind::SelectClause,
    ] {
        assert!(kinds.contains(&kind), "missing {kind:?} in {kinds:?}");
    }
}

#[test]
fn query_group_by_and_continuation() {
    let text = "from x in xs group x by x into g select g";
    let parse = parse_expr(text);
    assert_clean(&parse, text);
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::GroupClause));
    assert!(kinds.contains(&SyntaxKind::QueryContinuation));
}

#[test]
fn from_identifier_without_in_is_not_a_query() {
    let parse = parse_expr("from + 1");
    assert_clean(&parse, "from + 1");
    assert!(!node_kinds(&parse).contains(&SyntaxKind::QueryExpression));
}

#[test]
fn pointer_declaration_wins_over_multiplication() {
    let parse = parse_stmt("a * b;");
    assert_clean(&parse, "a * b;");
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::LocalDeclarationStatement));
    assert!(kinds.contains(&SyntaxKind::PointerType));
}

#[test]
fn expression_statement_when_no_declarator_follows() {
    let parse = parse_stmt("a * b();");
    assert_clean(&parse, "a * b();");
    assert!(node_kinds(&parse).contains(&SyntaxKind::ExpressionStatement));
}

#[test]
fn local_declaration_with_generic_type() {
    let parse = parse_stmt("List<int> xs = null;");
    assert_clean(&parse, "List<int> xs = null;");
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::LocalDeclarationStatement));
    assert!(kinds.contains(&SyntaxKind::GenericName));
    assert!(kinds.contains(&SyntaxKind::EqualsValueClause));
}

#[test]
fn missing_semicolon_is_synthesized() {
    let parse = parse_stmt("return");
    assert_eq!(parse.syntax().text(), "return");
    assert_eq!(codes(&parse), [DiagnosticCode::ExpectedToken]);
    assert_eq!(parse.diagnostics()[0].args, [";"]);
    assert!(node_kinds(&parse).contains(&SyntaxKind::ReturnStatement));
}

#[test]
fn catch_after_catch_all_is_flagged() {
    let text = "try { } catch { } catch (E e) { }";
    let parse = parse_stmt(text);
    assert_eq!(parse.syntax().text(), text);
    assert_eq!(codes(&parse), [DiagnosticCode::TooManyCatches]);
    // Both clauses are still in the tree.
    let catches = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::CatchClause)
        .count();
    assert_eq!(catches, 2);
}

#[test]
fn for_statement_clauses() {
    let text = "for (int i = 0; i < n; i++) { }";
    let parse = parse_stmt(text);
    assert_clean(&parse, text);
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::ForStatement));
    assert!(kinds.contains(&SyntaxKind::VariableDeclaration));
    assert!(kinds.contains(&SyntaxKind::PostfixUnaryExpression));
}

#[test]
fn foreach_statement() {
    let text = "foreach (var x in xs) x.M();";
    let parse = parse_stmt(text);
    assert_clean(&parse, text);
    assert!(node_kinds(&parse).contains(&SyntaxKind::ForeachStatement));
}

#[test]
fn class_with_field_method_property() {
    let text = "class C { int x; void M(int a) { return; } int P { get; set; } }";
    let parse = parse_unit(text);
    assert_clean(&parse, text);
    let kinds = node_kinds(&parse);
    for kind in [
        SyntaxKind::ClassDeclaration,
        SyntaxKind::FieldDeclaration,
        SyntaxKind::MethodDeclaration,
        SyntaxKind::ParameterList,
        SyntaxKind::PropertyDeclaration,
        SyntaxKind::AccessorList,
    ] {
        assert!(kinds.contains(&kind), "missing {kind:?}");
    }
}

#[test]
fn duplicate_modifier_reported_once_per_repeat() {
    let parse = parse_unit("public public class C { }");
    assert_eq!(parse.syntax().text(), "public public class C { }");
    assert_eq!(codes(&parse), [DiagnosticCode::DuplicateModifier]);
    assert_eq!(parse.diagnostics()[0].args, ["public"]);
}

#[test]
fn enum_with_trailing_comma_is_clean() {
    let text = "enum E { A, B, }";
    let parse = parse_unit(text);
    assert_clean(&parse, text);
    let members = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::EnumMemberDeclaration)
        .count();
    assert_eq!(members, 2);
}

#[test]
fn attributes_and_constraints() {
    let text = "[Serializable] class C<T> : Base where T : Base { }";
    let parse = parse_unit(text);
    assert_clean(&parse, text);
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::AttributeList));
    assert!(kinds.contains(&SyntaxKind::TypeParameterList));
    assert!(kinds.contains(&SyntaxKind::ConstraintClause));
}

#[test]
fn namespace_and_usings() {
    let text = "using Sys.Text;\nnamespace A.B { class C { } }\n";
    let parse = parse_unit(text);
    assert_clean(&parse, text);
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::UsingDirective));
    assert!(kinds.contains(&SyntaxKind::NamespaceDeclaration));
    assert!(kinds.contains(&SyntaxKind::QualifiedName));
}

#[test]
fn global_statement_at_top_level() {
    let parse = parse_unit("M();\n");
    assert_clean(&parse, "M();\n");
    assert!(node_kinds(&parse).contains(&SyntaxKind::ExpressionStatement));
}

#[test]
fn declaration_keyword_abandons_parameter_list() {
    // The malformed method still closes and `class D` parses as a sibling.
    let text = "class C { void M(int a, class D { } }";
    let parse = parse_unit(text);
    assert_eq!(parse.syntax().text(), text);
    let classes: Vec<_> = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::ClassDeclaration)
        .collect();
    assert_eq!(classes.len(), 2);
    assert!(parse.has_errors());
}

#[test]
fn function_pointer_type_shape() {
    let parse = parse_ty("delegate*<int, void>");
    assert_clean(&parse, "delegate*<int, void>");
    let parameters = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::FunctionPointerParameter)
        .count();
    assert_eq!(parameters, 2);
}

#[test]
fn nested_function_pointer_type() {
    let text = "delegate*<delegate*<int, void>, void>";
    let parse = parse_ty(text);
    assert_clean(&parse, text);
    let fnptrs = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::FunctionPointerType)
        .count();
    assert_eq!(fnptrs, 2);
}

#[test]
fn type_suffixes_nest_outward() {
    let parse = parse_ty("int*[]");
    assert_clean(&parse, "int*[]");
    let root = parse.syntax();
    let outer = root.first_child().expect("type");
    assert_eq!(outer.kind(), SyntaxKind::ArrayType);
    let inner = outer.first_child().expect("element type");
    assert_eq!(inner.kind(), SyntaxKind::PointerType);
}

#[test]
fn tuple_type_elements() {
    let text = "(int a, string b)";
    let parse = parse_ty(text);
    assert_clean(&parse, text);
    let elements = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::TupleTypeElement)
        .count();
    assert_eq!(elements, 2);
}

#[test]
fn object_creation_with_initializer() {
    let text = "new Foo(1) { A = 2, B }";
    let parse = parse_expr(text);
    assert_clean(&parse, text);
    let kinds = node_kinds(&parse);
    assert!(kinds.contains(&SyntaxKind::ObjectCreationExpression));
    assert!(kinds.contains(&SyntaxKind::ArgumentList));
    assert!(kinds.contains(&SyntaxKind::InitializerExpression));
    assert!(kinds.contains(&SyntaxKind::AssignmentExpression));
}

#[test]
fn anonymous_object_members() {
    let text = "new { A = 1, x.B }";
    let parse = parse_expr(text);
    assert_clean(&parse, text);
    let members = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::AnonymousObjectMemberDeclarator)
        .count();
    assert_eq!(members, 2);
}

#[test]
fn base_list_missing_comma_keeps_both_bases() {
    let parse = parse_unit("class c<t> : x y { }");
    assert_eq!(parse.syntax().text(), "class c<t> : x y { }");
    assert_eq!(codes(&parse), [DiagnosticCode::ExpectedToken]);
    assert_eq!(parse.diagnostics()[0].args, [","]);
    let base_names: Vec<_> = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::BaseList)
        .flat_map(|n| n.children())
        .filter(|n| n.kind() == SyntaxKind::IdentifierName)
        .collect();
    assert_eq!(base_names.len(), 2);
}

#[test]
fn skipped_junk_collapses_to_one_diagnostic() {
    let parse = parse_stmt("{ @ @ @ x = 1; }");
    assert_eq!(parse.syntax().text(), "{ @ @ @ x = 1; }");
    // The lexer reports each `@` character; the parser's skip run is one
    // collapsed diagnostic, and `x = 1;` still parses.
    let unexpected = codes(&parse)
        .iter()
        .filter(|c| **c == DiagnosticCode::UnexpectedToken)
        .count();
    assert_eq!(unexpected, 1);
    assert!(node_kinds(&parse).contains(&SyntaxKind::AssignmentExpression));
    let skipped = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::SkippedTokens)
        .count();
    assert_eq!(skipped, 1);
}

#[test]
fn deterministic_reparse() {
    let text = "class C { void M() { if (a < b) f(x, ); } }";
    let first = parse_unit(text);
    let second = parse_unit(text);
    assert_eq!(first.green(), second.green());
    assert_eq!(first.diagnostics(), second.diagnostics());
}
