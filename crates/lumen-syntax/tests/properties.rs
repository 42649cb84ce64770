//! Whole-input laws: lossless round-tripping, totality, determinism, and
//! fixed child arity with zero-width placeholders.

use lumen_syntax::{
    DiagnosticCode, Parse, ParseOptions, SyntaxKind, parse_compilation_unit, parse_expression,
    parse_statement, parse_type,
};

fn unit(source: &str) -> Parse {
    parse_compilation_unit(source, &ParseOptions::default()).expect("source fits in a tree")
}

const CORPUS: &[&str] = &[
    "",
    " ",
    "\n\n\n",
    "// comment only\n",
    "/* unterminated",
    "\"unterminated string",
    "'x",
    "class C { }",
    "class C<T> : Base where T : Base { T Get() { return default(T); } }",
    "namespace N { using S = System.Text; class C { int[] xs = new int[3]; } }",
    "enum E { A = 1, B, }",
    "delegate int F<T>(T x);",
    "class C { public static int* P(ref int a, out int b, params int[] rest) { } }",
    "var q = from x in xs where x > 0 orderby x descending select x * 2;",
    "int x = a is List<int> l ? l.Count : 0;",
    "f(a ?? b, (int)c, (a, b) => a + b);",
    "class C { int P { get; set { } } }",
    "#if A\n#elif B\n#else\n#endif\n",
    "class C { void M( } class D { }",
    "x = = = ;",
    "((((",
    "}}}}",
    "< > <<>> , , ;",
    "class [ ] ; @ #",
];

#[test]
fn round_trip_law() {
    for source in CORPUS {
        let parse = unit(source);
        assert_eq!(
            parse.syntax().text().to_string(),
            *source,
            "round-trip failed for {source:?}"
        );
    }
}

#[test]
fn round_trip_law_other_roots() {
    let options = ParseOptions::default();
    for source in CORPUS {
        for parse in [
            parse_statement(source, &options).expect("fits"),
            parse_expression(source, &options).expect("fits"),
            parse_type(source, &options).expect("fits"),
        ] {
            assert_eq!(
                parse.syntax().text().to_string(),
                *source,
                "round-trip failed for {source:?}"
            );
        }
    }
}

#[test]
fn every_tree_ends_with_the_eof_token() {
    for source in CORPUS {
        let parse = unit(source);
        let last = parse
            .syntax()
            .last_token()
            .expect("every tree carries at least the end-of-input token");
        assert_eq!(last.kind(), SyntaxKind::Eof, "for {source:?}");
    }
}

#[test]
fn determinism() {
    for source in CORPUS {
        let first = unit(source);
        let second = unit(source);
        assert_eq!(first.green(), second.green(), "trees differ for {source:?}");
        assert_eq!(
            first.diagnostics(),
            second.diagnostics(),
            "diagnostics differ for {source:?}"
        );
    }
}

#[test]
fn diagnostics_are_sorted_by_position() {
    for source in CORPUS {
        let parse = unit(source);
        let starts: Vec<u32> = parse.diagnostics().iter().map(|d| d.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted, "unsorted diagnostics for {source:?}");
    }
}

#[test]
fn half_a_million_commas_stay_linear_and_bounded() {
    let source = ",".repeat(500_000);
    let parse = unit(&source);
    assert_eq!(parse.syntax().text().to_string(), source);

    // One collapsed skip run, not one diagnostic per comma.
    assert!(
        parse.diagnostics().len() <= 4,
        "diagnostic count {} is not bounded",
        parse.diagnostics().len()
    );
    assert!(
        parse
            .diagnostics()
            .iter()
            .any(|d| d.code == DiagnosticCode::UnexpectedToken)
    );
    let skipped = parse
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::SkippedTokens)
        .count();
    assert_eq!(skipped, 1);
}

#[test]
fn missing_children_are_zero_width_placeholders() {
    // `if` with an unclosed condition and no body: the close paren and the
    // embedded statement slot are both filled, at zero width.
    let parse = parse_statement("if (x", &ParseOptions::default()).expect("fits");
    assert_eq!(parse.syntax().text().to_string(), "if (x");

    let if_node = parse
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::IfStatement)
        .expect("if statement");
    let close = if_node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::CloseParen)
        .expect("close paren slot");
    assert!(close.text_range().is_empty());
    let body = if_node
        .children()
        .find(|n| n.kind() == SyntaxKind::ExpressionStatement)
        .expect("embedded statement slot");
    assert!(body.text_range().is_empty());
}

#[test]
fn unterminated_constructs_still_produce_trees() {
    for source in ["\"abc", "'a", "/* never closed", "@"] {
        let parse = unit(source);
        assert_eq!(parse.syntax().text().to_string(), *source);
        assert!(parse.has_errors(), "expected a diagnostic for {source:?}");
    }
}
