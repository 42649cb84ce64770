//! Expression grammar.
//!
//! Precedence-climbing binary tiers under assignment and the conditional,
//! a postfix chain over primaries, lambdas, object creation with
//! initializers, `is` patterns, and query expressions.
//!
//! Shift operators never exist as single tokens: the lexer emits every `>`
//! alone and the operator is recognized here by token adjacency, so that
//! `>` can close nested type argument lists.

use rowan::TextRange;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::parser::lookahead::{self, ParenKind, Scanner};
use crate::parser::{Parser, TokenSet, stmt, types};
use crate::syntax_kind::SyntaxKind;

const CLOSE_PAREN: TokenSet = TokenSet::new(&[SyntaxKind::CloseParen]);
const CLOSE_BRACKET: TokenSet = TokenSet::new(&[SyntaxKind::CloseBracket]);
const CLOSE_BRACE: TokenSet = TokenSet::new(&[SyntaxKind::CloseBrace]);

pub(crate) fn can_start_expression(p: &mut Parser<'_>) -> bool {
    let kind = p.current();
    kind.is_predefined_type_keyword()
        || matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::IntLiteral
                | SyntaxKind::RealLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::NullKw
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::ThisKw
                | SyntaxKind::BaseKw
                | SyntaxKind::NewKw
                | SyntaxKind::TypeofKw
                | SyntaxKind::SizeofKw
                | SyntaxKind::DefaultKw
                | SyntaxKind::OpenParen
                | SyntaxKind::Plus
                | SyntaxKind::Minus
                | SyntaxKind::Exclamation
                | SyntaxKind::Tilde
                | SyntaxKind::PlusPlus
                | SyntaxKind::MinusMinus
                | SyntaxKind::Asterisk
                | SyntaxKind::Ampersand
        )
}

pub(crate) fn expression(p: &mut Parser<'_>) {
    if lookahead::at_query_expression(p) {
        query_expression(p);
        return;
    }
    if at_lambda_start(p) {
        lambda_expression(p);
        return;
    }
    let checkpoint = p.checkpoint();
    conditional_expression(p, checkpoint);
    if let Some(width) = assignment_operator_width(p) {
        p.start_node_at(checkpoint, SyntaxKind::AssignmentExpression);
        for _ in 0..width {
            p.bump();
        }
        // Right-associative.
        expression(p);
        p.finish_node();
    }
}

fn at_lambda_start(p: &mut Parser<'_>) -> bool {
    if p.at(SyntaxKind::Identifier) && p.nth(1) == SyntaxKind::EqualsGreaterThan {
        return true;
    }
    p.at(SyntaxKind::OpenParen) && lookahead::classify_open_paren(p) == ParenKind::Lambda
}

/// `=`, compound assignments, and the adjacency-recognized `>>=`.
/// Returns the operator's width in tokens.
fn assignment_operator_width(p: &mut Parser<'_>) -> Option<usize> {
    match p.current() {
        SyntaxKind::Equals
        | SyntaxKind::PlusEquals
        | SyntaxKind::MinusEquals
        | SyntaxKind::AsteriskEquals
        | SyntaxKind::SlashEquals
        | SyntaxKind::PercentEquals
        | SyntaxKind::AmpersandEquals
        | SyntaxKind::BarEquals
        | SyntaxKind::CaretEquals
        | SyntaxKind::LessThanLessThanEquals
        | SyntaxKind::QuestionQuestionEquals => Some(1),
        SyntaxKind::GreaterThan
            if p.at_adjacent(SyntaxKind::GreaterThan, SyntaxKind::GreaterThanEquals) =>
        {
            Some(2)
        }
        _ => None,
    }
}

fn conditional_expression(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    coalesce_expression(p, checkpoint);
    if p.at(SyntaxKind::Question) {
        p.start_node_at(checkpoint, SyntaxKind::ConditionalExpression);
        p.bump();
        expression(p);
        p.expect(SyntaxKind::Colon);
        expression(p);
        p.finish_node();
    }
}

fn coalesce_expression(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    binary_expression(p, checkpoint, 0);
    if p.at(SyntaxKind::QuestionQuestion) {
        p.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
        p.bump();
        // Right-associative.
        let rhs = p.checkpoint();
        coalesce_expression(p, rhs);
        p.finish_node();
    }
}

/// Precedence of the binary operator at the cursor, with its token width.
/// `>>` is two adjacent `>` tokens; a `>` directly followed by `>=` is the
/// `>>=` assignment and not a binary operator at all.
fn binary_operator(p: &mut Parser<'_>) -> Option<(u8, usize)> {
    let (prec, width) = match p.current() {
        SyntaxKind::BarBar => (1, 1),
        SyntaxKind::AmpersandAmpersand => (2, 1),
        SyntaxKind::Bar => (3, 1),
        SyntaxKind::Caret => (4, 1),
        SyntaxKind::Ampersand => (5, 1),
        SyntaxKind::EqualsEquals | SyntaxKind::ExclamationEquals => (6, 1),
        SyntaxKind::IsKw | SyntaxKind::AsKw => (7, 1),
        SyntaxKind::LessThan | SyntaxKind::LessThanEquals | SyntaxKind::GreaterThanEquals => (7, 1),
        SyntaxKind::GreaterThan => {
            if p.at_adjacent(SyntaxKind::GreaterThan, SyntaxKind::GreaterThan) {
                (8, 2)
            } else if p.at_adjacent(SyntaxKind::GreaterThan, SyntaxKind::GreaterThanEquals) {
                return None;
            } else {
                (7, 1)
            }
        }
        SyntaxKind::LessThanLessThan => (8, 1),
        SyntaxKind::Plus | SyntaxKind::Minus => (9, 1),
        SyntaxKind::Asterisk | SyntaxKind::Slash | SyntaxKind::Percent => (10, 1),
        _ => return None,
    };
    Some((prec, width))
}

fn binary_expression(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint, min_precedence: u8) {
    unary_expression(p);
    loop {
        let Some((precedence, width)) = binary_operator(p) else {
            break;
        };
        if precedence < min_precedence {
            break;
        }
        match p.current() {
            SyntaxKind::IsKw => {
                is_expression(p, checkpoint);
                continue;
            }
            SyntaxKind::AsKw => {
                p.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
                p.bump();
                types::type_(p);
                p.finish_node();
                continue;
            }
            _ => {}
        }
        p.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
        for _ in 0..width {
            p.bump();
        }
        let rhs = p.checkpoint();
        binary_expression(p, rhs, precedence + 1);
        p.finish_node();
    }
}

/// `e is T x` (declaration pattern), `e is T` (type test), `e is 5`
/// (constant pattern). The verdict is a pure scan; the parse then commits.
fn is_expression(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    let mut s = Scanner::new(p);
    s.bump(); // is
    let mut probe = s.clone();
    let is_type = lookahead::scan_pattern_type(&mut probe);
    if is_type && probe.peek() == SyntaxKind::Identifier {
        p.start_node_at(checkpoint, SyntaxKind::IsPatternExpression);
        p.bump();
        p.start_node(SyntaxKind::DeclarationPattern);
        types::type_in_pattern(p);
        p.start_node(SyntaxKind::SingleVariableDesignation);
        p.bump();
        p.finish_node();
        p.finish_node();
    } else if is_type {
        p.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
        p.bump();
        types::type_in_pattern(p);
        p.finish_node();
    } else {
        p.start_node_at(checkpoint, SyntaxKind::IsPatternExpression);
        p.bump();
        p.start_node(SyntaxKind::ConstantPattern);
        unary_expression(p);
        p.finish_node();
        p.finish_node();
    }
}

fn unary_expression(p: &mut Parser<'_>) {
    match p.current() {
        SyntaxKind::Plus
        | SyntaxKind::Minus
        | SyntaxKind::Exclamation
        | SyntaxKind::Tilde
        | SyntaxKind::PlusPlus
        | SyntaxKind::MinusMinus
        | SyntaxKind::Asterisk
        | SyntaxKind::Ampersand => {
            p.start_node(SyntaxKind::PrefixUnaryExpression);
            p.bump();
            unary_expression(p);
            p.finish_node();
        }
        SyntaxKind::OpenParen if lookahead::classify_open_paren(p) == ParenKind::Cast => {
            p.start_node(SyntaxKind::CastExpression);
            p.bump();
            types::type_(p);
            p.expect(SyntaxKind::CloseParen);
            unary_expression(p);
            p.finish_node();
        }
        _ => postfix_expression(p),
    }
}

fn postfix_expression(p: &mut Parser<'_>) {
    let checkpoint = p.checkpoint();
    primary_expression(p);
    loop {
        match p.current() {
            SyntaxKind::Dot | SyntaxKind::QuestionDot => {
                p.start_node_at(checkpoint, SyntaxKind::MemberAccessExpression);
                p.bump();
                member_name(p);
                p.finish_node();
            }
            SyntaxKind::OpenParen => {
                p.start_node_at(checkpoint, SyntaxKind::InvocationExpression);
                argument_list(p);
                p.finish_node();
            }
            SyntaxKind::OpenBracket => {
                p.start_node_at(checkpoint, SyntaxKind::ElementAccessExpression);
                bracketed_argument_list(p);
                p.finish_node();
            }
            SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                p.start_node_at(checkpoint, SyntaxKind::PostfixUnaryExpression);
                p.bump();
                p.finish_node();
            }
            _ => break,
        }
    }
}

fn member_name(p: &mut Parser<'_>) {
    if !p.at(SyntaxKind::Identifier) {
        p.missing_name(DiagnosticCode::IdentifierExpected);
        return;
    }
    if lookahead::at_generic_name_in_expression(p) {
        types::simple_name(p);
    } else {
        p.start_node(SyntaxKind::IdentifierName);
        p.bump();
        p.finish_node();
    }
}

fn primary_expression(p: &mut Parser<'_>) {
    let kind = p.current();
    if kind.is_predefined_type_keyword() {
        // `int.Parse(...)` and friends.
        p.start_node(SyntaxKind::PredefinedType);
        p.bump();
        p.finish_node();
        return;
    }
    match kind {
        SyntaxKind::IntLiteral
        | SyntaxKind::RealLiteral
        | SyntaxKind::StringLiteral
        | SyntaxKind::CharLiteral
        | SyntaxKind::NullKw
        | SyntaxKind::TrueKw
        | SyntaxKind::FalseKw => {
            p.start_node(SyntaxKind::LiteralExpression);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::Identifier => member_name(p),
        SyntaxKind::ThisKw => {
            p.start_node(SyntaxKind::ThisExpression);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::BaseKw => {
            p.start_node(SyntaxKind::BaseExpression);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::NewKw => new_expression(p),
        SyntaxKind::TypeofKw => {
            p.start_node(SyntaxKind::TypeofExpression);
            p.bump();
            p.expect(SyntaxKind::OpenParen);
            types::type_(p);
            p.expect(SyntaxKind::CloseParen);
            p.finish_node();
        }
        SyntaxKind::SizeofKw => {
            p.start_node(SyntaxKind::SizeofExpression);
            p.bump();
            p.expect(SyntaxKind::OpenParen);
            types::type_(p);
            p.expect(SyntaxKind::CloseParen);
            p.finish_node();
        }
        SyntaxKind::DefaultKw => {
            p.start_node(SyntaxKind::DefaultExpression);
            p.bump();
            if p.at(SyntaxKind::OpenParen) {
                p.bump();
                types::type_(p);
                p.expect(SyntaxKind::CloseParen);
            }
            p.finish_node();
        }
        SyntaxKind::OpenParen => paren_or_tuple_expression(p),
        _ => p.missing_name(DiagnosticCode::ExpressionExpected),
    }
}

fn paren_or_tuple_expression(p: &mut Parser<'_>) {
    let checkpoint = p.checkpoint();
    p.bump();
    expression(p);
    if p.at(SyntaxKind::Comma) {
        p.start_node_at(checkpoint, SyntaxKind::TupleExpression);
        while p.eat(SyntaxKind::Comma) {
            if can_start_expression(p) {
                expression(p);
            } else {
                p.missing_name(DiagnosticCode::ExpressionExpected);
                break;
            }
        }
        p.expect(SyntaxKind::CloseParen);
        p.finish_node();
    } else {
        p.start_node_at(checkpoint, SyntaxKind::ParenthesizedExpression);
        p.expect(SyntaxKind::CloseParen);
        p.finish_node();
    }
}

// --- Argument lists ---

pub(crate) fn argument_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ArgumentList);
    p.expect(SyntaxKind::OpenParen);
    p.comma_list(
        CLOSE_PAREN,
        types::LIST_TERMINATORS,
        false,
        can_start_argument,
        argument,
        missing_argument,
    );
    p.expect(SyntaxKind::CloseParen);
    p.finish_node();
}

fn bracketed_argument_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::BracketedArgumentList);
    p.expect(SyntaxKind::OpenBracket);
    p.comma_list(
        CLOSE_BRACKET,
        types::LIST_TERMINATORS,
        false,
        can_start_argument,
        argument,
        missing_argument,
    );
    p.expect(SyntaxKind::CloseBracket);
    p.finish_node();
}

fn can_start_argument(p: &mut Parser<'_>) -> bool {
    matches!(p.current(), SyntaxKind::RefKw | SyntaxKind::OutKw) || can_start_expression(p)
}

fn argument(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::Argument);
    if matches!(p.current(), SyntaxKind::RefKw | SyntaxKind::OutKw) {
        p.bump();
    }
    expression(p);
    p.finish_node();
}

fn missing_argument(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::Argument);
    p.missing_name(DiagnosticCode::ExpressionExpected);
    p.finish_node();
}

// --- Object creation and initializers ---

fn new_expression(p: &mut Parser<'_>) {
    if p.nth(1) == SyntaxKind::OpenBrace {
        anonymous_object(p);
        return;
    }
    p.start_node(SyntaxKind::ObjectCreationExpression);
    p.bump();
    types::type_(p);
    if p.at(SyntaxKind::OpenParen) {
        argument_list(p);
    }
    if p.at(SyntaxKind::OpenBrace) {
        initializer_expression(p);
    }
    p.finish_node();
}

fn anonymous_object(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::AnonymousObjectCreationExpression);
    p.bump();
    p.expect(SyntaxKind::OpenBrace);
    p.comma_list(
        CLOSE_BRACE,
        types::LIST_TERMINATORS,
        true,
        can_start_expression,
        anonymous_object_member,
        |p| {
            p.start_node(SyntaxKind::AnonymousObjectMemberDeclarator);
            p.missing_name(DiagnosticCode::ExpressionExpected);
            p.finish_node();
        },
    );
    p.expect(SyntaxKind::CloseBrace);
    p.finish_node();
}

/// `Name = expr` or a projection like `x.Name`.
fn anonymous_object_member(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::AnonymousObjectMemberDeclarator);
    if p.at(SyntaxKind::Identifier) && p.nth(1) == SyntaxKind::Equals {
        p.start_node(SyntaxKind::IdentifierName);
        p.bump();
        p.finish_node();
        p.bump();
    }
    expression(p);
    p.finish_node();
}

/// `{ a, b }` or `{ A = 1, B = 2 }`, with nested `{ ... }` elements for
/// collection-of-collection initializers. Trailing commas are legal here.
pub(crate) fn initializer_expression(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::InitializerExpression);
    p.expect(SyntaxKind::OpenBrace);
    p.comma_list(
        CLOSE_BRACE,
        types::LIST_TERMINATORS,
        true,
        can_start_initializer_member,
        initializer_member,
        |p| p.missing_name(DiagnosticCode::ExpressionExpected),
    );
    p.expect(SyntaxKind::CloseBrace);
    p.finish_node();
}

fn can_start_initializer_member(p: &mut Parser<'_>) -> bool {
    p.at(SyntaxKind::OpenBrace) || can_start_expression(p)
}

fn initializer_member(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::OpenBrace) {
        initializer_expression(p);
    } else {
        // `A = 1` parses as an assignment expression.
        expression(p);
    }
}

// --- Lambdas ---

fn lambda_expression(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::LambdaExpression);
    if p.at(SyntaxKind::Identifier) {
        p.start_node(SyntaxKind::LambdaParameter);
        p.bump();
        p.finish_node();
    } else {
        lambda_parameter_list(p);
    }
    p.expect(SyntaxKind::EqualsGreaterThan);
    if p.at(SyntaxKind::OpenBrace) {
        stmt::block(p);
    } else {
        expression(p);
    }
    p.finish_node();
}

fn lambda_parameter_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::LambdaParameterList);
    p.expect(SyntaxKind::OpenParen);
    p.comma_list(
        CLOSE_PAREN,
        types::LIST_TERMINATORS,
        false,
        can_start_lambda_parameter,
        lambda_parameter,
        |p| {
            p.start_node(SyntaxKind::LambdaParameter);
            p.missing_name(DiagnosticCode::IdentifierExpected);
            p.finish_node();
        },
    );
    p.expect(SyntaxKind::CloseParen);
    p.finish_node();
}

fn can_start_lambda_parameter(p: &mut Parser<'_>) -> bool {
    let kind = p.current();
    kind.is_predefined_type_keyword()
        || matches!(
            kind,
            SyntaxKind::Identifier | SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::DelegateKw
        )
}

fn lambda_parameter(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::LambdaParameter);
    if matches!(p.current(), SyntaxKind::RefKw | SyntaxKind::OutKw) {
        p.bump();
    }
    // Untyped `(a, b)` form: the identifier is the whole parameter.
    if p.at(SyntaxKind::Identifier)
        && matches!(
            p.nth(1),
            SyntaxKind::Comma | SyntaxKind::CloseParen | SyntaxKind::EqualsGreaterThan
        )
    {
        p.bump();
    } else {
        types::type_(p);
        if p.at(SyntaxKind::Identifier) {
            p.bump();
        } else {
            p.missing_name(DiagnosticCode::IdentifierExpected);
        }
    }
    p.finish_node();
}

// --- Query expressions ---

/// `from x in xs ... select e`. Query keywords are contextual identifiers;
/// the whole construct is entered only after the `from ... in` scan.
fn query_expression(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::QueryExpression);
    from_clause(p);
    query_body(p);
    p.finish_node();
}

fn from_clause(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FromClause);
    p.bump(); // from
    if !(p.at(SyntaxKind::Identifier) && p.nth(1) == SyntaxKind::InKw) {
        types::type_(p);
    }
    range_variable(p);
    p.expect(SyntaxKind::InKw);
    expression(p);
    p.finish_node();
}

fn range_variable(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::Identifier) {
        p.bump();
    } else {
        p.missing_name(DiagnosticCode::IdentifierExpected);
    }
}

/// A contextual query keyword that must appear here (`on`, `equals`, `by`).
fn expect_contextual(p: &mut Parser<'_>, word: &str) {
    if p.at_contextual(word) {
        p.bump();
        return;
    }
    let range = TextRange::empty(p.current_start());
    p.error(Diagnostic::new(DiagnosticCode::ExpectedToken, range).with_arg(word));
    p.missing(SyntaxKind::Identifier);
}

fn query_body(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::QueryBody);
    loop {
        if lookahead::at_query_expression(p) {
            from_clause(p);
        } else if p.at_contextual("let") {
            p.start_node(SyntaxKind::LetClause);
            p.bump();
            range_variable(p);
            p.expect(SyntaxKind::Equals);
            expression(p);
            p.finish_node();
        } else if p.at_contextual("where") {
            p.start_node(SyntaxKind::WhereClause);
            p.bump();
            expression(p);
            p.finish_node();
        } else if p.at_contextual("join") {
            join_clause(p);
        } else if p.at_contextual("orderby") {
            orderby_clause(p);
        } else {
            break;
        }
    }
    if p.at_contextual("select") {
        p.start_node(SyntaxKind::SelectClause);
        p.bump();
        expression(p);
        p.finish_node();
    } else if p.at_contextual("group") {
        p.start_node(SyntaxKind::GroupClause);
        p.bump();
        expression(p);
        expect_contextual(p, "by");
        expression(p);
        p.finish_node();
    } else {
        // Every query body ends in select or group; synthesize the select.
        let range = TextRange::empty(p.current_start());
        p.error(Diagnostic::new(DiagnosticCode::ExpectedToken, range).with_arg("select"));
        p.start_node(SyntaxKind::SelectClause);
        p.missing(SyntaxKind::Identifier);
        p.start_node(SyntaxKind::IdentifierName);
        p.missing(SyntaxKind::Identifier);
        p.finish_node();
        p.finish_node();
    }
    if p.at_contextual("into") {
        p.start_node(SyntaxKind::QueryContinuation);
        p.bump();
        range_variable(p);
        query_body(p);
        p.finish_node();
    }
    p.finish_node();
}

fn join_clause(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::JoinClause);
    p.bump(); // join
    if !(p.at(SyntaxKind::Identifier) && p.nth(1) == SyntaxKind::InKw) {
        types::type_(p);
    }
    range_variable(p);
    p.expect(SyntaxKind::InKw);
    expression(p);
    expect_contextual(p, "on");
    expression(p);
    expect_contextual(p, "equals");
    expression(p);
    if p.at_contextual("into") {
        p.bump();
        range_variable(p);
    }
    p.finish_node();
}

fn orderby_clause(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::OrderByClause);
    p.bump(); // orderby
    loop {
        ordering(p);
        if !p.at(SyntaxKind::Comma) {
            break;
        }
        p.bump();
        if !can_start_expression(p) {
            // Lists never silently shrink.
            p.start_node(SyntaxKind::Ordering);
            p.missing_name(DiagnosticCode::ExpressionExpected);
            p.finish_node();
            break;
        }
    }
    p.finish_node();
}

fn ordering(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::Ordering);
    expression(p);
    if p.at_contextual("ascending") || p.at_contextual("descending") {
        p.bump();
    }
    p.finish_node();
}
