//! Type grammar: names, predefined types, nullable/pointer/array suffixes,
//! tuples, and function-pointer types.
//!
//! Everything here is *committed* parsing: the decision that a type belongs
//! at the current position was already taken (by grammar position or by a
//! `lookahead` scan), so mismatches inside produce expected-token recovery
//! rather than backtracking into another alternative.

use crate::diagnostics::DiagnosticCode;
use crate::parser::{Parser, TokenSet};
use crate::syntax_kind::SyntaxKind;

/// Tokens that terminate any unterminated bracketed interior: closers of
/// enclosing scopes plus the keywords that begin a new declaration.
pub(crate) const LIST_TERMINATORS: TokenSet = TokenSet::new(&[
    SyntaxKind::Semicolon,
    SyntaxKind::OpenBrace,
    SyntaxKind::CloseBrace,
    SyntaxKind::CloseParen,
    SyntaxKind::CloseBracket,
    SyntaxKind::ClassKw,
    SyntaxKind::StructKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::EnumKw,
    SyntaxKind::NamespaceKw,
]);

/// Terminators for `<...>` interiors. Deliberately *without* `)` and `]`:
/// a stray closer inside an angle list is junk to skip (with the list's
/// one missing-comma diagnostic), so `delegate* cdecl<void) ptr;` still
/// reaches its declarator.
pub(crate) const ANGLE_TERMINATORS: TokenSet = TokenSet::new(&[
    SyntaxKind::Semicolon,
    SyntaxKind::OpenBrace,
    SyntaxKind::CloseBrace,
    SyntaxKind::ClassKw,
    SyntaxKind::StructKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::EnumKw,
    SyntaxKind::NamespaceKw,
]);

const GT: TokenSet = TokenSet::new(&[SyntaxKind::GreaterThan]);
const CLOSE_PAREN: TokenSet = TokenSet::new(&[SyntaxKind::CloseParen]);

pub(crate) fn can_start_type(p: &mut Parser<'_>) -> bool {
    let kind = p.current();
    kind.is_predefined_type_keyword()
        || matches!(
            kind,
            SyntaxKind::Identifier | SyntaxKind::DelegateKw | SyntaxKind::OpenParen
        )
}

/// Parse a type, including its `?`/`*`/`[]` suffixes.
pub(crate) fn type_(p: &mut Parser<'_>) {
    let checkpoint = p.checkpoint();
    core_type(p);
    loop {
        match p.current() {
            SyntaxKind::Question => {
                p.start_node_at(checkpoint, SyntaxKind::NullableType);
                p.bump();
                p.finish_node();
            }
            SyntaxKind::Asterisk => {
                p.start_node_at(checkpoint, SyntaxKind::PointerType);
                p.bump();
                p.finish_node();
            }
            SyntaxKind::OpenBracket => {
                p.start_node_at(checkpoint, SyntaxKind::ArrayType);
                array_rank_specifier(p);
                p.finish_node();
            }
            _ => break,
        }
    }
}

/// Type in pattern position: array suffixes only. `?` and `*` after the
/// type belong to the surrounding expression there.
pub(crate) fn type_in_pattern(p: &mut Parser<'_>) {
    let checkpoint = p.checkpoint();
    core_type(p);
    while p.at(SyntaxKind::OpenBracket) {
        p.start_node_at(checkpoint, SyntaxKind::ArrayType);
        array_rank_specifier(p);
        p.finish_node();
    }
}

fn core_type(p: &mut Parser<'_>) {
    let kind = p.current();
    if kind.is_predefined_type_keyword() {
        p.start_node(SyntaxKind::PredefinedType);
        p.bump();
        p.finish_node();
        return;
    }
    match kind {
        SyntaxKind::Identifier => name(p),
        SyntaxKind::DelegateKw => function_pointer_type(p),
        SyntaxKind::OpenParen => tuple_type(p),
        _ => p.missing_name(DiagnosticCode::TypeExpected),
    }
}

/// Possibly qualified, possibly generic name: `A`, `A<B>`, `A.B<C>.D`.
pub(crate) fn name(p: &mut Parser<'_>) {
    let checkpoint = p.checkpoint();
    simple_name(p);
    while p.at(SyntaxKind::Dot) {
        p.start_node_at(checkpoint, SyntaxKind::QualifiedName);
        p.bump();
        if p.at(SyntaxKind::Identifier) {
            simple_name(p);
        } else {
            p.missing_name(DiagnosticCode::IdentifierExpected);
        }
        p.finish_node();
    }
}

/// `A` or `A<...>`; assumes the current token is an identifier.
pub(crate) fn simple_name(p: &mut Parser<'_>) {
    if p.nth(1) == SyntaxKind::LessThan {
        p.start_node(SyntaxKind::GenericName);
        p.bump();
        type_argument_list(p);
        p.finish_node();
    } else {
        p.start_node(SyntaxKind::IdentifierName);
        p.bump();
        p.finish_node();
    }
}

/// Committed `<...>` type argument list; assumes the current token is `<`.
pub(crate) fn type_argument_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TypeArgumentList);
    p.expect(SyntaxKind::LessThan);
    p.comma_list(GT, ANGLE_TERMINATORS, false, can_start_type, type_, |p| {
        p.missing_name(DiagnosticCode::TypeExpected)
    });
    p.expect(SyntaxKind::GreaterThan);
    p.finish_node();
}

/// `delegate* [conv] <param-types>`; assumes the current token is
/// `delegate`. Once here the parse is committed: a missing `*` or `<` is
/// synthesized, never reinterpreted as multiplication.
pub(crate) fn function_pointer_type(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FunctionPointerType);
    p.bump();
    p.expect(SyntaxKind::Asterisk);
    // A lone identifier is a calling-convention tag only when `<` follows;
    // any identifier is accepted here, validity is semantic.
    if p.at(SyntaxKind::Identifier) && p.nth(1) == SyntaxKind::LessThan {
        p.start_node(SyntaxKind::FunctionPointerCallingConvention);
        p.bump();
        p.finish_node();
    }
    p.start_node(SyntaxKind::FunctionPointerParameterList);
    if p.expect(SyntaxKind::LessThan) {
        p.comma_list(
            GT,
            ANGLE_TERMINATORS,
            false,
            can_start_type,
            function_pointer_parameter,
            missing_function_pointer_parameter,
        );
        p.expect(SyntaxKind::GreaterThan);
    } else {
        // `<` was synthesized above with its one diagnostic; complete the
        // list shape silently, one missing parameter so the list is never
        // empty.
        p.start_node(SyntaxKind::FunctionPointerParameter);
        p.start_node(SyntaxKind::IdentifierName);
        p.missing(SyntaxKind::Identifier);
        p.finish_node();
        p.finish_node();
        p.missing(SyntaxKind::GreaterThan);
    }
    p.finish_node();
    p.finish_node();
}

fn function_pointer_parameter(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FunctionPointerParameter);
    type_(p);
    p.finish_node();
}

fn missing_function_pointer_parameter(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FunctionPointerParameter);
    p.missing_name(DiagnosticCode::TypeExpected);
    p.finish_node();
}

fn tuple_type(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TupleType);
    p.expect(SyntaxKind::OpenParen);
    p.comma_list(
        CLOSE_PAREN,
        LIST_TERMINATORS,
        false,
        can_start_type,
        tuple_type_element,
        |p| {
            p.start_node(SyntaxKind::TupleTypeElement);
            p.missing_name(DiagnosticCode::TypeExpected);
            p.finish_node();
        },
    );
    p.expect(SyntaxKind::CloseParen);
    p.finish_node();
}

fn tuple_type_element(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TupleTypeElement);
    type_(p);
    if p.at(SyntaxKind::Identifier) {
        p.bump();
    }
    p.finish_node();
}

/// `[]`, `[,]`, or `[expr, expr]`. Sizes are syntactically accepted in any
/// type position; whether they are meaningful there is a semantic question.
fn array_rank_specifier(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ArrayRankSpecifier);
    p.expect(SyntaxKind::OpenBracket);
    loop {
        match p.current() {
            SyntaxKind::CloseBracket
            | SyntaxKind::Eof
            | SyntaxKind::Semicolon
            | SyntaxKind::OpenBrace
            | SyntaxKind::CloseBrace => break,
            SyntaxKind::Comma => p.bump(),
            _ if crate::parser::expr::can_start_expression(p) => {
                crate::parser::expr::expression(p);
            }
            _ => break,
        }
    }
    p.expect(SyntaxKind::CloseBracket);
    p.finish_node();
}
