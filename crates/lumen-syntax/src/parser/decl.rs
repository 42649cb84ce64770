//! Declaration grammar: compilation unit, usings, namespaces, type
//! declarations and their members.
//!
//! The top level accepts both declarations and global statements. Inside a
//! type body only members parse; a declaration keyword showing up in the
//! middle of any construct abandons that construct, so one malformed line
//! still yields well-formed sibling declarations.

use crate::diagnostics::DiagnosticCode;
use crate::parser::lookahead::Scanner;
use crate::parser::{Parser, TokenSet, expr, stmt, types};
use crate::syntax_kind::SyntaxKind;

const CLOSE_BRACKET: TokenSet = TokenSet::new(&[SyntaxKind::CloseBracket]);
const CLOSE_PAREN: TokenSet = TokenSet::new(&[SyntaxKind::CloseParen]);
const CLOSE_BRACE: TokenSet = TokenSet::new(&[SyntaxKind::CloseBrace]);
const OPEN_BRACE: TokenSet = TokenSet::new(&[SyntaxKind::OpenBrace]);

/// Recovery points inside a type body when a member head makes no sense.
const MEMBER_RECOVERY: TokenSet = TokenSet::new(&[
    SyntaxKind::Semicolon,
    SyntaxKind::OpenBrace,
    SyntaxKind::CloseBrace,
    SyntaxKind::OpenBracket,
    SyntaxKind::ClassKw,
    SyntaxKind::StructKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::EnumKw,
    SyntaxKind::NamespaceKw,
    SyntaxKind::UsingKw,
    SyntaxKind::DelegateKw,
]);

pub(crate) fn compilation_unit(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::CompilationUnit);
    loop {
        match p.current() {
            SyntaxKind::Eof => break,
            SyntaxKind::CloseBrace => {
                // Stray closer at the top level.
                let before = p.pos;
                p.force_progress(before, MEMBER_RECOVERY);
            }
            _ => {
                let before = p.pos;
                top_level_item(p);
                p.force_progress(before, MEMBER_RECOVERY);
            }
        }
    }
    p.finish_up();
}

fn top_level_item(p: &mut Parser<'_>) {
    let kind = p.current();
    match kind {
        SyntaxKind::UsingKw => using_directive(p),
        SyntaxKind::NamespaceKw => namespace_declaration(p),
        SyntaxKind::OpenBracket => member(p),
        SyntaxKind::ClassKw | SyntaxKind::StructKw | SyntaxKind::InterfaceKw
        | SyntaxKind::EnumKw => member(p),
        SyntaxKind::DelegateKw if p.nth(1) != SyntaxKind::Asterisk => member(p),
        kind if kind.is_modifier() => member(p),
        // Anything else is a global statement (`M();`, `int x = 1;`, ...).
        _ => stmt::statement(p),
    }
}

fn using_directive(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::UsingDirective);
    p.bump();
    if p.at(SyntaxKind::Identifier) && p.nth(1) == SyntaxKind::Equals {
        // `using Alias = Some.Name;`
        p.bump();
        p.bump();
    }
    types::name(p);
    p.expect(SyntaxKind::Semicolon);
    p.finish_node();
}

fn namespace_declaration(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::NamespaceDeclaration);
    p.bump();
    if p.at(SyntaxKind::Identifier) {
        types::name(p);
    } else {
        p.missing_name(DiagnosticCode::IdentifierExpected);
    }
    p.expect(SyntaxKind::OpenBrace);
    loop {
        match p.current() {
            SyntaxKind::Eof | SyntaxKind::CloseBrace => break,
            _ => {
                let before = p.pos;
                top_level_item(p);
                p.force_progress(before, MEMBER_RECOVERY);
            }
        }
    }
    p.expect(SyntaxKind::CloseBrace);
    p.eat(SyntaxKind::Semicolon);
    p.finish_node();
}

/// One member: attribute lists, modifiers, then the declaration proper.
/// Attributes and modifiers end up inside the declaration node via the
/// checkpoint.
fn member(p: &mut Parser<'_>) {
    let checkpoint = p.checkpoint();
    attribute_lists(p);
    modifiers(p);
    match p.current() {
        SyntaxKind::ClassKw | SyntaxKind::StructKw | SyntaxKind::InterfaceKw => {
            type_declaration(p, checkpoint);
        }
        SyntaxKind::EnumKw => enum_declaration(p, checkpoint),
        SyntaxKind::DelegateKw if p.nth(1) != SyntaxKind::Asterisk => {
            delegate_declaration(p, checkpoint);
        }
        _ => member_with_type(p, checkpoint),
    }
}

fn attribute_lists(p: &mut Parser<'_>) {
    while p.at(SyntaxKind::OpenBracket) {
        p.start_node(SyntaxKind::AttributeList);
        p.bump();
        p.comma_list(
            CLOSE_BRACKET,
            types::LIST_TERMINATORS,
            false,
            |p| p.at(SyntaxKind::Identifier),
            attribute,
            |p| {
                p.start_node(SyntaxKind::Attribute);
                p.missing_name(DiagnosticCode::IdentifierExpected);
                p.finish_node();
            },
        );
        p.expect(SyntaxKind::CloseBracket);
        p.finish_node();
    }
}

fn attribute(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::Attribute);
    types::name(p);
    if p.at(SyntaxKind::OpenParen) {
        expr::argument_list(p);
    }
    p.finish_node();
}

/// Consume modifier keywords, reporting repeats. The set of modifiers the
/// declaration kind actually allows is a semantic question; shape is kept
/// either way.
fn modifiers(p: &mut Parser<'_>) {
    let mut seen: Vec<SyntaxKind> = Vec::new();
    while p.current().is_modifier() {
        let kind = p.current();
        if seen.contains(&kind) {
            p.error_on_current(DiagnosticCode::DuplicateModifier);
        } else {
            seen.push(kind);
        }
        p.bump();
    }
}

fn type_declaration(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    let node = match p.current() {
        SyntaxKind::ClassKw => SyntaxKind::ClassDeclaration,
        SyntaxKind::StructKw => SyntaxKind::StructDeclaration,
        _ => SyntaxKind::InterfaceDeclaration,
    };
    p.start_node_at(checkpoint, node);
    p.bump();
    declared_name(p);
    if p.at(SyntaxKind::LessThan) {
        type_parameter_list(p);
    }
    if p.at(SyntaxKind::Colon) {
        base_list(p);
    }
    while p.at_contextual("where") {
        constraint_clause(p);
    }
    p.expect(SyntaxKind::OpenBrace);
    loop {
        let kind = p.current();
        if kind == SyntaxKind::Eof || kind == SyntaxKind::CloseBrace {
            break;
        }
        let before = p.pos;
        if at_member_start(p) {
            member(p);
        } else {
            p.skip_until(MEMBER_RECOVERY);
        }
        p.force_progress(before, MEMBER_RECOVERY);
    }
    p.expect(SyntaxKind::CloseBrace);
    p.eat(SyntaxKind::Semicolon);
    p.finish_node();
}

fn at_member_start(p: &mut Parser<'_>) -> bool {
    let kind = p.current();
    kind.is_modifier()
        || kind.starts_type_declaration()
        || kind.is_predefined_type_keyword()
        || matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::OpenBracket
                | SyntaxKind::DelegateKw
                | SyntaxKind::UsingKw
                | SyntaxKind::OpenParen
        )
}

fn declared_name(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::Identifier) {
        p.bump();
    } else {
        p.missing_name(DiagnosticCode::IdentifierExpected);
    }
}

fn type_parameter_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TypeParameterList);
    p.expect(SyntaxKind::LessThan);
    p.comma_list(
        TokenSet::new(&[SyntaxKind::GreaterThan]),
        types::LIST_TERMINATORS,
        false,
        |p| p.at(SyntaxKind::Identifier),
        |p| {
            p.start_node(SyntaxKind::TypeParameter);
            p.bump();
            p.finish_node();
        },
        |p| {
            p.start_node(SyntaxKind::TypeParameter);
            p.missing_name(DiagnosticCode::IdentifierExpected);
            p.finish_node();
        },
    );
    p.expect(SyntaxKind::GreaterThan);
    p.finish_node();
}

/// `: Base, IOther` — no closer of its own; the body's `{` (or a `where`
/// clause) ends it. A base-type-start right after a base type means only
/// the comma was lost.
fn base_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::BaseList);
    p.bump();
    base_type_list(p);
    p.finish_node();
}

/// `where T : Constraint, Other`.
fn constraint_clause(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ConstraintClause);
    p.bump();
    declared_name(p);
    p.expect(SyntaxKind::Colon);
    base_type_list(p);
    p.finish_node();
}

fn can_start_base_type(p: &mut Parser<'_>) -> bool {
    !p.at_contextual("where") && types::can_start_type(p)
}

/// The comma-list loop specialized for base types and constraints, whose
/// follow includes the contextual `where` that a `TokenSet` cannot name.
fn base_type_list(p: &mut Parser<'_>) {
    let done = |p: &mut Parser<'_>| {
        let kind = p.current();
        kind == SyntaxKind::Eof
            || OPEN_BRACE.contains(kind)
            || types::LIST_TERMINATORS.contains(kind)
            || p.at_contextual("where")
    };
    loop {
        if can_start_base_type(p) {
            types::type_(p);
        } else {
            p.missing_name(DiagnosticCode::TypeExpected);
        }
        if p.at(SyntaxKind::Comma) {
            p.bump();
            if done(p) {
                p.missing_name(DiagnosticCode::TypeExpected);
                break;
            }
            continue;
        }
        if done(p) {
            break;
        }
        if can_start_base_type(p) {
            p.expect_separator_comma();
            continue;
        }
        let range = p.current_range();
        p.error(
            crate::diagnostics::Diagnostic::new(DiagnosticCode::ExpectedToken, range)
                .with_arg(SyntaxKind::Comma.token_display()),
        );
        p.skip_until_quiet(BASE_LIST_SKIP_RECOVERY);
        if !p.at(SyntaxKind::Comma) {
            break;
        }
    }
}

const BASE_LIST_SKIP_RECOVERY: TokenSet = TokenSet::new(&[
    SyntaxKind::Comma,
    SyntaxKind::OpenBrace,
    SyntaxKind::CloseBrace,
    SyntaxKind::Semicolon,
    SyntaxKind::Identifier,
    SyntaxKind::ClassKw,
    SyntaxKind::StructKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::EnumKw,
    SyntaxKind::NamespaceKw,
]);

fn enum_declaration(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    p.start_node_at(checkpoint, SyntaxKind::EnumDeclaration);
    p.bump();
    declared_name(p);
    if p.at(SyntaxKind::Colon) {
        base_list(p);
    }
    p.expect(SyntaxKind::OpenBrace);
    p.comma_list(
        CLOSE_BRACE,
        TokenSet::new(&[
            SyntaxKind::Semicolon,
            SyntaxKind::ClassKw,
            SyntaxKind::StructKw,
            SyntaxKind::InterfaceKw,
            SyntaxKind::EnumKw,
            SyntaxKind::NamespaceKw,
        ]),
        true,
        |p| p.at(SyntaxKind::Identifier) || p.at(SyntaxKind::OpenBracket),
        enum_member,
        |p| {
            p.start_node(SyntaxKind::EnumMemberDeclaration);
            p.missing_name(DiagnosticCode::IdentifierExpected);
            p.finish_node();
        },
    );
    p.expect(SyntaxKind::CloseBrace);
    p.eat(SyntaxKind::Semicolon);
    p.finish_node();
}

fn enum_member(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::EnumMemberDeclaration);
    attribute_lists(p);
    declared_name(p);
    if p.at(SyntaxKind::Equals) {
        p.start_node(SyntaxKind::EqualsValueClause);
        p.bump();
        if expr::can_start_expression(p) {
            expr::expression(p);
        } else {
            p.missing_name(DiagnosticCode::ExpressionExpected);
        }
        p.finish_node();
    }
    p.finish_node();
}

fn delegate_declaration(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    p.start_node_at(checkpoint, SyntaxKind::DelegateDeclaration);
    p.bump();
    types::type_(p);
    declared_name(p);
    if p.at(SyntaxKind::LessThan) {
        type_parameter_list(p);
    }
    parameter_list(p);
    while p.at_contextual("where") {
        constraint_clause(p);
    }
    p.expect(SyntaxKind::Semicolon);
    p.finish_node();
}

/// Field, method, constructor, or property — decided by a pure scan over
/// what follows the type.
fn member_with_type(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    if p.at(SyntaxKind::Identifier) && p.nth(1) == SyntaxKind::OpenParen {
        constructor_declaration(p, checkpoint);
        return;
    }
    let mut s = Scanner::new(p);
    let shape = if crate::parser::lookahead::scan_type(&mut s) && s.peek() == SyntaxKind::Identifier
    {
        s.bump();
        match s.peek() {
            SyntaxKind::OpenParen | SyntaxKind::LessThan => MemberShape::Method,
            SyntaxKind::OpenBrace => MemberShape::Property,
            _ => MemberShape::Field,
        }
    } else {
        MemberShape::Field
    };
    match shape {
        MemberShape::Field => {
            p.start_node_at(checkpoint, SyntaxKind::FieldDeclaration);
            stmt::variable_declaration(p);
            p.expect(SyntaxKind::Semicolon);
            p.finish_node();
        }
        MemberShape::Method => method_declaration(p, checkpoint),
        MemberShape::Property => {
            p.start_node_at(checkpoint, SyntaxKind::PropertyDeclaration);
            types::type_(p);
            declared_name(p);
            accessor_list(p);
            p.finish_node();
        }
    }
}

#[derive(Clone, Copy)]
enum MemberShape {
    Field,
    Method,
    Property,
}

fn constructor_declaration(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    p.start_node_at(checkpoint, SyntaxKind::ConstructorDeclaration);
    p.bump();
    parameter_list(p);
    if p.at(SyntaxKind::OpenBrace) {
        stmt::block(p);
    } else {
        p.expect(SyntaxKind::Semicolon);
    }
    p.finish_node();
}

fn method_declaration(p: &mut Parser<'_>, checkpoint: rowan::Checkpoint) {
    p.start_node_at(checkpoint, SyntaxKind::MethodDeclaration);
    types::type_(p);
    declared_name(p);
    if p.at(SyntaxKind::LessThan) {
        type_parameter_list(p);
    }
    parameter_list(p);
    while p.at_contextual("where") {
        constraint_clause(p);
    }
    if p.at(SyntaxKind::OpenBrace) {
        stmt::block(p);
    } else {
        p.expect(SyntaxKind::Semicolon);
    }
    p.finish_node();
}

pub(crate) fn parameter_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ParameterList);
    p.expect(SyntaxKind::OpenParen);
    p.comma_list(
        CLOSE_PAREN,
        types::LIST_TERMINATORS,
        false,
        can_start_parameter,
        parameter,
        |p| {
            p.start_node(SyntaxKind::Parameter);
            p.missing_name(DiagnosticCode::IdentifierExpected);
            p.finish_node();
        },
    );
    p.expect(SyntaxKind::CloseParen);
    p.finish_node();
}

fn can_start_parameter(p: &mut Parser<'_>) -> bool {
    matches!(
        p.current(),
        SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::ParamsKw | SyntaxKind::OpenBracket
    ) || types::can_start_type(p)
}

fn parameter(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::Parameter);
    attribute_lists(p);
    while matches!(
        p.current(),
        SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::ParamsKw
    ) {
        p.bump();
    }
    types::type_(p);
    declared_name(p);
    if p.at(SyntaxKind::Equals) {
        p.start_node(SyntaxKind::EqualsValueClause);
        p.bump();
        if expr::can_start_expression(p) {
            expr::expression(p);
        } else {
            p.missing_name(DiagnosticCode::ExpressionExpected);
        }
        p.finish_node();
    }
    p.finish_node();
}

/// `{ get; set; }`, accessors optionally modified or block-bodied.
fn accessor_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::AccessorList);
    p.expect(SyntaxKind::OpenBrace);
    loop {
        if p.current().is_modifier() || p.at_contextual("get") || p.at_contextual("set") {
            accessor(p);
        } else {
            break;
        }
    }
    p.expect(SyntaxKind::CloseBrace);
    p.finish_node();
}

fn accessor(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::AccessorDeclaration);
    modifiers(p);
    if p.at_contextual("get") || p.at_contextual("set") {
        p.bump();
    } else {
        p.missing_name(DiagnosticCode::IdentifierExpected);
    }
    if p.at(SyntaxKind::OpenBrace) {
        stmt::block(p);
    } else {
        p.expect(SyntaxKind::Semicolon);
    }
    p.finish_node();
}
