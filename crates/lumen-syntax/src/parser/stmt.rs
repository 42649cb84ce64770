//! Statement grammar.
//!
//! The one real ambiguity here is declaration versus expression at a
//! statement head (`A * b;`, `A < B > c;`); `lookahead::looks_like_declaration`
//! decides it with a pure scan and the parse then commits.

use crate::diagnostics::DiagnosticCode;
use crate::parser::{Parser, TokenSet, expr, lookahead, types};
use crate::syntax_kind::SyntaxKind;

/// Resynchronization points when a statement head makes no sense: statement
/// boundaries, block boundaries, declaration keywords, and tokens that can
/// begin a new statement, so a junk run ends as soon as real code resumes.
const STATEMENT_RECOVERY: TokenSet = TokenSet::new(&[
    SyntaxKind::Semicolon,
    SyntaxKind::OpenBrace,
    SyntaxKind::CloseBrace,
    SyntaxKind::Identifier,
    SyntaxKind::IntLiteral,
    SyntaxKind::RealLiteral,
    SyntaxKind::StringLiteral,
    SyntaxKind::CharLiteral,
    SyntaxKind::NewKw,
    SyntaxKind::ThisKw,
    SyntaxKind::BaseKw,
    SyntaxKind::IfKw,
    SyntaxKind::WhileKw,
    SyntaxKind::DoKw,
    SyntaxKind::ForKw,
    SyntaxKind::ForeachKw,
    SyntaxKind::ReturnKw,
    SyntaxKind::BreakKw,
    SyntaxKind::ContinueKw,
    SyntaxKind::ThrowKw,
    SyntaxKind::TryKw,
    SyntaxKind::ClassKw,
    SyntaxKind::StructKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::EnumKw,
    SyntaxKind::NamespaceKw,
]);

pub(crate) fn statement(p: &mut Parser<'_>) {
    match p.current() {
        SyntaxKind::OpenBrace => block(p),
        SyntaxKind::Semicolon => {
            p.start_node(SyntaxKind::EmptyStatement);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::IfKw => if_statement(p),
        SyntaxKind::WhileKw => while_statement(p),
        SyntaxKind::DoKw => do_statement(p),
        SyntaxKind::ForKw => for_statement(p),
        SyntaxKind::ForeachKw => foreach_statement(p),
        SyntaxKind::ReturnKw | SyntaxKind::ThrowKw => {
            let node = if p.at(SyntaxKind::ReturnKw) {
                SyntaxKind::ReturnStatement
            } else {
                SyntaxKind::ThrowStatement
            };
            p.start_node(node);
            p.bump();
            if expr::can_start_expression(p) {
                expr::expression(p);
            }
            p.expect(SyntaxKind::Semicolon);
            p.finish_node();
        }
        SyntaxKind::BreakKw | SyntaxKind::ContinueKw => {
            let node = if p.at(SyntaxKind::BreakKw) {
                SyntaxKind::BreakStatement
            } else {
                SyntaxKind::ContinueStatement
            };
            p.start_node(node);
            p.bump();
            p.expect(SyntaxKind::Semicolon);
            p.finish_node();
        }
        SyntaxKind::TryKw => try_statement(p),
        SyntaxKind::ConstKw => {
            p.start_node(SyntaxKind::LocalDeclarationStatement);
            p.bump();
            variable_declaration(p);
            p.expect(SyntaxKind::Semicolon);
            p.finish_node();
        }
        _ if lookahead::looks_like_declaration(p) => {
            p.start_node(SyntaxKind::LocalDeclarationStatement);
            variable_declaration(p);
            p.expect(SyntaxKind::Semicolon);
            p.finish_node();
        }
        _ if expr::can_start_expression(p) => {
            p.start_node(SyntaxKind::ExpressionStatement);
            expr::expression(p);
            p.expect(SyntaxKind::Semicolon);
            p.finish_node();
        }
        _ => p.skip_until(STATEMENT_RECOVERY),
    }
}

fn can_start_statement(p: &mut Parser<'_>) -> bool {
    matches!(
        p.current(),
        SyntaxKind::OpenBrace
            | SyntaxKind::Semicolon
            | SyntaxKind::IfKw
            | SyntaxKind::WhileKw
            | SyntaxKind::DoKw
            | SyntaxKind::ForKw
            | SyntaxKind::ForeachKw
            | SyntaxKind::ReturnKw
            | SyntaxKind::ThrowKw
            | SyntaxKind::BreakKw
            | SyntaxKind::ContinueKw
            | SyntaxKind::TryKw
            | SyntaxKind::ConstKw
    ) || expr::can_start_expression(p)
        || lookahead::looks_like_declaration(p)
}

/// Body position of `if`/`while`/`for`/...: the child is required, so when
/// nothing statement-like is present a zero-width expression statement
/// holds the slot and the junk is left for the enclosing loop.
fn embedded_statement(p: &mut Parser<'_>) {
    if can_start_statement(p) {
        statement(p);
    } else {
        p.start_node(SyntaxKind::ExpressionStatement);
        p.missing_name(DiagnosticCode::ExpressionExpected);
        p.missing(SyntaxKind::Semicolon);
        p.finish_node();
    }
}

pub(crate) fn block(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::Block);
    p.expect(SyntaxKind::OpenBrace);
    loop {
        let kind = p.current();
        if kind == SyntaxKind::CloseBrace
            || kind == SyntaxKind::Eof
            // A declaration keyword abandons the block; the enclosing
            // member loop picks it up as a new declaration.
            || kind.starts_type_declaration()
        {
            break;
        }
        let before = p.pos;
        statement(p);
        p.force_progress(before, STATEMENT_RECOVERY);
    }
    p.expect(SyntaxKind::CloseBrace);
    p.finish_node();
}

/// `T a = 1, b` — the type plus one or more declarators. Shared with field
/// declarations and `for` initializers.
pub(crate) fn variable_declaration(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::VariableDeclaration);
    types::type_(p);
    loop {
        variable_declarator(p);
        if !p.at(SyntaxKind::Comma) {
            break;
        }
        p.bump();
        if !p.at(SyntaxKind::Identifier) {
            variable_declarator(p);
            break;
        }
    }
    p.finish_node();
}

fn variable_declarator(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::VariableDeclarator);
    if p.at(SyntaxKind::Identifier) {
        p.bump();
    } else {
        p.missing_name(DiagnosticCode::IdentifierExpected);
    }
    if p.at(SyntaxKind::Equals) {
        p.start_node(SyntaxKind::EqualsValueClause);
        p.bump();
        if p.at(SyntaxKind::OpenBrace) {
            expr::initializer_expression(p);
        } else if expr::can_start_expression(p) {
            expr::expression(p);
        } else {
            p.missing_name(DiagnosticCode::ExpressionExpected);
        }
        p.finish_node();
    }
    p.finish_node();
}

fn parenthesized_condition(p: &mut Parser<'_>) {
    p.expect(SyntaxKind::OpenParen);
    expr::expression(p);
    p.expect(SyntaxKind::CloseParen);
}

fn if_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::IfStatement);
    p.bump();
    parenthesized_condition(p);
    embedded_statement(p);
    if p.at(SyntaxKind::ElseKw) {
        p.start_node(SyntaxKind::ElseClause);
        p.bump();
        embedded_statement(p);
        p.finish_node();
    }
    p.finish_node();
}

fn while_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::WhileStatement);
    p.bump();
    parenthesized_condition(p);
    embedded_statement(p);
    p.finish_node();
}

fn do_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::DoStatement);
    p.bump();
    embedded_statement(p);
    p.expect(SyntaxKind::WhileKw);
    parenthesized_condition(p);
    p.expect(SyntaxKind::Semicolon);
    p.finish_node();
}

fn for_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ForStatement);
    p.bump();
    p.expect(SyntaxKind::OpenParen);
    if !p.at(SyntaxKind::Semicolon) {
        if lookahead::looks_like_declaration(p) {
            variable_declaration(p);
        } else {
            expression_list(p);
        }
    }
    p.expect(SyntaxKind::Semicolon);
    if expr::can_start_expression(p) {
        expr::expression(p);
    }
    p.expect(SyntaxKind::Semicolon);
    if expr::can_start_expression(p) {
        expression_list(p);
    }
    p.expect(SyntaxKind::CloseParen);
    embedded_statement(p);
    p.finish_node();
}

/// Comma-separated expressions in a `for` clause.
fn expression_list(p: &mut Parser<'_>) {
    if !expr::can_start_expression(p) {
        return;
    }
    loop {
        expr::expression(p);
        if !p.at(SyntaxKind::Comma) {
            break;
        }
        p.bump();
        if !expr::can_start_expression(p) {
            p.missing_name(DiagnosticCode::ExpressionExpected);
            break;
        }
    }
}

fn foreach_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ForeachStatement);
    p.bump();
    p.expect(SyntaxKind::OpenParen);
    types::type_(p);
    if p.at(SyntaxKind::Identifier) {
        p.bump();
    } else {
        p.missing_name(DiagnosticCode::IdentifierExpected);
    }
    p.expect(SyntaxKind::InKw);
    expr::expression(p);
    p.expect(SyntaxKind::CloseParen);
    embedded_statement(p);
    p.finish_node();
}

fn try_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TryStatement);
    p.bump();
    block(p);
    // A catch-all clause must come last; later clauses still parse, each
    // tagged with a diagnostic.
    let mut catch_all_seen = false;
    while p.at(SyntaxKind::CatchKw) {
        if catch_all_seen {
            p.error_on_current(DiagnosticCode::TooManyCatches);
        }
        catch_all_seen |= catch_clause(p);
    }
    if p.at(SyntaxKind::FinallyKw) {
        p.start_node(SyntaxKind::FinallyClause);
        p.bump();
        block(p);
        p.finish_node();
    }
    p.finish_node();
}

/// Parses one catch clause; returns true for the declaration-less
/// catch-all form.
fn catch_clause(p: &mut Parser<'_>) -> bool {
    p.start_node(SyntaxKind::CatchClause);
    p.bump();
    let catch_all = !p.at(SyntaxKind::OpenParen);
    if !catch_all {
        p.start_node(SyntaxKind::CatchDeclaration);
        p.bump();
        types::type_(p);
        if p.at(SyntaxKind::Identifier) {
            p.bump();
        }
        p.expect(SyntaxKind::CloseParen);
        p.finish_node();
    }
    block(p);
    p.finish_node();
    catch_all
}
