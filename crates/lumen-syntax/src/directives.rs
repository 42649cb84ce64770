//! Directive sub-parser.
//!
//! Directive lines (`#!`, `#:`, `#if`/`#elif`/`#else`/`#endif`) are trivia
//! at the grammar level: the main parser's trivia pump hands them here, and
//! each line becomes a small structured node emitted before the token it
//! precedes (or before end-of-input). The sub-parser also owns the per-parse
//! [`DirectiveState`] machine that enforces ordering rules:
//!
//! - `#!` is only legal before anything else in the file;
//! - `#:` is feature-gated, must precede the first significant token, and
//!   must precede any conditional directive — permanently: once an `#if`
//!   has been seen, `#:` stays illegal even after the matching `#endif`;
//! - `#elif`/`#else`/`#endif` must pair with an open `#if`, and unclosed
//!   `#if`s are reported at end of input.
//!
//! Conditions on `#if`/`#elif` are preserved verbatim as directive text and
//! are not evaluated; both arms of a conditional parse normally.

use rowan::{TextRange, TextSize};

use crate::ParseOptions;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Per-parse directive ordering state. Created at the start of a parse and
/// discarded with it; never shared between parses.
#[derive(Debug)]
pub(crate) struct DirectiveState {
    conditional_stack: Vec<BranchFrame>,
    any_conditional_seen: bool,
    first_token_seen: bool,
    any_directive_seen: bool,
    allow_ignored: bool,
}

#[derive(Debug)]
struct BranchFrame {
    else_seen: bool,
}

impl DirectiveState {
    pub(crate) fn new(options: &ParseOptions) -> Self {
        Self {
            conditional_stack: Vec::new(),
            any_conditional_seen: false,
            first_token_seen: false,
            any_directive_seen: false,
            allow_ignored: options.allow_ignored_directives,
        }
    }

    /// Called for every significant token entering the tree. The transition
    /// is permanent by design.
    pub(crate) fn note_token_consumed(&mut self) {
        self.first_token_seen = true;
    }

    /// End-of-parse check: every `#if` still open gets one diagnostic at the
    /// end-of-input position.
    pub(crate) fn finish(&mut self, eof: TextSize, diagnostics: &mut Vec<Diagnostic>) {
        for _ in self.conditional_stack.drain(..) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::EndifExpected,
                TextRange::empty(eof),
            ));
        }
    }
}

/// Parse one directive line. The current raw token is a directive marker;
/// the whole line (marker, name, text, terminating newline) is consumed
/// into a single directive node.
pub(crate) fn parse_directive(p: &mut Parser<'_>) {
    let marker = p.tokens[p.pos];
    match marker.kind {
        SyntaxKind::HashBang => parse_shebang(p, marker.range),
        SyntaxKind::HashColon => parse_ignored(p, marker.range),
        SyntaxKind::Hash => parse_hash(p, marker.range),
        other => unreachable!("parse_directive on non-marker {other:?}"),
    }
    p.directives.any_directive_seen = true;
}

fn parse_shebang(p: &mut Parser<'_>, marker: TextRange) {
    let legal = !p.directives.first_token_seen && !p.directives.any_directive_seen;
    let kind = if legal {
        SyntaxKind::ShebangDirective
    } else {
        p.error(Diagnostic::new(DiagnosticCode::ShebangNotFirst, marker));
        SyntaxKind::BadDirective
    };
    p.start_node(kind);
    p.emit_raw();
    consume_rest_of_line(p);
    p.finish_node();
}

fn parse_ignored(p: &mut Parser<'_>, marker: TextRange) {
    // The distinguishing marker character: the `:` of `#:`.
    let colon = TextRange::at(marker.start() + TextSize::from(1), TextSize::from(1));
    if p.directives.any_conditional_seen {
        p.error(Diagnostic::new(
            DiagnosticCode::IgnoredDirectiveAfterConditional,
            colon,
        ));
    } else if p.directives.first_token_seen {
        p.error(Diagnostic::new(
            DiagnosticCode::IgnoredDirectiveAfterToken,
            colon,
        ));
    } else if !p.directives.allow_ignored {
        p.error(Diagnostic::new(
            DiagnosticCode::IgnoredDirectiveDisabled,
            colon,
        ));
    }
    // The directive parses structurally either way; an empty message is a
    // valid terminal state, not an error.
    p.start_node(SyntaxKind::IgnoredDirective);
    p.emit_raw();
    consume_rest_of_line(p);
    p.finish_node();
}

fn parse_hash(p: &mut Parser<'_>, marker: TextRange) {
    let name = directive_name(p);
    let (kind, diagnostic) = match name.as_deref() {
        Some("if") => {
            p.directives.conditional_stack.push(BranchFrame { else_seen: false });
            p.directives.any_conditional_seen = true;
            (SyntaxKind::IfDirective, None)
        }
        Some("elif") => {
            let dangling = match p.directives.conditional_stack.last() {
                None => true,
                Some(frame) => frame.else_seen,
            };
            (
                SyntaxKind::ElifDirective,
                dangling.then_some(DiagnosticCode::UnexpectedDirective),
            )
        }
        Some("else") => {
            let dangling = match p.directives.conditional_stack.last_mut() {
                None => true,
                Some(frame) if frame.else_seen => true,
                Some(frame) => {
                    frame.else_seen = true;
                    false
                }
            };
            (
                SyntaxKind::ElseDirective,
                dangling.then_some(DiagnosticCode::UnexpectedDirective),
            )
        }
        Some("endif") => {
            let dangling = p.directives.conditional_stack.pop().is_none();
            (
                SyntaxKind::EndifDirective,
                dangling.then_some(DiagnosticCode::UnexpectedDirective),
            )
        }
        _ => (SyntaxKind::BadDirective, Some(DiagnosticCode::DirectiveExpected)),
    };
    if let Some(code) = diagnostic {
        p.error(Diagnostic::new(code, marker));
    }
    p.start_node(kind);
    p.emit_raw();
    consume_rest_of_line(p);
    p.finish_node();
}

/// Peek the directive's name word without consuming anything.
fn directive_name(p: &Parser<'_>) -> Option<String> {
    let mut idx = p.pos + 1;
    if p.tokens.get(idx).is_some_and(|t| t.kind == SyntaxKind::Whitespace) {
        idx += 1;
    }
    let token = p.tokens.get(idx)?;
    (token.kind == SyntaxKind::DirectiveName).then(|| token.text(p.source).to_string())
}

/// Consume the remainder of the directive line, including its newline, into
/// the open directive node.
fn consume_rest_of_line(p: &mut Parser<'_>) {
    loop {
        let kind = p.tokens[p.pos].kind;
        match kind {
            SyntaxKind::Whitespace
            | SyntaxKind::DirectiveName
            | SyntaxKind::DirectiveText => p.emit_raw(),
            SyntaxKind::Newline => {
                p.emit_raw();
                break;
            }
            _ => break,
        }
    }
}
