//! The recursive-descent parser: token cursor, recovery engine, and entry
//! points.
//!
//! The grammar itself lives in the submodules (`decl`, `stmt`, `expr`,
//! `types`); this module owns the machinery they all share:
//!
//! - a cursor over the lexed token stream with trivia-transparent lookahead,
//! - `expect`, which *always* succeeds: a mismatched required token is
//!   synthesized as a zero-width token of the right kind plus one
//!   diagnostic, so every rule above it can keep building tree shape,
//! - `skip_until`, which moves tokens no rule wants into a
//!   [`SyntaxKind::SkippedTokens`] node — a run of any length produces one
//!   diagnostic,
//! - the uniform separated-list loop every comma list in the grammar uses.
//!
//! Parsing is total: there is no error path out of this module, only
//! diagnostics accumulated beside the tree.

mod decl;
mod expr;
mod lookahead;
mod stmt;
mod types;

#[cfg(test)]
mod tests;

use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};
use tracing::{debug, trace};

use crate::ParseOptions;
use crate::diagnostics::{Diagnostic, DiagnosticCode, sort_diagnostics};
use crate::directives::{self, DirectiveState};
use crate::lexer::{Token, lex};
use crate::syntax_kind::SyntaxKind;

/// Which grammar production the parse starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    CompilationUnit,
    Statement,
    Expression,
    Type,
}

/// Parse `source` from the given starting context.
pub(crate) fn parse_root(
    source: &str,
    options: &ParseOptions,
    root: RootKind,
) -> (GreenNode, Vec<Diagnostic>) {
    debug!(?root, len = source.len(), "parsing");
    let (tokens, diagnostics) = lex(source);
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        builder: GreenNodeBuilder::new(),
        diagnostics,
        directives: DirectiveState::new(options),
    };
    match root {
        RootKind::CompilationUnit => decl::compilation_unit(&mut parser),
        RootKind::Statement => parser.fragment(SyntaxKind::StatementRoot, stmt::statement),
        RootKind::Expression => parser.fragment(SyntaxKind::ExpressionRoot, |p| {
            expr::expression(p);
        }),
        RootKind::Type => parser.fragment(SyntaxKind::TypeRoot, |p| {
            types::type_(p);
        }),
    }
    parser.finish()
}

/// A static set of token kinds, used for recovery boundaries.
#[derive(Clone, Copy)]
pub(crate) struct TokenSet(pub(crate) &'static [SyntaxKind]);

impl TokenSet {
    pub(crate) const fn new(kinds: &'static [SyntaxKind]) -> Self {
        Self(kinds)
    }

    pub(crate) fn contains(self, kind: SyntaxKind) -> bool {
        self.0.contains(&kind)
    }
}

pub(crate) struct Parser<'s> {
    pub(crate) source: &'s str,
    pub(crate) tokens: Vec<Token>,
    /// Index of the next unconsumed token.
    pub(crate) pos: usize,
    pub(crate) builder: GreenNodeBuilder<'static>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) directives: DirectiveState,
}

impl<'s> Parser<'s> {
    // --- Cursor ---

    /// Kind of the current significant token. Flushes pending trivia and
    /// directive lines into the tree first, so the caller's open node picks
    /// them up.
    pub(crate) fn current(&mut self) -> SyntaxKind {
        self.pump_trivia();
        self.tokens[self.pos].kind
    }

    /// Kind of the `n`th significant token ahead (0 = current), without
    /// consuming anything. Trivia and directive-line tokens are transparent.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        let mut idx = self.pos;
        let mut remaining = n;
        loop {
            let token = match self.tokens.get(idx) {
                Some(token) => token,
                None => return SyntaxKind::Eof,
            };
            if is_scan_skipped(token.kind) {
                idx += 1;
                continue;
            }
            if remaining == 0 {
                return token.kind;
            }
            remaining -= 1;
            idx += 1;
        }
    }

    pub(crate) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_eof(&mut self) -> bool {
        self.at(SyntaxKind::Eof)
    }

    /// True when the current token is the identifier `word`. Used for
    /// contextual keywords (`var`, `from`, `where`, ...).
    pub(crate) fn at_contextual(&mut self, word: &str) -> bool {
        self.at(SyntaxKind::Identifier) && self.current_token().text(self.source) == word
    }

    /// True when the current token is `first` and the very next token is
    /// `second` with no characters between them. The lexer never fuses `>`
    /// into compound tokens, so `>>` and `>>=` are recognized here by
    /// adjacency instead.
    pub(crate) fn at_adjacent(&mut self, first: SyntaxKind, second: SyntaxKind) -> bool {
        if !self.at(first) {
            return false;
        }
        let a = self.tokens[self.pos];
        self.tokens
            .get(self.pos + 1)
            .is_some_and(|b| b.kind == second && b.range.start() == a.range.end())
    }

    fn current_token(&mut self) -> Token {
        self.pump_trivia();
        self.tokens[self.pos]
    }

    pub(crate) fn current_range(&mut self) -> TextRange {
        self.current_token().range
    }

    pub(crate) fn current_start(&mut self) -> TextSize {
        self.current_range().start()
    }

    // --- Consumption ---

    /// Consume the current significant token into the tree.
    pub(crate) fn bump(&mut self) {
        self.pump_trivia();
        debug_assert!(self.tokens[self.pos].kind != SyntaxKind::Eof, "bumped EOF");
        self.emit_raw();
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Require a token of `kind`. On mismatch, synthesize a zero-width
    /// missing token of that kind and report one diagnostic at the current
    /// position; no input is consumed.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        trace!(?kind, at = ?self.current(), "missing token synthesized");
        let range = TextRange::empty(self.current_start());
        self.diagnostics.push(
            Diagnostic::new(DiagnosticCode::ExpectedToken, range).with_arg(kind.token_display()),
        );
        self.builder.token(kind.into(), "");
        false
    }

    /// Emit a zero-width missing token without a diagnostic. Used when one
    /// diagnostic already covers several synthesized tokens.
    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.builder.token(kind.into(), "");
    }

    /// Emit a zero-width `IdentifierName` placeholder node plus a
    /// diagnostic. This is the "missing node" every rule that requires a
    /// name, type, or expression falls back on, keeping node arity fixed.
    pub(crate) fn missing_name(&mut self, code: DiagnosticCode) {
        let range = TextRange::empty(self.current_start());
        self.diagnostics.push(Diagnostic::new(code, range));
        self.builder.start_node(SyntaxKind::IdentifierName.into());
        self.builder.token(SyntaxKind::Identifier.into(), "");
        self.builder.finish_node();
    }

    /// Move tokens into a `SkippedTokens` node until a recovery point,
    /// reporting one `UnexpectedToken` diagnostic for the whole run.
    pub(crate) fn skip_until(&mut self, recovery: TokenSet) {
        let Some(range) = self.start_skip(recovery) else {
            return;
        };
        let text = self.tokens[self.pos].text(self.source).to_string();
        self.diagnostics.push(
            Diagnostic::new(DiagnosticCode::UnexpectedToken, range).with_arg(text),
        );
        self.run_skip(recovery);
    }

    /// Like [`Parser::skip_until`], but without its own diagnostic; the
    /// caller has already reported what is wrong (e.g. a missing comma).
    pub(crate) fn skip_until_quiet(&mut self, recovery: TokenSet) {
        if self.start_skip(recovery).is_some() {
            self.run_skip(recovery);
        }
    }

    fn start_skip(&mut self, recovery: TokenSet) -> Option<TextRange> {
        let kind = self.current();
        if kind == SyntaxKind::Eof || recovery.contains(kind) {
            return None;
        }
        trace!(at = ?kind, "skipping unexpected tokens");
        Some(self.current_range())
    }

    fn run_skip(&mut self, recovery: TokenSet) {
        self.builder.start_node(SyntaxKind::SkippedTokens.into());
        loop {
            let token = self.tokens[self.pos];
            if token.kind == SyntaxKind::Eof {
                break;
            }
            if token.kind.is_trivia() {
                self.emit_raw();
                continue;
            }
            if token.kind.is_directive_marker() {
                directives::parse_directive(self);
                continue;
            }
            if recovery.contains(token.kind) {
                break;
            }
            self.emit_raw();
        }
        self.builder.finish_node();
    }

    /// Guarantee forward progress in a loop whose body consumed nothing:
    /// skip at least one token, then resynchronize.
    pub(crate) fn force_progress(&mut self, before: usize, recovery: TokenSet) {
        if self.pos != before || self.at_eof() {
            return;
        }
        let range = self.current_range();
        let text = self.tokens[self.pos].text(self.source).to_string();
        self.diagnostics.push(
            Diagnostic::new(DiagnosticCode::UnexpectedToken, range).with_arg(text),
        );
        self.builder.start_node(SyntaxKind::SkippedTokens.into());
        self.emit_raw();
        self.builder.finish_node();
        self.skip_until_quiet(recovery);
    }

    // --- Tree building ---

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// A checkpoint for wrapping already-built siblings into a node later
    /// (`start_node_at`). Pending trivia is flushed first so it stays
    /// outside the wrapped node.
    pub(crate) fn checkpoint(&mut self) -> rowan::Checkpoint {
        self.pump_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(crate) fn error(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report `"',' expected"` as a zero-width diagnostic at the current
    /// position, consuming nothing. The missing-separator case of every
    /// comma list.
    pub(crate) fn expect_separator_comma(&mut self) {
        let range = TextRange::empty(self.current_start());
        self.diagnostics.push(
            Diagnostic::new(DiagnosticCode::ExpectedToken, range)
                .with_arg(SyntaxKind::Comma.token_display()),
        );
    }

    /// Report `code` with the current token's span and text as argument 0.
    pub(crate) fn error_on_current(&mut self, code: DiagnosticCode) {
        let range = self.current_range();
        let text = self.tokens[self.pos].text(self.source).to_string();
        self.diagnostics
            .push(Diagnostic::new(code, range).with_arg(text));
    }

    // --- Trivia and directives ---

    /// Flush trivia tokens, and parse any directive lines, up to the next
    /// significant token. Directive nodes land before the token they
    /// precede, in the node currently open.
    pub(crate) fn pump_trivia(&mut self) {
        loop {
            let kind = self.tokens[self.pos].kind;
            if kind.is_trivia() {
                self.emit_raw();
            } else if kind.is_directive_marker() {
                directives::parse_directive(self);
            } else {
                break;
            }
        }
    }

    /// Emit the token at `pos` verbatim and advance. The single funnel
    /// through which source text enters the tree.
    pub(crate) fn emit_raw(&mut self) {
        let token = self.tokens[self.pos];
        debug_assert!(token.kind != SyntaxKind::Eof, "EOF is emitted by finish_up");
        if is_significant(token.kind) {
            self.directives.note_token_consumed();
        }
        self.builder.token(token.kind.into(), token.text(self.source));
        self.pos += 1;
    }

    // --- Separated lists ---

    /// The uniform comma-list loop (parameters, arguments, type arguments,
    /// enum members, base types, initializer members, ordering keys).
    ///
    /// Recovery policy, pinned by the crate's tests:
    /// - an element-start token right after an element means a missing
    ///   separator: report `',' expected` and keep parsing elements;
    /// - junk after an element also reports `',' expected`, is skipped
    ///   quietly, and *ends* the list unless the skip stopped at a comma;
    /// - a trailing comma synthesizes a missing element, unless
    ///   `allow_trailing_comma` (enum members, initializers).
    pub(crate) fn comma_list(
        &mut self,
        close: TokenSet,
        terminators: TokenSet,
        allow_trailing_comma: bool,
        can_start: fn(&mut Parser<'_>) -> bool,
        parse_element: fn(&mut Parser<'_>),
        missing_element: fn(&mut Parser<'_>),
    ) {
        let done = |p: &mut Parser<'_>| {
            let kind = p.current();
            kind == SyntaxKind::Eof || close.contains(kind) || terminators.contains(kind)
        };
        if done(self) {
            return;
        }
        if !can_start(self) && !self.at(SyntaxKind::Comma) {
            return;
        }
        loop {
            if can_start(self) {
                parse_element(self);
            } else {
                // Comma-led list or a comma run: each gap is an element.
                missing_element(self);
            }
            if self.at(SyntaxKind::Comma) {
                self.bump();
                if done(self) {
                    if !allow_trailing_comma {
                        missing_element(self);
                    }
                    break;
                }
                continue;
            }
            if done(self) {
                break;
            }
            if can_start(self) {
                // Missing separator between two elements.
                self.expect_separator_comma();
                continue;
            }
            // Junk that cannot start an element.
            let range = self.current_range();
            self.diagnostics.push(
                Diagnostic::new(DiagnosticCode::ExpectedToken, range)
                    .with_arg(SyntaxKind::Comma.token_display()),
            );
            self.skip_junk_in_list(close, terminators, can_start);
            if self.at(SyntaxKind::Comma) {
                continue;
            }
            break;
        }
    }

    /// Quiet skip inside a list: stops at separators, closers, enclosing
    /// terminators, or anything that could start a new element.
    fn skip_junk_in_list(
        &mut self,
        close: TokenSet,
        terminators: TokenSet,
        can_start: fn(&mut Parser<'_>) -> bool,
    ) {
        let kind = self.current();
        if kind == SyntaxKind::Eof
            || kind == SyntaxKind::Comma
            || close.contains(kind)
            || terminators.contains(kind)
            || can_start(self)
        {
            return;
        }
        self.builder.start_node(SyntaxKind::SkippedTokens.into());
        loop {
            let token = self.tokens[self.pos];
            if token.kind.is_trivia() {
                self.emit_raw();
                continue;
            }
            if token.kind.is_directive_marker() {
                directives::parse_directive(self);
                continue;
            }
            if token.kind == SyntaxKind::Eof
                || token.kind == SyntaxKind::Comma
                || close.contains(token.kind)
                || terminators.contains(token.kind)
            {
                break;
            }
            self.emit_raw();
            if can_start(self) {
                break;
            }
        }
        self.builder.finish_node();
    }

    // --- Roots ---

    fn fragment(&mut self, kind: SyntaxKind, parse: fn(&mut Parser<'_>)) {
        self.start_node(kind);
        parse(self);
        self.finish_up();
    }

    /// Common tail of every root: sweep trailing junk, attach remaining
    /// trivia and directives to the end-of-input token, emit that token, and
    /// close the root node.
    pub(crate) fn finish_up(&mut self) {
        if !self.at_eof() {
            self.skip_until(TokenSet::new(&[]));
        }
        self.pump_trivia();
        let eof = self.current_start();
        self.directives.finish(eof, &mut self.diagnostics);
        self.builder.token(SyntaxKind::Eof.into(), "");
        self.builder.finish_node();
    }

    fn finish(mut self) -> (GreenNode, Vec<Diagnostic>) {
        sort_diagnostics(&mut self.diagnostics);
        (self.builder.finish(), self.diagnostics)
    }
}

/// Token kinds that lookahead treats as invisible: trivia plus the tokens
/// making up directive lines.
pub(crate) fn is_scan_skipped(kind: SyntaxKind) -> bool {
    kind.is_trivia()
        || kind.is_directive_marker()
        || matches!(kind, SyntaxKind::DirectiveName | SyntaxKind::DirectiveText)
}

/// Tokens whose consumption flips the directive machinery into its
/// "after first token" state.
fn is_significant(kind: SyntaxKind) -> bool {
    !is_scan_skipped(kind) && kind != SyntaxKind::Eof
}
