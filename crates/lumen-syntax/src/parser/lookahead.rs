//! Disambiguation scans.
//!
//! Context-sensitive lookahead for the grammatically ambiguous spots:
//! `<` as generic argument list versus comparison, a parenthesized prefix as
//! cast versus lambda parameter list versus ordinary parentheses, and a
//! statement head as declaration versus expression.
//!
//! Every routine here is a pure scan over the parser's token buffer: it
//! moves an index, never the parser, so "restoring" after speculation is
//! simply dropping the scanner. Scans are bounded by the matching closer or
//! the statement terminators, keeping the whole parse linear. The parser
//! commits on a scan's verdict and never revisits it; failures after the
//! commit surface as expected-token diagnostics inside the committed
//! alternative.

use crate::lexer::Token;
use crate::parser::{Parser, is_scan_skipped};
use crate::syntax_kind::SyntaxKind;

/// Immutable cursor over significant tokens, starting at the parser's
/// current position.
#[derive(Clone)]
pub(crate) struct Scanner<'p> {
    tokens: &'p [Token],
    source: &'p str,
    idx: usize,
}

impl<'p> Scanner<'p> {
    pub(crate) fn new(p: &'p Parser<'_>) -> Self {
        let mut scanner = Scanner {
            tokens: &p.tokens,
            source: p.source,
            idx: p.pos,
        };
        scanner.skip_invisible();
        scanner
    }

    fn skip_invisible(&mut self) {
        while self
            .tokens
            .get(self.idx)
            .is_some_and(|t| is_scan_skipped(t.kind))
        {
            self.idx += 1;
        }
    }

    pub(crate) fn peek(&self) -> SyntaxKind {
        self.tokens
            .get(self.idx)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::Eof)
    }

    pub(crate) fn peek_text(&self) -> &'p str {
        self.tokens
            .get(self.idx)
            .map(|t| t.text(self.source))
            .unwrap_or("")
    }

    pub(crate) fn bump(&mut self) {
        if self.idx < self.tokens.len() {
            self.idx += 1;
        }
        self.skip_invisible();
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn at_identifier_like(&self) -> bool {
        self.peek() == SyntaxKind::Identifier
    }
}

/// Scan one type. Returns `true` when a syntactically plausible type was
/// consumed; the scanner is left after it. Mirrors the committed grammar in
/// `types.rs`, permissively.
pub(crate) fn scan_type(s: &mut Scanner<'_>) -> bool {
    if !scan_core_type(s) {
        return false;
    }
    scan_type_suffixes(s);
    true
}

/// Like [`scan_type`] but without `?` and `*` suffixes, for pattern
/// position where `?` belongs to a conditional and `*` to multiplication.
pub(crate) fn scan_pattern_type(s: &mut Scanner<'_>) -> bool {
    if !scan_core_type(s) {
        return false;
    }
    scan_array_suffixes(s);
    true
}

fn scan_core_type(s: &mut Scanner<'_>) -> bool {
    match s.peek() {
        kind if kind.is_predefined_type_keyword() => s.bump(),
        SyntaxKind::Identifier => {
            s.bump();
            if s.peek() == SyntaxKind::LessThan && !scan_type_arguments(s) {
                return false;
            }
            while s.peek() == SyntaxKind::Dot {
                s.bump();
                if !s.at_identifier_like() {
                    return false;
                }
                s.bump();
                if s.peek() == SyntaxKind::LessThan && !scan_type_arguments(s) {
                    return false;
                }
            }
        }
        SyntaxKind::DelegateKw => {
            s.bump();
            if !s.eat(SyntaxKind::Asterisk) {
                return false;
            }
            if s.at_identifier_like() {
                s.bump();
            }
            if !s.eat(SyntaxKind::LessThan) {
                return false;
            }
            loop {
                if !scan_type(s) {
                    return false;
                }
                if s.eat(SyntaxKind::Comma) {
                    continue;
                }
                break;
            }
            if !s.eat(SyntaxKind::GreaterThan) {
                return false;
            }
        }
        SyntaxKind::OpenParen => {
            // Tuple type: at least two elements.
            s.bump();
            let mut elements = 0;
            loop {
                if !scan_type(s) {
                    return false;
                }
                if s.at_identifier_like() {
                    s.bump();
                }
                elements += 1;
                if s.eat(SyntaxKind::Comma) {
                    continue;
                }
                break;
            }
            if elements < 2 || !s.eat(SyntaxKind::CloseParen) {
                return false;
            }
        }
        _ => return false,
    }
    true
}

fn scan_type_suffixes(s: &mut Scanner<'_>) {
    loop {
        match s.peek() {
            SyntaxKind::Question | SyntaxKind::Asterisk => s.bump(),
            SyntaxKind::OpenBracket => {
                if !scan_array_suffixes(s) {
                    return;
                }
            }
            _ => return,
        }
    }
}

fn scan_array_suffixes(s: &mut Scanner<'_>) -> bool {
    let mut any = false;
    while s.peek() == SyntaxKind::OpenBracket {
        let mut probe = s.clone();
        probe.bump();
        while probe.peek() == SyntaxKind::Comma {
            probe.bump();
        }
        if !probe.eat(SyntaxKind::CloseBracket) {
            return any;
        }
        *s = probe;
        any = true;
    }
    any
}

/// From a `<`, scan a plausible type argument list through its matching
/// `>`. Fails fast on tokens no type argument list could contain.
pub(crate) fn scan_type_arguments(s: &mut Scanner<'_>) -> bool {
    if !s.eat(SyntaxKind::LessThan) {
        return false;
    }
    if s.eat(SyntaxKind::GreaterThan) {
        return true;
    }
    loop {
        if !scan_type(s) {
            return false;
        }
        if s.eat(SyntaxKind::Comma) {
            continue;
        }
        return s.eat(SyntaxKind::GreaterThan);
    }
}

/// In an expression, does `name <` begin a generic name rather than a
/// comparison? True only when a plausible type argument list closes and the
/// token after the `>` is consistent with a type usage.
pub(crate) fn at_generic_name_in_expression(p: &Parser<'_>) -> bool {
    let mut s = Scanner::new(p);
    if s.peek() != SyntaxKind::Identifier {
        return false;
    }
    s.bump();
    if s.peek() != SyntaxKind::LessThan {
        return false;
    }
    if !scan_type_arguments(&mut s) {
        return false;
    }
    // The disambiguating follow set: tokens that can follow a generic name
    // but not a parenthesis-free comparison chain.
    matches!(
        s.peek(),
        SyntaxKind::OpenParen
            | SyntaxKind::CloseParen
            | SyntaxKind::CloseBracket
            | SyntaxKind::CloseBrace
            | SyntaxKind::Colon
            | SyntaxKind::Semicolon
            | SyntaxKind::Comma
            | SyntaxKind::Dot
            | SyntaxKind::Question
            | SyntaxKind::EqualsEquals
            | SyntaxKind::ExclamationEquals
            | SyntaxKind::Eof
    )
}

/// Classification of a parenthesized prefix in expression position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParenKind {
    /// `(a, b) => ...` or `() => ...`
    Lambda,
    /// `(T)operand`
    Cast,
    /// Parenthesized expression or tuple expression.
    Other,
}

pub(crate) fn classify_open_paren(p: &Parser<'_>) -> ParenKind {
    let mut s = Scanner::new(p);
    if s.peek() != SyntaxKind::OpenParen {
        return ParenKind::Other;
    }
    if scan_past_matching_paren(s.clone()).peek() == SyntaxKind::EqualsGreaterThan {
        return ParenKind::Lambda;
    }
    // A cast is `(` one type `)` followed by a token a cast operand can
    // start with.
    s.bump();
    if !scan_type(&mut s) {
        return ParenKind::Other;
    }
    if !s.eat(SyntaxKind::CloseParen) {
        return ParenKind::Other;
    }
    if can_follow_cast(&s) {
        ParenKind::Cast
    } else {
        ParenKind::Other
    }
}

fn can_follow_cast(s: &Scanner<'_>) -> bool {
    match s.peek() {
        SyntaxKind::Identifier
        | SyntaxKind::IntLiteral
        | SyntaxKind::RealLiteral
        | SyntaxKind::StringLiteral
        | SyntaxKind::CharLiteral
        | SyntaxKind::OpenParen
        | SyntaxKind::Exclamation
        | SyntaxKind::Tilde
        | SyntaxKind::NewKw
        | SyntaxKind::ThisKw
        | SyntaxKind::BaseKw
        | SyntaxKind::NullKw
        | SyntaxKind::TrueKw
        | SyntaxKind::FalseKw
        | SyntaxKind::TypeofKw
        | SyntaxKind::SizeofKw
        | SyntaxKind::DefaultKw => true,
        kind => kind.is_predefined_type_keyword(),
    }
}

fn scan_past_matching_paren(mut s: Scanner<'_>) -> Scanner<'_> {
    let mut depth = 0u32;
    loop {
        match s.peek() {
            SyntaxKind::OpenParen => depth += 1,
            SyntaxKind::CloseParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    s.bump();
                    return s;
                }
            }
            // A paren interior never spans these; give up at them.
            SyntaxKind::Eof | SyntaxKind::Semicolon | SyntaxKind::OpenBrace
            | SyntaxKind::CloseBrace => return s,
            _ => {}
        }
        s.bump();
    }
}

/// In statement position, does the input begin a local declaration rather
/// than an expression statement? `T x`, `T<A> x`, `T* x`, `T[] x`, and
/// `delegate* ...` commit to a declaration; everything else stays an
/// expression. Pointer declarations win over multiplication, matching the
/// committed-alternative policy.
pub(crate) fn looks_like_declaration(p: &Parser<'_>) -> bool {
    let mut s = Scanner::new(p);
    match s.peek() {
        SyntaxKind::DelegateKw => {
            s.bump();
            return s.peek() == SyntaxKind::Asterisk;
        }
        kind if kind.is_predefined_type_keyword() => {}
        SyntaxKind::Identifier | SyntaxKind::OpenParen => {}
        _ => return false,
    }
    if !scan_type(&mut s) {
        return false;
    }
    if s.peek() != SyntaxKind::Identifier {
        return false;
    }
    s.bump();
    // `a * b()` stays an expression; only declarator continuations commit.
    matches!(
        s.peek(),
        SyntaxKind::Semicolon | SyntaxKind::Equals | SyntaxKind::Comma | SyntaxKind::Eof
    )
}

/// Does `from` here begin a query expression? Requires a plausible range
/// variable (optionally typed) followed by `in`.
pub(crate) fn at_query_expression(p: &Parser<'_>) -> bool {
    let mut s = Scanner::new(p);
    if s.peek() != SyntaxKind::Identifier || s.peek_text() != "from" {
        return false;
    }
    s.bump();
    // `from x in ...`
    let mut untyped = s.clone();
    if untyped.peek() == SyntaxKind::Identifier {
        untyped.bump();
        if untyped.peek() == SyntaxKind::InKw {
            return true;
        }
    }
    // `from T x in ...`
    if !scan_type(&mut s) {
        return false;
    }
    if s.peek() != SyntaxKind::Identifier {
        return false;
    }
    s.bump();
    s.peek() == SyntaxKind::InKw
}
