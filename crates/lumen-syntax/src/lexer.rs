//! Trivia-preserving lexer.
//!
//! Produces the flat token stream the parser consumes. Unlike a compiler
//! lexer that discards whitespace, every character of the input lands in
//! exactly one token — whitespace, newlines, and comments become trivia
//! tokens — which is what makes lossless round-tripping possible.
//!
//! Directive lines are tokenized specially: when `#` is the first
//! non-whitespace character of a line, the lexer emits a marker token
//! (`#`, `#!`, or `#:`), an optional [`SyntaxKind::DirectiveName`], and the
//! raw remainder of the line as [`SyntaxKind::DirectiveText`]. The directive
//! sub-parser gives these runs structure; the lexer only delimits them.

use rowan::{TextRange, TextSize};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::syntax_kind::{SyntaxKind, keyword_kind};

/// One lexed token. Text is a slice of the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[usize::from(self.range.start())..usize::from(self.range.end())]
    }
}

/// Lex `source` into tokens plus lexical diagnostics.
///
/// The returned stream always ends with a zero-width [`SyntaxKind::Eof`]
/// token, so the parser can treat end-of-input as an ordinary token kind.
pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer {
        source,
        pos: 0,
        tokens: Vec::new(),
        diagnostics: Vec::new(),
        at_line_start: true,
    };
    lexer.run();
    (lexer.tokens, lexer.diagnostics)
}

struct Lexer<'s> {
    source: &'s str,
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    /// Only whitespace seen since the last newline. Directives are
    /// recognized in this position only.
    at_line_start: bool,
}

impl<'s> Lexer<'s> {
    fn run(&mut self) {
        while self.pos < self.source.len() {
            self.next_token();
        }
        let end = TextSize::from(self.source.len() as u32);
        self.tokens.push(Token {
            kind: SyntaxKind::Eof,
            range: TextRange::empty(end),
        });
    }

    fn next_token(&mut self) {
        let start = self.pos;
        let c = self.peek_char().expect("next_token called at end of input");

        match c {
            '\n' => {
                self.pos += 1;
                self.push(SyntaxKind::Newline, start);
                self.at_line_start = true;
            }
            '\r' => {
                self.pos += 1;
                if self.peek_char() == Some('\n') {
                    self.pos += 1;
                }
                self.push(SyntaxKind::Newline, start);
                self.at_line_start = true;
            }
            c if c.is_whitespace() => {
                self.eat_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                self.push(SyntaxKind::Whitespace, start);
                // Leading whitespace does not disqualify a directive line.
            }
            '/' => {
                self.lex_slash(start);
                self.at_line_start = false;
            }
            '#' if self.at_line_start => {
                self.lex_directive_line(start);
                // The trailing newline is lexed by the main loop and resets
                // the flag; anything else on the line was consumed here.
                self.at_line_start = false;
            }
            '"' => {
                self.lex_string(start);
                self.at_line_start = false;
            }
            '\'' => {
                self.lex_char(start);
                self.at_line_start = false;
            }
            c if c.is_ascii_digit() => {
                self.lex_number(start);
                self.at_line_start = false;
            }
            c if is_identifier_start(c) => {
                self.eat_while(is_identifier_continue);
                let text = &self.source[start..self.pos];
                let kind = keyword_kind(text).unwrap_or(SyntaxKind::Identifier);
                self.push(kind, start);
                self.at_line_start = false;
            }
            _ => {
                self.lex_punctuation(start, c);
                self.at_line_start = false;
            }
        }
    }

    fn lex_slash(&mut self, start: usize) {
        if self.source[self.pos..].starts_with("//") {
            self.eat_while(|c| c != '\n' && c != '\r');
            self.push(SyntaxKind::LineComment, start);
        } else if self.source[self.pos..].starts_with("/*") {
            self.pos += 2;
            match self.source[self.pos..].find("*/") {
                Some(rel) => self.pos += rel + 2,
                None => {
                    self.pos = self.source.len();
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticCode::UnterminatedComment,
                        self.range_from(start),
                    ));
                }
            }
            self.push(SyntaxKind::BlockComment, start);
        } else if self.source[self.pos..].starts_with("/=") {
            self.pos += 2;
            self.push(SyntaxKind::SlashEquals, start);
        } else {
            self.pos += 1;
            self.push(SyntaxKind::Slash, start);
        }
    }

    /// Tokenize one directive line: marker, optional name, raw remainder.
    fn lex_directive_line(&mut self, start: usize) {
        let rest = &self.source[self.pos..];
        if rest.starts_with("#!") {
            self.pos += 2;
            self.push(SyntaxKind::HashBang, start);
            self.lex_directive_text();
            return;
        }
        if rest.starts_with("#:") {
            self.pos += 2;
            self.push(SyntaxKind::HashColon, start);
            self.lex_directive_name();
            self.lex_directive_text();
            return;
        }
        self.pos += 1;
        self.push(SyntaxKind::Hash, start);
        let ws_start = self.pos;
        self.eat_while(|c| c == ' ' || c == '\t');
        if self.pos > ws_start {
            self.push(SyntaxKind::Whitespace, ws_start);
        }
        self.lex_directive_name();
        self.lex_directive_text();
    }

    /// A directive name is the first word after the marker, if any.
    fn lex_directive_name(&mut self) {
        let start = self.pos;
        self.eat_while(|c| !c.is_whitespace());
        if self.pos > start {
            self.push(SyntaxKind::DirectiveName, start);
        }
    }

    /// Everything else on the line, verbatim, including interior whitespace.
    fn lex_directive_text(&mut self) {
        let start = self.pos;
        self.eat_while(|c| c != '\n' && c != '\r');
        if self.pos > start {
            self.push(SyntaxKind::DirectiveText, start);
        }
    }

    fn lex_string(&mut self, start: usize) {
        self.pos += 1;
        let mut terminated = false;
        while let Some(c) = self.peek_char() {
            match c {
                '"' => {
                    self.pos += 1;
                    terminated = true;
                    break;
                }
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                '\n' | '\r' => break,
                _ => self.pos += c.len_utf8(),
            }
        }
        if !terminated {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticCode::UnterminatedString,
                self.range_from(start),
            ));
        }
        self.push(SyntaxKind::StringLiteral, start);
    }

    fn lex_char(&mut self, start: usize) {
        self.pos += 1;
        let mut terminated = false;
        while let Some(c) = self.peek_char() {
            match c {
                '\'' => {
                    self.pos += 1;
                    terminated = true;
                    break;
                }
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                '\n' | '\r' => break,
                _ => self.pos += c.len_utf8(),
            }
        }
        if !terminated {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticCode::UnterminatedCharacter,
                self.range_from(start),
            ));
        }
        self.push(SyntaxKind::CharLiteral, start);
    }

    fn lex_number(&mut self, start: usize) {
        let mut kind = SyntaxKind::IntLiteral;
        if self.source[self.pos..].starts_with("0x") || self.source[self.pos..].starts_with("0X") {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
            // A dot only continues the number when a digit follows, so that
            // `1.ToString()` keeps its member access.
            if self.peek_char() == Some('.')
                && self
                    .peek_char_at(1)
                    .is_some_and(|c| c.is_ascii_digit())
            {
                kind = SyntaxKind::RealLiteral;
                self.pos += 1;
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                let mut ahead = 1;
                if matches!(self.peek_char_at(1), Some('+' | '-')) {
                    ahead = 2;
                }
                if self.peek_char_at(ahead).is_some_and(|c| c.is_ascii_digit()) {
                    kind = SyntaxKind::RealLiteral;
                    self.pos += ahead;
                    self.eat_while(|c| c.is_ascii_digit());
                }
            }
        }
        // Numeric suffixes are consumed but not validated here.
        if let Some(c) = self.peek_char() {
            match c {
                'f' | 'F' | 'd' | 'D' | 'm' | 'M' => {
                    kind = SyntaxKind::RealLiteral;
                    self.pos += 1;
                }
                'l' | 'L' | 'u' | 'U' => {
                    self.pos += 1;
                    if matches!(self.peek_char(), Some('l' | 'L' | 'u' | 'U')) {
                        self.pos += 1;
                    }
                }
                _ => {}
            }
        }
        self.push(kind, start);
    }

    fn lex_punctuation(&mut self, start: usize, c: char) {
        use SyntaxKind::*;
        let rest = &self.source[self.pos..];
        // Longest match first. `>>` is deliberately not a single token: the
        // parser pairs adjacent `>` tokens itself so that nested type
        // argument lists like `List<List<int>>` close without re-lexing.
        let (kind, len) = match c {
            '(' => (OpenParen, 1),
            ')' => (CloseParen, 1),
            '[' => (OpenBracket, 1),
            ']' => (CloseBracket, 1),
            '{' => (OpenBrace, 1),
            '}' => (CloseBrace, 1),
            ';' => (Semicolon, 1),
            ',' => (Comma, 1),
            ':' => (Colon, 1),
            '.' => (Dot, 1),
            '~' => (Tilde, 1),
            '<' if rest.starts_with("<<=") => (LessThanLessThanEquals, 3),
            '<' if rest.starts_with("<<") => (LessThanLessThan, 2),
            '<' if rest.starts_with("<=") => (LessThanEquals, 2),
            '<' => (LessThan, 1),
            '>' if rest.starts_with(">=") => (GreaterThanEquals, 2),
            '>' => (GreaterThan, 1),
            '=' if rest.starts_with("==") => (EqualsEquals, 2),
            '=' if rest.starts_with("=>") => (EqualsGreaterThan, 2),
            '=' => (Equals, 1),
            '!' if rest.starts_with("!=") => (ExclamationEquals, 2),
            '!' => (Exclamation, 1),
            '&' if rest.starts_with("&&") => (AmpersandAmpersand, 2),
            '&' if rest.starts_with("&=") => (AmpersandEquals, 2),
            '&' => (Ampersand, 1),
            '|' if rest.starts_with("||") => (BarBar, 2),
            '|' if rest.starts_with("|=") => (BarEquals, 2),
            '|' => (Bar, 1),
            '^' if rest.starts_with("^=") => (CaretEquals, 2),
            '^' => (Caret, 1),
            '+' if rest.starts_with("++") => (PlusPlus, 2),
            '+' if rest.starts_with("+=") => (PlusEquals, 2),
            '+' => (Plus, 1),
            '-' if rest.starts_with("--") => (MinusMinus, 2),
            '-' if rest.starts_with("-=") => (MinusEquals, 2),
            '-' if rest.starts_with("->") => (MinusGreaterThan, 2),
            '-' => (Minus, 1),
            '*' if rest.starts_with("*=") => (AsteriskEquals, 2),
            '*' => (Asterisk, 1),
            '%' if rest.starts_with("%=") => (PercentEquals, 2),
            '%' => (Percent, 1),
            '?' if rest.starts_with("??=") => (QuestionQuestionEquals, 3),
            '?' if rest.starts_with("??") => (QuestionQuestion, 2),
            '?' if rest.starts_with("?.") => (QuestionDot, 2),
            '?' => (Question, 1),
            other => {
                self.pos += other.len_utf8();
                self.push(SyntaxKind::ErrorToken, start);
                self.diagnostics.push(
                    Diagnostic::new(DiagnosticCode::UnexpectedCharacter, self.range_from(start))
                        .with_arg(other.to_string()),
                );
                return;
            }
        };
        self.pos += len;
        self.push(kind, start);
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn range_from(&self, start: usize) -> TextRange {
        TextRange::new(
            TextSize::from(start as u32),
            TextSize::from(self.pos as u32),
        )
    }

    fn push(&mut self, kind: SyntaxKind, start: usize) {
        let range = self.range_from(start);
        self.tokens.push(Token { kind, range });
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        lex(source).0.iter().map(|t| t.kind).collect()
    }

    fn texts<'s>(source: &'s str) -> Vec<(SyntaxKind, &'s str)> {
        lex(source)
            .0
            .iter()
            .map(|t| (t.kind, t.text(source)))
            .collect()
    }

    #[test]
    fn every_byte_lands_in_a_token() {
        let source = "class C { int x = 0x1F; } // done\r\n/* block */\t'a' \"s\\\"t\"";
        let (tokens, _) = lex(source);
        let total: u32 = tokens.iter().map(|t| u32::from(t.range.len())).sum();
        assert_eq!(total as usize, source.len());
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("class Goo"),
            vec![
                SyntaxKind::ClassKw,
                SyntaxKind::Whitespace,
                SyntaxKind::Identifier,
                SyntaxKind::Eof,
            ]
        );
        // Contextual query words stay identifiers.
        assert_eq!(kinds("from")[0], SyntaxKind::Identifier);
        assert_eq!(kinds("var")[0], SyntaxKind::Identifier);
    }

    #[test]
    fn compound_operators_longest_match() {
        assert_eq!(
            kinds("<<= ?? ??= ?. => != ->"),
            vec![
                SyntaxKind::LessThanLessThanEquals,
                SyntaxKind::Whitespace,
                SyntaxKind::QuestionQuestion,
                SyntaxKind::Whitespace,
                SyntaxKind::QuestionQuestionEquals,
                SyntaxKind::Whitespace,
                SyntaxKind::QuestionDot,
                SyntaxKind::Whitespace,
                SyntaxKind::EqualsGreaterThan,
                SyntaxKind::Whitespace,
                SyntaxKind::ExclamationEquals,
                SyntaxKind::Whitespace,
                SyntaxKind::MinusGreaterThan,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn greater_than_never_fuses() {
        // The parser pairs adjacent `>` itself; the lexer must not.
        assert_eq!(
            kinds(">>"),
            vec![SyntaxKind::GreaterThan, SyntaxKind::GreaterThan, SyntaxKind::Eof]
        );
        assert_eq!(
            kinds(">>=")[..2],
            [SyntaxKind::GreaterThan, SyntaxKind::GreaterThanEquals]
        );
    }

    #[test]
    fn crlf_is_one_newline_token() {
        assert_eq!(
            texts("a\r\nb"),
            vec![
                (SyntaxKind::Identifier, "a"),
                (SyntaxKind::Newline, "\r\n"),
                (SyntaxKind::Identifier, "b"),
                (SyntaxKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("42")[0], SyntaxKind::IntLiteral);
        assert_eq!(kinds("0xFF_0")[0], SyntaxKind::IntLiteral);
        assert_eq!(kinds("1.5")[0], SyntaxKind::RealLiteral);
        assert_eq!(kinds("1e10")[0], SyntaxKind::RealLiteral);
        assert_eq!(kinds("2.5e-3f")[0], SyntaxKind::RealLiteral);
        // Member access off a literal keeps the dot.
        assert_eq!(
            kinds("1.ToString")[..3],
            [SyntaxKind::IntLiteral, SyntaxKind::Dot, SyntaxKind::Identifier]
        );
    }

    #[test]
    fn unterminated_block_comment_reports_and_still_round_trips() {
        let source = "a /* never closed";
        let (tokens, diags) = lex(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::UnterminatedComment);
        let total: u32 = tokens.iter().map(|t| u32::from(t.range.len())).sum();
        assert_eq!(total as usize, source.len());
    }

    #[test]
    fn directive_lines_are_delimited() {
        assert_eq!(
            texts("#!xyz\n"),
            vec![
                (SyntaxKind::HashBang, "#!"),
                (SyntaxKind::DirectiveText, "xyz"),
                (SyntaxKind::Newline, "\n"),
                (SyntaxKind::Eof, ""),
            ]
        );
        assert_eq!(
            texts("#:name value\n"),
            vec![
                (SyntaxKind::HashColon, "#:"),
                (SyntaxKind::DirectiveName, "name"),
                (SyntaxKind::DirectiveText, " value"),
                (SyntaxKind::Newline, "\n"),
                (SyntaxKind::Eof, ""),
            ]
        );
        assert_eq!(
            texts("#if DEBUG && X\n"),
            vec![
                (SyntaxKind::Hash, "#"),
                (SyntaxKind::DirectiveName, "if"),
                (SyntaxKind::DirectiveText, " DEBUG && X"),
                (SyntaxKind::Newline, "\n"),
                (SyntaxKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn hash_mid_line_is_not_a_directive() {
        // Directive markers only exist at line starts; a stray mid-line `#`
        // is an ordinary bad character.
        assert_eq!(
            kinds("a #"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Whitespace,
                SyntaxKind::ErrorToken,
                SyntaxKind::Eof,
            ]
        );
        // Indented directives are still directives.
        assert_eq!(kinds("  #endif\n")[1], SyntaxKind::Hash);
    }

    #[test]
    fn empty_directive_has_no_content_tokens() {
        assert_eq!(
            texts("#:\n"),
            vec![
                (SyntaxKind::HashColon, "#:"),
                (SyntaxKind::Newline, "\n"),
                (SyntaxKind::Eof, ""),
            ]
        );
    }
}
