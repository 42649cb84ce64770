//! Diagnostic model for the parser.
//!
//! Diagnostics are plain values accumulated during a parse and returned next
//! to the tree; they never abort parsing. Each diagnostic carries a closed
//! code, a source span, and the arguments its message template is formatted
//! with, so callers can compare diagnostics structurally or render them.

use serde::Serialize;

use crate::language::SyntaxNode;

/// Closed set of diagnostic codes the parser can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// A required token was absent; a zero-width token was synthesized.
    /// Argument 0 is the display text of the expected token.
    ExpectedToken,
    /// An identifier was required.
    IdentifierExpected,
    /// An expression was required.
    ExpressionExpected,
    /// A type was required.
    TypeExpected,
    /// Input no grammar rule wanted; the offending run was moved into
    /// skipped-token trivia. One per run, however long.
    UnexpectedToken,
    /// The same modifier appears twice on one declaration.
    DuplicateModifier,
    /// A catch clause follows a catch-all catch clause.
    TooManyCatches,
    /// A `#` line that is not a recognized directive.
    DirectiveExpected,
    /// A shebang line after the start of the file.
    ShebangNotFirst,
    /// `#:` directive seen while the feature flag is off.
    IgnoredDirectiveDisabled,
    /// `#:` directive after the first significant token.
    IgnoredDirectiveAfterToken,
    /// `#:` directive after a conditional directive was opened.
    IgnoredDirectiveAfterConditional,
    /// `#elif`/`#else`/`#endif` without a matching open `#if`.
    UnexpectedDirective,
    /// `#if` left unclosed at end of input.
    EndifExpected,
    /// Lexical errors surfaced by the token stream.
    UnterminatedString,
    UnterminatedCharacter,
    UnterminatedComment,
    UnexpectedCharacter,
}

impl DiagnosticCode {
    /// Message template; `{0}`, `{1}`, ... are replaced with the arguments.
    pub fn template(self) -> &'static str {
        match self {
            DiagnosticCode::ExpectedToken => "syntax error, '{0}' expected",
            DiagnosticCode::IdentifierExpected => "identifier expected",
            DiagnosticCode::ExpressionExpected => "expression expected",
            DiagnosticCode::TypeExpected => "type expected",
            DiagnosticCode::UnexpectedToken => "unexpected token '{0}'",
            DiagnosticCode::DuplicateModifier => "duplicate '{0}' modifier",
            DiagnosticCode::TooManyCatches => {
                "a previous catch clause already catches all exceptions"
            }
            DiagnosticCode::DirectiveExpected => "preprocessor directive expected",
            DiagnosticCode::ShebangNotFirst => {
                "'#!' may only appear as the first line of a file"
            }
            DiagnosticCode::IgnoredDirectiveDisabled => {
                "'#:' directives require the ignored-directives feature"
            }
            DiagnosticCode::IgnoredDirectiveAfterToken => {
                "'#:' directives must appear before the first token"
            }
            DiagnosticCode::IgnoredDirectiveAfterConditional => {
                "'#:' directives cannot follow '#if'"
            }
            DiagnosticCode::UnexpectedDirective => "unexpected preprocessor directive",
            DiagnosticCode::EndifExpected => "'#endif' directive expected",
            DiagnosticCode::UnterminatedString => "unterminated string literal",
            DiagnosticCode::UnterminatedCharacter => "unterminated character literal",
            DiagnosticCode::UnterminatedComment => "unterminated block comment",
            DiagnosticCode::UnexpectedCharacter => "unexpected character '{0}'",
        }
    }
}

/// One parser or lexer diagnostic: code, span, and formatting arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    /// Byte offset of the span start.
    pub start: u32,
    /// Byte length; zero for point diagnostics such as a missing token.
    pub length: u32,
    pub args: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, range: rowan::TextRange) -> Self {
        Self {
            code,
            start: range.start().into(),
            length: range.len().into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn range(&self) -> rowan::TextRange {
        rowan::TextRange::at(self.start.into(), self.length.into())
    }

    /// Render the message by substituting arguments into the code's template.
    pub fn message(&self) -> String {
        let mut message = self.code.template().to_string();
        for (i, arg) in self.args.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), arg);
        }
        message
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.message(), self.start, self.start + self.length)
    }
}

/// Stable position sort; diagnostics at the same offset keep emission order.
pub(crate) fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| d.start);
}

/// Diagnostics whose span lies inside the given subtree, in source order.
pub fn diagnostics_in<'d>(
    node: &SyntaxNode,
    diagnostics: &'d [Diagnostic],
) -> Vec<&'d Diagnostic> {
    let range = node.text_range();
    diagnostics
        .iter()
        .filter(|d| range.contains_range(d.range()))
        .collect()
}

/// Fast dirty-region check for incremental callers.
pub fn contains_diagnostics(node: &SyntaxNode, diagnostics: &[Diagnostic]) -> bool {
    let range = node.text_range();
    diagnostics.iter().any(|d| range.contains_range(d.range()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::{TextRange, TextSize};

    #[test]
    fn message_substitutes_args() {
        let d = Diagnostic::new(
            DiagnosticCode::ExpectedToken,
            TextRange::at(TextSize::from(4), TextSize::from(0)),
        )
        .with_arg(",");
        assert_eq!(d.message(), "syntax error, ',' expected");
        assert_eq!(d.range(), TextRange::at(4.into(), 0.into()));
    }

    #[test]
    fn sort_is_stable_for_equal_offsets() {
        let at = |start: u32, code| Diagnostic {
            code,
            start,
            length: 0,
            args: Vec::new(),
        };
        let mut diags = vec![
            at(9, DiagnosticCode::IdentifierExpected),
            at(3, DiagnosticCode::ExpectedToken),
            at(3, DiagnosticCode::UnexpectedToken),
        ];
        sort_diagnostics(&mut diags);
        assert_eq!(
            diags.iter().map(|d| (d.start, d.code)).collect::<Vec<_>>(),
            vec![
                (3, DiagnosticCode::ExpectedToken),
                (3, DiagnosticCode::UnexpectedToken),
                (9, DiagnosticCode::IdentifierExpected),
            ]
        );
    }
}
