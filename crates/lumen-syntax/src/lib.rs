//! Lumen Syntax
//!
//! Error-tolerant parsing core for the Lumen language: a hand-written
//! recursive-descent parser producing lossless rowan syntax trees.
//!
//! Parsing is *total*: every input string, well-formed or not, yields a
//! complete tree whose text reproduces the input byte-for-byte, plus an
//! ordered list of [`Diagnostic`] values. Missing required tokens are
//! synthesized as zero-width tokens of the right kind; tokens no rule wants
//! are preserved verbatim under `SkippedTokens` nodes.

pub mod ast;
pub mod diagnostics;
mod directives;
pub mod language;
mod lexer;
mod parser;
pub mod syntax_kind;

use rowan::GreenNode;
use thiserror::Error;

pub use crate::diagnostics::{Diagnostic, DiagnosticCode};
pub use crate::language::{LumenLanguage, SyntaxElement, SyntaxNode, SyntaxToken};
pub use crate::syntax_kind::SyntaxKind;

use crate::parser::RootKind;

/// Immutable configuration for one parse invocation. Threaded explicitly
/// through the parser; never process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Recognize `#:` ignored-metadata directives. When off they still
    /// parse structurally but carry a feature-required diagnostic.
    pub allow_ignored_directives: bool,
}

/// Errors raised before parsing starts. There is no error path *during*
/// parsing; malformed input produces diagnostics, not `Err`.
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("source is {0} bytes; trees address at most u32::MAX")]
    SourceTooLarge(usize),
}

/// The result of a parse: the green tree plus its diagnostics.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// Root of the tree. The returned node owns the whole subtree; its
    /// `text()` is exactly the input source.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// All diagnostics, sorted by position (stable for equal positions).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse a whole source file.
pub fn parse_compilation_unit(source: &str, options: &ParseOptions) -> Result<Parse, SyntaxError> {
    parse(source, options, RootKind::CompilationUnit)
}

/// Parse a single statement (embedding starting context).
pub fn parse_statement(source: &str, options: &ParseOptions) -> Result<Parse, SyntaxError> {
    parse(source, options, RootKind::Statement)
}

/// Parse a single expression (embedding starting context).
pub fn parse_expression(source: &str, options: &ParseOptions) -> Result<Parse, SyntaxError> {
    parse(source, options, RootKind::Expression)
}

/// Parse a single type (embedding starting context).
pub fn parse_type(source: &str, options: &ParseOptions) -> Result<Parse, SyntaxError> {
    parse(source, options, RootKind::Type)
}

fn parse(source: &str, options: &ParseOptions, root: RootKind) -> Result<Parse, SyntaxError> {
    if source.len() > u32::MAX as usize {
        return Err(SyntaxError::SourceTooLarge(source.len()));
    }
    let (green, diagnostics) = parser::parse_root(source, options, root);
    tracing::debug!(
        bytes = source.len(),
        diagnostics = diagnostics.len(),
        "parsed {:?} root",
        root
    );
    Ok(Parse { green, diagnostics })
}

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lumen=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
