//! Rowan language implementation for Lumen.
//!
//! Connects [`SyntaxKind`] to Rowan's generic green/red tree infrastructure.

use rowan::Language;

use crate::syntax_kind::SyntaxKind;

/// Zero-sized marker tying [`SyntaxKind`] to Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LumenLanguage;

impl Language for LumenLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Out-of-range values can only come from a tree this crate did not
        // build; surface them as error tokens instead of panicking.
        match SyntaxKind::from_raw(raw.0) {
            Some(kind) => kind,
            None => {
                tracing::warn!(raw = raw.0, "unknown syntax kind");
                SyntaxKind::ErrorToken
            }
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        LumenLanguage::kind_to_raw(kind)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<LumenLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<LumenLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<LumenLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<LumenLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_raw() {
        let kinds = [
            SyntaxKind::Whitespace,
            SyntaxKind::ClassKw,
            SyntaxKind::Identifier,
            SyntaxKind::CompilationUnit,
            SyntaxKind::FunctionPointerType,
            SyntaxKind::SkippedTokens,
        ];
        for &kind in &kinds {
            let raw = LumenLanguage::kind_to_raw(kind);
            assert_eq!(LumenLanguage::kind_from_raw(raw), kind);
        }
    }

    #[test]
    fn out_of_range_raw_maps_to_error_token() {
        let raw = rowan::SyntaxKind(u16::MAX);
        assert_eq!(LumenLanguage::kind_from_raw(raw), SyntaxKind::ErrorToken);
    }
}
