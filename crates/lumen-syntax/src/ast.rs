//! Typed AST layer over the raw syntax tree.
//!
//! Thin, type-safe wrappers over [`SyntaxNode`]s. Each wrapper implements
//! [`AstNode::cast`] to convert from a raw node; accessors walk children by
//! kind and return `Option`, since under error recovery any child can be a
//! zero-width missing stand-in.

use rowan::TextRange;

use crate::language::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Helper trait for casting syntax nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// Helper function to find first child of a specific kind
fn child_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Helper function to find first token of a specific kind
fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// A token synthesized by recovery: right kind, zero width.
pub fn is_missing(token: &SyntaxToken) -> bool {
    token.text_range().is_empty()
}

/// Exact source text of the subtree, trivia included. Concatenated over the
/// whole tree this reproduces the input byte-for-byte.
pub fn full_text(node: &SyntaxNode) -> String {
    node.text().to_string()
}

/// The subtree's range with leading and trailing trivia trimmed off.
pub fn trimmed_range(node: &SyntaxNode) -> TextRange {
    let significant: Vec<SyntaxToken> = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia() && !t.text_range().is_empty())
        .collect();
    match (significant.first(), significant.last()) {
        (Some(first), Some(last)) => {
            TextRange::new(first.text_range().start(), last.text_range().end())
        }
        _ => TextRange::empty(node.text_range().start()),
    }
}

macro_rules! ast_node {
    ($(#[$attr:meta])* $name:ident: $($kind:ident)|+) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(
    /// Root of a whole-file parse.
    CompilationUnit: CompilationUnit
);

impl CompilationUnit {
    pub fn using_directives(&self) -> impl Iterator<Item = UsingDirective> {
        self.syntax.children().filter_map(UsingDirective::cast)
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> {
        self.syntax.children().filter_map(TypeDeclaration::cast)
    }
}

ast_node!(UsingDirective: UsingDirective);

impl UsingDirective {
    pub fn name(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type_syntax())
    }
}

ast_node!(
    /// A `class`, `struct`, or `interface` declaration.
    TypeDeclaration: ClassDeclaration | StructDeclaration | InterfaceDeclaration
);

impl TypeDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn base_list(&self) -> Option<BaseList> {
        child_of_kind(&self.syntax, SyntaxKind::BaseList).and_then(BaseList::cast)
    }

    pub fn members(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children().filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::FieldDeclaration
                    | SyntaxKind::MethodDeclaration
                    | SyntaxKind::ConstructorDeclaration
                    | SyntaxKind::PropertyDeclaration
                    | SyntaxKind::ClassDeclaration
                    | SyntaxKind::StructDeclaration
                    | SyntaxKind::InterfaceDeclaration
                    | SyntaxKind::EnumDeclaration
                    | SyntaxKind::DelegateDeclaration
            )
        })
    }
}

ast_node!(BaseList: BaseList);

impl BaseList {
    pub fn types(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children().filter(|n| n.kind().is_type_syntax())
    }
}

ast_node!(MethodDeclaration: MethodDeclaration);

impl MethodDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn parameter_list(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::ParameterList)
    }
}

ast_node!(LocalDeclarationStatement: LocalDeclarationStatement);

impl LocalDeclarationStatement {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        child_of_kind(&self.syntax, SyntaxKind::VariableDeclaration)
            .and_then(VariableDeclaration::cast)
    }
}

ast_node!(VariableDeclaration: VariableDeclaration);

impl VariableDeclaration {
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type_syntax())
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> {
        self.syntax.children().filter_map(VariableDeclarator::cast)
    }
}

ast_node!(VariableDeclarator: VariableDeclarator);

impl VariableDeclarator {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Identifier)
    }
}

ast_node!(
    /// `delegate* [conv] <params>`.
    FunctionPointerType: FunctionPointerType
);

impl FunctionPointerType {
    pub fn calling_convention(&self) -> Option<SyntaxToken> {
        child_of_kind(&self.syntax, SyntaxKind::FunctionPointerCallingConvention)
            .and_then(|n| token_of_kind(&n, SyntaxKind::Identifier))
    }

    pub fn parameter_list(&self) -> Option<FunctionPointerParameterList> {
        child_of_kind(&self.syntax, SyntaxKind::FunctionPointerParameterList)
            .and_then(FunctionPointerParameterList::cast)
    }
}

ast_node!(FunctionPointerParameterList: FunctionPointerParameterList);

impl FunctionPointerParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::FunctionPointerParameter)
    }

    pub fn greater_than_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::GreaterThan)
    }
}

/// Indented tree rendering for tests and the CLI: one node or token per
/// line, token text quoted, missing tokens marked.
pub fn debug_dump(node: &SyntaxNode) -> String {
    let mut out = String::new();
    dump_into(&mut out, node, 0);
    out
}

fn dump_into(out: &mut String, node: &SyntaxNode, depth: usize) {
    use std::fmt::Write;

    let _ = writeln!(out, "{}{:?}", "  ".repeat(depth), node.kind());
    for element in node.children_with_tokens() {
        match element {
            rowan::NodeOrToken::Node(child) => dump_into(out, &child, depth + 1),
            rowan::NodeOrToken::Token(token) => {
                let indent = "  ".repeat(depth + 1);
                if is_missing(&token) && !token.kind().is_trivia() {
                    let _ = writeln!(out, "{indent}{:?} (missing)", token.kind());
                } else {
                    let _ = writeln!(out, "{indent}{:?} {:?}", token.kind(), token.text());
                }
            }
        }
    }
}
