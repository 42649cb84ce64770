//! The closed set of token and node kinds for the Lumen grammar.
//!
//! Every leaf token and every interior node of the syntax tree is tagged with
//! exactly one `SyntaxKind`. The enum is `repr(u16)` with contiguous
//! discriminants so kinds convert losslessly to and from
//! [`rowan::SyntaxKind`]; see `language.rs` for the conversion.

/// Defines [`SyntaxKind`] together with `ALL_KINDS`, the table mapping each
/// raw discriminant back to its variant. Listing the variants once keeps
/// the two in lockstep.
macro_rules! syntax_kinds {
    ($($(#[$attr:meta])* $kind:ident,)+) => {
        /// Syntax kind for tokens and nodes.
        ///
        /// Variants are grouped: trivia first, then punctuation, keywords,
        /// literals, directive tokens, and finally node kinds. `__Last` is a
        /// marker and never appears in a tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($(#[$attr])* $kind,)+
            #[doc(hidden)]
            __Last,
        }

        /// Every kind in discriminant order; `ALL_KINDS[k as usize] == k`.
        const ALL_KINDS: &[SyntaxKind] = &[$(SyntaxKind::$kind,)+];
    };
}

syntax_kinds! {
    // --- Trivia tokens ---
    Whitespace,
    Newline,
    LineComment,
    BlockComment,

    // --- Punctuation tokens ---
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
    LessThanLessThan,
    LessThanLessThanEquals,
    EqualsEquals,
    ExclamationEquals,
    Ampersand,
    AmpersandAmpersand,
    AmpersandEquals,
    Bar,
    BarBar,
    BarEquals,
    Caret,
    CaretEquals,
    Exclamation,
    Tilde,
    Plus,
    PlusPlus,
    PlusEquals,
    Minus,
    MinusMinus,
    MinusEquals,
    MinusGreaterThan,
    Asterisk,
    AsteriskEquals,
    Slash,
    SlashEquals,
    Percent,
    PercentEquals,
    Equals,
    EqualsGreaterThan,
    Question,
    QuestionQuestion,
    QuestionQuestionEquals,
    QuestionDot,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Hash,
    HashBang,
    HashColon,

    // --- Keyword tokens ---
    ClassKw,
    StructKw,
    InterfaceKw,
    EnumKw,
    NamespaceKw,
    UsingKw,
    DelegateKw,
    PublicKw,
    PrivateKw,
    ProtectedKw,
    InternalKw,
    StaticKw,
    AbstractKw,
    SealedKw,
    VirtualKw,
    OverrideKw,
    ReadonlyKw,
    PartialKw,
    UnsafeKw,
    ConstKw,
    NewKw,
    ReturnKw,
    IfKw,
    ElseKw,
    WhileKw,
    DoKw,
    ForKw,
    ForeachKw,
    InKw,
    BreakKw,
    ContinueKw,
    TryKw,
    CatchKw,
    FinallyKw,
    ThrowKw,
    ThisKw,
    BaseKw,
    NullKw,
    TrueKw,
    FalseKw,
    TypeofKw,
    SizeofKw,
    DefaultKw,
    IsKw,
    AsKw,
    RefKw,
    OutKw,
    ParamsKw,
    VoidKw,
    BoolKw,
    ByteKw,
    SbyteKw,
    ShortKw,
    UshortKw,
    IntKw,
    UintKw,
    LongKw,
    UlongKw,
    FloatKw,
    DoubleKw,
    DecimalKw,
    CharKw,
    StringKw,
    ObjectKw,

    // --- Literal and identifier tokens ---
    Identifier,
    IntLiteral,
    RealLiteral,
    StringLiteral,
    CharLiteral,

    // --- Directive-line tokens ---
    DirectiveName,
    DirectiveText,

    // --- Special tokens ---
    ErrorToken,
    Eof,

    // --- Root nodes ---
    CompilationUnit,
    ExpressionRoot,
    StatementRoot,
    TypeRoot,

    // --- Declaration nodes ---
    UsingDirective,
    NamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    DelegateDeclaration,
    EnumMemberDeclaration,
    FieldDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    PropertyDeclaration,
    AccessorList,
    AccessorDeclaration,
    AttributeList,
    Attribute,
    TypeParameterList,
    TypeParameter,
    ConstraintClause,
    BaseList,
    ParameterList,
    Parameter,
    VariableDeclaration,
    VariableDeclarator,
    EqualsValueClause,
    ArgumentList,
    Argument,
    BracketedArgumentList,

    // --- Statement nodes ---
    Block,
    LocalDeclarationStatement,
    ExpressionStatement,
    EmptyStatement,
    IfStatement,
    ElseClause,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForeachStatement,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    CatchDeclaration,
    FinallyClause,

    // --- Type nodes ---
    IdentifierName,
    GenericName,
    QualifiedName,
    TypeArgumentList,
    PredefinedType,
    NullableType,
    PointerType,
    ArrayType,
    ArrayRankSpecifier,
    TupleType,
    TupleTypeElement,
    FunctionPointerType,
    FunctionPointerCallingConvention,
    FunctionPointerParameterList,
    FunctionPointerParameter,

    // --- Expression nodes ---
    LiteralExpression,
    ParenthesizedExpression,
    TupleExpression,
    BinaryExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    CastExpression,
    InvocationExpression,
    ElementAccessExpression,
    MemberAccessExpression,
    ObjectCreationExpression,
    AnonymousObjectCreationExpression,
    AnonymousObjectMemberDeclarator,
    InitializerExpression,
    LambdaExpression,
    LambdaParameterList,
    LambdaParameter,
    DefaultExpression,
    TypeofExpression,
    SizeofExpression,
    ThisExpression,
    BaseExpression,
    IsPatternExpression,

    // --- Pattern nodes ---
    DeclarationPattern,
    ConstantPattern,
    SingleVariableDesignation,

    // --- Query expression nodes ---
    QueryExpression,
    QueryBody,
    FromClause,
    LetClause,
    WhereClause,
    JoinClause,
    OrderByClause,
    Ordering,
    SelectClause,
    GroupClause,
    QueryContinuation,

    // --- Directive nodes ---
    ShebangDirective,
    IgnoredDirective,
    IfDirective,
    ElifDirective,
    ElseDirective,
    EndifDirective,
    BadDirective,

    // --- Recovery nodes ---
    SkippedTokens,
}

impl SyntaxKind {
    /// Variant for a raw discriminant, if in range. Inverse of `kind as u16`.
    pub(crate) fn from_raw(raw: u16) -> Option<SyntaxKind> {
        ALL_KINDS.get(raw as usize).copied()
    }

    /// Whitespace, newlines, and comments. Directive lines are trivia at the
    /// grammar level too, but they surface as structured nodes rather than
    /// bare tokens; see `directives.rs`.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::Newline
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
        )
    }

    /// Token kinds that open a directive line. The lexer only produces these
    /// when `#` is the first non-whitespace character of a line.
    pub fn is_directive_marker(self) -> bool {
        matches!(
            self,
            SyntaxKind::Hash | SyntaxKind::HashBang | SyntaxKind::HashColon
        )
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::ClassKw as u16)
            && (self as u16) <= (SyntaxKind::ObjectKw as u16)
    }

    /// Keywords naming built-in types (`int`, `string`, `void`, ...).
    pub fn is_predefined_type_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::VoidKw as u16)
            && (self as u16) <= (SyntaxKind::ObjectKw as u16)
    }

    /// Modifier keywords accepted in front of declarations.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
                | SyntaxKind::StaticKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::SealedKw
                | SyntaxKind::VirtualKw
                | SyntaxKind::OverrideKw
                | SyntaxKind::ReadonlyKw
                | SyntaxKind::PartialKw
                | SyntaxKind::UnsafeKw
                | SyntaxKind::ConstKw
        )
    }

    /// Keywords that unambiguously begin a type declaration. Used as
    /// resynchronization points: seeing one of these in the middle of an
    /// unrelated construct abandons that construct.
    pub fn starts_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassKw
                | SyntaxKind::StructKw
                | SyntaxKind::InterfaceKw
                | SyntaxKind::EnumKw
                | SyntaxKind::NamespaceKw
        )
    }

    /// Whether a node of this kind is a type in the grammar. Exposed so the
    /// semantic layer can classify parse-tree disambiguation outcomes without
    /// re-deriving grammar knowledge.
    pub fn is_type_syntax(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::QualifiedName
                | SyntaxKind::PredefinedType
                | SyntaxKind::NullableType
                | SyntaxKind::PointerType
                | SyntaxKind::ArrayType
                | SyntaxKind::TupleType
                | SyntaxKind::FunctionPointerType
        )
    }

    /// Human-readable rendering of a token kind for diagnostics, e.g. `","`
    /// or `"identifier"`.
    pub fn token_display(self) -> &'static str {
        match self {
            SyntaxKind::OpenParen => "(",
            SyntaxKind::CloseParen => ")",
            SyntaxKind::OpenBracket => "[",
            SyntaxKind::CloseBracket => "]",
            SyntaxKind::OpenBrace => "{",
            SyntaxKind::CloseBrace => "}",
            SyntaxKind::LessThan => "<",
            SyntaxKind::GreaterThan => ">",
            SyntaxKind::LessThanEquals => "<=",
            SyntaxKind::GreaterThanEquals => ">=",
            SyntaxKind::LessThanLessThan => "<<",
            SyntaxKind::LessThanLessThanEquals => "<<=",
            SyntaxKind::EqualsEquals => "==",
            SyntaxKind::ExclamationEquals => "!=",
            SyntaxKind::Ampersand => "&",
            SyntaxKind::AmpersandAmpersand => "&&",
            SyntaxKind::AmpersandEquals => "&=",
            SyntaxKind::Bar => "|",
            SyntaxKind::BarBar => "||",
            SyntaxKind::BarEquals => "|=",
            SyntaxKind::Caret => "^",
            SyntaxKind::CaretEquals => "^=",
            SyntaxKind::Exclamation => "!",
            SyntaxKind::Tilde => "~",
            SyntaxKind::Plus => "+",
            SyntaxKind::PlusPlus => "++",
            SyntaxKind::PlusEquals => "+=",
            SyntaxKind::Minus => "-",
            SyntaxKind::MinusMinus => "--",
            SyntaxKind::MinusEquals => "-=",
            SyntaxKind::MinusGreaterThan => "->",
            SyntaxKind::Asterisk => "*",
            SyntaxKind::AsteriskEquals => "*=",
            SyntaxKind::Slash => "/",
            SyntaxKind::SlashEquals => "/=",
            SyntaxKind::Percent => "%",
            SyntaxKind::PercentEquals => "%=",
            SyntaxKind::Equals => "=",
            SyntaxKind::EqualsGreaterThan => "=>",
            SyntaxKind::Question => "?",
            SyntaxKind::QuestionQuestion => "??",
            SyntaxKind::QuestionQuestionEquals => "??=",
            SyntaxKind::QuestionDot => "?.",
            SyntaxKind::Colon => ":",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Comma => ",",
            SyntaxKind::Dot => ".",
            SyntaxKind::Hash => "#",
            SyntaxKind::HashBang => "#!",
            SyntaxKind::HashColon => "#:",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::IntLiteral => "integer literal",
            SyntaxKind::RealLiteral => "real literal",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::CharLiteral => "character literal",
            SyntaxKind::Eof => "end of file",
            kind if kind.is_keyword() => keyword_text(kind).unwrap_or("keyword"),
            _ => "token",
        }
    }
}

/// Look up the keyword kind for an identifier-shaped word, if it is reserved.
pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    KEYWORDS
        .iter()
        .find(|(word, _)| *word == text)
        .map(|&(_, kind)| kind)
}

/// Source text of a keyword kind.
pub fn keyword_text(kind: SyntaxKind) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|&(word, _)| word)
}

static KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("class", SyntaxKind::ClassKw),
    ("struct", SyntaxKind::StructKw),
    ("interface", SyntaxKind::InterfaceKw),
    ("enum", SyntaxKind::EnumKw),
    ("namespace", SyntaxKind::NamespaceKw),
    ("using", SyntaxKind::UsingKw),
    ("delegate", SyntaxKind::DelegateKw),
    ("public", SyntaxKind::PublicKw),
    ("private", SyntaxKind::PrivateKw),
    ("protected", SyntaxKind::ProtectedKw),
    ("internal", SyntaxKind::InternalKw),
    ("static", SyntaxKind::StaticKw),
    ("abstract", SyntaxKind::AbstractKw),
    ("sealed", SyntaxKind::SealedKw),
    ("virtual", SyntaxKind::VirtualKw),
    ("override", SyntaxKind::OverrideKw),
    ("readonly", SyntaxKind::ReadonlyKw),
    ("partial", SyntaxKind::PartialKw),
    ("unsafe", SyntaxKind::UnsafeKw),
    ("const", SyntaxKind::ConstKw),
    ("new", SyntaxKind::NewKw),
    ("return", SyntaxKind::ReturnKw),
    ("if", SyntaxKind::IfKw),
    ("else", SyntaxKind::ElseKw),
    ("while", SyntaxKind::WhileKw),
    ("do", SyntaxKind::DoKw),
    ("for", SyntaxKind::ForKw),
    ("foreach", SyntaxKind::ForeachKw),
    ("in", SyntaxKind::InKw),
    ("break", SyntaxKind::BreakKw),
    ("continue", SyntaxKind::ContinueKw),
    ("try", SyntaxKind::TryKw),
    ("catch", SyntaxKind::CatchKw),
    ("finally", SyntaxKind::FinallyKw),
    ("throw", SyntaxKind::ThrowKw),
    ("this", SyntaxKind::ThisKw),
    ("base", SyntaxKind::BaseKw),
    ("null", SyntaxKind::NullKw),
    ("true", SyntaxKind::TrueKw),
    ("false", SyntaxKind::FalseKw),
    ("typeof", SyntaxKind::TypeofKw),
    ("sizeof", SyntaxKind::SizeofKw),
    ("default", SyntaxKind::DefaultKw),
    ("is", SyntaxKind::IsKw),
    ("as", SyntaxKind::AsKw),
    ("ref", SyntaxKind::RefKw),
    ("out", SyntaxKind::OutKw),
    ("params", SyntaxKind::ParamsKw),
    ("void", SyntaxKind::VoidKw),
    ("bool", SyntaxKind::BoolKw),
    ("byte", SyntaxKind::ByteKw),
    ("sbyte", SyntaxKind::SbyteKw),
    ("short", SyntaxKind::ShortKw),
    ("ushort", SyntaxKind::UshortKw),
    ("int", SyntaxKind::IntKw),
    ("uint", SyntaxKind::UintKw),
    ("long", SyntaxKind::LongKw),
    ("ulong", SyntaxKind::UlongKw),
    ("float", SyntaxKind::FloatKw),
    ("double", SyntaxKind::DoubleKw),
    ("decimal", SyntaxKind::DecimalKw),
    ("char", SyntaxKind::CharKw),
    ("string", SyntaxKind::StringKw),
    ("object", SyntaxKind::ObjectKw),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_round_trips() {
        for &(word, kind) in KEYWORDS {
            assert_eq!(keyword_kind(word), Some(kind));
            assert_eq!(keyword_text(kind), Some(word));
            assert!(kind.is_keyword(), "{word} not classified as keyword");
        }
        assert_eq!(keyword_kind("frobnicate"), None);
        // Contextual words are deliberately not reserved.
        for word in ["var", "from", "select", "where", "orderby", "get", "set"] {
            assert_eq!(keyword_kind(word), None, "{word} must stay contextual");
        }
    }

    #[test]
    fn raw_discriminants_round_trip_through_the_table() {
        assert_eq!(ALL_KINDS.len(), SyntaxKind::__Last as usize);
        for raw in 0..SyntaxKind::__Last as u16 {
            assert_eq!(SyntaxKind::from_raw(raw).map(|k| k as u16), Some(raw));
        }
        assert_eq!(SyntaxKind::from_raw(SyntaxKind::__Last as u16), None);
    }

    #[test]
    fn predefined_type_keywords_are_contiguous() {
        assert!(SyntaxKind::VoidKw.is_predefined_type_keyword());
        assert!(SyntaxKind::ObjectKw.is_predefined_type_keyword());
        assert!(SyntaxKind::StringKw.is_predefined_type_keyword());
        assert!(!SyntaxKind::ClassKw.is_predefined_type_keyword());
        assert!(!SyntaxKind::Identifier.is_predefined_type_keyword());
    }

    #[test]
    fn type_syntax_predicate_is_closed_over_type_kinds() {
        assert!(SyntaxKind::FunctionPointerType.is_type_syntax());
        assert!(SyntaxKind::PointerType.is_type_syntax());
        assert!(SyntaxKind::GenericName.is_type_syntax());
        assert!(!SyntaxKind::BinaryExpression.is_type_syntax());
        assert!(!SyntaxKind::TypeArgumentList.is_type_syntax());
    }
}
