//! Token kinds produced by the scanner.

/// Kind of a scanned token. Names follow the TypeScript compiler's
/// conventions: punctuation ends in `Token`, keywords in `Keyword`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    RegularExpressionLiteral,
    NoSubstitutionTemplateLiteral,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,
    JsxText,

    Identifier,
    PrivateIdentifier,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    LessThanToken,
    LessThanSlashToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    ColonToken,
    AtToken,
    QuestionQuestionToken,
    QuestionDotToken,
    BacktickToken,

    // Assignment operators
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    AmpersandAmpersandEqualsToken,
    BarBarEqualsToken,
    QuestionQuestionEqualsToken,

    // Reserved words
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,

    // Contextual keywords (valid identifiers outside their context)
    AbstractKeyword,
    AccessorKeyword,
    AsKeyword,
    AsyncKeyword,
    AwaitKeyword,
    DeclareKeyword,
    FromKeyword,
    GetKeyword,
    ImplementsKeyword,
    InterfaceKeyword,
    LetKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    OfKeyword,
    OutKeyword,
    OverrideKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    ReadonlyKeyword,
    RequireKeyword,
    SatisfiesKeyword,
    SetKeyword,
    StaticKeyword,
    TypeKeyword,
    YieldKeyword,
}

impl SyntaxKind {
    pub fn is_keyword(&self) -> bool {
        *self >= SyntaxKind::BreakKeyword
    }

    /// Reserved words can never be used as plain identifiers.
    pub fn is_reserved_word(&self) -> bool {
        *self >= SyntaxKind::BreakKeyword && *self <= SyntaxKind::WithKeyword
    }

    /// Contextual keywords double as identifiers outside their context.
    pub fn is_contextual_keyword(&self) -> bool {
        *self >= SyntaxKind::AbstractKeyword
    }

    /// Whether this token can begin an identifier reference in an
    /// expression (identifiers plus contextual keywords).
    pub fn is_identifier_like(&self) -> bool {
        *self == SyntaxKind::Identifier || self.is_contextual_keyword()
    }

    pub fn is_assignment_operator(&self) -> bool {
        *self >= SyntaxKind::EqualsToken && *self <= SyntaxKind::QuestionQuestionEqualsToken
    }

    pub fn is_template_literal_token(&self) -> bool {
        matches!(
            self,
            SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateHead
                | SyntaxKind::TemplateMiddle
                | SyntaxKind::TemplateTail
        )
    }

    /// Binary operator precedence for expression parsing, or `None` when
    /// the token is not a binary operator. Higher binds tighter.
    pub fn binary_precedence(&self) -> Option<u8> {
        use SyntaxKind::*;
        Some(match self {
            QuestionQuestionToken => 1,
            BarBarToken => 2,
            AmpersandAmpersandToken => 3,
            BarToken => 4,
            CaretToken => 5,
            AmpersandToken => 6,
            EqualsEqualsToken | ExclamationEqualsToken | EqualsEqualsEqualsToken
            | ExclamationEqualsEqualsToken => 7,
            LessThanToken | GreaterThanToken | LessThanEqualsToken | GreaterThanEqualsToken
            | InstanceOfKeyword | InKeyword | AsKeyword | SatisfiesKeyword => 8,
            LessThanLessThanToken | GreaterThanGreaterThanToken
            | GreaterThanGreaterThanGreaterThanToken => 9,
            PlusToken | MinusToken => 10,
            AsteriskToken | SlashToken | PercentToken => 11,
            AsteriskAsteriskToken => 12,
            _ => return None,
        })
    }

    /// Source text for fixed-spelling tokens (punctuation and keywords).
    pub fn text(&self) -> Option<&'static str> {
        use SyntaxKind::*;
        Some(match self {
            OpenBraceToken => "{",
            CloseBraceToken => "}",
            OpenParenToken => "(",
            CloseParenToken => ")",
            OpenBracketToken => "[",
            CloseBracketToken => "]",
            DotToken => ".",
            DotDotDotToken => "...",
            SemicolonToken => ";",
            CommaToken => ",",
            LessThanToken => "<",
            LessThanSlashToken => "</",
            GreaterThanToken => ">",
            LessThanEqualsToken => "<=",
            GreaterThanEqualsToken => ">=",
            EqualsEqualsToken => "==",
            ExclamationEqualsToken => "!=",
            EqualsEqualsEqualsToken => "===",
            ExclamationEqualsEqualsToken => "!==",
            EqualsGreaterThanToken => "=>",
            PlusToken => "+",
            MinusToken => "-",
            AsteriskToken => "*",
            AsteriskAsteriskToken => "**",
            SlashToken => "/",
            PercentToken => "%",
            PlusPlusToken => "++",
            MinusMinusToken => "--",
            LessThanLessThanToken => "<<",
            GreaterThanGreaterThanToken => ">>",
            GreaterThanGreaterThanGreaterThanToken => ">>>",
            AmpersandToken => "&",
            BarToken => "|",
            CaretToken => "^",
            ExclamationToken => "!",
            TildeToken => "~",
            AmpersandAmpersandToken => "&&",
            BarBarToken => "||",
            QuestionToken => "?",
            ColonToken => ":",
            AtToken => "@",
            QuestionQuestionToken => "??",
            QuestionDotToken => "?.",
            BacktickToken => "`",
            EqualsToken => "=",
            PlusEqualsToken => "+=",
            MinusEqualsToken => "-=",
            AsteriskEqualsToken => "*=",
            AsteriskAsteriskEqualsToken => "**=",
            SlashEqualsToken => "/=",
            PercentEqualsToken => "%=",
            LessThanLessThanEqualsToken => "<<=",
            GreaterThanGreaterThanEqualsToken => ">>=",
            GreaterThanGreaterThanGreaterThanEqualsToken => ">>>=",
            AmpersandEqualsToken => "&=",
            BarEqualsToken => "|=",
            CaretEqualsToken => "^=",
            AmpersandAmpersandEqualsToken => "&&=",
            BarBarEqualsToken => "||=",
            QuestionQuestionEqualsToken => "??=",
            BreakKeyword => "break",
            CaseKeyword => "case",
            CatchKeyword => "catch",
            ClassKeyword => "class",
            ConstKeyword => "const",
            ContinueKeyword => "continue",
            DebuggerKeyword => "debugger",
            DefaultKeyword => "default",
            DeleteKeyword => "delete",
            DoKeyword => "do",
            ElseKeyword => "else",
            EnumKeyword => "enum",
            ExportKeyword => "export",
            ExtendsKeyword => "extends",
            FalseKeyword => "false",
            FinallyKeyword => "finally",
            ForKeyword => "for",
            FunctionKeyword => "function",
            IfKeyword => "if",
            ImportKeyword => "import",
            InKeyword => "in",
            InstanceOfKeyword => "instanceof",
            NewKeyword => "new",
            NullKeyword => "null",
            ReturnKeyword => "return",
            SuperKeyword => "super",
            SwitchKeyword => "switch",
            ThisKeyword => "this",
            ThrowKeyword => "throw",
            TrueKeyword => "true",
            TryKeyword => "try",
            TypeOfKeyword => "typeof",
            VarKeyword => "var",
            VoidKeyword => "void",
            WhileKeyword => "while",
            WithKeyword => "with",
            AbstractKeyword => "abstract",
            AccessorKeyword => "accessor",
            AsKeyword => "as",
            AsyncKeyword => "async",
            AwaitKeyword => "await",
            DeclareKeyword => "declare",
            FromKeyword => "from",
            GetKeyword => "get",
            ImplementsKeyword => "implements",
            InterfaceKeyword => "interface",
            LetKeyword => "let",
            ModuleKeyword => "module",
            NamespaceKeyword => "namespace",
            OfKeyword => "of",
            OutKeyword => "out",
            OverrideKeyword => "override",
            PrivateKeyword => "private",
            ProtectedKeyword => "protected",
            PublicKeyword => "public",
            ReadonlyKeyword => "readonly",
            RequireKeyword => "require",
            SatisfiesKeyword => "satisfies",
            SetKeyword => "set",
            StaticKeyword => "static",
            TypeKeyword => "type",
            YieldKeyword => "yield",
            _ => return None,
        })
    }

    pub fn keyword_from_text(text: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        Some(match text {
            "break" => BreakKeyword,
            "case" => CaseKeyword,
            "catch" => CatchKeyword,
            "class" => ClassKeyword,
            "const" => ConstKeyword,
            "continue" => ContinueKeyword,
            "debugger" => DebuggerKeyword,
            "default" => DefaultKeyword,
            "delete" => DeleteKeyword,
            "do" => DoKeyword,
            "else" => ElseKeyword,
            "enum" => EnumKeyword,
            "export" => ExportKeyword,
            "extends" => ExtendsKeyword,
            "false" => FalseKeyword,
            "finally" => FinallyKeyword,
            "for" => ForKeyword,
            "function" => FunctionKeyword,
            "if" => IfKeyword,
            "import" => ImportKeyword,
            "in" => InKeyword,
            "instanceof" => InstanceOfKeyword,
            "new" => NewKeyword,
            "null" => NullKeyword,
            "return" => ReturnKeyword,
            "super" => SuperKeyword,
            "switch" => SwitchKeyword,
            "this" => ThisKeyword,
            "throw" => ThrowKeyword,
            "true" => TrueKeyword,
            "try" => TryKeyword,
            "typeof" => TypeOfKeyword,
            "var" => VarKeyword,
            "void" => VoidKeyword,
            "while" => WhileKeyword,
            "with" => WithKeyword,
            "abstract" => AbstractKeyword,
            "accessor" => AccessorKeyword,
            "as" => AsKeyword,
            "async" => AsyncKeyword,
            "await" => AwaitKeyword,
            "declare" => DeclareKeyword,
            "from" => FromKeyword,
            "get" => GetKeyword,
            "implements" => ImplementsKeyword,
            "interface" => InterfaceKeyword,
            "let" => LetKeyword,
            "module" => ModuleKeyword,
            "namespace" => NamespaceKeyword,
            "of" => OfKeyword,
            "out" => OutKeyword,
            "override" => OverrideKeyword,
            "private" => PrivateKeyword,
            "protected" => ProtectedKeyword,
            "public" => PublicKeyword,
            "readonly" => ReadonlyKeyword,
            "require" => RequireKeyword,
            "satisfies" => SatisfiesKeyword,
            "set" => SetKeyword,
            "static" => StaticKeyword,
            "type" => TypeKeyword,
            "yield" => YieldKeyword,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_classification() {
        assert!(SyntaxKind::VarKeyword.is_reserved_word());
        assert!(!SyntaxKind::NamespaceKeyword.is_reserved_word());
        assert!(SyntaxKind::NamespaceKeyword.is_contextual_keyword());
        assert!(SyntaxKind::NamespaceKeyword.is_identifier_like());
        assert!(!SyntaxKind::VarKeyword.is_identifier_like());
    }

    #[test]
    fn keyword_text_round_trips() {
        for text in ["namespace", "instanceof", "satisfies", "readonly"] {
            let kind = SyntaxKind::keyword_from_text(text).unwrap();
            assert_eq!(kind.text(), Some(text));
        }
        assert_eq!(SyntaxKind::keyword_from_text("banana"), None);
    }

    #[test]
    fn assignment_operator_range() {
        assert!(SyntaxKind::EqualsToken.is_assignment_operator());
        assert!(SyntaxKind::QuestionQuestionEqualsToken.is_assignment_operator());
        assert!(!SyntaxKind::EqualsEqualsToken.is_assignment_operator());
    }
}
