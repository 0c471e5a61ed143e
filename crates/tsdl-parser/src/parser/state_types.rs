//! Type-position skipping.
//!
//! Type syntax is balanced-token matched into a span-only `TypeNode`
//! rather than parsed into structure. The walk tracks bracket depths and
//! a small amount of conditional-type state; at depth zero a handful of
//! stop tokens end the type, and a line break after a token that can end
//! a type ends it too unless the next token can only continue one.

use crate::ast::{NodeId, NodeKind};
use tsdl_common::diagnostics::codes;
use tsdl_scanner::SyntaxKind;

use super::ParserState;

impl ParserState<'_> {
    /// Skip one type in a general annotation position (`: T`, `as T`).
    pub(crate) fn parse_type(&mut self) -> NodeId {
        let start = self.start();
        self.skip_type_tokens(false);
        self.finish_type_node(start)
    }

    /// Skip a type where a depth-zero `=>` terminates it (arrow function
    /// return annotations).
    pub(crate) fn parse_arrow_return_type(&mut self) -> NodeId {
        let start = self.start();
        self.skip_type_tokens(true);
        self.finish_type_node(start)
    }

    /// Consume `: T` when present.
    pub(crate) fn parse_type_annotation_opt(&mut self) -> NodeId {
        if self.eat(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeId::NONE
        }
    }

    /// Consume a balanced `<...>` type parameter or argument list when
    /// the current token is `<`. Returns NONE otherwise.
    pub(crate) fn skip_type_parameters(&mut self) -> NodeId {
        if !self.at(SyntaxKind::LessThanToken) {
            return NodeId::NONE;
        }
        let start = self.start();
        self.skip_balanced_angles();
        let span = self.finish_span(start);
        self.arena.alloc(span, NodeKind::TypeNode)
    }

    /// `implements A, B<T>`: the whole clause becomes one span-only node.
    pub(crate) fn parse_implements_clause(&mut self) -> NodeId {
        let start = self.start();
        loop {
            self.skip_type_tokens(false);
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        let span = self.finish_span(start);
        self.arena.alloc(span, NodeKind::TypeNode)
    }

    fn finish_type_node(&mut self, start: u32) -> NodeId {
        let span = self.finish_span(start);
        if span.is_empty() {
            self.error_at_current("Type expected.", codes::TYPE_EXPECTED);
        }
        self.arena.alloc(span, NodeKind::TypeNode)
    }

    /// Consume tokens through the end of a `<...>` list. Compound `>`
    /// tokens close several levels at once.
    pub(crate) fn skip_balanced_angles(&mut self) {
        let mut angle = 0i32;
        let mut paren = 0i32;
        let mut bracket = 0i32;
        let mut brace = 0i32;
        loop {
            let token = self.token();
            if token == SyntaxKind::EndOfFileToken {
                return;
            }
            match token {
                SyntaxKind::LessThanToken => angle += 1,
                SyntaxKind::LessThanLessThanToken => angle += 2,
                SyntaxKind::GreaterThanToken => angle -= 1,
                SyntaxKind::GreaterThanGreaterThanToken => angle -= 2,
                SyntaxKind::GreaterThanGreaterThanGreaterThanToken => angle -= 3,
                SyntaxKind::GreaterThanEqualsToken => angle -= 1,
                SyntaxKind::GreaterThanGreaterThanEqualsToken => angle -= 2,
                SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => angle -= 3,
                SyntaxKind::OpenParenToken => paren += 1,
                SyntaxKind::CloseParenToken => paren -= 1,
                SyntaxKind::OpenBracketToken => bracket += 1,
                SyntaxKind::CloseBracketToken => bracket -= 1,
                SyntaxKind::OpenBraceToken => brace += 1,
                SyntaxKind::CloseBraceToken => brace -= 1,
                SyntaxKind::TemplateHead => {
                    self.skip_template_type();
                    continue;
                }
                SyntaxKind::SemicolonToken if paren == 0 && bracket == 0 && brace == 0 => {
                    // Unterminated list; do not run past the statement.
                    return;
                }
                _ => {}
            }
            self.next_token();
            if angle <= 0 {
                return;
            }
        }
    }

    fn skip_type_tokens(&mut self, stop_at_arrow: bool) {
        let mut paren = 0i32;
        let mut bracket = 0i32;
        let mut brace = 0i32;
        let mut angle = 0i32;
        // `extends` arms a `? :` pair so conditional types keep their
        // colon; outside one, a depth-zero colon or question ends the type.
        let mut armed_conditionals = 0i32;
        let mut open_conditionals = 0i32;
        let mut prev = SyntaxKind::Unknown;
        let mut consumed_any = false;

        loop {
            let token = self.token();
            if token == SyntaxKind::EndOfFileToken {
                return;
            }
            let balanced = paren == 0 && bracket == 0 && brace == 0 && angle == 0;
            if balanced {
                match token {
                    SyntaxKind::CommaToken
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::GreaterThanToken => return,
                    SyntaxKind::EqualsGreaterThanToken if stop_at_arrow => return,
                    SyntaxKind::OpenBraceToken if can_end_type(prev) => return,
                    // Expression operators that type syntax has no use
                    // for: after a complete type they belong to the
                    // surrounding expression (`x as T + 1`).
                    SyntaxKind::PlusToken
                    | SyntaxKind::MinusToken
                    | SyntaxKind::AsteriskToken
                    | SyntaxKind::AsteriskAsteriskToken
                    | SyntaxKind::SlashToken
                    | SyntaxKind::PercentToken
                    | SyntaxKind::EqualsEqualsToken
                    | SyntaxKind::ExclamationEqualsToken
                    | SyntaxKind::EqualsEqualsEqualsToken
                    | SyntaxKind::ExclamationEqualsEqualsToken
                    | SyntaxKind::AmpersandAmpersandToken
                    | SyntaxKind::BarBarToken
                    | SyntaxKind::QuestionQuestionToken
                    | SyntaxKind::InstanceOfKeyword
                    | SyntaxKind::InKeyword
                    | SyntaxKind::AsKeyword
                    | SyntaxKind::SatisfiesKeyword
                        if can_end_type(prev) =>
                    {
                        return;
                    }
                    SyntaxKind::QuestionToken => {
                        if armed_conditionals > 0 {
                            armed_conditionals -= 1;
                            open_conditionals += 1;
                        } else {
                            return;
                        }
                    }
                    SyntaxKind::ColonToken => {
                        if open_conditionals > 0 {
                            open_conditionals -= 1;
                        } else {
                            return;
                        }
                    }
                    SyntaxKind::ExtendsKeyword => armed_conditionals += 1,
                    _ => {}
                }
                if consumed_any
                    && self.scanner.has_preceding_line_break()
                    && can_end_type(prev)
                    && !continues_type(token)
                {
                    return;
                }
            }
            match token {
                SyntaxKind::OpenParenToken => paren += 1,
                SyntaxKind::CloseParenToken => paren -= 1,
                SyntaxKind::OpenBracketToken => bracket += 1,
                SyntaxKind::CloseBracketToken => bracket -= 1,
                SyntaxKind::OpenBraceToken => brace += 1,
                SyntaxKind::CloseBraceToken => brace -= 1,
                SyntaxKind::LessThanToken => angle += 1,
                SyntaxKind::LessThanLessThanToken => angle += 2,
                SyntaxKind::GreaterThanToken => angle -= 1,
                SyntaxKind::GreaterThanGreaterThanToken => angle -= 2,
                SyntaxKind::GreaterThanGreaterThanGreaterThanToken => angle -= 3,
                SyntaxKind::GreaterThanEqualsToken if angle > 0 => angle -= 1,
                SyntaxKind::GreaterThanGreaterThanEqualsToken if angle > 0 => angle -= 2,
                SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken if angle > 0 => angle -= 3,
                SyntaxKind::TemplateHead => {
                    self.skip_template_type();
                    prev = SyntaxKind::TemplateTail;
                    consumed_any = true;
                    continue;
                }
                _ => {}
            }
            prev = token;
            consumed_any = true;
            self.next_token();
        }
    }

    /// Template literal type: the scanner needs a rescan at each `}` that
    /// resumes the template.
    pub(crate) fn skip_template_type(&mut self) {
        // Current token is TemplateHead.
        self.next_token();
        loop {
            let mut depth = 0i32;
            loop {
                match self.token() {
                    SyntaxKind::EndOfFileToken => return,
                    SyntaxKind::OpenBraceToken => depth += 1,
                    SyntaxKind::CloseBraceToken => {
                        if depth == 0 {
                            break;
                        }
                        depth -= 1;
                    }
                    _ => {}
                }
                self.next_token();
            }
            match self.scanner.rescan_template_continuation() {
                SyntaxKind::TemplateMiddle => {
                    self.next_token();
                }
                _ => {
                    // TemplateTail (or recovery); consume and finish.
                    self.next_token();
                    return;
                }
            }
        }
    }
}

fn can_end_type(kind: SyntaxKind) -> bool {
    // Keywords that act as prefixes or operators inside type syntax
    // cannot complete one.
    if matches!(
        kind,
        SyntaxKind::ExtendsKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::ReadonlyKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::InKeyword
            | SyntaxKind::AsKeyword
            | SyntaxKind::SatisfiesKeyword
    ) {
        return false;
    }
    kind == SyntaxKind::Identifier
        || kind.is_keyword()
        || matches!(
            kind,
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::GreaterThanToken
                | SyntaxKind::GreaterThanGreaterThanToken
                | SyntaxKind::GreaterThanGreaterThanGreaterThanToken
                | SyntaxKind::StringLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateTail
        )
}

/// Tokens that extend a type across a line break.
fn continues_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::DotToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::BarToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::ColonToken
            | SyntaxKind::ExtendsKeyword
            | SyntaxKind::EqualsGreaterThanToken
    )
}
