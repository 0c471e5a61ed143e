//! JSX element parsing. The scanner switches into text mode between
//! tags (`next_jsx_token`), so the parser has to be explicit about which
//! mode the token after each `>` or `}` is scanned in: a closing `>` in
//! expression context resumes normal scanning, while one inside a parent
//! element's children resumes text scanning.

use crate::ast::{NodeId, NodeKind};
use tsdl_common::diagnostics::codes;
use tsdl_scanner::SyntaxKind;

use super::ParserState;

impl ParserState<'_> {
    /// Element or fragment in expression position, current token `<`.
    pub(crate) fn parse_jsx_element_or_fragment(&mut self) -> NodeId {
        self.parse_jsx_element_worker(true)
    }

    fn parse_jsx_element_worker(&mut self, in_expression_context: bool) -> NodeId {
        let start = self.start();
        self.next_token();

        if self.at(SyntaxKind::GreaterThanToken) {
            // `<>` fragment
            self.next_jsx_token();
            let children = self.parse_jsx_children();
            if self.at(SyntaxKind::LessThanSlashToken) {
                self.next_token();
                self.finish_jsx_tag(in_expression_context);
            } else {
                self.error_at_current(
                    "JSX fragment has no corresponding closing tag.",
                    codes::JSX_ELEMENT_NO_CLOSING_TAG,
                );
            }
            return self
                .arena
                .alloc(self.finish_span(start), NodeKind::JsxFragment { children });
        }

        let tag_name = self.parse_jsx_tag_name();
        let type_arguments = if self.at(SyntaxKind::LessThanToken) {
            self.skip_type_parameters()
        } else {
            NodeId::NONE
        };
        let attributes = self.parse_jsx_attributes();

        if self.at(SyntaxKind::SlashToken) {
            self.next_token();
            self.finish_jsx_tag(in_expression_context);
            return self.arena.alloc(
                self.finish_span(start),
                NodeKind::JsxSelfClosingElement {
                    tag_name,
                    type_arguments,
                    attributes,
                },
            );
        }

        // Children always scan in text mode.
        self.finish_jsx_tag(false);
        let opening = self.arena.alloc(
            self.finish_span(start),
            NodeKind::JsxOpeningElement {
                tag_name,
                type_arguments,
                attributes,
            },
        );
        let children = self.parse_jsx_children();
        let cstart = self.start();
        let closing = if self.at(SyntaxKind::LessThanSlashToken) {
            self.next_token();
            let closing_name = self.parse_jsx_tag_name();
            self.finish_jsx_tag(in_expression_context);
            self.arena.alloc(
                self.finish_span(cstart),
                NodeKind::JsxClosingElement {
                    tag_name: closing_name,
                },
            )
        } else {
            self.error_at_current(
                "JSX element has no corresponding closing tag.",
                codes::JSX_ELEMENT_NO_CLOSING_TAG,
            );
            self.arena.alloc(
                tsdl_common::Span::new(cstart, cstart),
                NodeKind::JsxClosingElement {
                    tag_name: NodeId::NONE,
                },
            )
        };
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::JsxElement {
                opening,
                children,
                closing,
            },
        )
    }

    /// Consume the `>` closing a tag. The token after it belongs either
    /// to surrounding expression code or to a parent element's children.
    fn finish_jsx_tag(&mut self, in_expression_context: bool) {
        if !self.at(SyntaxKind::GreaterThanToken) {
            self.error_at_current("'>' expected.", codes::TOKEN_EXPECTED);
            return;
        }
        if in_expression_context {
            self.next_token();
        } else {
            self.next_jsx_token();
        }
    }

    fn parse_jsx_children(&mut self) -> Vec<NodeId> {
        let mut children = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::LessThanSlashToken | SyntaxKind::EndOfFileToken => break,
                SyntaxKind::JsxText => {
                    let text = self.scanner.token_text().to_string();
                    let span = self.token_span();
                    self.next_jsx_token();
                    children.push(self.arena.alloc(span, NodeKind::JsxText { text }));
                }
                SyntaxKind::OpenBraceToken => {
                    children.push(self.parse_jsx_child_expression());
                }
                SyntaxKind::LessThanToken => {
                    children.push(self.parse_jsx_element_worker(false));
                }
                _ => break,
            }
        }
        children
    }

    /// `{expr}` between tags. The braces re-enter normal scanning; the
    /// token after the closing brace is a child again.
    fn parse_jsx_child_expression(&mut self) -> NodeId {
        let start = self.start();
        self.next_token();
        let dot_dot_dot = self.eat(SyntaxKind::DotDotDotToken);
        let expression = if self.at(SyntaxKind::CloseBraceToken) {
            NodeId::NONE
        } else {
            self.parse_expression()
        };
        if self.at(SyntaxKind::CloseBraceToken) {
            self.next_jsx_token();
        } else {
            self.error_at_current("'}' expected.", codes::TOKEN_EXPECTED);
        }
        self.arena.alloc(
            self.finish_span(start),
            NodeKind::JsxExpression {
                dot_dot_dot,
                expression,
            },
        )
    }

    /// `this`, an identifier, or a dotted chain of identifiers.
    fn parse_jsx_tag_name(&mut self) -> NodeId {
        let start = self.start();
        let mut node = if self.at(SyntaxKind::ThisKeyword) {
            let span = self.token_span();
            self.next_token();
            self.arena.alloc(span, NodeKind::ThisExpression)
        } else {
            self.parse_jsx_identifier()
        };
        while self.at(SyntaxKind::DotToken) {
            self.next_token();
            let name = self.parse_jsx_identifier();
            node = self.arena.alloc(
                self.finish_span(start),
                NodeKind::PropertyAccessExpression {
                    expression: node,
                    question_dot: false,
                    name,
                },
            );
        }
        node
    }

    /// A JSX name. Dashed (`data-x`) and namespaced (`xlink:href`) names
    /// arrive as separate tokens; glue them back together when the
    /// pieces touch in the source.
    fn parse_jsx_identifier(&mut self) -> NodeId {
        let start = self.start();
        if !(self.token().is_identifier_like() || self.token().is_keyword()) {
            self.error_at_current("Identifier expected.", codes::IDENTIFIER_EXPECTED);
            return self.arena.alloc(
                tsdl_common::Span::new(start, start),
                NodeKind::Identifier {
                    text: String::new(),
                },
            );
        }
        let mut text = self.scanner.token_text().to_string();
        self.next_token();
        loop {
            let glue = match self.token() {
                SyntaxKind::MinusToken => '-',
                SyntaxKind::ColonToken => ':',
                _ => break,
            };
            if self.token_span().start != self.prev_end {
                break;
            }
            let after_glue = self.look_ahead(|p| {
                p.next_token();
                (p.token().is_identifier_like() || p.token().is_keyword())
                    && p.token_span().start == p.prev_end
            });
            if !after_glue {
                break;
            }
            text.push(glue);
            self.next_token();
            text.push_str(self.scanner.token_text());
            self.next_token();
        }
        self.arena
            .alloc(self.finish_span(start), NodeKind::Identifier { text })
    }

    fn parse_jsx_attributes(&mut self) -> Vec<NodeId> {
        let mut attributes = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::SlashToken
                | SyntaxKind::GreaterThanToken
                | SyntaxKind::EndOfFileToken => break,
                SyntaxKind::OpenBraceToken => {
                    let start = self.start();
                    self.next_token();
                    self.expect(SyntaxKind::DotDotDotToken);
                    let expression = self.parse_assignment_expression();
                    self.expect(SyntaxKind::CloseBraceToken);
                    attributes.push(self.arena.alloc(
                        self.finish_span(start),
                        NodeKind::JsxSpreadAttribute { expression },
                    ));
                }
                t if t.is_identifier_like() || t.is_keyword() => {
                    let start = self.start();
                    let name = self.parse_jsx_identifier();
                    let initializer = if self.eat(SyntaxKind::EqualsToken) {
                        self.parse_jsx_attribute_value()
                    } else {
                        NodeId::NONE
                    };
                    attributes.push(self.arena.alloc(
                        self.finish_span(start),
                        NodeKind::JsxAttribute { name, initializer },
                    ));
                }
                _ => {
                    self.error_at_current("Identifier expected.", codes::IDENTIFIER_EXPECTED);
                    self.next_token();
                }
            }
        }
        attributes
    }

    fn parse_jsx_attribute_value(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::OpenBraceToken => {
                let start = self.start();
                self.next_token();
                let dot_dot_dot = self.eat(SyntaxKind::DotDotDotToken);
                let expression = if self.at(SyntaxKind::CloseBraceToken) {
                    NodeId::NONE
                } else {
                    self.parse_assignment_expression()
                };
                self.expect(SyntaxKind::CloseBraceToken);
                self.arena.alloc(
                    self.finish_span(start),
                    NodeKind::JsxExpression {
                        dot_dot_dot,
                        expression,
                    },
                )
            }
            SyntaxKind::LessThanToken => self.parse_jsx_element_worker(true),
            _ => {
                self.error_at_current("Expression expected.", codes::EXPRESSION_EXPECTED);
                let pos = self.start();
                self.arena.alloc(
                    tsdl_common::Span::new(pos, pos),
                    NodeKind::Identifier {
                        text: String::new(),
                    },
                )
            }
        }
    }
}
