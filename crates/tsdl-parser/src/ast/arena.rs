//! Node storage and synthesis helpers.

use rustc_hash::FxHashMap;
use tsdl_common::Span;
use tsdl_scanner::SyntaxKind;

use super::{
    FunctionData, ModifierFlags, Node, NodeId, NodeKind, VarFlavor,
};

/// Flat node storage. Parsing appends; lowering passes append more and
/// leave originals in place, linking new nodes back via
/// [`Node::original`].
#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    /// Synthetic trailing comments, e.g. the member-name annotation on
    /// an inlined const enum value. Keyed by the annotated node.
    trailing_annotations: FxHashMap<NodeId, String>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Roll back speculative parsing. Only valid when nothing retained a
    /// handle past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn alloc(&mut self, span: Span, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            span,
            original: NodeId::NONE,
            kind,
        });
        id
    }

    /// Allocate a synthesized node standing in for `original`.
    /// The span is synthetic; comments resolve through the back-link.
    pub fn synth(&mut self, original: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            span: Span::SYNTHETIC,
            original,
            kind,
        });
        id
    }

    /// Allocate a rewritten copy of `original` with new children. The source
    /// span is kept so layout decisions still read the original text.
    pub fn alloc_replacement(&mut self, original: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            span: self.nodes[original.index()].span,
            original,
            kind,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// The source span comments attach to: the node's own span, or the
    /// nearest non-synthetic span up the `original` chain.
    pub fn comment_anchor(&self, id: NodeId) -> Option<Span> {
        let mut current = id;
        loop {
            let node = self.get(current);
            if !node.span.is_synthetic() {
                return Some(node.span);
            }
            if node.original.is_none() {
                return None;
            }
            current = node.original;
        }
    }

    pub fn identifier_text(&self, id: NodeId) -> Option<&str> {
        if id.is_none() {
            return None;
        }
        match self.kind(id) {
            NodeKind::Identifier { text } | NodeKind::PrivateIdentifier { text } => Some(text),
            _ => None,
        }
    }

    /// Cooked value of a string literal node.
    pub fn string_value(&self, id: NodeId) -> Option<&str> {
        if id.is_none() {
            return None;
        }
        match self.kind(id) {
            NodeKind::StringLiteral { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Text of a declaration name usable as a map key: identifier text
    /// or string literal value.
    pub fn declared_name_text(&self, id: NodeId) -> Option<&str> {
        self.identifier_text(id)
            .or_else(|| self.string_value(id))
    }

    pub fn set_trailing_annotation(&mut self, id: NodeId, text: String) {
        self.trailing_annotations.insert(id, text);
    }

    pub fn trailing_annotation(&self, id: NodeId) -> Option<&str> {
        self.trailing_annotations.get(&id).map(String::as_str)
    }

    // =========================================================================
    // Synthesis builders used by the lowering passes
    // =========================================================================

    pub fn synth_identifier(&mut self, text: &str) -> NodeId {
        self.synth(
            NodeId::NONE,
            NodeKind::Identifier {
                text: text.to_string(),
            },
        )
    }

    pub fn synth_string(&mut self, value: &str) -> NodeId {
        let mut raw = String::with_capacity(value.len() + 2);
        raw.push('"');
        for ch in value.chars() {
            match ch {
                '"' => raw.push_str("\\\""),
                '\\' => raw.push_str("\\\\"),
                '\n' => raw.push_str("\\n"),
                '\r' => raw.push_str("\\r"),
                '\t' => raw.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    raw.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => raw.push(c),
            }
        }
        raw.push('"');
        self.synth(
            NodeId::NONE,
            NodeKind::StringLiteral {
                raw,
                value: value.to_string(),
            },
        )
    }

    /// Numeric literal in JavaScript notation. Negative values come back
    /// as a prefix minus around the absolute literal, and non-finite
    /// values as the `Infinity`/`NaN` identifiers, matching what constant
    /// folding can produce.
    pub fn synth_number(&mut self, value: f64) -> NodeId {
        if value.is_nan() {
            return self.synth_identifier("NaN");
        }
        if value.is_infinite() {
            let inf = self.synth_identifier("Infinity");
            if value < 0.0 {
                return self.synth(
                    NodeId::NONE,
                    NodeKind::PrefixUnaryExpression {
                        operator: SyntaxKind::MinusToken,
                        operand: inf,
                    },
                );
            }
            return inf;
        }
        if value < 0.0 {
            let operand = self.synth_number(-value);
            return self.synth(
                NodeId::NONE,
                NodeKind::PrefixUnaryExpression {
                    operator: SyntaxKind::MinusToken,
                    operand,
                },
            );
        }
        let raw = format_number(value);
        self.synth(NodeId::NONE, NodeKind::NumericLiteral { raw })
    }

    pub fn synth_prop_access(&mut self, expression: NodeId, name: &str) -> NodeId {
        let name = self.synth_identifier(name);
        self.synth(
            NodeId::NONE,
            NodeKind::PropertyAccessExpression {
                expression,
                question_dot: false,
                name,
            },
        )
    }

    pub fn synth_element_access(&mut self, expression: NodeId, argument: NodeId) -> NodeId {
        self.synth(
            NodeId::NONE,
            NodeKind::ElementAccessExpression {
                expression,
                question_dot: false,
                argument,
            },
        )
    }

    pub fn synth_call(&mut self, expression: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.synth(
            NodeId::NONE,
            NodeKind::CallExpression(Box::new(super::CallData {
                expression,
                question_dot: false,
                type_arguments: NodeId::NONE,
                arguments,
                has_arguments: true,
            })),
        )
    }

    pub fn synth_assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.synth_binary(target, SyntaxKind::EqualsToken, value)
    }

    pub fn synth_binary(&mut self, left: NodeId, operator: SyntaxKind, right: NodeId) -> NodeId {
        self.synth(
            NodeId::NONE,
            NodeKind::BinaryExpression {
                left,
                operator,
                right,
            },
        )
    }

    pub fn synth_paren(&mut self, expression: NodeId) -> NodeId {
        self.synth(NodeId::NONE, NodeKind::ParenthesizedExpression { expression })
    }

    pub fn synth_expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.synth(NodeId::NONE, NodeKind::ExpressionStatement { expression })
    }

    /// Expression statement linked to a source node for comments.
    pub fn synth_expression_statement_for(
        &mut self,
        original: NodeId,
        expression: NodeId,
    ) -> NodeId {
        self.synth(original, NodeKind::ExpressionStatement { expression })
    }

    /// `flavor name;` or `flavor name = init;` with one declarator.
    pub fn synth_var_statement(
        &mut self,
        original: NodeId,
        modifiers: ModifierFlags,
        flavor: VarFlavor,
        name: &str,
        initializer: NodeId,
    ) -> NodeId {
        let name = self.synth_identifier(name);
        let declaration = self.synth(
            NodeId::NONE,
            NodeKind::VariableDeclaration {
                name,
                exclamation: false,
                ty: NodeId::NONE,
                initializer,
            },
        );
        let list = self.synth(
            NodeId::NONE,
            NodeKind::VariableDeclarationList {
                flavor,
                declarations: vec![declaration],
            },
        );
        self.synth(
            original,
            NodeKind::VariableStatement {
                modifiers,
                declarations: list,
            },
        )
    }

    pub fn synth_block(&mut self, statements: Vec<NodeId>, multiline: bool) -> NodeId {
        self.synth(NodeId::NONE, NodeKind::Block { statements, multiline })
    }

    /// `function (param) { body }` expression for container IIFEs.
    pub fn synth_function_expression(&mut self, parameter: &str, body: Vec<NodeId>) -> NodeId {
        let param_name = self.synth_identifier(parameter);
        let param = self.synth(
            NodeId::NONE,
            NodeKind::Parameter(Box::new(super::ParameterData {
                modifiers: ModifierFlags::empty(),
                decorators: Vec::new(),
                dot_dot_dot: false,
                name: param_name,
                question: false,
                ty: NodeId::NONE,
                initializer: NodeId::NONE,
            })),
        );
        let block = self.synth_block(body, true);
        self.synth(
            NodeId::NONE,
            NodeKind::FunctionExpression(Box::new(FunctionData {
                modifiers: ModifierFlags::empty(),
                decorators: Vec::new(),
                asterisk: false,
                name: NodeId::NONE,
                question: false,
                type_parameters: NodeId::NONE,
                parameters: vec![param],
                return_type: NodeId::NONE,
                body: block,
                is_arrow_expression_body: false,
                parenthesized_parameters: true,
            })),
        )
    }
}

/// Format a non-negative finite number the way JavaScript prints it.
fn format_number(value: f64) -> String {
    // Integral values up to 2^53 convert to i64 exactly.
    if value == value.trunc() && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formatting_matches_javascript() {
        let mut arena = NodeArena::new();
        let id = arena.synth_number(4.0);
        assert!(matches!(
            arena.kind(id),
            NodeKind::NumericLiteral { raw } if raw == "4"
        ));
        let id = arena.synth_number(2.5);
        assert!(matches!(
            arena.kind(id),
            NodeKind::NumericLiteral { raw } if raw == "2.5"
        ));
        let id = arena.synth_number(-3.0);
        assert!(matches!(
            arena.kind(id),
            NodeKind::PrefixUnaryExpression { operator: SyntaxKind::MinusToken, .. }
        ));
    }

    #[test]
    fn string_synthesis_escapes() {
        let mut arena = NodeArena::new();
        let id = arena.synth_string("a\"b\nc");
        match arena.kind(id) {
            NodeKind::StringLiteral { raw, value } => {
                assert_eq!(raw, "\"a\\\"b\\nc\"");
                assert_eq!(value, "a\"b\nc");
            }
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn comment_anchor_follows_original_chain() {
        let mut arena = NodeArena::new();
        let source = arena.alloc(
            Span::new(5, 10),
            NodeKind::Identifier {
                text: "x".to_string(),
            },
        );
        let lowered = arena.synth(source, NodeKind::EmptyStatement);
        let orphan = arena.synth(NodeId::NONE, NodeKind::EmptyStatement);
        assert_eq!(arena.comment_anchor(lowered), Some(Span::new(5, 10)));
        assert_eq!(arena.comment_anchor(orphan), None);
    }
}
