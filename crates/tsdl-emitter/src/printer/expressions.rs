//! Expression rendering.
//!
//! Everything here prints from raw source text where the scanner kept
//! it (numbers, strings, regexes, template chunks) and structurally
//! otherwise. Type-level wrappers (`as`, `satisfies`, `!`, `<T>`) print
//! only their operand.

use tsdl_parser::{ModifierFlags, NodeArena, NodeId, NodeKind, SyntaxKind};

use super::Printer;

impl<'a> Printer<'a> {
    pub(super) fn emit_expression(&mut self, id: NodeId) {
        let arena = self.arena;
        match &arena.get(id).kind {
            NodeKind::Identifier { text } | NodeKind::PrivateIdentifier { text } => {
                self.write(text)
            }
            NodeKind::QualifiedName { left, right } => {
                self.emit_expression(*left);
                self.write(".");
                self.emit_expression(*right);
            }
            NodeKind::ComputedPropertyName { expression } => {
                self.write("[");
                self.emit_expression(*expression);
                self.write("]");
            }
            NodeKind::NumericLiteral { raw }
            | NodeKind::BigIntLiteral { raw }
            | NodeKind::RegularExpressionLiteral { raw }
            | NodeKind::NoSubstitutionTemplateLiteral { raw }
            | NodeKind::StringLiteral { raw, .. } => self.write(raw),
            NodeKind::TemplateExpression { head_raw, spans } => {
                self.write(head_raw);
                for &span in spans {
                    if let NodeKind::TemplateSpan {
                        expression,
                        literal_raw,
                    } = &arena.get(span).kind
                    {
                        self.emit_expression(*expression);
                        self.write(literal_raw);
                    }
                }
            }
            NodeKind::BooleanLiteral { value } => {
                self.write(if *value { "true" } else { "false" })
            }
            NodeKind::NullLiteral => self.write("null"),
            NodeKind::ThisExpression => self.write("this"),
            NodeKind::SuperExpression => self.write("super"),
            NodeKind::ArrayLiteralExpression {
                elements,
                multiline,
            } => {
                if *multiline && !elements.is_empty() {
                    self.write("[");
                    self.emit_multiline_elements(elements);
                    self.write("]");
                } else {
                    self.write("[");
                    self.emit_comma_list(elements);
                    self.write("]");
                }
            }
            NodeKind::ObjectLiteralExpression {
                properties,
                multiline,
            } => {
                if properties.is_empty() {
                    self.write("{}");
                } else if *multiline {
                    self.write("{");
                    self.emit_multiline_elements(properties);
                    self.write("}");
                } else {
                    self.write("{ ");
                    self.emit_comma_list(properties);
                    self.write(" }");
                }
            }
            NodeKind::PropertyAssignment { name, initializer } => {
                self.emit_expression(*name);
                self.write(": ");
                self.emit_expression(*initializer);
            }
            NodeKind::ShorthandPropertyAssignment { name, initializer } => {
                self.emit_expression(*name);
                if initializer.is_some() {
                    self.write(" = ");
                    self.emit_expression(*initializer);
                }
            }
            NodeKind::SpreadAssignment { expression }
            | NodeKind::SpreadElement { expression } => {
                self.write("...");
                self.emit_expression(*expression);
            }
            NodeKind::PropertyAccessExpression {
                expression,
                question_dot,
                name,
            } => {
                self.emit_expression(*expression);
                self.write(if *question_dot { "?." } else { "." });
                self.emit_expression(*name);
            }
            NodeKind::ElementAccessExpression {
                expression,
                question_dot,
                argument,
            } => {
                self.emit_expression(*expression);
                if *question_dot {
                    self.write("?.");
                }
                self.write("[");
                self.emit_expression(*argument);
                self.write("]");
            }
            NodeKind::CallExpression(data) => {
                self.emit_expression(data.expression);
                if data.question_dot {
                    self.write("?.");
                }
                self.emit_argument_list(&data.arguments);
            }
            NodeKind::NewExpression(data) => {
                self.write("new ");
                self.emit_expression(data.expression);
                if data.has_arguments {
                    self.emit_argument_list(&data.arguments);
                }
            }
            NodeKind::TaggedTemplateExpression { tag, template } => {
                self.emit_expression(*tag);
                self.emit_expression(*template);
            }
            NodeKind::ParenthesizedExpression { expression } => {
                self.write("(");
                self.emit_expression(*expression);
                self.write(")");
            }
            NodeKind::FunctionExpression(data) => self.emit_function_shape(data),
            NodeKind::ArrowFunction(data) => {
                if data.modifiers.contains(ModifierFlags::ASYNC) {
                    self.write("async ");
                }
                if data.parenthesized_parameters || data.parameters.len() != 1 {
                    self.emit_parameter_list(&data.parameters);
                } else {
                    self.emit_parameter_bare(data.parameters[0]);
                }
                self.write(" => ");
                if data.is_arrow_expression_body {
                    self.emit_expression(data.body);
                } else {
                    self.emit_block(data.body);
                }
            }
            NodeKind::ClassExpression(data) => {
                self.write("class");
                if data.name.is_some() {
                    self.write(" ");
                    self.emit_expression(data.name);
                }
                self.emit_class_tail(data.extends, &data.members);
            }
            NodeKind::DeleteExpression { expression } => {
                self.write("delete ");
                self.emit_expression(*expression);
            }
            NodeKind::TypeOfExpression { expression } => {
                self.write("typeof ");
                self.emit_expression(*expression);
            }
            NodeKind::VoidExpression { expression } => {
                self.write("void ");
                self.emit_expression(*expression);
            }
            NodeKind::AwaitExpression { expression } => {
                self.write("await ");
                self.emit_expression(*expression);
            }
            NodeKind::PrefixUnaryExpression { operator, operand } => {
                if let Some(text) = operator.text() {
                    self.write(text);
                }
                if unary_needs_space(arena, *operator, *operand) {
                    self.write(" ");
                }
                self.emit_expression(*operand);
            }
            NodeKind::PostfixUnaryExpression { operand, operator } => {
                self.emit_expression(*operand);
                if let Some(text) = operator.text() {
                    self.write(text);
                }
            }
            NodeKind::BinaryExpression {
                left,
                operator,
                right,
            } => {
                self.emit_expression(*left);
                if *operator == SyntaxKind::CommaToken {
                    self.write(", ");
                } else {
                    self.write(" ");
                    if let Some(text) = operator.text() {
                        self.write(text);
                    }
                    self.write(" ");
                }
                self.emit_expression(*right);
            }
            NodeKind::ConditionalExpression {
                condition,
                when_true,
                when_false,
            } => {
                self.emit_expression(*condition);
                self.write(" ? ");
                self.emit_expression(*when_true);
                self.write(" : ");
                self.emit_expression(*when_false);
            }
            NodeKind::YieldExpression {
                asterisk,
                expression,
            } => {
                self.write("yield");
                if *asterisk {
                    self.write("*");
                }
                if expression.is_some() {
                    self.write(" ");
                    self.emit_expression(*expression);
                }
            }
            NodeKind::OmittedExpression => {}
            NodeKind::AsExpression { expression, .. }
            | NodeKind::SatisfiesExpression { expression, .. }
            | NodeKind::NonNullExpression { expression }
            | NodeKind::TypeAssertionExpression { expression, .. }
            | NodeKind::ExpressionWithTypeArguments { expression, .. } => {
                self.emit_expression(*expression);
            }
            NodeKind::ImportCallExpression { arguments } => {
                self.write("import");
                self.emit_argument_list(arguments);
            }
            NodeKind::MetaProperty { keyword, name } => {
                self.write(keyword);
                self.write(".");
                self.write(name);
            }
            NodeKind::Decorator { expression } => {
                self.write("@");
                self.emit_expression(*expression);
            }
            NodeKind::JsxElement {
                opening,
                children,
                closing,
            } => {
                self.emit_expression(*opening);
                for &child in children {
                    self.emit_expression(child);
                }
                self.emit_expression(*closing);
            }
            NodeKind::JsxSelfClosingElement {
                tag_name,
                attributes,
                ..
            } => {
                self.write("<");
                self.emit_expression(*tag_name);
                for &attribute in attributes {
                    self.write(" ");
                    self.emit_expression(attribute);
                }
                self.write("/>");
            }
            NodeKind::JsxOpeningElement {
                tag_name,
                attributes,
                ..
            } => {
                self.write("<");
                self.emit_expression(*tag_name);
                for &attribute in attributes {
                    self.write(" ");
                    self.emit_expression(attribute);
                }
                self.write(">");
            }
            NodeKind::JsxClosingElement { tag_name } => {
                self.write("</");
                self.emit_expression(*tag_name);
                self.write(">");
            }
            NodeKind::JsxFragment { children } => {
                self.write("<>");
                for &child in children {
                    self.emit_expression(child);
                }
                self.write("</>");
            }
            NodeKind::JsxText { text } => self.write(text),
            NodeKind::JsxExpression {
                dot_dot_dot,
                expression,
            } => {
                self.write("{");
                if *dot_dot_dot {
                    self.write("...");
                }
                if expression.is_some() {
                    self.emit_expression(*expression);
                }
                self.write("}");
            }
            NodeKind::JsxAttribute { name, initializer } => {
                self.emit_expression(*name);
                if initializer.is_some() {
                    self.write("=");
                    self.emit_expression(*initializer);
                }
            }
            NodeKind::JsxSpreadAttribute { expression } => {
                self.write("{...");
                self.emit_expression(*expression);
                self.write("}");
            }
            _ => {}
        }
        self.emit_trailing_annotation(id);
    }

    fn emit_comma_list(&mut self, elements: &[NodeId]) {
        let mut first = true;
        for &element in elements {
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit_expression(element);
        }
    }

    /// Comma-separated elements one per line, closing bracket back at
    /// the enclosing indent.
    fn emit_multiline_elements(&mut self, elements: &[NodeId]) {
        self.write_line();
        self.increase_indent();
        let last = elements.len().saturating_sub(1);
        for (index, &element) in elements.iter().enumerate() {
            self.emit_inline_leading_comments(element);
            self.emit_expression(element);
            if index != last {
                self.write(",");
            }
            self.write_line();
        }
        self.decrease_indent();
    }

    pub(super) fn emit_argument_list(&mut self, arguments: &[NodeId]) {
        self.write("(");
        let mut first = true;
        for &argument in arguments {
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit_inline_leading_comments(argument);
            self.emit_expression(argument);
        }
        self.write(")");
    }

    /// Single arrow parameter written without parentheses.
    fn emit_parameter_bare(&mut self, id: NodeId) {
        let arena = self.arena;
        let NodeKind::Parameter(data) = &arena.get(id).kind else {
            return;
        };
        self.emit_binding_name(data.name);
    }
}

/// `-(-x)` and `-(--x)` need a space to avoid scanning as `--`.
fn unary_needs_space(arena: &NodeArena, operator: SyntaxKind, operand: NodeId) -> bool {
    let repeated = match operator {
        SyntaxKind::MinusToken => [SyntaxKind::MinusToken, SyntaxKind::MinusMinusToken],
        SyntaxKind::PlusToken => [SyntaxKind::PlusToken, SyntaxKind::PlusPlusToken],
        _ => return false,
    };
    match &arena.get(operand).kind {
        NodeKind::PrefixUnaryExpression { operator, .. } => repeated.contains(operator),
        _ => false,
    }
}
