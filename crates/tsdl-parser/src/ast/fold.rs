//! Generic child traversal and rewriting.
//!
//! Lowering passes share two primitives: [`for_each_child`] to walk a
//! node's direct children, and [`map_children`] to rebuild a node with
//! some children replaced. `map_children` allocates a new node only when
//! a child actually changed; the new node keeps the source span and
//! links back to the node it replaces.

use super::{NodeArena, NodeId, NodeKind};

/// Invoke `f` on every present child of `id`, in source order.
pub fn for_each_child(arena: &NodeArena, id: NodeId, f: &mut dyn FnMut(NodeId)) {
    let mut kind = arena.get(id).kind.clone();
    visit_child_slots(&mut kind, &mut |slot| {
        f(*slot);
    });
}

/// Rebuild `id` with each child passed through `f`. Returns `id` itself
/// when nothing changed.
pub fn map_children(
    arena: &mut NodeArena,
    id: NodeId,
    f: &mut dyn FnMut(&mut NodeArena, NodeId) -> NodeId,
) -> NodeId {
    let mut kind = arena.get(id).kind.clone();
    let mut changed = false;
    visit_child_slots(&mut kind, &mut |slot| {
        let mapped = f(arena, *slot);
        if mapped != *slot {
            *slot = mapped;
            changed = true;
        }
    });
    if !changed {
        return id;
    }
    arena.alloc_replacement(id, kind)
}

/// Apply `f` to every `NodeId` slot of a kind, skipping absent ones.
fn visit_child_slots(kind: &mut NodeKind, f: &mut dyn FnMut(&mut NodeId)) {
    let mut visit = |slot: &mut NodeId, f: &mut dyn FnMut(&mut NodeId)| {
        if slot.is_some() {
            f(slot);
        }
    };
    let mut visit_all = |slots: &mut Vec<NodeId>, f: &mut dyn FnMut(&mut NodeId)| {
        for slot in slots {
            if slot.is_some() {
                f(slot);
            }
        }
    };

    match kind {
        NodeKind::SourceFile(data) => visit_all(&mut data.statements, f),

        NodeKind::Identifier { .. }
        | NodeKind::PrivateIdentifier { .. }
        | NodeKind::NumericLiteral { .. }
        | NodeKind::BigIntLiteral { .. }
        | NodeKind::StringLiteral { .. }
        | NodeKind::RegularExpressionLiteral { .. }
        | NodeKind::NoSubstitutionTemplateLiteral { .. }
        | NodeKind::BooleanLiteral { .. }
        | NodeKind::NullLiteral
        | NodeKind::ThisExpression
        | NodeKind::SuperExpression
        | NodeKind::OmittedExpression
        | NodeKind::MetaProperty { .. }
        | NodeKind::EmptyStatement
        | NodeKind::DebuggerStatement
        | NodeKind::IndexSignature
        | NodeKind::SemicolonClassElement
        | NodeKind::JsxText { .. }
        | NodeKind::TypeNode => {}

        NodeKind::ComputedPropertyName { expression }
        | NodeKind::SpreadAssignment { expression }
        | NodeKind::ParenthesizedExpression { expression }
        | NodeKind::DeleteExpression { expression }
        | NodeKind::TypeOfExpression { expression }
        | NodeKind::VoidExpression { expression }
        | NodeKind::AwaitExpression { expression }
        | NodeKind::SpreadElement { expression }
        | NodeKind::NonNullExpression { expression }
        | NodeKind::ExpressionStatement { expression }
        | NodeKind::ThrowStatement { expression }
        | NodeKind::Decorator { expression }
        | NodeKind::JsxSpreadAttribute { expression } => visit(expression, f),

        NodeKind::QualifiedName { left, right } => {
            visit(left, f);
            visit(right, f);
        }
        NodeKind::TemplateExpression { spans, .. } => visit_all(spans, f),
        NodeKind::TemplateSpan { expression, .. } => visit(expression, f),

        NodeKind::ArrayLiteralExpression { elements, .. } => visit_all(elements, f),
        NodeKind::ObjectLiteralExpression { properties, .. } => visit_all(properties, f),
        NodeKind::PropertyAssignment { name, initializer } => {
            visit(name, f);
            visit(initializer, f);
        }
        NodeKind::ShorthandPropertyAssignment { name, initializer } => {
            visit(name, f);
            visit(initializer, f);
        }
        NodeKind::PropertyAccessExpression { expression, name, .. } => {
            visit(expression, f);
            visit(name, f);
        }
        NodeKind::ElementAccessExpression {
            expression,
            argument,
            ..
        } => {
            visit(expression, f);
            visit(argument, f);
        }
        NodeKind::CallExpression(data) | NodeKind::NewExpression(data) => {
            visit(&mut data.expression, f);
            visit(&mut data.type_arguments, f);
            visit_all(&mut data.arguments, f);
        }
        NodeKind::TaggedTemplateExpression { tag, template } => {
            visit(tag, f);
            visit(template, f);
        }
        NodeKind::FunctionExpression(data)
        | NodeKind::ArrowFunction(data)
        | NodeKind::FunctionDeclaration(data)
        | NodeKind::MethodDeclaration(data)
        | NodeKind::ConstructorDeclaration(data)
        | NodeKind::GetAccessorDeclaration(data)
        | NodeKind::SetAccessorDeclaration(data) => {
            visit_all(&mut data.decorators, f);
            visit(&mut data.name, f);
            visit(&mut data.type_parameters, f);
            visit_all(&mut data.parameters, f);
            visit(&mut data.return_type, f);
            visit(&mut data.body, f);
        }
        NodeKind::ClassExpression(data) | NodeKind::ClassDeclaration(data) => {
            visit_all(&mut data.decorators, f);
            visit(&mut data.name, f);
            visit(&mut data.type_parameters, f);
            visit(&mut data.extends, f);
            visit(&mut data.implements_clause, f);
            visit_all(&mut data.members, f);
        }
        NodeKind::PrefixUnaryExpression { operand, .. }
        | NodeKind::PostfixUnaryExpression { operand, .. } => visit(operand, f),
        NodeKind::BinaryExpression { left, right, .. } => {
            visit(left, f);
            visit(right, f);
        }
        NodeKind::ConditionalExpression {
            condition,
            when_true,
            when_false,
        } => {
            visit(condition, f);
            visit(when_true, f);
            visit(when_false, f);
        }
        NodeKind::YieldExpression { expression, .. } => visit(expression, f),
        NodeKind::AsExpression { expression, ty }
        | NodeKind::SatisfiesExpression { expression, ty } => {
            visit(expression, f);
            visit(ty, f);
        }
        NodeKind::TypeAssertionExpression { ty, expression } => {
            visit(ty, f);
            visit(expression, f);
        }
        NodeKind::ExpressionWithTypeArguments {
            expression,
            type_arguments,
        } => {
            visit(expression, f);
            visit(type_arguments, f);
        }
        NodeKind::ImportCallExpression { arguments } => visit_all(arguments, f),

        NodeKind::ObjectBindingPattern { elements }
        | NodeKind::ArrayBindingPattern { elements } => visit_all(elements, f),
        NodeKind::BindingElement(data) => {
            visit(&mut data.property_name, f);
            visit(&mut data.name, f);
            visit(&mut data.initializer, f);
        }

        NodeKind::Block { statements, .. } => visit_all(statements, f),
        NodeKind::VariableStatement { declarations, .. } => visit(declarations, f),
        NodeKind::VariableDeclarationList { declarations, .. } => visit_all(declarations, f),
        NodeKind::VariableDeclaration {
            name,
            ty,
            initializer,
            ..
        } => {
            visit(name, f);
            visit(ty, f);
            visit(initializer, f);
        }
        NodeKind::IfStatement {
            condition,
            then_statement,
            else_statement,
        } => {
            visit(condition, f);
            visit(then_statement, f);
            visit(else_statement, f);
        }
        NodeKind::DoStatement { statement, condition } => {
            visit(statement, f);
            visit(condition, f);
        }
        NodeKind::WhileStatement { condition, statement } => {
            visit(condition, f);
            visit(statement, f);
        }
        NodeKind::ForStatement {
            initializer,
            condition,
            incrementor,
            statement,
        } => {
            visit(initializer, f);
            visit(condition, f);
            visit(incrementor, f);
            visit(statement, f);
        }
        NodeKind::ForInStatement {
            initializer,
            expression,
            statement,
        }
        | NodeKind::ForOfStatement {
            initializer,
            expression,
            statement,
            ..
        } => {
            visit(initializer, f);
            visit(expression, f);
            visit(statement, f);
        }
        NodeKind::ContinueStatement { label } | NodeKind::BreakStatement { label } => {
            visit(label, f)
        }
        NodeKind::ReturnStatement { expression } => visit(expression, f),
        NodeKind::WithStatement { expression, statement } => {
            visit(expression, f);
            visit(statement, f);
        }
        NodeKind::SwitchStatement { expression, clauses } => {
            visit(expression, f);
            visit_all(clauses, f);
        }
        NodeKind::CaseClause {
            expression,
            statements,
        } => {
            visit(expression, f);
            visit_all(statements, f);
        }
        NodeKind::LabeledStatement { label, statement } => {
            visit(label, f);
            visit(statement, f);
        }
        NodeKind::TryStatement {
            try_block,
            catch_clause,
            finally_block,
        } => {
            visit(try_block, f);
            visit(catch_clause, f);
            visit(finally_block, f);
        }
        NodeKind::CatchClause {
            variable_declaration,
            block,
        } => {
            visit(variable_declaration, f);
            visit(block, f);
        }

        NodeKind::InterfaceDeclaration { name, .. }
        | NodeKind::TypeAliasDeclaration { name, .. } => visit(name, f),
        NodeKind::EnumDeclaration(data) => {
            visit(&mut data.name, f);
            visit_all(&mut data.members, f);
        }
        NodeKind::EnumMember { name, initializer } => {
            visit(name, f);
            visit(initializer, f);
        }
        NodeKind::ModuleDeclaration(data) => {
            visit(&mut data.name, f);
            visit(&mut data.body, f);
        }
        NodeKind::ModuleBlock { statements } => visit_all(statements, f),
        NodeKind::ImportEqualsDeclaration(data) => {
            visit(&mut data.name, f);
            visit(&mut data.reference, f);
        }
        NodeKind::ImportDeclaration(data) => {
            visit(&mut data.import_clause, f);
            visit(&mut data.module_specifier, f);
        }
        NodeKind::ImportClause {
            name,
            named_bindings,
            ..
        } => {
            visit(name, f);
            visit(named_bindings, f);
        }
        NodeKind::NamespaceImport { name } => visit(name, f),
        NodeKind::NamedImports { elements } | NodeKind::NamedExports { elements } => {
            visit_all(elements, f)
        }
        NodeKind::ImportSpecifier {
            property_name,
            name,
            ..
        }
        | NodeKind::ExportSpecifier {
            property_name,
            name,
            ..
        } => {
            visit(property_name, f);
            visit(name, f);
        }
        NodeKind::ExportAssignment { expression, .. } => visit(expression, f),
        NodeKind::ExportDeclaration(data) => {
            visit(&mut data.export_clause, f);
            visit(&mut data.module_specifier, f);
        }
        NodeKind::NamespaceExport { name }
        | NodeKind::NamespaceExportDeclaration { name } => visit(name, f),

        NodeKind::PropertyDeclaration(data) => {
            visit_all(&mut data.decorators, f);
            visit(&mut data.name, f);
            visit(&mut data.ty, f);
            visit(&mut data.initializer, f);
        }
        NodeKind::ClassStaticBlockDeclaration { body } => visit(body, f),
        NodeKind::Parameter(data) => {
            visit_all(&mut data.decorators, f);
            visit(&mut data.name, f);
            visit(&mut data.ty, f);
            visit(&mut data.initializer, f);
        }

        NodeKind::JsxElement {
            opening,
            children,
            closing,
        } => {
            visit(opening, f);
            visit_all(children, f);
            visit(closing, f);
        }
        NodeKind::JsxSelfClosingElement {
            tag_name,
            type_arguments,
            attributes,
        }
        | NodeKind::JsxOpeningElement {
            tag_name,
            type_arguments,
            attributes,
        } => {
            visit(tag_name, f);
            visit(type_arguments, f);
            visit_all(attributes, f);
        }
        NodeKind::JsxClosingElement { tag_name } => visit(tag_name, f),
        NodeKind::JsxFragment { children } => visit_all(children, f),
        NodeKind::JsxExpression { expression, .. } => visit(expression, f),
        NodeKind::JsxAttribute { name, initializer } => {
            visit(name, f);
            visit(initializer, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_children_shares_unchanged_nodes() {
        let mut arena = NodeArena::new();
        let left = arena.synth_identifier("a");
        let right = arena.synth_identifier("b");
        let expr = arena.synth_binary(left, tsdl_scanner::SyntaxKind::PlusToken, right);

        let same = map_children(&mut arena, expr, &mut |_, child| child);
        assert_eq!(same, expr);

        let replaced = map_children(&mut arena, expr, &mut |arena, child| {
            if arena.identifier_text(child) == Some("a") {
                arena.synth_identifier("z")
            } else {
                child
            }
        });
        assert_ne!(replaced, expr);
        assert_eq!(arena.get(replaced).original, expr);
        match arena.kind(replaced) {
            NodeKind::BinaryExpression { left, right, .. } => {
                assert_eq!(arena.identifier_text(*left), Some("z"));
                assert_eq!(arena.identifier_text(*right), Some("b"));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn for_each_child_visits_in_source_order() {
        let mut arena = NodeArena::new();
        let a = arena.synth_identifier("a");
        let b = arena.synth_identifier("b");
        let stmt_a = arena.synth_expression_statement(a);
        let stmt_b = arena.synth_expression_statement(b);
        let block = arena.synth_block(vec![stmt_a, stmt_b], true);

        let mut seen = Vec::new();
        for_each_child(&arena, block, &mut |child| seen.push(child));
        assert_eq!(seen, vec![stmt_a, stmt_b]);
    }
}
