//! Class member lowering.
//!
//! Drops type-level members (abstract and declared properties, overload
//! signatures, index signatures), expands parameter properties, and in
//! assign mode moves field initializers into the constructor: instance
//! fields become `this.x = init` after any `super()` call, initialized
//! statics of a named class declaration become `C.x = init` statements
//! after the class. Define mode keeps field declarations in place.

use tsdl_parser::ast::{FunctionData, PropertyData};
use tsdl_parser::{ModifierFlags, NodeArena, NodeId, NodeKind};

use crate::context::EmitContext;
use crate::transforms;

pub(crate) fn lower_class_statement(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    statement: NodeId,
    out: &mut Vec<NodeId>,
) {
    let statics = restructure(cx, arena, statement, false);
    out.push(transforms::lower_node(cx, arena, statement));
    for assignment in statics {
        out.push(transforms::lower_node(cx, arena, assignment));
    }
}

/// Class expressions restructure in place; statics stay inside the
/// class body because there is no statement position to move them to.
pub(crate) fn lower_class_expression(cx: &mut EmitContext, arena: &mut NodeArena, node: NodeId) {
    restructure(cx, arena, node, true);
}

/// Rewrite the member list of a class node. Returns the static
/// assignment statements to place after the declaration (assign mode,
/// named class declarations only).
fn restructure(
    cx: &mut EmitContext,
    arena: &mut NodeArena,
    class: NodeId,
    is_expression: bool,
) -> Vec<NodeId> {
    let (members, extends, name) = match &arena.get(class).kind {
        NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => {
            (data.members.clone(), data.extends, data.name)
        }
        _ => return Vec::new(),
    };
    let use_define = cx.options.class_fields_use_define();
    let class_name = if is_expression {
        None
    } else {
        arena.declared_name_text(name).map(str::to_string)
    };
    let extract_statics = !use_define && class_name.is_some();

    let mut kept = Vec::with_capacity(members.len());
    let mut ctor = None;
    let mut instance_assignments = Vec::new();
    let mut statics = Vec::new();

    for &member in &members {
        match &arena.get(member).kind {
            NodeKind::PropertyDeclaration(property) => {
                let modifiers = property.modifiers;
                let name = property.name;
                let initializer = property.initializer;
                if modifiers.intersects(ModifierFlags::ABSTRACT | ModifierFlags::DECLARE) {
                    continue;
                }
                // `accessor` fields keep their declaration form, and
                // `#name` fields must stay declared in the body for the
                // constructor write to be legal.
                let fixed = modifiers.contains(ModifierFlags::ACCESSOR)
                    || matches!(arena.get(name).kind, NodeKind::PrivateIdentifier { .. });
                // Initializer-less fields keep their declaration form in
                // both modes; only the initializer moves in assign mode.
                let movable = initializer.is_some() && !fixed;
                if modifiers.contains(ModifierFlags::STATIC) {
                    if extract_statics && movable {
                        if let Some(class_name) = &class_name {
                            statics.push(member_assignment(
                                arena,
                                MemberBase::Name(class_name.clone()),
                                name,
                                initializer,
                                member,
                            ));
                            continue;
                        }
                    }
                    kept.push(member);
                } else if !use_define && movable {
                    instance_assignments.push(member_assignment(
                        arena,
                        MemberBase::This,
                        name,
                        initializer,
                        member,
                    ));
                } else {
                    kept.push(member);
                }
            }
            NodeKind::ConstructorDeclaration(function) => {
                if function.body.is_none() {
                    continue;
                }
                ctor = Some(member);
                kept.push(member);
            }
            NodeKind::MethodDeclaration(function)
            | NodeKind::GetAccessorDeclaration(function)
            | NodeKind::SetAccessorDeclaration(function) => {
                if function.body.is_none() || function.modifiers.contains(ModifierFlags::ABSTRACT) {
                    continue;
                }
                kept.push(member);
            }
            NodeKind::IndexSignature => continue,
            _ => kept.push(member),
        }
    }

    let mut parameter_fields = Vec::new();
    let mut parameter_assignments = Vec::new();
    if let Some(ctor_node) = ctor {
        expand_parameter_properties(
            cx,
            arena,
            ctor_node,
            &mut parameter_fields,
            &mut parameter_assignments,
        );
    }

    if !parameter_assignments.is_empty() || !instance_assignments.is_empty() {
        match ctor {
            Some(ctor_node) => splice_into_constructor(
                arena,
                ctor_node,
                parameter_assignments,
                instance_assignments,
            ),
            None => {
                let ctor_node = synthesize_constructor(arena, extends, instance_assignments);
                kept.insert(0, ctor_node);
            }
        }
    }
    if !parameter_fields.is_empty()
        && let Some(ctor_node) = ctor
    {
        let at = kept
            .iter()
            .position(|&member| member == ctor_node)
            .unwrap_or(0);
        kept.splice(at..at, parameter_fields);
    }

    match &mut arena.get_mut(class).kind {
        NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => {
            data.members = kept;
        }
        _ => {}
    }
    statics
}

/// Constructor parameters with accessibility or readonly modifiers
/// declare same-named properties initialized from the parameter.
fn expand_parameter_properties(
    cx: &EmitContext,
    arena: &mut NodeArena,
    ctor: NodeId,
    fields: &mut Vec<NodeId>,
    assignments: &mut Vec<NodeId>,
) {
    let parameters = match &arena.get(ctor).kind {
        NodeKind::ConstructorDeclaration(function) => function.parameters.clone(),
        _ => return,
    };
    let use_define = cx.options.class_fields_use_define();
    for &parameter in &parameters {
        let NodeKind::Parameter(data) = &arena.get(parameter).kind else {
            continue;
        };
        if !data.modifiers.is_parameter_property() {
            continue;
        }
        let name = data.name;
        let Some(text) = arena.identifier_text(name).map(str::to_string) else {
            continue;
        };
        if use_define {
            let field_name = arena.synth_identifier(&text);
            fields.push(arena.synth(
                parameter,
                NodeKind::PropertyDeclaration(Box::new(PropertyData {
                    modifiers: ModifierFlags::empty(),
                    decorators: Vec::new(),
                    name: field_name,
                    question: false,
                    exclamation: false,
                    ty: NodeId::NONE,
                    initializer: NodeId::NONE,
                })),
            ));
        }
        let this = arena.synth(NodeId::NONE, NodeKind::ThisExpression);
        let target = arena.synth_prop_access(this, &text);
        let value = arena.synth_identifier(&text);
        let assign = arena.synth_assign(target, value);
        assignments.push(arena.synth_expression_statement(assign));
    }
}

enum MemberBase {
    This,
    Name(String),
}

/// `this.x = init;` or `C.x = init;`, reusing the written name node so
/// computed and literal property names keep their form.
fn member_assignment(
    arena: &mut NodeArena,
    base: MemberBase,
    name: NodeId,
    initializer: NodeId,
    member: NodeId,
) -> NodeId {
    let base = match base {
        MemberBase::This => arena.synth(NodeId::NONE, NodeKind::ThisExpression),
        MemberBase::Name(text) => arena.synth_identifier(&text),
    };
    let target = match &arena.get(name).kind {
        NodeKind::ComputedPropertyName { expression } => {
            let expression = *expression;
            arena.synth_element_access(base, expression)
        }
        NodeKind::StringLiteral { .. } | NodeKind::NumericLiteral { .. } => {
            arena.synth_element_access(base, name)
        }
        _ => arena.synth(
            NodeId::NONE,
            NodeKind::PropertyAccessExpression {
                expression: base,
                question_dot: false,
                name,
            },
        ),
    };
    let assign = arena.synth_assign(target, initializer);
    arena.synth_expression_statement_for(member, assign)
}

fn splice_into_constructor(
    arena: &mut NodeArena,
    ctor: NodeId,
    parameter_assignments: Vec<NodeId>,
    field_assignments: Vec<NodeId>,
) {
    let body = match &arena.get(ctor).kind {
        NodeKind::ConstructorDeclaration(function) => function.body,
        _ => return,
    };
    let NodeKind::Block { statements, .. } = &arena.get(body).kind else {
        return;
    };
    let statements = statements.clone();
    let at = super_call_index(arena, &statements).map_or(0, |index| index + 1);
    let mut inserted = parameter_assignments;
    inserted.extend(field_assignments);
    let mut updated = statements;
    updated.splice(at..at, inserted);
    if let NodeKind::Block {
        statements,
        multiline,
    } = &mut arena.get_mut(body).kind
    {
        *statements = updated;
        *multiline = true;
    }
}

fn super_call_index(arena: &NodeArena, statements: &[NodeId]) -> Option<usize> {
    statements.iter().position(|&statement| {
        let NodeKind::ExpressionStatement { expression } = &arena.get(statement).kind else {
            return false;
        };
        matches!(
            &arena.get(*expression).kind,
            NodeKind::CallExpression(call)
                if matches!(arena.get(call.expression).kind, NodeKind::SuperExpression)
        )
    })
}

/// `constructor() { super(...arguments); <assignments> }`, the
/// `super` call only for derived classes.
fn synthesize_constructor(
    arena: &mut NodeArena,
    extends: NodeId,
    assignments: Vec<NodeId>,
) -> NodeId {
    let mut body = Vec::new();
    if extends.is_some() {
        let callee = arena.synth(NodeId::NONE, NodeKind::SuperExpression);
        let arguments = arena.synth_identifier("arguments");
        let spread = arena.synth(
            NodeId::NONE,
            NodeKind::SpreadElement {
                expression: arguments,
            },
        );
        let call = arena.synth_call(callee, vec![spread]);
        body.push(arena.synth_expression_statement(call));
    }
    body.extend(assignments);
    let block = arena.synth_block(body, true);
    arena.synth(
        NodeId::NONE,
        NodeKind::ConstructorDeclaration(Box::new(FunctionData {
            modifiers: ModifierFlags::empty(),
            decorators: Vec::new(),
            asterisk: false,
            name: NodeId::NONE,
            question: false,
            type_parameters: NodeId::NONE,
            parameters: Vec::new(),
            return_type: NodeId::NONE,
            body: block,
            is_arrow_expression_body: false,
            parenthesized_parameters: true,
        })),
    )
}
