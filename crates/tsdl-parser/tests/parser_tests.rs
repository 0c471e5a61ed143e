//! Parser coverage: statements, declarations, expressions, type-position
//! skipping, JSX, and error recovery.

use tsdl_parser::ast::ParameterData;
use tsdl_parser::{ModifierFlags, NodeId, NodeKind, ParseTree, ParserState, VarFlavor};

fn parse(source: &str) -> ParseTree {
    ParserState::new("test.ts", source).parse_source_file()
}

fn parse_tsx(source: &str) -> ParseTree {
    ParserState::new("test.tsx", source).parse_source_file()
}

fn statements(tree: &ParseTree) -> Vec<NodeId> {
    match tree.arena.kind(tree.root) {
        NodeKind::SourceFile(data) => data.statements.clone(),
        other => panic!("root is not a source file: {other:?}"),
    }
}

fn assert_clean(tree: &ParseTree) {
    assert!(
        tree.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        tree.diagnostics
    );
}

fn span_text<'a>(tree: &ParseTree, source: &'a str, id: NodeId) -> &'a str {
    let span = tree.arena.span(id);
    &source[span.start as usize..span.end as usize]
}

/// Initializer of the first declarator of the first statement.
fn first_initializer(tree: &ParseTree) -> NodeId {
    nth_initializer(tree, 0)
}

fn nth_initializer(tree: &ParseTree, n: usize) -> NodeId {
    let stmts = statements(tree);
    let NodeKind::VariableStatement { declarations, .. } = tree.arena.kind(stmts[n]) else {
        panic!("statement {n} is not a variable statement");
    };
    let NodeKind::VariableDeclarationList { declarations, .. } = tree.arena.kind(*declarations)
    else {
        panic!("missing declaration list");
    };
    let NodeKind::VariableDeclaration { initializer, .. } = tree.arena.kind(declarations[0]) else {
        panic!("missing declaration");
    };
    *initializer
}

#[test]
fn parses_simple_script_without_diagnostics() {
    let tree = parse("var a = 1;\nlet b = a + 2;\nconsole.log(a, b);\n");
    assert_clean(&tree);
    assert_eq!(statements(&tree).len(), 3);
}

#[test]
fn type_annotation_becomes_single_type_node() {
    let source = "const x: Map<string, number> = new Map();";
    let tree = parse(source);
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::VariableStatement { declarations, .. } = tree.arena.kind(stmts[0]) else {
        panic!("expected variable statement");
    };
    let NodeKind::VariableDeclarationList {
        flavor,
        declarations,
    } = tree.arena.kind(*declarations)
    else {
        panic!("expected declaration list");
    };
    assert_eq!(*flavor, VarFlavor::Const);
    let NodeKind::VariableDeclaration {
        ty, initializer, ..
    } = tree.arena.kind(declarations[0])
    else {
        panic!("expected declaration");
    };
    assert!(matches!(tree.arena.kind(*ty), NodeKind::TypeNode));
    assert_eq!(span_text(&tree, source, *ty), "Map<string, number>");
    assert!(matches!(
        tree.arena.kind(*initializer),
        NodeKind::NewExpression(_)
    ));
}

#[test]
fn arrow_function_with_default_parameter() {
    let tree = parse("const f = (a, b = 1) => a + b;");
    assert_clean(&tree);
    let NodeKind::ArrowFunction(f) = tree.arena.kind(first_initializer(&tree)) else {
        panic!("expected arrow function");
    };
    assert_eq!(f.parameters.len(), 2);
    assert!(f.is_arrow_expression_body);
    assert!(f.parenthesized_parameters);
    let NodeKind::Parameter(second) = tree.arena.kind(f.parameters[1]) else {
        panic!("expected parameter");
    };
    assert!(second.initializer.is_some());
}

#[test]
fn single_parameter_arrow_without_parens() {
    let tree = parse("const id = x => x;");
    assert_clean(&tree);
    let NodeKind::ArrowFunction(f) = tree.arena.kind(first_initializer(&tree)) else {
        panic!("expected arrow function");
    };
    assert_eq!(f.parameters.len(), 1);
    assert!(!f.parenthesized_parameters);
}

#[test]
fn parenthesized_sequence_is_not_an_arrow_head() {
    let tree = parse("(a, b);");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ExpressionStatement { expression } = tree.arena.kind(stmts[0]) else {
        panic!("expected expression statement");
    };
    let NodeKind::ParenthesizedExpression { expression } = tree.arena.kind(*expression) else {
        panic!("expected parenthesized expression");
    };
    assert!(matches!(
        tree.arena.kind(*expression),
        NodeKind::BinaryExpression { .. }
    ));
}

#[test]
fn conditional_with_parenthesized_true_branch() {
    // `(a)` here is an operand, not an arrow parameter list with `: b`
    // as a return type.
    let tree = parse("const r = flag ? (a) : b;");
    assert_clean(&tree);
    let NodeKind::ConditionalExpression { when_true, .. } =
        tree.arena.kind(first_initializer(&tree))
    else {
        panic!("expected conditional");
    };
    assert!(matches!(
        tree.arena.kind(*when_true),
        NodeKind::ParenthesizedExpression { .. }
    ));
}

#[test]
fn generic_call_versus_relational_chain() {
    let tree = parse("f<number>(x);\na < b > c;");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ExpressionStatement { expression } = tree.arena.kind(stmts[0]) else {
        panic!("expected expression statement");
    };
    let NodeKind::CallExpression(call) = tree.arena.kind(*expression) else {
        panic!("expected call");
    };
    assert!(call.type_arguments.is_some());
    let NodeKind::ExpressionStatement { expression } = tree.arena.kind(stmts[1]) else {
        panic!("expected expression statement");
    };
    assert!(matches!(
        tree.arena.kind(*expression),
        NodeKind::BinaryExpression { .. }
    ));
}

#[test]
fn automatic_semicolon_insertion_after_return() {
    let tree = parse("function f() {\n    return\n    1;\n}");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::FunctionDeclaration(f) = tree.arena.kind(stmts[0]) else {
        panic!("expected function");
    };
    let NodeKind::Block { statements, .. } = tree.arena.kind(f.body) else {
        panic!("expected body block");
    };
    assert_eq!(statements.len(), 2);
    let NodeKind::ReturnStatement { expression } = tree.arena.kind(statements[0]) else {
        panic!("expected return");
    };
    assert!(expression.is_none());
}

#[test]
fn template_with_substitutions() {
    let tree = parse("const t = `a${b}c${d}e`;");
    assert_clean(&tree);
    let NodeKind::TemplateExpression { head_raw, spans } =
        tree.arena.kind(first_initializer(&tree))
    else {
        panic!("expected template expression");
    };
    assert_eq!(head_raw, "`a${");
    assert_eq!(spans.len(), 2);
    let NodeKind::TemplateSpan { literal_raw, .. } = tree.arena.kind(spans[0]) else {
        panic!("expected span");
    };
    assert_eq!(literal_raw, "}c${");
    let NodeKind::TemplateSpan { literal_raw, .. } = tree.arena.kind(spans[1]) else {
        panic!("expected span");
    };
    assert_eq!(literal_raw, "}e`");
}

#[test]
fn regex_literal_versus_division() {
    let tree = parse("const re = /ab+c/g;\nconst q = a / b;");
    assert_clean(&tree);
    let NodeKind::RegularExpressionLiteral { raw } = tree.arena.kind(first_initializer(&tree))
    else {
        panic!("expected regex literal");
    };
    assert_eq!(raw, "/ab+c/g");
    assert!(matches!(
        tree.arena.kind(nth_initializer(&tree, 1)),
        NodeKind::BinaryExpression { .. }
    ));
}

#[test]
fn optional_chain_and_non_null() {
    let tree = parse("const v = a?.b!.c?.[0]?.();");
    assert_clean(&tree);
    let NodeKind::CallExpression(call) = tree.arena.kind(first_initializer(&tree)) else {
        panic!("expected call at the end of the chain");
    };
    assert!(call.question_dot);
    assert!(matches!(
        tree.arena.kind(call.expression),
        NodeKind::ElementAccessExpression {
            question_dot: true,
            ..
        }
    ));
}

#[test]
fn class_member_forms() {
    let tree = parse(
        "class Point {\n\
         \x20   static origin = new Point(0, 0);\n\
         \x20   #secret = 1;\n\
         \x20   readonly x: number;\n\
         \x20   constructor(public px: number, private py = 2) {}\n\
         \x20   get length(): number { return 0; }\n\
         \x20   set length(v) {}\n\
         \x20   *items() {}\n\
         \x20   async fetch?(): Promise<void> {}\n\
         \x20   [Symbol.iterator]() {}\n\
         \x20   static { setup(); }\n\
         \x20   [key: string]: any;\n\
         }",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ClassDeclaration(class) = tree.arena.kind(stmts[0]) else {
        panic!("expected class");
    };
    assert_eq!(class.members.len(), 11);
    assert!(matches!(
        tree.arena.kind(class.members[0]),
        NodeKind::PropertyDeclaration(p) if p.modifiers.contains(ModifierFlags::STATIC)
    ));
    assert!(matches!(
        tree.arena.kind(class.members[1]),
        NodeKind::PropertyDeclaration(_)
    ));
    assert!(matches!(
        tree.arena.kind(class.members[3]),
        NodeKind::ConstructorDeclaration(_)
    ));
    assert!(matches!(
        tree.arena.kind(class.members[4]),
        NodeKind::GetAccessorDeclaration(_)
    ));
    assert!(matches!(
        tree.arena.kind(class.members[5]),
        NodeKind::SetAccessorDeclaration(_)
    ));
    let NodeKind::MethodDeclaration(items) = tree.arena.kind(class.members[6]) else {
        panic!("expected generator method");
    };
    assert!(items.asterisk);
    let NodeKind::MethodDeclaration(fetch) = tree.arena.kind(class.members[7]) else {
        panic!("expected async method");
    };
    assert!(fetch.modifiers.contains(ModifierFlags::ASYNC));
    assert!(fetch.question);
    let NodeKind::MethodDeclaration(computed) = tree.arena.kind(class.members[8]) else {
        panic!("expected computed-name method");
    };
    assert!(matches!(
        tree.arena.kind(computed.name),
        NodeKind::ComputedPropertyName { .. }
    ));
    assert!(matches!(
        tree.arena.kind(class.members[9]),
        NodeKind::ClassStaticBlockDeclaration { .. }
    ));
    assert!(matches!(
        tree.arena.kind(class.members[10]),
        NodeKind::IndexSignature
    ));
}

#[test]
fn constructor_parameter_properties_are_marked() {
    let tree = parse("class C { constructor(public a: number, b: string) {} }");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ClassDeclaration(class) = tree.arena.kind(stmts[0]) else {
        panic!("expected class");
    };
    let NodeKind::ConstructorDeclaration(ctor) = tree.arena.kind(class.members[0]) else {
        panic!("expected constructor");
    };
    let params: Vec<&ParameterData> = ctor
        .parameters
        .iter()
        .map(|&p| match tree.arena.kind(p) {
            NodeKind::Parameter(data) => &**data,
            other => panic!("expected parameter, got {other:?}"),
        })
        .collect();
    assert!(params[0].modifiers.is_parameter_property());
    assert!(!params[1].modifiers.is_parameter_property());
}

#[test]
fn this_parameter_never_becomes_a_node() {
    let source = "function attach(this: Window, handler: Handler) {\n    handler();\n}";
    let tree = parse(source);
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::FunctionDeclaration(f) = tree.arena.kind(stmts[0]) else {
        panic!("expected function");
    };
    assert_eq!(f.parameters.len(), 1);
    let NodeKind::Parameter(only) = tree.arena.kind(f.parameters[0]) else {
        panic!("expected parameter");
    };
    assert_eq!(span_text(&tree, source, only.name), "handler");
}

#[test]
fn lone_this_parameter_leaves_method_nullary() {
    let tree = parse("class C { run(this: C): void {} }");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ClassDeclaration(class) = tree.arena.kind(stmts[0]) else {
        panic!("expected class");
    };
    let NodeKind::MethodDeclaration(method) = tree.arena.kind(class.members[0]) else {
        panic!("expected method");
    };
    assert!(method.parameters.is_empty());
}

#[test]
fn const_enum_flag_and_members() {
    let tree = parse(
        "const enum Direction {\n    Up = 1,\n    Down,\n    Left = Up + 2,\n    \"quoted\" = 4,\n}",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::EnumDeclaration(data) = tree.arena.kind(stmts[0]) else {
        panic!("expected enum");
    };
    assert!(data.is_const);
    assert_eq!(data.members.len(), 4);
    let NodeKind::EnumMember { name, initializer } = tree.arena.kind(data.members[3]) else {
        panic!("expected member");
    };
    assert!(matches!(
        tree.arena.kind(*name),
        NodeKind::StringLiteral { .. }
    ));
    assert!(initializer.is_some());
    let NodeKind::EnumMember { initializer, .. } = tree.arena.kind(data.members[1]) else {
        panic!("expected member");
    };
    assert!(initializer.is_none());
}

#[test]
fn dotted_namespace_expands_to_nested_modules() {
    let tree = parse("namespace A.B { export const x = 1; }");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ModuleDeclaration(outer) = tree.arena.kind(stmts[0]) else {
        panic!("expected module declaration");
    };
    assert!(outer.is_namespace_keyword);
    assert_eq!(tree.arena.identifier_text(outer.name), Some("A"));
    let NodeKind::ModuleDeclaration(inner) = tree.arena.kind(outer.body) else {
        panic!("expected nested module for dotted name");
    };
    assert_eq!(tree.arena.identifier_text(inner.name), Some("B"));
    assert!(inner.modifiers.is_exported());
    let NodeKind::ModuleBlock { statements } = tree.arena.kind(inner.body) else {
        panic!("expected module block");
    };
    assert_eq!(statements.len(), 1);
}

#[test]
fn import_declaration_forms() {
    let tree = parse(
        "import def from \"./a\";\n\
         import * as ns from \"./b\";\n\
         import { x, y as z } from \"./c\";\n\
         import type { T } from \"./d\";\n\
         import \"./side-effect\";\n\
         import eq = require(\"./e\");\n",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 6);

    let NodeKind::ImportDeclaration(default_import) = tree.arena.kind(stmts[0]) else {
        panic!("expected import");
    };
    let NodeKind::ImportClause { name, .. } = tree.arena.kind(default_import.import_clause)
    else {
        panic!("expected clause");
    };
    assert!(name.is_some());

    let NodeKind::ImportDeclaration(ns_import) = tree.arena.kind(stmts[1]) else {
        panic!("expected import");
    };
    let NodeKind::ImportClause { named_bindings, .. } = tree.arena.kind(ns_import.import_clause)
    else {
        panic!("expected clause");
    };
    assert!(matches!(
        tree.arena.kind(*named_bindings),
        NodeKind::NamespaceImport { .. }
    ));

    let NodeKind::ImportDeclaration(named) = tree.arena.kind(stmts[2]) else {
        panic!("expected import");
    };
    let NodeKind::ImportClause { named_bindings, .. } = tree.arena.kind(named.import_clause)
    else {
        panic!("expected clause");
    };
    let NodeKind::NamedImports { elements } = tree.arena.kind(*named_bindings) else {
        panic!("expected named imports");
    };
    assert_eq!(elements.len(), 2);
    let NodeKind::ImportSpecifier { property_name, .. } = tree.arena.kind(elements[1]) else {
        panic!("expected specifier");
    };
    assert!(property_name.is_some());

    let NodeKind::ImportDeclaration(type_only) = tree.arena.kind(stmts[3]) else {
        panic!("expected import");
    };
    assert!(matches!(
        tree.arena.kind(type_only.import_clause),
        NodeKind::ImportClause {
            is_type_only: true,
            ..
        }
    ));

    let NodeKind::ImportDeclaration(side_effect) = tree.arena.kind(stmts[4]) else {
        panic!("expected import");
    };
    assert!(side_effect.import_clause.is_none());

    let NodeKind::ImportEqualsDeclaration(eq) = tree.arena.kind(stmts[5]) else {
        panic!("expected import equals");
    };
    assert!(eq.is_require);
}

#[test]
fn type_only_marker_on_individual_specifiers() {
    let tree = parse("import { type T, value } from \"./m\";");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ImportDeclaration(data) = tree.arena.kind(stmts[0]) else {
        panic!("expected import");
    };
    let NodeKind::ImportClause { named_bindings, .. } = tree.arena.kind(data.import_clause)
    else {
        panic!("expected clause");
    };
    let NodeKind::NamedImports { elements } = tree.arena.kind(*named_bindings) else {
        panic!("expected named imports");
    };
    assert!(matches!(
        tree.arena.kind(elements[0]),
        NodeKind::ImportSpecifier {
            is_type_only: true,
            ..
        }
    ));
    assert!(matches!(
        tree.arena.kind(elements[1]),
        NodeKind::ImportSpecifier {
            is_type_only: false,
            ..
        }
    ));
}

#[test]
fn export_declaration_forms() {
    let tree = parse(
        "export const a = 1;\n\
         export default function named() {}\n\
         export { a as b };\n\
         export * as everything from \"./m\";\n\
         export type { T };\n\
         export = legacy;\n",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 6);

    let NodeKind::VariableStatement { modifiers, .. } = tree.arena.kind(stmts[0]) else {
        panic!("expected variable statement");
    };
    assert!(modifiers.is_exported());

    let NodeKind::FunctionDeclaration(f) = tree.arena.kind(stmts[1]) else {
        panic!("expected function");
    };
    assert!(f.modifiers.contains(ModifierFlags::EXPORT | ModifierFlags::DEFAULT));

    let NodeKind::ExportDeclaration(local) = tree.arena.kind(stmts[2]) else {
        panic!("expected export declaration");
    };
    let NodeKind::NamedExports { elements } = tree.arena.kind(local.export_clause) else {
        panic!("expected named exports");
    };
    assert_eq!(elements.len(), 1);
    assert!(local.module_specifier.is_none());

    let NodeKind::ExportDeclaration(star) = tree.arena.kind(stmts[3]) else {
        panic!("expected export declaration");
    };
    assert!(star.is_star);
    assert!(matches!(
        tree.arena.kind(star.export_clause),
        NodeKind::NamespaceExport { .. }
    ));
    assert!(star.module_specifier.is_some());

    let NodeKind::ExportDeclaration(type_only) = tree.arena.kind(stmts[4]) else {
        panic!("expected export declaration");
    };
    assert!(type_only.is_type_only);

    let NodeKind::ExportAssignment {
        is_export_equals, ..
    } = tree.arena.kind(stmts[5])
    else {
        panic!("expected export assignment");
    };
    assert!(*is_export_equals);
}

#[test]
fn export_import_equals() {
    let tree = parse("export import Shortcut = Long.Path.Name;");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ImportEqualsDeclaration(data) = tree.arena.kind(stmts[0]) else {
        panic!("expected import equals");
    };
    assert!(data.modifiers.is_exported());
    assert!(!data.is_require);
    assert!(matches!(
        tree.arena.kind(data.reference),
        NodeKind::QualifiedName { .. }
    ));
}

#[test]
fn module_indicator_distinguishes_scripts() {
    let script = parse("const a = 1;\nfunction f() {}\n");
    let NodeKind::SourceFile(data) = script.arena.kind(script.root) else {
        panic!()
    };
    assert!(!data.is_module);

    let module = parse("import \"./x\";\nconst a = 1;\n");
    let NodeKind::SourceFile(data) = module.arena.kind(module.root) else {
        panic!()
    };
    assert!(data.is_module);

    let exporter = parse("export const a = 1;\n");
    let NodeKind::SourceFile(data) = exporter.arena.kind(exporter.root) else {
        panic!()
    };
    assert!(data.is_module);
}

#[test]
fn recovery_continues_after_malformed_initializer() {
    let tree = parse("const x = ;\nconst y = 2;");
    assert!(!tree.diagnostics.is_empty());
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 2);
    assert!(matches!(
        tree.arena.kind(stmts[1]),
        NodeKind::VariableStatement { .. }
    ));
}

#[test]
fn recovery_on_stray_close_brace() {
    let tree = parse("}\nconst ok = 1;");
    assert!(!tree.diagnostics.is_empty());
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 1);
}

#[test]
fn labeled_loops_and_for_variants() {
    let tree = parse(
        "outer: for (const k in obj) { continue outer; }\n\
         for (let i = 0; i < 10; i++) { break; }\n\
         for await (const v of xs) {}\n",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::LabeledStatement { statement, .. } = tree.arena.kind(stmts[0]) else {
        panic!("expected labeled statement");
    };
    assert!(matches!(
        tree.arena.kind(*statement),
        NodeKind::ForInStatement { .. }
    ));
    assert!(matches!(
        tree.arena.kind(stmts[1]),
        NodeKind::ForStatement { .. }
    ));
    assert!(matches!(
        tree.arena.kind(stmts[2]),
        NodeKind::ForOfStatement {
            await_modifier: true,
            ..
        }
    ));
}

#[test]
fn catch_binding_with_type_annotation() {
    let tree = parse("try { risky(); } catch (e: unknown) { handle(e); } finally { done(); }");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::TryStatement {
        catch_clause,
        finally_block,
        ..
    } = tree.arena.kind(stmts[0])
    else {
        panic!("expected try statement");
    };
    assert!(finally_block.is_some());
    let NodeKind::CatchClause {
        variable_declaration,
        ..
    } = tree.arena.kind(*catch_clause)
    else {
        panic!("expected catch clause");
    };
    assert!(variable_declaration.is_some());
}

#[test]
fn as_and_satisfies_expressions() {
    let tree = parse("const c = conf as Config;\nconst d = data satisfies Base;");
    assert_clean(&tree);
    assert!(matches!(
        tree.arena.kind(first_initializer(&tree)),
        NodeKind::AsExpression { .. }
    ));
    assert!(matches!(
        tree.arena.kind(nth_initializer(&tree, 1)),
        NodeKind::SatisfiesExpression { .. }
    ));
}

#[test]
fn as_type_stops_before_expression_operators() {
    let source = "const n = a as B + 1;";
    let tree = parse(source);
    assert_clean(&tree);
    let NodeKind::BinaryExpression { left, .. } = tree.arena.kind(first_initializer(&tree)) else {
        panic!("expected `(a as B) + 1` to parse as a binary expression");
    };
    let NodeKind::AsExpression { ty, .. } = tree.arena.kind(*left) else {
        panic!("expected as-expression on the left");
    };
    assert_eq!(span_text(&tree, source, *ty), "B");
}

#[test]
fn chained_as_produces_nested_assertions() {
    let tree = parse("const v = x as A as B;");
    assert_clean(&tree);
    let NodeKind::AsExpression { expression, .. } = tree.arena.kind(first_initializer(&tree))
    else {
        panic!("expected as-expression");
    };
    assert!(matches!(
        tree.arena.kind(*expression),
        NodeKind::AsExpression { .. }
    ));
}

#[test]
fn angle_bracket_type_assertion_in_ts() {
    let source = "const n = <number>value;";
    let tree = parse(source);
    assert_clean(&tree);
    let NodeKind::TypeAssertionExpression { ty, expression } =
        tree.arena.kind(first_initializer(&tree))
    else {
        panic!("expected type assertion");
    };
    assert_eq!(span_text(&tree, source, *ty), "number");
    assert_eq!(tree.arena.identifier_text(*expression), Some("value"));
}

#[test]
fn conditional_type_alias_keeps_colon() {
    let tree = parse("type IsString<T> = T extends string ? \"yes\" : \"no\";\nconst after = 1;");
    assert_clean(&tree);
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 2);
    assert!(matches!(
        tree.arena.kind(stmts[0]),
        NodeKind::TypeAliasDeclaration { .. }
    ));
}

#[test]
fn interface_body_with_template_literal_type() {
    let tree = parse(
        "interface Routes {\n    path: `/${string}`;\n    home: \"/\";\n}\nconst after = 1;",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 2);
    assert!(matches!(
        tree.arena.kind(stmts[0]),
        NodeKind::InterfaceDeclaration { .. }
    ));
}

#[test]
fn function_overload_signatures_have_no_body() {
    let tree = parse(
        "function pick(x: string): string;\n\
         function pick(x: number): number;\n\
         function pick(x: any): any { return x; }\n",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 3);
    let bodies: Vec<bool> = stmts
        .iter()
        .map(|&s| match tree.arena.kind(s) {
            NodeKind::FunctionDeclaration(f) => f.body.is_some(),
            other => panic!("expected function, got {other:?}"),
        })
        .collect();
    assert_eq!(bodies, vec![false, false, true]);
}

#[test]
fn yield_forms_in_generator() {
    let tree = parse("function* gen() { yield 1; yield* inner(); const v = yield; }");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::FunctionDeclaration(f) = tree.arena.kind(stmts[0]) else {
        panic!("expected function");
    };
    assert!(f.asterisk);
    let NodeKind::Block { statements, .. } = tree.arena.kind(f.body) else {
        panic!("expected block");
    };
    let NodeKind::ExpressionStatement { expression } = tree.arena.kind(statements[1]) else {
        panic!("expected expression statement");
    };
    let NodeKind::YieldExpression {
        asterisk,
        expression,
    } = tree.arena.kind(*expression)
    else {
        panic!("expected yield");
    };
    assert!(*asterisk);
    assert!(expression.is_some());
}

#[test]
fn await_expression_in_async_function() {
    let tree = parse("async function f() { const r = await fetch(url); return r; }");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::FunctionDeclaration(f) = tree.arena.kind(stmts[0]) else {
        panic!("expected function");
    };
    assert!(f.modifiers.contains(ModifierFlags::ASYNC));
}

#[test]
fn decorators_on_class_and_members() {
    let tree = parse(
        "@injectable()\nclass Service {\n    @observed private count = 0;\n    @bound method() {}\n}",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::ClassDeclaration(class) = tree.arena.kind(stmts[0]) else {
        panic!("expected class");
    };
    assert_eq!(class.decorators.len(), 1);
    let NodeKind::PropertyDeclaration(prop) = tree.arena.kind(class.members[0]) else {
        panic!("expected property");
    };
    assert_eq!(prop.decorators.len(), 1);
    assert!(prop.modifiers.contains(ModifierFlags::PRIVATE));
    let NodeKind::MethodDeclaration(method) = tree.arena.kind(class.members[1]) else {
        panic!("expected method");
    };
    assert_eq!(method.decorators.len(), 1);
}

#[test]
fn destructuring_binding_patterns() {
    let tree = parse("const { a, b: renamed = 1, ...rest } = obj;\nconst [x, , y] = arr;");
    assert_clean(&tree);
    let stmts = statements(&tree);
    let NodeKind::VariableStatement { declarations, .. } = tree.arena.kind(stmts[0]) else {
        panic!("expected variable statement");
    };
    let NodeKind::VariableDeclarationList { declarations, .. } = tree.arena.kind(*declarations)
    else {
        panic!("expected list");
    };
    let NodeKind::VariableDeclaration { name, .. } = tree.arena.kind(declarations[0]) else {
        panic!("expected declaration");
    };
    let NodeKind::ObjectBindingPattern { elements } = tree.arena.kind(*name) else {
        panic!("expected object pattern");
    };
    assert_eq!(elements.len(), 3);
    let NodeKind::BindingElement(renamed) = tree.arena.kind(elements[1]) else {
        panic!("expected binding element");
    };
    assert!(renamed.property_name.is_some());
    assert!(renamed.initializer.is_some());
    let NodeKind::BindingElement(rest) = tree.arena.kind(elements[2]) else {
        panic!("expected binding element");
    };
    assert!(rest.dot_dot_dot);

    let NodeKind::VariableStatement { declarations, .. } = tree.arena.kind(stmts[1]) else {
        panic!("expected variable statement");
    };
    let NodeKind::VariableDeclarationList { declarations, .. } = tree.arena.kind(*declarations)
    else {
        panic!("expected list");
    };
    let NodeKind::VariableDeclaration { name, .. } = tree.arena.kind(declarations[0]) else {
        panic!("expected declaration");
    };
    let NodeKind::ArrayBindingPattern { elements } = tree.arena.kind(*name) else {
        panic!("expected array pattern");
    };
    assert_eq!(elements.len(), 3);
    assert!(matches!(
        tree.arena.kind(elements[1]),
        NodeKind::OmittedExpression
    ));
}

#[test]
fn dynamic_import_and_import_meta() {
    let tree = parse("const p = import(\"./mod\");\nconst u = import.meta.url;");
    assert_clean(&tree);
    let NodeKind::ImportCallExpression { arguments } = tree.arena.kind(first_initializer(&tree))
    else {
        panic!("expected import call");
    };
    assert_eq!(arguments.len(), 1);
    let NodeKind::PropertyAccessExpression { expression, .. } =
        tree.arena.kind(nth_initializer(&tree, 1))
    else {
        panic!("expected property access");
    };
    assert!(matches!(
        tree.arena.kind(*expression),
        NodeKind::MetaProperty { .. }
    ));
}

#[test]
fn jsx_element_with_attributes_and_children() {
    let source = "const el = <div className=\"x\" data-id={42}>hi {name}</div>;";
    let tree = parse_tsx(source);
    assert_clean(&tree);
    let NodeKind::JsxElement {
        opening, children, ..
    } = tree.arena.kind(first_initializer(&tree))
    else {
        panic!("expected jsx element");
    };
    let NodeKind::JsxOpeningElement {
        tag_name,
        attributes,
        ..
    } = tree.arena.kind(*opening)
    else {
        panic!("expected opening element");
    };
    assert_eq!(tree.arena.identifier_text(*tag_name), Some("div"));
    assert_eq!(attributes.len(), 2);
    let NodeKind::JsxAttribute { name, .. } = tree.arena.kind(attributes[1]) else {
        panic!("expected attribute");
    };
    assert_eq!(tree.arena.identifier_text(*name), Some("data-id"));

    assert_eq!(children.len(), 2);
    let NodeKind::JsxText { text } = tree.arena.kind(children[0]) else {
        panic!("expected text child");
    };
    assert_eq!(text, "hi ");
    assert!(matches!(
        tree.arena.kind(children[1]),
        NodeKind::JsxExpression { .. }
    ));
}

#[test]
fn jsx_fragment_and_self_closing() {
    let tree = parse_tsx("const f = <>text</>;\nconst s = <br />;");
    assert_clean(&tree);
    let NodeKind::JsxFragment { children } = tree.arena.kind(first_initializer(&tree)) else {
        panic!("expected fragment");
    };
    assert_eq!(children.len(), 1);
    assert!(matches!(
        tree.arena.kind(nth_initializer(&tree, 1)),
        NodeKind::JsxSelfClosingElement { .. }
    ));
}

#[test]
fn jsx_nested_elements_keep_whitespace() {
    let source = "const el = <ul>\n    <li>one</li>\n    <li>two</li>\n</ul>;";
    let tree = parse_tsx(source);
    assert_clean(&tree);
    let NodeKind::JsxElement { children, .. } = tree.arena.kind(first_initializer(&tree)) else {
        panic!("expected jsx element");
    };
    // text, li, text, li, text
    assert_eq!(children.len(), 5);
    let NodeKind::JsxText { text } = tree.arena.kind(children[0]) else {
        panic!("expected whitespace run");
    };
    assert_eq!(text, "\n    ");
}

#[test]
fn comments_are_collected_with_positions() {
    let source = "// leading\nconst a = 1; /* trailing */\n";
    let tree = parse(source);
    assert_clean(&tree);
    assert_eq!(tree.comments.len(), 2);
    assert!(tree.comments[0].pos < tree.comments[1].pos);
    assert!(!tree.comments[0].is_multi_line);
    assert!(tree.comments[1].is_multi_line);
}

#[test]
fn declare_statements_parse_as_ambient() {
    let tree = parse(
        "declare const version: string;\n\
         declare function exists(path: string): boolean;\n\
         declare module \"church\" {}\n",
    );
    assert_clean(&tree);
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 3);
    let NodeKind::VariableStatement { modifiers, .. } = tree.arena.kind(stmts[0]) else {
        panic!("expected variable statement");
    };
    assert!(modifiers.is_ambient());
    let NodeKind::ModuleDeclaration(module) = tree.arena.kind(stmts[2]) else {
        panic!("expected module");
    };
    assert!(matches!(
        tree.arena.kind(module.name),
        NodeKind::StringLiteral { .. }
    ));
}
