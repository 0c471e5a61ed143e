//! Type erasure: declarations, annotations, and assertion expressions.

use tsdl_binder::bind_source_file;
use tsdl_common::CompilerOptions;
use tsdl_emitter::emit_source_file;
use tsdl_parser::ParserState;

fn emit(source: &str) -> String {
    let mut tree = ParserState::new("test.ts", source).parse_source_file();
    assert!(!tree.has_errors(), "parse failed: {:?}", tree.diagnostics);
    let binding = bind_source_file(&tree);
    emit_source_file(&mut tree, &binding, &CompilerOptions::default(), source).text
}

#[test]
fn test_interface_erased() {
    let output = emit(
        r#"interface Point {
    x: number;
    y: number;
}
const p = { x: 1, y: 2 };
"#,
    );
    assert_eq!(output, "const p = { x: 1, y: 2 };\n");
}

#[test]
fn test_type_alias_erased() {
    let output = emit("type Id = string;\nlet id: Id = \"x\";\n");
    assert_eq!(output, "let id = \"x\";\n");
}

#[test]
fn test_annotations_erased() {
    let output = emit(
        r#"function add(a: number, b: number): number {
    let total: number = a + b;
    return total;
}
"#,
    );
    assert_eq!(
        output,
        r#"function add(a, b) {
    let total = a + b;
    return total;
}
"#
    );
}

#[test]
fn test_this_parameter_erased() {
    let output = emit(
        r#"function attach(this: Window, handler: Handler): void {
    handler.call(this);
}
class Widget {
    render(this: Widget): string {
        return this.label;
    }
}
"#,
    );
    assert_eq!(
        output,
        r#"function attach(handler) {
    handler.call(this);
}
class Widget {
    render() {
        return this.label;
    }
}
"#
    );
}

#[test]
fn test_assertion_expressions_erased() {
    let output = emit(
        r#"const a = data as string;
const b = data satisfies object;
const c = user!.name;
const d = <string>raw;
"#,
    );
    assert_eq!(
        output,
        r#"const a = data;
const b = data;
const c = user.name;
const d = raw;
"#
    );
}

#[test]
fn test_type_arguments_erased() {
    let output = emit("const s = new Set<number>();\nidentity<string>(\"x\");\n");
    assert_eq!(output, "const s = new Set();\nidentity(\"x\");\n");
}

#[test]
fn test_overload_signatures_dropped() {
    let output = emit(
        r#"function pick(value: string): string;
function pick(value: number): number;
function pick(value) {
    return value;
}
"#,
    );
    assert_eq!(
        output,
        r#"function pick(value) {
    return value;
}
"#
    );
}

#[test]
fn test_declare_statements_erased() {
    let output = emit(
        r#"declare const version: string;
declare function run(): void;
declare module "ext" { }
const live = 1;
"#,
    );
    assert_eq!(output, "const live = 1;\n");
}

#[test]
fn test_generic_parameters_dropped() {
    let output = emit(
        r#"function identity<T>(value: T): T {
    return value;
}
class Box<T> {
    value: T;
}
"#,
    );
    assert_eq!(
        output,
        r#"function identity(value) {
    return value;
}
class Box {
    value;
}
"#
    );
}

#[test]
fn test_optional_and_definite_markers_dropped() {
    let output = emit(
        r#"function greet(name?: string, count = 1) { }
class Item {
    tag?: string;
    id!: number;
}
"#,
    );
    assert_eq!(
        output,
        r#"function greet(name, count = 1) { }
class Item {
    tag;
    id;
}
"#
    );
}

#[test]
fn test_arrow_annotations_erased() {
    let output = emit("const double = (n: number): number => n * 2;\n");
    assert_eq!(output, "const double = (n) => n * 2;\n");
}

#[test]
fn test_abstract_modifier_dropped() {
    let output = emit(
        r#"abstract class Base {
    abstract run(): void;
}
"#,
    );
    assert_eq!(output, "class Base {\n}\n");
}

#[test]
fn test_empty_source() {
    assert_eq!(emit(""), "");
}

#[test]
fn test_emit_is_stable_when_reapplied() {
    let source = r#"const greeting: string = "hi";
function shout(text: string): string {
    return text;
}
"#;
    let first = emit(source);
    let second = emit(&first);
    assert_eq!(first, second);
}
