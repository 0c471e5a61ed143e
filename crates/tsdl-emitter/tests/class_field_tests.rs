//! Class field lowering in both define and assign modes.

use tsdl_binder::bind_source_file;
use tsdl_common::{CompilerOptions, ScriptTarget};
use tsdl_emitter::emit_source_file;
use tsdl_parser::ParserState;

fn emit(source: &str) -> String {
    emit_with(source, &CompilerOptions::default())
}

fn emit_with(source: &str, options: &CompilerOptions) -> String {
    let mut tree = ParserState::new("test.ts", source).parse_source_file();
    assert!(!tree.has_errors(), "parse failed: {:?}", tree.diagnostics);
    let binding = bind_source_file(&tree);
    emit_source_file(&mut tree, &binding, options, source).text
}

fn es2021() -> CompilerOptions {
    CompilerOptions {
        target: ScriptTarget::Es2021,
        ..CompilerOptions::default()
    }
}

#[test]
fn test_define_mode_keeps_field_declarations() {
    let output = emit(
        r#"class A {
    x = 1;
    readonly y: string = "s";
}
"#,
    );
    assert_eq!(
        output,
        r#"class A {
    x = 1;
    y = "s";
}
"#
    );
}

#[test]
fn test_assign_mode_moves_fields_into_constructor() {
    let output = emit_with(
        r#"class A {
    x = 1;
    constructor() {
        this.init();
    }
    init() { }
}
"#,
        &es2021(),
    );
    assert_eq!(
        output,
        r#"class A {
    constructor() {
        this.x = 1;
        this.init();
    }
    init() { }
}
"#
    );
}

#[test]
fn test_assign_mode_synthesizes_constructor() {
    let output = emit_with("class P {\n    x = 0;\n    y = 0;\n}\n", &es2021());
    assert_eq!(
        output,
        r#"class P {
    constructor() {
        this.x = 0;
        this.y = 0;
    }
}
"#
    );
}

#[test]
fn test_both_modes_initialize_in_declaration_order() {
    let source = r#"class Config {
    host = "localhost";
    port = 8080;
    retries = 3;
}
"#;
    assert_eq!(
        emit(source),
        r#"class Config {
    host = "localhost";
    port = 8080;
    retries = 3;
}
"#
    );
    assert_eq!(
        emit_with(source, &es2021()),
        r#"class Config {
    constructor() {
        this.host = "localhost";
        this.port = 8080;
        this.retries = 3;
    }
}
"#
    );
}

#[test]
fn test_assign_mode_derived_class_spreads_arguments() {
    let output = emit_with(
        "class Sprite extends Node {\n    x = 0;\n}\n",
        &es2021(),
    );
    assert_eq!(
        output,
        r#"class Sprite extends Node {
    constructor() {
        super(...arguments);
        this.x = 0;
    }
}
"#
    );
}

#[test]
fn test_assign_mode_splices_after_super_call() {
    let output = emit_with(
        r#"class D extends B {
    ready = false;
    constructor() {
        super();
        this.go();
    }
    go() { }
}
"#,
        &es2021(),
    );
    assert_eq!(
        output,
        r#"class D extends B {
    constructor() {
        super();
        this.ready = false;
        this.go();
    }
    go() { }
}
"#
    );
}

#[test]
fn test_parameter_properties_assign_mode() {
    let output = emit_with(
        r#"class Point {
    constructor(public x: number) {
        this.log();
    }
    log() { }
}
"#,
        &es2021(),
    );
    assert_eq!(
        output,
        r#"class Point {
    constructor(x) {
        this.x = x;
        this.log();
    }
    log() { }
}
"#
    );
}

#[test]
fn test_parameter_properties_define_mode() {
    let output = emit(
        r#"class Point {
    constructor(readonly x: number, private y: number) { }
}
"#,
    );
    assert_eq!(
        output,
        r#"class Point {
    x;
    y;
    constructor(x, y) {
        this.x = x;
        this.y = y;
    }
}
"#
    );
}

#[test]
fn test_statics_extracted_after_class_in_assign_mode() {
    let output = emit_with(
        r#"class C {
    static name = "C";
    static length = 2;
}
"#,
        &es2021(),
    );
    assert_eq!(
        output,
        r#"class C {
}
C.name = "C";
C.length = 2;
"#
    );
}

#[test]
fn test_statics_stay_in_place_in_define_mode() {
    let output = emit(
        r#"class C {
    static name = "C";
}
"#,
    );
    assert_eq!(
        output,
        r#"class C {
    static name = "C";
}
"#
    );
}

#[test]
fn test_class_expression_keeps_statics_inline() {
    let output = emit_with("const C = class {\n    static tag = 1;\n};\n", &es2021());
    assert_eq!(
        output,
        r#"const C = class {
    static tag = 1;
};
"#
    );
}

#[test]
fn test_uninitialized_fields_keep_declarations_in_assign_mode() {
    let output = emit_with(
        r#"class Bag {
    static length: number;
    length: string;
    fill() { }
}
"#,
        &es2021(),
    );
    assert_eq!(
        output,
        r#"class Bag {
    static length;
    length;
    fill() { }
}
"#
    );
}

#[test]
fn test_abstract_and_declare_members_dropped() {
    let output = emit(
        r#"abstract class Base {
    abstract run(): void;
    declare hint: number;
    go() {
        this.run();
    }
}
"#,
    );
    assert_eq!(
        output,
        r#"class Base {
    go() {
        this.run();
    }
}
"#
    );
}

#[test]
fn test_use_define_flag_overrides_target() {
    let options = CompilerOptions {
        use_define_for_class_fields: Some(false),
        ..CompilerOptions::default()
    };
    let output = emit_with("class C {\n    x = 1;\n}\n", &options);
    assert_eq!(
        output,
        r#"class C {
    constructor() {
        this.x = 1;
    }
}
"#
    );
}

#[test]
fn test_computed_and_literal_static_names_use_element_access() {
    let output = emit_with(
        r#"class K {
    static [tag] = 1;
    static "quoted" = 2;
}
"#,
        &es2021(),
    );
    assert_eq!(
        output,
        r#"class K {
}
K[tag] = 1;
K["quoted"] = 2;
"#
    );
}

#[test]
fn test_accessor_fields_keep_declaration_form() {
    let output = emit_with("class A {\n    accessor n = 1;\n}\n", &es2021());
    assert_eq!(
        output,
        r#"class A {
    accessor n = 1;
}
"#
    );
}

#[test]
fn test_private_fields_stay_declared_in_assign_mode() {
    let output = emit_with(
        r#"class Counter {
    #count = 0;
    #limit;
    bump() {
        this.#count += 1;
    }
}
"#,
        &es2021(),
    );
    assert_eq!(
        output,
        r#"class Counter {
    #count = 0;
    #limit;
    bump() {
        this.#count += 1;
    }
}
"#
    );
}
