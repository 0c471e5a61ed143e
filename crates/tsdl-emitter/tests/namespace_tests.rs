//! Namespace lowering: IIFE shapes, merging, and member qualification.

use tsdl_binder::bind_source_file;
use tsdl_common::{CompilerOptions, ModuleKind};
use tsdl_emitter::{EmitResult, emit_source_file};
use tsdl_parser::ParserState;

fn emit(source: &str) -> String {
    emit_with(source, &CompilerOptions::default())
}

fn emit_with(source: &str, options: &CompilerOptions) -> String {
    emit_result(source, options).text
}

fn emit_result(source: &str, options: &CompilerOptions) -> EmitResult {
    let mut tree = ParserState::new("test.ts", source).parse_source_file();
    assert!(!tree.has_errors(), "parse failed: {:?}", tree.diagnostics);
    let binding = bind_source_file(&tree);
    emit_source_file(&mut tree, &binding, options, source)
}

#[test]
fn test_exported_function_mounts_after_declaration() {
    let output = emit(
        r#"namespace app {
    export function start() { }
}
"#,
    );
    assert_eq!(
        output,
        r#"var app;
(function (app) {
    function start() { }
    app.start = start;
})(app || (app = {}));
"#
    );
}

#[test]
fn test_exported_var_collapses_to_property_write() {
    let output = emit("namespace cfg {\n    export var level = 2;\n}\n");
    assert_eq!(
        output,
        r#"var cfg;
(function (cfg) {
    cfg.level = 2;
})(cfg || (cfg = {}));
"#
    );
}

#[test]
fn test_exported_var_without_initializer_emits_nothing() {
    let output = emit("namespace cfg {\n    export var level: number;\n    export var mode = \"on\";\n}\n");
    assert_eq!(
        output,
        r#"var cfg;
(function (cfg) {
    cfg.mode = "on";
})(cfg || (cfg = {}));
"#
    );
}

#[test]
fn test_exported_var_reads_qualify_everywhere() {
    let output = emit(
        r#"namespace counter {
    export var count = 0;
    export function bump() {
        count = count + 1;
    }
}
"#,
    );
    assert_eq!(
        output,
        r#"var counter;
(function (counter) {
    counter.count = 0;
    function bump() {
        counter.count = counter.count + 1;
    }
    counter.bump = bump;
})(counter || (counter = {}));
"#
    );
}

#[test]
fn test_merged_blocks_share_one_binding() {
    let output = emit(
        r#"namespace app {
    export function start() { }
}
namespace app {
    export function run() {
        start();
    }
}
"#,
    );
    assert_eq!(
        output,
        r#"var app;
(function (app) {
    function start() { }
    app.start = start;
})(app || (app = {}));
(function (app) {
    function run() {
        app.start();
    }
    app.run = run;
})(app || (app = {}));
"#
    );
}

#[test]
fn test_same_block_function_read_stays_local() {
    let output = emit(
        r#"namespace app {
    export function start() { }
    export function boot() {
        start();
    }
}
"#,
    );
    assert!(
        output.contains("        start();"),
        "same-block reads keep the local binding: {output}"
    );
    assert!(!output.contains("app.start()"));
}

#[test]
fn test_dotted_name_nests() {
    let output = emit("namespace A.B {\n    export const value = 1;\n}\n");
    assert_eq!(
        output,
        r#"var A;
(function (A) {
    let B;
    (function (B) {
        B.value = 1;
    })(B = A.B || (A.B = {}));
})(A || (A = {}));
"#
    );
}

#[test]
fn test_types_only_namespace_vanishes() {
    let output = emit(
        r#"namespace shapes {
    export interface Circle {
        r: number;
    }
    export type Id = string;
}
"#,
    );
    assert_eq!(output, "");
}

#[test]
fn test_nested_exported_enum() {
    let output = emit("namespace data {\n    export enum Kind { node, leaf }\n}\n");
    assert_eq!(
        output,
        r#"var data;
(function (data) {
    let Kind;
    (function (Kind) {
        Kind[Kind["node"] = 0] = "node";
        Kind[Kind["leaf"] = 1] = "leaf";
    })(Kind = data.Kind || (data.Kind = {}));
})(data || (data = {}));
"#
    );
}

#[test]
fn test_non_exported_member_stays_local() {
    let output = emit(
        r#"namespace util {
    function helper() { }
    export function api() {
        helper();
    }
}
"#,
    );
    assert_eq!(
        output,
        r#"var util;
(function (util) {
    function helper() { }
    function api() {
        helper();
    }
    util.api = api;
})(util || (util = {}));
"#
    );
}

#[test]
fn test_import_equals_alias_in_namespace() {
    let output = emit(
        r#"namespace wrap {
    import inner = outer.thing;
    export var v = inner;
}
"#,
    );
    assert_eq!(
        output,
        r#"var wrap;
(function (wrap) {
    var inner = outer.thing;
    wrap.v = inner;
})(wrap || (wrap = {}));
"#
    );
}

#[test]
fn test_alias_to_non_exported_member_still_emits() {
    let result = emit_result(
        r#"namespace lib {
    function hidden() { }
    export function shown() { }
}
import h = lib.hidden;
h();
"#,
        &CompilerOptions::default(),
    );
    assert_eq!(
        result.text,
        r#"var lib;
(function (lib) {
    function hidden() { }
    function shown() { }
    lib.shown = shown;
})(lib || (lib = {}));
var h = lib.hidden;
h();
"#
    );
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 2694);
    assert!(!result.diagnostics[0].is_error());
}

#[test]
fn test_exported_namespace_esm() {
    let options = CompilerOptions {
        module: ModuleKind::EsNext,
        ..CompilerOptions::default()
    };
    let output = emit_with(
        "export namespace api {\n    export function ping() { }\n}\n",
        &options,
    );
    assert_eq!(
        output,
        r#"export var api;
(function (api) {
    function ping() { }
    api.ping = ping;
})(api || (api = {}));
"#
    );
}

#[test]
fn test_exported_binding_pattern_copies_names() {
    let output = emit("namespace pair {\n    export var { a, b } = make();\n}\n");
    assert_eq!(
        output,
        r#"var pair;
(function (pair) {
    var { a, b } = make();
    pair.a = a;
    pair.b = b;
})(pair || (pair = {}));
"#
    );
}
