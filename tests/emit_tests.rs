//! End-to-end tests for the single-file pipeline
//!
//! These drive [`tsdl::compile_source`] and check the glue the member
//! crates cannot see on their own:
//! - diagnostics from every stage are collected and stamped with the file name
//! - parse failures discard the unit, transform diagnostics do not
//! - compiler options flow through to the transforms and the printer

use tsdl::{CompileOutput, CompilerOptions, ModuleKind, NewLineKind, ScriptTarget};

fn compile(source: &str) -> CompileOutput {
    tsdl::compile_source("main.ts", source, &CompilerOptions::default())
}

fn compile_with(source: &str, options: &CompilerOptions) -> CompileOutput {
    tsdl::compile_source("main.ts", source, options)
}

fn emit(source: &str) -> String {
    let output = compile(source);
    assert!(
        !output.has_errors(),
        "unexpected errors: {:?}",
        output.diagnostics
    );
    output.text
}

#[test]
fn test_typescript_compiles_to_clean_javascript() {
    let output = compile(
        r#"interface Greeting {
    text: string;
}
function greet(name: string): string {
    return "hello " + name;
}
"#,
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(
        output.text,
        r#"function greet(name) {
    return "hello " + name;
}
"#
    );
}

#[test]
fn test_empty_source_produces_empty_output() {
    let output = compile("");
    assert!(output.text.is_empty());
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_parse_failure_discards_the_unit() {
    let output = compile("const = 1;\n");
    assert!(output.has_errors());
    assert!(output.text.is_empty(), "no text for a unit that failed to parse");
    for diagnostic in &output.diagnostics {
        assert_eq!(diagnostic.file.as_deref(), Some("main.ts"));
    }
}

#[test]
fn test_transform_diagnostics_are_stamped_with_the_file_name() {
    let options = CompilerOptions {
        module: ModuleKind::System,
        ..CompilerOptions::default()
    };
    let output = compile_with("export const flag = true;\n", &options);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, 90010);
    assert_eq!(output.diagnostics[0].file.as_deref(), Some("main.ts"));
}

#[test]
fn test_system_fallback_warns_but_still_compiles() {
    let options = CompilerOptions {
        module: ModuleKind::System,
        ..CompilerOptions::default()
    };
    let output = compile_with("export const flag = true;\n", &options);
    assert!(!output.has_errors(), "the fallback note is not an error");
    assert_eq!(
        output.text,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.flag = void 0;
exports.flag = true;
"#
    );
}

#[test]
fn test_module_errors_do_not_stop_the_emit() {
    let options = CompilerOptions {
        module: ModuleKind::None,
        ..CompilerOptions::default()
    };
    let output = compile_with("export const flag = true;\n", &options);
    assert!(output.has_errors());
    assert_eq!(output.diagnostics[0].code, 90011);
    assert_eq!(output.text, "export const flag = true;\n");
}

#[test]
fn test_module_kind_selects_the_lowering() {
    let source = "export const flag = true;\n";

    let commonjs = compile(source);
    assert!(commonjs.text.contains("exports.flag = true;"));

    let esm = compile_with(
        source,
        &CompilerOptions {
            module: ModuleKind::EsNext,
            ..CompilerOptions::default()
        },
    );
    assert_eq!(esm.text, "export const flag = true;\n");
}

#[test]
fn test_target_selects_the_field_lowering() {
    let source = "class Point {\n    x = 1;\n}\n";

    assert_eq!(emit(source), "class Point {\n    x = 1;\n}\n");

    let lowered = compile_with(
        source,
        &CompilerOptions {
            target: ScriptTarget::Es2015,
            ..CompilerOptions::default()
        },
    );
    assert_eq!(
        lowered.text,
        r#"class Point {
    constructor() {
        this.x = 1;
    }
}
"#
    );
}

#[test]
fn test_new_line_kind_applies_to_every_break() {
    let options = CompilerOptions {
        new_line: NewLineKind::CarriageReturnLineFeed,
        ..CompilerOptions::default()
    };
    let output = compile_with("const x = 1;\nconst y = 2;\n", &options);
    assert_eq!(output.text, "const x = 1;\r\nconst y = 2;\r\n");
}

#[test]
fn test_remove_comments_flows_through_the_pipeline() {
    let options = CompilerOptions {
        remove_comments: true,
        ..CompilerOptions::default()
    };
    let output = compile_with("// banner\nconst x = 1; // trailing\n", &options);
    assert_eq!(output.text, "const x = 1;\n");
}

#[test]
fn test_reemitting_the_output_is_stable() {
    let source = r#"interface User {
    name: string;
}
function describe(user: User): string {
    if (user) {
        return user.name;
    }
    return "anonymous";
}
const fallback: string = describe(null as any);
"#;
    let first = emit(source);
    let second = emit(&first);
    assert_eq!(first, second);
}

#[test]
fn test_tsx_files_keep_jsx_syntax() {
    let output = tsdl::compile_source(
        "view.tsx",
        "const el = <div>hi</div>;\n",
        &CompilerOptions::default(),
    );
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
    assert_eq!(output.text, "const el = <div>hi</div>;\n");
}

#[test]
fn test_mixed_program_lowers_every_construct() {
    let output = compile(
        r#"interface Shape {
    kind: string;
}
const enum Mode {
    on = 1
}
enum Level {
    low,
    high
}
namespace fmt {
    export function pad(text: string): string {
        return text;
    }
}
export class Logger {
    level = Level.low;
    write(message: string) {
        return fmt.pad(message) + Mode.on;
    }
}
"#,
    );
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
    assert_eq!(
        output.text,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.Logger = void 0;
var Level;
(function (Level) {
    Level[Level["low"] = 0] = "low";
    Level[Level["high"] = 1] = "high";
})(Level || (Level = {}));
var fmt;
(function (fmt) {
    function pad(text) {
        return text;
    }
    fmt.pad = pad;
})(fmt || (fmt = {}));
class Logger {
    level = Level.low;
    write(message) {
        return fmt.pad(message) + 1 /* on */;
    }
}
exports.Logger = Logger;
"#
    );
}
