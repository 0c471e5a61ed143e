//! Module-format lowering: CommonJS rewrites, ESM elision, fallbacks.

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

fn esm() -> CompilerOptions {
    CompilerOptions {
        module: ModuleKind::EsNext,
        ..CompilerOptions::default()
    }
}

#[test]
fn test_commonjs_named_import_uses_require_temp() {
    let output = emit("import { greet } from \"./greeter\";\ngreet(\"world\");\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
const greeter_1 = require("./greeter");
(0, greeter_1.greet)("world");
"#
    );
}

#[test]
fn test_commonjs_default_import_reads_default_property() {
    let output = emit("import lib from \"./lib\";\nlib.run();\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
const lib_1 = require("./lib");
lib_1.default.run();
"#
    );
}

#[test]
fn test_commonjs_namespace_import_renames_binding() {
    let output = emit("import * as fs from \"./fs\";\nfs.read();\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
const fs_1 = require("./fs");
fs_1.read();
"#
    );
}

#[test]
fn test_commonjs_side_effect_kept_unused_import_elided() {
    let output = emit(
        r#"import "./setup";
import { unused } from "./dead";
run();
"#,
    );
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
require("./setup");
run();
"#
    );
}

#[test]
fn test_commonjs_import_equals_require() {
    let output = emit("import fs = require(\"fs\");\nfs.read();\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
const fs = require("fs");
fs.read();
"#
    );
}

#[test]
fn test_commonjs_export_import_publishes_alias() {
    let output = emit("export import Run = tasks.run;\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.Run = void 0;
var Run = tasks.run;
exports.Run = Run;
"#
    );
}

#[test]
fn test_commonjs_exported_var_reads_rewrite() {
    let output = emit(
        r#"export var a = 1;
export function f() {
    return a;
}
"#,
    );
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.a = void 0;
exports.f = f;
exports.a = 1;
function f() {
    return exports.a;
}
"#
    );
}

#[test]
fn test_commonjs_void_preamble_reverse_order() {
    let output = emit("export var a = 1, b = 2;\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.b = exports.a = void 0;
exports.a = 1;
exports.b = 2;
"#
    );
}

#[test]
fn test_commonjs_function_initializer_keeps_local_binding() {
    let output = emit("export const f = () => 1;\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.f = void 0;
const f = () => 1;
exports.f = f;
"#
    );
}

#[test]
fn test_commonjs_exported_class_publishes_after_declaration() {
    let output = emit(
        r#"export class Greeter {
    greet() {
        return "hi";
    }
}
"#,
    );
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.Greeter = void 0;
class Greeter {
    greet() {
        return "hi";
    }
}
exports.Greeter = Greeter;
"#
    );
}

#[test]
fn test_commonjs_default_function_hoists_eagerly() {
    let output = emit("export default function main() { }\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.default = main;
function main() { }
"#
    );
}

#[test]
fn test_commonjs_export_list_alias() {
    let output = emit("var x = 1;\nexport { x as y };\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.y = void 0;
var x = 1;
exports.y = x;
"#
    );
}

#[test]
fn test_commonjs_reexport_pulls_module_in() {
    let output = emit("export { b } from \"./b\";\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.b = void 0;
const b_1 = require("./b");
exports.b = b_1.b;
"#
    );
}

#[test]
fn test_commonjs_export_star_uses_helper() {
    let output = emit("export * from \"./a\";\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
function __export(m) {
    for (var p in m)
        if (!exports.hasOwnProperty(p))
            exports[p] = m[p];
}
__export(require("./a"));
"#
    );
}

#[test]
fn test_commonjs_export_star_as_namespace() {
    let output = emit("export * as ns from \"m\";\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.ns = void 0;
exports.ns = require("m");
"#
    );
}

#[test]
fn test_commonjs_export_default_expression() {
    let output = emit("export default compute();\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.default = void 0;
exports.default = compute();
"#
    );
}

#[test]
fn test_commonjs_export_equals_skips_marker() {
    let output = emit("const api = { version: 1 };\nexport = api;\n");
    assert_eq!(
        output,
        r#""use strict";
const api = { version: 1 };
module.exports = api;
"#
    );
}

#[test]
fn test_commonjs_exported_namespace() {
    let output = emit("export namespace api {\n    export function ping() { }\n}\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.api = void 0;
var api;
(function (api) {
    function ping() { }
    api.ping = ping;
})(api || (exports.api = api = {}));
"#
    );
}

#[test]
fn test_dynamic_import_lowers_in_commonjs() {
    let output = emit("export {};\nconst loaded = import(\"./mod\");\n");
    assert_eq!(
        output,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
const loaded = Promise.resolve().then(() => require("./mod"));
"#
    );
}

#[test]
fn test_dynamic_import_kept_in_esm() {
    let output = emit_with("export {};\nconst loaded = import(\"./mod\");\n", &esm());
    assert_eq!(output, "export {};\nconst loaded = import(\"./mod\");\n");
}

#[test]
fn test_esm_prunes_type_only_imports() {
    let output = emit_with(
        r#"import { type Flag, parse } from "./lib";
import type { Options } from "./opts";
parse();
"#,
        &esm(),
    );
    assert_eq!(output, "import { parse } from \"./lib\";\nparse();\n");
}

#[test]
fn test_esm_full_elision_appends_export_marker() {
    let output = emit_with(
        "import { helper } from \"./util\";\nconst size = 10;\n",
        &esm(),
    );
    assert_eq!(output, "const size = 10;\nexport {};\n");
}

#[test]
fn test_esm_import_equals_reports_error() {
    let result = emit_result("import util = require(\"util\");\nutil.inspect();\n", &esm());
    assert_eq!(
        result.text,
        "var util = require(\"util\");\nutil.inspect();\nexport {};\n"
    );
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 1202);
    assert!(result.diagnostics[0].is_error());
}

#[test]
fn test_esm_export_equals_reports_error() {
    let result = emit_result("function main() { }\nexport = main;\n", &esm());
    assert_eq!(result.text, "function main() { }\nmodule.exports = main;\n");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 1203);
    assert!(result.diagnostics[0].is_error());
}

#[test]
fn test_system_falls_back_to_commonjs_with_note() {
    let options = CompilerOptions {
        module: ModuleKind::System,
        ..CompilerOptions::default()
    };
    let result = emit_result("export const flag = true;\n", &options);
    assert_eq!(
        result.text,
        r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.flag = void 0;
exports.flag = true;
"#
    );
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 90010);
    assert!(!result.diagnostics[0].is_error());
}

#[test]
fn test_module_none_reports_error_and_keeps_syntax() {
    let options = CompilerOptions {
        module: ModuleKind::None,
        ..CompilerOptions::default()
    };
    let result = emit_result("export const flag = true;\n", &options);
    assert_eq!(result.text, "export const flag = true;\n");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 90011);
    assert!(result.diagnostics[0].is_error());
}

#[test]
fn test_script_ignores_module_kind() {
    let output = emit("const x = 1;\n");
    assert_eq!(output, "const x = 1;\n");
}
