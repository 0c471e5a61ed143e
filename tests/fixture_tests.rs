//! Golden fixtures: complete programs against their exact JavaScript.
//!
//! Each fixture runs the full pipeline with its own options. Shapes
//! here are locked down character for character, so a printer or
//! transform regression shows up as a readable diff.

use once_cell::sync::Lazy;
use tsdl::{CompilerOptions, ModuleKind, ScriptTarget};

struct Fixture {
    name: &'static str,
    options: CompilerOptions,
    source: &'static str,
    expected: &'static str,
}

fn esm() -> CompilerOptions {
    CompilerOptions {
        module: ModuleKind::EsNext,
        ..CompilerOptions::default()
    }
}

fn es2015() -> CompilerOptions {
    CompilerOptions {
        target: ScriptTarget::Es2015,
        ..CompilerOptions::default()
    }
}

static FIXTURES: Lazy<Vec<Fixture>> = Lazy::new(|| {
    vec![
        Fixture {
            name: "type-erasure",
            options: CompilerOptions::default(),
            source: r#"type Callback = (n: number) => void;
function twice(fn: Callback, n: number): void {
    fn(n);
    fn(n);
}
"#,
            expected: r#"function twice(fn, n) {
    fn(n);
    fn(n);
}
"#,
        },
        Fixture {
            name: "enum-with-initializers",
            options: CompilerOptions::default(),
            source: r#"enum Status {
    idle,
    busy = 10,
    done
}
"#,
            expected: r#"var Status;
(function (Status) {
    Status[Status["idle"] = 0] = "idle";
    Status[Status["busy"] = 10] = "busy";
    Status[Status["done"] = 11] = "done";
})(Status || (Status = {}));
"#,
        },
        Fixture {
            name: "const-enum-inlining",
            options: CompilerOptions::default(),
            source: r#"const enum Key {
    up = "ArrowUp",
    down = "ArrowDown"
}
handle(Key.up, Key.down);
"#,
            expected: "handle(\"ArrowUp\" /* up */, \"ArrowDown\" /* down */);\n",
        },
        Fixture {
            name: "namespace-registry",
            options: CompilerOptions::default(),
            source: r#"namespace registry {
    let count = 0;
    export function add() {
        count = count + 1;
    }
}
"#,
            expected: r#"var registry;
(function (registry) {
    let count = 0;
    function add() {
        count = count + 1;
    }
    registry.add = add;
})(registry || (registry = {}));
"#,
        },
        Fixture {
            name: "commonjs-module",
            options: CompilerOptions::default(),
            source: r#"import { readFile } from "./fs";
export const banner: string = "tsdl";
export function load(path: string) {
    return readFile(path);
}
"#,
            expected: r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
exports.banner = void 0;
exports.load = load;
const fs_1 = require("./fs");
exports.banner = "tsdl";
function load(path) {
    return (0, fs_1.readFile)(path);
}
"#,
        },
        Fixture {
            name: "esm-type-pruning",
            options: esm(),
            source: r#"import { type Config, start } from "./app";
import type { Opts } from "./opts";
export const run = () => start();
"#,
            expected: r#"import { start } from "./app";
export const run = () => start();
"#,
        },
        Fixture {
            name: "assign-mode-class",
            options: es2015(),
            source: r#"class Timer extends Base {
    elapsed = 0;
    constructor() {
        super();
        this.start();
    }
    start() { }
}
"#,
            expected: r#"class Timer extends Base {
    constructor() {
        super();
        this.elapsed = 0;
        this.start();
    }
    start() { }
}
"#,
        },
        Fixture {
            name: "dynamic-import-commonjs",
            options: CompilerOptions::default(),
            source: r#"export {};
function lazy() {
    return import("./heavy");
}
"#,
            expected: r#""use strict";
Object.defineProperty(exports, "__esModule", { value: true });
function lazy() {
    return Promise.resolve().then(() => require("./heavy"));
}
"#,
        },
    ]
});

#[test]
fn fixtures_emit_exactly() {
    for fixture in FIXTURES.iter() {
        let output = tsdl::compile_source("fixture.ts", fixture.source, &fixture.options);
        assert!(
            !output.has_errors(),
            "fixture {}: {:?}",
            fixture.name,
            output.diagnostics
        );
        assert_eq!(
            output.text, fixture.expected,
            "fixture {} drifted",
            fixture.name
        );
    }
}
