use super::reporter::Reporter;
use tsdl_common::{Diagnostic, Span};

#[test]
fn formats_header_without_source() {
    let mut reporter = Reporter::new(false);
    let diagnostic =
        Diagnostic::error(Span::new(4, 5), 1005, "',' expected.").with_file("missing.ts");

    // No source on disk and none seeded: the file name stands alone.
    let output = reporter.format_diagnostic(&diagnostic);
    assert_eq!(output, "missing.ts - error TS1005: ',' expected.");
}

#[test]
fn formats_location_and_snippet() {
    let mut reporter = Reporter::new(false);
    reporter.add_source("main.ts", "let x: number = \"s\";\n");

    let diagnostic =
        Diagnostic::error(Span::new(16, 19), 1005, "string found").with_file("main.ts");
    let output = reporter.format_diagnostic(&diagnostic);

    let expected = format!(
        "main.ts:1:17 - error TS1005: string found\n    1   let x: number = \"s\";\n       {}~~~",
        " ".repeat(16)
    );
    assert_eq!(output, expected);
}

#[test]
fn underline_covers_exactly_the_span() {
    let mut reporter = Reporter::new(false);
    reporter.add_source("a.ts", "const value = 1;\n");

    let diagnostic = Diagnostic::error(Span::new(6, 11), 1003, "bad name").with_file("a.ts");
    let output = reporter.format_diagnostic(&diagnostic);

    let underline = output.rsplit('\n').next().unwrap();
    assert_eq!(underline, format!("       {}~~~~~", " ".repeat(6)));
}

#[test]
fn positions_are_one_based_across_lines() {
    let mut reporter = Reporter::new(false);
    reporter.add_source("b.ts", "let a = 1;\nlet b: = 2;\n");

    let diagnostic = Diagnostic::error(Span::new(18, 19), 1110, "type expected").with_file("b.ts");
    let output = reporter.format_diagnostic(&diagnostic);

    assert!(output.starts_with("b.ts:2:8 - error TS1110: type expected"), "{output}");
    assert!(output.contains("\n    2   let b: = 2;\n"), "{output}");
}

#[test]
fn zero_length_spans_render_without_snippet() {
    let mut reporter = Reporter::new(false);
    reporter.add_source("c.ts", "let x = ;\n");

    let diagnostic = Diagnostic::error(Span::empty(8), 1109, "expression expected").with_file("c.ts");
    let output = reporter.format_diagnostic(&diagnostic);

    assert_eq!(output, "c.ts:1:9 - error TS1109: expression expected");
}

#[test]
fn unfiled_diagnostics_render_as_unknown() {
    let mut reporter = Reporter::new(false);
    let diagnostic = Diagnostic::warning(Span::new(0, 1), 90010, "fallback in effect");

    let output = reporter.format_diagnostic(&diagnostic);
    assert_eq!(output, "<unknown> - warning TS90010: fallback in effect");
}

#[test]
fn render_joins_diagnostics_with_newlines() {
    let mut reporter = Reporter::new(false);
    let first = Diagnostic::error(Span::new(0, 1), 1005, "first");
    let second = Diagnostic::error(Span::new(2, 3), 1005, "second");

    let output = reporter.render(&[first, second]);
    assert_eq!(
        output,
        "<unknown> - error TS1005: first\n<unknown> - error TS1005: second"
    );
}

#[test]
fn code_zero_is_omitted() {
    let mut reporter = Reporter::new(false);
    let diagnostic = Diagnostic::message(Span::new(0, 1), 0, "note");

    let output = reporter.format_diagnostic(&diagnostic);
    assert_eq!(output, "<unknown> - message: note");
}
