//! Human-readable diagnostic rendering in the style of tsc.

use colored::Colorize;
use rustc_hash::FxHashMap;
use std::path::Path;

use tsdl_common::{Diagnostic, DiagnosticCategory, LineMap};

/// Formats diagnostics as `file:line:col - category TScode: message`
/// with a source snippet underneath. Sources are read lazily and cached
/// so rendering many diagnostics against one file stays cheap.
pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
    line_maps: FxHashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
            line_maps: FxHashMap::default(),
        }
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let file = diagnostic.file.as_deref().unwrap_or("");
        let location = self.format_location(file, diagnostic.start);
        let category = self.format_category(diagnostic.category);
        let code = self.format_code(diagnostic.code);

        let mut output = String::new();
        if let Some(location) = location {
            output.push_str(&location);
        } else if !file.is_empty() {
            output.push_str(file);
        } else {
            output.push_str("<unknown>");
        }

        output.push_str(" - ");
        output.push_str(&category);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) = self.format_snippet(file, diagnostic.start, diagnostic.length) {
            output.push_str(&snippet);
        }

        output
    }

    /// Source snippet with the error span underlined, matching tsc:
    /// ```text
    ///   2   let x = "string";
    ///           ~
    /// ```
    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }

        let (line_num, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?;

        let lines: Vec<&str> = source.lines().collect();
        let line_idx = (line_num - 1) as usize;
        if line_idx >= lines.len() {
            return None;
        }

        let line_text = lines[line_idx];
        let end_column = column - 1 + length;

        // Spaces up to the span, tildes across it. Tabs expand to four
        // columns so the underline stays aligned with the source line.
        let mut underline = String::new();
        for (i, ch) in line_text.chars().enumerate() {
            let offset = i as u32;
            if offset < column - 1 {
                if ch == '\t' {
                    underline.push_str("    ");
                } else {
                    underline.push(' ');
                }
            } else if offset < end_column {
                if ch == '\t' {
                    underline.push_str("~~~~");
                } else {
                    underline.push('~');
                }
            } else {
                break;
            }
        }

        // Spans at end of line still get a marker.
        if underline.is_empty() {
            underline.push('~');
        }

        let mut snippet = String::new();
        snippet.push('\n');
        snippet.push_str(&format!("  {:>3}   {}", line_num, line_text));
        snippet.push('\n');

        let underline_display = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        snippet.push_str(&format!("       {}", underline_display));

        Some(snippet)
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }

        let (line, column) = self.position_for(file, offset)?;
        Some(format!("{}:{}:{}", file, line, column))
    }

    /// One-based line and column for an offset into `file`.
    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        self.ensure_source(file)?;
        if !self.line_maps.contains_key(file) {
            let source = self.sources.get(file)?;
            let map = LineMap::new(source);
            self.line_maps.insert(file.to_string(), map);
        }

        let line_map = self.line_maps.get(file)?;
        let position = line_map.position(offset);
        Some((position.line + 1, position.character + 1))
    }

    fn ensure_source(&mut self, file: &str) -> Option<()> {
        if !self.sources.contains_key(file) {
            let contents = std::fs::read_to_string(Path::new(file)).ok()?;
            self.sources.insert(file.to_string(), contents);
        }
        Some(())
    }

    /// Seed the cache for files the driver already read, so diagnostics
    /// render with snippets even when paths are relative to another cwd.
    pub fn add_source(&mut self, file: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(file.into(), source.into());
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("TS{}", code);
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
