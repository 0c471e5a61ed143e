use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use tsdl_common::{CompilerOptions, ModuleKind, NewLineKind, ScriptTarget};

/// CLI arguments for the tsdl binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsdl",
    version,
    about = "TypeScript-to-JavaScript downlevel compiler"
)]
pub struct CliArgs {
    // ==================== Projects ====================
    /// Path to tsconfig.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    // ==================== Language and Environment ====================
    /// Set the JavaScript language version for emitted JavaScript.
    #[arg(short = 't', long, value_enum, ignore_case = true)]
    pub target: Option<Target>,

    /// Specify what module code is generated.
    #[arg(short = 'm', long, value_enum, ignore_case = true)]
    pub module: Option<Module>,

    /// Emit ECMAScript-standard-compliant class fields.
    #[arg(
        long = "useDefineForClassFields",
        alias = "use-define-for-class-fields"
    )]
    pub use_define_for_class_fields: Option<bool>,

    // ==================== Emit ====================
    /// Specify an output folder for all emitted files.
    #[arg(long = "outDir", alias = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Specify the root folder within your source files.
    #[arg(long = "rootDir", alias = "root-dir")]
    pub root_dir: Option<PathBuf>,

    /// Disable emitting files from a compilation.
    #[arg(long = "noEmit", alias = "no-emit")]
    pub no_emit: bool,

    /// Disable emitting files if any errors are reported.
    #[arg(long = "noEmitOnError", alias = "no-emit-on-error")]
    pub no_emit_on_error: bool,

    /// Set the newline character for emitting files.
    #[arg(long = "newLine", alias = "new-line", value_enum, ignore_case = true)]
    pub new_line: Option<NewLine>,

    /// Disable emitting comments.
    #[arg(long = "removeComments", alias = "remove-comments")]
    pub remove_comments: bool,

    /// Disable erasing 'const enum' declarations in generated code.
    #[arg(long = "preserveConstEnums", alias = "preserve-const-enums")]
    pub preserve_const_enums: bool,

    // ==================== Output Formatting ====================
    /// Enable color and formatting in diagnostics output.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Print diagnostics as JSON on stdout instead of formatted text.
    #[arg(long)]
    pub json: bool,

    /// Print names of files that are part of the compilation.
    #[arg(long = "listFiles", alias = "list-files")]
    pub list_files: bool,

    /// Print names of emitted files after a compilation.
    #[arg(long = "listEmittedFiles", alias = "list-emitted-files")]
    pub list_emitted_files: bool,

    // ==================== Input Files ====================
    /// Input files to compile.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl CliArgs {
    /// Fold command-line flags over a base set of options, usually the
    /// ones resolved from tsconfig. CLI flags always win.
    pub fn apply_to(&self, options: &mut CompilerOptions) {
        if let Some(target) = self.target {
            options.target = target.to_script_target();
        }
        if let Some(module) = self.module {
            options.module = module.to_module_kind();
        }
        if let Some(value) = self.use_define_for_class_fields {
            options.use_define_for_class_fields = Some(value);
        }
        if let Some(new_line) = self.new_line {
            options.new_line = new_line.to_new_line_kind();
        }
        if self.remove_comments {
            options.remove_comments = true;
        }
        if self.preserve_const_enums {
            options.preserve_const_enums = true;
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Target {
    #[value(alias = "es6")]
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    #[value(name = "esnext", alias = "es-next")]
    EsNext,
}

impl Target {
    pub fn to_script_target(self) -> ScriptTarget {
        match self {
            Target::Es2015 => ScriptTarget::Es2015,
            Target::Es2016 => ScriptTarget::Es2016,
            Target::Es2017 => ScriptTarget::Es2017,
            Target::Es2018 => ScriptTarget::Es2018,
            Target::Es2019 => ScriptTarget::Es2019,
            Target::Es2020 => ScriptTarget::Es2020,
            Target::Es2021 => ScriptTarget::Es2021,
            Target::Es2022 => ScriptTarget::Es2022,
            Target::EsNext => ScriptTarget::EsNext,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Module {
    None,
    #[value(name = "commonjs", alias = "common-js")]
    CommonJs,
    System,
    #[value(alias = "es6")]
    Es2015,
    Es2020,
    Es2022,
    #[value(name = "esnext", alias = "es-next")]
    EsNext,
}

impl Module {
    pub fn to_module_kind(self) -> ModuleKind {
        match self {
            Module::None => ModuleKind::None,
            Module::CommonJs => ModuleKind::CommonJs,
            Module::System => ModuleKind::System,
            // All ES module levels print the same shape at our targets.
            Module::Es2015 => ModuleKind::EsNext,
            Module::Es2020 => ModuleKind::EsNext,
            Module::Es2022 => ModuleKind::EsNext,
            Module::EsNext => ModuleKind::EsNext,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum NewLine {
    /// Use carriage return followed by line feed (\r\n).
    Crlf,
    /// Use line feed only (\n).
    Lf,
}

impl NewLine {
    pub fn to_new_line_kind(self) -> NewLineKind {
        match self {
            NewLine::Crlf => NewLineKind::CarriageReturnLineFeed,
            NewLine::Lf => NewLineKind::LineFeed,
        }
    }
}
