//! AST node definitions.
//!
//! The tree is a closed tagged union: every construct the compiler can
//! represent is a [`NodeKind`] variant, and child links are [`NodeId`]
//! handles into a [`NodeArena`]. Synthesized nodes carry a back-link to
//! the source node they replace so the emitter can attach comments
//! positionally; see [`Node::original`].
//!
//! Type syntax never gets structure here. Annotations, type arguments,
//! interface bodies and friends all parse to a single span-only
//! [`NodeKind::TypeNode`].

mod arena;
pub mod fold;

pub use arena::NodeArena;

use bitflags::bitflags;
use tsdl_common::Span;
use tsdl_scanner::SyntaxKind;

/// Handle to a node in a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Absent child marker (optional initializer, elided clause, ...).
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn new(index: usize) -> NodeId {
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_none(self) -> bool {
        self == NodeId::NONE
    }

    pub fn is_some(self) -> bool {
        self != NodeId::NONE
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

bitflags! {
    /// Declaration modifiers. Accessibility keywords survive parsing so
    /// the class-field lowering can detect parameter properties; they are
    /// never printed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ModifierFlags: u16 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const CONST = 1 << 3;
        const ABSTRACT = 1 << 4;
        const STATIC = 1 << 5;
        const READONLY = 1 << 6;
        const ASYNC = 1 << 7;
        const PUBLIC = 1 << 8;
        const PRIVATE = 1 << 9;
        const PROTECTED = 1 << 10;
        const OVERRIDE = 1 << 11;
        const ACCESSOR = 1 << 12;
    }
}

impl ModifierFlags {
    /// Whether a constructor parameter with these modifiers declares a
    /// parameter property.
    pub fn is_parameter_property(&self) -> bool {
        self.intersects(
            ModifierFlags::PUBLIC
                | ModifierFlags::PRIVATE
                | ModifierFlags::PROTECTED
                | ModifierFlags::READONLY,
        )
    }

    pub fn is_exported(&self) -> bool {
        self.contains(ModifierFlags::EXPORT)
    }

    pub fn is_ambient(&self) -> bool {
        self.contains(ModifierFlags::DECLARE)
    }
}

/// `var`, `let`, or `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarFlavor {
    Var,
    Let,
    Const,
}

impl VarFlavor {
    pub fn keyword(&self) -> &'static str {
        match self {
            VarFlavor::Var => "var",
            VarFlavor::Let => "let",
            VarFlavor::Const => "const",
        }
    }
}

/// A node: a span, an optional link to the node it was lowered from,
/// and the kind payload.
#[derive(Clone, Debug)]
pub struct Node {
    pub span: Span,
    /// For synthesized nodes, the source node this one replaces.
    /// [`NodeId::NONE`] for parsed nodes and for synthesized nodes with
    /// no source counterpart (which therefore carry no comments).
    pub original: NodeId,
    pub kind: NodeKind,
}

// =============================================================================
// Payload structs (boxed in their variants)
// =============================================================================

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: Vec<NodeId>,
    /// True when the file contains import or export syntax and is
    /// therefore an external module rather than a script.
    pub is_module: bool,
}

#[derive(Clone, Debug)]
pub struct FunctionData {
    pub modifiers: ModifierFlags,
    pub decorators: Vec<NodeId>,
    pub asterisk: bool,
    /// Identifier, property name, or NONE (default exports, expressions).
    pub name: NodeId,
    /// Optional method marker: `m?() {}`.
    pub question: bool,
    /// Span-only type parameter list, or NONE.
    pub type_parameters: NodeId,
    pub parameters: Vec<NodeId>,
    /// Span-only return type annotation, or NONE.
    pub return_type: NodeId,
    /// Block, expression (arrows), or NONE for overload signatures and
    /// ambient declarations.
    pub body: NodeId,
    /// Arrow function with an expression body rather than a block.
    pub is_arrow_expression_body: bool,
    /// Arrow function parameters were written with parentheses.
    pub parenthesized_parameters: bool,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub modifiers: ModifierFlags,
    pub decorators: Vec<NodeId>,
    pub name: NodeId,
    pub type_parameters: NodeId,
    /// `extends` expression (`ExpressionWithTypeArguments`), or NONE.
    pub extends: NodeId,
    /// Span-only `implements` clause, or NONE. Erased at print.
    pub implements_clause: NodeId,
    pub members: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct PropertyData {
    pub modifiers: ModifierFlags,
    pub decorators: Vec<NodeId>,
    pub name: NodeId,
    pub question: bool,
    pub exclamation: bool,
    pub ty: NodeId,
    pub initializer: NodeId,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    /// Accessibility/readonly modifiers mark parameter properties.
    pub modifiers: ModifierFlags,
    pub decorators: Vec<NodeId>,
    pub dot_dot_dot: bool,
    /// Identifier or binding pattern.
    pub name: NodeId,
    pub question: bool,
    pub ty: NodeId,
    pub initializer: NodeId,
}

#[derive(Clone, Debug)]
pub struct BindingElementData {
    pub dot_dot_dot: bool,
    /// Property name for `{ prop: local }` renames, or NONE.
    pub property_name: NodeId,
    /// Identifier or nested pattern.
    pub name: NodeId,
    pub initializer: NodeId,
}

#[derive(Clone, Debug)]
pub struct EnumData {
    pub modifiers: ModifierFlags,
    pub is_const: bool,
    pub name: NodeId,
    pub members: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    pub modifiers: ModifierFlags,
    /// Identifier, or StringLiteral for ambient `declare module "..."`.
    pub name: NodeId,
    /// ModuleBlock, a nested ModuleDeclaration for dotted names, or NONE.
    pub body: NodeId,
    /// Written with the `namespace` keyword rather than `module`.
    pub is_namespace_keyword: bool,
}

#[derive(Clone, Debug)]
pub struct ImportData {
    /// ImportClause, or NONE for side-effect imports.
    pub import_clause: NodeId,
    pub module_specifier: NodeId,
}

#[derive(Clone, Debug)]
pub struct ImportEqualsData {
    pub modifiers: ModifierFlags,
    pub is_type_only: bool,
    pub name: NodeId,
    /// Entity name (Identifier/QualifiedName), or the module specifier
    /// string literal when `is_require`.
    pub reference: NodeId,
    pub is_require: bool,
}

#[derive(Clone, Debug)]
pub struct ExportData {
    pub is_type_only: bool,
    /// `export * ...` form.
    pub is_star: bool,
    /// NamedExports, NamespaceExport (`* as ns`), or NONE.
    pub export_clause: NodeId,
    /// StringLiteral, or NONE for local export lists.
    pub module_specifier: NodeId,
}

#[derive(Clone, Debug)]
pub struct CallData {
    pub expression: NodeId,
    pub question_dot: bool,
    /// Span-only type argument list, or NONE.
    pub type_arguments: NodeId,
    pub arguments: Vec<NodeId>,
    /// `new C` without an argument list.
    pub has_arguments: bool,
}

// =============================================================================
// NodeKind
// =============================================================================

/// The closed set of node kinds.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Root of a parsed file.
    SourceFile(Box<SourceFileData>),

    // =========================================================================
    // Names
    // =========================================================================
    /// Identifier: `foo`
    Identifier { text: String },
    /// Private class-element name: `#field`
    PrivateIdentifier { text: String },
    /// Computed property name: `[expr]`
    ComputedPropertyName { expression: NodeId },
    /// Dotted entity name in `import x = A.B.C`
    QualifiedName { left: NodeId, right: NodeId },

    // =========================================================================
    // Literals
    // =========================================================================
    /// Numeric literal, printed from raw source text: `42`, `0x1_0`
    NumericLiteral { raw: String },
    /// BigInt literal: `10n`
    BigIntLiteral { raw: String },
    /// String literal; `value` is the cooked text, `raw` what to print.
    StringLiteral { raw: String, value: String },
    /// Regular expression literal, printed raw: `/ab+c/gi`
    RegularExpressionLiteral { raw: String },
    /// Template with no substitutions: `` `text` ``
    NoSubstitutionTemplateLiteral { raw: String },
    /// Template with substitutions; `head_raw` is `` `...${ ``.
    TemplateExpression { head_raw: String, spans: Vec<NodeId> },
    /// One substitution plus following literal chunk (`}...${` or ``}...` ``).
    TemplateSpan { expression: NodeId, literal_raw: String },
    /// `true` / `false`
    BooleanLiteral { value: bool },
    /// `null`
    NullLiteral,

    // =========================================================================
    // Expressions
    // =========================================================================
    ThisExpression,
    SuperExpression,
    /// `[a, b, c]`
    ArrayLiteralExpression { elements: Vec<NodeId>, multiline: bool },
    /// `{ a: 1, b }`
    ObjectLiteralExpression { properties: Vec<NodeId>, multiline: bool },
    /// `key: value` inside an object literal
    PropertyAssignment { name: NodeId, initializer: NodeId },
    /// `{ a }` shorthand; `initializer` is set for the destructuring
    /// default form `({ a = 1 } = x)`
    ShorthandPropertyAssignment { name: NodeId, initializer: NodeId },
    /// `...expr` inside an object literal
    SpreadAssignment { expression: NodeId },
    /// `object.name` / `object?.name`
    PropertyAccessExpression {
        expression: NodeId,
        question_dot: bool,
        name: NodeId,
    },
    /// `object[index]` / `object?.[index]`
    ElementAccessExpression {
        expression: NodeId,
        question_dot: bool,
        argument: NodeId,
    },
    /// `callee(args)`
    CallExpression(Box<CallData>),
    /// `new Callee(args)` / `new Callee`
    NewExpression(Box<CallData>),
    /// `` tag`template` ``
    TaggedTemplateExpression { tag: NodeId, template: NodeId },
    /// `(expr)`
    ParenthesizedExpression { expression: NodeId },
    FunctionExpression(Box<FunctionData>),
    ArrowFunction(Box<FunctionData>),
    ClassExpression(Box<ClassData>),
    /// `delete expr`
    DeleteExpression { expression: NodeId },
    /// `typeof expr`
    TypeOfExpression { expression: NodeId },
    /// `void expr`
    VoidExpression { expression: NodeId },
    /// `await expr`
    AwaitExpression { expression: NodeId },
    /// `!x`, `-x`, `++x`
    PrefixUnaryExpression { operator: SyntaxKind, operand: NodeId },
    /// `x++`, `x--`
    PostfixUnaryExpression { operand: NodeId, operator: SyntaxKind },
    /// `left op right`, including assignments and comma
    BinaryExpression {
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
    },
    /// `cond ? a : b`
    ConditionalExpression {
        condition: NodeId,
        when_true: NodeId,
        when_false: NodeId,
    },
    /// `yield expr` / `yield* expr`
    YieldExpression { asterisk: bool, expression: NodeId },
    /// `...expr` in calls and array literals
    SpreadElement { expression: NodeId },
    /// Elision in array literals: `[, x]`
    OmittedExpression,
    /// `expr as T`; the type is erased, the expression survives.
    AsExpression { expression: NodeId, ty: NodeId },
    /// `expr satisfies T`
    SatisfiesExpression { expression: NodeId, ty: NodeId },
    /// `expr!`
    NonNullExpression { expression: NodeId },
    /// `<T>expr` (non-tsx files only)
    TypeAssertionExpression { ty: NodeId, expression: NodeId },
    /// Expression with type arguments: heritage clauses and
    /// instantiation expressions (`f<string>`).
    ExpressionWithTypeArguments {
        expression: NodeId,
        type_arguments: NodeId,
    },
    /// Dynamic import: `import(specifier)`
    ImportCallExpression { arguments: Vec<NodeId> },
    /// `import.meta` / `new.target`
    MetaProperty { keyword: String, name: String },

    // =========================================================================
    // Binding patterns
    // =========================================================================
    /// `{ a, b: c }` destructuring target
    ObjectBindingPattern { elements: Vec<NodeId> },
    /// `[a, , b]` destructuring target
    ArrayBindingPattern { elements: Vec<NodeId> },
    BindingElement(Box<BindingElementData>),

    // =========================================================================
    // Statements
    // =========================================================================
    /// `{ statements }`
    Block { statements: Vec<NodeId>, multiline: bool },
    /// `;`
    EmptyStatement,
    /// `var/let/const declarations;` with optional modifiers
    VariableStatement {
        modifiers: ModifierFlags,
        declarations: NodeId,
    },
    VariableDeclarationList {
        flavor: VarFlavor,
        declarations: Vec<NodeId>,
    },
    /// `name: type = initializer` (type span-only)
    VariableDeclaration {
        name: NodeId,
        exclamation: bool,
        ty: NodeId,
        initializer: NodeId,
    },
    /// `expr;`
    ExpressionStatement { expression: NodeId },
    IfStatement {
        condition: NodeId,
        then_statement: NodeId,
        else_statement: NodeId,
    },
    DoStatement { statement: NodeId, condition: NodeId },
    WhileStatement { condition: NodeId, statement: NodeId },
    ForStatement {
        initializer: NodeId,
        condition: NodeId,
        incrementor: NodeId,
        statement: NodeId,
    },
    ForInStatement {
        initializer: NodeId,
        expression: NodeId,
        statement: NodeId,
    },
    ForOfStatement {
        await_modifier: bool,
        initializer: NodeId,
        expression: NodeId,
        statement: NodeId,
    },
    ContinueStatement { label: NodeId },
    BreakStatement { label: NodeId },
    ReturnStatement { expression: NodeId },
    WithStatement { expression: NodeId, statement: NodeId },
    SwitchStatement { expression: NodeId, clauses: Vec<NodeId> },
    /// `case expr:` statements, or `default:` when expression is NONE
    CaseClause { expression: NodeId, statements: Vec<NodeId> },
    LabeledStatement { label: NodeId, statement: NodeId },
    ThrowStatement { expression: NodeId },
    TryStatement {
        try_block: NodeId,
        catch_clause: NodeId,
        finally_block: NodeId,
    },
    /// `catch (binding) { }`; binding may be NONE
    CatchClause {
        variable_declaration: NodeId,
        block: NodeId,
    },
    DebuggerStatement,

    // =========================================================================
    // Declarations
    // =========================================================================
    FunctionDeclaration(Box<FunctionData>),
    ClassDeclaration(Box<ClassData>),
    /// Body is never represented; the span covers the whole declaration.
    InterfaceDeclaration { modifiers: ModifierFlags, name: NodeId },
    /// Right-hand side is never represented.
    TypeAliasDeclaration { modifiers: ModifierFlags, name: NodeId },
    EnumDeclaration(Box<EnumData>),
    /// `name = initializer` (initializer may be NONE)
    EnumMember { name: NodeId, initializer: NodeId },
    ModuleDeclaration(Box<ModuleData>),
    ModuleBlock { statements: Vec<NodeId> },
    ImportEqualsDeclaration(Box<ImportEqualsData>),
    ImportDeclaration(Box<ImportData>),
    ImportClause {
        is_type_only: bool,
        /// Default binding, or NONE.
        name: NodeId,
        /// NamespaceImport or NamedImports, or NONE.
        named_bindings: NodeId,
    },
    /// `* as ns`
    NamespaceImport { name: NodeId },
    NamedImports { elements: Vec<NodeId> },
    /// `name` or `property_name as name`
    ImportSpecifier {
        is_type_only: bool,
        property_name: NodeId,
        name: NodeId,
    },
    /// `export default expr` / `export = expr`
    ExportAssignment {
        is_export_equals: bool,
        expression: NodeId,
    },
    ExportDeclaration(Box<ExportData>),
    NamedExports { elements: Vec<NodeId> },
    ExportSpecifier {
        is_type_only: bool,
        property_name: NodeId,
        name: NodeId,
    },
    /// `export * as ns from "m"` clause
    NamespaceExport { name: NodeId },
    /// Ambient `export as namespace X;`
    NamespaceExportDeclaration { name: NodeId },

    // =========================================================================
    // Class elements
    // =========================================================================
    PropertyDeclaration(Box<PropertyData>),
    MethodDeclaration(Box<FunctionData>),
    ConstructorDeclaration(Box<FunctionData>),
    GetAccessorDeclaration(Box<FunctionData>),
    SetAccessorDeclaration(Box<FunctionData>),
    /// `[key: string]: T`; span-only, erased.
    IndexSignature,
    ClassStaticBlockDeclaration { body: NodeId },
    SemicolonClassElement,
    Parameter(Box<ParameterData>),
    /// `@expression`
    Decorator { expression: NodeId },

    // =========================================================================
    // JSX (preserve mode)
    // =========================================================================
    JsxElement {
        opening: NodeId,
        children: Vec<NodeId>,
        closing: NodeId,
    },
    JsxSelfClosingElement {
        tag_name: NodeId,
        type_arguments: NodeId,
        attributes: Vec<NodeId>,
    },
    JsxOpeningElement {
        tag_name: NodeId,
        type_arguments: NodeId,
        attributes: Vec<NodeId>,
    },
    JsxClosingElement { tag_name: NodeId },
    JsxFragment { children: Vec<NodeId> },
    /// Raw text run between tags, preserved byte for byte.
    JsxText { text: String },
    /// `{expr}` child or attribute value; expression may be NONE.
    JsxExpression {
        dot_dot_dot: bool,
        expression: NodeId,
    },
    JsxAttribute { name: NodeId, initializer: NodeId },
    JsxSpreadAttribute { expression: NodeId },

    // =========================================================================
    // Types
    // =========================================================================
    /// Any erased type syntax. The span covers the source extent; there
    /// is deliberately no structure.
    TypeNode,
}

impl NodeKind {
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::Block { .. }
                | NodeKind::EmptyStatement
                | NodeKind::VariableStatement { .. }
                | NodeKind::ExpressionStatement { .. }
                | NodeKind::IfStatement { .. }
                | NodeKind::DoStatement { .. }
                | NodeKind::WhileStatement { .. }
                | NodeKind::ForStatement { .. }
                | NodeKind::ForInStatement { .. }
                | NodeKind::ForOfStatement { .. }
                | NodeKind::ContinueStatement { .. }
                | NodeKind::BreakStatement { .. }
                | NodeKind::ReturnStatement { .. }
                | NodeKind::WithStatement { .. }
                | NodeKind::SwitchStatement { .. }
                | NodeKind::LabeledStatement { .. }
                | NodeKind::ThrowStatement { .. }
                | NodeKind::TryStatement { .. }
                | NodeKind::DebuggerStatement
                | NodeKind::FunctionDeclaration(_)
                | NodeKind::ClassDeclaration(_)
                | NodeKind::InterfaceDeclaration { .. }
                | NodeKind::TypeAliasDeclaration { .. }
                | NodeKind::EnumDeclaration(_)
                | NodeKind::ModuleDeclaration(_)
                | NodeKind::ImportEqualsDeclaration(_)
                | NodeKind::ImportDeclaration(_)
                | NodeKind::ExportAssignment { .. }
                | NodeKind::ExportDeclaration(_)
                | NodeKind::NamespaceExportDeclaration { .. }
        )
    }

    /// Declarations with no runtime emit at all.
    pub fn is_type_only_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::InterfaceDeclaration { .. }
                | NodeKind::TypeAliasDeclaration { .. }
                | NodeKind::NamespaceExportDeclaration { .. }
        )
    }
}

/// Modifier flags of a declaration kind, or `None` for kinds that carry
/// no modifiers.
pub fn modifiers_of(kind: &NodeKind) -> Option<ModifierFlags> {
    match kind {
        NodeKind::FunctionDeclaration(data)
        | NodeKind::MethodDeclaration(data)
        | NodeKind::ConstructorDeclaration(data)
        | NodeKind::GetAccessorDeclaration(data)
        | NodeKind::SetAccessorDeclaration(data)
        | NodeKind::FunctionExpression(data)
        | NodeKind::ArrowFunction(data) => Some(data.modifiers),
        NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => Some(data.modifiers),
        NodeKind::VariableStatement { modifiers, .. }
        | NodeKind::InterfaceDeclaration { modifiers, .. }
        | NodeKind::TypeAliasDeclaration { modifiers, .. } => Some(*modifiers),
        NodeKind::EnumDeclaration(data) => Some(data.modifiers),
        NodeKind::ModuleDeclaration(data) => Some(data.modifiers),
        NodeKind::ImportEqualsDeclaration(data) => Some(data.modifiers),
        NodeKind::PropertyDeclaration(data) => Some(data.modifiers),
        NodeKind::Parameter(data) => Some(data.modifiers),
        _ => None,
    }
}
