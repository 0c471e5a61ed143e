//! Enum member constant evaluation.
//!
//! Runs inside the reference pass, once per enum declaration, in member
//! order. Earlier members are therefore already folded when a later
//! initializer names them. Arithmetic follows the JavaScript operators
//! the lowered code would run: IEEE doubles everywhere, with ToInt32 /
//! ToUint32 wrapping for the bitwise and shift forms. Anything outside
//! the constant grammar evaluates to `None`, which downgrades the
//! member to a computed one (or is an error inside a `const enum`).

use tsdl_common::diagnostics::codes;
use tsdl_parser::ast::EnumData;
use tsdl_parser::{NodeId, NodeKind};
use tsdl_scanner::SyntaxKind;
use tsdl_scanner::scanner::parse_numeric_value;

use crate::state::BinderState;
use crate::symbols::{ConstValue, SymbolId, SymbolKind};

impl BinderState<'_> {
    /// Fold the members of one enum declaration. Resolves references in
    /// each initializer, stores the folded value on the member symbol,
    /// and reports the two shapes emit cannot lower: an auto-increment
    /// member after a non-numeric one, and a non-constant initializer
    /// inside a `const enum`.
    pub(crate) fn bind_enum_members(&mut self, enum_symbol: SymbolId, data: &EnumData) {
        let is_const = matches!(self.symbols.get(enum_symbol).kind, SymbolKind::ConstEnum);
        let mut previous: Option<ConstValue> = None;
        let mut first = true;
        for &member in &data.members {
            let NodeKind::EnumMember { initializer, .. } = self.arena.kind(member) else {
                continue;
            };
            let value = if initializer.is_some() {
                self.visit(*initializer);
                let value = self.evaluate_enum_value(*initializer);
                if value.is_none() && is_const {
                    self.error_at(
                        *initializer,
                        codes::CONST_ENUM_INITIALIZER_NOT_CONSTANT,
                        "const enum member initializers must be constant expressions.",
                    );
                }
                value
            } else if first {
                Some(ConstValue::Number(0.0))
            } else if let Some(ConstValue::Number(n)) = &previous {
                Some(ConstValue::Number(n + 1.0))
            } else {
                self.error_at(
                    member,
                    codes::ENUM_MEMBER_MUST_HAVE_INITIALIZER,
                    "Enum member must have initializer.",
                );
                None
            };
            if let Some(&symbol) = self.node_symbols.get(&member) {
                self.symbols.get_mut(symbol).const_value = value.clone();
            }
            previous = value;
            first = false;
        }
    }

    /// Evaluate an enum initializer to a constant, or `None` when it
    /// falls outside the constant grammar. Template literals are
    /// deliberately non-constant, matching what the lowered `E[E.A] =`
    /// form can carry.
    pub(crate) fn evaluate_enum_value(&self, expr: NodeId) -> Option<ConstValue> {
        match self.arena.kind(expr) {
            NodeKind::NumericLiteral { raw } => parse_numeric_value(raw).map(ConstValue::Number),
            NodeKind::StringLiteral { value, .. } => Some(ConstValue::Str(value.clone())),
            NodeKind::ParenthesizedExpression { expression }
            | NodeKind::AsExpression { expression, .. }
            | NodeKind::SatisfiesExpression { expression, .. }
            | NodeKind::NonNullExpression { expression }
            | NodeKind::TypeAssertionExpression { expression, .. } => {
                self.evaluate_enum_value(*expression)
            }
            NodeKind::PrefixUnaryExpression { operator, operand } => {
                let value = self.evaluate_enum_value(*operand)?.as_number()?;
                match *operator {
                    SyntaxKind::PlusToken => Some(ConstValue::Number(value)),
                    SyntaxKind::MinusToken => Some(ConstValue::Number(-value)),
                    SyntaxKind::TildeToken => Some(ConstValue::Number(f64::from(!to_int32(value)))),
                    _ => None,
                }
            }
            NodeKind::BinaryExpression {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate_enum_value(*left)?;
                let right = self.evaluate_enum_value(*right)?;
                evaluate_binary(&left, *operator, &right)
            }
            NodeKind::Identifier { text } => {
                let symbol = self.resolve_name(text)?;
                self.member_constant(symbol)
            }
            NodeKind::PropertyAccessExpression {
                expression, name, ..
            } => {
                let container = self.resolve_constant_entity(*expression)?;
                if name.is_none() {
                    return None;
                }
                let member_name = self.arena.identifier_text(*name)?;
                let member = self.symbols.get(container).export(member_name)?;
                self.member_constant(member)
            }
            NodeKind::ElementAccessExpression {
                expression,
                argument,
                ..
            } => {
                let container = self.resolve_constant_entity(*expression)?;
                if argument.is_none() {
                    return None;
                }
                let member_name = self.arena.string_value(*argument)?;
                let member = self.symbols.get(container).export(member_name)?;
                self.member_constant(member)
            }
            _ => None,
        }
    }

    /// Already-folded value of an enum member symbol. Members evaluate
    /// in declaration order, so a forward reference sees `None` here
    /// and stays non-constant.
    fn member_constant(&self, symbol: SymbolId) -> Option<ConstValue> {
        let symbol = self.symbols.get(symbol);
        match symbol.kind {
            SymbolKind::EnumMember => symbol.const_value.clone(),
            _ => None,
        }
    }

    /// Resolve the container of a qualified member read (`E` in `E.A`,
    /// `ns.E` in `ns.E.A`) through namespace export tables.
    fn resolve_constant_entity(&self, expr: NodeId) -> Option<SymbolId> {
        match self.arena.kind(expr) {
            NodeKind::Identifier { text } => self.resolve_name(text),
            NodeKind::PropertyAccessExpression {
                expression, name, ..
            } => {
                let container = self.resolve_constant_entity(*expression)?;
                if name.is_none() {
                    return None;
                }
                let member_name = self.arena.identifier_text(*name)?;
                self.symbols.get(container).export(member_name)
            }
            _ => None,
        }
    }
}

/// ECMAScript ToInt32. Bitwise operands fold with the same wrapping the
/// emitted code would produce at runtime.
fn to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let modulus = 4_294_967_296.0;
    let wrapped = value.trunc().rem_euclid(modulus);
    if wrapped >= 2_147_483_648.0 {
        (wrapped - modulus) as i32
    } else {
        wrapped as i32
    }
}

/// ECMAScript ToUint32, for `>>>` and shift counts.
fn to_uint32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(4_294_967_296.0) as u32
}

fn evaluate_binary(
    left: &ConstValue,
    operator: SyntaxKind,
    right: &ConstValue,
) -> Option<ConstValue> {
    match (left, right) {
        (ConstValue::Str(l), ConstValue::Str(r)) => {
            if operator == SyntaxKind::PlusToken {
                Some(ConstValue::Str(format!("{l}{r}")))
            } else {
                None
            }
        }
        (ConstValue::Number(l), ConstValue::Number(r)) => {
            let (l, r) = (*l, *r);
            let value = match operator {
                SyntaxKind::PlusToken => l + r,
                SyntaxKind::MinusToken => l - r,
                SyntaxKind::AsteriskToken => l * r,
                SyntaxKind::SlashToken => l / r,
                SyntaxKind::PercentToken => l % r,
                SyntaxKind::AsteriskAsteriskToken => l.powf(r),
                SyntaxKind::LessThanLessThanToken => f64::from(to_int32(l) << (to_uint32(r) & 31)),
                SyntaxKind::GreaterThanGreaterThanToken => {
                    f64::from(to_int32(l) >> (to_uint32(r) & 31))
                }
                SyntaxKind::GreaterThanGreaterThanGreaterThanToken => {
                    f64::from(to_uint32(l) >> (to_uint32(r) & 31))
                }
                SyntaxKind::AmpersandToken => f64::from(to_int32(l) & to_int32(r)),
                SyntaxKind::BarToken => f64::from(to_int32(l) | to_int32(r)),
                SyntaxKind::CaretToken => f64::from(to_int32(l) ^ to_int32(r)),
                _ => return None,
            };
            Some(ConstValue::Number(value))
        }
        _ => None,
    }
}
