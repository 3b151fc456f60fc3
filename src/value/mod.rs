//! Typed CSS value nodes
//!
//! Every value handled by this crate is a [`CssStyleValue`]: a tagged tree
//! of numeric, keyword, unparsed, variable-reference, and transform nodes.
//! Numeric nodes additionally carry a dimension type ([`NumericType`]) and
//! participate in `calc()` algebra.
//!
//! Nodes are immutable value objects; the builders on [`CssNumericValue`]
//! simplify eagerly, so a constructed tree is already in normal form and
//! serialization round-trips structurally.

mod serialize;
mod transform;

pub use transform::{
    CssMatrixComponent, CssPerspective, CssRotate, CssScale, CssSkew, CssSkewX, CssSkewY,
    CssTransformValue, CssTranslate, MatrixEntries, TransformComponent,
};

use crate::error::{ParseError, Result, TypeError};
use crate::simplify;
use crate::units::{NumericType, Unit, UnitCategory};

/// Any value a style property can hold
#[derive(Debug, Clone, PartialEq)]
pub enum CssStyleValue {
    /// A numeric value, possibly a math expression or variable reference
    Numeric(CssNumericValue),
    /// A plain CSS identifier such as `auto` or `inherit`
    Keyword(CssKeywordValue),
    /// Verbatim text kept when no typed representation applies
    Unparsed(CssUnparsedValue),
    /// A parsed `transform` function list
    Transform(CssTransformValue),
}

/// A numeric value node: leaf, math expression, or variable reference
///
/// Variable references are not numerics in the strict sense, but they occur
/// wherever a numeric operand may, so they live in this sum type and make
/// the containing expression's dimension type indeterminate.
#[derive(Debug, Clone, PartialEq)]
pub enum CssNumericValue {
    Unit(CssUnitValue),
    Sum(CssMathSum),
    Product(CssMathProduct),
    Negate(CssMathNegate),
    Invert(CssMathInvert),
    Min(CssMathMin),
    Max(CssMathMax),
    Clamp(CssMathClamp),
    Variable(CssVariableReferenceValue),
}

/// Leaf numeric: a finite value with a canonical unit
#[derive(Debug, Clone, PartialEq)]
pub struct CssUnitValue {
    value: f64,
    unit: Unit,
}

impl CssUnitValue {
    /// Construct a unit value; the value must be finite
    pub fn new(value: f64, unit: Unit) -> Result<CssUnitValue> {
        if !value.is_finite() {
            return Err(TypeError::NonFinite { value }.into());
        }
        Ok(CssUnitValue { value, unit })
    }

    /// Construct a dimensionless number
    pub fn number(value: f64) -> Result<CssUnitValue> {
        CssUnitValue::new(value, Unit::Number)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the value; the only mutation the node model permits
    pub fn set_value(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(TypeError::NonFinite { value }.into());
        }
        self.value = value;
        Ok(())
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// The dimension type of this leaf
    pub fn numeric_type(&self) -> NumericType {
        NumericType::of(self.unit)
    }

    /// Convert to another unit of the same category using the fixed ratios
    /// of absolute units
    ///
    /// Relative lengths, percentages, and flex fractions have no
    /// context-free ratio and cannot be converted; neither can units of
    /// different categories.
    pub fn to(&self, unit: Unit) -> Result<CssUnitValue> {
        if unit == self.unit {
            return Ok(self.clone());
        }
        let compatible = self.unit.category() == unit.category()
            && self.unit.category() != UnitCategory::Number;
        let ratios = match (self.unit.conversion_ratio(), unit.conversion_ratio()) {
            (Some(from), Some(to)) if compatible => Some((from, to)),
            _ => None,
        };
        let (from, to) = ratios.ok_or(TypeError::IncompatibleTypes {
            left: NumericType::of(self.unit),
            right: NumericType::of(unit),
        })?;
        CssUnitValue::new(self.value * from / to, unit)
    }
}

/// A CSS-wide or property keyword, stored verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct CssKeywordValue {
    value: String,
}

impl CssKeywordValue {
    pub fn new(value: impl Into<String>) -> Result<CssKeywordValue> {
        let value = value.into();
        if value.is_empty() {
            return Err(ParseError::EmptyInput.into());
        }
        Ok(CssKeywordValue { value })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// One piece of an unparsed value: raw text or a variable reference
#[derive(Debug, Clone, PartialEq)]
pub enum UnparsedMember {
    Text(String),
    Variable(CssVariableReferenceValue),
}

/// Ordered fragments kept verbatim when value text cannot be typed
#[derive(Debug, Clone, PartialEq)]
pub struct CssUnparsedValue {
    members: Vec<UnparsedMember>,
}

impl CssUnparsedValue {
    pub fn new(members: Vec<UnparsedMember>) -> CssUnparsedValue {
        CssUnparsedValue { members }
    }

    /// A single-fragment unparsed value holding `text` verbatim
    pub fn from_text(text: impl Into<String>) -> CssUnparsedValue {
        CssUnparsedValue {
            members: vec![UnparsedMember::Text(text.into())],
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&UnparsedMember> {
        self.members.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnparsedMember> {
        self.members.iter()
    }
}

impl<'a> IntoIterator for &'a CssUnparsedValue {
    type Item = &'a UnparsedMember;
    type IntoIter = std::slice::Iter<'a, UnparsedMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Reference to a custom property: `var(--name)` with an optional raw
/// fallback
///
/// The fallback is never parsed; it is captured as an [`CssUnparsedValue`]
/// and re-emitted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct CssVariableReferenceValue {
    name: String,
    fallback: Option<Box<CssUnparsedValue>>,
}

impl CssVariableReferenceValue {
    pub fn new(
        name: impl Into<String>,
        fallback: Option<CssUnparsedValue>,
    ) -> Result<CssVariableReferenceValue> {
        let name = name.into();
        if !name.starts_with("--") {
            return Err(TypeError::NotNumeric {
                what: format!("'{name}' (custom property names start with --)"),
            }
            .into());
        }
        Ok(CssVariableReferenceValue {
            name,
            fallback: fallback.map(Box::new),
        })
    }

    pub fn variable(&self) -> &str {
        &self.name
    }

    pub fn fallback(&self) -> Option<&CssUnparsedValue> {
        self.fallback.as_deref()
    }
}

/// `a + b + …` (subtraction is addition of a negated operand)
#[derive(Debug, Clone, PartialEq)]
pub struct CssMathSum {
    pub(crate) values: Vec<CssNumericValue>,
}

/// `a * b * …` (division is multiplication by an inverted operand)
#[derive(Debug, Clone, PartialEq)]
pub struct CssMathProduct {
    pub(crate) values: Vec<CssNumericValue>,
}

/// Unary negation kept only around operands that cannot fold
#[derive(Debug, Clone, PartialEq)]
pub struct CssMathNegate {
    pub(crate) value: Box<CssNumericValue>,
}

/// Reciprocal kept only around operands that cannot fold
#[derive(Debug, Clone, PartialEq)]
pub struct CssMathInvert {
    pub(crate) value: Box<CssNumericValue>,
}

/// `min(…)` over one or more operands
#[derive(Debug, Clone, PartialEq)]
pub struct CssMathMin {
    pub(crate) values: Vec<CssNumericValue>,
}

/// `max(…)` over one or more operands
#[derive(Debug, Clone, PartialEq)]
pub struct CssMathMax {
    pub(crate) values: Vec<CssNumericValue>,
}

/// `clamp(lower, value, upper)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssMathClamp {
    pub(crate) lower: Box<CssNumericValue>,
    pub(crate) center: Box<CssNumericValue>,
    pub(crate) upper: Box<CssNumericValue>,
}

impl CssMathSum {
    pub fn values(&self) -> &[CssNumericValue] {
        &self.values
    }
}

impl CssMathProduct {
    pub fn values(&self) -> &[CssNumericValue] {
        &self.values
    }
}

impl CssMathNegate {
    pub fn value(&self) -> &CssNumericValue {
        &self.value
    }
}

impl CssMathInvert {
    pub fn value(&self) -> &CssNumericValue {
        &self.value
    }
}

impl CssMathMin {
    pub fn values(&self) -> &[CssNumericValue] {
        &self.values
    }
}

impl CssMathMax {
    pub fn values(&self) -> &[CssNumericValue] {
        &self.values
    }
}

impl CssMathClamp {
    pub fn lower(&self) -> &CssNumericValue {
        &self.lower
    }

    pub fn center(&self) -> &CssNumericValue {
        &self.center
    }

    pub fn upper(&self) -> &CssNumericValue {
        &self.upper
    }
}

impl CssNumericValue {
    /// Build a sum; folds constants and checks additive compatibility
    pub fn sum(values: Vec<CssNumericValue>) -> Result<CssNumericValue> {
        simplify::sum(values)
    }

    /// Build a product; folds scalars and distributes over a lone sum
    pub fn product(values: Vec<CssNumericValue>) -> Result<CssNumericValue> {
        simplify::product(values)
    }

    /// Negate a value; `-x` folds into the leaf where possible
    pub fn negate(value: CssNumericValue) -> Result<CssNumericValue> {
        simplify::negate(value)
    }

    /// Invert a value; `1/x` folds for dimensionless leaves
    pub fn invert(value: CssNumericValue) -> Result<CssNumericValue> {
        simplify::invert(value)
    }

    /// Build `min(…)`; requires at least one operand
    pub fn min(values: Vec<CssNumericValue>) -> Result<CssNumericValue> {
        simplify::min(values)
    }

    /// Build `max(…)`; requires at least one operand
    pub fn max(values: Vec<CssNumericValue>) -> Result<CssNumericValue> {
        simplify::max(values)
    }

    /// Build `clamp(lower, value, upper)`
    pub fn clamp(
        lower: CssNumericValue,
        center: CssNumericValue,
        upper: CssNumericValue,
    ) -> Result<CssNumericValue> {
        simplify::clamp(lower, center, upper)
    }

    /// Parse value text that must be numeric: a leaf, a math expression,
    /// or a variable reference
    pub fn parse(text: &str) -> Result<CssNumericValue> {
        crate::parse::parse_numeric_text(text.trim())
    }

    /// `self + other`
    pub fn add(self, other: CssNumericValue) -> Result<CssNumericValue> {
        simplify::sum(vec![self, other])
    }

    /// `self - other`
    pub fn sub(self, other: CssNumericValue) -> Result<CssNumericValue> {
        let negated = simplify::negate(other)?;
        simplify::sum(vec![self, negated])
    }

    /// `self * other`
    pub fn mul(self, other: CssNumericValue) -> Result<CssNumericValue> {
        simplify::product(vec![self, other])
    }

    /// `self / other`; a zero dimensionless divisor is a range error
    pub fn div(self, other: CssNumericValue) -> Result<CssNumericValue> {
        let inverted = simplify::invert(other)?;
        simplify::product(vec![self, inverted])
    }

    /// The dimension type of this expression
    ///
    /// Sums, `min`, `max`, and `clamp` merge the types of their
    /// non-variable operands under the additive rule; products add
    /// exponents with inversion negating them. Variable references are
    /// indeterminate and report the zero vector without constraining the
    /// merge.
    pub fn numeric_type(&self) -> Result<NumericType> {
        match self {
            CssNumericValue::Unit(unit) => Ok(unit.numeric_type()),
            CssNumericValue::Sum(sum) => additive_type(&sum.values),
            CssNumericValue::Min(min) => additive_type(&min.values),
            CssNumericValue::Max(max) => additive_type(&max.values),
            CssNumericValue::Clamp(clamp) => {
                additive_type([&*clamp.lower, &*clamp.center, &*clamp.upper])
            }
            CssNumericValue::Product(product) => {
                let mut ty = NumericType::NUMBER;
                for value in &product.values {
                    ty = ty.multiply(value.numeric_type()?);
                }
                Ok(ty)
            }
            CssNumericValue::Negate(negate) => negate.value.numeric_type(),
            CssNumericValue::Invert(invert) => {
                if invert.value.type_is_indeterminate() {
                    Ok(NumericType::NUMBER)
                } else {
                    Ok(invert.value.numeric_type()?.invert())
                }
            }
            CssNumericValue::Variable(_) => Ok(NumericType::NUMBER),
        }
    }

    /// True for a bare variable reference
    pub fn is_variable(&self) -> bool {
        matches!(self, CssNumericValue::Variable(_))
    }

    /// True when this expression's dimension type hinges on a variable
    /// reference and must not constrain an additive merge
    pub(crate) fn type_is_indeterminate(&self) -> bool {
        match self {
            CssNumericValue::Variable(_) => true,
            CssNumericValue::Unit(_) => false,
            CssNumericValue::Negate(negate) => negate.value.type_is_indeterminate(),
            CssNumericValue::Invert(invert) => invert.value.type_is_indeterminate(),
            CssNumericValue::Sum(sum) => all_indeterminate(&sum.values),
            CssNumericValue::Product(product) => all_indeterminate(&product.values),
            CssNumericValue::Min(min) => all_indeterminate(&min.values),
            CssNumericValue::Max(max) => all_indeterminate(&max.values),
            CssNumericValue::Clamp(clamp) => {
                clamp.lower.type_is_indeterminate()
                    && clamp.center.type_is_indeterminate()
                    && clamp.upper.type_is_indeterminate()
            }
        }
    }

    pub(crate) fn as_unit(&self) -> Option<&CssUnitValue> {
        match self {
            CssNumericValue::Unit(unit) => Some(unit),
            _ => None,
        }
    }
}

/// Merge operand types under the additive rule, skipping operands whose
/// type hinges on a variable reference
pub(crate) fn additive_type<'a>(
    values: impl IntoIterator<Item = &'a CssNumericValue>,
) -> Result<NumericType> {
    let mut merged: Option<NumericType> = None;
    for value in values {
        if value.type_is_indeterminate() {
            continue;
        }
        let ty = value.numeric_type()?;
        merged = Some(match merged {
            None => ty,
            Some(current) => current.add(ty)?,
        });
    }
    Ok(merged.unwrap_or(NumericType::NUMBER))
}

fn all_indeterminate(values: &[CssNumericValue]) -> bool {
    values.iter().all(CssNumericValue::type_is_indeterminate)
}

impl CssStyleValue {
    /// Parse one value for `property`; see the `parse` module for the
    /// strict/lenient fallback policy
    pub fn parse(property: &str, text: &str) -> Result<CssStyleValue> {
        crate::parse::parse(property, text)
    }

    /// Parse a comma-separated list of values for `property`
    pub fn parse_all(property: &str, text: &str) -> Result<Vec<CssStyleValue>> {
        crate::parse::parse_all(property, text)
    }
}

impl From<CssUnitValue> for CssNumericValue {
    fn from(value: CssUnitValue) -> Self {
        CssNumericValue::Unit(value)
    }
}

impl From<CssNumericValue> for CssStyleValue {
    fn from(value: CssNumericValue) -> Self {
        CssStyleValue::Numeric(value)
    }
}

impl From<CssUnitValue> for CssStyleValue {
    fn from(value: CssUnitValue) -> Self {
        CssStyleValue::Numeric(CssNumericValue::Unit(value))
    }
}

impl From<CssKeywordValue> for CssStyleValue {
    fn from(value: CssKeywordValue) -> Self {
        CssStyleValue::Keyword(value)
    }
}

impl From<CssUnparsedValue> for CssStyleValue {
    fn from(value: CssUnparsedValue) -> Self {
        CssStyleValue::Unparsed(value)
    }
}

impl From<CssTransformValue> for CssStyleValue {
    fn from(value: CssTransformValue) -> Self {
        CssStyleValue::Transform(value)
    }
}
