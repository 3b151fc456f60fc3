//! Deterministic serialization of value trees
//!
//! Serialization is the inverse of parsing modulo simplification: feeding
//! a node's text back through the parser yields a structurally equal tree.
//! Math nodes have two renditions: the full form (wrapped in `calc(…)` for
//! sum/product/negate/invert) and an inner form used when the node appears
//! as an operand of another math node, where the `calc(…)` wrapper is
//! elided and parentheses appear only where precedence demands them.

use super::{
    CssKeywordValue, CssMathClamp, CssMathInvert, CssMathMax, CssMathMin, CssMathNegate,
    CssMathProduct, CssMathSum, CssNumericValue, CssStyleValue, CssUnitValue, CssUnparsedValue,
    CssVariableReferenceValue, UnparsedMember,
};
use std::fmt;

/// Write a numeric component value: up to six fractional digits, trailing
/// zeros trimmed, negative zero normalized
pub(crate) fn write_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let mut text = format!("{:.6}", value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    f.write_str(&text)
}

impl fmt::Display for CssUnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_number(f, self.value())?;
        f.write_str(self.unit().as_str())
    }
}

impl fmt::Display for CssKeywordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl fmt::Display for CssVariableReferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fallback() {
            Some(fallback) => write!(f, "var({}, {})", self.variable(), fallback),
            None => write!(f, "var({})", self.variable()),
        }
    }
}

impl fmt::Display for CssUnparsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for member in self.iter() {
            match member {
                UnparsedMember::Text(text) => f.write_str(text)?,
                UnparsedMember::Variable(var) => write!(f, "{}", var)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for CssNumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssNumericValue::Unit(unit) => write!(f, "{}", unit),
            CssNumericValue::Variable(var) => write!(f, "{}", var),
            CssNumericValue::Min(min) => write!(f, "{}", min),
            CssNumericValue::Max(max) => write!(f, "{}", max),
            CssNumericValue::Clamp(clamp) => write!(f, "{}", clamp),
            compound => {
                f.write_str("calc(")?;
                compound.write_inner(f)?;
                f.write_str(")")
            }
        }
    }
}

impl CssNumericValue {
    /// The node's text without a `calc(…)` wrapper, for use inside an
    /// enclosing math serialization
    fn write_inner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssNumericValue::Sum(sum) => write_sum_inner(sum, f),
            CssNumericValue::Product(product) => write_product_inner(product, f),
            CssNumericValue::Negate(negate) => write_negate_inner(negate, f),
            CssNumericValue::Invert(invert) => write_invert_inner(invert, f),
            other => write!(f, "{}", other),
        }
    }

    /// Inner form, parenthesized when this node is a sum (lower precedence
    /// than the surrounding multiplicative context)
    fn write_multiplicand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self, CssNumericValue::Sum(_)) {
            f.write_str("(")?;
            self.write_inner(f)?;
            return f.write_str(")");
        }
        self.write_inner(f)
    }
}

fn write_sum_inner(sum: &CssMathSum, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (index, operand) in sum.values().iter().enumerate() {
        if index == 0 {
            operand.write_multiplicand(f)?;
            continue;
        }
        match operand {
            CssNumericValue::Negate(negate) => {
                f.write_str(" - ")?;
                negate.value().write_multiplicand(f)?;
            }
            other => {
                f.write_str(" + ")?;
                other.write_multiplicand(f)?;
            }
        }
    }
    Ok(())
}

fn write_product_inner(product: &CssMathProduct, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut numerator: Vec<&CssNumericValue> = Vec::new();
    let mut denominator: Vec<&CssNumericValue> = Vec::new();
    for operand in product.values() {
        match operand {
            CssNumericValue::Invert(invert) => denominator.push(invert.value()),
            other => numerator.push(other),
        }
    }

    if numerator.is_empty() {
        f.write_str("1")?;
    } else {
        for (index, factor) in numerator.iter().enumerate() {
            if index > 0 {
                f.write_str(" * ")?;
            }
            factor.write_multiplicand(f)?;
        }
    }

    if denominator.is_empty() {
        return Ok(());
    }
    f.write_str(" / ")?;
    let compound_single = denominator.len() == 1
        && matches!(
            denominator[0],
            CssNumericValue::Sum(_) | CssNumericValue::Negate(_) | CssNumericValue::Product(_)
        );
    if denominator.len() > 1 || compound_single {
        f.write_str("(")?;
        for (index, factor) in denominator.iter().enumerate() {
            if index > 0 {
                f.write_str(" * ")?;
            }
            factor.write_multiplicand(f)?;
        }
        return f.write_str(")");
    }
    denominator[0].write_multiplicand(f)
}

fn write_negate_inner(negate: &CssMathNegate, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("-1 * ")?;
    write_unary_operand(negate.value(), f)
}

fn write_invert_inner(invert: &CssMathInvert, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("1 / ")?;
    write_unary_operand(invert.value(), f)
}

fn write_unary_operand(value: &CssNumericValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        CssNumericValue::Sum(_) | CssNumericValue::Negate(_) | CssNumericValue::Product(_) => {
            f.write_str("(")?;
            value.write_inner(f)?;
            f.write_str(")")
        }
        other => other.write_inner(f),
    }
}

impl fmt::Display for CssMathMin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("min(")?;
        write_comma_separated(self.values(), f)?;
        f.write_str(")")
    }
}

impl fmt::Display for CssMathMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("max(")?;
        write_comma_separated(self.values(), f)?;
        f.write_str(")")
    }
}

impl fmt::Display for CssMathClamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clamp({}, {}, {})", self.lower(), self.center(), self.upper())
    }
}

fn write_comma_separated(values: &[CssNumericValue], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

impl fmt::Display for CssStyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssStyleValue::Numeric(numeric) => write!(f, "{}", numeric),
            CssStyleValue::Keyword(keyword) => write!(f, "{}", keyword),
            CssStyleValue::Unparsed(unparsed) => write!(f, "{}", unparsed),
            CssStyleValue::Transform(transform) => write!(f, "{}", transform),
        }
    }
}
