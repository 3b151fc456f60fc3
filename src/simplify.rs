//! Algebraic normalization of math value trees
//!
//! The builders here are the only way math nodes come into existence: the
//! expression parser and the arithmetic methods both construct through
//! them, so every tree is in normal form the moment it is built. Each
//! builder folds constants where the operands allow it, keeps the tree
//! untouched around variable references, and enforces the additive
//! dimension rule (length and percent mix; nothing else does, and a plain
//! number never mixes with a dimension).

use crate::error::{RangeError, Result, TypeError};
use crate::units::Unit;
use crate::value::{
    CssMathClamp, CssMathInvert, CssMathMax, CssMathMin, CssMathNegate, CssMathProduct,
    CssMathSum, CssNumericValue, CssUnitValue,
};

/// Build a sum out of `values`
///
/// Nested sums are flattened one level, same-unit leaves fold into one
/// leaf per unit token (`percent` and `px` stay separate), and the result
/// collapses to a single node when only one operand remains. Any variable
/// reference suspends folding and the flattened operand list is kept
/// as-is.
pub fn sum(values: Vec<CssNumericValue>) -> Result<CssNumericValue> {
    // Fast path: the overwhelmingly common `a + b` with one shared unit.
    if let [CssNumericValue::Unit(a), CssNumericValue::Unit(b)] = values.as_slice() {
        if a.unit() == b.unit() {
            return Ok(CssUnitValue::new(a.value() + b.value(), a.unit())?.into());
        }
    }

    let mut flattened = Vec::with_capacity(values.len());
    for value in values {
        match value {
            CssNumericValue::Sum(inner) => flattened.extend(inner.values),
            other => flattened.push(other),
        }
    }

    if flattened.iter().any(CssNumericValue::is_variable) {
        return Ok(CssNumericValue::Sum(CssMathSum { values: flattened }));
    }

    // Fold unit leaves into one bucket per unit token, keeping the position
    // of each bucket's first occurrence so serialization stays stable.
    enum Slot {
        Bucket(Unit, f64),
        Complex(CssNumericValue),
    }
    let mut slots: Vec<Slot> = Vec::new();
    for value in flattened {
        match value {
            CssNumericValue::Unit(unit) => {
                let existing = slots.iter_mut().find_map(|slot| match slot {
                    Slot::Bucket(token, total) if *token == unit.unit() => Some(total),
                    _ => None,
                });
                match existing {
                    Some(total) => *total += unit.value(),
                    None => slots.push(Slot::Bucket(unit.unit(), unit.value())),
                }
            }
            other => slots.push(Slot::Complex(other)),
        }
    }

    let mut result = Vec::with_capacity(slots.len());
    for slot in slots {
        match slot {
            Slot::Bucket(unit, total) => result.push(CssUnitValue::new(total, unit)?.into()),
            Slot::Complex(value) => result.push(value),
        }
    }

    crate::value::additive_type(&result)?;

    match result.len() {
        0 => Ok(CssUnitValue::number(0.0)?.into()),
        1 => Ok(result.into_iter().next().unwrap()),
        _ => Ok(CssNumericValue::Sum(CssMathSum { values: result })),
    }
}

/// Build a product out of `values`
///
/// Dimensionless leaves (and negated/inverted dimensionless leaves) fold
/// into one scalar. A zero scalar collapses the whole product; a lone
/// dimensioned leaf absorbs the scalar; a lone sum has the scalar
/// distributed over its operands. Any variable reference keeps the
/// operand list untouched.
pub fn product(values: Vec<CssNumericValue>) -> Result<CssNumericValue> {
    if values.iter().any(CssNumericValue::is_variable) {
        return Ok(CssNumericValue::Product(CssMathProduct { values }));
    }

    let mut scalar = 1.0f64;
    let mut dimension: Option<CssUnitValue> = None;
    let mut sum_operand: Option<CssMathSum> = None;
    let mut others: Vec<&CssNumericValue> = Vec::new();

    for value in &values {
        match value {
            CssNumericValue::Unit(unit) if unit.unit() == Unit::Number => {
                scalar *= unit.value();
            }
            CssNumericValue::Negate(negate) => match negate.value() {
                CssNumericValue::Unit(inner) if inner.unit() == Unit::Number => {
                    scalar *= -inner.value();
                }
                _ => others.push(value),
            },
            CssNumericValue::Invert(invert) => match invert.value() {
                CssNumericValue::Unit(inner) if inner.unit() == Unit::Number => {
                    if inner.value() == 0.0 {
                        return Err(RangeError::DivisionByZero.into());
                    }
                    scalar /= inner.value();
                }
                _ => others.push(value),
            },
            CssNumericValue::Unit(unit) if dimension.is_none() => {
                dimension = Some(unit.clone());
            }
            CssNumericValue::Sum(sum) if sum_operand.is_none() => {
                sum_operand = Some(sum.clone());
            }
            other => others.push(other),
        }
    }

    if scalar == 0.0 {
        return Ok(CssUnitValue::number(0.0)?.into());
    }

    if dimension.is_none() && sum_operand.is_none() && others.is_empty() {
        return Ok(CssUnitValue::number(scalar)?.into());
    }

    if let Some(unit) = &dimension {
        if sum_operand.is_none() && others.is_empty() {
            return Ok(CssUnitValue::new(unit.value() * scalar, unit.unit())?.into());
        }
    }

    if dimension.is_none() && others.is_empty() && scalar != 1.0 {
        if let Some(inner) = sum_operand {
            let factor: CssNumericValue = CssUnitValue::number(scalar)?.into();
            let mut distributed = Vec::with_capacity(inner.values.len());
            for operand in inner.values {
                distributed.push(product(vec![operand, factor.clone()])?);
            }
            return sum(distributed);
        }
    }

    Ok(CssNumericValue::Product(CssMathProduct { values }))
}

/// Negate a value; `-leaf` folds and double negation unwraps
pub fn negate(value: CssNumericValue) -> Result<CssNumericValue> {
    match value {
        CssNumericValue::Unit(unit) => {
            Ok(CssUnitValue::new(-unit.value(), unit.unit())?.into())
        }
        CssNumericValue::Negate(negate) => Ok(*negate.value),
        other => Ok(CssNumericValue::Negate(CssMathNegate {
            value: Box::new(other),
        })),
    }
}

/// Invert a value; a dimensionless leaf folds to its reciprocal, zero is a
/// range error, and anything else is wrapped verbatim
pub fn invert(value: CssNumericValue) -> Result<CssNumericValue> {
    match value {
        CssNumericValue::Unit(unit) if unit.unit() == Unit::Number => {
            if unit.value() == 0.0 {
                return Err(RangeError::InversionOfZero.into());
            }
            Ok(CssUnitValue::number(1.0 / unit.value())?.into())
        }
        other => Ok(CssNumericValue::Invert(CssMathInvert {
            value: Box::new(other),
        })),
    }
}

/// Build `min(…)`; operands must be additively compatible
pub fn min(values: Vec<CssNumericValue>) -> Result<CssNumericValue> {
    check_comparison("min", &values)?;
    Ok(CssNumericValue::Min(CssMathMin { values }))
}

/// Build `max(…)`; operands must be additively compatible
pub fn max(values: Vec<CssNumericValue>) -> Result<CssNumericValue> {
    check_comparison("max", &values)?;
    Ok(CssNumericValue::Max(CssMathMax { values }))
}

/// Build `clamp(lower, value, upper)`
pub fn clamp(
    lower: CssNumericValue,
    center: CssNumericValue,
    upper: CssNumericValue,
) -> Result<CssNumericValue> {
    crate::value::additive_type([&lower, &center, &upper])?;
    Ok(CssNumericValue::Clamp(CssMathClamp {
        lower: Box::new(lower),
        center: Box::new(center),
        upper: Box::new(upper),
    }))
}

fn check_comparison(function: &str, values: &[CssNumericValue]) -> Result<()> {
    if values.is_empty() {
        return Err(TypeError::WrongArity {
            function: function.to_string(),
            expected: "at least 1",
            found: 0,
        }
        .into());
    }
    crate::value::additive_type(values)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::CssVariableReferenceValue;

    fn unit(v: f64, u: Unit) -> CssNumericValue {
        CssUnitValue::new(v, u).unwrap().into()
    }

    fn number(v: f64) -> CssNumericValue {
        CssUnitValue::number(v).unwrap().into()
    }

    fn var(name: &str) -> CssNumericValue {
        CssNumericValue::Variable(CssVariableReferenceValue::new(name, None).unwrap())
    }

    #[test]
    fn test_sum_folds_matching_units() {
        let folded = sum(vec![unit(10.0, Unit::Px), unit(5.0, Unit::Px)]).unwrap();
        assert_eq!(folded, unit(15.0, Unit::Px));
    }

    #[test]
    fn test_sum_keeps_distinct_units_in_first_seen_order() {
        let kept = sum(vec![
            unit(50.0, Unit::Percent),
            unit(-10.0, Unit::Px),
            unit(25.0, Unit::Percent),
        ])
        .unwrap();
        let CssNumericValue::Sum(s) = kept else {
            panic!("expected a sum");
        };
        assert_eq!(s.values(), &[unit(75.0, Unit::Percent), unit(-10.0, Unit::Px)]);
    }

    #[test]
    fn test_sum_flattens_nested_sum_one_level() {
        let inner = sum(vec![unit(1.0, Unit::Px), unit(2.0, Unit::Em)]).unwrap();
        let outer = sum(vec![inner, unit(3.0, Unit::Px)]).unwrap();
        let CssNumericValue::Sum(s) = outer else {
            panic!("expected a sum");
        };
        assert_eq!(s.values(), &[unit(4.0, Unit::Px), unit(2.0, Unit::Em)]);
    }

    #[test]
    fn test_sum_rejects_number_plus_dimension() {
        let result = sum(vec![number(0.0), unit(10.0, Unit::Px)]);
        assert!(matches!(result, Err(Error::Type(_))));
    }

    #[test]
    fn test_sum_rejects_cross_dimension() {
        let result = sum(vec![unit(1.0, Unit::Px), unit(1.0, Unit::S)]);
        assert!(matches!(result, Err(Error::Type(_))));
    }

    #[test]
    fn test_sum_with_variable_suspends_folding() {
        let kept = sum(vec![unit(10.0, Unit::Px), unit(5.0, Unit::Px), var("--x")]).unwrap();
        let CssNumericValue::Sum(s) = kept else {
            panic!("expected a sum");
        };
        // Nothing folded, nothing type-checked.
        assert_eq!(s.values().len(), 3);
    }

    #[test]
    fn test_sum_with_variable_skips_type_check() {
        assert!(sum(vec![unit(1.0, Unit::Px), unit(1.0, Unit::S), var("--x")]).is_ok());
    }

    #[test]
    fn test_empty_sum_is_zero() {
        assert_eq!(sum(Vec::new()).unwrap(), number(0.0));
    }

    #[test]
    fn test_product_folds_scalars() {
        let folded = product(vec![number(3.0), number(4.0)]).unwrap();
        assert_eq!(folded, number(12.0));
    }

    #[test]
    fn test_product_scales_single_dimension() {
        let folded = product(vec![unit(10.0, Unit::Px), number(2.0)]).unwrap();
        assert_eq!(folded, unit(20.0, Unit::Px));
    }

    #[test]
    fn test_product_zero_scalar_collapses() {
        let folded = product(vec![number(0.0), unit(10.0, Unit::Px)]).unwrap();
        assert_eq!(folded, number(0.0));
    }

    #[test]
    fn test_product_distributes_scalar_over_sum() {
        let inner = sum(vec![unit(100.0, Unit::Percent), unit(-20.0, Unit::Px)]).unwrap();
        let distributed = product(vec![inner, number(0.5)]).unwrap();
        let CssNumericValue::Sum(s) = distributed else {
            panic!("expected a sum");
        };
        assert_eq!(
            s.values(),
            &[unit(50.0, Unit::Percent), unit(-10.0, Unit::Px)]
        );
    }

    #[test]
    fn test_product_with_variable_is_left_alone() {
        let kept = product(vec![unit(2.0, Unit::Px), var("--k")]).unwrap();
        let CssNumericValue::Product(p) = kept else {
            panic!("expected a product");
        };
        assert_eq!(p.values().len(), 2);
    }

    #[test]
    fn test_product_keeps_unfoldable_operands_verbatim() {
        let two_dims = product(vec![unit(2.0, Unit::Px), unit(3.0, Unit::Px)]).unwrap();
        let CssNumericValue::Product(p) = two_dims else {
            panic!("expected a product");
        };
        assert_eq!(p.values().len(), 2);
    }

    #[test]
    fn test_product_inverted_scalar_divides() {
        let inverted = invert(number(4.0)).unwrap();
        assert_eq!(inverted, number(0.25));
        let halved = product(vec![unit(10.0, Unit::Px), invert(number(2.0)).unwrap()]).unwrap();
        assert_eq!(halved, unit(5.0, Unit::Px));
    }

    #[test]
    fn test_negate_folds_leaf() {
        assert_eq!(negate(unit(5.0, Unit::Px)).unwrap(), unit(-5.0, Unit::Px));
    }

    #[test]
    fn test_double_negate_unwraps() {
        let once = negate(var("--x")).unwrap();
        let twice = negate(once).unwrap();
        assert_eq!(twice, var("--x"));
    }

    #[test]
    fn test_invert_zero_is_range_error() {
        assert!(matches!(invert(number(0.0)), Err(Error::Range(_))));
    }

    #[test]
    fn test_invert_dimension_wraps() {
        let wrapped = invert(unit(4.0, Unit::Px)).unwrap();
        assert!(matches!(wrapped, CssNumericValue::Invert(_)));
    }

    #[test]
    fn test_min_requires_operands() {
        assert!(matches!(min(Vec::new()), Err(Error::Type(_))));
    }

    #[test]
    fn test_min_checks_operand_compatibility() {
        assert!(min(vec![unit(1.0, Unit::Px), unit(2.0, Unit::S)]).is_err());
        assert!(min(vec![unit(1.0, Unit::Px), unit(2.0, Unit::Percent)]).is_ok());
    }

    #[test]
    fn test_clamp_builds_with_compatible_operands() {
        let clamped = clamp(
            unit(1.0, Unit::Rem),
            unit(2.5, Unit::Vw),
            unit(3.0, Unit::Rem),
        )
        .unwrap();
        assert!(matches!(clamped, CssNumericValue::Clamp(_)));
    }
}
