//! Parser for the `transform` function vocabulary
//!
//! A transform value is a whitespace-separated run of function calls;
//! each call becomes one transform component. Arguments are full math
//! expressions, so `rotate(calc(45deg + 0.125turn))` works anywhere an
//! angle is expected. Unitless zero is accepted for angles and lengths
//! and canonicalized (`0deg` / `0px`).

use super::expr;
use super::lexer::{Lexer, Token};
use crate::error::{ParseError, Result, TypeError};
use crate::units::Unit;
use crate::value::{
    CssMatrixComponent, CssNumericValue, CssPerspective, CssRotate, CssScale, CssSkew, CssSkewX,
    CssSkewY, CssTransformValue, CssTranslate, CssUnitValue, MatrixEntries, TransformComponent,
};

/// Parse a complete transform list
pub(crate) fn parse_transform_list(text: &str) -> Result<CssTransformValue> {
    let mut lexer = Lexer::new(text);
    let mut components = Vec::new();
    loop {
        let position = lexer.offset();
        match lexer.next()? {
            Token::Function(name) => {
                let args = transform_arguments(&mut lexer)?;
                components.push(component(&name, args)?);
            }
            Token::Eof => break,
            other => {
                return Err(ParseError::UnexpectedToken {
                    found: other.describe(),
                    position,
                }
                .into())
            }
        }
    }
    CssTransformValue::new(components)
}

fn transform_arguments(lexer: &mut Lexer<'_>) -> Result<Vec<CssNumericValue>> {
    let mut args = vec![expr::expression(lexer, 1)?];
    loop {
        let position = lexer.offset();
        match lexer.next()? {
            Token::Comma => args.push(expr::expression(lexer, 1)?),
            Token::Close => return Ok(args),
            Token::Eof => return Err(ParseError::UnmatchedParen { position }.into()),
            other => {
                return Err(ParseError::UnexpectedToken {
                    found: other.describe(),
                    position,
                }
                .into())
            }
        }
    }
}

fn component(name: &str, args: Vec<CssNumericValue>) -> Result<TransformComponent> {
    match name {
        "translate" | "translate3d" => translate(name, args),
        "translatex" => {
            let [x] = arity::<1>(name, args)?;
            Ok(TransformComponent::Translate(CssTranslate::new(
                length(x),
                zero_px(),
            )?))
        }
        "translatey" => {
            let [y] = arity::<1>(name, args)?;
            Ok(TransformComponent::Translate(CssTranslate::new(
                zero_px(),
                length(y),
            )?))
        }
        "translatez" => {
            let [z] = arity::<1>(name, args)?;
            Ok(TransformComponent::Translate(CssTranslate::new_3d(
                zero_px(),
                zero_px(),
                length(z),
            )?))
        }
        "rotate" | "rotate3d" => rotate(name, args),
        "rotatex" => rotate_about(name, args, (1.0, 0.0, 0.0)),
        "rotatey" => rotate_about(name, args, (0.0, 1.0, 0.0)),
        "rotatez" => rotate_about(name, args, (0.0, 0.0, 1.0)),
        "scale" | "scale3d" => scale(name, args),
        "scalex" => {
            let [x] = arity::<1>(name, args)?;
            Ok(TransformComponent::Scale(CssScale::new(
                number(name, x)?,
                1.0,
            )))
        }
        "scaley" => {
            let [y] = arity::<1>(name, args)?;
            Ok(TransformComponent::Scale(CssScale::new(
                1.0,
                number(name, y)?,
            )))
        }
        "scalez" => {
            let [z] = arity::<1>(name, args)?;
            Ok(TransformComponent::Scale(CssScale::new_3d(
                1.0,
                1.0,
                number(name, z)?,
            )))
        }
        "skew" => skew(name, args),
        "skewx" => {
            let [a] = arity::<1>(name, args)?;
            Ok(TransformComponent::SkewX(CssSkewX::new(angle(a))?))
        }
        "skewy" => {
            let [a] = arity::<1>(name, args)?;
            Ok(TransformComponent::SkewY(CssSkewY::new(angle(a))?))
        }
        "perspective" => {
            let [l] = arity::<1>(name, args)?;
            Ok(TransformComponent::Perspective(CssPerspective::new(
                length(l),
            )?))
        }
        "matrix" => {
            let entries = arity::<6>(name, args)?;
            let mut out = [0.0f64; 6];
            for (slot, value) in out.iter_mut().zip(entries) {
                *slot = number(name, value)?;
            }
            Ok(TransformComponent::Matrix(CssMatrixComponent::new(
                MatrixEntries::TwoD(out),
            )))
        }
        "matrix3d" => {
            let entries = arity::<16>(name, args)?;
            let mut out = [0.0f64; 16];
            for (slot, value) in out.iter_mut().zip(entries) {
                *slot = number(name, value)?;
            }
            Ok(TransformComponent::Matrix(CssMatrixComponent::new(
                MatrixEntries::ThreeD(out),
            )))
        }
        _ => Err(ParseError::UnknownFunction {
            name: name.to_string(),
        }
        .into()),
    }
}

fn translate(name: &str, args: Vec<CssNumericValue>) -> Result<TransformComponent> {
    match args.len() {
        1 => {
            let [x] = arity::<1>(name, args)?;
            Ok(TransformComponent::Translate(CssTranslate::new(
                length(x),
                zero_px(),
            )?))
        }
        2 => {
            let [x, y] = arity::<2>(name, args)?;
            Ok(TransformComponent::Translate(CssTranslate::new(
                length(x),
                length(y),
            )?))
        }
        3 => {
            let [x, y, z] = arity::<3>(name, args)?;
            Ok(TransformComponent::Translate(CssTranslate::new_3d(
                length(x),
                length(y),
                length(z),
            )?))
        }
        found => Err(wrong_arity(name, "1 to 3", found)),
    }
}

fn rotate(name: &str, args: Vec<CssNumericValue>) -> Result<TransformComponent> {
    match args.len() {
        1 => {
            let [a] = arity::<1>(name, args)?;
            Ok(TransformComponent::Rotate(CssRotate::new(angle(a))?))
        }
        4 => {
            let [x, y, z, a] = arity::<4>(name, args)?;
            Ok(TransformComponent::Rotate(CssRotate::new_3d(
                number(name, x)?,
                number(name, y)?,
                number(name, z)?,
                angle(a),
            )?))
        }
        found => Err(wrong_arity(name, "1 or 4", found)),
    }
}

fn rotate_about(
    name: &str,
    args: Vec<CssNumericValue>,
    axis: (f64, f64, f64),
) -> Result<TransformComponent> {
    let [a] = arity::<1>(name, args)?;
    Ok(TransformComponent::Rotate(CssRotate::new_3d(
        axis.0,
        axis.1,
        axis.2,
        angle(a),
    )?))
}

fn scale(name: &str, args: Vec<CssNumericValue>) -> Result<TransformComponent> {
    match args.len() {
        1 => {
            let [x] = arity::<1>(name, args)?;
            let x = number(name, x)?;
            Ok(TransformComponent::Scale(CssScale::new(x, x)))
        }
        2 => {
            let [x, y] = arity::<2>(name, args)?;
            Ok(TransformComponent::Scale(CssScale::new(
                number(name, x)?,
                number(name, y)?,
            )))
        }
        3 => {
            let [x, y, z] = arity::<3>(name, args)?;
            Ok(TransformComponent::Scale(CssScale::new_3d(
                number(name, x)?,
                number(name, y)?,
                number(name, z)?,
            )))
        }
        found => Err(wrong_arity(name, "1 to 3", found)),
    }
}

fn skew(name: &str, args: Vec<CssNumericValue>) -> Result<TransformComponent> {
    match args.len() {
        1 => {
            let [ax] = arity::<1>(name, args)?;
            Ok(TransformComponent::Skew(CssSkew::new(
                angle(ax),
                zero_deg(),
            )?))
        }
        2 => {
            let [ax, ay] = arity::<2>(name, args)?;
            Ok(TransformComponent::Skew(CssSkew::new(
                angle(ax),
                angle(ay),
            )?))
        }
        found => Err(wrong_arity(name, "1 or 2", found)),
    }
}

fn arity<const N: usize>(name: &str, args: Vec<CssNumericValue>) -> Result<[CssNumericValue; N]> {
    <[CssNumericValue; N]>::try_from(args).map_err(|args| wrong_arity_type(name, N, args.len()))
}

fn wrong_arity_type(name: &str, expected: usize, found: usize) -> crate::error::Error {
    let expected: &'static str = match expected {
        1 => "1",
        2 => "2",
        3 => "3",
        4 => "4",
        6 => "6",
        16 => "16",
        _ => "other",
    };
    TypeError::WrongArity {
        function: name.to_string(),
        expected,
        found,
    }
    .into()
}

fn wrong_arity(name: &str, expected: &'static str, found: usize) -> crate::error::Error {
    TypeError::WrongArity {
        function: name.to_string(),
        expected,
        found,
    }
    .into()
}

fn zero_px() -> CssNumericValue {
    CssUnitValue::new(0.0, Unit::Px)
        .expect("zero is finite")
        .into()
}

fn zero_deg() -> CssNumericValue {
    CssUnitValue::new(0.0, Unit::Deg)
        .expect("zero is finite")
        .into()
}

/// Accept unitless zero as a length, canonicalized to `0px`
fn length(value: CssNumericValue) -> CssNumericValue {
    match value.as_unit() {
        Some(unit) if unit.unit() == Unit::Number && unit.value() == 0.0 => zero_px(),
        _ => value,
    }
}

/// Accept unitless zero as an angle, canonicalized to `0deg`
fn angle(value: CssNumericValue) -> CssNumericValue {
    match value.as_unit() {
        Some(unit) if unit.unit() == Unit::Number && unit.value() == 0.0 => zero_deg(),
        _ => value,
    }
}

/// Require a plain unitless number and return its value
fn number(name: &str, value: CssNumericValue) -> Result<f64> {
    match value.as_unit() {
        Some(unit) if unit.unit() == Unit::Number => Ok(unit.value()),
        _ => Err(TypeError::NotNumeric {
            what: format!("argument of {name}() (expected a plain number)"),
        }
        .into()),
    }
}
