//! Recursive-descent parser for the math sublanguage and `var()`
//!
//! Grammar (ECMA-style precedence, left associative):
//!
//! ```text
//! expr    := term (('+'|'-') term)*
//! term    := unary (('*'|'/') unary)*
//! unary   := '-' unary | '+' unary | factor
//! factor  := NUM | DIM | '(' expr ')' | FUNC args ')' | IDENT
//! ```
//!
//! Every arithmetic node is built through the simplifier, so folding
//! happens during the parse and the finished tree is already normalized.

use super::lexer::{Lexer, Token};
use crate::error::{ParseError, Result, TypeError};
use crate::simplify;
use crate::value::{
    CssKeywordValue, CssNumericValue, CssStyleValue, CssUnitValue, CssUnparsedValue,
    CssVariableReferenceValue,
};

/// Parenthesis/function nesting ceiling; adversarial inputs fail instead
/// of exhausting the stack
pub(crate) const MAX_NESTING_DEPTH: usize = 1024;

/// A parsed leaf or expression; keywords are only valid as a whole value
enum Operand {
    Numeric(CssNumericValue),
    Keyword(CssKeywordValue),
}

impl Operand {
    fn numeric(self) -> Result<CssNumericValue> {
        match self {
            Operand::Numeric(value) => Ok(value),
            Operand::Keyword(keyword) => Err(TypeError::NotNumeric {
                what: format!("keyword '{}'", keyword.value()),
            }
            .into()),
        }
    }
}

/// Parse a complete value text: a math expression, variable reference, or
/// a single keyword
pub(crate) fn parse_standalone(text: &str) -> Result<CssStyleValue> {
    let mut lexer = Lexer::new(text);
    let operand = expr(&mut lexer, 0)?;
    expect_eof(&mut lexer)?;
    Ok(match operand {
        Operand::Numeric(numeric) => CssStyleValue::Numeric(numeric),
        Operand::Keyword(keyword) => CssStyleValue::Keyword(keyword),
    })
}

/// Parse a complete value text that must be numeric
pub(crate) fn parse_numeric_text(text: &str) -> Result<CssNumericValue> {
    let mut lexer = Lexer::new(text);
    let value = expression(&mut lexer, 0)?;
    expect_eof(&mut lexer)?;
    Ok(value)
}

/// Parse one numeric expression from an ongoing token stream (used for
/// function arguments, including the transform vocabulary)
pub(crate) fn expression(lexer: &mut Lexer<'_>, depth: usize) -> Result<CssNumericValue> {
    expr(lexer, depth)?.numeric()
}

fn expect_eof(lexer: &mut Lexer<'_>) -> Result<()> {
    if *lexer.peek()? != Token::Eof {
        return Err(ParseError::TrailingInput {
            position: lexer.offset(),
        }
        .into());
    }
    Ok(())
}

fn expr(lexer: &mut Lexer<'_>, depth: usize) -> Result<Operand> {
    let mut left = term(lexer, depth)?;
    loop {
        match lexer.peek()? {
            Token::Plus => {
                lexer.next()?;
                let right = term(lexer, depth)?.numeric()?;
                left = Operand::Numeric(simplify::sum(vec![left.numeric()?, right])?);
            }
            Token::Minus => {
                lexer.next()?;
                let right = term(lexer, depth)?.numeric()?;
                let negated = simplify::negate(right)?;
                left = Operand::Numeric(simplify::sum(vec![left.numeric()?, negated])?);
            }
            _ => return Ok(left),
        }
    }
}

fn term(lexer: &mut Lexer<'_>, depth: usize) -> Result<Operand> {
    let mut left = unary(lexer, depth)?;
    loop {
        match lexer.peek()? {
            Token::Star => {
                lexer.next()?;
                let right = unary(lexer, depth)?.numeric()?;
                left = Operand::Numeric(simplify::product(vec![left.numeric()?, right])?);
            }
            Token::Slash => {
                lexer.next()?;
                let right = unary(lexer, depth)?.numeric()?;
                let inverted = simplify::invert(right)?;
                left = Operand::Numeric(simplify::product(vec![left.numeric()?, inverted])?);
            }
            _ => return Ok(left),
        }
    }
}

fn unary(lexer: &mut Lexer<'_>, depth: usize) -> Result<Operand> {
    match lexer.peek()? {
        Token::Minus => {
            lexer.next()?;
            let operand = unary(lexer, depth)?.numeric()?;
            Ok(Operand::Numeric(simplify::negate(operand)?))
        }
        Token::Plus => {
            lexer.next()?;
            let operand = unary(lexer, depth)?.numeric()?;
            Ok(Operand::Numeric(operand))
        }
        _ => factor(lexer, depth),
    }
}

fn factor(lexer: &mut Lexer<'_>, depth: usize) -> Result<Operand> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        }
        .into());
    }
    let position = lexer.offset();
    match lexer.next()? {
        Token::Number(value) => Ok(Operand::Numeric(CssUnitValue::number(value)?.into())),
        Token::Dimension { value, unit } => {
            Ok(Operand::Numeric(CssUnitValue::new(value, unit)?.into()))
        }
        Token::Open => {
            let inner = expression(lexer, depth + 1)?;
            expect_close(lexer)?;
            Ok(Operand::Numeric(inner))
        }
        Token::Function(name) => Ok(Operand::Numeric(function(lexer, &name, depth + 1)?)),
        Token::Ident(name) => Ok(Operand::Keyword(CssKeywordValue::new(name)?)),
        Token::Eof => Err(ParseError::UnexpectedEof.into()),
        other => Err(ParseError::UnexpectedToken {
            found: other.describe(),
            position,
        }
        .into()),
    }
}

fn function(lexer: &mut Lexer<'_>, name: &str, depth: usize) -> Result<CssNumericValue> {
    match name {
        "calc" => {
            let args = arguments(lexer, depth)?;
            let [value] = <[CssNumericValue; 1]>::try_from(args).map_err(|args| {
                TypeError::WrongArity {
                    function: "calc".to_string(),
                    expected: "1",
                    found: args.len(),
                }
            })?;
            Ok(value)
        }
        "min" => simplify::min(arguments(lexer, depth)?),
        "max" => simplify::max(arguments(lexer, depth)?),
        "clamp" => {
            let args = arguments(lexer, depth)?;
            let [lower, center, upper] =
                <[CssNumericValue; 3]>::try_from(args).map_err(|args| TypeError::WrongArity {
                    function: "clamp".to_string(),
                    expected: "3",
                    found: args.len(),
                })?;
            simplify::clamp(lower, center, upper)
        }
        "var" => var_reference(lexer),
        _ => Err(ParseError::UnknownFunction {
            name: name.to_string(),
        }
        .into()),
    }
}

/// Comma-separated expressions up to the closing parenthesis, which is
/// consumed
fn arguments(lexer: &mut Lexer<'_>, depth: usize) -> Result<Vec<CssNumericValue>> {
    let mut args = vec![expression(lexer, depth)?];
    loop {
        let position = lexer.offset();
        match lexer.next()? {
            Token::Comma => args.push(expression(lexer, depth)?),
            Token::Close => return Ok(args),
            Token::Eof => {
                return Err(ParseError::UnmatchedParen { position }.into());
            }
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

/// `var( --name [, raw-fallback] )`; the fallback is captured verbatim
fn var_reference(lexer: &mut Lexer<'_>) -> Result<CssNumericValue> {
    let position = lexer.offset();
    let name = match lexer.next()? {
        Token::Ident(name) if name.starts_with("--") => name,
        other => {
            return Err(ParseError::UnexpectedToken {
                found: other.describe(),
                position,
            }
            .into())
        }
    };
    let position = lexer.offset();
    match lexer.next()? {
        Token::Close => Ok(CssNumericValue::Variable(CssVariableReferenceValue::new(
            name, None,
        )?)),
        Token::Comma => {
            let raw = lexer.take_raw_fallback()?;
            let fallback = CssUnparsedValue::from_text(raw);
            Ok(CssNumericValue::Variable(CssVariableReferenceValue::new(
                name,
                Some(fallback),
            )?))
        }
        Token::Eof => Err(ParseError::UnmatchedParen { position }.into()),
        other => Err(ParseError::UnexpectedToken {
            found: other.describe(),
            position,
        }
        .into()),
    }
}

fn expect_close(lexer: &mut Lexer<'_>) -> Result<()> {
    let position = lexer.offset();
    match lexer.next()? {
        Token::Close => Ok(()),
        Token::Eof => Err(ParseError::UnmatchedParen { position }.into()),
        other => Err(ParseError::UnexpectedToken {
            found: other.describe(),
            position,
        }
        .into()),
    }
}
