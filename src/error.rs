//! Error types for the typed object model.
//!
//! This module provides error types for all subsystems:
//! - Type errors (dimension mismatches, unknown units, non-finite values)
//! - Range errors (division by zero)
//! - Parse errors (value text that does not match the value grammar)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations.

use crate::units::NumericType;
use thiserror::Error;

/// Result type alias for typed-OM operations
///
/// # Examples
///
/// ```
/// use css_typed_om::Result;
///
/// fn parse_width(text: &str) -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
///
/// Each variant wraps a more specific error type for that subsystem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
  /// Dimension or kind mismatch in a numeric operation
  #[error("Type error: {0}")]
  Type(#[from] TypeError),

  /// Numeric value outside the operable range
  #[error("Range error: {0}")]
  Range(#[from] RangeError),

  /// Value text does not match the value grammar
  #[error("Parse error: {0}")]
  Parse(#[from] ParseError),

  /// A map mutation was called without any values
  #[error("Missing operand: '{operation}' requires at least one value")]
  MissingOperand { operation: String },

  /// The host style object behind a property map has been dropped
  #[error("Style object is no longer attached")]
  StyleDetached,

  /// The host matrix type rejected a serialized transform component
  #[error("Host matrix error: {message}")]
  HostMatrix { message: String },
}

/// Errors raised when operand kinds or dimension types do not line up
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
  /// Two operands cannot share an additive context
  #[error("incompatible types: {left} and {right}")]
  IncompatibleTypes { left: NumericType, right: NumericType },

  /// A non-numeric value reached an arithmetic operation
  #[error("{what} is not a numeric value")]
  NotNumeric { what: String },

  /// Unit token not present in the unit table
  #[error("unknown unit '{unit}'")]
  UnknownUnit { unit: String },

  /// NaN or infinity where a finite value is required
  #[error("value {value} is not finite")]
  NonFinite { value: f64 },

  /// Builtin function called with the wrong number of arguments
  #[error("{function}() expects {expected} argument(s), got {found}")]
  WrongArity {
    function: String,
    expected: &'static str,
    found: usize,
  },
}

/// Errors raised for values outside the operable range
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
  /// Division by a zero divisor
  #[error("division by zero")]
  DivisionByZero,

  /// Inversion of zero (`1 / 0`)
  #[error("cannot invert zero")]
  InversionOfZero,
}

/// Errors raised while lexing or parsing value text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
  /// Token that does not fit the grammar at this position
  #[error("unexpected '{found}' at offset {position}")]
  UnexpectedToken { found: String, position: usize },

  /// Input ended in the middle of a production
  #[error("unexpected end of input")]
  UnexpectedEof,

  /// A parenthesis was never closed
  #[error("unmatched parenthesis at offset {position}")]
  UnmatchedParen { position: usize },

  /// Numeric literal that cannot be represented as a finite value
  #[error("invalid number '{text}'")]
  InvalidNumber { text: String },

  /// Function name outside the math/var vocabulary
  #[error("unknown function '{name}'")]
  UnknownFunction { name: String },

  /// Well-formed expression followed by garbage
  #[error("trailing input at offset {position}")]
  TrailingInput { position: usize },

  /// Empty or whitespace-only value text
  #[error("empty value text")]
  EmptyInput,

  /// Parenthesis nesting beyond the recursion guard
  #[error("expression nesting exceeds {limit} levels")]
  NestingTooDeep { limit: usize },

  /// `var()` fallback text with unbalanced parentheses
  #[error("unbalanced parenthesis in var() fallback")]
  UnbalancedVarFallback,
}
