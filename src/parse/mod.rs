//! Property-aware value parsing
//!
//! [`parse`] dispatches `transform` to the transform-function parser and
//! everything else to the math expression parser, then applies the
//! strict/lenient fallback policy: a grammar failure on a lenient
//! property degrades to a verbatim [`CssUnparsedValue`], while the
//! strict properties (sizing, positioning, the individual transform
//! properties) re-raise unless the text contains `var(`, whose presence
//! legitimately defeats any grammar. Type and range errors always
//! surface; they mean the value is wrong, not merely untyped.

mod expr;
mod lexer;
mod transform;

pub(crate) use expr::parse_numeric_text;

use crate::error::{Error, ParseError, Result};
use crate::value::{CssStyleValue, CssUnparsedValue};

/// Properties whose values must parse to a typed tree
const STRICT_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "min-width",
    "min-height",
    "max-width",
    "max-height",
    "top",
    "left",
    "right",
    "bottom",
    "margin",
    "padding",
    "font-size",
    "transform",
    "rotate",
    "scale",
    "translate",
    "opacity",
    "z-index",
    "flex-grow",
    "flex-shrink",
    "order",
];

fn is_strict(property: &str) -> bool {
    STRICT_PROPERTIES
        .iter()
        .any(|strict| strict.eq_ignore_ascii_case(property))
}

/// Parse one value for `property`
pub fn parse(property: &str, text: &str) -> Result<CssStyleValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput.into());
    }
    let result = if property.eq_ignore_ascii_case("transform") {
        transform::parse_transform_list(trimmed).map(CssStyleValue::Transform)
    } else {
        expr::parse_standalone(trimmed)
    };
    match result {
        Ok(value) => Ok(value),
        Err(error) => fallback(property, trimmed, error),
    }
}

/// Parse a comma-separated value list for `property`
///
/// Commas inside balanced parentheses and string literals do not split.
pub fn parse_all(property: &str, text: &str) -> Result<Vec<CssStyleValue>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput.into());
    }
    split_top_level_commas(trimmed)
        .into_iter()
        .map(|segment| parse(property, segment))
        .collect()
}

/// Grammar failures degrade to unparsed text unless the property is
/// strict and `var(` cannot excuse them
fn fallback(property: &str, text: &str, error: Error) -> Result<CssStyleValue> {
    if !matches!(error, Error::Parse(_)) {
        return Err(error);
    }
    if is_strict(property) && !text.contains("var(") {
        return Err(error);
    }
    Ok(CssStyleValue::Unparsed(CssUnparsedValue::from_text(text)))
}

/// Split at top-level commas, ignoring commas nested in parentheses or
/// quoted strings
pub(crate) fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut start = 0usize;
    for (index, byte) in text.bytes().enumerate() {
        if let Some(active) = quote {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == active {
                quote = None;
            }
            continue;
        }
        match byte {
            b'"' | b'\'' => quote = Some(byte),
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                segments.push(text[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    segments.push(text[start..].trim());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;
    use crate::value::{CssNumericValue, CssUnitValue};

    fn px(v: f64) -> CssStyleValue {
        CssStyleValue::Numeric(CssUnitValue::new(v, Unit::Px).unwrap().into())
    }

    #[test]
    fn test_parse_folds_math() {
        assert_eq!(parse("width", "calc(10px + 5px)").unwrap(), px(15.0));
        assert_eq!(parse("width", "calc(10px * 2)").unwrap(), px(20.0));
    }

    #[test]
    fn test_parse_keyword() {
        let value = parse("display", "block").unwrap();
        assert!(matches!(value, CssStyleValue::Keyword(k) if k.value() == "block"));
    }

    #[test]
    fn test_lenient_property_degrades_to_unparsed() {
        let value = parse("background", "url(image.png)").unwrap();
        assert!(matches!(value, CssStyleValue::Unparsed(u) if u.to_string() == "url(image.png)"));
    }

    #[test]
    fn test_strict_property_re_raises() {
        assert!(parse("width", "url(image.png)").is_err());
        assert!(parse("width", "10px 20px").is_err());
    }

    #[test]
    fn test_strict_property_masked_by_var() {
        let value = parse("width", "special(var(--x))").unwrap();
        assert!(matches!(value, CssStyleValue::Unparsed(_)));
    }

    #[test]
    fn test_type_errors_always_surface() {
        // Not a grammar problem, so leniency does not apply.
        assert!(parse("background", "calc(1px + 1s)").is_err());
        assert!(parse("background", "calc(1 / 0)").is_err());
    }

    #[test]
    fn test_transform_dispatch() {
        let value = parse("transform", "rotate(45deg)").unwrap();
        assert!(matches!(value, CssStyleValue::Transform(_)));
        assert!(parse("transform", "spin(45deg)").is_err());
        let masked = parse("transform", "spin(var(--a))").unwrap();
        assert!(matches!(masked, CssStyleValue::Unparsed(_)));
    }

    #[test]
    fn test_bare_var_parses_as_reference() {
        let value = parse("width", "var(--w, 100px)").unwrap();
        let CssStyleValue::Numeric(CssNumericValue::Variable(var)) = value else {
            panic!("expected a variable reference");
        };
        assert_eq!(var.variable(), "--w");
        assert_eq!(var.fallback().unwrap().to_string(), "100px");
    }

    #[test]
    fn test_empty_input_always_fails() {
        assert!(parse("width", "   ").is_err());
        assert!(parse("background", "").is_err());
    }

    #[test]
    fn test_parse_all_splits_top_level_commas() {
        let values = parse_all("font-family", "\"Arial\", sans-serif").unwrap();
        assert_eq!(values.len(), 2);
        assert!(matches!(&values[0], CssStyleValue::Unparsed(u) if u.to_string() == "\"Arial\""));
        assert!(matches!(&values[1], CssStyleValue::Keyword(k) if k.value() == "sans-serif"));
    }

    #[test]
    fn test_split_ignores_nested_commas() {
        assert_eq!(
            split_top_level_commas("translate(1px, 2px), rotate(3deg)"),
            vec!["translate(1px, 2px)", "rotate(3deg)"]
        );
        assert_eq!(
            split_top_level_commas("\"a,b\", c"),
            vec!["\"a,b\"", "c"]
        );
        assert_eq!(
            split_top_level_commas("'don\\'t, stop', go"),
            vec!["'don\\'t, stop'", "go"]
        );
    }

    #[test]
    fn test_parse_all_single_value() {
        let values = parse_all("width", "calc(1px + 2px)").unwrap();
        assert_eq!(values, vec![px(3.0)]);
    }
}
