//! CSS unit table and dimension types
//!
//! Units are grouped into the base dimension categories used by the value
//! grammar: length, angle, time, frequency, resolution, flex, and percent.
//! A numeric value's *dimension type* is an integer exponent vector over
//! those categories; the all-zero vector is a dimensionless number.
//!
//! Reference: CSS Values and Units Module Level 4
//! <https://www.w3.org/TR/css-values-4/>

use crate::error::TypeError;
use std::fmt;

/// Canonical CSS units accepted by the value parser
///
/// # Examples
///
/// ```
/// use css_typed_om::units::{Unit, UnitCategory};
///
/// assert_eq!(Unit::parse("PX"), Some(Unit::Px));
/// assert_eq!(Unit::parse("%"), Some(Unit::Percent));
/// assert_eq!(Unit::Px.category(), UnitCategory::Length);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Dimensionless number (empty unit)
    Number,

    /// Percentage (%)
    Percent,

    // Lengths
    /// Pixels (px) - CSS reference unit, 1/96th of an inch
    Px,
    /// Centimeters (cm)
    Cm,
    /// Millimeters (mm)
    Mm,
    /// Quarter-millimeters (q)
    Q,
    /// Inches (in)
    In,
    /// Points (pt) - 1/72nd of an inch
    Pt,
    /// Picas (pc) - 12 points
    Pc,
    /// Em units - relative to element's font size
    Em,
    /// Rem units - relative to root element's font size
    Rem,
    /// Ex units - relative to x-height of the font
    Ex,
    /// Ch units - relative to width of '0' character
    Ch,
    /// Viewport width percentage (vw)
    Vw,
    /// Viewport height percentage (vh)
    Vh,
    /// Viewport minimum (vmin)
    Vmin,
    /// Viewport maximum (vmax)
    Vmax,
    /// Viewport inline-axis percentage (vi)
    Vi,
    /// Viewport block-axis percentage (vb)
    Vb,

    // Angles
    /// Degrees (deg)
    Deg,
    /// Radians (rad)
    Rad,
    /// Gradians (grad) - 400 per full turn
    Grad,
    /// Turns (turn)
    Turn,

    // Times
    /// Seconds (s)
    S,
    /// Milliseconds (ms)
    Ms,

    // Frequencies
    /// Hertz (hz)
    Hz,
    /// Kilohertz (khz)
    Khz,

    // Resolutions
    /// Dots per inch (dpi)
    Dpi,
    /// Dots per centimeter (dpcm)
    Dpcm,
    /// Dots per px unit (dppx)
    Dppx,

    // Flex
    /// Flexible grid track fraction (fr)
    Fr,
}

/// Base dimension category of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    Number,
    Percent,
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
    Flex,
}

impl Unit {
    /// Every unit in the table, in serialization order
    pub const ALL: [Unit; 31] = [
        Unit::Number,
        Unit::Percent,
        Unit::Px,
        Unit::Cm,
        Unit::Mm,
        Unit::Q,
        Unit::In,
        Unit::Pt,
        Unit::Pc,
        Unit::Em,
        Unit::Rem,
        Unit::Ex,
        Unit::Ch,
        Unit::Vw,
        Unit::Vh,
        Unit::Vmin,
        Unit::Vmax,
        Unit::Vi,
        Unit::Vb,
        Unit::Deg,
        Unit::Rad,
        Unit::Grad,
        Unit::Turn,
        Unit::S,
        Unit::Ms,
        Unit::Hz,
        Unit::Khz,
        Unit::Dpi,
        Unit::Dpcm,
        Unit::Dppx,
        Unit::Fr,
    ];

    /// Look up a unit token, case-insensitively
    ///
    /// `"%"` resolves to [`Unit::Percent`] and the empty string to
    /// [`Unit::Number`]; everything else must be a known unit token.
    pub fn parse(token: &str) -> Option<Unit> {
        if token == "%" {
            return Some(Unit::Percent);
        }
        if token.is_empty() {
            return Some(Unit::Number);
        }
        Unit::ALL
            .iter()
            .copied()
            .find(|u| u.canonical_token().eq_ignore_ascii_case(token))
    }

    /// Like [`Unit::parse`] but fails with a typed error
    pub fn parse_or_err(token: &str) -> Result<Unit, TypeError> {
        Unit::parse(token).ok_or_else(|| TypeError::UnknownUnit {
            unit: token.to_string(),
        })
    }

    /// The canonical lowercase token (`"percent"` for `%`, `"number"` for the
    /// empty unit); this is also the factory name installed on the host
    pub fn canonical_token(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Percent => "percent",
            Self::Px => "px",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Q => "q",
            Self::In => "in",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Ex => "ex",
            Self::Ch => "ch",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
            Self::Vi => "vi",
            Self::Vb => "vb",
            Self::Deg => "deg",
            Self::Rad => "rad",
            Self::Grad => "grad",
            Self::Turn => "turn",
            Self::S => "s",
            Self::Ms => "ms",
            Self::Hz => "hz",
            Self::Khz => "khz",
            Self::Dpi => "dpi",
            Self::Dpcm => "dpcm",
            Self::Dppx => "dppx",
            Self::Fr => "fr",
        }
    }

    /// The token as it appears in serialized CSS (`%` for percent, empty for
    /// number)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "",
            Self::Percent => "%",
            other => other.canonical_token(),
        }
    }

    /// The base dimension category of this unit
    pub fn category(self) -> UnitCategory {
        match self {
            Self::Number => UnitCategory::Number,
            Self::Percent => UnitCategory::Percent,
            Self::Px
            | Self::Cm
            | Self::Mm
            | Self::Q
            | Self::In
            | Self::Pt
            | Self::Pc
            | Self::Em
            | Self::Rem
            | Self::Ex
            | Self::Ch
            | Self::Vw
            | Self::Vh
            | Self::Vmin
            | Self::Vmax
            | Self::Vi
            | Self::Vb => UnitCategory::Length,
            Self::Deg | Self::Rad | Self::Grad | Self::Turn => UnitCategory::Angle,
            Self::S | Self::Ms => UnitCategory::Time,
            Self::Hz | Self::Khz => UnitCategory::Frequency,
            Self::Dpi | Self::Dpcm | Self::Dppx => UnitCategory::Resolution,
            Self::Fr => UnitCategory::Flex,
        }
    }

    /// Fixed ratio to the canonical unit of this unit's category (px, deg,
    /// s, hz, dppx), for units with a context-free conversion
    ///
    /// Relative lengths, percent, and flex have no fixed ratio and return
    /// `None`; they require layout context this library never consults.
    pub fn conversion_ratio(self) -> Option<f64> {
        match self {
            Self::Number => Some(1.0),
            Self::Px => Some(1.0),
            Self::Cm => Some(96.0 / 2.54),
            Self::Mm => Some(96.0 / 25.4),
            Self::Q => Some(96.0 / 101.6),
            Self::In => Some(96.0),
            Self::Pt => Some(96.0 / 72.0),
            Self::Pc => Some(16.0),
            Self::Deg => Some(1.0),
            Self::Rad => Some(180.0 / std::f64::consts::PI),
            Self::Grad => Some(0.9),
            Self::Turn => Some(360.0),
            Self::S => Some(1.0),
            Self::Ms => Some(0.001),
            Self::Hz => Some(1.0),
            Self::Khz => Some(1000.0),
            Self::Dppx => Some(1.0),
            Self::Dpi => Some(1.0 / 96.0),
            Self::Dpcm => Some(2.54 / 96.0),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer exponent vector over the base dimensions
///
/// The all-zero vector is a dimensionless number. A plain `10px` has
/// `length = 1`; `calc(100% - 20px)` reports both `length = 1` and
/// `percent = 1` under the permissive additive rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericType {
    pub length: i32,
    pub angle: i32,
    pub time: i32,
    pub frequency: i32,
    pub resolution: i32,
    pub flex: i32,
    pub percent: i32,
}

impl NumericType {
    /// The zero vector (dimensionless number)
    pub const NUMBER: NumericType = NumericType {
        length: 0,
        angle: 0,
        time: 0,
        frequency: 0,
        resolution: 0,
        flex: 0,
        percent: 0,
    };

    /// The dimension type of a single unit: the zero vector for `number`,
    /// otherwise exactly one slot set to 1
    pub fn of(unit: Unit) -> NumericType {
        let mut ty = NumericType::NUMBER;
        match unit.category() {
            UnitCategory::Number => {}
            UnitCategory::Length => ty.length = 1,
            UnitCategory::Angle => ty.angle = 1,
            UnitCategory::Time => ty.time = 1,
            UnitCategory::Frequency => ty.frequency = 1,
            UnitCategory::Resolution => ty.resolution = 1,
            UnitCategory::Flex => ty.flex = 1,
            UnitCategory::Percent => ty.percent = 1,
        }
        ty
    }

    fn slots(&self) -> [i32; 7] {
        [
            self.length,
            self.angle,
            self.time,
            self.frequency,
            self.resolution,
            self.flex,
            self.percent,
        ]
    }

    /// True for the all-zero vector
    pub fn is_number(&self) -> bool {
        self.slots() == [0; 7]
    }

    /// Merge two types in an additive context (`+`, `-`, `min`, `max`)
    ///
    /// Equal vectors merge to themselves. Vectors that differ only in the
    /// `length` and `percent` slots, with each of those slots 0 or 1 on
    /// both sides, merge to the slot-wise union: length and percent mix
    /// freely. A dimensionless number never merges with a dimension.
    pub fn add(self, other: NumericType) -> Result<NumericType, TypeError> {
        if self == other {
            return Ok(self);
        }
        let incompatible = || TypeError::IncompatibleTypes {
            left: self,
            right: other,
        };
        if self.is_number() || other.is_number() {
            return Err(incompatible());
        }
        let same_elsewhere = self.angle == other.angle
            && self.time == other.time
            && self.frequency == other.frequency
            && self.resolution == other.resolution
            && self.flex == other.flex;
        let zero_or_one = |v: i32| v == 0 || v == 1;
        if same_elsewhere
            && zero_or_one(self.length)
            && zero_or_one(other.length)
            && zero_or_one(self.percent)
            && zero_or_one(other.percent)
        {
            let mut merged = self;
            merged.length = self.length.max(other.length);
            merged.percent = self.percent.max(other.percent);
            return Ok(merged);
        }
        Err(incompatible())
    }

    /// Combine two types in a multiplicative context: exponents add
    pub fn multiply(self, other: NumericType) -> NumericType {
        NumericType {
            length: self.length + other.length,
            angle: self.angle + other.angle,
            time: self.time + other.time,
            frequency: self.frequency + other.frequency,
            resolution: self.resolution + other.resolution,
            flex: self.flex + other.flex,
            percent: self.percent + other.percent,
        }
    }

    /// The type of the reciprocal: exponents negate
    pub fn invert(self) -> NumericType {
        NumericType {
            length: -self.length,
            angle: -self.angle,
            time: -self.time,
            frequency: -self.frequency,
            resolution: -self.resolution,
            flex: -self.flex,
            percent: -self.percent,
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_number() {
            return f.write_str("number");
        }
        let names = [
            ("length", self.length),
            ("angle", self.angle),
            ("time", self.time),
            ("frequency", self.frequency),
            ("resolution", self.resolution),
            ("flex", self.flex),
            ("percent", self.percent),
        ];
        let mut first = true;
        for (name, exponent) in names {
            if exponent == 0 {
                continue;
            }
            if !first {
                f.write_str("*")?;
            }
            first = false;
            if exponent == 1 {
                write!(f, "{}", name)?;
            } else {
                write!(f, "{}^{}", name, exponent)?;
            }
        }
        Ok(())
    }
}
