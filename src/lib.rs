pub mod error;
pub mod host;
pub mod install;
pub mod map;
pub mod parse;
pub mod units;
pub mod value;

mod simplify;

pub use error::{Error, ParseError, RangeError, Result, TypeError};
pub use host::{HostMatrix, InlineStyle, InlineStyleData};
pub use install::{css, install, unit_factory, HostGlobal, StyleMapRegistry, UnitFactory};
pub use map::StylePropertyMap;
pub use parse::{parse, parse_all};
pub use units::{NumericType, Unit, UnitCategory};
pub use value::{
    CssKeywordValue, CssMathClamp, CssMathInvert, CssMathMax, CssMathMin, CssMathNegate,
    CssMathProduct, CssMathSum, CssMatrixComponent, CssNumericValue, CssPerspective, CssRotate,
    CssScale, CssSkew, CssSkewX, CssSkewY, CssStyleValue, CssTransformValue, CssTranslate,
    CssUnitValue, CssUnparsedValue, CssVariableReferenceValue, MatrixEntries, TransformComponent,
    UnparsedMember,
};
