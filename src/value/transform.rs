//! Transform component values
//!
//! A `transform` property value parses into a [`CssTransformValue`]: an
//! ordered list of transform components, each knowing whether it stays in
//! the 2-D plane and how to serialize itself back to its CSS function.
//! Matrix math is delegated to a host-provided type via [`HostMatrix`];
//! this crate never computes a transform matrix itself.

use super::serialize::write_number;
use super::CssNumericValue;
use crate::error::{Error, Result, TypeError};
use crate::host::HostMatrix;
use std::fmt;

/// One function in a transform list
#[derive(Debug, Clone, PartialEq)]
pub enum TransformComponent {
    Translate(CssTranslate),
    Rotate(CssRotate),
    Scale(CssScale),
    Skew(CssSkew),
    SkewX(CssSkewX),
    SkewY(CssSkewY),
    Perspective(CssPerspective),
    Matrix(CssMatrixComponent),
}

impl TransformComponent {
    /// Whether this component keeps the transform in the 2-D plane
    pub fn is_2d(&self) -> bool {
        match self {
            TransformComponent::Translate(t) => t.is_2d(),
            TransformComponent::Rotate(r) => r.is_2d(),
            TransformComponent::Scale(s) => s.is_2d(),
            TransformComponent::Skew(_)
            | TransformComponent::SkewX(_)
            | TransformComponent::SkewY(_) => true,
            TransformComponent::Perspective(_) => false,
            TransformComponent::Matrix(m) => m.is_2d(),
        }
    }
}

/// `translate(x, y)` / `translate3d(x, y, z)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssTranslate {
    pub(crate) x: CssNumericValue,
    pub(crate) y: CssNumericValue,
    pub(crate) z: Option<CssNumericValue>,
}

impl CssTranslate {
    /// 2-D translation; `x` and `y` are lengths or percentages
    pub fn new(x: CssNumericValue, y: CssNumericValue) -> Result<CssTranslate> {
        expect_length_or_percent(&x)?;
        expect_length_or_percent(&y)?;
        Ok(CssTranslate { x, y, z: None })
    }

    /// 3-D translation; `z` must be a length (percentages have no meaning
    /// on the z axis)
    pub fn new_3d(
        x: CssNumericValue,
        y: CssNumericValue,
        z: CssNumericValue,
    ) -> Result<CssTranslate> {
        expect_length_or_percent(&x)?;
        expect_length_or_percent(&y)?;
        expect_length(&z)?;
        Ok(CssTranslate { x, y, z: Some(z) })
    }

    pub fn x(&self) -> &CssNumericValue {
        &self.x
    }

    pub fn y(&self) -> &CssNumericValue {
        &self.y
    }

    pub fn z(&self) -> Option<&CssNumericValue> {
        self.z.as_ref()
    }

    pub fn is_2d(&self) -> bool {
        self.z.is_none()
    }
}

/// `rotate(angle)` / `rotate3d(x, y, z, angle)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssRotate {
    pub(crate) axis: Option<(f64, f64, f64)>,
    pub(crate) angle: CssNumericValue,
}

impl CssRotate {
    /// 2-D rotation about the origin
    pub fn new(angle: CssNumericValue) -> Result<CssRotate> {
        expect_angle(&angle)?;
        Ok(CssRotate { axis: None, angle })
    }

    /// 3-D rotation about the `(x, y, z)` axis
    pub fn new_3d(x: f64, y: f64, z: f64, angle: CssNumericValue) -> Result<CssRotate> {
        expect_angle(&angle)?;
        Ok(CssRotate {
            axis: Some((x, y, z)),
            angle,
        })
    }

    pub fn angle(&self) -> &CssNumericValue {
        &self.angle
    }

    pub fn axis(&self) -> Option<(f64, f64, f64)> {
        self.axis
    }

    pub fn is_2d(&self) -> bool {
        self.axis.is_none()
    }
}

/// `scale(x, y)` / `scale3d(x, y, z)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssScale {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: Option<f64>,
}

impl CssScale {
    pub fn new(x: f64, y: f64) -> CssScale {
        CssScale { x, y, z: None }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> CssScale {
        CssScale { x, y, z: Some(z) }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> Option<f64> {
        self.z
    }

    pub fn is_2d(&self) -> bool {
        self.z.is_none()
    }
}

/// `skew(ax, ay)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssSkew {
    pub(crate) ax: CssNumericValue,
    pub(crate) ay: CssNumericValue,
}

impl CssSkew {
    pub fn new(ax: CssNumericValue, ay: CssNumericValue) -> Result<CssSkew> {
        expect_angle(&ax)?;
        expect_angle(&ay)?;
        Ok(CssSkew { ax, ay })
    }

    pub fn ax(&self) -> &CssNumericValue {
        &self.ax
    }

    pub fn ay(&self) -> &CssNumericValue {
        &self.ay
    }
}

/// `skewX(angle)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssSkewX {
    pub(crate) angle: CssNumericValue,
}

impl CssSkewX {
    pub fn new(angle: CssNumericValue) -> Result<CssSkewX> {
        expect_angle(&angle)?;
        Ok(CssSkewX { angle })
    }

    pub fn angle(&self) -> &CssNumericValue {
        &self.angle
    }
}

/// `skewY(angle)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssSkewY {
    pub(crate) angle: CssNumericValue,
}

impl CssSkewY {
    pub fn new(angle: CssNumericValue) -> Result<CssSkewY> {
        expect_angle(&angle)?;
        Ok(CssSkewY { angle })
    }

    pub fn angle(&self) -> &CssNumericValue {
        &self.angle
    }
}

/// `perspective(length)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssPerspective {
    pub(crate) length: CssNumericValue,
}

impl CssPerspective {
    pub fn new(length: CssNumericValue) -> Result<CssPerspective> {
        expect_length(&length)?;
        Ok(CssPerspective { length })
    }

    pub fn length(&self) -> &CssNumericValue {
        &self.length
    }
}

/// Raw matrix entries: `matrix(…)` with 6, `matrix3d(…)` with 16
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixEntries {
    TwoD([f64; 6]),
    ThreeD([f64; 16]),
}

/// `matrix(a, b, c, d, e, f)` / `matrix3d(…)`
#[derive(Debug, Clone, PartialEq)]
pub struct CssMatrixComponent {
    pub(crate) entries: MatrixEntries,
}

impl CssMatrixComponent {
    pub fn new(entries: MatrixEntries) -> CssMatrixComponent {
        CssMatrixComponent { entries }
    }

    pub fn entries(&self) -> &MatrixEntries {
        &self.entries
    }

    pub fn is_2d(&self) -> bool {
        matches!(self.entries, MatrixEntries::TwoD(_))
    }
}

/// An ordered transform function list
#[derive(Debug, Clone, PartialEq)]
pub struct CssTransformValue {
    components: Vec<TransformComponent>,
}

impl CssTransformValue {
    /// Wrap a non-empty component list
    pub fn new(components: Vec<TransformComponent>) -> Result<CssTransformValue> {
        if components.is_empty() {
            return Err(TypeError::WrongArity {
                function: "transform".to_string(),
                expected: "at least 1",
                found: 0,
            }
            .into());
        }
        Ok(CssTransformValue { components })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TransformComponent> {
        self.components.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransformComponent> {
        self.components.iter()
    }

    /// True when every component stays in the 2-D plane
    pub fn is_2d(&self) -> bool {
        self.components.iter().all(TransformComponent::is_2d)
    }

    /// Fold the list into a host matrix: identity multiplied by each
    /// component's own matrix, in order
    pub fn to_matrix<M: HostMatrix>(&self) -> Result<M> {
        let mut matrix = M::identity();
        for component in &self.components {
            let step = M::from_transform(&component.to_string())
                .map_err(|message| Error::HostMatrix { message })?;
            matrix = matrix.multiply(&step);
        }
        Ok(matrix)
    }
}

impl std::ops::Index<usize> for CssTransformValue {
    type Output = TransformComponent;

    fn index(&self, index: usize) -> &TransformComponent {
        &self.components[index]
    }
}

impl<'a> IntoIterator for &'a CssTransformValue {
    type Item = &'a TransformComponent;
    type IntoIter = std::slice::Iter<'a, TransformComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

fn expect_length_or_percent(value: &CssNumericValue) -> Result<()> {
    if value.type_is_indeterminate() {
        return Ok(());
    }
    let ty = value.numeric_type()?;
    let dimensionless_slots = ty.angle == 0
        && ty.time == 0
        && ty.frequency == 0
        && ty.resolution == 0
        && ty.flex == 0;
    let ok = dimensionless_slots
        && !ty.is_number()
        && (0..=1).contains(&ty.length)
        && (0..=1).contains(&ty.percent);
    if ok {
        Ok(())
    } else {
        Err(TypeError::NotNumeric {
            what: format!("'{value}' (expected a length or percentage)"),
        }
        .into())
    }
}

fn expect_length(value: &CssNumericValue) -> Result<()> {
    if value.type_is_indeterminate() {
        return Ok(());
    }
    let ty = value.numeric_type()?;
    if ty == crate::units::NumericType::of(crate::units::Unit::Px) {
        Ok(())
    } else {
        Err(TypeError::NotNumeric {
            what: format!("'{value}' (expected a length)"),
        }
        .into())
    }
}

fn expect_angle(value: &CssNumericValue) -> Result<()> {
    if value.type_is_indeterminate() {
        return Ok(());
    }
    let ty = value.numeric_type()?;
    if ty == crate::units::NumericType::of(crate::units::Unit::Deg) {
        Ok(())
    } else {
        Err(TypeError::NotNumeric {
            what: format!("'{value}' (expected an angle)"),
        }
        .into())
    }
}

impl fmt::Display for TransformComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformComponent::Translate(t) => write!(f, "{}", t),
            TransformComponent::Rotate(r) => write!(f, "{}", r),
            TransformComponent::Scale(s) => write!(f, "{}", s),
            TransformComponent::Skew(s) => write!(f, "{}", s),
            TransformComponent::SkewX(s) => write!(f, "{}", s),
            TransformComponent::SkewY(s) => write!(f, "{}", s),
            TransformComponent::Perspective(p) => write!(f, "{}", p),
            TransformComponent::Matrix(m) => write!(f, "{}", m),
        }
    }
}

impl fmt::Display for CssTranslate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.z {
            Some(z) => write!(f, "translate3d({}, {}, {})", self.x, self.y, z),
            None => write!(f, "translate({}, {})", self.x, self.y),
        }
    }
}

impl fmt::Display for CssRotate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axis {
            Some((x, y, z)) => {
                f.write_str("rotate3d(")?;
                write_number(f, x)?;
                f.write_str(", ")?;
                write_number(f, y)?;
                f.write_str(", ")?;
                write_number(f, z)?;
                write!(f, ", {})", self.angle)
            }
            None => write!(f, "rotate({})", self.angle),
        }
    }
}

impl fmt::Display for CssScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => {
                f.write_str("scale3d(")?;
                write_number(f, self.x)?;
                f.write_str(", ")?;
                write_number(f, self.y)?;
                f.write_str(", ")?;
                write_number(f, z)?;
                f.write_str(")")
            }
            None => {
                f.write_str("scale(")?;
                write_number(f, self.x)?;
                f.write_str(", ")?;
                write_number(f, self.y)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for CssSkew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skew({}, {})", self.ax, self.ay)
    }
}

impl fmt::Display for CssSkewX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skewX({})", self.angle)
    }
}

impl fmt::Display for CssSkewY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skewY({})", self.angle)
    }
}

impl fmt::Display for CssPerspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "perspective({})", self.length)
    }
}

impl fmt::Display for CssMatrixComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: &[f64] = match &self.entries {
            MatrixEntries::TwoD(entries) => entries,
            MatrixEntries::ThreeD(entries) => entries,
        };
        if self.is_2d() {
            f.write_str("matrix(")?;
        } else {
            f.write_str("matrix3d(")?;
        }
        for (index, entry) in entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write_number(f, *entry)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for CssTransformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.components.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}
