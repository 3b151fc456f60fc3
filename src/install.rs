//! Unit factories and host installation
//!
//! The factory functions in [`css`] are the `CSS.px(…)`-style unit
//! constructors. [`install`] offers them to a host global unless the host
//! already carries a native typed OM; [`StyleMapRegistry`] is the
//! `attributeStyleMap` accessor, memoizing one property map per host
//! style object and holding it weakly so dropped elements release their
//! maps.

use crate::error::Result;
use crate::host::InlineStyle;
use crate::map::StylePropertyMap;
use crate::value::CssUnitValue;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A unit value constructor as registered on a host global
pub type UnitFactory = fn(f64) -> Result<CssUnitValue>;

/// `CSS` namespace factories: one constructor per unit in the table
///
/// Every factory rejects non-finite input. The percent factory is named
/// `percent`, matching its canonical token rather than the `%` sign.
pub mod css {
    use super::UnitFactory;
    use crate::error::Result;
    use crate::units::Unit;
    use crate::value::CssUnitValue;

    macro_rules! unit_factories {
        ($(($name:ident, $token:literal, $unit:ident)),* $(,)?) => {
            $(
                #[doc = concat!("Construct a `", $token, "` value")]
                pub fn $name(value: f64) -> Result<CssUnitValue> {
                    CssUnitValue::new(value, Unit::$unit)
                }
            )*

            /// Canonical factory name to constructor, in table order
            pub(crate) const FACTORIES: &[(&str, UnitFactory)] = &[
                $(($token, $name as UnitFactory)),*
            ];
        };
    }

    unit_factories!(
        (number, "number", Number),
        (percent, "percent", Percent),
        (px, "px", Px),
        (cm, "cm", Cm),
        (mm, "mm", Mm),
        (q, "q", Q),
        (r#in, "in", In),
        (pt, "pt", Pt),
        (pc, "pc", Pc),
        (em, "em", Em),
        (rem, "rem", Rem),
        (ex, "ex", Ex),
        (ch, "ch", Ch),
        (vw, "vw", Vw),
        (vh, "vh", Vh),
        (vmin, "vmin", Vmin),
        (vmax, "vmax", Vmax),
        (vi, "vi", Vi),
        (vb, "vb", Vb),
        (deg, "deg", Deg),
        (rad, "rad", Rad),
        (grad, "grad", Grad),
        (turn, "turn", Turn),
        (s, "s", S),
        (ms, "ms", Ms),
        (hz, "hz", Hz),
        (khz, "khz", Khz),
        (dpi, "dpi", Dpi),
        (dpcm, "dpcm", Dpcm),
        (dppx, "dppx", Dppx),
        (fr, "fr", Fr),
    );
}

/// Look up a factory by its canonical name (`"percent"`, not `"%"`)
pub fn unit_factory(name: &str) -> Option<UnitFactory> {
    css::FACTORIES
        .iter()
        .find(|(factory_name, _)| *factory_name == name)
        .map(|(_, factory)| *factory)
}

/// The host's global object, as far as installation is concerned
///
/// A browser-like host maps these onto its `CSS` namespace; an embedder
/// can back them with a plain map.
pub trait HostGlobal {
    /// Whether the host already ships a native numeric value type
    fn has_native_numeric_value(&self) -> bool;

    /// Whether a factory is already present under `name`
    fn has_unit_factory(&self, name: &str) -> bool;

    /// Make `factory` reachable under `name`
    fn register_unit_factory(&mut self, name: &'static str, factory: UnitFactory);
}

/// Install the unit factories into `host`
///
/// Returns `false` without touching the host when a native typed OM is
/// detected (a native numeric value type together with a `number`
/// factory); returns `true` after registering every factory otherwise.
pub fn install<H: HostGlobal>(host: &mut H) -> bool {
    if host.has_native_numeric_value() && host.has_unit_factory("number") {
        return false;
    }
    for (name, factory) in css::FACTORIES {
        host.register_unit_factory(*name, *factory);
    }
    true
}

/// Weak per-element memoization of property maps
///
/// Maps are keyed by the pointer identity of the host style object.
/// Entries die with their map; dead entries are purged when a new map is
/// created.
pub struct StyleMapRegistry<S: InlineStyle> {
    maps: RefCell<FxHashMap<usize, Weak<StylePropertyMap<S>>>>,
}

impl<S: InlineStyle> StyleMapRegistry<S> {
    pub fn new() -> StyleMapRegistry<S> {
        StyleMapRegistry {
            maps: RefCell::new(FxHashMap::default()),
        }
    }

    /// The property map for `style`, creating and memoizing it on first
    /// access
    pub fn attribute_style_map(&self, style: &Rc<RefCell<S>>) -> Rc<StylePropertyMap<S>> {
        let key = Rc::as_ptr(style) as usize;
        let mut maps = self.maps.borrow_mut();
        if let Some(existing) = maps.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        maps.retain(|_, map| map.strong_count() > 0);
        let map = Rc::new(StylePropertyMap::new(style));
        maps.insert(key, Rc::downgrade(&map));
        map
    }

    /// Number of live memoized maps
    pub fn len(&self) -> usize {
        self.maps
            .borrow()
            .values()
            .filter(|map| map.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: InlineStyle> Default for StyleMapRegistry<S> {
    fn default() -> StyleMapRegistry<S> {
        StyleMapRegistry::new()
    }
}
