//! Style property maps
//!
//! A [`StylePropertyMap`] is the typed view over one element's inline
//! style storage. It holds the host style weakly (the host owns the
//! element's lifetime), converts property names to kebab-case through a
//! bounded cache, and converts between typed trees and persisted text at
//! every call; nothing parsed is retained between calls.
//!
//! Reads are forgiving: stored text that no longer parses comes back as
//! a verbatim [`CssUnparsedValue`] with a debug-log diagnostic, because a
//! map read must never throw away a value the host accepted.

mod name_cache;

use crate::error::{Error, Result};
use crate::host::InlineStyle;
use crate::value::{CssStyleValue, CssUnparsedValue};
use name_cache::canonical_property_name;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Properties whose values are comma-separated lists
const COMMA_LIST_PROPERTIES: &[&str] = &[
    "transition",
    "animation",
    "box-shadow",
    "text-shadow",
    "background",
    "background-image",
    "font-family",
    "stroke-dasharray",
];

fn is_comma_list(property: &str) -> bool {
    COMMA_LIST_PROPERTIES.iter().any(|p| *p == property)
}

/// Typed adapter over a host element's inline style
pub struct StylePropertyMap<S: InlineStyle> {
    style: Weak<RefCell<S>>,
}

impl<S: InlineStyle> StylePropertyMap<S> {
    /// Wrap a host style object; the map never keeps it alive
    pub fn new(style: &Rc<RefCell<S>>) -> StylePropertyMap<S> {
        StylePropertyMap {
            style: Rc::downgrade(style),
        }
    }

    fn upgrade(&self) -> Result<Rc<RefCell<S>>> {
        self.style.upgrade().ok_or(Error::StyleDetached)
    }

    /// The parsed value of `name`, or `None` when the property is unset
    pub fn get(&self, name: &str) -> Result<Option<CssStyleValue>> {
        let name = canonical_property_name(name);
        let style = self.upgrade()?;
        let text = style.borrow().get_property_value(&name);
        Ok(text.map(|text| parse_or_unparsed(&name, &text)))
    }

    /// All values of `name`: comma-list properties split at top-level
    /// commas, everything else behaves like [`StylePropertyMap::get`]
    pub fn get_all(&self, name: &str) -> Result<Vec<CssStyleValue>> {
        let name = canonical_property_name(name);
        let style = self.upgrade()?;
        let borrowed = style.borrow();
        Ok(read_all(&*borrowed, &name))
    }

    /// Serialize `values` (space-joined) into the host
    pub fn set(&self, name: &str, values: &[CssStyleValue]) -> Result<()> {
        let name = canonical_property_name(name);
        let text = joined_text(values, "set")?;
        let style = self.upgrade()?;
        style.borrow_mut().set_property(&name, &text);
        Ok(())
    }

    /// Add `values` after the current value: comma-joined for comma-list
    /// properties, space-joined otherwise
    pub fn append(&self, name: &str, values: &[CssStyleValue]) -> Result<()> {
        let name = canonical_property_name(name);
        let addition = joined_text(values, "append")?;
        let style = self.upgrade()?;
        let mut style = style.borrow_mut();
        let text = match style.get_property_value(&name) {
            Some(existing) => {
                let separator = if is_comma_list(&name) { ", " } else { " " };
                format!("{existing}{separator}{addition}")
            }
            None => addition,
        };
        style.set_property(&name, &text);
        Ok(())
    }

    /// Remove `name` from the host style
    pub fn delete(&self, name: &str) -> Result<()> {
        let name = canonical_property_name(name);
        let style = self.upgrade()?;
        style.borrow_mut().remove_property(&name);
        Ok(())
    }

    /// Clear the whole declaration block
    pub fn clear(&self) -> Result<()> {
        let style = self.upgrade()?;
        style.borrow_mut().set_css_text("");
        Ok(())
    }

    /// Whether `name` currently has a value
    pub fn has(&self, name: &str) -> Result<bool> {
        let name = canonical_property_name(name);
        let style = self.upgrade()?;
        let present = style.borrow().get_property_value(&name).is_some();
        Ok(present)
    }

    /// Number of set longhand properties
    pub fn size(&self) -> Result<usize> {
        let style = self.upgrade()?;
        let len = style.borrow().len();
        Ok(len)
    }

    /// Iterate `(name, values)` pairs in declaration order, parsing on
    /// demand; this is the map's default iteration
    pub fn entries(&self) -> Result<Entries<S>> {
        let style = self.upgrade()?;
        let names = snapshot_names(&*style.borrow());
        Ok(Entries {
            style,
            names: names.into_iter(),
        })
    }

    /// Alias for [`StylePropertyMap::entries`]
    pub fn iter(&self) -> Result<Entries<S>> {
        self.entries()
    }

    /// Iterate property names in declaration order
    pub fn keys(&self) -> Result<Keys> {
        let style = self.upgrade()?;
        let names = snapshot_names(&*style.borrow());
        Ok(Keys {
            names: names.into_iter(),
        })
    }

    /// Iterate parsed values in declaration order
    pub fn values(&self) -> Result<Values<S>> {
        Ok(Values {
            entries: self.entries()?,
        })
    }

    /// Call `f` for every `(name, values)` pair in declaration order
    pub fn for_each(&self, mut f: impl FnMut(&str, &[CssStyleValue])) -> Result<()> {
        for (name, values) in self.entries()? {
            f(&name, &values);
        }
        Ok(())
    }
}

/// Iterator over `(name, values)` pairs; see
/// [`StylePropertyMap::entries`]
pub struct Entries<S: InlineStyle> {
    style: Rc<RefCell<S>>,
    names: std::vec::IntoIter<String>,
}

impl<S: InlineStyle> Iterator for Entries<S> {
    type Item = (String, Vec<CssStyleValue>);

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        let values = read_all(&*self.style.borrow(), &name);
        Some((name, values))
    }
}

/// Iterator over property names; see [`StylePropertyMap::keys`]
pub struct Keys {
    names: std::vec::IntoIter<String>,
}

impl Iterator for Keys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.names.next()
    }
}

/// Iterator over parsed values; see [`StylePropertyMap::values`]
pub struct Values<S: InlineStyle> {
    entries: Entries<S>,
}

impl<S: InlineStyle> Iterator for Values<S> {
    type Item = Vec<CssStyleValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, values)| values)
    }
}

fn snapshot_names<S: InlineStyle>(style: &S) -> Vec<String> {
    (0..style.len())
        .filter_map(|index| style.item(index).map(str::to_string))
        .collect()
}

fn read_all<S: InlineStyle>(style: &S, name: &str) -> Vec<CssStyleValue> {
    let Some(text) = style.get_property_value(name) else {
        return Vec::new();
    };
    if is_comma_list(name) {
        crate::parse::split_top_level_commas(&text)
            .into_iter()
            .map(|segment| parse_or_unparsed(name, segment))
            .collect()
    } else {
        vec![parse_or_unparsed(name, &text)]
    }
}

/// Parse stored text, downgrading any failure to verbatim text
fn parse_or_unparsed(name: &str, text: &str) -> CssStyleValue {
    match crate::parse::parse(name, text) {
        Ok(value) => value,
        Err(error) => {
            log::debug!("keeping '{name}: {text}' unparsed: {error}");
            CssStyleValue::Unparsed(CssUnparsedValue::from_text(text))
        }
    }
}

fn joined_text(values: &[CssStyleValue], operation: &str) -> Result<String> {
    if values.is_empty() {
        return Err(Error::MissingOperand {
            operation: operation.to_string(),
        });
    }
    let rendered: Vec<String> = values.iter().map(CssStyleValue::to_string).collect();
    Ok(rendered.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InlineStyleData;
    use crate::units::Unit;
    use crate::value::{CssKeywordValue, CssUnitValue};

    fn host() -> Rc<RefCell<InlineStyleData>> {
        Rc::new(RefCell::new(InlineStyleData::new()))
    }

    fn px(v: f64) -> CssStyleValue {
        CssStyleValue::Numeric(CssUnitValue::new(v, Unit::Px).unwrap().into())
    }

    #[test]
    fn test_set_and_get_round_trip() {
        let style = host();
        let map = StylePropertyMap::new(&style);
        map.set("width", &[px(15.0)]).unwrap();
        assert_eq!(
            style.borrow().get_property_value("width"),
            Some("15px".to_string())
        );
        assert_eq!(map.get("width").unwrap(), Some(px(15.0)));
        assert_eq!(map.get("height").unwrap(), None);
    }

    #[test]
    fn test_camel_case_names_are_canonicalized() {
        let style = host();
        let map = StylePropertyMap::new(&style);
        map.set("fontSize", &[px(12.0)]).unwrap();
        assert_eq!(
            style.borrow().get_property_value("font-size"),
            Some("12px".to_string())
        );
        assert!(map.has("font-size").unwrap());
    }

    #[test]
    fn test_set_requires_values() {
        let map = StylePropertyMap::new(&host());
        assert!(matches!(
            map.set("width", &[]),
            Err(Error::MissingOperand { .. })
        ));
        assert!(matches!(
            map.append("width", &[]),
            Err(Error::MissingOperand { .. })
        ));
    }

    #[test]
    fn test_set_joins_multiple_values_with_spaces() {
        let style = host();
        let map = StylePropertyMap::new(&style);
        map.set("margin", &[px(1.0), px(2.0)]).unwrap();
        assert_eq!(
            style.borrow().get_property_value("margin"),
            Some("1px 2px".to_string())
        );
    }

    #[test]
    fn test_append_space_vs_comma_properties() {
        let style = host();
        let map = StylePropertyMap::new(&style);
        map.set("margin", &[px(1.0)]).unwrap();
        map.append("margin", &[px(2.0)]).unwrap();
        assert_eq!(
            style.borrow().get_property_value("margin"),
            Some("1px 2px".to_string())
        );

        let arial = CssStyleValue::Unparsed(CssUnparsedValue::from_text("\"Arial\""));
        let fallback = CssStyleValue::Keyword(CssKeywordValue::new("sans-serif").unwrap());
        map.set("font-family", &[arial]).unwrap();
        map.append("font-family", &[fallback]).unwrap();
        assert_eq!(
            style.borrow().get_property_value("font-family"),
            Some("\"Arial\", sans-serif".to_string())
        );
    }

    #[test]
    fn test_get_all_splits_comma_lists() {
        let style = host();
        style
            .borrow_mut()
            .set_property("font-family", "\"Arial\", sans-serif");
        let map = StylePropertyMap::new(&style);
        let values = map.get_all("font-family").unwrap();
        assert_eq!(values.len(), 2);
        assert!(matches!(&values[1], CssStyleValue::Keyword(k) if k.value() == "sans-serif"));

        // Non-list properties return one element.
        style.borrow_mut().set_property("width", "10px");
        assert_eq!(map.get_all("width").unwrap(), vec![px(10.0)]);
        assert!(map.get_all("height").unwrap().is_empty());
    }

    #[test]
    fn test_unparsable_stored_text_downgrades() {
        let style = host();
        style.borrow_mut().set_property("width", "@#$bogus");
        let map = StylePropertyMap::new(&style);
        let value = map.get("width").unwrap().unwrap();
        assert!(matches!(value, CssStyleValue::Unparsed(u) if u.to_string() == "@#$bogus"));
    }

    #[test]
    fn test_delete_clear_has_size() {
        let style = host();
        let map = StylePropertyMap::new(&style);
        map.set("width", &[px(1.0)]).unwrap();
        map.set("height", &[px(2.0)]).unwrap();
        assert_eq!(map.size().unwrap(), 2);
        assert!(map.has("width").unwrap());

        map.delete("width").unwrap();
        assert!(!map.has("width").unwrap());
        assert_eq!(map.size().unwrap(), 1);

        map.clear().unwrap();
        assert_eq!(map.size().unwrap(), 0);
        assert_eq!(style.borrow().css_text(), "");
    }

    #[test]
    fn test_iteration_parses_in_declaration_order() {
        let style = host();
        let map = StylePropertyMap::new(&style);
        map.set("width", &[px(1.0)]).unwrap();
        map.set("height", &[px(2.0)]).unwrap();

        let entries: Vec<_> = map.entries().unwrap().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "width");
        assert_eq!(entries[0].1, vec![px(1.0)]);
        assert_eq!(entries[1].0, "height");

        let keys: Vec<_> = map.keys().unwrap().collect();
        assert_eq!(keys, vec!["width", "height"]);

        let values: Vec<_> = map.values().unwrap().collect();
        assert_eq!(values[1], vec![px(2.0)]);

        let mut seen = Vec::new();
        map.for_each(|name, _| seen.push(name.to_string())).unwrap();
        assert_eq!(seen, keys);
    }

    #[test]
    fn test_detached_style_errors() {
        let style = host();
        let map = StylePropertyMap::new(&style);
        drop(style);
        assert_eq!(map.get("width"), Err(Error::StyleDetached));
        assert!(matches!(map.set("width", &[px(1.0)]), Err(Error::StyleDetached)));
        assert!(map.entries().is_err());
    }
}
