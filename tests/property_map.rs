use css_typed_om::{
    css, CssKeywordValue, CssStyleValue, Error, InlineStyle, InlineStyleData, StyleMapRegistry,
    StylePropertyMap,
};
use std::cell::RefCell;
use std::rc::Rc;

fn host() -> Rc<RefCell<InlineStyleData>> {
    Rc::new(RefCell::new(InlineStyleData::new()))
}

fn px(v: f64) -> CssStyleValue {
    CssStyleValue::Numeric(css::px(v).unwrap().into())
}

#[test]
fn typed_values_round_trip_through_host_text() {
    let style = host();
    let map = StylePropertyMap::new(&style);

    map.set("width", &[px(15.0)]).unwrap();
    assert_eq!(
        style.borrow().get_property_value("width"),
        Some("15px".to_string())
    );
    assert_eq!(map.get("width").unwrap(), Some(px(15.0)));
}

#[test]
fn math_survives_a_store_and_reload() {
    let style = host();
    let map = StylePropertyMap::new(&style);

    let value = css_typed_om::parse("width", "calc(100% - 20px)").unwrap();
    map.set("width", &[value.clone()]).unwrap();
    assert_eq!(
        style.borrow().get_property_value("width"),
        Some("calc(100% + -20px)".to_string())
    );
    assert_eq!(map.get("width").unwrap(), Some(value));
}

#[test]
fn host_written_text_parses_on_read() {
    let style = host();
    style.borrow_mut().set_property("height", "calc(1px + 2px)");
    style.borrow_mut().set_property("display", "flex");

    let map = StylePropertyMap::new(&style);
    assert_eq!(map.get("height").unwrap(), Some(px(3.0)));
    assert_eq!(
        map.get("display").unwrap(),
        Some(CssStyleValue::Keyword(
            CssKeywordValue::new("flex").unwrap()
        ))
    );
}

#[test]
fn unreadable_host_text_reads_as_unparsed() {
    let style = host();
    style.borrow_mut().set_property("background", "¡weird!");
    let map = StylePropertyMap::new(&style);
    let value = map.get("background").unwrap().unwrap();
    assert!(matches!(value, CssStyleValue::Unparsed(_)));
}

#[test]
fn get_all_understands_comma_list_properties() {
    let style = host();
    style
        .borrow_mut()
        .set_property("background-image", "url(a.png), url(b.png)");
    let map = StylePropertyMap::new(&style);
    let values = map.get_all("background-image").unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].to_string(), "url(a.png)");
    assert_eq!(values[1].to_string(), "url(b.png)");
}

#[test]
fn append_extends_lists_with_the_right_separator() {
    let style = host();
    let map = StylePropertyMap::new(&style);

    map.set("transition", &[CssStyleValue::Unparsed(
        css_typed_om::CssUnparsedValue::from_text("width 1s"),
    )])
    .unwrap();
    map.append("transition", &[CssStyleValue::Unparsed(
        css_typed_om::CssUnparsedValue::from_text("height 2s"),
    )])
    .unwrap();
    assert_eq!(
        style.borrow().get_property_value("transition"),
        Some("width 1s, height 2s".to_string())
    );

    map.set("padding", &[px(1.0)]).unwrap();
    map.append("padding", &[px(2.0), px(3.0)]).unwrap();
    assert_eq!(
        style.borrow().get_property_value("padding"),
        Some("1px 2px 3px".to_string())
    );
}

#[test]
fn mutations_require_at_least_one_value() {
    let map = StylePropertyMap::new(&host());
    assert!(matches!(
        map.set("width", &[]),
        Err(Error::MissingOperand { .. })
    ));
}

#[test]
fn iteration_reflects_declaration_order() {
    let style = host();
    let map = StylePropertyMap::new(&style);
    map.set("width", &[px(1.0)]).unwrap();
    map.set("height", &[px(2.0)]).unwrap();
    map.set("opacity", &[CssStyleValue::Numeric(
        css::number(0.5).unwrap().into(),
    )])
    .unwrap();

    let keys: Vec<String> = map.keys().unwrap().collect();
    assert_eq!(keys, vec!["width", "height", "opacity"]);

    let entries: Vec<_> = map.entries().unwrap().collect();
    assert_eq!(entries[2].1[0].to_string(), "0.5");

    let mut count = 0;
    map.for_each(|_, values| {
        assert_eq!(values.len(), 1);
        count += 1;
    })
    .unwrap();
    assert_eq!(count, 3);
}

#[test]
fn dropped_hosts_detach_their_maps() {
    let style = host();
    let map = StylePropertyMap::new(&style);
    map.set("width", &[px(1.0)]).unwrap();
    drop(style);
    assert_eq!(map.get("width"), Err(Error::StyleDetached));
    assert_eq!(map.size(), Err(Error::StyleDetached));
}

#[test]
fn registry_hands_out_one_map_per_element() {
    let registry: StyleMapRegistry<InlineStyleData> = StyleMapRegistry::new();
    let a = host();
    let b = host();

    let map_a = registry.attribute_style_map(&a);
    map_a.set("width", &[px(10.0)]).unwrap();

    // Same element, same map; the earlier write is visible.
    let again = registry.attribute_style_map(&a);
    assert!(Rc::ptr_eq(&map_a, &again));
    assert_eq!(again.get("width").unwrap(), Some(px(10.0)));

    // Different element, different map and storage.
    let map_b = registry.attribute_style_map(&b);
    assert_eq!(map_b.get("width").unwrap(), None);
}
