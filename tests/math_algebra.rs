use css_typed_om::{css, CssNumericValue, CssUnitValue, Error, Unit};

fn px(v: f64) -> CssNumericValue {
    CssUnitValue::new(v, Unit::Px).unwrap().into()
}

fn number(v: f64) -> CssNumericValue {
    CssUnitValue::number(v).unwrap().into()
}

#[test]
fn same_unit_sums_always_fold() {
    for (a, b) in [(1.0, 2.0), (-4.5, 4.5), (0.25, 1e6)] {
        assert_eq!(px(a).add(px(b)).unwrap(), px(a + b));
    }
}

#[test]
fn dimensioned_leaf_times_scalar_folds() {
    for (value, k) in [(10.0, 2.0), (3.0, -0.5), (7.5, 1e-3)] {
        let scaled = px(value).mul(number(k)).unwrap();
        assert_eq!(scaled, px(value * k));
    }
}

#[test]
fn sum_type_defined_iff_operands_compatible() {
    let em = CssNumericValue::from(CssUnitValue::new(1.0, Unit::Em).unwrap());
    let percent = CssNumericValue::from(CssUnitValue::new(50.0, Unit::Percent).unwrap());
    let second = CssNumericValue::from(CssUnitValue::new(1.0, Unit::S).unwrap());

    assert!(px(1.0).add(em).is_ok());
    assert!(px(1.0).add(percent).is_ok());
    assert!(px(1.0).add(second).is_err());
    assert!(number(1.0).add(px(1.0)).is_err());
}

#[test]
fn double_negation_is_identity() {
    let original = px(3.0).add(CssUnitValue::new(1.0, Unit::Em).unwrap().into()).unwrap();
    let negated_twice =
        CssNumericValue::negate(CssNumericValue::negate(original.clone()).unwrap()).unwrap();
    assert_eq!(negated_twice, original);
}

#[test]
fn scalar_distributes_over_sums() {
    let sum = px(10.0)
        .add(CssUnitValue::new(50.0, Unit::Percent).unwrap().into())
        .unwrap();
    let doubled = sum.mul(number(2.0)).unwrap();
    let CssNumericValue::Sum(distributed) = doubled else {
        panic!("expected a distributed sum");
    };
    assert_eq!(
        distributed.values(),
        &[
            px(20.0),
            CssUnitValue::new(100.0, Unit::Percent).unwrap().into()
        ]
    );
}

#[test]
fn inversion_of_zero_is_a_range_violation() {
    assert!(matches!(
        CssNumericValue::invert(number(0.0)),
        Err(Error::Range(_))
    ));
    assert!(matches!(px(1.0).div(number(0.0)), Err(Error::Range(_))));
}

#[test]
fn min_max_clamp_builders_check_arity_and_types() {
    assert!(CssNumericValue::min(vec![]).is_err());
    assert!(CssNumericValue::min(vec![px(1.0), px(2.0)]).is_ok());
    assert!(CssNumericValue::max(vec![
        px(1.0),
        CssUnitValue::new(1.0, Unit::S).unwrap().into()
    ])
    .is_err());
    assert!(CssNumericValue::clamp(px(1.0), px(2.0), px(3.0)).is_ok());
}

#[test]
fn factories_feed_arithmetic() {
    let result = CssNumericValue::from(css::px(10.0).unwrap())
        .add(css::px(5.0).unwrap().into())
        .unwrap();
    assert_eq!(result.to_string(), "15px");

    let quotient = CssNumericValue::from(css::px(10.0).unwrap())
        .div(css::number(4.0).unwrap().into())
        .unwrap();
    assert_eq!(quotient.to_string(), "2.5px");
}

#[test]
fn unit_conversion_uses_fixed_ratios() {
    let inch = css::r#in(1.0).unwrap();
    assert_eq!(inch.to(Unit::Px).unwrap().to_string(), "96px");
    let angle = css::turn(0.25).unwrap();
    assert_eq!(angle.to(Unit::Deg).unwrap().to_string(), "90deg");
    // Relative units have no fixed ratio.
    assert!(css::em(2.0).unwrap().to(Unit::Px).is_err());
}

#[test]
fn numeric_parse_accepts_only_numerics() {
    assert_eq!(
        CssNumericValue::parse("calc(1px + 2px)").unwrap(),
        px(3.0)
    );
    assert!(CssNumericValue::parse("auto").is_err());
    assert!(CssNumericValue::parse("translate(1px, 2px)").is_err());
}

#[test]
fn serialization_precision_is_six_digits_trimmed() {
    let third = px(1.0).div(number(3.0)).unwrap();
    assert_eq!(third.to_string(), "0.333333px");
    let whole = px(2.0).mul(number(2.0)).unwrap();
    assert_eq!(whole.to_string(), "4px");
}

#[test]
fn mutable_unit_value_rechecks_finiteness() {
    let mut value = css::px(1.0).unwrap();
    assert!(value.set_value(f64::INFINITY).is_err());
    value.set_value(2.0).unwrap();
    assert_eq!(value.to_string(), "2px");
}
