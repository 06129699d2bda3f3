//! The `expect(..).to_be(..)` matcher and its failure messages.

use std::collections::BTreeMap;
use std::rc::Rc;

use miette::Diagnostic;
use predicates::prelude::*;
use tally::{expect, AssertionError, Value};

#[test]
fn nan_is_the_same_value_as_itself() {
    assert!(expect(f64::NAN).to_be(f64::NAN).is_ok());
    assert!(expect(f32::NAN).to_be(f64::NAN).is_ok());
}

#[test]
fn signed_zeros_are_different_values() {
    let err = expect(0.0).to_be(-0.0).unwrap_err();
    assert_eq!(err.to_string(), "Expected -0 but received 0");
    assert!(expect(-0.0).to_be(-0.0).is_ok());
}

#[test]
fn string_and_number_never_match() {
    let err = expect("5").to_be(5).unwrap_err();
    let message = err.to_string();

    assert!(predicate::str::contains("\"5\"").eval(&message));
    assert!(predicate::str::contains("Expected 5 ").eval(&message));
    assert_eq!(
        err,
        AssertionError {
            expected: "5".to_string(),
            actual: "\"5\"".to_string(),
        }
    );
}

#[test]
fn numbers_match_across_integer_and_float_types() {
    assert!(expect(3_u8).to_be(3.0).is_ok());
    assert!(expect(2_usize).to_be(2_i64).is_ok());
    assert!(expect(0.1 + 0.2).to_be(0.3).is_err());
}

#[test]
fn wide_integers_past_f64_precision_stay_distinct() {
    let err = expect(9_007_199_254_740_993_i64)
        .to_be(9_007_199_254_740_992_i64)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Expected 9007199254740992n but received 9007199254740993n"
    );
    assert!(expect(u64::MAX).to_be(u64::MAX - 1).is_err());
    assert!(expect(u64::MAX).to_be(u64::MAX).is_ok());
    assert!(expect(i64::MIN).to_be(i64::MIN as i128).is_ok());
    assert!(expect(9_007_199_254_740_991_u64).to_be(9_007_199_254_740_991.0).is_ok());
}

#[test]
fn big_integers_are_their_own_kind() {
    let err = expect(10_i128).to_be(11_i128).unwrap_err();
    assert_eq!(err.to_string(), "Expected 11n but received 10n");

    let err = expect(10_i128).to_be(10).unwrap_err();
    assert_eq!(err.to_string(), "Expected 10 but received 10n");
}

#[test]
fn strings_booleans_and_null_compare_by_value() {
    assert!(expect("abc").to_be(String::from("abc")).is_ok());
    assert!(expect('x').to_be("x").is_ok());
    assert!(expect(true).to_be(true).is_ok());
    assert!(expect(None::<i32>).to_be(()).is_ok());
    assert!(expect(Some(4)).to_be(4).is_ok());

    let err = expect(false).to_be(Value::Null).unwrap_err();
    assert_eq!(err.to_string(), "Expected null but received false");
}

#[test]
fn objects_match_only_themselves() {
    let shared = Rc::new(vec![1, 2]);
    assert!(expect(shared.clone()).to_be(shared.clone()).is_ok());

    let err = expect(shared).to_be(Rc::new(vec![1, 2])).unwrap_err();
    assert_eq!(err.to_string(), "Expected [1,2] but received [1,2]");
}

#[test]
fn unserializable_objects_render_with_debug() {
    let mut grid = BTreeMap::new();
    grid.insert((1_u8, 2_u8), "cell");

    let err = expect(Value::object(grid)).to_be(0).unwrap_err();
    assert!(predicate::str::contains("{(1, 2): \"cell\"}").eval(&err.to_string()));
}

#[test]
fn an_expectation_can_be_checked_repeatedly() {
    let expectation = expect(3);
    assert!(expectation.to_be(3).is_ok());
    assert!(expectation.to_be(4).is_err());
    assert_eq!(expectation.actual().render(), "3");
}

#[test]
fn assertion_errors_carry_a_diagnostic_code() {
    let err = expect(1).to_be(2).unwrap_err();
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("tally::assert::to_be"));
    assert!(err.help().is_some());
}
