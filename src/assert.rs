//! The assertion engine: `expect(actual).to_be(expected)`.

use crate::errors::AssertionError;
use crate::value::Value;

/// Binds `actual` to a comparator.
///
/// ```rust
/// use tally::expect;
/// assert!(expect(f64::NAN).to_be(f64::NAN).is_ok());
/// assert!(expect(0.0).to_be(-0.0).is_err());
/// ```
pub fn expect(actual: impl Into<Value>) -> Expectation {
    Expectation {
        actual: actual.into(),
    }
}

/// A comparator bound to an actual value.
#[derive(Debug, Clone)]
pub struct Expectation {
    actual: Value,
}

impl Expectation {
    pub fn actual(&self) -> &Value {
        &self.actual
    }

    /// Succeeds when `expected` is the same value as the bound one.
    ///
    /// Uses same-value equality (see [`Value::same_value`]), not `PartialEq`
    /// and not a structural comparison.
    pub fn to_be(&self, expected: impl Into<Value>) -> Result<(), AssertionError> {
        let expected = expected.into();
        if self.actual.same_value(&expected) {
            Ok(())
        } else {
            Err(AssertionError::new(&expected, &self.actual))
        }
    }
}
