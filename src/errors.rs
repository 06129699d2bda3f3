//! Failure types for test bodies and the assertion engine.
//!
//! Test bodies fail with a [`BoxError`], so `?` works on an
//! [`AssertionError`] as well as on any other error a body runs into. The
//! execution engine treats every failure the same for counting; the
//! assertion kind only changes how the detail line is written.

use std::any::Any;
use std::error::Error;

use miette::Diagnostic;
use thiserror::Error;

use crate::value::Value;

/// The failure a test body reports.
pub type BoxError = Box<dyn Error + 'static>;

/// The outcome of one test body.
pub type TestResult = Result<(), BoxError>;

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Raised by a matcher when the actual value does not match the expected one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("Expected {expected} but received {actual}")]
#[diagnostic(
    code(tally::assert::to_be),
    help("values are compared with same-value equality: NaN equals NaN and 0 differs from -0")
)]
pub struct AssertionError {
    /// Rendering of the expected value.
    pub expected: String,
    /// Rendering of the actual value.
    pub actual: String,
}

impl AssertionError {
    pub fn new(expected: &Value, actual: &Value) -> Self {
        Self {
            expected: expected.render(),
            actual: actual.render(),
        }
    }
}

/// A panic caught at the per-test boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanicError {
    #[error("panicked: {0}")]
    Message(String),
    #[error("panicked with a non-string payload")]
    Opaque,
}

impl PanicError {
    /// Converts the payload handed back by `catch_unwind`.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        match payload.downcast::<String>() {
            Ok(message) => PanicError::Message(*message),
            Err(payload) => match payload.downcast_ref::<&'static str>() {
                Some(message) => PanicError::Message((*message).to_string()),
                None => PanicError::Opaque,
            },
        }
    }
}

// ============================================================================
// BODY OUTCOMES
// ============================================================================

/// What a test body may return.
///
/// `()` always passes; `Result<(), E>` fails with its error.
pub trait IntoOutcome {
    fn into_outcome(self) -> TestResult;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> TestResult {
        Ok(())
    }
}

impl<E: Into<BoxError>> IntoOutcome for Result<(), E> {
    fn into_outcome(self) -> TestResult {
        self.map_err(Into::into)
    }
}

// ============================================================================
// REPORTING
// ============================================================================

/// Renders the detail text printed under a failed test.
///
/// Assertion errors are prefixed with their diagnostic code. Every error in
/// the `source()` chain is appended on its own `caused by:` line.
pub fn failure_detail(error: &(dyn Error + 'static)) -> String {
    let mut detail = match error.downcast_ref::<AssertionError>() {
        Some(assertion) => match assertion.code() {
            Some(code) => format!("[{}] {}", code, assertion),
            None => assertion.to_string(),
        },
        None => error.to_string(),
    };

    let mut cause = error.source();
    while let Some(err) = cause {
        detail.push_str("\n    caused by: ");
        detail.push_str(&err.to_string());
        cause = err.source();
    }
    detail
}

/// True when the failure was raised by a matcher.
pub fn is_assertion(error: &(dyn Error + 'static)) -> bool {
    error.is::<AssertionError>()
}
