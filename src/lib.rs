//! Tally: a minimal test-declaration and execution framework.
//!
//! Tests are registered into nested suites with `describe`/`test`, then run
//! in one explicit pass that reports every result and returns a
//! [`RunResult`]. Registration never executes anything, and a pass can be
//! repeated over the same tree.
//!
//! ```rust
//! use tally::{expect, OutputBuffer, Runner};
//!
//! let runner = Runner::new();
//! runner.describe("strings", |s| {
//!     s.test("same text", || expect("a").to_be("a"));
//!     s.test("text is not a number", || expect("5").to_be(5));
//! });
//!
//! let mut output = OutputBuffer::new();
//! let result = runner.run_blocking_with(&mut output);
//! assert_eq!((result.total, result.passed, result.failed), (2, 1, 1));
//! assert!(output.as_text().ends_with("Total: 2, Passed: 1, Failed: 1"));
//! ```
//!
//! Assertions use same-value equality: `NaN` equals `NaN`, `0.0` and `-0.0`
//! are different, and objects are only equal to themselves.

pub mod assert;
pub mod engine;
pub mod errors;
pub mod output;
pub mod registry;
pub mod suite;
pub mod value;

pub use crate::assert::{expect, Expectation};
pub use crate::engine::{RunResult, TestOutcome, TestStatus};
pub use crate::errors::{AssertionError, BoxError, IntoOutcome, PanicError, TestResult};
pub use crate::output::{Channel, ConsoleSink, OutputBuffer, ReportConfig, ReportLine, ReportSink};
pub use crate::registry::{
    describe, run, run_blocking, test, test_async, with_default_runner, RegistrationOutcome,
    Runner,
};
pub use crate::value::Value;

/// Everything a test file usually needs.
pub mod prelude {
    pub use crate::{
        describe, expect, run, run_blocking, test, test_async, AssertionError, BoxError,
        RunResult, Runner, TestResult, Value,
    };
}
