//! # Registration: building the suite tree
//!
//! A [`Runner`] owns one suite tree and the cursor stack used while it is
//! being built. `describe` pushes a suite onto the cursor for the duration of
//! its callback; `test` and `test_async` attach to whatever suite is on top.
//!
//! ## Usage Workflow
//! ```rust
//! use tally::{expect, Runner};
//! let runner = Runner::new();
//! runner.describe("math", |s| {
//!     s.test("adds", || expect(1 + 1).to_be(2));
//!     s.describe("floats", |s| {
//!         s.test("nan is itself", || expect(f64::NAN).to_be(f64::NAN));
//!     });
//! });
//! assert_eq!(runner.test_count(), 2);
//! assert_eq!(runner.suite_count(), 2);
//! ```
//!
//! The free functions at the bottom of this module do the same against a
//! thread-local default runner.

use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use tracing::debug;

use crate::engine::RunResult;
use crate::errors::IntoOutcome;
use crate::output::ReportConfig;
use crate::suite::{SuiteId, SuiteTree, TestBody, TestCase};

mod sealed {
    pub trait Sealed {}

    impl Sealed for () {}
    impl<E> Sealed for Result<(), E> {}
}

/// What a `describe` callback may return: `()` or `Result<(), E>`.
///
/// Sealed, so a callback cannot hand back a future whose registrations would
/// run after its suite has left the cursor.
pub trait RegistrationOutcome: sealed::Sealed {}

impl RegistrationOutcome for () {}
impl<E> RegistrationOutcome for Result<(), E> {}

/// One independent test universe: a suite tree plus its registration cursor.
pub struct Runner {
    tree: RefCell<SuiteTree>,
    cursor: RefCell<Vec<SuiteId>>,
    config: ReportConfig,
}

impl Runner {
    pub fn new() -> Self {
        Self::with_config(ReportConfig::default())
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self {
            tree: RefCell::new(SuiteTree::new()),
            cursor: RefCell::new(vec![SuiteTree::ROOT]),
            config,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Registers a suite named `name` and runs `callback` with it as the
    /// attachment point for nested registrations.
    ///
    /// The cursor is popped when the callback returns, including when it
    /// returns an `Err` or unwinds. The callback's return value is handed
    /// back unchanged, so registration errors reach the caller.
    ///
    /// Callbacks are synchronous; returning a future does not compile:
    ///
    /// ```compile_fail
    /// tally::describe("later", || async { tally::test("never", || ()) });
    /// ```
    pub fn describe<F, R>(&self, name: impl Into<String>, callback: F) -> R
    where
        F: FnOnce(&Runner) -> R,
        R: RegistrationOutcome,
    {
        let name = name.into();
        let parent = self.current_suite();
        debug!(suite = %name, depth = self.depth(), "registering suite");
        let id = self.tree.borrow_mut().add_suite(parent, name);

        let _guard = CursorGuard::enter(&self.cursor, id);
        callback(self)
    }

    /// Registers a synchronous test in the current suite.
    ///
    /// The body runs once per pass; a returned `Err` or a panic fails the test.
    pub fn test<F, O>(&self, name: impl Into<String>, body: F)
    where
        F: Fn() -> O + 'static,
        O: IntoOutcome,
    {
        self.register(
            name.into(),
            TestBody::Sync(Rc::new(move || body().into_outcome())),
        );
    }

    /// Registers an asynchronous test in the current suite.
    ///
    /// The returned future is awaited to completion before the next test starts.
    pub fn test_async<F, Fut>(&self, name: impl Into<String>, body: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future + 'static,
        Fut::Output: IntoOutcome,
    {
        self.register(
            name.into(),
            TestBody::Async(Rc::new(move || {
                body().map(|output| output.into_outcome()).boxed_local()
            })),
        );
    }

    fn register(&self, name: String, body: TestBody) {
        let suite = self.current_suite();
        debug!(test = %name, is_async = body.is_async(), "registering test");
        self.tree
            .borrow_mut()
            .add_test(suite, TestCase { name, body });
    }

    fn current_suite(&self) -> SuiteId {
        self.cursor
            .borrow()
            .last()
            .copied()
            .unwrap_or(SuiteTree::ROOT)
    }

    /// Nesting depth of the registration cursor; 0 at top level.
    pub fn depth(&self) -> usize {
        self.cursor.borrow().len() - 1
    }

    pub fn test_count(&self) -> usize {
        self.tree.borrow().test_count()
    }

    /// Number of registered suites, not counting the root.
    pub fn suite_count(&self) -> usize {
        self.tree.borrow().suite_count()
    }

    pub fn tree(&self) -> Ref<'_, SuiteTree> {
        self.tree.borrow()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a suite on the cursor stack for as long as it is alive.
struct CursorGuard<'a> {
    cursor: &'a RefCell<Vec<SuiteId>>,
}

impl<'a> CursorGuard<'a> {
    fn enter(cursor: &'a RefCell<Vec<SuiteId>>, id: SuiteId) -> Self {
        cursor.borrow_mut().push(id);
        Self { cursor }
    }
}

impl Drop for CursorGuard<'_> {
    fn drop(&mut self) {
        let mut cursor = self.cursor.borrow_mut();
        // The root entry is never popped.
        if cursor.len() > 1 {
            cursor.pop();
        }
    }
}

// ============================================================================
// DEFAULT RUNNER
// ============================================================================

thread_local! {
    static DEFAULT_RUNNER: Rc<Runner> = Rc::new(Runner::new());
}

/// Calls `f` with this thread's default runner, creating it on first use.
pub fn with_default_runner<F, R>(f: F) -> R
where
    F: FnOnce(&Runner) -> R,
{
    DEFAULT_RUNNER.with(|runner| f(runner.as_ref()))
}

/// [`Runner::describe`] on the default runner.
///
/// Nested registrations inside `callback` use the free functions too.
pub fn describe<F, R>(name: impl Into<String>, callback: F) -> R
where
    F: FnOnce() -> R,
    R: RegistrationOutcome,
{
    with_default_runner(|runner| runner.describe(name, |_| callback()))
}

/// [`Runner::test`] on the default runner.
pub fn test<F, O>(name: impl Into<String>, body: F)
where
    F: Fn() -> O + 'static,
    O: IntoOutcome,
{
    with_default_runner(|runner| runner.test(name, body))
}

/// [`Runner::test_async`] on the default runner.
pub fn test_async<F, Fut>(name: impl Into<String>, body: F)
where
    F: Fn() -> Fut + 'static,
    Fut: Future + 'static,
    Fut::Output: IntoOutcome,
{
    with_default_runner(|runner| runner.test_async(name, body))
}

/// [`Runner::run`] on the default runner.
pub async fn run() -> RunResult {
    let runner = DEFAULT_RUNNER.with(Rc::clone);
    runner.run().await
}

/// [`Runner::run_blocking`] on the default runner.
pub fn run_blocking() -> RunResult {
    futures::executor::block_on(run())
}
