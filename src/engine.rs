//! # Execution: one pass over the suite tree
//!
//! A pass snapshots the tree into execution order, runs each body strictly
//! in sequence, isolates failures at the test boundary, and reports each
//! result and a final summary to a [`ReportSink`].

use std::cell::Cell;
use std::panic::{self, catch_unwind, AssertUnwindSafe};

use futures::FutureExt;
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::errors::{failure_detail, is_assertion, PanicError, TestResult};
use crate::output::{Channel, ConsoleSink, ReportLine, ReportSink};
use crate::registry::Runner;
use crate::suite::{SuiteId, SuiteTree, TestBody};

/// Separator between path segments in reported test names.
pub const PATH_SEPARATOR: &str = " > ";

// ============================================================================
// RESULTS
// ============================================================================

/// Aggregate outcome of one pass. `total == passed + failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Every executed test, in execution order.
    pub outcomes: Vec<TestOutcome>,
}

impl RunResult {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    fn record(&mut self, path: String, status: TestStatus) {
        self.total += 1;
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(TestOutcome { path, status });
    }
}

/// What happened to a single test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub path: String,
    pub status: TestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed {
        /// The text printed under the failure line.
        detail: String,
        /// Whether the failure came from a matcher.
        assertion: bool,
    },
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        matches!(self.status, TestStatus::Passed)
    }
}

// ============================================================================
// EXECUTION
// ============================================================================

/// A test ready to execute, with its full reported path.
struct PlannedTest {
    path: String,
    body: TestBody,
}

/// Flattens the tree into execution order: for every suite, all child suites
/// first (recursively, in declaration order), then its own tests.
fn plan(tree: &SuiteTree) -> Vec<PlannedTest> {
    fn walk(tree: &SuiteTree, id: SuiteId, path: &mut Vec<String>, out: &mut Vec<PlannedTest>) {
        let suite = tree.suite(id);
        let named = !tree.is_root(id);
        if named {
            path.push(suite.name.clone());
        }
        for &child in &suite.subsuites {
            walk(tree, child, path, out);
        }
        for test in &suite.tests {
            let mut segments = path.clone();
            segments.push(test.name.clone());
            out.push(PlannedTest {
                path: segments.join(PATH_SEPARATOR),
                body: test.body.clone(),
            });
        }
        if named {
            path.pop();
        }
    }

    let mut out = Vec::with_capacity(tree.test_count());
    walk(tree, SuiteTree::ROOT, &mut Vec::new(), &mut out);
    out
}

// ============================================================================
// PANIC OUTPUT
// ============================================================================

thread_local! {
    /// Set while this thread is inside a test body.
    static IN_TEST_BODY: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: OnceCell<()> = OnceCell::new();

/// Wraps the process panic hook, once, so panics raised inside a test body
/// on this thread skip it. Every other panic reaches the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_TEST_BODY.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Marks the current thread as running a test body until dropped.
struct BodyScope {
    outer: bool,
}

impl BodyScope {
    fn enter() -> Self {
        install_quiet_hook();
        let outer = IN_TEST_BODY.with(|flag| flag.replace(true));
        BodyScope { outer }
    }
}

impl Drop for BodyScope {
    fn drop(&mut self) {
        let outer = self.outer;
        IN_TEST_BODY.with(|flag| flag.set(outer));
    }
}

/// Runs one body, turning panics into failures.
async fn execute(body: &TestBody) -> TestResult {
    let _scope = BodyScope::enter();
    match body {
        TestBody::Sync(body) => catch_unwind(AssertUnwindSafe(|| body()))
            .unwrap_or_else(|payload| Err(PanicError::from_payload(payload).into())),
        TestBody::Async(body) => {
            let future = match catch_unwind(AssertUnwindSafe(|| body())) {
                Ok(future) => future,
                Err(payload) => return Err(PanicError::from_payload(payload).into()),
            };
            AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(PanicError::from_payload(payload).into()))
        }
    }
}

impl Runner {
    /// Runs every registered test once, reporting to the console.
    pub async fn run(&self) -> RunResult {
        let mut sink = ConsoleSink::new(self.config());
        self.run_with(&mut sink).await
    }

    /// Runs every registered test once, reporting to `sink`.
    ///
    /// Tests run one at a time; an async body is awaited before the next test
    /// starts. A failing test never stops the pass. Registrations made while
    /// the pass is in progress are picked up by the next pass only.
    ///
    /// A panicking body is reported as a failure line and its detail only.
    /// The first pass wraps the process panic hook so that panics inside a
    /// body, on the thread running the pass, are not printed by it; panics
    /// anywhere else still are. A hook installed after that first pass
    /// replaces the wrapper.
    pub async fn run_with(&self, sink: &mut dyn ReportSink) -> RunResult {
        let planned = plan(&self.tree());
        let mut result = RunResult::default();

        for test in planned {
            debug!(test = %test.path, "running test");
            let status = match execute(&test.body).await {
                Ok(()) => {
                    sink.emit(Channel::Normal, &ReportLine::Passed(&test.path));
                    TestStatus::Passed
                }
                Err(error) => {
                    let detail = failure_detail(error.as_ref());
                    warn!(test = %test.path, error = %error, "test failed");
                    sink.emit(Channel::Attention, &ReportLine::Failed(&test.path));
                    sink.emit(Channel::Attention, &ReportLine::Detail(&detail));
                    TestStatus::Failed {
                        detail,
                        assertion: is_assertion(error.as_ref()),
                    }
                }
            };
            result.record(test.path, status);
        }

        let channel = if result.has_failures() {
            Channel::Attention
        } else {
            Channel::Normal
        };
        sink.emit(channel, &ReportLine::Blank);
        sink.emit(
            channel,
            &ReportLine::Summary {
                total: result.total,
                passed: result.passed,
                failed: result.failed,
            },
        );
        info!(
            total = result.total,
            passed = result.passed,
            failed = result.failed,
            "run finished"
        );
        result
    }

    /// [`Runner::run`] driven to completion on the current thread.
    pub fn run_blocking(&self) -> RunResult {
        futures::executor::block_on(self.run())
    }

    /// [`Runner::run_with`] driven to completion on the current thread.
    pub fn run_blocking_with(&self, sink: &mut dyn ReportSink) -> RunResult {
        futures::executor::block_on(self.run_with(sink))
    }
}
