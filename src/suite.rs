//! The suite tree: nested suites and leaf tests in declaration order.
//!
//! Suites live in an arena owned by [`SuiteTree`] and refer to each other by
//! [`SuiteId`]. The tree only grows; nothing is ever removed from it.

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::errors::TestResult;

/// Name of the root suite. Never shown in report paths.
pub const ROOT_SUITE_NAME: &str = "<root>";

/// Index of a suite inside its [`SuiteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuiteId(usize);

/// An executable test body.
///
/// Bodies are `Fn`, so the same test can run on every pass.
#[derive(Clone)]
pub enum TestBody {
    Sync(Rc<dyn Fn() -> TestResult>),
    Async(Rc<dyn Fn() -> LocalBoxFuture<'static, TestResult>>),
}

impl TestBody {
    pub fn is_async(&self) -> bool {
        matches!(self, TestBody::Async(_))
    }
}

impl fmt::Debug for TestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestBody::Sync(_) => f.write_str("TestBody::Sync(..)"),
            TestBody::Async(_) => f.write_str("TestBody::Async(..)"),
        }
    }
}

/// A named leaf test.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub body: TestBody,
}

/// A named grouping node.
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: String,
    pub subsuites: Vec<SuiteId>,
    pub tests: Vec<TestCase>,
}

impl Suite {
    fn new(name: String) -> Self {
        Self {
            name,
            subsuites: Vec::new(),
            tests: Vec::new(),
        }
    }
}

/// Arena of suites rooted at [`SuiteTree::ROOT`].
#[derive(Debug, Clone)]
pub struct SuiteTree {
    suites: Vec<Suite>,
}

impl SuiteTree {
    pub const ROOT: SuiteId = SuiteId(0);

    pub fn new() -> Self {
        Self {
            suites: vec![Suite::new(ROOT_SUITE_NAME.to_string())],
        }
    }

    /// Appends a new child suite to `parent` and returns its id.
    pub fn add_suite(&mut self, parent: SuiteId, name: String) -> SuiteId {
        let id = SuiteId(self.suites.len());
        self.suites.push(Suite::new(name));
        self.suites[parent.0].subsuites.push(id);
        id
    }

    /// Appends a test to `suite`.
    pub fn add_test(&mut self, suite: SuiteId, test: TestCase) {
        self.suites[suite.0].tests.push(test);
    }

    // Ids are only handed out by this tree, so indexing cannot go out of bounds.
    pub fn suite(&self, id: SuiteId) -> &Suite {
        &self.suites[id.0]
    }

    pub fn root(&self) -> &Suite {
        self.suite(Self::ROOT)
    }

    pub fn is_root(&self, id: SuiteId) -> bool {
        id == Self::ROOT
    }

    /// Number of suites excluding the root.
    pub fn suite_count(&self) -> usize {
        self.suites.len() - 1
    }

    pub fn test_count(&self) -> usize {
        self.suites.iter().map(|suite| suite.tests.len()).sum()
    }
}

impl Default for SuiteTree {
    fn default() -> Self {
        Self::new()
    }
}
