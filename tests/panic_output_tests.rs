//! Panic hook behavior around a pass.
//!
//! Kept in its own test binary: it replaces the process panic hook.

mod common;

use std::panic::{self, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{quiet_runner, run_captured};
use tally::{Channel, TestStatus};

static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

#[test]
#[allow(dependency_on_unit_never_type_fallback)]
fn panics_inside_bodies_bypass_the_panic_hook() {
    panic::set_hook(Box::new(|_| {
        HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }));

    let runner = quiet_runner();
    runner.describe("noisy", |s| {
        s.test("sync", || panic!("sync body"));
        s.test_async("async", || async { panic!("async body") });
        s.test("fine", || ());
    });

    let (result, output) = run_captured(&runner);
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 0);
    assert_eq!((result.passed, result.failed), (1, 2));
    assert!(matches!(
        &result.outcomes[0].status,
        TestStatus::Failed { detail, .. } if detail == "panicked: sync body"
    ));
    assert_eq!(
        output.on(Channel::Attention),
        vec![
            "✗ noisy > sync",
            "    panicked: sync body",
            "✗ noisy > async",
            "    panicked: async body",
            "",
            "Total: 3, Passed: 1, Failed: 2",
        ]
    );

    // Outside a pass the previous hook is still in charge.
    let outcome = catch_unwind(|| panic!("outside a run"));
    assert!(outcome.is_err());
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 1);
}
