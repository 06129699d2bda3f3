//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use tally::{OutputBuffer, ReportConfig, RunResult, Runner};

/// A runner that never colors its output.
pub fn quiet_runner() -> Runner {
    Runner::with_config(ReportConfig { use_colors: false })
}

/// Runs `runner` once into a fresh buffer.
pub fn run_captured(runner: &Runner) -> (RunResult, OutputBuffer) {
    let mut output = OutputBuffer::new();
    let result = runner.run_blocking_with(&mut output);
    (result, output)
}

/// Paths of every executed test, in execution order.
pub fn paths(result: &RunResult) -> Vec<&str> {
    result.outcomes.iter().map(|o| o.path.as_str()).collect()
}

/// Shared, append-only log that test bodies write side effects into.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

/// A future that stays pending for `ticks` polls before completing.
pub struct Delay {
    remaining: u32,
}

pub fn delay(ticks: u32) -> Delay {
    Delay { remaining: ticks }
}

impl Future for Delay {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.remaining == 0 {
            return Poll::Ready(());
        }
        self.remaining -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
