use core::fmt::{Debug, Display};
use core::time::Duration;

use async_trait::async_trait;
use kivik_driver::DriverError;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::clients::ClientPair;
use crate::report::{CaseReport, Outcome};
use crate::suite::SuiteId;

/// A single named conformance test.
///
/// Cases signal failure through the [`CaseContext`] rather than a return
/// value, so one case can record several independent failures.
#[async_trait]
pub trait TestCase: Send + Sync {
    async fn execute(&self, clients: &ClientPair, suite: SuiteId, ctx: &CaseContext);
}

#[derive(Debug, Default)]
struct CaseState {
    logs: Vec<String>,
    errors: Vec<String>,
    skipped: Option<String>,
}

/// Reporting handle for one case invocation.
#[derive(Debug)]
pub struct CaseContext {
    suite: SuiteId,
    name: String,
    state: Mutex<CaseState>,
}

impl CaseContext {
    pub fn new(suite: SuiteId, name: impl Into<String>) -> Self {
        Self {
            suite,
            name: name.into(),
            state: Mutex::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(suite = %self.suite, case = %self.name, "{message}");
        self.state.lock().logs.push(message);
    }

    /// Marks the case failed and keeps going.
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(suite = %self.suite, case = %self.name, "{message}");
        self.state.lock().errors.push(message);
    }

    /// Marks the case skipped. Errors recorded before or after still fail it.
    pub fn skip(&self, reason: impl Into<String>) {
        self.state.lock().skipped = Some(reason.into());
    }

    pub fn failed(&self) -> bool {
        !self.state.lock().errors.is_empty()
    }

    /// Records an error for a failed `what` and hands back the success value.
    pub fn check<T, E: Display>(&self, what: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.error(format!("{what}: {err}"));
                None
            }
        }
    }

    /// Asserts that `result` failed with `expected`, or succeeded when
    /// `expected` is `None`.
    pub fn expect_status<T: Debug>(
        &self,
        what: &str,
        result: Result<T, DriverError>,
        expected: Option<u16>,
    ) -> Option<T> {
        match (result, expected) {
            (Ok(value), None) => Some(value),
            (Ok(value), Some(status)) => {
                self.error(format!(
                    "{what}: expected status {status}, but it succeeded with {value:?}"
                ));
                None
            }
            (Err(err), None) => {
                self.error(format!("{what}: unexpected error: {err}"));
                None
            }
            (Err(err), Some(status)) => {
                if err.status() != Some(status) {
                    self.error(format!("{what}: expected status {status}, got: {err}"));
                }
                None
            }
        }
    }

    pub(crate) fn finish(&self, elapsed: Duration) -> CaseReport {
        let state = core::mem::take(&mut *self.state.lock());

        let outcome = if !state.errors.is_empty() {
            Outcome::Failed(state.errors)
        } else if let Some(reason) = state.skipped {
            Outcome::Skipped(reason)
        } else {
            Outcome::Passed
        };

        CaseReport {
            suite: self.suite,
            name: self.name.clone(),
            outcome,
            logs: state.logs,
            elapsed,
        }
    }
}
