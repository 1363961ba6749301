use crate::suite::RequestedSuite;

/// Everything one invocation of the runner needs to know.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunOptions {
    /// Backend kind, e.g. `couch` or `memory`.
    pub driver: String,
    /// Connection descriptor; must carry credentials.
    pub dsn: String,
    pub suites: Vec<RequestedSuite>,
    /// Also run cases that create or destroy databases.
    pub mutating: bool,
    /// Regular expression a case name must match to run. Empty runs all.
    pub filter: Option<String>,
    pub verbose: bool,
    /// Only remove stray test databases, run no cases.
    pub cleanup: bool,
    /// Maximum number of cases in flight at once.
    pub jobs: usize,
}

impl RunOptions {
    pub fn new(driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            dsn: dsn.into(),
            suites: vec![RequestedSuite::Auto],
            mutating: false,
            filter: None,
            verbose: false,
            cleanup: false,
            jobs: 1,
        }
    }

    #[must_use]
    pub fn with_suites(mut self, suites: impl IntoIterator<Item = RequestedSuite>) -> Self {
        self.suites = suites.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_mutating(mut self, mutating: bool) -> Self {
        self.mutating = mutating;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }
}
