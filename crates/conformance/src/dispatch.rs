use core::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use futures_util::{stream, StreamExt};
use kivik_driver::Drivers;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::case::{CaseContext, TestCase};
use crate::cleanup::{cleanup, CleanupError};
use crate::clients::{ClientFactory, ClientPair, ConnectError};
use crate::detect::{detect, DetectError};
use crate::options::RunOptions;
use crate::registry::Registry;
use crate::report::{CaseReport, RunReport};
use crate::suite::{RequestedSuite, SuiteId};


#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    #[error("invalid case name filter")]
    InvalidFilter(#[from] regex::Error),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("unable to determine server suite compatibility")]
    Detect(#[from] DetectError),

    #[error("cleanup failed")]
    Cleanup(#[from] CleanupError),
}

#[derive(Debug)]
pub enum RunSummary {
    Tests(RunReport),
    Cleanup { deleted: usize },
}

/// Case-name filter; unanchored, so `DB` matches `AllDBs` and `CreateDB`.
#[derive(Clone, Debug, Default)]
pub struct NameFilter(Option<Regex>);

impl NameFilter {
    pub fn new(pattern: Option<&str>) -> Result<Self, regex::Error> {
        match pattern {
            None | Some("") => Ok(Self(None)),
            Some(pattern) => Regex::new(pattern).map(|re| Self(Some(re))),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.0.as_ref().map_or(true, |re| re.is_match(name))
    }
}

enum Job {
    Skip(CaseReport),
    Run {
        suite: SuiteId,
        name: String,
        case: Arc<dyn TestCase>,
    },
}

/// Runs registered cases against one backend.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    factory: ClientFactory,
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(drivers: Arc<Drivers>, registry: Arc<Registry>) -> Self {
        Self {
            factory: ClientFactory::new(drivers),
            registry,
        }
    }

    pub async fn run(&self, options: &RunOptions) -> Result<RunSummary, RunError> {
        if options.cleanup {
            let client = self
                .factory
                .connect_privileged(&options.driver, &options.dsn)
                .await?;

            let deleted = cleanup(client.as_ref()).await?;

            return Ok(RunSummary::Cleanup { deleted });
        }

        let filter = NameFilter::new(options.filter.as_deref())?;

        let clients = self.factory.connect(&options.driver, &options.dsn).await?;

        let suites = resolve_suites(&options.suites, &clients).await?;

        for suite in &suites {
            if suite.driver() != options.driver {
                warn!(
                    %suite,
                    expected = suite.driver(),
                    driver = %options.driver,
                    "suite is normally run with a different driver"
                );
            }
        }

        let report = self
            .run_suites(&suites, clients, options.mutating, &filter, options.jobs)
            .await;

        Ok(RunSummary::Tests(report))
    }

    /// Runs every case of `suites`, at most `jobs` at a time.
    ///
    /// Cases the filter rejects are reported as skipped. A failing or
    /// panicking case only affects its own report.
    pub async fn run_suites(
        &self,
        suites: &BTreeSet<SuiteId>,
        clients: ClientPair,
        mutating: bool,
        filter: &NameFilter,
        jobs: usize,
    ) -> RunReport {
        info!(suites = %join(suites), mutating, "running test suites");

        let clients = Arc::new(clients);

        let planned: Vec<_> = suites
            .iter()
            .flat_map(|&suite| {
                self.registry
                    .cases_for(suite, mutating)
                    .into_iter()
                    .map(move |(name, case)| {
                        if filter.matches(name) {
                            Job::Run {
                                suite,
                                name: name.to_owned(),
                                case,
                            }
                        } else {
                            Job::Skip(CaseReport::skipped(suite, name, "does not match filter"))
                        }
                    })
            })
            .collect();

        let cases: Vec<CaseReport> = stream::iter(planned)
            .map(|job| {
                let clients = Arc::clone(&clients);
                async move {
                    match job {
                        Job::Skip(report) => report,
                        Job::Run { suite, name, case } => run_case(suite, name, case, clients).await,
                    }
                }
            })
            .buffered(jobs.max(1))
            .collect()
            .await;

        RunReport {
            suites: suites.iter().copied().collect(),
            cases,
        }
    }
}

/// The suites a request stands for.
///
/// Any `auto` entry replaces the whole request with the single suite
/// detected on the privileged connection. Otherwise the explicit suites are
/// used, each once.
pub async fn resolve_suites(
    requested: &[RequestedSuite],
    clients: &ClientPair,
) -> Result<BTreeSet<SuiteId>, DetectError> {
    let explicit: BTreeSet<_> = requested
        .iter()
        .filter_map(|requested| match requested {
            RequestedSuite::Suite(suite) => Some(*suite),
            RequestedSuite::Auto => None,
        })
        .collect();

    if !requested.contains(&RequestedSuite::Auto) {
        if explicit.is_empty() {
            warn!("no test suites requested");
        }
        return Ok(explicit);
    }

    if !explicit.is_empty() {
        warn!(ignored = %join(&explicit), "auto-detection requested, ignoring explicit suites");
    }

    let suite = detect(clients.privileged().as_ref()).await?;

    Ok(BTreeSet::from([suite]))
}

async fn run_case(
    suite: SuiteId,
    name: String,
    case: Arc<dyn TestCase>,
    clients: Arc<ClientPair>,
) -> CaseReport {
    debug!(%suite, case = %name, "running case");

    let ctx = Arc::new(CaseContext::new(suite, name));
    let started = Instant::now();

    let task = {
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move { case.execute(&clients, suite, &ctx).await })
    };

    if let Err(err) = task.await {
        if err.is_panic() {
            let payload = err.into_panic();
            ctx.error(format!("case panicked: {}", panic_message(&*payload)));
        } else {
            ctx.error("case was cancelled");
        }
    }

    ctx.finish(started.elapsed())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn join(suites: &BTreeSet<SuiteId>) -> String {
    suites
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
