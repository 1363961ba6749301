use core::fmt::Write;
use core::time::Duration;

use eyre::{bail, Result as EyreResult};
use serde::Serialize;

use crate::suite::SuiteId;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum Outcome {
    Passed,
    Failed(Vec<String>),
    Skipped(String),
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub suite: SuiteId,
    pub name: String,
    pub outcome: Outcome,
    pub logs: Vec<String>,
    pub elapsed: Duration,
}

impl CaseReport {
    pub(crate) fn skipped(suite: SuiteId, name: &str, reason: impl Into<String>) -> Self {
        Self {
            suite,
            name: name.to_owned(),
            outcome: Outcome::Skipped(reason.into()),
            logs: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.suite, self.name)
    }
}

/// Outcome of every case in one run, in execution order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub suites: Vec<SuiteId>,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.cases.iter().filter(|case| pred(&case.outcome)).count()
    }

    pub fn case(&self, suite: SuiteId, name: &str) -> Option<&CaseReport> {
        self.cases
            .iter()
            .find(|case| case.suite == suite && case.name == name)
    }

    pub fn result(&self) -> EyreResult<()> {
        let errors: Vec<_> = self
            .cases
            .iter()
            .filter_map(|case| match &case.outcome {
                Outcome::Failed(errors) => {
                    Some(format!("{}: {}", case.full_name(), errors.join("; ")))
                }
                Outcome::Passed | Outcome::Skipped(_) => None,
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            bail!("{} test case(s) failed: {:?}", errors.len(), errors)
        }
    }

    pub fn to_markdown(&self) -> Result<String, core::fmt::Error> {
        let mut markdown = String::new();

        writeln!(&mut markdown, "## Conformance report")?;
        writeln!(&mut markdown)?;
        writeln!(
            &mut markdown,
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        )?;

        for suite in &self.suites {
            writeln!(&mut markdown)?;
            writeln!(&mut markdown, "### Suite: {suite}")?;
            writeln!(&mut markdown)?;
            writeln!(&mut markdown, "| Case | Result | Time | Detail |")?;
            writeln!(&mut markdown, "| :--- | :---: | ---: | :--- |")?;

            for case in self.cases.iter().filter(|case| case.suite == *suite) {
                let (result, detail) = match &case.outcome {
                    Outcome::Passed => (":white_check_mark:", String::new()),
                    Outcome::Failed(errors) => (":x:", errors.join("<br>")),
                    Outcome::Skipped(reason) => (":fast_forward:", reason.clone()),
                };

                writeln!(
                    &mut markdown,
                    "| {} | {result} | {:.3}s | {} |",
                    case.name,
                    case.elapsed.as_secs_f64(),
                    detail.replace('|', "\\|")
                )?;
            }
        }

        Ok(markdown)
    }
}
