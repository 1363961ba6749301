use clap::ValueEnum;
use kivik_conformance::{CaseReport, Outcome, RunReport};

#[derive(Clone, Copy, Debug)]
pub struct OutputWriter {
    format: OutputFormat,
    verbose: bool,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    #[default]
    PlainText,
}

impl OutputWriter {
    pub const fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    pub fn write_str(self, line: &str) {
        match self.format {
            OutputFormat::Markdown => println!("{line}  "),
            OutputFormat::PlainText => println!("{line}"),
        }
    }

    pub fn write_header(self, header: &str, level: usize) {
        match self.format {
            OutputFormat::Markdown => println!("{} {}  ", "#".repeat(level), header),
            OutputFormat::PlainText => {
                println!(
                    "{}{}{}",
                    "-".repeat(level * 5),
                    header,
                    "-".repeat(level * 5),
                );
            }
        }
    }

    /// One line per case, then its errors. Logs only when verbose.
    pub fn write_case(self, case: &CaseReport) {
        let (status, details): (_, &[String]) = match &case.outcome {
            Outcome::Passed => ("PASS", &[]),
            Outcome::Failed(errors) => ("FAIL", errors),
            Outcome::Skipped(reason) => ("SKIP", core::slice::from_ref(reason)),
        };

        self.write_str(&format!(
            "{status} {} ({:.3}s)",
            case.full_name(),
            case.elapsed.as_secs_f64()
        ));

        for detail in details {
            self.write_str(&format!("    {detail}"));
        }

        if self.verbose {
            for line in &case.logs {
                self.write_str(&format!("    | {line}"));
            }
        }
    }

    pub fn write_report(self, report: &RunReport) {
        for suite in &report.suites {
            self.write_header(&format!("Suite {suite}"), 2);

            for case in report.cases.iter().filter(|case| case.suite == *suite) {
                self.write_case(case);
            }
        }

        self.write_str(&format!(
            "{} passed, {} failed, {} skipped",
            report.passed(),
            report.failed(),
            report.skipped()
        ));
    }
}
