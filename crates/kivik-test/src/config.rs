use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result as EyreResult, WrapErr};
use kivik_conformance::RequestedSuite;
use serde::Deserialize;
use tokio::fs::read_to_string;

/// Defaults read from a TOML file. Anything given on the command line or
/// through the environment takes precedence.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub driver: Option<String>,
    pub dsn: Option<String>,
    pub suites: Option<Vec<RequestedSuite>>,
    pub rw: Option<bool>,
    #[serde(rename = "match")]
    pub filter: Option<String>,
    pub verbose: Option<bool>,
    pub jobs: Option<usize>,
    pub report: Option<Utf8PathBuf>,
}

impl FileConfig {
    pub async fn load(path: &Utf8Path) -> EyreResult<Self> {
        let contents = read_to_string(path)
            .await
            .wrap_err_with(|| format!("failed to read config file {path}"))?;

        Self::parse(&contents).wrap_err_with(|| format!("failed to parse config file {path}"))
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
