use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// Name of the pseudo-suite that asks for runtime detection.
pub const AUTO: &str = "auto";

/// A named group of cases written for one backend family or version.
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SuiteId {
    Pouch,
    PouchRemote,
    Couch16,
    Couch20,
    Cloudant,
    KivikServer,
    KivikMemory,
    KivikFilesystem,
}

impl SuiteId {
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// The backend kind this suite is normally run with.
    pub const fn driver(self) -> &'static str {
        match self {
            Self::Pouch | Self::PouchRemote => "pouch",
            Self::Couch16 | Self::Couch20 | Self::Cloudant | Self::KivikServer => "couch",
            Self::KivikMemory => "memory",
            Self::KivikFilesystem => "fs",
        }
    }
}

/// Every name a suite request may use: `auto` first, then each suite.
pub fn list_suites() -> impl Iterator<Item = RequestedSuite> {
    [RequestedSuite::Auto]
        .into_iter()
        .chain(SuiteId::all().map(RequestedSuite::Suite))
}

#[derive(Debug, Error)]
#[error("unknown test suite {0:?}")]
pub struct UnknownSuite(pub String);

/// One entry of a requested suite list: a concrete suite or `auto`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum RequestedSuite {
    Auto,
    Suite(SuiteId),
}

impl FromStr for RequestedSuite {
    type Err = UnknownSuite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == AUTO {
            return Ok(Self::Auto);
        }

        SuiteId::from_str(s)
            .map(Self::Suite)
            .map_err(|_| UnknownSuite(s.to_owned()))
    }
}

impl TryFrom<String> for RequestedSuite {
    type Error = UnknownSuite;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequestedSuite> for String {
    fn from(value: RequestedSuite) -> Self {
        value.to_string()
    }
}

impl From<SuiteId> for RequestedSuite {
    fn from(value: SuiteId) -> Self {
        Self::Suite(value)
    }
}

impl fmt::Display for RequestedSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str(AUTO),
            Self::Suite(suite) => f.write_str(suite.as_ref()),
        }
    }
}
