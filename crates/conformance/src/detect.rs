//! Picks a suite from a backend's self-reported vendor and version.

use kivik_driver::{fs, memory, Client, DriverError};
use thiserror::Error;
use tracing::info;

use crate::suite::SuiteId;

const APACHE: &str = "The Apache Software Foundation";

/// Vendor, optional exact version, and the suite they select. Entries with a
/// version come before the catch-all entry for the same vendor.
const COMPATIBILITY: &[(&str, Option<&str>, SuiteId)] = &[
    ("PouchDB", None, SuiteId::Pouch),
    ("IBM Cloudant", None, SuiteId::Cloudant),
    (APACHE, Some("2.0"), SuiteId::Couch20),
    (APACHE, None, SuiteId::Couch16),
    (memory::VENDOR, None, SuiteId::KivikMemory),
    (fs::VENDOR, None, SuiteId::KivikFilesystem),
];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DetectError {
    #[error("failed to query server identity")]
    ServerInfo(#[source] DriverError),

    #[error("unable to determine the test suite for vendor {vendor:?} version {version:?}")]
    UnsupportedBackend { vendor: String, version: String },
}

pub fn suite_for(vendor: &str, version: &str) -> Option<SuiteId> {
    COMPATIBILITY
        .iter()
        .find(|(v, ver, _)| *v == vendor && ver.map_or(true, |ver| ver == version))
        .map(|(_, _, suite)| *suite)
}

/// Asks `client` who it is and maps the answer to a suite.
pub async fn detect(client: &dyn Client) -> Result<SuiteId, DetectError> {
    info!("detecting target service compatibility");

    let info = client.server_info().await.map_err(DetectError::ServerInfo)?;

    let suite = suite_for(info.vendor(), info.version()).ok_or_else(|| {
        DetectError::UnsupportedBackend {
            vendor: info.vendor().to_owned(),
            version: info.version().to_owned(),
        }
    })?;

    info!(vendor = info.vendor(), version = info.version(), %suite, "detected suite");

    Ok(suite)
}
