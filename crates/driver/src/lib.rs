//! Backend drivers for the Kivik conformance suites
//!
//! Every backend the suites run against speaks the same small protocol: it can
//! describe itself, list its databases, and create or destroy them. This crate
//! defines that protocol as the [`Client`] trait and ships three drivers:
//!
//! - **memory**: process-local server instances, keyed by DSN host
//! - **fs**: one directory per database under a root directory
//! - **couch**: CouchDB-compatible HTTP servers
//!
//! Drivers are looked up by backend kind through [`Drivers`].

use core::fmt::Debug;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

pub mod couch;
mod error;
pub mod fs;
pub mod memory;
mod name;

pub use error::DriverError;
pub use name::validate_db_name;

/// Self-reported identity of a backend.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    vendor: String,
    version: String,
}

impl ServerInfo {
    pub fn new(vendor: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            version: version.into(),
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A live connection to a backend.
///
/// Handles are shared between concurrently running cases, so implementations
/// must synchronize any internal state themselves.
#[async_trait]
pub trait Client: Debug + Send + Sync {
    /// The DSN this client was connected with, credentials included.
    fn dsn(&self) -> &Url;

    fn is_authenticated(&self) -> bool {
        !self.dsn().username().is_empty()
    }

    async fn server_info(&self) -> Result<ServerInfo, DriverError>;

    async fn all_dbs(&self) -> Result<Vec<String>, DriverError>;

    async fn db_exists(&self, name: &str) -> Result<bool, DriverError>;

    async fn create_db(&self, name: &str) -> Result<(), DriverError>;

    async fn destroy_db(&self, name: &str) -> Result<(), DriverError>;
}

/// Opens [`Client`]s for one backend kind.
#[async_trait]
pub trait Driver: Debug + Send + Sync {
    async fn connect(&self, dsn: &Url) -> Result<Arc<dyn Client>, DriverError>;
}

/// Backend kinds mapped to the driver that serves them.
#[derive(Debug, Default)]
pub struct Drivers {
    drivers: BTreeMap<String, Arc<dyn Driver>>,
}

impl Drivers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled drivers under their usual names: `memory`, `fs` and `couch`.
    pub fn with_defaults() -> Self {
        let mut drivers = Self::new();
        drop(drivers.register(memory::DRIVER_NAME, Arc::new(memory::MemoryDriver::default())));
        drop(drivers.register(fs::DRIVER_NAME, Arc::new(fs::FsDriver)));
        drop(drivers.register(couch::DRIVER_NAME, Arc::new(couch::CouchDriver::default())));
        drivers
    }

    /// Registers `driver` under `kind`, returning the driver it replaced.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        driver: Arc<dyn Driver>,
    ) -> Option<Arc<dyn Driver>> {
        self.drivers.insert(kind.into(), driver)
    }

    pub fn get(&self, kind: &str) -> Result<&Arc<dyn Driver>, DriverError> {
        self.drivers
            .get(kind)
            .ok_or_else(|| DriverError::UnknownDriver(kind.to_owned()))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.drivers.keys().map(String::as_str)
    }

    pub async fn connect(&self, kind: &str, dsn: &Url) -> Result<Arc<dyn Client>, DriverError> {
        self.get(kind)?.connect(dsn).await
    }
}
