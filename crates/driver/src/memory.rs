//! In-process backend.
//!
//! Each distinct DSN host names one server instance; every client connected to
//! the same host shares its databases for the lifetime of the driver.
//! Anonymous clients may read, only credentialed clients may create or
//! destroy databases.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use url::Url;

use crate::{validate_db_name, Client, Driver, DriverError, ServerInfo};

pub const DRIVER_NAME: &str = "memory";
pub const SCHEME: &str = "memory";
pub const VENDOR: &str = "Kivik Memory Adaptor";

#[derive(Debug, Default)]
pub struct MemoryDriver {
    instances: Mutex<BTreeMap<String, Arc<MemoryServer>>>,
}

impl MemoryDriver {
    fn instance(&self, host: &str) -> Arc<MemoryServer> {
        Arc::clone(self.instances.lock().entry(host.to_owned()).or_default())
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn connect(&self, dsn: &Url) -> Result<Arc<dyn Client>, DriverError> {
        if dsn.scheme() != SCHEME {
            return Err(DriverError::InvalidDsn(format!(
                "expected a {SCHEME}:// url, got {}://",
                dsn.scheme()
            )));
        }

        let server = self.instance(dsn.host_str().unwrap_or_default());

        Ok(Arc::new(MemoryClient {
            dsn: dsn.clone(),
            server,
        }))
    }
}

#[derive(Debug, Default)]
struct MemoryServer {
    dbs: RwLock<BTreeSet<String>>,
}

#[derive(Debug)]
pub struct MemoryClient {
    dsn: Url,
    server: Arc<MemoryServer>,
}

impl MemoryClient {
    fn authorize(&self) -> Result<(), DriverError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(DriverError::Unauthorized)
        }
    }
}

#[async_trait]
impl Client for MemoryClient {
    fn dsn(&self) -> &Url {
        &self.dsn
    }

    async fn server_info(&self) -> Result<ServerInfo, DriverError> {
        Ok(ServerInfo::new(VENDOR, env!("CARGO_PKG_VERSION")))
    }

    async fn all_dbs(&self) -> Result<Vec<String>, DriverError> {
        Ok(self.server.dbs.read().iter().cloned().collect())
    }

    async fn db_exists(&self, name: &str) -> Result<bool, DriverError> {
        Ok(self.server.dbs.read().contains(name))
    }

    async fn create_db(&self, name: &str) -> Result<(), DriverError> {
        self.authorize()?;
        validate_db_name(name)?;

        if self.server.dbs.write().insert(name.to_owned()) {
            Ok(())
        } else {
            Err(DriverError::AlreadyExists(name.to_owned()))
        }
    }

    async fn destroy_db(&self, name: &str) -> Result<(), DriverError> {
        self.authorize()?;

        if self.server.dbs.write().remove(name) {
            Ok(())
        } else {
            Err(DriverError::NotFound(name.to_owned()))
        }
    }
}
