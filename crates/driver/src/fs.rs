//! Filesystem backend.
//!
//! The DSN path names an existing root directory; every database is a
//! subdirectory of it. Write access follows the same rule as the memory
//! backend: credentials are required to create or destroy.

use std::io::ErrorKind;
use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use percent_encoding::percent_decode_str;
use tokio::fs::{create_dir, metadata, read_dir, remove_dir_all};
use url::Url;

use crate::{validate_db_name, Client, Driver, DriverError, ServerInfo};

pub const DRIVER_NAME: &str = "fs";
pub const SCHEME: &str = "fs";
pub const VENDOR: &str = "Kivik Filesystem Adaptor";

#[derive(Clone, Copy, Debug, Default)]
pub struct FsDriver;

#[async_trait]
impl Driver for FsDriver {
    async fn connect(&self, dsn: &Url) -> Result<Arc<dyn Client>, DriverError> {
        if dsn.scheme() != SCHEME {
            return Err(DriverError::InvalidDsn(format!(
                "expected a {SCHEME}:// url, got {}://",
                dsn.scheme()
            )));
        }

        let root = percent_decode_str(dsn.path())
            .decode_utf8()
            .map(|path| Utf8PathBuf::from(path.as_ref()))
            .map_err(|err| DriverError::InvalidDsn(format!("root path is not utf-8: {err}")))?;

        let meta = metadata(&root)
            .await
            .map_err(|err| DriverError::io(format!("failed to open root {root}"), err))?;

        if !meta.is_dir() {
            return Err(DriverError::InvalidDsn(format!("{root} is not a directory")));
        }

        Ok(Arc::new(FsClient {
            dsn: dsn.clone(),
            root,
        }))
    }
}

#[derive(Debug)]
pub struct FsClient {
    dsn: Url,
    root: Utf8PathBuf,
}

impl FsClient {
    fn db_path(&self, name: &str) -> Result<Utf8PathBuf, DriverError> {
        validate_db_name(name)?;

        // Directory names cannot carry the `/` CouchDB allows.
        if name.contains('/') {
            return Err(DriverError::IllegalName(name.to_owned()));
        }

        Ok(self.root.join(name))
    }

    fn authorize(&self) -> Result<(), DriverError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(DriverError::Unauthorized)
        }
    }
}

#[async_trait]
impl Client for FsClient {
    fn dsn(&self) -> &Url {
        &self.dsn
    }

    async fn server_info(&self) -> Result<ServerInfo, DriverError> {
        Ok(ServerInfo::new(VENDOR, env!("CARGO_PKG_VERSION")))
    }

    async fn all_dbs(&self) -> Result<Vec<String>, DriverError> {
        let context = || format!("failed to list {}", self.root);

        let mut entries = read_dir(&self.root)
            .await
            .map_err(|err| DriverError::io(context(), err))?;

        let mut dbs = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| DriverError::io(context(), err))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|err| DriverError::io(context(), err))?
                .is_dir();

            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };

            if is_dir && validate_db_name(&name).is_ok() {
                dbs.push(name);
            }
        }

        dbs.sort_unstable();

        Ok(dbs)
    }

    async fn db_exists(&self, name: &str) -> Result<bool, DriverError> {
        let Ok(path) = self.db_path(name) else {
            return Ok(false);
        };

        match metadata(&path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(DriverError::io(format!("failed to stat {path}"), err)),
        }
    }

    async fn create_db(&self, name: &str) -> Result<(), DriverError> {
        self.authorize()?;
        let path = self.db_path(name)?;

        match create_dir(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(DriverError::AlreadyExists(name.to_owned()))
            }
            Err(err) => Err(DriverError::io(format!("failed to create {path}"), err)),
        }
    }

    async fn destroy_db(&self, name: &str) -> Result<(), DriverError> {
        self.authorize()?;
        let path = self.db_path(name)?;

        match remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(DriverError::NotFound(name.to_owned()))
            }
            Err(err) => Err(DriverError::io(format!("failed to remove {path}"), err)),
        }
    }
}
