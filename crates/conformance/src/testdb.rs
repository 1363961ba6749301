//! Scratch databases owned by a single case invocation.

use std::sync::Arc;

use kivik_driver::{Client, DriverError};
use rand::random;

/// Every database a case creates starts with this prefix, so stray ones can
/// be found again by [`cleanup`](crate::cleanup::cleanup).
pub const TEST_DB_PREFIX: &str = "kivik$";

/// A fresh database name: the reserved prefix and 64 random bits in hex.
pub fn test_db_name() -> String {
    format!("{TEST_DB_PREFIX}{:016x}", random::<u64>())
}

pub fn is_test_db(name: &str) -> bool {
    name.starts_with(TEST_DB_PREFIX)
}

/// A database created under a fresh test name.
///
/// There is no async drop, so callers destroy it explicitly. Anything left
/// behind by a failed case is removed by the next cleanup run.
#[derive(Debug)]
pub struct TestDb {
    name: String,
    client: Arc<dyn Client>,
}

impl TestDb {
    pub async fn create(client: &Arc<dyn Client>) -> Result<Self, DriverError> {
        let name = test_db_name();

        client.create_db(&name).await?;

        Ok(Self {
            name,
            client: Arc::clone(client),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn destroy(self) -> Result<(), DriverError> {
        self.client.destroy_db(&self.name).await
    }
}
