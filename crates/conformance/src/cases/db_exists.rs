use async_trait::async_trait;

use crate::case::{CaseContext, TestCase};
use crate::clients::{ClientPair, Identity};
use crate::suite::SuiteId;
use crate::testdb::test_db_name;

/// A name nobody created does not exist, whoever asks.
pub(super) struct DbExistsCase;

#[async_trait]
impl TestCase for DbExistsCase {
    async fn execute(&self, clients: &ClientPair, _suite: SuiteId, ctx: &CaseContext) {
        let name = test_db_name();

        for (identity, client) in [
            (Identity::Privileged, clients.privileged()),
            (Identity::Unprivileged, clients.unprivileged()),
        ] {
            let what = format!("{identity} exists check for {name}");

            if ctx.check(&what, client.db_exists(&name).await) == Some(true) {
                ctx.error(format!("{what}: reported a database that was never created"));
            }
        }
    }
}
