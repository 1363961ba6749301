use async_trait::async_trait;

use super::anonymous_write_status;
use crate::case::{CaseContext, TestCase};
use crate::clients::ClientPair;
use crate::suite::SuiteId;
use crate::testdb::{test_db_name, TestDb};

pub(super) struct DestroyDbCase;

#[async_trait]
impl TestCase for DestroyDbCase {
    async fn execute(&self, clients: &ClientPair, suite: SuiteId, ctx: &CaseContext) {
        let admin = clients.privileged();

        if let Some(db) = ctx.check("create", TestDb::create(admin).await) {
            let result = clients.unprivileged().destroy_db(db.name()).await;
            drop(ctx.expect_status(
                "unprivileged destroy",
                result,
                Some(anonymous_write_status(suite)),
            ));

            let name = db.name().to_owned();

            if ctx.check("destroy", db.destroy().await).is_some()
                && ctx.check("exists check", admin.db_exists(&name).await) == Some(true)
            {
                ctx.error(format!("{name} still exists after destroy"));
            }
        }

        drop(ctx.expect_status(
            "destroy missing",
            admin.destroy_db(&test_db_name()).await,
            Some(404),
        ));
    }
}
