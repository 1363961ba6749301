use async_trait::async_trait;

use super::anonymous_write_status;
use crate::case::{CaseContext, TestCase};
use crate::clients::ClientPair;
use crate::suite::SuiteId;
use crate::testdb::{test_db_name, TestDb};

pub(super) struct CreateDbCase;

#[async_trait]
impl TestCase for CreateDbCase {
    async fn execute(&self, clients: &ClientPair, suite: SuiteId, ctx: &CaseContext) {
        let admin = clients.privileged();

        if let Some(db) = ctx.check("create", TestDb::create(admin).await) {
            ctx.log(format!("created {}", db.name()));

            if ctx.check("exists check", admin.db_exists(db.name()).await) == Some(false) {
                ctx.error(format!("{} missing right after creation", db.name()));
            }

            if let Some(dbs) = ctx.check("listing", admin.all_dbs().await) {
                if !dbs.iter().any(|name| name == db.name()) {
                    ctx.error(format!("{} not listed after creation", db.name()));
                }
            }

            drop(ctx.expect_status(
                "duplicate create",
                admin.create_db(db.name()).await,
                Some(412),
            ));

            drop(ctx.check("destroy", db.destroy().await));
        }

        let name = test_db_name();
        let result = clients.unprivileged().create_db(&name).await;
        let created = result.is_ok();

        drop(ctx.expect_status(
            "unprivileged create",
            result,
            Some(anonymous_write_status(suite)),
        ));

        if created {
            drop(ctx.check("destroy", admin.destroy_db(&name).await));
        }
    }
}
