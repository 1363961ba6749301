use async_trait::async_trait;

use super::anonymous_list_status;
use crate::case::{CaseContext, TestCase};
use crate::clients::ClientPair;
use crate::suite::SuiteId;

pub(super) struct AllDbsCase;

#[async_trait]
impl TestCase for AllDbsCase {
    async fn execute(&self, clients: &ClientPair, suite: SuiteId, ctx: &CaseContext) {
        if let Some(dbs) = ctx.check("privileged listing", clients.privileged().all_dbs().await) {
            ctx.log(format!("{} database(s)", dbs.len()));

            if dbs.windows(2).any(|pair| pair[0] >= pair[1]) {
                ctx.error(format!("listing is not sorted and unique: {dbs:?}"));
            }
        }

        drop(ctx.expect_status(
            "unprivileged listing",
            clients.unprivileged().all_dbs().await,
            anonymous_list_status(suite),
        ));
    }
}
