use async_trait::async_trait;

use crate::case::{CaseContext, TestCase};
use crate::clients::{ClientPair, Identity};
use crate::suite::SuiteId;

/// Both identities can ask the server who it is, and get the same answer.
pub(super) struct ServerInfoCase;

#[async_trait]
impl TestCase for ServerInfoCase {
    async fn execute(&self, clients: &ClientPair, _suite: SuiteId, ctx: &CaseContext) {
        let mut answers = Vec::with_capacity(2);

        for (identity, client) in [
            (Identity::Privileged, clients.privileged()),
            (Identity::Unprivileged, clients.unprivileged()),
        ] {
            let Some(info) = ctx.check(&format!("{identity} server info"), client.server_info().await)
            else {
                continue;
            };

            if info.vendor().is_empty() {
                ctx.error(format!("{identity} server info: empty vendor"));
            }
            if info.version().is_empty() {
                ctx.error(format!("{identity} server info: empty version"));
            }

            ctx.log(format!("{identity}: {} {}", info.vendor(), info.version()));
            answers.push(info);
        }

        if let [privileged, unprivileged] = answers.as_slice() {
            if privileged != unprivileged {
                ctx.error(format!(
                    "identities disagree: {privileged:?} vs {unprivileged:?}"
                ));
            }
        }
    }
}
