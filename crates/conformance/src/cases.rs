//! The bundled case catalogue.

use std::sync::Arc;

use crate::registry::Registry;
use crate::suite::SuiteId;

mod all_dbs;
mod create_db;
mod db_exists;
mod destroy_db;
mod server_info;

use all_dbs::AllDbsCase;
use create_db::CreateDbCase;
use db_exists::DbExistsCase;
use destroy_db::DestroyDbCase;
use server_info::ServerInfoCase;

/// Suites the bundled drivers can serve.
pub const BUILTIN_SUITES: [SuiteId; 6] = [
    SuiteId::KivikMemory,
    SuiteId::KivikFilesystem,
    SuiteId::Couch16,
    SuiteId::Couch20,
    SuiteId::Cloudant,
    SuiteId::KivikServer,
];

/// Registers every bundled case for every suite in [`BUILTIN_SUITES`].
pub fn register_all(registry: &mut Registry) {
    for suite in BUILTIN_SUITES {
        registry.register(suite, "ServerInfo", false, Arc::new(ServerInfoCase));
        registry.register(suite, "AllDBs", false, Arc::new(AllDbsCase));
        registry.register(suite, "DBExists", false, Arc::new(DbExistsCase));
        registry.register(suite, "CreateDB", true, Arc::new(CreateDbCase));
        registry.register(suite, "DestroyDB", true, Arc::new(DestroyDbCase));
    }
}

/// Status an anonymous client gets when it lists databases, `None` when
/// listing is open.
const fn anonymous_list_status(suite: SuiteId) -> Option<u16> {
    match suite {
        SuiteId::Cloudant | SuiteId::KivikServer => Some(401),
        SuiteId::Pouch
        | SuiteId::PouchRemote
        | SuiteId::Couch16
        | SuiteId::Couch20
        | SuiteId::KivikMemory
        | SuiteId::KivikFilesystem => None,
    }
}

/// Status an anonymous client gets when it creates or destroys a database.
const fn anonymous_write_status(suite: SuiteId) -> u16 {
    match suite {
        SuiteId::Cloudant => 403,
        SuiteId::Pouch
        | SuiteId::PouchRemote
        | SuiteId::Couch16
        | SuiteId::Couch20
        | SuiteId::KivikServer
        | SuiteId::KivikMemory
        | SuiteId::KivikFilesystem => 401,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_suite_gets_the_full_catalogue() {
        let mut registry = Registry::new();
        register_all(&mut registry);

        for suite in BUILTIN_SUITES {
            let read_only: Vec<_> = registry
                .cases_for(suite, false)
                .into_iter()
                .map(|(name, _)| name)
                .collect();
            let all: Vec<_> = registry
                .cases_for(suite, true)
                .into_iter()
                .map(|(name, _)| name)
                .collect();

            assert_eq!(read_only, ["AllDBs", "DBExists", "ServerInfo"], "{suite}");
            assert_eq!(
                all,
                ["AllDBs", "DBExists", "ServerInfo", "CreateDB", "DestroyDB"],
                "{suite}"
            );
        }

        assert!(
            registry.cases_for(SuiteId::Pouch, true).is_empty(),
            "no bundled pouch driver"
        );
    }
}
