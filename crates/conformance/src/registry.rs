use core::fmt;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::case::TestCase;
use crate::suite::SuiteId;

type Cases = BTreeMap<SuiteId, BTreeMap<String, Arc<dyn TestCase>>>;

/// Cases by suite and name, split into read-only and state-mutating groups.
///
/// Filled in once at startup through `&mut self`, then shared read-only
/// behind an `Arc` while suites run.
#[derive(Default)]
pub struct Registry {
    read_only: Cases,
    mutating: Cases,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `case` as `name` in `suite`.
    ///
    /// A later registration under the same suite, name and partition
    /// replaces the earlier one.
    pub fn register(
        &mut self,
        suite: SuiteId,
        name: impl Into<String>,
        mutating: bool,
        case: Arc<dyn TestCase>,
    ) {
        let cases = if mutating {
            &mut self.mutating
        } else {
            &mut self.read_only
        };

        drop(cases.entry(suite).or_default().insert(name.into(), case));
    }

    /// Read-only cases of `suite` by name, followed by its mutating cases
    /// when `include_mutating` is set.
    pub fn cases_for(
        &self,
        suite: SuiteId,
        include_mutating: bool,
    ) -> Vec<(&str, Arc<dyn TestCase>)> {
        let partitions = [Some(&self.read_only), include_mutating.then_some(&self.mutating)];

        partitions
            .into_iter()
            .flatten()
            .filter_map(|cases| cases.get(&suite))
            .flat_map(|cases| cases.iter())
            .map(|(name, case)| (name.as_str(), Arc::clone(case)))
            .collect()
    }

    /// Suites with at least one registered case.
    pub fn suites(&self) -> BTreeSet<SuiteId> {
        self.read_only
            .keys()
            .chain(self.mutating.keys())
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_only
            .values()
            .chain(self.mutating.values())
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |cases: &Cases| {
            cases
                .iter()
                .map(|(suite, cases)| (*suite, cases.keys().cloned().collect::<Vec<_>>()))
                .collect::<BTreeMap<_, _>>()
        };

        f.debug_struct("Registry")
            .field("read_only", &names(&self.read_only))
            .field("mutating", &names(&self.mutating))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::case::CaseContext;
    use crate::clients::ClientPair;

    struct Tagged(&'static str);

    #[async_trait]
    impl TestCase for Tagged {
        async fn execute(&self, _: &ClientPair, _: SuiteId, ctx: &CaseContext) {
            ctx.log(self.0);
        }
    }

    async fn tag_of(case: &Arc<dyn TestCase>) -> Vec<String> {
        let ctx = CaseContext::new(SuiteId::KivikMemory, "Tagged");
        let clients = crate::mock::client_pair();
        case.execute(&clients, SuiteId::KivikMemory, &ctx).await;
        ctx.finish(core::time::Duration::ZERO).logs
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let mut registry = Registry::new();
        registry.register(SuiteId::KivikMemory, "AllDBs", false, Arc::new(Tagged("first")));
        registry.register(SuiteId::KivikMemory, "AllDBs", false, Arc::new(Tagged("second")));

        let cases = registry.cases_for(SuiteId::KivikMemory, true);

        assert_eq!(cases.len(), 1, "duplicate registration must not add a case");
        assert_eq!(cases[0].0, "AllDBs", "case name");
        assert_eq!(tag_of(&cases[0].1).await, ["second"], "later case replaces earlier");
    }

    #[test]
    fn mutating_cases_only_when_requested() {
        let mut registry = Registry::new();
        registry.register(SuiteId::Couch20, "Read", false, Arc::new(Tagged("r")));
        registry.register(SuiteId::Couch20, "Write", true, Arc::new(Tagged("w")));

        let read_only: Vec<_> = registry
            .cases_for(SuiteId::Couch20, false)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let all: Vec<_> = registry
            .cases_for(SuiteId::Couch20, true)
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(read_only, ["Read"], "mutating case leaked");
        assert_eq!(all, ["Read", "Write"], "read-only cases come first");
    }

    #[test]
    fn same_name_in_both_partitions_is_two_cases() {
        let mut registry = Registry::new();
        registry.register(SuiteId::Couch16, "DB", false, Arc::new(Tagged("r")));
        registry.register(SuiteId::Couch16, "DB", true, Arc::new(Tagged("w")));

        assert_eq!(registry.len(), 2, "partitions are independent");
        assert_eq!(registry.cases_for(SuiteId::Couch16, true).len(), 2, "both run");
    }

    #[test]
    fn unregistered_suite_has_no_cases() {
        let mut registry = Registry::new();
        registry.register(SuiteId::Couch16, "Read", false, Arc::new(Tagged("r")));

        assert!(registry.cases_for(SuiteId::Pouch, true).is_empty(), "no cases");
        assert_eq!(
            registry.suites().into_iter().collect::<Vec<_>>(),
            [SuiteId::Couch16],
            "only suites with cases are listed"
        );
    }
}
