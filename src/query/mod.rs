mod options;
mod resolve;

use tracing::debug;

pub use options::{FilterOption, filter_options, pivot_predicates};
pub use resolve::{OVERSIZE_NODE_LIMIT, Subgraph, SubgraphStatus, resolve_subgraph};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    Instrument,
    Orchestra,
    School,
}

impl PredicateKind {
    pub const ALL: [Self; 3] = [Self::Instrument, Self::Orchestra, Self::School];

    pub fn label(self) -> &'static str {
        match self {
            Self::Instrument => "instrument",
            Self::Orchestra => "orchestra",
            Self::School => "school",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub id: PredicateId,
    pub kind: PredicateKind,
    pub value: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    pub fn label(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Ordered filter criteria sharing one AND/OR combinator.
///
/// Identifiers come from a counter owned by the set and are never reused.
/// `revision` changes on every mutation so derived state can tell it is stale.
#[derive(Clone, Debug)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
    combinator: Combinator,
    next_id: u64,
    revision: u64,
}

impl Default for PredicateSet {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            combinator: Combinator::And,
            next_id: 1,
            revision: 0,
        }
    }
}

impl PredicateSet {
    pub const DEFAULT_PREDICATES: [(PredicateKind, &'static str); 2] = [
        (PredicateKind::School, "Northwestern University"),
        (PredicateKind::Instrument, "violin"),
    ];

    /// The initial criteria applied once after the network loads.
    pub fn with_defaults() -> Self {
        let mut set = Self::default();
        set.replace_all(
            Self::DEFAULT_PREDICATES
                .iter()
                .map(|(kind, value)| (*kind, (*value).to_owned())),
        );
        set
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, kind: PredicateKind, value: &str) -> bool {
        self.predicates
            .iter()
            .any(|predicate| predicate.kind == kind && predicate.value == value)
    }

    pub fn values_of(&self, kind: PredicateKind) -> impl Iterator<Item = &str> + '_ {
        self.predicates
            .iter()
            .filter(move |predicate| predicate.kind == kind)
            .map(|predicate| predicate.value.as_str())
    }

    fn allocate_id(&mut self) -> PredicateId {
        let id = PredicateId(self.next_id);
        self.next_id += 1;
        id
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn add(&mut self, kind: PredicateKind, value: impl Into<String>) -> PredicateId {
        let id = self.allocate_id();
        let value = value.into();
        debug!(kind = kind.label(), value = %value, "predicate added");
        self.predicates.push(Predicate { id, kind, value });
        self.touch();
        id
    }

    pub fn remove(&mut self, id: PredicateId) {
        let before = self.predicates.len();
        self.predicates.retain(|predicate| predicate.id != id);
        if self.predicates.len() != before {
            debug!(?id, "predicate removed");
            self.touch();
        }
    }

    pub fn replace_all(&mut self, predicates: impl IntoIterator<Item = (PredicateKind, String)>) {
        let mut next = Vec::new();
        for (kind, value) in predicates {
            let id = self.allocate_id();
            next.push(Predicate { id, kind, value });
        }
        debug!(count = next.len(), "predicate set replaced");
        self.predicates = next;
        self.touch();
    }

    pub fn set_combinator(&mut self, combinator: Combinator) {
        if self.combinator != combinator {
            self.combinator = combinator;
            self.touch();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn defaults_use_fixed_sequence() {
        let set = PredicateSet::with_defaults();
        let ids = set.predicates().iter().map(|p| p.id).collect::<Vec<_>>();

        assert_eq!(ids, vec![PredicateId(1), PredicateId(2)]);
        assert_eq!(set.predicates()[0].kind, PredicateKind::School);
        assert_eq!(set.predicates()[1].value, "violin");
        assert_eq!(set.combinator(), Combinator::And);
    }

    #[test]
    fn ids_stay_unique_across_replacements() {
        let mut set = PredicateSet::with_defaults();
        let mut seen = set
            .predicates()
            .iter()
            .map(|p| p.id)
            .collect::<HashSet<_>>();

        for _ in 0..3 {
            let id = set.add(PredicateKind::Instrument, "cello");
            assert!(seen.insert(id));
            set.replace_all([(PredicateKind::School, "Juilliard".to_owned())]);
            assert!(seen.insert(set.predicates()[0].id));
        }
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let mut set = PredicateSet::default();
        let id = set.add(PredicateKind::Orchestra, "Boston Symphony Orchestra");
        set.remove(id);
        let revision = set.revision();

        set.remove(id);
        assert_eq!(set.revision(), revision);
        assert!(set.is_empty());
    }

    #[test]
    fn every_mutation_bumps_revision() {
        let mut set = PredicateSet::default();
        let start = set.revision();

        let id = set.add(PredicateKind::Instrument, "violin");
        assert!(set.revision() > start);

        let after_add = set.revision();
        set.set_combinator(Combinator::Or);
        assert!(set.revision() > after_add);

        let after_toggle = set.revision();
        set.set_combinator(Combinator::Or);
        assert_eq!(set.revision(), after_toggle);

        set.remove(id);
        assert!(set.revision() > after_toggle);
    }

    #[test]
    fn values_of_filters_by_kind_in_order() {
        let mut set = PredicateSet::default();
        set.add(PredicateKind::Instrument, "violin");
        set.add(PredicateKind::School, "Juilliard");
        set.add(PredicateKind::Instrument, "viola");

        let instruments = set.values_of(PredicateKind::Instrument).collect::<Vec<_>>();
        assert_eq!(instruments, vec!["violin", "viola"]);
        assert!(set.contains(PredicateKind::School, "Juilliard"));
        assert!(!set.contains(PredicateKind::Orchestra, "Juilliard"));
    }
}
