//! Reference data stores backing the identifier resolver.
//!
//! Stores are consulted in priority order, mirroring the calendar-holiday
//! union pattern in `convex_core::calendars::JointCalendar`: earlier entries
//! win, later entries only fill gaps.

use std::collections::HashMap;

use crate::config::ReferenceStoreConfig;
use crate::types::BondSpec;

/// A single source of validated (or fallback) bond reference data.
pub trait ReferenceStore: Send + Sync {
    /// The store's configuration (name, validated flag).
    fn config(&self) -> &ReferenceStoreConfig;

    /// Looks up a bond by its identifier (CUSIP, ISIN, or internal id).
    fn lookup(&self, identifier: &str) -> Option<BondSpec>;
}

/// An in-memory reference store keyed by identifier string.
///
/// This is the only concrete store this crate ships; production deployments
/// are expected to implement [`ReferenceStore`] against their own security
/// master (a database, a vendor feed, a file snapshot) the same way
/// `convex-ext-redb`/`convex-ext-file`/`convex-ext-json` implement storage
/// backends for `convex-engine`.
#[derive(Debug)]
pub struct StaticReferenceStore {
    config: ReferenceStoreConfig,
    records: HashMap<String, BondSpec>,
}

impl StaticReferenceStore {
    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn new(config: ReferenceStoreConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
        }
    }

    /// Inserts or replaces a record, keyed by [`BondSpec::identifier`].
    pub fn insert(&mut self, spec: BondSpec) {
        self.records.insert(spec.identifier.clone(), spec);
    }

    /// Inserts a record under an additional alias identifier (e.g. a CUSIP
    /// in addition to an ISIN), without changing the record's own
    /// `identifier` field.
    pub fn insert_alias(&mut self, alias: impl Into<String>, spec: BondSpec) {
        self.records.insert(alias.into(), spec);
    }

    /// Number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ReferenceStore for StaticReferenceStore {
    fn config(&self) -> &ReferenceStoreConfig {
        &self.config
    }

    fn lookup(&self, identifier: &str) -> Option<BondSpec> {
        self.records.get(identifier).cloned()
    }
}

/// An ordered sequence of reference stores, consulted highest-priority
/// first. The first store configured as `validated` to produce a hit wins
/// outright; validated stores are consulted before any non-validated
/// (secondary) store regardless of declaration order.
#[derive(Default)]
pub struct OrderedReferenceStore {
    stores: Vec<Box<dyn ReferenceStore>>,
}

impl OrderedReferenceStore {
    /// Creates an empty ordered store.
    #[must_use]
    pub fn new() -> Self {
        Self { stores: Vec::new() }
    }

    /// Appends a store to the priority chain.
    #[must_use]
    pub fn with_store(mut self, store: Box<dyn ReferenceStore>) -> Self {
        self.stores.push(store);
        self
    }

    /// Looks up an identifier, returning the first validated hit, or
    /// (absent one) the first secondary hit. Returns `None` plus whether any
    /// secondary store matched, so the resolver can fall through to the
    /// description parser before giving up.
    #[must_use]
    pub fn lookup(&self, identifier: &str) -> Option<(BondSpec, bool)> {
        let mut secondary_hit = None;
        for store in &self.stores {
            if let Some(spec) = store.lookup(identifier) {
                if store.config().validated {
                    return Some((spec, true));
                }
                if secondary_hit.is_none() {
                    secondary_hit = Some(spec);
                }
            }
        }
        secondary_hit.map(|spec| (spec, false))
    }
}
