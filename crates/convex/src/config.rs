//! Ambient configuration for the facade engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a single reference store backing the identifier
/// resolver, in priority order (earlier entries win on conflicting hits).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceStoreConfig {
    /// Human-readable name, used in logs and `overrides_applied` reporting.
    pub name: String,
    /// Whether hits from this store are treated as validated (skip the
    /// description parser) or merely a fallback.
    pub validated: bool,
}

impl ReferenceStoreConfig {
    /// Creates a validated primary store configuration.
    #[must_use]
    pub fn validated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validated: true,
        }
    }

    /// Creates an unvalidated secondary/fallback store configuration.
    #[must_use]
    pub fn secondary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validated: false,
        }
    }
}

/// Top-level configuration for a [`crate::ConvexEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reference stores consulted by the resolver, in priority order.
    pub reference_stores: Vec<ReferenceStoreConfig>,
    /// How often the published treasury curve snapshot is considered fresh
    /// before a refresh is expected. Purely advisory: the engine does not
    /// spawn a background refresh task; callers decide when to call
    /// [`crate::curve_store::TreasuryCurveStore::publish`].
    #[serde(with = "duration_secs")]
    pub curve_refresh: Duration,
    /// Default settlement lag (business days) used when a bond's
    /// conventions do not specify one.
    pub default_settlement_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_stores: vec![ReferenceStoreConfig::validated("primary")],
            curve_refresh: Duration::from_secs(3600),
            default_settlement_days: 1,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
