//! Distance resolution pipeline
//!
//! Three-tier strategy per coordinate pair: a cheap geodesic gate for
//! long-range pairs, then the persistent cache, then a remote routing
//! lookup whose result is cached for the next pass.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};

use crate::core::cache::{DistanceCache, PairKey};
use crate::core::error::Result;
use crate::core::geodesic::estimate_km;
use crate::core::osrm::RoutingClient;

/// Configuration for distance resolution
pub struct ResolverConfig {
    /// Base URL of the OSRM-compatible routing service
    pub base_url: String,

    /// Path of the SQLite distance cache
    pub cache_path: PathBuf,

    /// Gate threshold in kilometers. Pairs whose great-circle distance
    /// exceeds this return the scaled haversine estimate directly; precise
    /// routing lookups are reserved for short-range pairs, where road
    /// distance materially diverges from the geodesic.
    pub threshold_km: f64,

    /// Per-request timeout for routing lookups
    pub request_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            cache_path: PathBuf::from("distances.db"),
            threshold_km: 100.0,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Resolves real-world travel distances for edge candidates of a spatial
/// network.
///
/// Safe to share across concurrent resolutions: distinct keys are fully
/// independent, and duplicate concurrent resolutions of one key converge on
/// a single cache row through the cache's insert-if-absent discipline.
pub struct DistanceResolver {
    cache: DistanceCache,
    client: RoutingClient,
    threshold_km: f64,
}

impl DistanceResolver {
    /// Create a resolver, opening (or creating) the distance cache.
    ///
    /// Fails with [`crate::Error::CacheUnavailable`] when the cache database
    /// cannot be opened or initialized; there is no in-memory degraded mode.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let cache = DistanceCache::open(&config.cache_path)?;
        let client = RoutingClient::new(config.base_url, config.request_timeout);
        Ok(Self {
            cache,
            client,
            threshold_km: config.threshold_km,
        })
    }

    /// Assemble a resolver from already-constructed parts.
    pub fn from_parts(cache: DistanceCache, client: RoutingClient, threshold_km: f64) -> Self {
        Self {
            cache,
            client,
            threshold_km,
        }
    }

    /// Resolve the travel distance in meters between two coordinates.
    ///
    /// Long-range pairs (geodesic estimate above the threshold) return the
    /// scaled haversine value without touching the cache or the routing
    /// service. Short-range pairs consult the cache first and fall back to
    /// one remote lookup, caching the result on success. A failed remote
    /// lookup below the threshold is an error — the approximate value is
    /// deliberately not substituted in that branch.
    pub async fn resolve(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
        let approx_km = estimate_km(lat1, lon1, lat2, lon2);

        if approx_km > self.threshold_km {
            debug!(
                "pair ({lat1:.5},{lon1:.5})-({lat2:.5},{lon2:.5}): {approx_km:.1} km, \
                 above gate, using geodesic estimate"
            );
            return Ok(approx_km * 1000.0);
        }

        let key = PairKey::new(lat1, lon1, lat2, lon2);
        if let Some(meters) = self.cache.get(&key)? {
            debug!("cache hit for ({lat1:.5},{lon1:.5})-({lat2:.5},{lon2:.5}): {meters:.0} m");
            return Ok(meters);
        }

        let meters = self.client.lookup(lat1, lon1, lat2, lon2).await.map_err(|err| {
            warn!("routing lookup failed for ({lat1:.5},{lon1:.5})-({lat2:.5},{lon2:.5}): {err}");
            err
        })?;

        // Losing a concurrent insert race is fine; the read-back keeps every
        // caller on the winner's value.
        let stored = self.cache.put(&key, meters)?;
        Ok(stored)
    }

    /// Read-only view of the underlying distance cache.
    pub fn cache(&self) -> &DistanceCache {
        &self.cache
    }
}
