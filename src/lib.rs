//! # roadnet
//!
//! Road-network distance resolution with cached OSRM lookups and
//! size-weighted structural metrics for spatial network snapshots.
//!
//! Distances between coordinate pairs are resolved through a three-tier
//! strategy: a cheap haversine gate answers long-range pairs directly, a
//! persistent SQLite cache answers pairs seen before, and an OSRM-compatible
//! routing service answers the rest, with successful lookups cached for the
//! next pass. Once a snapshot's graph is assembled, its connected components
//! are reduced into one size-weighted summary of density, average edge
//! distance, diameter and clustering.
//!
//! ## Example
//!
//! ```no_run
//! use roadnet::{aggregate, DistanceResolver, ResolverConfig, RoadNetwork};
//!
//! # async fn run() -> roadnet::Result<()> {
//! let resolver = DistanceResolver::new(ResolverConfig::default())?;
//!
//! let mut network = RoadNetwork::new();
//! let a = network.add_node(52.52, 13.405);
//! let b = network.add_node(52.53, 13.41);
//! let meters = resolver.resolve(52.52, 13.405, 52.53, 13.41).await?;
//! network.add_edge(a, b, meters);
//!
//! let summary = aggregate(&network, 2015)?;
//! println!("{}", serde_json::to_string_pretty(&summary).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod core;

// Re-export the public API
pub use crate::core::aggregate::{aggregate, WeightedSummary};
pub use crate::core::cache::{DistanceCache, PairKey};
pub use crate::core::error::{Error, Result};
pub use crate::core::geodesic::estimate_km;
pub use crate::core::metrics::{component_metrics, MetricsRecord};
pub use crate::core::network::{GeoNode, RoadNetwork};
pub use crate::core::osrm::RoutingClient;
pub use crate::core::resolver::{DistanceResolver, ResolverConfig};
