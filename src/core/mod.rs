//! Core library modules for roadnet
//!
//! This module contains the internal implementation details of the roadnet library.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod geodesic;
pub mod metrics;
pub mod network;
pub mod osrm;
pub mod resolver;

// Re-export main types for internal use
pub use cache::{DistanceCache, PairKey};
pub use resolver::{DistanceResolver, ResolverConfig};
