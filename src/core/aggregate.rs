//! Size-weighted metric aggregation
//!
//! Reduces per-component metrics into one summary per yearly snapshot,
//! weighting each qualifying component by its node count.

use log::debug;
use serde::Serialize;

use crate::core::error::{Error, Result};
use crate::core::metrics::{component_metrics, MetricsRecord};
use crate::core::network::RoadNetwork;

/// Components below this node count are excluded from aggregation;
/// density and diameter are undefined for a single node.
const MIN_COMPONENT_NODES: usize = 2;

/// Size-weighted structural summary of one network snapshot
#[derive(Debug, Clone, Serialize)]
pub struct WeightedSummary {
    pub year: i32,
    pub density: f64,
    pub average_distance_km: f64,
    pub diameter: f64,
    pub average_clustering: f64,
    /// Node count of the full graph, excluded singletons included
    pub total_nodes: usize,
    /// Sizes of qualifying components, in component discovery order
    pub subnetwork_sizes: Vec<usize>,
}

/// Aggregate per-component metrics into a size-weighted summary for `year`.
///
/// Only components with at least two nodes participate; each contributes
/// its metrics at weight = node count. With zero qualifying components the
/// aggregation is undefined and fails with
/// [`Error::InsufficientComponents`] rather than reporting 0 or NaN.
pub fn aggregate(network: &RoadNetwork, year: i32) -> Result<WeightedSummary> {
    let mut weight_sum = 0.0;
    let mut density = 0.0;
    let mut average_distance_km = 0.0;
    let mut diameter = 0.0;
    let mut average_clustering = 0.0;
    let mut subnetwork_sizes = Vec::new();

    for component in network.components() {
        if component.len() < MIN_COMPONENT_NODES {
            continue;
        }
        let record = component_metrics(network, &component);
        let weight = component.len() as f64;

        density += record.density * weight;
        average_distance_km += record.average_distance_km * weight;
        diameter += record.diameter * weight;
        average_clustering += record.average_clustering * weight;
        weight_sum += weight;
        subnetwork_sizes.push(component.len());
    }

    if weight_sum == 0.0 {
        return Err(Error::InsufficientComponents { year });
    }

    debug!(
        "{year}: {} qualifying components over {} nodes",
        subnetwork_sizes.len(),
        network.node_count()
    );

    Ok(WeightedSummary {
        year,
        density: density / weight_sum,
        average_distance_km: average_distance_km / weight_sum,
        diameter: diameter / weight_sum,
        average_clustering: average_clustering / weight_sum,
        total_nodes: network.node_count(),
        subnetwork_sizes,
    })
}

impl WeightedSummary {
    /// Weighted metrics of the snapshot without the snapshot bookkeeping,
    /// for comparing years side by side.
    pub fn record(&self) -> MetricsRecord {
        MetricsRecord {
            density: self.density,
            average_distance_km: self.average_distance_km,
            diameter: self.diameter,
            average_clustering: self.average_clustering,
        }
    }
}
