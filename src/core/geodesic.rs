//! Great-circle distance estimation
//!
//! Cheap geodesic approximation used to gate remote routing lookups.

/// Mean Earth radius in kilometers, matching the haversine convention
/// the cached distances were produced against.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two coordinates, in kilometers.
///
/// Pure and total over valid degree ranges: zero for identical points,
/// symmetric in its arguments, never negative, and bounded by the
/// antipodal maximum (~20015 km).
pub fn estimate_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // asin form is well-conditioned for the short ranges the gate cares about
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}
