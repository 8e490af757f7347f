//! Great-circle distance helpers.
//!
//! All coordinates are WGS84 latitude/longitude in degrees and all distances
//! are kilometers on a sphere of radius [`EARTH_RADIUS_KM`].

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two coordinates given in degrees.
///
/// The intermediate term is clamped to `[0, 1]` so coincident or antipodal
/// coordinates never produce `NaN` through rounding overshoot.
///
/// # Examples
/// ```
/// use lightmesh::geo::haversine_km;
///
/// assert_eq!(haversine_km(-8.05, -34.9, -8.05, -34.9), 0.0);
/// let d = haversine_km(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Arithmetic mean of the given `(latitude, longitude)` pairs.
///
/// Returns `None` for an empty input.
pub fn centroid<I>(coords: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (count, lat_sum, lon_sum) = coords
        .into_iter()
        .fold((0usize, 0.0, 0.0), |(n, lat, lon), (p_lat, p_lon)| {
            (n + 1, lat + p_lat, lon + p_lon)
        });

    if count == 0 {
        return None;
    }
    Some((lat_sum / count as f64, lon_sum / count as f64))
}
