const MEAN_EARTH_RADIUS_M: f64 = 6_371_200.0;

/// Great-circle distance in meters between two coordinate pairs, using the
/// special case of the Vincenty formula for numerical accuracy.
/// Reference: https://en.wikipedia.org/wiki/Great-circle_distance
pub fn great_circle_distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1_rad, lng1_rad) = (lat1.to_radians(), lng1.to_radians());
    let (lat2_rad, lng2_rad) = (lat2.to_radians(), lng2.to_radians());

    let (lat1_sin, lat1_cos) = (lat1_rad.sin(), lat1_rad.cos());
    let (lat2_sin, lat2_cos) = (lat2_rad.sin(), lat2_rad.cos());

    let dlng = (lng1_rad - lng2_rad).abs();
    let (dlng_sin, dlng_cos) = (dlng.sin(), dlng.cos());

    let nom1 = lat2_cos * dlng_sin;
    let nom2 = lat1_cos * lat2_sin - lat1_sin * lat2_cos * dlng_cos;

    let nom = (nom1 * nom1 + nom2 * nom2).sqrt();
    let denom = lat1_sin * lat2_sin + lat1_cos * lat2_cos * dlng_cos;

    MEAN_EARTH_RADIUS_M * nom.atan2(denom)
}
