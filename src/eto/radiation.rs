// Radiation-driven empirical ETO forms (methods 5, 7, 8, 9, 10, 11, 12).
// Each is the published closed-form expression; the shared solar geometry
// only enters where a latitude-dependent term is part of the formula.

use crate::eto::solar::{
    LATENT_HEAT, net_longwave, psychrometric_constant, saturation_vapor_pressure, solar_geometry,
    vapor_pressure_slope,
};
use crate::inputs::ClimatePeriod;

/// Makkink (method 5): radiation scaled by the slope/psychrometric ratio
/// with a fixed offset.
pub(crate) fn makkink(elevation: f64, climate: &[ClimatePeriod], rs: &[f64]) -> Vec<f64> {
    let gamma = psychrometric_constant(elevation);
    climate
        .iter()
        .zip(rs)
        .map(|(period, rs)| {
            let delta = slope_at_mean(period);
            (0.61 * rs * delta) / ((delta + gamma) * LATENT_HEAT) - 0.12
        })
        .collect()
}

/// Hansen 1984 (method 7): Makkink-type form with a 0.7 coefficient and
/// no offset.
pub(crate) fn hansen(elevation: f64, climate: &[ClimatePeriod], rs: &[f64]) -> Vec<f64> {
    let gamma = psychrometric_constant(elevation);
    climate
        .iter()
        .zip(rs)
        .map(|(period, rs)| {
            let delta = slope_at_mean(period);
            (0.7 * rs * delta) / ((delta + gamma) * LATENT_HEAT)
        })
        .collect()
}

/// Turc (method 8): temperature/radiation form with a dry-air correction
/// below 50% relative humidity.
pub(crate) fn turc(climate: &[ClimatePeriod], rs: &[f64], rh: &[f64]) -> Vec<f64> {
    climate
        .iter()
        .zip(rs.iter().zip(rh))
        .map(|(period, (rs, rh))| {
            let t_mean = period.t_mean();
            let aridity_correction = if *rh < 50.0 {
                1.0 + (50.0 - rh) / 70.0
            } else {
                1.0
            };
            aridity_correction * 0.013 * (t_mean / (t_mean + 15.0)) * (23.8856 * rs + 50.0)
        })
        .collect()
}

/// Priestley-Taylor (method 9): the radiation term of the combination
/// equation scaled by the 1.26 equilibrium coefficient.
pub(crate) fn priestley_taylor(
    latitude: f64,
    elevation: f64,
    climate: &[ClimatePeriod],
    rs: &[f64],
) -> Vec<f64> {
    let lat_rad = latitude.to_radians();
    let gamma = psychrometric_constant(elevation);
    climate
        .iter()
        .zip(rs)
        .enumerate()
        .map(|(r, (period, rs))| {
            let t_mean = period.t_mean();
            let ea = saturation_vapor_pressure(t_mean);
            let delta = vapor_pressure_slope(ea, t_mean);
            let geometry = solar_geometry(lat_rad, r);
            let rn = 0.77 * rs - net_longwave(period.t_max, period.t_min, ea, *rs, geometry.ra);
            1.26 * (delta / (delta + gamma)) * (rn / LATENT_HEAT)
        })
        .collect()
}

/// Jensen-Haise (method 10): temperature-scaled radiation with per-period
/// empirical C coefficients.
pub(crate) fn jensen_haise(c: &[f64], climate: &[ClimatePeriod], rs: &[f64]) -> Vec<f64> {
    climate
        .iter()
        .zip(c.iter().zip(rs))
        .map(|(period, (c, rs))| c * (rs * (0.025 * period.t_mean() + 0.08) / LATENT_HEAT))
        .collect()
}

/// Abtew (method 11): a single-coefficient fraction of solar radiation.
pub(crate) fn abtew(c: &[f64], rs: &[f64]) -> Vec<f64> {
    const KI: f64 = 0.53;
    c.iter()
        .zip(rs)
        .map(|(c, rs)| c * (KI * rs / LATENT_HEAT))
        .collect()
}

/// De Bruin (method 12): Makkink-type form with a 0.65 coefficient.
pub(crate) fn de_bruin(elevation: f64, climate: &[ClimatePeriod], rs: &[f64]) -> Vec<f64> {
    const C: f64 = 0.65;
    let gamma = psychrometric_constant(elevation);
    climate
        .iter()
        .zip(rs)
        .map(|(period, rs)| {
            let delta = slope_at_mean(period);
            (C * rs / LATENT_HEAT) * (delta / (delta + gamma))
        })
        .collect()
}

// Slope of the vapor-pressure curve at the period's mean temperature.
fn slope_at_mean(period: &ClimatePeriod) -> f64 {
    let t_mean = period.t_mean();
    vapor_pressure_slope(saturation_vapor_pressure(t_mean), t_mean)
}
