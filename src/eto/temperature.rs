// Temperature/daylight ETO forms (methods 4 and 6). Neither needs
// radiation or humidity measurements; the latitude fixes the daylight
// geometry instead.

use crate::eto::solar::{LATENT_HEAT, solar_geometry};
use crate::inputs::{ClimatePeriod, PERIODS_PER_YEAR, period_days};

/**
FAO Blaney-Criddle (method 4).

The daylight percentage `p` of each period is derived from the sunset
hour angle, so only the latitude, the per-period C coefficients and the
temperature series are needed.

# Returns
Daily reference evapotranspiration per period [mm/day].
*/
pub(crate) fn blaney_criddle(latitude: f64, c: &[f64], climate: &[ClimatePeriod]) -> Vec<f64> {
    let lat_rad = latitude.to_radians();
    let daylight: Vec<f64> = (0..PERIODS_PER_YEAR)
        .map(|r| solar_geometry(lat_rad, r).daylight_hours)
        .collect();
    // Annual daytime hours, weighting the short closing period
    let yearly_daylight: f64 = daylight
        .iter()
        .enumerate()
        .map(|(r, n)| n * period_days(r))
        .sum();
    climate
        .iter()
        .enumerate()
        .map(|(r, period)| {
            let p = 100.0 * daylight[r] / yearly_daylight;
            c[r] * p * (0.46 * period.t_mean() + 8.0)
        })
        .collect()
}

/// Hargreaves (method 6): extraterrestrial radiation scaled by the mean
/// temperature and the temperature spread.
pub(crate) fn hargreaves(latitude: f64, climate: &[ClimatePeriod]) -> Vec<f64> {
    let lat_rad = latitude.to_radians();
    climate
        .iter()
        .enumerate()
        .map(|(r, period)| {
            let ra = solar_geometry(lat_rad, r).ra;
            0.0023
                * (ra / LATENT_HEAT)
                * (period.t_mean() + 17.8)
                * (period.t_max - period.t_min).sqrt()
        })
        .collect()
}
