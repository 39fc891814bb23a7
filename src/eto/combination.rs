// Penman-Monteith combination family (methods 1-3). The three variants
// differ only in where the solar radiation term comes from: measured,
// estimated from sunshine duration, or estimated from the temperature
// spread.

use crate::eto::solar::{
    LATENT_HEAT, net_longwave, psychrometric_constant, saturation_vapor_pressure, solar_geometry,
    vapor_pressure_slope,
};
use crate::inputs::ClimatePeriod;

/**
FAO combined Penman-Monteith with measured solar radiation (method 1).

# Arguments
* `latitude` - Latitude [decimal degrees].
* `elevation` - Elevation above sea level [m].
* `climate` - 36 periods of temperature extremes.
* `rh`, `ws`, `rs` - Per-period relative humidity [%], wind speed [m/s]
  and measured solar radiation [MJ/m2/day].

# Returns
Daily reference evapotranspiration per period [mm/day].
*/
pub(crate) fn fao_combined_pm(
    latitude: f64,
    elevation: f64,
    climate: &[ClimatePeriod],
    rh: &[f64],
    ws: &[f64],
    rs: &[f64],
) -> Vec<f64> {
    let lat_rad = latitude.to_radians();
    let gamma = psychrometric_constant(elevation);
    climate
        .iter()
        .enumerate()
        .map(|(r, period)| {
            let geometry = solar_geometry(lat_rad, r);
            combination_period(period, rh[r], ws[r], rs[r], geometry.ra, gamma)
        })
        .collect()
}

/// Penman-Monteith with solar radiation estimated from bright sunshine
/// duration via the Angstrom relation (method 2).
pub(crate) fn pm_sunshine(
    latitude: f64,
    elevation: f64,
    climate: &[ClimatePeriod],
    rh: &[f64],
    ws: &[f64],
    sh: &[f64],
) -> Vec<f64> {
    let lat_rad = latitude.to_radians();
    let gamma = psychrometric_constant(elevation);
    climate
        .iter()
        .enumerate()
        .map(|(r, period)| {
            let geometry = solar_geometry(lat_rad, r);
            let rs = (0.25 + 0.50 * sh[r] / geometry.daylight_hours) * geometry.ra;
            combination_period(period, rh[r], ws[r], rs, geometry.ra, gamma)
        })
        .collect()
}

/// Penman-Monteith without radiation measurements: solar radiation is
/// estimated from the temperature spread (method 3).
pub(crate) fn pm_no_radiation(
    latitude: f64,
    elevation: f64,
    climate: &[ClimatePeriod],
    rh: &[f64],
    ws: &[f64],
) -> Vec<f64> {
    let lat_rad = latitude.to_radians();
    let gamma = psychrometric_constant(elevation);
    climate
        .iter()
        .enumerate()
        .map(|(r, period)| {
            let geometry = solar_geometry(lat_rad, r);
            let rs = 0.16 * (period.t_max - period.t_min).sqrt() * (geometry.ra / LATENT_HEAT);
            combination_period(period, rh[r], ws[r], rs, geometry.ra, gamma)
        })
        .collect()
}

// One period of the combination equation: radiation term plus aerodynamic
// term over the wind-corrected denominator.
fn combination_period(
    period: &ClimatePeriod,
    rh: f64,
    ws: f64,
    rs: f64,
    ra: f64,
    gamma: f64,
) -> f64 {
    let t_mean = period.t_mean();
    let es = (saturation_vapor_pressure(period.t_max) + saturation_vapor_pressure(period.t_min))
        / 2.0;
    let ea = rh / 100.0 * es;
    let delta = vapor_pressure_slope(ea, t_mean);

    let rns = 0.77 * rs;
    let rnl = net_longwave(period.t_max, period.t_min, ea, rs, ra);
    let rn = rns - rnl;

    let radiation_term = 0.408 * delta * rn;
    let aerodynamic_term = 900.0 * gamma * ws * (es - ea) / (t_mean + 273.0);
    let denominator = delta + gamma * (1.0 + 0.34 * ws);
    (radiation_term + aerodynamic_term) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warm_humid_climate() -> Vec<ClimatePeriod> {
        vec![ClimatePeriod::new(32.0, 18.0); 36]
    }

    #[test]
    fn measured_radiation_gives_positive_periods() {
        let climate = warm_humid_climate();
        let rh = vec![60.0; 36];
        let ws = vec![2.0; 36];
        let rs = vec![15.0; 36];
        let eto = fao_combined_pm(30.0, 200.0, &climate, &rh, &ws, &rs);
        assert_eq!(eto.len(), 36);
        for value in &eto {
            assert!(*value > 0.0 && value.is_finite(), "got {value}");
        }
    }

    #[test]
    fn sunshine_variant_tracks_daylight() {
        let climate = warm_humid_climate();
        let rh = vec![60.0; 36];
        let ws = vec![2.0; 36];
        let short = pm_sunshine(30.0, 200.0, &climate, &rh, &ws, &vec![4.0; 36]);
        let long = pm_sunshine(30.0, 200.0, &climate, &rh, &ws, &vec![10.0; 36]);
        for (s, l) in short.iter().zip(&long) {
            assert!(l > s, "more sunshine must raise the estimate");
        }
    }

    #[test]
    fn no_radiation_variant_is_finite_for_normal_spreads() {
        let climate = warm_humid_climate();
        let rh = vec![60.0; 36];
        let ws = vec![2.0; 36];
        let eto = pm_no_radiation(30.0, 200.0, &climate, &rh, &ws);
        for value in &eto {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn drier_air_raises_the_aerodynamic_term() {
        let climate = warm_humid_climate();
        let ws = vec![2.0; 36];
        let rs = vec![15.0; 36];
        let humid = fao_combined_pm(30.0, 200.0, &climate, &vec![80.0; 36], &ws, &rs);
        let dry = fao_combined_pm(30.0, 200.0, &climate, &vec![30.0; 36], &ws, &rs);
        assert!(dry[0] > humid[0]);
    }
}
