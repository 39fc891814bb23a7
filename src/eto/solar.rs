// Solar geometry and psychrometric helpers shared by the ETO calculators.
// All trigonometric arguments are radians; latitude is converted once by the
// caller via `f64::to_radians`.

/// Latent heat of vaporization [MJ/kg].
pub(crate) const LATENT_HEAT: f64 = 2.4536;

// Mid-period day of the year of a ten-day period (period 0 -> day 5).
pub(crate) fn day_of_year(period: usize) -> f64 {
    10.0 * (period as f64 + 1.0) - 5.0
}

/// Latitude-dependent radiation terms of one ten-day period.
pub(crate) struct SolarGeometry {
    pub ra: f64,             // Extraterrestrial radiation [MJ/m2/day]
    pub daylight_hours: f64, // Maximum possible sunshine duration N [h/day]
}

pub(crate) fn solar_geometry(latitude_rad: f64, period: usize) -> SolarGeometry {
    let j = day_of_year(period);
    let declination = 0.409 * (0.0172 * j - 1.39).sin();
    let distance_factor = 1.0 + 0.033 * (0.0172 * j).cos();
    // The argument leaves [-1, 1] beyond the polar circles (polar day/night)
    let cos_sunset = (-latitude_rad.tan() * declination.tan()).clamp(-1.0, 1.0);
    let sunset_angle = cos_sunset.acos();
    let ra = 37.6
        * distance_factor
        * (sunset_angle * latitude_rad.sin() * declination.sin()
            + latitude_rad.cos() * declination.cos() * sunset_angle.sin());
    SolarGeometry {
        ra,
        daylight_hours: 7.64 * sunset_angle,
    }
}

/// Tetens saturation vapor pressure at temperature `t` [kPa].
pub(crate) fn saturation_vapor_pressure(t: f64) -> f64 {
    0.6108 * ((17.27 * t) / (t + 237.3)).exp()
}

/// Slope of the vapor-pressure curve at the mean temperature [kPa/degC].
pub(crate) fn vapor_pressure_slope(vapor_pressure: f64, t_mean: f64) -> f64 {
    4098.0 * vapor_pressure / (t_mean + 237.3).powi(2)
}

/// Atmospheric pressure at `elevation` meters above sea level [kPa].
pub(crate) fn atmospheric_pressure(elevation: f64) -> f64 {
    101.3 * ((293.0 - 0.0065 * elevation) / 293.0).powf(5.26)
}

/// Psychrometric constant from elevation-adjusted pressure [kPa/degC].
pub(crate) fn psychrometric_constant(elevation: f64) -> f64 {
    0.00163 * atmospheric_pressure(elevation) / LATENT_HEAT
}

/// Stefan-Boltzmann long-wave loss corrected by humidity and the
/// clear-sky fraction `rs / (0.75 ra)` [MJ/m2/day].
pub(crate) fn net_longwave(t_max: f64, t_min: f64, ea: f64, rs: f64, ra: f64) -> f64 {
    const STEFAN_BOLTZMANN: f64 = 4.903e-9;
    let kelvin4 = (t_max + 273.16).powi(4) + (t_min + 273.16).powi(4);
    let humidity_correction = 0.34 - 0.139 * ea.sqrt();
    let clear_sky_fraction = 1.136 * rs / (0.75 * ra);
    STEFAN_BOLTZMANN * 0.5 * (kelvin4 * humidity_correction * clear_sky_fraction - 0.07)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equator_has_twelve_hour_days() {
        for period in 0..36 {
            let geometry = solar_geometry(0.0, period);
            assert_relative_eq!(geometry.daylight_hours, 12.0, epsilon = 0.01);
        }
    }

    #[test]
    fn extraterrestrial_radiation_peaks_in_summer() {
        let lat = 30.0_f64.to_radians();
        let winter = solar_geometry(lat, 0).ra;
        let summer = solar_geometry(lat, 17).ra;
        assert!(summer > winter);
        assert!(winter > 0.0);
    }

    #[test]
    fn polar_night_clamps_instead_of_nan() {
        let geometry = solar_geometry(80.0_f64.to_radians(), 0);
        assert!(geometry.ra.is_finite());
        assert!(geometry.daylight_hours >= 0.0);
    }

    #[test]
    fn pressure_decreases_with_elevation() {
        assert_relative_eq!(atmospheric_pressure(0.0), 101.3);
        assert!(atmospheric_pressure(2000.0) < atmospheric_pressure(200.0));
    }

    #[test]
    fn saturation_vapor_pressure_at_twenty_degrees() {
        // FAO-56 tabulates 2.338 kPa at 20 degC
        assert_relative_eq!(saturation_vapor_pressure(20.0), 2.338, epsilon = 1e-3);
    }
}
