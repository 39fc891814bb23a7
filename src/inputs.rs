use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::eto::EtoMethod;

/// Number of ten-day periods covering one model year.
pub const PERIODS_PER_YEAR: usize = 36;

// The 36th period carries only the 5 days that close the 365-day year.
pub(crate) fn period_days(period: usize) -> f64 {
    if period == PERIODS_PER_YEAR - 1 { 5.0 } else { 10.0 }
}

/// Climate record of one ten-day period.
///
/// Temperature extremes are always present; the remaining variables are
/// optional and only required by the ETO methods that read them (see
/// [`EtoMethod::required_inputs`]).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClimatePeriod {
    pub t_max: f64, // Maximum air temperature [deg C]
    pub t_min: f64, // Minimum air temperature [deg C]
    #[serde(default)]
    pub relative_humidity: Option<f64>, // Mean relative humidity [%]
    #[serde(default)]
    pub wind_speed: Option<f64>, // Wind speed at 2 m height [m/s]
    #[serde(default)]
    pub solar_radiation: Option<f64>, // Measured solar radiation [MJ/m2/day]
    #[serde(default)]
    pub sunshine_hours: Option<f64>, // Bright sunshine duration [h/day]
}

impl ClimatePeriod {
    pub fn new(t_max: f64, t_min: f64) -> Self {
        ClimatePeriod {
            t_max,
            t_min,
            relative_humidity: None,
            wind_speed: None,
            solar_radiation: None,
            sunshine_hours: None,
        }
    }

    // Mean temperature derived from the daily extremes [deg C]
    pub fn t_mean(&self) -> f64 {
        (self.t_max + self.t_min) / 2.0
    }
}

/// Land-use composition of one ten-day period, as percentages of the
/// catchment. `a7` is the remainder category and the only field the
/// normalization step may adjust.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandUseRow {
    pub a1: f64, // Cropped/managed category 1 [% of catchment]
    pub a2: f64, // Cropped/managed category 2 [%]
    pub a3: f64, // Cropped/managed category 3 [%]
    pub a4: f64, // Cropped/managed category 4 [%]
    pub a5: f64, // Very pervious ground [%]
    pub a6: f64, // Water bodies [%]
    pub a7: f64, // Remainder, absorbs rounding error [%]
}

impl LandUseRow {
    pub fn sum(&self) -> f64 {
        self.a1 + self.a2 + self.a3 + self.a4 + self.a5 + self.a6 + self.a7
    }

    // The four managed categories the curve-number accumulation runs over
    pub(crate) fn managed(&self) -> [f64; 4] {
        [self.a1, self.a2, self.a3, self.a4]
    }
}

/// Crop coefficients of one period, index-aligned with `a1..a4`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropCoefficient {
    pub kc_a1: f64, // [-]
    pub kc_a2: f64, // [-]
    pub kc_a3: f64, // [-]
    pub kc_a4: f64, // [-]
}

impl CropCoefficient {
    pub fn uniform(kc: f64) -> Self {
        CropCoefficient {
            kc_a1: kc,
            kc_a2: kc,
            kc_a3: kc,
            kc_a4: kc,
        }
    }

    pub(crate) fn values(&self) -> [f64; 4] {
        [self.kc_a1, self.kc_a2, self.kc_a3, self.kc_a4]
    }
}

/// SCS curve numbers of one period, index-aligned with `a1..a4`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveNumber {
    pub cn1: f64, // [-]
    pub cn2: f64, // [-]
    pub cn3: f64, // [-]
    pub cn4: f64, // [-]
}

impl CurveNumber {
    pub fn uniform(cn: f64) -> Self {
        CurveNumber {
            cn1: cn,
            cn2: cn,
            cn3: cn,
            cn4: cn,
        }
    }

    pub(crate) fn values(&self) -> [f64; 4] {
        [self.cn1, self.cn2, self.cn3, self.cn4]
    }
}

/// Externally supplied recharge volumes of one period [m3].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RechargeRateComponents {
    pub re_cr: f64,    // Canal and river seepage
    pub re_ro: f64,    // Runoff re-infiltration
    pub re_pa: f64,    // Pervious-area recharge
    pub re_other: f64, // Any further source
}

impl RechargeRateComponents {
    pub fn total(&self) -> f64 {
        self.re_cr + self.re_ro + self.re_pa + self.re_other
    }
}

/// Externally supplied outflow volumes of one period [m3].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutflowComponents {
    pub out_dr: f64,    // Drainage
    pub out_other: f64, // Any further sink
}

impl OutflowComponents {
    pub fn total(&self) -> f64 {
        self.out_dr + self.out_other
    }
}

/// Climate side of a request: everything the ETO dispatch may need.
///
/// All fields are optional; [`EtoMethod::compute`] checks the subset its
/// method requires and reports the absent ones by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateInputs {
    #[serde(default)]
    pub latitude: Option<f64>, // [decimal degrees]
    #[serde(default)]
    pub elevation: Option<f64>, // [m above sea level]
    #[serde(default)]
    pub climate: Option<Vec<ClimatePeriod>>, // One record per period
    #[serde(default)]
    pub c_coefficients: Option<Vec<f64>>, // Empirical C values, one per period [-]
}

/// Complete input bundle of one water-balance calculation.
///
/// The request layer hands this in as plain data; nothing here is mutated
/// by more than one component and the bundle is discarded after the result
/// is returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WbMethodInput {
    pub eto_method: EtoMethod,
    pub catchment_area: f64, // [km2]
    #[serde(flatten)]
    pub climate: ClimateInputs,
    #[serde(default)]
    pub precipitation: Option<Vec<f64>>, // p_value [mm/period]
    #[serde(default)]
    pub land_use: Option<Vec<LandUseRow>>,
    #[serde(default)]
    pub crop_coefficients: Option<Vec<CropCoefficient>>,
    #[serde(default)]
    pub curve_numbers: Option<Vec<CurveNumber>>,
    #[serde(default)]
    pub water_body_recharge: Option<Vec<f64>>, // re_water_body [mm/period]
    #[serde(default)]
    pub recharge_rates: Option<Vec<RechargeRateComponents>>,
    #[serde(default)]
    pub outflows: Option<Vec<OutflowComponents>>,
    #[serde(default)]
    pub reduction_factor: Option<f64>, // rf [-]
    #[serde(default)]
    pub apply_reduction_factor: bool, // rf_option
}

impl WbMethodInput {
    /**
    Load a calculation scenario from a TOML document.

    Scenario files carry the same field names as the serde representation
    of this struct; series are arrays of 36 tables or numbers.

    # Errors
    Returns [`Error::Scenario`] when the document does not parse.
    */
    pub fn from_toml_str(doc: &str) -> Result<Self, Error> {
        toml::from_str(doc).map_err(|e| Error::Scenario(e.to_string()))
    }

    /// Read and parse a scenario file from disk.
    pub fn from_toml_file(path: &Path) -> Result<Self, Error> {
        let doc = fs::read_to_string(path).map_err(|e| Error::Scenario(e.to_string()))?;
        Self::from_toml_str(&doc)
    }
}

// Checks that a period-indexed series has exactly one entry per period.
pub(crate) fn expect_len<T>(series: &'static str, values: &[T]) -> Result<(), Error> {
    if values.len() != PERIODS_PER_YEAR {
        return Err(Error::LengthMismatch {
            series,
            expected: PERIODS_PER_YEAR,
            actual: values.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn t_mean_is_midpoint_of_extremes() {
        let period = ClimatePeriod::new(30.0, 15.0);
        assert_relative_eq!(period.t_mean(), 22.5);
    }

    #[test]
    fn period_days_closes_the_year() {
        let total: f64 = (0..PERIODS_PER_YEAR).map(period_days).sum();
        assert_relative_eq!(total, 355.0);
        assert_relative_eq!(period_days(34), 10.0);
        assert_relative_eq!(period_days(35), 5.0);
    }

    #[test]
    fn expect_len_rejects_short_series() {
        let series = vec![0.0; 35];
        let err = expect_len("precipitation", &series).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                series: "precipitation",
                expected: 36,
                actual: 35,
            }
        ));
    }

    #[test]
    fn scenario_parses_from_toml() {
        let mut doc = String::from(
            "eto_method = 6\ncatchment_area = 100.0\nlatitude = 25.0\n",
        );
        for _ in 0..PERIODS_PER_YEAR {
            doc.push_str("[[climate]]\nt_max = 30.0\nt_min = 15.0\n");
        }
        let input = WbMethodInput::from_toml_str(&doc).unwrap();
        assert_eq!(input.eto_method, EtoMethod::Hargreaves);
        assert_relative_eq!(input.climate.latitude.unwrap(), 25.0);
        assert_eq!(input.climate.climate.unwrap().len(), PERIODS_PER_YEAR);
        assert!(input.precipitation.is_none());
        assert!(!input.apply_reduction_factor);
    }

    #[test]
    fn scenario_rejects_malformed_toml() {
        let err = WbMethodInput::from_toml_str("eto_method = \"six\"").unwrap_err();
        assert!(matches!(err, Error::Scenario(_)));
    }
}
