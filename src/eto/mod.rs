// Reference-evapotranspiration method registry and dispatch. Every method
// is a pure per-period routine; this module owns the required-input table,
// the presence/length validation and the weighting of the yearly total.

mod combination;
mod radiation;
mod solar;
mod temperature;

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::inputs::{ClimateInputs, ClimatePeriod, expect_len, period_days};

/// The twelve supported ETO estimation formulas, identified by the integer
/// the request layer sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EtoMethod {
    FaoCombinedPenmanMonteith = 1,
    PenmanMonteithSunshine = 2,
    PenmanMonteithNoRadiation = 3,
    FaoBlaneyCriddle = 4,
    Makkink = 5,
    Hargreaves = 6,
    Hansen = 7,
    Turc = 8,
    PriestleyTaylor = 9,
    JensenHaise = 10,
    Abtew = 11,
    DeBruin = 12,
}

impl EtoMethod {
    /// Wire identifier of the method (1..=12).
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The inputs this method reads; anything absent fails validation by
    /// name before the calculation starts.
    pub fn required_inputs(self) -> &'static [InputField] {
        use InputField::*;
        match self {
            EtoMethod::FaoCombinedPenmanMonteith => {
                &[Latitude, Elevation, RelativeHumidity, WindSpeed, SolarRadiation, Climate]
            }
            EtoMethod::PenmanMonteithSunshine | EtoMethod::PenmanMonteithNoRadiation => {
                &[Latitude, Elevation, RelativeHumidity, WindSpeed, SunshineHours, Climate]
            }
            EtoMethod::FaoBlaneyCriddle => &[Latitude, CCoefficients, Climate],
            EtoMethod::Makkink | EtoMethod::Hansen | EtoMethod::PriestleyTaylor => {
                &[Latitude, Elevation, SolarRadiation, Climate]
            }
            EtoMethod::Hargreaves => &[Latitude, Climate],
            EtoMethod::Turc => &[SolarRadiation, RelativeHumidity, Climate],
            EtoMethod::JensenHaise | EtoMethod::Abtew => {
                &[CCoefficients, SolarRadiation, Climate]
            }
            EtoMethod::DeBruin => &[Latitude, SolarRadiation, Climate, Elevation],
        }
    }

    /**
    Validate the inputs and run the method's calculator.

    # Errors
    * [`Error::MissingFields`] naming every absent required input.
    * [`Error::LengthMismatch`] when a supplied series is not 36 long.
    * [`Error::NonFinite`] when the formula degenerates (for example a
      negative temperature spread under method 3).
    */
    pub fn compute(self, inputs: &ClimateInputs) -> Result<EtoSeries, Error> {
        validate_inputs(self, inputs)?;
        let climate = require_climate(self, inputs)?;
        let per_period = match self {
            EtoMethod::FaoCombinedPenmanMonteith => combination::fao_combined_pm(
                self.scalar(inputs.latitude, InputField::Latitude)?,
                self.scalar(inputs.elevation, InputField::Elevation)?,
                climate,
                &self.per_period(climate, InputField::RelativeHumidity)?,
                &self.per_period(climate, InputField::WindSpeed)?,
                &self.per_period(climate, InputField::SolarRadiation)?,
            ),
            EtoMethod::PenmanMonteithSunshine => combination::pm_sunshine(
                self.scalar(inputs.latitude, InputField::Latitude)?,
                self.scalar(inputs.elevation, InputField::Elevation)?,
                climate,
                &self.per_period(climate, InputField::RelativeHumidity)?,
                &self.per_period(climate, InputField::WindSpeed)?,
                &self.per_period(climate, InputField::SunshineHours)?,
            ),
            EtoMethod::PenmanMonteithNoRadiation => combination::pm_no_radiation(
                self.scalar(inputs.latitude, InputField::Latitude)?,
                self.scalar(inputs.elevation, InputField::Elevation)?,
                climate,
                &self.per_period(climate, InputField::RelativeHumidity)?,
                &self.per_period(climate, InputField::WindSpeed)?,
            ),
            EtoMethod::FaoBlaneyCriddle => temperature::blaney_criddle(
                self.scalar(inputs.latitude, InputField::Latitude)?,
                self.coefficients(inputs)?,
                climate,
            ),
            EtoMethod::Makkink => radiation::makkink(
                self.scalar(inputs.elevation, InputField::Elevation)?,
                climate,
                &self.per_period(climate, InputField::SolarRadiation)?,
            ),
            EtoMethod::Hargreaves => temperature::hargreaves(
                self.scalar(inputs.latitude, InputField::Latitude)?,
                climate,
            ),
            EtoMethod::Hansen => radiation::hansen(
                self.scalar(inputs.elevation, InputField::Elevation)?,
                climate,
                &self.per_period(climate, InputField::SolarRadiation)?,
            ),
            EtoMethod::Turc => radiation::turc(
                climate,
                &self.per_period(climate, InputField::SolarRadiation)?,
                &self.per_period(climate, InputField::RelativeHumidity)?,
            ),
            EtoMethod::PriestleyTaylor => radiation::priestley_taylor(
                self.scalar(inputs.latitude, InputField::Latitude)?,
                self.scalar(inputs.elevation, InputField::Elevation)?,
                climate,
                &self.per_period(climate, InputField::SolarRadiation)?,
            ),
            EtoMethod::JensenHaise => radiation::jensen_haise(
                self.coefficients(inputs)?,
                climate,
                &self.per_period(climate, InputField::SolarRadiation)?,
            ),
            EtoMethod::Abtew => radiation::abtew(
                self.coefficients(inputs)?,
                &self.per_period(climate, InputField::SolarRadiation)?,
            ),
            EtoMethod::DeBruin => radiation::de_bruin(
                self.scalar(inputs.elevation, InputField::Elevation)?,
                climate,
                &self.per_period(climate, InputField::SolarRadiation)?,
            ),
        };
        EtoSeries::from_per_period(self, per_period)
    }

    fn scalar(self, value: Option<f64>, field: InputField) -> Result<f64, Error> {
        value.ok_or_else(|| Error::MissingFields {
            method: self,
            fields: vec![field],
        })
    }

    fn coefficients<'a>(self, inputs: &'a ClimateInputs) -> Result<&'a [f64], Error> {
        inputs
            .c_coefficients
            .as_deref()
            .ok_or_else(|| Error::MissingFields {
                method: self,
                fields: vec![InputField::CCoefficients],
            })
    }

    // Extracts one optional per-period variable into a dense series.
    fn per_period(self, climate: &[ClimatePeriod], field: InputField) -> Result<Vec<f64>, Error> {
        climate
            .iter()
            .map(|period| {
                field.read(period).ok_or_else(|| Error::MissingFields {
                    method: self,
                    fields: vec![field],
                })
            })
            .collect()
    }
}

impl TryFrom<u8> for EtoMethod {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            1 => Ok(EtoMethod::FaoCombinedPenmanMonteith),
            2 => Ok(EtoMethod::PenmanMonteithSunshine),
            3 => Ok(EtoMethod::PenmanMonteithNoRadiation),
            4 => Ok(EtoMethod::FaoBlaneyCriddle),
            5 => Ok(EtoMethod::Makkink),
            6 => Ok(EtoMethod::Hargreaves),
            7 => Ok(EtoMethod::Hansen),
            8 => Ok(EtoMethod::Turc),
            9 => Ok(EtoMethod::PriestleyTaylor),
            10 => Ok(EtoMethod::JensenHaise),
            11 => Ok(EtoMethod::Abtew),
            12 => Ok(EtoMethod::DeBruin),
            other => Err(Error::UnknownMethod(other)),
        }
    }
}

impl From<EtoMethod> for u8 {
    fn from(method: EtoMethod) -> u8 {
        method.id()
    }
}

impl fmt::Display for EtoMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EtoMethod::FaoCombinedPenmanMonteith => "FAO combined Penman-Monteith",
            EtoMethod::PenmanMonteithSunshine => "Penman-Monteith (sunshine hours)",
            EtoMethod::PenmanMonteithNoRadiation => "Penman-Monteith (no radiation data)",
            EtoMethod::FaoBlaneyCriddle => "FAO Blaney-Criddle",
            EtoMethod::Makkink => "Makkink",
            EtoMethod::Hargreaves => "Hargreaves",
            EtoMethod::Hansen => "Hansen",
            EtoMethod::Turc => "Turc",
            EtoMethod::PriestleyTaylor => "Priestley-Taylor",
            EtoMethod::JensenHaise => "Jensen-Haise",
            EtoMethod::Abtew => "Abtew",
            EtoMethod::DeBruin => "De Bruin",
        };
        f.write_str(name)
    }
}

/// Input fields the method registry can require or a water-balance run can
/// miss. Per-period variants refer to the optional fields inside each
/// [`ClimatePeriod`] record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputField {
    Latitude,
    Elevation,
    Climate,
    RelativeHumidity,
    WindSpeed,
    SolarRadiation,
    SunshineHours,
    CCoefficients,
    Precipitation,
    LandUse,
    CropCoefficients,
    CurveNumbers,
    ReductionFactor,
}

impl InputField {
    pub fn name(self) -> &'static str {
        match self {
            InputField::Latitude => "latitude",
            InputField::Elevation => "elevation",
            InputField::Climate => "climate",
            InputField::RelativeHumidity => "relative_humidity",
            InputField::WindSpeed => "wind_speed",
            InputField::SolarRadiation => "solar_radiation",
            InputField::SunshineHours => "sunshine_hours",
            InputField::CCoefficients => "c_coefficients",
            InputField::Precipitation => "precipitation",
            InputField::LandUse => "land_use",
            InputField::CropCoefficients => "crop_coefficients",
            InputField::CurveNumbers => "curve_numbers",
            InputField::ReductionFactor => "reduction_factor",
        }
    }

    // The optional per-period variable this field names, if any.
    fn read(self, period: &ClimatePeriod) -> Option<f64> {
        match self {
            InputField::RelativeHumidity => period.relative_humidity,
            InputField::WindSpeed => period.wind_speed,
            InputField::SolarRadiation => period.solar_radiation,
            InputField::SunshineHours => period.sunshine_hours,
            _ => None,
        }
    }
}

/// Per-period ETO series with its weighted yearly total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EtoSeries {
    pub yearly_total: f64, // [mm/year]
    pub per_period: Vec<f64>, // Daily ETO of each ten-day period [mm/day]
}

impl EtoSeries {
    // Weights the per-period values into the yearly total and rejects
    // non-finite entries before they can reach the water balance.
    fn from_per_period(method: EtoMethod, per_period: Vec<f64>) -> Result<Self, Error> {
        let mut yearly_total = 0.0;
        for (period, value) in per_period.iter().enumerate() {
            if !value.is_finite() {
                return Err(Error::NonFinite { method, period });
            }
            debug!("{method} period {}: eto {value:.2} mm/day", period + 1);
            yearly_total += value * period_days(period);
        }
        Ok(EtoSeries {
            yearly_total,
            per_period,
        })
    }
}

// Presence and length validation against the method's required-input table.
fn validate_inputs(method: EtoMethod, inputs: &ClimateInputs) -> Result<(), Error> {
    let mut missing = Vec::new();
    for &field in method.required_inputs() {
        let present = match field {
            InputField::Latitude => inputs.latitude.is_some(),
            InputField::Elevation => inputs.elevation.is_some(),
            InputField::Climate => inputs.climate.is_some(),
            InputField::CCoefficients => inputs.c_coefficients.is_some(),
            per_period_field => has_per_period(inputs, per_period_field),
        };
        if !present {
            missing.push(field);
        }
    }
    if !missing.is_empty() {
        return Err(Error::MissingFields {
            method,
            fields: missing,
        });
    }
    if let Some(climate) = &inputs.climate {
        expect_len("climate", climate)?;
    }
    if let Some(c) = &inputs.c_coefficients {
        expect_len("c_coefficients", c)?;
    }
    Ok(())
}

fn has_per_period(inputs: &ClimateInputs, field: InputField) -> bool {
    inputs
        .climate
        .as_ref()
        .is_some_and(|rows| !rows.is_empty() && rows.iter().all(|p| field.read(p).is_some()))
}

fn require_climate<'a>(
    method: EtoMethod,
    inputs: &'a ClimateInputs,
) -> Result<&'a [ClimatePeriod], Error> {
    inputs
        .climate
        .as_deref()
        .ok_or_else(|| Error::MissingFields {
            method,
            fields: vec![InputField::Climate],
        })
}
