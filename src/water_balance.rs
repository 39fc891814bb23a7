// Land-use-stratified water-balance accumulator. For every period and
// managed land-use category it splits the period's rainfall into actual
// evapotranspiration, curve-number runoff and recharge, and accumulates
// the three as volumes over the catchment.

use log::debug;

use crate::error::Error;
use crate::inputs::{
    CropCoefficient, CurveNumber, LandUseRow, OutflowComponents, PERIODS_PER_YEAR,
    RechargeRateComponents, expect_len, period_days,
};

// Volume of 1 mm of water over 1 km2 [m3].
const M3_PER_MM_KM2: f64 = 1000.0;

/// Yearly volumes accumulated over all periods and categories [m3],
/// alongside the raw yearly rainfall [mm].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterBalanceVolumes {
    pub potential_et: f64,        // Crop-adjusted ET demand [m3]
    pub actual_et: f64,           // ET limited by rainfall [m3]
    pub runoff: f64,              // Curve-number runoff [m3]
    pub land_recharge: f64,       // Recharge under the managed categories [m3]
    pub water_body_recharge: f64, // Recharge through open water [m3]
    pub external_recharge: f64,   // Supplied recharge-rate components [m3]
    pub outflow: f64,             // Supplied outflow components [m3]
    pub rainfall: f64,            // [mm]
}

impl WaterBalanceVolumes {
    /// Net recharge volume: land and water-body recharge plus the external
    /// components, minus the outflows [m3].
    pub fn net_recharge(&self) -> f64 {
        self.land_recharge + self.water_body_recharge + self.external_recharge - self.outflow
    }
}

/// One period-and-category sample handed to the observer callback. All
/// depths are mm over the category's area for that period.
#[derive(Clone, Copy, Debug)]
pub struct PeriodTrace {
    pub period: usize,   // 0-based period index
    pub category: usize, // 1-based managed category (a1..a4)
    pub et_demand: f64,  // [mm]
    pub actual_et: f64,  // [mm]
    pub runoff: f64,     // [mm]
    pub recharge: f64,   // [mm]
}

/// Borrowed inputs of one accumulation run. Every series must be 36 long;
/// the optional series contribute zero when absent.
pub struct WaterBalance<'a> {
    pub catchment_area: f64, // [km2]
    pub land_use: &'a [LandUseRow],
    pub crop_coefficients: &'a [CropCoefficient],
    pub curve_numbers: &'a [CurveNumber],
    pub precipitation: &'a [f64], // [mm/period]
    pub eto: &'a [f64],           // Daily reference ET [mm/day]
    pub water_body_recharge: Option<&'a [f64]>, // [mm/period]
    pub recharge_rates: Option<&'a [RechargeRateComponents]>,
    pub outflows: Option<&'a [OutflowComponents]>,
}

impl WaterBalance<'_> {
    /// Accumulate without observing individual periods.
    pub fn accumulate(&self) -> Result<WaterBalanceVolumes, Error> {
        self.accumulate_with(|_| {})
    }

    /**
    Accumulate the yearly volumes, handing every period-and-category
    sample to `observer`.

    The land-use rows are expected to be normalized already (see
    [`crate::normalize_land_use`]); the accumulator reads the fractions
    as-is.

    # Errors
    [`Error::LengthMismatch`] for any series that is not 36 long, and
    [`Error::DivisionGuard`] for degenerate curve numbers.
    */
    pub fn accumulate_with<F>(&self, mut observer: F) -> Result<WaterBalanceVolumes, Error>
    where
        F: FnMut(&PeriodTrace),
    {
        self.check_lengths()?;
        let mut volumes = WaterBalanceVolumes::default();
        for i in 0..PERIODS_PER_YEAR {
            let row = &self.land_use[i];
            let kc = self.crop_coefficients[i].values();
            let cn = self.curve_numbers[i].values();
            let rainfall = self.precipitation[i];
            let days = period_days(i);
            volumes.rainfall += rainfall;

            for (k, area_pct) in row.managed().iter().enumerate() {
                let area = area_pct / 100.0 * self.catchment_area; // [km2]
                let et_demand = self.eto[i] * kc[k] * days; // ETr [mm/period]
                let actual_et = rainfall.min(et_demand); // ETa [mm/period]
                let runoff = curve_number_runoff(rainfall, actual_et, cn[k], i)?;
                let drained = actual_et + runoff;
                let recharge = if drained < rainfall {
                    rainfall - drained
                } else {
                    0.0
                };

                volumes.potential_et += et_demand * area * M3_PER_MM_KM2;
                volumes.actual_et += actual_et * area * M3_PER_MM_KM2;
                volumes.runoff += runoff * area * M3_PER_MM_KM2;
                volumes.land_recharge += recharge * area * M3_PER_MM_KM2;

                let trace = PeriodTrace {
                    period: i,
                    category: k + 1,
                    et_demand,
                    actual_et,
                    runoff,
                    recharge,
                };
                debug!(
                    "period {} a{}: etr {:.2} eta {:.2} ro {:.2} re {:.2} mm",
                    i + 1,
                    k + 1,
                    et_demand,
                    actual_et,
                    runoff,
                    recharge
                );
                observer(&trace);
            }

            if let Some(re_water_body) = self.water_body_recharge {
                let water_area = row.a6 / 100.0 * self.catchment_area;
                volumes.water_body_recharge += re_water_body[i] * water_area * M3_PER_MM_KM2;
            }
            if let Some(rates) = self.recharge_rates {
                volumes.external_recharge += rates[i].total();
            }
            if let Some(outflows) = self.outflows {
                volumes.outflow += outflows[i].total();
            }
        }
        Ok(volumes)
    }

    fn check_lengths(&self) -> Result<(), Error> {
        expect_len("land_use", self.land_use)?;
        expect_len("crop_coefficients", self.crop_coefficients)?;
        expect_len("curve_numbers", self.curve_numbers)?;
        expect_len("precipitation", self.precipitation)?;
        expect_len("eto", self.eto)?;
        if let Some(series) = self.water_body_recharge {
            expect_len("water_body_recharge", series)?;
        }
        if let Some(series) = self.recharge_rates {
            expect_len("recharge_rates", series)?;
        }
        if let Some(series) = self.outflows {
            expect_len("outflows", series)?;
        }
        Ok(())
    }
}

/**
SCS curve-number runoff depth of one period and category [mm].

The retention `S = 1000/CN - 10` follows the curve-number convention;
rainfall below the initial abstraction `0.2 S` (after actual ET) produces
no runoff at all.

# Errors
[`Error::DivisionGuard`] for a non-positive curve number or a degenerate
denominator.
*/
pub(crate) fn curve_number_runoff(
    rainfall: f64,
    actual_et: f64,
    cn: f64,
    period: usize,
) -> Result<f64, Error> {
    if cn <= 0.0 {
        return Err(Error::DivisionGuard(format!(
            "curve number must be positive, period {}",
            period + 1
        )));
    }
    let retention = 1000.0 / cn - 10.0;
    let effective = rainfall - actual_et;
    if effective <= 0.2 * retention {
        return Ok(0.0);
    }
    let denominator = effective + 0.8 * retention;
    if denominator <= 0.0 {
        return Err(Error::DivisionGuard(format!(
            "degenerate runoff denominator, period {}",
            period + 1
        )));
    }
    Ok((effective - 0.2 * retention).powi(2) / denominator)
}
