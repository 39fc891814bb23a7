// Reduces the accumulated volumes to yearly depths and ratios, applies the
// optional reduction factor and runs the plausibility gate.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::eto::EtoSeries;
use crate::water_balance::WaterBalanceVolumes;

/// Recharge-to-rainfall percentage above which a result is flagged as
/// implausible. Exactly this value still passes.
pub const RECHARGE_PLAUSIBILITY_LIMIT: f64 = 40.0;

/// Final figures of one water-balance calculation. Depths are mm over the
/// catchment; everything is rounded to two decimals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RechargeResult {
    pub yearly_rainfall: f64,          // [mm]
    pub yearly_recharge: f64,          // [mm]
    pub yearly_runoff: f64,            // [mm]
    pub recharge_pct_of_rainfall: f64, // [%]
    pub runoff_pct_of_rainfall: f64,   // [%]
    pub aridity_index: f64,            // Rainfall over yearly ETO [-]
    pub yearly_eto: f64,               // [mm]
    pub eto_per_period: Vec<f64>,      // Daily ETO per period [mm/day]
}

impl RechargeResult {
    /// Rainfall regime of the catchment year.
    pub fn classification(&self) -> RainfallClass {
        RainfallClass::from_annual_rainfall(self.yearly_rainfall)
    }
}

/// Rainfall regime classes by annual precipitation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RainfallClass {
    Arid,      // P <= 500 mm
    SemiArid,  // 500 < P < 1000 mm
    SemiHumid, // 1000 <= P < 1500 mm
    Humid,     // P >= 1500 mm
}

impl RainfallClass {
    pub fn from_annual_rainfall(rainfall: f64) -> Self {
        if rainfall <= 500.0 {
            RainfallClass::Arid
        } else if rainfall < 1000.0 {
            RainfallClass::SemiArid
        } else if rainfall < 1500.0 {
            RainfallClass::SemiHumid
        } else {
            RainfallClass::Humid
        }
    }
}

/// Outcome of a completed calculation.
///
/// The plausibility gate is a data-quality signal, not a fault: an
/// implausible outcome still carries the full computed result so the
/// caller can inspect or override it.
#[derive(Clone, Debug, PartialEq)]
pub enum RechargeOutcome {
    Plausible(RechargeResult),
    Implausible { message: String, result: RechargeResult },
}

impl RechargeOutcome {
    pub fn is_plausible(&self) -> bool {
        matches!(self, RechargeOutcome::Plausible(_))
    }

    /// The computed figures, whichever side of the gate they fell on.
    pub fn result(&self) -> &RechargeResult {
        match self {
            RechargeOutcome::Plausible(result) => result,
            RechargeOutcome::Implausible { result, .. } => result,
        }
    }
}

// Rounds a final figure to two decimals; intermediate values stay exact.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/**
Convert the accumulated volumes into the yearly result and gate it.

Depths come from dividing volumes by the catchment area with the
m3-over-km2 conversion to mm. The reduction factor, when given, scales
both recharge and runoff; the gate compares the unrounded recharge
percentage against [`RECHARGE_PLAUSIBILITY_LIMIT`].

# Errors
[`Error::DivisionGuard`] for a non-positive catchment area, yearly
rainfall or yearly ETO.
*/
pub(crate) fn aggregate(
    volumes: &WaterBalanceVolumes,
    catchment_area: f64,
    eto: &EtoSeries,
    reduction_factor: Option<f64>,
) -> Result<RechargeOutcome, Error> {
    if catchment_area <= 0.0 {
        return Err(Error::DivisionGuard(
            "catchment area must be positive".to_string(),
        ));
    }
    if volumes.rainfall <= 0.0 {
        return Err(Error::DivisionGuard(
            "yearly rainfall must be positive".to_string(),
        ));
    }
    if eto.yearly_total <= 0.0 {
        return Err(Error::DivisionGuard(
            "yearly ETO must be positive".to_string(),
        ));
    }

    let mut recharge_depth = volumes.net_recharge() / catchment_area * 0.001;
    let mut runoff_depth = volumes.runoff / catchment_area * 0.001;
    if let Some(factor) = reduction_factor {
        recharge_depth *= factor;
        runoff_depth *= factor;
    }

    let recharge_pct = 100.0 * recharge_depth / volumes.rainfall;
    let runoff_pct = 100.0 * runoff_depth / volumes.rainfall;
    let aridity_index = volumes.rainfall / eto.yearly_total;

    let result = RechargeResult {
        yearly_rainfall: round2(volumes.rainfall),
        yearly_recharge: round2(recharge_depth),
        yearly_runoff: round2(runoff_depth),
        recharge_pct_of_rainfall: round2(recharge_pct),
        runoff_pct_of_rainfall: round2(runoff_pct),
        aridity_index: round2(aridity_index),
        yearly_eto: round2(eto.yearly_total),
        eto_per_period: eto.per_period.iter().map(|v| round2(*v)).collect(),
    };

    if recharge_pct > RECHARGE_PLAUSIBILITY_LIMIT {
        return Ok(RechargeOutcome::Implausible {
            message: "The Recharge as a percentage of Rainfall is too high! \
                      Please check the input data"
                .to_string(),
            result,
        });
    }
    Ok(RechargeOutcome::Plausible(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eto_series() -> EtoSeries {
        // 36 uniform periods of 4 mm/day
        let per_period = vec![4.0; 36];
        EtoSeries {
            yearly_total: 35.0 * 40.0 + 20.0,
            per_period,
        }
    }

    // Volumes whose recharge depth over 1 km2 is `depth_mm`.
    fn volumes(depth_mm: f64) -> WaterBalanceVolumes {
        WaterBalanceVolumes {
            land_recharge: depth_mm * 1000.0,
            runoff: 10_000.0,
            rainfall: 100.0,
            ..WaterBalanceVolumes::default()
        }
    }

    #[test]
    fn a_recharge_share_of_exactly_forty_percent_passes() {
        let outcome = aggregate(&volumes(40.0), 1.0, &eto_series(), None).unwrap();
        assert!(outcome.is_plausible());
        assert_relative_eq!(outcome.result().recharge_pct_of_rainfall, 40.0);
    }

    #[test]
    fn a_recharge_share_above_forty_percent_is_gated() {
        let outcome = aggregate(&volumes(40.01), 1.0, &eto_series(), None).unwrap();
        match &outcome {
            RechargeOutcome::Implausible { message, result } => {
                assert!(message.contains("too high"));
                assert_relative_eq!(result.yearly_recharge, 40.01);
            }
            RechargeOutcome::Plausible(_) => panic!("expected the gate to fire"),
        }
    }

    #[test]
    fn reduction_factor_scales_recharge_and_runoff() {
        let outcome = aggregate(&volumes(30.0), 1.0, &eto_series(), Some(0.9)).unwrap();
        let result = outcome.result();
        assert_relative_eq!(result.yearly_recharge, 27.0);
        assert_relative_eq!(result.yearly_runoff, 9.0);
    }

    #[test]
    fn zero_rainfall_is_guarded() {
        let mut volumes = volumes(10.0);
        volumes.rainfall = 0.0;
        let err = aggregate(&volumes, 1.0, &eto_series(), None).unwrap_err();
        assert!(matches!(err, Error::DivisionGuard(_)));
    }

    #[test]
    fn depths_follow_the_volume_conversion() {
        // 50_000 m3 over 100 km2 is 0.5 mm
        let v = WaterBalanceVolumes {
            land_recharge: 50_000.0,
            runoff: 50_000.0,
            rainfall: 500.0,
            ..WaterBalanceVolumes::default()
        };
        let outcome = aggregate(&v, 100.0, &eto_series(), None).unwrap();
        assert_relative_eq!(outcome.result().yearly_recharge, 0.5);
        assert_relative_eq!(outcome.result().yearly_runoff, 0.5);
    }

    #[test]
    fn aridity_index_is_rainfall_over_eto() {
        let outcome = aggregate(&volumes(10.0), 1.0, &eto_series(), None).unwrap();
        assert_relative_eq!(
            outcome.result().aridity_index,
            round2(100.0 / 1420.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn rainfall_classes_follow_the_annual_total() {
        assert_eq!(RainfallClass::from_annual_rainfall(400.0), RainfallClass::Arid);
        assert_eq!(RainfallClass::from_annual_rainfall(500.0), RainfallClass::Arid);
        assert_eq!(
            RainfallClass::from_annual_rainfall(750.0),
            RainfallClass::SemiArid
        );
        assert_eq!(
            RainfallClass::from_annual_rainfall(1200.0),
            RainfallClass::SemiHumid
        );
        assert_eq!(
            RainfallClass::from_annual_rainfall(1800.0),
            RainfallClass::Humid
        );
    }
}
