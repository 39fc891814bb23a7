// Water-Table-Fluctuation recharge estimate: a closed-form calculation
// from the seasonal water-table rise and the specific yield of the
// aquifer layers it moves through.

use serde::{Deserialize, Serialize};

use crate::aggregate::round2;
use crate::error::Error;

// Yearly recharge above this depth is treated as a data-entry problem [mm].
const RECHARGE_DEPTH_LIMIT: f64 = 1000.0;
// Same plausibility bound the water-balance model applies [%].
const RECHARGE_RATIO_LIMIT: f64 = 40.0;

/// One aquifer layer of the specific-yield profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecificYieldLayer {
    pub layer_height: f64,        // [m]
    pub sp_yield_percentage: f64, // Specific yield [%]
}

/// Groundwater flow components of one observation [m3/year].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowComponents {
    pub qp: f64,    // Pumping
    pub qb: f64,    // Base flow
    pub q_in: f64,  // Lateral inflow
    pub q_out: f64, // Lateral outflow
    pub qr: f64,    // Return flow
}

impl FlowComponents {
    pub fn total(&self) -> f64 {
        self.qp + self.qb + self.q_in + self.q_out + self.qr
    }
}

/// Inputs of one WTF estimation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WtfInput {
    pub catchment_area: f64, // [km2]
    pub wt_max: f64,         // Highest water-table level [m]
    pub wt_min: f64,         // Lowest water-table level [m]
    pub num_layers: usize,   // Expected length of `sp_yield`
    pub precipitation: f64,  // Annual precipitation [mm]
    pub sp_yield: Vec<SpecificYieldLayer>,
    #[serde(default)]
    pub flows: Vec<FlowComponents>,
}

/// Figures of one WTF estimation, rounded to two decimals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WtfResult {
    pub yearly_recharge: f64, // [mm]
    pub ratio: f64,           // Recharge as a percentage of precipitation [%]
    pub net_abstraction: f64, // Summed flow components over the catchment [mm]
}

/// Outcome of a completed WTF estimation; the gates are data-quality
/// signals carrying the computed figures, like the water-balance gate.
#[derive(Clone, Debug, PartialEq)]
pub enum WtfOutcome {
    Plausible(WtfResult),
    Implausible { message: String, result: WtfResult },
}

impl WtfOutcome {
    pub fn is_plausible(&self) -> bool {
        matches!(self, WtfOutcome::Plausible(_))
    }

    pub fn result(&self) -> &WtfResult {
        match self {
            WtfOutcome::Plausible(result) => result,
            WtfOutcome::Implausible { result, .. } => result,
        }
    }
}

/**
Estimate yearly recharge from the water-table fluctuation.

The specific yield is height-weighted across the layer profile; the
water-table rise through that profile gives the recharge depth, which is
then related to the annual precipitation.

# Errors
[`Error::LengthMismatch`] when the profile does not match `num_layers`,
and [`Error::DivisionGuard`] for non-positive area, precipitation or
specific-yield profile.
*/
pub fn estimate_wtf_recharge(input: &WtfInput) -> Result<WtfOutcome, Error> {
    if input.sp_yield.len() != input.num_layers {
        return Err(Error::LengthMismatch {
            series: "sp_yield",
            expected: input.num_layers,
            actual: input.sp_yield.len(),
        });
    }
    if input.catchment_area <= 0.0 {
        return Err(Error::DivisionGuard(
            "catchment area must be positive".to_string(),
        ));
    }
    if input.precipitation <= 0.0 {
        return Err(Error::DivisionGuard(
            "annual precipitation must be positive".to_string(),
        ));
    }

    let weighted_yield: f64 = input
        .sp_yield
        .iter()
        .map(|layer| layer.layer_height * layer.sp_yield_percentage)
        .sum();
    let profile_height: f64 = input.sp_yield.iter().map(|layer| layer.layer_height).sum();
    if profile_height <= 0.0 || weighted_yield <= 0.0 {
        return Err(Error::DivisionGuard(
            "specific-yield profile must have positive height and yield".to_string(),
        ));
    }
    let mean_yield = weighted_yield / profile_height;

    let water_table_rise = input.wt_max - input.wt_min; // [m]
    let yearly_recharge = water_table_rise * 1000.0 / mean_yield; // [mm]
    let ratio = 100.0 * yearly_recharge / input.precipitation;

    let total_flow: f64 = input.flows.iter().map(FlowComponents::total).sum();
    let net_abstraction = total_flow / input.catchment_area * 0.001; // [mm]

    let result = WtfResult {
        yearly_recharge: round2(yearly_recharge),
        ratio: round2(ratio),
        net_abstraction: round2(net_abstraction),
    };

    if yearly_recharge > RECHARGE_DEPTH_LIMIT {
        return Ok(WtfOutcome::Implausible {
            message: format!(
                "The calculated recharge ({yearly_recharge:.0} mm) seems high! \
                 Please check the input data"
            ),
            result,
        });
    }
    if ratio > RECHARGE_RATIO_LIMIT {
        return Ok(WtfOutcome::Implausible {
            message: format!(
                "The calculated recharge as a percentage of precipitation \
                 ({ratio:.1}) seems high! Please check the input data"
            ),
            result,
        });
    }
    Ok(WtfOutcome::Plausible(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input() -> WtfInput {
        WtfInput {
            catchment_area: 100.0,
            wt_max: 10.0,
            wt_min: 8.0,
            num_layers: 2,
            precipitation: 1200.0,
            sp_yield: vec![
                SpecificYieldLayer {
                    layer_height: 10.0,
                    sp_yield_percentage: 12.0,
                },
                SpecificYieldLayer {
                    layer_height: 5.0,
                    sp_yield_percentage: 6.0,
                },
            ],
            flows: vec![FlowComponents {
                qp: 1000.0,
                qb: 500.0,
                q_in: 250.0,
                q_out: 150.0,
                qr: 100.0,
            }],
        }
    }

    #[test]
    fn recharge_follows_the_weighted_specific_yield() {
        // Yc = (10*12 + 5*6) / 15 = 10, rise 2 m -> 200 mm
        let outcome = estimate_wtf_recharge(&input()).unwrap();
        assert!(outcome.is_plausible());
        assert_relative_eq!(outcome.result().yearly_recharge, 200.0);
        assert_relative_eq!(outcome.result().ratio, round2(100.0 * 200.0 / 1200.0));
        assert_relative_eq!(outcome.result().net_abstraction, 0.02);
    }

    #[test]
    fn excessive_recharge_depth_is_gated() {
        let mut input = input();
        input.wt_max = 20.0; // 12 m rise -> 1200 mm
        let outcome = estimate_wtf_recharge(&input).unwrap();
        match &outcome {
            WtfOutcome::Implausible { message, result } => {
                assert!(message.contains("seems high"));
                assert_relative_eq!(result.yearly_recharge, 1200.0);
            }
            WtfOutcome::Plausible(_) => panic!("expected the depth gate to fire"),
        }
    }

    #[test]
    fn excessive_recharge_ratio_is_gated() {
        let mut input = input();
        input.precipitation = 400.0; // 200 mm recharge -> 50%
        let outcome = estimate_wtf_recharge(&input).unwrap();
        assert!(!outcome.is_plausible());
        assert_relative_eq!(outcome.result().ratio, 50.0);
    }

    #[test]
    fn profile_length_must_match_num_layers() {
        let mut input = input();
        input.num_layers = 3;
        let err = estimate_wtf_recharge(&input).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                series: "sp_yield",
                expected: 3,
                actual: 2,
            }
        ));
    }

    #[test]
    fn empty_profile_is_guarded() {
        let mut input = input();
        input.num_layers = 0;
        input.sp_yield.clear();
        let err = estimate_wtf_recharge(&input).unwrap_err();
        assert!(matches!(err, Error::DivisionGuard(_)));
    }
}
