//! Yearly groundwater-recharge estimation for a catchment.
//!
//! Two models are supported: a land-use-stratified water balance driven by
//! one of twelve reference-evapotranspiration formulas, and the simpler
//! water-table-fluctuation method. The engine is a pure computation over
//! 36 ten-day periods; the caller supplies plain in-memory series and gets
//! back either a result or a structural error.

mod aggregate;
mod error;
mod eto;
mod inputs;
mod land_use;
mod water_balance;
mod wtf;

pub use aggregate::{RECHARGE_PLAUSIBILITY_LIMIT, RainfallClass, RechargeOutcome, RechargeResult};
pub use error::Error;
pub use eto::{EtoMethod, EtoSeries, InputField};
pub use inputs::{
    ClimateInputs, ClimatePeriod, CropCoefficient, CurveNumber, LandUseRow, OutflowComponents,
    PERIODS_PER_YEAR, RechargeRateComponents, WbMethodInput,
};
pub use land_use::normalize_land_use;
pub use water_balance::{PeriodTrace, WaterBalance, WaterBalanceVolumes};
pub use wtf::{
    FlowComponents, SpecificYieldLayer, WtfInput, WtfOutcome, WtfResult, estimate_wtf_recharge,
};

/// Compute the ETO series alone, without running the water balance.
pub fn compute_eto(method: EtoMethod, inputs: &ClimateInputs) -> Result<EtoSeries, Error> {
    method.compute(inputs)
}

/// Run the full water-balance estimation on one input bundle.
pub fn estimate_recharge(input: &WbMethodInput) -> Result<RechargeOutcome, Error> {
    estimate_recharge_with(input, |_| {})
}

/**
Run the full water-balance estimation, handing per-period diagnostics to
`observer`.

The stages run in a fixed order: input validation, ETO selection and
computation, land-use normalization, volume accumulation, aggregation and
the plausibility gate. Structural problems abort before any volume is
accumulated; the gate only fires on a completed calculation and its
outcome still carries the numbers.

# Errors
Any of the structural errors in [`Error`]; see the stage functions for
the exact conditions.
*/
pub fn estimate_recharge_with<F>(
    input: &WbMethodInput,
    observer: F,
) -> Result<RechargeOutcome, Error>
where
    F: FnMut(&PeriodTrace),
{
    let method = input.eto_method;

    let mut missing = Vec::new();
    let precipitation = series_or(&input.precipitation, InputField::Precipitation, &mut missing);
    let land_use = series_or(&input.land_use, InputField::LandUse, &mut missing);
    let crop_coefficients = series_or(
        &input.crop_coefficients,
        InputField::CropCoefficients,
        &mut missing,
    );
    let curve_numbers = series_or(&input.curve_numbers, InputField::CurveNumbers, &mut missing);
    if input.apply_reduction_factor && input.reduction_factor.is_none() {
        missing.push(InputField::ReductionFactor);
    }
    if !missing.is_empty() {
        return Err(Error::MissingFields {
            method,
            fields: missing,
        });
    }

    let eto = method.compute(&input.climate)?;

    let mut land_use = land_use.to_vec();
    normalize_land_use(&mut land_use)?;

    let balance = WaterBalance {
        catchment_area: input.catchment_area,
        land_use: &land_use,
        crop_coefficients,
        curve_numbers,
        precipitation,
        eto: &eto.per_period,
        water_body_recharge: input.water_body_recharge.as_deref(),
        recharge_rates: input.recharge_rates.as_deref(),
        outflows: input.outflows.as_deref(),
    };
    let volumes = balance.accumulate_with(observer)?;

    let reduction_factor = if input.apply_reduction_factor {
        input.reduction_factor
    } else {
        None
    };
    aggregate::aggregate(&volumes, input.catchment_area, &eto, reduction_factor)
}

// Collects the field name when a required series is absent, so one error
// can report every gap at once.
fn series_or<'a, T>(
    series: &'a Option<Vec<T>>,
    field: InputField,
    missing: &mut Vec<InputField>,
) -> &'a [T] {
    match series {
        Some(values) => values,
        None => {
            missing.push(field);
            &[]
        }
    }
}
