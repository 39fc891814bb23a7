use thiserror::Error;

use crate::eto::{EtoMethod, InputField};

/// Errors raised by the recharge estimation engine.
///
/// Structural errors (missing fields, wrong series lengths, unbalanced
/// land-use rows) abort the calculation before any numbers are produced.
/// The plausibility check on a finished calculation is not an error; it is
/// reported through [`crate::RechargeOutcome`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("{} for eto_method {}", describe_missing(.fields), method_id(.method))]
    MissingFields {
        method: EtoMethod,
        fields: Vec<InputField>,
    },
    #[error("the length of {series} must be {expected}, got {actual}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("sum of land-use components must be equal to 100, line number {row} (got {sum})")]
    LandUseImbalance { row: usize, sum: f64 },
    #[error("computation guard: {0}")]
    DivisionGuard(String),
    #[error("eto_method {} produced a non-finite value at period {}", method_id(.method), .period + 1)]
    NonFinite { method: EtoMethod, period: usize },
    #[error("method {0} is not implemented")]
    UnknownMethod(u8),
    #[error("failed to load scenario: {0}")]
    Scenario(String),
}

fn method_id(method: &EtoMethod) -> u8 {
    method.id()
}

fn describe_missing(fields: &[InputField]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
    let verb = if names.len() > 1 { "are" } else { "is" };
    format!("{} {} required", names.join(", "), verb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_names_fields() {
        let err = Error::MissingFields {
            method: EtoMethod::FaoCombinedPenmanMonteith,
            fields: vec![InputField::Elevation],
        };
        assert_eq!(err.to_string(), "elevation is required for eto_method 1");
    }

    #[test]
    fn missing_fields_message_joins_plural() {
        let err = Error::MissingFields {
            method: EtoMethod::PenmanMonteithSunshine,
            fields: vec![InputField::Latitude, InputField::Elevation],
        };
        assert_eq!(
            err.to_string(),
            "latitude, elevation are required for eto_method 2"
        );
    }

    #[test]
    fn length_mismatch_message() {
        let err = Error::LengthMismatch {
            series: "climate",
            expected: 36,
            actual: 35,
        };
        assert_eq!(err.to_string(), "the length of climate must be 36, got 35");
    }

    #[test]
    fn non_finite_message_is_one_based() {
        let err = Error::NonFinite {
            method: EtoMethod::Turc,
            period: 0,
        };
        assert_eq!(
            err.to_string(),
            "eto_method 8 produced a non-finite value at period 1"
        );
    }
}
