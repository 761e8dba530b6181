//! Validation results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A failed physical check. Serialized as its stable `ERR_*` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Carried weight exceeds the chassis payload capacity.
    #[serde(rename = "ERR_OVERWEIGHT")]
    Overweight,
    /// Power draw exceeds what the batteries can deliver.
    #[serde(rename = "ERR_POWER_LOW")]
    PowerLow,
    /// Required slope is steeper than the chassis can climb.
    #[serde(rename = "ERR_CLIMB_FAIL")]
    ClimbFail,
    /// The assembly has no chassis.
    #[serde(rename = "ERR_NO_CHASSIS")]
    NoChassis,
}

impl ErrorCode {
    /// The stable wire code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::Overweight => "ERR_OVERWEIGHT",
            ErrorCode::PowerLow => "ERR_POWER_LOW",
            ErrorCode::ClimbFail => "ERR_CLIMB_FAIL",
            ErrorCode::NoChassis => "ERR_NO_CHASSIS",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sums gathered in one pass over the parts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Sum of all part weights (kg).
    pub total_weight: f64,
    /// Sum of sensor, actuator and compute power (W).
    pub total_power_draw: f64,
    /// Sum of chassis payload capacities (kg).
    pub max_payload: f64,
    /// Sum of battery output limits (W).
    pub max_power_output: f64,
    /// Steepest slope any chassis can climb (degrees).
    pub max_climb_angle: f64,
    /// Weight of the chassis parts themselves (kg).
    pub chassis_weight: f64,
    /// Weight carried by the chassis: total minus chassis weight (kg).
    pub payload_in_use: f64,
    /// Whether any part is a chassis.
    pub has_chassis: bool,
    /// Whether any part is a battery.
    pub has_battery: bool,
}

/// Headline figures for display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Total weight (kg).
    pub weight: f64,
    /// Total power draw (W).
    pub power: f64,
    /// Sum of unit prices.
    pub cost: f64,
    /// Payload in use as a percentage of capacity; 0 without capacity.
    pub payload_utilization: f64,
    /// Power draw as a percentage of output; 0 without output.
    pub power_utilization: f64,
}

/// Outcome of validating an assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// True iff `errors` is empty.
    pub is_valid: bool,
    /// Failed checks, in a fixed order.
    pub errors: Vec<ErrorCode>,
    /// Headline figures.
    pub metrics: Metrics,
    /// Underlying sums.
    pub budget: Budget,
}

impl Verdict {
    /// Whether a given check failed.
    pub fn has(&self, code: ErrorCode) -> bool {
        self.errors.contains(&code)
    }
}
