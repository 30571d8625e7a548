use serde::{Deserialize, Serialize};

/// Normal ranges for vital signs. Values strictly outside a range are abnormal;
/// the bounds themselves are normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalThresholds {
    /// Lowest normal heart rate (bpm)
    pub heart_rate_min: f64,
    /// Highest normal heart rate (bpm)
    pub heart_rate_max: f64,
    /// Lowest normal blood-oxygen saturation (%)
    pub oxygen_saturation_min: f64,
    /// Lowest normal systolic pressure (mmHg)
    pub systolic_min: f64,
    /// Highest normal systolic pressure (mmHg)
    pub systolic_max: f64,
}

impl Default for VitalThresholds {
    fn default() -> Self {
        Self {
            heart_rate_min: 50.0,
            heart_rate_max: 120.0,
            oxygen_saturation_min: 90.0,
            systolic_min: 90.0,
            systolic_max: 180.0,
        }
    }
}
