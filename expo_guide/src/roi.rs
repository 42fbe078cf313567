use serde::{Deserialize, Serialize};

use crate::ExpoError;

/// One booth scenario as entered in the calculator sidebar.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoiInputs {
    pub booth_cost: f64,
    pub staff_cost: f64,
    pub marketing_cost: f64,
    pub misc_cost: f64,
    pub leads: u64,
    /// Percentage in `0..=100`.
    pub conversion_rate_pct: f64,
    pub deal_value: f64,
}

impl Default for RoiInputs {
    fn default() -> Self {
        Self {
            booth_cost: 500.0,
            staff_cost: 200.0,
            marketing_cost: 100.0,
            misc_cost: 50.0,
            leads: 200,
            conversion_rate_pct: 5.0,
            deal_value: 300.0,
        }
    }
}

impl RoiInputs {
    pub fn total_cost(&self) -> f64 {
        self.booth_cost + self.staff_cost + self.marketing_cost + self.misc_cost
    }

    /// Reject values the calculator widgets would never produce.
    pub fn validate(&self) -> Result<(), ExpoError> {
        let amounts = [
            ("booth cost", self.booth_cost),
            ("staff cost", self.staff_cost),
            ("marketing cost", self.marketing_cost),
            ("misc cost", self.misc_cost),
            ("deal value", self.deal_value),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ExpoError::InvalidInput(format!(
                    "{name} must be a non-negative number (got {value})"
                )));
            }
        }
        let rate = self.conversion_rate_pct;
        if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
            return Err(ExpoError::InvalidInput(format!(
                "conversion rate must be within 0-100% (got {rate})"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoiMetrics {
    pub total_cost: f64,
    pub expected_deals: u64,
    pub expected_revenue: f64,
    pub profit: f64,
    /// Unclamped; `0.0` when there is no cost.
    pub roi_pct: f64,
    /// `0.0` when there are no leads.
    pub cost_per_lead: f64,
}

/// Derive the headline metrics. Total over every input; division by zero is
/// defined as zero rather than NaN or infinity.
pub fn compute_metrics(inputs: &RoiInputs) -> RoiMetrics {
    let total_cost = inputs.total_cost();
    let expected_deals = expected_deals(inputs.leads, inputs.conversion_rate_pct);
    let expected_revenue = expected_deals as f64 * inputs.deal_value;
    let profit = expected_revenue - total_cost;
    let roi_pct = if total_cost == 0.0 {
        0.0
    } else {
        profit / total_cost * 100.0
    };
    let cost_per_lead = if inputs.leads == 0 {
        0.0
    } else {
        total_cost / inputs.leads as f64
    };
    RoiMetrics {
        total_cost,
        expected_deals,
        expected_revenue,
        profit,
        roi_pct,
        cost_per_lead,
    }
}

fn expected_deals(leads: u64, rate_pct: f64) -> u64 {
    let raw = leads as f64 * rate_pct / 100.0;
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.floor() as u64
}
