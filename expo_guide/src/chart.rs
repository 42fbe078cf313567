//! Chart specifications for the ROI calculator.
//!
//! Renderers (Plotly in the browser, plotters on the command line) draw from
//! these structs and never recompute metrics themselves.

use serde::{Deserialize, Serialize};

use crate::roi::RoiMetrics;

pub const GAUGE_MIN: f64 = -100.0;
pub const GAUGE_MAX: f64 = 300.0;
pub const GAUGE_THRESHOLD: f64 = 0.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BarSeries {
    pub label: String,
    pub value: f64,
    /// CSS-style hex colour.
    pub color: String,
}

/// Cost against expected revenue, one bar each.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComparisonChart {
    pub title: String,
    pub bars: [BarSeries; 2],
}

impl ComparisonChart {
    pub fn y_max(&self) -> f64 {
        self.bars
            .iter()
            .map(|b| b.value)
            .fold(0.0, f64::max)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GaugeZone {
    pub from: f64,
    pub to: f64,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GaugeSpec {
    pub title: String,
    /// The ROI as computed; shown as the numeric readout.
    pub value: f64,
    /// Needle position, clamped to `range`.
    pub display_value: f64,
    pub range: (f64, f64),
    pub zones: Vec<GaugeZone>,
    pub threshold: f64,
    pub threshold_color: String,
}

pub fn comparison_chart(metrics: &RoiMetrics) -> ComparisonChart {
    ComparisonChart {
        title: "Cost vs Expected Revenue".to_string(),
        bars: [
            BarSeries {
                label: "Total Cost".to_string(),
                value: metrics.total_cost,
                color: "#EF553B".to_string(),
            },
            BarSeries {
                label: "Expected Revenue".to_string(),
                value: metrics.expected_revenue,
                color: "#00CC96".to_string(),
            },
        ],
    }
}

/// ROI gauge. Only the needle is clamped; `value` keeps the real ROI so the
/// readout and the summary table agree.
pub fn roi_gauge(metrics: &RoiMetrics) -> GaugeSpec {
    GaugeSpec {
        title: "ROI (%)".to_string(),
        value: metrics.roi_pct,
        display_value: metrics.roi_pct.clamp(GAUGE_MIN, GAUGE_MAX),
        range: (GAUGE_MIN, GAUGE_MAX),
        zones: vec![
            GaugeZone {
                from: GAUGE_MIN,
                to: GAUGE_THRESHOLD,
                color: "#D3D3D3".to_string(),
            },
            GaugeZone {
                from: GAUGE_THRESHOLD,
                to: GAUGE_MAX,
                color: "#90EE90".to_string(),
            },
        ],
        threshold: GAUGE_THRESHOLD,
        threshold_color: "#FF0000".to_string(),
    }
}
