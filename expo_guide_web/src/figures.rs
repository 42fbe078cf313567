//! Plotly figure JSON and input parsing for the browser front end.
//! Kept free of `web_sys` so it can be tested natively.

use expo_guide::{ComparisonChart, GaugeSpec};
use serde_json::{json, Value};

pub fn comparison_figure(chart: &ComparisonChart) -> (Value, Value) {
    let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
    let values: Vec<f64> = chart.bars.iter().map(|b| b.value).collect();
    let colors: Vec<&str> = chart.bars.iter().map(|b| b.color.as_str()).collect();
    let text: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
    let traces = json!([{
        "type": "bar",
        "x": labels,
        "y": values,
        "text": text,
        "textposition": "auto",
        "marker": { "color": colors },
    }]);
    let layout = json!({
        "title": { "text": chart.title },
        "barmode": "group",
        "showlegend": false,
        "margin": { "l": 60, "r": 20, "t": 50, "b": 40 },
    });
    (traces, layout)
}

/// Plotly clips the gauge bar to the axis range on its own, so the trace
/// carries the raw ROI and the number readout stays exact.
pub fn gauge_figure(gauge: &GaugeSpec) -> (Value, Value) {
    let steps: Vec<Value> = gauge
        .zones
        .iter()
        .map(|z| json!({ "range": [z.from, z.to], "color": z.color }))
        .collect();
    let traces = json!([{
        "type": "indicator",
        "mode": "gauge+number",
        "value": gauge.value,
        "number": { "suffix": "%", "valueformat": ".1f" },
        "title": { "text": gauge.title },
        "gauge": {
            "axis": { "range": [gauge.range.0, gauge.range.1] },
            "bar": { "color": "#1f77b4" },
            "steps": steps,
            "threshold": {
                "line": { "color": gauge.threshold_color, "width": 4 },
                "thickness": 0.75,
                "value": gauge.threshold,
            },
        },
    }]);
    let layout = json!({ "margin": { "l": 30, "r": 30, "t": 60, "b": 20 } });
    (traces, layout)
}

/// Non-negative finite amount; anything else leaves the field unchanged.
pub fn parse_amount(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

pub fn parse_count(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| parse_amount(trimmed).map(|v| v.floor() as u64))
}

pub fn parse_rate(text: &str) -> Option<f64> {
    parse_amount(text).map(|v| v.min(100.0))
}

/// Thousands-separated amount with at most two decimals.
pub fn fmt_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let is_zero = whole.bytes().all(|b| b == b'0') && cents == "00";
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if cents == "00" {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{cents}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expo_guide::{comparison_chart, compute_metrics, roi_gauge, RoiInputs};

    #[test]
    fn bar_trace_carries_both_series() {
        let chart = comparison_chart(&compute_metrics(&RoiInputs::default()));
        let (traces, layout) = comparison_figure(&chart);
        assert_eq!(traces[0]["type"], "bar");
        assert_eq!(traces[0]["x"], json!(["Total Cost", "Expected Revenue"]));
        assert_eq!(traces[0]["y"], json!([850.0, 3000.0]));
        assert_eq!(layout["title"]["text"], "Cost vs Expected Revenue");
    }

    #[test]
    fn gauge_trace_has_range_zones_and_red_threshold() {
        let gauge = roi_gauge(&compute_metrics(&RoiInputs::default()));
        let (traces, _) = gauge_figure(&gauge);
        let g = &traces[0]["gauge"];
        assert_eq!(traces[0]["type"], "indicator");
        assert_eq!(g["axis"]["range"], json!([-100.0, 300.0]));
        assert_eq!(g["steps"].as_array().map(Vec::len), Some(2));
        assert_eq!(g["threshold"]["value"], json!(0.0));
        assert_eq!(g["threshold"]["line"]["color"], "#FF0000");
    }

    #[test]
    fn inputs_parse_like_bounded_widgets() {
        assert_eq!(parse_amount(" 500 "), Some(500.0));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_count("200"), Some(200));
        assert_eq!(parse_count("12.7"), Some(12));
        assert_eq!(parse_rate("150"), Some(100.0));
        assert_eq!(parse_rate("4.9"), Some(4.9));
    }

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(fmt_amount(850.0), "850");
        assert_eq!(fmt_amount(1_234_567.5), "1,234,567.50");
        assert_eq!(fmt_amount(4.25), "4.25");
        assert_eq!(fmt_amount(-2150.0), "-2,150");
        assert_eq!(fmt_amount(0.0), "0");
    }

    #[test]
    fn huge_amounts_keep_every_digit() {
        assert_eq!(fmt_amount(1e20), "100,000,000,000,000,000,000");
        assert_eq!(fmt_amount(-3e19), "-30,000,000,000,000,000,000");
    }
}
