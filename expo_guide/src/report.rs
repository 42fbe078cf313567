use std::fmt;

use serde::{Deserialize, Serialize};

use crate::roi::{RoiInputs, RoiMetrics};
use crate::ExpoError;

pub const EXPORT_FILENAME: &str = "exhibition_roi_simulation.csv";
pub const EXPORT_MIME: &str = "text/csv";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SummaryValue {
    Amount(f64),
    Count(u64),
    Percent(f64),
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryValue::Amount(v) => write!(f, "{}", v),
            SummaryValue::Count(v) => write!(f, "{}", v),
            SummaryValue::Percent(v) => write!(f, "{:.1}%", v),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: SummaryValue,
}

/// The ten-row scenario summary, always in the same order.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

pub const SUMMARY_LABELS: [&str; 10] = [
    "Booth Cost",
    "Staff Cost",
    "Marketing Cost",
    "Misc Cost",
    "Total Cost",
    "Leads",
    "Conversion Rate",
    "Expected Deals",
    "Expected Revenue",
    "ROI",
];

pub fn summary_table(inputs: &RoiInputs, metrics: &RoiMetrics) -> SummaryTable {
    let values = [
        SummaryValue::Amount(inputs.booth_cost),
        SummaryValue::Amount(inputs.staff_cost),
        SummaryValue::Amount(inputs.marketing_cost),
        SummaryValue::Amount(inputs.misc_cost),
        SummaryValue::Amount(metrics.total_cost),
        SummaryValue::Count(inputs.leads),
        SummaryValue::Percent(inputs.conversion_rate_pct),
        SummaryValue::Count(metrics.expected_deals),
        SummaryValue::Amount(metrics.expected_revenue),
        SummaryValue::Percent(metrics.roi_pct),
    ];
    let rows = SUMMARY_LABELS
        .iter()
        .zip(values)
        .map(|(&label, value)| SummaryRow { label, value })
        .collect();
    SummaryTable { rows }
}

impl SummaryTable {
    /// Header of labels followed by a single row of formatted values.
    pub fn to_csv(&self) -> Result<Vec<u8>, ExpoError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.rows.iter().map(|row| row.label))
            .map_err(|e| ExpoError::Csv(e.to_string()))?;
        writer
            .write_record(self.rows.iter().map(|row| row.value.to_string()))
            .map_err(|e| ExpoError::Csv(e.to_string()))?;
        writer.into_inner().map_err(|e| ExpoError::Csv(e.to_string()))
    }

    pub fn to_csv_string(&self) -> Result<String, ExpoError> {
        let bytes = self.to_csv()?;
        String::from_utf8(bytes).map_err(|e| ExpoError::Csv(e.to_string()))
    }

    pub fn get(&self, label: &str) -> Option<&SummaryValue> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| &row.value)
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        for row in &self.rows {
            writeln!(f, "{:<width$}  {}", row.label, row.value, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::compute_metrics;

    fn reference() -> SummaryTable {
        let inputs = RoiInputs::default();
        summary_table(&inputs, &compute_metrics(&inputs))
    }

    #[test]
    fn ten_rows_in_fixed_order() {
        let table = reference();
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, SUMMARY_LABELS.to_vec());
    }

    #[test]
    fn percent_rows_have_one_decimal_and_sign() {
        let table = reference();
        assert_eq!(table.get("Conversion Rate").unwrap().to_string(), "5.0%");
        assert_eq!(table.get("ROI").unwrap().to_string(), "252.9%");
        assert_eq!(table.get("Expected Deals").unwrap().to_string(), "10");
        assert_eq!(table.get("Total Cost").unwrap().to_string(), "850");
    }

    #[test]
    fn csv_has_header_and_one_data_row() {
        let text = reference().to_csv_string().unwrap();
        assert_eq!(
            text,
            "Booth Cost,Staff Cost,Marketing Cost,Misc Cost,Total Cost,Leads,\
             Conversion Rate,Expected Deals,Expected Revenue,ROI\n\
             500,200,100,50,850,200,5.0%,10,3000,252.9%\n"
        );
    }

    #[test]
    fn csv_export_is_byte_identical_across_calls() {
        let inputs = RoiInputs {
            booth_cost: 1200.5,
            staff_cost: 0.0,
            marketing_cost: 75.25,
            misc_cost: 3.0,
            leads: 87,
            conversion_rate_pct: 12.3,
            deal_value: 99.99,
        };
        let first = summary_table(&inputs, &compute_metrics(&inputs)).to_csv().unwrap();
        let second = summary_table(&inputs, &compute_metrics(&inputs)).to_csv().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn table_keeps_unclamped_roi() {
        let mut inputs = RoiInputs::default();
        inputs.deal_value = 3000.0;
        let table = summary_table(&inputs, &compute_metrics(&inputs));
        assert_eq!(table.get("ROI").unwrap().to_string(), "3429.4%");
    }

    #[test]
    fn display_aligns_labels() {
        let text = reference().to_string();
        assert_eq!(text.lines().count(), 10);
        assert!(text.lines().next().unwrap().starts_with("Booth Cost  "));
    }
}
