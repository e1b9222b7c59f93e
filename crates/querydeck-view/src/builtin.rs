//! Built-in view processors.
//!
//! Chart views expect the query to alias its columns as `label` and `value`;
//! the line view instead reads the first column as labels and every further
//! column as a numeric series.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::processor::{Processed, Processor, Validation};
use crate::registry::ViewDefinition;
use crate::result::{QueryResult, Row};

const NO_DATA: &str = "No data available";

/// Every built-in view, tabular view first.
pub fn all() -> Vec<(ViewDefinition, Processor)> {
    vec![
        table(),
        bar(),
        line(),
        pie(),
        number(),
        metric(),
        gauge(),
        empty(),
    ]
}

fn field(row: &Row, key: &str) -> Value {
    row.get(key).cloned().unwrap_or(Value::Null)
}

/// Numeric coercion for chart series: numbers pass, numeric strings parse,
/// booleans count as 1/0, anything else has no numeric value.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// Table
// ============================================================================

/// Rows and columns as-is. Never rejects.
pub fn table() -> (ViewDefinition, Processor) {
    (
        ViewDefinition::new("table", "Table")
            .description("Display data in a tabular format with rows and columns"),
        Processor::new(),
    )
}

// ============================================================================
// Bar
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct BarChartData {
    labels: Vec<Value>,
    values: Vec<Value>,
}

/// `label`/`value` rows as parallel label and value lists.
pub fn bar() -> (ViewDefinition, Processor) {
    let processor = Processor::new()
        .transform(|raw, _| {
            Processed::serialize(&BarChartData {
                labels: raw.rows.iter().map(|r| field(r, "label")).collect(),
                values: raw.rows.iter().map(|r| field(r, "value")).collect(),
            })
        })
        .validate(|data| match BarChartData::deserialize(data) {
            Ok(d) if !d.labels.is_empty() && !d.values.is_empty() => Validation::ok(),
            _ => Validation::fail("Bar chart requires non-empty labels and values"),
        });

    (
        ViewDefinition::new("bar", "Bar").description(
            "Compare values across categories using rectangular bars. \
             The query should return label and value columns.",
        ),
        processor,
    )
}

// ============================================================================
// Line
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct LineSeries {
    name: String,
    data: Vec<Option<f64>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LineChartData {
    labels: Vec<String>,
    series: Vec<LineSeries>,
}

fn line_transform(raw: &QueryResult) -> Processed {
    let Some((label_col, value_cols)) = raw.columns.split_first() else {
        return Processed::invalid("Line chart requires at least one column");
    };

    let labels = raw
        .rows
        .iter()
        .map(|r| as_label(&field(r, &label_col.name)))
        .collect();
    let series = value_cols
        .iter()
        .map(|col| LineSeries {
            name: col.name.clone(),
            data: raw
                .rows
                .iter()
                .map(|r| as_number(&field(r, &col.name)))
                .collect(),
        })
        .collect();

    Processed::serialize(&LineChartData { labels, series })
}

/// First column as labels, remaining columns as numeric series.
pub fn line() -> (ViewDefinition, Processor) {
    let processor = Processor::new()
        .transform(|raw, _| line_transform(raw))
        .validate(|data| {
            let Ok(chart) = LineChartData::deserialize(data) else {
                return Validation::fail("Invalid data structure for line chart");
            };
            if chart.series.is_empty() {
                return Validation::fail("Invalid data structure for line chart");
            }
            if chart.series.iter().any(|s| s.data.iter().any(Option::is_none)) {
                return Validation::fail("All series must contain valid numeric data");
            }
            Validation::ok()
        });

    (
        ViewDefinition::new("line", "Line").description(
            "Show how values change over time. The first column holds labels, \
             every further column is plotted as a series.",
        ),
        processor,
    )
}

// ============================================================================
// Pie
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct PieSlice {
    name: Value,
    value: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct PieChartData {
    data: Vec<PieSlice>,
}

/// `label`/`value` rows as named slices.
pub fn pie() -> (ViewDefinition, Processor) {
    let processor = Processor::new()
        .transform(|raw, _| {
            Processed::serialize(&PieChartData {
                data: raw
                    .rows
                    .iter()
                    .map(|r| PieSlice {
                        name: field(r, "label"),
                        value: field(r, "value"),
                    })
                    .collect(),
            })
        })
        .validate(|data| match PieChartData::deserialize(data) {
            Ok(d) if !d.data.is_empty() => Validation::ok(),
            _ => Validation::fail("Pie chart requires non-empty data"),
        });

    (
        ViewDefinition::new("pie", "Pie")
            .description("Display data as a circular chart divided into slices"),
        processor,
    )
}

// ============================================================================
// Single-value views
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct SingleValue {
    value: Value,
    #[serde(default)]
    label: Value,
}

impl SingleValue {
    fn from_row(row: &Row) -> Self {
        Self {
            value: field(row, "value"),
            label: field(row, "label"),
        }
    }
}

fn first_row_value(raw: &QueryResult) -> Processed {
    match raw.rows.first() {
        Some(row) => Processed::serialize(&SingleValue::from_row(row)),
        None => Processed::invalid(NO_DATA),
    }
}

fn require_numeric(data: &Value, message: &str) -> Validation {
    if data.get("value").is_some_and(Value::is_number) {
        Validation::ok()
    } else {
        Validation::fail(message)
    }
}

/// Exactly one row rendered as a big number with an optional label.
pub fn number() -> (ViewDefinition, Processor) {
    let processor = Processor::new()
        .transform(|raw, _| {
            if raw.row_count() != 1 {
                return Processed::invalid("Number view requires exactly one row of data");
            }
            first_row_value(raw)
        })
        .validate(|data| {
            let numeric = require_numeric(data, "Number view requires a valid numeric value");
            if !numeric.is_valid {
                return numeric;
            }
            match data.get("label") {
                None | Some(Value::Null) | Some(Value::String(_)) => Validation::ok(),
                Some(_) => Validation::fail("Label must be a string if provided"),
            }
        });

    (
        ViewDefinition::new("number", "Number").description("Display data as a number"),
        processor,
    )
}

/// First row's `value`, shown as a headline metric.
pub fn metric() -> (ViewDefinition, Processor) {
    let processor = Processor::new()
        .transform(|raw, _| first_row_value(raw))
        .validate(|data| require_numeric(data, "Metric requires a numeric value"));

    (
        ViewDefinition::new("metric", "Metric")
            .description("Display the first row's value as a headline metric"),
        processor,
    )
}

/// First row's `value`, shown on a gauge.
pub fn gauge() -> (ViewDefinition, Processor) {
    let processor = Processor::new()
        .transform(|raw, _| first_row_value(raw))
        .validate(|data| require_numeric(data, "Gauge requires a numeric value"));

    (
        ViewDefinition::new("gauge", "Gauge").description("Display data as a gauge chart"),
        processor,
    )
}

// ============================================================================
// Empty
// ============================================================================

/// Placeholder panel that ignores the result.
pub fn empty() -> (ViewDefinition, Processor) {
    let processor = Processor::new()
        .transform(|_, _| Processed::valid(serde_json::json!({ "message": NO_DATA })))
        .validate(|data| match data.get("message").and_then(Value::as_str) {
            Some(m) if !m.is_empty() => Validation::ok(),
            _ => Validation::fail("Empty view requires a message"),
        });

    (
        ViewDefinition::new("empty", "Empty").description("Placeholder with no data"),
        processor,
    )
}
