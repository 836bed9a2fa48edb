// Chart payload normalization
//
// The chart endpoints answer in whichever shape the server-side query
// happened to produce. `normalize_chart` folds all of them into an
// ordered list of `{name, value}` points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::coerce_f64;

/// Label used for array items that carry neither `name` nor `label`.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The four dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKey {
    SalaryDistribution,
    #[serde(rename = "employees-by-poste")]
    EmployeesByPosition,
    PaymentsByMonth,
    PaymentsByType,
}

impl ChartKey {
    pub const ALL: [Self; 4] = [
        Self::SalaryDistribution,
        Self::EmployeesByPosition,
        Self::PaymentsByMonth,
        Self::PaymentsByType,
    ];

    /// Path segment under `/dashboard/charts/`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SalaryDistribution => "salary-distribution",
            Self::EmployeesByPosition => "employees-by-poste",
            Self::PaymentsByMonth => "payments-by-month",
            Self::PaymentsByType => "payments-by-type",
        }
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown chart: {s}"))
    }
}

/// One labelled value of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Whether `payload` is a `{labels: [...], data: [...]}` series.
pub(crate) fn is_labelled_series(payload: &Value) -> bool {
    matches!(
        (payload.get("labels"), payload.get("data")),
        (Some(Value::Array(_)), Some(Value::Array(_)))
    )
}

/// Normalize a chart payload into ordered points.
///
/// Recognized shapes, checked in this order:
/// 1. `{labels: [...], data: [...]}`, zipped by index (a label without a
///    matching value gets 0);
/// 2. an array of objects, named by `name` or `label` and valued by a
///    truthy `value` or else `count`;
/// 3. a plain object, one point per entry in key order.
///
/// Anything else normalizes to an empty series.
pub fn normalize_chart(payload: &Value) -> Vec<ChartPoint> {
    match payload {
        Value::Object(map) => {
            if let (Some(Value::Array(labels)), Some(Value::Array(data))) =
                (map.get("labels"), map.get("data"))
            {
                return labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| {
                        ChartPoint::new(label_text(label), data.get(i).map_or(0.0, coerce_f64))
                    })
                    .collect();
            }
            map.iter()
                .map(|(name, value)| ChartPoint::new(name.clone(), coerce_f64(value)))
                .collect()
        }
        Value::Array(items) => items.iter().map(array_point).collect(),
        _ => Vec::new(),
    }
}

fn array_point(item: &Value) -> ChartPoint {
    let name = ["name", "label"]
        .iter()
        .filter_map(|key| item.get(*key))
        .find(|v| is_truthy(v))
        .map_or_else(|| UNKNOWN_LABEL.to_owned(), label_text);

    let value = item
        .get("value")
        .filter(|v| is_truthy(v))
        .or_else(|| item.get("count"))
        .map_or(0.0, coerce_f64);

    ChartPoint::new(name, value)
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
