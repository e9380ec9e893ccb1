use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Value of a query parameter the crate has no dedicated field for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Integer(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Query parameters sent with every forecast request.
///
/// Well-known options get typed fields; anything else lands in `extra` and is
/// forwarded verbatim. In TOML the extra options sit next to the typed ones:
///
/// ```toml
/// [params]
/// hourly = ["temperature_2m", "precipitation"]
/// timezone = "auto"
/// models = "best_match"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hourly: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daily: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub current: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_days: Option<u32>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, ParamValue>,
}

impl QueryParams {
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Flatten into `(name, value)` pairs ready for the query string.
    ///
    /// Lists are joined with commas, unset options and empty lists are left out.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();

        let mut scalar = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                query.push((name.to_string(), value));
            }
        };

        scalar("latitude", self.latitude.map(|v| v.to_string()));
        scalar("longitude", self.longitude.map(|v| v.to_string()));
        scalar("elevation", self.elevation.map(|v| v.to_string()));
        scalar("hourly", join_list(&self.hourly));
        scalar("daily", join_list(&self.daily));
        scalar("current", join_list(&self.current));
        scalar("timezone", self.timezone.clone());
        scalar("start_date", self.start_date.map(|d| d.format("%Y-%m-%d").to_string()));
        scalar("end_date", self.end_date.map(|d| d.format("%Y-%m-%d").to_string()));
        scalar("past_days", self.past_days.map(|v| v.to_string()));
        scalar("forecast_days", self.forecast_days.map(|v| v.to_string()));

        for (name, value) in &self.extra {
            if matches!(value, ParamValue::List(items) if items.is_empty()) {
                continue;
            }
            query.push((name.clone(), value.to_string()));
        }

        query
    }
}

fn join_list(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join(","))
}
