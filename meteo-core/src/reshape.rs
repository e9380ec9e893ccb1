//! Turns the column-oriented series of a forecast response into a [`Table`].
//!
//! A response looks like
//!
//! ```json
//! {
//!   "latitude": 20.59, "longitude": 74.37, "elevation": 560.0, "timezone": "UTC",
//!   "hourly": { "time": ["2024-01-01T00:00"], "temperature_2m": [5.3] },
//!   "hourly_units": { "temperature_2m": "°C" }
//! }
//! ```
//!
//! and becomes one row per timestamp with the columns
//! `[location] latitude longitude elevation "time (UTC)" "temperature_2m (°C)"`.

use serde_json::{Map, Value};

use crate::{
    error::{Result, WeatherError},
    model::Table,
    params::QueryParams,
};

const DEFAULT_TIMEZONE: &str = "UTC";

pub fn reshape(
    payload: &Value,
    data_key: &str,
    location_name: Option<&str>,
    params: &QueryParams,
) -> Result<Table> {
    let root = payload.as_object().ok_or_else(|| {
        WeatherError::InvalidPayload("response body is not a JSON object".to_string())
    })?;

    let block = root
        .get(data_key)
        .ok_or_else(|| WeatherError::MissingKey(data_key.to_string()))?;
    let series = block.as_object().ok_or_else(|| WeatherError::InvalidSeries {
        data_key: data_key.to_string(),
        series: data_key.to_string(),
    })?;

    let timestamps = match series.get("time") {
        None => &[][..],
        Some(time) => as_series(data_key, "time", time)?,
    };

    let units = root
        .get(&format!("{data_key}_units"))
        .and_then(Value::as_object);

    let mut labels = Vec::new();
    let mut columns = Vec::new();
    for (key, values) in series.iter().filter(|(key, _)| key.as_str() != "time") {
        let values = as_series(data_key, key, values)?;
        if values.len() != timestamps.len() {
            return Err(WeatherError::MisalignedSeries {
                series: key.clone(),
                expected: timestamps.len(),
                found: values.len(),
            });
        }
        labels.push(series_label(key, units));
        columns.push(values);
    }

    let location = location_name.filter(|name| !name.is_empty());
    let latitude = metadata(root, "latitude", params.latitude);
    let longitude = metadata(root, "longitude", params.longitude);
    let elevation = metadata(root, "elevation", params.elevation);

    let mut header = Vec::with_capacity(labels.len() + 5);
    if location.is_some() {
        header.push("location".to_string());
    }
    header.extend(["latitude", "longitude", "elevation"].map(String::from));
    header.push(time_label(root));
    header.extend(labels);

    for (i, label) in header.iter().enumerate() {
        if header[..i].contains(label) {
            return Err(WeatherError::DuplicateColumn(label.clone()));
        }
    }

    let mut table = Table::new(header);
    for (i, timestamp) in timestamps.iter().enumerate() {
        let mut row = Vec::with_capacity(table.columns().len());
        if let Some(name) = location {
            row.push(Value::String(name.to_string()));
        }
        row.extend([latitude.clone(), longitude.clone(), elevation.clone()]);
        row.push(timestamp.clone());
        row.extend(columns.iter().map(|values| values[i].clone()));
        table.push_row(row)?;
    }

    Ok(table)
}

fn as_series<'a>(data_key: &str, key: &str, value: &'a Value) -> Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| WeatherError::InvalidSeries {
            data_key: data_key.to_string(),
            series: key.to_string(),
        })
}

fn series_label(key: &str, units: Option<&Map<String, Value>>) -> String {
    match units.and_then(|u| u.get(key)).and_then(Value::as_str) {
        Some(unit) if !unit.is_empty() => format!("{key} ({unit})"),
        _ => key.to_string(),
    }
}

// An absent timezone means UTC; an explicit null or empty one drops the suffix.
fn time_label(root: &Map<String, Value>) -> String {
    let timezone = match root.get("timezone") {
        None => DEFAULT_TIMEZONE.to_string(),
        Some(Value::Null) => String::new(),
        Some(Value::String(tz)) => tz.clone(),
        Some(other) => other.to_string(),
    };

    if timezone.is_empty() {
        "time".to_string()
    } else {
        format!("time ({timezone})")
    }
}

fn metadata(root: &Map<String, Value>, key: &str, fallback: Option<f64>) -> Value {
    match root.get(key) {
        Some(value) if !value.is_null() => value.clone(),
        _ => fallback.map(Value::from).unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nashik_payload() -> Value {
        json!({
            "hourly": {
                "time": ["2024-01-01T00:00"],
                "temperature_2m": [5.3]
            },
            "hourly_units": { "temperature_2m": "°C" },
            "timezone": "UTC",
            "latitude": 20.59,
            "longitude": 74.37
        })
    }

    #[test]
    fn single_row_with_location_and_fallback_elevation() {
        let params = QueryParams {
            elevation: Some(560.0),
            ..Default::default()
        };

        let table = reshape(&nashik_payload(), "hourly", Some("Nashik"), &params)
            .expect("payload is valid");

        assert_eq!(
            table.columns(),
            [
                "location",
                "latitude",
                "longitude",
                "elevation",
                "time (UTC)",
                "temperature_2m (°C)"
            ]
        );
        assert_eq!(table.len(), 1);

        let row = table.row(0).expect("one row");
        assert_eq!(row.get("location"), Some(&json!("Nashik")));
        assert_eq!(row.get("latitude"), Some(&json!(20.59)));
        assert_eq!(row.get("longitude"), Some(&json!(74.37)));
        assert_eq!(row.get("elevation"), Some(&json!(560.0)));
        assert_eq!(row.get("time (UTC)"), Some(&json!("2024-01-01T00:00")));
        assert_eq!(row.get("temperature_2m (°C)"), Some(&json!(5.3)));
    }

    #[test]
    fn row_count_matches_timestamps_and_variable_order_is_kept() {
        let payload = json!({
            "latitude": 1.0,
            "longitude": 2.0,
            "elevation": 10.0,
            "timezone": "Asia/Kolkata",
            "hourly": {
                "relative_humidity_2m": [80, 81, 82],
                "time": ["t0", "t1", "t2"],
                "precipitation": [0.0, 0.1, 0.0],
                "weather_code": [1, 2, 3]
            },
            "hourly_units": {
                "relative_humidity_2m": "%",
                "precipitation": "mm",
                "weather_code": ""
            }
        });

        let table = reshape(&payload, "hourly", None, &QueryParams::default())
            .expect("payload is valid");

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.columns(),
            [
                "latitude",
                "longitude",
                "elevation",
                "time (Asia/Kolkata)",
                "relative_humidity_2m (%)",
                "precipitation (mm)",
                "weather_code"
            ]
        );
        assert_eq!(table.get(2, "time (Asia/Kolkata)"), Some(&json!("t2")));
        assert_eq!(table.get(1, "precipitation (mm)"), Some(&json!(0.1)));
        assert_eq!(table.get(2, "weather_code"), Some(&json!(3)));
    }

    #[test]
    fn missing_data_key_names_the_key() {
        let payload = json!({ "daily": { "time": [] } });

        let err = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap_err();

        assert!(matches!(&err, WeatherError::MissingKey(key) if key == "hourly"));
        assert_eq!(err.to_string(), "'hourly' not found in the response");
    }

    #[test]
    fn misaligned_series_fails_fast() {
        let payload = json!({
            "hourly": {
                "time": ["t0", "t1"],
                "temperature_2m": [1.0]
            }
        });

        let err = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap_err();

        assert!(matches!(
            err,
            WeatherError::MisalignedSeries { ref series, expected: 2, found: 1 } if series == "temperature_2m"
        ));
    }

    #[test]
    fn missing_time_with_values_is_misaligned() {
        let payload = json!({ "hourly": { "temperature_2m": [1.0, 2.0] } });

        let err = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap_err();

        assert!(matches!(
            err,
            WeatherError::MisalignedSeries { expected: 0, found: 2, .. }
        ));
    }

    #[test]
    fn missing_time_alone_gives_header_only_table() {
        let payload = json!({ "hourly": {} });

        let table = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap();

        assert!(table.is_empty());
        assert_eq!(
            table.columns(),
            ["latitude", "longitude", "elevation", "time (UTC)"]
        );
    }

    #[test]
    fn data_key_that_is_not_an_object_is_rejected() {
        let payload = json!({ "hourly": 5 });

        let err = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap_err();

        assert!(matches!(
            err,
            WeatherError::InvalidSeries { ref series, .. } if series == "hourly"
        ));
    }

    #[test]
    fn series_named_like_metadata_column_is_rejected() {
        let payload = json!({
            "latitude": 1.0,
            "hourly": { "time": ["t0"], "latitude": [9.0] }
        });

        let err = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap_err();

        assert!(matches!(err, WeatherError::DuplicateColumn(ref label) if label == "latitude"));
    }

    #[test]
    fn series_named_location_clashes_only_with_a_location_name() {
        let payload = json!({ "hourly": { "time": ["t0"], "location": ["x"] } });

        let table = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap();
        assert_eq!(table.get(0, "location"), Some(&json!("x")));

        let err = reshape(&payload, "hourly", Some("Pune"), &QueryParams::default()).unwrap_err();
        assert!(matches!(err, WeatherError::DuplicateColumn(ref label) if label == "location"));
    }

    #[test]
    fn non_array_series_is_rejected() {
        let payload = json!({ "hourly": { "time": ["t0"], "temperature_2m": 5.0 } });

        let err = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidSeries { .. }));
    }

    #[test]
    fn timezone_defaults_to_utc_when_absent() {
        let payload = json!({ "hourly": { "time": ["t0"] } });

        let table = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap();
        assert_eq!(table.columns()[3], "time (UTC)");
    }

    #[test]
    fn null_timezone_gives_bare_time_label() {
        let payload = json!({ "timezone": null, "hourly": { "time": ["t0"] } });

        let table = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap();
        assert_eq!(table.columns()[3], "time");
    }

    #[test]
    fn empty_timezone_gives_bare_time_label() {
        let payload = json!({ "timezone": "", "hourly": { "time": ["t0"] } });

        let table = reshape(&payload, "hourly", None, &QueryParams::default()).unwrap();
        assert_eq!(table.columns()[3], "time");
    }

    #[test]
    fn null_latitude_falls_back_to_request_params() {
        let payload = json!({
            "latitude": null,
            "longitude": 73.86,
            "hourly": { "time": ["t0"] }
        });
        let params = QueryParams::default().with_coordinates(18.5204, 73.8567);

        let table = reshape(&payload, "hourly", None, &params).unwrap();

        assert_eq!(table.get(0, "latitude"), Some(&json!(18.5204)));
        assert_eq!(table.get(0, "longitude"), Some(&json!(73.86)));
    }

    #[test]
    fn coordinates_fall_back_to_request_params() {
        let payload = json!({ "hourly": { "time": ["t0"] } });
        let params = QueryParams::default().with_coordinates(18.5204, 73.8567);

        let table = reshape(&payload, "hourly", None, &params).unwrap();

        assert_eq!(table.get(0, "latitude"), Some(&json!(18.5204)));
        assert_eq!(table.get(0, "longitude"), Some(&json!(73.8567)));
        assert_eq!(table.get(0, "elevation"), Some(&Value::Null));
    }

    #[test]
    fn empty_location_name_adds_no_column() {
        let table = reshape(&nashik_payload(), "hourly", Some(""), &QueryParams::default())
            .unwrap();
        assert_eq!(table.columns()[0], "latitude");
    }

    #[test]
    fn daily_key_uses_daily_units() {
        let payload = json!({
            "daily": { "time": ["2024-01-01"], "temperature_2m_max": [31.2] },
            "daily_units": { "temperature_2m_max": "°C" },
            "hourly_units": { "temperature_2m_max": "wrong" }
        });

        let table = reshape(&payload, "daily", None, &QueryParams::default()).unwrap();
        assert_eq!(table.columns()[4], "temperature_2m_max (°C)");
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = reshape(&json!([1, 2]), "hourly", None, &QueryParams::default()).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidPayload(_)));
    }
}
