use serde_json::Value;
use thiserror::Error;

/// Client-fault input problems. Detected before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing sensorId")]
    MissingSensorId,
    #[error("missing location")]
    MissingLocation,
    #[error("missing pressure")]
    MissingPressure,
    #[error("pressure must be a number")]
    PressureNotNumeric,
    #[error("limit must be a positive integer")]
    InvalidLimit,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("invalid query string: {0}")]
    InvalidQuery(String),
}

impl ValidationError {
    /// Fields the client has to supply to fix this error.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::InvalidLimit => &["limit"],
            Self::InvalidQuery(_) => &[],
            _ => &["sensorId", "location", "pressure"],
        }
    }
}

/// Unvalidated submission as received from a client.
///
/// Has no `is_leaking` field; classification is always recomputed from
/// `pressure`.
#[derive(Debug, Clone, Default)]
pub struct RawReading {
    pub sensor_id: Option<Value>,
    pub location: Option<Value>,
    pub pressure: Option<Value>,
}

/// A submission that passed every check, with trimmed text fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReading {
    pub sensor_id: String,
    pub location: String,
    pub pressure: f64,
}

/// Check fields in a fixed order; the first failure wins.
pub fn validate(raw: RawReading) -> Result<ValidReading, ValidationError> {
    let sensor_id = non_empty(raw.sensor_id).ok_or(ValidationError::MissingSensorId)?;
    let location = non_empty(raw.location).ok_or(ValidationError::MissingLocation)?;
    let pressure = match raw.pressure {
        None | Some(Value::Null) => return Err(ValidationError::MissingPressure),
        Some(v) => parse_pressure(&v)?,
    };

    Ok(ValidReading {
        sensor_id,
        location,
        pressure,
    })
}

/// Accepts JSON numbers and numeric strings (`"4.2"`, `" 3 "`). NaN and
/// infinities are rejected.
pub fn parse_pressure(value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|p| p.is_finite())
        .ok_or(ValidationError::PressureNotNumeric)
}

/// Parse an optional `?limit=` value. Absent means "use the default".
///
/// Any run of digits above zero is accepted; values too large for `u32`
/// saturate and are clamped later by the service.
pub fn parse_limit(raw: Option<&str>) -> Result<Option<u32>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.bytes().all(|b| b.is_ascii_digit()) => {
            // All digits, so parsing only fails on overflow.
            let n = s.parse::<u64>().unwrap_or(u64::MAX);
            if n == 0 {
                return Err(ValidationError::InvalidLimit);
            }
            Ok(Some(u32::try_from(n).unwrap_or(u32::MAX)))
        }
        Some(_) => Err(ValidationError::InvalidLimit),
    }
}

/// Strings are trimmed, numbers are taken as their decimal text.
/// Anything else, or a blank result, counts as missing.
fn non_empty(value: Option<Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(text).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(sensor_id: Option<&str>, location: Option<&str>, pressure: Option<Value>) -> RawReading {
        RawReading {
            sensor_id: sensor_id.map(Value::from),
            location: location.map(Value::from),
            pressure,
        }
    }

    #[test]
    fn valid_numeric_pressure() {
        let v = validate(raw(Some("S1"), Some("BasementA"), Some(json!(4.0)))).unwrap();
        assert_eq!(v.sensor_id, "S1");
        assert_eq!(v.location, "BasementA");
        assert_eq!(v.pressure, 4.0);
    }

    #[test]
    fn numeric_string_pressure_is_coerced() {
        let v = validate(raw(Some("S1"), Some("Kitchen"), Some(json!(" 1.25 ")))).unwrap();
        assert_eq!(v.pressure, 1.25);
    }

    #[test]
    fn integer_pressure_is_accepted() {
        let v = validate(raw(Some("S1"), Some("Kitchen"), Some(json!(0)))).unwrap();
        assert_eq!(v.pressure, 0.0);
    }

    #[test]
    fn text_fields_are_trimmed() {
        let v = validate(raw(Some("  S1 "), Some(" Kitchen\t"), Some(json!(1)))).unwrap();
        assert_eq!(v.sensor_id, "S1");
        assert_eq!(v.location, "Kitchen");
    }

    #[test]
    fn missing_sensor_id() {
        let err = validate(raw(None, Some("Kitchen"), Some(json!(1.0)))).unwrap_err();
        assert_eq!(err, ValidationError::MissingSensorId);
    }

    #[test]
    fn blank_sensor_id_counts_as_missing() {
        let err = validate(raw(Some("   "), Some("Kitchen"), Some(json!(1.0)))).unwrap_err();
        assert_eq!(err, ValidationError::MissingSensorId);
    }

    #[test]
    fn numeric_sensor_id_is_taken_as_text() {
        let r = RawReading {
            sensor_id: Some(json!(7)),
            location: Some(json!("Kitchen")),
            pressure: Some(json!(1.0)),
        };
        assert_eq!(validate(r).unwrap().sensor_id, "7");
    }

    #[test]
    fn non_text_fields_count_as_missing() {
        let r = RawReading {
            sensor_id: Some(json!({"id": 1})),
            location: Some(json!("Kitchen")),
            pressure: Some(json!(1.0)),
        };
        assert_eq!(validate(r).unwrap_err(), ValidationError::MissingSensorId);

        let r = RawReading {
            sensor_id: Some(json!("S1")),
            location: Some(json!(true)),
            pressure: Some(json!(1.0)),
        };
        assert_eq!(validate(r).unwrap_err(), ValidationError::MissingLocation);
    }

    #[test]
    fn missing_location() {
        let err = validate(raw(Some("S1"), Some(""), Some(json!(1.0)))).unwrap_err();
        assert_eq!(err, ValidationError::MissingLocation);
    }

    #[test]
    fn missing_pressure() {
        let err = validate(raw(Some("S1"), Some("Kitchen"), None)).unwrap_err();
        assert_eq!(err, ValidationError::MissingPressure);

        let err = validate(raw(Some("S1"), Some("Kitchen"), Some(Value::Null))).unwrap_err();
        assert_eq!(err, ValidationError::MissingPressure);
    }

    #[test]
    fn first_failure_wins() {
        let err = validate(RawReading::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingSensorId);

        let err = validate(raw(Some("S1"), None, Some(json!("abc")))).unwrap_err();
        assert_eq!(err, ValidationError::MissingLocation);
    }

    #[test]
    fn non_numeric_pressure_rejected() {
        for bad in [json!("abc"), json!(""), json!(true), json!([1.0]), json!({"v": 1})] {
            let err = validate(raw(Some("S1"), Some("Kitchen"), Some(bad.clone()))).unwrap_err();
            assert_eq!(err, ValidationError::PressureNotNumeric, "input {bad}");
        }
    }

    #[test]
    fn non_finite_pressure_strings_rejected() {
        for bad in ["NaN", "inf", "-infinity"] {
            assert_eq!(
                parse_pressure(&json!(bad)).unwrap_err(),
                ValidationError::PressureNotNumeric
            );
        }
    }

    #[test]
    fn parse_limit_cases() {
        assert_eq!(parse_limit(None).unwrap(), None);
        assert_eq!(parse_limit(Some("")).unwrap(), None);
        assert_eq!(parse_limit(Some("2")).unwrap(), Some(2));
        assert_eq!(parse_limit(Some("0")).unwrap_err(), ValidationError::InvalidLimit);
        assert_eq!(parse_limit(Some("-3")).unwrap_err(), ValidationError::InvalidLimit);
        assert_eq!(parse_limit(Some("ten")).unwrap_err(), ValidationError::InvalidLimit);
        assert_eq!(parse_limit(Some("1.5")).unwrap_err(), ValidationError::InvalidLimit);
    }

    #[test]
    fn oversized_limit_saturates() {
        assert_eq!(parse_limit(Some("5000000000")).unwrap(), Some(u32::MAX));
        assert_eq!(
            parse_limit(Some("99999999999999999999999999")).unwrap(),
            Some(u32::MAX)
        );
        assert_eq!(parse_limit(Some("000")).unwrap_err(), ValidationError::InvalidLimit);
    }

    #[test]
    fn required_fields_for_submission_errors() {
        assert_eq!(
            ValidationError::MissingPressure.required_fields(),
            ["sensorId", "location", "pressure"]
        );
        assert_eq!(ValidationError::InvalidLimit.required_fields(), ["limit"]);
        assert!(ValidationError::InvalidQuery("x".into()).required_fields().is_empty());
    }
}
