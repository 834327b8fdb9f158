//! Request validation for create, login and settings payloads.
//!
//! Every validator takes the raw submitted field map and either produces a
//! normalized input (strings trimmed, numbers coerced, optional text set to
//! `None` when absent or blank) or a [`ValidationError`]. Nothing here
//! touches a store, so a rejected request never reaches persistence.

use serde_json::{Map, Value};

use crate::types::{NewOrder, NewTicket, Settings};

/// A submitted JSON object, keyed by field name.
pub type FieldMap = Map<String, Value>;

/// Why a submitted payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more required fields are absent, null or blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A field is present but has the wrong type or an unacceptable value.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// Offending field name.
        field: &'static str,
        /// Human-readable reason.
        reason: &'static str,
    },

    /// The body is not valid JSON or not a JSON object.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// A query parameter could not be parsed.
    #[error("invalid query parameter {name}: {reason}")]
    InvalidQuery {
        /// Parameter name.
        name: &'static str,
        /// Human-readable reason.
        reason: &'static str,
    },
}

/// Email and password as submitted to the login endpoint, both trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Parse a raw request body into a field map.
///
/// An empty (or whitespace-only) body is an empty map, so a bodyless POST
/// reports the missing fields instead of a parse error.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedBody`] if the bytes are not JSON or the
/// JSON is not an object.
pub fn field_map_from_slice(bytes: &[u8]) -> Result<FieldMap, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(FieldMap::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::MalformedBody(
            "expected a JSON object".to_owned(),
        )),
        Err(e) => Err(ValidationError::MalformedBody(e.to_string())),
    }
}

/// Validate an order creation payload.
///
/// Required: `item`, `quantity` (integer >= 1), `sector`, `nameOrStore`.
/// Optional: `obs`.
///
/// # Errors
///
/// [`ValidationError::MissingFields`] names every missing required field;
/// otherwise the first wrongly-typed field is reported.
pub fn validate_new_order(fields: &FieldMap) -> Result<NewOrder, ValidationError> {
    let mut missing = Vec::new();
    let item = required_text(fields, "item", &mut missing)?;
    let quantity = match fields.get("quantity") {
        None | Some(Value::Null) => {
            missing.push("quantity");
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            missing.push("quantity");
            None
        }
        Some(value) => Some(parse_quantity(value).ok_or(ValidationError::InvalidField {
            field: "quantity",
            reason: "must be a positive integer",
        })?),
    };
    let sector = required_text(fields, "sector", &mut missing)?;
    let name_or_store = required_text(fields, "nameOrStore", &mut missing)?;
    let obs = optional_text(fields, "obs")?;

    match (item, quantity, sector, name_or_store) {
        (Some(item), Some(quantity), Some(sector), Some(name_or_store)) if missing.is_empty() => {
            Ok(NewOrder {
                item,
                quantity,
                obs,
                sector,
                name_or_store,
            })
        }
        _ => Err(ValidationError::MissingFields(missing)),
    }
}

/// Validate a TI ticket creation payload.
///
/// Required: `title`, `sector`, `nameOrStore`. Optional: `description`.
///
/// # Errors
///
/// Same policy as [`validate_new_order`].
pub fn validate_new_ticket(fields: &FieldMap) -> Result<NewTicket, ValidationError> {
    let mut missing = Vec::new();
    let title = required_text(fields, "title", &mut missing)?;
    let sector = required_text(fields, "sector", &mut missing)?;
    let name_or_store = required_text(fields, "nameOrStore", &mut missing)?;
    let description = optional_text(fields, "description")?;

    match (title, sector, name_or_store) {
        (Some(title), Some(sector), Some(name_or_store)) if missing.is_empty() => Ok(NewTicket {
            title,
            description,
            sector,
            name_or_store,
        }),
        _ => Err(ValidationError::MissingFields(missing)),
    }
}

/// Validate a login payload.
///
/// # Errors
///
/// [`ValidationError::MissingFields`] when `email` or `password` is absent or
/// blank.
pub fn validate_login(fields: &FieldMap) -> Result<Credentials, ValidationError> {
    let mut missing = Vec::new();
    let email = required_text(fields, "email", &mut missing)?;
    let password = required_text(fields, "password", &mut missing)?;
    match (email, password) {
        (Some(email), Some(password)) => Ok(Credentials { email, password }),
        _ => Err(ValidationError::MissingFields(missing)),
    }
}

/// Normalize a settings write.
///
/// Absent or null values become `""`; blank strings are kept as `""` so a
/// write can clear a previously stored value.
///
/// # Errors
///
/// [`ValidationError::InvalidField`] if a value is neither a string nor null.
pub fn validate_settings(fields: &FieldMap) -> Result<Settings, ValidationError> {
    Ok(Settings {
        sector: optional_text(fields, "sector")?.unwrap_or_default(),
        name_or_store: optional_text(fields, "nameOrStore")?.unwrap_or_default(),
    })
}

/// Coerce a JSON value into a quantity in `1..=i32::MAX`.
///
/// Accepts integers, integral floats and numeric strings.
pub(crate) fn parse_quantity(value: &Value) -> Option<i32> {
    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX))
                .map(|f| f as i64)
        })?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(number).ok().filter(|q| *q >= 1)
}

/// Read a required string field, recording it as missing when absent, null
/// or blank.
fn required_text(
    fields: &FieldMap,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Result<Option<String>, ValidationError> {
    let value = optional_text(fields, name)?;
    if value.is_none() {
        missing.push(name);
    }
    Ok(value)
}

/// Read an optional string field: absent, null or blank is `None`.
pub(crate) fn optional_text(
    fields: &FieldMap,
    name: &'static str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
        }
        Some(_) => Err(ValidationError::InvalidField {
            field: name,
            reason: "must be a string",
        }),
    }
}
