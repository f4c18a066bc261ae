use serde_json::Value;

use crate::shape::ColumnKind;

pub enum FieldValue<'a> {
    Omitted,
    Null,
    Present(&'a Value),
}

pub fn classify_field(optional_value: Option<&Value>) -> FieldValue<'_> {
    match optional_value {
        None => FieldValue::Omitted,
        Some(Value::Null) => FieldValue::Null,
        Some(value) => FieldValue::Present(value),
    }
}

/// Returns the expected-type description when `value` does not fit `kind`.
pub fn check_kind(kind: ColumnKind, value: &Value) -> Result<(), &'static str> {
    let fits = match kind {
        ColumnKind::Text => value.is_string(),
        ColumnKind::Integer | ColumnKind::Reference => value
            .as_i64()
            .is_some_and(|number| i32::try_from(number).is_ok()),
        ColumnKind::Boolean => value.is_boolean(),
        ColumnKind::Timestamp => value.is_string(),
        ColumnKind::TextArray => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
    };

    if fits {
        Ok(())
    } else {
        Err(kind.expected())
    }
}
