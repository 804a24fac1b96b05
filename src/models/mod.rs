use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub mod account;
pub mod activity;
pub mod event;
pub mod grade;
pub mod mentor;
pub mod points;
pub mod session;
pub mod student;

/// An RFC 3339 timestamp
#[derive(sqlx::Type, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[sqlx(transparent)]
pub struct DateTime(pub OffsetDateTime);

#[Scalar]
impl ScalarType for DateTime {
    fn parse(value: Value) -> InputValueResult<Self> {
        if let Value::String(date_str) = &value {
            if let Ok(datetime) = OffsetDateTime::parse(date_str, &Rfc3339) {
                return Ok(DateTime(datetime));
            }
        }

        Err(InputValueError::expected_type(value))
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.format(&Rfc3339).unwrap_or_default())
    }
}

impl From<OffsetDateTime> for DateTime {
    fn from(datetime: OffsetDateTime) -> Self {
        DateTime(datetime)
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::{ScalarType, Value};
    use time::macros::datetime;

    use super::DateTime;

    #[test]
    fn parses_rfc3339_strings() {
        let parsed = DateTime::parse(Value::String("2026-11-02T09:30:00Z".to_owned())).unwrap();
        assert_eq!(parsed, DateTime(datetime!(2026-11-02 09:30 UTC)));
    }

    #[test]
    fn rejects_other_values() {
        assert!(DateTime::parse(Value::String("next tuesday".to_owned())).is_err());
        assert!(DateTime::parse(Value::Boolean(true)).is_err());
    }

    #[test]
    fn formats_as_rfc3339() {
        let value = DateTime(datetime!(2026-11-02 09:30 UTC)).to_value();
        assert_eq!(value, Value::String("2026-11-02T09:30:00Z".to_owned()));
    }
}
