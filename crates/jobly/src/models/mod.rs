//! Company and job models.
//!
//! Each operation takes the executor as `&impl GenericClient`, so callers decide
//! whether it runs on a pooled connection or inside their own transaction.

mod company;
mod job;

pub use company::{Company, CompanyDetail, NewCompany};
pub use job::{Job, NewJob};

use crate::changeset::{ValidationCode, ValidationError, ValidationErrors};
use crate::error::{JoblyError, JoblyResult};
use crate::validate::is_url;
use crate::value::{FieldMap, SqlValue};
use rust_decimal::Decimal;

/// What an updatable field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRule {
    /// Non-blank text.
    RequiredText,
    /// Any text, but not null.
    Text,
    /// Null, or an integer from 0 up to `i32::MAX`.
    Count,
    /// Null, or an absolute URL.
    Url,
    /// Null, or a number from 0 to 1.
    Fraction,
}

impl FieldRule {
    fn check(self, field: &str, value: &SqlValue, errs: &mut ValidationErrors) {
        use FieldRule::*;

        let problem = match (self, value) {
            (RequiredText, SqlValue::Text(s)) if s.trim().is_empty() => {
                Some((ValidationCode::Required, format!("{field} is required")))
            }
            (RequiredText | Text, SqlValue::Text(_)) => None,
            (RequiredText, SqlValue::Null) => {
                Some((ValidationCode::Required, format!("{field} is required")))
            }
            (RequiredText | Text, _) => Some((
                ValidationCode::Custom("string".to_string()),
                format!("{field} must be a string"),
            )),
            (_, SqlValue::Null) => None,
            (Count, SqlValue::Int(n)) if (0..=i64::from(i32::MAX)).contains(n) => None,
            (Count, SqlValue::Int(n)) if *n < 0 => Some((
                ValidationCode::Range,
                format!("{field} must be greater than or equal to 0"),
            )),
            (Count, SqlValue::Int(_)) => {
                Some((ValidationCode::Range, format!("{field} is too large")))
            }
            (Count, _) => Some((ValidationCode::Number, format!("{field} must be an integer"))),
            (Url, SqlValue::Text(s)) if is_url(s) => None,
            (Url, _) => Some((ValidationCode::Url, format!("{field} must be a URL"))),
            (Fraction, v) => match as_decimal(v) {
                Some(d) if d >= Decimal::ZERO && d <= Decimal::ONE => None,
                Some(_) => Some((
                    ValidationCode::Range,
                    format!("{field} must be between 0 and 1"),
                )),
                None => Some((ValidationCode::Number, format!("{field} must be a number"))),
            },
        };

        if let Some((code, message)) = problem {
            errs.push(ValidationError::new(field, code, message));
        }
    }
}

/// The decimal a value binds as in a `numeric` column, if it has one.
fn as_decimal(value: &SqlValue) -> Option<Decimal> {
    match value {
        SqlValue::Int(n) => Some(Decimal::from(*n)),
        SqlValue::Float(x) => Decimal::try_from(*x).ok(),
        SqlValue::Decimal(d) => Some(*d),
        SqlValue::Text(s) => s.parse().ok(),
        SqlValue::Null | SqlValue::Bool(_) => None,
    }
}

/// Check update fields against `rules` before any SQL is built.
///
/// Keys without a rule are rejected together. Otherwise every value is checked
/// and all problems are reported at once.
fn check_update(data: &FieldMap, rules: &[(&str, FieldRule)]) -> JoblyResult<()> {
    let rule_for = |key: &str| rules.iter().find(|(k, _)| *k == key).map(|(_, r)| *r);

    let rejected: Vec<&str> = data.keys().filter(|k| rule_for(k).is_none()).collect();
    if !rejected.is_empty() {
        return Err(JoblyError::bad_request(format!(
            "Fields cannot be updated: {}",
            rejected.join(", ")
        )));
    }

    let mut errs = ValidationErrors::default();
    for (key, value) in data.iter() {
        if let Some(rule) = rule_for(key) {
            rule.check(key, value, &mut errs);
        }
    }
    errs.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &[(&str, FieldRule)] = &[
        ("name", FieldRule::RequiredText),
        ("description", FieldRule::Text),
        ("numEmployees", FieldRule::Count),
        ("logoUrl", FieldRule::Url),
        ("equity", FieldRule::Fraction),
    ];

    fn message(data: &FieldMap) -> String {
        match check_update(data, RULES) {
            Err(JoblyError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn updatable_fields_pass() {
        let data = FieldMap::new()
            .with("name", "x")
            .with("description", "")
            .with("numEmployees", 10)
            .with("logoUrl", "http://x.img")
            .with("equity", "0.5");
        assert!(check_update(&data, RULES).is_ok());
    }

    #[test]
    fn nullable_fields_accept_null() {
        let data = FieldMap::new()
            .with("numEmployees", SqlValue::Null)
            .with("logoUrl", SqlValue::Null)
            .with("equity", SqlValue::Null);
        assert!(check_update(&data, RULES).is_ok());
    }

    #[test]
    fn rejected_fields_are_listed() {
        let rules = &[
            ("title", FieldRule::RequiredText),
            ("salary", FieldRule::Count),
            ("equity", FieldRule::Fraction),
        ];
        let data = FieldMap::new().with("id", 3).with("title", "x").with("companyHandle", "c1");
        let err = check_update(&data, rules).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Fields cannot be updated: id, companyHandle");
    }

    #[test]
    fn wrong_value_types_are_bad_requests() {
        let data: FieldMap = serde_json::from_str(r#"{"numEmployees": "ten", "name": 5}"#).unwrap();
        assert_eq!(
            message(&data),
            "numEmployees must be an integer; name must be a string"
        );

        let data = FieldMap::new().with("description", SqlValue::Null);
        assert_eq!(message(&data), "description must be a string");

        let data = FieldMap::new().with("numEmployees", 2.5);
        assert_eq!(message(&data), "numEmployees must be an integer");
    }

    #[test]
    fn out_of_range_values_are_bad_requests() {
        let data = FieldMap::new()
            .with("numEmployees", -1)
            .with("logoUrl", "not a url")
            .with("equity", 1.5)
            .with("name", "  ");
        assert_eq!(
            message(&data),
            "numEmployees must be greater than or equal to 0; logoUrl must be a URL; \
             equity must be between 0 and 1; name is required"
        );

        let data = FieldMap::new().with("numEmployees", i64::from(i32::MAX) + 1);
        assert_eq!(message(&data), "numEmployees is too large");
    }

    #[test]
    fn fraction_accepts_every_numeric_form() {
        for value in [
            SqlValue::Int(1),
            SqlValue::Float(0.25),
            SqlValue::Decimal(Decimal::new(5, 2)),
            SqlValue::from("0"),
        ] {
            let data = FieldMap::new().with("equity", value);
            assert!(check_update(&data, RULES).is_ok());
        }

        let data = FieldMap::new().with("equity", "lots");
        assert_eq!(message(&data), "equity must be a number");
        let data = FieldMap::new().with("equity", true);
        assert_eq!(message(&data), "equity must be a number");
    }

    #[test]
    fn empty_update_is_left_to_the_clause_builder() {
        assert!(check_update(&FieldMap::new(), RULES).is_ok());
    }
}
