//! Boundary validation for search query strings.
//!
//! Query strings arrive as untyped `key=value` pairs. [`CompanySearch`] and
//! [`JobSearch`] declare the accepted keys as explicit optional fields, coerce
//! each value to its column type, and check cross-field rules once. Only then
//! are the present fields turned into a [`FieldMap`] for the clause builder.

use crate::changeset::{ValidationCode, ValidationError, ValidationErrors};
use crate::error::JoblyResult;
use crate::value::FieldMap;
use serde::{Deserialize, Serialize};

/// Returns `true` if `s` parses as an absolute URL.
pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

fn parse_count(field: &str, raw: &str, errs: &mut ValidationErrors) -> Option<i32> {
    match raw.trim().parse::<i32>() {
        Ok(n) if n >= 0 => Some(n),
        Ok(_) => {
            errs.push(ValidationError::new(
                field,
                ValidationCode::Range,
                format!("{field} must be greater than or equal to 0"),
            ));
            None
        }
        Err(_) => {
            errs.push(ValidationError::new(
                field,
                ValidationCode::Number,
                format!("{field} must be a number"),
            ));
            None
        }
    }
}

fn parse_bool(field: &str, raw: &str, errs: &mut ValidationErrors) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            errs.push(ValidationError::new(
                field,
                ValidationCode::Boolean,
                format!("{field} must be true or false"),
            ));
            None
        }
    }
}

fn unknown_key(key: &str, errs: &mut ValidationErrors) {
    errs.push(ValidationError::new(
        key,
        ValidationCode::UnknownField,
        format!("{key} is not an allowed search parameter"),
    ));
}

/// Company search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanySearch {
    pub name_like: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl CompanySearch {
    /// Parse and validate query-string pairs.
    pub fn from_query<'a, I>(pairs: I) -> JoblyResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut errs = ValidationErrors::default();
        let mut search = Self::default();

        for (key, raw) in pairs {
            match key {
                "nameLike" => search.name_like = Some(raw.to_string()),
                "minEmployees" => search.min_employees = parse_count(key, raw, &mut errs),
                "maxEmployees" => search.max_employees = parse_count(key, raw, &mut errs),
                _ => unknown_key(key, &mut errs),
            }
        }

        errs.into_result()?;
        search.validate()?;
        Ok(search)
    }

    /// Cross-field checks: `minEmployees <= maxEmployees` when both are set.
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errs = ValidationErrors::default();
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                errs.push(ValidationError::new(
                    "minEmployees",
                    ValidationCode::Range,
                    "minEmployees cannot be greater than maxEmployees",
                ));
            }
        }
        errs.into_result()
    }

    /// The present fields as company filter keys, in declaration order.
    pub fn to_filters(&self) -> FieldMap {
        let mut filters = FieldMap::new();
        if let Some(n) = self.min_employees {
            filters.insert("minEmployees", n);
        }
        if let Some(n) = self.max_employees {
            filters.insert("maxEmployees", n);
        }
        if let Some(name) = &self.name_like {
            filters.insert("nameLike", name.as_str());
        }
        filters
    }
}

/// Job search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobSearch {
    pub title_like: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

impl JobSearch {
    /// Parse and validate query-string pairs.
    pub fn from_query<'a, I>(pairs: I) -> JoblyResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut errs = ValidationErrors::default();
        let mut search = Self::default();

        for (key, raw) in pairs {
            match key {
                "titleLike" => search.title_like = Some(raw.to_string()),
                "minSalary" => search.min_salary = parse_count(key, raw, &mut errs),
                "hasEquity" => search.has_equity = parse_bool(key, raw, &mut errs),
                _ => unknown_key(key, &mut errs),
            }
        }

        errs.into_result()?;
        Ok(search)
    }

    /// The present fields as job filter keys, in declaration order.
    ///
    /// `hasEquity=false` places no constraint and is left out.
    pub fn to_filters(&self) -> FieldMap {
        let mut filters = FieldMap::new();
        if let Some(title) = &self.title_like {
            filters.insert("titleLike", title.as_str());
        }
        if let Some(n) = self.min_salary {
            filters.insert("minSalary", n);
        }
        if self.has_equity == Some(true) {
            filters.insert("hasEquity", true);
        }
        filters
    }
}
