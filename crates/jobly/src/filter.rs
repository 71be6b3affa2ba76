//! Per-entity search filter tables.
//!
//! A [`FilterSpec`] is a static whitelist of filter keys. Each [`FilterDef`]
//! renders its SQL comparison for a given placeholder position and says how its
//! value is prepared before binding.
//!
//! # Example
//! ```ignore
//! use jobly::filter::COMPANY_SEARCH;
//!
//! let def = COMPANY_SEARCH.get("minEmployees").unwrap();
//! assert_eq!((def.render)(2), "num_employees >= $2");
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::value::{FieldMap, SqlValue};

/// How a filter value is rewritten before it is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// Bind the value as given.
    Identity,
    /// Substring match: wrap text as `%value%`.
    Contains,
}

impl ValueTransform {
    pub fn apply(self, value: &SqlValue) -> SqlValue {
        match (self, value) {
            (ValueTransform::Contains, SqlValue::Text(s)) => SqlValue::Text(format!("%{s}%")),
            _ => value.clone(),
        }
    }
}

/// One whitelisted filter.
#[derive(Debug, Clone, Copy)]
pub struct FilterDef {
    pub key: &'static str,
    /// Renders the comparison for a 1-based placeholder position.
    pub render: fn(usize) -> String,
    pub transform: ValueTransform,
}

/// The set of filters an entity search accepts.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    entity: &'static str,
    defs: &'static [FilterDef],
}

impl FilterSpec {
    pub const fn new(entity: &'static str, defs: &'static [FilterDef]) -> Self {
        Self { entity, defs }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn get(&self, key: &str) -> Option<&'static FilterDef> {
        self.defs.iter().find(|d| d.key == key)
    }

    /// Check every key against the whitelist and apply value transforms.
    ///
    /// Each entry pairs the matched definition with its transformed value, in
    /// input order. `filters` is left untouched.
    pub fn prepare(&self, filters: &FieldMap) -> JoblyResult<Vec<(&'static FilterDef, SqlValue)>> {
        filters
            .iter()
            .map(|(key, value)| {
                let def = self
                    .get(key)
                    .ok_or_else(|| JoblyError::UnknownFilterKey(key.to_string()))?;
                Ok((def, def.transform.apply(value)))
            })
            .collect()
    }
}

fn num_employees_gte(n: usize) -> String {
    format!("num_employees >= ${n}")
}

fn num_employees_lte(n: usize) -> String {
    format!("num_employees <= ${n}")
}

fn name_ilike(n: usize) -> String {
    format!("name ILIKE ${n}")
}

fn title_ilike(n: usize) -> String {
    format!("title ILIKE ${n}")
}

fn salary_gte(n: usize) -> String {
    format!("salary >= ${n}")
}

fn has_equity(n: usize) -> String {
    format!("(equity > 0) = ${n}")
}

/// Filters accepted by company search.
pub static COMPANY_SEARCH: FilterSpec = FilterSpec::new(
    "company",
    &[
        FilterDef {
            key: "minEmployees",
            render: num_employees_gte,
            transform: ValueTransform::Identity,
        },
        FilterDef {
            key: "maxEmployees",
            render: num_employees_lte,
            transform: ValueTransform::Identity,
        },
        FilterDef {
            key: "nameLike",
            render: name_ilike,
            transform: ValueTransform::Contains,
        },
    ],
);

/// Filters accepted by job search.
pub static JOB_SEARCH: FilterSpec = FilterSpec::new(
    "job",
    &[
        FilterDef {
            key: "titleLike",
            render: title_ilike,
            transform: ValueTransform::Contains,
        },
        FilterDef {
            key: "minSalary",
            render: salary_gte,
            transform: ValueTransform::Identity,
        },
        FilterDef {
            key: "hasEquity",
            render: has_equity,
            transform: ValueTransform::Identity,
        },
    ],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_fragments() {
        let render = |k: &str, n| (COMPANY_SEARCH.get(k).unwrap().render)(n);
        assert_eq!(render("minEmployees", 1), "num_employees >= $1");
        assert_eq!(render("maxEmployees", 2), "num_employees <= $2");
        assert_eq!(render("nameLike", 3), "name ILIKE $3");
    }

    #[test]
    fn job_fragments() {
        let render = |k: &str, n| (JOB_SEARCH.get(k).unwrap().render)(n);
        assert_eq!(render("titleLike", 1), "title ILIKE $1");
        assert_eq!(render("minSalary", 4), "salary >= $4");
        assert_eq!(render("hasEquity", 2), "(equity > 0) = $2");
    }

    #[test]
    fn specs_do_not_share_keys() {
        assert!(COMPANY_SEARCH.get("minSalary").is_none());
        assert!(JOB_SEARCH.get("nameLike").is_none());
    }

    #[test]
    fn contains_wraps_text_only() {
        assert_eq!(
            ValueTransform::Contains.apply(&SqlValue::from("net")),
            SqlValue::from("%net%")
        );
        assert_eq!(ValueTransform::Contains.apply(&SqlValue::Int(3)), SqlValue::Int(3));
        assert_eq!(
            ValueTransform::Identity.apply(&SqlValue::from("net")),
            SqlValue::from("net")
        );
    }

    #[test]
    fn prepare_does_not_touch_caller_map() {
        let filters = FieldMap::new().with("nameLike", "net").with("minEmployees", 5);
        let prepared = COMPANY_SEARCH.prepare(&filters).unwrap();

        assert_eq!(filters.get("nameLike"), Some(&SqlValue::from("net")));
        let keys: Vec<_> = prepared.iter().map(|(def, _)| def.key).collect();
        assert_eq!(keys, vec!["nameLike", "minEmployees"]);
        assert_eq!(prepared[0].1, SqlValue::from("%net%"));
        assert_eq!(prepared[1].1, SqlValue::Int(5));
    }

    #[test]
    fn prepare_rejects_unknown_key() {
        let filters = FieldMap::new().with("minEmployees", 1).with("color", "red");
        match COMPANY_SEARCH.prepare(&filters) {
            Err(JoblyError::UnknownFilterKey(key)) => assert_eq!(key, "color"),
            other => panic!("expected UnknownFilterKey, got {other:?}"),
        }
    }
}
