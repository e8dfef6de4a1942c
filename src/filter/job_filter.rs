use serde::Deserialize;

use super::error::FilterError;
use super::types::{FilterData, FilterOp, SortDirection};

pub const HR_EMAIL: &str = "hr_email";
pub const TITLE: &str = "title";
pub const SALARY_MIN: &str = "salaryRange.min";
pub const SALARY_MAX: &str = "salaryRange.max";

/// Raw query string of `GET /job`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobQuery {
    pub email: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Both bounds of a salary filter; a lone bound is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
}

/// Validated job search. Each field adds one independent condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub hr_email: Option<String>,
    pub title_contains: Option<String>,
    pub salary: Option<SalaryRange>,
    pub sort_by_salary_desc: bool,
}

impl JobFilter {
    pub fn from_query(query: &JobQuery) -> Result<Self, FilterError> {
        let min = parse_bound("min", present(&query.min))?;
        let max = parse_bound("max", present(&query.max))?;

        Ok(Self {
            hr_email: present(&query.email).map(str::to_string),
            title_contains: present(&query.search).map(str::to_string),
            salary: match (min, max) {
                (Some(min), Some(max)) => Some(SalaryRange { min, max }),
                _ => None,
            },
            sort_by_salary_desc: query.sort.as_deref() == Some("true"),
        })
    }

    pub fn to_filter_data(&self) -> FilterData {
        let mut data = FilterData::new();
        if let Some(email) = &self.hr_email {
            data = data.where_eq(HR_EMAIL, email.as_str());
        }
        if let Some(search) = &self.title_contains {
            data = data.where_op(TITLE, FilterOp::Contains, search.as_str());
        }
        if let Some(range) = self.salary {
            data = data
                .where_op(SALARY_MIN, FilterOp::Gte, range.min)
                .where_op(SALARY_MAX, FilterOp::Lte, range.max);
        }
        if self.sort_by_salary_desc {
            data = data.order_by(SALARY_MIN, SortDirection::Desc);
        }
        data
    }
}

// Empty parameters (`?email=`) count as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_bound(field: &str, value: Option<&str>) -> Result<Option<i64>, FilterError> {
    value
        .map(|v| {
            v.trim().parse::<i64>().map_err(|_| FilterError::InvalidNumber {
                field: field.to_string(),
                value: v.to_string(),
            })
        })
        .transpose()
}
