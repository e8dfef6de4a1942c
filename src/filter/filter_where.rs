use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::{lookup, FilterOp, FilterWhereInfo};

/// Renders where-conditions to SQL over the `doc` JSONB column, and evaluates
/// the same conditions against in-memory documents.
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(conditions: &[FilterWhereInfo], starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(conditions)
    }

    fn build(&mut self, conditions: &[FilterWhereInfo]) -> Result<(String, Vec<Value>), FilterError> {
        let mut sql_conditions = vec![];
        for condition in conditions {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, self.param_values.clone()))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let path = json_path(&condition.path)?;
        match condition.operator {
            FilterOp::Eq => {
                let cast = match &condition.data {
                    Value::String(_) => "text",
                    Value::Bool(_) => "boolean",
                    Value::Number(n) if n.is_i64() || n.is_u64() => "bigint",
                    Value::Number(_) => "double precision",
                    other => {
                        return Err(FilterError::InvalidOperatorData(format!(
                            "$eq on '{}' requires a scalar, got {}",
                            condition.path, other
                        )))
                    }
                };
                let param = self.param(condition.data.clone());
                Ok(format!("doc #> {} = to_jsonb({}::{})", path, param, cast))
            }
            FilterOp::Contains => {
                let needle = condition.data.as_str().ok_or_else(|| {
                    FilterError::InvalidOperatorData(format!("$contains on '{}' requires a string", condition.path))
                })?;
                let param = self.param(Value::String(format!("%{}%", escape_like(needle))));
                Ok(format!(
                    "CASE WHEN jsonb_typeof(doc #> {path}) = 'string' THEN (doc #>> {path}) ILIKE {param} ELSE FALSE END"
                ))
            }
            FilterOp::Gte | FilterOp::Lte => {
                if !condition.data.is_number() {
                    return Err(FilterError::InvalidOperatorData(format!(
                        "range on '{}' requires a number",
                        condition.path
                    )));
                }
                let op = if condition.operator == FilterOp::Gte { ">=" } else { "<=" };
                let param = self.param(condition.data.clone());
                Ok(format!(
                    "CASE WHEN jsonb_typeof(doc #> {path}) = 'number' THEN (doc #>> {path})::numeric {op} {param} ELSE FALSE END"
                ))
            }
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    /// True when the document satisfies every condition.
    pub fn matches(conditions: &[FilterWhereInfo], doc: &Map<String, Value>) -> bool {
        conditions.iter().all(|condition| Self::matches_one(condition, doc))
    }

    fn matches_one(condition: &FilterWhereInfo, doc: &Map<String, Value>) -> bool {
        let Some(value) = lookup(doc, &condition.path) else {
            return false;
        };
        match condition.operator {
            FilterOp::Eq => value == &condition.data,
            FilterOp::Contains => match (value.as_str(), condition.data.as_str()) {
                (Some(haystack), Some(needle)) => haystack.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            FilterOp::Gte => match (value.as_f64(), condition.data.as_f64()) {
                (Some(v), Some(bound)) => v >= bound,
                _ => false,
            },
            FilterOp::Lte => match (value.as_f64(), condition.data.as_f64()) {
                (Some(v), Some(bound)) => v <= bound,
                _ => false,
            },
        }
    }
}

/// `salaryRange.min` -> `'{salaryRange,min}'`. Segments are restricted to
/// identifier characters since they are inlined into the statement.
pub fn json_path(path: &str) -> Result<String, FilterError> {
    let segments: Vec<&str> = path.split('.').collect();
    let valid = segments.iter().all(|s| {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if !valid {
        return Err(FilterError::InvalidFieldPath(path.to_string()));
    }
    Ok(format!("'{{{}}}'", segments.join(",")))
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
