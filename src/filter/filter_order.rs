use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter_where::json_path;
use super::types::{lookup, FilterOrderInfo, SortDirection};

/// Sorting on numeric document fields. Documents whose field is missing or
/// not a number always sort after the numeric ones, in either direction.
pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(infos: &[FilterOrderInfo]) -> Result<Vec<String>, FilterError> {
        infos
            .iter()
            .map(|i| -> Result<String, FilterError> {
                let path = json_path(&i.path)?;
                Ok(format!(
                    "CASE WHEN jsonb_typeof(doc #> {path}) = 'number' THEN (doc #>> {path})::numeric END {} NULLS LAST",
                    i.sort.to_sql()
                ))
            })
            .collect()
    }

    /// Comparator equivalent to the generated ORDER BY; ties compare equal so a
    /// stable sort keeps insertion order.
    pub fn compare(infos: &[FilterOrderInfo], a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
        for info in infos {
            let left = lookup(a, &info.path).and_then(Value::as_f64);
            let right = lookup(b, &info.path).and_then(Value::as_f64);
            let ordering = match (left, right) {
                (Some(l), Some(r)) => {
                    let natural = l.partial_cmp(&r).unwrap_or(Ordering::Equal);
                    match info.sort {
                        SortDirection::Asc => natural,
                        SortDirection::Desc => natural.reverse(),
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
