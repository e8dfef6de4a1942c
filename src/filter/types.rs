use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Case-insensitive substring match on a string field
    Contains,
    Gte,
    Lte,
}

/// Store-neutral query: every condition is ANDed, order entries apply left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterData {
    pub where_clause: Vec<FilterWhereInfo>,
    pub order: Vec<FilterOrderInfo>,
}

impl FilterData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_op(mut self, path: impl Into<String>, operator: FilterOp, data: impl Into<Value>) -> Self {
        self.where_clause.push(FilterWhereInfo {
            path: path.into(),
            operator,
            data: data.into(),
        });
        self
    }

    pub fn where_eq(self, path: impl Into<String>, data: impl Into<Value>) -> Self {
        self.where_op(path, FilterOp::Eq, data)
    }

    pub fn order_by(mut self, path: impl Into<String>, sort: SortDirection) -> Self {
        self.order.push(FilterOrderInfo { path: path.into(), sort });
        self
    }
}

/// One condition on a document field. `path` is dotted (`salaryRange.min`).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub path: String,
    pub operator: FilterOp,
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub path: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Resolve a dotted path inside a JSON document.
pub fn lookup<'a>(doc: &'a serde_json::Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
