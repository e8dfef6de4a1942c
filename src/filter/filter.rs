use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOrderInfo, FilterWhereInfo, SqlResult};

/// Assembles a SELECT over one document table (`id`, `doc`, `created_at`).
pub struct Filter {
    table_name: String,
    where_data: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_data: vec![],
            order_data: vec![],
        })
    }

    pub fn assign(&mut self, data: FilterData) -> &mut Self {
        self.where_data = data.where_clause;
        self.order_data = data.order;
        self
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, 0)?;

        // Insertion order breaks ties, and is the only order when none is requested
        let mut order_parts = FilterOrder::generate(&self.order_data)?;
        order_parts.push("\"created_at\" ASC".to_string());

        let query = [
            "SELECT \"id\", \"doc\"".to_string(),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_clause),
            format!("ORDER BY {}", order_parts.join(", ")),
        ]
        .join(" ");

        Ok(SqlResult { query, params })
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }
}
