use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, ListParams, SortColumn, SqlResult};

/// A validated listing request: optional search term plus an allow-listed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter<S: SortColumn> {
    pub search: Option<String>,
    pub order: FilterOrderInfo<S>,
}

impl<S: SortColumn> Filter<S> {
    pub fn from_params(params: &ListParams) -> Self {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            search,
            order: FilterOrder::validate_and_parse(params.sort.as_deref(), params.order.as_deref()),
        }
    }

    /// Build `SELECT <columns> FROM <table> WHERE ... ORDER BY ...`.
    ///
    /// `table`, `columns` and `search_columns` are constants owned by the
    /// repository; only the search term travels as a bound parameter.
    pub fn to_sql(&self, table: &'static str, columns: &'static str, search_columns: &[&'static str]) -> SqlResult {
        let (where_clause, params) = FilterWhere::new(0)
            .search(search_columns, self.search.as_deref())
            .generate();
        let order_clause = FilterOrder::generate(&self.order);

        let query = format!(
            "SELECT {} FROM \"{}\" WHERE {} {}",
            columns, table, where_clause, order_clause
        );
        SqlResult { query, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::{AssignmentSort, SortDirection};

    #[test]
    fn builds_full_listing_query() {
        let params = ListParams {
            search: Some("  Essay ".into()),
            sort: Some("title".into()),
            order: Some("desc".into()),
        };
        let filter = Filter::<AssignmentSort>::from_params(&params);
        assert_eq!(filter.search.as_deref(), Some("Essay"));
        assert_eq!(filter.order.sort, SortDirection::Desc);

        let sql = filter.to_sql("assignments", "*", &["title", "description"]);
        assert_eq!(
            sql.query,
            "SELECT * FROM \"assignments\" WHERE (\"title\" ILIKE $1 ESCAPE '\\' OR \"description\" ILIKE $1 ESCAPE '\\') ORDER BY \"title\" DESC, \"id\" ASC"
        );
        assert_eq!(sql.params.len(), 1);
    }

    #[test]
    fn defaults_without_params() {
        let filter = Filter::<AssignmentSort>::from_params(&ListParams::default());
        let sql = filter.to_sql("assignments", "id, title", &["title"]);
        assert_eq!(
            sql.query,
            "SELECT id, title FROM \"assignments\" WHERE 1=1 ORDER BY \"id\" ASC"
        );
        assert!(sql.params.is_empty());
    }
}
