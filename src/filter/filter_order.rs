use super::types::{FilterOrderInfo, SortColumn, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Resolve caller-supplied `sort` / `order` against the allow-list.
    ///
    /// Unknown values never error: they fall back to the column's default and
    /// ascending order, so nothing the caller types can reach the query text.
    pub fn validate_and_parse<S: SortColumn>(sort: Option<&str>, order: Option<&str>) -> FilterOrderInfo<S> {
        let column = match sort.filter(|s| !s.trim().is_empty()) {
            Some(raw) => S::parse(raw).unwrap_or_else(|| {
                tracing::debug!("ignoring sort field outside allow-list: {:?}", raw);
                S::default()
            }),
            None => S::default(),
        };

        let sort = match order.filter(|s| !s.trim().is_empty()) {
            Some(raw) => SortDirection::parse(raw).unwrap_or_else(|| {
                tracing::debug!("ignoring unknown sort order: {:?}", raw);
                SortDirection::Asc
            }),
            None => SortDirection::Asc,
        };

        FilterOrderInfo { column, sort }
    }

    /// `ORDER BY` clause; `id` breaks ties so equal keys come back in a stable order.
    pub fn generate<S: SortColumn>(info: &FilterOrderInfo<S>) -> String {
        let column = info.column.column();
        if column == "id" {
            format!("ORDER BY \"id\" {}", info.sort.to_sql())
        } else {
            format!("ORDER BY \"{}\" {}, \"id\" ASC", column, info.sort.to_sql())
        }
    }
}
