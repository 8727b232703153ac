use serde_json::Value;

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Case-insensitive substring match of `term` against any of `columns`.
    ///
    /// One bound parameter is shared by every column. `%`, `_` and `\` in the
    /// term match literally.
    pub fn search(mut self, columns: &[&'static str], term: Option<&str>) -> Self {
        let term = match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => return self,
        };
        if columns.is_empty() {
            return self;
        }

        let placeholder = self.param(Value::String(format!("%{}%", escape_like(term))));
        let parts: Vec<String> = columns
            .iter()
            .map(|c| format!("\"{}\" ILIKE {} ESCAPE '\\'", c, placeholder))
            .collect();
        self.conditions.push(format!("({})", parts.join(" OR ")));
        self
    }

    /// WHERE body (without the keyword) and its parameters; `1=1` when unconstrained.
    pub fn generate(self) -> (String, Vec<Value>) {
        let where_clause = if self.conditions.is_empty() {
            "1=1".to_string()
        } else {
            self.conditions.join(" AND ")
        };
        (where_clause, self.param_values)
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
