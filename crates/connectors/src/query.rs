/// SQL dialect used when rendering a bounded range query.
///
/// Both supported drivers use `?` placeholders, so the dialect only decides
/// identifier quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    fn quote(&self, ident: &str) -> String {
        match self {
            Dialect::MySql => format!("`{ident}`"),
            Dialect::Sqlite => format!("\"{ident}\""),
        }
    }
}

/// Describes the table slice a stream reads from.
///
/// `order_by` is mandatory: offset pagination without a stable order can skip
/// or repeat rows. The optional filter clause is pushed down to the source
/// verbatim and must not contain placeholders.
#[derive(Debug, Clone)]
pub struct TableQuery {
    table: String,
    columns: Vec<String>,
    order_by: String,
    filter: Option<String>,
}

impl TableQuery {
    pub fn new(table: &str, order_by: &str) -> Self {
        TableQuery {
            table: table.to_string(),
            columns: Vec::new(),
            order_by: order_by.to_string(),
            filter: None,
        }
    }

    /// Restricts the projection; the default is all columns.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Adds a WHERE clause evaluated at the source.
    pub fn filter(mut self, clause: &str) -> Self {
        self.filter = Some(clause.to_string());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Renders `SELECT .. FROM .. [WHERE ..] ORDER BY .. LIMIT ? OFFSET ?`.
    /// Limit and offset are always bound as parameters, never interpolated.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let projection = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|c| dialect.quote(c))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!(
            "SELECT {projection} FROM {}",
            dialect.quote(&self.table)
        );

        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }

        sql.push_str(&format!(
            " ORDER BY {} ASC LIMIT ? OFFSET ?",
            dialect.quote(&self.order_by)
        ));

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_star_projection_by_default() {
        let sql = TableQuery::new("user_data", "user_id").to_sql(Dialect::MySql);
        assert_eq!(
            sql,
            "SELECT * FROM `user_data` ORDER BY `user_id` ASC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn renders_explicit_columns_and_filter() {
        let sql = TableQuery::new("user_data", "user_id")
            .columns(&["user_id", "age"])
            .filter("age > 25")
            .to_sql(Dialect::Sqlite);
        assert_eq!(
            sql,
            "SELECT \"user_id\", \"age\" FROM \"user_data\" WHERE age > 25 \
             ORDER BY \"user_id\" ASC LIMIT ? OFFSET ?"
        );
    }
}
