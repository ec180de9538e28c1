use core::fmt::Write;

use crate::schema::TableDefinition;

impl TableDefinition {
    /// `CREATE TABLE IF NOT EXISTS` for the declared columns and key.
    ///
    /// An auto-increment key is declared inline as
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`; any other key becomes a
    /// table-level `PRIMARY KEY (...)` constraint.
    pub fn create_table_sql(&self) -> String {
        let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (", self.table_name);
        let mut inline_key = false;

        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            if column.auto_increment {
                let _ = write!(sql, "{} INTEGER PRIMARY KEY AUTOINCREMENT", column.name);
                inline_key = true;
                continue;
            }
            let _ = write!(sql, "{} {}", column.name, column.data_type.sql_name(column.max_length));
            if !column.nullable {
                sql.push_str(" NOT NULL");
            }
        }

        if self.has_primary_key() && !inline_key {
            let key: Vec<&str> = self.primary_key().map(|column| column.name.as_str()).collect();
            let _ = write!(sql, ", PRIMARY KEY ({})", key.join(", "));
        }
        sql.push(')');
        sql
    }

    /// One `CREATE [UNIQUE] INDEX IF NOT EXISTS` per declared index.
    pub fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
                    if index.unique { "UNIQUE " } else { "" },
                    index.name,
                    self.table_name,
                    index.columns.join(", ")
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Define, Entity, MappingRegistry};

    #[derive(Default)]
    struct Order {
        customer_id: String,
        order_id: i32,
        total: Option<f64>,
    }

    crate::fields!(Order {
        CUSTOMER_ID => customer_id: String,
        ORDER_ID => order_id: i32,
        TOTAL => total: Option<f64>,
    });

    impl Entity for Order {
        fn define(table: &mut Define<Self>) {
            table.table_name("Orders");
            table.column(Self::CUSTOMER_ID);
            table.column(Self::ORDER_ID);
            table.column(Self::TOTAL);
            table
                .primary_key(&[&Self::CUSTOMER_ID, &Self::ORDER_ID])
                .max_length(&Self::CUSTOMER_ID, 5)
                .index(&[&Self::TOTAL]);
        }
    }

    #[derive(Default)]
    struct Note {
        id: i64,
        text: String,
    }

    crate::fields!(Note {
        ID => id: i64,
        TEXT => text: String,
    });

    impl Entity for Note {
        fn define(table: &mut Define<Self>) {
            table.column(Self::ID).primary_key().auto_increment();
            table.column(Self::TEXT);
            table.unique_index(&[&Self::TEXT]);
        }
    }

    #[test]
    fn composite_key_is_a_table_constraint() {
        let schema = MappingRegistry::new().define::<Order>().unwrap();
        assert_eq!(
            schema.table().create_table_sql(),
            "CREATE TABLE IF NOT EXISTS Orders (customer_id VARCHAR(5) NOT NULL, order_id INT NOT NULL, total DOUBLE, PRIMARY KEY (customer_id, order_id))"
        );
        assert_eq!(
            schema.table().create_index_sql(),
            ["CREATE INDEX IF NOT EXISTS Orders_total ON Orders (total)"]
        );
    }

    #[test]
    fn auto_increment_key_is_inline() {
        let schema = MappingRegistry::new().define::<Note>().unwrap();
        assert_eq!(
            schema.table().create_table_sql(),
            "CREATE TABLE IF NOT EXISTS Note (id INTEGER PRIMARY KEY AUTOINCREMENT, text VARCHAR NOT NULL)"
        );
        assert_eq!(
            schema.table().create_index_sql(),
            ["CREATE UNIQUE INDEX IF NOT EXISTS Note_text ON Note (text)"]
        );
    }
}
