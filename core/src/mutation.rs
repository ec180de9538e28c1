//! Statements that write a single entity: insert, update by key and delete
//! by key. The values come from the entity's current field values through the
//! schema's accessors.

use crate::error::{QuarryError, Result};
use crate::prepared::PreparedStatementPlan;
use crate::resolver::TokenResolver;
use crate::schema::SchemaDefinition;
use crate::sql::{SQL, Token};

fn assignment(name: &str, value: crate::value::Value) -> SQL {
    SQL::ident(name.to_owned())
        .push(Token::EQ)
        .append(SQL::param(value))
}

/// `col = ? AND col = ?` over the primary key, or `NoPrimaryKey`.
fn key_filter<E>(schema: &SchemaDefinition<E>, entity: &E) -> Result<SQL> {
    let table = schema.table();
    if !table.has_primary_key() {
        return Err(QuarryError::NoPrimaryKey(table.table_name().to_owned()));
    }
    let terms = table
        .primary_key
        .iter()
        .map(|&index| assignment(table.columns[index].name(), schema.value_of(entity, index)));
    Ok(SQL::token(Token::WHERE).append(SQL::join(terms, Token::AND)))
}

/// `INSERT INTO table (cols) VALUES (?, ...)`, skipping auto-increment
/// columns.
pub fn insert_plan<E>(schema: &SchemaDefinition<E>, entity: &E) -> Result<PreparedStatementPlan> {
    let table = schema.table();
    let insert = SQL::token(Token::INSERT)
        .push(Token::INTO)
        .append(SQL::ident(table.table_name().to_owned()));

    let inserted: Vec<usize> = (0..table.columns.len())
        .filter(|&index| !table.columns[index].is_auto_increment())
        .collect();
    if inserted.is_empty() {
        return insert.append(SQL::raw("DEFAULT VALUES")).build(&TokenResolver::default());
    }

    let names = inserted
        .iter()
        .map(|&index| SQL::ident(table.columns[index].name().to_owned()));
    let values = inserted.iter().map(|&index| schema.value_of(entity, index));

    insert
        .append(SQL::join(names, Token::COMMA).parens())
        .push(Token::VALUES)
        .append(SQL::param_list(values).parens())
        .build(&TokenResolver::default())
}

/// `UPDATE table SET ... WHERE key = ?`.
///
/// Sets every non-key column. A table made only of key columns sets the key
/// to itself, so the statement still reports whether the row exists.
pub fn update_plan<E>(schema: &SchemaDefinition<E>, entity: &E) -> Result<PreparedStatementPlan> {
    let filter = key_filter(schema, entity)?;
    let table = schema.table();

    let mut targets: Vec<usize> = (0..table.columns.len())
        .filter(|&index| !table.columns[index].is_primary_key())
        .collect();
    if targets.is_empty() {
        targets = table.primary_key.clone();
    }
    let assignments = targets
        .iter()
        .map(|&index| assignment(table.columns[index].name(), schema.value_of(entity, index)));

    SQL::token(Token::UPDATE)
        .append(SQL::ident(table.table_name().to_owned()))
        .push(Token::SET)
        .append(SQL::join(assignments, Token::COMMA))
        .append(filter)
        .build(&TokenResolver::default())
}

/// `DELETE FROM table WHERE key = ?`.
pub fn delete_plan<E>(schema: &SchemaDefinition<E>, entity: &E) -> Result<PreparedStatementPlan> {
    let filter = key_filter(schema, entity)?;
    SQL::token(Token::DELETE)
        .push(Token::FROM)
        .append(SQL::ident(schema.table_name().to_owned()))
        .append(filter)
        .build(&TokenResolver::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Define, Entity, MappingRegistry};
    use crate::value::Value;

    #[derive(Default)]
    struct Order {
        customer_id: String,
        order_id: i32,
        total: f64,
    }

    crate::fields!(Order {
        CUSTOMER_ID => customer_id: String,
        ORDER_ID => order_id: i32,
        TOTAL => total: f64,
    });

    impl Entity for Order {
        fn define(table: &mut Define<Self>) {
            table.table_name("Orders");
            table.column(Self::CUSTOMER_ID).primary_key();
            table.column(Self::ORDER_ID).primary_key();
            table.column(Self::TOTAL);
        }
    }

    #[derive(Default)]
    struct Tag {
        id: i64,
        label: String,
    }

    crate::fields!(Tag {
        ID => id: i64,
        LABEL => label: String,
    });

    impl Entity for Tag {
        fn define(table: &mut Define<Self>) {
            table.column(Self::ID).primary_key().auto_increment();
            table.column(Self::LABEL);
        }
    }

    #[derive(Default)]
    struct Log {
        line: String,
    }

    crate::fields!(Log { LINE => line: String });

    impl Entity for Log {
        fn define(table: &mut Define<Self>) {
            table.column(Self::LINE);
        }
    }

    fn order() -> Order {
        Order {
            customer_id: "ALFKI".into(),
            order_id: 10702,
            total: 330.0,
        }
    }

    #[test]
    fn update_conjoins_composite_key() {
        let schema = MappingRegistry::new().define::<Order>().unwrap();
        let plan = update_plan(&schema, &order()).unwrap();

        assert_eq!(
            plan.sql(),
            "UPDATE Orders SET total = ? WHERE customer_id = ? AND order_id = ?"
        );
        assert_eq!(
            plan.params(),
            &[
                Value::Real(330.0),
                Value::Text("ALFKI".into()),
                Value::Integer(10702)
            ]
        );
    }

    #[test]
    fn insert_skips_auto_increment() {
        let schema = MappingRegistry::new().define::<Tag>().unwrap();
        let tag = Tag {
            id: 0,
            label: "new".into(),
        };
        let plan = insert_plan(&schema, &tag).unwrap();

        assert_eq!(plan.sql(), "INSERT INTO Tag (label) VALUES (?)");
        assert_eq!(plan.params(), &[Value::Text("new".into())]);
    }

    #[test]
    fn keyless_type_cannot_be_updated_or_deleted() {
        let schema = MappingRegistry::new().define::<Log>().unwrap();
        let log = Log::default();

        assert!(matches!(update_plan(&schema, &log), Err(QuarryError::NoPrimaryKey(t)) if t == "Log"));
        assert!(matches!(delete_plan(&schema, &log), Err(QuarryError::NoPrimaryKey(_))));
        assert!(insert_plan(&schema, &log).is_ok());
    }

    #[test]
    fn delete_by_key() {
        let schema = MappingRegistry::new().define::<Order>().unwrap();
        let plan = delete_plan(&schema, &order()).unwrap();
        assert_eq!(
            plan.sql(),
            "DELETE FROM Orders WHERE customer_id = ? AND order_id = ?"
        );
        assert_eq!(plan.placeholder_count(), plan.params().len());
    }
}
