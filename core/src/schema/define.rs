use crate::error::{QuarryError, Result};
use crate::field::{AnyField, Field};
use crate::schema::{Accessor, ColumnDefinition, Entity, IndexDefinition, SchemaDefinition, TableDefinition};
use crate::value::{SqlType, Value};

/// The configuration surface handed to [`Entity::define`].
///
/// A `Define` only exists while the registry runs the definition, so table
/// configuration cannot leak out of it. Misuse inside the callback (touching
/// a field that was never declared as a column, declaring the key twice) is
/// recorded and fails the whole definition with
/// [`QuarryError::ConfigurationScope`].
pub struct Define<E> {
    table_name: String,
    columns: Vec<ColumnDefinition>,
    accessors: Vec<Accessor<E>>,
    primary_key: Vec<usize>,
    explicit_primary_key: bool,
    indexes: Vec<(Vec<usize>, bool)>,
    error: Option<QuarryError>,
}

impl<E: Entity> Define<E> {
    pub(crate) fn new(table_name: String) -> Self {
        Self {
            table_name,
            columns: Vec::new(),
            accessors: Vec::new(),
            primary_key: Vec::new(),
            explicit_primary_key: false,
            indexes: Vec::new(),
            error: None,
        }
    }

    /// Overrides the table name (defaults to the type's name).
    pub fn table_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.table_name = name.into();
        self
    }

    /// Maps `field` to a column named after the field.
    pub fn column<F: SqlType>(&mut self, field: Field<E, F>) -> ColumnBuilder<'_, E> {
        if self.position(field.name()).is_some() {
            self.fail(format!(
                "field `{}` is declared twice in table {}",
                field.name(),
                self.table_name
            ));
            return ColumnBuilder {
                define: self,
                index: None,
            };
        }

        self.columns.push(ColumnDefinition {
            field: field.name(),
            name: field.name().to_string(),
            data_type: F::DATA_TYPE,
            max_length: None,
            nullable: F::NULLABLE,
            primary_key: false,
            auto_increment: false,
        });
        self.accessors.push(Accessor {
            read: Box::new(move |entity: &E| field.get(entity).to_value()),
            write: Box::new(move |entity: &mut E, value: Value| {
                field.set(entity, F::from_value(value)?);
                Ok(())
            }),
        });

        let index = self.columns.len() - 1;
        ColumnBuilder {
            define: self,
            index: Some(index),
        }
    }

    /// Declares the (possibly composite) primary key, in key order.
    pub fn primary_key(&mut self, fields: &[&dyn AnyField<E>]) -> &mut Self {
        if !self.primary_key.is_empty() {
            self.fail(format!(
                "primary key of table {} is already declared",
                self.table_name
            ));
            return self;
        }
        let Some(indices) = self.positions(fields) else {
            return self;
        };
        for &index in &indices {
            self.columns[index].primary_key = true;
        }
        self.primary_key = indices;
        self.explicit_primary_key = true;
        self
    }

    pub fn max_length(&mut self, field: &dyn AnyField<E>, length: u32) -> &mut Self {
        if let Some(index) = self.require(field.field_name()) {
            self.columns[index].max_length = Some(length);
        }
        self
    }

    pub fn index(&mut self, fields: &[&dyn AnyField<E>]) -> &mut Self {
        if let Some(indices) = self.positions(fields) {
            self.indexes.push((indices, false));
        }
        self
    }

    pub fn unique_index(&mut self, fields: &[&dyn AnyField<E>]) -> &mut Self {
        if let Some(indices) = self.positions(fields) {
            self.indexes.push((indices, true));
        }
        self
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.field == field)
    }

    fn require(&mut self, field: &str) -> Option<usize> {
        let found = self.position(field);
        if found.is_none() {
            self.fail(format!(
                "field `{field}` is not a column of table {}; declare it with column() first",
                self.table_name
            ));
        }
        found
    }

    fn positions(&mut self, fields: &[&dyn AnyField<E>]) -> Option<Vec<usize>> {
        if fields.is_empty() {
            self.fail(format!("empty column list in table {}", self.table_name));
            return None;
        }
        fields
            .iter()
            .map(|field| self.require(field.field_name()))
            .collect()
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(QuarryError::ConfigurationScope(message));
        }
    }

    pub(crate) fn finish(self) -> Result<SchemaDefinition<E>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.columns.is_empty() {
            return Err(QuarryError::ConfigurationScope(format!(
                "table {} declares no columns",
                self.table_name
            )));
        }

        let primary_key = self.primary_key;

        if let Some(column) = self.columns.iter().find(|column| column.auto_increment) {
            if primary_key.len() != 1 || !column.primary_key || !column.data_type.is_integer() {
                return Err(QuarryError::ConfigurationScope(format!(
                    "auto-increment column {} must be the sole integer primary key of table {}",
                    column.name, self.table_name
                )));
            }
        }

        let indexes = self
            .indexes
            .iter()
            .map(|(indices, unique)| {
                let columns: Vec<String> = indices.iter().map(|&i| self.columns[i].name.clone()).collect();
                IndexDefinition {
                    name: format!("{}_{}", self.table_name, columns.join("_")),
                    columns,
                    unique: *unique,
                }
            })
            .collect();

        let table = TableDefinition {
            table_name: self.table_name,
            columns: self.columns,
            primary_key,
            indexes,
        };
        Ok(SchemaDefinition::new(table, self.accessors))
    }
}

/// Per-column options, returned by [`Define::column`].
pub struct ColumnBuilder<'d, E> {
    define: &'d mut Define<E>,
    index: Option<usize>,
}

impl<E: Entity> ColumnBuilder<'_, E> {
    /// Overrides the column name (defaults to the field name).
    pub fn named(self, name: impl Into<String>) -> Self {
        if let Some(index) = self.index {
            self.define.columns[index].name = name.into();
        }
        self
    }

    pub fn max_length(self, length: u32) -> Self {
        if let Some(index) = self.index {
            self.define.columns[index].max_length = Some(length);
        }
        self
    }

    /// Adds this column to the primary key. Repeat on several columns for a
    /// composite key; key order is declaration order.
    pub fn primary_key(self) -> Self {
        if let Some(index) = self.index {
            if self.define.explicit_primary_key {
                let table = self.define.table_name.clone();
                self.define
                    .fail(format!("primary key of table {table} is already declared"));
            } else if !self.define.columns[index].primary_key {
                self.define.columns[index].primary_key = true;
                self.define.primary_key.push(index);
            }
        }
        self
    }

    /// Marks the column as generated by the store; inserts skip it.
    pub fn auto_increment(self) -> Self {
        if let Some(index) = self.index {
            self.define.columns[index].auto_increment = true;
        }
        self
    }
}
