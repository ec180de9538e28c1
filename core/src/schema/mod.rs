//! Object-to-table mapping.
//!
//! An [`Entity`] describes its table once, through [`Define`]. The
//! [`MappingRegistry`] runs that description the first time the type is used
//! and caches the resulting [`SchemaDefinition`] for the life of the process.

mod ddl;
mod define;
mod registry;

pub use define::*;
pub use registry::*;

use std::sync::Arc;

use crate::error::Result;
use crate::value::{DataType, Value};

/// A Rust type mapped to a table.
pub trait Entity: Default + 'static {
    /// Declares the table. Runs once per process, under the registry lock.
    fn define(table: &mut Define<Self>);
}

/// Metadata of one mapped column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub(crate) field: &'static str,
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) max_length: Option<u32>,
    pub(crate) nullable: bool,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
}

impl ColumnDefinition {
    /// Name of the field this column is mapped from.
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub(crate) name: String,
    pub(crate) columns: Vec<String>,
    pub(crate) unique: bool,
}

impl IndexDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }
}

/// Type-independent part of a schema: everything the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub(crate) table_name: String,
    pub(crate) columns: Vec<ColumnDefinition>,
    pub(crate) primary_key: Vec<usize>,
    pub(crate) indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column_by_field(&self, field: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.field == field)
    }

    /// Primary key columns in key order.
    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.primary_key.iter().map(|&i| &self.columns[i])
    }

    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    pub fn indexes(&self) -> &[IndexDefinition] {
        &self.indexes
    }
}

pub(crate) struct Accessor<E> {
    pub(crate) read: Box<dyn Fn(&E) -> Value + Send + Sync>,
    pub(crate) write: Box<dyn Fn(&mut E, Value) -> Result<()> + Send + Sync>,
}

/// Cached mapping of an entity type: table metadata plus per-column
/// accessors, aligned with [`TableDefinition::columns`].
pub struct SchemaDefinition<E> {
    table: Arc<TableDefinition>,
    accessors: Vec<Accessor<E>>,
}

impl<E> SchemaDefinition<E> {
    pub(crate) fn new(table: TableDefinition, accessors: Vec<Accessor<E>>) -> Self {
        Self {
            table: Arc::new(table),
            accessors,
        }
    }

    pub fn table(&self) -> &Arc<TableDefinition> {
        &self.table
    }

    pub fn table_name(&self) -> &str {
        &self.table.table_name
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.table.columns
    }

    /// Current value of the `index`-th column on `entity`.
    pub fn value_of(&self, entity: &E, index: usize) -> Value {
        (self.accessors[index].read)(entity)
    }

    /// Builds an entity from a row. Columns are filled in declaration order;
    /// `lookup` supplies the stored value for each one.
    pub fn materialize(
        &self,
        mut lookup: impl FnMut(usize, &ColumnDefinition) -> Result<Value>,
    ) -> Result<E>
    where
        E: Default,
    {
        let mut entity = E::default();
        for (index, (column, accessor)) in self.table.columns.iter().zip(&self.accessors).enumerate() {
            let value = lookup(index, column)?;
            (accessor.write)(&mut entity, value)?;
        }
        Ok(entity)
    }
}

impl<E> core::fmt::Debug for SchemaDefinition<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
