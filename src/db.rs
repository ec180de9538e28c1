use std::cell::RefCell;
use std::path::Path;

use hashbrown::HashSet;
use quarry_core::{
    Alias, Entity, MappingRegistry, PreparedStatementPlan, Result, SchemaDefinition,
    TableDefinition, mutation,
};
use rusqlite::{Connection, Row, params_from_iter};

use crate::query::Query;

/// A SQLite database with mapped entities.
///
/// Tables are created from their mappings (`CREATE TABLE IF NOT EXISTS`) the
/// first time this `Db` touches them.
#[derive(Debug)]
pub struct Db {
    conn: Connection,
    registry: &'static MappingRegistry,
    created: RefCell<HashSet<String>>,
}

impl Db {
    /// Wraps an open connection. Entities are mapped through
    /// [`MappingRegistry::global`].
    pub fn new(conn: Connection) -> Self {
        Self::with_registry(conn, MappingRegistry::global())
    }

    pub fn with_registry(conn: Connection, registry: &'static MappingRegistry) -> Self {
        Self {
            conn,
            registry,
            created: RefCell::new(HashSet::new()),
        }
    }

    /// Opens a database file or `file:` URI. SQLite has no credentials; the
    /// path is the whole connection descriptor.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Connection::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Connection::open_in_memory()?))
    }

    /// Gets a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn registry(&self) -> &'static MappingRegistry {
        self.registry
    }

    /// A new alias of `E`, mapped through this database's registry.
    pub fn alias<E: Entity>(&self) -> Result<Alias<E>> {
        Alias::in_registry(self.registry)
    }

    /// Starts a query over `alias`.
    pub fn from<'db, E: Entity>(&'db self, alias: &'db Alias<E>) -> Query<'db, E> {
        Query::new(self, alias)
    }

    /// Creates the table and indexes of `E` if they do not exist.
    pub fn create_table<E: Entity>(&self) -> Result<()> {
        let schema = self.schema::<E>()?;
        self.create(schema.table())
    }

    pub fn insert<E: Entity>(&self, entity: &E) -> Result<usize> {
        let schema = self.prepared_schema::<E>()?;
        self.execute(&mutation::insert_plan(&schema, entity)?)
    }

    /// Inserts every entity through one cached statement; returns the total
    /// number of inserted rows.
    pub fn insert_all<'e, E: Entity>(&self, entities: impl IntoIterator<Item = &'e E>) -> Result<usize> {
        let schema = self.prepared_schema::<E>()?;
        let mut inserted = 0;
        for entity in entities {
            let plan = mutation::insert_plan(&schema, entity)?;
            quarry_core::quarry_trace_query!(plan.sql(), plan.params().len());
            let mut stmt = self.conn.prepare_cached(plan.sql())?;
            inserted += stmt.execute(params_from_iter(plan.params()))?;
        }
        Ok(inserted)
    }

    /// Updates the row with `entity`'s primary key to its current field
    /// values; returns the number of rows matched.
    pub fn update<E: Entity>(&self, entity: &E) -> Result<usize> {
        let schema = self.prepared_schema::<E>()?;
        self.execute(&mutation::update_plan(&schema, entity)?)
    }

    /// Updates by primary key, inserting when no row matched.
    pub fn merge<E: Entity>(&self, entity: &E) -> Result<usize> {
        let schema = self.prepared_schema::<E>()?;
        let updated = self.execute(&mutation::update_plan(&schema, entity)?)?;
        if updated > 0 {
            return Ok(updated);
        }
        self.execute(&mutation::insert_plan(&schema, entity)?)
    }

    /// Deletes the row with `entity`'s primary key.
    pub fn delete_entity<E: Entity>(&self, entity: &E) -> Result<usize> {
        let schema = self.prepared_schema::<E>()?;
        self.execute(&mutation::delete_plan(&schema, entity)?)
    }

    /// Runs one or more raw statements, for DDL and anything else the
    /// builder does not express.
    pub fn execute_raw(&self, sql: &str) -> Result<()> {
        quarry_core::quarry_trace_query!(sql, 0);
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Executes a rendered statement and returns the number of affected rows.
    pub fn execute(&self, plan: &PreparedStatementPlan) -> Result<usize> {
        quarry_core::quarry_trace_query!(plan.sql(), plan.params().len());
        Ok(self.conn.execute(plan.sql(), params_from_iter(plan.params()))?)
    }

    /// Runs a rendered SELECT and reads every row with `read`.
    pub fn query<T>(
        &self,
        plan: &PreparedStatementPlan,
        mut read: impl FnMut(&Row<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        quarry_core::quarry_trace_query!(plan.sql(), plan.params().len());

        let mut stmt = self.conn.prepare(plan.sql())?;
        let rows = stmt.query_map(params_from_iter(plan.params()), |row| Ok(read(row)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row??);
        }
        Ok(results)
    }

    fn schema<E: Entity>(&self) -> Result<std::sync::Arc<SchemaDefinition<E>>> {
        self.registry.define::<E>()
    }

    fn prepared_schema<E: Entity>(&self) -> Result<std::sync::Arc<SchemaDefinition<E>>> {
        let schema = self.schema::<E>()?;
        self.ensure_table(schema.table())?;
        Ok(schema)
    }

    pub(crate) fn ensure_table(&self, table: &TableDefinition) -> Result<()> {
        if self.created.borrow().contains(table.table_name()) {
            return Ok(());
        }
        self.create(table)
    }

    fn create(&self, table: &TableDefinition) -> Result<()> {
        self.execute_raw(&table.create_table_sql())?;
        for index in table.create_index_sql() {
            self.execute_raw(&index)?;
        }
        self.created.borrow_mut().insert(table.table_name().to_owned());
        Ok(())
    }
}
