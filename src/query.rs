use quarry_core::{
    Alias, Comparison, Condition, ConditionSink, Entity, Expr, JoinKind, OrderTerm, Projection,
    QueryContext, Result, Selection, SqlType, Value,
};
use rusqlite::Row;

use crate::db::Db;

/// A query bound to a [`Db`], started with [`Db::from`].
///
/// Builder methods consume the query and return the extended one; the select
/// and write methods render it and run it.
#[must_use = "a query does nothing until it is selected, deleted or updated"]
pub struct Query<'db, E> {
    db: &'db Db,
    alias: &'db Alias<E>,
    context: QueryContext,
}

macro_rules! query_join_impl {
    ($($type:ident => $kind:expr),+ $(,)?) => {
        paste::paste! {
            $(
                #[doc = "Joins `alias`; finish with `.on(column)` and a comparison."]
                pub fn [<$type _join>]<'j, J: Entity>(self, alias: &'j Alias<J>) -> Join<'db, 'j, E, J> {
                    Join {
                        query: self,
                        kind: $kind,
                        alias,
                    }
                }
            )+
        }
    };
}

impl<'db, E: Entity> Query<'db, E> {
    pub(crate) fn new(db: &'db Db, alias: &'db Alias<E>) -> Self {
        Self {
            db,
            alias,
            context: QueryContext::from(alias),
        }
    }

    /// Starts a WHERE comparison on `column`; joins the chain with AND.
    pub fn r#where<F>(self, column: Expr<F>) -> Comparison<Where<'db, E>, F> {
        Comparison::new(Where { query: self, or: false }, column)
    }

    pub fn and<F>(self, column: Expr<F>) -> Comparison<Where<'db, E>, F> {
        self.r#where(column)
    }

    pub fn or<F>(self, column: Expr<F>) -> Comparison<Where<'db, E>, F> {
        Comparison::new(Where { query: self, or: true }, column)
    }

    /// Adds a composed condition, in parentheses, with AND.
    pub fn where_true(mut self, condition: Condition) -> Self {
        self.context = self.context.where_true(condition);
        self
    }

    query_join_impl!(inner => JoinKind::Inner, left => JoinKind::Left);

    pub fn group_by<F>(mut self, column: Expr<F>) -> Self {
        self.context = self.context.group_by(column.into_node());
        self
    }

    pub fn order_by<F>(mut self, column: Expr<F>) -> Self {
        self.context = self.context.order_by(OrderTerm::Asc(column.into_node()));
        self
    }

    pub fn order_by_desc<F>(mut self, column: Expr<F>) -> Self {
        self.context = self.context.order_by(OrderTerm::Desc(column.into_node()));
        self
    }

    /// Orders by the 1-based position of a selected column.
    pub fn order_by_ordinal(mut self, position: usize) -> Self {
        self.context = self.context.order_by(OrderTerm::Ordinal(position));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.context = self.context.limit(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.context = self.context.offset(offset);
        self
    }

    /// Adds `column = value` to the SET list of [`Query::update`].
    pub fn set<F: SqlType>(mut self, column: Expr<F>, value: F) -> Self {
        self.context = self.context.set(column, value);
        self
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// All rows of the primary alias, mapped by column name.
    pub fn select(&self) -> Result<Vec<E>> {
        self.select_entities(&self.context)
    }

    pub fn select_first(&self) -> Result<Option<E>> {
        let first = self.context.clone().limit(1);
        Ok(self.select_entities(&first)?.into_iter().next())
    }

    pub fn select_as<P: Projection>(&self, projection: P) -> Result<Vec<P::Output>> {
        self.select_projection(&self.context, projection, false)
    }

    pub fn select_first_as<P: Projection>(&self, projection: P) -> Result<Option<P::Output>> {
        let first = self.context.clone().limit(1);
        Ok(self.select_projection(&first, projection, false)?.into_iter().next())
    }

    pub fn select_distinct<P: Projection>(&self, projection: P) -> Result<Vec<P::Output>> {
        self.select_projection(&self.context, projection, true)
    }

    /// `SELECT COUNT(*)` over the current filters.
    pub fn select_count(&self) -> Result<i64> {
        let plan = self.context.render_select(&Selection::Count)?;
        self.ensure_tables()?;
        let counts = self.db.query(&plan, |row| Ok(row.get::<_, i64>(0)?))?;
        Ok(counts.into_iter().next().unwrap_or_default())
    }

    /// Deletes the matching rows of the primary alias.
    pub fn delete(&self) -> Result<usize> {
        let plan = self.context.render_delete()?;
        self.ensure_tables()?;
        self.db.execute(&plan)
    }

    /// Applies the [`Query::set`] assignments to the matching rows.
    pub fn update(&self) -> Result<usize> {
        let plan = self.context.render_update()?;
        self.ensure_tables()?;
        self.db.execute(&plan)
    }

    /// The SELECT text [`Query::select`] would run.
    pub fn get_sql(&self) -> Result<String> {
        let (sql, _) = self.context.render_select(&Selection::All)?.into_parts();
        Ok(sql)
    }

    fn select_entities(&self, context: &QueryContext) -> Result<Vec<E>> {
        let plan = context.render_select(&Selection::All)?;
        self.ensure_tables()?;
        let schema = self.alias.schema();
        self.db.query(&plan, |row| {
            schema.materialize(|_, column| Value::try_from(row.get_ref(column.name())?))
        })
    }

    fn select_projection<P: Projection>(
        &self,
        context: &QueryContext,
        projection: P,
        distinct: bool,
    ) -> Result<Vec<P::Output>> {
        let exprs = projection.expressions();
        let width = exprs.len();
        let plan = context.render_select(&Selection::Exprs { exprs, distinct })?;
        self.ensure_tables()?;
        self.db.query(&plan, |row| {
            let mut values = read_values(row, width)?.into_iter();
            projection.read(&mut values)
        })
    }

    fn ensure_tables(&self) -> Result<()> {
        for table in self.context.tables() {
            self.db.ensure_table(table)?;
        }
        Ok(())
    }
}

fn read_values(row: &Row<'_>, width: usize) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(width);
    for index in 0..width {
        values.push(Value::try_from(row.get_ref(index)?)?);
    }
    Ok(values)
}

/// Sink that appends a finished comparison to the WHERE chain.
pub struct Where<'db, E> {
    query: Query<'db, E>,
    or: bool,
}

impl<'db, E: Entity> ConditionSink for Where<'db, E> {
    type Output = Query<'db, E>;

    fn accept(self, condition: Condition) -> Query<'db, E> {
        let mut query = self.query;
        query.context = if self.or {
            query.context.or_where(condition)
        } else {
            query.context.and_where(condition)
        };
        query
    }
}

/// A pending join, waiting for its ON comparison.
#[must_use = "a join is only added once `.on(...)` is completed"]
pub struct Join<'db, 'j, E, J> {
    query: Query<'db, E>,
    kind: JoinKind,
    alias: &'j Alias<J>,
}

impl<'db, 'j, E: Entity, J: Entity> Join<'db, 'j, E, J> {
    /// Starts the ON comparison on `column`.
    pub fn on<F>(self, column: Expr<F>) -> Comparison<Self, F> {
        Comparison::new(self, column)
    }
}

impl<'db, E: Entity, J: Entity> ConditionSink for Join<'db, '_, E, J> {
    type Output = Query<'db, E>;

    fn accept(self, condition: Condition) -> Query<'db, E> {
        let mut query = self.query;
        query.context = query.context.join(self.kind, self.alias, condition);
        query
    }
}
