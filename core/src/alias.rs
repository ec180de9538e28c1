//! Query-time identities of mapped types.
//!
//! An [`Alias`] is one use of an entity type inside a query. Two aliases of
//! the same type are different sources (a self-join), and the column handles
//! they hand out never resolve to each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::expr::Expr;
use crate::field::Field;
use crate::schema::{Entity, MappingRegistry, SchemaDefinition, TableDefinition};

static NEXT_ALIAS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Alias`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AliasId(u64);

impl AliasId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ALIAS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl core::fmt::Display for AliasId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A column handle: which alias, which field.
///
/// Tokens carry no column metadata of their own; a query's
/// [`TokenResolver`](crate::resolver::TokenResolver) turns them into column
/// references at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnToken {
    pub(crate) alias: AliasId,
    pub(crate) field: &'static str,
}

impl ColumnToken {
    pub fn alias(&self) -> AliasId {
        self.alias
    }

    pub fn field(&self) -> &'static str {
        self.field
    }
}

/// One use of entity `E` in a query.
///
/// Not `Clone`: a copy would share the identity and turn a self-join into an
/// ambiguous one.
pub struct Alias<E> {
    id: AliasId,
    schema: Arc<SchemaDefinition<E>>,
}

impl<E: Entity> Alias<E> {
    /// Creates an alias, defining `E` in the process-wide registry if needed.
    pub fn new() -> Result<Self> {
        Self::in_registry(MappingRegistry::global())
    }

    pub fn in_registry(registry: &MappingRegistry) -> Result<Self> {
        Ok(Self {
            id: AliasId::next(),
            schema: registry.define::<E>()?,
        })
    }

    pub fn id(&self) -> AliasId {
        self.id
    }

    pub fn schema(&self) -> &Arc<SchemaDefinition<E>> {
        &self.schema
    }

    pub fn table(&self) -> &Arc<TableDefinition> {
        self.schema.table()
    }

    /// Column handle for `field` on this alias.
    pub fn col<F>(&self, field: Field<E, F>) -> Expr<F> {
        Expr::column(ColumnToken {
            alias: self.id,
            field: field.name(),
        })
    }
}

impl<E> core::fmt::Debug for Alias<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Alias")
            .field("id", &self.id)
            .field("table", &self.schema.table().table_name())
            .finish()
    }
}
