use std::any::{Any, TypeId, type_name};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use hashbrown::HashMap;

use crate::error::{QuarryError, Result};
use crate::schema::{Define, Entity, SchemaDefinition};

type CachedSchema = Arc<dyn Any + Send + Sync>;

static GLOBAL: LazyLock<MappingRegistry> = LazyLock::new(MappingRegistry::new);

/// Cache of entity type → [`SchemaDefinition`].
///
/// The first [`MappingRegistry::define`] for a type runs [`Entity::define`]
/// with the registry lock held, so concurrent first uses of a type block and
/// then share the one cached definition. A definition callback must not
/// define another type through the same registry.
pub struct MappingRegistry {
    tables: Mutex<HashMap<TypeId, CachedSchema>>,
}

impl MappingRegistry {
    /// Creates an empty registry, independent of [`MappingRegistry::global`].
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static MappingRegistry {
        &GLOBAL
    }

    /// Returns the mapping of `E`, building it on first use.
    ///
    /// Every call for the same type returns the same `Arc`. A definition that
    /// fails is not cached; the next call runs it again.
    pub fn define<E: Entity>(&self) -> Result<Arc<SchemaDefinition<E>>> {
        // The cache only ever holds finished definitions, so a panic inside a
        // callback leaves it consistent.
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = tables.get(&TypeId::of::<E>()) {
            return downcast::<E>(Arc::clone(cached));
        }

        let mut table = Define::<E>::new(default_table_name::<E>().to_string());
        E::define(&mut table);
        let schema = Arc::new(table.finish()?);

        crate::quarry_trace_define!(schema.table_name(), schema.columns().len());

        tables.insert(TypeId::of::<E>(), Arc::clone(&schema) as CachedSchema);
        Ok(schema)
    }

    /// Whether `E` has been defined in this registry.
    pub fn is_defined<E: Entity>(&self) -> bool {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<E>())
    }

    /// Number of defined types.
    pub fn len(&self) -> usize {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MappingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MappingRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MappingRegistry")
            .field("tables", &self.len())
            .finish()
    }
}

/// Returns the mapping of `E` from the process-wide registry.
pub fn define<E: Entity>() -> Result<Arc<SchemaDefinition<E>>> {
    MappingRegistry::global().define::<E>()
}

fn downcast<E: Entity>(cached: CachedSchema) -> Result<Arc<SchemaDefinition<E>>> {
    cached.downcast::<SchemaDefinition<E>>().map_err(|_| {
        QuarryError::Mapping(format!(
            "cached mapping of {} has an unexpected type",
            type_name::<E>()
        ))
    })
}

/// Unqualified type name: `app::model::Product` → `Product`.
fn default_table_name<E>() -> &'static str {
    let full = type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
