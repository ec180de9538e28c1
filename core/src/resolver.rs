use std::sync::Arc;

use compact_str::{CompactString, format_compact};
use hashbrown::HashMap;

use crate::alias::{AliasId, ColumnToken};
use crate::error::{QuarryError, Result};
use crate::schema::{ColumnDefinition, TableDefinition};

#[derive(Debug)]
struct Source {
    name: CompactString,
    table: Arc<TableDefinition>,
}

/// Maps the column handles of one query to its sources.
///
/// Sources are named `T1`, `T2`, … in registration order. Column references
/// are qualified with the source name only when more than one source is
/// registered. A resolver is built for a single render and dropped with it.
#[derive(Debug, Default)]
pub struct TokenResolver {
    sources: Vec<Source>,
    by_alias: HashMap<AliasId, usize>,
}

impl TokenResolver {
    /// Registers a source and returns its generated name.
    pub fn register(&mut self, alias: AliasId, table: Arc<TableDefinition>) -> Result<&str> {
        if let Some(&existing) = self.by_alias.get(&alias) {
            return Err(QuarryError::AmbiguousAlias(format!(
                "alias {alias} of table {} appears twice in one query (as {}); use a separate alias per source",
                table.table_name(),
                self.sources[existing].name
            )));
        }
        let index = self.sources.len();
        self.sources.push(Source {
            name: format_compact!("T{}", index + 1),
            table,
        });
        self.by_alias.insert(alias, index);
        Ok(&self.sources[index].name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Generated name of a registered alias.
    pub fn alias_name(&self, alias: AliasId) -> Option<&str> {
        self.by_alias
            .get(&alias)
            .map(|&index| self.sources[index].name.as_str())
    }

    pub fn qualifies(&self) -> bool {
        self.sources.len() > 1
    }

    /// Resolves a handle to its column, by alias identity and field name.
    pub fn resolve(&self, token: ColumnToken) -> Result<ResolvedColumn<'_>> {
        let Some(&index) = self.by_alias.get(&token.alias) else {
            return Err(QuarryError::UnresolvedColumn(format!(
                "`{}` belongs to alias {} which is not a source of this query",
                token.field, token.alias
            )));
        };
        let source = &self.sources[index];
        let Some(column) = source.table.column_by_field(token.field) else {
            return Err(QuarryError::UnresolvedColumn(format!(
                "`{}` is not a mapped column of table {}",
                token.field,
                source.table.table_name()
            )));
        };
        Ok(ResolvedColumn {
            alias: self.qualifies().then_some(source.name.as_str()),
            column,
        })
    }
}

/// A handle resolved against a query's sources.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColumn<'r> {
    alias: Option<&'r str>,
    column: &'r ColumnDefinition,
}

impl<'r> ResolvedColumn<'r> {
    /// Source name, when the reference is qualified.
    pub fn alias(&self) -> Option<&'r str> {
        self.alias
    }

    pub fn column(&self) -> &'r ColumnDefinition {
        self.column
    }

    pub(crate) fn write_to(&self, buf: &mut String) {
        if let Some(alias) = self.alias {
            buf.push_str(alias);
            buf.push('.');
        }
        buf.push_str(self.column.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::Alias;
    use crate::schema::{Define, Entity, MappingRegistry};

    #[derive(Default)]
    struct Customer {
        customer_id: String,
        region: String,
    }

    crate::fields!(Customer {
        CUSTOMER_ID => customer_id: String,
        REGION => region: String,
    });

    impl Entity for Customer {
        fn define(table: &mut Define<Self>) {
            table.column(Self::CUSTOMER_ID).primary_key();
            table.column(Self::REGION).named("region_code");
        }
    }

    fn alias(registry: &MappingRegistry) -> Alias<Customer> {
        Alias::in_registry(registry).unwrap()
    }

    fn rendered(resolver: &TokenResolver, token: ColumnToken) -> String {
        let mut buf = String::new();
        resolver.resolve(token).unwrap().write_to(&mut buf);
        buf
    }

    #[test]
    fn single_source_is_unqualified() {
        let registry = MappingRegistry::new();
        let c = alias(&registry);
        let mut resolver = TokenResolver::default();
        assert_eq!(resolver.register(c.id(), c.table().clone()).unwrap(), "T1");

        let token = *c.col(Customer::REGION).token().unwrap();
        assert_eq!(rendered(&resolver, token), "region_code");
    }

    #[test]
    fn self_join_keeps_aliases_apart() {
        let registry = MappingRegistry::new();
        let (a, b) = (alias(&registry), alias(&registry));
        let mut resolver = TokenResolver::default();
        resolver.register(a.id(), a.table().clone()).unwrap();
        resolver.register(b.id(), b.table().clone()).unwrap();

        let left = *a.col(Customer::CUSTOMER_ID).token().unwrap();
        let right = *b.col(Customer::CUSTOMER_ID).token().unwrap();
        assert_eq!(rendered(&resolver, left), "T1.customer_id");
        assert_eq!(rendered(&resolver, right), "T2.customer_id");
    }

    #[test]
    fn foreign_alias_is_unresolved() {
        let registry = MappingRegistry::new();
        let (registered, stray) = (alias(&registry), alias(&registry));
        let mut resolver = TokenResolver::default();
        resolver.register(registered.id(), registered.table().clone()).unwrap();

        let token = *stray.col(Customer::REGION).token().unwrap();
        assert!(matches!(
            resolver.resolve(token),
            Err(QuarryError::UnresolvedColumn(_))
        ));
    }

    #[test]
    fn same_alias_twice_is_ambiguous() {
        let registry = MappingRegistry::new();
        let c = alias(&registry);
        let mut resolver = TokenResolver::default();
        resolver.register(c.id(), c.table().clone()).unwrap();

        assert!(matches!(
            resolver.register(c.id(), c.table().clone()),
            Err(QuarryError::AmbiguousAlias(_))
        ));
    }
}
