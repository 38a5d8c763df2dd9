//! Reflection memoization owned by the calling layer.
//!
//! Entries live until the caller ends its metadata session with
//! [`ReflectionCache::clear`] or drops a connection's entries with
//! [`ReflectionCache::invalidate_connection`]. Failed loads are not cached.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::trace;

use crate::{
    ColumnInfo, Connection, ConnectionId, Error, ForeignKeyConstraint, Ident, IndexInfo,
    MetadataReflector, PrimaryKeyConstraint, ReflectPath, Result,
};

const POISONED_CACHE_MESSAGE: &str = "reflection cache state was poisoned";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: &'static str,
    pub connection: ConnectionId,
    pub schema: Option<Ident>,
    pub table: Option<Ident>,
    pub path: ReflectPath,
}

type Entry = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct ReflectionCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl ReflectionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_insert_with<T, F>(&self, key: CacheKey, load: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self
            .lock()?
            .get(&key)
            .and_then(|entry| entry.downcast_ref::<T>())
        {
            trace!(operation = key.operation, connection = %key.connection, "reflection cache hit");
            return Ok(value.clone());
        }

        trace!(operation = key.operation, connection = %key.connection, "reflection cache miss");
        let value = load()?;
        self.lock()?.insert(key, Arc::new(value.clone()));
        Ok(value)
    }

    pub fn invalidate_connection(&self, connection: ConnectionId) -> Result<()> {
        self.lock()?.retain(|key, _| key.connection != connection);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CacheKey, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| Error::internal(POISONED_CACHE_MESSAGE))
    }
}

impl fmt::Debug for ReflectionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionCache")
            .field("entries", &self.len().unwrap_or_default())
            .finish()
    }
}

/// A [`MetadataReflector`] that answers repeated questions from a cache.
pub struct CachedReflector<'a> {
    inner: &'a dyn MetadataReflector,
    cache: &'a ReflectionCache,
}

impl<'a> CachedReflector<'a> {
    #[must_use]
    pub const fn new(inner: &'a dyn MetadataReflector, cache: &'a ReflectionCache) -> Self {
        Self { inner, cache }
    }

    fn key(
        operation: &'static str,
        connection: &Connection,
        schema: Option<&Ident>,
        table: Option<&Ident>,
        path: ReflectPath,
    ) -> CacheKey {
        CacheKey {
            operation,
            connection: connection.id(),
            schema: schema.cloned(),
            table: table.cloned(),
            path,
        }
    }
}

impl MetadataReflector for CachedReflector<'_> {
    fn get_default_schema_name(&self, connection: &Connection) -> Result<Option<Ident>> {
        let key = Self::key(
            "get_default_schema_name",
            connection,
            None,
            None,
            ReflectPath::Fallback,
        );
        self.cache.get_or_try_insert_with(key, || {
            self.inner.get_default_schema_name(connection)
        })
    }

    fn get_schema_names(&self, connection: &Connection, path: ReflectPath) -> Result<Vec<Ident>> {
        let key = Self::key("get_schema_names", connection, None, None, path);
        self.cache
            .get_or_try_insert_with(key, || self.inner.get_schema_names(connection, path))
    }

    fn get_table_names(
        &self,
        connection: &Connection,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<Ident>> {
        let key = Self::key("get_table_names", connection, schema, None, path);
        self.cache.get_or_try_insert_with(key, || {
            self.inner.get_table_names(connection, schema, path)
        })
    }

    fn has_table(
        &self,
        connection: &Connection,
        table_name: &Ident,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<bool> {
        let key = Self::key("has_table", connection, schema, Some(table_name), path);
        self.cache.get_or_try_insert_with(key, || {
            self.inner.has_table(connection, table_name, schema, path)
        })
    }

    fn get_view_names(
        &self,
        connection: &Connection,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<Ident>> {
        let key = Self::key("get_view_names", connection, schema, None, path);
        self.cache.get_or_try_insert_with(key, || {
            self.inner.get_view_names(connection, schema, path)
        })
    }

    fn get_view_definition(
        &self,
        connection: &Connection,
        view_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Option<String>> {
        let key = Self::key("get_view_definition", connection, schema, view_name, path);
        self.cache.get_or_try_insert_with(key, || {
            self.inner
                .get_view_definition(connection, view_name, schema, path)
        })
    }

    fn get_columns(
        &self,
        connection: &Connection,
        table_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<ColumnInfo>> {
        let key = Self::key("get_columns", connection, schema, table_name, path);
        self.cache.get_or_try_insert_with(key, || {
            self.inner.get_columns(connection, table_name, schema, path)
        })
    }

    fn get_pk_constraint(
        &self,
        connection: &Connection,
        table_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<PrimaryKeyConstraint> {
        let key = Self::key("get_pk_constraint", connection, schema, table_name, path);
        self.cache.get_or_try_insert_with(key, || {
            self.inner
                .get_pk_constraint(connection, table_name, schema, path)
        })
    }

    fn get_foreign_keys(
        &self,
        connection: &Connection,
        table_name: &Ident,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<ForeignKeyConstraint>> {
        let key = Self::key("get_foreign_keys", connection, schema, Some(table_name), path);
        self.cache.get_or_try_insert_with(key, || {
            self.inner
                .get_foreign_keys(connection, table_name, schema, path)
        })
    }

    fn get_indexes(
        &self,
        connection: &Connection,
        table_name: &Ident,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<IndexInfo>> {
        let key = Self::key("get_indexes", connection, schema, Some(table_name), path);
        self.cache.get_or_try_insert_with(key, || {
            self.inner.get_indexes(connection, table_name, schema, path)
        })
    }
}
