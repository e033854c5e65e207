use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::codec::TupleType;
use super::schema::{Record, Schema};
use crate::errors::SchemaError;

type SchemaTable = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

/// Schemas built so far, keyed by record type
static SCHEMAS: OnceLock<SchemaTable> = OnceLock::new();

/// Returns the tuple codec of `T`, building its schema on first use.
///
/// Every later call, from any thread, shares the same schema. A schema that fails to build is
/// not cached, so the error is reported on every call.
pub fn tuple_type<T: Record>() -> Result<TupleType<T>, SchemaError> {
    let table = SCHEMAS.get_or_init(Default::default);
    let type_id = TypeId::of::<T>();

    if let Some(schema) = lookup::<T>(table, type_id) {
        return Ok(TupleType::from_shared(schema));
    }

    // Built without holding the lock: binding a nested member comes back here for its own type.
    let built = Arc::new(Schema::<T>::build()?);

    let mut schemas = table.write().unwrap_or_else(PoisonError::into_inner);
    // Another thread may have raced us here, keep whichever schema got in first
    let shared = schemas
        .entry(type_id)
        .or_insert_with(|| built.clone() as Arc<dyn Any + Send + Sync>)
        .clone()
        .downcast::<Schema<T>>()
        .unwrap_or(built);

    Ok(TupleType::from_shared(shared))
}

fn lookup<T: Record>(table: &SchemaTable, type_id: TypeId) -> Option<Arc<Schema<T>>> {
    let schemas = table.read().unwrap_or_else(PoisonError::into_inner);
    schemas.get(&type_id)?.clone().downcast::<Schema<T>>().ok()
}
