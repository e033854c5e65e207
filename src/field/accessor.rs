use std::sync::Arc;

use crate::errors::CodecError;
use crate::marshal::MarshalType;

/// Reads and writes one member of a record of type `T`, whatever the member's own type is.
pub trait FieldCodec<T>: Send + Sync {
    fn marshal_value(&self, record: &T) -> Result<Vec<u8>, CodecError>;

    fn unmarshal_value(&self, bytes: &[u8], record: &mut T) -> Result<(), CodecError>;
}

/// A member bound into a tuple schema.
pub struct Field<T> {
    /// Declaration index of the member inside its record
    index: usize,
    name: &'static str,
    codec: Box<dyn FieldCodec<T>>,
}

impl<T> Field<T> {
    pub(crate) fn new(index: usize, name: &'static str, codec: Box<dyn FieldCodec<T>>) -> Self {
        Field { index, name, codec }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn marshal_value(&self, record: &T) -> Result<Vec<u8>, CodecError> {
        self.codec.marshal_value(record)
    }

    pub fn unmarshal_value(&self, bytes: &[u8], record: &mut T) -> Result<(), CodecError> {
        self.codec.unmarshal_value(bytes, record)
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish()
    }
}

/// Field codec that projects the record onto one member and hands it to the member's codec.
pub(crate) struct Accessor<T, V> {
    pub(crate) get: fn(&T) -> &V,
    pub(crate) get_mut: fn(&mut T) -> &mut V,
    pub(crate) ty: Arc<dyn MarshalType<V>>,
}

impl<T, V> FieldCodec<T> for Accessor<T, V> {
    fn marshal_value(&self, record: &T) -> Result<Vec<u8>, CodecError> {
        self.ty.marshaler((self.get)(record)).marshal()
    }

    fn unmarshal_value(&self, bytes: &[u8], record: &mut T) -> Result<(), CodecError> {
        self.ty.unmarshaler((self.get_mut)(record)).unmarshal(bytes)
    }
}
