use crate::errors::CodecError;

/// Produces the wire bytes of one borrowed value.
pub trait Marshaler {
    fn marshal(&self) -> Result<Vec<u8>, CodecError>;
}

/// Writes decoded wire bytes into one mutably borrowed value.
pub trait Unmarshaler {
    fn unmarshal(&mut self, bytes: &[u8]) -> Result<(), CodecError>;
}

/// A codec for values of type `V`. Codecs are stateless apart from their configuration, so a
/// single instance is shared by every field (and every thread) that uses it.
pub trait MarshalType<V>: Send + Sync {
    fn marshaler<'a>(&'a self, value: &'a V) -> Box<dyn Marshaler + 'a>;

    fn unmarshaler<'a>(&'a self, value: &'a mut V) -> Box<dyn Unmarshaler + 'a>;
}

/// Values with a default column encoding.
pub trait Marshal: Sized + Send + Sync + 'static {
    fn marshal(&self) -> Vec<u8>;

    fn unmarshal(bytes: &[u8]) -> Result<Self, CodecError>;

    /// Looks up an alternative encoding for this type by name, e.g. `"boolstring"` for `bool`.
    fn named_type(_name: &str) -> Option<Box<dyn MarshalType<Self>>> {
        None
    }
}
