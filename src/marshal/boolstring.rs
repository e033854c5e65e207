use super::traits::{MarshalType, Marshaler, Unmarshaler};
use crate::errors::CodecError;

/// Encodes a `bool` as the text `"true"` or `"false"`.
///
/// An empty value reads back as `false`, so columns that were never written decode cleanly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolStringType;

pub struct BoolStringMarshaler<'a> {
    value: &'a bool,
}

pub struct BoolStringUnmarshaler<'a> {
    value: &'a mut bool,
}

impl MarshalType<bool> for BoolStringType {
    fn marshaler<'a>(&'a self, value: &'a bool) -> Box<dyn Marshaler + 'a> {
        Box::new(BoolStringMarshaler { value })
    }

    fn unmarshaler<'a>(&'a self, value: &'a mut bool) -> Box<dyn Unmarshaler + 'a> {
        Box::new(BoolStringUnmarshaler { value })
    }
}

impl Marshaler for BoolStringMarshaler<'_> {
    fn marshal(&self) -> Result<Vec<u8>, CodecError> {
        Ok(self.value.to_string().into_bytes())
    }
}

impl Unmarshaler for BoolStringUnmarshaler<'_> {
    fn unmarshal(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        *self.value = match bytes {
            b"true" => true,
            b"" | b"false" => false,
            _ => return Err(CodecError::InvalidBoolString(bytes.to_vec())),
        };
        Ok(())
    }
}
