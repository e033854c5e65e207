use std::marker::PhantomData;

use super::boolstring::BoolStringType;
use super::traits::{Marshal, MarshalType, Marshaler, Unmarshaler};
use crate::config::BOOLSTRING_TYPE;
use crate::errors::CodecError;
use crate::macros::impl_fixed_width;

/// The default codec of a [`Marshal`] value.
pub struct NativeType<V> {
    _value: PhantomData<fn() -> V>,
}

impl<V> NativeType<V> {
    pub fn new() -> Self {
        NativeType {
            _value: PhantomData,
        }
    }
}

impl<V> Default for NativeType<V> {
    fn default() -> Self {
        NativeType::new()
    }
}

struct NativeMarshaler<'a, V> {
    value: &'a V,
}

struct NativeUnmarshaler<'a, V> {
    value: &'a mut V,
}

impl<V: Marshal> MarshalType<V> for NativeType<V> {
    fn marshaler<'a>(&'a self, value: &'a V) -> Box<dyn Marshaler + 'a> {
        Box::new(NativeMarshaler { value })
    }

    fn unmarshaler<'a>(&'a self, value: &'a mut V) -> Box<dyn Unmarshaler + 'a> {
        Box::new(NativeUnmarshaler { value })
    }
}

impl<V: Marshal> Marshaler for NativeMarshaler<'_, V> {
    fn marshal(&self) -> Result<Vec<u8>, CodecError> {
        Ok(Marshal::marshal(self.value))
    }
}

impl<V: Marshal> Unmarshaler for NativeUnmarshaler<'_, V> {
    fn unmarshal(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        *self.value = V::unmarshal(bytes)?;
        Ok(())
    }
}

impl Marshal for String {
    fn marshal(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn unmarshal(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

impl Marshal for Vec<u8> {
    fn marshal(&self) -> Vec<u8> {
        self.clone()
    }

    fn unmarshal(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(bytes.to_vec())
    }
}

/// One byte, `0` for false. Any other byte reads as true.
impl Marshal for bool {
    fn marshal(&self) -> Vec<u8> {
        vec![u8::from(*self)]
    }

    fn unmarshal(bytes: &[u8]) -> Result<Self, CodecError> {
        match bytes {
            [byte] => Ok(*byte != 0),
            _ => Err(CodecError::InvalidLength {
                expected: 1,
                actual: bytes.len(),
            }),
        }
    }

    fn named_type(name: &str) -> Option<Box<dyn MarshalType<Self>>> {
        match name {
            BOOLSTRING_TYPE => Some(Box::new(BoolStringType)),
            _ => None,
        }
    }
}

impl_fixed_width!(i32, i64, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<V: Marshal>(value: V, mut target: V) -> V {
        let ty = NativeType::<V>::new();
        let bytes = ty.marshaler(&value).marshal().unwrap();
        ty.unmarshaler(&mut target).unmarshal(&bytes).unwrap();
        target
    }

    #[test]
    fn test_fixed_width_is_big_endian() {
        assert_eq!(Marshal::marshal(&7i32), vec![0, 0, 0, 7]);
        assert_eq!(
            Marshal::marshal(&-2i64),
            vec![0xffu8, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe]
        );
        assert_eq!(<i32 as Marshal>::unmarshal(&[0, 0, 1, 0]).unwrap(), 256);
        assert_eq!(roundtrip(1.5f64, 0.0), 1.5);
        assert_eq!(roundtrip(-0.25f32, 0.0), -0.25);
    }

    #[test]
    fn test_fixed_width_rejects_wrong_length() {
        match <i64 as Marshal>::unmarshal(&[0, 0, 0, 7]) {
            Err(CodecError::InvalidLength { expected, actual }) => {
                assert_eq!((expected, actual), (8, 4));
            }
            other => panic!("expected InvalidLength, got {other:?}"),
        }
    }

    #[test]
    fn test_strings_and_bytes() {
        assert_eq!(roundtrip("caffè".to_string(), String::new()), "caffè");
        assert_eq!(roundtrip(vec![0u8, 255, 3], Vec::new()), vec![0, 255, 3]);
        assert!(matches!(
            <String as Marshal>::unmarshal(&[0xff, 0xfe]),
            Err(CodecError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_bool_byte() {
        assert_eq!(Marshal::marshal(&true), vec![1]);
        assert!(roundtrip(true, false));
        assert!(<bool as Marshal>::unmarshal(&[]).is_err());
    }

    #[test]
    fn test_named_types() {
        let boolstring = bool::named_type(BOOLSTRING_TYPE).unwrap();
        assert_eq!(boolstring.marshaler(&true).marshal().unwrap(), b"true");
        assert!(bool::named_type("tuple").is_none());
        assert!(String::named_type(BOOLSTRING_TYPE).is_none());
    }
}
