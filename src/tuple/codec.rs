use std::sync::Arc;

use super::schema::{Record, Schema};
use crate::errors::{CodecError, SchemaError};
use crate::field::Field;
use crate::marshal::{MarshalType, Marshaler, Unmarshaler};
use crate::protocol::{pack_component, unpack};

/// Marshals a record to and from a packed tuple, following the record's [`Schema`].
///
/// # Wire format
///
/// ```text
/// +-------------+-----------+-------------+-----------+-----
/// | len0 (u32)  | payload 0 | len1 (u32)  | payload 1 | ...
/// +-------------+-----------+-------------+-----------+-----
/// ```
///
/// Lengths are big-endian, components follow schema position order.
///
/// Reading is lenient: a buffer with fewer components than the schema has slots (written
/// before positions were added) leaves the extra members untouched, and components at
/// unbound positions are skipped. Writing is strict: every slot must be bound.
pub struct TupleType<T> {
    schema: Arc<Schema<T>>,
}

impl<T> Clone for TupleType<T> {
    fn clone(&self) -> Self {
        TupleType {
            schema: self.schema.clone(),
        }
    }
}

impl<T: Record> TupleType<T> {
    /// Builds a fresh schema for `T`. Prefer [`tuple_type`](super::tuple_type) to share one.
    pub fn new() -> Result<Self, SchemaError> {
        Ok(TupleType::from_schema(Schema::build()?))
    }
}

impl<T> TupleType<T> {
    pub fn from_schema(schema: Schema<T>) -> Self {
        TupleType::from_shared(Arc::new(schema))
    }

    pub(crate) fn from_shared(schema: Arc<Schema<T>>) -> Self {
        TupleType { schema }
    }

    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    pub fn marshal(&self, record: &T) -> Result<Vec<u8>, CodecError> {
        let mut tuple = Vec::new();

        for (position, slot) in self.schema.slots().iter().enumerate() {
            let field = slot.as_ref().ok_or(CodecError::UnboundSlot(position))?;
            let payload = field
                .marshal_value(record)
                .map_err(|err| field_error(position, field, err))?;
            pack_component(&mut tuple, &payload)?;
        }

        Ok(tuple)
    }

    /// Decodes `bytes` into `record` in place.
    ///
    /// If a field fails, the fields before it have already been written and the ones after it
    /// are left alone.
    pub fn unmarshal(&self, bytes: &[u8], record: &mut T) -> Result<(), CodecError> {
        let components = unpack(bytes)?;

        if components.len() < self.schema.len() {
            log::debug!(
                "{}: tuple has {} components, schema has {} slots",
                self.schema.record(),
                components.len(),
                self.schema.len()
            );
        }

        for (position, (slot, component)) in self.schema.slots().iter().zip(&components).enumerate()
        {
            let Some(field) = slot else {
                log::trace!("{}: skipping unbound slot {position}", self.schema.record());
                continue;
            };
            field
                .unmarshal_value(component, record)
                .map_err(|err| field_error(position, field, err))?;
        }

        Ok(())
    }
}

impl<T: Record> TupleType<T> {
    /// Marshals through an optional record. An absent record is an error.
    pub fn marshal_optional(&self, record: &Option<T>) -> Result<Vec<u8>, CodecError> {
        match record {
            Some(record) => self.marshal(record),
            None => Err(CodecError::NilValue),
        }
    }

    /// Decodes into an optional record, allocating `T::default()` first if it is absent.
    pub fn unmarshal_optional<'a>(
        &self,
        bytes: &[u8],
        record: &'a mut Option<T>,
    ) -> Result<&'a mut T, CodecError> {
        let record = record.get_or_insert_with(T::default);
        self.unmarshal(bytes, record)?;
        Ok(record)
    }
}

fn field_error<T>(position: usize, field: &Field<T>, err: CodecError) -> CodecError {
    CodecError::Field {
        position,
        member: field.name(),
        source: Box::new(err),
    }
}

struct TupleMarshaler<'a, T> {
    tuple: &'a TupleType<T>,
    value: &'a T,
}

struct TupleUnmarshaler<'a, T> {
    tuple: &'a TupleType<T>,
    value: &'a mut T,
}

struct OptionalTupleMarshaler<'a, T> {
    tuple: &'a TupleType<T>,
    value: &'a Option<T>,
}

struct OptionalTupleUnmarshaler<'a, T> {
    tuple: &'a TupleType<T>,
    value: &'a mut Option<T>,
}

impl<T: Record> MarshalType<T> for TupleType<T> {
    fn marshaler<'a>(&'a self, value: &'a T) -> Box<dyn Marshaler + 'a> {
        Box::new(TupleMarshaler { tuple: self, value })
    }

    fn unmarshaler<'a>(&'a self, value: &'a mut T) -> Box<dyn Unmarshaler + 'a> {
        Box::new(TupleUnmarshaler { tuple: self, value })
    }
}

impl<T: Record> MarshalType<Option<T>> for TupleType<T> {
    fn marshaler<'a>(&'a self, value: &'a Option<T>) -> Box<dyn Marshaler + 'a> {
        Box::new(OptionalTupleMarshaler { tuple: self, value })
    }

    fn unmarshaler<'a>(&'a self, value: &'a mut Option<T>) -> Box<dyn Unmarshaler + 'a> {
        Box::new(OptionalTupleUnmarshaler { tuple: self, value })
    }
}

impl<T> Marshaler for TupleMarshaler<'_, T> {
    fn marshal(&self) -> Result<Vec<u8>, CodecError> {
        self.tuple.marshal(self.value)
    }
}

impl<T> Unmarshaler for TupleUnmarshaler<'_, T> {
    fn unmarshal(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.tuple.unmarshal(bytes, self.value)
    }
}

impl<T: Record> Marshaler for OptionalTupleMarshaler<'_, T> {
    fn marshal(&self) -> Result<Vec<u8>, CodecError> {
        self.tuple.marshal_optional(self.value)
    }
}

impl<T: Record> Unmarshaler for OptionalTupleUnmarshaler<'_, T> {
    fn unmarshal(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.tuple.unmarshal_optional(bytes, self.value).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProtocolError;
    use crate::field::Member;
    use crate::protocol::pack;
    use crate::shared::logger::setup_logger;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Pair {
        name: String,
        count: i32,
    }

    impl Record for Pair {
        const NAME: &'static str = "Pair";

        fn members() -> Vec<Member<Self>> {
            vec![
                Member::new("name", |p: &Pair| &p.name, |p| &mut p.name).tuple("0"),
                Member::new("count", |p: &Pair| &p.count, |p| &mut p.count).tuple("1"),
            ]
        }
    }

    /// `Pair` as seen by code that only knows about its first position
    fn name_only() -> TupleType<Pair> {
        TupleType::from_schema(
            Schema::from_members(
                "Pair",
                vec![Member::new("name", |p: &Pair| &p.name, |p| &mut p.name).tuple("0")],
            )
            .unwrap(),
        )
    }

    /// `Pair` read by code that ignores the name
    fn count_only() -> TupleType<Pair> {
        TupleType::from_schema(
            Schema::from_members(
                "Pair",
                vec![
                    Member::new("name", |p: &Pair| &p.name, |p| &mut p.name)
                        .tuple("0")
                        .skip(),
                    Member::new("count", |p: &Pair| &p.count, |p| &mut p.count).tuple("1"),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_unmarshal_known_buffer() {
        setup_logger();
        let tuple = TupleType::<Pair>::new().unwrap();
        let buf = [0, 0, 0, 3, b'a', b'b', b'c', 0, 0, 0, 4, 0, 0, 0, 7];

        let mut pair = Pair::default();
        tuple.unmarshal(&buf, &mut pair).unwrap();
        assert_eq!(
            pair,
            Pair {
                name: "abc".into(),
                count: 7
            }
        );
        assert_eq!(tuple.marshal(&pair).unwrap(), buf);
    }

    #[test]
    fn test_roundtrip() {
        let tuple = TupleType::<Pair>::new().unwrap();
        let pair = Pair {
            name: "ünïcode".into(),
            count: -42,
        };

        let bytes = tuple.marshal(&pair).unwrap();
        let mut decoded = Pair::default();
        tuple.unmarshal(&bytes, &mut decoded).unwrap();
        assert_eq!(decoded, pair);
    }

    #[test]
    fn test_shorter_tuple_leaves_new_fields() {
        let old = name_only()
            .marshal(&Pair {
                name: "old".into(),
                count: 99,
            })
            .unwrap();

        let mut pair = Pair {
            name: String::new(),
            count: 5,
        };
        TupleType::<Pair>::new().unwrap().unmarshal(&old, &mut pair).unwrap();
        assert_eq!(pair.name, "old");
        assert_eq!(pair.count, 5);
    }

    #[test]
    fn test_longer_tuple_ignores_extra_components() {
        let bytes = pack([&b"abc"[..], &[0, 0, 0, 1][..], b"extra"]).unwrap();
        let mut pair = Pair::default();
        name_only().unmarshal(&bytes, &mut pair).unwrap();
        assert_eq!(pair.name, "abc");
        assert_eq!(pair.count, 0);
    }

    #[test]
    fn test_unbound_slot_is_skipped_on_read() {
        let bytes = TupleType::<Pair>::new()
            .unwrap()
            .marshal(&Pair {
                name: "ignored".into(),
                count: 3,
            })
            .unwrap();

        let mut pair = Pair {
            name: "kept".into(),
            count: 0,
        };
        count_only().unmarshal(&bytes, &mut pair).unwrap();
        assert_eq!(pair.name, "kept");
        assert_eq!(pair.count, 3);
    }

    #[test]
    fn test_unbound_slot_fails_on_write() {
        let err = count_only().marshal(&Pair::default()).unwrap_err();
        assert!(matches!(err, CodecError::UnboundSlot(0)));
        assert_eq!(err.to_string(), "cannot marshal: slot 0 is unbound");
    }

    #[test]
    fn test_field_failure_is_wrapped() {
        let bytes = pack([&b"abc"[..], &[0, 7][..]]).unwrap();
        let mut pair = Pair::default();
        let err = TupleType::<Pair>::new()
            .unwrap()
            .unmarshal(&bytes, &mut pair)
            .unwrap_err();

        match &err {
            CodecError::Field {
                position, member, ..
            } => assert_eq!((*position, *member), (1, "count")),
            other => panic!("expected Field error, got {other:?}"),
        }
        assert!(matches!(
            err.root(),
            CodecError::InvalidLength {
                expected: 4,
                actual: 2
            }
        ));
        // Fields before the failing one were applied
        assert_eq!(pair.name, "abc");
    }

    #[test]
    fn test_truncated_buffer() {
        let mut pair = Pair::default();
        let err = TupleType::<Pair>::new()
            .unwrap()
            .unmarshal(&[0, 0, 0, 10, b'a', b'b', b'c'], &mut pair)
            .unwrap_err();

        assert!(matches!(
            err,
            CodecError::Protocol(ProtocolError::Truncated { needed: 14, .. })
        ));
        assert_eq!(pair, Pair::default());
    }

    #[test]
    fn test_optional_record() {
        let tuple = TupleType::<Pair>::new().unwrap();
        let bytes = tuple
            .marshal(&Pair {
                name: "x".into(),
                count: 1,
            })
            .unwrap();

        let mut target: Option<Pair> = None;
        let pair = tuple.unmarshal_optional(&bytes, &mut target).unwrap();
        assert_eq!(pair.count, 1);
        assert_eq!(target.as_ref().map(|p| p.name.as_str()), Some("x"));

        assert_eq!(tuple.marshal_optional(&target).unwrap(), bytes);
        assert!(matches!(
            tuple.marshal_optional(&None),
            Err(CodecError::NilValue)
        ));
    }

    #[test]
    fn test_marshal_type_contract() {
        let tuple = TupleType::<Pair>::new().unwrap();
        let pair = Pair {
            name: "y".into(),
            count: 2,
        };

        let bytes = MarshalType::<Pair>::marshaler(&tuple, &pair).marshal().unwrap();

        let mut target: Option<Pair> = None;
        MarshalType::<Option<Pair>>::unmarshaler(&tuple, &mut target)
            .unmarshal(&bytes)
            .unwrap();
        assert_eq!(target, Some(pair));
    }
}
