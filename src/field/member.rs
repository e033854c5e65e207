use std::sync::Arc;

use super::accessor::{Accessor, Field, FieldCodec};
use crate::config::TUPLE_TYPE;
use crate::errors::SchemaError;
use crate::marshal::{Marshal, MarshalType, NativeType};
use crate::tuple::{tuple_type, Record, TupleType};

type Binder<T> = Box<
    dyn Fn(&'static str, Option<&'static str>) -> Result<Box<dyn FieldCodec<T>>, SchemaError>
        + Send
        + Sync,
>;

/// Declaration of one member of a record: how to reach it and how it is annotated.
///
/// ```ignore
/// Member::new("admin", |c: &Config| &c.admin, |c| &mut c.admin)
///     .tuple("0")
///     .marshal("boolstring")
/// ```
pub struct Member<T> {
    name: &'static str,
    /// Tuple position annotation, kept as text until the schema is built
    tuple: Option<&'static str>,
    /// Name of an alternative marshal type for the member's value
    marshal: Option<&'static str>,
    skip: bool,
    binder: Binder<T>,
}

impl<T: 'static> Member<T> {
    /// A member encoded with its value's default codec, or with the codec named by
    /// [`Member::marshal`].
    pub fn new<V: Marshal>(
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        Member::with_binder(name, move |member, marshal| {
            let ty: Arc<dyn MarshalType<V>> = match marshal {
                None => Arc::new(NativeType::<V>::new()),
                Some(type_name) => V::named_type(type_name)
                    .ok_or(SchemaError::UnknownMarshalType {
                        member,
                        name: type_name,
                    })?
                    .into(),
            };
            Ok(Box::new(Accessor { get, get_mut, ty }) as Box<dyn FieldCodec<T>>)
        })
    }

    /// A member encoded with a caller supplied codec. Marshal type names do not apply to it.
    pub fn with_type<V: 'static, M: MarshalType<V> + 'static>(
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
        ty: M,
    ) -> Self {
        let ty: Arc<dyn MarshalType<V>> = Arc::new(ty);
        Member::with_binder(name, move |member, marshal| match marshal {
            Some(type_name) => Err(SchemaError::UnknownMarshalType {
                member,
                name: type_name,
            }),
            None => Ok(Box::new(Accessor {
                get,
                get_mut,
                ty: ty.clone(),
            }) as Box<dyn FieldCodec<T>>),
        })
    }

    /// A member holding another record (`V` or `Option<V>`), written as a nested tuple.
    pub fn nested<V: Record, H: 'static>(
        name: &'static str,
        get: fn(&T) -> &H,
        get_mut: fn(&mut T) -> &mut H,
    ) -> Self
    where
        TupleType<V>: MarshalType<H>,
    {
        Member::with_binder(name, move |member, marshal| {
            if let Some(type_name) = marshal.filter(|type_name| *type_name != TUPLE_TYPE) {
                return Err(SchemaError::UnknownMarshalType {
                    member,
                    name: type_name,
                });
            }
            let ty: Arc<dyn MarshalType<H>> = Arc::new(tuple_type::<V>()?);
            Ok(Box::new(Accessor { get, get_mut, ty }) as Box<dyn FieldCodec<T>>)
        })
    }

    fn with_binder<F>(name: &'static str, binder: F) -> Self
    where
        F: Fn(&'static str, Option<&'static str>) -> Result<Box<dyn FieldCodec<T>>, SchemaError>
            + Send
            + Sync
            + 'static,
    {
        Member {
            name,
            tuple: None,
            marshal: None,
            skip: false,
            binder: Box::new(binder),
        }
    }
}

impl<T> Member<T> {
    /// Places the member at a zero-based tuple position.
    pub fn tuple(mut self, position: &'static str) -> Self {
        self.tuple = Some(position);
        self
    }

    /// Selects an alternative marshal type by name, e.g. `"boolstring"`.
    pub fn marshal(mut self, type_name: &'static str) -> Self {
        self.marshal = Some(type_name);
        self
    }

    /// Excludes the member from marshaling. If it carries a tuple position, that slot stays
    /// empty.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tuple_position(&self) -> Option<&'static str> {
        self.tuple
    }
}

/// Wraps the member declared at `index` as a [`Field`].
///
/// Returns `Ok(None)` for members that are excluded from marshaling.
pub fn bind_field<T>(index: usize, member: &Member<T>) -> Result<Option<Field<T>>, SchemaError> {
    if member.skip {
        log::debug!("member {} is skipped", member.name);
        return Ok(None);
    }

    let codec = (member.binder)(member.name, member.marshal)?;
    Ok(Some(Field::new(index, member.name, codec)))
}
