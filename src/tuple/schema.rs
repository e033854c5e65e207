use crate::errors::SchemaError;
use crate::field::{bind_field, Field, Member};

/// A record type that can be written as a tuple.
///
/// The members replace struct tags: each one names a field, how to reach it and, through
/// [`Member::tuple`], its position in the tuple. Members without a position are not part of
/// the tuple at all.
pub trait Record: Default + Send + Sync + 'static {
    const NAME: &'static str;

    fn members() -> Vec<Member<Self>>;
}

/// The tuple layout of a record: one slot per position, `None` where nothing is bound.
///
/// Gaps are allowed. A schema never grows past its highest annotated position and is not
/// modified once built.
pub struct Schema<T> {
    record: &'static str,
    slots: Vec<Option<Field<T>>>,
}

impl<T: Record> Schema<T> {
    pub fn build() -> Result<Self, SchemaError> {
        Schema::from_members(T::NAME, T::members())
    }
}

impl<T> Schema<T> {
    /// Lays out `members` by their tuple positions.
    ///
    /// Fails if a position is not a non-negative integer, if two members claim the same
    /// position, or if a member cannot be bound.
    pub fn from_members(record: &'static str, members: Vec<Member<T>>) -> Result<Self, SchemaError> {
        let mut slots: Vec<Option<Field<T>>> = Vec::new();

        for (index, member) in members.iter().enumerate() {
            let Some(value) = member.tuple_position() else {
                continue;
            };

            let position: usize = value
                .parse()
                .map_err(|_| SchemaError::InvalidPosition { record, value })?;

            if position >= slots.len() {
                slots.resize_with(position + 1, || None);
            }

            // Only a bound field occupies a slot, a skipped member leaves it free
            if slots[position].is_some() {
                return Err(SchemaError::DuplicatePosition { record, position });
            }

            let field = bind_field(index, member).map_err(|err| SchemaError::Member {
                record,
                member: member.name(),
                source: Box::new(err),
            })?;

            if field.is_none() {
                log::debug!("{record}: tuple slot {position} left unbound");
            }
            slots[position] = field;
        }

        let schema = Schema { record, slots };
        log::debug!(
            "built tuple schema for {record}: {} slots, {} bound",
            schema.len(),
            schema.bound_len()
        );
        Ok(schema)
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    /// Number of slots, bound or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bound_len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn slots(&self) -> &[Option<Field<T>>] {
        &self.slots
    }

    pub fn field(&self, position: usize) -> Option<&Field<T>> {
        self.slots.get(position).and_then(Option::as_ref)
    }

    /// Positions without a field. A schema with any of these can be read but never written.
    pub fn unbound_positions(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(position, _)| position)
            .collect()
    }
}

impl<T> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("record", &self.record)
            .field("slots", &self.slots)
            .finish()
    }
}
