mod config;
mod errors;
mod macros;

// Submodules only expose their public API through the parent module

pub mod shared {
    pub mod logger;
}

pub mod protocol {
    mod components;

    pub use components::{pack, pack_component, unpack, Components};
}

pub mod marshal {
    mod boolstring;
    mod native;
    mod traits;

    pub use boolstring::BoolStringType;
    pub use native::NativeType;
    pub use traits::{Marshal, MarshalType, Marshaler, Unmarshaler};
}

pub mod field {
    mod accessor;
    mod member;

    pub use accessor::{Field, FieldCodec};
    pub use member::{bind_field, Member};
}

pub mod tuple {
    mod codec;
    mod registry;
    mod schema;

    pub use codec::TupleType;
    pub use registry::tuple_type;
    pub use schema::{Record, Schema};
}

pub use config::{BOOLSTRING_TYPE, LENGTH_PREFIX_SIZE, TUPLE_TYPE};
pub use errors::{CodecError, ProtocolError, SchemaError};
pub use field::Member;
pub use tuple::{tuple_type, Record, TupleType};
