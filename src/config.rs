use crate::macros::static_assert;

/// Width (in bytes) of the big-endian length that frames every tuple component
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Marshal type name that encodes a `bool` as the text `"true"` / `"false"`
pub const BOOLSTRING_TYPE: &str = "boolstring";

/// Marshal type name of a nested tuple member
pub const TUPLE_TYPE: &str = "tuple";

/// Used by the logger to shorten the targets of this crate's own modules
pub static CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");

static_assert!(LENGTH_PREFIX_SIZE == std::mem::size_of::<u32>());
