use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A length prefix or the payload it declares runs past the end of the buffer.
    Truncated {
        /// Offset of the component whose frame is incomplete
        offset: usize,
        /// Bytes the frame needs from `offset` onwards
        needed: usize,
        /// Bytes actually left from `offset` onwards
        remaining: usize,
    },
    /// A component does not fit in a 32 bit length prefix.
    ComponentTooLarge(usize),
}

#[derive(Debug)]
pub enum SchemaError {
    /// The tuple position annotation is not a non-negative integer.
    InvalidPosition {
        record: &'static str,
        value: &'static str,
    },
    /// Two members of the same record claim the same tuple position.
    DuplicatePosition {
        record: &'static str,
        position: usize,
    },
    /// A member asked for a marshal type its value type does not provide.
    UnknownMarshalType {
        member: &'static str,
        name: &'static str,
    },
    /// Binding a member failed, e.g. the schema of a nested record is invalid.
    Member {
        record: &'static str,
        member: &'static str,
        source: Box<SchemaError>,
    },
}

#[derive(Debug)]
pub enum CodecError {
    /// The schema has no field at this position, so the tuple cannot be written.
    UnboundSlot(usize),
    /// A single field failed to (un)marshal.
    Field {
        position: usize,
        member: &'static str,
        source: Box<CodecError>,
    },
    /// The bytes are not one of `""`, `"true"` or `"false"`.
    InvalidBoolString(Vec<u8>),
    /// A fixed width value received the wrong number of bytes.
    InvalidLength { expected: usize, actual: usize },
    InvalidUtf8(std::string::FromUtf8Error),
    /// An optional record was absent when it had to be marshaled.
    NilValue,
    /// Derived error from the component protocol
    Protocol(ProtocolError),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Truncated {
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "truncated tuple component at offset {offset}: needs {needed} bytes, {remaining} remaining"
            ),
            ProtocolError::ComponentTooLarge(len) => {
                write!(f, "tuple component of {len} bytes exceeds the length prefix")
            }
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidPosition { record, value } => {
                write!(f, "invalid tuple position in record {record}: {value:?}")
            }
            SchemaError::DuplicatePosition { record, position } => {
                write!(f, "tuple position repeated in record {record}: {position}")
            }
            SchemaError::UnknownMarshalType { member, name } => {
                write!(f, "unknown marshal type {name:?} for member {member}")
            }
            SchemaError::Member {
                record,
                member,
                source,
            } => write!(f, "error in record {record}, member {member}: {source}"),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::UnboundSlot(position) => {
                write!(f, "cannot marshal: slot {position} is unbound")
            }
            CodecError::Field {
                position,
                member,
                source,
            } => write!(f, "tuple slot {position} ({member}): {source}"),
            CodecError::InvalidBoolString(bytes) => {
                write!(f, "invalid boolean text: {bytes:?}")
            }
            CodecError::InvalidLength { expected, actual } => {
                write!(f, "invalid value length: expected {expected} bytes, got {actual}")
            }
            CodecError::InvalidUtf8(err) => write!(f, "invalid UTF-8: {err}"),
            CodecError::NilValue => write!(f, "cannot marshal an absent value"),
            CodecError::Protocol(err) => write!(f, "protocol error: {err}"),
        }
    }
}

impl Error for ProtocolError {}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SchemaError::Member { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CodecError::Field { source, .. } => Some(source.as_ref()),
            CodecError::InvalidUtf8(err) => Some(err),
            CodecError::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProtocolError> for CodecError {
    fn from(err: ProtocolError) -> Self {
        CodecError::Protocol(err)
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CodecError::InvalidUtf8(err)
    }
}

impl CodecError {
    /// Follows nested `Field` wrappers down to the error that started it.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::Field { source, .. } => source.root(),
            err => err,
        }
    }
}
