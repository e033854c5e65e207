macro_rules! static_assert {
    ($cond:expr, $msg:expr) => {
        #[allow(dead_code)]
        const fn static_assertion() {
            assert!($cond, $msg);
        }

        const _: () = static_assertion();
    };
    ($cond:expr) => {
        static_assert!($cond, "Static assertion failed");
    };
}

/// Implements [`Marshal`](crate::marshal::Marshal) for numbers stored as fixed width
/// big-endian bytes.
macro_rules! impl_fixed_width {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::marshal::Marshal for $ty {
                fn marshal(&self) -> Vec<u8> {
                    self.to_be_bytes().to_vec()
                }

                fn unmarshal(bytes: &[u8]) -> Result<Self, $crate::errors::CodecError> {
                    let raw = bytes.try_into().map_err(|_| {
                        $crate::errors::CodecError::InvalidLength {
                            expected: std::mem::size_of::<$ty>(),
                            actual: bytes.len(),
                        }
                    })?;
                    Ok(<$ty>::from_be_bytes(raw))
                }
            }
        )+
    };
}

pub(crate) use impl_fixed_width;
pub(crate) use static_assert;
