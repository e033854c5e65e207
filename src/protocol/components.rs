use bytes::{Buf, BufMut};

use crate::config::LENGTH_PREFIX_SIZE;
use crate::errors::ProtocolError;

/// Appends one component to `dst`, framed as a big-endian `u32` length followed by the payload.
pub fn pack_component(dst: &mut Vec<u8>, payload: &[u8]) -> Result<(), ProtocolError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| ProtocolError::ComponentTooLarge(payload.len()))?;

    dst.reserve(LENGTH_PREFIX_SIZE + payload.len());
    dst.put_u32(len);
    dst.put_slice(payload);

    log::trace!("packed component of {len} bytes");
    Ok(())
}

/// Packs the components back to back, with no separators and no trailing marker.
pub fn pack<I>(components: I) -> Result<Vec<u8>, ProtocolError>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut packed = Vec::new();
    for component in components {
        pack_component(&mut packed, component.as_ref())?;
    }
    Ok(packed)
}

/// Splits a packed buffer into its component payloads.
///
/// The whole buffer must be well formed: a length prefix cut short, or one that declares more
/// bytes than are left, makes the call fail instead of returning the components read so far.
pub fn unpack(buf: &[u8]) -> Result<Vec<&[u8]>, ProtocolError> {
    Components::new(buf).collect::<Result<Vec<_>, _>>().map_err(|err| {
        log::warn!("rejecting packed tuple of {} bytes: {err}", buf.len());
        err
    })
}

/// Lazy iterator over the payloads of a packed buffer. Payloads borrow from the buffer.
///
/// After yielding an error the iterator is fused and only returns `None`.
pub struct Components<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Components<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Components {
            buf,
            offset: 0,
            failed: false,
        }
    }

    fn truncated(&mut self, needed: usize) -> ProtocolError {
        self.failed = true;
        ProtocolError::Truncated {
            offset: self.offset,
            needed,
            remaining: self.buf.remaining(),
        }
    }
}

impl<'a> Iterator for Components<'a> {
    type Item = Result<&'a [u8], ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.buf.has_remaining() {
            return None;
        }

        if self.buf.remaining() < LENGTH_PREFIX_SIZE {
            return Some(Err(self.truncated(LENGTH_PREFIX_SIZE)));
        }

        let len = (&self.buf[..LENGTH_PREFIX_SIZE]).get_u32() as usize;
        let needed = LENGTH_PREFIX_SIZE + len;
        if self.buf.remaining() < needed {
            return Some(Err(self.truncated(needed)));
        }

        let buf: &'a [u8] = self.buf;
        let payload = &buf[LENGTH_PREFIX_SIZE..needed];
        self.buf.advance(needed);
        self.offset += needed;

        log::trace!("unpacked component of {len} bytes");
        Some(Ok(payload))
    }
}
