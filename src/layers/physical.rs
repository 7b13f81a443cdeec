//! Physical layer: the simulated wire.
//!
//! Nothing is transmitted. The layer turns its input into a length-tagged
//! frame and back again. It is the base case of the pipeline.
//!
//! # Frame Format
//!
//! ```text
//! +------------------+
//! | length (4)       |  u32 big-endian, number of data bytes
//! +------------------+
//! | data             |  `length` bytes, carried verbatim
//! | (variable)       |
//! +------------------+
//! | crc32 (4)        |  u32 little-endian, over length + data
//! +------------------+
//! ```

use tracing::{debug, trace};

use crate::core::{
    FRAME_CHECK_SIZE, FRAME_LENGTH_SIZE, FRAME_OVERHEAD, Layer, LayerKind, StackError, StackResult,
};

/// The bottom of the stack.
///
/// Not an identity transform: every frame grows by [`FRAME_OVERHEAD`] bytes,
/// a 4-byte length prefix and a 4-byte CRC-32 trailer, so that a damaged
/// byte is reported instead of decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicalLayer;

impl PhysicalLayer {
    /// Create the physical layer.
    pub fn new() -> Self {
        Self
    }
}

fn frame_check(length: &[u8], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(length);
    hasher.update(data);
    hasher.finalize()
}

impl Layer for PhysicalLayer {
    const KIND: LayerKind = LayerKind::Physical;

    fn encapsulate(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        let length = u32::try_from(payload.len())
            .map_err(|_| StackError::encode(Self::KIND, "payload exceeds u32 frame length"))?
            .to_be_bytes();
        let crc = frame_check(&length, payload);

        let mut frame = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
        frame.extend_from_slice(&length);
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&crc.to_le_bytes());
        Ok(frame)
    }

    fn decapsulate(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        if data.len() < FRAME_OVERHEAD {
            return Err(StackError::malformed(
                Self::KIND,
                format!(
                    "frame too short: need at least {FRAME_OVERHEAD} bytes, got {}",
                    data.len()
                ),
            ));
        }

        let (length, rest) = data.split_at(FRAME_LENGTH_SIZE);
        let (body, trailer) = rest.split_at(rest.len() - FRAME_CHECK_SIZE);

        let mut length_bytes = [0u8; FRAME_LENGTH_SIZE];
        length_bytes.copy_from_slice(length);
        let declared = u32::from_be_bytes(length_bytes) as usize;
        if declared != body.len() {
            return Err(StackError::malformed(
                Self::KIND,
                format!("length mismatch: header says {declared}, got {}", body.len()),
            ));
        }

        let mut crc_bytes = [0u8; FRAME_CHECK_SIZE];
        crc_bytes.copy_from_slice(trailer);
        let expected = u32::from_le_bytes(crc_bytes);
        let actual = frame_check(length, body);
        if expected != actual {
            return Err(StackError::payload(
                Self::KIND,
                format!("CRC mismatch: expected {expected:#010x}, got {actual:#010x}"),
            ));
        }

        Ok(body.to_vec())
    }

    fn encode(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        let frame = self.encapsulate(payload)?;
        debug!(layer = %Self::KIND, bytes = frame.len(), "transmitting raw bits");
        trace!(layer = %Self::KIND, frame = %hex::encode(&frame));
        Ok(frame)
    }

    fn decode(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let payload = self.decapsulate(data)?;
        debug!(layer = %Self::KIND, bytes = payload.len(), "received raw bits");
        Ok(payload)
    }
}
