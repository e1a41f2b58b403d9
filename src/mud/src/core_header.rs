//! Component B — the fixed Section Core prefix.

use crate::buffer::{ByteReader, ByteWriter};
use crate::error::Result;

/// The Core prefix every Section starts with.
///
/// `CORE_SIZE` is 24 bytes on the wire: the four logical fields below (16
/// bytes) plus 8 bytes of reserved padding, written as zero and ignored on
/// read. See `SPEC_FULL.md` §3/§9 for why 24 rather than the 16 the field
/// list alone would suggest — every quantitative invariant in the format
/// (`nextOffset == CORE_SIZE + size`, a Group's `size == 4 + Σ(CORE_SIZE +
/// child.size)`) only holds with `CORE_SIZE = 24`.
pub const CORE_SIZE: u32 = 24;

const RESERVED_PADDING: [u8; 8] = [0; 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Core {
    /// Bytes from the start of this Section to the start of the next
    /// sibling; 0 if this is the last member of its enclosing Group.
    pub next_offset: u32,
    /// Payload length, not including the Core.
    pub size: u32,
    /// Type identifier, looked up in the registry (component C).
    pub sec_id: u32,
    /// Per-type disambiguator chosen by the producer.
    pub instance_id: u32,
}

impl Core {
    /// A zeroed Core for a freshly registry-allocated Section of the given
    /// type; `size`/`next_offset` are filled in by the file driver's
    /// layout pass before a write.
    pub fn new(sec_id: u32, instance_id: u32) -> Self {
        Core {
            next_offset: 0,
            size: 0,
            sec_id,
            instance_id,
        }
    }

    pub fn decode(reader: &mut ByteReader) -> Result<Core> {
        let next_offset = reader.read_u32()?;
        let size = reader.read_u32()?;
        let sec_id = reader.read_u32()?;
        let instance_id = reader.read_u32()?;
        reader.read_raw(RESERVED_PADDING.len())?;
        Ok(Core {
            next_offset,
            size,
            sec_id,
            instance_id,
        })
    }

    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.next_offset);
        writer.write_u32(self.size);
        writer.write_u32(self.sec_id);
        writer.write_u32(self.instance_id);
        writer.write_raw(&RESERVED_PADDING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let core = Core {
            next_offset: 123,
            size: 99,
            sec_id: 0xABCD,
            instance_id: 3,
        };
        let mut w = ByteWriter::new();
        core.encode(&mut w);
        assert_eq!(w.len(), CORE_SIZE as usize);

        let bytes = w.into_vec();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(Core::decode(&mut r).unwrap(), core);
    }

    proptest::proptest! {
        #[test]
        fn roundtrip_arbitrary(next_offset: u32, size: u32, sec_id: u32, instance_id: u32) {
            let core = Core { next_offset, size, sec_id, instance_id };
            let mut w = ByteWriter::new();
            core.encode(&mut w);
            let bytes = w.into_vec();
            let mut r = ByteReader::new(&bytes);
            prop_assert_eq!(Core::decode(&mut r).unwrap(), core);
        }
    }
}
