//! `Scaler` — a named pair of free-running channel counts (spec §6,
//! `GEN_SCALER_ID` / `TRI_TD_SCALER_ID`).

use super::SectionPayload;
use crate::buffer::{ByteReader, ByteWriter};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scaler {
    pub counts: [u32; 2],
    pub label: String,
}

impl SectionPayload for Scaler {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        let c0 = reader.read_u32()?;
        let c1 = reader.read_u32()?;
        let label = reader.read_str()?;
        Ok(Scaler {
            counts: [c0, c1],
            label,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.counts[0]);
        writer.write_u32(self.counts[1]);
        writer.write_str(&self.label);
    }

    fn size(&self) -> u32 {
        4 + 4 + 2 + self.label.len() as u32
    }

    fn describe(&self) -> String {
        format!("\"{}\": [{}, {}]", self.label, self.counts[0], self.counts[1])
    }
}
