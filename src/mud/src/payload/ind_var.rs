//! `IndVar` / `IndVarArray` — a named independent variable, as summary
//! statistics or a raw sampled time series (spec §6, `GEN_IND_VAR_ID` /
//! `GEN_IND_VAR_ARR_ID`).

use super::SectionPayload;
use crate::buffer::{ByteReader, ByteWriter};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndVar {
    pub low: f64,
    pub high: f64,
    pub mean: f64,
    pub stddev: f64,
    pub skewness: f64,
    pub name: String,
    pub description: String,
    pub units: String,
}

impl SectionPayload for IndVar {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        Ok(IndVar {
            low: reader.read_f64()?,
            high: reader.read_f64()?,
            mean: reader.read_f64()?,
            stddev: reader.read_f64()?,
            skewness: reader.read_f64()?,
            name: reader.read_str()?,
            description: reader.read_str()?,
            units: reader.read_str()?,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_f64(self.low);
        writer.write_f64(self.high);
        writer.write_f64(self.mean);
        writer.write_f64(self.stddev);
        writer.write_f64(self.skewness);
        writer.write_str(&self.name);
        writer.write_str(&self.description);
        writer.write_str(&self.units);
    }

    fn size(&self) -> u32 {
        5 * 8
            + 2
            + self.name.len() as u32
            + 2
            + self.description.len() as u32
            + 2
            + self.units.len() as u32
    }

    fn describe(&self) -> String {
        format!("{} ({} .. {}, mean {})", self.name, self.low, self.high, self.mean)
    }
}

/// `GEN_IND_VAR_ID` fields plus the raw sampled data, and optionally a
/// parallel `u32` timestamp per sample when `has_time` is set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndVarArray {
    pub stats: IndVar,
    /// Element width in bytes; `data.len() == elem_size as usize * num_data`.
    pub elem_size: u32,
    /// Producer-defined element type tag (opaque to this codec).
    pub data_type: u32,
    pub data: Vec<u8>,
    pub time_data: Option<Vec<u32>>,
}

impl IndVarArray {
    fn num_data(&self) -> u32 {
        if self.elem_size == 0 {
            0
        } else {
            self.data.len() as u32 / self.elem_size
        }
    }
}

impl SectionPayload for IndVarArray {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        let stats = IndVar::decode(reader)?;
        let num_data = reader.read_u32()?;
        let elem_size = reader.read_u32()?;
        let data_type = reader.read_u32()?;
        let has_time = reader.read_u32()?;
        let data = reader.read_raw(elem_size as usize * num_data as usize)?.to_vec();
        let time_data = if has_time != 0 {
            // `num_data` is wire-supplied and can be huge while `elem_size`
            // is 0 (so the `data` read above consumes nothing and does not
            // bound it) — check against the remaining stream before
            // reserving `num_data` capacity for the timestamp array.
            if u64::from(num_data) * 4 > reader.remaining() as u64 {
                return Err(crate::error::MudError::CorruptSection(format!(
                    "independent variable array declares {num_data} timestamps, more than the remaining bytes could hold"
                )));
            }
            let mut times = Vec::with_capacity(num_data as usize);
            for _ in 0..num_data {
                times.push(reader.read_u32()?);
            }
            Some(times)
        } else {
            None
        };
        Ok(IndVarArray {
            stats,
            elem_size,
            data_type,
            data,
            time_data,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        self.stats.encode(writer);
        writer.write_u32(self.num_data());
        writer.write_u32(self.elem_size);
        writer.write_u32(self.data_type);
        writer.write_u32(self.time_data.is_some() as u32);
        writer.write_raw(&self.data);
        if let Some(times) = &self.time_data {
            for &t in times {
                writer.write_u32(t);
            }
        }
    }

    fn size(&self) -> u32 {
        self.stats.size()
            + 4 * 4
            + self.data.len() as u32
            + self.time_data.as_ref().map_or(0, |t| 4 * t.len() as u32)
    }

    fn describe(&self) -> String {
        format!("{}[{}]", self.stats.name, self.num_data())
    }
}
