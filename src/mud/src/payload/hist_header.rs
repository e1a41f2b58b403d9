//! `HistHeader` — a histogram's binning, timing, and packed bin data
//! (spec §6, `GEN_HIST_HDR_ID` / `TRI_TD_HIST_ID` / `TRI_TI_HIST_ID`).
//!
//! The payload carries the raw, still-packed `nBytes` of bin data as a flat
//! byte blob — unpacking into `u32` bins per `bytesPerBin` is the friendly
//! API's job (`friendly::get_hist_data`), not the catalogue type's, since
//! the unpacked form is not what the format puts on the wire.

use super::SectionPayload;
use crate::buffer::{ByteReader, ByteWriter};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistHeader {
    pub hist_type: u32,
    pub n_bytes: u32,
    pub n_bins: u32,
    /// 1, 2, or 4: fixed-width bin element size. 0 selects the
    /// variable-length packed scheme (`payload::packing`).
    pub bytes_per_bin: u32,
    pub fs_per_bin: u32,
    pub t0_ps: u32,
    pub t0_bin: u32,
    pub good_bin1: u32,
    pub good_bin2: u32,
    pub bkgd1: u32,
    pub bkgd2: u32,
    pub n_events: u32,
    pub title: String,
    /// `n_bytes` raw, still-packed bin bytes.
    pub data: Vec<u8>,
}

impl SectionPayload for HistHeader {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        let hist_type = reader.read_u32()?;
        let n_bytes = reader.read_u32()?;
        let n_bins = reader.read_u32()?;
        let bytes_per_bin = reader.read_u32()?;
        let fs_per_bin = reader.read_u32()?;
        let t0_ps = reader.read_u32()?;
        let t0_bin = reader.read_u32()?;
        let good_bin1 = reader.read_u32()?;
        let good_bin2 = reader.read_u32()?;
        let bkgd1 = reader.read_u32()?;
        let bkgd2 = reader.read_u32()?;
        let n_events = reader.read_u32()?;
        let title = reader.read_str()?;
        let data = reader.read_raw(n_bytes as usize)?.to_vec();
        Ok(HistHeader {
            hist_type,
            n_bytes,
            n_bins,
            bytes_per_bin,
            fs_per_bin,
            t0_ps,
            t0_bin,
            good_bin1,
            good_bin2,
            bkgd1,
            bkgd2,
            n_events,
            title,
            data,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.hist_type);
        writer.write_u32(self.n_bytes);
        writer.write_u32(self.n_bins);
        writer.write_u32(self.bytes_per_bin);
        writer.write_u32(self.fs_per_bin);
        writer.write_u32(self.t0_ps);
        writer.write_u32(self.t0_bin);
        writer.write_u32(self.good_bin1);
        writer.write_u32(self.good_bin2);
        writer.write_u32(self.bkgd1);
        writer.write_u32(self.bkgd2);
        writer.write_u32(self.n_events);
        writer.write_str(&self.title);
        writer.write_raw(&self.data);
    }

    fn size(&self) -> u32 {
        12 * 4 + 2 + self.title.len() as u32 + self.data.len() as u32
    }

    fn describe(&self) -> String {
        format!(
            "\"{}\": {} bins, {} bytes/bin",
            self.title, self.n_bins, self.bytes_per_bin
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let h = HistHeader {
            hist_type: 1,
            n_bytes: 32768 * 4,
            n_bins: 32768,
            bytes_per_bin: 4,
            fs_per_bin: 781_250_000,
            t0_ps: 0,
            t0_bin: 0,
            good_bin1: 0,
            good_bin2: 32768,
            bkgd1: 0,
            bkgd2: 0,
            n_events: 0,
            title: "hist 1".to_string(),
            data: vec![0u8; 32768 * 4],
        };
        let mut w = ByteWriter::new();
        h.encode(&mut w);
        assert_eq!(w.len(), h.size() as usize);

        let bytes = w.into_vec();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(HistHeader::decode(&mut r).unwrap(), h);
    }

    #[test]
    fn variable_width_marker_roundtrips() {
        let h = HistHeader {
            bytes_per_bin: 0,
            n_bytes: 4,
            n_bins: 2,
            title: "packed".to_string(),
            data: vec![0, 5, 0, 9],
            ..Default::default()
        };
        let mut w = ByteWriter::new();
        h.encode(&mut w);
        let bytes = w.into_vec();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(HistHeader::decode(&mut r).unwrap(), h);
    }
}
