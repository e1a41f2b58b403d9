//! `RunDesc` / `TriTiRunDesc` — the run-description header every file group
//! carries once (spec §6, `GEN_RUN_DESC_ID` / `TRI_TI_RUN_DESC_ID`).

use super::SectionPayload;
use crate::buffer::{ByteReader, ByteWriter};
use crate::error::Result;

/// The generic run header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunDesc {
    pub expt_number: u32,
    pub run_number: u32,
    /// Seconds since 1970-01-01 UTC.
    pub time_begin: u32,
    pub time_end: u32,
    pub elapsed_sec: u32,
    pub title: String,
    pub lab: String,
    pub area: String,
    pub method: String,
    pub apparatus: String,
    pub insert: String,
    pub sample: String,
    pub orient: String,
    pub das: String,
    pub experimenter: String,
    pub temperature: String,
    pub field: String,
}

impl SectionPayload for RunDesc {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        Ok(RunDesc {
            expt_number: reader.read_u32()?,
            run_number: reader.read_u32()?,
            time_begin: reader.read_time()?,
            time_end: reader.read_time()?,
            elapsed_sec: reader.read_u32()?,
            title: reader.read_str()?,
            lab: reader.read_str()?,
            area: reader.read_str()?,
            method: reader.read_str()?,
            apparatus: reader.read_str()?,
            insert: reader.read_str()?,
            sample: reader.read_str()?,
            orient: reader.read_str()?,
            das: reader.read_str()?,
            experimenter: reader.read_str()?,
            temperature: reader.read_str()?,
            field: reader.read_str()?,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.expt_number);
        writer.write_u32(self.run_number);
        writer.write_time(self.time_begin);
        writer.write_time(self.time_end);
        writer.write_u32(self.elapsed_sec);
        writer.write_str(&self.title);
        writer.write_str(&self.lab);
        writer.write_str(&self.area);
        writer.write_str(&self.method);
        writer.write_str(&self.apparatus);
        writer.write_str(&self.insert);
        writer.write_str(&self.sample);
        writer.write_str(&self.orient);
        writer.write_str(&self.das);
        writer.write_str(&self.experimenter);
        writer.write_str(&self.temperature);
        writer.write_str(&self.field);
    }

    fn size(&self) -> u32 {
        5 * 4
            + str_fields(self)
                .iter()
                .map(|s| 2 + s.len() as u32)
                .sum::<u32>()
    }

    fn describe(&self) -> String {
        format!("run {} \"{}\" ({})", self.run_number, self.title, self.sample)
    }
}

fn str_fields(rd: &RunDesc) -> [&str; 12] {
    [
        &rd.title,
        &rd.lab,
        &rd.area,
        &rd.method,
        &rd.apparatus,
        &rd.insert,
        &rd.sample,
        &rd.orient,
        &rd.das,
        &rd.experimenter,
        &rd.temperature,
        &rd.field,
    ]
}

/// The triplet time-integral run header — identical to [`RunDesc`] except
/// `temperature`/`field` are replaced with `subtitle`/`comment1..3`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriTiRunDesc {
    pub expt_number: u32,
    pub run_number: u32,
    pub time_begin: u32,
    pub time_end: u32,
    pub elapsed_sec: u32,
    pub title: String,
    pub lab: String,
    pub area: String,
    pub method: String,
    pub apparatus: String,
    pub insert: String,
    pub sample: String,
    pub orient: String,
    pub das: String,
    pub experimenter: String,
    pub subtitle: String,
    pub comment1: String,
    pub comment2: String,
    pub comment3: String,
}

impl SectionPayload for TriTiRunDesc {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        Ok(TriTiRunDesc {
            expt_number: reader.read_u32()?,
            run_number: reader.read_u32()?,
            time_begin: reader.read_time()?,
            time_end: reader.read_time()?,
            elapsed_sec: reader.read_u32()?,
            title: reader.read_str()?,
            lab: reader.read_str()?,
            area: reader.read_str()?,
            method: reader.read_str()?,
            apparatus: reader.read_str()?,
            insert: reader.read_str()?,
            sample: reader.read_str()?,
            orient: reader.read_str()?,
            das: reader.read_str()?,
            experimenter: reader.read_str()?,
            subtitle: reader.read_str()?,
            comment1: reader.read_str()?,
            comment2: reader.read_str()?,
            comment3: reader.read_str()?,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.expt_number);
        writer.write_u32(self.run_number);
        writer.write_time(self.time_begin);
        writer.write_time(self.time_end);
        writer.write_u32(self.elapsed_sec);
        writer.write_str(&self.title);
        writer.write_str(&self.lab);
        writer.write_str(&self.area);
        writer.write_str(&self.method);
        writer.write_str(&self.apparatus);
        writer.write_str(&self.insert);
        writer.write_str(&self.sample);
        writer.write_str(&self.orient);
        writer.write_str(&self.das);
        writer.write_str(&self.experimenter);
        writer.write_str(&self.subtitle);
        writer.write_str(&self.comment1);
        writer.write_str(&self.comment2);
        writer.write_str(&self.comment3);
    }

    fn size(&self) -> u32 {
        let strs = [
            &self.title,
            &self.lab,
            &self.area,
            &self.method,
            &self.apparatus,
            &self.insert,
            &self.sample,
            &self.orient,
            &self.das,
            &self.experimenter,
            &self.subtitle,
            &self.comment1,
            &self.comment2,
            &self.comment3,
        ];
        5 * 4 + strs.iter().map(|s| 2 + s.len() as u32).sum::<u32>()
    }

    fn describe(&self) -> String {
        format!("run {} \"{}\"", self.run_number, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunDesc {
        RunDesc {
            expt_number: 1,
            run_number: 6663,
            time_begin: 1_000_000,
            time_end: 1_000_100,
            elapsed_sec: 100,
            title: "Sample calibration".to_string(),
            lab: "TRIUMF".to_string(),
            area: "M20".to_string(),
            method: "TD-muSR".to_string(),
            apparatus: "HELIOS".to_string(),
            insert: "none".to_string(),
            sample: "Cu".to_string(),
            orient: "c-axis".to_string(),
            das: "TITAN".to_string(),
            experimenter: "J. Doe".to_string(),
            temperature: "300K".to_string(),
            field: "10G".to_string(),
        }
    }

    #[test]
    fn run_desc_roundtrip() {
        let rd = sample();
        let mut w = ByteWriter::new();
        rd.encode(&mut w);
        assert_eq!(w.len(), rd.size() as usize);

        let bytes = w.into_vec();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(RunDesc::decode(&mut r).unwrap(), rd);
    }

    #[test]
    fn tri_ti_run_desc_roundtrip() {
        let rd = TriTiRunDesc {
            expt_number: 1,
            run_number: 42,
            time_begin: 0,
            time_end: 10,
            elapsed_sec: 10,
            title: "t".to_string(),
            lab: "TRIUMF".to_string(),
            area: "M15".to_string(),
            method: "TI-muSR".to_string(),
            apparatus: "OMNI".to_string(),
            insert: "none".to_string(),
            sample: "Ag".to_string(),
            orient: "a-axis".to_string(),
            das: "TITAN".to_string(),
            experimenter: "J. Doe".to_string(),
            subtitle: "run redo".to_string(),
            comment1: "c1".to_string(),
            comment2: "c2".to_string(),
            comment3: "c3".to_string(),
        };
        let mut w = ByteWriter::new();
        rd.encode(&mut w);
        assert_eq!(w.len(), rd.size() as usize);

        let bytes = w.into_vec();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(TriTiRunDesc::decode(&mut r).unwrap(), rd);
    }
}
