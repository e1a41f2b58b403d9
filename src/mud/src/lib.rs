//! `mud` — section-dispatch codec for the MUD (Muon Data) µSR binary
//! container format.
//!
//! A MUD file is a contiguous stream of typed Sections. Each Section
//! carries a small fixed Core header and a type-specific payload; Sections
//! can be organized into Groups, which are themselves Sections whose
//! payload is the ordered list of their member Sections. The whole file is
//! one outer Group.
//!
//! This crate is organized the same way the format is:
//!
//! - [`buffer`] — little-endian primitive codec (component A).
//! - [`core_header`] — the fixed Section Core prefix (component B).
//! - [`ids`] / [`registry`] — the registered `secID` catalogue and the
//!   dispatcher that maps an id to a payload kind (component C).
//! - [`payload`] — the concrete Section payload types (the catalogue).
//! - [`section`] — the tagged `Section`/`SectionData` tree node type tying
//!   the registry and catalogue together.
//! - [`tree`] — parent/child/sibling tree operations (component D).
//! - [`file`] — whole-file read/write orchestration (component E).
//! - [`handle`] / [`friendly`] — the process-wide handle table and the flat
//!   getter/setter API (component F).

mod buffer;
mod core_header;
pub mod error;
mod file;
pub mod friendly;
pub mod handle;
pub mod ids;
pub mod payload;
mod registry;
pub mod section;
pub mod tree;

pub use buffer::{ByteReader, ByteWriter};
pub use core_header::{Core, CORE_SIZE};
pub use error::MudError;
pub use file::{read_file, write_file};
pub use registry::RegisteredKind;
pub use section::{Section, SectionData};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids;
    use crate::payload::RunDesc;

    fn sample_run_desc() -> RunDesc {
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
    fn s1_read_headline_fields() {
        let run_desc = sample_run_desc();
        let run_desc_section = Section {
            core: Core::new(ids::GEN_RUN_DESC_ID, 1),
            data: SectionData::RunDesc(run_desc),
        };
        let mut td_hist_group = Section {
            core: Core::new(ids::GRP_TRI_TD_HIST_ID, 1),
            data: SectionData::Group(Vec::new()),
        };
        for i in 1..=8u32 {
            let header = crate::payload::HistHeader {
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
                title: format!("hist {i}"),
                data: vec![0u8; 32768 * 4],
            };
            tree::add_to_group(
                &mut td_hist_group,
                Section {
                    core: Core::new(ids::GEN_HIST_HDR_ID, i),
                    data: SectionData::HistHeader(header),
                },
            )
            .unwrap();
        }

        let mut outer = Section {
            core: Core::new(ids::FMT_TRI_TD_ID, 1),
            data: SectionData::Group(Vec::new()),
        };
        tree::add_to_group(&mut outer, run_desc_section).unwrap();
        tree::add_to_group(&mut outer, td_hist_group).unwrap();

        assert_eq!(friendly::get_run_number(&outer), Some(6663));
        assert_eq!(
            friendly::get_title(&outer).as_deref(),
            Some("Sample calibration")
        );
    }

    #[test]
    fn s2_modify_and_roundtrip() {
        let mut outer = Section {
            core: Core::new(ids::FMT_GEN_ID, 1),
            data: SectionData::Group(vec![Section {
                core: Core::new(ids::GEN_RUN_DESC_ID, 1),
                data: SectionData::RunDesc(sample_run_desc()),
            }]),
        };
        assert!(friendly::set_title(&mut outer, "New Title").is_ok());

        let bytes = write_file(&outer).unwrap();
        let reopened = read_file(&bytes).unwrap();
        assert_eq!(friendly::get_title(&reopened).as_deref(), Some("New Title"));
        assert_eq!(friendly::get_run_number(&reopened), Some(6663));
    }

    #[test]
    fn s5_unknown_section_preserved() {
        let payload = vec![1u8, 2, 3, 4, 5, 6, 7];
        let outer = Section {
            core: Core::new(ids::FMT_GEN_ID, 1),
            data: SectionData::Group(vec![Section {
                core: Core::new(0x1234_5678, 1),
                data: SectionData::Opaque(payload.clone()),
            }]),
        };

        let bytes = write_file(&outer).unwrap();
        let reopened = read_file(&bytes).unwrap();
        let SectionData::Group(members) = &reopened.data else {
            panic!("expected group");
        };
        match &members[0].data {
            SectionData::Opaque(bytes) => assert_eq!(bytes, &payload),
            other => panic!("expected opaque section, got {other:?}"),
        }
    }
}
