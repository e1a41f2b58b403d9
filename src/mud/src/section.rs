//! The tagged `Section`/`SectionData` tree node (spec's core/payload pair),
//! tying the registry (`registry.rs`) to the catalogue (`payload/`).
//!
//! This replaces the source's function-pointer-per-`secID` `Ops` table
//! (spec §9's redesign note) with a tagged enum and a `match`: the registry
//! only needs to say *which* arm a `secID` decodes to, and every op
//! (`decode`/`encode`/`size`) is then a single match over `SectionData`.
//! Modeled on `metadata/tables.rs`'s `Table` enum and `Table::read`
//! dispatch.

use crate::buffer::{ByteReader, ByteWriter};
use crate::core_header::Core;
use crate::error::{MudError, Result};
use crate::payload::{
    packing, Comment, HistHeader, IndVar, IndVarArray, RunDesc, Scaler, SecondsPerBin,
    SectionPayload, TriTiRunDesc,
};
use crate::registry::{self, RegisteredKind};

/// A Section's payload, tagged by the kind the registry resolved for its
/// Core's `sec_id`. `Group` and `Opaque` are not catalogue types — `Group`
/// is the generic container every `FMT_*`/`GRP_*` id shares, and `Opaque`
/// is what an unregistered `secID` decodes to (spec §4.C: "unknown IDs ...
/// preserved verbatim").
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    Group(Vec<Section>),
    RunDesc(RunDesc),
    TriTiRunDesc(TriTiRunDesc),
    HistHeader(HistHeader),
    Scaler(Scaler),
    IndVar(IndVar),
    IndVarArray(IndVarArray),
    Comment(Comment),
    SecondsPerBin(SecondsPerBin),
    Opaque(Vec<u8>),
}

impl std::fmt::Display for SectionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionData::Group(members) => write!(f, "Group({} members)", members.len()),
            SectionData::RunDesc(v) => write!(f, "RunDesc({})", v.describe()),
            SectionData::TriTiRunDesc(v) => write!(f, "TriTiRunDesc({})", v.describe()),
            SectionData::HistHeader(v) => write!(f, "HistHeader({})", v.describe()),
            SectionData::Scaler(v) => write!(f, "Scaler({})", v.describe()),
            SectionData::IndVar(v) => write!(f, "IndVar({})", v.describe()),
            SectionData::IndVarArray(v) => write!(f, "IndVarArray({})", v.describe()),
            SectionData::Comment(v) => write!(f, "Comment({})", v.describe()),
            SectionData::SecondsPerBin(v) => write!(f, "SecondsPerBin({})", v.describe()),
            SectionData::Opaque(bytes) => write!(f, "Opaque({} bytes)", bytes.len()),
        }
    }
}

/// A Core plus its dispatched payload — one node of the file tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub core: Core,
    pub data: SectionData,
}

impl Section {
    /// Allocate a zero/empty-initialized Section of the registered kind for
    /// `sec_id`, or an empty opaque Section if `sec_id` is unregistered.
    /// Mirrors the registry factory in spec §4.C.
    pub fn new(sec_id: u32, instance_id: u32) -> Section {
        let data = match registry::registered_kind(sec_id) {
            Some(RegisteredKind::Group) => SectionData::Group(Vec::new()),
            Some(RegisteredKind::RunDesc) => SectionData::RunDesc(RunDesc::default()),
            Some(RegisteredKind::TriTiRunDesc) => {
                SectionData::TriTiRunDesc(TriTiRunDesc::default())
            }
            Some(RegisteredKind::HistHeader) => SectionData::HistHeader(HistHeader::default()),
            Some(RegisteredKind::Scaler) => SectionData::Scaler(Scaler::default()),
            Some(RegisteredKind::IndVar) => SectionData::IndVar(IndVar::default()),
            Some(RegisteredKind::IndVarArray) => {
                SectionData::IndVarArray(IndVarArray::default())
            }
            Some(RegisteredKind::Comment) => SectionData::Comment(Comment::default()),
            Some(RegisteredKind::SecondsPerBin) => {
                SectionData::SecondsPerBin(SecondsPerBin::default())
            }
            None => SectionData::Opaque(Vec::new()),
        };
        Section {
            core: Core::new(sec_id, instance_id),
            data,
        }
    }

    /// Decode a Section's Core and payload from `reader`, dispatching on
    /// the Core's `sec_id`. `reader` must be positioned at the start of
    /// this Section's Core.
    pub fn decode(reader: &mut ByteReader) -> Result<Section> {
        let core = Core::decode(reader)?;
        let data = Self::decode_payload(reader, &core)?;
        Ok(Section { core, data })
    }

    /// Decode just the payload for an already-decoded `core`, dispatching
    /// on `core.sec_id`. Exposed to `file.rs`, which decodes the outer
    /// Core itself to validate it before trusting the rest of the stream.
    pub(crate) fn decode_payload(reader: &mut ByteReader, core: &Core) -> Result<SectionData> {
        match registry::registered_kind(core.sec_id) {
            Some(RegisteredKind::Group) => Ok(SectionData::Group(decode_group(reader, core)?)),
            Some(RegisteredKind::RunDesc) => Ok(SectionData::RunDesc(RunDesc::decode(reader)?)),
            Some(RegisteredKind::TriTiRunDesc) => {
                Ok(SectionData::TriTiRunDesc(TriTiRunDesc::decode(reader)?))
            }
            Some(RegisteredKind::HistHeader) => {
                Ok(SectionData::HistHeader(HistHeader::decode(reader)?))
            }
            Some(RegisteredKind::Scaler) => Ok(SectionData::Scaler(Scaler::decode(reader)?)),
            Some(RegisteredKind::IndVar) => Ok(SectionData::IndVar(IndVar::decode(reader)?)),
            Some(RegisteredKind::IndVarArray) => {
                Ok(SectionData::IndVarArray(IndVarArray::decode(reader)?))
            }
            Some(RegisteredKind::Comment) => Ok(SectionData::Comment(Comment::decode(reader)?)),
            Some(RegisteredKind::SecondsPerBin) => {
                Ok(SectionData::SecondsPerBin(SecondsPerBin::decode(reader)?))
            }
            None => {
                log::debug!(
                    "decode: sec_id 0x{:08x} is not registered, preserving as opaque",
                    core.sec_id
                );
                Ok(SectionData::Opaque(reader.read_raw(core.size as usize)?.to_vec()))
            }
        }
    }

    /// Emit this Section's Core and payload. `self.core.size`/`next_offset`
    /// must already reflect the sizing/offset passes (see `file.rs`).
    pub fn encode(&self, writer: &mut ByteWriter) {
        self.core.encode(writer);
        match &self.data {
            SectionData::Group(members) => {
                writer.write_u32(members.len() as u32);
                for child in members {
                    child.encode(writer);
                }
            }
            SectionData::RunDesc(v) => v.encode(writer),
            SectionData::TriTiRunDesc(v) => v.encode(writer),
            SectionData::HistHeader(v) => v.encode(writer),
            SectionData::Scaler(v) => v.encode(writer),
            SectionData::IndVar(v) => v.encode(writer),
            SectionData::IndVarArray(v) => v.encode(writer),
            SectionData::Comment(v) => v.encode(writer),
            SectionData::SecondsPerBin(v) => v.encode(writer),
            SectionData::Opaque(bytes) => writer.write_raw(bytes),
        }
    }

    /// Payload byte count if encoded right now (spec's `size` op); does not
    /// include this Section's own Core.
    pub fn size(&self) -> u32 {
        match &self.data {
            SectionData::Group(members) => {
                4 + members
                    .iter()
                    .map(|c| crate::core_header::CORE_SIZE + c.size())
                    .sum::<u32>()
            }
            SectionData::RunDesc(v) => v.size(),
            SectionData::TriTiRunDesc(v) => v.size(),
            SectionData::HistHeader(v) => v.size(),
            SectionData::Scaler(v) => v.size(),
            SectionData::IndVar(v) => v.size(),
            SectionData::IndVarArray(v) => v.size(),
            SectionData::Comment(v) => v.size(),
            SectionData::SecondsPerBin(v) => v.size(),
            SectionData::Opaque(bytes) => bytes.len() as u32,
        }
    }

    /// True for a Group Section (spec §4.C: group ids share one Ops).
    pub fn is_group(&self) -> bool {
        matches!(self.data, SectionData::Group(_))
    }

    /// Direct children, if this Section is a Group.
    pub fn members(&self) -> Option<&[Section]> {
        match &self.data {
            SectionData::Group(members) => Some(members),
            _ => None,
        }
    }

    /// Mutable direct children, if this Section is a Group.
    pub fn members_mut(&mut self) -> Option<&mut Vec<Section>> {
        match &mut self.data {
            SectionData::Group(members) => Some(members),
            _ => None,
        }
    }

    /// Human-readable dump (spec's optional `show` op). Format is not part
    /// of the wire contract.
    pub fn show(&self) -> String {
        format!(
            "Section{{sec_id=0x{:08x}, instance_id={}, {}}}",
            self.core.sec_id, self.core.instance_id, self.data
        )
    }
}

fn decode_group(reader: &mut ByteReader, group_core: &Core) -> Result<Vec<Section>> {
    let num_members = reader.read_u32()?;
    // Each member is at least a bare Core, so a declared count that could
    // not possibly fit in what's left of the stream is corrupt — reject it
    // before reserving `num_members` capacity, since `num_members` comes
    // straight off the wire and an attacker-chosen 0xFFFFFFFF would
    // otherwise drive an ~4 GiB allocation attempt.
    if u64::from(num_members) * u64::from(crate::core_header::CORE_SIZE) > reader.remaining() as u64
    {
        return Err(MudError::CorruptSection(format!(
            "group 0x{:08x} declares {num_members} members, more than the remaining bytes could hold",
            group_core.sec_id
        )));
    }
    let mut members = Vec::with_capacity(num_members as usize);
    for _ in 0..num_members {
        let start = reader.position();
        let child = Section::decode(reader)?;
        let consumed = reader.position() - start;
        let declared = crate::core_header::CORE_SIZE as u64 + child.core.size as u64;
        if child.core.next_offset != 0 && u64::from(child.core.next_offset) != declared {
            log::warn!(
                "decode_group: child 0x{:08x} of group 0x{:08x} has inconsistent next_offset",
                child.core.sec_id,
                group_core.sec_id
            );
            return Err(MudError::CorruptSection(format!(
                "child of group 0x{:08x} declares next_offset {} inconsistent with core+size {}",
                group_core.sec_id, child.core.next_offset, declared
            )));
        }
        if consumed > declared {
            return Err(MudError::CorruptSection(format!(
                "child of group 0x{:08x} overran its declared size",
                group_core.sec_id
            )));
        }
        members.push(child);
    }
    Ok(members)
}

/// Pack a histogram's raw wire bytes into 32-bit bins, honoring
/// `bytes_per_bin` (0 = variable-width scheme).
pub fn unpack_hist_data(h: &HistHeader) -> Result<Vec<u32>> {
    if h.bytes_per_bin == 0 {
        packing::unpack_variable(&h.data)
    } else {
        let width = u8::try_from(h.bytes_per_bin)
            .map_err(|_| MudError::InvalidInput(format!("bad bytesPerBin {}", h.bytes_per_bin)))?;
        packing::unpack_fixed(&h.data, width, h.n_bins)
    }
}

/// The inverse of [`unpack_hist_data`]: repack `bins` as `h.bytes_per_bin`
/// dictates and return the wire bytes (also updating `n_bytes`/`n_bins`).
pub fn pack_hist_data(h: &mut HistHeader, bins: &[u32]) -> Result<()> {
    let packed = if h.bytes_per_bin == 0 {
        packing::pack_variable(bins)
    } else {
        let width = u8::try_from(h.bytes_per_bin)
            .map_err(|_| MudError::InvalidInput(format!("bad bytesPerBin {}", h.bytes_per_bin)))?;
        packing::pack_fixed(bins, width)?
    };
    h.n_bins = bins.len() as u32;
    h.n_bytes = packed.len() as u32;
    h.data = packed;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids;

    #[test]
    fn new_group_is_empty_group() {
        let s = Section::new(ids::GRP_GEN_ID, 1);
        assert!(s.is_group());
        assert_eq!(s.members().unwrap().len(), 0);
    }

    #[test]
    fn new_unregistered_id_is_opaque() {
        let s = Section::new(0xDEAD_BEEF, 1);
        assert!(matches!(s.data, SectionData::Opaque(ref b) if b.is_empty()));
    }

    #[test]
    fn group_size_matches_testable_property_4() {
        let child = Section::new(ids::GEN_RUN_DESC_ID, 1);
        let child_size = child.size();
        let group = Section {
            core: Core::new(ids::GRP_GEN_ID, 1),
            data: SectionData::Group(vec![child]),
        };
        assert_eq!(
            group.size(),
            4 + crate::core_header::CORE_SIZE + child_size
        );
    }

    #[test]
    fn pack_unpack_hist_data_roundtrip() {
        let mut h = HistHeader {
            bytes_per_bin: 0,
            title: "t".to_string(),
            ..Default::default()
        };
        let bins = vec![0u32, 1, 255, 256, 65535, 65536, 0xFFFF_FFFF];
        pack_hist_data(&mut h, &bins).unwrap();
        assert_eq!(unpack_hist_data(&h).unwrap(), bins);
    }
}
