//! Component E — whole-file read/write orchestration.
//!
//! Write is a three-pass process (spec §4.E): a sizing pass computes every
//! Section's payload size bottom-up, an offset pass derives each
//! `next_offset` from sibling sizes, and an emit pass walks the tree
//! depth-first writing bytes. Two passes cannot be collapsed into one
//! because a Group's size depends on the sizes of all its children, which
//! are not yet known when the Group's own Core would need to be written.

use crate::buffer::{ByteReader, ByteWriter};
use crate::core_header::{Core, CORE_SIZE};
use crate::error::{MudError, Result};
use crate::ids;
use crate::section::Section;

/// Decode a complete MUD file from `bytes` into its root (outer Group)
/// Section.
///
/// Fails if the stream is shorter than the outer Core, if the outer
/// `sec_id` is not one of the registered file-format ids, or if decoding
/// any Section errors (spec §4.E's failure list).
pub fn read_file(bytes: &[u8]) -> Result<Section> {
    if bytes.len() < CORE_SIZE as usize {
        log::warn!("read_file: {} byte stream is shorter than a Core", bytes.len());
        return Err(MudError::InvalidFile(format!(
            "stream of {} bytes is shorter than a Core ({CORE_SIZE} bytes)",
            bytes.len()
        )));
    }

    let mut reader = ByteReader::new(bytes);
    let core = Core::decode(&mut reader)?;
    if !is_file_format_id(core.sec_id) {
        log::warn!("read_file: unrecognized outer sec_id 0x{:08x}", core.sec_id);
        return Err(MudError::InvalidFile(format!(
            "outer sec_id 0x{:08x} is not a registered file-format id",
            core.sec_id
        )));
    }
    if reader.remaining() < core.size as usize {
        return Err(MudError::InvalidFile(format!(
            "outer Core declares {} payload bytes but only {} remain",
            core.size,
            reader.remaining()
        )));
    }

    let data = Section::decode_payload(&mut reader, &core)?;
    Ok(Section { core, data })
}

fn is_file_format_id(sec_id: u32) -> bool {
    matches!(sec_id, ids::FMT_GEN_ID | ids::FMT_TRI_TD_ID | ids::FMT_TRI_TI_ID)
}

/// Recompute every Section's `size`, then every `next_offset`, then emit
/// the whole tree to a byte vector.
pub fn write_file(root: &Section) -> Result<Vec<u8>> {
    if !is_file_format_id(root.core.sec_id) {
        return Err(MudError::InvalidInput(format!(
            "root sec_id 0x{:08x} is not a registered file-format id",
            root.core.sec_id
        )));
    }
    let mut root = root.clone();
    layout(&mut root);
    let mut writer = ByteWriter::new();
    root.encode(&mut writer);
    Ok(writer.into_vec())
}

/// Recursively compute `size` (post-order, since a Group depends on its
/// children) and, within each Group, `next_offset` for every member.
fn layout(section: &mut Section) {
    if let Some(members) = section.members_mut() {
        for child in members.iter_mut() {
            layout(child);
        }
        let last = members.len().saturating_sub(1);
        for (i, child) in members.iter_mut().enumerate() {
            child.core.size = child.size();
            child.core.next_offset = if i == last { 0 } else { CORE_SIZE + child.core.size };
        }
    }
    section.core.size = section.size();
}
