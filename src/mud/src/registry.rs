//! Component C — the type registry and dispatcher.
//!
//! spec.md describes this as a process-wide, initialize-once mapping
//! `secID -> Ops`. Since each `Ops` entry is fixed at compile time (there is
//! no runtime registration step — every catalogue type is known statically)
//! the mapping degenerates to a pure function, matching the REDESIGN FLAGS
//! guidance to replace C-style function-pointer-per-ID dispatch with a
//! tagged variant and a `match`. See `section.rs` for where `RegisteredKind`
//! is used to actually decode/encode/size a payload.

use crate::ids;

/// Which payload kind a `secID` decodes to. `Group` covers every
/// `FMT_*`/`GRP_*` id (spec.md §4.C: "Group section IDs are registered with
/// a generic Group Ops").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisteredKind {
    Group,
    RunDesc,
    TriTiRunDesc,
    HistHeader,
    Scaler,
    IndVar,
    IndVarArray,
    Comment,
    SecondsPerBin,
}

/// Look up the registered kind for a `secID`, or `None` if it is not in the
/// registry — unregistered ids are preserved as opaque blobs by the caller
/// (`section::Section::decode`), not rejected here.
pub fn registered_kind(sec_id: u32) -> Option<RegisteredKind> {
    if ids::is_group_id(sec_id) {
        return Some(RegisteredKind::Group);
    }

    Some(match sec_id {
        ids::GEN_RUN_DESC_ID => RegisteredKind::RunDesc,
        ids::TRI_TI_RUN_DESC_ID => RegisteredKind::TriTiRunDesc,
        ids::GEN_HIST_HDR_ID | ids::TRI_TD_HIST_ID | ids::TRI_TI_HIST_ID => {
            RegisteredKind::HistHeader
        }
        ids::GEN_SCALER_ID | ids::TRI_TD_SCALER_ID => RegisteredKind::Scaler,
        ids::GEN_IND_VAR_ID => RegisteredKind::IndVar,
        ids::GEN_IND_VAR_ARR_ID => RegisteredKind::IndVarArray,
        ids::CMT_ID => RegisteredKind::Comment,
        ids::HIST_SECONDS_PER_BIN_ID => RegisteredKind::SecondsPerBin,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_id_is_none() {
        assert_eq!(registered_kind(0xDEAD_BEEF), None);
    }

    #[test]
    fn group_ids_dispatch_to_group() {
        for id in [
            ids::FMT_GEN_ID,
            ids::FMT_TRI_TD_ID,
            ids::FMT_TRI_TI_ID,
            ids::GRP_TRI_TD_HIST_ID,
        ] {
            assert_eq!(registered_kind(id), Some(RegisteredKind::Group));
        }
    }

    #[test]
    fn histogram_ids_share_one_kind() {
        assert_eq!(
            registered_kind(ids::GEN_HIST_HDR_ID),
            registered_kind(ids::TRI_TD_HIST_ID)
        );
        assert_eq!(
            registered_kind(ids::TRI_TD_HIST_ID),
            registered_kind(ids::TRI_TI_HIST_ID)
        );
    }
}
