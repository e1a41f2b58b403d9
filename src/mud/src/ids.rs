//! The registered `secID` catalogue (component C's constant table).
//!
//! Values follow the canonical subset spec.md §6 documents. They are
//! arbitrary but stable 32-bit identifiers — this implementation does not
//! need them to match any external reference file bit-for-bit (there is no
//! golden file in this retrieval pack), only to be internally consistent
//! and distinct, which the following assignment is.

/// Outer file-format group ids. `read_file` requires the outer Core's
/// `sec_id` to be one of these three.
pub const FMT_GEN_ID: u32 = 0x0001_0000;
pub const FMT_TRI_TD_ID: u32 = 0x0001_0001;
pub const FMT_TRI_TI_ID: u32 = 0x0001_0002;

/// Inner group ids — generic group, and the per-catalogue groups.
pub const GRP_GEN_ID: u32 = 0x0002_0000;
pub const GRP_TRI_TD_HIST_ID: u32 = 0x0002_0001;
pub const GRP_TRI_TI_HIST_ID: u32 = 0x0002_0002;
pub const GRP_SCALER_ID: u32 = 0x0002_0003;
pub const GRP_IND_VAR_ID: u32 = 0x0002_0004;
pub const GRP_IND_VAR_ARR_ID: u32 = 0x0002_0005;
pub const GRP_CMT_ID: u32 = 0x0002_0006;

pub const GEN_RUN_DESC_ID: u32 = 0x0003_0000;
pub const TRI_TI_RUN_DESC_ID: u32 = 0x0003_0001;

pub const GEN_HIST_HDR_ID: u32 = 0x0004_0000;
pub const TRI_TD_HIST_ID: u32 = 0x0004_0001;
pub const TRI_TI_HIST_ID: u32 = 0x0004_0002;

pub const GEN_SCALER_ID: u32 = 0x0005_0000;
pub const TRI_TD_SCALER_ID: u32 = 0x0005_0001;

pub const GEN_IND_VAR_ID: u32 = 0x0006_0000;
pub const GEN_IND_VAR_ARR_ID: u32 = 0x0006_0001;

pub const CMT_ID: u32 = 0x0007_0000;

/// Auxiliary Section attached next to a histogram header when `fsPerBin`
/// cannot represent the bin interval exactly (spec.md §6's "bin-time
/// invariant"). Not named in spec.md's table directly — added by
/// SPEC_FULL.md §4.C since the invariant it implements requires a
/// registered carrier.
pub const HIST_SECONDS_PER_BIN_ID: u32 = 0x0004_00FF;

/// True for every id that `registry::registered_kind` maps to
/// `RegisteredKind::Group`.
pub fn is_group_id(sec_id: u32) -> bool {
    matches!(
        sec_id,
        FMT_GEN_ID
            | FMT_TRI_TD_ID
            | FMT_TRI_TI_ID
            | GRP_GEN_ID
            | GRP_TRI_TD_HIST_ID
            | GRP_TRI_TI_HIST_ID
            | GRP_SCALER_ID
            | GRP_IND_VAR_ID
            | GRP_IND_VAR_ARR_ID
            | GRP_CMT_ID
    )
}
