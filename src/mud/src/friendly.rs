//! Component F (part two) — the flat getter/setter API (spec §4.F/§6).
//!
//! Every accessor here is a hard-coded path into the tree (`search` /
//! `find_child`) plus a field copy, matching the "friendly API" contract:
//! getters return `Option`/empty rather than raising, and setters create
//! the target Section on demand when the spec calls the operation an
//! "initializer" (`set_hists`, `set_scalers`, `set_ind_vars`). Naming
//! mirrors the reference accessor names (`getRunNumber`, `setTitle`,
//! `getHistData`, ...) translated to idiomatic `snake_case`.

use crate::error::{MudError, Result};
use crate::ids;
use crate::payload::{Comment, HistHeader, IndVar, RunDesc, Scaler};
use crate::registry::{self, RegisteredKind};
use crate::section::{self, Section, SectionData};
use crate::tree;

fn run_desc_sec_id(root: &Section) -> Option<u32> {
    root.members()?.iter().find_map(|m| {
        matches!(m.core.sec_id, ids::GEN_RUN_DESC_ID | ids::TRI_TI_RUN_DESC_ID)
            .then_some(m.core.sec_id)
    })
}

/// The run number, from whichever run-description Section the root holds.
pub fn get_run_number(root: &Section) -> Option<u32> {
    let sec_id = run_desc_sec_id(root)?;
    let rd = tree::find_child(root, sec_id, 1)?;
    match &rd.data {
        SectionData::RunDesc(v) => Some(v.run_number),
        SectionData::TriTiRunDesc(v) => Some(v.run_number),
        _ => None,
    }
}

/// The run title.
pub fn get_title(root: &Section) -> Option<String> {
    let sec_id = run_desc_sec_id(root)?;
    let rd = tree::find_child(root, sec_id, 1)?;
    match &rd.data {
        SectionData::RunDesc(v) => Some(v.title.clone()),
        SectionData::TriTiRunDesc(v) => Some(v.title.clone()),
        _ => None,
    }
}

/// Overwrite the run title in place. Errors with `NotFound` if the root
/// holds no run-description Section yet — unlike `set_hists` et al., this
/// is not one of the spec's declared initializers.
pub fn set_title(root: &mut Section, title: &str) -> Result<()> {
    let sec_id =
        run_desc_sec_id(root).ok_or_else(|| MudError::NotFound("no run description".to_string()))?;
    let rd = tree::find_child_mut(root, sec_id, 1)
        .ok_or_else(|| MudError::NotFound("no run description".to_string()))?;
    match &mut rd.data {
        SectionData::RunDesc(v) => v.title = title.to_string(),
        SectionData::TriTiRunDesc(v) => v.title = title.to_string(),
        _ => return Err(MudError::NotFound("no run description".to_string())),
    }
    Ok(())
}

/// Overwrite the run number in place. Errors with `NotFound` if the root
/// holds no run-description Section yet.
pub fn set_run_number(root: &mut Section, run_number: u32) -> Result<()> {
    let sec_id =
        run_desc_sec_id(root).ok_or_else(|| MudError::NotFound("no run description".to_string()))?;
    let rd = tree::find_child_mut(root, sec_id, 1)
        .ok_or_else(|| MudError::NotFound("no run description".to_string()))?;
    match &mut rd.data {
        SectionData::RunDesc(v) => v.run_number = run_number,
        SectionData::TriTiRunDesc(v) => v.run_number = run_number,
        _ => return Err(MudError::NotFound("no run description".to_string())),
    }
    Ok(())
}

/// Assign the full `RunDesc` header, creating it if absent (spec §4.F:
/// `setRunDesc` is an initializer).
pub fn set_run_desc(root: &mut Section, run_desc: RunDesc) -> Result<()> {
    if let Some(existing) = tree::find_child_mut(root, ids::GEN_RUN_DESC_ID, 1) {
        existing.data = SectionData::RunDesc(run_desc);
        return Ok(());
    }
    let section = Section {
        core: crate::core_header::Core::new(ids::GEN_RUN_DESC_ID, 1),
        data: SectionData::RunDesc(run_desc),
    };
    tree::add_to_group(root, section)
}

const HIST_GROUP_IDS: [u32; 2] = [ids::GRP_TRI_TD_HIST_ID, ids::GRP_TRI_TI_HIST_ID];

fn find_hist_group(root: &Section) -> Option<&Section> {
    root.members()?
        .iter()
        .find(|m| HIST_GROUP_IDS.contains(&m.core.sec_id))
}

fn find_hist_group_mut(root: &mut Section) -> Option<&mut Section> {
    root.members_mut()?
        .iter_mut()
        .find(|m| HIST_GROUP_IDS.contains(&m.core.sec_id))
}

fn nth_member_of_kind<'a>(
    group: &'a Section,
    kind: RegisteredKind,
    instance_id: u32,
) -> Option<&'a Section> {
    let target = instance_id.max(1);
    let mut seen = 0u32;
    for member in group.members()? {
        if registry::registered_kind(member.core.sec_id) == Some(kind) {
            seen += 1;
            if seen == target {
                return Some(member);
            }
        }
    }
    None
}

fn nth_member_of_kind_mut<'a>(
    group: &'a mut Section,
    kind: RegisteredKind,
    instance_id: u32,
) -> Option<&'a mut Section> {
    let target = instance_id.max(1);
    let mut seen = 0u32;
    for member in group.members_mut()? {
        if registry::registered_kind(member.core.sec_id) == Some(kind) {
            seen += 1;
            if seen == target {
                return Some(member);
            }
        }
    }
    None
}

/// `(group sec_id, member count)` for the file's histogram group, if any
/// (spec §8 S3: "`getHists -> (type=GRP_TRI_TD_HIST_ID, n=8)`").
pub fn get_hists(root: &Section) -> Option<(u32, usize)> {
    let group = find_hist_group(root)?;
    Some((group.core.sec_id, group.members()?.len()))
}

fn hist_header(root: &Section, instance_id: u32) -> Option<&HistHeader> {
    let group = find_hist_group(root)?;
    let section = nth_member_of_kind(group, RegisteredKind::HistHeader, instance_id)?;
    match &section.data {
        SectionData::HistHeader(h) => Some(h),
        _ => None,
    }
}

pub fn get_hist_num_bins(root: &Section, instance_id: u32) -> Option<u32> {
    Some(hist_header(root, instance_id)?.n_bins)
}

pub fn get_hist_title(root: &Section, instance_id: u32) -> Option<String> {
    Some(hist_header(root, instance_id)?.title.clone())
}

/// Unpacked bin counts, always as 32-bit values regardless of the on-wire
/// `bytes_per_bin` (spec §4.F: "`getHistData(out)` unpacks into 32-bit
/// little-endian elements").
pub fn get_hist_data(root: &Section, instance_id: u32) -> Option<Vec<u32>> {
    section::unpack_hist_data(hist_header(root, instance_id)?).ok()
}

/// Repack `data` into the instance's `bytes_per_bin` width and replace its
/// stored bin bytes.
pub fn set_hist_data(root: &mut Section, instance_id: u32, data: &[u32]) -> Result<()> {
    let group = find_hist_group_mut(root)
        .ok_or_else(|| MudError::NotFound("no histogram group".to_string()))?;
    let section = nth_member_of_kind_mut(group, RegisteredKind::HistHeader, instance_id)
        .ok_or_else(|| MudError::NotFound(format!("no histogram #{instance_id}")))?;
    match &mut section.data {
        SectionData::HistHeader(h) => section::pack_hist_data(h, data),
        _ => Err(MudError::NotFound(format!("no histogram #{instance_id}"))),
    }
}

/// The auxiliary `secondsPerBin` sibling, preferred over `fsPerBin * 1e-15`
/// whenever present (spec §6's bin-time invariant).
pub fn get_hist_seconds_per_bin(root: &Section, instance_id: u32) -> Option<f64> {
    if let Some(group) = find_hist_group(root) {
        if let Some(section) =
            nth_member_of_kind(group, RegisteredKind::SecondsPerBin, instance_id)
        {
            if let SectionData::SecondsPerBin(v) = &section.data {
                return Some(v.0);
            }
        }
    }
    let fs_per_bin = hist_header(root, instance_id)?.fs_per_bin;
    Some(f64::from(fs_per_bin) * 1e-15)
}

/// Initializer contract (spec §4.F): replace any existing histogram group
/// with a fresh one of `n` zero-initialized headers of `hist_sec_id`,
/// linked under `group_sec_id`.
pub fn set_hists(root: &mut Section, group_sec_id: u32, hist_sec_id: u32, n: u32) -> Result<()> {
    if let Some(members) = root.members_mut() {
        members.retain(|m| !HIST_GROUP_IDS.contains(&m.core.sec_id));
    } else {
        return Err(MudError::InvalidInput("root is not a Group".to_string()));
    }
    let mut group = Section::new(group_sec_id, 1);
    for i in 1..=n {
        let mut hist = Section::new(hist_sec_id, i);
        hist.core.instance_id = i;
        tree::add_to_group(&mut group, hist)?;
    }
    tree::add_to_group(root, group)
}

const SCALER_GROUP_ID: u32 = ids::GRP_SCALER_ID;

fn find_scaler_group_mut(root: &mut Section) -> Option<&mut Section> {
    root.members_mut()?
        .iter_mut()
        .find(|m| m.core.sec_id == SCALER_GROUP_ID)
}

/// Replace any existing scaler group with a fresh one of `n`
/// zero-initialized `scaler_sec_id` scalers.
pub fn set_scalers(root: &mut Section, scaler_sec_id: u32, n: u32) -> Result<()> {
    if let Some(members) = root.members_mut() {
        members.retain(|m| m.core.sec_id != SCALER_GROUP_ID);
    } else {
        return Err(MudError::InvalidInput("root is not a Group".to_string()));
    }
    let mut group = Section::new(SCALER_GROUP_ID, 1);
    for i in 1..=n {
        let mut scaler = Section::new(scaler_sec_id, i);
        scaler.core.instance_id = i;
        tree::add_to_group(&mut group, scaler)?;
    }
    tree::add_to_group(root, group)
}

pub fn get_scaler(root: &Section, instance_id: u32) -> Option<&Scaler> {
    let group = root.members()?.iter().find(|m| m.core.sec_id == SCALER_GROUP_ID)?;
    let section = nth_member_of_kind(group, RegisteredKind::Scaler, instance_id)?;
    match &section.data {
        SectionData::Scaler(s) => Some(s),
        _ => None,
    }
}

/// Replace any existing independent-variable group with a fresh one of
/// `n` zero-initialized `GEN_IND_VAR_ID` entries.
pub fn set_ind_vars(root: &mut Section, n: u32) -> Result<()> {
    if let Some(members) = root.members_mut() {
        members.retain(|m| m.core.sec_id != ids::GRP_IND_VAR_ID);
    } else {
        return Err(MudError::InvalidInput("root is not a Group".to_string()));
    }
    let mut group = Section::new(ids::GRP_IND_VAR_ID, 1);
    for i in 1..=n {
        let mut var = Section::new(ids::GEN_IND_VAR_ID, i);
        var.core.instance_id = i;
        tree::add_to_group(&mut group, var)?;
    }
    tree::add_to_group(root, group)
}

pub fn get_ind_var(root: &Section, instance_id: u32) -> Option<&IndVar> {
    let group = root.members()?.iter().find(|m| m.core.sec_id == ids::GRP_IND_VAR_ID)?;
    let section = nth_member_of_kind(group, RegisteredKind::IndVar, instance_id)?;
    match &section.data {
        SectionData::IndVar(v) => Some(v),
        _ => None,
    }
}

fn find_comment_group_mut(root: &mut Section) -> Option<&mut Section> {
    root.members_mut()?
        .iter_mut()
        .find(|m| m.core.sec_id == ids::GRP_CMT_ID)
}

pub fn get_comment(root: &Section, instance_id: u32) -> Option<&Comment> {
    let group = root.members()?.iter().find(|m| m.core.sec_id == ids::GRP_CMT_ID)?;
    let section = nth_member_of_kind(group, RegisteredKind::Comment, instance_id)?;
    match &section.data {
        SectionData::Comment(c) => Some(c),
        _ => None,
    }
}

/// Append a new comment to the comment group, creating the group if this
/// is the first one.
pub fn add_comment(root: &mut Section, comment: Comment) -> Result<()> {
    if find_comment_group_mut(root).is_none() {
        let group = Section::new(ids::GRP_CMT_ID, 1);
        tree::add_to_group(root, group)?;
    }
    let group = find_comment_group_mut(root).expect("just ensured it exists");
    let instance_id = group.members().map_or(0, |m| m.len() as u32) + 1;
    let mut section = Section::new(ids::CMT_ID, instance_id);
    section.core.instance_id = instance_id;
    section.data = SectionData::Comment(comment);
    tree::add_to_group(group, section)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_root() -> Section {
        let mut root = Section::new(ids::FMT_TRI_TD_ID, 1);
        set_run_desc(
            &mut root,
            RunDesc {
                run_number: 6663,
                title: "Sample calibration".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        root
    }

    #[test]
    fn s1_read_headline_fields() {
        let root = sample_root();
        assert_eq!(get_run_number(&root), Some(6663));
        assert_eq!(get_title(&root).as_deref(), Some("Sample calibration"));
    }

    #[test]
    fn s2_set_title() {
        let mut root = sample_root();
        set_title(&mut root, "New Title").unwrap();
        assert_eq!(get_title(&root).as_deref(), Some("New Title"));
        assert_eq!(get_run_number(&root), Some(6663));
    }

    #[test]
    fn set_run_number_updates_in_place() {
        let mut root = sample_root();
        set_run_number(&mut root, 7000).unwrap();
        assert_eq!(get_run_number(&root), Some(7000));
        assert_eq!(get_title(&root).as_deref(), Some("Sample calibration"));
    }

    #[test]
    fn s3_histogram_locate() {
        let mut root = sample_root();
        set_hists(&mut root, ids::GRP_TRI_TD_HIST_ID, ids::GEN_HIST_HDR_ID, 8).unwrap();
        for i in 1..=8u32 {
            let mut data = vec![0u32; 32768];
            data[0] = i;
            set_hist_data(&mut root, i, &data).unwrap();
        }

        assert_eq!(get_hists(&root), Some((ids::GRP_TRI_TD_HIST_ID, 8)));
        assert_eq!(get_hist_data(&root, 3).unwrap().len(), 32768);
        assert_eq!(get_hist_data(&root, 3).unwrap()[0], 3);
    }

    #[test]
    fn set_hist_data_updates_num_bins() {
        let mut root = sample_root();
        set_hists(&mut root, ids::GRP_TRI_TD_HIST_ID, ids::GEN_HIST_HDR_ID, 1).unwrap();
        set_hist_data(&mut root, 1, &[1, 2, 3]).unwrap();
        assert_eq!(get_hist_num_bins(&root, 1), Some(3));
    }

    #[test]
    fn scaler_initializer_and_accessor() {
        let mut root = sample_root();
        set_scalers(&mut root, ids::GEN_SCALER_ID, 2).unwrap();
        assert!(get_scaler(&root, 1).is_some());
        assert!(get_scaler(&root, 2).is_some());
        assert!(get_scaler(&root, 3).is_none());
    }

    #[test]
    fn ind_var_initializer_and_accessor() {
        let mut root = sample_root();
        set_ind_vars(&mut root, 1).unwrap();
        assert!(get_ind_var(&root, 1).is_some());
    }

    #[test]
    fn comments_append_and_index() {
        let mut root = sample_root();
        add_comment(
            &mut root,
            Comment {
                author: "J. Doe".to_string(),
                title: "first".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        add_comment(
            &mut root,
            Comment {
                author: "J. Doe".to_string(),
                title: "second".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(get_comment(&root, 1).unwrap().title, "first");
        assert_eq!(get_comment(&root, 2).unwrap().title, "second");
    }

    #[test]
    fn seconds_per_bin_falls_back_to_fs_per_bin() {
        let mut root = sample_root();
        set_hists(&mut root, ids::GRP_TRI_TD_HIST_ID, ids::GEN_HIST_HDR_ID, 1).unwrap();
        if let Some(group) = find_hist_group_mut(&mut root) {
            if let SectionData::HistHeader(h) =
                &mut nth_member_of_kind_mut(group, RegisteredKind::HistHeader, 1)
                    .unwrap()
                    .data
            {
                h.fs_per_bin = 781_250_000;
            }
        }
        assert_eq!(get_hist_seconds_per_bin(&root, 1), Some(781_250_000.0 * 1e-15));
    }
}
