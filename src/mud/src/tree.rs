//! Component D — parent/child/sibling tree operations.
//!
//! Rust's ownership already gives us the spec's lifecycle guarantees
//! (`free`, `free_tree`) for free: a `Section` owns its `SectionData`,
//! a `Group` owns its `Vec<Section>` of members, and dropping a root
//! recursively drops everything under it. So this module only implements
//! the mutating/searching operations that have no ownership equivalent.

use crate::error::{MudError, Result};
use crate::section::Section;

/// Append `child` at the end of `parent`'s members. Errors if `parent` is
/// not a Group.
pub fn add_to_group(parent: &mut Section, child: Section) -> Result<()> {
    parent
        .members_mut()
        .ok_or_else(|| MudError::InvalidInput("add_to_group: parent is not a Group".to_string()))?
        .push(child);
    Ok(())
}

/// Detach and return the `instance_id`-th (1-based) child of `parent`
/// whose `sec_id` matches. Errors if `parent` is not a Group or no such
/// child exists.
pub fn remove_from_group(parent: &mut Section, sec_id: u32, instance_id: u32) -> Result<Section> {
    let members = parent.members_mut().ok_or_else(|| {
        MudError::InvalidInput("remove_from_group: parent is not a Group".to_string())
    })?;
    let index = locate(members, sec_id, instance_id).ok_or_else(|| {
        MudError::NotFound(format!(
            "no child with sec_id 0x{sec_id:08x} instance {instance_id}"
        ))
    })?;
    Ok(members.remove(index))
}

/// Return the `instance_id`-th (1-based) direct child of `parent` whose
/// `sec_id` matches, searched in insertion order. `None` if `parent` is
/// not a Group or no such child exists.
pub fn find_child(parent: &Section, sec_id: u32, instance_id: u32) -> Option<&Section> {
    let members = parent.members()?;
    let index = locate(members, sec_id, instance_id)?;
    Some(&members[index])
}

/// Mutable counterpart of [`find_child`].
pub fn find_child_mut(parent: &mut Section, sec_id: u32, instance_id: u32) -> Option<&mut Section> {
    let members = parent.members_mut()?;
    let index = locate(members, sec_id, instance_id)?;
    Some(&mut members[index])
}

fn locate(members: &[Section], sec_id: u32, instance_id: u32) -> Option<usize> {
    let target = instance_id.max(1);
    let mut seen = 0u32;
    for (i, member) in members.iter().enumerate() {
        if member.core.sec_id == sec_id {
            seen += 1;
            if seen == target {
                return Some(i);
            }
        }
    }
    None
}

/// One step of a `search` path: the `secID` to match and the `instanceID`
/// to select, or `0` to descend into the matched Group without selecting a
/// specific sibling (spec §4.D).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub sec_id: u32,
    pub instance_id: u32,
}

impl From<(u32, u32)> for PathStep {
    fn from((sec_id, instance_id): (u32, u32)) -> Self {
        PathStep { sec_id, instance_id }
    }
}

/// Depth-first, chained `find_child` across `path`. `instance_id == 0`
/// means "there is exactly one Group of this `secID` directly under the
/// current node; descend into it without selecting a sibling" — used when
/// the grandchild step is the one that actually disambiguates.
pub fn search<'a>(root: &'a Section, path: &[PathStep]) -> Option<&'a Section> {
    let mut current = root;
    for step in path {
        let instance = if step.instance_id == 0 { 1 } else { step.instance_id };
        current = find_child(current, step.sec_id, instance)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids;

    fn group(sec_id: u32) -> Section {
        Section::new(sec_id, 1)
    }

    #[test]
    fn add_and_find_child() {
        let mut parent = group(ids::GRP_GEN_ID);
        add_to_group(&mut parent, Section::new(ids::GEN_RUN_DESC_ID, 1)).unwrap();
        assert!(find_child(&parent, ids::GEN_RUN_DESC_ID, 1).is_some());
        assert!(find_child(&parent, ids::GEN_RUN_DESC_ID, 2).is_none());
    }

    #[test]
    fn instance_id_selects_nth_occurrence_in_insertion_order() {
        let mut parent = group(ids::GRP_TRI_TD_HIST_ID);
        for i in 1..=3u32 {
            let mut hist = Section::new(ids::GEN_HIST_HDR_ID, i);
            hist.core.instance_id = i;
            add_to_group(&mut parent, hist).unwrap();
        }
        let third = find_child(&parent, ids::GEN_HIST_HDR_ID, 3).unwrap();
        assert_eq!(third.core.instance_id, 3);
    }

    #[test]
    fn add_to_group_on_non_group_errors() {
        let mut leaf = Section::new(ids::GEN_RUN_DESC_ID, 1);
        let err = add_to_group(&mut leaf, Section::new(ids::CMT_ID, 1)).unwrap_err();
        assert!(matches!(err, MudError::InvalidInput(_)));
    }

    #[test]
    fn remove_from_group_detaches_child() {
        let mut parent = group(ids::GRP_GEN_ID);
        add_to_group(&mut parent, Section::new(ids::GEN_RUN_DESC_ID, 1)).unwrap();
        let removed = remove_from_group(&mut parent, ids::GEN_RUN_DESC_ID, 1).unwrap();
        assert_eq!(removed.core.sec_id, ids::GEN_RUN_DESC_ID);
        assert!(find_child(&parent, ids::GEN_RUN_DESC_ID, 1).is_none());
    }

    #[test]
    fn s4_search_path() {
        let mut hist_group = group(ids::GRP_TRI_TD_HIST_ID);
        for i in 1..=8u32 {
            let mut hist = Section::new(ids::GEN_HIST_HDR_ID, i);
            hist.core.instance_id = i;
            if let crate::section::SectionData::HistHeader(h) = &mut hist.data {
                h.n_bins = 32768;
            }
            add_to_group(&mut hist_group, hist).unwrap();
        }
        let mut outer = group(ids::FMT_TRI_TD_ID);
        add_to_group(&mut outer, hist_group).unwrap();

        let path = [
            PathStep::from((ids::GRP_TRI_TD_HIST_ID, 0)),
            PathStep::from((ids::GEN_HIST_HDR_ID, 3)),
        ];
        let found = search(&outer, &path).unwrap();
        assert_eq!(found.core.instance_id, 3);
    }
}
