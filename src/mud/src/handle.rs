//! Component F (part one) — the process-wide handle table.
//!
//! spec §4.F/§5 describes a single table shared by every open file,
//! guarded for multi-threaded use by a mutex the implementer adds; this
//! mirrors `metadata::image::PeImage`'s role as the thing friendly
//! accessors (`friendly.rs`) read through, generalized to a table of many
//! open trees rather than one.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::error::{MudError, Result};
use crate::file;
use crate::section::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
    ReadWrite,
}

pub struct OpenFile {
    pub root: Section,
    pub mode: Mode,
    pub path: PathBuf,
    pub readonly: bool,
}

fn table() -> &'static Mutex<HashMap<i32, OpenFile>> {
    static TABLE: OnceLock<Mutex<HashMap<i32, OpenFile>>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn lowest_free_handle(map: &HashMap<i32, OpenFile>) -> i32 {
    let mut handle = 0;
    while map.contains_key(&handle) {
        handle += 1;
    }
    handle
}

/// Open an existing file for reading. Returns `-1` on failure (spec §7:
/// "open operations return -1 on failure and do not allocate a handle").
pub fn open_read(path: impl AsRef<Path>) -> i32 {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("open_read: could not read {}: {e}", path.display());
            return -1;
        }
    };
    let root = match file::read_file(&bytes) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("open_read: {} did not parse as a MUD file: {e}", path.display());
            return -1;
        }
    };
    let mut map = table().lock().expect("handle table mutex poisoned");
    let handle = lowest_free_handle(&map);
    map.insert(
        handle,
        OpenFile {
            root,
            mode: Mode::Read,
            path: path.to_path_buf(),
            readonly: true,
        },
    );
    handle
}

/// Open an existing file for reading and modification.
pub fn open_read_write(path: impl AsRef<Path>) -> i32 {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(_) => return -1,
    };
    let root = match file::read_file(&bytes) {
        Ok(r) => r,
        Err(_) => return -1,
    };
    let mut map = table().lock().expect("handle table mutex poisoned");
    let handle = lowest_free_handle(&map);
    map.insert(
        handle,
        OpenFile {
            root,
            mode: Mode::ReadWrite,
            path: path.to_path_buf(),
            readonly: false,
        },
    );
    handle
}

/// Start a brand-new file of the given file-format id, to be written at
/// `path` on close.
pub fn open_write(path: impl AsRef<Path>, format_id: u32) -> i32 {
    let root = Section::new(format_id, 1);
    let mut map = table().lock().expect("handle table mutex poisoned");
    let handle = lowest_free_handle(&map);
    map.insert(
        handle,
        OpenFile {
            root,
            mode: Mode::Write,
            path: path.as_ref().to_path_buf(),
            readonly: false,
        },
    );
    handle
}

/// Run `f` against the root Section of `handle`, if open.
pub fn with_root<T>(handle: i32, f: impl FnOnce(&Section) -> T) -> Option<T> {
    let map = table().lock().expect("handle table mutex poisoned");
    map.get(&handle).map(|open| f(&open.root))
}

/// Run `f` against the mutable root Section of `handle`, if open and not
/// opened read-only.
pub fn with_root_mut<T>(handle: i32, f: impl FnOnce(&mut Section) -> T) -> Option<T> {
    let mut map = table().lock().expect("handle table mutex poisoned");
    let open = map.get_mut(&handle)?;
    if open.readonly {
        return None;
    }
    Some(f(&mut open.root))
}

/// Discard a read handle without writing (spec §4.E: `closeRead`).
pub fn close_read(handle: i32) {
    table().lock().expect("handle table mutex poisoned").remove(&handle);
}

/// Write the handle's tree back to the path it was opened against, then
/// release the handle. Returns `false` on failure, leaving the handle open
/// so the caller can still `close_read` it (spec §7).
pub fn close_write(handle: i32) -> bool {
    let path = match table().lock().expect("handle table mutex poisoned").get(&handle) {
        Some(open) => open.path.clone(),
        None => return false,
    };
    close_write_file(handle, path).is_ok()
}

/// Write the handle's tree to `path` (which may differ from the path it
/// was opened against), then release the handle.
pub fn close_write_file(handle: i32, path: impl AsRef<Path>) -> Result<()> {
    let mut map = table().lock().expect("handle table mutex poisoned");
    let open = map
        .get(&handle)
        .ok_or_else(|| MudError::NotFound(format!("no open handle {handle}")))?;
    let bytes = file::write_file(&open.root)?;
    fs::write(path.as_ref(), &bytes).map_err(MudError::IoFailure)?;
    map.remove(&handle);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids;

    #[test]
    fn write_then_read_roundtrips_through_disk() {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);

        let dir = std::env::temp_dir().join(format!("mud-handle-test-{id}"));
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("roundtrip.msr");

        let wh = open_write(&path, ids::FMT_GEN_ID);
        assert!(wh >= 0);
        with_root_mut(wh, |root| {
            crate::tree::add_to_group(root, Section::new(ids::GEN_RUN_DESC_ID, 1)).unwrap();
        });
        assert!(close_write(wh));

        let rh = open_read(&path);
        assert!(rh >= 0);
        let has_run_desc = with_root(rh, |root| root.members().unwrap().len() == 1).unwrap();
        assert!(has_run_desc);
        close_read(rh);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_read_nonexistent_path_returns_negative_one() {
        assert_eq!(open_read("/nonexistent/path/for/mud/tests.msr"), -1);
    }

    #[test]
    fn close_write_on_unknown_handle_fails() {
        assert!(!close_write(999_999));
    }
}
