//! Named-slot key/value storage backing the snapshot cache and history list.
//!
//! Each slot holds one serialized value that is always replaced as a whole.
//! [`FileSlotStore`] keeps one JSON file per slot in a directory;
//! [`MemorySlotStore`] is the in-process fallback used by tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::CoreError;

/// Storage for whole-value named slots.
pub trait SlotStore: Send + Sync {
    /// Read a slot. `Ok(None)` means the slot has never been written.
    fn read(&self, slot: &str) -> Result<Option<String>, CoreError>;

    /// Replace the slot's value.
    fn write(&self, slot: &str, value: &str) -> Result<(), CoreError>;

    /// Delete the slot. Removing a missing slot is not an error.
    fn remove(&self, slot: &str) -> Result<(), CoreError>;
}

#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>, CoreError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(slot).cloned())
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), CoreError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), CoreError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(slot);
        Ok(())
    }
}

/// Directory-backed store: slot `name` lives at `<dir>/<name>.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>, CoreError> {
        match std::fs::read_to_string(self.slot_path(slot)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), CoreError> {
        let path = self.slot_path(slot);
        let tmp = self.dir.join(format!(".{slot}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        tracing::trace!(slot, path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), CoreError> {
        match std::fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Durable data directory: `<data_dir>/scholarscope/`.
pub fn default_data_dir() -> Result<PathBuf, CoreError> {
    dirs::data_dir()
        .map(|d| d.join("scholarscope"))
        .ok_or(CoreError::NoDirectory("data"))
}

/// Root holding one directory per session: `<cache_dir>/scholarscope/sessions/`.
pub fn sessions_root() -> Result<PathBuf, CoreError> {
    dirs::cache_dir()
        .map(|d| d.join("scholarscope").join("sessions"))
        .ok_or(CoreError::NoDirectory("cache"))
}

/// Per-session directory: `<cache_dir>/scholarscope/sessions/<session_id>/`.
pub fn session_dir(session_id: &str) -> Result<PathBuf, CoreError> {
    Ok(sessions_root()?.join(session_id))
}

/// Session identity when none is configured: the launching shell's pid, so
/// relaunching from the same shell sees the same session.
///
/// Where the process start time is known it is appended (`<pid>-<start>`),
/// so a recycled pid does not inherit an older shell's session.
pub fn default_session_id() -> String {
    #[cfg(unix)]
    {
        let ppid = std::os::unix::process::parent_id();
        match process_start_time(ppid) {
            Some(start) => format!("{ppid}-{start}"),
            None => ppid.to_string(),
        }
    }
    #[cfg(not(unix))]
    {
        "default".to_string()
    }
}

/// Start time of `pid` in clock ticks since boot, from `/proc/<pid>/stat`.
/// `None` if the process is gone or there is no procfs.
fn process_start_time(pid: u32) -> Option<u64> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    // comm may contain spaces and parens; fields resume after the last ')'.
    let rest = stat.get(stat.rfind(')')? + 1..)?;
    // starttime is field 22; `rest` begins at field 3.
    rest.split_whitespace().nth(19)?.parse().ok()
}

/// Whether the shell that owns session `id` is still running.
///
/// Only ids of the `<pid>` / `<pid>-<start>` shape are judged; configured
/// names, and every id on systems without procfs, count as live.
pub fn session_is_live(id: &str) -> bool {
    let (pid, start) = match id.split_once('-') {
        Some((pid, start)) => (pid, Some(start)),
        None => (id, None),
    };
    let Ok(pid) = pid.parse::<u32>() else {
        return true;
    };
    let start = match start.map(str::parse::<u64>) {
        Some(Ok(start)) => Some(start),
        Some(Err(_)) => return true,
        None => None,
    };
    if !Path::new("/proc/self/stat").exists() {
        return true;
    }
    match (process_start_time(pid), start) {
        (None, _) => false,
        (Some(now), Some(start)) => now == start,
        (Some(_), None) => true,
    }
}

/// Delete session directories under `root` whose owner is gone, keeping
/// `current`. Returns how many were removed; a missing root is not an error.
pub fn prune_sessions(
    root: &Path,
    current: &str,
    is_live: impl Fn(&str) -> bool,
) -> Result<usize, CoreError> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(id) = name.to_str() else {
            continue;
        };
        if id == current || is_live(id) {
            continue;
        }
        match std::fs::remove_dir_all(entry.path()) {
            Ok(()) => {
                tracing::debug!(session = id, "pruned stale session");
                removed += 1;
            }
            Err(e) => tracing::warn!(session = id, error = %e, "could not prune session"),
        }
    }
    Ok(removed)
}
