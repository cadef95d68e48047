//! # File I/O Module
//!
//! Project and config file operations:
//! - **Atomic saves**: write to `.tmp`, sync, rename over the target
//! - **File locking**: keep two editors off the same project file
//! - **Format detection on load**: project files and LVGL configs both open
//!
//! ## File Format
//!
//! Projects are saved as pretty-printed JSON. A lock file next to the project
//! (`<name>.<ext>.lock`) records who holds it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lvgl_core::file_io::{save_project, load_project, FileLock};
//! use lvgl_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new();
//! let path = Path::new("dashboard.json");
//!
//! let lock = FileLock::acquire(path, "designer@example.com").unwrap();
//! save_project(&project, path).unwrap();
//! drop(lock);
//!
//! let loaded = load_project(path).unwrap();
//! assert!(loaded.report.is_clean());
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::document::{self, Imported};
use crate::errors::{LayoutError, LayoutResult};
use crate::foreign;
use crate::project::Project;
use crate::serialize::SerializeOptions;

/// Lock file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive hold on a project file, released on drop.
///
/// Combines an OS-level lock (fs2) with a `.lock` file whose JSON body names
/// the holder, so other editors can report who has the file open.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// A lock file left behind by a dead process, or older than 24 hours,
    /// is taken over.
    ///
    /// # Errors
    ///
    /// `LayoutError::FileLocked` if another live editor holds the file.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> LayoutResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(LayoutError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                debug!("taking over stale lock held by {}", existing.user_id);
            }
        }

        // cleared only once the OS lock is ours, so a failed acquire
        // leaves the holder's info readable
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                LayoutError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            LayoutError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;
        lock_file.set_len(0).map_err(|e| {
            LayoutError::file_error("clear lock", lock_path.display().to_string(), e.to_string())
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| {
            LayoutError::SerializationError {
                reason: e.to_string(),
            }
        })?;
        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            LayoutError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;
        lock_file.sync_all().map_err(|e| {
            LayoutError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Who holds `path`, if anyone. Stale locks count as free.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        read_lock_info(&lock_path)
            .ok()
            .filter(|info| !is_lock_stale(info))
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(project_path: &Path) -> PathBuf {
    let mut lock_path = project_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> LayoutResult<LockInfo> {
    let contents = read_text(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(|e| LayoutError::SerializationError {
        reason: e.to_string(),
    })
}

/// A lock is stale when its process is gone from this machine, or when it
/// is more than a day old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().as_deref() == Some(info.machine.as_str()) {
        #[cfg(windows)]
        {
            use std::process::Command;
            let output = Command::new("tasklist")
                .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                .output();
            if let Ok(output) = output {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if !stdout.contains(&info.pid.to_string()) {
                    return true;
                }
            }
        }
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
    }

    (Utc::now() - info.locked_at).num_hours() > 24
}

fn read_text(path: &Path, operation: &str) -> LayoutResult<String> {
    let mut file = File::open(path)
        .map_err(|e| LayoutError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| LayoutError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `contents` to `path` through a sibling temp file and a rename, so
/// an interrupted write never leaves a truncated target.
fn write_atomic(path: &Path, contents: &str) -> LayoutResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        LayoutError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.write_all(contents.as_bytes()).map_err(|e| {
        LayoutError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.sync_all().map_err(|e| {
        LayoutError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LayoutError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Save a project file (JSON, nested action placement).
pub fn save_project(project: &Project, path: &Path) -> LayoutResult<()> {
    let json = document::to_json(project)?;
    write_atomic(path, &json)?;
    info!("saved project to {}", path.display());
    Ok(())
}

/// Load a project file or an LVGL config.
///
/// The format is detected from the content, not the extension. Recoverable
/// problems are listed in the returned report.
///
/// # Errors
///
/// * `LayoutError::FileError` - the file could not be read
/// * `LayoutError::ParseError` - neither JSON nor YAML
/// * `LayoutError::UnrecognizedDocument` - parsed, but not a layout
/// * `LayoutError::VersionMismatch` - project file from an incompatible schema
pub fn load_project(path: &Path) -> LayoutResult<Imported> {
    let contents = read_text(path, "open")?;
    let imported = document::import_document(&contents)?;
    info!(
        "loaded {} ({} page(s), {} warning(s))",
        path.display(),
        imported.project.page_count(),
        imported.report.len()
    );
    Ok(imported)
}

/// Load a project and report whether someone else holds its lock.
pub fn load_project_with_lock_check(path: &Path) -> LayoutResult<(Imported, Option<LockInfo>)> {
    let imported = load_project(path)?;
    let lock_info = FileLock::check(path);
    Ok((imported, lock_info))
}

/// Write the LVGL config as JSON.
pub fn export_config_file(project: &Project, path: &Path, options: &SerializeOptions) -> LayoutResult<()> {
    let value = foreign::export_config(project, options);
    let json = serde_json::to_string_pretty(&value).map_err(|e| LayoutError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, &json)?;
    info!("exported config to {}", path.display());
    Ok(())
}

/// Write the LVGL config as YAML.
pub fn export_yaml_file(project: &Project, path: &Path, options: &SerializeOptions) -> LayoutResult<()> {
    let yaml = foreign::to_yaml(project, options)?;
    write_atomic(path, &yaml)?;
    info!("exported config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MAIN_PAGE_ID;
    use crate::widgets::{Widget, WidgetType};
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_project() -> Project {
        let mut project = Project::new();
        let title = Widget::new(WidgetType::Label)
            .with_id("title")
            .with("text", json!("Ready"))
            .unwrap()
            .at(10, 10);
        project.add_widget(MAIN_PAGE_ID, title).unwrap();
        project
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/path/to/project.json"));
        assert_eq!(lock_path, Path::new("/path/to/project.json.lock"));
        let bare = lock_path_for(Path::new("/path/to/project"));
        assert_eq!(bare, Path::new("/path/to/project.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.user_id, "test@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        let project = sample_project();

        save_project(&project, &path).unwrap();
        let loaded = load_project(&path).unwrap();

        assert!(loaded.report.is_clean());
        assert_eq!(loaded.project, project);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");

        save_project(&sample_project(), &path).unwrap();

        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");
        assert_eq!(lock.project_path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());
        assert_eq!(FileLock::check(&path).unwrap().user_id, "test@example.com");

        drop(lock);
        assert!(!lock_path.exists());
        assert!(FileLock::check(&path).is_none());
    }

    #[test]
    fn test_stale_lock_taken_over() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        let old = LockInfo {
            user_id: "someone".to_string(),
            machine: "elsewhere".to_string(),
            pid: 1,
            locked_at: Utc::now() - chrono::Duration::hours(48),
        };
        fs::write(lock_path_for(&path), serde_json::to_string(&old).unwrap()).unwrap();

        assert!(FileLock::check(&path).is_none());
        let lock = FileLock::acquire(&path, "me").unwrap();
        assert_eq!(lock.info.user_id, "me");
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_acquire_keeps_holder_info() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        let lock_path = lock_path_for(&path);
        // looks stale, but another process still holds the OS lock
        let holder = LockInfo {
            user_id: "someone".to_string(),
            machine: "elsewhere".to_string(),
            pid: 1,
            locked_at: Utc::now() - chrono::Duration::hours(48),
        };
        fs::write(&lock_path, serde_json::to_string(&holder).unwrap()).unwrap();
        let held = OpenOptions::new().read(true).write(true).open(&lock_path).unwrap();
        held.lock_exclusive().unwrap();

        let err = FileLock::acquire(&path, "me").err().unwrap();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert_eq!(read_lock_info(&lock_path).unwrap().user_id, "someone");

        held.unlock().unwrap();
        drop(held);
        let lock = FileLock::acquire(&path, "me").unwrap();
        assert_eq!(read_lock_info(&lock_path).unwrap().user_id, "me");
        drop(lock);
    }

    #[test]
    fn test_shadowed_fields_survive_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        let mut project = sample_project();
        let title = project.find_widget_mut(MAIN_PAGE_ID, "title").unwrap();
        title.pad_all = 8;
        title.pad_left = 3;
        title.border_color = Some(crate::style::Color::RED);

        save_project(&project, &path).unwrap();
        let loaded = load_project(&path).unwrap();

        let title = loaded.project.find_widget(MAIN_PAGE_ID, "title").unwrap();
        assert_eq!(title.pad_left, 3);
        assert_eq!(title.border_width, 0);
        assert_eq!(title.border_color, Some(crate::style::Color::RED));
        assert_eq!(loaded.project, project);
    }

    #[test]
    fn test_load_with_lock_check() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        save_project(&sample_project(), &path).unwrap();

        let (loaded, lock_info) = load_project_with_lock_check(&path).unwrap();
        assert_eq!(loaded.project.widget_count(), 1);
        assert!(lock_info.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_project(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "just: some\nyaml: text\n").unwrap();
        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "UNRECOGNIZED_DOCUMENT");
    }

    #[test]
    fn test_config_exports_reload() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("lvgl.json");
        let yaml_path = dir.path().join("lvgl.yaml");
        let project = sample_project();
        let options = SerializeOptions::default();

        export_config_file(&project, &json_path, &options).unwrap();
        export_yaml_file(&project, &yaml_path, &options).unwrap();

        for path in [&json_path, &yaml_path] {
            let loaded = load_project(path).unwrap();
            assert!(loaded.report.is_clean(), "{:?}", loaded.report);
            let title = loaded.project.find_widget(MAIN_PAGE_ID, "title").unwrap();
            assert_eq!(title.get("text"), Some(json!("Ready")));
            assert_eq!((title.x, title.y), (10, 10));
        }
    }
}
