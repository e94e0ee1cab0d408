//! Executor backed by the local filesystem
//!
//! Without a sandbox every host name maps onto this machine, which is how a
//! single box is managed. With a sandbox root, host `h` sees the tree under
//! `<root>/h/` as its `/`, which lets a whole fleet be simulated in one
//! directory.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use filetime::FileTime;
use walkdir::WalkDir;

use super::{Executor, OpOutput, Operation};
use crate::error::{FlashbackError, FlashbackResult};
use crate::models::Host;

/// Executes operations directly on this machine
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor {
    sandbox: Option<PathBuf>,
}

impl LocalExecutor {
    /// Operate on real paths
    pub fn new() -> Self {
        Self { sandbox: None }
    }

    /// Give every host its own root under `root`
    pub fn sandboxed(root: impl Into<PathBuf>) -> Self {
        Self {
            sandbox: Some(root.into()),
        }
    }

    /// Directory acting as `/` for `host`, if sandboxed
    pub fn host_root(&self, host: &Host) -> FlashbackResult<Option<PathBuf>> {
        let Some(root) = &self.sandbox else {
            return Ok(None);
        };
        let mut components = Path::new(host.as_str()).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Some(root.join(host.as_str()))),
            _ => Err(FlashbackError::Validation(format!(
                "host '{}' cannot be used as a sandbox directory",
                host
            ))),
        }
    }

    /// Map a host-visible path to the path on this machine
    pub fn resolve(&self, host: &Host, path: &Path) -> FlashbackResult<PathBuf> {
        match self.host_root(host)? {
            None => Ok(path.to_path_buf()),
            Some(root) => Ok(root.join(path.strip_prefix("/").unwrap_or(path))),
        }
    }

    fn list_files(&self, host: &Host, root: &Path) -> FlashbackResult<String> {
        let local_root = self.resolve(host, root)?;
        if !local_root.is_dir() {
            return Ok(String::new());
        }

        let host_root = self.host_root(host)?;
        let mut listing = Vec::new();
        for entry in WalkDir::new(&local_root).sort_by_file_name() {
            let entry = entry.map_err(|e| FlashbackError::Io(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let visible = match &host_root {
                Some(base) => match entry.path().strip_prefix(base) {
                    Ok(rel) => Path::new("/").join(rel),
                    Err(_) => entry.path().to_path_buf(),
                },
                None => entry.path().to_path_buf(),
            };
            listing.push(visible.display().to_string());
        }
        Ok(listing.join("\n"))
    }

    fn run_command(&self, host: &Host, command: &str) -> FlashbackResult<()> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(root) = self.host_root(host)? {
            fs::create_dir_all(&root).map_err(|e| FlashbackError::from_io_at(e, &root))?;
            cmd.current_dir(root);
        }

        let output = cmd
            .output()
            .map_err(|e| FlashbackError::Io(format!("Failed to start sh: {}", e)))?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("'{}' exited with {}", command, output.status)
        } else {
            stderr
        };
        Err(FlashbackError::Remote {
            host: host.to_string(),
            message,
        })
    }
}

impl Executor for LocalExecutor {
    fn execute(&self, host: &Host, op: &Operation) -> FlashbackResult<OpOutput> {
        match op {
            Operation::EnsureDir { path } => {
                let path = self.resolve(host, path)?;
                fs::create_dir_all(&path).map_err(|e| FlashbackError::from_io_at(e, &path))?;
                Ok(OpOutput::Done)
            }
            Operation::CopyIfNewer {
                source,
                destination,
            } => {
                let source = self.resolve(host, source)?;
                let destination = self.resolve(host, destination)?;
                if is_up_to_date(&source, &destination)? {
                    return Ok(OpOutput::Skipped);
                }
                copy_preserving(&source, &destination)?;
                Ok(OpOutput::Copied)
            }
            Operation::CopyOver {
                source,
                destination,
            } => {
                let source = self.resolve(host, source)?;
                let destination = self.resolve(host, destination)?;
                copy_preserving(&source, &destination)?;
                Ok(OpOutput::Done)
            }
            Operation::ReadFile { path } => {
                let path = self.resolve(host, path)?;
                let contents = fs::read(&path).map_err(|e| FlashbackError::from_io_at(e, &path))?;
                Ok(OpOutput::Contents(contents))
            }
            Operation::ListFiles { root } => Ok(OpOutput::Listing(self.list_files(host, root)?)),
            Operation::RemoveTree { path } => {
                let path = self.resolve(host, path)?;
                remove_tree(&path)?;
                Ok(OpOutput::Done)
            }
            Operation::RunCommand { command } => {
                self.run_command(host, command)?;
                Ok(OpOutput::Done)
            }
        }
    }

    fn describe(&self) -> String {
        match &self.sandbox {
            Some(root) => format!("local (sandbox {})", root.display()),
            None => "local".to_string(),
        }
    }
}

/// True when `destination` exists and is not older than `source`
fn is_up_to_date(source: &Path, destination: &Path) -> FlashbackResult<bool> {
    let source_meta = fs::metadata(source).map_err(|e| FlashbackError::from_io_at(e, source))?;
    let destination_meta = match fs::metadata(destination) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(FlashbackError::from_io_at(e, destination)),
    };

    let source_mtime = FileTime::from_last_modification_time(&source_meta);
    let destination_mtime = FileTime::from_last_modification_time(&destination_meta);
    Ok(destination_mtime >= source_mtime)
}

/// Copy contents and permissions, then carry over timestamps and ownership
fn copy_preserving(source: &Path, destination: &Path) -> FlashbackResult<()> {
    let meta = fs::metadata(source).map_err(|e| FlashbackError::from_io_at(e, source))?;
    fs::copy(source, destination).map_err(|e| FlashbackError::from_io_at(e, destination))?;

    filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
    .map_err(|e| FlashbackError::from_io_at(e, destination))?;

    preserve_ownership(&meta, destination)
}

#[cfg(unix)]
fn preserve_ownership(meta: &fs::Metadata, destination: &Path) -> FlashbackResult<()> {
    use std::os::unix::fs::MetadataExt;

    match std::os::unix::fs::chown(destination, Some(meta.uid()), Some(meta.gid())) {
        Ok(()) => Ok(()),
        // Unprivileged runs keep their own ownership, like `cp -p`
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            tracing::debug!(path = %destination.display(), "ownership not preserved: {}", e);
            Ok(())
        }
        Err(e) => Err(FlashbackError::from_io_at(e, destination)),
    }
}

#[cfg(not(unix))]
fn preserve_ownership(_meta: &fs::Metadata, _destination: &Path) -> FlashbackResult<()> {
    Ok(())
}

fn remove_tree(path: &Path) -> FlashbackResult<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(FlashbackError::from_io_at(e, path)),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| FlashbackError::from_io_at(e, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn host(name: &str) -> Host {
        Host::new(name).unwrap()
    }

    fn sandbox() -> (LocalExecutor, TempDir) {
        let temp = TempDir::new().unwrap();
        (LocalExecutor::sandboxed(temp.path()), temp)
    }

    fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_resolve_maps_into_host_root() {
        let (exec, temp) = sandbox();
        let mapped = exec
            .resolve(&host("web01"), Path::new("/etc/passwd"))
            .unwrap();
        assert_eq!(mapped, temp.path().join("web01").join("etc/passwd"));
    }

    #[test]
    fn test_resolve_unsandboxed_is_identity() {
        let exec = LocalExecutor::new();
        let mapped = exec.resolve(&host("web01"), Path::new("/etc/passwd")).unwrap();
        assert_eq!(mapped, PathBuf::from("/etc/passwd"));
    }

    #[test]
    fn test_sandbox_rejects_path_like_hosts() {
        let (exec, _temp) = sandbox();
        assert!(exec.host_root(&host("..")).is_err());
        assert!(exec.host_root(&host("a/b")).is_err());
    }

    #[test]
    fn test_copy_if_newer_then_skipped() {
        let (exec, temp) = sandbox();
        let h = host("web01");
        write(&temp.path().join("web01"), "etc/passwd", "root:x:0:0\n");
        exec.execute(&h, &Operation::EnsureDir { path: "/archive/20260101".into() })
            .unwrap();

        let op = Operation::CopyIfNewer {
            source: "/etc/passwd".into(),
            destination: "/archive/20260101/passwd".into(),
        };
        assert_eq!(exec.execute(&h, &op).unwrap(), OpOutput::Copied);
        assert_eq!(exec.execute(&h, &op).unwrap(), OpOutput::Skipped);
    }

    #[test]
    fn test_copy_if_newer_recopies_changed_source() {
        let (exec, temp) = sandbox();
        let h = host("web01");
        let source = write(&temp.path().join("web01"), "etc/group", "wheel:x:10:\n");
        let destination = write(&temp.path().join("web01"), "archive/d/group", "stale\n");

        // Destination strictly older than source
        filetime::set_file_mtime(&destination, FileTime::from_unix_time(1_000, 0)).unwrap();
        filetime::set_file_mtime(&source, FileTime::from_unix_time(2_000, 0)).unwrap();

        let op = Operation::CopyIfNewer {
            source: "/etc/group".into(),
            destination: "/archive/d/group".into(),
        };
        assert_eq!(exec.execute(&h, &op).unwrap(), OpOutput::Copied);
        assert_eq!(fs::read_to_string(&destination).unwrap(), "wheel:x:10:\n");
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let (exec, temp) = sandbox();
        let h = host("web01");
        let source = write(&temp.path().join("web01"), "etc/hosts", "127.0.0.1 localhost\n");
        filetime::set_file_mtime(&source, FileTime::from_unix_time(1_500_000_000, 0)).unwrap();

        exec.execute(
            &h,
            &Operation::CopyOver {
                source: "/etc/hosts".into(),
                destination: "/etc/hosts.bak".into(),
            },
        )
        .unwrap();

        let copied = fs::metadata(temp.path().join("web01/etc/hosts.bak")).unwrap();
        assert_eq!(
            FileTime::from_last_modification_time(&copied),
            FileTime::from_unix_time(1_500_000_000, 0)
        );
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (exec, _temp) = sandbox();
        let err = exec
            .execute(&host("web01"), &Operation::ReadFile { path: "/etc/nope".into() })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_files_host_visible_paths() {
        let (exec, temp) = sandbox();
        let base = temp.path().join("web01");
        write(&base, "archive/20260101/passwd", "a");
        write(&base, "archive/20260102/group", "b");

        let out = exec
            .execute(&host("web01"), &Operation::ListFiles { root: "/archive".into() })
            .unwrap();
        assert_eq!(
            out,
            OpOutput::Listing("/archive/20260101/passwd\n/archive/20260102/group".into())
        );
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let (exec, _temp) = sandbox();
        let out = exec
            .execute(&host("web01"), &Operation::ListFiles { root: "/archive".into() })
            .unwrap();
        assert_eq!(out, OpOutput::Listing(String::new()));
    }

    #[test]
    fn test_remove_tree_nested_and_missing() {
        let (exec, temp) = sandbox();
        let base = temp.path().join("web01");
        write(&base, "archive/20260101/passwd", "a");
        write(&base, "archive/20260101/nested/deeper/file", "b");

        let op = Operation::RemoveTree { path: "/archive".into() };
        exec.execute(&host("web01"), &op).unwrap();
        assert!(!base.join("archive").exists());

        // Second removal is a no-op
        assert_eq!(exec.execute(&host("web01"), &op).unwrap(), OpOutput::Done);
    }

    #[test]
    fn test_run_command_failure_is_remote_error() {
        let (exec, _temp) = sandbox();
        let ok = exec.execute(&host("web01"), &Operation::RunCommand { command: "true".into() });
        assert!(ok.is_ok());

        let err = exec
            .execute(
                &host("web01"),
                &Operation::RunCommand { command: "echo boom >&2; exit 3".into() },
            )
            .unwrap_err();
        assert!(matches!(err, FlashbackError::Remote { ref message, .. } if message == "boom"));
    }
}
