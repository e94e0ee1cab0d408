//! Date selector resolution
//!
//! The defaults are deliberately lopsided: an unset selector means today's
//! snapshot while `1`/`current` means the live file, so a diff with no
//! arguments compares this morning's archive against what is on disk now.

use std::path::Path;

use crate::models::{DateToken, ResolvedLocation, SnapshotDate};

/// Resolve a selector for one file
///
/// 1. unset or `0` → today's snapshot
/// 2. `1`, `current` or today's date → the live file
/// 3. any other date → that day's snapshot
pub fn resolve(
    token: DateToken,
    today: SnapshotDate,
    archive_dir: &Path,
    basename: &str,
    live_path: &Path,
) -> ResolvedLocation {
    match token {
        DateToken::Default => snapshot(today, archive_dir, basename),
        DateToken::Current => ResolvedLocation::Live {
            path: live_path.to_path_buf(),
        },
        DateToken::Date(date) if date == today => ResolvedLocation::Live {
            path: live_path.to_path_buf(),
        },
        DateToken::Date(date) => snapshot(date, archive_dir, basename),
    }
}

fn snapshot(date: SnapshotDate, archive_dir: &Path, basename: &str) -> ResolvedLocation {
    ResolvedLocation::Snapshot {
        date,
        path: archive_dir.join(date.as_str()).join(basename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn today() -> SnapshotDate {
        SnapshotDate::parse("20261018").unwrap()
    }

    fn resolve_passwd(token: DateToken) -> ResolvedLocation {
        resolve(
            token,
            today(),
            Path::new("/root/.flashback"),
            "passwd",
            Path::new("/etc/passwd"),
        )
    }

    #[test]
    fn test_default_is_todays_snapshot() {
        assert_eq!(
            resolve_passwd(DateToken::Default),
            ResolvedLocation::Snapshot {
                date: today(),
                path: PathBuf::from("/root/.flashback/20261018/passwd"),
            }
        );
    }

    #[test]
    fn test_current_tokens_are_live() {
        let live = ResolvedLocation::Live {
            path: PathBuf::from("/etc/passwd"),
        };
        for raw in ["1", "current", "20261018"] {
            let token = DateToken::parse(raw).unwrap();
            assert_eq!(resolve_passwd(token), live, "token {}", raw);
        }
    }

    #[test]
    fn test_explicit_date_is_snapshot() {
        let date = SnapshotDate::parse("20250704").unwrap();
        assert_eq!(
            resolve_passwd(DateToken::Date(date)),
            ResolvedLocation::Snapshot {
                date,
                path: PathBuf::from("/root/.flashback/20250704/passwd"),
            }
        );
    }

    #[test]
    fn test_live_never_points_into_archive() {
        let location = resolve_passwd(DateToken::Current);
        assert!(!location.path().starts_with("/root/.flashback"));
    }
}
