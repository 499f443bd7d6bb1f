//! Output path resolution.
//!
//! A leading `~` expands to the user's home directory, other relative paths
//! resolve against the working directory and absolute paths pass through.

use directories::BaseDirs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("could not determine the home directory")]
    HomeDirUnavailable,
    #[error("could not determine the working directory: {0}")]
    WorkingDir(#[from] std::io::Error),
}

/// Resolve `path` to an absolute path.
pub fn resolve(path: &Path) -> Result<PathBuf, PathError> {
    let home = || {
        BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or(PathError::HomeDirUnavailable)
    };
    let cwd = || std::env::current_dir().map_err(PathError::from);
    resolve_with(path, home, cwd)
}

fn resolve_with<H, C>(path: &Path, home: H, cwd: C) -> Result<PathBuf, PathError>
where
    H: FnOnce() -> Result<PathBuf, PathError>,
    C: FnOnce() -> Result<PathBuf, PathError>,
{
    let raw = path.to_string_lossy();
    if let Some(rest) = raw.strip_prefix('~') {
        let rest = rest.trim_start_matches(['/', '\\']);
        let home = home()?;
        return Ok(if rest.is_empty() { home } else { home.join(rest) });
    }

    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(cwd()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Result<PathBuf, PathError> {
        Ok(PathBuf::from("/home/tester"))
    }

    fn no_home() -> Result<PathBuf, PathError> {
        Err(PathError::HomeDirUnavailable)
    }

    fn cwd() -> Result<PathBuf, PathError> {
        Ok(PathBuf::from("/work"))
    }

    #[test]
    fn expands_tilde() {
        let resolved = resolve_with(Path::new("~/Downloads"), home, cwd).unwrap();
        assert_eq!(resolved, PathBuf::from("/home/tester/Downloads"));
    }

    #[test]
    fn bare_tilde_is_home() {
        let resolved = resolve_with(Path::new("~"), home, cwd).unwrap();
        assert_eq!(resolved, PathBuf::from("/home/tester"));
    }

    #[test]
    fn absolute_path_unchanged() {
        let resolved = resolve_with(Path::new("/tmp/x"), no_home, cwd).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn relative_path_joins_working_dir() {
        let resolved = resolve_with(Path::new("out/receipts"), no_home, cwd).unwrap();
        assert_eq!(resolved, PathBuf::from("/work/out/receipts"));
    }

    #[test]
    fn missing_home_fails() {
        let err = resolve_with(Path::new("~/Downloads"), no_home, cwd).unwrap_err();
        assert!(matches!(err, PathError::HomeDirUnavailable));
    }

    #[test]
    fn resolve_real_home() {
        if let Some(dirs) = BaseDirs::new() {
            let resolved = resolve(Path::new("~/Downloads")).unwrap();
            assert_eq!(resolved, dirs.home_dir().join("Downloads"));
        }
    }
}
