use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("cannot determine the user home directory (HOME/USERPROFILE not set)")]
    NoUserHome,

    #[error("failed to create home_dir '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

fn user_home() -> Result<PathBuf, HomeDirError> {
    #[cfg(windows)]
    let var = env::var_os("APPDATA").or_else(|| env::var_os("USERPROFILE"));
    #[cfg(not(windows))]
    let var = env::var_os("HOME");

    var.filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(HomeDirError::NoUserHome)
}

/// Expand a leading `~` / `~/` into the user home directory.
fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Resolve the application home directory.
///
/// - `None` (or blank) => `<user home>/<default_subdir>`
/// - `~` prefixes are expanded, relative paths are made absolute against the cwd.
/// - When `create` is set the directory is created (with parents).
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let mut path = match configured.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => expand_tilde(raw)?,
        _ => user_home()?.join(default_subdir),
    };

    if path.is_relative() {
        path = env::current_dir()
            .map_err(HomeDirError::CurrentDir)?
            .join(path);
    }

    if create {
        std::fs::create_dir_all(&path).map_err(|source| HomeDirError::Create {
            path: path.clone(),
            source,
        })?;
    }

    Ok(path)
}

/// Resolve `file` against `base`; absolute paths are returned unchanged.
pub fn resolve_under(base: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_dir_is_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested/home");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".roster", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn blank_uses_default_subdir() {
        let resolved = resolve_home_dir(Some("   ".into()), ".roster", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(".roster"));
    }

    #[test]
    fn tilde_is_expanded() {
        let resolved = resolve_home_dir(Some("~/.roster_tilde".into()), ".roster", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(!resolved.to_string_lossy().starts_with('~'));
        assert!(resolved.ends_with(".roster_tilde"));
    }

    #[test]
    fn resolve_under_keeps_absolute() {
        let tmp = tempdir().unwrap();
        let abs = tmp.path().join("db.json");
        assert_eq!(resolve_under(Path::new("/base"), &abs.to_string_lossy()), abs);
        assert_eq!(
            resolve_under(Path::new("/base"), "images"),
            PathBuf::from("/base/images")
        );
    }
}
