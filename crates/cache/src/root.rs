//! Cache root resolution
//!
//! The cache root is process-wide, persists across runs by design (it IS the
//! cache), and is resolved exactly once when the [`crate::CacheStore`] is
//! constructed.

use crate::{Error, Result};
use dirs::{cache_dir, home_dir};
use std::path::PathBuf;

/// Inputs for determining the cache root directory
#[derive(Debug, Clone)]
struct CacheRootInputs {
    override_dir: Option<PathBuf>,
    xdg_cache_home: Option<PathBuf>,
    os_cache_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    temp_dir: PathBuf,
}

fn cache_root_from_inputs(inputs: CacheRootInputs) -> Result<PathBuf> {
    // Resolution order (first writable wins):
    // 1) VIDPACK_CACHE_DIR (explicit override)
    // 2) XDG_CACHE_HOME/vidpack
    // 3) OS cache dir/vidpack
    // 4) ~/.vidpack/cache
    // 5) TMPDIR/vidpack/cache (fallback)
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(dir) = inputs.override_dir.filter(|p| !p.as_os_str().is_empty()) {
        candidates.push(dir);
    }
    if let Some(xdg) = inputs.xdg_cache_home {
        candidates.push(xdg.join("vidpack"));
    }
    if let Some(os_cache) = inputs.os_cache_dir {
        candidates.push(os_cache.join("vidpack"));
    }
    if let Some(home) = inputs.home_dir {
        candidates.push(home.join(".vidpack/cache"));
    }
    candidates.push(inputs.temp_dir.join("vidpack/cache"));

    for path in candidates {
        // An existing candidate may be read-only (CI images mounting $HOME
        // read-only); probe before committing to it.
        if path.exists() {
            let probe = path.join(".write_probe");
            match std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&probe)
            {
                Ok(_) => {
                    let _ = std::fs::remove_file(&probe);
                    return Ok(path);
                }
                Err(_) => continue,
            }
        }
        if std::fs::create_dir_all(&path).is_ok() {
            return Ok(path);
        }
        // Permission denied or other errors - try next candidate
    }
    Err(Error::configuration(
        "Failed to determine a writable cache directory",
    ))
}

/// Resolve the process-wide cache root, creating it if necessary.
pub fn resolve_cache_root() -> Result<PathBuf> {
    let inputs = CacheRootInputs {
        override_dir: std::env::var("VIDPACK_CACHE_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
        xdg_cache_home: std::env::var("XDG_CACHE_HOME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
        os_cache_dir: cache_dir(),
        home_dir: home_dir(),
        temp_dir: std::env::temp_dir(),
    };
    cache_root_from_inputs(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_dir_wins() {
        let tmp = std::env::temp_dir().join("vidpack-test-override");
        let _ = std::fs::remove_dir_all(&tmp);
        let inputs = CacheRootInputs {
            override_dir: Some(tmp.clone()),
            xdg_cache_home: None,
            os_cache_dir: None,
            home_dir: None,
            temp_dir: std::env::temp_dir(),
        };
        let dir = cache_root_from_inputs(inputs).unwrap();
        assert!(dir.starts_with(&tmp));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn falls_back_to_temp_when_nothing_else_is_writable() {
        let tmp = std::env::temp_dir();
        let inputs = CacheRootInputs {
            override_dir: None,
            xdg_cache_home: Some(PathBuf::from("/proc/no-such-place/.cache")),
            os_cache_dir: None,
            home_dir: Some(PathBuf::from("/proc/no-such-place")),
            temp_dir: tmp.clone(),
        };
        let dir = cache_root_from_inputs(inputs).unwrap();
        assert!(dir.starts_with(&tmp));
    }

    #[test]
    fn empty_override_is_ignored() {
        let inputs = CacheRootInputs {
            override_dir: Some(PathBuf::new()),
            xdg_cache_home: None,
            os_cache_dir: None,
            home_dir: None,
            temp_dir: std::env::temp_dir(),
        };
        let dir = cache_root_from_inputs(inputs).unwrap();
        assert!(dir.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn resolution_creates_the_directory() {
        let tmp = std::env::temp_dir().join("vidpack-test-created/nested");
        let _ = std::fs::remove_dir_all(std::env::temp_dir().join("vidpack-test-created"));
        let inputs = CacheRootInputs {
            override_dir: Some(tmp.clone()),
            xdg_cache_home: None,
            os_cache_dir: None,
            home_dir: None,
            temp_dir: std::env::temp_dir(),
        };
        let dir = cache_root_from_inputs(inputs).unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(std::env::temp_dir().join("vidpack-test-created"));
    }
}
