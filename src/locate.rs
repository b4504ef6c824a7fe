//! Finding external programs on the filesystem, like the shell's `type`.

use std::env;
use std::path::{Path, PathBuf};

/// Installation directories searched after everything else
pub const LIKELY_LOCATIONS: &[&str] = &["/usr/bin", "/usr/local/bin", "/sw/bin", "/opt/bin"];

/// Resolves program names to paths by searching an ordered directory list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLocator {
    search_dirs: Vec<PathBuf>,
}

impl CommandLocator {
    /// Creates a locator searching exactly `search_dirs`, in order.
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Creates a locator for the current process. Search order:
    /// 1. every directory of `PATH`
    /// 2. the current directory
    /// 3. the directory holding the running executable
    /// 4. [LIKELY_LOCATIONS]
    pub fn from_env() -> Self {
        let mut search_dirs: Vec<PathBuf> = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();
        search_dirs.push(PathBuf::from("."));
        if let Some(exe_dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            search_dirs.push(exe_dir);
        }
        search_dirs.extend(LIKELY_LOCATIONS.iter().map(PathBuf::from));

        Self { search_dirs }
    }

    /// Directories searched, in order
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Returns the path of `name`, or `None` if no regular file of that name exists.
    ///
    /// A `name` that already is the path of an existing file is returned unchanged.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        let found = self
            .search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file());

        match &found {
            Some(path) => log::debug!("Found {name} at {}", path.display()),
            None => log::debug!("{name} not found in {} directories", self.search_dirs.len()),
        }
        found
    }
}

impl Default for CommandLocator {
    fn default() -> Self {
        Self::from_env()
    }
}
