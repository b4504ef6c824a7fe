use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory for the intermediate files of one run.
///
/// Created inside the output directory with a name starting with
/// `_scratch<pid>`, so concurrent runs never share intermediates. The
/// directory and everything left in it is removed when the workspace is
/// dropped, whichever way the run ends.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates the scratch directory, creating `output_dir` first if needed.
    ///
    /// # Errors
    /// Returns [Error::Io] if a directory cannot be created.
    pub fn create(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("_scratch{}", std::process::id()))
            .tempdir_in(output_dir)
            .map_err(|e| Error::io(output_dir, e))?;

        log::debug!("Scratch directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the scratch directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Moves `from` (usually inside the workspace) to `to`, copying across
    /// filesystems when a rename is impossible.
    ///
    /// # Errors
    /// Returns [Error::Io] naming the destination.
    pub fn retain(&self, from: &Path, to: &Path) -> Result<()> {
        if fs::rename(from, to).is_err() {
            fs::copy(from, to).map_err(|e| Error::io(to, e))?;
            fs::remove_file(from).map_err(|e| Error::io(from, e))?;
        }
        log::debug!("Retained {}", to.display());
        Ok(())
    }

    /// Removes the scratch directory, reporting failures instead of ignoring them.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_is_removed_on_drop() {
        let out = tempfile::tempdir().unwrap();
        let scratch_path = {
            let workspace = Workspace::create(out.path()).unwrap();
            fs::write(workspace.file("x.phylip"), "1 1\nA M\n").unwrap();
            let name = workspace.path().file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with(&format!("_scratch{}", std::process::id())));
            workspace.path().to_path_buf()
        };
        assert!(!scratch_path.exists());
    }

    #[test]
    fn test_retain_moves_file_out() {
        let out = tempfile::tempdir().unwrap();
        let workspace = Workspace::create(&out.path().join("nested")).unwrap();
        let tree = workspace.file("tree.txt");
        fs::write(&tree, "(A,B,C);").unwrap();

        let destination = out.path().join("nested/fam.tree");
        workspace.retain(&tree, &destination).unwrap();
        workspace.close().unwrap();

        assert_eq!(fs::read_to_string(destination).unwrap(), "(A,B,C);");
        assert!(!tree.exists());
    }
}
