//! Invocation of the external aligner and tree builders.
//!
//! Tools communicate through files only: the input is written, the program
//! runs to completion, and the run counts as successful iff the output file
//! named by the program's convention exists afterwards.

use crate::error::{Error, Result};
use crate::locate::CommandLocator;
use crate::pipeline::config::{AlignmentInput, PipelineConfig, TreeProgram};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Multiple sequence aligner used when the alignment is computed
pub const ALIGNER: &str = "muscle";

/// Paths of the external programs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbox {
    aligner: Option<PathBuf>,
    tree_program: TreeProgram,
    tree_builder: PathBuf,
}

impl Toolbox {
    /// Uses the given program paths without searching.
    pub fn new(aligner: Option<PathBuf>, tree_program: TreeProgram, tree_builder: PathBuf) -> Self {
        Self {
            aligner,
            tree_program,
            tree_builder,
        }
    }

    /// Locates every program `config` needs: the tree builder, plus the
    /// aligner unless the alignment is supplied.
    ///
    /// # Errors
    /// Returns [Error::ToolNotFound] listing all missing programs.
    pub fn locate(config: &PipelineConfig, locator: &CommandLocator) -> Result<Self> {
        let tree_program = config.tree_program();
        let mut missing = Vec::new();

        let tree_builder = locator.locate(tree_program.executable()).map(absolute);
        if tree_builder.is_none() {
            missing.push(tree_program.executable());
        }

        let aligner = match config.alignment_input() {
            AlignmentInput::Supplied => None,
            AlignmentInput::Compute => {
                let found = locator.locate(ALIGNER).map(absolute);
                if found.is_none() {
                    missing.push(ALIGNER);
                }
                found
            }
        };

        match tree_builder {
            Some(tree_builder) if missing.is_empty() => Ok(Self {
                aligner,
                tree_program,
                tree_builder,
            }),
            _ => Err(Error::ToolNotFound(missing.join(", "))),
        }
    }

    pub fn aligner(&self) -> Option<&Path> {
        self.aligner.as_deref()
    }

    pub fn tree_program(&self) -> TreeProgram {
        self.tree_program
    }

    pub fn tree_builder(&self) -> &Path {
        &self.tree_builder
    }

    /// Aligns the raw sequences in `input` into `output` (FASTA).
    ///
    /// # Errors
    /// * [Error::ToolNotFound] if this toolbox has no aligner
    /// * [Error::ToolLaunch] if the aligner cannot be started
    /// * [Error::MissingToolOutput] if `output` does not exist afterwards
    pub fn align(&self, input: &Path, output: &Path) -> Result<()> {
        let aligner = self
            .aligner
            .as_deref()
            .ok_or_else(|| Error::ToolNotFound(ALIGNER.to_string()))?;

        let mut command = Command::new(aligner);
        command
            .arg("-quiet")
            .arg("-in")
            .arg(input)
            .arg("-out")
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        run(ALIGNER, &mut command)?;
        expect_output(ALIGNER, output)?;

        log::info!("MSA stage done");
        Ok(())
    }

    /// Builds a tree from the PHYLIP file `phylip` and returns the path of
    /// the Newick file written by the tree builder.
    ///
    /// `phylip` must lie in `work_dir`; neighbor writes its fixed-name
    /// output files into its working directory.
    ///
    /// # Errors
    /// * [Error::ToolLaunch] if the program cannot be started
    /// * [Error::MissingToolOutput] if no tree file exists afterwards
    pub fn build_tree(&self, phylip: &Path, work_dir: &Path) -> Result<PathBuf> {
        let file_name = phylip.file_name().unwrap_or(OsStr::new(""));
        let mut command = Command::new(&self.tree_builder);
        command.current_dir(work_dir).stdout(Stdio::null());

        let tree_file = match self.tree_program {
            TreeProgram::Phyml => {
                command
                    .args(["--sequential", "-d", "aa", "-p", "-f", "e"])
                    .args(["-o", "tl", "-s", "SPR", "--quiet", "-i"])
                    .arg(file_name);
                let mut tree_name = file_name.to_os_string();
                tree_name.push("_phyml_tree.txt");
                work_dir.join(tree_name)
            }
            TreeProgram::Neighbor => {
                command.arg(file_name);
                work_dir.join("outtree")
            }
        };

        let name = self.tree_program.executable();
        run(name, &mut command)?;
        expect_output(name, &tree_file)?;

        log::info!("Tree building done");
        Ok(tree_file)
    }
}

/// Tools run inside the scratch directory, so relative paths must not be kept.
fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// Runs `command` to completion. A non-zero exit status is only logged; the
/// output file check decides about success.
fn run(name: &str, command: &mut Command) -> Result<()> {
    log::debug!("Running {command:?}");
    let status = command.status().map_err(|source| Error::ToolLaunch {
        tool: name.to_string(),
        source,
    })?;
    if !status.success() {
        log::warn!("{name} exited with {status}");
    }
    Ok(())
}

fn expect_output(name: &str, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingToolOutput {
            tool: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}
