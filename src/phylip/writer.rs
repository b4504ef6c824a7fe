//! Relaxed sequential PHYLIP output.

use crate::error::{Error, Result};
use crate::phylip::ConvertedAlignment;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Where a converted alignment goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output, left open after writing
    Stdout,
    /// A file, created or truncated, closed after writing
    File(PathBuf),
}

impl OutputTarget {
    /// Writes `alignment` to this target.
    ///
    /// # Errors
    /// Returns [Error::Io] naming the file, or [Error::Output] for stdout.
    pub fn write(&self, alignment: &ConvertedAlignment) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let stdout = io::stdout();
                write_phylip(alignment, stdout.lock())?;
            }
            OutputTarget::File(path) => {
                let file = File::create(path).map_err(|e| Error::io(path, e))?;
                write_phylip(alignment, BufWriter::new(file)).map_err(|e| Error::io(path, e))?;
                log::debug!("Wrote {} taxa to {}", alignment.len(), path.display());
            }
        }
        Ok(())
    }
}

/// Serialises `alignment`: header `"<taxa> <nchar>"`, then `"<id> <residues>"`
/// per taxon. The writer is flushed but not closed.
pub fn write_phylip<W: Write>(alignment: &ConvertedAlignment, mut out: W) -> io::Result<()> {
    writeln!(out, "{} {}", alignment.len(), alignment.nchar)?;
    for taxon in &alignment.taxa {
        writeln!(out, "{} {}", taxon.identifier, taxon.residues)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phylip::AlignedTaxon;

    fn taxon(identifier: &str, residues: &str) -> AlignedTaxon {
        AlignedTaxon {
            identifier: identifier.to_string(),
            residues: residues.to_string(),
            aliases: Vec::new(),
        }
    }

    #[test]
    fn test_write_phylip() {
        let alignment = ConvertedAlignment {
            taxa: vec![taxon("a_long_identifier", "MK-V"), taxon("b", "MKLV")],
            nchar: 4,
            max_id_len: 17,
            num_input: 2,
        };
        let mut out = Vec::new();
        write_phylip(&alignment, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2 4\na_long_identifier MK-V\nb MKLV\n"
        );
    }
}
