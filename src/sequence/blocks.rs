//! Row/column block alignments as written by Clustal and `muscle -clw`.
//!
//! ```text
//! CLUSTAL W (1.83) multiple sequence alignment
//!
//! seq1      MKV-LLAG
//! seq2      MKVQLL-G
//!           *** ** *
//!
//! seq1      TTR
//! seq2      TSR
//! ```
//! Each block holds one fragment per identifier; fragments are concatenated
//! across blocks. Conservation lines are indented and skipped.

use crate::sequence::SequenceSet;
use std::io::BufRead;

/// First words of format banner lines
const BANNERS: &[&str] = &["CLUSTAL", "MUSCLE"];

/// Reads a block alignment into identifier -> concatenated fragments.
pub fn read_blocks<R: BufRead>(reader: R) -> std::io::Result<SequenceSet> {
    let mut set = SequenceSet::new();
    let mut seen_content = false;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with(' ') || line.starts_with('\t') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(identifier), fragment) = (fields.next(), fields.next()) else {
            continue;
        };

        let is_banner = identifier == "CLUSTAL" || (!seen_content && BANNERS.contains(&identifier));
        seen_content = true;
        if is_banner {
            continue;
        }

        match fragment {
            Some(fragment) => set.append(identifier, fragment),
            None => log::debug!("Skipping block line without fragment: {line:?}"),
        }
    }

    Ok(set)
}
