//! FASTA reading.
//!
//! Header lines start with `>`; the identifier is the header text up to the
//! first whitespace. All following non-empty lines, stripped, are concatenated
//! into the record's residues until the next header or end of input.

use crate::sequence::Sequence;
use std::io::BufRead;

/// Reads all FASTA records in file order, including records without residues.
///
/// Lines before the first header belong to no record and are skipped.
pub fn read_records<R: BufRead>(reader: R) -> std::io::Result<Vec<Sequence>> {
    let mut records = Vec::new();
    let mut current: Option<Sequence> = None;
    let mut orphan_lines = 0usize;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            records.extend(current.take());
            let identifier = header.split_whitespace().next().unwrap_or("");
            current = Some(Sequence::new(identifier, String::new()));
        } else if let Some(record) = current.as_mut() {
            record.residues.push_str(line);
        } else {
            orphan_lines += 1;
        }
    }
    records.extend(current);

    if orphan_lines > 0 {
        log::warn!("Skipped {orphan_lines} sequence line(s) before the first FASTA header");
    }

    Ok(records)
}
