use criterion::{Criterion, criterion_group, criterion_main};
use evodist::distance::{Aggregation, DistanceMatrix, LeafDistanceStats};
use evodist::phylip::{ConvertConfig, convert_file};
use std::collections::HashMap;
use std::fmt::Write;
use std::hint::black_box;
use std::path::Path;

const TREE_SIZES: &[(&str, usize)] = &[("n50", 50), ("n200", 200)];

const ALIGNMENT_SIZES: &[(&str, usize, usize)] = &[("n100-l300", 100, 300), ("n500-l800", 500, 800)];

/// Caterpillar tree in PhyML style: unrooted trifurcation at the top.
fn caterpillar_newick(num_leaves: usize) -> String {
    let mut newick = String::from("(t0:0.1,t1:0.2");
    for i in 2..num_leaves - 1 {
        newick.insert(0, '(');
        write!(newick, "):0.01,t{i}:0.{:03}", i % 997 + 1).unwrap();
    }
    write!(newick, ",t{}:0.3);", num_leaves - 1).unwrap();
    newick
}

/// Alignment with every fifth sequence a duplicate of its predecessor.
fn write_alignment(path: &Path, num_taxa: usize, length: usize) {
    const RESIDUES: &[u8] = b"ACDEFGHIKLMNPQRSTVWY-";
    let mut fasta = String::new();
    let mut previous = String::new();
    for i in 0..num_taxa {
        let residues = if i % 5 == 4 {
            previous.clone()
        } else {
            (0..length)
                .map(|j| RESIDUES[(i * 7 + j * 13) % RESIDUES.len()] as char)
                .collect()
        };
        writeln!(fasta, ">seq{i} generated\n{residues}").unwrap();
        previous = residues;
    }
    std::fs::write(path, fasta).unwrap();
}

fn tree_distances(c: &mut Criterion) {
    for (name, num_leaves) in TREE_SIZES {
        let newick = caterpillar_newick(*num_leaves);
        c.bench_function(&format!("parse-{name}"), |b| {
            b.iter(|| evodist::parse_newick_str(black_box(&newick)).unwrap());
        });

        let tree = evodist::parse_newick_str(&newick).unwrap();
        c.bench_function(&format!("distances-{name}"), |b| {
            b.iter(|| {
                let matrix = DistanceMatrix::from_tree(black_box(&tree));
                LeafDistanceStats::compute(&matrix, &HashMap::new(), Aggregation::Mean, 250.0)
            });
        });
    }
}

fn phylip_conversion(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let config = ConvertConfig::new().with_duplicate_deletion(true);
    for (name, num_taxa, length) in ALIGNMENT_SIZES {
        let path = dir.path().join(format!("{name}.aln"));
        write_alignment(&path, *num_taxa, *length);
        c.bench_function(&format!("convert-{name}"), |b| {
            b.iter(|| convert_file(&path, &config).unwrap());
        });
    }
}

criterion_group!(regression, tree_distances);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = phylip_conversion
}
criterion_main!(regression, reporting);
