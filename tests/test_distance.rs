use evodist::distance::{Aggregation, DistanceMatrix, LeafDistanceStats};
use evodist::parse_newick_str;
use evodist::phylip::{ConvertConfig, convert_file};
use std::collections::HashMap;
use std::fs;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_matrix_of_unrooted_tree() {
    let tree = parse_newick_str("(A:1,B:2,(C:3,D:4):5);").unwrap();
    let matrix = DistanceMatrix::from_tree(&tree);

    assert_eq!(matrix.len(), 4);
    assert_eq!(matrix.labels(), &["A", "B", "C", "D"]);
    assert_close(matrix.get(0, 1), 3.0);
    assert_close(matrix.get(0, 2), 9.0);
    assert_close(matrix.get(2, 3), 7.0);
    assert_close(matrix.get(1, 3), 11.0);

    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 0.0);
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
        }
    }
}

#[test]
fn test_root_branch_length_is_ignored() {
    let tree = parse_newick_str("((A:1,B:1):1,C:1):100;").unwrap();
    let matrix = DistanceMatrix::from_tree(&tree);
    assert_close(matrix.get(0, 2), 3.0);
}

#[test]
fn test_mean_statistics() {
    let tree = parse_newick_str("(A:1,B:2,(C:3,D:4):5);").unwrap();
    let matrix = DistanceMatrix::from_tree(&tree);
    let stats =
        LeafDistanceStats::compute(&matrix, &HashMap::new(), Aggregation::Mean, 200.0).unwrap();

    // A: 3, 9, 10; B: 3, 10, 11; C: 9, 10, 7; D: 10, 11, 7
    let expected = [22.0 / 3.0, 24.0 / 3.0, 26.0 / 3.0, 28.0 / 3.0];
    for (leaf, value) in stats.leaves.iter().zip(expected) {
        assert_close(leaf.value, value);
    }
    assert_close(stats.mean, 25.0 / 3.0);
    assert_close(stats.adjusted_mean, stats.mean);
    assert_close(stats.adjusted_mean_per_site100, stats.mean / 200.0 * 100.0);
    assert_eq!(stats.effective_n, 4);
}

#[test]
fn test_adjusted_mean_with_duplicates() {
    let tree = parse_newick_str("(A:0.5,B:0.5,C:0.5);").unwrap();
    let matrix = DistanceMatrix::from_tree(&tree);
    // B was kept for itself and two identical sequences
    let multiplicities = HashMap::from([("B".to_string(), 3)]);
    let stats =
        LeafDistanceStats::compute(&matrix, &multiplicities, Aggregation::Mean, 50.0).unwrap();

    assert_close(stats.mean, 1.0);
    // Five sequences: A and C see four others at 1; each B copy sees 2 at 0 and 2 at 1
    assert_close(stats.adjusted_mean, (1.0 + 1.0 + 3.0 * 0.5) / 5.0);
    assert_close(stats.adjusted_mean_per_site100, stats.adjusted_mean * 2.0);
    assert_eq!(stats.leaves[1].multiplicity, 3);
    assert_eq!(stats.effective_n, 3);
}

#[test]
fn test_unknown_labels_count_once() {
    let tree = parse_newick_str("(A:1,B:1,C:1);").unwrap();
    let matrix = DistanceMatrix::from_tree(&tree);
    let multiplicities = HashMap::from([("not_in_tree".to_string(), 7)]);
    let stats =
        LeafDistanceStats::compute(&matrix, &multiplicities, Aggregation::Mean, 1.0).unwrap();

    assert!(stats.leaves.iter().all(|leaf| leaf.multiplicity == 1));
    assert_close(stats.adjusted_mean, stats.mean);
}

#[test]
fn test_non_ascii_identifiers_keep_their_multiplicity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fam.aln");
    fs::write(
        &path,
        ">protéine_α\nMKV\n>copy1\nMKV\n>copy2\nmkv\n>Bär\nMRV\n>C\nMRL\n",
    )
    .unwrap();
    let alignment = convert_file(&path, &ConvertConfig::new().with_duplicate_deletion(true)).unwrap();

    // Star tree over the surviving identifiers, as a tree builder would write it
    let leaves: Vec<String> = alignment
        .taxa
        .iter()
        .map(|taxon| format!("{}:0.5", taxon.identifier))
        .collect();
    let tree = parse_newick_str(format!("({});", leaves.join(","))).unwrap();
    let matrix = DistanceMatrix::from_tree(&tree);
    assert_eq!(matrix.labels(), &["protéine_α", "Bär", "C"]);

    let stats =
        LeafDistanceStats::compute(&matrix, &alignment.multiplicities(), Aggregation::Mean, 3.0)
            .unwrap();
    assert_eq!(stats.leaves[0].label, "protéine_α");
    assert_eq!(stats.leaves[0].multiplicity, 3);
    // Copies of the first leaf see each other at 0 and the two others at 1
    assert_close(stats.adjusted_mean, (3.0 * 0.5 + 1.0 + 1.0) / 5.0);
}
