use evodist::Error;
use evodist::pipeline::{
    self, AlignmentInput, Outcome, PipelineConfig, StatisticMode, Toolbox, TreeProgram,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

// Writing an executable while another test forks can fail with ETXTBSY,
// so tests installing or running the stand-in tools are serialised.
static TOOL_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    TOOL_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Copies the input, which the tests keep gap-free and of equal lengths.
const FAKE_MUSCLE: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -in) in="$2"; shift ;;
    -out) out="$2"; shift ;;
  esac
  shift
done
cp "$in" "$out"
"#;

/// Star tree with all branches 0.1 over the PHYLIP identifiers.
const FAKE_PHYML: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -i) input="$2"; shift ;;
  esac
  shift
done
awk 'NR > 1 { printf "%s%s:0.1", (NR > 2 ? "," : "("), $1 } END { print ");" }' "$input" > "${input}_phyml_tree.txt"
echo "fake stats" > "${input}_phyml_stats.txt"
"#;

const FAKE_NEIGHBOR: &str = r#"#!/bin/sh
awk 'NR > 1 { printf "%s%s:0.1", (NR > 2 ? "," : "("), $1 } END { print ");" }' "$1" > outtree
"#;

/// Star tree listing the PHYLIP identifiers last to first.
const REVERSING_PHYML: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -i) input="$2"; shift ;;
  esac
  shift
done
awk 'NR > 1 { ids[NR] = $1; n = NR }
     END { printf "("; for (i = n; i > 1; i--) printf "%s%s:0.1", (i < n ? "," : ""), ids[i]; print ");" }' "$input" > "${input}_phyml_tree.txt"
"#;

const BROKEN_PHYML: &str = "#!/bin/sh\nexit 3\n";

const SIX_SEQUENCES: &str = ">s1 first\nMKVLAAGTTR\n>s2\nMKVLSAGTTR\n>s3\nMKILAAGTSR\n\
                             >s4\nMRVLAAGTTK\n>s5\nMKVLAPGTTR\n>s6\nAKVLAAGTTR\n";

const SIX_SEQUENCES_REPORT: &str =
    "fam\tMedLen 10.00\tMean 0.2\tAdjmean 0.2\tAdj_mean_per_site100 2.00000\tN 6\tNTaxa 6";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("bin")).unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn bin(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    fn odir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn install(&self, name: &str, script: &str) -> PathBuf {
        let path = self.bin().join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn input(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn phyml_toolbox(&self) -> Toolbox {
        let muscle = self.install("muscle", FAKE_MUSCLE);
        let phyml = self.install("phyml", FAKE_PHYML);
        Toolbox::new(Some(muscle), TreeProgram::Phyml, phyml)
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig::new().with_output_dir(self.odir())
    }

    fn scratch_dirs(&self) -> Vec<String> {
        fs::read_dir(self.odir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("_scratch"))
            .collect()
    }
}

// --- END TO END ---
#[test]
fn test_six_sequences_end_to_end() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input("fam.fasta", SIX_SEQUENCES);

    let outcome = pipeline::run(&input, fixture.config(), &fixture.phyml_toolbox()).unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.to_string(), SIX_SEQUENCES_REPORT);
    assert_eq!(report.to_string().split('\t').count(), 7);
    assert_eq!(outcome.to_string(), format!("{SIX_SEQUENCES_REPORT}\n"));

    // Tree and computed alignment are kept, intermediates are gone
    let tree = fs::read_to_string(fixture.odir().join("fam.tree")).unwrap();
    assert!(tree.starts_with("(s1:0.1,s2:0.1"));
    assert!(fixture.odir().join("fam.aln").is_file());
    assert!(fixture.scratch_dirs().is_empty());
    assert_eq!(fs::read_dir(fixture.odir()).unwrap().count(), 2);
}

#[test]
fn test_per_sequence_lines_precede_report() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input("fam.fasta", SIX_SEQUENCES);
    let config = fixture
        .config()
        .with_statistic_mode(StatisticMode::PerSequence);

    let outcome = pipeline::run(&input, config, &fixture.phyml_toolbox()).unwrap();
    let text = outcome.to_string();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "fam\ts1\tMean 0.2\tCopies 1");
    assert_eq!(lines[5], "fam\ts6\tMean 0.2\tCopies 1");
    assert_eq!(lines[6], SIX_SEQUENCES_REPORT);
}

#[test]
fn test_per_sequence_lines_follow_input_order() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input(
        "fam.aln",
        ">s1\nMKVLAAGTTR\n>s2\nMKVLAAGTTR\n>s3\nMKILAAGTSR\n>s4\nMRVLAAGTTK\n>s5\nMKVLAPGTTR\n",
    );
    let phyml = fixture.install("phyml", REVERSING_PHYML);
    let toolbox = Toolbox::new(None, TreeProgram::Phyml, phyml);
    let config = fixture
        .config()
        .with_alignment_input(AlignmentInput::Supplied)
        .with_statistic_mode(StatisticMode::PerSequence);

    let outcome = pipeline::run(&input, config, &toolbox).unwrap();

    let tree = fs::read_to_string(fixture.odir().join("fam.tree")).unwrap();
    assert!(tree.starts_with("(s5:0.1,s4:0.1"));
    let Outcome::Completed { per_sequence, .. } = outcome else {
        panic!("expected a completed run");
    };
    let ids: Vec<_> = per_sequence.iter().map(|line| line.identifier.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s3", "s4", "s5"]);
    assert_eq!(per_sequence[0].copies, 2);
}

#[test]
fn test_neighbor_tree_builder() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input("fam.aln", SIX_SEQUENCES);
    let neighbor = fixture.install("run_neighbor", FAKE_NEIGHBOR);
    let toolbox = Toolbox::new(None, TreeProgram::Neighbor, neighbor);
    let config = fixture
        .config()
        .with_alignment_input(AlignmentInput::Supplied)
        .with_tree_program(TreeProgram::Neighbor);

    let outcome = pipeline::run(&input, config, &toolbox).unwrap();

    assert_eq!(outcome.report().unwrap().effective_n, 6);
    assert!(fixture.odir().join("fam_nj.tree").is_file());
    assert!(!fixture.odir().join("fam.aln").exists());
    assert!(fixture.scratch_dirs().is_empty());
}

// --- SKIPS ---
#[test]
fn test_three_records_are_too_few() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input("fam.fasta", ">a\nMKV\n>b\nMKL\n>c\nMRV\n");
    // Tools that do not exist: the run must stop before needing them
    let toolbox = Toolbox::new(
        Some(fixture.bin().join("muscle")),
        TreeProgram::Phyml,
        fixture.bin().join("phyml"),
    );

    let outcome = pipeline::run(&input, fixture.config(), &toolbox).unwrap();

    assert_eq!(
        outcome,
        Outcome::TooFewTaxa {
            label: "fam".into(),
            count: 3
        }
    );
    assert_eq!(
        outcome.to_string(),
        "fam Count of taxa 3 less than minimum 4 taxa\n"
    );
    assert_eq!(fs::read_dir(fixture.odir()).unwrap().count(), 0);
}

#[test]
fn test_empty_file_has_no_taxa() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input("fam.fasta", "");

    let outcome = pipeline::run(&input, fixture.config(), &fixture.phyml_toolbox()).unwrap();
    assert_eq!(outcome.to_string(), "fam No taxa\n");
    assert!(outcome.is_skip());
}

#[test]
fn test_three_distinct_of_five_proceeds() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input(
        "fam.aln",
        ">s1\nMKVLAAGTTR\n>s2\nMKVLAAGTTR\n>s3\nMKVLAAGTTR\n>s4\nMKILAAGTSR\n>s5\nMRVLAAGTTK\n",
    );
    let config = fixture
        .config()
        .with_alignment_input(AlignmentInput::Supplied);

    let outcome = pipeline::run(&input, config, &fixture.phyml_toolbox()).unwrap();

    // s1 stands for three sequences, so the adjusted mean drops below the mean
    assert_eq!(
        outcome.report().unwrap().to_string(),
        "fam\tMedLen 10.00\tMean 0.2\tAdjmean 0.14\tAdj_mean_per_site100 1.40000\tN 3\tNTaxa 5"
    );
}

#[test]
fn test_two_distinct_of_five_is_too_few() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input(
        "fam.aln",
        ">s1\nMKVLAAGTTR\n>s2\nMKVLAAGTTR\n>s3\nMKVLAAGTTR\n>s4\nMKILAAGTSR\n>s5\nmkilaagtsr\n",
    );
    let config = fixture
        .config()
        .with_alignment_input(AlignmentInput::Supplied);

    let outcome = pipeline::run(&input, config, &fixture.phyml_toolbox()).unwrap();

    assert_eq!(
        outcome,
        Outcome::TooFewAfterDedup {
            label: "fam".into(),
            original: 5,
            remaining: 2
        }
    );
    assert!(!fixture.odir().join("fam.tree").exists());
    assert!(fixture.scratch_dirs().is_empty());
}

// --- FATAL ERRORS ---
#[test]
fn test_length_mismatch_aborts_before_output() {
    let _guard = lock();
    let fixture = Fixture::new();
    let long = "M".repeat(100);
    let short = "M".repeat(98);
    let input = fixture.input(
        "fam.aln",
        &format!(">a\n{long}\n>b\nA{}\n>c\nK{}\n>d\n{short}\n", &long[1..], &long[1..]),
    );
    let config = fixture
        .config()
        .with_alignment_input(AlignmentInput::Supplied);

    let err = pipeline::run(&input, config, &fixture.phyml_toolbox()).unwrap_err();

    assert!(matches!(
        err,
        Error::LengthMismatch {
            expected: 100,
            found: 98,
            ..
        }
    ));
    assert_eq!(fs::read_dir(fixture.odir()).unwrap().count(), 0);
}

#[test]
fn test_missing_tree_output_is_fatal() {
    let _guard = lock();
    let fixture = Fixture::new();
    let input = fixture.input("fam.fasta", SIX_SEQUENCES);
    let muscle = fixture.install("muscle", FAKE_MUSCLE);
    let phyml = fixture.install("phyml", BROKEN_PHYML);
    let toolbox = Toolbox::new(Some(muscle), TreeProgram::Phyml, phyml);

    let err = pipeline::run(&input, fixture.config(), &toolbox).unwrap_err();

    match err {
        Error::MissingToolOutput { tool, path } => {
            assert_eq!(tool, "phyml");
            assert!(path.ends_with("fam.phylip_phyml_tree.txt"));
        }
        other => panic!("expected missing tool output, got {other:?}"),
    }
    assert!(fixture.scratch_dirs().is_empty());
}

#[test]
fn test_missing_input_is_fatal() {
    let _guard = lock();
    let fixture = Fixture::new();
    let err = pipeline::run(
        fixture.path().join("nope.fasta"),
        fixture.config(),
        &fixture.phyml_toolbox(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InputNotFound(_)));
}

// --- COMMAND LINE ---
fn evodist(fixture: &Fixture, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_evodist"))
        .args(args)
        .current_dir(fixture.path())
        .env("PATH", format!("{}:/usr/bin:/bin", fixture.bin().display()))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_cli_report_on_stdout() {
    let _guard = lock();
    let fixture = Fixture::new();
    fixture.phyml_toolbox();
    fixture.input("fam.fasta", SIX_SEQUENCES);

    let output = evodist(&fixture, &["--odir", "out", "fam.fasta"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{SIX_SEQUENCES_REPORT}\n")
    );
    assert!(fixture.odir().join("fam.tree").is_file());
}

#[test]
fn test_cli_skip_exits_zero() {
    let _guard = lock();
    let fixture = Fixture::new();
    fixture.phyml_toolbox();
    fixture.input("fam.fasta", ">a\nMKV\n>b\nMKL\n>c\nMRV\n");

    let output = evodist(&fixture, &["fam.fasta"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "fam Count of taxa 3 less than minimum 4 taxa\n"
    );
}

#[test]
fn test_cli_fatal_errors_exit_one() {
    let _guard = lock();
    let fixture = Fixture::new();
    fixture.phyml_toolbox();

    let missing_input = evodist(&fixture, &["nope.fasta"]);
    assert_eq!(missing_input.status.code(), Some(1));
    assert!(missing_input.stdout.is_empty());
    assert!(String::from_utf8_lossy(&missing_input.stderr).contains("nope.fasta"));

    let unknown_option = evodist(&fixture, &["--bogus", "fam.fasta"]);
    assert_eq!(unknown_option.status.code(), Some(1));

    let no_input = evodist(&fixture, &[]);
    assert_eq!(no_input.status.code(), Some(1));

    let help = evodist(&fixture, &["--help"]);
    assert_eq!(help.status.code(), Some(0));
}

#[test]
fn test_cli_missing_tool_exits_one() {
    let _guard = lock();
    let fixture = Fixture::new();
    fixture.install("phyml", FAKE_PHYML);
    fixture.input("fam.fasta", SIX_SEQUENCES);

    // muscle is only searched for when the alignment is computed
    let with_msa = evodist(&fixture, &["--my-msa", "--odir", "out", "fam.fasta"]);
    assert_eq!(with_msa.status.code(), Some(0));

    let without = evodist(&fixture, &["--tree-builder", "neighbor", "fam.fasta"]);
    assert_eq!(without.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&without.stderr).contains("Cannot find the application"));
}

#[test]
fn test_cli_fatal_error_survives_logging_off() {
    let _guard = lock();
    let fixture = Fixture::new();
    fixture.phyml_toolbox();

    let output = Command::new(env!("CARGO_BIN_EXE_evodist"))
        .arg("nope.fasta")
        .current_dir(fixture.path())
        .env("PATH", format!("{}:/usr/bin:/bin", fixture.bin().display()))
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.fasta"));
}
