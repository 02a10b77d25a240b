use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use kavvka_core::config::{AppConfig, PartitionRoot};
use kavvka_core::paths::to_forward_slashes;
use kavvka_core::{
    AutoOperator, BatchState, InputFailure, PartitionEngine, ScriptedOperator, SilentObserver,
};

fn count_dirs(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.flatten().filter(|e| e.path().is_dir()).count())
        .unwrap_or(0)
}

/// Create an artist tree.
/// Layout:
///   art/
///     Alice[9]/
///       book1          (file, the input)
///       sketches/
///       wip/
///     Bob[3]/
///       set2           (file, the input)
///       scans/
///       extras/
fn create_art_tree(root: &Path) -> PathBuf {
    let art = root.join("art");
    for (artist, input, siblings) in [
        ("Alice[9]", "book1", ["sketches", "wip"]),
        ("Bob[3]", "set2", ["scans", "extras"]),
    ] {
        let dir = art.join(artist);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(input), b"archive").unwrap();
        for sibling in siblings {
            fs::create_dir_all(dir.join(sibling)).unwrap();
            fs::write(dir.join(sibling).join("page.jpg"), sibling.as_bytes()).unwrap();
        }
    }
    art
}

fn inputs(art: &Path) -> Vec<String> {
    vec![
        art.join("Alice[9]").join("book1").to_string_lossy().into_owned(),
        art.join("Bob[3]").join("set2").to_string_lossy().into_owned(),
    ]
}

fn batch_config() -> AppConfig {
    AppConfig {
        interactive: false,
        ..AppConfig::default()
    }
}

#[test]
fn test_full_partition_pipeline() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());
    let art_str = to_forward_slashes(&art);

    let engine = PartitionEngine::new(batch_config());
    let result = engine
        .run(&inputs(&art), &mut AutoOperator, &SilentObserver)
        .unwrap();

    assert_eq!(result.state, BatchState::Committed);
    assert_eq!(result.total, 2);
    assert_eq!(result.succeeded, 2);
    assert!(result.is_full_success());
    assert_eq!(result.moved_count(), 4);
    assert_eq!(result.failed_move_count(), 0);

    let descriptors: Vec<String> = result.descriptors().iter().map(|d| d.to_string()).collect();
    assert_eq!(
        descriptors,
        vec![
            format!("{}/Alice[9];{}/Alice[9]/#compare", art_str, art_str),
            format!("{}/Bob[3];{}/Bob[3]/#compare", art_str, art_str),
        ]
    );

    // Siblings now live in the compare folders, the inputs stay put.
    let alice = art.join("Alice[9]");
    assert!(alice.join("#compare").join("sketches").join("page.jpg").is_file());
    assert!(alice.join("#compare").join("wip").is_dir());
    assert!(!alice.join("sketches").exists());
    assert!(alice.join("book1").is_file());
    assert_eq!(count_dirs(&alice), 1);
    assert_eq!(count_dirs(&art.join("Bob[3]").join("#compare")), 2);

    assert_eq!(result.flattened_paths().len(), 4);
}

#[test]
fn test_cancel_leaves_filesystem_untouched() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());

    let engine = PartitionEngine::new(AppConfig::default());
    let mut operator = ScriptedOperator::new(["1 1", "q"]);
    let result = engine
        .run(&inputs(&art), &mut operator, &SilentObserver)
        .unwrap();

    assert_eq!(result.state, BatchState::Cancelled);
    assert_eq!(result.succeeded, 0);
    assert!(result.descriptors().is_empty());
    for record in &result.records {
        assert_eq!(record.failure, Some(InputFailure::Cancelled));
    }

    assert!(!art.join("Alice[9]").join("#compare").exists());
    assert!(!art.join("Bob[3]").join("#compare").exists());
    assert_eq!(count_dirs(&art.join("Alice[9]")), 2);
    assert_eq!(count_dirs(&art.join("Bob[3]")), 2);
}

#[test]
fn test_closed_input_cancels() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());

    let engine = PartitionEngine::new(AppConfig::default());
    let mut operator = ScriptedOperator::new(Vec::<String>::new()).ending_with_eof();
    let result = engine
        .run(&inputs(&art), &mut operator, &SilentObserver)
        .unwrap();

    assert_eq!(result.state, BatchState::Cancelled);
    assert!(!art.join("Alice[9]").join("#compare").exists());
}

#[test]
fn test_invalid_commands_are_retried() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());

    let engine = PartitionEngine::new(AppConfig {
        force: true,
        ..AppConfig::default()
    });
    let mut operator = ScriptedOperator::new(["9 1", "1 7", "what"]);
    let result = engine
        .run(&inputs(&art), &mut operator, &SilentObserver)
        .unwrap();

    let diagnostics = operator
        .messages()
        .iter()
        .filter(|m| m.starts_with("❌"))
        .count();
    assert_eq!(diagnostics, 3);
    assert_eq!(result.state, BatchState::Committed);
    assert_eq!(result.succeeded, 2);
}

#[test]
fn test_operator_override_selects_other_candidate() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());
    let alice = art.join("Alice[9]");
    let nested = alice.join("Collab[2]");
    fs::create_dir_all(&nested).unwrap();

    let engine = PartitionEngine::new(batch_config());
    let mut operator = ScriptedOperator::new(["1 2"]);
    let result = engine
        .run(&inputs(&art)[..1], &mut operator, &SilentObserver)
        .unwrap();

    let record = &result.records[0];
    assert_eq!(record.chosen_folder.as_deref(), Some(nested.as_path()));
    assert_eq!(record.compare_folder, Some(nested.join("#compare")));
    assert_eq!(record.moved_count(), 2);
    assert!(nested.join("#compare").join("sketches").is_dir());
    // The chosen folder itself was not moved.
    assert!(nested.is_dir());
}

#[test]
fn test_unresolved_inputs_are_recorded_and_skipped() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    let art = create_art_tree(&root);
    let unmarked = root.join("loose").join("pile");
    fs::create_dir_all(&unmarked).unwrap();

    let mut all = inputs(&art);
    all.insert(0, root.join("nowhere").to_string_lossy().into_owned());
    all.insert(1, unmarked.to_string_lossy().into_owned());

    let engine = PartitionEngine::new(batch_config());
    let result = engine.run(&all, &mut AutoOperator, &SilentObserver).unwrap();

    assert_eq!(result.total, 4);
    assert_eq!(result.succeeded, 2);
    assert!(!result.is_full_success());
    assert_eq!(result.records[0].failure, Some(InputFailure::NotFound));
    assert_eq!(result.records[1].failure, Some(InputFailure::NoMarkedFolder));
    assert!(result.records[2].success);
    assert!(result.records[3].success);
}

#[test]
fn test_compare_folder_failure_is_local() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());
    fs::write(art.join("Alice[9]").join("#compare"), b"in the way").unwrap();

    let engine = PartitionEngine::new(batch_config());
    let result = engine
        .run(&inputs(&art), &mut AutoOperator, &SilentObserver)
        .unwrap();

    assert!(matches!(
        result.records[0].failure,
        Some(InputFailure::CompareFolderCreate(_))
    ));
    assert!(!result.records[0].success);
    assert!(art.join("Alice[9]").join("sketches").is_dir());

    assert!(result.records[1].success);
    assert_eq!(result.records[1].moved_count(), 2);
}

#[test]
fn test_declined_confirmation_moves_nothing() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());

    let engine = PartitionEngine::new(AppConfig::default());
    let mut operator = ScriptedOperator::new(Vec::<String>::new()).with_confirmation(false);
    let result = engine
        .run(&inputs(&art), &mut operator, &SilentObserver)
        .unwrap();

    assert_eq!(result.state, BatchState::Committed);
    assert_eq!(result.succeeded, 0);
    for record in &result.records {
        assert_eq!(record.failure, Some(InputFailure::Declined));
    }
    assert!(!art.join("Alice[9]").join("#compare").exists());
}

#[test]
fn test_input_parent_partitions_around_directory_input() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    let artist = root.join("Carol[1]");
    for name in ["book1", "book2", "book3"] {
        fs::create_dir_all(artist.join(name)).unwrap();
    }
    let input = artist.join("book1").to_string_lossy().into_owned();

    let engine = PartitionEngine::new(AppConfig {
        partition_root: PartitionRoot::InputParent,
        ..batch_config()
    });
    let result = engine
        .run(&[input], &mut AutoOperator, &SilentObserver)
        .unwrap();

    assert_eq!(result.moved_count(), 3);
    assert_eq!(count_dirs(&artist), 1);
    assert_eq!(count_dirs(&artist.join("#compare")), 3);
}

#[test]
fn test_dry_run_plans_without_mutation() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());

    let engine = PartitionEngine::new(batch_config());
    let report = engine
        .plan(&inputs(&art), &mut AutoOperator, &SilentObserver)
        .unwrap();

    assert_eq!(report.state, BatchState::Committed);
    assert_eq!(report.plans.len(), 2);
    assert!(report.skipped.is_empty());
    assert_eq!(report.plans.iter().map(|p| p.moves.len()).sum::<usize>(), 4);
    assert!(!art.join("Alice[9]").join("#compare").exists());
    assert_eq!(count_dirs(&art.join("Alice[9]")), 2);
}

#[test]
fn test_rerun_suffixes_colliding_names() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());
    let alice = art.join("Alice[9]");
    let input = inputs(&art)[..1].to_vec();
    let engine = PartitionEngine::new(batch_config());

    engine.run(&input, &mut AutoOperator, &SilentObserver).unwrap();
    fs::create_dir_all(alice.join("sketches")).unwrap();
    let second = engine.run(&input, &mut AutoOperator, &SilentObserver).unwrap();

    let record = &second.records[0];
    assert_eq!(record.moved_count(), 1);
    let target = &record.moves[0].target;
    let name = target.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("sketches_"), "unexpected target {}", name);
    assert!(alice.join("#compare").join("sketches").join("page.jpg").is_file());
    assert_eq!(count_dirs(&alice.join("#compare")), 3);
}

#[test]
fn test_dry_run_targets_follow_existing_compare_folder() {
    let tmp = tempdir().unwrap();
    let art = create_art_tree(&fs::canonicalize(tmp.path()).unwrap());
    let compare = art.join("Alice[9]").join("#compare");
    fs::create_dir_all(compare.join("sketches")).unwrap();
    let input = inputs(&art)[..1].to_vec();
    let engine = PartitionEngine::new(batch_config());

    let report = engine
        .plan(&input, &mut AutoOperator, &SilentObserver)
        .unwrap();
    let planned: Vec<String> = report.plans[0]
        .moves
        .iter()
        .map(|m| m.target.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(planned.len(), 2);
    assert!(planned[0].starts_with("sketches_"), "unexpected target {}", planned[0]);
    assert_eq!(planned[1], "wip");

    let result = engine.run(&input, &mut AutoOperator, &SilentObserver).unwrap();
    let record = &result.records[0];
    assert_eq!(record.moved_count(), 2);
    assert_eq!(record.moves[0].source, report.plans[0].moves[0].source);
    let moved = record.moves[0].target.file_name().unwrap().to_string_lossy();
    assert!(moved.starts_with("sketches_"), "unexpected target {}", moved);
    assert_eq!(record.moves[1].target, report.plans[0].moves[1].target);
}

#[test]
fn test_input_moved_by_earlier_input_is_not_found() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    let artist = root.join("Alice[9]");
    for name in ["book2", "sketches"] {
        fs::create_dir_all(artist.join(name)).unwrap();
    }
    let all = vec![
        artist.to_string_lossy().into_owned(),
        artist.join("book2").to_string_lossy().into_owned(),
    ];

    let engine = PartitionEngine::new(batch_config());
    let result = engine.run(&all, &mut AutoOperator, &SilentObserver).unwrap();

    assert!(result.records[0].success);
    assert_eq!(result.records[0].moved_count(), 2);
    assert!(artist.join("#compare").join("book2").is_dir());

    let second = &result.records[1];
    assert!(!second.success);
    assert_eq!(second.failure, Some(InputFailure::NotFound));
    assert!(second.descriptor.is_none());
    assert!(second.moves.is_empty());
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.descriptors().len(), 1);
}
