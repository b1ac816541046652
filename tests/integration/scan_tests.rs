use dirdupe::duplicates::{DirectoryFinder, FinderConfig};
use dirdupe::scanner::{build_tree, ScanConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn mkdirs(root: &Path, paths: &[&str]) {
    for p in paths {
        fs::create_dir_all(root.join(p)).unwrap();
    }
}

fn seven_directories(root: &Path) {
    mkdirs(
        root,
        &[
            "a/b/c/d/e/f",
            "b/b/c/d/e/f",
            "c/a/b",
            "d/b/c",
            "e/b/c/d/e/g",
            "f/b/c/d/e/f",
            "f/b/c/d/e/g",
        ],
    );
}

#[test]
fn test_seven_directories_structural_equality() {
    let dir = tempdir().unwrap();
    seven_directories(dir.path());

    let tree = build_tree(dir.path(), &ScanConfig::default()).unwrap();
    let names = ["a", "b", "c", "d", "e", "f"];

    for (i, x) in names.iter().enumerate() {
        for y in &names[i + 1..] {
            let left = tree.find(&dir.path().join(x)).unwrap();
            let right = tree.find(&dir.path().join(y)).unwrap();
            let equal = tree.same_structure(left, right);
            assert_eq!(equal, (*x, *y) == ("a", "b"), "{x} vs {y}");
        }
    }
}

#[test]
fn test_seven_directories_single_group() {
    let dir = tempdir().unwrap();
    seven_directories(dir.path());

    let (groups, summary) = DirectoryFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths,
        vec![dir.path().join("a"), dir.path().join("b")]
    );
    assert_eq!(groups[0].depth, 5);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.max_depth, 6);
    assert!(summary.collision_mismatches.is_empty());
}

#[test]
fn test_empty_directories_form_group() {
    let dir = tempdir().unwrap();
    mkdirs(dir.path(), &["empty1", "empty2"]);
    fs::write(dir.path().join("notes.txt"), "x").unwrap();

    let (groups, _) = DirectoryFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].entry_count, 0);
    assert_eq!(groups[0].depth, 0);
    assert_eq!(
        groups[0].paths,
        vec![dir.path().join("empty1"), dir.path().join("empty2")]
    );
}

#[test]
fn test_group_dropped_when_representative_is_nested() {
    // The empty leaves a/x, b/x and z share one fingerprint. The group's
    // first member a/x sits inside the duplicated pair {a, b}, so the whole
    // group is dropped even though z is not nested anywhere.
    let dir = tempdir().unwrap();
    mkdirs(dir.path(), &["a/x", "b/x", "z"]);

    let (groups, summary) = DirectoryFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths,
        vec![dir.path().join("a"), dir.path().join("b")]
    );
    assert_eq!(summary.dominated_groups, 1);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    seven_directories(dir.path());
    mkdirs(dir.path(), &["g/one", "h/one", "i"]);
    fs::write(dir.path().join("g/one/file"), "1").unwrap();
    fs::write(dir.path().join("h/one/file"), "2").unwrap();

    let finder = DirectoryFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_file_contents_do_not_matter() {
    let dir = tempdir().unwrap();
    mkdirs(dir.path(), &["left", "right"]);
    fs::write(dir.path().join("left/data.bin"), vec![0u8; 4096]).unwrap();
    fs::write(dir.path().join("right/data.bin"), "short").unwrap();

    let (groups, _) = DirectoryFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].entry_count, 1);
}

#[test]
fn test_ignored_names_do_not_affect_grouping() {
    let dir = tempdir().unwrap();
    mkdirs(dir.path(), &["p/.git/objects", "p/src", "q/src"]);

    let (groups, _) = DirectoryFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![dir.path().join("p"), dir.path().join("q")]);

    let scan = ScanConfig::default().with_ignore(std::iter::empty::<&str>());
    let config = FinderConfig::default().with_scan_config(scan);
    let (groups, _) = DirectoryFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();
    assert!(groups
        .iter()
        .all(|g| !g.paths.contains(&dir.path().join("p"))));
}

#[test]
fn test_custom_ignore_name() {
    let dir = tempdir().unwrap();
    mkdirs(dir.path(), &["app1/target/debug", "app1/src", "app2/src"]);
    fs::write(dir.path().join("app1/Cargo.toml"), "").unwrap();
    fs::write(dir.path().join("app2/Cargo.toml"), "").unwrap();

    let scan = ScanConfig::default().ignoring(["target"]);
    let (groups, _) = DirectoryFinder::new(FinderConfig::default().with_scan_config(scan))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths,
        vec![dir.path().join("app1"), dir.path().join("app2")]
    );
}

#[test]
fn test_three_way_group() {
    let dir = tempdir().unwrap();
    for name in ["x", "y", "z"] {
        mkdirs(dir.path(), &[format!("{name}/docs/img").as_str()]);
        fs::write(dir.path().join(name).join("docs/readme.md"), name).unwrap();
    }

    let (groups, summary) = DirectoryFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(summary.duplicate_directories, 2);
}

// Nested `d` chain below `base`, returned deepest last.
fn deep_chain(base: &Path, levels: usize) -> Vec<std::path::PathBuf> {
    let mut chain = vec![base.to_path_buf()];
    fs::create_dir(base).unwrap();
    for _ in 0..levels {
        let next = chain[chain.len() - 1].join("d");
        fs::create_dir(&next).unwrap();
        chain.push(next);
    }
    chain
}

#[test]
fn test_very_deep_duplicate_trees() {
    let dir = tempdir().unwrap();
    let left = deep_chain(&dir.path().join("a"), 1000);
    let right = deep_chain(&dir.path().join("b"), 1000);

    let result = DirectoryFinder::with_defaults().find_duplicates(dir.path());

    // Remove bottom-up so the temp dir cleanup stays shallow.
    for path in left.iter().chain(right.iter()).rev() {
        fs::remove_dir(path).unwrap();
    }

    let (groups, summary) = result.unwrap();
    assert_eq!(summary.directories_scanned, 2003);
    assert_eq!(summary.max_depth, 1001);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].depth, 1000);
    assert_eq!(
        groups[0].paths,
        vec![dir.path().join("a"), dir.path().join("b")]
    );
}

#[test]
fn test_io_thread_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    seven_directories(dir.path());

    let run = |threads: usize| {
        let scan = ScanConfig::default().with_io_threads(threads);
        DirectoryFinder::new(FinderConfig::default().with_scan_config(scan))
            .find_duplicates(dir.path())
            .unwrap()
            .0
    };

    assert_eq!(run(1), run(8));
}

#[cfg(unix)]
#[test]
fn test_relative_root_reports_absolute_paths() {
    let dir = tempdir().unwrap();
    mkdirs(dir.path(), &["r/a/x", "r/b/x"]);
    let cwd = std::env::current_dir().unwrap();
    let relative = pathdiff(dir.path(), &cwd);

    let (groups, _) = DirectoryFinder::with_defaults()
        .find_duplicates(&relative.join("r"))
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert!(groups[0].paths.iter().all(|p| p.is_absolute()));
}

// Path of `target` relative to `base`, via enough `..` components.
#[cfg(unix)]
fn pathdiff(target: &Path, base: &Path) -> std::path::PathBuf {
    let mut rel = std::path::PathBuf::new();
    for _ in base.components().skip(1) {
        rel.push("..");
    }
    rel.join(target.strip_prefix("/").unwrap_or(target))
}
