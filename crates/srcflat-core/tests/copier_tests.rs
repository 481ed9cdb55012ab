use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use srcflat_core::{
    copy_flat, AppConfig, CopyPlan, Engine, Error, Extension, SilentReporter, SourceRootKind,
};

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn java() -> Extension {
    Extension::parse("java").unwrap()
}

fn dir_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_flattens_with_collision_rename() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write(&src.join("a/X.java"), "a");
    write(&src.join("b/X.java"), "b");
    write(&src.join("c/Y.java"), "c");

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();

    assert_eq!(result.processed, 3);
    assert_eq!(result.renamed, 1);
    assert_eq!(result.failed, 0);
    assert_eq!(result.destination, dest);
    assert_eq!(dir_names(&dest), names(&["X.java", "X_1.java", "Y.java"]));

    // traversal is sorted, so a/ is copied before b/
    assert_eq!(fs::read_to_string(dest.join("X.java")).unwrap(), "a");
    assert_eq!(fs::read_to_string(dest.join("X_1.java")).unwrap(), "b");
    assert_eq!(fs::read_to_string(dest.join("Y.java")).unwrap(), "c");
}

#[test]
fn test_k_collisions_number_sequentially() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    for dir in ["d0", "d1", "d2", "d3", "d4"] {
        write(&src.join(dir).join("Foo.java"), dir);
    }

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();

    let written: Vec<String> = result.copied.iter().map(|r| r.destination_name()).collect();
    assert_eq!(
        written,
        vec!["Foo.java", "Foo_1.java", "Foo_2.java", "Foo_3.java", "Foo_4.java"]
    );
    assert_eq!(result.renamed, 4);
    assert!(!result.copied[0].renamed);
    assert!(result.copied[1..].iter().all(|r| r.renamed));
}

#[test]
fn test_only_matching_extension_is_copied_once() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write(&src.join("App.java"), "app");
    write(&src.join("pkg/Util.java"), "util");
    write(&src.join("pkg/deep/er/Model.java"), "model");
    write(&src.join("pkg/notes.txt"), "txt");
    write(&src.join("pkg/Upper.JAVA"), "upper");
    write(&src.join("pkg/App.javax"), "javax");
    fs::create_dir_all(src.join("empty.java")).unwrap();

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();

    assert_eq!(result.processed, 3);
    assert_eq!(result.renamed, 0);
    assert_eq!(
        dir_names(&dest),
        names(&["App.java", "Util.java", "Model.java"])
    );

    let sources: BTreeSet<_> = result.copied.iter().map(|r| r.source.clone()).collect();
    assert_eq!(sources.len(), 3);
    assert!(sources.contains(&src.join("pkg/deep/er/Model.java")));
}

#[test]
fn test_second_run_never_overwrites() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write(&src.join("one/A.java"), "A");
    write(&src.join("two/B.java"), "B");
    write(&src.join("three/C.java"), "C");
    let plan = CopyPlan::new(&src, &dest, java());

    let first = copy_flat(&plan, &SilentReporter).unwrap();
    assert_eq!(first.renamed, 0);

    // edit the first copy; a second run must leave it alone
    fs::write(dest.join("A.java"), "edited").unwrap();

    let second = copy_flat(&plan, &SilentReporter).unwrap();
    assert_eq!(second.processed, 3);
    assert_eq!(second.renamed, 3);
    assert_eq!(
        dir_names(&dest),
        names(&["A.java", "A_1.java", "B.java", "B_1.java", "C.java", "C_1.java"])
    );
    assert_eq!(fs::read_to_string(dest.join("A.java")).unwrap(), "edited");
    assert_eq!(fs::read_to_string(dest.join("A_1.java")).unwrap(), "A");
}

#[test]
fn test_existing_numbered_names_are_skipped() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write(&src.join("Foo.java"), "new");
    write(&dest.join("Foo.java"), "old");
    write(&dest.join("Foo_1.java"), "old1");

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();

    assert_eq!(result.renamed, 1);
    assert_eq!(result.copied[0].destination, dest.join("Foo_2.java"));
    assert_eq!(fs::read_to_string(dest.join("Foo_1.java")).unwrap(), "old1");
    assert_eq!(fs::read_to_string(dest.join("Foo_2.java")).unwrap(), "new");
}

#[test]
fn test_no_qualifying_files_is_not_an_error() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("nested/dest");
    write(&src.join("README.md"), "readme");

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.processed, 0);
    // destination (and parents) are still created
    assert!(dest.is_dir());
    assert!(dir_names(&dest).is_empty());
}

#[test]
fn test_dry_run_plans_names_without_writing() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write(&src.join("a/X.java"), "a");
    write(&src.join("b/X.java"), "b");

    let plan = CopyPlan::new(&src, &dest, java()).with_dry_run(true);
    let result = copy_flat(&plan, &SilentReporter).unwrap();

    assert_eq!(result.processed, 2);
    assert_eq!(result.renamed, 1);
    assert_eq!(result.copied[1].destination, dest.join("X_1.java"));
    assert!(!dest.exists());
}

#[test]
fn test_destination_inside_source_is_not_reread() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("project");
    let dest = src.join("zz-flat");
    write(&src.join("a/X.java"), "a");
    write(&src.join("b/X.java"), "b");

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();

    assert_eq!(result.processed, 2);
    assert_eq!(dir_names(&dest), names(&["X.java", "X_1.java"]));
}

#[test]
fn test_missing_source_is_an_error() {
    let tmp = tempdir().unwrap();
    let plan = CopyPlan::new(tmp.path().join("missing"), tmp.path().join("dest"), java());

    let err = copy_flat(&plan, &SilentReporter).unwrap_err();
    assert!(matches!(err, Error::SourceNotDirectory(_)));
}

#[test]
fn test_destination_that_is_a_file_is_fatal() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write(&src.join("A.java"), "a");
    write(&dest, "not a directory");

    let err = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap_err();

    assert!(matches!(err, Error::DestinationInit { ref path, .. } if path == &dest));
    assert_eq!(fs::read_to_string(&dest).unwrap(), "not a directory");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_names_are_copied_verbatim() {
    use std::ffi::{OsStr, OsString};
    use std::os::unix::ffi::OsStrExt;

    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    let latin1 = OsStr::from_bytes(b"Caf\xe9.java");
    let invalid = OsStr::from_bytes(b"Caf\xff.java");
    fs::create_dir_all(src.join("a")).unwrap();
    fs::create_dir_all(src.join("b")).unwrap();

    // Some filesystems only accept UTF-8 names; nothing to check there.
    if fs::write(src.join("a").join(latin1), "a").is_err()
        || fs::write(src.join("b").join(invalid), "b").is_err()
    {
        return;
    }

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();

    assert_eq!(result.processed, 2);
    assert_eq!(result.renamed, 0);
    let written: BTreeSet<OsString> = fs::read_dir(&dest)
        .unwrap()
        .flatten()
        .map(|entry| entry.file_name())
        .collect();
    let expected: BTreeSet<OsString> =
        [latin1.to_os_string(), invalid.to_os_string()].into_iter().collect();
    assert_eq!(written, expected);
    assert_eq!(fs::read_to_string(dest.join(latin1)).unwrap(), "a");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_collision_keeps_original_bytes() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    let name = OsStr::from_bytes(b"Caf\xe9.java");
    fs::create_dir_all(src.join("a")).unwrap();
    fs::create_dir_all(src.join("b")).unwrap();

    if fs::write(src.join("a").join(name), "a").is_err() {
        return;
    }
    fs::write(src.join("b").join(name), "b").unwrap();

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();

    assert_eq!(result.renamed, 1);
    assert_eq!(
        result.copied[1].destination,
        dest.join(OsStr::from_bytes(b"Caf\xe9_1.java"))
    );
    assert_eq!(
        fs::read_to_string(dest.join(OsStr::from_bytes(b"Caf\xe9_1.java"))).unwrap(),
        "b"
    );
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_and_counted() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write(&src.join("a/Locked.java"), "secret");
    write(&src.join("b/Open.java"), "open");
    let locked = src.join("a/Locked.java");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::File::open(&locked).is_ok() {
        return;
    }

    let result = copy_flat(&CopyPlan::new(&src, &dest, java()), &SilentReporter).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(result.processed, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.failures[0].source, locked);
    assert_eq!(dir_names(&dest), names(&["Open.java"]));
}

#[test]
fn test_engine_copies_selected_project_into_named_destination() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("IdeaProjects");
    let dest_root = tmp.path().join("CODE");
    write(&root.join("shop/pom.xml"), "<project/>");
    write(&root.join("shop/src/main/java/com/shop/Cart.java"), "cart");
    write(&root.join("shop/src/main/java/com/shop/model/Item.java"), "item");
    write(&root.join("shop/src/test/java/com/shop/CartTest.java"), "test");

    let config = AppConfig {
        projects_root: root.clone(),
        destination_root: dest_root.clone(),
        ..AppConfig::default()
    };
    let engine = Engine::new(&config).unwrap();

    let projects = engine.discover(&SilentReporter).unwrap();
    let shop = projects.iter().find(|p| p.label == "shop").unwrap();

    let plan = engine.plan_for(shop);
    assert_eq!(plan.source.kind, SourceRootKind::Layout);
    assert_eq!(plan.copy.destination, dest_root.join("shop"));

    let result = engine.copy(&plan, &SilentReporter).unwrap();
    assert_eq!(result.processed, 2);
    assert_eq!(
        dir_names(&dest_root.join("shop")),
        names(&["Cart.java", "Item.java"])
    );
}
