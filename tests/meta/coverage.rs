//! Structural checks keeping `tests/unit` a mirror of `src`

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";
    const TESTS_DIR: &str = "tests";

    // Files that only wire modules together or start the binary
    fn is_wiring(relative: &str) -> bool {
        relative == "lib.rs" || relative == "main.rs" || relative.ends_with("mod.rs")
    }

    // Relative paths of every `.rs` file below `root`
    fn rust_files(root: &Path) -> io::Result<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }
                if path.extension().is_some_and(|ext| ext == "rs") {
                    let relative = path
                        .strip_prefix(root)
                        .map_err(io::Error::other)?
                        .to_string_lossy()
                        .replace('\\', "/");
                    found.insert(relative);
                }
            }
        }

        Ok(found)
    }

    fn mirrored(root: &str) -> BTreeSet<String> {
        rust_files(Path::new(root))
            .unwrap_or_default()
            .into_iter()
            .filter(|relative| !is_wiring(relative))
            .collect()
    }

    // Tests every source module has a unit test file at the same relative path
    // Verified by deleting tests/unit/mosaic/grid.rs
    #[test]
    fn test_every_module_has_unit_tests() {
        let sources = mirrored(SRC_DIR);
        let units = mirrored(UNIT_DIR);

        assert!(!sources.is_empty(), "no source files found under {SRC_DIR}");
        let missing: Vec<_> = sources.difference(&units).collect();
        assert!(
            missing.is_empty(),
            "source files without unit tests: {missing:?}"
        );
    }

    // Tests no unit test file outlives its source module
    // Verified by adding tests/unit/io/unused.rs
    #[test]
    fn test_no_orphaned_unit_tests() {
        let sources = mirrored(SRC_DIR);
        let units = mirrored(UNIT_DIR);

        let orphaned: Vec<_> = units.difference(&sources).collect();
        assert!(
            orphaned.is_empty(),
            "unit tests without source files: {orphaned:?}"
        );
    }

    // Tests every test file declares at least one test
    // Verified by emptying tests/unit/io/progress.rs
    #[test]
    fn test_every_test_file_has_tests() {
        let files = rust_files(Path::new(TESTS_DIR)).unwrap_or_default();

        let empty: Vec<_> = files
            .iter()
            .filter(|relative| !is_wiring(relative))
            .filter(|relative| {
                !fs::read_to_string(Path::new(TESTS_DIR).join(relative))
                    .is_ok_and(|content| content.contains("#[test]"))
            })
            .collect();

        assert!(empty.is_empty(), "test files without tests: {empty:?}");
    }
}
