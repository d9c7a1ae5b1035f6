//! Checks that every source file has a mirrored unit test file

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    const SRC: &str = "src";
    const UNIT: &str = "tests/unit";

    /// Relative paths of all `.rs` files below `root`
    fn rust_files(root: &Path) -> io::Result<BTreeSet<PathBuf>> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "rs") {
                    let relative = path
                        .strip_prefix(root)
                        .map_err(|_| io::Error::other("entry outside scanned root"))?;
                    found.insert(relative.to_path_buf());
                }
            }
        }
        Ok(found)
    }

    /// Files that only declare modules or start a harness
    fn declares_modules_only(path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name == "mod.rs" || name == "main.rs" || name == "lib.rs")
    }

    fn listing(paths: &[&PathBuf]) -> String {
        paths
            .iter()
            .map(|path| format!("  - {}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_every_source_file_has_unit_tests() {
        let Ok(sources) = rust_files(Path::new(SRC)) else {
            assert!(!Path::new(SRC).exists(), "src is not readable");
            return;
        };
        let units = rust_files(Path::new(UNIT)).unwrap_or_default();

        let untested: Vec<_> = sources
            .iter()
            .filter(|path| !declares_modules_only(path) && !units.contains(*path))
            .collect();
        assert!(
            untested.is_empty(),
            "Source files without a file of the same path under {UNIT}:\n{}",
            listing(&untested)
        );
    }

    #[test]
    fn test_every_unit_test_mirrors_a_source_file() {
        let sources = rust_files(Path::new(SRC)).unwrap_or_default();
        let Ok(units) = rust_files(Path::new(UNIT)) else {
            return;
        };

        let orphans: Vec<_> = units
            .iter()
            .filter(|path| !declares_modules_only(path) && !sources.contains(*path))
            .collect();
        assert!(
            orphans.is_empty(),
            "Unit test files with no matching file under {SRC}:\n{}",
            listing(&orphans)
        );
    }

    #[test]
    fn test_test_files_declare_tests() {
        let root = Path::new("tests");
        let Ok(files) = rust_files(root) else {
            assert!(!root.exists(), "tests is not readable");
            return;
        };

        let empty: Vec<_> = files
            .iter()
            .filter(|path| !declares_modules_only(path))
            .filter(|path| {
                fs::read_to_string(root.join(path))
                    .map(|content| !content.contains("#[test]"))
                    .unwrap_or(true)
            })
            .collect();
        assert!(
            empty.is_empty(),
            "Test files without any #[test] function:\n{}",
            listing(&empty)
        );
    }
}
