//! Tests that every source file has a mirrored unit test file and vice versa

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    // Tests each source file has a unit test counterpart
    // Verified by deleting tests/unit/spatial/tiles.rs
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src_dir = Path::new("src");
        let tests_dir = Path::new("tests/unit");

        let src_paths = collect_relative_paths(src_dir, src_dir).unwrap_or_else(|error| {
            assert!(src_dir.exists(), "Failed to read src directory: {error}");
            HashSet::new()
        });
        let test_paths = collect_relative_paths(tests_dir, tests_dir).unwrap_or_default();

        let mut missing_tests: Vec<_> = src_paths
            .iter()
            // Entry points and module organization files don't require separate test files
            .filter(|path| *path != "main.rs" && *path != "lib.rs" && !path.ends_with("mod.rs"))
            .filter(|path| !test_paths.contains(*path))
            .collect();
        missing_tests.sort();

        assert!(
            missing_tests.is_empty(),
            "The following src files/directories are missing unit test counterparts:\n{}",
            missing_tests
                .iter()
                .map(|src_path| format!("  - src/{src_path} -> tests/unit/{src_path}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Tests no unit test file outlives its source file
    // Verified by adding tests/unit/spatial/grid.rs
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src_dir = Path::new("src");
        let tests_dir = Path::new("tests/unit");

        let src_paths = collect_relative_paths(src_dir, src_dir).unwrap_or_default();
        let test_paths = collect_relative_paths(tests_dir, tests_dir).unwrap_or_else(|error| {
            assert!(tests_dir.exists(), "Failed to read tests/unit: {error}");
            HashSet::new()
        });

        let mut orphaned_tests: Vec<_> = test_paths
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !src_paths.contains(*path))
            .collect();
        orphaned_tests.sort();

        assert!(
            orphaned_tests.is_empty(),
            "The following unit test files/directories have no corresponding src files:\n{}",
            orphaned_tests
                .iter()
                .map(|test_path| format!("  - tests/unit/{test_path} -> src/{test_path} (missing)"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Tests every test file declares at least one test
    // Verified by emptying tests/unit/io/progress.rs
    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new("tests");
        let mut files_without_tests = Vec::new();

        if let Err(error) = check_test_files(tests_dir, tests_dir, &mut files_without_tests) {
            assert!(
                tests_dir.exists(),
                "Failed to scan tests directory: {error}"
            );
        }
        files_without_tests.sort();

        assert!(
            files_without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            files_without_tests.join("\n")
        );
    }

    fn collect_relative_paths(dir: &Path, base: &Path) -> Result<HashSet<String>, io::Error> {
        let mut paths = HashSet::new();

        if dir.is_dir() {
            for entry_result in fs::read_dir(dir)? {
                let path = entry_result?.path();

                let relative_path = path
                    .strip_prefix(base)
                    .map_err(|_original_error| io::Error::other("Failed to strip prefix"))?
                    .to_string_lossy()
                    .to_string();

                if path.is_dir() {
                    paths.insert(relative_path);
                    paths.extend(collect_relative_paths(&path, base)?);
                } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                    paths.insert(relative_path);
                }
            }
        }

        Ok(paths)
    }

    fn check_test_files(
        dir: &Path,
        base_dir: &Path,
        files_without_tests: &mut Vec<String>,
    ) -> Result<(), io::Error> {
        for entry_result in fs::read_dir(dir)? {
            let path = entry_result?.path();

            if path.is_dir() {
                check_test_files(&path, base_dir, files_without_tests)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                    continue;
                };

                // Test crate roots only declare the modules in their sibling directory
                let is_crate_root =
                    path.parent() == Some(base_dir) && path.with_extension("").is_dir();
                if is_crate_root || file_name == "mod.rs" {
                    continue;
                }

                if !fs::read_to_string(&path)?.contains("#[test]") {
                    files_without_tests.push(format!("  - {}", path.display()));
                }
            }
        }

        Ok(())
    }
}
