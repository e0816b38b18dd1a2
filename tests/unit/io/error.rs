//! Tests for error formatting, sources and path attachment

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::path::{Path, PathBuf};
    use tilestitch::SolverError;
    use tilestitch::io::error::{
        WithPath, configuration_error, invalid_parameter, out_of_range,
    };

    // Tests helper constructors produce readable messages
    #[test]
    fn test_helper_messages() {
        let error = invalid_parameter("match_depth", &9, &"must be between 1 and 5");
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'match_depth' = '9': must be between 1 and 5"
        );

        let error = out_of_range("tile id", &12, &12);
        assert_eq!(error.to_string(), "tile id 12 is out of range (limit: 12)");

        let error = configuration_error(&"121px is not a multiple of 40px");
        assert!(error.to_string().contains("121px"));
    }

    // Tests wrapped I/O errors expose their cause
    // Verified by returning None from source for file system errors
    #[test]
    fn test_source_chain() {
        let io_error = std::io::Error::other("disk full");
        let error = SolverError::from(io_error);

        assert!(error.source().is_some());
        assert!(SolverError::SelfComparison { tile: 3 }.source().is_none());
    }

    // Tests attaching a path keeps an already known path
    // Verified by replacing every path unconditionally
    #[test]
    fn test_with_path_keeps_known_path() {
        let known = SolverError::FileSystem {
            path: PathBuf::from("first.json"),
            operation: "read analysis",
            source: std::io::Error::other("gone"),
        };
        let result: Result<(), SolverError> = Err(known);

        match result.with_path(Path::new("second.json")) {
            Err(SolverError::FileSystem { path, .. }) => {
                assert_eq!(path, PathBuf::from("first.json"));
            }
            other => unreachable!("expected file system error, got {other:?}"),
        }
    }

    // Tests JSON failures become serialization errors with the file path
    #[test]
    fn test_json_error_gets_path() {
        let parsed: Result<Vec<u32>, serde_json::Error> = serde_json::from_str("{");

        match parsed.with_path(Path::new("puzzle_analysis.json")) {
            Err(SolverError::Serialization { path, .. }) => {
                assert_eq!(path, PathBuf::from("puzzle_analysis.json"));
            }
            other => unreachable!("expected serialization error, got {other:?}"),
        }
    }
}
