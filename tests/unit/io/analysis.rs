//! Tests for persisting and restoring analysis artifacts

#[cfg(test)]
mod tests {
    use crate::fixtures::continuity_image;
    use tempfile::tempdir;
    use tilestitch::SolverError;
    use tilestitch::algorithm::executor::{Analysis, SolverConfig, analyze};
    use tilestitch::io::analysis::AnalysisArtifact;

    fn sample_analysis() -> Analysis {
        let image = continuity_image(3, 2, 4);
        let config = SolverConfig {
            segment_size: 4,
            candidate_capacity: 3,
            match_depth: 3,
            ..SolverConfig::default()
        };
        let Ok(analysis) = analyze(&image, &config, None) else {
            unreachable!("a 12x8 image divides into 4px tiles");
        };
        analysis
    }

    // Tests an artifact restores the same grid and candidates
    // Verified by storing lists in reverse direction order
    #[test]
    fn test_artifact_restores_analysis() {
        let analysis = sample_analysis();
        let artifact = AnalysisArtifact::from_analysis(&analysis);

        assert_eq!(artifact.tiles.len(), 6);
        assert_eq!((artifact.segments_wide, artifact.segments_tall), (3, 2));
        assert_eq!(artifact.into_analysis(12, 8, 4, 3).ok(), Some(analysis));
    }

    // Tests artifacts from other settings are refused
    // Verified by skipping the capacity comparison
    #[test]
    fn test_mismatched_settings_rejected() {
        let artifact = AnalysisArtifact::from_analysis(&sample_analysis());

        for (width, height, size, capacity) in [(12, 8, 4, 5), (12, 8, 2, 3), (16, 8, 4, 3)] {
            assert!(matches!(
                artifact.clone().into_analysis(width, height, size, capacity),
                Err(SolverError::ArtifactMismatch { .. })
            ));
        }
    }

    // Tests reordered tile records are detected
    #[test]
    fn test_reordered_records_rejected() {
        let mut artifact = AnalysisArtifact::from_analysis(&sample_analysis());
        artifact.tiles.swap(0, 1);

        assert!(matches!(
            artifact.into_analysis(12, 8, 4, 3),
            Err(SolverError::ArtifactMismatch { .. })
        ));
    }

    // Tests save leaves only the final file behind
    // Verified by writing directly to the target path
    #[test]
    fn test_save_and_load() {
        let Ok(dir) = tempdir() else {
            unreachable!("temporary directory is available");
        };
        let path = dir.path().join("puzzle_analysis.json");
        let artifact = AnalysisArtifact::from_analysis(&sample_analysis());

        assert!(artifact.save(&path).is_ok());
        assert!(!dir.path().join("puzzle_analysis.json.partial").exists());
        assert_eq!(AnalysisArtifact::load(&path).ok(), Some(artifact));
    }

    // Tests corrupt JSON is a serialization error naming the file
    #[test]
    fn test_load_corrupt_file() {
        let Ok(dir) = tempdir() else {
            unreachable!("temporary directory is available");
        };
        let path = dir.path().join("broken_analysis.json");
        assert!(std::fs::write(&path, "{\"segment_size\": 4").is_ok());

        match AnalysisArtifact::load(&path) {
            Err(SolverError::Serialization { path: reported, .. }) => assert_eq!(reported, path),
            other => unreachable!("expected serialization error, got {other:?}"),
        }
    }
}
