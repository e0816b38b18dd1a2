//! Tests for solver constants

#[cfg(test)]
mod tests {
    use tilestitch::io::configuration::{
        ANALYSIS_SUFFIX, DEFAULT_CANDIDATE_CAPACITY, DEFAULT_MATCH_DEPTH, DEFAULT_SEGMENT_SIZE,
        GAP_COLOR, MAX_INDIVIDUAL_PROGRESS_BARS, MAX_SEGMENT_SIZE, OUTPUT_SUFFIX,
    };

    // Tests default tile geometry stays within the allowed range
    // Verified by setting the default above the maximum
    #[test]
    fn test_segment_size_bounds() {
        assert_eq!(DEFAULT_SEGMENT_SIZE, 40);
        assert!(DEFAULT_SEGMENT_SIZE <= MAX_SEGMENT_SIZE);
    }

    // Tests the default match depth never exceeds the stored candidates
    // Verified by raising the depth to six
    #[test]
    fn test_match_depth_fits_candidates() {
        assert_eq!(DEFAULT_CANDIDATE_CAPACITY, 5);
        assert!(DEFAULT_MATCH_DEPTH >= 1);
        assert!(DEFAULT_MATCH_DEPTH <= DEFAULT_CANDIDATE_CAPACITY);
    }

    // Tests output naming and gap fill color
    #[test]
    fn test_output_settings() {
        assert_eq!(OUTPUT_SUFFIX, "_solved");
        assert!(ANALYSIS_SUFFIX.ends_with(".json"));
        assert_eq!(GAP_COLOR, [255, 0, 0, 255]);
        assert!(MAX_INDIVIDUAL_PROGRESS_BARS > 0);
    }
}
