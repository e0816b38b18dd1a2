//! Tests for batch progress bookkeeping

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;
    use tilestitch::io::progress::ProgressManager;

    // Tests a manager without initialized bars hands out nothing
    #[test]
    fn test_uninitialized_manager() {
        let mut manager = ProgressManager::default();

        assert_eq!(manager.file_count(), 0);
        assert!(manager.start_file(0, Path::new("a.png"), 6).is_none());
    }

    // Tests file bars are sized to the tile count and recycled by index
    // Verified by indexing bars without wrapping
    #[test]
    fn test_bars_recycle() {
        let mut manager = ProgressManager::new();
        manager.initialize(12);

        assert_eq!(manager.file_count(), 12);
        let first = manager.start_file(0, Path::new("a.png"), 6);
        assert_eq!(first.as_ref().and_then(|bar| bar.length()), Some(6));

        let wrapped = manager.start_file(5, Path::new("f.png"), 9);
        assert_eq!(wrapped.as_ref().and_then(|bar| bar.length()), Some(9));
        assert_eq!(first.and_then(|bar| bar.length()), Some(9));
        manager.finish();
    }

    // Tests completing or reusing a file fills its bar
    #[test]
    fn test_complete_fills_bar() {
        let mut manager = ProgressManager::new();
        manager.initialize(2);

        let bar = manager.start_file(1, Path::new("b.png"), 4);
        manager.complete_file(1, Duration::from_millis(120));
        assert_eq!(bar.as_ref().map(|bar| bar.position()), Some(4));

        let reused = manager.start_file(0, Path::new("a.png"), 3);
        manager.reuse_file(0);
        assert_eq!(reused.map(|bar| bar.position()), Some(3));
        manager.finish();
    }
}
