//! Tests for stage progress bars

#[cfg(test)]
mod tests {
    use photomosaic::io::progress::ProgressManager;

    // Tests disabled manager hands out hidden bars
    // Verified by drawing bars when disabled
    #[test]
    fn test_disabled_bars_are_hidden() {
        let mut manager = ProgressManager::new(false);
        let bar = manager.stage("profiling");

        assert!(!manager.is_enabled());
        assert!(bar.is_hidden());
        assert_eq!(bar.message(), "profiling");
    }

    // Tests stages are tracked and finished together
    // Verified by not recording stages
    #[test]
    fn test_stages_tracked() {
        let mut manager = ProgressManager::default();
        assert!(manager.is_enabled());

        let profiling = manager.stage("profiling");
        profiling.set_length(3);
        profiling.inc(3);
        let compositing = manager.stage("compositing");
        assert_eq!(manager.stage_count(), 2);

        manager.finish();
        assert!(profiling.is_finished());
        assert!(compositing.is_finished());
    }
}
