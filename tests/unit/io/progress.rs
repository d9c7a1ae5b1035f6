//! Tests for batch progress tracking

#[cfg(test)]
mod tests {
    use pipeloop::io::progress::ProgressManager;
    use std::time::Duration;

    // Tests completed puzzles are counted and failures are not
    // Verified by counting failures as completions
    #[test]
    fn test_progress_counts() {
        let mut manager = ProgressManager::new();
        manager.initialize(3);
        manager.start_puzzle(0, "seed 1");
        manager.set_status("verifying");
        manager.complete_puzzle(6, Duration::from_millis(5));
        manager.start_puzzle(1, "seed 2");
        manager.fail_puzzle();
        manager.complete_puzzle(4, Duration::from_millis(3));
        manager.finish();

        assert_eq!(manager.completed(), 2);
    }

    // Tests updates before initialization are ignored
    // Verified by unwrapping the missing bars
    #[test]
    fn test_progress_uninitialized() {
        let mut manager = ProgressManager::default();
        manager.start_puzzle(0, "seed 1");
        manager.set_status("verifying");
        manager.complete_puzzle(4, Duration::ZERO);
        manager.finish();
        assert_eq!(manager.completed(), 1);
    }
}
