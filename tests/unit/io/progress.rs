//! Tests for output progress tracking

#[cfg(test)]
mod tests {
    use tilemosaic::io::progress::{OutputStage, ProgressManager};

    // Tests the bar advances once per completed mosaic
    // Verified by incrementing on every stage change
    #[test]
    fn test_progress_counts_mosaics() {
        let mut pm = ProgressManager::new();
        pm.initialize(2);

        pm.start_mosaic("abc");
        pm.stage(OutputStage::Joining);
        pm.stage(OutputStage::Cropping);
        pm.stage(OutputStage::SavingFull);
        pm.complete_mosaic();
        pm.start_mosaic("def");
        pm.stage(OutputStage::SavingCompressed);

        assert_eq!(pm.position(), 1);
        pm.complete_mosaic();
        assert_eq!(pm.position(), 2);
        pm.finish();
    }

    // Tests an uninitialized manager ignores every call
    // Verified by creating the bar eagerly
    #[test]
    fn test_progress_uninitialized() {
        let pm = ProgressManager::default();

        pm.start_mosaic("abc");
        pm.stage(OutputStage::Joining);
        pm.complete_mosaic();
        pm.finish();

        assert_eq!(pm.position(), 0);
    }

    // Tests stage labels are distinct
    // Verified by labelling both saves identically
    #[test]
    fn test_stage_labels() {
        let labels = [
            OutputStage::Joining,
            OutputStage::Cropping,
            OutputStage::SavingFull,
            OutputStage::SavingCompressed,
        ]
        .map(OutputStage::label);

        assert_eq!(
            labels,
            ["joining", "cropping", "saving full", "saving compressed"]
        );
    }
}
