//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::*;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_train() -> impl Strategy<Value = TrainConfig> {
    (1usize..256, 0usize..1000, 1usize..100, -1.0f32..2.0, any::<bool>(), any::<bool>()).prop_map(
        |(batch_size, epochs, checkpoint_interval, validation_split, save_best_model, collect_history)| TrainConfig {
            batch_size,
            epochs,
            checkpoint_interval,
            validation_split,
            save_best_model,
            collect_history,
            verbose: false,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_train_passes(config in arb_train()) {
        prop_assert!(validate_train(&config).is_ok());
    }

    #[test]
    fn prop_zero_batch_size_fails(config in arb_train()) {
        let config = TrainConfig { batch_size: 0, ..config };
        prop_assert_eq!(validate_train(&config), Err(ValidationError::InvalidBatchSize(0)));
    }

    #[test]
    fn prop_power_of_two_images_pass(exp in 2u32..8, channels in 1usize..5) {
        let side = 1usize << exp;
        let config = ProgressiveConfig { image_shape: [side, side, channels], ..ProgressiveConfig::default() };
        prop_assert!(validate_progressive(&config).is_ok());
    }

    #[test]
    fn prop_other_sides_fail(side in 5usize..200) {
        prop_assume!(!side.is_power_of_two());
        let config = ProgressiveConfig { image_shape: [side, side, 3], ..ProgressiveConfig::default() };
        prop_assert!(validate_progressive(&config).is_err());
    }
}
