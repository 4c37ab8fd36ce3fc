//! Tests for environment-driven configuration
//!
//! Kept in its own test binary so environment mutation cannot leak into
//! other tests.

use flashsnipe::oracle::EvaluatorConfig;

#[test]
fn test_from_env_overrides_and_rejects() {
    std::env::set_var("FLASHSNIPE_MIN_CONFIDENCE", "0.55");
    std::env::set_var("FLASHSNIPE_MAX_FLASH_LOAN_AMOUNT", "2000000000");
    std::env::set_var("FLASHSNIPE_QUOTE_TIMEOUT_MS", "1200");

    let config = EvaluatorConfig::from_env().expect("valid overrides");
    assert_eq!(config.risk.min_confidence, 0.55);
    assert_eq!(config.risk.max_flash_loan_amount, 2_000_000_000);
    assert_eq!(config.quote_timeout_ms, 1200);
    assert_eq!(config.risk.min_volume, 5_000.0);

    std::env::set_var("FLASHSNIPE_MIN_CONFIDENCE", "not-a-number");
    assert!(EvaluatorConfig::from_env().is_err());

    std::env::set_var("FLASHSNIPE_MIN_CONFIDENCE", "1.7");
    assert!(EvaluatorConfig::from_env().is_err());

    std::env::remove_var("FLASHSNIPE_MIN_CONFIDENCE");
    std::env::remove_var("FLASHSNIPE_MAX_FLASH_LOAN_AMOUNT");
    std::env::remove_var("FLASHSNIPE_QUOTE_TIMEOUT_MS");
}
