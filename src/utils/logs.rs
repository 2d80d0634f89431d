use crate::core::domain::Configuration;

// JSON lines without colors, target or timestamps; CloudWatch adds the ingestion time itself.
pub fn setup_tracing(config: &Configuration) {
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .json()
        .init();
}
