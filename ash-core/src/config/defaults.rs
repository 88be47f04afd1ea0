// Single source of truth for all default values.

// --- Engine ---
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_MAX_DAILY_DISCOVERIES: u32 = 10;
pub const DEFAULT_DISCOVERY_ENABLED: bool = true;
pub const DEFAULT_MAX_LEARNING_ADJUSTMENTS_PER_DAY: u32 = 50;
pub const DEFAULT_LEARNING_CONFIDENCE_THRESHOLD: f64 = 0.6;

// --- NLP ---
pub const DEFAULT_NLP_TIMEOUT_MS: u64 = 3_000;

// --- Sensitivity ---
pub const DEFAULT_SENSITIVITY_MIN: f64 = 0.5;
pub const DEFAULT_SENSITIVITY_MAX: f64 = 1.5;
pub const DEFAULT_SENSITIVITY_STEP: f64 = 0.1;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FORMAT: &str = "human";
