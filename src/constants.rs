//! # Constants
//!
//! Shared constants used throughout the rotator.
//!
//! Stage labels and field names must match what the secret store and the
//! consuming applications expect; they are not configurable.

/// Stage label carried by the version served to consumers
pub const STAGE_CURRENT: &str = "AWSCURRENT";

/// Stage label carried by the in-flight rotation candidate
pub const STAGE_PENDING: &str = "AWSPENDING";

/// Stage label the store applies to a version when it loses `AWSCURRENT`
pub const STAGE_PREVIOUS: &str = "AWSPREVIOUS";

/// Field holding the 256-bit field encryption key (base64 text)
pub const FIELD_ENCRYPTION_KEY: &str = "FIELD_ENCRYPTION_KEY";

/// Fields regenerated on every rotation. Everything else is static
/// configuration owned by another system and passes through untouched.
pub const ROTATED_FIELDS: &[&str] = &[FIELD_ENCRYPTION_KEY];

/// Informational field stamped with the rotation time (RFC 3339, UTC)
pub const ROTATION_METADATA_FIELD: &str = "LAST_ROTATED_AT";

/// Raw length of the field encryption key in bytes
pub const ENCRYPTION_KEY_LEN: usize = 32;

/// Environment variable controlling log verbosity (ERROR, WARN, INFO, DEBUG, TRACE)
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Environment variable selecting the log output format (json, text)
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default log level when `LOG_LEVEL` is unset
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Default log format when `LOG_FORMAT` is unset
pub const DEFAULT_LOG_FORMAT: &str = "text";
