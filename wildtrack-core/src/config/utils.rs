//! Configuration utility functions
//!
//! Helpers for reading typed values from environment variables. Unset or
//! unparsable variables fall back to the supplied default.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get a path value from an environment variable or use the default
pub fn get_env_path(key: &str, default: PathBuf) -> PathBuf {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => PathBuf::from(val),
        _ => default,
    }
}

/// Get a f32 value from an environment variable or use the default
pub fn get_env_f32(key: &str, default: f32) -> f32 {
    get_env_parsed(key, default)
}

/// Get a u32 value from an environment variable or use the default
pub fn get_env_u32(key: &str, default: u32) -> u32 {
    get_env_parsed(key, default)
}

/// Get a u64 value from an environment variable or use the default
pub fn get_env_u64(key: &str, default: u64) -> u64 {
    get_env_parsed(key, default)
}

/// Get a usize value from an environment variable or use the default
pub fn get_env_usize(key: &str, default: usize) -> usize {
    get_env_parsed(key, default)
}

/// Get a duration, given in whole seconds, from an environment variable
pub fn get_env_duration_secs(key: &str, default: Duration) -> Duration {
    match std::env::var(key).ok().and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(secs) => Duration::from_secs(secs),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variables_use_defaults() {
        assert_eq!(get_env_u32("WILDTRACK_TEST_UNSET_U32", 7), 7);
        assert_eq!(get_env_f32("WILDTRACK_TEST_UNSET_F32", 0.5), 0.5);
        assert_eq!(
            get_env_duration_secs("WILDTRACK_TEST_UNSET_SECS", Duration::from_secs(9)),
            Duration::from_secs(9)
        );
        assert_eq!(
            get_env_path("WILDTRACK_TEST_UNSET_PATH", PathBuf::from("x")),
            PathBuf::from("x")
        );
    }
}
