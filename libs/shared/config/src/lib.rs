use std::env;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_MAX_NORMAL_PATIENTS: u32 = 6;
const DEFAULT_MAX_PREMIUM_PATIENTS: u32 = 2;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub max_normal_patients: u32,
    pub max_premium_patients: u32,
    /// Refuse to save a schedule that still holds unrecognized slot tokens.
    pub strict_schedule_save: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            max_normal_patients: DEFAULT_MAX_NORMAL_PATIENTS,
            max_premium_patients: DEFAULT_MAX_PREMIUM_PATIENTS,
            strict_schedule_save: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDRESS not set, using {}", DEFAULT_BIND_ADDRESS);
                    DEFAULT_BIND_ADDRESS.to_string()
                }),
            max_normal_patients: parse_var("SCHEDULE_MAX_NORMAL_PATIENTS", DEFAULT_MAX_NORMAL_PATIENTS),
            max_premium_patients: parse_var("SCHEDULE_MAX_PREMIUM_PATIENTS", DEFAULT_MAX_PREMIUM_PATIENTS),
            strict_schedule_save: parse_var("SCHEDULE_STRICT_SAVE", false),
        };

        if !config.is_valid() {
            warn!("Schedule capacity misconfigured - max_normal_patients is zero");
        }

        config
    }

    pub fn is_valid(&self) -> bool {
        self.max_normal_patients > 0 && !self.bind_address.is_empty()
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_falls_back_on_garbage() {
        env::set_var("SHARED_CONFIG_TEST_CAPACITY", "not-a-number");
        assert_eq!(parse_var("SHARED_CONFIG_TEST_CAPACITY", 6u32), 6);

        env::set_var("SHARED_CONFIG_TEST_CAPACITY", " 9 ");
        assert_eq!(parse_var("SHARED_CONFIG_TEST_CAPACITY", 6u32), 9);
        env::remove_var("SHARED_CONFIG_TEST_CAPACITY");
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.is_valid());
        assert_eq!(config.max_premium_patients, 2);
        assert!(!config.strict_schedule_save);
    }
}
