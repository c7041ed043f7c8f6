//! Configuration read from the environment.

use std::env;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use ops_agent_core::ReplyPolicy;
use ops_agent_core::exchange::DEFAULT_REPLY_DELAY;
use ops_agent_model::DEFAULT_MODEL_ID;

/// Milliseconds the simulated assistant takes to answer.
pub const REPLY_DELAY_VAR: &str = "OPS_AGENT_REPLY_DELAY_MS";
/// Id of the model selected at startup.
pub const MODEL_VAR: &str = "OPS_AGENT_MODEL";
/// `concurrent` or `serialized`.
pub const REPLY_POLICY_VAR: &str = "OPS_AGENT_REPLY_POLICY";

/// Settings of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// How long the simulated assistant takes to answer.
    pub reply_delay: Duration,
    /// Id of the model selected at startup.
    pub default_model: String,
    /// How replies within one conversation relate to each other.
    pub reply_policy: ReplyPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
            default_model: DEFAULT_MODEL_ID.to_owned(),
            reply_policy: ReplyPolicy::default(),
        }
    }
}

impl Config {
    /// Reads the configuration from environment variables, falling back
    /// to defaults for unset ones.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value
    /// of a variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(REPLY_DELAY_VAR) {
            let millis = value.trim().parse::<u64>().map_err(|_| ConfigError {
                var: REPLY_DELAY_VAR,
                value: value.clone(),
                expected: "a number of milliseconds",
            })?;
            config.reply_delay = Duration::from_millis(millis);
        }

        if let Some(value) = lookup(MODEL_VAR) {
            let value = value.trim();
            if !value.is_empty() {
                config.default_model = value.to_owned();
            }
        }

        if let Some(value) = lookup(REPLY_POLICY_VAR) {
            let policy = value.trim().to_ascii_lowercase();
            config.reply_policy = match policy.as_str() {
                "concurrent" => ReplyPolicy::Concurrent,
                "serialized" => ReplyPolicy::Serialized,
                _ => {
                    return Err(ConfigError {
                        var: REPLY_POLICY_VAR,
                        value,
                        expected: "`concurrent` or `serialized`",
                    });
                }
            };
        }

        Ok(config)
    }
}

/// An environment variable holds a value that cannot be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    var: &'static str,
    value: String,
    expected: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value `{}` for {}: expected {}",
            self.value, self.var, self.expected
        )
    }
}

impl Error for ConfigError {}
