// Environment variable loading

use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::env;

/// Environment variable loader
///
/// With a prefix of `TRADEGATE_FEATURES`, the variable
/// `TRADEGATE_FEATURES_CACHE_TTL_SECS=60` becomes the key `cache_ttl_secs`
/// holding the number `60`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load all matching process environment variables
    pub fn load(&self) -> Result<HashMap<String, Value>> {
        Ok(self.load_from(env::vars()))
    }

    /// Load from an explicit set of variables instead of the process environment
    pub fn load_from<I>(&self, vars: I) -> HashMap<String, Value>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| {
                self.strip_prefix(&key)
                    .map(|name| (name.to_lowercase(), parse_scalar(&value)))
            })
            .collect()
    }

    fn strip_prefix<'a>(&self, key: &'a str) -> Option<&'a str> {
        match self.prefix {
            Some(ref prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|rest| !rest.is_empty()),
            None => Some(key),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Environment values are strings; promote the obvious scalars so they
/// deserialize into typed fields. String fields that may hold digits or
/// `true`/`false` must accept the promoted form when deserializing.
pub fn parse_scalar(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = trimmed.parse::<f64>()
        && let Some(number) = serde_json::Number::from_f64(float)
    {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}
