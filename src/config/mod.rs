//! Runtime configuration, read from the environment (and `.env` via
//! `dotenvy` in `main`).
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `127.0.0.1` | bind address |
//! | `PORT` | `8080` | bind port |
//! | `DIFFICULTY` | `4` | leading hex zeros required of a proof digest |
//! | `MINING_MAX_ATTEMPTS` | unset | give up mining after this many candidates |
//! | `PARALLEL_MINING` | `false` | search proofs on the rayon pool |

use std::str::FromStr;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MiningOptions};
use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub mining: MiningOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
            mining: MiningOptions::default(),
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.host);
        let port = parse_or(&lookup, "PORT", defaults.port)?;

        let difficulty = parse_or(&lookup, "DIFFICULTY", defaults.difficulty)?;
        if difficulty == 0 || difficulty > MAX_DIFFICULTY {
            return Err(LedgerError::InvalidDifficulty(difficulty));
        }

        let max_attempts = match lookup("MINING_MAX_ATTEMPTS") {
            Some(raw) => Some(parse("MINING_MAX_ATTEMPTS", &raw)?).filter(|&n: &u64| n > 0),
            None => None,
        };
        let parallel = parse_or(&lookup, "PARALLEL_MINING", false)?;

        Ok(Self {
            host,
            port,
            difficulty,
            mining: MiningOptions {
                max_attempts,
                parallel,
            },
        })
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| LedgerError::InvalidConfig {
        key,
        value: raw.to_string(),
    })
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_all_keys() {
        let cfg = config(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("DIFFICULTY", "5"),
            ("MINING_MAX_ATTEMPTS", "1000000"),
            ("PARALLEL_MINING", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.difficulty, 5);
        assert_eq!(cfg.mining.max_attempts, Some(1_000_000));
        assert!(cfg.mining.parallel);
    }

    #[test]
    fn zero_attempts_means_unbounded() {
        let cfg = config(&[("MINING_MAX_ATTEMPTS", "0")]).unwrap();
        assert_eq!(cfg.mining.max_attempts, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("DIFFICULTY", "0")]).unwrap_err(),
            LedgerError::InvalidDifficulty(0)
        );
        assert_eq!(
            config(&[("DIFFICULTY", "99")]).unwrap_err(),
            LedgerError::InvalidDifficulty(99)
        );
        assert_eq!(
            config(&[("PORT", "http")]).unwrap_err(),
            LedgerError::InvalidConfig {
                key: "PORT",
                value: "http".into()
            }
        );
        assert!(config(&[("PARALLEL_MINING", "yes")]).is_err());
    }
}
