use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::activity::DEFAULT_ACTIVITY_CAPACITY;
use crate::models::LoadPolicy;

const DEFAULT_ACTIVITY_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub load_policy: LoadPolicy,
    pub seed_file: Option<PathBuf>,
    pub activity_limit: usize,
    pub activity_capacity: usize,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            load_policy: LoadPolicy::default(),
            seed_file: None,
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }
}

impl DeskConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Bad values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let load_policy = match lookup("APPOINTDESK_LOAD_POLICY") {
            Some(value) => LoadPolicy::from_string(&value).unwrap_or_else(|e| {
                warn!("{}, using cancelled-only", e);
                LoadPolicy::default()
            }),
            None => LoadPolicy::default(),
        };

        let seed_file = lookup("APPOINTDESK_SEED_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let activity_limit = count_or(&lookup, "APPOINTDESK_ACTIVITY_LIMIT", DEFAULT_ACTIVITY_LIMIT);
        let activity_capacity = count_or(
            &lookup,
            "APPOINTDESK_ACTIVITY_CAPACITY",
            DEFAULT_ACTIVITY_CAPACITY,
        );

        Self {
            load_policy,
            seed_file,
            activity_limit,
            activity_capacity,
        }
    }
}

fn count_or<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value.trim().parse::<usize>().unwrap_or_else(|_| {
            warn!("{} '{}' is not a number, using {}", key, value, default);
            default
        }),
        None => default,
    }
}
