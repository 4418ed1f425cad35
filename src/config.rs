use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{HullsError, Result};
use crate::kmeans::KMeansParams;

pub const KMEANS_SEED_VAR: &str = "HULLS_KMEANS_SEED";
pub const KMEANS_MAX_ITERATIONS_VAR: &str = "HULLS_KMEANS_MAX_ITERATIONS";
pub const SKIP_DEGENERATE_VAR: &str = "HULLS_SKIP_DEGENERATE";
pub const HTML_TEMPLATE_VAR: &str = "HULLS_HTML_TEMPLATE";

/// Run defaults taken from the environment; command line flags override them.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub kmeans: KMeansParams,
    pub skip_degenerate: bool,
    pub html_template: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Settings> {
        Settings::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        Ok(Settings {
            kmeans: KMeansParams {
                seed: parse_var(&lookup, KMEANS_SEED_VAR)?.unwrap_or(defaults.kmeans.seed),
                max_iterations: parse_var(&lookup, KMEANS_MAX_ITERATIONS_VAR)?
                    .unwrap_or(defaults.kmeans.max_iterations),
            },
            skip_degenerate: parse_flag(&lookup, SKIP_DEGENERATE_VAR)?
                .unwrap_or(defaults.skip_degenerate),
            html_template: lookup(HTML_TEMPLATE_VAR)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn invalid(name: &str, value: &str) -> HullsError {
    HullsError::Config {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(name, &value)),
        None => Ok(None),
    }
}

fn parse_flag<F>(lookup: &F, name: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" | "" => Ok(Some(false)),
            _ => Err(invalid(name, &value)),
        },
        None => Ok(None),
    }
}
