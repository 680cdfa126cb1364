//! Operator configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name searched for in the working directory.
pub const LOCAL_CONFIG: &str = "quizforge.toml";

/// Top-level quizforge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// Directory holding question banks.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Bank file name inside `data_dir`.
    #[serde(default = "default_bank_file")]
    pub bank_file: String,
    /// Manifest used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    /// Seed override applied to every manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_bank_file() -> String {
    "abstract-reasoning.json".to_string()
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bank_file: default_bank_file(),
            manifest: None,
            seed: None,
        }
    }
}

impl QuizforgeConfig {
    /// Path of the generated bank.
    pub fn bank_path(&self) -> PathBuf {
        self.data_dir.join(&self.bank_file)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables resolve to the empty string. Substituted values are
/// inserted as-is and never rescanned.
fn resolve_env_vars(s: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&lookup(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path, lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy(), lookup))
}

/// Resolve `${VAR}` references, then apply `QUIZFORGE_DATA_DIR` and
/// `QUIZFORGE_SEED`.
fn apply_env(
    mut config: QuizforgeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<QuizforgeConfig> {
    config.data_dir = resolve_path(&config.data_dir, &lookup);
    config.bank_file = resolve_env_vars(&config.bank_file, &lookup);
    config.manifest = config.manifest.map(|m| resolve_path(&m, &lookup));

    if let Some(dir) = lookup("QUIZFORGE_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(seed) = lookup("QUIZFORGE_SEED") {
        let seed = seed
            .trim()
            .parse::<u32>()
            .with_context(|| format!("QUIZFORGE_SEED is not a 32-bit seed: {seed:?}"))?;
        config.seed = Some(seed);
    }
    Ok(config)
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variable overrides: `QUIZFORGE_DATA_DIR`, `QUIZFORGE_SEED`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(LOCAL_CONFIG);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config_file(&path)?
        }
        None => QuizforgeConfig::default(),
    };

    apply_env(config, env_lookup)
}

fn parse_config_file(path: &Path) -> Result<QuizforgeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<QuizforgeConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}

/// Starter config written by `quizforge init`.
pub fn starter_config() -> Result<String> {
    let config = QuizforgeConfig {
        manifest: Some(PathBuf::from("manifests/abstract-reasoning.toml")),
        ..QuizforgeConfig::default()
    };
    let body = toml::to_string_pretty(&config).context("failed to serialize config")?;
    Ok(format!(
        "# quizforge configuration\n# ${{VAR}} references are resolved from the environment.\n\n{body}"
    ))
}
