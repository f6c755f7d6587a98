use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub detector_config: DetectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_string()
}

/// Where the classifier artifacts live and how translation is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,
    #[serde(default = "default_model_file")]
    pub model_file: String,
    #[serde(default = "default_vectorizer_file")]
    pub vectorizer_file: String,
    /// Reported back to clients as `model_name`.
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default)]
    pub translation: TranslationConfig,
}

fn default_artifacts_dir() -> String {
    "artifacts".to_string()
}

fn default_model_file() -> String {
    "best_model.json".to_string()
}

fn default_vectorizer_file() -> String {
    "vectorizer.json".to_string()
}

fn default_model_name() -> String {
    "SVC (F1: 0.9958)".to_string()
}

impl DetectorConfig {
    pub fn model_path(&self) -> PathBuf {
        PathBuf::from(&self.artifacts_dir).join(&self.model_file)
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        PathBuf::from(&self.artifacts_dir).join(&self.vectorizer_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_translation_model")]
    pub model: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_service_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_translation_model() -> String {
    "Helsinki-NLP/opus-mt-ar-en".to_string()
}

fn default_source_lang() -> String {
    "ar".to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: default_artifacts_dir(),
            model_file: default_model_file(),
            vectorizer_file: default_vectorizer_file(),
            model_name: default_model_name(),
            translation: TranslationConfig::default(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            model: default_translation_model(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let content = substitute_env_vars(&read_text_file(path)?);

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Try each candidate path in order, falling back to defaults when none loads.
    pub fn discover(candidates: &[String]) -> (Self, Option<String>) {
        for path in candidates {
            match Self::load(path) {
                Ok(cfg) => return (cfg, Some(path.clone())),
                Err(e) => {
                    debug!("Failed to load config from {}: {}", path, e);
                }
            }
        }
        (Self::default(), None)
    }
}

/// Candidate config locations, most specific first.
pub fn config_search_paths() -> Vec<String> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
        exe_dir.join("conf.json").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Read a text file, dropping a UTF-8 BOM if one is present.
fn read_text_file(path: &str) -> Result<String> {
    let bytes = fs::read(path)?;
    let (cow, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        anyhow::bail!("Configuration file is not valid UTF-8: {}", path);
    }
    Ok(cow.into_owned())
}

/// Replace `${VAR_NAME}` with the environment value; unknown names are left as-is.
fn substitute_env_vars(content: &str) -> String {
    let pattern = match Regex::new(r"\$\{(\w+)\}") {
        Ok(re) => re,
        Err(_) => return content.to_string(),
    };
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
