//! Environment-driven server configuration

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::types::LessonCatalog;

pub const ENV_PORT: &str = "STUDYTRACK_PORT";
pub const ENV_BIND: &str = "STUDYTRACK_BIND";
pub const ENV_DB: &str = "STUDYTRACK_DB";
pub const ENV_IN_MEMORY: &str = "STUDYTRACK_IN_MEMORY";
pub const ENV_UPLOADS: &str = "STUDYTRACK_UPLOADS";
pub const ENV_LESSONS: &str = "STUDYTRACK_LESSONS";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_DB: &str = "studytrack.db";
pub const DEFAULT_UPLOADS: &str = "uploads";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind: String,
    pub database_path: PathBuf,
    pub in_memory: bool,
    pub upload_dir: PathBuf,
    pub lessons_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `STUDYTRACK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: try_load(ENV_PORT, DEFAULT_PORT)?,
            bind: var(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            database_path: var(ENV_DB)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB)),
            in_memory: var(ENV_IN_MEMORY).is_some_and(|v| v == "1"),
            upload_dir: var(ENV_UPLOADS)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS)),
            lessons_path: var(ENV_LESSONS).map(PathBuf::from),
        })
    }

    /// Address to listen on
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Read the lesson catalog, or an empty one when no file is configured
    pub fn load_lessons(&self) -> Result<LessonCatalog> {
        let Some(path) = &self.lessons_path else {
            info!("{} not set, serving an empty lesson catalog", ENV_LESSONS);
            return Ok(LessonCatalog::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read lessons from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid lessons JSON in {}", path.display()))
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} value: {:?}", key, raw)),
        None => {
            debug!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
