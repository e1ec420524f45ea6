use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::index::CatalogIndex;
use crate::types::Segment;

pub struct Config {
    figment: Figment,
}

/// `[catalog]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogSettings {
    /// Folder to load when none is given on the command line.
    pub root_dir: Option<String>,
    /// Segments a brand section offers unless overridden in `layouts`.
    pub default_layout: Vec<Segment>,
    /// Per-brand layouts, keyed by brand (any casing).
    pub layouts: BTreeMap<String, Vec<Segment>>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { root_dir: None, default_layout: Segment::ALL.to_vec(), layouts: BTreeMap::new() }
    }
}

impl CatalogSettings {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.default_layout.is_empty() {
            return Err(Error::InvalidConfig("catalog.default_layout is empty".into()));
        }
        if let Some((brand, _)) = self.layouts.iter().find(|(_, layout)| layout.is_empty()) {
            return Err(Error::InvalidConfig(format!("catalog.layouts.{brand} is empty")));
        }
        Ok(())
    }

    /// Empty index with these layouts applied.
    pub fn build_index(&self) -> CatalogIndex {
        let mut index = CatalogIndex::with_default_layout(self.default_layout.clone());
        for (brand, layout) in &self.layouts {
            index.set_layout(brand, layout.clone());
        }
        index
    }
}

/// `[log]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSettings {
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { filter: "warn".to_string() }
    }
}

#[derive(Debug, Default, Serialize)]
struct Defaults {
    catalog: CatalogSettings,
    log: LogSettings,
}

impl Config {
    /// Load from `base`, picking the environment file from `RUST_ENV`.
    pub fn load(base: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(base, &env_name)
    }

    /// Merge defaults, `sneakerzone.toml`, `sneakerzone.<env>.toml` (both
    /// under `base`) and `SNZ_*` variables, later sources winning.
    pub fn load_from(base: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Defaults::default()))
            .merge(Toml::file(base.join("sneakerzone.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("sneakerzone.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("sneakerzone.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("sneakerzone.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("SNZ_").split("__"));

        let config = Self { figment };
        config.catalog()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn catalog(&self) -> anyhow::Result<CatalogSettings> {
        self.get("catalog")
    }

    pub fn log(&self) -> anyhow::Result<LogSettings> {
        self.get("log")
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// [`expand_path`] for a path that came in as a path. Non-UTF-8 paths
/// are returned unchanged.
pub fn expand_os_path(input: &Path) -> PathBuf {
    match input.to_str() {
        Some(s) => expand_path(s),
        None => input.to_path_buf(),
    }
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
