use anyhow::{Context, Result, bail};
use passbook_core::registry::builtin_config;
use passbook_core::{BankProfile, ProfileConfig, profile_for};
use std::fs;
use std::path::Path;

/// Resolves the profile for one run.
///
/// A `--profile` file wins over `--bank`; without either the generic
/// profile is used. Unknown bank keys fall back to generic with a warning.
pub fn resolve_profile(bank: Option<&str>, profile_file: Option<&Path>) -> Result<BankProfile> {
    if let Some(path) = profile_file {
        let cfg = load_profile_config(path)?;
        return cfg
            .build()
            .with_context(|| format!("invalid profile {}", path.display()));
    }
    let key = bank.unwrap_or(passbook_core::registry::GENERIC);
    profile_for(key).with_context(|| format!("building built-in profile '{key}'"))
}

/// Reads a TOML profile; omitted fields keep their defaults.
pub fn load_profile_config(path: &Path) -> Result<ProfileConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// A built-in profile rendered as TOML.
pub fn profile_toml(key: &str) -> Result<String> {
    let Some(cfg) = builtin_config(key) else {
        bail!("unknown bank '{key}' (see: passbook banks)");
    };
    toml::to_string_pretty(&cfg).context("serialize profile")
}
