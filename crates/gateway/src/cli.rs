//! Command-line interface and configuration loading.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use pc_domain::config::{Config, VariantKind};
use pc_domain::error::{Error, Result};

#[derive(Debug, Parser)]
#[command(name = "plantchat", version, about = "Chat relay gateway for consultancy web widgets")]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP gateway (default when no subcommand is given).
    Serve,
    /// Inspect or validate the configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print the version.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Check the variant tables and report which credentials resolve.
    Validate,
    /// Print the effective configuration as TOML.
    Show,
}

/// Load the config file, falling back to built-in defaults when it does
/// not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| Error::Config(format!("parsing {}: {e}", path.display())))
}

/// Validate the variant tables. Returns `false` when any check fails;
/// missing credentials are reported but do not fail validation (they may
/// be provided at deploy time).
pub fn validate(config: &Config) -> bool {
    let mut ok = true;

    if config.variants.is_empty() {
        eprintln!("error: no [[variants]] configured");
        ok = false;
    }

    for vc in &config.variants {
        let id = &vc.id;
        if vc.base_url.is_empty() {
            eprintln!("error: variant '{id}': base_url is empty");
            ok = false;
        }
        if vc.kind == VariantKind::Websearch && vc.model.is_none() {
            eprintln!("error: variant '{id}': websearch variants need a model");
            ok = false;
        }
        if vc.api_key_env.is_empty() {
            eprintln!("error: variant '{id}': api_key_env is empty");
            ok = false;
        } else {
            match std::env::var(&vc.api_key_env) {
                Ok(v) if !v.trim().is_empty() => {
                    println!("variant '{id}': credential {} is set", vc.api_key_env);
                }
                _ => println!(
                    "variant '{id}': credential {} is NOT set — variant will be unavailable",
                    vc.api_key_env
                ),
            }
        }
        if vc.kind == VariantKind::Pageindex && vc.effective_doc_ids(&[]).is_empty() {
            println!(
                "variant '{id}': no default document ids; requests must supply docIds"
            );
        }
    }

    if ok {
        println!("configuration OK ({} variants)", config.variants.len());
    }
    ok
}

/// Print the effective configuration.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("error: rendering config: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/plantchat.toml")).unwrap();
        assert_eq!(config.variants.len(), 2);
    }

    #[test]
    fn config_file_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
                [server]
                port = 9400

                [sessions]
                idle_minutes = 60
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 9400);
        assert_eq!(config.sessions.idle_minutes, 60);
        assert!(validate(&config));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server\nport = nine").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn validate_flags_missing_model() {
        let mut config = Config::default();
        config.variants[0].model = None;
        assert!(!validate(&config));
    }
}
