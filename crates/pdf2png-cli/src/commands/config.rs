//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use pdf2png_core::Pdf2PngConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "render.scale")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn read_config(path: &PathBuf) -> anyhow::Result<Pdf2PngConfig> {
    if path.exists() {
        Ok(Pdf2PngConfig::from_file(path)?)
    } else {
        Ok(Pdf2PngConfig::default())
    }
}

fn show_config(path: &PathBuf) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = read_config(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(args: InitArgs, default_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(default_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    Pdf2PngConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(path: &PathBuf, key: &str) -> anyhow::Result<()> {
    let value = serde_json::to_value(read_config(path)?)?;
    let found = lookup(&value, key)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;

    match found {
        Value::String(s) => println!("{}", s),
        other => println!("{}", other),
    }
    Ok(())
}

fn set_config(path: &PathBuf, key: &str, raw: &str) -> anyhow::Result<()> {
    let mut value = serde_json::to_value(read_config(path)?)?;
    let slot = lookup_mut(&mut value, key)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;

    // Accept JSON literals (numbers, booleans, null), fall back to a string.
    *slot = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let config: Pdf2PngConfig = serde_json::from_value(value)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    config.render.validate()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!("{} Set {} = {}", style("✓").green(), key, raw);
    Ok(())
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(value, |v, part| v.get(part))
}

fn lookup_mut<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    key.split('.').try_fold(value, |v, part| v.get_mut(part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_keys() {
        let value = json!({"render": {"scale": 3.0, "pageNumber": 1}});
        assert_eq!(lookup(&value, "render.scale"), Some(&json!(3.0)));
        assert_eq!(lookup(&value, "render.missing"), None);
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdf2png").join("config.json");

        set_config(&path, "render.scale", "2.5").unwrap();
        set_config(&path, "engine.workerSrc", "/assets/worker.mjs").unwrap();

        let config = Pdf2PngConfig::from_file(&path).unwrap();
        assert_eq!(config.render.scale, 2.5);
        assert_eq!(config.engine.worker_src.as_deref(), Some("/assets/worker.mjs"));
    }

    #[test]
    fn test_set_rejects_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(set_config(&path, "render.scale", "40").is_err());
        assert!(set_config(&path, "render.nope", "1").is_err());
        assert!(!path.exists());
    }
}
