//! Configuration management commands.

use console::style;

use kobj::config::{Config, DEFAULT_FUZZY_THRESHOLD, FUZZY_THRESHOLD_ENV};

/// Print the effective configuration.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults (no config file found)".to_string());

    println!("{}", style("Configuration").bold());
    println!("  {} Source: {}", style("→").dim(), source);
    println!(
        "  {} Fuzzy threshold: {} (default {}, env {})",
        style("→").dim(),
        style(config.resolution.fuzzy_threshold).cyan(),
        DEFAULT_FUZZY_THRESHOLD,
        FUZZY_THRESHOLD_ENV
    );

    Ok(())
}
