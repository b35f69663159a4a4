//! `ctxroute config`: configuration management commands.

use ctxroute_config::AppConfig;
use tracing::warn;

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(None).unwrap_or_else(|e| {
        warn!(error = %e, "Config error, showing defaults");
        AppConfig::default()
    });
    let p = &config.provider;

    println!("Provider:");
    println!("  api-key:     {}", mask_key(config.resolve_api_key().as_deref()));
    println!("  api-key-env: {}", p.api_key_env.as_deref().unwrap_or("(not set)"));
    println!("  model:       {}", p.model);
    println!("  base-url:    {}", p.base_url);
    println!("  api-style:   {}", p.api_style);
    match p.timeout_secs {
        Some(secs) => println!("  timeout:     {secs}s"),
        None => println!("  timeout:     (none)"),
    }
    println!();
    println!("Global config: {}", AppConfig::global_config_path().display());
    Ok(())
}

pub async fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = AppConfig::load_global_overlay()?;
    overlay.set(key, value)?;
    AppConfig::save_global_overlay(&overlay)?;

    println!("Set {key} in {}", AppConfig::global_config_path().display());
    Ok(())
}

pub async fn reset() -> Result<(), Box<dyn std::error::Error>> {
    AppConfig::reset_global()?;
    println!("Global config reset to defaults.");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::global_config_path().display());
    Ok(())
}

/// First 8 characters and `...`; short keys are fully hidden.
fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(k) if k.chars().count() > 8 => {
            let head: String = k.chars().take(8).collect();
            format!("{head}...")
        }
        Some(_) => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_valid() {
        let path = AppConfig::global_config_path();
        assert!(path.to_str().unwrap().ends_with("config.toml"));
    }

    #[test]
    fn mask_long_key() {
        assert_eq!(mask_key(Some("sk-abcdefghijklmnop")), "sk-abcde...");
    }

    #[test]
    fn mask_short_key() {
        assert_eq!(mask_key(Some("sk-1234")), "***");
        assert_eq!(mask_key(Some("12345678")), "***");
    }

    #[test]
    fn mask_missing_key() {
        assert_eq!(mask_key(None), "(not set)");
    }
}
