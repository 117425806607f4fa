//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Optional field updates for `profile set`.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    /// Chat-completions base URL
    pub endpoint: Option<String>,
    /// Model name
    pub model: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Transport timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Retries for transient failures
    pub max_retries: Option<u32>,
}

/// Execute the profile command.
pub async fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, name, formatter),
        ProfileAction::Set {
            name,
            endpoint,
            model,
            api_key_env,
            temperature,
            timeout_secs,
            max_retries,
        } => {
            let update = ProfileUpdate {
                endpoint,
                model,
                api_key_env,
                temperature,
                timeout_secs,
                max_retries,
            };
            set_profile(config, name, update, formatter)
        }
        ProfileAction::Delete { name } => delete_profile(config, name, formatter),
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");

    let key_status = if profile.api_key().is_ok() { "set" } else { "missing" };
    println!("  API key: {} ({})", profile.api_key_env, key_status);

    Ok(())
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}Endpoint: {}", indent, profile.endpoint);
    println!("{}Model: {}", indent, profile.model);
    if let Some(temperature) = profile.temperature {
        println!("{}Temperature: {}", indent, temperature);
    }
    println!("{}Timeout: {}s", indent, profile.timeout_secs);
    if profile.max_retries > 0 {
        println!("{}Retries: {}", indent, profile.max_retries);
    }
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save()?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Create or update a profile; unset fields keep their current or default value.
fn set_profile(
    config: &mut Config,
    name: String,
    update: ProfileUpdate,
    formatter: &Formatter,
) -> Result<()> {
    let existing = config.profiles.get(&name).cloned();
    let action = if existing.is_some() { "Updated" } else { "Created" };

    let mut profile = existing.unwrap_or_default();
    if let Some(endpoint) = update.endpoint {
        profile.endpoint = endpoint;
    }
    if let Some(model) = update.model {
        profile.model = model;
    }
    if let Some(api_key_env) = update.api_key_env {
        profile.api_key_env = api_key_env;
    }
    if let Some(temperature) = update.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(CliError::InvalidInput(format!(
                "Temperature must be between 0 and 2, got {}",
                temperature
            )));
        }
        profile.temperature = Some(temperature);
    }
    if let Some(timeout_secs) = update.timeout_secs {
        profile.timeout_secs = timeout_secs;
    }
    if let Some(max_retries) = update.max_retries {
        profile.max_retries = max_retries;
    }

    config.set_profile(name.clone(), profile);
    config.save()?;

    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, name))
    );

    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    if config.profiles.remove(&name).is_some() {
        config.save()?;
        println!(
            "{}",
            formatter.success(&format!("Deleted profile '{}'", name))
        );
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Profile '{}' does not exist", name))
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn temp_config(dir: &TempDir) -> Config {
        Config::load_from(&dir.path().join("config.toml")).unwrap()
    }

    #[test]
    fn test_set_and_switch_profile() {
        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        let update = ProfileUpdate {
            endpoint: Some("http://localhost:11434/v1".to_string()),
            model: Some("llama3".to_string()),
            ..ProfileUpdate::default()
        };
        set_profile(&mut config, "local".to_string(), update, &formatter).unwrap();

        let profile = &config.profiles["local"];
        assert_eq!(profile.model, "llama3");
        assert_eq!(profile.api_key_env, "OPENAI_API_KEY");

        switch_profile(&mut config, "local".to_string(), &formatter).unwrap();
        assert_eq!(config.active_profile, "local");

        // Persisted to the temp file
        let reloaded = temp_config(&dir);
        assert_eq!(reloaded.active_profile, "local");
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        let update = ProfileUpdate {
            max_retries: Some(2),
            ..ProfileUpdate::default()
        };
        set_profile(&mut config, "default".to_string(), update, &formatter).unwrap();

        let profile = &config.profiles["default"];
        assert_eq!(profile.max_retries, 2);
        assert_eq!(profile.model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        let update = ProfileUpdate {
            temperature: Some(3.5),
            ..ProfileUpdate::default()
        };
        let result = set_profile(&mut config, "hot".to_string(), update, &formatter);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(!config.profiles.contains_key("hot"));
    }

    #[test]
    fn test_delete_active_profile() {
        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = delete_profile(&mut config, "default".to_string(), &formatter);
        assert!(result.is_err());
    }
}
