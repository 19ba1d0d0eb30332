use clap::Subcommand;
use sprayflow_core::{Category, Settings};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "interval", "enabled_categories")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value; categories as JSON, e.g. '["footwork","balance"]'
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
    /// Enable a category if disabled, disable it otherwise
    Toggle {
        category: Category,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SettingsAction::Get { key } => {
            let settings = Settings::load()?;
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    return Err(format!(
                        "unknown key: {key} (known: {})",
                        Settings::keys().join(", ")
                    )
                    .into())
                }
            }
        }
        SettingsAction::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(&key, &value)?;
            settings.save()?;
            println!("ok");
        }
        SettingsAction::List => {
            let settings = Settings::load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Reset => {
            Settings::default().save()?;
            println!("settings reset to defaults");
        }
        SettingsAction::Toggle { category } => {
            let mut settings = Settings::load()?;
            let enabled = settings.toggle_category(category);
            settings.save()?;
            println!(
                "{} {}",
                category.label(),
                if enabled { "enabled" } else { "disabled" }
            );
            if settings.enabled_categories.is_empty() {
                eprintln!("warning: no categories enabled; sessions cannot start");
            }
        }
    }
    Ok(())
}
