//! Settings CLI commands

use clap::Subcommand;

use crate::error::PennywiseResult;
use crate::models::{Currency, SettingsUpdate, Theme};
use crate::services::SettingsService;
use crate::storage::Storage;

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the current settings
    Show,

    /// Change currency or theme
    Set {
        /// Currency code (USD, EUR, GBP, INR, JPY, CAD, AUD)
        #[arg(long)]
        currency: Option<Currency>,
        /// Theme (light, dark, system)
        #[arg(long)]
        theme: Option<Theme>,
    },
}

/// Handle a settings command
pub fn handle_settings_command(storage: &Storage, cmd: SettingsCommands) -> PennywiseResult<()> {
    let service = SettingsService::new(storage);

    match cmd {
        SettingsCommands::Show => {
            let settings = service.get_settings()?;
            println!("Currency: {} ({})", settings.currency, settings.currency.symbol());
            println!("Theme:    {}", settings.theme);
        }

        SettingsCommands::Set { currency, theme } => {
            if currency.is_none() && theme.is_none() {
                println!("No changes specified. Use --currency or --theme.");
                return Ok(());
            }

            let settings = service.update_settings(SettingsUpdate { currency, theme })?;
            println!("Currency: {}", settings.currency);
            println!("Theme:    {}", settings.theme);
        }
    }

    Ok(())
}
