//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::PennywiseResult;
use crate::models::{CategoryUpdate, Color, Icon};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Icon tag (e.g., shopping-cart, home, plane)
        #[arg(long, default_value_t = Icon::Tag)]
        icon: Icon,
        /// Colour tag (e.g., green, blue, teal)
        #[arg(long, default_value_t = Color::Gray)]
        color: Color,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New icon tag
        #[arg(long)]
        icon: Option<Icon>,
        /// New colour tag
        #[arg(long)]
        color: Option<Color>,
    },

    /// Delete a category (its allocations and expenses are kept)
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> PennywiseResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            print!("{}", format_category_list(&service.list_categories()?));
        }

        CategoryCommands::Add { name, icon, color } => {
            let category = service.create_category(&name, icon, color)?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Edit {
            category,
            name,
            icon,
            color,
        } => {
            let cat = service.find_category(&category)?;

            if name.is_none() && icon.is_none() && color.is_none() {
                println!("No changes specified. Use --name, --icon, or --color.");
                return Ok(());
            }

            let updated = service.update_category(cat.id, CategoryUpdate { name, icon, color })?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let cat = service.find_category(&category)?;
            service.delete_category(cat.id)?;
            println!("Deleted category: {}", cat.name);
        }
    }

    Ok(())
}
