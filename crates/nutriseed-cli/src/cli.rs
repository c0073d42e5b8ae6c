//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nutriseed_core::auth::credentials::SECRET_NAMES;
use nutriseed_core::auth::CredentialStore;
use nutriseed_core::SeedKind;

/// Seed the fitness app's document store and query its nutrition APIs.
///
/// Configuration comes from ~/.config/nutriseed/config.json, the environment
/// (.env is honoured) and the OS keychain. Set RUST_LOG to change verbosity.
#[derive(Parser, Debug)]
#[command(name = "nutriseed", author, version, about, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge-write a JSON seed file into a collection
    Load(LoadArgs),
    /// FatSecret Platform API
    #[command(subcommand)]
    Fatsecret(FatSecretCommand),
    /// Edamam Food Database API
    #[command(subcommand)]
    Edamam(EdamamCommand),
    /// Spoonacular API
    #[command(subcommand)]
    Spoonacular(SpoonacularCommand),
    /// Manage API secrets in the OS keychain
    #[command(subcommand)]
    Credentials(CredentialsCommand),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoadArgs {
    /// exercises, menus or forms
    pub kind: SeedKind,
    /// Array of records, or an object keyed by document id
    pub file: PathBuf,
    /// Target collection (defaults to the kind's name)
    #[arg(long, value_parser = parse_collection)]
    pub collection: Option<String>,
    /// Records per commit, 1 to 500
    #[arg(long)]
    pub batch_size: Option<usize>,
    /// Write to an in-memory store instead of Firestore
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum FatSecretCommand {
    /// Search foods by free text
    Search {
        #[arg(required = true)]
        expression: Vec<String>,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Results per page (capped at 50)
        #[arg(long, default_value_t = 20)]
        max: u32,
    },
    /// Show one food with all of its servings
    Food { food_id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum EdamamCommand {
    /// Parse a free-text ingredient such as "1 cup rice"
    Parse {
        #[arg(required = true)]
        ingredient: Vec<String>,
    },
    /// Food name suggestions for a partial query
    Autocomplete {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SpoonacularCommand {
    /// Search recipes
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(long, default_value_t = 10)]
        number: u32,
    },
    /// Show one recipe with its ingredients
    Recipe { id: i64 },
    /// Search ingredients
    Ingredients {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(long, default_value_t = 10)]
        number: u32,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CredentialsCommand {
    /// Prompt for a secret and store it
    Set {
        #[arg(value_parser = parse_secret_name)]
        name: String,
    },
    /// Remove a stored secret
    Delete {
        #[arg(value_parser = parse_secret_name)]
        name: String,
    },
}

/// Join free-text words back into one query string.
pub fn text(words: &[String]) -> String {
    words.join(" ")
}

fn parse_secret_name(name: &str) -> Result<String, String> {
    if CredentialStore::is_known(name) {
        Ok(name.to_string())
    } else {
        Err(format!("expected one of: {}", SECRET_NAMES.join(", ")))
    }
}

fn parse_collection(name: &str) -> Result<String, String> {
    nutriseed_core::store::validate_collection_id(name)
        .map(|()| name.to_string())
        .map_err(|e| e.to_string())
}
