//! Command implementations. Each one does a single job and returns.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use nutriseed_core::auth::CredentialStore;
use nutriseed_core::loader::read_records;
use nutriseed_core::utils::truncate_string;
use nutriseed_core::{
    BatchLoader, Config, DocumentStore, EdamamClient, FatSecretClient, FirestoreStore, LoadReport,
    MemoryStore, SeedKind, SpoonacularClient,
};

use crate::cli::{
    text, Command, CredentialsCommand, EdamamCommand, FatSecretCommand, LoadArgs, SpoonacularCommand,
};

/// Width used when printing one-line descriptions
const DESCRIPTION_WIDTH: usize = 72;

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Load(args) => run_load(args).await,
        Command::Fatsecret(command) => run_fatsecret(command).await,
        Command::Edamam(command) => run_edamam(command).await,
        Command::Spoonacular(command) => run_spoonacular(command).await,
        Command::Credentials(command) => run_credentials(command),
    }
}

async fn run_load(args: LoadArgs) -> Result<()> {
    let config = Config::resolve()?;
    let report = load(
        &config,
        args.kind,
        &args.file,
        args.collection,
        args.batch_size,
        args.dry_run,
    )
    .await?;
    println!(
        "{} {} records into '{}' in {} batches",
        if args.dry_run { "Would write" } else { "Wrote" },
        report.records,
        report.collection,
        report.batches
    );
    Ok(())
}

async fn run_fatsecret(command: FatSecretCommand) -> Result<()> {
    let client = FatSecretClient::from_config(&Config::resolve()?)?;
    match command {
        FatSecretCommand::Search { expression, page, max } => {
            let results = client.search_foods(&text(&expression), page, max).await?;
            for food in &results.foods {
                let description = food.food_description.as_deref().unwrap_or("");
                println!(
                    "{}\t{}\t{}",
                    food.food_id,
                    food.food_name,
                    truncate_string(description, DESCRIPTION_WIDTH)
                );
            }
            println!(
                "-- page {} ({} of {} results{})",
                results.page_number,
                results.foods.len(),
                results.total_results,
                if results.has_more() { ", more available" } else { "" }
            );
            Ok(())
        }
        FatSecretCommand::Food { food_id } => print_json(&client.get_food(&food_id).await?),
    }
}

async fn run_edamam(command: EdamamCommand) -> Result<()> {
    let client = EdamamClient::from_config(&Config::resolve()?)?;
    match command {
        EdamamCommand::Parse { ingredient } => {
            let ingredient = text(&ingredient);
            let parsed = client.parse_food(&ingredient).await?;
            match parsed.best_match() {
                Some(food) => print_json(food),
                None => bail!("Edamam found no food matching {:?}", ingredient),
            }
        }
        EdamamCommand::Autocomplete { query, limit } => {
            for suggestion in client.autocomplete(&text(&query), limit).await? {
                println!("{}", suggestion);
            }
            Ok(())
        }
    }
}

async fn run_spoonacular(command: SpoonacularCommand) -> Result<()> {
    let client = SpoonacularClient::from_config(&Config::resolve()?)?;
    match command {
        SpoonacularCommand::Search { query, number } => {
            let search = client.search_recipes(&text(&query), number).await?;
            for recipe in &search.results {
                println!("{}\t{}", recipe.id, recipe.title);
            }
            println!("-- {} of {} results", search.results.len(), search.total_results);
            Ok(())
        }
        SpoonacularCommand::Recipe { id } => print_json(&client.recipe_information(id).await?),
        SpoonacularCommand::Ingredients { query, number } => {
            let search = client.search_ingredients(&text(&query), number).await?;
            for ingredient in &search.results {
                println!("{}\t{}", ingredient.id, ingredient.name);
            }
            Ok(())
        }
    }
}

fn run_credentials(command: CredentialsCommand) -> Result<()> {
    match command {
        CredentialsCommand::Set { name } => {
            let secret = rpassword::prompt_password(format!("{}: ", name))
                .context("Failed to read secret")?;
            if secret.trim().is_empty() {
                bail!("Refusing to store an empty secret");
            }
            CredentialStore::store(&name, secret.trim())?;
            info!(name = %name, "Stored secret in keychain");
        }
        CredentialsCommand::Delete { name } => {
            CredentialStore::delete(&name)?;
            info!(name = %name, "Deleted secret from keychain");
        }
    }
    Ok(())
}

/// Batch size precedence: flag, then config, then the kind's default.
pub fn effective_batch_size(kind: SeedKind, flag: Option<usize>, config: &Config) -> usize {
    flag.or(config.batch_size)
        .unwrap_or_else(|| kind.default_batch_size())
}

pub async fn load(
    config: &Config,
    kind: SeedKind,
    file: &Path,
    collection: Option<String>,
    batch_size: Option<usize>,
    dry_run: bool,
) -> Result<LoadReport> {
    let loader = BatchLoader::new(effective_batch_size(kind, batch_size, config))?;
    let collection = collection.unwrap_or_else(|| kind.default_collection().to_string());
    let records = read_records(file, kind)?;

    if records.is_empty() {
        warn!(file = %file.display(), "Seed file contains no records");
    }

    let store: Box<dyn DocumentStore> = if dry_run {
        info!("Dry run: writing to an in-memory store");
        Box::new(MemoryStore::new())
    } else {
        Box::new(FirestoreStore::from_config(config)?)
    };

    loader.load(store.as_ref(), &collection, records).await
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let value: Value = serde_json::to_value(value)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
