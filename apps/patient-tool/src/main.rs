//! Command-line client for the Patient API.
//!
//! Provides commands for:
//! - Listing, reading, creating, updating and deleting patients
//! - Offline validation of Patient documents
//! - Building documents from form fields

mod cli;
mod client;

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use patient_store_core::display;
use patient_store_core::form::{self, PatientForm};
use patient_store_core::validation::validate;
use patient_store_core::Resource;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use client::ApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => {
            let client = ApiClient::new(&cli.base_url)?;
            match client.list_ids().await? {
                Some(ids) => {
                    for id in ids {
                        println!("{}", id);
                    }
                }
                None => println!("No patients found"),
            }
        }
        Commands::Get { id, json } => {
            let client = ApiClient::new(&cli.base_url)?;
            let patient = client.get(id).await?;
            if json {
                print_json(&patient)?;
            } else {
                println!("{}", display::summary(&patient));
            }
        }
        Commands::Create { file } => {
            let patient = read_checked(&file)?;
            let client = ApiClient::new(&cli.base_url)?;
            let stored = client.create(&patient).await?;
            print_json(&stored)?;
        }
        Commands::Update { id, file } => {
            let patient = read_checked(&file)?;
            let client = ApiClient::new(&cli.base_url)?;
            let stored = client.update(id, &patient).await?;
            print_json(&stored)?;
        }
        Commands::Delete { id } => {
            let client = ApiClient::new(&cli.base_url)?;
            client.delete(id).await?;
            println!("Patient {} deleted", id);
        }
        Commands::Template => print_json(&form::template())?,
        Commands::Check { file } => check_file(&file)?,
        Commands::New {
            given,
            family,
            gender,
            birth_date,
            phone,
            email,
            address,
            inactive,
            submit,
        } => {
            let form = PatientForm {
                given: given.unwrap_or_default(),
                family: family.unwrap_or_default(),
                gender,
                birth_date,
                phone,
                email,
                address,
                active: !inactive,
            };
            let missing = form.missing_fields();
            if !missing.is_empty() {
                bail!("Missing required fields: {}", missing.join(", "));
            }

            let patient = form.build(None);
            if submit {
                let client = ApiClient::new(&cli.base_url)?;
                let stored = client.create(&patient).await?;
                print_json(&stored)?;
            } else {
                print_json(&patient)?;
            }
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Reads a document and applies the strict client rules before sending.
fn read_checked(path: &Path) -> anyhow::Result<Resource> {
    let document = read_document(path)?;
    let patient = form::validate_strict(Some(&document))?;
    Ok(patient.clone())
}

fn check_file(path: &Path) -> anyhow::Result<()> {
    let document = read_document(path)?;
    let server = validate(Some(&document)).map(|_| ());
    let client = form::validate_strict(Some(&document)).map(|_| ());

    for (label, result) in [("Server rules", &server), ("Client rules", &client)] {
        match result {
            Ok(()) => println!("{}: ok", label),
            Err(e) => println!("{}: {}", label, e),
        }
    }

    if server.is_err() || client.is_err() {
        bail!("{} failed validation", path.display());
    }
    Ok(())
}

fn print_json(patient: &Resource) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(patient)?);
    Ok(())
}
