use std::path::PathBuf;

use clap::{Parser, Subcommand};
use patient_store_core::Gender;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the Patient server
    #[arg(
        long,
        global = true,
        env = "PATIENT_API_URL",
        default_value = "http://localhost:3000"
    )]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stored patient ids
    List,

    /// Show one patient
    Get {
        /// Patient id
        id: u64,

        /// Print the raw JSON document instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Create a patient from a JSON file
    Create {
        /// Path to the Patient document
        file: PathBuf,
    },

    /// Replace a patient with the contents of a JSON file
    Update {
        /// Patient id
        id: u64,

        /// Path to the Patient document
        file: PathBuf,
    },

    /// Delete a patient
    Delete {
        /// Patient id
        id: u64,
    },

    /// Print a sample Patient document
    Template,

    /// Validate a JSON file without contacting the server
    Check {
        /// Path to the Patient document
        file: PathBuf,
    },

    /// Build a Patient from form fields
    New {
        #[arg(long)]
        given: Option<String>,

        #[arg(long)]
        family: Option<String>,

        /// One of male, female, other, unknown
        #[arg(long)]
        gender: Option<Gender>,

        /// Birth date as YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Single address line
        #[arg(long)]
        address: Option<String>,

        /// Mark the patient inactive
        #[arg(long)]
        inactive: bool,

        /// Send the document to the server instead of printing it
        #[arg(long)]
        submit: bool,
    },
}
