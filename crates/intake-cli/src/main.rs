//! Intake CLI: submit the onboarding form from the command line.
//!
//! Set INTAKE_API_URL (default http://localhost:3000).

use anyhow::Context;
use clap::{Parser, Subcommand};
use intake_api_client::{humanize_error, ApiClient, FormCollector, FormState, NoticeLevel};
use intake_cli::{init_tracing, load_file, parse_file_arg, parse_key_value};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "intake", about = "Client onboarding intake CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the form with text fields and files
    Submit {
        /// Text field, as NAME=VALUE (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// File to attach, as CATEGORY=PATH (repeatable)
        #[arg(long = "file", value_name = "CATEGORY=PATH")]
        files: Vec<String>,
    },
    /// Relay a single file to the content host
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Target folder on the content host
        #[arg(long)]
        folder: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = ApiClient::from_env()?;

    match cli.command {
        Commands::Submit { fields, files } => submit(client, fields, files).await,
        Commands::Upload { file, folder } => {
            let selected = load_file(&file)?;
            let attachment = client
                .relay_asset(&selected.filename, &selected.data, folder.as_deref())
                .await
                .map_err(|e| anyhow::anyhow!(humanize_error(&e)))?;
            println!("{}", serde_json::to_string_pretty(&attachment)?);
            Ok(())
        }
    }
}

async fn submit(client: ApiClient, fields: Vec<String>, files: Vec<String>) -> anyhow::Result<()> {
    let mut form = FormState::new();

    for arg in &fields {
        let (name, value) = parse_key_value(arg)?;
        form = form.with_field(&name, &value);
    }

    for arg in &files {
        let (category, path) = parse_file_arg(arg)?;
        let file = load_file(Path::new(&path)).with_context(|| format!("Cannot attach {}", path))?;
        let (next, rejections) = form.add_files(category, [file]);
        for rejection in rejections {
            eprintln!("warning: {}", rejection);
        }
        form = next;
    }

    eprintln!("Form {:.0}% complete", form.progress() * 100.0);

    let collector = FormCollector::new(client);
    let outcome = collector
        .submit(&form)
        .await
        .map_err(|e| anyhow::anyhow!(humanize_error(&e)))?;

    for notice in &outcome.notices {
        let prefix = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        };
        eprintln!("{}: {}", prefix, notice.message);
    }

    println!("{}", serde_json::to_string_pretty(&outcome.response)?);
    Ok(())
}
