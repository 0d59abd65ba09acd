use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use upselia_actions_backend::links::store::read_links;

#[derive(Parser)]
#[command(name = "actions-cli")]
#[command(about = "Client and link-file checker for the Upselia actions backend", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Resolve a link key
    OpenLink {
        url_key: String,
    },
    /// Resolve the checkout link for a trainer or key
    OpenCheckout {
        #[arg(short, long)]
        trainer_id: Option<String>,
        #[arg(short = 'k', long)]
        url_key: Option<String>,
    },
    /// File a support ticket
    CreateTicket {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        message: String,
        #[arg(short, long)]
        trainer_id: Option<String>,
        #[arg(short, long)]
        contact: Option<String>,
    },
    /// Validate a links file without starting the service
    CheckLinks {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::OpenLink { url_key } => {
            let res = client
                .post(format!("{}/open_link", cli.url))
                .json(&json!({ "url_key": url_key }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::OpenCheckout { trainer_id, url_key } => {
            let res = client
                .post(format!("{}/open_checkout", cli.url))
                .json(&json!({ "trainer_id": trainer_id, "url_key": url_key }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::CreateTicket {
            topic,
            message,
            trainer_id,
            contact,
        } => {
            let res = client
                .post(format!("{}/create_ticket", cli.url))
                .json(&json!({
                    "topic": topic,
                    "message": message,
                    "trainer_id": trainer_id,
                    "contact": contact,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::CheckLinks { path } => {
            let loaded = read_links(&path)?;
            println!(
                "{} links, {} defaults, {} trainers",
                loaded.config.links.len(),
                loaded.config.defaults.len(),
                loaded.config.trainers.len()
            );
            if loaded.issues.is_empty() {
                println!("No problems found");
            } else {
                for issue in &loaded.issues {
                    println!(" - {}", issue);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        std::process::exit(1);
    }
    Ok(())
}
