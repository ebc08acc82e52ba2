use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the provider gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:8000")]
    url: String,

    #[arg(short, long, env = "GATEWAY_ADMIN_KEY", default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway status
    Status,
    /// Show the registry credential session
    Session,
    /// Clear the authentication lockout
    ResetLockout,
    /// Drop the cached credential
    Invalidate,
    /// Screen a person against sanctions and PEP lists
    ScreenPerson {
        /// Full name of the person
        name: String,
        #[arg(long, default_value = "CLI")]
        reference: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
    },
    /// Search the company registry by name
    Search {
        name: String,
        #[arg(long, default_value = "US")]
        country: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let res = match cli.command {
        Commands::Status => {
            client
                .get(format!("{base}/admin/status"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Session => {
            client
                .get(format!("{base}/admin/session"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::ResetLockout => {
            client
                .post(format!("{base}/admin/session/reset-lockout"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Invalidate => {
            client
                .post(format!("{base}/admin/session/invalidate"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::ScreenPerson { name, reference, dob } => {
            client
                .post(format!("{base}/screening/person"))
                .json(&json!({ "referenceId": reference, "fullName": name, "dob": dob }))
                .send()
                .await?
        }
        Commands::Search { name, country } => {
            client
                .get(format!("{base}/dnb/companies/search"))
                .query(&[("subject_name", name), ("country_iso_code", country)])
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
