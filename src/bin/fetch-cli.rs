use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fetch_client::config::{load_config, ClientConfig};
use fetch_client::observability::logging;
use fetch_client::{FetchClient, FetchError, Payload, RequestOptions};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;

#[derive(Parser)]
#[command(name = "fetch-cli")]
#[command(about = "Perform one normalized HTTP request and print the decoded body", long_about = None)]
struct Cli {
    /// Address to request; relative addresses need a base URL
    address: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL for relative addresses (overrides the config file)
    #[arg(short, long)]
    base_url: Option<String>,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Extra header, as `Name: value` (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body
    #[arg(short, long)]
    data: Option<String>,
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), Box<dyn std::error::Error>> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("header `{}` is not in `Name: value` form", raw))?;
    Ok((
        HeaderName::from_bytes(name.trim().as_bytes())?,
        HeaderValue::from_str(value.trim())?,
    ))
}

fn build_options(cli: &Cli) -> Result<RequestOptions, Box<dyn std::error::Error>> {
    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())?;
    let mut options = RequestOptions::new().method(method);
    for raw in &cli.headers {
        let (name, value) = parse_header(raw)?;
        options = options.header(name, value);
    }
    if let Some(data) = &cli.data {
        options = options.body(data.clone());
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if cli.base_url.is_some() {
        config.base_url = cli.base_url.clone();
    }

    logging::init(&config.observability);

    let client = FetchClient::from_config(&config)?;
    let options = build_options(&cli)?;

    match client.request(&cli.address, options).await {
        Ok(payload) => {
            print_payload(&payload)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(FetchError::Http(record)) => {
            eprintln!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_payload(payload: &Payload) -> Result<(), Box<dyn std::error::Error>> {
    match payload {
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Payload::Text(text) => println!("{}", text),
    }
    Ok(())
}
