//! Daybook CLI
//!
//! Command-line client for a running Daybook server:
//! - Write, edit and delete entries
//! - List, search and filter entries
//! - Show statistics and current weather

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use daybook::diary::{CreateDiary, DiaryEntry, StatsReport, UpdateDiary};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(name = "daybook-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Write and browse your Daybook journal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:3000", global = true)]
    pub api_url: String,

    /// Bearer token
    #[arg(long, env = "DAYBOOK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Print raw JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a new entry
    Write {
        title: String,
        content: String,
        /// Emotion label (e.g., happy, calm)
        #[arg(short, long)]
        emotion: String,
        /// Diary date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List all entries
    List,

    /// Show one entry
    Show { id: i64 },

    /// Search titles and content (case-sensitive)
    Search { keyword: String },

    /// Entries with an emotion
    Emotion { emotion: String },

    /// Entries for a diary date (YYYY-MM-DD)
    Date { date: String },

    /// Edit an entry; only the given fields change
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(short, long)]
        emotion: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an entry
    Delete { id: i64 },

    /// Show journaling statistics
    Stats,

    /// Current weather at a location
    Weather {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },
}

/// Thin wrapper that adds the base URL and bearer token to every request
struct DaybookClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl DaybookClient {
    fn new(api_url: &str, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/api/v1", api_url.trim_end_matches('/')),
            token,
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.request(self.client.get(format!("{}{}", self.base_url, path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.request(self.client.post(format!("{}{}", self.base_url, path)))
    }

    fn patch(&self, path: &str) -> RequestBuilder {
        self.request(self.client.patch(format!("{}{}", self.base_url, path)))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.request(self.client.delete(format!("{}{}", self.base_url, path)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let api = DaybookClient::new(&cli.api_url, cli.token.clone());

    match cli.command {
        Commands::Write {
            title,
            content,
            emotion,
            date,
            lat,
            lon,
        } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive().to_string());
            let mut body = CreateDiary::new(title, content, emotion, date);
            if let (Some(lat), Some(lon)) = (lat, lon) {
                body = body.at(lat, lon);
            }

            let entry: DiaryEntry = send(api.post("/diaries").json(&body)).await?;
            if cli.json {
                print_json(&entry)?;
            } else {
                println!("Created entry #{} for {}", entry.id, entry.diary_date);
                if let Some(weather) = &entry.weather {
                    println!("Weather: {}", weather);
                }
            }
        }

        Commands::List => {
            let entries: Vec<DiaryEntry> = send(api.get("/diaries")).await?;
            print_entries(&entries, cli.json)?;
        }

        Commands::Show { id } => {
            let entry: DiaryEntry = send(api.get(&format!("/diaries/{}", id))).await?;
            if cli.json {
                print_json(&entry)?;
            } else {
                print_entry(&entry);
            }
        }

        Commands::Search { keyword } => {
            let entries: Vec<DiaryEntry> =
                send(api.get("/diaries/search").query(&[("keyword", keyword)])).await?;
            print_entries(&entries, cli.json)?;
        }

        Commands::Emotion { emotion } => {
            let entries: Vec<DiaryEntry> =
                send(api.get(&format!("/diaries/emotion/{}", emotion))).await?;
            print_entries(&entries, cli.json)?;
        }

        Commands::Date { date } => {
            let entries: Vec<DiaryEntry> = send(api.get(&format!("/diaries/date/{}", date))).await?;
            print_entries(&entries, cli.json)?;
        }

        Commands::Edit {
            id,
            title,
            content,
            emotion,
            date,
        } => {
            let body = UpdateDiary {
                title,
                content,
                emotion,
                diary_date: date,
                ..Default::default()
            };
            if body.is_empty() {
                bail!("Nothing to change; pass at least one of --title, --content, --emotion, --date");
            }

            let entry: DiaryEntry = send(api.patch(&format!("/diaries/{}", id)).json(&body)).await?;
            if cli.json {
                print_json(&entry)?;
            } else {
                println!("Updated entry #{}", entry.id);
            }
        }

        Commands::Delete { id } => {
            check(api.delete(&format!("/diaries/{}", id))).await?;
            println!("Deleted entry #{}", id);
        }

        Commands::Stats => {
            let stats: StatsReport = send(api.get("/diaries/stats")).await?;
            if cli.json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }

        Commands::Weather { lat, lon } => {
            let weather: serde_json::Value =
                send(api.get("/weather").query(&[("lat", lat), ("lon", lon)])).await?;
            if cli.json {
                print_json(&weather)?;
            } else {
                println!(
                    "Weather at ({}, {}): {}",
                    lat,
                    lon,
                    weather["condition"].as_str().unwrap_or("Unknown")
                );
            }
        }
    }

    Ok(())
}

/// Send a request and decode a JSON success body
async fn send<T: DeserializeOwned>(request: RequestBuilder) -> anyhow::Result<T> {
    let response = check(request).await?;
    response.json().await.context("Unexpected response body")
}

/// Send a request and turn non-2xx responses into errors
async fn check(request: RequestBuilder) -> anyhow::Result<Response> {
    let response = request
        .send()
        .await
        .context("Cannot connect to the Daybook API (is `daybook serve` running?)")?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(text);

    bail!("Request failed ({}): {}", status, message)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_entries(entries: &[DiaryEntry], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    println!("{:<6} {:<12} {:<12} {}", "ID", "Date", "Emotion", "Title");
    println!("{}", "-".repeat(60));

    for entry in entries {
        println!(
            "{:<6} {:<12} {:<12} {}",
            entry.id,
            entry.diary_date.to_string(),
            entry.emotion,
            entry.title
        );
    }

    Ok(())
}

fn print_entry(entry: &DiaryEntry) {
    println!("#{} {}", entry.id, entry.title);
    println!("Date:    {}", entry.diary_date);
    println!("Emotion: {}", entry.emotion);
    if let Some(weather) = &entry.weather {
        println!("Weather: {}", weather);
    }
    println!();
    println!("{}", entry.content);
}

fn print_stats(stats: &StatsReport) {
    println!("Total entries:   {}", stats.total_diaries);
    println!("Current streak:  {} day(s)", stats.current_streak);
    println!("This month:      {}", stats.this_month_count);
    println!(
        "Most frequent:   {}",
        stats.most_frequent_emotion.as_deref().unwrap_or("-")
    );

    if !stats.emotion_counts.is_empty() {
        println!();
        println!("Emotions:");
        for count in &stats.emotion_counts {
            println!("  {:<12} {}", count.emotion, count.count);
        }
    }

    if !stats.monthly_trend.is_empty() {
        println!();
        println!("By month:");
        for month in &stats.monthly_trend {
            let summary: Vec<String> = month
                .emotions
                .iter()
                .map(|c| format!("{} {}", c.emotion, c.count))
                .collect();
            println!("  {}  {}", month.month, summary.join(", "));
        }
    }
}
