//! CLI tool to query a running IGC info server.

use clap::{Parser, Subcommand};
use igc_core::models::TrackField;
use igc_sdk::IgcInfoClient;

/// Query service status, track listings and track details
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// IGC info server URL
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show service uptime and version
    Status,
    /// List all registered track IDs
    List,
    /// Show the full detail of one track
    Detail { id: String },
    /// Show a single field of one track
    Field { id: String, field: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = IgcInfoClient::new(&args.server);

    match args.command {
        Command::Status => {
            let status = client.status().await?;
            println!("uptime:  {}", status.uptime);
            println!("info:    {}", status.info);
            println!("version: {}", status.version);
        }
        Command::List => {
            for id in client.list_tracks().await? {
                println!("{id}");
            }
        }
        Command::Detail { id } => {
            let detail = client.track_detail(&id).await?;
            println!("H_date:       {}", detail.h_date);
            println!("pilot:        {}", detail.pilot);
            println!("glider:       {}", detail.glider);
            println!("glider_id:    {}", detail.glider_id);
            println!("track_length: {}", detail.track_length);
        }
        Command::Field { id, field } => {
            let field: TrackField = field
                .parse()
                .map_err(|e| anyhow::anyhow!("{e} (expected one of: pilot, glider, glider_id, track_length, H_date)"))?;
            println!("{}", client.track_field(&id, field).await?);
        }
    }

    Ok(())
}
