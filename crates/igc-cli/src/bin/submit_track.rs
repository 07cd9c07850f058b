//! CLI tool to submit track file URLs to a running IGC info server.

use clap::Parser;
use igc_sdk::IgcInfoClient;

/// Submit one or more IGC track URLs and print the assigned IDs
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// IGC info server URL
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    /// Track file URLs to submit
    #[arg(required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = IgcInfoClient::new(&args.server);

    let mut failures = 0usize;
    for url in &args.urls {
        match client.submit_track(url).await {
            Ok(id) => println!("{id}  {url}"),
            Err(e) => {
                eprintln!("Failed to submit {url}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} submissions failed", args.urls.len());
    }
    Ok(())
}
