//! Run a PK-chunked bulk query and print the combined result as CSV.
//!
//! ```sh
//! export SF_SERVER_URL='https://na1.salesforce.com/services/Soap/u/47.0/00D...'
//! export SF_SESSION_ID='00D...!AQ...'
//! cargo run --bin bulk-query -- Account "SELECT Id, Name FROM Account" 50000
//! ```
//!
//! `BULK_POLL_SECS` sets the poll interval (default 5 seconds) and
//! `BULK_MAX_POLLS` the number of status checks before giving up (default 120).

use std::time::Duration;

use busbar_sf_auth::{Authenticator, SessionAuthenticator};
use busbar_sf_bulk::{BatchInput, BulkJobClient, CsvCodec, FetchOutcome, TabularCodec};
use tracing_subscriber::EnvFilter;

const DEFAULT_POLL_SECS: u64 = 5;
const DEFAULT_MAX_POLLS: u32 = 120;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(object), Some(soql)) = (args.next(), args.next()) else {
        eprintln!("Usage: bulk-query <object> <soql> [chunk-size]");
        std::process::exit(2);
    };
    let chunk_size = match args.next().map(|s| s.parse::<u32>()) {
        None => None,
        Some(Ok(size)) => Some(size),
        Some(Err(e)) => {
            eprintln!("Error: invalid chunk size: {e}");
            std::process::exit(2);
        }
    };

    let poll_interval = Duration::from_secs(env_or("BULK_POLL_SECS", DEFAULT_POLL_SECS));
    let max_polls = env_or("BULK_MAX_POLLS", DEFAULT_MAX_POLLS);

    if let Err(e) = run(&object, &soql, chunk_size, poll_interval, max_polls).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(
    object: &str,
    soql: &str,
    chunk_size: Option<u32>,
    poll_interval: Duration,
    max_polls: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = SessionAuthenticator::from_env()?.authenticate().await?;
    let client = BulkJobClient::new()?;

    let job = client.create_job("query", object, &session, chunk_size).await?;
    eprintln!("Opened job {job}");

    client
        .add_batch(&job, &BatchInput::Query(soql.to_string()), None)
        .await?;

    let mut data = None;
    for attempt in 1..=max_polls {
        match client.fetch_results(&job, None).await? {
            FetchOutcome::Ready { data: rows, .. } => {
                data = Some(rows);
                break;
            }
            FetchOutcome::NotReady { batches } => {
                eprintln!(
                    "  [{attempt}/{max_polls}] {} batches, waiting {}s",
                    batches.len(),
                    poll_interval.as_secs()
                );
                tokio::time::sleep(poll_interval).await;
            }
        }
    }

    client.close_job(&job, None).await?;

    let data = data.ok_or("job did not finish before the poll limit")?;
    print!("{}", CsvCodec.encode(&data)?);
    eprintln!("{} rows", data.len());
    Ok(())
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
