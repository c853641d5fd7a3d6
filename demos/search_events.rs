use anyhow::Context as _;
use eventful_api::prelude::*;
use tracing_subscriber::EnvFilter;

// Configuration is read from the environment:
//   EVENTFUL_APP_KEY   application key (required)
//   EVENTFUL_API_URL   alternative API endpoint (optional)
//   EVENTFUL_DEBUG     set to anything to trace requests and responses

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_key = std::env::var("EVENTFUL_APP_KEY").context("EVENTFUL_APP_KEY is not set")?;
    let keywords = std::env::args().nth(1).unwrap_or_else(|| "jazz".to_string());

    let mut builder = EventfulClientBuilder::new_http(app_key);
    if let Ok(url) = std::env::var("EVENTFUL_API_URL") {
        builder = builder.with_base_url(url);
    }
    let mut client = builder.build()?;
    if std::env::var_os("EVENTFUL_DEBUG").is_some() {
        client.set_debug();
    }

    println!("🔎 Searching events for \"{keywords}\"...\n");

    let args = CallArguments::new()
        .with("keywords", keywords.as_str())
        .with("page_size", 10);

    match client.call("events/search", args, ResponseFormat::Rest).await {
        Ok(response) => {
            let Some(root) = response.xml() else {
                return Ok(());
            };
            let total = root.child_text("total_items").unwrap_or("0");
            println!("✓ {total} events found");

            let events = root.child("events").into_iter().flat_map(|e| e.children_named("event"));
            for (i, event) in events.enumerate() {
                let title = event.child_text("title").unwrap_or("(untitled)");
                let venue = event.child_text("venue_name").unwrap_or("unknown venue");
                println!("  {}. {title} @ {venue}", i + 1);
            }
        }
        Err(e @ EventfulError::Remote { .. }) => {
            eprintln!("✗ The API rejected the search: {e}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
