//! Seed script for development: pushes the demo listings into a running
//! server through the REST client and prints the resulting dashboards.
//!
//! Usage: `cargo run --bin seed`
//!
//! Reads `API_BASE_URL` (default `http://localhost:5000/api`) and logs in as
//! the demo administrator, which the server creates at startup. Demo listings
//! whose title the administrator already owns are skipped, so running it
//! against a server that seeded itself changes nothing.

use listdesk::client::{ListingSource, RestClient};
use listdesk::config::ClientConfig;
use listdesk::dashboard::format::{format_currency, format_percentage};
use listdesk::dashboard::Dashboard;
use listdesk::db::demo::DemoData;
use listdesk::models::user::{Owner, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD};
use listdesk::models::{Campaign, Item, Job};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "listdesk=info".into()),
        )
        .init();

    let config = ClientConfig::from_env();
    let mut client = RestClient::new(&config);
    let owner = client
        .login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)
        .await?
        .owner()
        .ok_or_else(|| anyhow::anyhow!("login returned no user"))?;

    println!("=== listdesk Seed Script ===");
    println!("Server: {}", config.api_base_url);

    let items = seed::<Item>(&client, &owner).await?;
    println!(
        "Items: {} active, {} sold, {} draft; active value {}, sold value {}",
        items.active,
        items.sold,
        items.draft,
        format_currency(items.total_value),
        format_currency(items.sold_value)
    );

    let jobs = seed::<Job>(&client, &owner).await?;
    println!(
        "Jobs: {} active, {} closed, {} draft across {} categories",
        jobs.active,
        jobs.closed,
        jobs.draft,
        jobs.by_category.len()
    );

    let campaigns = seed::<Campaign>(&client, &owner).await?;
    println!(
        "Campaigns: budget {}, {} leads, average conversion {}",
        format_currency(campaigns.total_budget),
        campaigns.total_leads,
        format_percentage(campaigns.average_conversion_rate)
    );

    println!("\n=== Seed complete! ===");
    Ok(())
}

/// Create the missing demo drafts through a dashboard and return its final
/// stats.
async fn seed<L>(client: &RestClient, owner: &Owner) -> anyhow::Result<L::Stats>
where
    L: DemoData,
    RestClient: ListingSource<L>,
{
    let mut dashboard = Dashboard::<L, _>::new(client.clone());
    dashboard.load(owner).await?;

    let missing = L::missing_drafts(dashboard.listings());
    let skipped = L::demo_drafts().len().saturating_sub(missing.len());
    for draft in missing {
        dashboard.create(draft).await?;
    }
    let created = dashboard.take_notices().len();
    tracing::info!(kind = L::KIND.plural, created, skipped, "Demo listings seeded");
    println!("  created {created} {}, skipped {skipped}", L::KIND.plural);

    dashboard
        .stats()
        .ok_or_else(|| anyhow::anyhow!("{} dashboard not loaded", L::KIND.noun))
}
