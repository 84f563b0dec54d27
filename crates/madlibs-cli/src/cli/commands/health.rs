//! Backend health check command.

use anyhow::{Context, Result};
use madlibs_core::api::MadLibsClient;

pub async fn run(base_url: String) -> Result<()> {
    let client = MadLibsClient::new(base_url);
    let health = client.health().await.context("backend health check")?;

    println!("Backend:   {}", client.base_url());
    println!("Status:    {}", health.status);
    println!(
        "API key:   {}",
        if health.api_key_configured {
            "configured"
        } else {
            "not configured"
        }
    );
    println!("Templates: {}", health.templates_count);
    println!("Madlibs:   {}", health.madlibs_count);
    Ok(())
}
