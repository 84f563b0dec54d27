//! Interactive play command.

use anyhow::Result;
use madlibs_core::api::MadLibsClient;

pub async fn run(base_url: String) -> Result<()> {
    let client = MadLibsClient::new(base_url);
    madlibs_tui::run_session(client).await
}
