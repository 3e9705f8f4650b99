use anyhow::Result;

use crate::client::ApiClient;
use crate::render;

pub async fn run(client: &ApiClient) -> Result<()> {
    let spinner = render::create_spinner("Checking calendar connection".to_string());
    let status = client.connection_status().await;
    spinner.finish_and_clear();

    println!("{}", render::render_status(&status));

    Ok(())
}
