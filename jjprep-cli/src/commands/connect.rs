use anyhow::Result;
use owo_colors::OwoColorize;

use super::AUTH_TIMEOUT;
use crate::client::ApiClient;
use crate::oauth::AuthFlow;
use crate::render;

pub async fn run(client: &ApiClient, redirect_port: u16) -> Result<()> {
    let spinner = render::create_spinner("Checking calendar connection".to_string());
    let current = client.connection_status().await;
    spinner.finish_and_clear();

    if current.connected {
        println!("{}", render::render_status(&current));
        return Ok(());
    }

    // Bind before fetching the URL so the redirect target is known.
    let flow = AuthFlow::bind(redirect_port).await?;
    let auth_url = client.oauth_url(&flow.redirect_uri()).await?;

    flow.authorize(&auth_url, AUTH_TIMEOUT).await?;

    // Confirm with the backend rather than trusting the signal alone.
    let spinner = render::create_spinner("Confirming connection".to_string());
    let status = client.connection_status().await;
    spinner.finish_and_clear();

    if status.connected {
        println!("\n{}", render::render_status(&status));
    } else {
        println!(
            "\n{}",
            "Authorization finished but the calendar still shows as not connected.".yellow()
        );
    }

    Ok(())
}
