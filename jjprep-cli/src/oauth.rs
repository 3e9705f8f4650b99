//! Browser authorization flow with a local callback listener.
//!
//! The backend's completion page redirects the browser to
//! `http://localhost:{port}/callback?signal=jj:google-connected` once
//! the account is linked. The listener is bound before the browser
//! opens so the redirect can never race it.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use jjprep_core::protocol::CONNECTED_SIGNAL;

/// A single authorization round: one flow, one completion signal.
///
/// The listener socket is dropped on every exit path (completion,
/// timeout, error), so no callback handler outlives its flow.
pub struct AuthFlow {
    listener: TcpListener,
    port: u16,
}

impl AuthFlow {
    /// Bind the callback listener on `port` (0 picks a free port).
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .context("Failed to bind authorization callback listener")?;
        let port = listener.local_addr()?.port();

        Ok(AuthFlow { listener, port })
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }

    /// Open `auth_url` in the browser and wait for the completion signal.
    ///
    /// Only a request carrying `signal=jj:google-connected` completes
    /// the flow, and it completes it exactly once; anything else hitting
    /// the listener (favicons, stray tabs) is answered and ignored.
    /// `timeout` bounds the wait for flows abandoned in the browser.
    pub async fn authorize(self, auth_url: &str, timeout: Duration) -> Result<()> {
        println!("Open this URL in your browser to authorize:\n");
        println!("{}\n", auth_url);

        if open::that(auth_url).is_err() {
            println!("(Could not open browser automatically, please copy the URL above)");
        }

        tokio::time::timeout(timeout, self.wait_for_signal())
            .await
            .map_err(|_| anyhow::anyhow!("Timed out waiting for authorization"))?
    }

    async fn wait_for_signal(self) -> Result<()> {
        loop {
            let (stream, _) = self
                .listener
                .accept()
                .await
                .context("Failed to accept authorization callback")?;

            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader
                .read_line(&mut request_line)
                .await
                .context("Failed to read authorization callback")?;

            let params = query_params(&request_line);
            let connected = params.get("signal").map(String::as_str) == Some(CONNECTED_SIGNAL);

            let body = if connected {
                "<h1>Calendar connected!</h1>\
                 <p>You can close this window and return to the terminal.</p>"
            } else {
                "<h1>Waiting for authorization...</h1>"
            };

            let response = format!(
                "HTTP/1.1 200 OK\r\n\
                Content-Type: text/html\r\n\
                Connection: close\r\n\
                \r\n\
                <html><body>{}</body></html>",
                body
            );

            let mut stream = reader.into_inner();
            // The flow result does not depend on the browser reading this.
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.flush().await;

            if connected {
                return Ok(());
            }
        }
    }
}

/// Query parameters of the callback request line.
fn query_params(request_line: &str) -> HashMap<String, String> {
    let Some(url_part) = request_line.split_whitespace().nth(1) else {
        return HashMap::new();
    };

    match url::Url::parse(&format!("http://localhost{}", url_part)) {
        Ok(url) => url.query_pairs().into_owned().collect(),
        Err(_) => HashMap::new(),
    }
}
