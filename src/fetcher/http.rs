use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::{redirect, Client, StatusCode};

const USER_AGENT: &str = "Mozilla/5.0";
const MAX_REDIRECTS: usize = 10;

pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .build()?;
    Ok(client)
}

/// GET `url`, following redirects. Anything but a final `200 OK` is an error.
pub async fn download(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;

    if response.status() != StatusCode::OK {
        bail!("Failed to download: {}", response.status().as_u16());
    }

    Ok(response.bytes().await?.to_vec())
}
