//! HttpProbe - HEAD request based reachability check.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::domain::Availability;
use crate::ports::LinkProbe;

/// Prefix `https://` unless the link already names http or https.
pub fn normalize_link(link: &str) -> Cow<'_, str> {
    if link.starts_with("http://") || link.starts_with("https://") {
        Cow::Borrowed(link)
    } else {
        Cow::Owned(format!("https://{link}"))
    }
}

/// [200, 400) counts as reachable, everything else does not.
pub fn classify(status: StatusCode) -> Availability {
    if (200..400).contains(&status.as_u16()) {
        Availability::Available
    } else {
        Availability::NotAvailable
    }
}

/// Probe that issues one HEAD request per link.
///
/// The reqwest client is built once and shared by every worker; it pools
/// connections internally and needs no locking.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn check(&self, link: &str) -> Availability {
        let url = normalize_link(link);

        match self.client.head(url.as_ref()).send().await {
            Ok(response) => {
                let availability = classify(response.status());
                debug!(link, status = response.status().as_u16(), ?availability, "probe answered");
                availability
            }
            Err(err) => {
                // timeout / DNS / connection refused / bad URL: all the same to us
                debug!(link, error = %err, "probe failed");
                Availability::NotAvailable
            }
        }
    }
}
