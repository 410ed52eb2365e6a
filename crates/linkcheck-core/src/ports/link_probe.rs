//! LinkProbe port - reachability check for a single link.

use async_trait::async_trait;

use crate::domain::Availability;

/// LinkProbe decides whether a link is reachable.
///
/// Failures are data here: a probe never returns an error, anything that
/// goes wrong maps to `Availability::NotAvailable`. Implementations must be
/// safe to call from many workers at once.
#[async_trait]
pub trait LinkProbe: Send + Sync {
    async fn check(&self, link: &str) -> Availability;
}
