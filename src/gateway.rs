//! Fire-and-forget data gateway.
//!
//! Each request runs on its own tokio task. Completions come back to the
//! event loop as [`GatewayEvent`]s over an unbounded channel; callers never
//! wait on a request directly.

use crate::api::{sort_shows, Catalog};
use crate::error::{FetchFailure, FetchTarget};
use crate::types::{Episode, Show};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A pending episode request, tagged so superseded completions can be told
/// apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub show_id: u32,
    pub generation: u64,
}

/// Completion of a gateway request.
#[derive(Debug)]
pub enum GatewayEvent {
    /// The catalog, already sorted by name
    Shows(Result<Vec<Show>, FetchFailure>),
    Episodes {
        ticket: FetchTicket,
        result: Result<Vec<Episode>, FetchFailure>,
    },
}

/// Issues catalog requests and reports their completion.
pub struct Gateway<C: Catalog> {
    catalog: Arc<C>,
    tx: mpsc::UnboundedSender<GatewayEvent>,
}

impl<C: Catalog> Clone for Gateway<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            tx: self.tx.clone(),
        }
    }
}

impl<C: Catalog> Gateway<C> {
    /// Create a gateway and the receiver its completions arrive on.
    pub fn new(catalog: C) -> (Self, mpsc::UnboundedReceiver<GatewayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let gateway = Self {
            catalog: Arc::new(catalog),
            tx,
        };
        (gateway, rx)
    }

    /// Request the full show catalog.
    pub fn fetch_show_list(&self) {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = match catalog.fetch_shows().await {
                Ok(mut shows) => {
                    sort_shows(&mut shows);
                    info!("Loaded {} shows", shows.len());
                    Ok(shows)
                }
                Err(e) => Err(FetchFailure::new(FetchTarget::Shows, e)),
            };
            if tx.send(GatewayEvent::Shows(result)).is_err() {
                debug!("Show list arrived after the event loop stopped");
            }
        });
    }

    /// Request the episodes named by `ticket`.
    pub fn fetch_episode_list(&self, ticket: FetchTicket) {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();

        debug!(
            "Fetching episodes for show {} (generation {})",
            ticket.show_id, ticket.generation
        );

        tokio::spawn(async move {
            let result = catalog
                .fetch_episodes(ticket.show_id)
                .await
                .map_err(|e| FetchFailure::new(FetchTarget::Episodes(ticket.show_id), e));
            if tx.send(GatewayEvent::Episodes { ticket, result }).is_err() {
                debug!("Episodes for show {} arrived after the event loop stopped", ticket.show_id);
            }
        });
    }
}
