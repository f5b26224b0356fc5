//! DTOs shaped for the therapist roster page.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::character::Character;
use crate::domain::client::{ClientDetail, ClientSummary};
use crate::domain::types::ClientId;

/// One roster row with its resolved avatar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RosterEntry {
    pub summary: ClientSummary,
    pub character: Character,
    /// Whether the detail request for this client succeeded.
    pub has_detail: bool,
}

/// Aggregated data required to render the roster page.
#[derive(Debug, Default)]
pub struct RosterPageData {
    pub entries: Vec<RosterEntry>,
    /// Best-effort details; a missing key means the detail fetch failed.
    pub details: HashMap<ClientId, ClientDetail>,
    pub pending_requests: usize,
}

impl RosterPageData {
    #[must_use]
    pub fn new(
        clients: Vec<ClientSummary>,
        details: HashMap<ClientId, ClientDetail>,
        pending_requests: usize,
    ) -> Self {
        let entries = clients
            .into_iter()
            .map(|summary| {
                let detail = details.get(&summary.client_id);
                let character_id = detail
                    .map(ClientDetail::character_id)
                    .unwrap_or_else(|| summary.character_id());
                RosterEntry {
                    has_detail: detail.is_some(),
                    character: Character::from(character_id),
                    summary,
                }
            })
            .collect();

        Self {
            entries,
            details,
            pending_requests,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
