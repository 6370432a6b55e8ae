//! Airport resolver: settled queries in, grouped suggestions out
//!
//! The resolver owns the per-field lookup state (one instance per input
//! field, so origin and destination never share anything). Responses are
//! applied only while their originating query is still current; anything
//! later is discarded to keep out-of-order network replies from
//! flickering stale results in.

use tracing::{debug, warn};

use crate::client::SkyClient;
use crate::models::{AirportSuggestion, SuggestionGroup};
use crate::SearchError;

/// Ties an in-flight lookup to the query text that started it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    query: String,
}

impl LookupTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Lookup state for a single search field
#[derive(Debug, Default)]
pub struct ResolverState {
    query: String,
    groups: Vec<SuggestionGroup>,
    loading: bool,
}

impl ResolverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup for a settled query. An empty or whitespace-only
    /// query clears the results and loading flag immediately and returns
    /// no ticket: no network call may be issued for it.
    pub fn begin(&mut self, query: &str) -> Option<LookupTicket> {
        self.query = query.to_string();
        if query.trim().is_empty() {
            self.groups.clear();
            self.loading = false;
            return None;
        }
        self.loading = true;
        Some(LookupTicket {
            query: query.to_string(),
        })
    }

    /// Apply a completed lookup. Returns false (and changes nothing) when
    /// the ticket's query has been superseded. Failures yield an empty
    /// list; autocomplete errors never block typing.
    pub fn apply(
        &mut self,
        ticket: &LookupTicket,
        result: Result<Vec<AirportSuggestion>, SearchError>,
    ) -> bool {
        if ticket.query != self.query {
            debug!(
                stale = %ticket.query,
                current = %self.query,
                "Discarding stale suggestion response"
            );
            return false;
        }
        self.loading = false;
        self.groups = match result {
            Ok(suggestions) => group_suggestions(suggestions),
            Err(e) => {
                warn!(error = %e, query = %ticket.query, "Airport lookup failed");
                Vec::new()
            }
        };
        true
    }

    pub fn groups(&self) -> &[SuggestionGroup] {
        &self.groups
    }

    pub fn loading(&self) -> bool {
        self.loading
    }
}

/// Group ranked suggestions for rendering: airports belonging to a city
/// entity nest under that city's group (created on first encounter, keyed
/// by city id); everything else forms a singleton group keyed by its own
/// id and carrying its source suggestion for direct selection.
pub fn group_suggestions(suggestions: Vec<AirportSuggestion>) -> Vec<SuggestionGroup> {
    let mut groups: Vec<SuggestionGroup> = Vec::new();

    for suggestion in suggestions {
        match suggestion.parent_city.clone() {
            Some(city) => match groups.iter().position(|g| g.key == city.entity_id) {
                Some(index) => groups[index].airports.push(suggestion),
                None => groups.push(SuggestionGroup {
                    key: city.entity_id,
                    title: city.name,
                    subtitle: suggestion.subtitle.clone(),
                    airports: vec![suggestion],
                    direct: None,
                }),
            },
            None => groups.push(SuggestionGroup {
                key: suggestion.entity_id.clone(),
                title: suggestion.title.clone(),
                subtitle: suggestion.subtitle.clone(),
                airports: Vec::new(),
                direct: Some(suggestion),
            }),
        }
    }

    groups
}

/// Issue the remote lookup for a ticket
pub async fn lookup(
    client: &SkyClient,
    ticket: &LookupTicket,
    locale: &str,
) -> Result<Vec<AirportSuggestion>, SearchError> {
    client.search_airport(ticket.query(), locale).await
}

/// Run one full resolve cycle for a settled query: begin, look up, apply.
/// Lookup failures are swallowed into an empty result list.
pub async fn resolve(
    client: &SkyClient,
    state: &mut ResolverState,
    query: &str,
    locale: &str,
) -> Vec<SuggestionGroup> {
    if let Some(ticket) = state.begin(query) {
        let result = lookup(client, &ticket, locale).await;
        state.apply(&ticket, result);
    }
    state.groups().to_vec()
}
