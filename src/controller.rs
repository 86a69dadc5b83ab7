//! User action handling
//!
//! Each user action (submitting the search form, clicking a card's
//! "Episodes" button) maps to one method of [`PageController`]. An action runs
//! its pipeline to completion: fetch from the directory, then render into the
//! page.
//!
//! Front ends that fetch on their own (and may have several requests in flight)
//! use the two halves of each action instead: `begin_*` issues a ticket,
//! `apply_*` renders the fetched data only if no newer action for the same
//! page region started in between.

use crate::BrowserError;
use crate::directory::{Episode, Show, ShowDirectory, ShowId};
use crate::page::{Page, Region, Ticket};
use tracing::{debug, info};

/// Event emitted while a user action is processed
///
/// These events allow front ends to show progress without inspecting the
/// page after every step.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    /// A search was submitted and the directory is being queried
    SearchSubmitted { term: String },

    /// Search results replaced the show list
    ShowsDisplayed { term: String, count: usize },

    /// Episodes of a show are being fetched
    FetchingEpisodes { show_id: ShowId },

    /// Episodes replaced the episode list and the area became visible
    EpisodesDisplayed { show_id: ShowId, count: usize },
}

/// One method per user action on the page.
pub trait PageController {
    /// Handles a search form submission.
    ///
    /// Replaces the show cards with the results for `term` and hides the
    /// episodes area. Returns the number of cards displayed.
    fn submit_search(&mut self, term: &str) -> Result<usize, BrowserError>;

    /// Handles a click on the "Episodes" button of the card at `card`.
    ///
    /// The show is resolved from the card itself. Returns the number of
    /// episodes displayed.
    fn request_episodes(&mut self, card: usize) -> Result<usize, BrowserError>;
}

/// A search that was started but whose results are not rendered yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSearch {
    ticket: Ticket,
    term: String,
}

impl PendingSearch {
    pub fn term(&self) -> &str {
        &self.term
    }
}

/// An episode request that was started but whose list is not rendered yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingEpisodes {
    ticket: Ticket,
    show_id: ShowId,
}

impl PendingEpisodes {
    pub fn show_id(&self) -> ShowId {
        self.show_id
    }
}

/// Controller driving a [`Page`] from a [`ShowDirectory`].
pub struct ShowBrowser<D, F>
where
    D: ShowDirectory,
    F: FnMut(BrowserEvent),
{
    directory: D,
    page: Page,
    on_event: F,
}

impl<D, F> ShowBrowser<D, F>
where
    D: ShowDirectory,
    F: FnMut(BrowserEvent),
{
    /// Creates a controller over an empty page.
    ///
    /// `on_event` is called with every [`BrowserEvent`]; pass `|_| {}` for
    /// silent operation.
    pub fn new(directory: D, on_event: F) -> Self {
        Self {
            directory,
            page: Page::new(),
            on_event,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Starts a search for `term`, superseding any search still in flight.
    pub fn begin_search(&mut self, term: &str) -> PendingSearch {
        let ticket = self.page.issue_ticket(Region::Shows);
        (self.on_event)(BrowserEvent::SearchSubmitted {
            term: term.to_string(),
        });

        PendingSearch {
            ticket,
            term: term.to_string(),
        }
    }

    /// Renders the results of a started search and hides the episodes area.
    ///
    /// Fails with [`BrowserError::StaleResponse`] without touching the page if
    /// another search began after this one.
    pub fn apply_search(
        &mut self,
        pending: PendingSearch,
        shows: &[Show],
    ) -> Result<usize, BrowserError> {
        let term = pending.term;
        if !self.page.is_current(&pending.ticket) {
            debug!(term = %term, "dropping superseded search results");
            return Err(BrowserError::StaleResponse(pending.ticket.region()));
        }

        self.page.set_term(&term);
        self.page.hide_episodes();
        self.page.display_shows(shows);
        info!(term = %term, count = shows.len(), "displayed shows");

        (self.on_event)(BrowserEvent::ShowsDisplayed {
            term,
            count: shows.len(),
        });
        Ok(shows.len())
    }

    /// Starts an episode request for the show on the card at `card`.
    pub fn begin_episodes(&mut self, card: usize) -> Result<PendingEpisodes, BrowserError> {
        let show_id = self
            .page
            .card_show_id(card)
            .ok_or(BrowserError::CardNotFound(card))?;

        Ok(self.begin_episodes_of_show(show_id))
    }

    /// Starts an episode request for a show known by id rather than by card.
    pub fn begin_episodes_of_show(&mut self, show_id: ShowId) -> PendingEpisodes {
        let ticket = self.page.issue_ticket(Region::Episodes);
        (self.on_event)(BrowserEvent::FetchingEpisodes { show_id });

        PendingEpisodes { ticket, show_id }
    }

    /// Renders a fetched episode list and reveals the episodes area.
    ///
    /// Fails with [`BrowserError::StaleResponse`] without touching the page if
    /// another episode request or a new search began after this one.
    pub fn apply_episodes(
        &mut self,
        pending: PendingEpisodes,
        episodes: &[Episode],
    ) -> Result<usize, BrowserError> {
        let show_id = pending.show_id;
        if !self.page.is_current(&pending.ticket) {
            debug!(%show_id, "dropping superseded episode list");
            return Err(BrowserError::StaleResponse(pending.ticket.region()));
        }

        self.page.display_episodes(episodes);
        info!(%show_id, count = episodes.len(), "displayed episodes");

        (self.on_event)(BrowserEvent::EpisodesDisplayed {
            show_id,
            count: episodes.len(),
        });
        Ok(episodes.len())
    }

    /// Fetches and renders the episodes of a show given by id.
    pub fn show_episodes(&mut self, show_id: ShowId) -> Result<usize, BrowserError> {
        let pending = self.begin_episodes_of_show(show_id);
        let episodes = self.directory.episodes_of_show(show_id)?;
        self.apply_episodes(pending, &episodes)
    }
}

impl<D, F> PageController for ShowBrowser<D, F>
where
    D: ShowDirectory,
    F: FnMut(BrowserEvent),
{
    fn submit_search(&mut self, term: &str) -> Result<usize, BrowserError> {
        let pending = self.begin_search(term);
        let shows = self.directory.search_shows(term)?;
        self.apply_search(pending, &shows)
    }

    fn request_episodes(&mut self, card: usize) -> Result<usize, BrowserError> {
        let pending = self.begin_episodes(card)?;
        let episodes = self.directory.episodes_of_show(pending.show_id())?;
        self.apply_episodes(pending, &episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectoryError, EpisodeId, MISSING_IMAGE_URL};
    use std::collections::HashMap;

    /// In-memory directory serving fixed results
    #[derive(Default)]
    struct FakeDirectory {
        shows: HashMap<String, Vec<Show>>,
        episodes: HashMap<ShowId, Vec<Episode>>,
    }

    impl FakeDirectory {
        fn with_batman() -> Self {
            let mut directory = Self::default();
            directory.shows.insert(
                "batman".to_string(),
                vec![Show {
                    id: ShowId(1),
                    name: "Batman".to_string(),
                    summary: "<p>Dark</p>".to_string(),
                    image: MISSING_IMAGE_URL.to_string(),
                }],
            );
            directory.episodes.insert(
                ShowId(1),
                vec![Episode {
                    id: EpisodeId(10),
                    name: "Pilot".to_string(),
                    season: 1,
                    number: 1,
                }],
            );
            directory
        }
    }

    impl ShowDirectory for FakeDirectory {
        fn search_shows(&self, term: &str) -> Result<Vec<Show>, DirectoryError> {
            if term == "offline" {
                return Err(DirectoryError::RequestError("connection refused".to_string()));
            }
            Ok(self.shows.get(term).cloned().unwrap_or_default())
        }

        fn episodes_of_show(&self, id: ShowId) -> Result<Vec<Episode>, DirectoryError> {
            self.episodes
                .get(&id)
                .cloned()
                .ok_or_else(|| DirectoryError::HttpStatus {
                    status: 404,
                    url: format!("shows/{}/episodes", id),
                })
        }
    }

    #[test]
    fn test_search_renders_cards() {
        let mut browser = ShowBrowser::new(FakeDirectory::with_batman(), |_| {});

        assert_eq!(browser.submit_search("batman").unwrap(), 1);

        let page = browser.page();
        assert_eq!(page.term(), "batman");
        assert_eq!(page.cards().len(), 1);
        let card = &page.cards()[0];
        assert_eq!(card.show().name, "Batman");
        assert!(card.markup().contains(MISSING_IMAGE_URL));
        assert!(card.markup().contains("data-show-id=\"1\""));
    }

    #[test]
    fn test_search_without_results_renders_empty_list() {
        let mut browser = ShowBrowser::new(FakeDirectory::with_batman(), |_| {});

        browser.submit_search("batman").unwrap();
        assert_eq!(browser.submit_search("").unwrap(), 0);
        assert!(browser.page().cards().is_empty());
    }

    #[test]
    fn test_episodes_render_and_reveal_area() {
        let mut browser = ShowBrowser::new(FakeDirectory::with_batman(), |_| {});

        browser.submit_search("batman").unwrap();
        assert_eq!(browser.request_episodes(0).unwrap(), 1);

        let page = browser.page();
        assert_eq!(page.episode_items(), ["Pilot (Season 1, Number 1)"]);
        assert!(page.episodes_visible());
    }

    #[test]
    fn test_new_search_hides_episodes() {
        let mut browser = ShowBrowser::new(FakeDirectory::with_batman(), |_| {});

        browser.submit_search("batman").unwrap();
        browser.request_episodes(0).unwrap();
        browser.submit_search("batman").unwrap();

        assert!(!browser.page().episodes_visible());
    }

    #[test]
    fn test_unknown_card_leaves_page_untouched() {
        let mut browser = ShowBrowser::new(FakeDirectory::with_batman(), |_| {});

        browser.submit_search("batman").unwrap();
        let result = browser.request_episodes(3);

        assert!(matches!(result, Err(BrowserError::CardNotFound(3))));
        assert!(!browser.page().episodes_visible());
        assert!(browser.page().episode_items().is_empty());
    }

    #[test]
    fn test_failed_search_propagates_and_keeps_page() {
        let mut browser = ShowBrowser::new(FakeDirectory::with_batman(), |_| {});

        browser.submit_search("batman").unwrap();
        browser.request_episodes(0).unwrap();
        let result = browser.submit_search("offline");

        assert!(matches!(
            result,
            Err(BrowserError::Directory(DirectoryError::RequestError(_)))
        ));
        let page = browser.page();
        assert_eq!(page.term(), "batman");
        assert_eq!(page.cards().len(), 1);
        assert!(page.episodes_visible());
    }

    #[test]
    fn test_failed_episode_request_propagates() {
        let mut directory = FakeDirectory::with_batman();
        directory.episodes.clear();
        let mut browser = ShowBrowser::new(directory, |_| {});

        browser.submit_search("batman").unwrap();
        let result = browser.request_episodes(0);

        assert!(matches!(
            result,
            Err(BrowserError::Directory(DirectoryError::HttpStatus { status: 404, .. }))
        ));
        assert!(!browser.page().episodes_visible());
    }

    #[test]
    fn test_events_follow_pipeline_order() {
        let mut events = Vec::new();
        {
            let mut browser =
                ShowBrowser::new(FakeDirectory::with_batman(), |event| events.push(event));
            browser.submit_search("batman").unwrap();
            browser.request_episodes(0).unwrap();
        }

        assert_eq!(
            events,
            vec![
                BrowserEvent::SearchSubmitted {
                    term: "batman".to_string()
                },
                BrowserEvent::ShowsDisplayed {
                    term: "batman".to_string(),
                    count: 1
                },
                BrowserEvent::FetchingEpisodes { show_id: ShowId(1) },
                BrowserEvent::EpisodesDisplayed {
                    show_id: ShowId(1),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_superseded_search_is_not_rendered() {
        let mut browser = ShowBrowser::new(FakeDirectory::with_batman(), |_| {});
        let older = browser.begin_search("bat");
        let newer = browser.begin_search("batman");

        let newer_shows = browser.directory().search_shows(newer.term()).unwrap();
        assert_eq!(browser.apply_search(newer, &newer_shows).unwrap(), 1);

        let result = browser.apply_search(older, &[]);
        assert!(matches!(
            result,
            Err(BrowserError::StaleResponse(Region::Shows))
        ));
        assert_eq!(browser.page().term(), "batman");
        assert_eq!(browser.page().cards().len(), 1);
    }

    #[test]
    fn test_episodes_arriving_after_new_search_are_dropped() {
        let mut browser = ShowBrowser::new(FakeDirectory::with_batman(), |_| {});
        browser.submit_search("batman").unwrap();

        let pending = browser.begin_episodes(0).unwrap();
        let episodes = browser
            .directory()
            .episodes_of_show(pending.show_id())
            .unwrap();
        browser.submit_search("batman").unwrap();

        let result = browser.apply_episodes(pending, &episodes);
        assert!(matches!(
            result,
            Err(BrowserError::StaleResponse(Region::Episodes))
        ));
        assert!(!browser.page().episodes_visible());
        assert!(browser.page().episode_items().is_empty());
    }

    #[test]
    fn test_older_episode_list_loses_to_newer_one() {
        let mut directory = FakeDirectory::with_batman();
        directory.episodes.insert(
            ShowId(2),
            vec![Episode {
                id: EpisodeId(20),
                name: "Rebirth".to_string(),
                season: 1,
                number: 1,
            }],
        );
        let mut browser = ShowBrowser::new(directory, |_| {});

        let first = browser.begin_episodes_of_show(ShowId(1));
        let second = browser.begin_episodes_of_show(ShowId(2));
        let second_episodes = browser.directory().episodes_of_show(ShowId(2)).unwrap();
        let first_episodes = browser.directory().episodes_of_show(ShowId(1)).unwrap();

        browser.apply_episodes(second, &second_episodes).unwrap();
        assert!(browser.apply_episodes(first, &first_episodes).is_err());
        assert_eq!(
            browser.page().episode_items(),
            ["Rebirth (Season 1, Number 1)"]
        );
    }

    #[test]
    fn test_show_episodes_by_id_emits_events() {
        let mut events = Vec::new();
        {
            let mut browser =
                ShowBrowser::new(FakeDirectory::with_batman(), |event| events.push(event));
            assert_eq!(browser.show_episodes(ShowId(1)).unwrap(), 1);
            assert!(browser.page().episodes_visible());
            assert!(browser.page().cards().is_empty());
        }

        assert_eq!(
            events,
            vec![
                BrowserEvent::FetchingEpisodes { show_id: ShowId(1) },
                BrowserEvent::EpisodesDisplayed {
                    show_id: ShowId(1),
                    count: 1
                },
            ]
        );
    }
}
