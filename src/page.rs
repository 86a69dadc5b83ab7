//! In-memory page model
//!
//! The page holds the three display regions a user interacts with: the list of
//! show cards, the episodes area (hidden until episodes are requested) and the
//! episode list inside it. It renders to a standalone HTML document.

use crate::directory::{Episode, Show, ShowId};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fs;
use std::io;
use std::path::Path;

/// A display region that is replaced as a whole by one user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The show cards below the search form
    Shows,
    /// The episodes area and its list
    Episodes,
}

/// Proof that an action was started while its region was current.
///
/// A ticket goes stale as soon as a newer ticket for the same region is
/// issued, or the region is invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    region: Region,
    generation: u64,
}

impl Ticket {
    pub fn region(&self) -> Region {
        self.region
    }
}

/// One rendered show card.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowCard {
    show: Show,
    markup: String,
}

impl ShowCard {
    fn new(show: &Show) -> Self {
        Self {
            markup: show_card_html(show),
            show: show.clone(),
        }
    }

    /// The show id carried by the card (its `data-show-id`)
    pub fn show_id(&self) -> ShowId {
        self.show.id
    }

    pub fn show(&self) -> &Show {
        &self.show
    }

    /// The card's HTML markup
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// The page state: search term, show cards and episode list.
#[derive(Debug, Clone, Default)]
pub struct Page {
    term: String,
    cards: Vec<ShowCard>,
    episode_items: Vec<String>,
    episodes_visible: bool,
    shows_generation: u64,
    episodes_generation: u64,
}

impl Page {
    /// Creates an empty page with the episodes area hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// The term currently shown in the search form
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn set_term(&mut self, term: &str) {
        self.term = term.to_string();
    }

    /// Clears the show list and appends one card per show, in order.
    pub fn display_shows(&mut self, shows: &[Show]) {
        self.cards.clear();
        self.cards.extend(shows.iter().map(ShowCard::new));
    }

    /// Clears the episode list, appends one item per episode and reveals the
    /// episodes area.
    pub fn display_episodes(&mut self, episodes: &[Episode]) {
        self.episode_items.clear();
        self.episode_items
            .extend(episodes.iter().map(format_episode));
        self.episodes_visible = true;
    }

    /// Hides the episodes area.
    ///
    /// Any episode request still in flight is invalidated, since its result
    /// belongs to a show that may no longer be displayed.
    pub fn hide_episodes(&mut self) {
        self.episodes_visible = false;
        self.invalidate(Region::Episodes);
    }

    pub fn cards(&self) -> &[ShowCard] {
        &self.cards
    }

    /// Resolves the show id of the card at `index`, if there is such a card.
    pub fn card_show_id(&self, index: usize) -> Option<ShowId> {
        self.cards.get(index).map(ShowCard::show_id)
    }

    /// Text of each item in the episode list
    pub fn episode_items(&self) -> &[String] {
        &self.episode_items
    }

    pub fn episodes_visible(&self) -> bool {
        self.episodes_visible
    }

    /// Starts a new action for `region`, making all earlier tickets for it stale.
    pub fn issue_ticket(&mut self, region: Region) -> Ticket {
        let generation = self.invalidate(region);
        Ticket { region, generation }
    }

    /// Whether no newer action for the ticket's region has started since.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation(ticket.region) == ticket.generation
    }

    fn invalidate(&mut self, region: Region) -> u64 {
        let generation = match region {
            Region::Shows => &mut self.shows_generation,
            Region::Episodes => &mut self.episodes_generation,
        };
        *generation += 1;
        *generation
    }

    fn generation(&self, region: Region) -> u64 {
        match region {
            Region::Shows => self.shows_generation,
            Region::Episodes => self.episodes_generation,
        }
    }

    /// Renders the page as a complete HTML document.
    pub fn to_html(&self) -> String {
        let cards: String = self.cards.iter().map(ShowCard::markup).collect();
        let items: String = self
            .episode_items
            .iter()
            .map(|item| format!("        <li>{}</li>\n", encode_text(item)))
            .collect();
        let display = if self.episodes_visible {
            "block"
        } else {
            "none"
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>TV Maze</title>
</head>
<body>
  <main class="container">
    <h1>TV Maze</h1>
    <form id="searchForm">
      <input id="searchForm-term" name="term" value="{term}">
      <button type="submit">Go!</button>
    </form>
    <section id="showsList" class="row">
{cards}    </section>
    <section id="episodesArea" style="display: {display}">
      <h2>Episodes</h2>
      <ul id="episodesList">
{items}      </ul>
    </section>
  </main>
</body>
</html>
"#,
            term = encode_double_quoted_attribute(&self.term),
        )
    }

    /// Writes the rendered document to `path`, replacing any previous content.
    pub fn write_html(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_html())
    }
}

/// Formats an episode list item, e.g. `Pilot (Season 1, Number 1)`.
pub fn format_episode(episode: &Episode) -> String {
    format!(
        "{} (Season {}, Number {})",
        episode.name, episode.season, episode.number
    )
}

/// Builds the markup of one show card.
///
/// The summary is inserted as-is since the directory delivers it as HTML.
fn show_card_html(show: &Show) -> String {
    let name = encode_text(&show.name);
    let alt = encode_double_quoted_attribute(&show.name);
    let image = encode_double_quoted_attribute(&show.image);

    format!(
        r#"      <div data-show-id="{id}" class="Show col-md-12 col-lg-6 mb-4">
        <div class="media">
          <img src="{image}" alt="Image of {alt}" class="w-25 me-3">
          <div class="media-body">
            <h5 class="text-primary">{name}</h5>
            <div><small>{summary}</small></div>
            <button class="btn btn-outline-light btn-sm Show-getEpisodes">Episodes</button>
          </div>
        </div>
      </div>
"#,
        id = show.id,
        summary = show.summary,
    )
}
