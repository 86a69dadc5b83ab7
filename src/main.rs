use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use show_scout::{
    BrowserConfig, BrowserError, BrowserEvent, DEFAULT_BASE_URL, MISSING_IMAGE_URL, Page,
    PageController, ShowBrowser, ShowCard, ShowDirectory, ShowId, TvMazeDirectory,
};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Search the TVMaze show directory and list episodes of a show
#[derive(Debug, Parser)]
#[command(name = "show-scout", version, about)]
struct Cli {
    /// Base URL of the show directory API
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Image URL used for shows without artwork
    #[arg(long, global = true, default_value = MISSING_IMAGE_URL)]
    missing_image_url: String,

    /// Write the rendered page to this HTML file after every action
    #[arg(long, global = true, value_name = "PATH")]
    html: Option<PathBuf>,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search shows matching a term
    Search {
        /// Free-text search term
        term: String,

        /// Print the show records as JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// List the episodes of a show
    Episodes {
        /// Directory id of the show
        show_id: ShowId,

        /// Print the episode records as JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Search and browse episodes interactively (default)
    Interactive,
}

/// Errors reported by the command line front end
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Prints progress events emitted by the controller
fn handle_browser_event(event: BrowserEvent) {
    match event {
        BrowserEvent::SearchSubmitted { term } => {
            println!("Searching shows for '{}'...", term);
        }
        BrowserEvent::ShowsDisplayed { term, count } => {
            if count == 0 {
                println!("No shows found for '{}'.\n", term);
            } else {
                println!("Found {} show(s) for '{}'\n", count, term);
            }
        }
        BrowserEvent::FetchingEpisodes { show_id } => {
            println!("\nFetching episodes of show {}...", show_id);
        }
        BrowserEvent::EpisodesDisplayed { count, .. } => {
            println!("=== Episodes ({}) ===", count);
        }
    }
}

fn print_cards(page: &Page) {
    for (index, card) in page.cards().iter().enumerate() {
        let show = card.show();
        println!("[{}] {} (id {})", index + 1, show.name, show.id);

        let summary = nanohtml2text::html2text(&show.summary);
        let summary = summary.trim();
        if !summary.is_empty() {
            println!("    {}", summary.replace('\n', "\n    "));
        }
        println!("    Image: {}", show.image);
        println!();
    }
}

fn print_episodes(page: &Page) {
    for item in page.episode_items() {
        println!("  {}", item);
    }
}

fn write_page(page: &Page, html: Option<&Path>) -> Result<(), BrowserError> {
    if let Some(path) = html {
        page.write_html(path)?;
        tracing::debug!(path = %path.display(), "wrote page");
    }
    Ok(())
}

fn run_search<D: ShowDirectory>(
    directory: D,
    term: &str,
    json: bool,
    html: Option<&Path>,
) -> Result<(), CliError> {
    if json {
        let mut browser = ShowBrowser::new(directory, |_| {});
        browser.submit_search(term)?;
        let shows: Vec<_> = browser.page().cards().iter().map(ShowCard::show).collect();
        println!("{}", serde_json::to_string_pretty(&shows)?);
        write_page(browser.page(), html)?;
        return Ok(());
    }

    let mut browser = ShowBrowser::new(directory, handle_browser_event);
    browser.submit_search(term)?;
    print_cards(browser.page());
    write_page(browser.page(), html)?;
    Ok(())
}

fn run_episodes<D: ShowDirectory>(
    directory: D,
    show_id: ShowId,
    json: bool,
    html: Option<&Path>,
) -> Result<(), CliError> {
    // No search ran, so there is no card to resolve; go by id directly
    if json {
        let mut browser = ShowBrowser::new(directory, |_| {});
        let pending = browser.begin_episodes_of_show(show_id);
        let episodes = browser
            .directory()
            .episodes_of_show(show_id)
            .map_err(BrowserError::from)?;
        browser.apply_episodes(pending, &episodes)?;
        println!("{}", serde_json::to_string_pretty(&episodes)?);
        write_page(browser.page(), html)?;
        return Ok(());
    }

    let mut browser = ShowBrowser::new(directory, handle_browser_event);
    browser.show_episodes(show_id)?;
    print_episodes(browser.page());
    write_page(browser.page(), html)?;
    Ok(())
}

fn run_interactive<D: ShowDirectory>(directory: D, html: Option<&Path>) -> Result<(), CliError> {
    let mut browser = ShowBrowser::new(directory, handle_browser_event);

    loop {
        let term = Input::<String>::new()
            .with_prompt("Search shows")
            .allow_empty(true)
            .interact_text()?;

        if let Err(e) = browser.submit_search(&term) {
            eprintln!("Error: {}\n", e);
            continue;
        }
        print_cards(browser.page());
        write_page(browser.page(), html)?;

        // Pick cards until the user asks for a new search or quits
        loop {
            let mut choices: Vec<String> = browser
                .page()
                .cards()
                .iter()
                .map(|card| format!("Episodes of {}", card.show().name))
                .collect();
            let new_search = choices.len();
            choices.push("New search".to_string());
            choices.push("Quit".to_string());

            let selection = Select::new()
                .with_prompt("Choose")
                .items(&choices)
                .default(0)
                .interact_opt()?;

            match selection {
                Some(card) if card < new_search => {
                    match browser.request_episodes(card) {
                        Ok(_) => {
                            print_episodes(browser.page());
                            println!();
                            write_page(browser.page(), html)?;
                        }
                        Err(e) => eprintln!("Error: {}\n", e),
                    }
                }
                Some(choice) if choice == new_search => break,
                None => break,
                Some(_) => return Ok(()),
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("show_scout=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = BrowserConfig {
        base_url: cli.base_url,
        missing_image_url: cli.missing_image_url,
    };
    let directory = TvMazeDirectory::with_config(&config).map_err(BrowserError::from)?;
    let html = cli.html.as_deref();

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Search { term, json } => run_search(directory, &term, json, html),
        Command::Episodes { show_id, json } => run_episodes(directory, show_id, json, html),
        Command::Interactive => run_interactive(directory, html),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
