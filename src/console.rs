//! Line-oriented terminal presentation.
//!
//! Parses one command per line into engine intents and renders the engine's view.
//! The selected record for the detail view is local to the console, not engine state.

use std::fmt::Write as _;

use crate::error::QueryError;
use crate::models::{Character, CharacterStatus, Gender, PageSize, SortKey, SortOrder};
use crate::services::{CatalogEngine, CatalogView, FetchStatus};

pub const HELP: &str = "\
Commands:
  name <text>          filter by name substring (empty clears)
  status <value>       alive | dead | unknown | any
  species <text>       filter by species substring (empty clears)
  gender <value>       female | male | genderless | unknown | any
  clear                clear all filters
  sort <key> [order]   key: name | id | none, order: asc | desc
  order <asc|desc>     change sort order (requires a sort key)
  unsort               clear sorting
  page <n> | next | prev
  size <n>             5 | 10 | 20 | 50 | 100 | 250
  show <id> | hide     open or close the detail view
  json                 print the current view as JSON
  refresh              fetch again with the current filters
  help | quit";

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Status(Option<CharacterStatus>),
    Species(String),
    Gender(Option<Gender>),
    ClearFilters,
    Sort(SortKey, Option<SortOrder>),
    Order(SortOrder),
    ClearSort,
    Page(u32),
    NextPage,
    PrevPage,
    Size(PageSize),
    Show(u32),
    Hide,
    Json,
    Refresh,
    Help,
    Quit,
}

/// A line that could not be turned into a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (type 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let command = match keyword.to_lowercase().as_str() {
            "name" => Command::Name(rest.to_string()),
            "species" => Command::Species(rest.to_string()),
            "status" => Command::Status(parse_optional(rest, CharacterStatus::parse).ok_or_else(
                || QueryError::UnknownStatus(rest.to_string()),
            )?),
            "gender" => Command::Gender(
                parse_optional(rest, Gender::parse)
                    .ok_or_else(|| QueryError::UnknownGender(rest.to_string()))?,
            ),
            "clear" => Command::ClearFilters,
            "sort" => {
                let mut parts = rest.split_whitespace();
                let key = SortKey::parse(parts.next().unwrap_or(""))?;
                let order = parts.next().map(SortOrder::parse).transpose()?;
                if key == SortKey::None && order.is_some() {
                    return Err(QueryError::SortOrderWithoutKey.into());
                }
                Command::Sort(key, order)
            }
            "order" => Command::Order(SortOrder::parse(rest)?),
            "unsort" => Command::ClearSort,
            "page" => Command::Page(
                rest.parse()
                    .map_err(|_| CommandError::Usage("page <number>"))?,
            ),
            "next" => Command::NextPage,
            "prev" => Command::PrevPage,
            "size" => {
                let size: u32 = rest
                    .parse()
                    .map_err(|_| CommandError::Usage("size <5|10|20|50|100|250>"))?;
                Command::Size(PageSize::try_from(size)?)
            }
            "show" => Command::Show(rest.parse().map_err(|_| CommandError::Usage("show <id>"))?),
            "hide" => Command::Hide,
            "json" => Command::Json,
            "refresh" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// `any` and the empty string mean "no constraint".
fn parse_optional<T>(raw: &str, parse: fn(&str) -> Option<T>) -> Option<Option<T>> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("any") {
        Some(None)
    } else {
        parse(raw).map(Some)
    }
}

/// What the console should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Re-render the current view
    Render,
    /// Print this text
    Print(String),
    /// A refetch was scheduled; the view is rendered when it settles
    Pending,
    Quit,
}

/// Console session state: the engine plus the presentation-local selection.
pub struct Console {
    engine: CatalogEngine,
    selected: Option<u32>,
}

impl Console {
    pub fn new(engine: CatalogEngine) -> Self {
        Self {
            engine,
            selected: None,
        }
    }

    /// Id of the record open in the detail view.
    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Apply a command to the engine.
    pub fn handle(&mut self, command: Command) -> Result<Reply, CommandError> {
        let engine = &self.engine;
        let reply = match command {
            Command::Name(name) => {
                engine.set_name_filter(name);
                Reply::Pending
            }
            Command::Status(status) => {
                engine.set_status_filter(status);
                Reply::Pending
            }
            Command::Species(species) => {
                engine.set_species_filter(species);
                Reply::Pending
            }
            Command::Gender(gender) => {
                engine.set_gender_filter(gender);
                Reply::Pending
            }
            Command::ClearFilters => {
                engine.clear_filters();
                Reply::Pending
            }
            Command::Refresh => {
                engine.refresh();
                Reply::Pending
            }
            Command::Sort(key, order) => {
                if key == SortKey::None && order.is_some() {
                    return Err(QueryError::SortOrderWithoutKey.into());
                }
                engine.set_sort_by(key);
                if let Some(order) = order {
                    engine.set_sort_order(order)?;
                }
                Reply::Render
            }
            Command::Order(order) => {
                engine.set_sort_order(order)?;
                Reply::Render
            }
            Command::ClearSort => {
                engine.clear_sort();
                Reply::Render
            }
            Command::Page(page) => {
                engine.set_page(page);
                Reply::Render
            }
            Command::NextPage => {
                engine.set_page(engine.view().page.saturating_add(1));
                Reply::Render
            }
            Command::PrevPage => {
                engine.set_page(engine.view().page.saturating_sub(1));
                Reply::Render
            }
            Command::Size(size) => {
                engine.set_items_per_page(size);
                Reply::Render
            }
            Command::Show(id) => match engine.character(id) {
                Some(character) => {
                    self.selected = Some(id);
                    Reply::Print(render_detail(&character))
                }
                None => Reply::Print(format!("No character with id {} in the current results.", id)),
            },
            Command::Hide => {
                self.selected = None;
                Reply::Render
            }
            Command::Json => Reply::Print(
                serde_json::to_string_pretty(&engine.view())
                    .unwrap_or_else(|e| format!("Failed to serialize view: {}", e)),
            ),
            Command::Help => Reply::Print(HELP.to_string()),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    /// Render the current view, marking the selected record.
    pub fn render(&self) -> String {
        render_view(&self.engine.view(), self.selected)
    }
}

/// Render the list state of a view.
pub fn render_view(view: &CatalogView, selected: Option<u32>) -> String {
    if view.loading || view.status == FetchStatus::Idle {
        return "Loading characters...".to_string();
    }
    if let Some(ref error) = view.error {
        return format!("Error: {}", error);
    }
    if view.is_empty_result() {
        return "No characters found.".to_string();
    }

    let query = &view.query;
    let sort = match query.sort_by {
        SortKey::None => "none".to_string(),
        key => format!("{:?} {:?}", key, query.sort_order).to_lowercase(),
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Page {}/{} | {} characters | {} per page | sort: {} | filters: {}",
        view.page,
        view.total_pages,
        view.total_items,
        query.page_size.get(),
        sort,
        query.filters
    );
    if view.refresh_pending {
        let _ = writeln!(out, "(filters changed, refreshing...)");
    }
    if view.truncated {
        let _ = writeln!(
            out,
            "(record cap reached: only the first {} matches were fetched)",
            view.total_items
        );
    }
    for character in &view.items {
        let marker = if selected == Some(character.id) { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{} #{:<5} {:<32} {:<8} {:<16} {}",
            marker,
            character.id,
            character.name,
            character.status.to_string(),
            character.species,
            character.gender
        );
    }
    out.trim_end().to_string()
}

/// Render the detail view of one record.
pub fn render_detail(character: &Character) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", character.name, character.id);
    let _ = writeln!(out, "  Status:   {}", character.status);
    let _ = writeln!(out, "  Species:  {}", character.species);
    if !character.kind.is_empty() {
        let _ = writeln!(out, "  Type:     {}", character.kind);
    }
    let _ = writeln!(out, "  Gender:   {}", character.gender);
    if !character.origin.name.is_empty() {
        let _ = writeln!(out, "  Origin:   {}", character.origin.name);
    }
    if !character.location.name.is_empty() {
        let _ = writeln!(out, "  Location: {}", character.location.name);
    }
    let _ = writeln!(out, "  Episodes: {}", character.episode.len());
    let _ = writeln!(out, "  Image:    {}", character.image);
    let _ = write!(out, "  Created:  {}", character.created);
    out
}
