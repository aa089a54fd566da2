//! Type definitions for the tvmaze-browser application.
//!
//! This module contains the core data structures for shows and episodes as
//! returned by the TVMaze API, plus the card projection used for display.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Maximum length of a show summary on its card.
pub const SUMMARY_PREVIEW_CHARS: usize = 200;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Which list a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Shows,
    Episodes,
}

impl ItemKind {
    /// Plural noun used in counts and placeholders.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Shows => "shows",
            ItemKind::Episodes => "episodes",
        }
    }

    /// Text displayed instead of an empty list.
    pub fn empty_placeholder(self) -> &'static str {
        match self {
            ItemKind::Shows => "No shows found",
            ItemKind::Episodes => "No episodes found",
        }
    }
}

/// Average rating as reported by TVMaze.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Rating {
    #[serde(default)]
    pub average: Option<f64>,
}

/// Poster or still image URLs.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Image {
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
}

/// A TV show from the catalog.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Show {
    /// Unique identifier for the show.
    pub id: u32,

    /// Display name of the show.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,

    /// Running/Ended/... as free text.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: Rating,

    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,

    /// HTML-bearing summary.
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub image: Option<Image>,

    /// Link to the show page on TVMaze.
    #[serde(default)]
    pub url: String,
}

/// An episode of a show.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Episode {
    /// Unique identifier for the episode.
    pub id: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub season: u32,

    /// Episode number within the season; specials have none.
    #[serde(default)]
    pub number: Option<u32>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// HTML-bearing summary.
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub image: Option<Image>,

    #[serde(default)]
    pub url: String,
}

/// The displayable projection of a list item.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub title: String,
    /// Short metadata lines shown under the title.
    pub meta: Vec<String>,
    pub summary: String,
    pub image: Option<String>,
    pub link: String,
}

/// Something that can appear in the active list.
pub trait Listable {
    const KIND: ItemKind;

    fn id(&self) -> u32;

    /// Label used in pickers.
    fn to_display(&self) -> String;

    fn to_card(&self) -> Card;
}

impl Listable for Show {
    const KIND: ItemKind = ItemKind::Shows;

    fn id(&self) -> u32 {
        self.id
    }

    fn to_display(&self) -> String {
        self.display_name().to_string()
    }

    fn to_card(&self) -> Card {
        let genres = if self.genres.is_empty() {
            "-".to_string()
        } else {
            self.genres.join(", ")
        };
        let rating = self
            .rating
            .average
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let runtime = self
            .runtime
            .map(|r| format!("{} min", r))
            .unwrap_or_else(|| "N/A".to_string());

        Card {
            title: self.display_name().to_string(),
            meta: vec![
                format!("Genres: {}", genres),
                format!("Status: {}", self.status.as_deref().unwrap_or("-")),
                format!("Rating: {}", rating),
                format!("Runtime: {}", runtime),
            ],
            summary: truncate_text(&summary_or_placeholder(&self.summary), SUMMARY_PREVIEW_CHARS),
            image: self.image.as_ref().and_then(|i| i.medium.clone()),
            link: self.url.clone(),
        }
    }
}

impl Show {
    /// Name with a fallback for untitled entries.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Untitled show"
        } else {
            &self.name
        }
    }
}

impl Listable for Episode {
    const KIND: ItemKind = ItemKind::Episodes;

    fn id(&self) -> u32 {
        self.id
    }

    /// Format the episode for the episode picker.
    ///
    /// # Examples
    ///
    /// ```
    /// use tvmaze_browser::types::{Episode, Listable};
    ///
    /// let ep = Episode {
    ///     id: 10,
    ///     season: 1,
    ///     number: Some(1),
    ///     name: "Pilot".to_string(),
    ///     summary: None,
    ///     image: None,
    ///     url: String::new(),
    /// };
    /// assert_eq!(ep.to_display(), "S01E01 - Pilot");
    /// ```
    fn to_display(&self) -> String {
        format!("{} - {}", self.code(), self.name)
    }

    fn to_card(&self) -> Card {
        let title = if self.name.is_empty() {
            "Untitled episode".to_string()
        } else {
            self.name.clone()
        };
        Card {
            title,
            meta: vec![self.code()],
            summary: summary_or_placeholder(&self.summary),
            image: self.image.as_ref().and_then(|i| i.medium.clone()),
            link: self.url.clone(),
        }
    }
}

impl Episode {
    /// Season/episode code such as `S02E07`.
    pub fn code(&self) -> String {
        format!("S{}E{}", pad(Some(self.season)), pad(self.number))
    }
}

/// Zero-pad to two digits, `00` when absent.
pub fn pad(num: Option<u32>) -> String {
    match num {
        Some(n) => format!("{:02}", n),
        None => "00".to_string(),
    }
}

/// Strip HTML tags and surrounding whitespace.
///
/// ```
/// use tvmaze_browser::types::clean_text;
///
/// assert_eq!(clean_text(Some("<p>A <b>bold</b> start</p> ")), "A bold start");
/// assert_eq!(clean_text(None), "");
/// ```
pub fn clean_text(html: Option<&str>) -> String {
    match html {
        Some(s) => TAG_RE.replace_all(s, "").trim().to_string(),
        None => String::new(),
    }
}

/// Cut `text` to at most `max` characters, appending an ellipsis when cut.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}…", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

fn summary_or_placeholder(summary: &Option<String>) -> String {
    let cleaned = clean_text(summary.as_deref());
    if cleaned.is_empty() {
        "No summary available".to_string()
    } else {
        cleaned
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
