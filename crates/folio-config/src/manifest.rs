//! Ordered page and diagram manifest.
//!
//! The order of [`PageEntry`] values is significant: it decides which pages
//! are linked as previous/next from each other.

use serde::Deserialize;

/// Layout engine used when a diagram entry doesn't name one.
pub const DEFAULT_LAYOUT_ENGINE: &str = "dot";

/// A page rendered into the site shell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageEntry {
    /// Source file name, relative to the input directory. Also used as the
    /// output file name and as the link target from neighbouring pages.
    pub source: String,
    /// Page title. May carry inline markup such as `<code>` and is rendered
    /// without escaping.
    pub title: String,
}

impl PageEntry {
    pub fn new(source: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
        }
    }
}

/// A graph description rendered to SVG by an external layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiagramEntry {
    /// Source file name, relative to the input directory.
    pub source: String,
    /// Name of the layout engine executable. Kept as a raw string: an
    /// unknown engine only skips this diagram.
    #[serde(default = "default_layout_engine")]
    pub engine: String,
}

impl DiagramEntry {
    pub fn new(source: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            engine: engine.into(),
        }
    }
}

fn default_layout_engine() -> String {
    DEFAULT_LAYOUT_ENGINE.to_owned()
}

/// Previous/next links for a page, derived from its manifest position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation<'a> {
    pub prev_url: Option<&'a str>,
    pub next_url: Option<&'a str>,
}

/// Pages and diagrams driving a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pages: Vec<PageEntry>,
    #[serde(default)]
    diagrams: Vec<DiagramEntry>,
}

impl Manifest {
    pub fn new(pages: Vec<PageEntry>, diagrams: Vec<DiagramEntry>) -> Self {
        Self { pages, diagrams }
    }

    /// Pages in navigation order.
    pub fn pages(&self) -> &[PageEntry] {
        &self.pages
    }

    pub fn diagrams(&self) -> &[DiagramEntry] {
        &self.diagrams
    }

    /// Navigation links for the page at `index`.
    ///
    /// The first page has no previous link and the last page has no next
    /// link. Everything in between links to its direct neighbours.
    #[must_use]
    pub fn navigation(&self, index: usize) -> Navigation<'_> {
        let prev_url = index
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .map(|page| page.source.as_str());
        let next_url = self
            .pages
            .get(index + 1)
            .map(|page| page.source.as_str());
        Navigation { prev_url, next_url }
    }
}
