use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").expect("range pattern is valid"));

/// Which page specification grammar to apply to user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SpecFormat {
    /// A single sequential range, e.g. "1-5"
    Range,
    /// Individual page numbers, e.g. "1,3,5,7"
    List,
    /// Numbers and ranges combined, e.g. "1-3,7,10-12"
    #[default]
    Mixed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageSpecError {
    #[error("Empty page specification")]
    Empty,

    #[error("Invalid format: '{0}'. Use format: 1-5")]
    InvalidRangeFormat(String),

    #[error("Invalid page number: '{0}'")]
    InvalidNumber(String),

    #[error("Page {page} is out of range (PDF has {total} pages)")]
    OutOfRange { page: u32, total: u32 },

    #[error("Invalid range {start}-{end}: pages must be between 1 and {total}, and start <= end")]
    InvalidRange { start: u32, end: u32, total: u32 },

    #[error("Page specification selects no pages")]
    NoPages,
}

/// Ascending, duplicate-free set of 1-based page numbers.
///
/// A set may hold numbers beyond a particular document's length; it is
/// clipped against the live page count right before pages are copied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageSet(Vec<u32>);

impl PageSet {
    pub fn from_pages<I: IntoIterator<Item = u32>>(pages: I) -> Self {
        let unique: BTreeSet<u32> = pages.into_iter().collect();
        PageSet(unique.into_iter().collect())
    }

    /// Every page of a document with `total_pages` pages.
    pub fn all(total_pages: u32) -> Self {
        PageSet((1..=total_pages).collect())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Keep only the members in `1..=total_pages`.
    pub fn clip(&self, total_pages: u32) -> PageSet {
        PageSet(
            self.0
                .iter()
                .copied()
                .filter(|&p| p >= 1 && p <= total_pages)
                .collect(),
        )
    }
}

impl fmt::Display for PageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Parse a page specification with the given grammar.
///
/// Fails on the first invalid token; a specification that selects no pages
/// is an error as well.
pub fn parse_page_spec(
    input: &str,
    format: SpecFormat,
    total_pages: u32,
) -> Result<PageSet, PageSpecError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PageSpecError::Empty);
    }

    let pages = match format {
        SpecFormat::Range => parse_range(input, total_pages)?,
        SpecFormat::List => parse_list(input, total_pages)?,
        SpecFormat::Mixed => parse_mixed(input, total_pages)?,
    };

    if pages.is_empty() {
        return Err(PageSpecError::NoPages);
    }
    Ok(pages)
}

fn parse_range(input: &str, total_pages: u32) -> Result<PageSet, PageSpecError> {
    let (start, end) = parse_bounds(input, total_pages)?;
    Ok(PageSet((start..=end).collect()))
}

fn parse_list(input: &str, total_pages: u32) -> Result<PageSet, PageSpecError> {
    let mut pages = Vec::new();
    for token in tokens(input) {
        pages.push(parse_page(token, total_pages)?);
    }
    Ok(PageSet::from_pages(pages))
}

fn parse_mixed(input: &str, total_pages: u32) -> Result<PageSet, PageSpecError> {
    let mut pages = BTreeSet::new();
    for token in tokens(input) {
        if token.contains('-') {
            let (start, end) = parse_bounds(token, total_pages)?;
            pages.extend(start..=end);
        } else {
            pages.insert(parse_page(token, total_pages)?);
        }
    }
    Ok(PageSet(pages.into_iter().collect()))
}

fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn parse_bounds(token: &str, total_pages: u32) -> Result<(u32, u32), PageSpecError> {
    let caps = RANGE_RE
        .captures(token)
        .ok_or_else(|| PageSpecError::InvalidRangeFormat(token.to_string()))?;
    let start = parse_number(&caps[1])?;
    let end = parse_number(&caps[2])?;

    if start < 1 || end > total_pages || start > end {
        return Err(PageSpecError::InvalidRange {
            start,
            end,
            total: total_pages,
        });
    }
    Ok((start, end))
}

fn parse_page(token: &str, total_pages: u32) -> Result<u32, PageSpecError> {
    let page = parse_number(token)?;
    if page < 1 || page > total_pages {
        return Err(PageSpecError::OutOfRange {
            page,
            total: total_pages,
        });
    }
    Ok(page)
}

fn parse_number(s: &str) -> Result<u32, PageSpecError> {
    // u32's FromStr accepts a leading '+', the grammar does not
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PageSpecError::InvalidNumber(s.to_string()));
    }
    s.parse::<u32>()
        .map_err(|_| PageSpecError::InvalidNumber(s.to_string()))
}
