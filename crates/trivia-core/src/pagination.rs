//! Fixed-size page slicing shared by every list endpoint.
//!
//! Pages are 1-based. Slicing never fails: a page past the end of the
//! collection yields an empty vector and the caller decides what that means.

/// Number of questions returned per page.
pub const QUESTIONS_PER_PAGE: usize = 10;

/// A 1-based page number.
///
/// `Page(0)` is the out-of-range page produced by non-positive input; it
/// always slices to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Page(u64);

impl Page {
    pub const FIRST: Page = Page(1);

    pub fn new(number: u64) -> Self {
        Self(number)
    }

    /// Parse the raw `page` query value.
    ///
    /// Absent or non-numeric input falls back to the first page. A numeric
    /// value below 1 becomes the out-of-range page; one too large for `u64`
    /// becomes the last representable page, which is always empty.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return Self::FIRST;
        };
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Self::FIRST;
        }
        if negative {
            return Self(0);
        }
        match digits.parse::<u64>() {
            Ok(n) => Self(n),
            Err(_) => Self(u64::MAX),
        }
    }

    pub fn number(self) -> u64 {
        self.0
    }

    /// Index of the first item on this page, or `None` for page 0.
    pub fn offset(self, page_size: usize) -> Option<usize> {
        let index = usize::try_from(self.0.checked_sub(1)?).unwrap_or(usize::MAX);
        Some(index.saturating_mul(page_size))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Return the window `items[offset .. offset + page_size]`, clipped to the
/// length of `items`.
pub fn paginate<T>(items: Vec<T>, page: Page, page_size: usize) -> Vec<T> {
    match page.offset(page_size) {
        Some(offset) => items.into_iter().skip(offset).take(page_size).collect(),
        None => Vec::new(),
    }
}
