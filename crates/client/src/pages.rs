//! Forward-only walk over the pages of a search

use fhir_core::Bundle;

use crate::error::ClientError;
use crate::source::FhirSource;

enum Cursor {
    Start,
    At(Bundle),
    Done,
}

/// Lazy sequence of search result pages.
///
/// The first call to [`Pages::next`] issues the search, later calls follow
/// the `next` link of the page before; a page without one ends the walk
/// without another request. Only one page is held at a time and
/// the walk cannot be restarted. After the last page, or after a failed
/// request, every call returns `Ok(None)` without contacting the source.
pub struct Pages<'a, S> {
    source: &'a S,
    resource_type: String,
    criteria: Vec<String>,
    cursor: Cursor,
    fetched: usize,
}

impl<'a, S: FhirSource> Pages<'a, S> {
    pub fn new(source: &'a S, resource_type: &str, criteria: Vec<String>) -> Self {
        Self {
            source,
            resource_type: resource_type.to_string(),
            criteria,
            cursor: Cursor::Start,
            fetched: 0,
        }
    }

    /// Advance to the next page
    pub async fn next(&mut self) -> Result<Option<&Bundle>, ClientError> {
        let result = match &self.cursor {
            Cursor::Start => self
                .source
                .search(&self.resource_type, &self.criteria)
                .await
                .map(Some),
            Cursor::At(page) if page.next_url().is_none() => Ok(None),
            Cursor::At(page) => self.source.continue_search(page).await,
            Cursor::Done => Ok(None),
        };

        match result {
            Ok(Some(page)) => {
                self.fetched += 1;
                self.cursor = Cursor::At(page);
            }
            Ok(None) => self.cursor = Cursor::Done,
            Err(e) => {
                self.cursor = Cursor::Done;
                return Err(e);
            }
        }

        match &self.cursor {
            Cursor::At(page) => Ok(Some(page)),
            _ => Ok(None),
        }
    }

    /// Number of pages received so far
    pub fn fetched(&self) -> usize {
        self.fetched
    }
}
