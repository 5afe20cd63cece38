use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use crate::error::Error;
use crate::model::{Card, CardGeometry, Page, Record};

/// What happens when the record stream ends exactly on a page boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrailingPage {
    /// No extra page: N records at K per page give exactly ceil(N/K) pages.
    #[default]
    Suppress,
    /// Legacy output: a page break always follows a full page, so an
    /// exact multiple ends with one empty page carrying the fallback footer.
    Emit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub records_per_page: NonZeroUsize,
    pub trailing_page: TrailingPage,
    pub geometry: CardGeometry,
}

pub const DEFAULT_RECORDS_PER_PAGE: NonZeroUsize = match NonZeroUsize::new(12) {
    Some(n) => n,
    None => unreachable!(),
};

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            records_per_page: DEFAULT_RECORDS_PER_PAGE,
            trailing_page: TrailingPage::default(),
            geometry: CardGeometry::default(),
        }
    }
}

impl LayoutConfig {
    /// Reject a page size that would push cards into the footer or off the page.
    pub fn check_capacity(&self) -> Result<(), Error> {
        let capacity = self.geometry.slot_capacity();
        if self.records_per_page.get() > capacity {
            return Err(Error::PageOverflow {
                records_per_page: self.records_per_page.get(),
                capacity,
            });
        }
        Ok(())
    }
}

struct OpenPage {
    cards: Vec<Card>,
    subdivisions: BTreeSet<String>,
}

impl OpenPage {
    fn new(capacity: usize) -> Self {
        Self {
            cards: Vec::with_capacity(capacity),
            subdivisions: BTreeSet::new(),
        }
    }
}

enum PageState {
    Accumulating(OpenPage),
    /// The last page filled up; the next record opens a new one.
    Closed,
}

/// Places records onto pages one at a time.
pub struct Paginator {
    config: LayoutConfig,
    pages: Vec<Page>,
    state: PageState,
}

impl Paginator {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            state: PageState::Accumulating(OpenPage::new(config.records_per_page.get())),
        }
    }

    pub fn push(&mut self, record: &Record) {
        let capacity = self.config.records_per_page.get();
        let mut page = match std::mem::replace(&mut self.state, PageState::Closed) {
            PageState::Accumulating(page) => page,
            PageState::Closed => OpenPage::new(capacity),
        };

        if let Some(sub) = &record.subdivision {
            page.subdivisions.insert(sub.clone());
        }

        let geometry = &self.config.geometry;
        let slot = page.cards.len();
        page.cards
            .push(Card::place(record, geometry.left_margin, geometry.slot_top(slot)));

        if page.cards.len() == capacity {
            self.close(page);
        } else {
            self.state = PageState::Accumulating(page);
        }
    }

    fn close(&mut self, page: OpenPage) {
        let number = self.pages.len() + 1;
        log::debug!(
            "Page {number} closed: {} cards, {} subdivisions",
            page.cards.len(),
            page.subdivisions.len()
        );
        self.pages.push(Page {
            number,
            cards: page.cards,
            subdivisions: page.subdivisions,
        });
        self.state = PageState::Closed;
    }

    pub fn finish(mut self) -> Vec<Page> {
        match std::mem::replace(&mut self.state, PageState::Closed) {
            PageState::Accumulating(page) => self.close(page),
            PageState::Closed => {
                if self.config.trailing_page == TrailingPage::Emit {
                    self.close(OpenPage::new(0));
                }
            }
        }
        self.pages
    }
}

/// Lay out `records` in order. Always returns at least one page.
pub fn layout<'a>(records: impl IntoIterator<Item = &'a Record>, config: &LayoutConfig) -> Vec<Page> {
    let mut paginator = Paginator::new(*config);
    for record in records {
        paginator.push(record);
    }
    paginator.finish()
}
