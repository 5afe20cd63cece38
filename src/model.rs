use std::collections::BTreeSet;

/// One spreadsheet row with the columns a card needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub last_name: String,
    pub first_name: String,
    pub address: String,
    pub city: String,
    pub subdivision: Option<String>,
}

impl Record {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            address: address.into(),
            city: city.into(),
            subdivision: None,
        }
    }

    pub fn with_subdivision(mut self, subdivision: impl Into<String>) -> Self {
        self.subdivision = Some(subdivision.into());
        self
    }

    /// "Last, First" as printed on the first card line.
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Fixed card geometry, in millimetres on an A4 page measured from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    pub first_card_top: f32,
    pub name_address_width: f32,
    pub comment_width: f32,
    pub box_height: f32,
    pub card_advance: f32,
    /// Footer cell top, measured up from the bottom edge.
    pub footer_from_bottom: f32,
}

impl Default for CardGeometry {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            left_margin: 10.0,
            // header cell at y=10 (height 10) followed by 5 units of spacing
            first_card_top: 25.0,
            name_address_width: 85.0,
            comment_width: 110.0,
            box_height: 20.0,
            card_advance: 20.0,
            footer_from_bottom: 15.0,
        }
    }
}

impl CardGeometry {
    pub fn slot_top(&self, slot: usize) -> f32 {
        self.first_card_top + slot as f32 * self.card_advance
    }

    /// How many cards fit between the first slot and the footer (12 for the default A4 layout).
    pub fn slot_capacity(&self) -> usize {
        let usable = self.page_height - self.footer_from_bottom - self.first_card_top;
        if usable < self.box_height || self.card_advance <= 0.0 {
            return 0;
        }
        ((usable - self.box_height) / self.card_advance).floor() as usize + 1
    }
}

/// A placed record: origin of the name/address box plus the three text lines.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub x: f32,
    pub y: f32,
    pub name_line: String,
    pub address_line: String,
    pub city_line: String,
}

impl Card {
    pub fn place(record: &Record, x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            name_line: record.full_name(),
            address_line: record.address.clone(),
            city_line: record.city.clone(),
        }
    }
}

pub const SUBDIVISION_FALLBACK: &str = "Subdivision: Not Available";

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// 1-based
    pub number: usize,
    pub cards: Vec<Card>,
    pub subdivisions: BTreeSet<String>,
}

impl Page {
    pub fn footer_text(&self) -> String {
        if self.subdivisions.is_empty() {
            SUBDIVISION_FALLBACK.to_string()
        } else {
            let names: Vec<&str> = self.subdivisions.iter().map(String::as_str).collect();
            format!("Subdivisions: {}", names.join(", "))
        }
    }
}
