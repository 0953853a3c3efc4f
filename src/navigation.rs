use crate::catalog::{Catalog, FlashcardRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no category selected")]
    NoCategory,

    #[error("card {index} does not exist, the category has {len} cards")]
    OutOfRange { index: usize, len: usize },

    #[error("no card is open")]
    NoActiveCard,

    #[error("category '{0}' has no cards")]
    EmptyCategory(String),
}

/// Which screen is showing and which card, if any, is expanded.
///
/// A failed transition leaves the state untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    selected_category: Option<String>,
    active_card_index: Option<usize>,
    is_flipped: bool,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn active_card_index(&self) -> Option<usize> {
        self.active_card_index
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn is_home(&self) -> bool {
        self.selected_category.is_none()
    }

    pub fn select_category(&mut self, name: impl Into<String>) {
        let name = name.into();
        log::debug!("select category '{}'", name);
        *self = Self {
            selected_category: Some(name),
            active_card_index: None,
            is_flipped: false,
        };
    }

    pub fn go_home(&mut self) {
        log::debug!("go home");
        *self = Self::default();
    }

    pub fn open_card(&mut self, catalog: &Catalog, index: usize) -> Result<(), NavigationError> {
        let len = self.filtered_len(catalog)?;
        if index >= len {
            return Err(NavigationError::OutOfRange { index, len });
        }
        log::debug!("open card {}", index);
        self.active_card_index = Some(index);
        self.is_flipped = false;
        Ok(())
    }

    pub fn close_card(&mut self) {
        self.active_card_index = None;
        self.is_flipped = false;
    }

    pub fn toggle_flip(&mut self) -> Result<(), NavigationError> {
        if self.active_card_index.is_none() {
            return Err(NavigationError::NoActiveCard);
        }
        self.is_flipped = !self.is_flipped;
        Ok(())
    }

    pub fn next(&mut self, catalog: &Catalog) -> Result<(), NavigationError> {
        self.step(catalog, Direction::Forward)
    }

    pub fn prev(&mut self, catalog: &Catalog) -> Result<(), NavigationError> {
        self.step(catalog, Direction::Backward)
    }

    /// Cards of the selected category; empty on the home screen.
    pub fn filtered_cards<'a>(&self, catalog: &'a Catalog) -> Vec<&'a FlashcardRecord> {
        match self.selected_category.as_deref() {
            Some(category) => catalog.cards_in(category),
            None => Vec::new(),
        }
    }

    pub fn active_card<'a>(&self, catalog: &'a Catalog) -> Option<&'a FlashcardRecord> {
        let index = self.active_card_index?;
        self.filtered_cards(catalog).get(index).copied()
    }

    /// Cards reached by `prev` and `next` from the open card.
    pub fn neighbours<'a>(
        &self,
        catalog: &'a Catalog,
    ) -> Option<(&'a FlashcardRecord, &'a FlashcardRecord)> {
        let index = self.active_card_index?;
        let cards = self.filtered_cards(catalog);
        if cards.is_empty() {
            return None;
        }
        let prev = cards[wrap(index, cards.len(), Direction::Backward)];
        let next = cards[wrap(index, cards.len(), Direction::Forward)];
        Some((prev, next))
    }

    fn filtered_len(&self, catalog: &Catalog) -> Result<usize, NavigationError> {
        let category = self
            .selected_category
            .as_deref()
            .ok_or(NavigationError::NoCategory)?;
        Ok(catalog.cards_in(category).len())
    }

    fn step(&mut self, catalog: &Catalog, direction: Direction) -> Result<(), NavigationError> {
        let len = self.filtered_len(catalog)?;
        let index = self.active_card_index.ok_or(NavigationError::NoActiveCard)?;
        if len == 0 {
            let category = self.selected_category.clone().unwrap_or_default();
            return Err(NavigationError::EmptyCategory(category));
        }
        let target = wrap(index, len, direction);
        log::debug!("move from card {} to {}", index, target);
        self.active_card_index = Some(target);
        self.is_flipped = false;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

// `len` must be non-zero.
fn wrap(index: usize, len: usize, direction: Direction) -> usize {
    match direction {
        Direction::Forward => (index + 1) % len,
        Direction::Backward => (index + len - 1) % len,
    }
}
