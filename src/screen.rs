use crate::assets::{AssetLocator, ImageSlot};
use crate::catalog::Catalog;
use crate::navigation::NavigationState;
use std::io::{self, Write};

/// Draws whichever screen the navigation state points at.
pub fn render(
    out: &mut impl Write,
    catalog: &Catalog,
    nav: &NavigationState,
    assets: &AssetLocator,
) -> io::Result<()> {
    if nav.active_card_index().is_some() {
        render_card(out, catalog, nav, assets)
    } else if nav.selected_category().is_some() {
        render_category(out, catalog, nav, assets)
    } else {
        render_home(out, catalog)
    }
}

pub fn render_home(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    writeln!(out, "\nMarathi Flashcards")?;
    if catalog.is_empty() {
        writeln!(out, "  No flashcards loaded.")?;
    }
    for (i, category) in catalog.categories().iter().enumerate() {
        writeln!(
            out,
            "  [{}] {} {} ({} Flashcards)",
            i + 1,
            category.icon,
            category.name,
            category.count
        )?;
    }
    Ok(())
}

pub fn render_category(
    out: &mut impl Write,
    catalog: &Catalog,
    nav: &NavigationState,
    assets: &AssetLocator,
) -> io::Result<()> {
    let name = nav.selected_category().unwrap_or_default();
    let icon = catalog
        .category(name)
        .map_or(crate::catalog::DEFAULT_ICON, |c| c.icon);
    writeln!(out, "\n{} {}   (\\b back to home)", icon, name)?;

    let cards = nav.filtered_cards(catalog);
    if cards.is_empty() {
        writeln!(out, "  No flashcards in this category.")?;
    }
    for (i, card) in cards.iter().enumerate() {
        writeln!(
            out,
            "  [{}] {:<16} {}",
            i + 1,
            card.english,
            assets.image_src(&card.image_path, ImageSlot::Thumbnail)
        )?;
    }
    Ok(())
}

pub fn render_card(
    out: &mut impl Write,
    catalog: &Catalog,
    nav: &NavigationState,
    assets: &AssetLocator,
) -> io::Result<()> {
    let (Some(card), Some(index)) = (nav.active_card(catalog), nav.active_card_index()) else {
        return Ok(());
    };
    let total = nav.filtered_cards(catalog).len();

    writeln!(out, "\n── {} ({}/{}) ──", card.english, index + 1, total)?;
    if nav.is_flipped() {
        writeln!(out, "  {}   (\\s to hear)", card.marathi)?;
        writeln!(out, "  {}", card.transliteration)?;
        writeln!(out, "  {}   (\\l to hear)", card.first_letter)?;
    } else {
        writeln!(out, "  {}", card.english)?;
        writeln!(
            out,
            "  image: {}",
            assets.image_src(&card.image_path, ImageSlot::Detail)
        )?;
        writeln!(out, "  (\\f to flip)")?;
    }

    if let Some((prev, next)) = nav.neighbours(catalog) {
        writeln!(out, "  ← {}  |  {} →   (\\p / \\n)", prev.english, next.english)?;
    }
    writeln!(out, "  (\\b to close)")?;
    Ok(())
}
