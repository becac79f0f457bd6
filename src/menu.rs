use crate::document::{ClassList as _, Document};

/// Id of the collapsible navigation list.
pub const NAV_LIST_ID: &str = "navList";

/// Marker class on the navigation list while it is expanded.
pub const OPEN_CLASS: &str = "open";

/// Opens or closes the navigation list.
///
/// Returns the new open state, or `None` when the page has no navigation list.
pub fn toggle_menu<D: Document + ?Sized>(document: &D) -> Option<bool> {
    let list = document.element_by_id(NAV_LIST_ID)?;
    let open = list.toggle_class(OPEN_CLASS);
    tracing::debug!(open, "navigation menu toggled");
    Some(open)
}
