//! Fetching collections that Steam serves in pages.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;

/// A single page of items.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryPage<T, C> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Whether more pages are available.
    pub more_items: bool,
    /// The cursor to request the next page with.
    pub cursor: Option<C>,
}

/// An item that can be told apart from items on other pages.
pub trait PageItem {
    type Id: Eq + Hash;

    fn page_item_id(&self) -> Self::Id;
}

/// Fetches every page, starting without a cursor and following the cursor each page returns
/// until a page reports nothing more. Items are kept in page order and an item already seen on
/// an earlier page is skipped. Any error aborts the whole fetch.
pub async fn fetch_all<T, C, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    T: PageItem,
    C: PartialEq + Clone + std::fmt::Debug,
    F: FnMut(Option<C>) -> Fut,
    Fut: Future<Output = Result<InventoryPage<T, C>>>,
{
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor: Option<C> = None;

    loop {
        let page = fetch_page(cursor.clone()).await?;

        log::debug!("Fetched page of {} items at cursor {cursor:?}", page.items.len());

        for item in page.items {
            if seen.insert(item.page_item_id()) {
                items.push(item);
            }
        }

        if !page.more_items {
            break;
        }

        // a repeated cursor would loop forever
        if page.cursor.is_none() || page.cursor == cursor {
            return Err(Error::Response("More items reported without a new cursor".into()));
        }

        cursor = page.cursor;
    }

    Ok(items)
}
