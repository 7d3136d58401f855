use shared::models::{ImageHistoryItem, SearchHistoryItem};
use std::rc::Rc;
use yew::Reducible;

/// A history row addressable by its server id.
pub trait HistoryRow: Clone + PartialEq {
    fn row_id(&self) -> i64;
}

impl HistoryRow for SearchHistoryItem {
    fn row_id(&self) -> i64 {
        self.id
    }
}

impl HistoryRow for ImageHistoryItem {
    fn row_id(&self) -> i64 {
        self.id
    }
}

/// Updates applied to the list as it is when they run.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction<T> {
    /// The server's list arrived. Rows added locally before it and missing
    /// from it stay at the front.
    Loaded(Vec<T>),
    /// A row was deleted.
    Remove(i64),
    /// A row was created.
    Prepend(T),
}

/// A history list rendered by a page.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryList<T> {
    pub items: Vec<T>,
}

impl<T> Default for HistoryList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: HistoryRow> HistoryList<T> {
    /// The list after `action`.
    pub fn apply(&self, action: HistoryAction<T>) -> Self {
        let items = match action {
            HistoryAction::Loaded(loaded) => {
                let mut items: Vec<T> = self
                    .items
                    .iter()
                    .filter(|row| loaded.iter().all(|other| other.row_id() != row.row_id()))
                    .cloned()
                    .collect();
                items.extend(loaded);
                items
            }
            HistoryAction::Remove(id) => self
                .items
                .iter()
                .filter(|row| row.row_id() != id)
                .cloned()
                .collect(),
            HistoryAction::Prepend(row) => std::iter::once(row)
                .chain(self.items.iter().cloned())
                .collect(),
        };
        Self { items }
    }
}

impl<T: HistoryRow> Reducible for HistoryList<T> {
    type Action = HistoryAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}
