use chrono::{DateTime, Utc};

use crate::shared::{ItemId, WeeklyWindow};

/// Which items an aggregation pass covers.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ItemSelection {
    /// Every item with at least one observation in the log.
    #[default]
    Observed,
    /// Only the listed items.
    Only(Vec<ItemId>),
}

/// Configuration for one aggregation engine instance.
#[derive(Clone, Debug)]
pub struct RollupConfig {
    weekly_window: WeeklyWindow,
    as_of: Option<DateTime<Utc>>,
    items: ItemSelection,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            weekly_window: WeeklyWindow::default(),
            as_of: None,
            items: ItemSelection::Observed,
        }
    }
}

impl RollupConfig {
    pub fn weekly_window(&self) -> WeeklyWindow {
        self.weekly_window
    }

    /// Fixed as-of instant, or `None` to use the wall clock at the start of
    /// each aggregation pass. Pinning the instant makes runs reproducible.
    pub fn as_of(&self) -> Option<DateTime<Utc>> {
        self.as_of
    }

    pub fn items(&self) -> &ItemSelection {
        &self.items
    }

    pub fn set_weekly_window(mut self, window: WeeklyWindow) -> Self {
        self.weekly_window = window;
        self
    }

    pub fn set_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn set_items(mut self, items: ItemSelection) -> Self {
        self.items = items;
        self
    }
}
