//! Link targets for the interactive parts of a rendered view.

use crate::table::{Column, SortDirection};
use crate::tabs::TabSpec;

/// Where the tabs and column headers of a view point.
///
/// Any `Fn(&TabSpec) -> String` is a `ViewLinks` whose column headers stay
/// plain text.
pub trait ViewLinks {
    /// Target of a primary tab or a sub-tab.
    fn tab(&self, tab: &TabSpec) -> String;

    /// Target of the header of `column` in table `table`. Following it leaves
    /// the table sorted by that column in `direction`. `None` keeps the header
    /// plain.
    fn sort(&self, table: &str, column: &Column, direction: SortDirection) -> Option<String> {
        let _ = (table, column, direction);
        None
    }
}

impl<F> ViewLinks for F
where
    F: Fn(&TabSpec) -> String,
{
    fn tab(&self, tab: &TabSpec) -> String {
        self(tab)
    }
}
