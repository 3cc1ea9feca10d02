//! Search, filter and sort over rows already loaded from the database.
//!
//! Every admin list runs the same pipeline: keep the records matching the
//! free-text search and the filters, then sort by the requested column. The
//! result carries the applied sort and, for every sortable column, the sort a
//! click on its header would request next.

mod guest;
mod invitation;
mod media;

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, fmt::Debug};

pub use guest::{GuestListParams, GuestSortColumn, GuestStatusFilter};
pub use invitation::{InvitationListParams, InvitationSortColumn, RsvpFilter};
pub use media::MediaListParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: Copy + PartialEq> SortState<C> {
    pub fn new(column: C, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Sort after a click on `clicked`: the active column flips, any other starts ascending.
    pub fn toggle(current: Option<SortState<C>>, clicked: C) -> SortState<C> {
        match current {
            Some(state) if state.column == clicked => {
                SortState::new(clicked, state.direction.flip())
            }
            _ => SortState::new(clicked, SortDirection::Asc),
        }
    }
}

/// A column a list can be sorted by.
pub trait SortColumn: Copy + PartialEq + Debug + Serialize + 'static {
    const ALL: &'static [Self];

    /// Wire name, as accepted in `sortBy`
    fn key(&self) -> &'static str;
}

/// Trimmed, case-insensitive substring match against any present field.
/// A blank needle matches every record.
pub fn matches_search<'a, I>(fields: I, needle: &str) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Missing values order after present ones.
pub fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive text order, missing values last.
pub fn cmp_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    cmp_missing_last(a.map(str::to_lowercase), b.map(str::to_lowercase))
}

/// Listed records together with the sort that produced their order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T, C> {
    pub records: Vec<T>,
    pub total: usize,
    pub sort: Option<SortState<C>>,
    pub header_sorts: BTreeMap<&'static str, SortState<C>>,
}

/// Query over one kind of record.
pub trait ListQuery {
    type Record;
    type Column: SortColumn;

    /// Search and filters combined
    fn matches(&self, record: &Self::Record) -> bool;

    fn sort_state(&self) -> Option<SortState<Self::Column>>;

    /// Ascending order of two records on `column`
    fn compare(column: Self::Column, a: &Self::Record, b: &Self::Record) -> Ordering;

    fn apply(&self, records: Vec<Self::Record>) -> ListResult<Self::Record, Self::Column> {
        let mut records: Vec<_> = records.into_iter().filter(|r| self.matches(r)).collect();
        let sort = self.sort_state();
        if let Some(state) = sort {
            // stable: equal keys keep load order
            records.sort_by(|a, b| state.direction.apply(Self::compare(state.column, a, b)));
        }
        let header_sorts = Self::Column::ALL
            .iter()
            .map(|&column| (column.key(), SortState::toggle(sort, column)))
            .collect();
        ListResult {
            total: records.len(),
            records,
            sort,
            header_sorts,
        }
    }
}

/// Sort requested through `sortBy` / `sortDir`; the direction defaults to ascending.
pub(crate) fn requested_sort<C: Copy + PartialEq>(
    sort_by: Option<C>,
    sort_dir: Option<SortDirection>,
) -> Option<SortState<C>> {
    sort_by.map(|column| SortState::new(column, sort_dir.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    enum Col {
        A,
        B,
    }

    #[test]
    fn test_toggle_same_column_flips() {
        let asc = SortState::toggle(None, Col::A);
        assert_eq!(asc, SortState::new(Col::A, SortDirection::Asc));
        let desc = SortState::toggle(Some(asc), Col::A);
        assert_eq!(desc.direction, SortDirection::Desc);
        let back = SortState::toggle(Some(desc), Col::A);
        assert_eq!(back.direction, SortDirection::Asc);
    }

    #[test]
    fn test_toggle_new_column_starts_ascending() {
        let current = SortState::new(Col::A, SortDirection::Desc);
        assert_eq!(
            SortState::toggle(Some(current), Col::B),
            SortState::new(Col::B, SortDirection::Asc)
        );
    }

    #[test]
    fn test_matches_search() {
        let fields = || [Some("Ada Lovelace"), None, Some("ADA@example.com")];
        assert!(matches_search(fields(), "love"));
        assert!(matches_search(fields(), "  EXAMPLE "));
        assert!(matches_search(fields(), ""));
        assert!(matches_search(fields(), "   "));
        assert!(!matches_search(fields(), "babbage"));
        assert!(!matches_search([None, None], "x"));
    }

    #[test]
    fn test_cmp_text_missing_last_and_case_insensitive() {
        let mut values = vec![None, Some("beta"), Some("Alpha"), Some("alpha2")];
        values.sort_by(|a, b| cmp_text(*a, *b));
        assert_eq!(values, vec![Some("Alpha"), Some("alpha2"), Some("beta"), None]);

        values.sort_by(|a, b| SortDirection::Desc.apply(cmp_text(*a, *b)));
        assert_eq!(values[0], None);
    }
}
