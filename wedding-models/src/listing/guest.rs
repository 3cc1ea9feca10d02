use super::{
    cmp_missing_last, cmp_text, matches_search, requested_sort, ListQuery, SortColumn,
    SortDirection, SortState,
};
use crate::{entities::simple_guest::Model as SimpleGuestModel, enums::common::Attendance};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestStatusFilter {
    #[default]
    All,
    Confirmed,
    Declined,
    Pending,
}

impl GuestStatusFilter {
    pub fn accepts(self, attendance: Attendance) -> bool {
        match self {
            GuestStatusFilter::All => true,
            GuestStatusFilter::Confirmed => attendance == Attendance::Yes,
            GuestStatusFilter::Declined => attendance == Attendance::No,
            GuestStatusFilter::Pending => attendance == Attendance::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuestSortColumn {
    Name,
    Email,
    Attendance,
    PlusOnes,
    InvitationCode,
    CreatedAt,
}

impl SortColumn for GuestSortColumn {
    const ALL: &'static [Self] = &[
        GuestSortColumn::Name,
        GuestSortColumn::Email,
        GuestSortColumn::Attendance,
        GuestSortColumn::PlusOnes,
        GuestSortColumn::InvitationCode,
        GuestSortColumn::CreatedAt,
    ];

    fn key(&self) -> &'static str {
        match self {
            GuestSortColumn::Name => "name",
            GuestSortColumn::Email => "email",
            GuestSortColumn::Attendance => "attendance",
            GuestSortColumn::PlusOnes => "plusOnes",
            GuestSortColumn::InvitationCode => "invitationCode",
            GuestSortColumn::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestListParams {
    /// Matched against name, email, phone and invitation code
    pub search: Option<String>,
    #[serde(default)]
    pub status: GuestStatusFilter,
    pub sort_by: Option<GuestSortColumn>,
    pub sort_dir: Option<SortDirection>,
}

impl ListQuery for GuestListParams {
    type Record = SimpleGuestModel;
    type Column = GuestSortColumn;

    fn matches(&self, guest: &SimpleGuestModel) -> bool {
        self.status.accepts(guest.attendance)
            && matches_search(
                [
                    Some(guest.name.as_str()),
                    guest.email.as_deref(),
                    guest.phone.as_deref(),
                    guest.invitation_code.as_deref(),
                ],
                self.search.as_deref().unwrap_or_default(),
            )
    }

    fn sort_state(&self) -> Option<SortState<GuestSortColumn>> {
        requested_sort(self.sort_by, self.sort_dir)
    }

    fn compare(column: GuestSortColumn, a: &SimpleGuestModel, b: &SimpleGuestModel) -> Ordering {
        match column {
            GuestSortColumn::Name => cmp_text(Some(a.name.as_str()), Some(b.name.as_str())),
            GuestSortColumn::Email => cmp_text(a.email.as_deref(), b.email.as_deref()),
            GuestSortColumn::Attendance => {
                cmp_text(Some(a.attendance.as_str()), Some(b.attendance.as_str()))
            }
            GuestSortColumn::PlusOnes => a.plus_ones.cmp(&b.plus_ones),
            GuestSortColumn::InvitationCode => {
                cmp_text(a.invitation_code.as_deref(), b.invitation_code.as_deref())
            }
            GuestSortColumn::CreatedAt => cmp_missing_last(a.created_at, b.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(id: i32, name: &str, email: Option<&str>, attendance: Attendance) -> SimpleGuestModel {
        SimpleGuestModel {
            id,
            name: name.into(),
            email: email.map(String::from),
            phone: None,
            attendance,
            plus_ones: id,
            notes: None,
            invitation_code: Some(format!("INV{id}")),
            created_at: None,
            updated_at: None,
        }
    }

    fn guests() -> Vec<SimpleGuestModel> {
        vec![
            guest(1, "zoe", Some("zoe@example.com"), Attendance::Yes),
            guest(2, "Adam", None, Attendance::No),
            guest(3, "bella", Some("bella@EXAMPLE.com"), Attendance::Pending),
            guest(4, "Carl", Some("carl@example.org"), Attendance::Yes),
        ]
    }

    fn ids(records: &[SimpleGuestModel]) -> Vec<i32> {
        records.iter().map(|g| g.id).collect()
    }

    #[test]
    fn test_status_filter() {
        for (status, expected) in [
            (GuestStatusFilter::Confirmed, vec![1, 4]),
            (GuestStatusFilter::Declined, vec![2]),
            (GuestStatusFilter::Pending, vec![3]),
            (GuestStatusFilter::All, vec![1, 2, 3, 4]),
        ] {
            let params = GuestListParams {
                status,
                ..Default::default()
            };
            assert_eq!(ids(&params.apply(guests()).records), expected);
        }
    }

    #[test]
    fn test_search_covers_email_and_code() {
        let params = GuestListParams {
            search: Some("example.COM".into()),
            ..Default::default()
        };
        assert_eq!(ids(&params.apply(guests()).records), vec![1, 3]);

        let params = GuestListParams {
            search: Some("inv2".into()),
            ..Default::default()
        };
        assert_eq!(ids(&params.apply(guests()).records), vec![2]);
    }

    #[test]
    fn test_sort_and_header_sorts() {
        let params = GuestListParams {
            sort_by: Some(GuestSortColumn::Name),
            ..Default::default()
        };
        let result = params.apply(guests());
        assert_eq!(ids(&result.records), vec![2, 3, 4, 1]);
        assert_eq!(
            result.header_sorts["name"],
            SortState::new(GuestSortColumn::Name, SortDirection::Desc)
        );
        assert_eq!(
            result.header_sorts["email"],
            SortState::new(GuestSortColumn::Email, SortDirection::Asc)
        );

        let params = GuestListParams {
            sort_by: Some(GuestSortColumn::Email),
            sort_dir: Some(SortDirection::Asc),
            ..Default::default()
        };
        // guest without email sorts last
        assert_eq!(ids(&params.apply(guests()).records), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_filter_search_and_sort_combined() {
        let params = GuestListParams {
            search: Some("example".into()),
            status: GuestStatusFilter::Confirmed,
            sort_by: Some(GuestSortColumn::PlusOnes),
            sort_dir: Some(SortDirection::Desc),
        };
        let result = params.apply(guests());
        assert_eq!(ids(&result.records), vec![4, 1]);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_params_from_query() {
        let params: GuestListParams = serde_json::from_value(serde_json::json!({
            "status": "declined",
            "sortBy": "invitationCode",
            "sortDir": "desc"
        }))
        .unwrap();
        assert_eq!(params.status, GuestStatusFilter::Declined);
        assert_eq!(
            params.sort_state(),
            Some(SortState::new(GuestSortColumn::InvitationCode, SortDirection::Desc))
        );
    }
}
