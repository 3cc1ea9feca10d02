use super::{
    cmp_missing_last, cmp_text, matches_search, requested_sort, ListQuery, SortColumn,
    SortDirection, SortState,
};
use crate::{
    entities::invitation::Model as InvitationModel,
    enums::common::{Attendance, Relationship},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpFilter {
    #[default]
    All,
    Completed,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvitationSortColumn {
    GuestName,
    Code,
    Relationship,
    Attendance,
    OpenCount,
    TableNumber,
    CreatedAt,
}

impl SortColumn for InvitationSortColumn {
    const ALL: &'static [Self] = &[
        InvitationSortColumn::GuestName,
        InvitationSortColumn::Code,
        InvitationSortColumn::Relationship,
        InvitationSortColumn::Attendance,
        InvitationSortColumn::OpenCount,
        InvitationSortColumn::TableNumber,
        InvitationSortColumn::CreatedAt,
    ];

    fn key(&self) -> &'static str {
        match self {
            InvitationSortColumn::GuestName => "guestName",
            InvitationSortColumn::Code => "code",
            InvitationSortColumn::Relationship => "relationship",
            InvitationSortColumn::Attendance => "attendance",
            InvitationSortColumn::OpenCount => "openCount",
            InvitationSortColumn::TableNumber => "tableNumber",
            InvitationSortColumn::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationListParams {
    /// Matched against guest name, partner name, email, phone and code
    pub search: Option<String>,
    pub relationship: Option<Relationship>,
    #[serde(default)]
    pub rsvp: RsvpFilter,
    pub attendance: Option<Attendance>,
    pub sort_by: Option<InvitationSortColumn>,
    pub sort_dir: Option<SortDirection>,
}

impl ListQuery for InvitationListParams {
    type Record = InvitationModel;
    type Column = InvitationSortColumn;

    fn matches(&self, inv: &InvitationModel) -> bool {
        let rsvp = match self.rsvp {
            RsvpFilter::All => true,
            RsvpFilter::Completed => inv.rsvp_completed,
            RsvpFilter::Pending => !inv.rsvp_completed,
        };
        rsvp && self.relationship.map_or(true, |r| r == inv.relationship)
            && self.attendance.map_or(true, |a| a == inv.attendance)
            && matches_search(
                [
                    Some(inv.guest_name.as_str()),
                    inv.partner_name.as_deref(),
                    inv.email.as_deref(),
                    inv.phone.as_deref(),
                    Some(inv.code.as_str()),
                ],
                self.search.as_deref().unwrap_or_default(),
            )
    }

    fn sort_state(&self) -> Option<SortState<InvitationSortColumn>> {
        requested_sort(self.sort_by, self.sort_dir)
    }

    fn compare(column: InvitationSortColumn, a: &InvitationModel, b: &InvitationModel) -> Ordering {
        match column {
            InvitationSortColumn::GuestName => {
                cmp_text(Some(a.guest_name.as_str()), Some(b.guest_name.as_str()))
            }
            InvitationSortColumn::Code => cmp_text(Some(a.code.as_str()), Some(b.code.as_str())),
            InvitationSortColumn::Relationship => {
                cmp_text(Some(a.relationship.as_str()), Some(b.relationship.as_str()))
            }
            InvitationSortColumn::Attendance => {
                cmp_text(Some(a.attendance.as_str()), Some(b.attendance.as_str()))
            }
            InvitationSortColumn::OpenCount => a.open_count.cmp(&b.open_count),
            InvitationSortColumn::TableNumber => cmp_missing_last(a.table_number, b.table_number),
            InvitationSortColumn::CreatedAt => cmp_missing_last(a.created_at, b.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListResult;

    fn invitation(
        id: i32,
        guest_name: &str,
        relationship: Relationship,
        attendance: Attendance,
        table_number: Option<i32>,
    ) -> InvitationModel {
        InvitationModel {
            id,
            code: format!("C{id}XYZ"),
            guest_name: guest_name.into(),
            partner_name: (id == 3).then(|| "Quinn Partner".to_string()),
            email: None,
            phone: (id == 2).then(|| "+1 555 0102".to_string()),
            relationship,
            party_size: 2,
            attendance,
            confirmed_party_size: None,
            rsvp_completed: attendance != Attendance::Pending,
            gift_completed: false,
            photo_completed: false,
            open_count: 10 - id,
            first_opened_at: None,
            last_opened_at: None,
            message: None,
            dietary_notes: None,
            table_number,
            self_registered: false,
            responded_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn invitations() -> Vec<InvitationModel> {
        vec![
            invitation(1, "Maya", Relationship::Family, Attendance::Yes, Some(3)),
            invitation(2, "liam", Relationship::Friend, Attendance::Pending, None),
            invitation(3, "Noah", Relationship::Friend, Attendance::No, Some(1)),
            invitation(4, "emma", Relationship::Colleague, Attendance::Pending, Some(2)),
        ]
    }

    fn ids(result: ListResult<InvitationModel, InvitationSortColumn>) -> Vec<i32> {
        result.records.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_filters() {
        let friends = InvitationListParams {
            relationship: Some(Relationship::Friend),
            ..Default::default()
        };
        assert_eq!(ids(friends.apply(invitations())), vec![2, 3]);

        let pending = InvitationListParams {
            rsvp: RsvpFilter::Pending,
            ..Default::default()
        };
        assert_eq!(ids(pending.apply(invitations())), vec![2, 4]);

        let completed_yes = InvitationListParams {
            rsvp: RsvpFilter::Completed,
            attendance: Some(Attendance::Yes),
            ..Default::default()
        };
        assert_eq!(ids(completed_yes.apply(invitations())), vec![1]);
    }

    #[test]
    fn test_search_partner_phone_and_code() {
        let by_partner = InvitationListParams {
            search: Some("quinn".into()),
            ..Default::default()
        };
        assert_eq!(ids(by_partner.apply(invitations())), vec![3]);

        let by_phone = InvitationListParams {
            search: Some("0102".into()),
            ..Default::default()
        };
        assert_eq!(ids(by_phone.apply(invitations())), vec![2]);

        let by_code = InvitationListParams {
            search: Some("c4x".into()),
            ..Default::default()
        };
        assert_eq!(ids(by_code.apply(invitations())), vec![4]);
    }

    #[test]
    fn test_sorting() {
        let by_name = InvitationListParams {
            sort_by: Some(InvitationSortColumn::GuestName),
            ..Default::default()
        };
        assert_eq!(ids(by_name.apply(invitations())), vec![4, 2, 1, 3]);

        let by_table_desc = InvitationListParams {
            sort_by: Some(InvitationSortColumn::TableNumber),
            sort_dir: Some(SortDirection::Desc),
            ..Default::default()
        };
        // missing table numbers come first when descending
        assert_eq!(ids(by_table_desc.apply(invitations())), vec![2, 1, 4, 3]);

        let by_opens = InvitationListParams {
            sort_by: Some(InvitationSortColumn::OpenCount),
            ..Default::default()
        };
        let result = by_opens.apply(invitations());
        assert_eq!(result.header_sorts["openCount"].direction, SortDirection::Desc);
        assert_eq!(ids(result), vec![4, 3, 2, 1]);
    }
}
