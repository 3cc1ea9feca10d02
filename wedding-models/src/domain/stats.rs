use crate::{
    entities::{invitation::Model as InvitationModel, simple_guest::Model as SimpleGuestModel},
    enums::common::Attendance,
};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationStats {
    pub total: usize,
    pub responded: usize,
    pub attending: usize,
    pub declined: usize,
    pub pending: usize,
    /// Confirmed seats across attending invitations
    pub expected_headcount: i64,
    pub gifts: usize,
    pub photos: usize,
    /// Invitations whose link was opened at least once
    pub opened: usize,
}

impl InvitationStats {
    pub fn from_records(records: &[InvitationModel]) -> Self {
        records.iter().fold(Self::default(), |mut s, inv| {
            s.total += 1;
            s.responded += usize::from(inv.rsvp_completed);
            match inv.attendance {
                Attendance::Yes => s.attending += 1,
                Attendance::No => s.declined += 1,
                Attendance::Pending => s.pending += 1,
            }
            s.expected_headcount += inv.headcount();
            s.gifts += usize::from(inv.gift_completed);
            s.photos += usize::from(inv.photo_completed);
            s.opened += usize::from(inv.open_count > 0);
            s
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestStats {
    pub total: usize,
    pub confirmed: usize,
    pub declined: usize,
    pub pending: usize,
    /// Confirmed guests plus their plus-ones
    pub headcount: i64,
}

impl GuestStats {
    pub fn from_records(records: &[SimpleGuestModel]) -> Self {
        records.iter().fold(Self::default(), |mut s, guest| {
            s.total += 1;
            match guest.attendance {
                Attendance::Yes => s.confirmed += 1,
                Attendance::No => s.declined += 1,
                Attendance::Pending => s.pending += 1,
            }
            s.headcount += guest.headcount();
            s
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub invitations: InvitationStats,
    pub guests: GuestStats,
    pub media: u64,
    pub timeline_events: u64,
    pub content_documents: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::common::Relationship;

    fn invitation(id: i32, attendance: Attendance, seats: Option<i32>) -> InvitationModel {
        InvitationModel {
            id,
            code: format!("CODE{id}"),
            guest_name: format!("Guest {id}"),
            partner_name: None,
            email: None,
            phone: None,
            relationship: Relationship::Friend,
            party_size: 4,
            attendance,
            confirmed_party_size: seats,
            rsvp_completed: attendance != Attendance::Pending,
            gift_completed: id % 2 == 0,
            photo_completed: false,
            open_count: id - 1,
            first_opened_at: None,
            last_opened_at: None,
            message: None,
            dietary_notes: None,
            table_number: None,
            self_registered: false,
            responded_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_invitation_stats() {
        let records = vec![
            invitation(1, Attendance::Yes, Some(3)),
            invitation(2, Attendance::Yes, None),
            invitation(3, Attendance::No, Some(0)),
            invitation(4, Attendance::Pending, None),
        ];
        let stats = InvitationStats::from_records(&records);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.responded, 3);
        assert_eq!((stats.attending, stats.declined, stats.pending), (2, 1, 1));
        assert_eq!(stats.expected_headcount, 4);
        assert_eq!(stats.gifts, 2);
        assert_eq!(stats.opened, 3);
    }

    #[test]
    fn test_guest_headcount_counts_plus_ones_of_confirmed_only() {
        let guest = |attendance, plus_ones| SimpleGuestModel {
            id: 1,
            name: "G".into(),
            email: None,
            phone: None,
            attendance,
            plus_ones,
            notes: None,
            invitation_code: None,
            created_at: None,
            updated_at: None,
        };
        let stats = GuestStats::from_records(&[
            guest(Attendance::Yes, 2),
            guest(Attendance::No, 5),
            guest(Attendance::Pending, 1),
        ]);
        assert_eq!(stats.headcount, 3);
        assert_eq!((stats.confirmed, stats.declined, stats.pending), (1, 1, 1));
    }
}
