use super::{opt, yes_no, CsvRecord};
use crate::entities::invitation::Model as InvitationModel;

impl CsvRecord for InvitationModel {
    fn header() -> &'static [&'static str] {
        &[
            "Code",
            "Guest name",
            "Partner name",
            "Email",
            "Phone",
            "Relationship",
            "Party size",
            "Attendance",
            "Confirmed party size",
            "RSVP completed",
            "Gift completed",
            "Photo completed",
            "Opens",
            "Table",
            "Dietary notes",
            "Message",
            "Self registered",
            "Responded at",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.guest_name.clone(),
            opt(&self.partner_name),
            opt(&self.email),
            opt(&self.phone),
            self.relationship.to_string(),
            self.party_size.to_string(),
            self.attendance.to_string(),
            opt(&self.confirmed_party_size),
            yes_no(self.rsvp_completed),
            yes_no(self.gift_completed),
            yes_no(self.photo_completed),
            self.open_count.to_string(),
            opt(&self.table_number),
            opt(&self.dietary_notes),
            opt(&self.message),
            yes_no(self.self_registered),
            self.responded_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]
    }
}
