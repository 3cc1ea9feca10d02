use super::{opt, CsvRecord};
use crate::entities::simple_guest::Model as SimpleGuestModel;

impl CsvRecord for SimpleGuestModel {
    fn header() -> &'static [&'static str] {
        &[
            "Name",
            "Email",
            "Phone",
            "Attendance",
            "Plus ones",
            "Invitation code",
            "Notes",
            "Created at",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            opt(&self.email),
            opt(&self.phone),
            self.attendance.to_string(),
            self.plus_ones.to_string(),
            opt(&self.invitation_code),
            opt(&self.notes),
            self.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]
    }
}
