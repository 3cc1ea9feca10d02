mod guest;
mod invitation;

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use wedding_error::{WedError, WedResult};

/// A record that can be written as one CSV row.
pub trait CsvRecord {
    fn header() -> &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

/// Header plus one row per record, CRLF terminated and quoted where needed.
pub fn to_csv<R: CsvRecord>(records: &[R]) -> WedResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(R::header())?;
    for record in records {
        writer.write_record(record.row())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| WedError::Error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| WedError::Error(e.to_string()))
}

/// `guests-20261016.csv`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}.csv", date.format("%Y%m%d"))
}

pub(crate) fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub(crate) fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, &'static str);

    impl CsvRecord for Row {
        fn header() -> &'static [&'static str] {
            &["name", "notes"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_header_and_one_row_per_record() {
        let csv = to_csv(&[Row("Ada", "none"), Row("Bob", "")]).unwrap();
        assert_eq!(csv, "name,notes\r\nAda,none\r\nBob,\r\n");
    }

    #[test]
    fn test_special_characters_are_quoted() {
        let csv = to_csv(&[Row("Smith, Jane", "said \"hi\"\nthen left")]).unwrap();
        assert_eq!(
            csv,
            "name,notes\r\n\"Smith, Jane\",\"said \"\"hi\"\"\nthen left\"\r\n"
        );
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(to_csv::<Row>(&[]).unwrap(), "name,notes\r\n");
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(export_file_name("guests", date), "guests-20261016.csv");
    }
}
