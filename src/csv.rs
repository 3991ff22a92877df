//! Roster CSV parser that produces [`ParticipantRecord`]s.
//!
//! The two name columns are located by header text. Other columns in the
//! export (email, groups, roles...) are ignored.

use serde::{Deserialize, Serialize};

use crate::error::{FirmasError, Result};
use crate::types::ParticipantRecord;

/// Header of the first-name column in platform exports.
pub const DEFAULT_FIRST_NAME_COLUMN: &str = "Nombre";
/// Header of the last-name column in platform exports.
pub const DEFAULT_LAST_NAME_COLUMN: &str = "Apellido(s)";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const DELIMITER_CANDIDATES: [u8; 3] = [b',', b';', b'\t'];

/// Header names of the two required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    pub first_name: String,
    pub last_name: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            first_name: DEFAULT_FIRST_NAME_COLUMN.to_string(),
            last_name: DEFAULT_LAST_NAME_COLUMN.to_string(),
        }
    }
}

impl RosterColumns {
    fn expected(&self) -> Vec<String> {
        vec![self.first_name.clone(), self.last_name.clone()]
    }
}

/// Parse roster CSV bytes, in file order.
///
/// Every data row yields exactly one record; short rows get empty names for
/// the missing fields. Both names are trimmed.
pub fn parse_roster(data: &[u8], columns: &RosterColumns) -> Result<Vec<ParticipantRecord>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let delimiter = detect_delimiter(data);

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    let found: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let first_idx = found.iter().position(|h| *h == columns.first_name);
    let last_idx = found.iter().position(|h| *h == columns.last_name);
    let (Some(first_idx), Some(last_idx)) = (first_idx, last_idx) else {
        return Err(FirmasError::MissingColumns {
            expected: columns.expected(),
            found,
        });
    };

    let mut participants = Vec::new();
    for record in reader.records() {
        let record = record?;
        participants.push(ParticipantRecord::new(
            record.get(first_idx).unwrap_or(""),
            record.get(last_idx).unwrap_or(""),
        ));
    }
    Ok(participants)
}

/// Pick the candidate delimiter that occurs most often on the header line.
///
/// Ties go to the earlier candidate; a header with none of them is read as
/// comma-separated.
fn detect_delimiter(data: &[u8]) -> u8 {
    let header = data.split(|&b| b == b'\n').next().unwrap_or(&[]);
    let mut best = (b',', 0usize);
    for candidate in DELIMITER_CANDIDATES {
        let count = header.iter().filter(|&&b| b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn parse(data: &[u8]) -> Result<Vec<ParticipantRecord>> {
        parse_roster(data, &RosterColumns::default())
    }

    #[test]
    fn test_parse_roster_basic() {
        let data = "Nombre,Apellido(s),Dirección de correo\nAna,García,ana@x.es\nbeto,Ruiz,b@x.es";
        let people = parse(data.as_bytes()).unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0], ParticipantRecord::new("Ana", "García"));
        assert_eq!(people[1], ParticipantRecord::new("beto", "Ruiz"));
    }

    #[test]
    fn test_parse_roster_columns_in_any_order() {
        let data = b"Email,Apellido(s),Nombre\na@x,Lopez,Eva";
        let people = parse(data).unwrap();
        assert_eq!(people[0].first_name, "Eva");
        assert_eq!(people[0].last_name, "Lopez");
    }

    #[test]
    fn test_parse_roster_trims_whitespace() {
        let data = b"Nombre,Apellido(s)\n  Ana  ,  de la Fuente \n";
        let people = parse(data).unwrap();
        assert_eq!(people[0], ParticipantRecord::new("Ana", "de la Fuente"));
    }

    #[test]
    fn test_parse_roster_strips_bom() {
        let data = b"\xEF\xBB\xBFNombre,Apellido(s)\nAna,Sol";
        assert_eq!(parse(data).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_roster_semicolon_delimiter() {
        let data = "Nombre;Apellido(s);Grupo\nZoë;O'Connor;T1\nÁlvaro;Muñoz-Álvarez;T2";
        let people = parse(data.as_bytes()).unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].last_name, "O'Connor");
        assert_eq!(people[1].last_name, "Muñoz-Álvarez");
    }

    #[test]
    fn test_parse_roster_quoted_fields() {
        let data = b"Nombre,Apellido(s)\n\"Mar\xC3\xADa, Jos\xC3\xA9\",\"Le \"\"Petit\"\"\"";
        let people = parse(data).unwrap();
        assert_eq!(people[0].first_name, "María, José");
        assert_eq!(people[0].last_name, "Le \"Petit\"");
    }

    #[test]
    fn test_parse_roster_missing_column() {
        let err = parse(b"Nombre,Apellidos\nAna,Sol").unwrap_err();
        match err {
            FirmasError::MissingColumns { expected, found } => {
                assert_eq!(expected, vec!["Nombre", "Apellido(s)"]);
                assert_eq!(found, vec!["Nombre", "Apellidos"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_roster_header_only_is_empty() {
        assert!(parse(b"Nombre,Apellido(s)\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_roster_empty_input_is_missing_columns() {
        assert!(matches!(
            parse(b""),
            Err(FirmasError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_parse_roster_short_row_keeps_record() {
        let data = b"Nombre,Apellido(s)\nSolo\nAna,Sol";
        let people = parse(data).unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0], ParticipantRecord::new("Solo", ""));
    }

    #[test]
    fn test_parse_roster_custom_columns() {
        let columns = RosterColumns {
            first_name: "First name".into(),
            last_name: "Last name".into(),
        };
        let people = parse_roster(b"First name,Last name\nAda,Lovelace", &columns).unwrap();
        assert_eq!(people[0], ParticipantRecord::new("Ada", "Lovelace"));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(b"a,b,c\n1;2;3;4;5"), b',');
        assert_eq!(detect_delimiter(b"a;b;c\n"), b';');
        assert_eq!(detect_delimiter(b"a\tb\n"), b'\t');
        assert_eq!(detect_delimiter(b"single\n"), b',');
    }
}
