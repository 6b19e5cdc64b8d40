//! Resident CSV import: header auto-mapping plus row extraction.

use crate::db::patch::ResidentCreate;
use crate::error::DeskError;
use shiftdesk_core::{ColumnMapping, auto_map_columns};

/// Rows ready to insert, plus what was dropped and how the headers were read.
#[derive(Debug)]
pub struct ParsedResidents {
    pub rows: Vec<ResidentCreate>,
    pub skipped: usize,
    pub mapping: ColumnMapping,
}

fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Rows without a name are skipped; a file without any name-like header is rejected.
pub fn parse_residents(data: &[u8]) -> Result<ParsedResidents, DeskError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mapping = auto_map_columns(&headers);
    let Some(name_idx) = mapping.name else {
        return Err(DeskError::invalid(
            "file",
            "no name column found (expected a header containing name, resident or tenant)",
        ));
    };

    let mut rows = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let record = record?;
        let Some(name) = cell(&record, Some(name_idx)) else {
            skipped += 1;
            continue;
        };
        rows.push(ResidentCreate {
            name,
            unit: cell(&record, mapping.unit),
            phone: cell(&record, mapping.phone),
            email: cell(&record, mapping.email),
            notes: cell(&record, mapping.notes),
        });
    }

    Ok(ParsedResidents {
        rows,
        skipped,
        mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_headers_and_skips_nameless_rows() {
        let csv = "\u{feff}Tenant Name,Apt,Cell,E-mail\n\
                   Ana Ruiz,4B,555-0101,ana@example.com\n\
                   ,5C,555-0102,\n\
                   Bo Chen,6D,,\n";
        let parsed = parse_residents(csv.as_bytes()).unwrap();
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].name, "Ana Ruiz");
        assert_eq!(parsed.rows[0].unit.as_deref(), Some("4B"));
        assert_eq!(parsed.rows[0].email.as_deref(), Some("ana@example.com"));
        assert_eq!(parsed.rows[1].phone, None);
        assert_eq!(parsed.mapping.phone, Some(2));
    }

    #[test]
    fn rejects_a_file_without_a_name_column() {
        let err = parse_residents(b"unit,phone\n4B,555\n").unwrap_err();
        assert!(matches!(err, DeskError::Validation { .. }));
    }
}
