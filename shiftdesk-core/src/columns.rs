//! Resident CSV header auto-mapping.
//!
//! Each target field has a keyword list; a header maps to the first field (in priority
//! order) whose keyword it contains, case-insensitively. A header is claimed at most once.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidentField {
    Name,
    Unit,
    Phone,
    Email,
    Notes,
}

/// Resolution order. Email and phone go first so that headers such as
/// "Resident Email" are not claimed by the name field.
const PRIORITY: [(ResidentField, &[&str]); 5] = [
    (ResidentField::Email, &["email", "e-mail", "mail"]),
    (ResidentField::Phone, &["phone", "mobile", "cell", "tel"]),
    (ResidentField::Unit, &["unit", "apt", "apartment", "suite", "room"]),
    (ResidentField::Notes, &["note", "comment", "remark"]),
    (ResidentField::Name, &["name", "resident", "tenant"]),
];

/// Column index for each resident field, if a header matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub name: Option<usize>,
    pub unit: Option<usize>,
    pub phone: Option<usize>,
    pub email: Option<usize>,
    pub notes: Option<usize>,
}

impl ColumnMapping {
    fn slot(&mut self, field: ResidentField) -> &mut Option<usize> {
        match field {
            ResidentField::Name => &mut self.name,
            ResidentField::Unit => &mut self.unit,
            ResidentField::Phone => &mut self.phone,
            ResidentField::Email => &mut self.email,
            ResidentField::Notes => &mut self.notes,
        }
    }
}

pub fn auto_map_columns<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.as_ref().trim().to_ascii_lowercase())
        .collect();
    let mut claimed = vec![false; normalized.len()];
    let mut mapping = ColumnMapping::default();

    for (field, keywords) in PRIORITY {
        let hit = normalized.iter().enumerate().find(|(idx, header)| {
            !claimed[*idx] && keywords.iter().any(|k| header.contains(k))
        });
        if let Some((idx, _)) = hit {
            claimed[idx] = true;
            *mapping.slot(field) = Some(idx);
        }
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_export_headers() {
        let headers = ["Resident Name", "Apt #", "Mobile Phone", "Resident Email", "Comments"];
        let m = auto_map_columns(&headers);
        assert_eq!(m.name, Some(0));
        assert_eq!(m.unit, Some(1));
        assert_eq!(m.phone, Some(2));
        assert_eq!(m.email, Some(3));
        assert_eq!(m.notes, Some(4));
    }

    #[test]
    fn unknown_headers_stay_unmapped() {
        let m = auto_map_columns(&["Lease Start", "Name"]);
        assert_eq!(m.name, Some(1));
        assert_eq!(m.unit, None);
        assert_eq!(m.email, None);
    }

    #[test]
    fn first_matching_header_wins() {
        let m = auto_map_columns(&["tenant", "name"]);
        assert_eq!(m.name, Some(0));
    }
}
