use csv::Writer;

use crate::db::ReportBundle;
use crate::error::DeskError;

const HEADER: [&str; 8] = [
    "section", "shift", "time", "name", "unit", "detail", "status", "notes",
];

/// One row per logged item, every section in one sheet.
pub fn render_csv(bundle: &ReportBundle) -> Result<Vec<u8>, DeskError> {
    let mut w = Writer::from_writer(Vec::new());
    w.write_record(HEADER)?;

    for c in &bundle.checkins {
        let status = match c.checked_out_at {
            Some(at) => format!("checked out {}", at.format("%H:%M")),
            None if c.id_verified => "id verified".to_string(),
            None => String::new(),
        };
        w.write_record([
            "checkin",
            c.shift.as_str(),
            c.checked_in_at.format("%Y-%m-%d %H:%M").to_string().as_str(),
            c.guest_name.as_str(),
            c.unit.as_deref().unwrap_or(""),
            c.purpose.as_deref().unwrap_or(""),
            status.as_str(),
            c.notes.as_deref().unwrap_or(""),
        ])?;
    }

    for p in &bundle.packages {
        let detail = [p.carrier.as_deref(), p.tracking_number.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        w.write_record([
            "package",
            p.shift.as_str(),
            p.received_at.format("%Y-%m-%d %H:%M").to_string().as_str(),
            p.recipient_name.as_str(),
            p.unit.as_deref().unwrap_or(""),
            detail.as_str(),
            p.status.as_str(),
            p.notes.as_deref().unwrap_or(""),
        ])?;
    }

    for a in &bundle.package_audits {
        w.write_record([
            "package_audit",
            a.shift.as_str(),
            a.audited_at.to_rfc3339().as_str(),
            a.audited_by.as_deref().unwrap_or(""),
            "",
            format!("{} on hand", a.packages_on_hand).as_str(),
            "",
            a.discrepancies.as_deref().unwrap_or(""),
        ])?;
    }

    for d in &bundle.duties {
        w.write_record([
            "duty",
            d.shift.as_str(),
            d.completed_at.map(|t| t.to_rfc3339()).unwrap_or_default().as_str(),
            d.completed_by.as_deref().unwrap_or(""),
            "",
            d.task.as_str(),
            if d.completed { "done" } else { "pending" },
            "",
        ])?;
    }

    for n in &bundle.notes {
        w.write_record([
            "notes",
            n.shift.as_str(),
            n.updated_at.to_rfc3339().as_str(),
            n.agent_name.as_deref().unwrap_or(""),
            "",
            "",
            "",
            n.content.as_str(),
        ])?;
    }

    w.into_inner().map_err(|e| DeskError::IoError(e.into_error()))
}
