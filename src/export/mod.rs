//! Report rendering: a plain line layout shared by the PDF and the email body, plus CSV.

pub mod csv_report;
pub mod email;
pub mod pdf;

use shiftdesk_core::Shift;

use crate::db::ReportBundle;

const TIME_FMT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Title(String),
    Heading(String),
    Text(String),
    Blank,
}

/// `riverside-commons-2024-01-01.pdf`
pub fn report_filename(bundle: &ReportBundle, ext: &str) -> String {
    let mut slug = String::new();
    for c in bundle.property.name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "report" } else { slug };
    format!("{slug}-{}.{ext}", bundle.report.report_date)
}

pub fn report_title(bundle: &ReportBundle) -> String {
    format!(
        "{} - Daily Report {}",
        bundle.property.name,
        bundle.report.report_date.format("%A, %B %-d, %Y")
    )
}

/// The report laid out shift by shift. `only` restricts the output to one shift.
pub fn report_lines(bundle: &ReportBundle, only: Option<Shift>) -> Vec<Line> {
    let mut out = vec![Line::Title(report_title(bundle))];
    if let Some(address) = bundle.property.address.as_deref() {
        out.push(Line::Text(address.to_string()));
    }
    out.push(Line::Text(format!(
        "Agent: {}    Current shift: {}",
        bundle.report.agent_name.as_deref().unwrap_or("-"),
        bundle.report.current_shift.map_or("-", |s| s.as_str()),
    )));

    for shift in Shift::ALL {
        if only.is_some_and(|s| s != shift) {
            continue;
        }
        out.push(Line::Blank);
        out.extend(shift_lines(bundle, shift));
    }
    out
}

fn shift_lines(bundle: &ReportBundle, shift: Shift) -> Vec<Line> {
    let status = bundle.report.shift_status.get(shift);
    let mut flags = Vec::new();
    if status.is_some_and(|s| s.completed) {
        flags.push("completed");
    }
    if status.is_some_and(|s| s.sent) {
        flags.push("sent");
    }
    let suffix = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    let mut out = vec![Line::Heading(format!(
        "{} shift ({}){suffix}",
        shift,
        shift.window()
    ))];

    let checkins: Vec<_> = bundle.checkins.iter().filter(|c| c.shift == shift).collect();
    out.push(Line::Text(format!("Guest check-ins: {}", checkins.len())));
    for c in checkins {
        let mut line = format!("  {} {}", c.checked_in_at.format(TIME_FMT), c.guest_name);
        if let Some(unit) = c.unit.as_deref() {
            line.push_str(&format!(" (unit {unit})"));
        }
        if let Some(purpose) = c.purpose.as_deref() {
            line.push_str(&format!(" - {purpose}"));
        }
        if c.id_verified {
            line.push_str(" [ID verified]");
        }
        if let Some(out_at) = c.checked_out_at {
            line.push_str(&format!(" out {}", out_at.format(TIME_FMT)));
        }
        out.push(Line::Text(line));
    }

    let packages: Vec<_> = bundle.packages.iter().filter(|p| p.shift == shift).collect();
    out.push(Line::Text(format!("Packages received: {}", packages.len())));
    for p in packages {
        let mut line = format!("  {} {}", p.received_at.format(TIME_FMT), p.recipient_name);
        if let Some(unit) = p.unit.as_deref() {
            line.push_str(&format!(" (unit {unit})"));
        }
        if let Some(carrier) = p.carrier.as_deref() {
            line.push_str(&format!(" {carrier}"));
        }
        if let Some(tracking) = p.tracking_number.as_deref() {
            line.push_str(&format!(" #{tracking}"));
        }
        line.push_str(&format!(" - {}", p.status));
        out.push(Line::Text(line));
    }

    if let Some(audit) = bundle.audit_for(shift) {
        let mut line = format!("Package audit: {} on hand", audit.packages_on_hand);
        if let Some(by) = audit.audited_by.as_deref() {
            line.push_str(&format!(", by {by}"));
        }
        out.push(Line::Text(line));
        if let Some(d) = audit.discrepancies.as_deref().filter(|d| !d.trim().is_empty()) {
            out.push(Line::Text(format!("  Discrepancies: {d}")));
        }
    }

    let duties: Vec<_> = bundle.duties.iter().filter(|d| d.shift == shift).collect();
    if !duties.is_empty() {
        let done = duties.iter().filter(|d| d.completed).count();
        out.push(Line::Text(format!("Duties: {done}/{} done", duties.len())));
        for d in duties {
            let mark = if d.completed { "[x]" } else { "[ ]" };
            let mut line = format!("  {mark} {}", d.task);
            if let Some(by) = d.completed_by.as_deref() {
                line.push_str(&format!(" ({by})"));
            }
            out.push(Line::Text(line));
        }
    }

    if let Some(notes) = bundle.notes_for(shift).filter(|n| !n.content.trim().is_empty()) {
        out.push(Line::Text("Notes:".to_string()));
        for l in notes.content.lines() {
            out.push(Line::Text(format!("  {l}")));
        }
    }

    out
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, Utc};
    use shiftdesk_core::{PackageStatus, Shift, ShiftStatusMap};
    use sqlx::types::Json;

    use crate::db::models::{
        DailyDuty, DailyReport, GuestCheckin, Package, Property, ReportBundle, ShiftNotes,
    };

    pub fn bundle() -> ReportBundle {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut status = ShiftStatusMap::default();
        status.mark_completed(Shift::First, Utc::now());
        ReportBundle {
            report: DailyReport {
                id: 1,
                property_id: 1,
                report_date: date,
                agent_name: Some("Dana".to_string()),
                current_shift: Some(Shift::First),
                shift_status: Json(status),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            property: Property {
                id: 1,
                name: "Riverside Commons".to_string(),
                address: Some("1 River Rd".to_string()),
                phone: None,
                created_at: Utc::now(),
            },
            checkins: vec![GuestCheckin {
                id: 1,
                report_id: 1,
                shift: Shift::First,
                guest_name: "Sam Guest".to_string(),
                unit: Some("4B".to_string()),
                resident_id: None,
                purpose: Some("Visit".to_string()),
                id_verified: true,
                checked_in_at: date.and_hms_opt(8, 15, 0).unwrap(),
                checked_out_at: None,
                notes: None,
                created_at: Utc::now(),
            }],
            packages: vec![Package {
                id: 1,
                report_id: 1,
                shift: Shift::Second,
                recipient_name: "Lee Tenant".to_string(),
                unit: Some("12".to_string()),
                carrier: Some("UPS".to_string()),
                tracking_number: Some("1Z999".to_string()),
                status: PackageStatus::Received,
                received_at: date.and_hms_opt(16, 0, 0).unwrap(),
                picked_up_at: None,
                picked_up_by: None,
                notes: None,
                created_at: Utc::now(),
            }],
            package_audits: Vec::new(),
            duties: vec![DailyDuty {
                id: 1,
                report_id: 1,
                template_id: None,
                shift: Shift::First,
                task: "Check lobby doors".to_string(),
                sort_order: 0,
                completed: true,
                completed_at: Some(Utc::now()),
                completed_by: Some("Dana".to_string()),
            }],
            notes: vec![ShiftNotes {
                id: 1,
                report_id: 1,
                shift: Shift::First,
                content: "Quiet morning.\nElevator serviced.".to_string(),
                agent_name: Some("Dana".to_string()),
                updated_at: Utc::now(),
            }],
        }
    }
}
