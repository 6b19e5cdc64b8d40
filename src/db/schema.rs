//! SQL DDL for initializing the database schema.
//! Timestamps are stored as RFC3339 text; wall-clock times (check-in, package intake) as
//! naive local `YYYY-MM-DD HH:MM:SS` text.

/// SQLite schema. Statements are separated by `;` and applied in order at startup.
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Accounts
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY NOT NULL,
    username TEXT NOT NULL COLLATE NOCASE UNIQUE,
    password_hash TEXT NOT NULL,
    email TEXT NULL COLLATE NOCASE,
    display_name TEXT NULL,
    role TEXT NOT NULL DEFAULT 'agent', -- agent | manager
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS password_reset_tokens (
    id INTEGER PRIMARY KEY NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token TEXT NOT NULL UNIQUE,
    expires_at TEXT NOT NULL,
    used_at TEXT NULL,
    created_at TEXT NOT NULL
);

-- ---------------------------------------------------------------------------
-- Properties and their configuration
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS properties (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    address TEXT NULL,
    phone TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS email_settings (
    id INTEGER PRIMARY KEY NOT NULL,
    property_id INTEGER NOT NULL UNIQUE REFERENCES properties(id) ON DELETE CASCADE,
    recipients TEXT NOT NULL DEFAULT '[]', -- JSON array of addresses
    auto_send INTEGER NOT NULL DEFAULT 1,
    attach_pdf INTEGER NOT NULL DEFAULT 1,
    attach_csv INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS residents (
    id INTEGER PRIMARY KEY NOT NULL,
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    unit TEXT NULL,
    phone TEXT NULL,
    email TEXT NULL,
    notes TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_residents_property ON residents(property_id);

CREATE TABLE IF NOT EXISTS duty_templates (
    id INTEGER PRIMARY KEY NOT NULL,
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    shift TEXT NOT NULL, -- 1st | 2nd | 3rd
    task TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_duty_templates_property ON duty_templates(property_id, active);

CREATE TABLE IF NOT EXISTS agent_shift_assignments (
    id INTEGER PRIMARY KEY NOT NULL,
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    shift_range TEXT NOT NULL, -- e.g. "7:00 am to 3:00 pm"
    agent_name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_agent_shift_property ON agent_shift_assignments(property_id);

CREATE TABLE IF NOT EXISTS announcements (
    id INTEGER PRIMARY KEY NOT NULL,
    property_id INTEGER NULL REFERENCES properties(id) ON DELETE CASCADE, -- NULL => all properties
    title TEXT NOT NULL,
    message TEXT NOT NULL,
    created_by TEXT NULL,
    expires_at TEXT NULL,
    created_at TEXT NOT NULL
);

-- ---------------------------------------------------------------------------
-- Daily reports (one per property per date) and their children
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS daily_reports (
    id INTEGER PRIMARY KEY NOT NULL,
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    report_date TEXT NOT NULL, -- YYYY-MM-DD
    agent_name TEXT NULL,
    current_shift TEXT NULL,
    shift_status TEXT NOT NULL DEFAULT '{}', -- JSON keyed by shift label
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(property_id, report_date)
);

CREATE INDEX IF NOT EXISTS idx_daily_reports_dispatch ON daily_reports(report_date, current_shift);

CREATE TABLE IF NOT EXISTS guest_checkins (
    id INTEGER PRIMARY KEY NOT NULL,
    report_id INTEGER NOT NULL REFERENCES daily_reports(id) ON DELETE CASCADE,
    shift TEXT NOT NULL,
    guest_name TEXT NOT NULL,
    unit TEXT NULL,
    resident_id INTEGER NULL REFERENCES residents(id) ON DELETE SET NULL,
    purpose TEXT NULL,
    id_verified INTEGER NOT NULL DEFAULT 0,
    checked_in_at TEXT NOT NULL,
    checked_out_at TEXT NULL,
    notes TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_guest_checkins_report ON guest_checkins(report_id);

CREATE TABLE IF NOT EXISTS packages (
    id INTEGER PRIMARY KEY NOT NULL,
    report_id INTEGER NOT NULL REFERENCES daily_reports(id) ON DELETE CASCADE,
    shift TEXT NOT NULL,
    recipient_name TEXT NOT NULL,
    unit TEXT NULL,
    carrier TEXT NULL,
    tracking_number TEXT NULL,
    status TEXT NOT NULL DEFAULT 'received', -- received | picked_up | returned
    received_at TEXT NOT NULL,
    picked_up_at TEXT NULL,
    picked_up_by TEXT NULL,
    notes TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_packages_report ON packages(report_id);

CREATE TABLE IF NOT EXISTS package_audits (
    id INTEGER PRIMARY KEY NOT NULL,
    report_id INTEGER NOT NULL REFERENCES daily_reports(id) ON DELETE CASCADE,
    shift TEXT NOT NULL,
    packages_on_hand INTEGER NOT NULL,
    discrepancies TEXT NULL,
    audited_by TEXT NULL,
    audited_at TEXT NOT NULL,
    UNIQUE(report_id, shift)
);

CREATE TABLE IF NOT EXISTS daily_duties (
    id INTEGER PRIMARY KEY NOT NULL,
    report_id INTEGER NOT NULL REFERENCES daily_reports(id) ON DELETE CASCADE,
    template_id INTEGER NULL REFERENCES duty_templates(id) ON DELETE SET NULL,
    shift TEXT NOT NULL,
    task TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    completed INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT NULL,
    completed_by TEXT NULL,
    UNIQUE(report_id, template_id)
);

CREATE TABLE IF NOT EXISTS shift_notes (
    id INTEGER PRIMARY KEY NOT NULL,
    report_id INTEGER NOT NULL REFERENCES daily_reports(id) ON DELETE CASCADE,
    shift TEXT NOT NULL,
    content TEXT NOT NULL,
    agent_name TEXT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(report_id, shift)
)
"#;
