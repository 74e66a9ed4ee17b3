//! SQLite schema and query constants.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Directory members
CREATE TABLE IF NOT EXISTS members (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    gender TEXT NOT NULL,
    photo TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Calendar events
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    location TEXT NOT NULL,
    start_date TEXT NOT NULL,
    start_time TEXT,
    recurrence TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Callings
CREATE TABLE IF NOT EXISTS callings (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    organization TEXT NOT NULL,
    member_id TEXT,
    notes TEXT NOT NULL,
    active INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE SET NULL
);

-- Attendance records, one per member per date
CREATE TABLE IF NOT EXISTS attendance (
    id TEXT PRIMARY KEY,
    member_id TEXT NOT NULL,
    date TEXT NOT NULL,
    present INTEGER NOT NULL,
    meeting_type TEXT NOT NULL,
    notes TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (member_id, date),
    FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE
);

-- Sacrament programs; hymns and speakers are JSON columns
CREATE TABLE IF NOT EXISTS programs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    date TEXT NOT NULL,
    theme TEXT,
    presiding TEXT,
    conducting TEXT,
    chorister TEXT,
    organist TEXT,
    opening_hymn TEXT,
    sacrament_hymn TEXT,
    intermediate_hymn TEXT,
    closing_hymn TEXT,
    opening_prayer TEXT,
    closing_prayer TEXT,
    speakers TEXT NOT NULL,
    announcements TEXT NOT NULL,
    stake_business TEXT NOT NULL,
    ward_business TEXT NOT NULL,
    greeter TEXT NOT NULL,
    include_testimonies INTEGER NOT NULL,
    second_hour_type TEXT NOT NULL,
    second_hour_other_text TEXT NOT NULL,
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Login accounts
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    member_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE SET NULL
);

-- Indexes for the common lookups
CREATE INDEX IF NOT EXISTS idx_events_start_date ON events(start_date);
CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
CREATE INDEX IF NOT EXISTS idx_attendance_member ON attendance(member_id);
CREATE INDEX IF NOT EXISTS idx_programs_date ON programs(date);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
"#;

// Event queries

pub const EVENT_COLUMNS: &str =
    "id, title, description, location, start_date, start_time, recurrence, created_at, updated_at";

pub const INSERT_EVENT: &str = r#"
INSERT INTO events (id, title, description, location, start_date, start_time, recurrence, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub const UPDATE_EVENT: &str = r#"
UPDATE events
SET title = ?2, description = ?3, location = ?4, start_date = ?5, start_time = ?6, recurrence = ?7, updated_at = ?8
WHERE id = ?1
"#;

pub const DELETE_EVENT: &str = "DELETE FROM events WHERE id = ?1";

// Member queries

pub const MEMBER_COLUMNS: &str =
    "id, first_name, last_name, email, phone, gender, photo, created_at, updated_at";

pub const INSERT_MEMBER: &str = r#"
INSERT INTO members (id, first_name, last_name, email, phone, gender, photo, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub const UPDATE_MEMBER: &str = r#"
UPDATE members
SET first_name = ?2, last_name = ?3, email = ?4, phone = ?5, gender = ?6, photo = ?7, updated_at = ?8
WHERE id = ?1
"#;

pub const DELETE_MEMBER: &str = "DELETE FROM members WHERE id = ?1";

// Calling queries

pub const CALLING_COLUMNS: &str =
    "id, title, organization, member_id, notes, active, created_at, updated_at";

pub const INSERT_CALLING: &str = r#"
INSERT INTO callings (id, title, organization, member_id, notes, active, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const UPDATE_CALLING: &str = r#"
UPDATE callings
SET title = ?2, organization = ?3, member_id = ?4, notes = ?5, active = ?6, updated_at = ?7
WHERE id = ?1
"#;

pub const DELETE_CALLING: &str = "DELETE FROM callings WHERE id = ?1";

// Attendance queries

pub const ATTENDANCE_COLUMNS: &str =
    "id, member_id, date, present, meeting_type, notes, created_at, updated_at";

pub const UPSERT_ATTENDANCE: &str = r#"
INSERT INTO attendance (id, member_id, date, present, meeting_type, notes, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
ON CONFLICT (member_id, date) DO UPDATE SET
    present = excluded.present,
    meeting_type = excluded.meeting_type,
    notes = excluded.notes,
    updated_at = excluded.updated_at
"#;

pub const DELETE_ATTENDANCE_FOR_MEMBER: &str = "DELETE FROM attendance WHERE member_id = ?1";

// Program queries

pub const PROGRAM_COLUMNS: &str = "id, title, date, theme, presiding, conducting, chorister, organist, \
     opening_hymn, sacrament_hymn, intermediate_hymn, closing_hymn, \
     opening_prayer, closing_prayer, speakers, announcements, stake_business, \
     ward_business, greeter, include_testimonies, second_hour_type, \
     second_hour_other_text, created_by, created_at, updated_at";

pub const INSERT_PROGRAM: &str = r#"
INSERT INTO programs (id, title, date, theme, presiding, conducting, chorister, organist,
    opening_hymn, sacrament_hymn, intermediate_hymn, closing_hymn,
    opening_prayer, closing_prayer, speakers, announcements, stake_business,
    ward_business, greeter, include_testimonies, second_hour_type,
    second_hour_other_text, created_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)
"#;

pub const UPDATE_PROGRAM: &str = r#"
UPDATE programs
SET title = ?2, date = ?3, theme = ?4, presiding = ?5, conducting = ?6, chorister = ?7,
    organist = ?8, opening_hymn = ?9, sacrament_hymn = ?10, intermediate_hymn = ?11,
    closing_hymn = ?12, opening_prayer = ?13, closing_prayer = ?14, speakers = ?15,
    announcements = ?16, stake_business = ?17, ward_business = ?18, greeter = ?19,
    include_testimonies = ?20, second_hour_type = ?21, second_hour_other_text = ?22,
    updated_at = ?23
WHERE id = ?1
"#;

// User queries

pub const USER_COLUMNS: &str = "id, email, password_hash, role, member_id, created_at, updated_at";

pub const INSERT_USER: &str = r#"
INSERT INTO users (id, email, password_hash, role, member_id, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET email = ?2, password_hash = ?3, role = ?4, member_id = ?5, updated_at = ?6
WHERE id = ?1
"#;
