//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `module_states` table (one row per module name)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Module state (absent row = module never synced or enabled)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS module_states (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    version TEXT NOT NULL,
    description TEXT NOT NULL,
    enabled INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'disabled',
    last_enabled_at TEXT NULL, -- RFC3339
    last_disabled_at TEXT NULL, -- RFC3339
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_module_states_enabled ON module_states(enabled);
"#;
