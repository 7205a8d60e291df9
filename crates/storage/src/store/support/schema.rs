#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

const SCHEMA_VERSION: &str = "1";

const REQUIRED_TABLES: [&str; 5] = ["meta", "users", "roadmaps", "nodes", "proofs"];

/// Refuses to touch a database that was not created by this store.
pub(in crate::store) fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = REQUIRED_TABLES.into_iter().collect();
    if tables
        .iter()
        .any(|table| !required.contains(table.as_str()))
    {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }
    if required.iter().any(|table| !tables.contains(*table)) {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: required table is missing",
        ));
    }

    let version = conn
        .query_row(
            "SELECT value FROM meta WHERE key='schema_version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    match version.as_deref() {
        Some(SCHEMA_VERSION) => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version row is missing",
        )),
    }
}

pub(in crate::store) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
          id TEXT PRIMARY KEY,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS roadmaps (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          user_id TEXT NOT NULL,
          goal TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          FOREIGN KEY(user_id) REFERENCES users(id)
        );

        CREATE TABLE IF NOT EXISTS nodes (
          id TEXT PRIMARY KEY,
          roadmap_id INTEGER NOT NULL,
          title TEXT NOT NULL,
          description TEXT NOT NULL DEFAULT '',
          prerequisites_json TEXT NOT NULL DEFAULT '[]',
          tasks_json TEXT NOT NULL DEFAULT '[]',
          proof_type TEXT NOT NULL,
          position_x REAL NOT NULL DEFAULT 0,
          position_y REAL NOT NULL DEFAULT 0,
          completed_at_ms INTEGER,
          FOREIGN KEY(roadmap_id) REFERENCES roadmaps(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_nodes_roadmap
          ON nodes(roadmap_id, id);

        CREATE TABLE IF NOT EXISTS proofs (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          node_id TEXT NOT NULL,
          proof_type TEXT NOT NULL,
          value TEXT NOT NULL,
          file_path TEXT,
          created_at_ms INTEGER NOT NULL,
          FOREIGN KEY(node_id) REFERENCES nodes(id) ON DELETE CASCADE,
          CHECK(proof_type IN ('photo', 'file', 'link', 'reflection'))
        );

        CREATE INDEX IF NOT EXISTS idx_proofs_node_created
          ON proofs(node_id, created_at_ms, id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;

    Ok(())
}
