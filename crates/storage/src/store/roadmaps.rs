#![forbid(unsafe_code)]

use super::support::{decode_string_list, encode_string_list, now_ms};
use super::{CreateRoadmapRequest, NodeRow, RoadmapRow, SqliteStore, StoreError};
use rp_core::{NodeDraft, NodeProofType, assemble_nodes};
use rusqlite::{Connection, OptionalExtension, Transaction, params};

impl SqliteStore {
    /// Persists a roadmap, its synthesized start node and every generated node
    /// in one transaction. Returns the new roadmap id.
    pub fn create_roadmap(&mut self, request: CreateRoadmapRequest) -> Result<i64, StoreError> {
        let user_id = request.user_id.trim();
        if user_id.is_empty() {
            return Err(StoreError::InvalidInput("user_id must not be empty"));
        }

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        ensure_user_tx(&tx, user_id, now_ms)?;

        tx.execute(
            "INSERT INTO roadmaps(user_id, goal, created_at_ms) VALUES (?1, ?2, ?3)",
            params![user_id, request.goal, now_ms],
        )?;
        let roadmap_id = tx.last_insert_rowid();

        let assembly = assemble_nodes(roadmap_id, &request.goal, &request.nodes)?;
        for dropped in &assembly.dropped {
            tracing::warn!(
                roadmap_id,
                node_id = %dropped.node_id,
                prerequisite = %dropped.prerequisite,
                "dropping prerequisite that names no node of the roadmap"
            );
        }
        for node in &assembly.nodes {
            insert_node_tx(&tx, roadmap_id, node, now_ms)?;
        }

        tx.commit()?;
        tracing::info!(
            roadmap_id,
            user_id,
            nodes = assembly.nodes.len(),
            "roadmap created"
        );
        Ok(roadmap_id)
    }

    pub fn get_roadmap(&self, roadmap_id: i64) -> Result<Option<RoadmapRow>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, goal, created_at_ms FROM roadmaps WHERE id=?1",
                params![roadmap_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, user_id, goal, created_at_ms)) = row else {
            return Ok(None);
        };

        Ok(Some(RoadmapRow {
            id,
            user_id,
            goal,
            created_at_ms,
            nodes: list_nodes(&self.conn, id)?,
        }))
    }

    pub fn roadmap_exists(&self, roadmap_id: i64) -> Result<bool, StoreError> {
        roadmap_exists(&self.conn, roadmap_id)
    }

    /// Owning roadmap of a node, `None` for unknown ids.
    pub fn node_roadmap_id(&self, node_id: &str) -> Result<Option<i64>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT roadmap_id FROM nodes WHERE id=?1",
                params![node_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?)
    }
}

fn ensure_user_tx(tx: &Transaction<'_>, user_id: &str, now_ms: i64) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR IGNORE INTO users(id, created_at_ms) VALUES (?1, ?2)",
        params![user_id, now_ms],
    )?;
    Ok(())
}

fn insert_node_tx(
    tx: &Transaction<'_>,
    roadmap_id: i64,
    node: &NodeDraft,
    now_ms: i64,
) -> Result<(), StoreError> {
    let completed_at_ms = node.completed.then_some(now_ms);
    tx.execute(
        "INSERT INTO nodes(id, roadmap_id, title, description, prerequisites_json, tasks_json, \
                           proof_type, position_x, position_y, completed_at_ms) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            node.id,
            roadmap_id,
            node.title,
            node.description,
            encode_string_list(&node.prerequisites)?,
            encode_string_list(&node.tasks)?,
            node.proof_type.as_str(),
            node.position_x,
            node.position_y,
            completed_at_ms,
        ],
    )?;
    Ok(())
}

pub(super) fn roadmap_exists(conn: &Connection, roadmap_id: i64) -> Result<bool, StoreError> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM roadmaps WHERE id=?1",
            params![roadmap_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}

/// Nodes of a roadmap ordered by id. The order is lexicographic on the
/// namespaced id, so `n10` sorts before `n2`.
pub(super) fn list_nodes(conn: &Connection, roadmap_id: i64) -> Result<Vec<NodeRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, roadmap_id, title, description, prerequisites_json, tasks_json, \
                proof_type, position_x, position_y, completed_at_ms \
         FROM nodes \
         WHERE roadmap_id=?1 \
         ORDER BY id ASC",
    )?;

    let mut rows = stmt.query(params![roadmap_id])?;
    let mut out = Vec::new();

    while let Some(row) = rows.next()? {
        let proof_type = row.get::<_, String>(6)?;
        out.push(NodeRow {
            id: row.get(0)?,
            roadmap_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            prerequisites: decode_string_list(&row.get::<_, String>(4)?)?,
            tasks: decode_string_list(&row.get::<_, String>(5)?)?,
            proof_type: NodeProofType::parse(&proof_type)
                .ok_or(StoreError::CorruptRow("invalid node proof_type row"))?,
            position_x: row.get(7)?,
            position_y: row.get(8)?,
            completed_at_ms: row.get(9)?,
        });
    }

    Ok(out)
}
