#![forbid(unsafe_code)]

use super::support::now_ms;
use super::{AddProofRequest, ProofRow, SqliteStore, StoreError};
use rp_core::ProofType;
use rusqlite::{OptionalExtension, Row, Transaction, params};

impl SqliteStore {
    /// Appends a proof and re-evaluates completion of the owning node: while the
    /// node has at least one photo proof, `completed_at_ms` is (re)stamped with now.
    pub fn add_proof(&mut self, request: AddProofRequest) -> Result<ProofRow, StoreError> {
        let file_path = request
            .file_path
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty());

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        if !node_exists_tx(&tx, &request.node_id)? {
            return Err(StoreError::UnknownNode);
        }

        tx.execute(
            "INSERT INTO proofs(node_id, proof_type, value, file_path, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                request.node_id,
                request.proof_type.as_str(),
                request.value,
                file_path,
                now_ms,
            ],
        )?;
        let proof_id = tx.last_insert_rowid();

        let completed = node_has_photo_proof_tx(&tx, &request.node_id)?;
        if completed {
            tx.execute(
                "UPDATE nodes SET completed_at_ms=?2 WHERE id=?1",
                params![request.node_id, now_ms],
            )?;
        }

        tx.commit()?;

        if completed {
            tracing::info!(node_id = %request.node_id, proof_id, "node completed by photo proof");
        } else {
            tracing::debug!(
                node_id = %request.node_id,
                proof_id,
                proof_type = request.proof_type.as_str(),
                "proof recorded"
            );
        }

        Ok(ProofRow {
            id: proof_id,
            node_id: request.node_id,
            proof_type: request.proof_type,
            value: request.value,
            file_path,
            created_at_ms: now_ms,
        })
    }

    /// Proofs of one node, oldest first.
    pub fn get_proofs_for_node(&self, node_id: &str) -> Result<Vec<ProofRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, node_id, proof_type, value, file_path, created_at_ms \
             FROM proofs \
             WHERE node_id=?1 \
             ORDER BY created_at_ms ASC, id ASC",
        )?;

        let mut rows = stmt.query(params![node_id])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(proof_from_row(row)?);
        }
        Ok(out)
    }

    /// Journey playback: nodes in roadmap order, each node's proofs oldest first.
    /// An unknown roadmap has an empty journey.
    pub fn get_all_proofs_ordered(&self, roadmap_id: i64) -> Result<Vec<ProofRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.node_id, p.proof_type, p.value, p.file_path, p.created_at_ms \
             FROM proofs p \
             JOIN nodes n ON n.id = p.node_id \
             WHERE n.roadmap_id=?1 \
             ORDER BY n.id ASC, p.created_at_ms ASC, p.id ASC",
        )?;

        let mut rows = stmt.query(params![roadmap_id])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(proof_from_row(row)?);
        }
        Ok(out)
    }
}

fn proof_from_row(row: &Row<'_>) -> Result<ProofRow, StoreError> {
    let proof_type = row.get::<_, String>(2)?;
    Ok(ProofRow {
        id: row.get(0)?,
        node_id: row.get(1)?,
        proof_type: ProofType::parse(&proof_type)
            .ok_or(StoreError::CorruptRow("invalid proof_type row"))?,
        value: row.get(3)?,
        file_path: row
            .get::<_, Option<String>>(4)?
            .filter(|path| !path.is_empty()),
        created_at_ms: row.get(5)?,
    })
}

fn node_exists_tx(tx: &Transaction<'_>, node_id: &str) -> Result<bool, StoreError> {
    Ok(tx
        .query_row(
            "SELECT 1 FROM nodes WHERE id=?1",
            params![node_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}

fn node_has_photo_proof_tx(tx: &Transaction<'_>, node_id: &str) -> Result<bool, StoreError> {
    Ok(tx
        .query_row(
            "SELECT 1 FROM proofs WHERE node_id=?1 AND proof_type=?2 LIMIT 1",
            params![node_id, ProofType::Photo.as_str()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}
