#![forbid(unsafe_code)]

//! Transport-agnostic operations behind the HTTP surface. Every method blocks
//! on SQLite (and, for roadmap creation, on the text model).

use crate::Config;
use rp_core::ProofType;
use rp_core::ids::is_roadmap_node_id;
use rp_generator::{GeminiClient, RoadmapGenerator, TextGeneration};
use rp_storage::{
    AddProofRequest, CreateRoadmapRequest, ProofRow, RoadmapRow, SqliteStore, StoreError,
    UploadDir, safe_basename,
};
use std::sync::{Mutex, MutexGuard};

pub const INVALID_PROOF_TYPE: &str = "Invalid proof_type";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error("storage: {0}")]
    Storage(#[source] StoreError),
    #[error("internal: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownNode => Self::NotFound,
            StoreError::InvalidInput(_) if err.code() == "INVALID_INPUT" => {
                Self::Validation(err.to_string())
            }
            err => Self::Storage(err),
        }
    }
}

/// A client file sent along with a proof.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Proof fields as received; `proof_type` is validated by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProofSubmission {
    pub proof_type: Option<String>,
    pub value: Option<String>,
    pub attachment: Option<Attachment>,
}

#[derive(Debug)]
pub struct RoadmapService {
    store: Mutex<SqliteStore>,
    generator: RoadmapGenerator,
    uploads: UploadDir,
}

impl RoadmapService {
    pub fn new(store: SqliteStore, generator: RoadmapGenerator, uploads: UploadDir) -> Self {
        Self {
            store: Mutex::new(store),
            generator,
            uploads,
        }
    }

    pub fn open(config: &Config) -> Result<Self, ServiceError> {
        let store = SqliteStore::open(&config.storage_dir)?;
        let uploads = UploadDir::open(config.uploads_dir())?;
        let generator = match config.gemini() {
            Some(gemini) => {
                let client = GeminiClient::new(gemini);
                tracing::info!(model = client.model(), "roadmap generation uses gemini");
                RoadmapGenerator::new(Some(Box::new(client) as Box<dyn TextGeneration>))
            }
            None => {
                tracing::info!("no gemini api key, roadmaps use the built-in plan");
                RoadmapGenerator::offline()
            }
        };
        Ok(Self::new(store, generator, uploads))
    }

    pub fn create_roadmap(&self, user_id: &str, goal: &str) -> Result<i64, ServiceError> {
        let nodes = self.generator.generate(goal);
        let roadmap_id = self.lock_store()?.create_roadmap(CreateRoadmapRequest {
            user_id: user_id.to_string(),
            goal: goal.to_string(),
            nodes,
        })?;
        Ok(roadmap_id)
    }

    pub fn get_roadmap(&self, roadmap_id: i64) -> Result<RoadmapRow, ServiceError> {
        self.lock_store()?
            .get_roadmap(roadmap_id)?
            .ok_or(ServiceError::NotFound)
    }

    /// Records a proof. An attachment with a client filename is stored under the
    /// uploads directory; its filename becomes the value when none was given.
    pub fn submit_proof(
        &self,
        roadmap_id: i64,
        node_id: &str,
        submission: ProofSubmission,
    ) -> Result<ProofRow, ServiceError> {
        let proof_type = submission
            .proof_type
            .as_deref()
            .and_then(ProofType::parse)
            .ok_or_else(|| ServiceError::Validation(INVALID_PROOF_TYPE.to_string()))?;
        self.ensure_roadmap_node(roadmap_id, node_id)?;

        let mut value = submission.value.unwrap_or_default();
        let mut file_path = None;
        let attachment = submission.attachment.filter(|attachment| {
            attachment
                .file_name
                .as_deref()
                .is_some_and(|name| !name.is_empty())
        });
        if let Some(attachment) = attachment {
            let stored = self
                .uploads
                .save(node_id, attachment.file_name.as_deref(), &attachment.bytes)?;
            if value.is_empty() {
                value = attachment.file_name.unwrap_or_default();
            }
            file_path = Some(stored);
        }

        let stored = file_path.clone();
        let result = self.lock_store().and_then(|mut store| {
            store
                .add_proof(AddProofRequest {
                    node_id: node_id.to_string(),
                    proof_type,
                    value,
                    file_path,
                })
                .map_err(ServiceError::from)
        });
        if let (Err(_), Some(name)) = (&result, stored.as_deref()) {
            if let Err(err) = self.uploads.remove(name) {
                tracing::warn!(file = name, code = err.code(), error = %err, "orphaned upload left behind");
            }
        }
        result
    }

    /// Proofs of a node under `roadmap_id`, oldest first. A node that does not
    /// exist under that roadmap has no proofs.
    pub fn get_proofs(&self, roadmap_id: i64, node_id: &str) -> Result<Vec<ProofRow>, ServiceError> {
        if !self.is_roadmap_node(roadmap_id, node_id)? {
            return Ok(Vec::new());
        }
        Ok(self.lock_store()?.get_proofs_for_node(node_id)?)
    }

    pub fn get_journey(&self, roadmap_id: i64) -> Result<Vec<ProofRow>, ServiceError> {
        Ok(self.lock_store()?.get_all_proofs_ordered(roadmap_id)?)
    }

    /// Stored attachment bytes by basename; directory components are ignored.
    pub fn upload(&self, name: &str) -> Result<(String, Vec<u8>), ServiceError> {
        let base = safe_basename(name).ok_or(ServiceError::NotFound)?;
        let bytes = self.uploads.read(base)?.ok_or(ServiceError::NotFound)?;
        Ok((base.to_string(), bytes))
    }

    fn ensure_roadmap_node(&self, roadmap_id: i64, node_id: &str) -> Result<(), ServiceError> {
        if self.is_roadmap_node(roadmap_id, node_id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound)
        }
    }

    fn is_roadmap_node(&self, roadmap_id: i64, node_id: &str) -> Result<bool, ServiceError> {
        if !is_roadmap_node_id(roadmap_id, node_id) {
            return Ok(false);
        }
        let owner = self.lock_store()?.node_roadmap_id(node_id)?;
        Ok(owner == Some(roadmap_id))
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, SqliteStore>, ServiceError> {
        self.store
            .lock()
            .map_err(|_| ServiceError::Internal("store lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_generator::GenerateError;
    use tempfile::TempDir;

    struct Canned(&'static str);

    impl TextGeneration for Canned {
        fn generate_text(&self, _prompt: &str) -> Result<String, GenerateError> {
            Ok(self.0.to_string())
        }
    }

    fn service_with(generator: RoadmapGenerator) -> (TempDir, RoadmapService) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        let uploads = UploadDir::open(dir.path().join("uploads")).unwrap();
        (dir, RoadmapService::new(store, generator, uploads))
    }

    fn submission(proof_type: &str, value: &str) -> ProofSubmission {
        ProofSubmission {
            proof_type: Some(proof_type.to_string()),
            value: Some(value.to_string()),
            attachment: None,
        }
    }

    #[test]
    fn offline_roadmap_is_the_fallback_chain() {
        let (_dir, service) = service_with(RoadmapGenerator::offline());
        let id = service.create_roadmap("u1", "Learn X").unwrap();
        let roadmap = service.get_roadmap(id).unwrap();
        assert_eq!(roadmap.nodes.len(), 5);
        let n4 = roadmap.node(&format!("{id}-n4")).unwrap();
        assert_eq!(n4.title, "Advanced");
        assert_eq!(n4.prerequisites, vec![format!("{id}-n3")]);
        let n1 = roadmap.node(&format!("{id}-n1")).unwrap();
        assert_eq!(n1.prerequisites, vec![format!("{id}-start")]);
    }

    #[test]
    fn generated_nodes_are_persisted() {
        let generator = RoadmapGenerator::new(Some(Box::new(Canned(
            r#"[{"id":"a","title":"Scales","proof_type":"photo"},
                {"id":"b","title":"Songs","prerequisites":["a","zzz"]}]"#,
        ))));
        let (_dir, service) = service_with(generator);
        let id = service.create_roadmap("u1", "Play piano").unwrap();
        let roadmap = service.get_roadmap(id).unwrap();
        assert_eq!(roadmap.nodes.len(), 3);
        let b = roadmap.node(&format!("{id}-b")).unwrap();
        assert_eq!(b.prerequisites, vec![format!("{id}-a")]);
    }

    #[test]
    fn invalid_proof_type_is_rejected_before_lookup() {
        let (_dir, service) = service_with(RoadmapGenerator::offline());
        for proof_type in ["", "video", "Photo", "goal"] {
            let err = service
                .submit_proof(1, "1-n1", submission(proof_type, "x"))
                .unwrap_err();
            assert!(
                matches!(&err, ServiceError::Validation(message) if message == INVALID_PROOF_TYPE)
            );
        }
        let missing = ProofSubmission::default();
        assert!(matches!(
            service.submit_proof(1, "1-n1", missing),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn nodes_of_other_roadmaps_are_not_found() {
        let (_dir, service) = service_with(RoadmapGenerator::offline());
        let first = service.create_roadmap("u1", "A").unwrap();
        let second = service.create_roadmap("u1", "B").unwrap();
        let foreign = format!("{first}-n1");
        assert!(matches!(
            service.submit_proof(second, &foreign, submission("photo", "img")),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn proofs_outside_the_roadmap_are_empty() {
        let (_dir, service) = service_with(RoadmapGenerator::offline());
        let first = service.create_roadmap("u1", "A").unwrap();
        let second = service.create_roadmap("u1", "B").unwrap();
        let foreign = format!("{first}-n1");
        service
            .submit_proof(first, &foreign, submission("reflection", "mine"))
            .unwrap();

        assert_eq!(service.get_proofs(first, &foreign).unwrap().len(), 1);
        assert!(service.get_proofs(second, &foreign).unwrap().is_empty());
        assert!(
            service
                .get_proofs(first, &format!("{first}-missing"))
                .unwrap()
                .is_empty()
        );
        assert!(service.get_proofs(999, "999-n1").unwrap().is_empty());
    }

    #[test]
    fn attachment_is_stored_and_names_the_value() {
        let (_dir, service) = service_with(RoadmapGenerator::offline());
        let id = service.create_roadmap("u1", "Learn X").unwrap();
        let node_id = format!("{id}-n4");
        let row = service
            .submit_proof(
                id,
                &node_id,
                ProofSubmission {
                    proof_type: Some("photo".to_string()),
                    value: None,
                    attachment: Some(Attachment {
                        file_name: Some("summit.png".to_string()),
                        bytes: b"png".to_vec(),
                    }),
                },
            )
            .unwrap();
        assert_eq!(row.value, "summit.png");
        let stored = row.file_path.expect("stored file");
        assert!(stored.starts_with(&format!("{node_id}_")));
        assert_eq!(service.upload(&stored).unwrap().1, b"png");
        assert!(service.get_roadmap(id).unwrap().node(&node_id).unwrap().completed());
    }

    #[test]
    fn nameless_attachment_is_ignored() {
        let (_dir, service) = service_with(RoadmapGenerator::offline());
        let id = service.create_roadmap("u1", "Learn X").unwrap();
        let row = service
            .submit_proof(
                id,
                &format!("{id}-n3"),
                ProofSubmission {
                    proof_type: Some("file".to_string()),
                    value: Some("notes".to_string()),
                    attachment: Some(Attachment {
                        file_name: Some(String::new()),
                        bytes: Vec::new(),
                    }),
                },
            )
            .unwrap();
        assert_eq!(row.value, "notes");
        assert_eq!(row.file_path, None);
    }

    #[test]
    fn missing_roadmaps_and_uploads() {
        let (_dir, service) = service_with(RoadmapGenerator::offline());
        assert!(service.get_journey(77).unwrap().is_empty());
        assert!(matches!(service.get_roadmap(77), Err(ServiceError::NotFound)));
        assert!(matches!(service.upload("nope.png"), Err(ServiceError::NotFound)));
        assert!(matches!(service.upload("../"), Err(ServiceError::NotFound)));
    }

    fn raw_connection(dir: &TempDir) -> rusqlite::Connection {
        rusqlite::Connection::open(dir.path().join(rp_storage::DB_FILE_NAME)).unwrap()
    }

    #[test]
    fn failed_proof_insert_removes_the_stored_attachment() {
        let (dir, service) = service_with(RoadmapGenerator::offline());
        let id = service.create_roadmap("u1", "Learn X").unwrap();
        raw_connection(&dir)
            .execute_batch(
                "CREATE TRIGGER reject_proofs BEFORE INSERT ON proofs \
                 BEGIN SELECT RAISE(ABORT, 'proofs are read-only'); END;",
            )
            .unwrap();

        let err = service
            .submit_proof(
                id,
                &format!("{id}-n4"),
                ProofSubmission {
                    proof_type: Some("photo".to_string()),
                    value: None,
                    attachment: Some(Attachment {
                        file_name: Some("summit.png".to_string()),
                        bytes: b"png".to_vec(),
                    }),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));

        let leftovers = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn corrupt_rows_are_storage_failures() {
        let (dir, service) = service_with(RoadmapGenerator::offline());
        let id = service.create_roadmap("u1", "Learn X").unwrap();
        raw_connection(&dir)
            .execute(
                "UPDATE nodes SET proof_type='video' WHERE id=?1",
                [format!("{id}-n2")],
            )
            .unwrap();

        assert!(matches!(
            service.get_roadmap(id),
            Err(ServiceError::Storage(StoreError::CorruptRow(_)))
        ));
        assert!(matches!(
            ServiceError::from(StoreError::InvalidInput("user_id must not be empty")),
            ServiceError::Validation(_)
        ));
    }

    #[test]
    fn blank_user_is_a_validation_error() {
        let (_dir, service) = service_with(RoadmapGenerator::offline());
        assert!(matches!(
            service.create_roadmap(" ", "Goal"),
            Err(ServiceError::Validation(_))
        ));
    }
}
