#![forbid(unsafe_code)]

use rp_core::{ProofType, RawNode};
use rp_storage::{AddProofRequest, CreateRoadmapRequest, SqliteStore, StoreError};
use tempfile::TempDir;

fn store_with_roadmap() -> (TempDir, SqliteStore, i64) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    let id = store
        .create_roadmap(CreateRoadmapRequest {
            user_id: "u1".to_string(),
            goal: "Learn X".to_string(),
            nodes: vec![
                RawNode {
                    tasks: vec!["t".to_string()],
                    ..RawNode::new("n1", "A")
                },
                RawNode {
                    prerequisites: vec!["n1".to_string()],
                    proof_type: ProofType::Photo,
                    ..RawNode::new("n2", "B")
                },
            ],
        })
        .expect("create roadmap");
    (dir, store, id)
}

fn proof(node_id: &str, proof_type: ProofType, value: &str) -> AddProofRequest {
    AddProofRequest {
        node_id: node_id.to_string(),
        proof_type,
        value: value.to_string(),
        file_path: None,
    }
}

fn completed(store: &SqliteStore, roadmap_id: i64, node_id: &str) -> bool {
    store
        .get_roadmap(roadmap_id)
        .unwrap()
        .unwrap()
        .node(node_id)
        .expect("node exists")
        .completed()
}

#[test]
fn photo_proof_completes_node() {
    let (_dir, mut store, id) = store_with_roadmap();
    let n2 = format!("{id}-n2");
    assert!(!completed(&store, id, &n2));

    let row = store
        .add_proof(AddProofRequest {
            file_path: Some("abc.jpg".to_string()),
            ..proof(&n2, ProofType::Photo, "img")
        })
        .expect("add photo proof");
    assert_eq!(row.node_id, n2);
    assert_eq!(row.file_path.as_deref(), Some("abc.jpg"));

    assert!(completed(&store, id, &n2));
    let proofs = store.get_proofs_for_node(&n2).unwrap();
    assert_eq!(proofs.len(), 1);
    assert_eq!(proofs[0].proof_type, ProofType::Photo);
    assert_eq!(proofs[0].value, "img");
    assert_eq!(proofs[0].file_path.as_deref(), Some("abc.jpg"));
}

#[test]
fn non_photo_proofs_never_complete() {
    let (_dir, mut store, id) = store_with_roadmap();
    let n1 = format!("{id}-n1");
    for proof_type in [ProofType::Reflection, ProofType::Link, ProofType::File] {
        store.add_proof(proof(&n1, proof_type, "evidence")).unwrap();
    }
    assert!(!completed(&store, id, &n1));
    assert_eq!(store.get_proofs_for_node(&n1).unwrap().len(), 3);
}

#[test]
fn completion_is_sticky_and_repeat_photos_are_harmless() {
    let (_dir, mut store, id) = store_with_roadmap();
    let n1 = format!("{id}-n1");

    store.add_proof(proof(&n1, ProofType::Photo, "img")).unwrap();
    let first = store.get_roadmap(id).unwrap().unwrap();
    let first_stamp = first.node(&n1).unwrap().completed_at_ms.unwrap();

    store.add_proof(proof(&n1, ProofType::Photo, "img")).unwrap();
    store
        .add_proof(proof(&n1, ProofType::Reflection, "later thoughts"))
        .unwrap();

    let after = store.get_roadmap(id).unwrap().unwrap();
    let node = after.node(&n1).unwrap();
    assert!(node.completed());
    assert!(node.completed_at_ms.unwrap() >= first_stamp);
    assert_eq!(store.get_proofs_for_node(&n1).unwrap().len(), 3);
}

#[test]
fn completion_is_scoped_to_the_proof_node() {
    let (_dir, mut store, id) = store_with_roadmap();
    store
        .add_proof(proof(&format!("{id}-n2"), ProofType::Photo, "img"))
        .unwrap();
    assert!(!completed(&store, id, &format!("{id}-n1")));
}

#[test]
fn proofs_for_node_are_oldest_first() {
    let (_dir, mut store, id) = store_with_roadmap();
    let n1 = format!("{id}-n1");
    for value in ["first", "second", "third"] {
        store
            .add_proof(proof(&n1, ProofType::Reflection, value))
            .unwrap();
    }
    let values: Vec<String> = store
        .get_proofs_for_node(&n1)
        .unwrap()
        .into_iter()
        .map(|proof| proof.value)
        .collect();
    assert_eq!(values, vec!["first", "second", "third"]);
}

#[test]
fn proof_for_unknown_node_is_rejected() {
    let (_dir, mut store, _id) = store_with_roadmap();
    let err = store
        .add_proof(proof("999-n1", ProofType::Photo, "img"))
        .expect_err("unknown node");
    assert!(matches!(err, StoreError::UnknownNode));
    assert!(err.is_not_found());
    assert!(store.get_proofs_for_node("999-n1").unwrap().is_empty());
}

#[test]
fn blank_file_path_is_stored_as_none() {
    let (_dir, mut store, id) = store_with_roadmap();
    let row = store
        .add_proof(AddProofRequest {
            file_path: Some("  ".to_string()),
            ..proof(&format!("{id}-n1"), ProofType::Link, "https://example.com")
        })
        .unwrap();
    assert_eq!(row.file_path, None);
}

#[test]
fn journey_follows_node_order_then_creation_order() {
    let (_dir, mut store, id) = store_with_roadmap();
    let n1 = format!("{id}-n1");
    let n2 = format!("{id}-n2");

    store.add_proof(proof(&n2, ProofType::Photo, "n2-a")).unwrap();
    store
        .add_proof(proof(&n1, ProofType::Reflection, "n1-a"))
        .unwrap();
    store.add_proof(proof(&n2, ProofType::Link, "n2-b")).unwrap();
    store.add_proof(proof(&n1, ProofType::File, "n1-b")).unwrap();

    let journey: Vec<(String, String)> = store
        .get_all_proofs_ordered(id)
        .unwrap()
        .into_iter()
        .map(|proof| (proof.node_id, proof.value))
        .collect();
    assert_eq!(
        journey,
        vec![
            (n1.clone(), "n1-a".to_string()),
            (n1, "n1-b".to_string()),
            (n2.clone(), "n2-a".to_string()),
            (n2, "n2-b".to_string()),
        ]
    );
}

#[test]
fn journey_of_unknown_roadmap_is_empty() {
    let (_dir, mut store, id) = store_with_roadmap();
    store
        .add_proof(proof(&format!("{id}-n1"), ProofType::Reflection, "mine"))
        .unwrap();
    assert_eq!(store.get_all_proofs_ordered(id).unwrap().len(), 1);
    assert!(store.get_all_proofs_ordered(id + 100).unwrap().is_empty());
}
