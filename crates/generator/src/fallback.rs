#![forbid(unsafe_code)]

use rp_core::{ProofType, RawNode};

struct FallbackStep {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    tasks: &'static [&'static str],
    proof_type: ProofType,
}

const FALLBACK_STEPS: [FallbackStep; 4] = [
    FallbackStep {
        id: "n1",
        title: "Fundamentals",
        description: "Build a solid foundation in core concepts.",
        tasks: &["Study basics", "Take notes", "Practice daily", "Review weekly"],
        proof_type: ProofType::Reflection,
    },
    FallbackStep {
        id: "n2",
        title: "Core Skills",
        description: "Develop the main skills required for your goal.",
        tasks: &[
            "Complete project A",
            "Read documentation",
            "Build small project",
            "Get feedback",
        ],
        proof_type: ProofType::Link,
    },
    FallbackStep {
        id: "n3",
        title: "Intermediate",
        description: "Apply skills in real-world scenarios.",
        tasks: &[
            "Build portfolio piece",
            "Document learnings",
            "Share with community",
        ],
        proof_type: ProofType::File,
    },
    FallbackStep {
        id: "n4",
        title: "Advanced",
        description: "Reach the level of your stated goal.",
        tasks: &["Final project", "Write case study", "Present outcomes"],
        proof_type: ProofType::Photo,
    },
];

/// Fixed plan used when no model is configured or the model output is unusable.
/// Each step depends on the previous one.
pub fn fallback_roadmap() -> Vec<RawNode> {
    let mut previous: Option<&str> = None;
    let mut nodes = Vec::with_capacity(FALLBACK_STEPS.len());
    for step in &FALLBACK_STEPS {
        nodes.push(RawNode {
            description: step.description.to_string(),
            prerequisites: previous.map(str::to_string).into_iter().collect(),
            tasks: step.tasks.iter().map(|task| task.to_string()).collect(),
            proof_type: step.proof_type,
            ..RawNode::new(step.id, step.title)
        });
        previous = Some(step.id);
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_a_four_step_chain() {
        let nodes = fallback_roadmap();
        let ids: Vec<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, ["n1", "n2", "n3", "n4"]);
        assert!(nodes[0].prerequisites.is_empty());
        assert_eq!(nodes[1].prerequisites, ["n1"]);
        assert_eq!(nodes[2].prerequisites, ["n2"]);
        assert_eq!(nodes[3].prerequisites, ["n3"]);
        assert_eq!(
            nodes.iter().map(|node| node.proof_type).collect::<Vec<_>>(),
            [
                ProofType::Reflection,
                ProofType::Link,
                ProofType::File,
                ProofType::Photo
            ]
        );
        assert_eq!(nodes[3].title, "Advanced");
        assert_eq!(nodes[0].tasks.len(), 4);
        assert_eq!(nodes[3].tasks.len(), 3);
        assert!(nodes.iter().all(|node| node.position_x.is_none()));
    }
}
