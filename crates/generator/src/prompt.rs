#![forbid(unsafe_code)]

/// Instruction sent to the text model for one goal.
pub fn roadmap_prompt(goal: &str) -> String {
    format!(
        r#"You are a learning-path expert. Given this long-term goal: "{goal}"

Create a dependency-based learning roadmap. Return ONLY a valid JSON array of nodes. No markdown, no explanation.

Each node must have:
- "id": string, unique (e.g. "n1", "n2", "n3")
- "title": string, short skill/milestone name
- "description": string, 1-2 sentences
- "prerequisites": array of node ids that must be completed first (empty [] for foundational nodes)
- "tasks": array of 3 to 5 concrete actions (strings)
- "proof_type": one of "photo", "file", "link", "reflection"

Rules:
- Progress from fundamentals to intermediate to advanced.
- Foundational nodes have prerequisites: []
- Later nodes list earlier node ids in prerequisites.
- Typically 6 to 12 nodes total.
- proof_type should vary (e.g. first: reflection, then link, then file/photo where it makes sense).

Example shape:
[
  {{"id": "n1", "title": "Basics", "description": "...", "prerequisites": [], "tasks": ["...", "..."], "proof_type": "reflection"}},
  {{"id": "n2", "title": "Next", "description": "...", "prerequisites": ["n1"], "tasks": ["..."], "proof_type": "link"}}
]
"#
    )
}
