use std::collections::BTreeMap;

/// One person as supplied by the backing store. The engine only ever looks at
/// `id` (equality, selection highlighting) and `name` (box label); everything
/// else rides along untouched for the detail panel.
#[derive(Debug, Clone, Default)]
pub struct Person {
    pub id: Option<String>,
    pub name: Option<String>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Person {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    pub fn is_selected(&self, selected: Option<&str>) -> bool {
        match (&self.id, selected) {
            (Some(id), Some(sel)) => id.as_str() == sel,
            _ => false,
        }
    }
}

/// Geometry computed for one node by the layout pass. Horizontal values are
/// absolute chart coordinates; vertical placement is derived from row depth
/// at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLayout {
    pub depth: usize,
    pub subtree_width: f32,
    /// Center of the whole subtree footprint.
    pub center_x: f32,
    /// Center of the primary person's own box, which differs from `center_x`
    /// when spouses widen the couple block.
    pub person_center_x: f32,
}

/// The engine's canonical working unit. Input shapes (wrapper records or bare
/// person objects) are adapted into this form exactly once per session; both
/// the layout and render passes walk the same owned tree.
#[derive(Debug, Clone)]
pub struct CanonicalNode {
    pub person: Person,
    /// Display-only: spouses carry no children of their own in this model.
    pub spouses: Vec<Person>,
    /// Order is rendering-significant (left-to-right).
    pub children: Vec<CanonicalNode>,
    /// `None` until `compute_layout` has run; recomputed from scratch on
    /// every draw.
    pub layout: Option<NodeLayout>,
}

impl CanonicalNode {
    pub fn new(person: Person) -> Self {
        Self {
            person,
            spouses: Vec::new(),
            children: Vec::new(),
            layout: None,
        }
    }

    pub fn spouse_count(&self) -> usize {
        self.spouses.len()
    }
}
