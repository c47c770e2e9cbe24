use crate::ir::CanonicalNode;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Flat snapshot of the solved geometry, written as pretty JSON for
/// debugging layout regressions.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: Option<String>,
    pub name: String,
    pub depth: Option<usize>,
    pub subtree_width: Option<f32>,
    pub center_x: Option<f32>,
    pub person_center_x: Option<f32>,
    pub spouses: Vec<Option<String>>,
    pub child_count: usize,
}

impl LayoutDump {
    pub fn from_tree(root: &CanonicalNode) -> Self {
        let mut nodes = Vec::new();
        collect(root, &mut nodes);
        LayoutDump { nodes }
    }
}

fn collect(node: &CanonicalNode, out: &mut Vec<NodeDump>) {
    out.push(NodeDump {
        id: node.person.id.clone(),
        name: node.person.display_name().to_string(),
        depth: node.layout.map(|l| l.depth),
        subtree_width: node.layout.map(|l| l.subtree_width),
        center_x: node.layout.map(|l| l.center_x),
        person_center_x: node.layout.map(|l| l.person_center_x),
        spouses: node.spouses.iter().map(|s| s.id.clone()).collect(),
        child_count: node.children.len(),
    });
    for child in &node.children {
        collect(child, out);
    }
}

pub fn write_layout_dump(path: &Path, root: &CanonicalNode) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_tree(root);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
