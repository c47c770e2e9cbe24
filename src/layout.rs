//! Two-pass descent-chart layout: a bottom-up solver that reserves a
//! horizontal footprint for every subtree, and a shifter that translates an
//! already-solved subtree when the render pass recenters a single child.

use tracing::warn;

use crate::config::LayoutConfig;
use crate::ir::{CanonicalNode, NodeLayout};

/// Width of the couple block: primary box plus spouse boxes laid side by side
/// with fixed spacing.
pub fn couple_total_width(spouse_count: usize, config: &LayoutConfig) -> f32 {
    let boxes = (1 + spouse_count) as f32;
    config.node_width * boxes + config.h_spacing * spouse_count as f32
}

/// Post-order pass. Children are placed left-to-right at cumulative offsets,
/// then the node claims the wider of its couple block and its children's
/// combined span. Returns the subtree width so the caller can advance its
/// running offset.
///
/// Pure in shape and constants: solving the same tree twice from the same
/// offset produces identical geometry.
pub fn compute_layout(
    node: &mut CanonicalNode,
    depth: usize,
    x_offset: f32,
    config: &LayoutConfig,
) -> f32 {
    let mut children_widths = 0.0;
    if !node.children.is_empty() {
        for child in &mut node.children {
            let width = compute_layout(child, depth + 1, x_offset + children_widths, config);
            children_widths += width + config.h_spacing;
        }
        children_widths -= config.h_spacing;
    }

    let couple_width = couple_total_width(node.spouse_count(), config);
    let subtree_width = couple_width.max(children_widths);
    let center_x = x_offset + subtree_width / 2.0;

    node.layout = Some(NodeLayout {
        depth,
        subtree_width,
        center_x,
        // The couple block is centered on center_x; the primary person owns
        // the leftmost box inside it.
        person_center_x: center_x - couple_width / 2.0 + config.node_width / 2.0,
    });

    subtree_width
}

/// Translate a solved subtree horizontally, preserving all internal relative
/// geometry. Spouse boxes need no update here: their coordinates are derived
/// from `person_center_x` at render time, never stored.
///
/// Only meaningful after `compute_layout` has visited the subtree; an
/// unsolved node is reported and skipped rather than invented.
pub fn shift_subtree(node: &mut CanonicalNode, dx: f32) {
    match &mut node.layout {
        Some(layout) => {
            layout.center_x += dx;
            layout.person_center_x += dx;
        }
        None => {
            warn!(
                id = node.person.id.as_deref().unwrap_or("?"),
                "shift requested before layout was computed"
            );
        }
    }
    for child in &mut node.children {
        shift_subtree(child, dx);
    }
}
