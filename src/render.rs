//! Pre-order positioning pass. Consumes the solver's provisional centers,
//! derives final box and connector coordinates, and issues draw calls. The
//! single-child recentering correction mutates the child's solved subtree via
//! the shifter before any of its connectors are drawn.

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::canvas::Canvas;
use crate::config::LayoutConfig;
use crate::ir::{CanonicalNode, Person};
use crate::layout::{couple_total_width, shift_subtree};
use crate::text_metrics::fit_label;
use crate::theme::Theme;

pub struct Renderer<'a> {
    config: &'a LayoutConfig,
    theme: &'a Theme,
    selected: Option<&'a str>,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a LayoutConfig, theme: &'a Theme, selected: Option<&'a str>) -> Self {
        Self {
            config,
            theme,
            selected,
        }
    }

    /// Render one node's row at vertical position `y`, then its children one
    /// row further down. Boxes draw before the connectors that hang off them;
    /// child rows draw after the rail and legs leading to them.
    pub fn render(&self, canvas: &mut dyn Canvas, node: &mut CanonicalNode, y: f32) {
        let Some(layout) = node.layout else {
            warn!(
                id = node.person.id.as_deref().unwrap_or("?"),
                "missing layout during render, skipping subtree"
            );
            return;
        };
        let cfg = self.config;

        let couple_width = couple_total_width(node.spouse_count(), cfg);
        let start_left = layout.center_x - couple_width / 2.0;

        self.draw_person_box(canvas, start_left, y, &node.person);
        let mut current_left = start_left + cfg.node_width + cfg.h_spacing;
        let mut rightmost_spouse_left = None;
        for spouse in &node.spouses {
            self.draw_person_box(canvas, current_left, y, spouse);
            rightmost_spouse_left = Some(current_left);
            current_left += cfg.node_width + cfg.h_spacing;
        }

        // Children's connectors originate below the marriage descent when
        // spouses exist, else below the primary box itself.
        let (connector_x, connector_y) = match rightmost_spouse_left {
            Some(rightmost_left) => {
                let left_inner = start_left + cfg.node_width;
                let marriage_y = y + cfg.node_height / 2.0;
                canvas.draw_line(left_inner, marriage_y, rightmost_left, marriage_y);
                let mid_x = (left_inner + rightmost_left) / 2.0;
                canvas.draw_line(mid_x, marriage_y, mid_x, marriage_y + cfg.descent_length);
                (mid_x, marriage_y + cfg.descent_length)
            }
            None => (layout.person_center_x, y + cfg.node_height),
        };

        if node.children.is_empty() {
            return;
        }

        let child_y = y + cfg.node_height + cfg.v_spacing;
        let rail_y = child_y - cfg.node_height / 2.0;

        // An only child is recentered directly under the connector regardless
        // of its own subtree width.
        if node.children.len() == 1
            && let Some(child_layout) = node.children[0].layout
        {
            let dx = connector_x - child_layout.center_x;
            if dx != 0.0 {
                shift_subtree(&mut node.children[0], dx);
            }
        }

        // Legs attach at each child's own box center, not the subtree
        // aggregate center, so a child with spouses still connects at the
        // child's box.
        let child_centers: Vec<f32> = node
            .children
            .iter()
            .filter_map(|child| child.layout.map(|l| l.person_center_x))
            .collect();
        if child_centers.is_empty() {
            warn!(
                id = node.person.id.as_deref().unwrap_or("?"),
                "no laid-out children to connect"
            );
            return;
        }

        canvas.draw_line(connector_x, connector_y, connector_x, rail_y);

        let rail_left = child_centers.iter().copied().fold(f32::MAX, f32::min);
        let rail_right = child_centers.iter().copied().fold(f32::MIN, f32::max);
        canvas.draw_line(rail_left, rail_y, rail_right, rail_y);

        for child in &mut node.children {
            let Some(child_layout) = child.layout else {
                warn!(
                    id = child.person.id.as_deref().unwrap_or("?"),
                    "missing layout during render, skipping subtree"
                );
                continue;
            };
            let target_x = child_layout.person_center_x;
            canvas.draw_line(connector_x, rail_y, target_x, rail_y);
            canvas.draw_line(target_x, rail_y, target_x, child_y);
            self.render(canvas, child, child_y);
        }
    }

    fn draw_person_box(&self, canvas: &mut dyn Canvas, x: f32, y: f32, person: &Person) {
        if person.id.is_none() {
            warn!(name = person.display_name(), "skipping person with no id");
            return;
        }
        let cfg = self.config;
        let selected = person.is_selected(self.selected);
        canvas.draw_rect(x, y, cfg.node_width, cfg.node_height, selected);
        let label = fit_label(
            person.display_name(),
            cfg.node_width - cfg.label_padding * 2.0,
            self.theme.font_size,
            &self.theme.font_family,
        );
        canvas.draw_text(
            x + cfg.node_width / 2.0,
            y + cfg.node_height / 2.0,
            &label,
            selected,
        );
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &crate::config::RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}
