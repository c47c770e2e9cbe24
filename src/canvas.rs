//! Minimal drawing surface the layout engine targets. The engine only ever
//! needs rectangles, straight lines, centered labels, and the bounding box of
//! what it drew; anything that can supply those can host a chart.

use crate::config::LayoutConfig;
use crate::text_metrics::measure_label_width;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    fn expand(&mut self, x: f32, y: f32) {
        let max_x = (self.x + self.width).max(x);
        let max_y = (self.y + self.height).max(y);
        self.x = self.x.min(x);
        self.y = self.y.min(y);
        self.width = max_x - self.x;
        self.height = max_y - self.y;
    }
}

/// Draw-call sink for one rendering session. Styling is keyed by a single
/// selected/unselected flag; the concrete surface owns the palette.
pub trait Canvas {
    /// Drop everything drawn so far. A redraw must clear before it draws,
    /// otherwise stale geometry from the previous pass survives.
    fn clear(&mut self);
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, selected: bool);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    /// Label centered on `(x, y)` both horizontally and vertically.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, selected: bool);
    /// Extent of everything drawn since the last clear, `None` when empty.
    fn bounding_box(&self) -> Option<Rect>;
}

/// SVG-emitting canvas. Primitives are accumulated as document fragments and
/// the final document is fitted to the drawn extent.
pub struct SvgCanvas {
    theme: Theme,
    corner_radius: f32,
    body: Vec<String>,
    bbox: Option<Rect>,
}

impl SvgCanvas {
    pub fn new(theme: Theme, config: &LayoutConfig) -> Self {
        Self {
            theme,
            corner_radius: config.corner_radius,
            body: Vec::new(),
            bbox: None,
        }
    }

    fn track(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        match &mut self.bbox {
            Some(rect) => {
                rect.expand(x1, y1);
                rect.expand(x2, y2);
            }
            None => {
                let mut rect = Rect {
                    x: x1,
                    y: y1,
                    width: 0.0,
                    height: 0.0,
                };
                rect.expand(x2, y2);
                self.bbox = Some(rect);
            }
        }
    }

    /// Fit the surface to its content and emit the document: width floored at
    /// `min_canvas_width`, fixed padding split around the drawn extent.
    pub fn finish(&self, config: &LayoutConfig) -> String {
        let bbox = self.bounding_box().unwrap_or(Rect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        });
        let pad = config.fit_padding;
        let width = config.min_canvas_width.max(bbox.width + pad);
        let height = bbox.height + pad;
        let view_x = bbox.x - pad / 2.0;
        let view_y = bbox.y - pad / 2.0;
        let view_w = bbox.width + pad;
        let view_h = bbox.height + pad;

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"{view_x:.2} {view_y:.2} {view_w:.2} {view_h:.2}\">"
        );
        svg.push_str(&format!(
            "<rect x=\"{view_x:.2}\" y=\"{view_y:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            self.theme.background
        ));
        for fragment in &self.body {
            svg.push_str(fragment);
        }
        svg.push_str("</svg>");
        svg
    }
}

impl Canvas for SvgCanvas {
    fn clear(&mut self) {
        self.body.clear();
        self.bbox = None;
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, selected: bool) {
        let (fill, stroke) = if selected {
            (&self.theme.selected_fill, &self.theme.selected_border)
        } else {
            (&self.theme.node_fill, &self.theme.node_border)
        };
        self.body.push(format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"{r:.1}\" ry=\"{r:.1}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"2\"/>",
            r = self.corner_radius
        ));
        self.track(x, y, x + width, y + height);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.body.push(format!(
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            self.theme.line_color, self.theme.line_width
        ));
        self.track(x1, y1, x2, y2);
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, selected: bool) {
        let fill = if selected {
            &self.theme.selected_text
        } else {
            &self.theme.node_text
        };
        self.body.push(format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{fill}\">{}</text>",
            self.theme.font_family,
            self.theme.font_size,
            escape_xml(text)
        ));
        // Labels always sit inside a box that was tracked already, but keep
        // the bbox honest for text drawn on its own.
        let half_width =
            measure_label_width(text, self.theme.font_size, &self.theme.font_family) / 2.0;
        let half_height = self.theme.font_size / 2.0;
        self.track(x - half_width, y - half_height, x + half_width, y + half_height);
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.bbox
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
