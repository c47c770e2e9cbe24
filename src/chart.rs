//! One chart session: an owned canonical tree, its geometry configuration,
//! and the selection/click surface the surrounding UI talks to. Every draw
//! recomputes layout from scratch; nothing incremental survives a redraw.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::canvas::{Canvas, SvgCanvas};
use crate::config::LayoutConfig;
use crate::ir::CanonicalNode;
use crate::layout::compute_layout;
use crate::normalize::normalize;
use crate::render::Renderer;
use crate::theme::Theme;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("input tree is empty or not an object")]
    EmptyTree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("person {0} not found")]
    NotFound(String),
    #[error("malformed person record: {0}")]
    Malformed(String),
}

/// External person-lookup collaborator. Retrieval is expected to complete
/// before the click callback fires; how records are fetched (database,
/// network, file) is the implementor's business.
pub trait PersonStore {
    fn person(&self, id: &str) -> Result<Value, StoreError>;
    /// Full roster, youngest first.
    fn people(&self) -> Vec<Value>;
}

/// In-memory store over a JSON array of person records, as loaded from a
/// roster file. Stands in for the relational backend in the CLI and in tests.
pub struct JsonPersonStore {
    people: Vec<Value>,
}

impl JsonPersonStore {
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Array(people) => Ok(Self { people }),
            other => Err(StoreError::Malformed(format!(
                "expected an array of people, got {other}"
            ))),
        }
    }
}

impl PersonStore for JsonPersonStore {
    fn person(&self, id: &str) -> Result<Value, StoreError> {
        self.people
            .iter()
            .find(|entry| {
                entry
                    .get("id")
                    .map(|v| match v {
                        Value::String(s) => s == id,
                        Value::Number(n) => n.to_string() == id,
                        _ => false,
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn people(&self) -> Vec<Value> {
        let mut people = self.people.clone();
        // Youngest first; records without a birthdate sort last.
        people.sort_by(|a, b| {
            let a_birth = a.get("birthdate").and_then(Value::as_str);
            let b_birth = b.get("birthdate").and_then(Value::as_str);
            b_birth.cmp(&a_birth)
        });
        people
    }
}

type ClickHandler = Box<dyn FnMut(&Value)>;

/// A live chart over one family tree.
pub struct FamilyChart {
    root: CanonicalNode,
    config: LayoutConfig,
    theme: Theme,
    selected: Option<String>,
    on_node_click: Option<ClickHandler>,
}

impl FamilyChart {
    /// Normalize the input once; both passes reuse the resulting tree for the
    /// session's lifetime.
    pub fn from_value(value: &Value, config: LayoutConfig, theme: Theme) -> Result<Self, ChartError> {
        let root = normalize(value).ok_or(ChartError::EmptyTree)?;
        Ok(Self {
            root,
            config,
            theme,
            selected: None,
            on_node_click: None,
        })
    }

    pub fn root(&self) -> &CanonicalNode {
        &self.root
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Register the callback invoked with a freshly retrieved person record
    /// whenever a box is activated.
    pub fn set_node_click_handler(&mut self, handler: ClickHandler) {
        self.on_node_click = Some(handler);
    }

    /// Mark a person as selected. The next draw renders that box in the
    /// selected style.
    pub fn highlight_node(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Select and redraw in one step, so the highlighted box shows up in the
    /// selected style on the given surface immediately.
    pub fn highlight_and_draw(&mut self, id: impl Into<String>, canvas: &mut dyn Canvas) {
        self.highlight_node(id);
        self.draw_tree(canvas);
    }

    /// Full redraw: clear, solver pass, render pass. Scene fit is the
    /// surface's business (`SvgCanvas::finish`), queried after this returns.
    pub fn draw_tree(&mut self, canvas: &mut dyn Canvas) {
        canvas.clear();
        compute_layout(&mut self.root, 0, 0.0, &self.config);
        let renderer = Renderer::new(&self.config, &self.theme, self.selected.as_deref());
        renderer.render(canvas, &mut self.root, self.config.top_margin);
    }

    /// Convenience: draw into a fresh SVG canvas and fit it to the content.
    pub fn draw_svg(&mut self) -> String {
        let mut canvas = SvgCanvas::new(self.theme.clone(), &self.config);
        self.draw_tree(&mut canvas);
        canvas.finish(&self.config)
    }

    /// A box was activated: fetch the full record, then select and notify.
    /// A failed retrieval is reported and changes nothing; prior selection
    /// and drawing remain valid. Returns whether the activation took effect.
    pub fn activate_node(&mut self, id: &str, store: &dyn PersonStore) -> bool {
        match store.person(id) {
            Ok(record) => {
                self.selected = Some(id.to_string());
                if let Some(handler) = self.on_node_click.as_mut() {
                    handler(&record);
                }
                true
            }
            Err(err) => {
                warn!(%id, %err, "person detail retrieval failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn chart(value: serde_json::Value) -> FamilyChart {
        FamilyChart::from_value(&value, LayoutConfig::default(), Theme::classic()).unwrap()
    }

    fn store() -> JsonPersonStore {
        JsonPersonStore::from_value(json!([
            { "id": 1, "name": "Ada", "birthdate": "1815-12-10" },
            { "id": 2, "name": "Ben", "birthdate": "1890-03-01" },
            { "id": 3, "name": "Cleo" }
        ]))
        .unwrap()
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = FamilyChart::from_value(&Value::Null, LayoutConfig::default(), Theme::classic());
        assert!(matches!(result, Err(ChartError::EmptyTree)));
    }

    #[test]
    fn draw_svg_produces_fitted_document() {
        let mut chart = chart(json!({
            "id": 1,
            "name": "Ada",
            "children": [{ "id": 2, "name": "Ben" }]
        }));
        let svg = chart.draw_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Ada"));
        assert!(svg.contains("Ben"));
        assert!(svg.contains("viewBox="));
    }

    #[test]
    fn redraw_does_not_accumulate_geometry() {
        let mut chart = chart(json!({ "id": 1, "name": "Ada" }));
        let first = chart.draw_svg();
        let second = chart.draw_svg();
        assert_eq!(first, second);
    }

    #[test]
    fn highlight_changes_rendering() {
        let mut chart = chart(json!({ "id": 1, "name": "Ada" }));
        let plain = chart.draw_svg();
        chart.highlight_node("1");
        let highlighted = chart.draw_svg();
        assert_ne!(plain, highlighted);
        assert!(highlighted.contains(&Theme::classic().selected_fill));
    }

    #[test]
    fn highlight_and_draw_selects_and_renders_in_one_step() {
        let mut chart = chart(json!({
            "id": 1,
            "name": "Ada",
            "children": [{ "id": 2, "name": "Ben" }]
        }));
        let config = LayoutConfig::default();
        let mut canvas = SvgCanvas::new(Theme::classic(), &config);
        chart.highlight_and_draw("2", &mut canvas);
        assert_eq!(chart.selected(), Some("2"));
        let svg = canvas.finish(&config);
        let theme = Theme::classic();
        assert_eq!(svg.matches(&format!("fill=\"{}\"", theme.selected_fill)).count(), 1);
    }

    #[test]
    fn activation_selects_and_notifies() {
        let mut chart = chart(json!({ "id": 1, "name": "Ada" }));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        chart.set_node_click_handler(Box::new(move |record| {
            sink.borrow_mut().push(record.clone());
        }));
        assert!(chart.activate_node("2", &store()));
        assert_eq!(chart.selected(), Some("2"));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get("name").and_then(Value::as_str), Some("Ben"));
    }

    #[test]
    fn failed_retrieval_changes_nothing() {
        let mut chart = chart(json!({ "id": 1, "name": "Ada" }));
        chart.highlight_node("1");
        let called = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&called);
        chart.set_node_click_handler(Box::new(move |_| {
            *sink.borrow_mut() += 1;
        }));
        assert!(!chart.activate_node("missing", &store()));
        assert_eq!(chart.selected(), Some("1"));
        assert_eq!(*called.borrow(), 0);
    }

    #[test]
    fn roster_is_youngest_first() {
        let people = store().people();
        let names: Vec<_> = people
            .iter()
            .map(|p| p.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(names, ["Ben", "Ada", "Cleo"]);
    }

    #[test]
    fn store_rejects_non_array_roster() {
        assert!(JsonPersonStore::from_value(json!({ "id": 1 })).is_err());
    }
}
