use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub node_fill: String,
    pub node_border: String,
    pub node_text: String,
    pub selected_fill: String,
    pub selected_border: String,
    pub selected_text: String,
    pub line_color: String,
    pub line_width: f32,
    pub background: String,
}

impl Theme {
    /// The palette the chart shipped with: blue boxes, orange selection.
    pub fn classic() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            font_size: 14.0,
            node_fill: "#3498db".to_string(),
            node_border: "#2c3e50".to_string(),
            node_text: "#ffffff".to_string(),
            selected_fill: "#e67e22".to_string(),
            selected_border: "#ca5d0d".to_string(),
            selected_text: "#000000".to_string(),
            line_color: "#34495e".to_string(),
            line_width: 2.0,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            node_fill: "#F8FAFF".to_string(),
            node_border: "#C7D2E5".to_string(),
            node_text: "#1C2430".to_string(),
            selected_fill: "#FFE8D1".to_string(),
            selected_border: "#E8943A".to_string(),
            selected_text: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            line_width: 1.4,
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
