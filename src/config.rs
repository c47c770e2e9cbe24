use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry constants. These affect coordinates only, never tree topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Width of every person box.
    pub node_width: f32,
    /// Height of every person box.
    pub node_height: f32,
    /// Horizontal gap between boxes and between sibling subtrees.
    pub h_spacing: f32,
    /// Vertical gap between a parent row and its children row.
    pub v_spacing: f32,
    /// Length of the short vertical line below a marriage line.
    pub descent_length: f32,
    /// Y coordinate of the root row.
    pub top_margin: f32,
    /// Corner radius of person boxes.
    pub corner_radius: f32,
    /// Padding kept between a label and its box edges when fitting names.
    pub label_padding: f32,
    /// Padding added around the drawn extent when fitting the scene.
    pub fit_padding: f32,
    /// The fitted surface never reports a width below this floor.
    pub min_canvas_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 120.0,
            node_height: 50.0,
            h_spacing: 40.0,
            v_spacing: 80.0,
            descent_length: 12.0,
            top_margin: 20.0,
            corner_radius: 6.0,
            label_padding: 8.0,
            fit_padding: 40.0,
            min_canvas_width: 800.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// On-disk override file: every field optional, layered over defaults.
/// Parsed as JSON5 so hand-edited configs may carry comments.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    node_fill: Option<String>,
    node_border: Option<String>,
    node_text: Option<String>,
    selected_fill: Option<String>,
    selected_border: Option<String>,
    selected_text: Option<String>,
    line_color: Option<String>,
    line_width: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    h_spacing: Option<f32>,
    v_spacing: Option<f32>,
    descent_length: Option<f32>,
    top_margin: Option<f32>,
    corner_radius: Option<f32>,
    label_padding: Option<f32>,
    fit_padding: Option<f32>,
    min_canvas_width: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.node_text {
            config.theme.node_text = v;
        }
        if let Some(v) = vars.selected_fill {
            config.theme.selected_fill = v;
        }
        if let Some(v) = vars.selected_border {
            config.theme.selected_border = v;
        }
        if let Some(v) = vars.selected_text {
            config.theme.selected_text = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.h_spacing {
            config.layout.h_spacing = v;
        }
        if let Some(v) = layout.v_spacing {
            config.layout.v_spacing = v;
        }
        if let Some(v) = layout.descent_length {
            config.layout.descent_length = v;
        }
        if let Some(v) = layout.top_margin {
            config.layout.top_margin = v;
        }
        if let Some(v) = layout.corner_radius {
            config.layout.corner_radius = v;
        }
        if let Some(v) = layout.label_padding {
            config.layout.label_padding = v;
        }
        if let Some(v) = layout.fit_padding {
            config.layout.fit_padding = v;
        }
        if let Some(v) = layout.min_canvas_width {
            config.layout.min_canvas_width = v;
        }
    }

    config.render.background = config.theme.background.clone();
}
