pub mod canvas;
pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod normalize;
pub mod render;
pub mod text_metrics;
pub mod theme;

pub use canvas::{Canvas, Rect, SvgCanvas};
pub use chart::{ChartError, FamilyChart, JsonPersonStore, PersonStore, StoreError};
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{CanonicalNode, NodeLayout, Person};
pub use layout::{compute_layout, couple_total_width, shift_subtree};
pub use normalize::normalize;
pub use render::Renderer;
pub use theme::Theme;

#[cfg(feature = "cli")]
pub use cli::run;
