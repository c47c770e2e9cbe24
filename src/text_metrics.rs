//! Person boxes have a fixed width, so labels must be measured and, when a
//! name is too long, ellipsized. Measurement queries the system font stack
//! through fontdb and reads glyph advances with ttf-parser; when no matching
//! face is available a per-character estimate keeps rendering going.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

const ELLIPSIS: char = '\u{2026}';

static MEASURER: Lazy<Mutex<LabelMeasurer>> = Lazy::new(|| Mutex::new(LabelMeasurer::new()));

/// Width of `text` at `font_size`. Infallible: falls back to an average
/// advance estimate when fonts are unavailable (headless CI, stripped
/// containers).
pub fn measure_label_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    if let Ok(mut guard) = MEASURER.lock()
        && let Some(width) = guard.measure(text, font_size, font_family)
    {
        return width;
    }
    estimate_width(text, font_size)
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`. At
/// least one character plus the ellipsis is always kept so a box is never
/// blank.
pub fn fit_label(text: &str, max_width: f32, font_size: f32, font_family: &str) -> String {
    if max_width <= 0.0 || measure_label_width(text, font_size, font_family) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len().saturating_sub(1);
    while keep > 1 {
        let candidate: String = chars[..keep].iter().chain(std::iter::once(&ELLIPSIS)).collect();
        if measure_label_width(&candidate, font_size, font_family) <= max_width {
            return candidate;
        }
        keep -= 1;
    }
    let mut shortest: String = chars[..1].iter().collect();
    shortest.push(ELLIPSIS);
    shortest
}

fn estimate_width(text: &str, font_size: f32) -> f32 {
    let count = text.chars().filter(|ch| *ch != '\n').count() as f32;
    count * font_size * 0.56
}

struct LabelMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FaceMetrics>>,
}

/// Advance table extracted once per family. ASCII covers the overwhelming
/// majority of label text; anything outside it uses the estimate.
struct FaceMetrics {
    units_per_em: f32,
    ascii_advances: [u16; 128],
}

impl LabelMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        if !self.faces.contains_key(font_family) {
            let metrics = self.load_metrics(font_family);
            self.faces.insert(font_family.to_string(), metrics);
        }
        let metrics = self.faces.get(font_family)?.as_ref()?;
        let scale = font_size / metrics.units_per_em;
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                metrics.ascii_advances[ch as usize]
            } else {
                0
            };
            if advance == 0 {
                width += fallback;
            } else {
                width += advance as f32 * scale;
            }
        }
        Some(width)
    }

    fn load_metrics(&mut self, font_family: &str) -> Option<FaceMetrics> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = Vec::with_capacity(names.len() + 1);
        for name in &names {
            match name.to_ascii_lowercase().as_str() {
                "serif" => families.push(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" => families.push(Family::SansSerif),
                "monospace" => families.push(Family::Monospace),
                "cursive" => families.push(Family::Cursive),
                "fantasy" => families.push(Family::Fantasy),
                _ => families.push(Family::Name(name.as_str())),
            }
        }
        families.push(Family::SansSerif);

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut metrics = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                let mut advances = [0u16; 128];
                for byte in 0u8..=127 {
                    if let Some(glyph) = face.glyph_index(byte as char) {
                        advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
                    }
                }
                metrics = Some(FaceMetrics {
                    units_per_em: face.units_per_em().max(1) as f32,
                    ascii_advances: advances,
                });
            }
        });
        metrics
    }
}
