use fontdb::{Database, Family, ID, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Width of one character when no font face is available, as a fraction of
/// the font size.
const FALLBACK_CHAR_WIDTH: f32 = 0.56;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

/// Font-independent estimate used when fonts are unavailable or disabled.
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().filter(|ch| *ch != '\n').count() as f32 * font_size * FALLBACK_CHAR_WIDTH
}

/// Measured width when a matching system font exists, estimate otherwise.
pub fn text_width(text: &str, font_size: f32, font_family: &str, fast: bool) -> f32 {
    if fast {
        return estimate_text_width(text, font_size);
    }
    measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| estimate_text_width(text, font_size))
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<ID>>,
    advances: HashMap<(ID, char), Option<f32>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
            advances: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_string();
        let face_id = match self.faces.get(&key) {
            Some(id) => *id,
            None => {
                let id = self.query_face(font_family);
                self.faces.insert(key, id);
                id
            }
        }?;

        let mut width = 0.0f32;
        for ch in text.chars().filter(|ch| *ch != '\n') {
            let em = match self.advances.get(&(face_id, ch)) {
                Some(advance) => *advance,
                None => {
                    let advance = self.glyph_advance_em(face_id, ch);
                    self.advances.insert((face_id, ch), advance);
                    advance
                }
            };
            width += em.unwrap_or(FALLBACK_CHAR_WIDTH) * font_size;
        }
        Some(width)
    }

    fn query_face(&mut self, font_family: &str) -> Option<ID> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }
        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" => Family::SansSerif,
                "monospace" | "ui-monospace" => Family::Monospace,
                _ => Family::Name(name),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }
        self.db.query(&Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })
    }

    /// Horizontal advance of `ch` in ems.
    fn glyph_advance_em(&self, id: ID, ch: char) -> Option<f32> {
        self.db
            .with_face_data(id, |data, index| {
                let face = Face::parse(data, index).ok()?;
                let units_per_em = face.units_per_em().max(1) as f32;
                let glyph = face.glyph_index(ch)?;
                let advance = face.glyph_hor_advance(glyph)?;
                Some(advance as f32 / units_per_em)
            })
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_scales_with_length_and_size() {
        assert_eq!(estimate_text_width("", 12.0), 0.0);
        let short = estimate_text_width("_dog_n_1", 12.0);
        let long = estimate_text_width("_chase_v_1", 12.0);
        assert!(long > short);
        assert!((estimate_text_width("ab", 10.0) - 11.2).abs() < 1e-4);
    }

    #[test]
    fn fast_mode_skips_font_lookup() {
        assert_eq!(
            text_width("udef_q", 14.0, "no-such-font", true),
            estimate_text_width("udef_q", 14.0)
        );
    }

    #[test]
    fn measured_width_is_positive() {
        let width = text_width("named(Kim)", 14.0, "sans-serif", false);
        assert!(width > 0.0);
    }
}
