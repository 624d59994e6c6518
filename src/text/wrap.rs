/// Which face a run of text is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Original-script face (Arabic naskh).
    Primary,
    /// Translation face (Urdu nastaliq).
    Secondary,
    /// Latin labels: citation and brand badges.
    Ui,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub role: FontRole,
    pub size_px: f32,
    pub bold: bool,
}

impl FontSpec {
    pub fn new(role: FontRole, size_px: f32) -> Self {
        Self {
            role,
            size_px,
            bold: false,
        }
    }

    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
}

/// Width of a single shaped line. Implemented by the real text engine and by test doubles.
pub trait TextMeasure {
    fn measure_width(&mut self, text: &str, font: &FontSpec) -> f32;
}

/// Greedy word wrap against a pixel budget.
///
/// Words are whitespace-separated. A word joins the current line while the joined line measures
/// strictly less than `max_width_px`; otherwise it starts a new line. A single word wider than the
/// budget occupies a line of its own. Empty or whitespace-only text yields no lines.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    font: &FontSpec,
    max_width_px: f32,
    measure: &mut M,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return lines;
    };

    let mut current = first.to_string();
    for word in words {
        let candidate = format!("{current} {word}");
        if measure.measure_width(&candidate, font) < max_width_px {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
