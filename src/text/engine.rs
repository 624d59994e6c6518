use std::{borrow::Cow, sync::Arc};

use crate::{
    config::FontPaths,
    foundation::{
        core::Rgba8,
        error::{WisdomError, WisdomResult},
    },
    text::wrap::{FontRole, FontSpec, TextMeasure},
};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Raw font bytes for the three text roles.
#[derive(Clone, Debug)]
pub struct FontBook {
    primary: Arc<Vec<u8>>,
    secondary: Arc<Vec<u8>>,
    ui: Arc<Vec<u8>>,
}

impl FontBook {
    pub fn from_bytes(primary: Vec<u8>, secondary: Vec<u8>, ui: Vec<u8>) -> Self {
        Self {
            primary: Arc::new(primary),
            secondary: Arc::new(secondary),
            ui: Arc::new(ui),
        }
    }

    pub fn load(paths: &FontPaths) -> WisdomResult<Self> {
        let read = |role: &str, path: &std::path::Path| -> WisdomResult<Vec<u8>> {
            std::fs::read(path).map_err(|e| {
                WisdomError::config(format!(
                    "read {role} font '{}': {e}",
                    path.display()
                ))
            })
        };
        Ok(Self::from_bytes(
            read("primary", &paths.primary)?,
            read("secondary", &paths.secondary)?,
            read("ui", &paths.ui)?,
        ))
    }

    pub fn bytes(&self, role: FontRole) -> &Arc<Vec<u8>> {
        match role {
            FontRole::Primary => &self.primary,
            FontRole::Secondary => &self.secondary,
            FontRole::Ui => &self.ui,
        }
    }
}

struct RoleFont {
    family: String,
    family_id: parley::fontique::FamilyId,
}

/// Parley shaping over the three role fonts.
///
/// The quote faces back each other up for Arabic-script text and the UI face backs them up for
/// Latin, so a citation in either script shapes with real glyphs. Runs carry the face parley
/// picked; draw with `run.font()`, never with the role's face.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    fonts: [RoleFont; 3],
}

impl TextEngine {
    pub fn new(book: &FontBook) -> WisdomResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let mut register = |role: FontRole| -> WisdomResult<RoleFont> {
            let bytes = book.bytes(role).as_ref().clone();
            let families = font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes), None);
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                WisdomError::config(format!("no font families in {role:?} font bytes"))
            })?;
            let family = font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| WisdomError::config(format!("{role:?} font family has no name")))?
                .to_string();
            Ok(RoleFont { family, family_id })
        };

        let fonts = [
            register(FontRole::Primary)?,
            register(FontRole::Secondary)?,
            register(FontRole::Ui)?,
        ];

        let [primary, secondary, ui] = [&fonts[0], &fonts[1], &fonts[2]].map(|f| f.family_id);
        let fallbacks: [(&str, [parley::fontique::FamilyId; 3]); 2] = [
            ("Arab", [primary, secondary, ui]),
            ("Latn", [ui, primary, secondary]),
        ];
        for (script, order) in fallbacks {
            let mut ids: Vec<_> = Vec::with_capacity(3);
            for id in order {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            font_ctx.collection.append_fallbacks(
                parley::fontique::Script::from(script),
                ids.into_iter(),
            );
        }

        tracing::debug!(
            primary = %fonts[0].family,
            secondary = %fonts[1].family,
            ui = %fonts[2].family,
            "text engine ready"
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            fonts,
        })
    }

    fn role_font(&self, role: FontRole) -> &RoleFont {
        match role {
            FontRole::Primary => &self.fonts[0],
            FontRole::Secondary => &self.fonts[1],
            FontRole::Ui => &self.fonts[2],
        }
    }

    /// Shape `text` as a single unwrapped line.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &FontSpec,
        brush: TextBrush,
    ) -> WisdomResult<parley::Layout<TextBrush>> {
        if !font.size_px.is_finite() || font.size_px <= 0.0 {
            return Err(WisdomError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family = self.role_font(font.role).family.clone();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if font.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasure for TextEngine {
    fn measure_width(&mut self, text: &str, font: &FontSpec) -> f32 {
        match self.layout_line(text, font, TextBrush::default()) {
            Ok(layout) => layout.width(),
            Err(e) => {
                tracing::debug!(error = %e, "measure failed; treating line as empty");
                0.0
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
