//! Per-frame drawing of the export canvas: background, dim layer, bilingual text, badges.
//!
//! Layout is a pure function over [`TextMeasure`] so it can be checked without fonts. The text and
//! badge overlay depends only on the quote and the `include_arabic` switch, so it is rasterized once
//! and reused; only the background is redrawn per frame.

use kurbo::Shape;

use crate::{
    foundation::{
        core::{Affine, Canvas, Rect, Rgba8},
        error::{WisdomError, WisdomResult},
    },
    model::{Quote, RenderSettings},
    render::{
        Surface,
        background::{self, BackgroundFrame},
        blur, composite, rasterize,
    },
    text::{FontRole, FontSpec, TextBrush, TextEngine, TextMeasure, wrap_text},
};

pub const SIDE_PADDING: f64 = 100.0;
pub const HEADER_RESERVE: f64 = 300.0;
pub const FOOTER_RESERVE: f64 = 400.0;
pub const BLOCK_SPACING: f64 = 120.0;
/// Above this many characters (both scripts together) the small tier is used.
pub const LARGE_TIER_MAX_CHARS: usize = 600;

pub const PRIMARY_LINE_HEIGHT: f64 = 1.6;
pub const SECONDARY_LINE_HEIGHT: f64 = 2.4;

pub const PRIMARY_COLOR: Rgba8 = Rgba8::rgb(0xfe, 0xf3, 0xc7);
pub const SECONDARY_COLOR: Rgba8 = Rgba8::WHITE;
pub const AMBER: Rgba8 = Rgba8::rgb(0xfb, 0xbf, 0x24);

const TEXT_SHADOW_BLUR: f32 = 15.0;
const CITATION_SHADOW_BLUR: f32 = 5.0;
const BRAND_LABEL: &str = "ALI WISDOM";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontTier {
    Large,
    Small,
}

impl FontTier {
    pub fn for_quote(quote: &Quote) -> Self {
        if quote.combined_char_count() > LARGE_TIER_MAX_CHARS {
            Self::Small
        } else {
            Self::Large
        }
    }

    pub fn primary_size(self) -> f32 {
        match self {
            Self::Large => 68.0,
            Self::Small => 48.0,
        }
    }

    pub fn secondary_size(self) -> f32 {
        match self {
            Self::Large => 64.0,
            Self::Small => 44.0,
        }
    }
}

/// Wrapped lines of one script, positioned vertically.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font: FontSpec,
    pub line_height: f64,
    pub top: f64,
    pub color: Rgba8,
}

impl TextBlock {
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height
    }

    /// Vertical center of each line.
    pub fn line_centers(&self) -> impl Iterator<Item = (f64, &str)> + '_ {
        self.lines.iter().enumerate().map(|(i, line)| {
            (
                self.top + i as f64 * self.line_height + self.line_height / 2.0,
                line.as_str(),
            )
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuoteLayout {
    pub tier: FontTier,
    /// Absent when the original script is switched off or empty.
    pub primary: Option<TextBlock>,
    pub secondary: TextBlock,
    pub content_height: f64,
    pub citation: String,
}

/// Place both scripts between the header and footer reserves.
///
/// Primary text is never measured when `include_primary` is false.
pub fn layout_quote<M: TextMeasure + ?Sized>(
    quote: &Quote,
    include_primary: bool,
    canvas: Canvas,
    measure: &mut M,
) -> QuoteLayout {
    let tier = FontTier::for_quote(quote);
    let max_width = (f64::from(canvas.width) - SIDE_PADDING * 2.0) as f32;

    let primary_font = FontSpec::new(FontRole::Primary, tier.primary_size()).bold();
    let secondary_font = FontSpec::new(FontRole::Secondary, tier.secondary_size());

    let primary_lines = if include_primary && !quote.arabic.trim().is_empty() {
        wrap_text(&quote.arabic, &primary_font, max_width, measure)
    } else {
        Vec::new()
    };
    let secondary_lines = wrap_text(&quote.urdu, &secondary_font, max_width, measure);

    let primary_lh = f64::from(primary_font.size_px) * PRIMARY_LINE_HEIGHT;
    let secondary_lh = f64::from(secondary_font.size_px) * SECONDARY_LINE_HEIGHT;

    let primary_height = primary_lines.len() as f64 * primary_lh;
    let spacing = if primary_height > 0.0 {
        BLOCK_SPACING
    } else {
        0.0
    };
    let content_height = primary_height + spacing + secondary_lines.len() as f64 * secondary_lh;

    let available = f64::from(canvas.height) - HEADER_RESERVE - FOOTER_RESERVE;
    let top = HEADER_RESERVE + (available - content_height) / 2.0;

    let primary = (!primary_lines.is_empty()).then(|| TextBlock {
        lines: primary_lines,
        font: primary_font,
        line_height: primary_lh,
        top,
        color: PRIMARY_COLOR,
    });
    let secondary = TextBlock {
        lines: secondary_lines,
        font: secondary_font,
        line_height: secondary_lh,
        top: top + primary_height + spacing,
        color: SECONDARY_COLOR,
    };

    QuoteLayout {
        tier,
        primary,
        secondary,
        content_height,
        citation: quote.source.to_uppercase(),
    }
}

/// A rounded label box.
#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
    pub rect: Rect,
    pub radius: f64,
    pub fill: Rgba8,
    pub stroke: Option<(Rgba8, f64)>,
    pub label: String,
    pub font: FontSpec,
    pub label_color: Rgba8,
    pub label_center_y: f64,
    pub label_shadow_blur: Option<f32>,
}

pub fn citation_badge(canvas: Canvas, citation: &str) -> Badge {
    let cx = canvas.center_x();
    let center_y = f64::from(canvas.height) - 240.0;
    Badge {
        rect: Rect::new(cx - 420.0, center_y - 80.0, cx + 420.0, center_y + 80.0),
        radius: 30.0,
        fill: Rgba8::BLACK.with_alpha(0.4),
        stroke: Some((AMBER.with_alpha(0.3), 3.0)),
        label: citation.to_string(),
        font: FontSpec::new(FontRole::Ui, 38.0).bold(),
        label_color: AMBER,
        label_center_y: center_y,
        label_shadow_blur: Some(CITATION_SHADOW_BLUR),
    }
}

pub fn brand_badge(canvas: Canvas) -> Badge {
    let cx = canvas.center_x();
    Badge {
        rect: Rect::new(cx - 180.0, 100.0, cx + 180.0, 180.0),
        radius: 20.0,
        fill: AMBER,
        stroke: None,
        label: BRAND_LABEL.to_string(),
        font: FontSpec::new(FontRole::Ui, 34.0).bold(),
        label_color: Rgba8::BLACK,
        label_center_y: 142.0,
        label_shadow_blur: None,
    }
}

type OverlayKey = (Option<Quote>, bool);

/// Draws export frames at a fixed canvas size.
pub struct FrameCompositor {
    canvas: Canvas,
    engine: TextEngine,
    gradient: Option<Vec<u8>>,
    overlay: Option<(OverlayKey, Vec<u8>)>,
}

impl FrameCompositor {
    pub fn new(canvas: Canvas, engine: TextEngine) -> Self {
        Self {
            canvas,
            engine,
            gradient: None,
            overlay: None,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Draw one frame. Never fails: errors are logged and the frame is left as far as it got.
    pub fn render_frame(
        &mut self,
        surface: &mut Surface,
        quote: Option<&Quote>,
        settings: &RenderSettings,
        background: Option<&BackgroundFrame>,
    ) {
        if let Err(e) = self.try_render_frame(surface, quote, settings, background) {
            tracing::warn!(error = %e, "frame render skipped");
        }
    }

    pub fn try_render_frame(
        &mut self,
        surface: &mut Surface,
        quote: Option<&Quote>,
        settings: &RenderSettings,
        background: Option<&BackgroundFrame>,
    ) -> WisdomResult<()> {
        if surface.canvas() != self.canvas {
            return Err(WisdomError::surface_missing(format!(
                "surface is {}x{}, compositor draws {}x{}",
                surface.canvas().width,
                surface.canvas().height,
                self.canvas.width,
                self.canvas.height
            )));
        }

        self.draw_background(surface, background)?;

        let key: OverlayKey = (quote.cloned(), settings.include_arabic);
        let cached = matches!(&self.overlay, Some((k, _)) if *k == key);
        if !cached {
            let pixels = self.build_overlay(quote, settings.include_arabic)?;
            self.overlay = Some((key, pixels));
        }
        if let Some((_, overlay)) = &self.overlay {
            composite::over_in_place(surface.data_mut(), overlay)?;
        }
        Ok(())
    }

    fn draw_background(
        &mut self,
        surface: &mut Surface,
        background: Option<&BackgroundFrame>,
    ) -> WisdomResult<()> {
        match background.filter(|f| f.is_usable()) {
            Some(frame) => {
                let image = background::frame_to_image(frame)?;
                let dest = background::cover_rect(self.canvas, frame.aspect());
                let transform = Affine::translate((dest.x0, dest.y0))
                    * Affine::scale_non_uniform(
                        dest.width() / f64::from(frame.width),
                        dest.height() / f64::from(frame.height),
                    );
                let (w, h) = self.canvas.size_u16()?;
                let full = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h));

                let mut ctx = vello_cpu::RenderContext::new(w, h);
                ctx.set_paint(Rgba8::BLACK.to_cpu());
                ctx.fill_rect(&full);

                ctx.set_transform(super::affine_to_cpu(transform));
                ctx.set_paint(image);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(frame.width),
                    f64::from(frame.height),
                ));

                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(background::DIM.to_cpu());
                ctx.fill_rect(&full);
                ctx.flush();
                ctx.render_to_pixmap(surface.pixmap_mut());
            }
            None => {
                let canvas = self.canvas;
                let gradient = self.gradient.get_or_insert_with(|| {
                    background::gradient_rgba8_premul(
                        canvas,
                        background::GRADIENT_TOP,
                        background::GRADIENT_BOTTOM,
                    )
                });
                surface.data_mut().copy_from_slice(gradient);
            }
        }
        Ok(())
    }

    fn build_overlay(
        &mut self,
        quote: Option<&Quote>,
        include_arabic: bool,
    ) -> WisdomResult<Vec<u8>> {
        let canvas = self.canvas;
        let mut overlay = vec![0u8; canvas.pixel_len()];

        if let Some(quote) = quote {
            let layout = layout_quote(quote, include_arabic, canvas, &mut self.engine);
            tracing::debug!(
                tier = ?layout.tier,
                primary_lines = layout.primary.as_ref().map_or(0, |b| b.lines.len()),
                secondary_lines = layout.secondary.lines.len(),
                "quote layout"
            );

            let blocks = layout.primary.iter().chain([&layout.secondary]);
            let text = self.rasterize_lines(blocks.flat_map(|b| {
                b.line_centers()
                    .map(move |(y, line)| (line, b.font, b.color, y))
            }))?;
            self.layer_with_shadow(
                &mut overlay,
                &text,
                TEXT_SHADOW_BLUR,
                Rgba8::BLACK.with_alpha(0.8),
            )?;

            let badge = citation_badge(canvas, &layout.citation);
            self.draw_badge(&mut overlay, &badge)?;
        }

        self.draw_badge(&mut overlay, &brand_badge(canvas))?;
        Ok(overlay)
    }

    fn draw_badge(&mut self, overlay: &mut [u8], badge: &Badge) -> WisdomResult<()> {
        let path = badge.rect.to_rounded_rect(badge.radius).to_path(0.1);
        let cpu_path = super::bezpath_to_cpu(&path);
        let shape = rasterize(self.canvas, |ctx| {
            ctx.set_paint(badge.fill.to_cpu());
            ctx.fill_path(&cpu_path);
            if let Some((color, width)) = badge.stroke {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                ctx.set_paint(color.to_cpu());
                ctx.stroke_path(&cpu_path);
            }
            Ok(())
        })?;
        composite::over_in_place(overlay, &shape)?;

        let label = self.rasterize_lines(std::iter::once((
            badge.label.as_str(),
            badge.font,
            badge.label_color,
            badge.label_center_y,
        )))?;
        match badge.label_shadow_blur {
            Some(blur) => self.layer_with_shadow(overlay, &label, blur, Rgba8::BLACK),
            None => composite::over_in_place(overlay, &label),
        }
    }

    fn layer_with_shadow(
        &self,
        overlay: &mut [u8],
        layer: &[u8],
        blur: f32,
        color: Rgba8,
    ) -> WisdomResult<()> {
        let shadow = blur::drop_shadow(layer, self.canvas.width, self.canvas.height, blur, color)?;
        composite::over_in_place(overlay, &shadow)?;
        composite::over_in_place(overlay, layer)
    }

    /// Shape and fill lines horizontally centered on the canvas, each centered on its `y`.
    fn rasterize_lines<'a>(
        &mut self,
        lines: impl Iterator<Item = (&'a str, FontSpec, Rgba8, f64)>,
    ) -> WisdomResult<Vec<u8>> {
        let canvas = self.canvas;
        let mut shaped = Vec::new();
        for (text, font, color, center_y) in lines {
            let layout = self.engine.layout_line(text, &font, TextBrush::from(color))?;
            let x = canvas.center_x() - f64::from(layout.width()) / 2.0;
            let y = center_y - f64::from(layout.height()) / 2.0;
            shaped.push((layout, Affine::translate((x, y))));
        }

        rasterize(canvas, |ctx| {
            for (layout, transform) in &shaped {
                ctx.set_transform(super::affine_to_cpu(*transform));
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        fill_glyph_run(ctx, &run);
                    }
                }
            }
            Ok(())
        })
    }
}

/// Stroke width added around each outline when the face has no bold of its own.
fn embolden_width(font_size: f32) -> f64 {
    f64::from(font_size) / 24.0
}

fn fill_glyph_run(
    ctx: &mut vello_cpu::RenderContext,
    run: &parley::layout::GlyphRun<'_, TextBrush>,
) {
    let brush = run.style().brush;
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        brush.r, brush.g, brush.b, brush.a,
    ));

    let font = run.run().font();
    let font_size = run.run().font_size();
    let synthesis = run.run().synthesis();
    let skew = synthesis
        .skew()
        .map(|deg| vello_cpu::kurbo::Affine::skew(f64::from(deg.to_radians().tan()), 0.0));
    let glyphs: Vec<vello_cpu::Glyph> = run
        .positioned_glyphs()
        .map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        })
        .collect();

    let identity = vello_cpu::kurbo::Affine::IDENTITY;
    ctx.glyph_run(font)
        .font_size(font_size)
        .glyph_transform(skew.unwrap_or(identity))
        .fill_glyphs(glyphs.iter().copied());

    if synthesis.embolden() {
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(embolden_width(font_size)));
        ctx.glyph_run(font)
            .font_size(font_size)
            .glyph_transform(skew.unwrap_or(identity))
            .stroke_glyphs(glyphs.iter().copied());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
