//! CPU raster surface and the per-frame compositor drawn onto it.

use std::path::Path;

use crate::foundation::{
    core::Canvas,
    error::{WisdomError, WisdomResult},
};

pub mod background;
pub mod blur;
pub mod composite;
pub mod compositor;

pub use background::BackgroundFrame;
pub use compositor::{FrameCompositor, QuoteLayout, layout_quote};

/// A rendered frame handed to encoders or written as a preview image.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixels, as PNG viewers expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    pub fn save_png(&self, path: &Path) -> WisdomResult<()> {
        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| WisdomError::render(format!("write png '{}': {e}", path.display())))
    }
}

/// The fixed-size drawing target every frame is composited into.
pub struct Surface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    pub fn new(canvas: Canvas) -> WisdomResult<Self> {
        let (w, h) = canvas.size_u16()?;
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fill(&mut self, premul: [u8; 4]) {
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

/// Run `draw` against a fresh transparent context and return the premultiplied pixels.
pub(crate) fn rasterize(
    canvas: Canvas,
    draw: impl FnOnce(&mut vello_cpu::RenderContext) -> WisdomResult<()>,
) -> WisdomResult<Vec<u8>> {
    let (w, h) = canvas.size_u16()?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx)?;
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

pub(crate) fn affine_to_cpu(a: crate::foundation::core::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: crate::foundation::core::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &crate::foundation::core::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
