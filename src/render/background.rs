use std::sync::Arc;

use crate::foundation::{
    core::{Canvas, Rect, Rgba8},
    error::{WisdomError, WisdomResult},
};

pub const GRADIENT_TOP: Rgba8 = Rgba8::rgb(0x0f, 0x17, 0x2a);
pub const GRADIENT_BOTTOM: Rgba8 = Rgba8::BLACK;
/// rgba(0,0,0,0.65) laid over video frames so the text stays legible.
pub const DIM: Rgba8 = Rgba8::rgba(0, 0, 0, 166);

/// One decoded background video frame, straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct BackgroundFrame {
    pub width: u32,
    pub height: u32,
    pub rgba8: Arc<Vec<u8>>,
}

impl BackgroundFrame {
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>) -> WisdomResult<Self> {
        if rgba8.len() != width as usize * height as usize * 4 {
            return Err(WisdomError::validation(format!(
                "background frame byte length {} does not match {width}x{height}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// A frame with no pixels falls back to the gradient.
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Destination rectangle that covers `canvas` with a frame of aspect `video_aspect`.
///
/// Wider sources fit the canvas height and are centered horizontally; taller or equal sources fit
/// the width and are centered vertically. Overflow is cropped by the canvas edge.
pub fn cover_rect(canvas: Canvas, video_aspect: f64) -> Rect {
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    if video_aspect > canvas.aspect() {
        let draw_w = ch * video_aspect;
        let x = (cw - draw_w) / 2.0;
        Rect::new(x, 0.0, x + draw_w, ch)
    } else {
        let draw_h = cw / video_aspect;
        let y = (ch - draw_h) / 2.0;
        Rect::new(0.0, y, cw, y + draw_h)
    }
}

/// Vertical two-stop gradient as premultiplied RGBA8 (both stops are opaque).
pub fn gradient_rgba8_premul(canvas: Canvas, top: Rgba8, bottom: Rgba8) -> Vec<u8> {
    let (w, h) = (canvas.width as usize, canvas.height as usize);
    let mut out = Vec::with_capacity(w * h * 4);
    let lerp = |a: u8, b: u8, t: f64| -> u8 {
        (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
    };
    for y in 0..h {
        let t = if h > 1 { y as f64 / (h - 1) as f64 } else { 0.0 };
        let row = Rgba8::rgba(
            lerp(top.r, bottom.r, t),
            lerp(top.g, bottom.g, t),
            lerp(top.b, bottom.b, t),
            lerp(top.a, bottom.a, t),
        )
        .premul();
        for _ in 0..w {
            out.extend_from_slice(&row);
        }
    }
    out
}

pub(crate) fn frame_to_image(frame: &BackgroundFrame) -> WisdomResult<vello_cpu::Image> {
    let w: u16 = frame
        .width
        .try_into()
        .map_err(|_| WisdomError::render("background width exceeds u16"))?;
    let h: u16 = frame
        .height
        .try_into()
        .map_err(|_| WisdomError::render("background height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(frame.width as usize * frame.height as usize);
    for px in frame.rgba8.chunks_exact(4) {
        let [r, g, b, a] = Rgba8::rgba(px[0], px[1], px[2], px[3]).premul();
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 { r, g, b, a });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
