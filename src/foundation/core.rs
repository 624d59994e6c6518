use crate::foundation::error::{WisdomError, WisdomResult};

pub use kurbo::{Affine, BezPath, Point, Rect};

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// The vertical short-video surface every export is rendered at.
    pub const PORTRAIT_HD: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }

    pub fn pixel_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }

    pub fn center_x(self) -> f64 {
        f64::from(self.width) / 2.0
    }

    /// Dimensions as the `u16` pair the CPU rasterizer works in.
    pub fn size_u16(self) -> WisdomResult<(u16, u16)> {
        if self.width == 0 || self.height == 0 {
            return Err(WisdomError::surface_missing(format!(
                "canvas {}x{} has no area",
                self.width, self.height
            )));
        }
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| WisdomError::surface_missing("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| WisdomError::surface_missing("canvas height exceeds u16"))?;
        Ok((w, h))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::PORTRAIT_HD
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);
    pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a CSS-style alpha in `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    pub fn premul(self) -> [u8; 4] {
        let af = (self.a as u16) + 1;
        let premul = |c: u8| -> u8 { (((c as u16) * af) >> 8) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}
