use crate::foundation::{
    core::Rgba8,
    error::{WisdomError, WisdomResult},
};

/// Canvas-style drop shadow of a premultiplied layer: its alpha mask blurred by a gaussian with
/// `sigma = blur / 2`, tinted with `color`, zero offset.
///
/// Only the bounding box of covered pixels (grown by the kernel radius) is processed.
pub fn drop_shadow(
    layer: &[u8],
    width: u32,
    height: u32,
    blur: f32,
    color: Rgba8,
) -> WisdomResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| WisdomError::render("shadow buffer size overflow"))?;
    if layer.len() != expected_len {
        return Err(WisdomError::render(
            "drop_shadow expects a layer matching width*height*4",
        ));
    }

    let mut out = vec![0u8; expected_len];
    let Some(bounds) = alpha_bounds(layer, width, height) else {
        return Ok(out);
    };

    let sigma = blur / 2.0;
    let radius = (sigma * 3.0).ceil().max(0.0) as u32;
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let bounds = bounds.grow(radius, width, height);

    let (bw, bh) = (bounds.width(), bounds.height());
    let mut mask = vec![0u8; bw * bh];
    for y in 0..bh {
        for x in 0..bw {
            let idx = ((bounds.y0 + y) * width as usize + bounds.x0 + x) * 4 + 3;
            mask[y * bw + x] = layer[idx];
        }
    }

    let mut tmp = vec![0u8; mask.len()];
    horizontal_pass(&mask, &mut tmp, bw, bh, &kernel);
    vertical_pass(&tmp, &mut mask, bw, bh, &kernel);

    let tint = u16::from(color.a);
    for y in 0..bh {
        for x in 0..bw {
            let a = mul_div255(u16::from(mask[y * bw + x]), tint);
            if a == 0 {
                continue;
            }
            let px = Rgba8 { a, ..color }.premul();
            let idx = ((bounds.y0 + y) * width as usize + bounds.x0 + x) * 4;
            out[idx..idx + 4].copy_from_slice(&px);
        }
    }
    Ok(out)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Bounds {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl Bounds {
    fn width(self) -> usize {
        self.x1 - self.x0
    }

    fn height(self) -> usize {
        self.y1 - self.y0
    }

    fn grow(self, by: u32, width: u32, height: u32) -> Self {
        let by = by as usize;
        Self {
            x0: self.x0.saturating_sub(by),
            y0: self.y0.saturating_sub(by),
            x1: (self.x1 + by).min(width as usize),
            y1: (self.y1 + by).min(height as usize),
        }
    }
}

fn alpha_bounds(layer: &[u8], width: u32, height: u32) -> Option<Bounds> {
    let (w, h) = (width as usize, height as usize);
    let mut b: Option<Bounds> = None;
    for y in 0..h {
        for x in 0..w {
            if layer[(y * w + x) * 4 + 3] == 0 {
                continue;
            }
            b = Some(match b {
                None => Bounds {
                    x0: x,
                    y0: y,
                    x1: x + 1,
                    y1: y + 1,
                },
                Some(b) => Bounds {
                    x0: b.x0.min(x),
                    y0: b.y0.min(y),
                    x1: b.x1.max(x + 1),
                    y1: b.y1.max(y + 1),
                },
            });
        }
    }
    b
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> WisdomResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(WisdomError::validation("shadow blur must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

// Samples outside the mask read as transparent, so shadows fade at the layer edge.
fn horizontal_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x as isize + ki as isize - radius;
                if sx >= 0 && (sx as usize) < w {
                    acc += u64::from(kw) * u64::from(row[sx as usize]);
                }
            }
            dst[y * w + x] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y as isize + ki as isize - radius;
                if sy >= 0 && (sy as usize) < h {
                    acc += u64::from(kw) * u64::from(src[sy as usize * w + x]);
                }
            }
            dst[y * w + x] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
