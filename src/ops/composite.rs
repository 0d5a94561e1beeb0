use image::RgbImage;

use crate::foundation::math::mul_div255_u16;

/// Straight-alpha RGBA layer drawn with replace semantics and pasted over an RGB image.
#[derive(Clone, Debug)]
pub(crate) struct Layer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Layer {
    /// Fully transparent layer.
    pub(crate) fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Fill the disk centered at `(cx, cy)`, overwriting whatever was drawn there before.
    pub(crate) fn fill_disk(&mut self, cx: i64, cy: i64, radius: i64, rgba: [u8; 4]) {
        if radius < 0 {
            return;
        }
        let r2 = (radius as f64 + 0.5).powi(2);
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        for y in (cy - radius).max(0)..=(cy + radius).min(h - 1) {
            for x in (cx - radius).max(0)..=(cx + radius).min(w - 1) {
                let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);
                if dx * dx + dy * dy <= r2 {
                    let idx = ((y * w + x) * 4) as usize;
                    self.rgba[idx..idx + 4].copy_from_slice(&rgba);
                }
            }
        }
    }

    /// Composite the layer over `dst` using its alpha channel as the mask.
    pub(crate) fn paste_over(&self, dst: &mut RgbImage) {
        debug_assert_eq!(dst.dimensions(), (self.width, self.height));
        for (d, s) in dst.as_mut().chunks_exact_mut(3).zip(self.rgba.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2]], [s[0], s[1], s[2]], s[3]);
            d.copy_from_slice(&out);
        }
    }
}

/// Blend `src` over `dst` with coverage `alpha`.
pub(crate) fn over(dst: [u8; 3], src: [u8; 3], alpha: u8) -> [u8; 3] {
    if alpha == 0 {
        return dst;
    }
    let a = u16::from(alpha);
    let inv = 255u16 - a;
    let mut out = [0u8; 3];
    for i in 0..3 {
        let sc = mul_div255_u16(u16::from(src[i]), a);
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = (sc + dc).min(255) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/ops/composite.rs"]
mod tests;
