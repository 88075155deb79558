// Region blur: blur the inside of the quad, leave everything else untouched.
// Visual expectation: the area enclosed by the purple outline looks frosted,
// the rest of the camera image stays sharp, and the frosted area follows the
// outline as you drag its corners.
use crate::error::Error;
use crate::polygon::Polygon;
use crate::types::{FrameBuffer, Mask};

/// Default Gaussian blur radius (sigma, pixels).
pub const DEFAULT_BLUR_RADIUS: f32 = 10.0;

/// Largest accepted blur radius; bigger ones are clamped to it.
pub const MAX_BLUR_RADIUS: f32 = 200.0;

/// Box passes used to approximate one Gaussian.
const BOX_PASSES: usize = 3;

/// Box radii whose successive application approximates a Gaussian of `sigma`.
/// Visual: three soft box blurs in a row look like one smooth Gaussian.
pub fn boxes_for_gauss(sigma: f32, passes: usize) -> Vec<usize> {
    if passes == 0 {
        return Vec::new();
    }
    let n = passes as f32;
    // NaN means no blur; infinity clamps like any other oversized radius
    let sigma = if sigma.is_nan() { 0.0 } else { sigma.clamp(0.0, MAX_BLUR_RADIUS) };
    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i32;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let (wlf, nf) = (wl as f32, n);
    let m_ideal =
        (12.0 * sigma * sigma - nf * wlf * wlf - 4.0 * nf * wlf - 3.0 * nf) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    (0..passes)
        .map(|i| if i < m { wl } else { wu })
        .map(|size| ((size - 1) / 2) as usize)
        .collect()
}

/// One horizontal + vertical box blur pass with edge extension.
pub fn box_blur_rgb(
    src: &FrameBuffer,      // input
    tmp: &mut FrameBuffer,  // horizontal pass result (scratch)
    dst: &mut FrameBuffer,  // final blurred output
    radius: usize,          // blur amount; bigger = softer (and slightly slower)
) -> Result<(), Error> {
    if src.width != dst.width || src.height != dst.height {
        return Err(Error::SizeMismatch("box_blur: src vs dst".into()));
    }
    if tmp.width != src.width || tmp.height != src.height {
        return Err(Error::SizeMismatch("box_blur: src vs tmp".into()));
    }
    if src.width == 0 || src.height == 0 {
        return Ok(());
    }
    let w = src.width as i32;
    let h = src.height as i32;
    let r = radius as i32;
    let win = (2 * r + 1) as u32; // window width for averaging (constant everywhere)

    /* ---- Pass 1: Horizontal (store averaged rows in tmp) ---- */
    for y in 0..h {
        let row_ofs = (y as usize) * (w as usize);

        // Edge pixel value at x=0 (we "extend" edges to avoid dark borders)
        let px0 = src.pixels[row_ofs];
        let (mut sr, mut sg, mut sb) = (
            ((px0 >> 16) & 0xFF) * (r as u32 + 1),
            ((px0 >> 8) & 0xFF) * (r as u32 + 1),
            (px0 & 0xFF) * (r as u32 + 1),
        );

        // Prime the right side of the initial window [0..r]
        for x in 1..=r {
            let p = src.pixels[row_ofs + x.min(w - 1) as usize];
            sr += (p >> 16) & 0xFF;
            sg += (p >> 8) & 0xFF;
            sb += p & 0xFF;
        }

        // Slide the window across the row
        for x in 0..w {
            tmp.pixels[row_ofs + x as usize] = ((sr / win) << 16) | ((sg / win) << 8) | (sb / win);

            let left_x = (x - r).max(0) as usize;
            let right_x = (x + r + 1).min(w - 1) as usize;
            let p_sub = src.pixels[row_ofs + left_x];
            let p_add = src.pixels[row_ofs + right_x];

            sr = sr + ((p_add >> 16) & 0xFF) - ((p_sub >> 16) & 0xFF);
            sg = sg + ((p_add >> 8) & 0xFF) - ((p_sub >> 8) & 0xFF);
            sb = sb + (p_add & 0xFF) - (p_sub & 0xFF);
        }
    }

    /* ---- Pass 2: Vertical (read tmp, write dst) ---- */
    let stride = w as usize;
    for x in 0..w as usize {
        let p0 = tmp.pixels[x];
        let (mut sr, mut sg, mut sb) = (
            ((p0 >> 16) & 0xFF) * (r as u32 + 1),
            ((p0 >> 8) & 0xFF) * (r as u32 + 1),
            (p0 & 0xFF) * (r as u32 + 1),
        );

        for y in 1..=r {
            let p = tmp.pixels[(y.min(h - 1) as usize) * stride + x];
            sr += (p >> 16) & 0xFF;
            sg += (p >> 8) & 0xFF;
            sb += p & 0xFF;
        }

        for y in 0..h {
            dst.pixels[(y as usize) * stride + x] = ((sr / win) << 16) | ((sg / win) << 8) | (sb / win);

            let top_y = (y - r).max(0) as usize;
            let bottom_y = (y + r + 1).min(h - 1) as usize;
            let p_sub = tmp.pixels[top_y * stride + x];
            let p_add = tmp.pixels[bottom_y * stride + x];

            sr = sr + ((p_add >> 16) & 0xFF) - ((p_sub >> 16) & 0xFF);
            sg = sg + ((p_add >> 8) & 0xFF) - ((p_sub >> 8) & 0xFF);
            sb = sb + (p_add & 0xFF) - (p_sub & 0xFF);
        }
    }

    Ok(())
}

/// Blur a whole frame with the box approximation of a Gaussian.
pub fn gaussian_blur(src: &FrameBuffer, sigma: f32) -> Result<FrameBuffer, Error> {
    let mut cur = src.clone();
    let mut tmp = FrameBuffer::new(src.width, src.height);
    let mut out = FrameBuffer::new(src.width, src.height);
    for r in boxes_for_gauss(sigma, BOX_PASSES) {
        box_blur_rgb(&cur, &mut tmp, &mut out, r)?;
        std::mem::swap(&mut cur, &mut out);
    }
    Ok(cur)
}

/// Rasterize the quad with the even-odd rule, sampling at pixel centres.
/// Only rows the quad spans are visited; a zero-area quad gives an empty mask.
pub fn polygon_mask(polygon: &Polygon, width: usize, height: usize) -> Mask {
    let mut mask = Mask::new(width, height);
    fill_polygon_mask(polygon, &mut mask);
    mask
}

fn fill_polygon_mask(polygon: &Polygon, mask: &mut Mask) {
    mask.covered.iter_mut().for_each(|c| *c = false);
    if mask.width == 0 || mask.height == 0 {
        return;
    }
    let verts = polygon.vertices();
    let (min, max) = polygon.bounds();
    let y0 = min.y.max(0) as usize;
    let y1 = (max.y.max(0) as usize).min(mask.height);

    let mut xs: Vec<f64> = Vec::with_capacity(verts.len());
    for y in y0..y1 {
        let yc = y as f64 + 0.5;
        xs.clear();
        for i in 0..verts.len() {
            let a = verts[i];
            let b = verts[(i + 1) % verts.len()];
            let (ay, by) = (a.y as f64, b.y as f64);
            // half-open on y so a shared vertex is counted once
            if (ay > yc) != (by > yc) {
                let t = (yc - ay) / (by - ay);
                xs.push(a.x as f64 + t * (b.x - a.x) as f64);
            }
        }
        xs.sort_by(|p, q| p.total_cmp(q));

        let row = y * mask.width;
        for span in xs.chunks_exact(2) {
            // pixel x is inside when its centre x+0.5 is in [span0, span1)
            let start = (span[0] - 0.5).ceil().max(0.0) as usize;
            let end = ((span[1] - 0.5).ceil().max(0.0) as usize).min(mask.width);
            for c in mask.covered[row + start.min(end)..row + end].iter_mut() {
                *c = true;
            }
        }
    }
}

/// Blurs the interior of a polygon in a frame.
///
/// Only the polygon's bounding box, grown by the total blur support, is
/// blurred. Pixels that far from the crop edge see exactly the neighbours a
/// full-frame blur would, so the result matches blurring the whole frame.
pub struct RegionBlur {
    sigma: f32,
    radii: Vec<usize>,
    mask: Mask, // reused between frames
}

impl RegionBlur {
    pub fn new(sigma: f32) -> Self {
        Self {
            sigma,
            radii: boxes_for_gauss(sigma, BOX_PASSES),
            mask: Mask::new(0, 0),
        }
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// How far (pixels) a blurred pixel can see from its own position.
    pub fn support(&self) -> usize {
        self.radii.iter().sum()
    }

    /// Return `frame` with the inside of `polygon` blurred.
    /// Visual: frosted glass inside the quad, sharp video outside.
    pub fn apply(&mut self, frame: &FrameBuffer, polygon: &Polygon) -> Result<FrameBuffer, Error> {
        let mut out = frame.clone();
        if frame.width == 0 || frame.height == 0 {
            return Ok(out);
        }

        if self.mask.width != frame.width || self.mask.height != frame.height {
            self.mask = Mask::new(frame.width, frame.height);
        }
        fill_polygon_mask(polygon, &mut self.mask);
        if self.mask.is_empty() {
            return Ok(out); // zero area / off screen: nothing to blur
        }

        // Crop rectangle: polygon bounds + support, clamped to the frame.
        let pad = self.support() as i64;
        let (min, max) = polygon.bounds();
        let cx0 = (min.x as i64 - pad).clamp(0, frame.width as i64) as usize;
        let cy0 = (min.y as i64 - pad).clamp(0, frame.height as i64) as usize;
        let cx1 = (max.x as i64 + pad + 1).clamp(0, frame.width as i64) as usize;
        let cy1 = (max.y as i64 + pad + 1).clamp(0, frame.height as i64) as usize;
        let (cw, ch) = (cx1 - cx0, cy1 - cy0);

        let mut crop = FrameBuffer::new(cw, ch);
        for y in 0..ch {
            let src = (cy0 + y) * frame.width + cx0;
            crop.pixels[y * cw..(y + 1) * cw].copy_from_slice(&frame.pixels[src..src + cw]);
        }
        let blurred = gaussian_blur(&crop, self.sigma)?;

        for y in 0..ch {
            let row = (cy0 + y) * frame.width;
            for x in 0..cw {
                if self.mask.covered[row + cx0 + x] {
                    out.pixels[row + cx0 + x] = blurred.pixels[y * cw + x];
                }
            }
        }
        Ok(out)
    }
}

impl Default for RegionBlur {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_RADIUS)
    }
}
