use granula_image::{ImageError, Pixel, RasterBuffer};

/// Exact euclidean distance transform of a binary image.
///
/// Every foreground (non-zero) pixel receives its distance to the nearest background pixel;
/// background pixels receive zero. An image without background pixels maps to
/// [`f32::INFINITY`] everywhere.
///
/// The squared distance is computed separably, columns first and then rows, as the lower
/// envelope of parabolas rooted at each pixel.
///
/// # Arguments
///
/// * `src` - The binary input image.
///
/// # Returns
///
/// A contiguous `f32` image of the same size as `src`.
///
/// Example:
///
/// ```
/// use granula_image::RasterBuffer;
/// use granula_imgproc::distance_transform::distance_transform;
///
/// let image = RasterBuffer::new([4, 1].into(), vec![255u8, 255, 0, 255]).unwrap();
/// let distance = distance_transform(&image).unwrap();
///
/// assert_eq!(distance.as_slice(), &[2.0, 1.0, 0.0, 1.0]);
/// ```
pub fn distance_transform<T: Pixel>(
    src: &RasterBuffer<T>,
) -> Result<RasterBuffer<f32>, ImageError> {
    let (width, height) = (src.width(), src.height());

    let mut squared = Vec::with_capacity(src.size().area());
    for row in src.rows_iter() {
        squared.extend(row.iter().map(|v| {
            if v.is_foreground() {
                f64::INFINITY
            } else {
                0.0
            }
        }));
    }

    let mut envelope = Envelope::with_capacity(width.max(height));
    let mut line = vec![0.0; width.max(height)];
    let mut out = vec![0.0; width.max(height)];

    for x in 0..width {
        for (y, f) in line[..height].iter_mut().enumerate() {
            *f = squared[y * width + x];
        }
        envelope.transform(&line[..height], &mut out[..height]);
        for (y, d) in out[..height].iter().enumerate() {
            squared[y * width + x] = *d;
        }
    }

    for y in 0..height {
        let row = &mut squared[y * width..(y + 1) * width];
        line[..width].copy_from_slice(row);
        envelope.transform(&line[..width], row);
    }

    let data = squared.into_iter().map(|d| d.sqrt() as f32).collect();
    RasterBuffer::new(src.size(), data)
}

/// Scratch space for the 1d squared distance transform.
struct Envelope {
    // roots of the parabolas in the lower envelope
    roots: Vec<usize>,
    // left boundary of each parabola's interval
    bounds: Vec<f64>,
}

impl Envelope {
    fn with_capacity(n: usize) -> Self {
        Self {
            roots: Vec::with_capacity(n),
            bounds: Vec::with_capacity(n),
        }
    }

    /// `d[q] = min_p (q - p)^2 + f[p]`, skipping sites where `f` is infinite.
    fn transform(&mut self, f: &[f64], d: &mut [f64]) {
        self.roots.clear();
        self.bounds.clear();

        for (q, &fq) in f.iter().enumerate() {
            if fq.is_infinite() {
                continue;
            }
            let hq = fq + (q * q) as f64;
            while let (Some(&p), Some(&bound)) = (self.roots.last(), self.bounds.last()) {
                let s = (hq - (f[p] + (p * p) as f64)) / (2.0 * (q - p) as f64);
                if s > bound {
                    self.roots.push(q);
                    self.bounds.push(s);
                    break;
                }
                self.roots.pop();
                self.bounds.pop();
            }
            if self.roots.is_empty() {
                self.roots.push(q);
                self.bounds.push(f64::NEG_INFINITY);
            }
        }

        if self.roots.is_empty() {
            d.fill(f64::INFINITY);
            return;
        }

        let mut k = 0;
        for (q, dq) in d.iter_mut().enumerate() {
            while k + 1 < self.roots.len() && self.bounds[k + 1] < q as f64 {
                k += 1;
            }
            let p = self.roots[k];
            let offset = q as f64 - p as f64;
            *dq = offset * offset + f[p];
        }
    }
}
