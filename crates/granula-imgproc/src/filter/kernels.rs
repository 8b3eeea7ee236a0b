use granula_image::ImageError;

/// A rectangular weighted kernel centred on its middle element.
///
/// The window spans `2 * x_radius + 1` columns and `2 * y_radius + 1` rows and the weights are
/// stored row-major. Convolution divides the weighted sum by `divisor`; morphology treats every
/// weight `> 0` as an included structuring-element offset.
///
/// # Example
///
/// ```rust
/// use granula_imgproc::filter::kernels::Kernel;
///
/// let kernel = Kernel::box_kernel(1, 2);
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.height(), 5);
/// assert_eq!(kernel.divisor(), 15.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "KernelRepr"))]
pub struct Kernel {
    x_radius: usize,
    y_radius: usize,
    weights: Vec<f64>,
    divisor: f64,
}

/// Unvalidated serialized form of a [`Kernel`]; deserializing goes through [`Kernel::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct KernelRepr {
    x_radius: usize,
    y_radius: usize,
    weights: Vec<f64>,
    divisor: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<KernelRepr> for Kernel {
    type Error = ImageError;

    fn try_from(repr: KernelRepr) -> Result<Self, Self::Error> {
        Kernel::new(repr.x_radius, repr.y_radius, repr.weights, repr.divisor)
    }
}

impl Kernel {
    /// Create a kernel from its radii, row-major weights and divisor.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the number of weights does not match the
    /// window or the divisor is zero or not finite.
    pub fn new(
        x_radius: usize,
        y_radius: usize,
        weights: Vec<f64>,
        divisor: f64,
    ) -> Result<Self, ImageError> {
        let side = |r: usize| r.checked_mul(2).and_then(|d| d.checked_add(1));
        let expected = side(x_radius)
            .zip(side(y_radius))
            .and_then(|(w, h)| w.checked_mul(h));
        if expected != Some(weights.len()) {
            return Err(ImageError::InvalidParameter(format!(
                "kernel with radii ({x_radius}, {y_radius}) does not fit {} weights",
                weights.len()
            )));
        }

        if divisor == 0.0 || !divisor.is_finite() {
            return Err(ImageError::InvalidParameter(format!(
                "kernel divisor must be finite and non-zero, got {divisor}"
            )));
        }

        Ok(Self {
            x_radius,
            y_radius,
            weights,
            divisor,
        })
    }

    /// A kernel whose only non-zero weight is 1 at the centre.
    pub fn identity(x_radius: usize, y_radius: usize) -> Self {
        let width = 2 * x_radius + 1;
        let mut weights = vec![0.0; width * (2 * y_radius + 1)];
        weights[y_radius * width + x_radius] = 1.0;
        Self {
            x_radius,
            y_radius,
            weights,
            divisor: 1.0,
        }
    }

    /// A mean filter: all weights 1, divisor equal to the window area.
    pub fn box_kernel(x_radius: usize, y_radius: usize) -> Self {
        let len = (2 * x_radius + 1) * (2 * y_radius + 1);
        Self {
            x_radius,
            y_radius,
            weights: vec![1.0; len],
            divisor: len as f64,
        }
    }

    /// A structuring element from a row-major inclusion mask.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the mask length does not match the window.
    pub fn from_mask(x_radius: usize, y_radius: usize, mask: &[bool]) -> Result<Self, ImageError> {
        let weights = mask.iter().map(|&m| if m { 1.0 } else { 0.0 }).collect();
        Self::new(x_radius, y_radius, weights, 1.0)
    }

    /// A structuring element including every offset `(dx, dy)` for which `included` holds.
    ///
    /// Offsets range over `-x_radius..=x_radius` and `-y_radius..=y_radius`.
    pub fn from_fn(
        x_radius: usize,
        y_radius: usize,
        included: impl Fn(isize, isize) -> bool,
    ) -> Self {
        let (rx, ry) = (x_radius as isize, y_radius as isize);
        let weights = (-ry..=ry)
            .flat_map(|dy| (-rx..=rx).map(move |dx| (dx, dy)))
            .map(|(dx, dy)| if included(dx, dy) { 1.0 } else { 0.0 })
            .collect();
        Self {
            x_radius,
            y_radius,
            weights,
            divisor: 1.0,
        }
    }

    /// A normalized 2D gaussian built as the outer product of two 1D gaussians.
    ///
    /// The weights sum to one, so integer pixel types should use [`Kernel::quantize`] first.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if a sigma is not strictly positive.
    pub fn gaussian(
        x_radius: usize,
        y_radius: usize,
        sigma_x: f64,
        sigma_y: f64,
    ) -> Result<Self, ImageError> {
        if sigma_x <= 0.0 || sigma_y <= 0.0 {
            return Err(ImageError::InvalidParameter(format!(
                "gaussian sigma must be positive, got ({sigma_x}, {sigma_y})"
            )));
        }
        let kx = gaussian_kernel_1d(2 * x_radius + 1, sigma_x);
        let ky = gaussian_kernel_1d(2 * y_radius + 1, sigma_y);
        Ok(Self::outer(x_radius, y_radius, &kx, &ky))
    }

    /// The 3x3 horizontal Sobel derivative.
    pub fn sobel_x() -> Self {
        let (deriv, smooth) = sobel_kernel_1d();
        Self::outer(1, 1, &deriv, &smooth)
    }

    /// The 3x3 vertical Sobel derivative.
    pub fn sobel_y() -> Self {
        let (deriv, smooth) = sobel_kernel_1d();
        Self::outer(1, 1, &smooth, &deriv)
    }

    /// A single-row kernel (`y_radius == 0`).
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the length is even or the divisor is invalid.
    pub fn row(weights: Vec<f64>, divisor: f64) -> Result<Self, ImageError> {
        let x_radius = odd_radius(weights.len())?;
        Self::new(x_radius, 0, weights, divisor)
    }

    /// A single-column kernel (`x_radius == 0`).
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the length is even or the divisor is invalid.
    pub fn column(weights: Vec<f64>, divisor: f64) -> Result<Self, ImageError> {
        let y_radius = odd_radius(weights.len())?;
        Self::new(0, y_radius, weights, divisor)
    }

    /// Scale weights and divisor by `scale` and round them to integers.
    ///
    /// Useful to run fractional kernels on integer pixels, whose weights are truncated.
    pub fn quantize(&self, scale: f64) -> Result<Self, ImageError> {
        let weights = self.weights.iter().map(|w| (w * scale).round()).collect();
        Self::new(
            self.x_radius,
            self.y_radius,
            weights,
            (self.divisor * scale).round(),
        )
    }

    fn outer(x_radius: usize, y_radius: usize, kx: &[f64], ky: &[f64]) -> Self {
        let weights = ky
            .iter()
            .flat_map(|&wy| kx.iter().map(move |&wx| wx * wy))
            .collect();
        Self {
            x_radius,
            y_radius,
            weights,
            divisor: 1.0,
        }
    }

    /// Horizontal radius.
    pub fn x_radius(&self) -> usize {
        self.x_radius
    }

    /// Vertical radius.
    pub fn y_radius(&self) -> usize {
        self.y_radius
    }

    /// Width of the window, `2 * x_radius + 1`.
    pub fn width(&self) -> usize {
        2 * self.x_radius + 1
    }

    /// Height of the window, `2 * y_radius + 1`.
    pub fn height(&self) -> usize {
        2 * self.y_radius + 1
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The divisor applied to the weighted sum.
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Number of included structuring-element offsets (weights `> 0`).
    pub fn included_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w > 0.0).count()
    }
}

fn odd_radius(len: usize) -> Result<usize, ImageError> {
    if len % 2 == 0 {
        return Err(ImageError::InvalidParameter(format!(
            "1D kernel length must be odd, got {len}"
        )));
    }
    Ok(len / 2)
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum to one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f64) -> Vec<f64> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size as f64 - 1.0) / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f64 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// The 3-tap Sobel derivative and smoothing kernels.
pub fn sobel_kernel_1d() -> ([f64; 3], [f64; 3]) {
    ([-1.0, 0.0, 1.0], [1.0, 2.0, 1.0])
}
