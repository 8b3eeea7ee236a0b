use crate::filter::kernels::Kernel;

/// Shapes of morphological structuring elements.
///
/// Defines the geometry of the element used in morphological operations.
/// All elements are centered on their middle pixel and are symmetric about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuringElement {
    /// A rectangular box structuring element.
    ///
    /// All pixels within the `(2 * x_radius + 1) x (2 * y_radius + 1)` box are included.
    Box {
        /// Horizontal radius of the box.
        x_radius: usize,
        /// Vertical radius of the box.
        y_radius: usize,
    },

    /// A cross (plus) shaped structuring element.
    ///
    /// Only pixels along the horizontal and vertical center lines are included,
    /// forming a plus/cross pattern.
    Cross {
        /// Radius of both arms.
        radius: usize,
    },

    /// An ellipse (or circle) shaped structuring element.
    ///
    /// An offset `(dx, dy)` is included when
    /// `(dx / (x_radius + 0.5))^2 + (dy / (y_radius + 0.5))^2 <= 1`.
    Ellipse {
        /// Horizontal radius of the ellipse.
        x_radius: usize,
        /// Vertical radius of the ellipse.
        y_radius: usize,
    },
}

impl Default for StructuringElement {
    fn default() -> Self {
        StructuringElement::Box {
            x_radius: 1,
            y_radius: 1,
        }
    }
}

impl StructuringElement {
    /// The `(x_radius, y_radius)` of the element.
    pub fn radius(&self) -> (usize, usize) {
        match *self {
            StructuringElement::Box { x_radius, y_radius }
            | StructuringElement::Ellipse { x_radius, y_radius } => (x_radius, y_radius),
            StructuringElement::Cross { radius } => (radius, radius),
        }
    }

    /// Build the element as a [`Kernel`] whose included offsets have weight 1.
    ///
    /// # Example
    ///
    /// ```rust
    /// use granula_imgproc::morphology::StructuringElement;
    ///
    /// let kernel = StructuringElement::Cross { radius: 1 }.to_kernel();
    /// assert_eq!(kernel.width(), 3);
    /// assert_eq!(kernel.included_count(), 5);
    /// ```
    pub fn to_kernel(&self) -> Kernel {
        let (rx, ry) = self.radius();
        match *self {
            StructuringElement::Box { .. } => Kernel::from_fn(rx, ry, |_, _| true),
            StructuringElement::Cross { .. } => Kernel::from_fn(rx, ry, |dx, dy| dx == 0 || dy == 0),
            StructuringElement::Ellipse { .. } => {
                let ax = rx as f64 + 0.5;
                let ay = ry as f64 + 0.5;
                Kernel::from_fn(rx, ry, |dx, dy| {
                    let x = dx as f64 / ax;
                    let y = dy as f64 / ay;
                    x * x + y * y <= 1.0
                })
            }
        }
    }
}

impl From<StructuringElement> for Kernel {
    fn from(element: StructuringElement) -> Self {
        element.to_kernel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(kernel: &Kernel) -> Vec<u8> {
        kernel.weights().iter().map(|&w| (w > 0.0) as u8).collect()
    }

    #[test]
    fn test_box_element() {
        let kernel = StructuringElement::Box {
            x_radius: 2,
            y_radius: 1,
        }
        .to_kernel();
        assert_eq!(kernel.width(), 5);
        assert_eq!(kernel.height(), 3);
        assert!(kernel.weights().iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_cross_element() {
        let kernel = StructuringElement::Cross { radius: 1 }.to_kernel();
        #[rustfmt::skip]
        assert_eq!(
            mask(&kernel),
            vec![
                0, 1, 0,
                1, 1, 1,
                0, 1, 0,
            ]
        );
    }

    #[test]
    fn test_ellipse_element() {
        let kernel = StructuringElement::Ellipse {
            x_radius: 2,
            y_radius: 2,
        }
        .to_kernel();
        #[rustfmt::skip]
        assert_eq!(
            mask(&kernel),
            vec![
                0, 1, 1, 1, 0,
                1, 1, 1, 1, 1,
                1, 1, 1, 1, 1,
                1, 1, 1, 1, 1,
                0, 1, 1, 1, 0,
            ]
        );
    }

    #[test]
    fn test_element_radius() {
        assert_eq!(StructuringElement::default().radius(), (1, 1));
        assert_eq!(StructuringElement::Cross { radius: 3 }.radius(), (3, 3));
        let kernel: Kernel = StructuringElement::Ellipse {
            x_radius: 3,
            y_radius: 0,
        }
        .into();
        assert_eq!((kernel.x_radius(), kernel.y_radius()), (3, 0));
        assert_eq!(kernel.included_count(), 7);
    }
}
