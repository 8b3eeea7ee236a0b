use granula_image::{ImageError, Pixel, RasterBuffer};

/// An inclusive axis-aligned rectangle in pixel coordinates.
///
/// `top` is the smallest row index, so `top <= bottom` and `left <= right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Leftmost column.
    pub left: usize,
    /// Topmost row.
    pub top: usize,
    /// Rightmost column.
    pub right: usize,
    /// Bottommost row.
    pub bottom: usize,
}

impl Rect {
    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    /// Whether `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }

    fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Statistics of one 8-connected foreground region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlobInfo {
    /// Minimal bounding rectangle.
    pub rect: Rect,
    /// Number of pixels.
    pub area: usize,
    /// Mean column, truncated.
    pub center_x: usize,
    /// Mean row, truncated.
    pub center_y: usize,
}

/// Which pixel values count as background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    /// Zero is background; any non-zero value is a particle.
    #[default]
    WhiteOnBlack,
    /// Non-zero is background; zero pixels are particles.
    BlackOnWhite,
}

impl Polarity {
    #[inline]
    fn is_particle<T: Pixel>(&self, v: T) -> bool {
        match self {
            Polarity::WhiteOnBlack => v.is_foreground(),
            Polarity::BlackOnWhite => !v.is_foreground(),
        }
    }
}

/// A maximal horizontal span of particle pixels `[start, end]` on one row.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    end: usize,
    blob: usize,
}

impl Run {
    fn len(&self) -> u64 {
        (self.end - self.start + 1) as u64
    }

    /// Sum of the column indices covered by the run.
    fn sum_x(&self) -> u64 {
        (self.start + self.end) as u64 * self.len() / 2
    }

    /// 8-connected: the runs overlap or touch diagonally on adjacent rows.
    fn touches(&self, prev: &Run) -> bool {
        self.end + 1 >= prev.start && self.start <= prev.end + 1
    }
}

/// A union-find node carrying the accumulated statistics of its tree.
#[derive(Debug, Clone)]
struct Blob {
    rect: Rect,
    area: u64,
    sum_x: u64,
    sum_y: u64,
    rank: u32,
    parent: usize,
    /// Index of the earliest blob merged into this tree.
    first: usize,
}

/// Arena of blobs addressed by index; merged blobs stay in the pool as non-roots.
#[derive(Debug, Default)]
struct BlobPool {
    blobs: Vec<Blob>,
    live: usize,
}

impl BlobPool {
    fn new_blob(&mut self, run: &Run, y: usize) -> usize {
        let id = self.blobs.len();
        self.blobs.push(Blob {
            rect: Rect {
                left: run.start,
                top: y,
                right: run.end,
                bottom: y,
            },
            area: run.len(),
            sum_x: run.sum_x(),
            sum_y: y as u64 * run.len(),
            rank: 0,
            parent: id,
            first: id,
        });
        self.live += 1;
        id
    }

    /// Root of `id`, hanging every node on the path directly off the root.
    fn find(&mut self, id: usize) -> usize {
        let mut root = id;
        while self.blobs[root].parent != root {
            root = self.blobs[root].parent;
        }

        let mut node = id;
        while self.blobs[node].parent != root {
            let next = self.blobs[node].parent;
            self.blobs[node].parent = root;
            node = next;
        }

        root
    }

    /// Merge the trees of two roots by rank; returns the surviving root.
    fn union(&mut self, a: usize, b: usize) -> usize {
        if a == b {
            return a;
        }

        let (root, child) = if self.blobs[a].rank < self.blobs[b].rank {
            (b, a)
        } else {
            (a, b)
        };
        if self.blobs[root].rank == self.blobs[child].rank {
            self.blobs[root].rank += 1;
        }

        let merged = self.blobs[child].clone();
        let r = &mut self.blobs[root];
        r.rect = r.rect.union(&merged.rect);
        r.area += merged.area;
        r.sum_x += merged.sum_x;
        r.sum_y += merged.sum_y;
        r.first = r.first.min(merged.first);
        self.blobs[child].parent = root;
        self.live -= 1;

        log::trace!("merged blob {child} into {root}");

        root
    }

    /// Add the pixels of `run` on row `y` to the root `root`.
    fn absorb(&mut self, root: usize, run: &Run, y: usize) {
        let blob = &mut self.blobs[root];
        blob.rect = blob.rect.union(&Rect {
            left: run.start,
            top: y,
            right: run.end,
            bottom: y,
        });
        blob.area += run.len();
        blob.sum_x += run.sum_x();
        blob.sum_y += y as u64 * run.len();
    }

    fn is_root(&self, id: usize) -> bool {
        self.blobs[id].parent == id
    }

    /// Roots ordered by the first sighting of their particle.
    fn roots(&self) -> Vec<usize> {
        let mut roots = (0..self.blobs.len())
            .filter(|&id| self.is_root(id))
            .collect::<Vec<_>>();
        roots.sort_unstable_by_key(|&id| self.blobs[id].first);
        roots
    }
}

/// The maximal particle runs of one row, left to right.
fn row_runs<T: Pixel>(row: &[T], polarity: Polarity, runs: &mut Vec<Run>) {
    runs.clear();
    let mut x = 0;
    while x < row.len() {
        if !polarity.is_particle(row[x]) {
            x += 1;
            continue;
        }
        let start = x;
        while x + 1 < row.len() && polarity.is_particle(row[x + 1]) {
            x += 1;
        }
        runs.push(Run {
            start,
            end: x,
            blob: usize::MAX,
        });
        x += 1;
    }
}

/// Run the single top-to-bottom scan, handing each row's runs to `on_row` once they own a blob.
fn scan<T: Pixel>(
    src: &RasterBuffer<T>,
    polarity: Polarity,
    mut on_row: impl FnMut(usize, &[Run]),
) -> Result<BlobPool, ImageError> {
    if src.size().is_empty() {
        return Err(ImageError::InvalidParameter(format!(
            "cannot extract particles from an empty image ({})",
            src.size()
        )));
    }

    let mut pool = BlobPool::default();
    let mut prev: Vec<Run> = Vec::new();
    let mut curr: Vec<Run> = Vec::new();
    let mut run_count = 0;

    for y in 0..src.height() {
        row_runs(src.row(y), polarity, &mut curr);
        run_count += curr.len();

        for run in curr.iter_mut() {
            let mut owner: Option<usize> = None;

            for p in prev.iter() {
                if p.start > run.end + 1 {
                    break;
                }
                if !run.touches(p) {
                    continue;
                }

                let other = pool.find(p.blob);
                owner = Some(match owner {
                    None => {
                        pool.absorb(other, run, y);
                        other
                    }
                    Some(mine) => {
                        let mine = pool.find(mine);
                        pool.union(mine, other)
                    }
                });
            }

            run.blob = match owner {
                Some(root) => root,
                None => pool.new_blob(run, y),
            };
        }

        on_row(y, &curr);
        std::mem::swap(&mut prev, &mut curr);
    }

    log::debug!(
        "particle scan: {} runs, {} blobs created, {} after merging",
        run_count,
        pool.blobs.len(),
        pool.live
    );

    Ok(pool)
}

/// Extract the 8-connected particles of a binary image.
///
/// A single top-to-bottom pass splits every row into runs of particle pixels. A run touching
/// runs of the previous row (sharing a column or a corner) joins their blob, merging distinct
/// blobs through union-find; other runs start new blobs.
///
/// # Arguments
///
/// * `src` - The binary source image.
/// * `polarity` - Which pixel values are particles.
///
/// # Returns
///
/// One [`BlobInfo`] per particle, in the order the particles were first seen (top to bottom,
/// then left to right).
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if the image has zero width or height.
///
/// # Example
///
/// ```rust
/// use granula_image::{ImageSize, RasterBuffer};
/// use granula_imgproc::particles::{particle_info, Polarity};
///
/// let src = RasterBuffer::new(ImageSize { width: 3, height: 2 }, vec![1u8, 0, 1, 0, 1, 0]).unwrap();
/// let blobs = particle_info(&src, Polarity::WhiteOnBlack).unwrap();
///
/// assert_eq!(blobs.len(), 1);
/// assert_eq!(blobs[0].area, 3);
/// ```
pub fn particle_info<T: Pixel>(
    src: &RasterBuffer<T>,
    polarity: Polarity,
) -> Result<Vec<BlobInfo>, ImageError> {
    let pool = scan(src, polarity, |_, _| {})?;

    let blobs = pool
        .roots()
        .into_iter()
        .map(|id| {
            let blob = &pool.blobs[id];
            BlobInfo {
                rect: blob.rect,
                area: blob.area as usize,
                center_x: (blob.sum_x / blob.area) as usize,
                center_y: (blob.sum_y / blob.area) as usize,
            }
        })
        .collect::<Vec<_>>();

    log::debug!("particle info: {} particles", blobs.len());

    Ok(blobs)
}

/// Label the 8-connected particles of a binary image.
///
/// Background pixels get label 0; particle pixels get `1 + i` where `i` is the index of their
/// particle in the [`particle_info`] output.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if the image has zero width or height.
pub fn label_particles<T: Pixel>(
    src: &RasterBuffer<T>,
    polarity: Polarity,
) -> Result<RasterBuffer<u32>, ImageError> {
    let mut runs_per_row: Vec<Vec<Run>> = Vec::with_capacity(src.height());
    let mut pool = scan(src, polarity, |_, runs| runs_per_row.push(runs.to_vec()))?;

    let mut labels = vec![0u32; pool.blobs.len()];
    for (i, root) in pool.roots().into_iter().enumerate() {
        labels[root] = i as u32 + 1;
    }

    let mut dst = RasterBuffer::from_size_val(src.size(), 0u32)?;
    for (y, runs) in runs_per_row.iter().enumerate() {
        let row = dst.row_mut(y);
        for run in runs {
            let root = pool.find(run.blob);
            row[run.start..=run.end].fill(labels[root]);
        }
    }

    Ok(dst)
}
