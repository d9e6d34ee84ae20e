//! Row-band partitioning for the relaxation loops.
//!
//! Each Jacobi iteration reads only the previous iteration's field and
//! writes only the scratch buffer, so rows can be processed in any order.
//! The partitioner splits the scratch buffer into contiguous, disjoint row
//! bands and runs one work unit per band on a worker pool built once at
//! construction, joining before it returns.

/// Row range of band `j` out of `bands`: `⌈height·j/bands⌉ .. ⌈height·(j+1)/bands⌉`.
/// Bands collectively cover `[0, height)` exactly, with no overlap.
pub fn band_bounds(height: usize, bands: usize, j: usize) -> (usize, usize) {
    ((height * j).div_ceil(bands), (height * (j + 1)).div_ceil(bands))
}

pub struct RowPartitioner {
    bands: usize,
    pool: Option<rayon::ThreadPool>,
}

impl RowPartitioner {
    /// Build a partitioner with `workers` bands. With `workers <= 1` the
    /// bands run sequentially on the calling thread; results are identical
    /// either way.
    pub fn new(workers: usize) -> Self {
        let bands = workers.max(1);
        let pool = if workers > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .expect("failed to build worker pool"),
            )
        } else {
            None
        };
        Self { bands, pool }
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Run `work(row_start, row_end, band)` once per band, where `band` is
    /// the destination rows `[row_start, row_end)` as a mutable slice.
    /// Returns only after every band has completed.
    pub fn run<T, F>(&self, dst: &mut [T], width: usize, work: F)
    where
        T: Send,
        F: Fn(usize, usize, &mut [T]) + Sync,
    {
        assert!(width > 0 && dst.len() % width == 0, "dst is not whole rows");
        let height = dst.len() / width;

        match &self.pool {
            Some(pool) => pool.scope(|s| {
                let mut rest = dst;
                for j in 0..self.bands {
                    let (y0, y1) = band_bounds(height, self.bands, j);
                    let (band, tail) =
                        std::mem::take(&mut rest).split_at_mut((y1 - y0) * width);
                    rest = tail;
                    let work = &work;
                    s.spawn(move |_| work(y0, y1, band));
                }
                debug_assert!(rest.is_empty(), "bands must consume every row");
            }),
            None => {
                for j in 0..self.bands {
                    let (y0, y1) = band_bounds(height, self.bands, j);
                    work(y0, y1, &mut dst[y0 * width..y1 * width]);
                }
            }
        }
    }
}
