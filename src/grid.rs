use crate::math::CellValue;

/// Floor modulo: the residue is always in `[0, n)`, so `floor_mod(-1, n)`
/// is `n - 1` rather than `-1`.
#[inline(always)]
pub fn floor_mod(m: i32, n: i32) -> i32 {
    if m >= 0 {
        m % n
    } else {
        m % n + n
    }
}

/// Whether checked accessors verify coordinates before indexing.
///
/// `Checked` panics with the offending coordinates on out-of-range access —
/// that is an addressing bug, not a recoverable condition. `Relaxed` skips
/// the diagnostic check; indexing stays memory-safe via the slice bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsPolicy {
    Checked,
    Relaxed,
}

/// Dense width×height grid of cell values, zero-initialized.
///
/// Two addressing modes: `get`/`set` are bounds-checked per the grid's
/// `BoundsPolicy`, `get_wrapped` treats the grid as a torus and never fails.
/// `swap` exchanges backing stores between equal-shape grids in O(1), which
/// is how every solver stage double-buffers.
pub struct Grid<T> {
    width: usize,
    height: usize,
    items: Vec<T>,
    bounds: BoundsPolicy,
}

impl<T: CellValue> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_policy(width, height, BoundsPolicy::Checked)
    }

    pub fn with_policy(width: usize, height: usize, bounds: BoundsPolicy) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            items: vec![T::default(); width * height],
            bounds,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    fn check(&self, x: i32, y: i32) {
        if self.bounds == BoundsPolicy::Checked
            && !(x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height)
        {
            panic!(
                "position ({}, {}) is outside of width {} and height {}",
                x, y, self.width, self.height
            );
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> T {
        self.check(x, y);
        self.items[y as usize * self.width + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, val: T) {
        self.check(x, y);
        self.items[y as usize * self.width + x as usize] = val;
    }

    /// Toroidal accessor: coordinates wrap via floor modulo, so any `i32`
    /// pair resolves to a cell.
    #[inline]
    pub fn get_wrapped(&self, x: i32, y: i32) -> T {
        let xw = floor_mod(x, self.width as i32) as usize;
        let yw = floor_mod(y, self.height as i32) as usize;
        self.items[yw * self.width + xw]
    }

    /// Exchange backing stores with another grid of identical shape, without
    /// copying elements.
    pub fn swap(&mut self, other: &mut Grid<T>) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "cannot swap grids of different shapes"
        );
        std::mem::swap(&mut self.items, &mut other.items);
    }

    pub fn fill(&mut self, val: T) {
        self.items.fill(val);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }
}
