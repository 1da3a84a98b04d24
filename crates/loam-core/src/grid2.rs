use ndshape::{RuntimeShape, Shape};
use std::ops::{Index, IndexMut};

/// An owned 2D array with a shape chosen at runtime. Use [`Index`] and [`IndexMut`] to access values with `[u32; 2]`
/// coordinates, X first.
///
/// Values are laid out with X varying fastest, i.e. `index = y * size_x + x`.
#[derive(Clone)]
pub struct Grid2<T> {
    values: Vec<T>,
    shape: RuntimeShape<u32, 2>,
}

impl<T> Grid2<T> {
    pub fn fill(dims: [u32; 2], value: T) -> Self
    where
        T: Clone,
    {
        let shape = RuntimeShape::<u32, 2>::new(dims);
        Self {
            values: vec![value; shape.size() as usize],
            shape,
        }
    }

    pub fn from_fn(dims: [u32; 2], mut f: impl FnMut([u32; 2]) -> T) -> Self {
        let shape = RuntimeShape::<u32, 2>::new(dims);
        let values = (0..shape.size()).map(|i| f(shape.delinearize(i))).collect();
        Self { values, shape }
    }

    /// Returns `None` if `values` does not hold exactly `dims[0] * dims[1]` elements.
    pub fn from_vec(dims: [u32; 2], values: Vec<T>) -> Option<Self> {
        let shape = RuntimeShape::<u32, 2>::new(dims);
        (values.len() == shape.size() as usize).then(|| Self { values, shape })
    }

    #[inline]
    pub fn dims(&self) -> [u32; 2] {
        self.shape.as_array()
    }

    #[inline]
    pub fn size_x(&self) -> u32 {
        self.dims()[0]
    }

    #[inline]
    pub fn size_y(&self) -> u32 {
        self.dims()[1]
    }

    #[inline]
    pub fn contains(&self, [x, y]: [i64; 2]) -> bool {
        let [sx, sy] = self.dims();
        x >= 0 && y >= 0 && x < sx as i64 && y < sy as i64
    }

    #[inline]
    pub fn get(&self, [x, y]: [i64; 2]) -> Option<&T> {
        self.contains([x, y])
            .then(|| &self.values[self.linearize([x as u32, y as u32])])
    }

    #[inline]
    pub fn linearize(&self, p: [u32; 2]) -> usize {
        self.shape.linearize(p) as usize
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Overwrite every value with `value`.
    pub fn set_all(&mut self, value: T)
    where
        T: Clone,
    {
        self.values.fill(value);
    }
}

impl<T: PartialEq> PartialEq for Grid2<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dims() == other.dims() && self.values == other.values
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Grid2<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid2")
            .field("values", &self.values)
            .field("dims", &self.dims())
            .finish()
    }
}

impl<T> Index<[u32; 2]> for Grid2<T> {
    type Output = T;

    #[inline]
    fn index(&self, p: [u32; 2]) -> &Self::Output {
        self.values.index(self.linearize(p))
    }
}

impl<T> IndexMut<[u32; 2]> for Grid2<T> {
    #[inline]
    fn index_mut(&mut self, p: [u32; 2]) -> &mut Self::Output {
        let i = self.linearize(p);
        self.values.index_mut(i)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
