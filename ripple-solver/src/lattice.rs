use std::{
    ops::{
        Index,
        IndexMut,
    },
    slice::ChunksExact,
};

use nalgebra::{
    Point2,
    Vector2,
};

/// Dense 2D array in row-major order: `i` (x index) outer, `j` (y index)
/// inner. This is also the order the per-step snapshot is handed to sinks in.
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice<T> {
    dimensions: Vector2<usize>,
    data: Box<[T]>,
}

impl<T> Lattice<T> {
    pub fn from_element(dimensions: Vector2<usize>, element: T) -> Self
    where
        T: Clone,
    {
        Self {
            dimensions,
            data: vec![element; dimensions.product()].into_boxed_slice(),
        }
    }

    pub fn from_fn(dimensions: Vector2<usize>, mut init: impl FnMut(Point2<usize>) -> T) -> Self {
        let mut data = Vec::with_capacity(dimensions.product());
        for i in 0..dimensions.x {
            for j in 0..dimensions.y {
                data.push(init(Point2::new(i, j)));
            }
        }

        Self {
            dimensions,
            data: data.into_boxed_slice(),
        }
    }

    pub fn dimensions(&self) -> Vector2<usize> {
        self.dimensions
    }

    fn index_of(&self, i: usize, j: usize) -> usize {
        i * self.dimensions.y + j
    }

    pub fn get(&self, point: &Point2<usize>) -> Option<&T> {
        (point.x < self.dimensions.x && point.y < self.dimensions.y)
            .then(|| &self.data[self.index_of(point.x, point.y)])
    }

    pub fn get_mut(&mut self, point: &Point2<usize>) -> Option<&mut T> {
        if point.x < self.dimensions.x && point.y < self.dimensions.y {
            let index = self.index_of(point.x, point.y);
            Some(&mut self.data[index])
        }
        else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn fill(&mut self, element: T)
    where
        T: Clone,
    {
        self.data.fill(element);
    }

    /// Rows of constant `i`, each `ny` long.
    pub fn rows(&self) -> ChunksExact<'_, T> {
        self.data.chunks_exact(self.dimensions.y)
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.dimensions.y)
    }

    #[cfg(feature = "rayon")]
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, T>
    where
        T: Send,
    {
        use rayon::slice::ParallelSliceMut as _;

        self.data.par_chunks_exact_mut(self.dimensions.y)
    }
}

impl<T> Index<(usize, usize)> for Lattice<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[self.index_of(i, j)]
    }
}

impl<T> IndexMut<(usize, usize)> for Lattice<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let index = self.index_of(i, j);
        &mut self.data[index]
    }
}
