use super::Coord;

/// Dense row-major storage over a `width x height` box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    data: Box<[T]>,
    width: u16,
    height: u16,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: u16, height: u16, value: T) -> Self {
        let data = vec![value; width as usize * height as usize].into_boxed_slice();
        Grid {
            data,
            width,
            height,
        }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        // Overflow-safe since width and height are u16 (assuming usize is at least 32 bits)
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, coord: Coord) -> Option<&T> {
        self.is_in_bounds(coord)
            .then(|| &self.data[self.ravel_index(coord.0, coord.1)])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut T> {
        if self.is_in_bounds(coord) {
            let idx = self.ravel_index(coord.0, coord.1);
            Some(&mut self.data[idx])
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

impl<T> std::ops::Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, index: Coord) -> &Self::Output {
        assert!(
            self.is_in_bounds(index),
            "grid index {:?} out of bounds",
            index
        );
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

impl<T> std::ops::IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        assert!(
            self.is_in_bounds(index),
            "grid index {:?} out of bounds",
            index
        );
        let idx = self.ravel_index(index.0, index.1);
        &mut self.data[idx]
    }
}
