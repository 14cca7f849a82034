use crate::texture::{Target, Texture};
use core::cell::UnsafeCell;

/// An owned, row-major grid of texels: a texture, a colour buffer or a depth buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Buffer2d<T> {
    size: [usize; 2],
    items: Vec<T>,
}

impl<T> Buffer2d<T> {
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn fill(size: [usize; 2], item: T) -> Self
    where
        T: Clone,
    {
        let len = size[0]
            .checked_mul(size[1])
            .unwrap_or_else(|| panic!("buffer of size {:?} is too large", size));
        Self {
            size,
            items: vec![item; len],
        }
    }

    /// Change the size to `size` and fill every texel with `item`.
    ///
    /// The allocation is kept when the size does not change, so calling this once per frame is cheap.
    pub fn resize(&mut self, size: [usize; 2], item: T)
    where
        T: Clone,
    {
        if size == self.size {
            self.items.fill(item);
        } else {
            *self = Self::fill(size, item);
        }
    }

    #[inline(always)]
    fn offset(&self, [x, y]: [usize; 2]) -> usize {
        y * self.size[0] + x
    }

    #[inline(always)]
    fn in_bounds(&self, [x, y]: [usize; 2]) -> bool {
        x < self.size[0] && y < self.size[1]
    }

    /// All texels, row after row.
    pub fn raw(&self) -> &[T] {
        &self.items
    }

    pub fn raw_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get_mut(&mut self, index: [usize; 2]) -> &mut T {
        if !self.in_bounds(index) {
            panic!("index {:?} is outside a buffer of size {:?}", index, self.size);
        }
        let offset = self.offset(index);
        &mut self.items[offset]
    }

    /// Pointer to a texel that may be written through a shared reference.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds.
    #[inline(always)]
    unsafe fn cell(&self, index: [usize; 2]) -> *mut T {
        let item = self.items.get_unchecked(self.offset(index)) as *const T as *const UnsafeCell<T>;
        (*item).get()
    }
}

impl<T: Clone> Texture for Buffer2d<T> {
    type Texel = T;

    #[inline]
    fn size(&self) -> [usize; 2] {
        self.size
    }

    #[inline]
    fn read(&self, index: [usize; 2]) -> T {
        if !self.in_bounds(index) {
            panic!("index {:?} is outside a buffer of size {:?}", index, self.size);
        }
        self.items[self.offset(index)].clone()
    }

    #[inline]
    unsafe fn read_unchecked(&self, index: [usize; 2]) -> T {
        self.items.get_unchecked(self.offset(index)).clone()
    }
}

impl<T: Clone> Target for Buffer2d<T> {
    #[inline]
    unsafe fn read_exclusive_unchecked(&self, x: usize, y: usize) -> T {
        (*self.cell([x, y])).clone()
    }

    #[inline]
    unsafe fn write_exclusive_unchecked(&self, x: usize, y: usize, texel: T) {
        *self.cell([x, y]) = texel;
    }

    #[inline]
    fn write(&mut self, x: usize, y: usize, texel: T) {
        if self.in_bounds([x, y]) {
            let offset = self.offset([x, y]);
            self.items[offset] = texel;
        }
    }

    #[inline]
    fn clear(&mut self, texel: T) {
        self.items.fill(texel);
    }
}
