use core::borrow::Borrow;

/// A helper type that makes indexed vertex access easier (the equivalent of drawing with an element buffer).
///
/// Iterating yields references to the vertices named by each index, in index order.
#[derive(Copy, Clone, Debug)]
pub struct IndexedVertices<'a, Is, V> {
    indices: Is,
    vertices: &'a [V],
}

impl<'a, Is, V> IndexedVertices<'a, Is, V> {
    pub fn new(indices: Is, vertices: &'a [V]) -> Self {
        Self { indices, vertices }
    }
}

impl<'a, Is, V> IntoIterator for IndexedVertices<'a, Is, V>
where
    Is: IntoIterator,
    Is::Item: Borrow<usize>,
{
    type Item = &'a V;
    type IntoIter = IndexedIter<'a, Is::IntoIter, V>;

    fn into_iter(self) -> Self::IntoIter {
        IndexedIter {
            indices: self.indices.into_iter(),
            vertices: self.vertices,
        }
    }
}

/// Iterator returned by [`IndexedVertices::into_iter`].
pub struct IndexedIter<'a, It, V> {
    indices: It,
    vertices: &'a [V],
}

impl<'a, It, V> Iterator for IndexedIter<'a, It, V>
where
    It: Iterator,
    It::Item: Borrow<usize>,
{
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let i = self.indices.next()?;
        Some(&self.vertices[*i.borrow()])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_index_order() {
        let verts = ['a', 'b', 'c', 'd'];
        let picked: String = IndexedVertices::new([3usize, 1, 1, 0], &verts).into_iter().collect();
        assert_eq!(picked, "dbba");
    }
}
