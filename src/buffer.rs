/// Readable bytes of one frame plane, with a movable read cursor.
///
/// Producers may hand a plane over with the cursor anywhere, so readers that
/// want the whole plane must [`rewind`](PlaneBuffer::rewind) first.
pub trait PlaneBuffer {
    /// Bytes between the cursor and the end of the plane.
    fn remaining(&self) -> usize;

    /// Move the cursor back to the first byte.
    fn rewind(&mut self);

    /// Read everything from the cursor to the end, leaving the cursor at the end.
    fn read_remaining(&mut self) -> &[u8];
}

/// A [`PlaneBuffer`] over borrowed memory.
#[derive(Debug, Clone)]
pub struct SlicePlane<'a> {
    data: &'a [u8],
    position: usize,
    bytes_per_row: usize,
}

impl<'a> SlicePlane<'a> {
    /// A plane with a single row spanning all of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_stride(data, data.len())
    }

    pub fn with_stride(data: &'a [u8], bytes_per_row: usize) -> Self {
        SlicePlane {
            data,
            position: 0,
            bytes_per_row,
        }
    }

    /// Total plane length in bytes, independent of the cursor.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Move the cursor forward, stopping at the end of the plane.
    pub fn advance(&mut self, n: usize) {
        self.position = self.position.saturating_add(n).min(self.data.len());
    }
}

impl PlaneBuffer for SlicePlane<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn rewind(&mut self) {
        self.position = 0;
    }

    fn read_remaining(&mut self) -> &[u8] {
        let start = self.position;
        self.position = self.data.len();
        &self.data[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_remaining_consumes_from_cursor() {
        let bytes = [1u8, 2, 3, 4];
        let mut plane = SlicePlane::new(&bytes);
        plane.advance(1);
        assert_eq!(plane.remaining(), 3);
        assert_eq!(plane.read_remaining(), &[2, 3, 4]);
        assert_eq!(plane.remaining(), 0);
        assert!(plane.read_remaining().is_empty());
    }

    #[test]
    fn advance_saturates_and_rewind_resets() {
        let bytes = [7u8; 5];
        let mut plane = SlicePlane::new(&bytes);
        plane.advance(usize::MAX);
        assert_eq!(plane.position(), 5);
        plane.rewind();
        assert_eq!(plane.position(), 0);
        assert_eq!(plane.remaining(), plane.len());
    }
}
