//! Grow-only scratch buffer

/// Byte buffer whose capacity only ever increases
///
/// `ensure_capacity` is the single way to resize. When a larger size is
/// requested the old allocation is released and a new one of exactly the
/// requested size takes its place; smaller requests reuse what is there.
#[derive(Default)]
pub struct ScratchBuffer {
    data: Box<[u8]>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make room for at least `required` bytes. Returns true if it reallocated.
    pub fn ensure_capacity(&mut self, required: usize) -> bool {
        if required <= self.data.len() {
            return false;
        }

        log::trace!(
            "[obs-ndi] growing audio scratch {} -> {} bytes",
            self.data.len(),
            required
        );
        // Old contents are not carried over
        self.data = vec![0u8; required].into_boxed_slice();
        true
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl std::fmt::Debug for ScratchBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("capacity", &self.capacity())
            .finish()
    }
}
