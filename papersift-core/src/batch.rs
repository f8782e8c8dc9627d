/// Splits `items` into consecutive chunks of `size`, preserving order.
///
/// The last chunk may be shorter. A `size` of zero is treated as one.
pub fn batched<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSizing {
    pub base: usize,
    pub adaptive: bool,
    pub threshold: usize,
}

impl BatchSizing {
    pub fn fixed(base: usize) -> Self {
        Self {
            base,
            adaptive: false,
            threshold: 0,
        }
    }

    /// Grows the base size logarithmically once `count` passes the threshold.
    pub fn scale_factor(&self, count: usize) -> usize {
        if !self.adaptive || self.threshold == 0 || count <= self.threshold {
            return 1;
        }
        let ratio = count as f64 / self.threshold as f64;
        (ratio.log2() + 1.0).ceil() as usize
    }

    pub fn size_for(&self, count: usize) -> usize {
        let size = self.base.max(1) * self.scale_factor(count);
        tracing::debug!(
            base = self.base,
            scale_factor = self.scale_factor(count),
            size,
            "resolved batch size"
        );
        size
    }
}
