use crate::sample::Timestamp;

/// Fixed-size ring buffer resampled onto a regular time grid.
///
/// Gaps are filled by repeating the newest value, so the buffer stays full
/// under irregular sensor rates.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    slots: Vec<f64>,
    next_pos: usize,
    len: usize,
    step: i64,
    last_timestamp: Option<Timestamp>,
}

impl SampleWindow {
    /// Create a window of `capacity` slots spaced `step` nanoseconds apart
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `step` is zero
    #[must_use]
    pub fn new(capacity: usize, step: i64) -> Self {
        assert!(capacity > 0, "Window capacity must be greater than 0");
        assert!(step > 0, "Window step must be positive, got {}", step);
        Self {
            slots: vec![0.0; capacity],
            next_pos: 0,
            len: 0,
            step,
            last_timestamp: None,
        }
    }

    /// Add a sample, inserting one copy per elapsed grid step.
    ///
    /// Returns the number of slots written.
    pub fn push(&mut self, timestamp: Timestamp, value: f64) -> usize {
        let Some(last) = self.last_timestamp else {
            self.last_timestamp = Some(timestamp);
            self.insert(value);
            return 1;
        };

        let elapsed = timestamp.saturating_sub(last);
        if elapsed <= self.step {
            return 0;
        }

        // Steps until `timestamp - last <= step`
        let steps = (elapsed - 1) / self.step;
        let writes = usize::try_from(steps).map_or(self.capacity(), |s| s.min(self.capacity()));
        for _ in 0..writes {
            self.insert(value);
        }
        self.last_timestamp = Some(last.saturating_add(steps.saturating_mul(self.step)));
        writes
    }

    fn insert(&mut self, value: f64) {
        self.slots[self.next_pos] = value;
        self.next_pos = (self.next_pos + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
    }

    /// Number of slots in the window
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently filled
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Most recently written value
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        if self.len == 0 {
            return None;
        }
        let cap = self.slots.len();
        Some(self.slots[(self.next_pos + cap - 1) % cap])
    }

    /// Filled slots, oldest first
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let cap = self.slots.len();
        let start = (self.next_pos + cap - self.len) % cap;
        (0..self.len).map(move |i| self.slots[(start + i) % cap])
    }

    /// Forget all samples and the grid clock
    pub fn clear(&mut self) {
        self.next_pos = 0;
        self.len = 0;
        self.last_timestamp = None;
    }
}

/// Min/max of a run of samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Extent of an iterator, `None` if empty
    pub fn of(mut values: impl Iterator<Item = f64>) -> Option<Self> {
        let first = values.next()?;
        Some(values.fold(Self { min: first, max: first }, |e, v| Self {
            min: e.min.min(v),
            max: e.max.max(v),
        }))
    }

    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}
