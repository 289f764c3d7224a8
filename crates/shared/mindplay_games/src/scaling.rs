//! Level-driven difficulty scaling shared by every variant.

/// Shortest reveal window, in seconds.
pub const MIN_DISPLAY_SECONDS: u32 = 3;

/// Response window for pattern-completion rounds, in seconds.
pub const PATTERN_RESPONSE_SECONDS: u32 = 30;

/// Item-count rule `(base, cap)` for one kind of stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRule {
    pub base: u32,
    pub cap: u32,
}

impl CountRule {
    pub const fn new(base: u32, cap: u32) -> Self {
        Self { base, cap }
    }

    /// `min(base + floor(level / 2), cap)`.
    pub fn count(self, level: u32) -> usize {
        (self.base.saturating_add(level / 2)).min(self.cap) as usize
    }
}

pub const OBJECT_PAIRS: CountRule = CountRule::new(3, 5);
pub const RECALL_NUMBERS: CountRule = CountRule::new(3, 6);
pub const SEQUENCE_ITEMS: CountRule = CountRule::new(4, 8);
pub const SYMBOLS: CountRule = CountRule::new(4, 8);
pub const PATTERN_TERMS: CountRule = CountRule::new(5, 8);

/// Reveal time for a level: `ceil(max(3, 8 - level * 0.3))` seconds.
pub fn display_seconds(level: u32) -> u32 {
    let secs = (8.0 - f64::from(level) * 0.3).max(f64::from(MIN_DISPLAY_SECONDS));
    secs.ceil() as u32
}
