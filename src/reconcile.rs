use crate::types::Mode;

/// Last confirmed logical mode for one projection of device state
/// (current or target). Starts unknown so the first observation
/// establishes a baseline without pretending anything changed.
#[derive(Debug, Default)]
pub(crate) struct ModeCache {
    last: Option<Mode>,
}

impl ModeCache {
    pub fn get(&self) -> Option<Mode> {
        self.last
    }

    /// Record an observed value. Returns `Some((from, to))` only for
    /// a real transition; the first observation and repeats are
    /// silent. Callers must not feed failed-read values in here —
    /// a failed poll leaves the cache untouched by never calling this.
    pub fn observe(&mut self, observed: Mode) -> Option<(Mode, Mode)> {
        match self.last {
            None => {
                self.last = Some(observed);
                None
            }
            Some(prev) if prev != observed => {
                self.last = Some(observed);
                Some((prev, observed))
            }
            Some(_) => None,
        }
    }
}
