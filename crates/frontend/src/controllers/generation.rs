/// Issue number of a request. Only the latest issued one may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn next(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }

    pub fn current(&self) -> Generation {
        Generation(self.current)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }

    /// Makes every outstanding generation stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_is_current() {
        let mut counter = GenerationCounter::default();
        let a = counter.next();
        let b = counter.next();
        assert!(!counter.is_current(a));
        assert!(counter.is_current(b));

        counter.invalidate();
        assert!(!counter.is_current(b));
    }
}
