use crate::ids::Lamport;

/// Pluggable clock so a replica can use Lamport, Hybrid Logical Clock, or custom time strategies.
pub trait Clock {
    /// Advance and return the next local time.
    fn tick(&mut self) -> Lamport;
    /// Fold in a time seen on a remote move so later local moves sort after it.
    fn observe(&mut self, external: Lamport);
    fn now(&self) -> Lamport;
}

/// Basic Lamport clock implementation useful for tests and default flows.
#[derive(Clone, Debug, Default)]
pub struct LamportClock {
    counter: Lamport,
}

impl LamportClock {
    pub fn starting_at(counter: Lamport) -> Self {
        Self { counter }
    }
}

impl Clock for LamportClock {
    fn tick(&mut self) -> Lamport {
        self.counter += 1;
        self.counter
    }

    fn observe(&mut self, external: Lamport) {
        self.counter = self.counter.max(external);
    }

    fn now(&self) -> Lamport {
        self.counter
    }
}
