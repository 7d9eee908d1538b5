use foundation::time::Time;

/// An event together with the host time it was emitted at.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    pub at: Time,
    pub event: E,
}

/// Ordered outbox of typed events.
///
/// Producers push in the order things happen; the host drains once per frame
/// and applies them (camera moves, re-render requests, ...).
#[derive(Debug, Clone)]
pub struct EventBus<E> {
    events: Vec<Stamped<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, at: Time, event: E) {
        self.events.push(Stamped { at, event });
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Time;

    #[test]
    fn records_events_in_order_with_time() {
        let mut bus = EventBus::new();
        bus.emit(Time(2.0), "a");
        bus.emit(Time(1.0), "b");
        let got: Vec<_> = bus.drain().into_iter().map(|e| (e.at, e.event)).collect();
        assert_eq!(got, vec![(Time(2.0), "a"), (Time(1.0), "b")]);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Time::ZERO, 7u32);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.drain().is_empty());
    }
}
