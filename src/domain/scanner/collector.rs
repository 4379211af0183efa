use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::domain::scanner::key_event::{Key, KeyInput};
use crate::domain::value_objects::Barcode;

/// Reassembles bursts of key events from a hardware scanner into complete
/// barcodes, independent of whatever element has keyboard focus.
///
/// Timing is injected through the `now` arguments, so the machine is
/// deterministic under test; an async driver owns the actual timer.
#[derive(Debug)]
pub struct ScanCollector {
    buffer: String,
    deadline: Option<Instant>,
    debounce_window: Duration,
    busy: bool,
    deferred: VecDeque<Barcode>,
}

impl ScanCollector {
    pub fn new(debounce_window: Duration) -> Self {
        Self {
            buffer: String::new(),
            deadline: None,
            debounce_window,
            busy: false,
            deferred: VecDeque::new(),
        }
    }

    /// Feed one key event. Returns a completed barcode when the event
    /// finishes a scan (Enter with a non-empty buffer) and no ingestion is
    /// in flight.
    pub fn handle_key(&mut self, input: KeyInput, now: Instant) -> Option<Barcode> {
        if input.from_text_input {
            return None;
        }

        match input.key {
            Key::Char(c) => {
                self.buffer.push(c);
                self.deadline = Some(now + self.debounce_window);
                None
            }
            Key::Enter => self.flush(),
            Key::Other => None,
        }
    }

    /// Flush the buffer if the debounce window has elapsed. The async driver
    /// calls this when the deadline reported by [`next_deadline`] fires.
    ///
    /// [`next_deadline`]: Self::next_deadline
    pub fn poll_deadline(&mut self, now: Instant) -> Option<Barcode> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// When the next debounce flush is due, if any characters are buffered.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Mark an ingestion as in flight. While busy, completed scans are
    /// deferred in arrival order instead of being emitted.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Next scan completed while an ingestion was in flight. Yields nothing
    /// while still busy, so a deferred scan cannot be double-submitted.
    pub fn pop_deferred(&mut self) -> Option<Barcode> {
        if self.busy {
            return None;
        }
        self.deferred.pop_front()
    }

    fn flush(&mut self) -> Option<Barcode> {
        let raw = std::mem::take(&mut self.buffer);
        self.deadline = None;

        let barcode = Barcode::new(raw).ok()?;
        if self.busy {
            self.deferred.push_back(barcode);
            None
        } else {
            Some(barcode)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(150);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_flushes_once_after_quiet_window() {
        let mut collector = ScanCollector::new(WINDOW);
        let start = Instant::now();

        assert!(collector.handle_key(KeyInput::char('A'), start).is_none());
        assert!(collector
            .handle_key(KeyInput::char('B'), start + ms(40))
            .is_none());
        assert!(collector
            .handle_key(KeyInput::char('C'), start + ms(80))
            .is_none());

        // Window is measured from the last keystroke.
        assert!(collector.poll_deadline(start + ms(150)).is_none());

        let flushed = collector.poll_deadline(start + ms(280)).unwrap();
        assert_eq!(flushed.as_str(), "ABC");

        // Buffer is back to idle: nothing further to flush.
        assert!(collector.poll_deadline(start + ms(500)).is_none());
        assert!(collector.next_deadline().is_none());
    }

    #[test]
    fn enter_flushes_immediately() {
        let mut collector = ScanCollector::new(WINDOW);
        let start = Instant::now();

        collector.handle_key(KeyInput::char('A'), start);
        collector.handle_key(KeyInput::char('B'), start + ms(10));
        collector.handle_key(KeyInput::char('C'), start + ms(20));

        let flushed = collector
            .handle_key(KeyInput::enter(), start + ms(25))
            .unwrap();
        assert_eq!(flushed.as_str(), "ABC");
    }

    #[test]
    fn enter_with_empty_buffer_emits_nothing() {
        let mut collector = ScanCollector::new(WINDOW);
        assert!(collector
            .handle_key(KeyInput::enter(), Instant::now())
            .is_none());
    }

    #[test]
    fn whitespace_only_burst_is_discarded() {
        let mut collector = ScanCollector::new(WINDOW);
        let start = Instant::now();

        collector.handle_key(KeyInput::char(' '), start);
        assert!(collector.handle_key(KeyInput::enter(), start).is_none());
        assert!(collector.next_deadline().is_none());
    }

    #[test]
    fn events_from_text_inputs_are_ignored() {
        let mut collector = ScanCollector::new(WINDOW);
        let start = Instant::now();

        collector.handle_key(KeyInput::typed_into_field(Key::Char('X')), start);
        collector.handle_key(KeyInput::char('A'), start + ms(5));
        collector.handle_key(KeyInput::typed_into_field(Key::Enter), start + ms(10));

        // The field's Enter must not flush the scanner buffer.
        assert!(collector.next_deadline().is_some());

        let flushed = collector
            .handle_key(KeyInput::enter(), start + ms(20))
            .unwrap();
        assert_eq!(flushed.as_str(), "A");
    }

    #[test]
    fn scans_during_ingestion_are_deferred_not_dropped() {
        let mut collector = ScanCollector::new(WINDOW);
        let start = Instant::now();

        collector.set_busy(true);

        collector.handle_key(KeyInput::char('1'), start);
        assert!(collector.handle_key(KeyInput::enter(), start).is_none());

        collector.handle_key(KeyInput::char('2'), start + ms(5));
        assert!(collector
            .handle_key(KeyInput::enter(), start + ms(5))
            .is_none());

        // Still busy: nothing is released.
        assert!(collector.pop_deferred().is_none());

        collector.set_busy(false);
        assert_eq!(collector.pop_deferred().unwrap().as_str(), "1");
        assert_eq!(collector.pop_deferred().unwrap().as_str(), "2");
        assert!(collector.pop_deferred().is_none());
    }

    #[test]
    fn debounce_flush_is_also_deferred_while_busy() {
        let mut collector = ScanCollector::new(WINDOW);
        let start = Instant::now();

        collector.set_busy(true);
        collector.handle_key(KeyInput::char('Z'), start);
        assert!(collector.poll_deadline(start + ms(200)).is_none());

        collector.set_busy(false);
        assert_eq!(collector.pop_deferred().unwrap().as_str(), "Z");
    }
}
