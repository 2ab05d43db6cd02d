//! Event types and sinks for observing a placement session.
//!
//! [`SessionEvent`]s are emitted by [`crate::session::PlacementSession::update_with_events`]
//! and delivered to any [`EventSink`]: `()` discards them, [`VecSink`] collects them and
//! [`FnSink`] forwards them to a closure.
use glam::Vec3;

use crate::session::SessionState;

/// Describes what happened during one session cycle.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Emitted when the layout raycast moves the session to a new state.
    StateChanged {
        from: SessionState,
        to: SessionState,
    },

    /// Emitted when the brush radius changes through scrolling or a host command.
    ///
    /// Changes made through [`crate::session::PlacementSession::adjust_radius`] or
    /// [`crate::session::PlacementSession::set_config`] are reported at the start of the
    /// next cycle.
    RadiusChanged { radius: f32 },

    /// Emitted when the sample set is fully regenerated. A host
    /// [`crate::session::PlacementSession::request_refresh`] is reported on the next cycle.
    SamplesRegenerated { count: usize },

    /// Emitted once per commit with the number of placed and skipped samples.
    Committed {
        placed: usize,
        skipped: usize,
        /// Anchor of the brush frame the commit was made from.
        origin: Vec3,
    },

    /// Non-fatal warning (degenerate frame, missing asset).
    Warning {
        /// Context string (e.g. `frame`, `sample:3`).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`SessionEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SessionEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SessionEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SessionEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SessionEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SessionEvent),
{
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default, Debug)]
pub struct VecSink {
    events: Vec<SessionEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<SessionEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Removes and returns all collected events.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SessionEvent> {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_and_drains() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(SessionEvent::RadiusChanged { radius: 1.0 });
        sink.send(SessionEvent::SamplesRegenerated { count: 4 });
        assert_eq!(sink.len(), 2);

        let drained: Vec<_> = sink.drain().collect();
        assert_eq!(drained[1], SessionEvent::SamplesRegenerated { count: 4 });
        assert!(sink.is_empty());
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(SessionEvent::Warning {
            context: "ctx".into(),
            message: "msg".into(),
        });
        assert_eq!(count, 1);
    }
}
