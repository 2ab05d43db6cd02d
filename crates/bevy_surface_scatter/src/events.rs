use bevy::prelude::*;
use surface_scatter::session::events::{EventSink, SessionEvent};

/// Bevy message carrying one [`SessionEvent`] from the brush.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct ScatterBrushMessage {
    pub event: SessionEvent,
}

/// Event sink writing session events straight into the brush message queue.
pub struct MessageSink<'a> {
    pub messages: &'a mut Messages<ScatterBrushMessage>,
}

impl EventSink for MessageSink<'_> {
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        self.messages.write(ScatterBrushMessage { event });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_events_as_messages() {
        let mut messages = Messages::<ScatterBrushMessage>::default();
        let mut sink = MessageSink {
            messages: &mut messages,
        };
        sink.send(SessionEvent::RadiusChanged { radius: 1.5 });
        sink.send(SessionEvent::SamplesRegenerated { count: 8 });

        let drained: Vec<_> = messages.drain().collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(
            drained[0].event,
            SessionEvent::RadiusChanged { radius: 1.5 }
        );
    }
}
