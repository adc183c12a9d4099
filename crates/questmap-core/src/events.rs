use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Every change to the engine's inputs produces an Event.
/// Views subscribe and re-derive when one arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// One ledger record was written by the progress service.
    LedgerUpdated {
        sub_topic_id: String,
        at: DateTime<Utc>,
    },
    /// The whole ledger was refetched.
    LedgerReplaced {
        records: usize,
        at: DateTime<Utc>,
    },
    /// The learner adopted or regenerated a curriculum.
    CurriculumReplaced {
        subtopics: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::LedgerUpdated { at, .. }
            | Event::LedgerReplaced { at, .. }
            | Event::CurriculumReplaced { at, .. } => *at,
        }
    }

    /// Whether node positions change, not just statuses
    pub fn invalidates_layout(&self) -> bool {
        matches!(self, Event::CurriculumReplaced { .. })
    }
}

const DEFAULT_CAPACITY: usize = 64;

/// Fan-out of input-change events to subscribed views.
///
/// Subscribers that fall more than `capacity` events behind skip ahead and
/// see a `Lagged` error on their next receive; re-deriving once covers any
/// number of missed events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish an event, returning how many subscribers received it.
    ///
    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: Event) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(?event, "no subscribers for event");
                0
            }
        }
    }

    pub fn ledger_updated(&self, sub_topic_id: impl Into<String>) -> usize {
        self.publish(Event::LedgerUpdated {
            sub_topic_id: sub_topic_id.into(),
            at: Utc::now(),
        })
    }

    /// Announce a full ledger refetch holding `records` records.
    pub fn ledger_replaced(&self, records: usize) -> usize {
        self.publish(Event::LedgerReplaced {
            records,
            at: Utc::now(),
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut day_view = bus.subscribe();
        let mut map_view = bus.subscribe();

        assert_eq!(bus.ledger_updated("s1"), 2);

        for rx in [&mut day_view, &mut map_view] {
            match rx.try_recv().unwrap() {
                Event::LedgerUpdated { sub_topic_id, .. } => assert_eq!(sub_topic_id, "s1"),
                other => panic!("unexpected event {other:?}"),
            }
            assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        }
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        assert_eq!(bus.ledger_updated("s1"), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn lagging_subscriber_is_told() {
        let bus = EventBus::with_capacity(1);
        let mut rx = bus.subscribe();
        bus.ledger_updated("a");
        bus.ledger_updated("b");
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(1))));
        assert!(matches!(rx.try_recv(), Ok(Event::LedgerUpdated { .. })));
    }

    #[test]
    fn ledger_refetch_keeps_layout() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        assert_eq!(bus.ledger_replaced(42), 1);

        let event = rx.try_recv().unwrap();
        assert!(matches!(event, Event::LedgerReplaced { records: 42, .. }));
        assert!(!event.invalidates_layout());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let at = Utc::now();
        let json = serde_json::to_value(Event::CurriculumReplaced { subtopics: 12, at }).unwrap();
        assert_eq!(json["type"], "CurriculumReplaced");
        assert_eq!(json["subtopics"], 12);

        let event: Event = serde_json::from_value(json).unwrap();
        assert!(event.invalidates_layout());
        assert_eq!(event.at(), at);
    }
}
