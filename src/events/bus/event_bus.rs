// src/events/bus/event_bus.rs
//
// Change notification bus.
//
// DESIGN PRINCIPLES:
// 1. Synchronous - handlers run inline, in subscription order
// 2. Emitted only after the store accepted the write
// 3. Observable - every emission is logged and kept in a bounded log
// 4. Type-safe - handlers receive the concrete event type

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error};

use crate::events::types::DomainEvent;

/// Type-erased handler; downcasts to the concrete event inside
type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// How many emissions the in-memory log keeps
pub const EVENT_LOG_CAPACITY: usize = 256;

pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,
    event_log: Arc<RwLock<VecDeque<EventLogEntry>>>,
}

/// A logged emission
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_log: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    /// Subscribe to one event type.
    ///
    /// ```ignore
    /// bus.subscribe::<FavoriteAdded, _>(|event| {
    ///     refresh_heart_icon(&event.user_id, event.movie_id);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let wrapped: EventHandler = Box::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                error!(
                    "Failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    /// Emit an event to every subscriber of its type.
    ///
    /// A panicking handler is logged and skipped; the remaining handlers
    /// still run.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let event_handlers = handlers.get(&TypeId::of::<E>());
        let handler_count = event_handlers.map_or(0, Vec::len);

        let entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count,
        };
        debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            entry.event_type, entry.event_id, entry.handler_count
        );

        {
            let mut log = self.event_log.write().unwrap_or_else(PoisonError::into_inner);
            if log.len() == EVENT_LOG_CAPACITY {
                log.pop_front();
            }
            log.push_back(entry);
        }

        if let Some(handlers) = event_handlers {
            for (idx, handler) in handlers.iter().enumerate() {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    handler(&event as &dyn Any);
                }));

                if result.is_err() {
                    error!("Handler {} for {} panicked", idx, event.event_type());
                }
            }
        }
    }

    /// Snapshot of the emission log, oldest first
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.event_log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear_event_log(&self) {
        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share handlers and log
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            event_log: Arc::clone(&self.event_log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_subscribe_and_emit() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        bus.subscribe::<FavoriteAdded, _>(move |event| {
            seen_clone.lock().unwrap().push(event.movie_id);
        });

        bus.emit(FavoriteAdded::new("u1".to_string(), 550));

        assert_eq!(*seen.lock().unwrap(), vec![550]);
    }

    #[test]
    fn test_handlers_only_see_their_type() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        bus.subscribe::<MovieSaved, _>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(FavoriteRemoved::new("u1".to_string(), 550));
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        bus.emit(MovieSaved::new("u1".to_string(), 550));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_log_is_bounded() {
        let bus = EventBus::new();
        for i in 0..(EVENT_LOG_CAPACITY + 10) {
            bus.emit(SearchRecorded::new(format!("term {}", i), 1));
        }

        let log = bus.get_event_log();
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(log[0].event_type, "SearchRecorded");

        bus.clear_event_log();
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_handler_panic_doesnt_break_bus() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe::<ProfileImageUploaded, _>(|_| {
            panic!("Intentional panic");
        });

        let counter_clone = Arc::clone(&counter);
        bus.subscribe::<ProfileImageUploaded, _>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(bus.subscriber_count::<ProfileImageUploaded>(), 2);

        bus.emit(ProfileImageUploaded::new("u1".to_string(), "https://x/y.png".to_string()));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
