//! Iteration diagnostics for registration solvers.
//!
//! A solver reports its progress through an [`ObserverSet`]: after every
//! iteration it emits the metric and the RMS change of the displacement
//! field, and a multi-resolution scheduler emits level transitions.
//! Observers only consume these scalars and never feed back into the force
//! computation.

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

/// Notification emitted by a solver or a multi-resolution scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegistrationEvent {
    /// An iteration of the solver finished.
    Iteration {
        iteration: usize,
        metric: f64,
        rms_change: f64,
    },
    /// The scheduler prepared a new pyramid level.
    LevelInitialized { elapsed_levels: usize },
    /// The scheduler finished a pyramid level.
    LevelCompleted { elapsed_levels: usize },
}

impl fmt::Display for RegistrationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iteration {
                iteration,
                metric,
                rms_change,
            } => write!(
                f,
                "  {} - Metric: {} - RMS-Change: {}",
                iteration, metric, rms_change
            ),
            Self::LevelInitialized { elapsed_levels } => {
                write!(f, "Initialized level {}", elapsed_levels)
            }
            Self::LevelCompleted { elapsed_levels } => {
                write!(f, "Finished level {}", elapsed_levels)
            }
        }
    }
}

/// Consumer of registration events.
pub trait RegistrationObserver: Send + Sync {
    fn notify(&self, event: &RegistrationEvent);
}

/// Observer that logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationLogger;

impl RegistrationLogger {
    pub fn new() -> Self {
        Self
    }
}

impl RegistrationObserver for RegistrationLogger {
    fn notify(&self, event: &RegistrationEvent) {
        match event {
            RegistrationEvent::Iteration {
                iteration,
                metric,
                rms_change,
            } => tracing::info!(iteration, metric, rms_change, "{}", event),
            RegistrationEvent::LevelInitialized { elapsed_levels }
            | RegistrationEvent::LevelCompleted { elapsed_levels } => {
                tracing::info!(elapsed_levels, "{}", event)
            }
        }
    }
}

/// Observer that records every event it receives.
///
/// Clones share the same history, so one clone can be handed to an
/// [`ObserverSet`] while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct EventHistory {
    events: Arc<Mutex<Vec<RegistrationEvent>>>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<RegistrationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Metric of every recorded iteration, in order.
    pub fn metrics(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RegistrationEvent::Iteration { metric, .. } => Some(metric),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl RegistrationObserver for EventHistory {
    fn notify(&self, event: &RegistrationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*event);
    }
}

/// Observer wrapping a closure.
pub struct CallbackObserver<F> {
    callback: F,
}

impl<F> CallbackObserver<F>
where
    F: Fn(&RegistrationEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> RegistrationObserver for CallbackObserver<F>
where
    F: Fn(&RegistrationEvent) + Send + Sync,
{
    fn notify(&self, event: &RegistrationEvent) {
        (self.callback)(event)
    }
}

/// Observer forwarding events over an mpsc channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<RegistrationEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<RegistrationEvent>) -> Self {
        Self { sender }
    }
}

impl RegistrationObserver for ChannelObserver {
    fn notify(&self, event: &RegistrationEvent) {
        if self.sender.send(*event).is_err() {
            tracing::debug!("Registration event receiver dropped");
        }
    }
}

/// Dispatcher that forwards events to every registered observer.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn RegistrationObserver>>,
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&mut self, observer: Arc<dyn RegistrationObserver>) {
        self.observers.push(observer);
    }

    /// Builder-style [`add_observer`](Self::add_observer).
    pub fn with_observer(mut self, observer: Arc<dyn RegistrationObserver>) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&self, event: &RegistrationEvent) {
        for observer in &self.observers {
            observer.notify(event);
        }
    }

    pub fn iteration_completed(&self, iteration: usize, metric: f64, rms_change: f64) {
        self.notify(&RegistrationEvent::Iteration {
            iteration,
            metric,
            rms_change,
        });
    }

    pub fn level_initialized(&self, elapsed_levels: usize) {
        self.notify(&RegistrationEvent::LevelInitialized { elapsed_levels });
    }

    pub fn level_completed(&self, elapsed_levels: usize) {
        self.notify(&RegistrationEvent::LevelCompleted { elapsed_levels });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn test_event_display() {
        let event = RegistrationEvent::Iteration {
            iteration: 3,
            metric: 0.5,
            rms_change: 0.25,
        };
        assert_eq!(event.to_string(), "  3 - Metric: 0.5 - RMS-Change: 0.25");
        assert_eq!(
            RegistrationEvent::LevelCompleted { elapsed_levels: 2 }.to_string(),
            "Finished level 2"
        );
        assert_eq!(
            RegistrationEvent::LevelInitialized { elapsed_levels: 1 }.to_string(),
            "Initialized level 1"
        );
    }

    #[test]
    fn test_history_records_in_order() {
        let history = EventHistory::new();
        let observers = ObserverSet::new().with_observer(Arc::new(history.clone()));

        observers.level_initialized(0);
        observers.iteration_completed(0, 4.0, 1.0);
        observers.iteration_completed(1, 2.0, 0.5);
        observers.level_completed(1);

        assert_eq!(history.len(), 4);
        assert_eq!(history.metrics(), vec![4.0, 2.0]);
        assert_eq!(
            history.events().last(),
            Some(&RegistrationEvent::LevelCompleted { elapsed_levels: 1 })
        );

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_callback_observer() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut observers = ObserverSet::new();
        observers.add_observer(Arc::new(CallbackObserver::new(move |event: &RegistrationEvent| {
            if matches!(event, RegistrationEvent::Iteration { .. }) {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        })));

        observers.iteration_completed(0, 1.0, 0.1);
        observers.level_completed(1);
        observers.iteration_completed(1, 0.5, 0.05);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_channel_observer() {
        let (tx, rx) = mpsc::channel();
        let observers = ObserverSet::new()
            .with_observer(Arc::new(ChannelObserver::new(tx)))
            .with_observer(Arc::new(RegistrationLogger::new()));
        assert_eq!(observers.len(), 2);

        observers.iteration_completed(7, 0.125, 0.01);
        assert_eq!(
            rx.try_recv(),
            Ok(RegistrationEvent::Iteration {
                iteration: 7,
                metric: 0.125,
                rms_change: 0.01
            })
        );

        drop(rx);
        observers.level_completed(1);
    }

    #[test]
    fn test_channel_observer_shared_across_threads() {
        let (tx, rx) = mpsc::channel();
        let observers = ObserverSet::new().with_observer(Arc::new(ChannelObserver::new(tx)));

        std::thread::scope(|scope| {
            for iteration in 0..4 {
                let observers = &observers;
                scope.spawn(move || observers.iteration_completed(iteration, 1.0, 0.0));
            }
        });
        drop(observers);

        let mut iterations: Vec<usize> = rx
            .iter()
            .filter_map(|event| match event {
                RegistrationEvent::Iteration { iteration, .. } => Some(iteration),
                _ => None,
            })
            .collect();
        iterations.sort_unstable();
        assert_eq!(iterations, vec![0, 1, 2, 3]);
    }
}
