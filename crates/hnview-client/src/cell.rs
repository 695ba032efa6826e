//! Observable state cell
//!
//! A [`StateCell`] holds the current snapshot of some state record. Every
//! update replaces the snapshot as a whole while holding the cell's lock, so
//! readers only ever see complete snapshots.
//!
//! Two ways to observe changes:
//!
//! * [`StateCell::subscribe`] hands out a [`watch::Receiver`], for tasks
//!   that want to `await` changes,
//! * [`StateCell::on_update`] registers a callback that is invoked
//!   synchronously, on the updating thread, right after each update.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Listeners<T> = Mutex<BTreeMap<u64, Listener<T>>>;

pub struct StateCell<T> {
    tx: watch::Sender<T>,
    listeners: Arc<Listeners<T>>,
    /// Held across publishing and notifying, so listeners see updates in
    /// publish order
    publish: Mutex<()>,
}

impl<T> StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            tx,
            listeners: Arc::new(Mutex::new(BTreeMap::new())),
            publish: Mutex::new(()),
        }
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Borrow the current snapshot without cloning
    ///
    /// Updates block while the returned guard is alive, so don't hold it.
    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Register a callback invoked with the new snapshot after every update
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped. It runs while the cell is publishing, so it must not update
    /// the same cell.
    pub fn on_update(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let mut lock = self.listeners.lock().expect("Locking failed");
        let key = lock
            .last_key_value()
            .map(|(k, _)| *k + 1)
            .unwrap_or_default();
        assert!(lock.insert(key, Arc::new(listener)).is_none());
        drop(lock);

        let listeners: Weak<Listeners<T>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.lock().expect("Locking failed").remove(&key);
            }
        })
    }

    /// Apply `f` to the state and publish the result
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.try_update(|state| {
            f(state);
            true
        });
    }

    /// Apply `f` to the state, publishing only if it returns `true`
    ///
    /// The check and the modification happen under a single lock, which is
    /// what makes this usable as a check-then-act guard. `f` must leave the
    /// state untouched when returning `false`.
    ///
    /// Returns whatever `f` returned.
    pub fn try_update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let _publish = self.publish.lock().expect("Locking failed");
        let mut published = None;

        let modified = self.tx.send_if_modified(|state| {
            if !f(state) {
                return false;
            }
            if !self.listeners.lock().expect("Locking failed").is_empty() {
                published = Some(state.clone());
            }
            true
        });

        if let Some(snapshot) = published {
            self.notify(&snapshot);
        }

        modified
    }

    /// Wait until the state satisfies `pred`, and return that snapshot
    pub async fn wait_for(&self, pred: impl FnMut(&T) -> bool) -> T {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(pred).await {
            Ok(state) => T::clone(&state),
            // Can't happen while `self` keeps the sender alive
            Err(_) => self.snapshot(),
        };
        state
    }

    fn notify(&self, snapshot: &T) {
        let listeners: Vec<_> = self
            .listeners
            .lock()
            .expect("Locking failed")
            .values()
            .cloned()
            .collect();

        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl<T> Default for StateCell<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Handle to a callback registered with [`StateCell::on_update`]
///
/// Dropping it unregisters the callback.
#[must_use = "the callback is unregistered when the subscription is dropped"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}
