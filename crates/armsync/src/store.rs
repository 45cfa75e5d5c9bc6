//! The state store the controller synchronizes against.
//!
//! [`StateStore`] is the collaborator contract: read a snapshot, listen to a
//! selected slice, dispatch an action. [`RobotStore`] is the in-process
//! implementation used by the demo application and the tests.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use armsync_common::{CanonicalAngles, JointId, JointLimitTable, JointMap, RobotAction, RobotState};
use thiserror::Error;
use tracing::{debug, trace};

/// Handle identifying one `listen` registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Reasons a store can refuse an action.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("angle for {joint} is not finite ({value})")]
    NonFiniteAngle { joint: JointId, value: f64 },

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("invalid payload for '{action}': {reason}")]
    InvalidPayload { action: &'static str, reason: String },

    /// Generic refusal for stores that gate updates on their own policy.
    #[error("store rejected '{action}': {reason}")]
    Rejected { action: &'static str, reason: String },
}

/// Observable robot state.
///
/// All methods run synchronously on the caller's thread: `dispatch` has
/// applied the action and notified every affected listener before it
/// returns.
pub trait StateStore {
    /// Current state snapshot.
    fn state(&self) -> RobotState;

    /// Register `callback` to receive `selector(state)` whenever that
    /// selection changes. The callback is not invoked at registration.
    fn listen<T, S, F>(&self, selector: S, callback: F) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&RobotState) -> T + 'static,
        F: FnMut(&T) + 'static;

    /// Apply `action` and notify listeners.
    fn dispatch(&self, action: RobotAction) -> Result<(), StoreError>;
}

type Notify = Rc<RefCell<dyn FnMut(&RefCell<RobotState>)>>;

struct Listener {
    id: SubscriptionId,
    notify: Notify,
}

struct StoreInner {
    state: RefCell<RobotState>,
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

/// In-process, single-threaded robot store.
///
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct RobotStore {
    inner: Rc<StoreInner>,
}

impl RobotStore {
    pub fn new(state: RobotState) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(state),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    /// A store holding every joint at zero with the given limits.
    pub fn with_limits(joint_limits: JointLimitTable) -> Self {
        Self::new(RobotState::new(JointMap::default(), joint_limits))
    }

    /// Remove a registration. Returns `false` if `id` was not registered.
    pub fn unlisten(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Dispatch an action addressed by its wire name, with a JSON payload.
    pub fn dispatch_named(
        &self,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<(), StoreError> {
        match name {
            RobotAction::CHANGE_ANGLES => {
                let angles: CanonicalAngles =
                    serde_json::from_value(payload).map_err(|err| StoreError::InvalidPayload {
                        action: RobotAction::CHANGE_ANGLES,
                        reason: err.to_string(),
                    })?;
                self.dispatch(RobotAction::ChangeAngles(angles))
            }
            other => Err(StoreError::UnknownAction(other.to_string())),
        }
    }

    fn apply(&self, action: RobotAction) -> Result<(), StoreError> {
        match action {
            RobotAction::ChangeAngles(angles) => {
                if let Some((joint, angle)) = angles.iter().find(|(_, angle)| !angle.is_finite()) {
                    return Err(StoreError::NonFiniteAngle {
                        joint,
                        value: angle.value(),
                    });
                }
                self.inner.state.borrow_mut().angles = angles;
            }
        }
        Ok(())
    }

    fn notify_listeners(&self) {
        let listeners: Vec<(SubscriptionId, Notify)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|listener| (listener.id, Rc::clone(&listener.notify)))
            .collect();

        for (id, notify) in listeners {
            match notify.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(&self.inner.state),
                Err(_) => trace!("[armsync] {id} is already running; skipping nested notification"),
            }
        }
    }
}

impl Default for RobotStore {
    fn default() -> Self {
        Self::new(RobotState::default())
    }
}

impl fmt::Debug for RobotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotStore")
            .field("state", &*self.inner.state.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl StateStore for RobotStore {
    fn state(&self) -> RobotState {
        self.inner.state.borrow().clone()
    }

    fn listen<T, S, F>(&self, selector: S, mut callback: F) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&RobotState) -> T + 'static,
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let mut last = selector(&*self.inner.state.borrow());
        // Selections are re-read after every callback: a dispatch the callback
        // made itself skipped this listener, so catch up until it settles.
        let notify: Notify = Rc::new(RefCell::new(move |state: &RefCell<RobotState>| {
            loop {
                let next = selector(&*state.borrow());
                if next == last {
                    break;
                }
                callback(&next);
                last = next;
            }
        }));

        self.inner.listeners.borrow_mut().push(Listener { id, notify });
        debug!("[armsync] registered store listener {id}");
        id
    }

    fn dispatch(&self, action: RobotAction) -> Result<(), StoreError> {
        let name = action.name();
        self.apply(action)?;
        trace!("[armsync] applied {name}");
        self.notify_listeners();
        Ok(())
    }
}
