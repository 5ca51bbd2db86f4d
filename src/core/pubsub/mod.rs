//=========================================================================
// Publish / Subscribe
//=========================================================================
//
// Typed event bus decoupling requesters (menu, gameplay) from the
// components that react to them (application controller).
//
// Architecture:
//   register_handler<M>(h)   → handlers:  HashMap<TypeId, Vec<Handler<M>>>
//   register_listener<M>(l)  → listeners: HashMap<TypeId, Vec<Listener>>
//                                    ↓
//   publish(&M) ─→ snapshot handlers ─→ invoke (payload) ─→ invoke listeners
//
//   wait_for<M>() / publish_signal<M>() → SignalTable (see `signal`)
//
// The bus lives on the core thread and is shared through `Rc<PubSub>`.
// Every method takes `&self`, so handlers may publish or (un)register
// while a publish is in progress.
//
//=========================================================================

//=== Module Declarations =================================================

mod handler_list;
mod signal;

//=== External Dependencies ===============================================

use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{error, trace};

//=== Internal Dependencies ===============================================

use handler_list::HandlerList;
use signal::SignalTable;

//=== Public API ==========================================================

pub use signal::EventWait;

/// Marker trait for types that can be published on the bus.
///
/// Automatically implemented for all `'static` types.
pub trait Event: 'static {}

// Blanket implementation
impl<T: 'static> Event for T {}

/// Parameterless callback. Identity is the `Rc` allocation.
pub type Listener = Rc<dyn Fn()>;

/// Callback receiving the published event. Identity is the `Rc` allocation.
pub type Handler<M> = Rc<dyn Fn(&M)>;

//=== PubSub ==============================================================

/// Typed publish/subscribe registry.
///
/// Registering the same callback twice stores two registrations; each
/// publish then invokes it twice. Unregistering removes the most recent
/// matching registration.
pub struct PubSub {
    handlers: RefCell<HashMap<TypeId, Box<dyn HandlerList>>>,
    listeners: RefCell<HashMap<TypeId, Vec<Listener>>>,
    signals: Rc<RefCell<SignalTable>>,
}

impl PubSub {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
            signals: Rc::new(RefCell::new(SignalTable::default())),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a parameterless listener for event type `M`.
    pub fn register_listener<M: Event>(&self, listener: &Listener) {
        self.listeners
            .borrow_mut()
            .entry(TypeId::of::<M>())
            .or_default()
            .push(Rc::clone(listener));

        trace!("Registered listener for {}", type_name::<M>());
    }

    /// Registers a handler receiving the published `M`.
    pub fn register_handler<M: Event>(&self, handler: &Handler<M>) {
        let mut handlers = self.handlers.borrow_mut();

        let list = handlers
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<Handler<M>>::new()));

        match list.as_any_mut().downcast_mut::<Vec<Handler<M>>>() {
            Some(list) => list.push(Rc::clone(handler)),
            None => error!("Handler table type mismatch for {}", type_name::<M>()),
        }

        trace!("Registered handler for {}", type_name::<M>());
    }

    /// Removes one registration of `listener`. Unknown listeners are ignored.
    pub fn unregister_listener<M: Event>(&self, listener: &Listener) {
        let type_id = TypeId::of::<M>();
        let mut listeners = self.listeners.borrow_mut();

        let Some(list) = listeners.get_mut(&type_id) else {
            return;
        };

        if let Some(pos) = list.iter().rposition(|l| same_callback(l, listener)) {
            list.remove(pos);
            trace!("Unregistered listener for {}", type_name::<M>());
        }

        if list.is_empty() {
            listeners.remove(&type_id);
        }
    }

    /// Removes one registration of `handler`. Unknown handlers are ignored.
    pub fn unregister_handler<M: Event>(&self, handler: &Handler<M>) {
        let type_id = TypeId::of::<M>();
        let mut handlers = self.handlers.borrow_mut();

        let Some(erased) = handlers.get_mut(&type_id) else {
            return;
        };

        if let Some(list) = erased.as_any_mut().downcast_mut::<Vec<Handler<M>>>() {
            if let Some(pos) = list.iter().rposition(|h| same_callback(h, handler)) {
                list.remove(pos);
                trace!("Unregistered handler for {}", type_name::<M>());
            }
        }

        if erased.is_empty() {
            handlers.remove(&type_id);
        }
    }

    //--- Publishing -------------------------------------------------------

    /// Invokes every handler for `M` with `event`, then every listener.
    ///
    /// Both lists run in registration order. Callbacks registered or
    /// removed during the call take effect from the next publish.
    pub fn publish<M: Event>(&self, event: &M) {
        let type_id = TypeId::of::<M>();

        let handlers: Vec<Handler<M>> = self
            .handlers
            .borrow()
            .get(&type_id)
            .and_then(|list| list.as_any().downcast_ref::<Vec<Handler<M>>>())
            .cloned()
            .unwrap_or_default();

        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .get(&type_id)
            .cloned()
            .unwrap_or_default();

        trace!(
            "Publishing {} to {} handler(s) and {} listener(s)",
            type_name::<M>(),
            handlers.len(),
            listeners.len()
        );

        for handler in &handlers {
            handler(event);
        }
        for listener in &listeners {
            listener();
        }
    }

    //--- Signals ----------------------------------------------------------

    /// Arms a one-shot wait for marker event `M`.
    ///
    /// The returned future suspends for at least one tick and resolves
    /// after the next [`PubSub::publish_signal`] for `M`.
    pub fn wait_for<M: Event>(&self) -> EventWait {
        trace!("Armed wait for {}", type_name::<M>());
        EventWait::new(Rc::clone(&self.signals), TypeId::of::<M>())
    }

    /// Releases every wait currently armed for `M`.
    ///
    /// Does nothing if `M` was never waited on.
    pub fn publish_signal<M: Event>(&self) {
        if let Some(released) = self.signals.borrow_mut().publish(TypeId::of::<M>()) {
            trace!("Signalled {} ({} waiter(s))", type_name::<M>(), released);
        }
    }

    //--- Query API --------------------------------------------------------

    /// Number of handler and listener registrations for `M`.
    pub fn listener_count<M: Event>(&self) -> usize {
        let type_id = TypeId::of::<M>();
        let handlers = self.handlers.borrow().get(&type_id).map_or(0, |l| l.len());
        let listeners = self.listeners.borrow().get(&type_id).map_or(0, Vec::len);
        handlers + listeners
    }

    /// Returns true if any callback is registered for `M`.
    pub fn has_listeners<M: Event>(&self) -> bool {
        self.listener_count::<M>() > 0
    }

    /// Number of waits armed for `M` since its last signal.
    pub fn pending_waiters<M: Event>(&self) -> usize {
        self.signals.borrow().pending(TypeId::of::<M>())
    }
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new()
    }
}

//--- Internal Helpers ----------------------------------------------------

fn same_callback<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::Scheduler;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Default)]
    struct Ping;

    #[derive(Debug, Default)]
    struct Pong;

    #[derive(Debug, PartialEq, Clone)]
    struct Score {
        value: i32,
    }

    fn counting_listener(counter: &Rc<Cell<u32>>) -> Listener {
        let counter = Rc::clone(counter);
        Rc::new(move || counter.set(counter.get() + 1))
    }

    //--- Publish ----------------------------------------------------------

    #[test]
    fn registered_listener_is_invoked_once() {
        let bus = PubSub::new();
        let calls = Rc::new(Cell::new(0));
        let listener = counting_listener(&calls);

        bus.register_listener::<Ping>(&listener);
        bus.publish(&Ping);
        assert_eq!(calls.get(), 1);

        bus.unregister_listener::<Ping>(&listener);
        bus.publish(&Ping);
        assert_eq!(calls.get(), 1);
        assert!(!bus.has_listeners::<Ping>());
    }

    #[test]
    fn duplicate_registrations_accumulate() {
        let bus = PubSub::new();
        let calls = Rc::new(Cell::new(0));
        let listener = counting_listener(&calls);

        bus.register_listener::<Ping>(&listener);
        bus.register_listener::<Ping>(&listener);
        bus.publish(&Ping);
        assert_eq!(calls.get(), 2);

        bus.unregister_listener::<Ping>(&listener);
        bus.publish(&Ping);
        assert_eq!(calls.get(), 3);
        assert_eq!(bus.listener_count::<Ping>(), 1);
    }

    #[test]
    fn handler_receives_payload() {
        let bus = PubSub::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&received);
        let handler: Handler<Score> = Rc::new(move |score: &Score| sink.borrow_mut().push(score.value));
        bus.register_handler(&handler);

        bus.publish(&Score { value: 7 });
        bus.publish(&Score { value: 9 });

        assert_eq!(*received.borrow(), vec![7, 9]);
    }

    #[test]
    fn handlers_run_before_listeners_in_registration_order() {
        let bus = PubSub::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = Rc::clone(&order);
        let listener: Listener = Rc::new(move || o.borrow_mut().push("listener"));
        let o = Rc::clone(&order);
        let first: Handler<Score> = Rc::new(move |_: &Score| o.borrow_mut().push("handler-1"));
        let o = Rc::clone(&order);
        let second: Handler<Score> = Rc::new(move |_: &Score| o.borrow_mut().push("handler-2"));

        bus.register_listener::<Score>(&listener);
        bus.register_handler(&first);
        bus.register_handler(&second);
        bus.publish(&Score { value: 1 });

        assert_eq!(*order.borrow(), vec!["handler-1", "handler-2", "listener"]);
    }

    #[test]
    fn event_types_are_isolated() {
        let bus = PubSub::new();
        let calls = Rc::new(Cell::new(0));
        let listener = counting_listener(&calls);

        bus.register_listener::<Ping>(&listener);
        bus.publish(&Pong);

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn unregistering_unknown_callback_is_noop() {
        let bus = PubSub::new();
        let calls = Rc::new(Cell::new(0));
        let registered = counting_listener(&calls);
        let stranger = counting_listener(&calls);

        bus.unregister_listener::<Ping>(&stranger);
        bus.register_listener::<Ping>(&registered);
        bus.unregister_listener::<Ping>(&stranger);

        bus.publish(&Ping);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn unregister_handler_drops_empty_entry() {
        let bus = PubSub::new();
        let handler: Handler<Score> = Rc::new(|_: &Score| {});

        bus.register_handler(&handler);
        assert_eq!(bus.listener_count::<Score>(), 1);

        bus.unregister_handler(&handler);
        assert_eq!(bus.listener_count::<Score>(), 0);
        assert!(bus.handlers.borrow().is_empty());
    }

    #[test]
    fn listener_may_unregister_itself_during_publish() {
        let bus = Rc::new(PubSub::new());
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Listener>>> = Rc::new(RefCell::new(None));

        let b = Rc::clone(&bus);
        let s = Rc::clone(&slot);
        let c = Rc::clone(&calls);
        let listener: Listener = Rc::new(move || {
            c.set(c.get() + 1);
            if let Some(me) = s.borrow().as_ref() {
                b.unregister_listener::<Ping>(me);
            }
        });
        *slot.borrow_mut() = Some(Rc::clone(&listener));

        bus.register_listener::<Ping>(&listener);
        bus.publish(&Ping);
        bus.publish(&Ping);

        assert_eq!(calls.get(), 1);
        slot.borrow_mut().take();
    }

    //--- Signals ----------------------------------------------------------

    #[test]
    fn wait_resolves_after_signal() {
        let scheduler = Scheduler::new();
        let bus = Rc::new(PubSub::new());
        let done = Rc::new(Cell::new(false));

        let b = Rc::clone(&bus);
        let d = Rc::clone(&done);
        scheduler.spawn(async move {
            b.wait_for::<Ping>().await;
            d.set(true);
        });

        scheduler.tick(0.016);
        scheduler.tick(0.016);
        assert!(!done.get());
        assert_eq!(bus.pending_waiters::<Ping>(), 1);

        bus.publish_signal::<Ping>();
        assert_eq!(bus.pending_waiters::<Ping>(), 0);

        scheduler.tick(0.016);
        assert!(done.get());
    }

    #[test]
    fn signal_before_arming_does_not_release_later_wait() {
        let scheduler = Scheduler::new();
        let bus = Rc::new(PubSub::new());
        let done = Rc::new(Cell::new(false));

        bus.publish_signal::<Ping>();
        assert_eq!(bus.pending_waiters::<Ping>(), 0);

        let b = Rc::clone(&bus);
        let d = Rc::clone(&done);
        scheduler.spawn(async move {
            b.wait_for::<Ping>().await;
            d.set(true);
        });

        for _ in 0..3 {
            scheduler.tick(0.016);
        }
        assert!(!done.get());
    }

    #[test]
    fn signal_releases_all_armed_waiters_at_once() {
        let scheduler = Scheduler::new();
        let bus = Rc::new(PubSub::new());
        let released = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let b = Rc::clone(&bus);
            let r = Rc::clone(&released);
            scheduler.spawn(async move {
                b.wait_for::<Ping>().await;
                r.set(r.get() + 1);
            });
        }

        scheduler.tick(0.016);
        assert_eq!(bus.pending_waiters::<Ping>(), 3);

        bus.publish_signal::<Ping>();
        scheduler.tick(0.016);
        assert_eq!(released.get(), 3);
    }

    #[test]
    fn wait_armed_after_signal_is_not_released_by_it() {
        let scheduler = Scheduler::new();
        let bus = Rc::new(PubSub::new());
        let early = Rc::new(Cell::new(false));
        let late = Rc::new(Cell::new(false));

        let b = Rc::clone(&bus);
        let e = Rc::clone(&early);
        scheduler.spawn(async move {
            b.wait_for::<Ping>().await;
            e.set(true);
        });
        scheduler.tick(0.016);

        bus.publish_signal::<Ping>();

        let b = Rc::clone(&bus);
        let l = Rc::clone(&late);
        scheduler.spawn(async move {
            b.wait_for::<Ping>().await;
            l.set(true);
        });

        scheduler.tick(0.016);
        scheduler.tick(0.016);
        assert!(early.get());
        assert!(!late.get());
        assert_eq!(bus.pending_waiters::<Ping>(), 1);
    }

    #[test]
    fn dropped_wait_is_disarmed() {
        let bus = PubSub::new();
        let wait = bus.wait_for::<Ping>();
        assert_eq!(bus.pending_waiters::<Ping>(), 1);

        drop(wait);
        assert_eq!(bus.pending_waiters::<Ping>(), 0);
    }
}
