use gloo::events::EventListener;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;

/// Calls `callback` once the window has stopped resizing for `delay_ms`.
///
/// Keep the returned listener alive for as long as the callback should fire;
/// dropping it removes the listener.
pub fn create_debounced_resize_listener<F>(callback: F, delay_ms: u32) -> EventListener
where
    F: Fn() + 'static,
{
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let callback = Rc::new(callback);

    EventListener::new(&gloo::utils::window(), "resize", move |_| {
        let cb = callback.clone();
        // Replacing the handle drops, and so cancels, the previous timeout
        pending
            .borrow_mut()
            .replace(Timeout::new(delay_ms, move || cb()));
    })
}
