//! Stop listening to the browser.

/// Remove browser event listeners registered on behalf of a router.
pub trait Detach {
    /// Remove the listeners. Calling this more than once does nothing.
    fn detach(&mut self);
}
