//! The documentation signal handed to every handler invocation.
//!
//! A handler receives a [`Capture`] next to its request. In the live state the
//! capture is inert and the handler runs its real logic. During the startup
//! build pass the adapter invokes each handler once with a documenting capture;
//! the handler is expected to describe itself through [`Capture::method`] and
//! return without side effects.
//!
//! ```
//! use openapi_from_handlers::capture::Capture;
//!
//! fn handler(mut capture: Capture<'_>) {
//!     if capture.is_documenting() {
//!         capture
//!             .method()
//!             .summary("Ping")
//!             .empty_response(204, "Pong");
//!         return;
//!     }
//!     // real work
//! }
//!
//! let mut slot = None;
//! handler(Capture::documenting(&mut slot));
//! assert_eq!(slot.unwrap().summary, "Ping");
//! ```

use crate::method::{Method, MethodBuilder};

/// Live or documenting state of one handler invocation.
#[derive(Debug)]
pub struct Capture<'a> {
    /// Where the captured method lives while documenting, `None` when live
    slot: Option<&'a mut Option<Method>>,
}

impl Capture<'static> {
    /// Normal request handling.
    pub fn live() -> Self {
        Self { slot: None }
    }
}

impl<'a> Capture<'a> {
    /// Build-pass invocation. The method is created in `slot` the first time
    /// the handler (or a middleware in front of it) asks for the builder.
    pub fn documenting(slot: &'a mut Option<Method>) -> Self {
        Self { slot: Some(slot) }
    }

    pub fn is_documenting(&self) -> bool {
        self.slot.is_some()
    }

    /// Builder for the method under capture, inert in the live state.
    pub fn method(&mut self) -> MethodBuilder<'_> {
        match self.slot.as_deref_mut() {
            Some(slot) => MethodBuilder::new(slot.get_or_insert_with(Method::new)),
            None => MethodBuilder::inert(),
        }
    }

    /// Shorter-lived copy of the signal, for passing down a middleware chain.
    pub fn reborrow(&mut self) -> Capture<'_> {
        Capture {
            slot: self.slot.as_deref_mut(),
        }
    }
}
