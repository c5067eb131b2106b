//! Button event dispatch
//!
//! This module provides the observer side of the controller:
//! - Button event names and sets
//! - The [`Observer`] capability interface
//! - [`EventDispatcher`], an ordered observer registry
//! - Stock observers (logging and channel forwarding)

pub mod channel_observer;
pub mod dispatcher;
pub mod event;
pub mod noise_observer;

pub use channel_observer::ChannelObserver;
pub use dispatcher::EventDispatcher;
pub use event::{pressed_events, ButtonEvent, EventSet, UnknownEvent};
pub use noise_observer::NoiseObserver;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Observer handler failed: {0}")]
    Handler(String),

    #[error("Observer channel closed")]
    ChannelClosed,
}

pub type HandlerResult = Result<(), ObserverError>;

/// Receiver of button events.
///
/// An observer declares which events it handles through
/// [`capabilities`](Observer::capabilities); the dispatcher reads the set
/// once at attach time and never calls a handler outside it. Handlers the
/// observer doesn't implement default to doing nothing.
pub trait Observer: Send + Sync {
    /// Events this observer wants to receive
    fn capabilities(&self) -> EventSet;

    fn x_button(&self) -> HandlerResult {
        Ok(())
    }

    fn y_button(&self) -> HandlerResult {
        Ok(())
    }

    fn a_button(&self) -> HandlerResult {
        Ok(())
    }

    fn b_button(&self) -> HandlerResult {
        Ok(())
    }

    fn lb_button(&self) -> HandlerResult {
        Ok(())
    }

    fn rb_button(&self) -> HandlerResult {
        Ok(())
    }

    /// Route an event to its named handler
    fn on_event(&self, event: ButtonEvent) -> HandlerResult {
        match event {
            ButtonEvent::X => self.x_button(),
            ButtonEvent::Y => self.y_button(),
            ButtonEvent::A => self.a_button(),
            ButtonEvent::B => self.b_button(),
            ButtonEvent::Lb => self.lb_button(),
            ButtonEvent::Rb => self.rb_button(),
        }
    }
}
