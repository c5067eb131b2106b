//! Button event names and event sets

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::controller::types::ButtonFlags;

/// A dispatchable button event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonEvent {
    X,
    Y,
    A,
    B,
    Lb,
    Rb,
}

impl ButtonEvent {
    /// Every event, in dispatch order (legacy x/y first)
    pub const ALL: [ButtonEvent; 6] = [
        ButtonEvent::X,
        ButtonEvent::Y,
        ButtonEvent::A,
        ButtonEvent::B,
        ButtonEvent::Lb,
        ButtonEvent::Rb,
    ];

    /// Handler name observers expose for this event
    pub fn name(self) -> &'static str {
        match self {
            ButtonEvent::X => "x_button",
            ButtonEvent::Y => "y_button",
            ButtonEvent::A => "a_button",
            ButtonEvent::B => "b_button",
            ButtonEvent::Lb => "lb_button",
            ButtonEvent::Rb => "rb_button",
        }
    }

    /// Report bit backing this event
    pub fn flag(self) -> ButtonFlags {
        match self {
            ButtonEvent::X => ButtonFlags::X,
            ButtonEvent::Y => ButtonFlags::Y,
            ButtonEvent::A => ButtonFlags::A,
            ButtonEvent::B => ButtonFlags::B,
            ButtonEvent::Lb => ButtonFlags::LB,
            ButtonEvent::Rb => ButtonFlags::RB,
        }
    }

    /// Single-member event set
    pub fn as_set(self) -> EventSet {
        match self {
            ButtonEvent::X => EventSet::X,
            ButtonEvent::Y => EventSet::Y,
            ButtonEvent::A => EventSet::A,
            ButtonEvent::B => EventSet::B,
            ButtonEvent::Lb => EventSet::LB,
            ButtonEvent::Rb => EventSet::RB,
        }
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown button event: {0}")]
pub struct UnknownEvent(pub String);

impl FromStr for ButtonEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ButtonEvent::ALL
            .into_iter()
            .find(|event| event.name() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

bitflags! {
    /// A set of button events, used both for observer capabilities and for
    /// the events a session is allowed to dispatch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventSet: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const A = 1 << 2;
        const B = 1 << 3;
        const LB = 1 << 4;
        const RB = 1 << 5;

        /// The x/y subset dispatched by default
        const LEGACY = Self::X.bits() | Self::Y.bits();
    }
}

impl EventSet {
    pub fn has(&self, event: ButtonEvent) -> bool {
        self.contains(event.as_set())
    }
}

/// Events to dispatch for the buttons currently held.
///
/// Held buttons produce their event every call; there is no press/release
/// edge detection.
pub fn pressed_events(buttons: ButtonFlags, enabled: EventSet) -> Vec<ButtonEvent> {
    ButtonEvent::ALL
        .into_iter()
        .filter(|event| enabled.has(*event) && buttons.is_pressed(*event))
        .collect()
}
