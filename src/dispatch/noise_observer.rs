//! Logging observer.
//!
//! Announces a configurable noise when x (shoot) or y (jump) fires. Handy
//! for checking that a controller is wired up without writing an observer.

use std::sync::atomic::{AtomicU64, Ordering};

use log::info;

use crate::dispatch::{EventSet, HandlerResult, Observer};

/// Observer that logs a noise for x and y presses
#[derive(Debug)]
pub struct NoiseObserver {
    shooting_noise: String,
    jumping_noise: String,
    shots: AtomicU64,
    jumps: AtomicU64,
}

impl NoiseObserver {
    pub fn new(shooting_noise: impl Into<String>, jumping_noise: impl Into<String>) -> Self {
        Self {
            shooting_noise: shooting_noise.into(),
            jumping_noise: jumping_noise.into(),
            shots: AtomicU64::new(0),
            jumps: AtomicU64::new(0),
        }
    }

    /// Number of x presses handled so far
    pub fn shots(&self) -> u64 {
        self.shots.load(Ordering::Relaxed)
    }

    /// Number of y presses handled so far
    pub fn jumps(&self) -> u64 {
        self.jumps.load(Ordering::Relaxed)
    }
}

impl Default for NoiseObserver {
    fn default() -> Self {
        Self::new("Pew", "boing")
    }
}

impl Observer for NoiseObserver {
    fn capabilities(&self) -> EventSet {
        EventSet::X | EventSet::Y
    }

    fn x_button(&self) -> HandlerResult {
        self.shots.fetch_add(1, Ordering::Relaxed);
        info!("{}", self.shooting_noise);
        Ok(())
    }

    fn y_button(&self) -> HandlerResult {
        self.jumps.fetch_add(1, Ordering::Relaxed);
        info!("{}", self.jumping_noise);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ButtonEvent;

    #[test]
    fn noise_observer_counts() {
        let observer = NoiseObserver::default();
        assert!(observer.on_event(ButtonEvent::X).is_ok());
        assert!(observer.on_event(ButtonEvent::X).is_ok());
        assert!(observer.on_event(ButtonEvent::Y).is_ok());

        // Not declared, falls through to the no-op default
        assert!(observer.on_event(ButtonEvent::A).is_ok());

        assert_eq!(observer.shots(), 2);
        assert_eq!(observer.jumps(), 1);
    }
}
