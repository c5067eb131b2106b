//! Controller session
//!
//! A session owns one read source and one dispatcher and drives a single
//! read-parse-dispatch cycle per [`poll`](ControllerSession::poll). It never
//! sleeps or retries; timing is left to whoever calls it (see
//! [`manager`](crate::manager)).

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::config::ReportFormat;
use crate::controller::axis::Deadzone;
use crate::controller::constants::DEFAULT_READ_SIZE;
use crate::controller::parser::{ParseError, ReportParser};
use crate::controller::types::ControllerState;
use crate::dispatch::{pressed_events, EventDispatcher, EventSet, Observer};
use crate::transport::{ReadSource, TransportError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Malformed report: {0}")]
    Parse(#[from] ParseError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SessionError {
    /// Parse errors only cost the current cycle; transport errors end the session
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::Parse(_))
    }
}

/// Settings a session runs with
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub deadzone: Deadzone,

    /// Events dispatched for held buttons
    pub events: EventSet,

    /// Bytes requested per read
    pub read_size: usize,

    /// Pause after each dispatched report
    pub poll_delay: Option<Duration>,

    /// Pause after a read with no data
    pub idle_interval: Duration,

    /// Log each decoded state in this format
    pub reporting: Option<ReportFormat>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            deadzone: Deadzone::default(),
            events: EventSet::LEGACY,
            read_size: DEFAULT_READ_SIZE,
            poll_delay: None,
            idle_interval: Duration::from_millis(1),
            reporting: None,
        }
    }
}

/// One controller's read-parse-dispatch pipeline
pub struct ControllerSession<S: ReadSource> {
    source: S,
    parser: ReportParser,
    dispatcher: Arc<EventDispatcher>,
    settings: SessionSettings,
    buf: Vec<u8>,
}

impl<S: ReadSource> ControllerSession<S> {
    /// Create a session with its own, empty dispatcher
    pub fn new(source: S, settings: SessionSettings) -> Self {
        Self::with_dispatcher(source, settings, Arc::new(EventDispatcher::new()))
    }

    /// Create a session delivering to an existing dispatcher
    pub fn with_dispatcher(source: S, settings: SessionSettings, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            source,
            parser: ReportParser::new(settings.deadzone),
            dispatcher,
            buf: vec![0u8; settings.read_size],
            settings,
        }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Shared handle for attaching observers from other threads
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    pub fn attach(&self, observer: Arc<dyn Observer>) {
        self.dispatcher.attach(observer);
    }

    pub fn detach<O: ?Sized>(&self, observer: &Arc<O>) -> bool {
        self.dispatcher.detach(observer)
    }

    /// Run one cycle.
    ///
    /// Returns `Ok(None)` without side effects when the source has no report
    /// ready. Otherwise the report is parsed, the event for every held
    /// button in the enabled set is dispatched (every cycle, not only on
    /// press), and the decoded state is returned.
    pub fn poll(&mut self) -> Result<Option<ControllerState>, SessionError> {
        let n = self.source.read_report(&mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }

        let state = self.parser.parse(&self.buf[..n])?;

        let events = pressed_events(state.buttons, self.settings.events);
        if !events.is_empty() {
            debug!("{}: pressed {:?}", self.source.name(), events);
            self.dispatcher.dispatch(&events);
        }

        Ok(Some(state))
    }

    /// Tear the session down, handing back its read source
    pub fn into_source(self) -> S {
        self.source
    }

    /// Erase the source type so sessions over different transports can be run together
    pub fn boxed(self) -> ControllerSession<Box<dyn ReadSource>>
    where
        S: 'static,
    {
        ControllerSession {
            source: Box::new(self.source),
            parser: self.parser,
            dispatcher: self.dispatcher,
            settings: self.settings,
            buf: self.buf,
        }
    }
}

/// Render a decoded state for diagnostic logging
pub fn render_state(state: &ControllerState, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(state.to_string()),
        ReportFormat::Json => serde_json::to_string(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{ButtonEvent, ChannelObserver};
    use crate::transport::ScriptedSource;

    const X_PRESSED: [u8; 15] = [0, 0, 128, 0, 128, 255, 255, 255, 255, 0, 0, 0, 0, 2, 8];
    const IDLE: [u8; 15] = [0, 0, 128, 0, 128, 0, 128, 0, 128, 0, 0, 0, 0, 0, 0];

    #[test]
    fn test_no_data_has_no_side_effects() {
        let source = ScriptedSource::new("pad").empty();
        let mut session = ControllerSession::new(source, SessionSettings::default());
        let (observer, events) = ChannelObserver::new(EventSet::all());
        session.attach(Arc::new(observer));

        assert!(session.poll().unwrap().is_none());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_poll_parses_and_dispatches() {
        let source = ScriptedSource::new("pad").report(X_PRESSED.to_vec());
        let mut session = ControllerSession::new(source, SessionSettings::default());
        let (observer, events) = ChannelObserver::new(EventSet::all());
        session.attach(Arc::new(observer));

        let state = session.poll().unwrap().unwrap();
        assert!(state.buttons.x());
        assert_eq!(events.try_recv().unwrap(), ButtonEvent::X);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_held_button_fires_every_cycle() {
        let source = ScriptedSource::new("pad")
            .report(X_PRESSED.to_vec())
            .report(X_PRESSED.to_vec())
            .report(IDLE.to_vec());
        let mut session = ControllerSession::new(source, SessionSettings::default());
        let (observer, events) = ChannelObserver::new(EventSet::X);
        session.attach(Arc::new(observer));

        for _ in 0..3 {
            session.poll().unwrap();
        }
        assert_eq!(events.try_iter().count(), 2);
    }

    #[test]
    fn test_short_report_is_recoverable() {
        let source = ScriptedSource::new("pad")
            .report(vec![0u8; 10])
            .report(X_PRESSED.to_vec());
        let mut session = ControllerSession::new(source, SessionSettings::default());

        let err = session.poll().unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, SessionError::Parse(ParseError::ShortBuffer { len: 10, .. })));

        assert!(session.poll().unwrap().is_some());
    }

    #[test]
    fn test_transport_error_propagates() {
        let source = ScriptedSource::new("pad").then_disconnect();
        let mut session = ControllerSession::new(source, SessionSettings::default());

        let err = session.poll().unwrap_err();
        assert!(!err.is_recoverable());
        assert!(matches!(err, SessionError::Transport(TransportError::Disconnected)));
    }

    #[test]
    fn test_extended_event_set() {
        // a + lb held
        let mut report = IDLE;
        report[14] = 0b0100_0001;

        let legacy = ScriptedSource::new("legacy").report(report.to_vec());
        let mut session = ControllerSession::new(legacy, SessionSettings::default());
        let (observer, events) = ChannelObserver::new(EventSet::all());
        session.attach(Arc::new(observer));
        session.poll().unwrap();
        assert!(events.try_recv().is_err());

        let settings = SessionSettings { events: EventSet::all(), ..SessionSettings::default() };
        let extended = ScriptedSource::new("extended").report(report.to_vec());
        let mut session = ControllerSession::new(extended, settings);
        let (observer, events) = ChannelObserver::new(EventSet::all());
        session.attach(Arc::new(observer));
        session.poll().unwrap();
        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![ButtonEvent::A, ButtonEvent::Lb]);
    }

    #[test]
    fn test_sessions_do_not_share_observers() {
        let first = ControllerSession::new(ScriptedSource::new("one"), SessionSettings::default());
        let second = ControllerSession::new(ScriptedSource::new("two"), SessionSettings::default());
        let (observer, _events) = ChannelObserver::new(EventSet::X);
        first.attach(Arc::new(observer));

        assert_eq!(first.dispatcher().len(), 1);
        assert!(second.dispatcher().is_empty());
    }

    #[test]
    fn test_into_source_returns_reader() {
        let source = ScriptedSource::new("pad").report(IDLE.to_vec());
        let mut session = ControllerSession::new(source, SessionSettings::default());
        session.poll().unwrap();

        let source = session.into_source();
        assert_eq!(source.reads(), 1);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_render_state() {
        let state = ReportParser::default().parse(&X_PRESSED).unwrap();

        let text = render_state(&state, ReportFormat::Text).unwrap();
        assert!(text.starts_with("ControllerState(lj=(x=0.0, y=0.0), rj=(x=1.0, y=1.0)"));

        let json = render_state(&state, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["left_trigger"], 0);
        assert_eq!(value["dpad"]["up"], true);
    }
}
