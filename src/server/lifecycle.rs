use crate::{Error, Result};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Synchronous,
    Deferred,
    Responded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    NoCallback,
    CallbackPresent,
    ResponseWritten,
}

/// Tracks one skill request from parsing to the HTTP reply.
#[derive(Debug)]
pub struct RequestLifecycle {
    state: RequestState,
    deferred: bool,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self {
            state: RequestState::Received,
            deferred: false,
        }
    }

    pub fn current_state(&self) -> RequestState {
        self.state
    }

    /// Whether the answer travels through the callback instead of the HTTP reply.
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    pub fn transition(&mut self, event: RequestEvent) -> Result<()> {
        let new_state = match (self.state, event) {
            (RequestState::Received, RequestEvent::NoCallback) => RequestState::Synchronous,
            (RequestState::Received, RequestEvent::CallbackPresent) => RequestState::Deferred,
            (RequestState::Synchronous, RequestEvent::ResponseWritten)
            | (RequestState::Deferred, RequestEvent::ResponseWritten) => RequestState::Responded,
            _ => {
                warn!(
                    "Invalid request transition from {:?} with event {:?}",
                    self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        debug!(
            "Request state transition: {:?} -> {:?} (event: {:?})",
            self.state, new_state, event
        );

        if new_state == RequestState::Deferred {
            self.deferred = true;
        }
        self.state = new_state;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.state == RequestState::Responded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_synchronous_path() {
        let mut lifecycle = RequestLifecycle::new();
        assert_eq!(lifecycle.current_state(), RequestState::Received);

        lifecycle.transition(RequestEvent::NoCallback).unwrap();
        assert_eq!(lifecycle.current_state(), RequestState::Synchronous);
        assert!(!lifecycle.is_deferred());

        lifecycle.transition(RequestEvent::ResponseWritten).unwrap();
        assert!(lifecycle.is_terminal());
        assert!(!lifecycle.is_deferred());
    }

    #[test]
    fn test_deferred_path() {
        let mut lifecycle = RequestLifecycle::new();

        lifecycle.transition(RequestEvent::CallbackPresent).unwrap();
        assert_eq!(lifecycle.current_state(), RequestState::Deferred);

        lifecycle.transition(RequestEvent::ResponseWritten).unwrap();
        assert_eq!(lifecycle.current_state(), RequestState::Responded);
        assert!(lifecycle.is_deferred());
    }

    #[test]
    fn test_cannot_respond_before_choosing_mode() {
        let mut lifecycle = RequestLifecycle::new();
        let err = lifecycle
            .transition(RequestEvent::ResponseWritten)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert_eq!(lifecycle.current_state(), RequestState::Received);
    }

    #[test]
    fn test_cannot_respond_twice() {
        let mut lifecycle = RequestLifecycle::new();
        lifecycle.transition(RequestEvent::NoCallback).unwrap();
        lifecycle.transition(RequestEvent::ResponseWritten).unwrap();

        assert!(lifecycle.transition(RequestEvent::ResponseWritten).is_err());
        assert!(lifecycle.transition(RequestEvent::CallbackPresent).is_err());
    }

    #[test]
    fn test_cannot_switch_modes() {
        let mut lifecycle = RequestLifecycle::new();
        lifecycle.transition(RequestEvent::NoCallback).unwrap();

        assert!(lifecycle.transition(RequestEvent::CallbackPresent).is_err());
        assert_eq!(lifecycle.current_state(), RequestState::Synchronous);
    }
}
