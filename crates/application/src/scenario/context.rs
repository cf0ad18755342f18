use std::future::{Ready, ready};

use todos_domain::ResponseSpec;

use crate::error::{ContractError, ContractResult};

/// State carried between the steps of one scenario.
///
/// Holds the response and `Location` recorded by setup, plus every resource
/// URL created so far so teardown can remove it.
#[derive(Debug, Default)]
pub struct ScenarioContext {
    response: Option<ResponseSpec>,
    location: Option<String>,
    created: Vec<String>,
    observations: Vec<String>,
}

impl ScenarioContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the response a later check will inspect.
    pub fn record(&mut self, response: ResponseSpec) {
        self.response = Some(response);
    }

    /// The recorded response.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Protocol` if nothing was recorded.
    pub fn response(&self) -> ContractResult<&ResponseSpec> {
        self.response
            .as_ref()
            .ok_or_else(|| ContractError::Protocol("no response was recorded".to_string()))
    }

    /// The recorded response as an already-resolved handle, for `eventually`.
    pub fn recorded(&self) -> Ready<ContractResult<ResponseSpec>> {
        ready(self.response().cloned())
    }

    /// Remember the absolute URL of the item under test.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = Some(location.into());
    }

    /// The absolute URL of the item under test.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Protocol` if setup did not provide one.
    pub fn location(&self) -> ContractResult<&str> {
        self.location
            .as_deref()
            .ok_or_else(|| ContractError::Protocol("no item location was recorded".to_string()))
    }

    /// Track a created resource for teardown.
    pub fn track(&mut self, url: impl Into<String>) {
        let url = url.into();
        if !self.created.contains(&url) {
            self.created.push(url);
        }
    }

    /// Stop tracking a resource that is known to be gone.
    pub fn forget(&mut self, url: &str) {
        self.created.retain(|u| u != url);
    }

    /// Resources still to be removed.
    #[must_use]
    pub fn created(&self) -> &[String] {
        &self.created
    }

    /// Take every tracked resource, leaving none.
    pub fn take_created(&mut self) -> Vec<String> {
        std::mem::take(&mut self.created)
    }

    /// Note server behaviour that is reported but never asserted.
    pub fn observe(&mut self, note: impl Into<String>) {
        self.observations.push(note.into());
    }

    /// Take the notes made so far.
    pub fn take_observations(&mut self) -> Vec<String> {
        std::mem::take(&mut self.observations)
    }

    /// Forget the per-test response and location. Tracked resources stay.
    pub fn reset(&mut self) {
        self.response = None;
        self.location = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_track_is_deduplicated_and_forgettable() {
        let mut ctx = ScenarioContext::new();
        ctx.track("http://localhost:8000/todos/1");
        ctx.track("http://localhost:8000/todos/1");
        ctx.track("http://localhost:8000/todos/2");
        assert_eq!(ctx.created().len(), 2);

        ctx.forget("http://localhost:8000/todos/1");
        assert_eq!(ctx.created(), ["http://localhost:8000/todos/2".to_string()]);

        assert_eq!(ctx.take_created().len(), 1);
        assert!(ctx.created().is_empty());
    }

    #[test]
    fn test_missing_state_is_protocol_error() {
        let ctx = ScenarioContext::new();
        assert!(matches!(ctx.location(), Err(ContractError::Protocol(_))));
        assert!(matches!(ctx.response(), Err(ContractError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_reset_keeps_tracked_resources() {
        let mut ctx = ScenarioContext::new();
        ctx.set_location("http://localhost:8000/todos/5");
        ctx.track("http://localhost:8000/todos/5");
        ctx.record(ResponseSpec::default());
        assert_eq!(ctx.recorded().await.unwrap().status, ResponseSpec::default().status);

        ctx.reset();
        assert!(ctx.location().is_err());
        assert!(ctx.recorded().await.is_err());
        assert_eq!(ctx.created().len(), 1);
    }
}
