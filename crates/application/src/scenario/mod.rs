//! Scenario groups and the runner that drives them.
//!
//! A [`Scenario`] is a named group of test cases sharing a setup hook and a
//! teardown hook. Hooks and cases are plain step functions receiving the
//! [`TodoApi`] and the scenario's own [`ScenarioContext`].

mod context;
mod runner;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use todos_domain::SetupMode;

use crate::client::TodoApi;
use crate::error::ContractResult;

pub use context::ScenarioContext;
pub use runner::ScenarioRunner;

/// Future returned by a [`Step`].
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = ContractResult<()>> + Send + 'a>>;

/// A setup hook, teardown hook or test case body.
pub type Step = for<'a> fn(&'a TodoApi, &'a mut ScenarioContext) -> StepFuture<'a>;

/// A named test case.
#[derive(Clone)]
pub struct TestCase {
    name: String,
    step: Step,
}

impl TestCase {
    /// Create a test case.
    pub fn new(name: impl Into<String>, step: Step) -> Self {
        Self {
            name: name.into(),
            step,
        }
    }

    /// Case name as reported.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn step(&self) -> Step {
        self.step
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A group of test cases with shared setup and teardown.
#[derive(Clone)]
pub struct Scenario {
    name: String,
    setup_mode: SetupMode,
    setup: Option<Step>,
    teardown: Option<Step>,
    cases: Vec<TestCase>,
}

impl Scenario {
    /// Create an empty scenario that sets up once for the whole group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup_mode: SetupMode::OncePerGroup,
            setup: None,
            teardown: None,
            cases: Vec::new(),
        }
    }

    /// Set how often setup and teardown run.
    #[must_use]
    pub const fn setup_mode(mut self, mode: SetupMode) -> Self {
        self.setup_mode = mode;
        self
    }

    /// Set the setup hook.
    #[must_use]
    pub fn setup(mut self, step: Step) -> Self {
        self.setup = Some(step);
        self
    }

    /// Set the teardown hook.
    #[must_use]
    pub fn teardown(mut self, step: Step) -> Self {
        self.teardown = Some(step);
        self
    }

    /// Append a test case.
    #[must_use]
    pub fn case(mut self, name: impl Into<String>, step: Step) -> Self {
        self.cases.push(TestCase::new(name, step));
        self
    }

    /// Scenario name as reported.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How often setup and teardown run.
    #[must_use]
    pub const fn mode(&self) -> SetupMode {
        self.setup_mode
    }

    /// Test cases in declaration order.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("setup_mode", &self.setup_mode)
            .field("has_setup", &self.setup.is_some())
            .field("has_teardown", &self.teardown.is_some())
            .field("cases", &self.cases)
            .finish()
    }
}
