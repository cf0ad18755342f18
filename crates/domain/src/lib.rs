//! Todos Domain - Core types
//!
//! This crate defines the domain model for the Todos contract suite:
//! request and response specifications, the Todo resource, the assertion
//! vocabulary, and scenario lifecycle and reports.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod property;
pub mod request;
pub mod response;
pub mod scenario;
pub mod testing;
pub mod todo;
pub mod transport;

pub use error::{DomainError, DomainResult};
pub use property::{PathSegment, PropertyPath};
pub use request::{DEFAULT_TIMEOUT_MS, Header, Headers, HttpMethod, RequestSpec};
pub use response::ResponseSpec;
pub use scenario::{
    CaseOutcome, CaseReport, ExecutionMode, FailureDetail, FailureKind, NetworkFailure,
    ScenarioPhase, ScenarioReport, SetupMode, SuiteReport,
};
pub use testing::{Assertion, AssertionResult};
pub use todo::{NewTodo, TodoItem, TodoPatch, todo_id_from_location};
pub use transport::TransportErrorKind;
