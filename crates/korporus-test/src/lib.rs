//! Korporus Test - Shared test utilities for Korporus hosts and remotes.
//!
//! Mock implementations of the federation seams plus manifest fixtures.
//! Use it from integration tests (`tests/`) as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! korporus-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use korporus_test::{CountingBootstrap, MockRuntime};
//!
//! let bootstrap = Arc::new(CountingBootstrap::new(&["hello-main"]));
//! let runtime = MockRuntime::new().with_module("hello_app/bootstrap", bootstrap.clone());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
