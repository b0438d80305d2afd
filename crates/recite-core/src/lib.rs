//! recite-core: quiz bank, grading policy, and the drill state machine.
//!
//! This crate defines the data model, the line-based quiz bank parser, the
//! similarity/AI grading policy, pool filtering, and the `QuizEngine` that
//! drives a `QuizSession` through answering, correction, and completion.

pub mod engine;
pub mod error;
pub mod grading;
pub mod judge;
pub mod mock;
pub mod model;
pub mod parser;
pub mod pool;
pub mod session;
pub mod similarity;
pub mod store;
pub mod traits;
pub mod view;
