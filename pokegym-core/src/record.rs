//! Types and traits for recording training metrics.
//!
//! This module provides a flexible record system for storing key-value pairs
//! produced during training and evaluation, and for routing them to an
//! output destination.
//!
//! # Core Components
//!
//! * [`Record`] - A container for key-value pairs of various data types
//! * [`RecordValue`] - An enum representing the types of values that can be stored
//! * [`Recorder`] - A trait defining the interface for recording data
//! * [`BufferedRecorder`] - A recorder that keeps records in memory
//! * [`NullRecorder`] - A recorder that discards all records (useful for testing)
//!
//! # Basic Usage
//!
//! ```rust
//! use pokegym_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let step = 1;
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("Step", RecordValue::Scalar(step as f32));
//! record.insert("Reward", RecordValue::Scalar(reward));
//! ```
//!
//! The [`Trainer`](crate::Trainer) uses a [`Recorder`] to log training
//! metrics during the training loop.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
