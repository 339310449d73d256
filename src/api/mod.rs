//! Event delivery to the PR-management service
//!
//! This module provides:
//! - The event types (`messages`)
//! - The `ApiHandler` trait every sink implements
//! - An in-memory recorder that can forward to another sink
//! - An HTTP sink with retry logic

mod http;
pub mod messages;

pub use http::HttpApiHandler;
pub use messages::{
    ApiMessage, CloseReason, CreatePullRequest, DependencyFile, ReportedDependency,
    ReportedRequirement, UpdateJobError, UpdatePullRequest, UpdatedDependencyList,
};

use crate::error::ApiError;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// Receives events in emission order
#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// Deliver one event
    async fn send(&self, message: ApiMessage) -> Result<(), ApiError>;
}

/// Keeps every event in memory, optionally forwarding each one
#[derive(Default)]
pub struct RecordingApiHandler {
    messages: Mutex<Vec<ApiMessage>>,
    forward: Option<Box<dyn ApiHandler>>,
}

impl RecordingApiHandler {
    /// Create a recorder that only records
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that also forwards every event to `inner`
    pub fn forwarding(inner: Box<dyn ApiHandler>) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            forward: Some(inner),
        }
    }

    /// Snapshot of recorded events
    pub fn messages(&self) -> Vec<ApiMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ApiHandler for RecordingApiHandler {
    async fn send(&self, message: ApiMessage) -> Result<(), ApiError> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        if let Some(inner) = &self.forward {
            inner.send(message).await?;
        }
        Ok(())
    }
}
