//! API handlers module

pub mod actors;
pub mod countries;
pub mod customers;
pub mod films;
pub mod health;
pub mod rentals;
pub mod search;

use serde::Serialize;

/// Plain acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
