use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ActivityDetails;

/// Body of `GET /activities`, keyed by activity name.
pub type ActivitiesResponse = BTreeMap<String, ActivityDetails>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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
