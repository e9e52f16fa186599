use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use shared::domain::{Activity, ActivityDetails};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("activity '{0}' not found")]
    NotFound(String),
    #[error("{email} is already signed up for '{activity}'")]
    AlreadyRegistered { activity: String, email: String },
    #[error("activity '{activity}' is full ({max_participants} participants)")]
    Full {
        activity: String,
        max_participants: u32,
    },
    #[error("{email} is not registered for '{activity}'")]
    NotRegistered { activity: String, email: String },
    #[error("invalid activity '{name}': {reason}")]
    InvalidActivity { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RosterError>;

type ActivitySlot = Arc<Mutex<ActivityDetails>>;

/// In-memory roster of activities and their participants.
///
/// Cloning yields another handle to the same roster. Each activity has its own
/// lock, so a signup's duplicate and capacity checks and the append happen
/// atomically with respect to other mutations of that activity.
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    activities: Arc<RwLock<HashMap<String, ActivitySlot>>>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activities<I>(activities: I) -> Result<Self>
    where
        I: IntoIterator<Item = Activity>,
    {
        let store = Self::new();
        for activity in activities {
            store.insert_activity(activity)?;
        }
        Ok(store)
    }

    /// Adds an activity, replacing any existing one with the same name.
    pub fn insert_activity(&self, activity: Activity) -> Result<()> {
        validate_activity(&activity)?;
        let Activity { name, details } = activity;
        info!(
            activity = %name,
            max_participants = details.max_participants,
            participants = details.participants.len(),
            "activity added to roster"
        );
        self.write_map()
            .insert(name, Arc::new(Mutex::new(details)));
        Ok(())
    }

    pub fn remove_activity(&self, name: &str) -> Option<ActivityDetails> {
        let slot = self.write_map().remove(name)?;
        info!(activity = %name, "activity removed from roster");
        let details = lock_slot(&slot).clone();
        Some(details)
    }

    pub fn signup(&self, activity: &str, email: &str) -> Result<()> {
        let slot = self.slot(activity)?;
        let mut details = lock_slot(&slot);

        if details.has_participant(email) {
            debug!(activity, email, "signup rejected: already registered");
            return Err(RosterError::AlreadyRegistered {
                activity: activity.to_string(),
                email: email.to_string(),
            });
        }
        if details.is_full() {
            debug!(activity, email, "signup rejected: activity full");
            return Err(RosterError::Full {
                activity: activity.to_string(),
                max_participants: details.max_participants,
            });
        }

        details.participants.push(email.to_string());
        info!(
            activity,
            email,
            spots_left = details.spots_left(),
            "participant signed up"
        );
        Ok(())
    }

    pub fn unregister(&self, activity: &str, email: &str) -> Result<()> {
        let slot = self.slot(activity)?;
        let mut details = lock_slot(&slot);

        let Some(index) = details.participants.iter().position(|p| p == email) else {
            debug!(activity, email, "unregister rejected: not registered");
            return Err(RosterError::NotRegistered {
                activity: activity.to_string(),
                email: email.to_string(),
            });
        };

        details.participants.remove(index);
        info!(activity, email, "participant unregistered");
        Ok(())
    }

    /// Snapshot of every activity, ordered by name.
    pub fn list_activities(&self) -> BTreeMap<String, ActivityDetails> {
        self.read_map()
            .iter()
            .map(|(name, slot)| (name.clone(), lock_slot(slot).clone()))
            .collect()
    }

    pub fn get_activity(&self, name: &str) -> Result<ActivityDetails> {
        let slot = self.slot(name)?;
        let details = lock_slot(&slot).clone();
        Ok(details)
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    fn slot(&self, name: &str) -> Result<ActivitySlot> {
        self.read_map()
            .get(name)
            .cloned()
            .ok_or_else(|| RosterError::NotFound(name.to_string()))
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<String, ActivitySlot>> {
        self.activities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<String, ActivitySlot>> {
        self.activities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// Every mutation leaves the activity consistent before it can panic, so a
// poisoned lock still guards valid data.
fn lock_slot(slot: &Mutex<ActivityDetails>) -> MutexGuard<'_, ActivityDetails> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn validate_activity(activity: &Activity) -> Result<()> {
    let invalid = |reason: String| RosterError::InvalidActivity {
        name: activity.name.clone(),
        reason,
    };

    if activity.name.trim().is_empty() {
        return Err(invalid("name must not be empty".into()));
    }
    let details = &activity.details;
    if details.max_participants == 0 {
        return Err(invalid("max_participants must be positive".into()));
    }
    if details.participants.len() > details.max_participants as usize {
        return Err(invalid(format!(
            "{} participants exceed capacity of {}",
            details.participants.len(),
            details.max_participants
        )));
    }
    for (index, email) in details.participants.iter().enumerate() {
        if details.participants[..index].contains(email) {
            return Err(invalid(format!("duplicate participant {email}")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
