use serde::{Deserialize, Serialize};

/// Everything the roster tracks about one activity, minus its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: String,
    pub max_participants: u32,
    /// Participant emails in signup order.
    #[serde(default)]
    pub participants: Vec<String>,
}

impl ActivityDetails {
    pub fn new(
        description: impl Into<String>,
        schedule: impl Into<String>,
        max_participants: u32,
    ) -> Self {
        Self {
            description: description.into(),
            schedule: schedule.into(),
            max_participants,
            participants: Vec::new(),
        }
    }

    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = participants.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }

    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    pub fn spots_left(&self) -> u32 {
        (self.max_participants as usize).saturating_sub(self.participants.len()) as u32
    }
}

/// A named activity, the unit used for seeding a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    #[serde(flatten)]
    pub details: ActivityDetails,
}

impl Activity {
    pub fn new(name: impl Into<String>, details: ActivityDetails) -> Self {
        Self {
            name: name.into(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spots_left_saturates_at_zero() {
        let details = ActivityDetails::new("", "", 1).with_participants(["a@x.com", "b@x.com"]);
        assert!(details.is_full());
        assert_eq!(details.spots_left(), 0);
    }

    #[test]
    fn activity_flattens_details_on_the_wire() {
        let activity = Activity::new(
            "Chess Club",
            ActivityDetails::new("Learn chess", "Fridays", 12).with_participants(["a@x.com"]),
        );
        let value = serde_json::to_value(&activity).expect("json");
        assert_eq!(value["name"], "Chess Club");
        assert_eq!(value["max_participants"], 12);
        assert_eq!(value["participants"][0], "a@x.com");
    }
}
