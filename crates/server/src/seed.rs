use std::{collections::HashSet, fs, path::Path};

use anyhow::{anyhow, bail, Context};
use roster::RosterStore;
use server_api::normalize_email;
use serde::Deserialize;
use shared::domain::{Activity, ActivityDetails};
use tracing::info;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    activities: Vec<Activity>,
}

/// Roster used when no seed file is configured.
pub fn default_activities() -> Vec<Activity> {
    vec![
        Activity::new(
            "Chess Club",
            ActivityDetails::new(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
            )
            .with_participants(["michael@mergington.edu", "daniel@mergington.edu"]),
        ),
        Activity::new(
            "Programming Class",
            ActivityDetails::new(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
            )
            .with_participants(["emma@mergington.edu", "sophia@mergington.edu"]),
        ),
        Activity::new(
            "Gym Class",
            ActivityDetails::new(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
            )
            .with_participants(["john@mergington.edu", "olivia@mergington.edu"]),
        ),
        Activity::new(
            "Soccer Team",
            ActivityDetails::new(
                "Join the school soccer team and compete in matches",
                "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
                22,
            )
            .with_participants(["liam@mergington.edu", "noah@mergington.edu"]),
        ),
        Activity::new(
            "Art Club",
            ActivityDetails::new(
                "Explore your creativity through painting and drawing",
                "Thursdays, 3:30 PM - 5:00 PM",
                15,
            )
            .with_participants(["amelia@mergington.edu"]),
        ),
        Activity::new(
            "Debate Team",
            ActivityDetails::new(
                "Develop public speaking and argumentation skills",
                "Fridays, 4:00 PM - 5:30 PM",
                12,
            ),
        ),
    ]
}

pub fn parse_seed(raw: &str) -> anyhow::Result<Vec<Activity>> {
    let seed: SeedFile = toml::from_str(raw).context("invalid roster seed")?;

    let mut seen = HashSet::new();
    for activity in &seed.activities {
        if !seen.insert(activity.name.as_str()) {
            bail!("activity '{}' is listed more than once", activity.name);
        }
    }
    Ok(seed.activities)
}

pub fn load_seed_file(path: &Path) -> anyhow::Result<Vec<Activity>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster seed '{}'", path.display()))?;
    parse_seed(&raw).with_context(|| format!("failed to load roster seed '{}'", path.display()))
}

/// Seeded participants must already be in the exact form the HTTP API accepts.
fn check_participant_emails(activities: &[Activity]) -> anyhow::Result<()> {
    for activity in activities {
        for email in &activity.details.participants {
            let normalized = normalize_email(email).map_err(|err| {
                anyhow!("activity '{}': {}", activity.name, err.detail)
            })?;
            if normalized != email {
                bail!(
                    "activity '{}': participant '{email}' has surrounding whitespace",
                    activity.name
                );
            }
        }
    }
    Ok(())
}

pub fn build_roster(seed_file: Option<&Path>) -> anyhow::Result<RosterStore> {
    let activities = match seed_file {
        Some(path) => load_seed_file(path)?,
        None => default_activities(),
    };
    check_participant_emails(&activities)?;
    let roster = RosterStore::with_activities(activities)?;
    info!(
        activities = roster.len(),
        source = %seed_file.map_or_else(|| "built-in".into(), |p| p.display().to_string()),
        "roster seeded"
    );
    Ok(roster)
}

#[cfg(test)]
#[path = "tests/seed_tests.rs"]
mod tests;
