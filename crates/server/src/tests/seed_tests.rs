use super::*;
use std::io::Write;

#[test]
fn built_in_roster_is_valid() {
    let roster = build_roster(None).expect("roster");
    assert_eq!(roster.len(), default_activities().len());
    let chess = roster.get_activity("Chess Club").expect("chess");
    assert_eq!(chess.max_participants, 12);
    assert_eq!(chess.participants.len(), 2);
}

#[test]
fn parses_activities_with_optional_fields() {
    let activities = parse_seed(
        r#"
[[activities]]
name = "Robotics"
description = "Build robots"
schedule = "Mondays"
max_participants = 8
participants = ["ada@x.com"]

[[activities]]
name = "Quiet Reading"
max_participants = 3
"#,
    )
    .expect("seed");

    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0].details.participants, vec!["ada@x.com"]);
    assert_eq!(activities[1].name, "Quiet Reading");
    assert!(activities[1].details.participants.is_empty());
    assert!(activities[1].details.schedule.is_empty());
}

#[test]
fn duplicate_names_are_rejected() {
    let err = parse_seed(
        r#"
[[activities]]
name = "Twice"
max_participants = 1

[[activities]]
name = "Twice"
max_participants = 2
"#,
    )
    .expect_err("duplicate");
    assert!(err.to_string().contains("Twice"));
}

#[test]
fn seed_file_roster_enforces_invariants() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
[[activities]]
name = "Overbooked"
max_participants = 1
participants = ["a@x.com", "b@x.com"]
"#
    )
    .expect("write");

    assert!(build_roster(Some(file.path())).is_err());
}

#[test]
fn seed_file_is_loaded_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
[[activities]]
name = "X"
max_participants = 3
"#
    )
    .expect("write");

    let roster = build_roster(Some(file.path())).expect("roster");
    assert_eq!(roster.len(), 1);
    roster.signup("X", "a@x.com").expect("signup");
}

#[test]
fn missing_seed_file_names_the_path() {
    let err = load_seed_file(Path::new("/definitely/not/here.toml")).expect_err("missing");
    assert!(format!("{err:#}").contains("/definitely/not/here.toml"));
}

#[test]
fn seed_participants_must_be_valid_emails() {
    for participant in ["legacy-user", " spaced@x.com", "tab@x.com\t", ""] {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[[activities]]\nname = \"Club\"\nmax_participants = 3\nparticipants = [{participant:?}]"
        )
        .expect("write");

        let err = build_roster(Some(file.path())).expect_err("invalid participant");
        assert!(
            format!("{err:#}").contains("Club"),
            "unexpected error for {participant:?}: {err:#}"
        );
    }
}

#[test]
fn seeded_participants_can_be_unregistered_through_the_api() {
    let roster = build_roster(None).expect("roster");
    let ctx = server_api::ApiContext::new(roster.clone());
    for (name, details) in roster.list_activities() {
        for email in details.participants {
            server_api::unregister(&ctx, &name, &email).expect("unregister seeded participant");
        }
    }
    assert!(roster
        .list_activities()
        .values()
        .all(|details| details.participants.is_empty()));
}
