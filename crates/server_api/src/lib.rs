use roster::{RosterError, RosterStore};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ActivitiesResponse, MessageResponse},
};
use tracing::warn;

#[derive(Clone, Default)]
pub struct ApiContext {
    pub roster: RosterStore,
}

impl ApiContext {
    pub fn new(roster: RosterStore) -> Self {
        Self { roster }
    }
}

pub fn activities_route() -> &'static str {
    "/activities"
}

pub fn signup_route() -> &'static str {
    "/activities/:activity_name/signup"
}

pub fn participants_route() -> &'static str {
    "/activities/:activity_name/participants"
}

pub fn list_activities(ctx: &ApiContext) -> ActivitiesResponse {
    ctx.roster.list_activities()
}

pub fn signup(ctx: &ApiContext, activity: &str, email: &str) -> Result<MessageResponse, ApiError> {
    ctx.roster.get_activity(activity).map_err(roster_error)?;
    let email = normalize_email(email)?;
    ctx.roster
        .signup(activity, email)
        .map_err(roster_error)?;
    Ok(MessageResponse::new(format!("Signed up {email} for {activity}")))
}

pub fn unregister(
    ctx: &ApiContext,
    activity: &str,
    email: &str,
) -> Result<MessageResponse, ApiError> {
    // Any string is accepted; anything absent from the roster is NotRegistered.
    let email = email.trim();
    ctx.roster
        .unregister(activity, email)
        .map_err(roster_error)?;
    Ok(MessageResponse::new(format!(
        "Unregistered {email} from {activity}"
    )))
}

/// Trims the address and applies the minimal shape check the roster relies on.
pub fn normalize_email(raw: &str) -> Result<&str, ApiError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "Email is required"));
    }
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("'{email}' is not a valid email address"),
        ));
    }
    Ok(email)
}

fn roster_error(err: RosterError) -> ApiError {
    match err {
        RosterError::NotFound(_) => ApiError::new(ErrorCode::NotFound, "Activity not found"),
        RosterError::AlreadyRegistered { .. } => ApiError::new(
            ErrorCode::AlreadyRegistered,
            "Student is already signed up for this activity",
        ),
        RosterError::Full { .. } => ApiError::new(ErrorCode::Full, "Activity is full"),
        RosterError::NotRegistered { .. } => ApiError::new(
            ErrorCode::NotRegistered,
            "Student is not registered for this activity",
        ),
        RosterError::InvalidActivity { .. } => {
            warn!(error = %err, "roster rejected activity during request");
            ApiError::new(ErrorCode::Internal, err.to_string())
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
