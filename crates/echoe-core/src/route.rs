//! Top-level screen selection.

use crate::auth::Identity;
use crate::models::{ProfileState, UserProfile};
use crate::sync::{CachedValue, QuerySnapshot};

/// Screen the front end should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    /// The identity provider has not reported yet.
    Initializing,
    /// No signed-in identity.
    Locked,
    /// Signed in, profile query not answered yet.
    LoadingProfile,
    /// Signed in without a profile.
    ProfileSetup,
    Diary(UserProfile),
}

/// Pick the screen for the current identity and profile query.
///
/// A profile query that failed before ever producing a value keeps the
/// loading route so a transient failure never offers to overwrite a profile.
pub fn resolve_route(
    initializing: bool,
    identity: Option<&Identity>,
    profile: &QuerySnapshot,
) -> AppRoute {
    if initializing {
        return AppRoute::Initializing;
    }
    if identity.is_none() {
        return AppRoute::Locked;
    }

    match &profile.value {
        Some(CachedValue::Profile(ProfileState::Present(profile))) => {
            AppRoute::Diary(profile.clone())
        }
        Some(CachedValue::Profile(ProfileState::Absent)) => AppRoute::ProfileSetup,
        _ => AppRoute::LoadingProfile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loaded(state: ProfileState) -> QuerySnapshot {
        QuerySnapshot {
            value: Some(CachedValue::Profile(state)),
            ..QuerySnapshot::default()
        }
    }

    #[test]
    fn initializing_wins_over_everything() {
        let identity = Identity::new("alex").unwrap();
        assert_eq!(
            resolve_route(true, Some(&identity), &loaded(ProfileState::Absent)),
            AppRoute::Initializing
        );
    }

    #[test]
    fn no_identity_is_locked() {
        assert_eq!(
            resolve_route(false, None, &QuerySnapshot::default()),
            AppRoute::Locked
        );
    }

    #[test]
    fn profile_states_map_to_routes() {
        let identity = Identity::new("alex").unwrap();
        let alex = UserProfile::new("Alex").unwrap();

        assert_eq!(
            resolve_route(false, Some(&identity), &QuerySnapshot::default()),
            AppRoute::LoadingProfile
        );
        assert_eq!(
            resolve_route(false, Some(&identity), &loaded(ProfileState::Absent)),
            AppRoute::ProfileSetup
        );
        assert_eq!(
            resolve_route(
                false,
                Some(&identity),
                &loaded(ProfileState::Present(alex.clone()))
            ),
            AppRoute::Diary(alex)
        );
    }

    #[test]
    fn failed_first_fetch_keeps_loading() {
        let identity = Identity::new("alex").unwrap();
        let snapshot = QuerySnapshot {
            error: Some("offline".to_string()),
            ..QuerySnapshot::default()
        };
        assert_eq!(
            resolve_route(false, Some(&identity), &snapshot),
            AppRoute::LoadingProfile
        );
    }
}
