//! Role-based access voting and the decision that combines votes.
//!
//! - No IO
//! - No panics
//! - Pure policy checks

use serde::Serialize;

use crate::domain::{Profile, Role};
use crate::errors::{AppError, AppResult};

/// Outcome of a single voter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Allow,
    Deny,
    /// No opinion; defers to other voters
    Abstain,
}

/// A unit of authorization logic.
pub trait Voter: Send + Sync {
    fn vote(&self, profile: Option<&Profile>) -> Vote;
}

/// Votes on whether a profile's role is in a route's allowed list.
#[derive(Debug, Clone, Default)]
pub struct AccessVoter {
    allowed_roles: Vec<Role>,
}

impl AccessVoter {
    pub fn new(allowed_roles: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed_roles: allowed_roles.into(),
        }
    }

    /// Decide for `profile` against `allowed_roles`.
    ///
    /// An absent profile is always denied; an empty role list abstains.
    pub fn decide(profile: Option<&Profile>, allowed_roles: &[Role]) -> Vote {
        let Some(profile) = profile else {
            return Vote::Deny;
        };
        if allowed_roles.is_empty() {
            return Vote::Abstain;
        }
        if allowed_roles.contains(&profile.role) {
            Vote::Allow
        } else {
            Vote::Deny
        }
    }
}

impl Voter for AccessVoter {
    fn vote(&self, profile: Option<&Profile>) -> Vote {
        Self::decide(profile, &self.allowed_roles)
    }
}

/// Any deny wins, then any allow, otherwise abstain.
pub fn combine(votes: impl IntoIterator<Item = Vote>) -> Vote {
    votes.into_iter().fold(Vote::Abstain, |acc, vote| match (acc, vote) {
        (Vote::Deny, _) | (_, Vote::Deny) => Vote::Deny,
        (Vote::Allow, _) | (_, Vote::Allow) => Vote::Allow,
        _ => Vote::Abstain,
    })
}

/// Turn the voters' combined decision into a request outcome.
///
/// An all-abstain result only passes for an authenticated profile, since
/// that means the route asks for nothing beyond authentication.
pub fn require(profile: Option<&Profile>, voters: &[&dyn Voter]) -> AppResult<()> {
    let decision = combine(voters.iter().map(|voter| voter.vote(profile)));

    match (decision, profile) {
        (Vote::Allow, _) | (Vote::Abstain, Some(_)) => Ok(()),
        (_, None) => Err(AppError::Unauthorized),
        (Vote::Deny, Some(profile)) => {
            tracing::debug!(subject = %profile.subject, role = %profile.role, "Access denied");
            Err(AppError::Forbidden)
        }
    }
}

/// Shorthand for a single role check on an authenticated profile.
pub fn require_roles(profile: &Profile, allowed_roles: &[Role]) -> AppResult<()> {
    require(Some(profile), &[&AccessVoter::new(allowed_roles)])
}
