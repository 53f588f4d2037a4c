use std::collections::HashMap;

/// Whether a resource ID is known to belong to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipState {
    /// Never listed. Cloud resources only ever show up as connection targets.
    Unseen,
    /// Listed by the environment, not yet reached from the application.
    EnvironmentScoped,
    /// Application-scoped, or reached through a connection.
    InApplication,
}

/// Membership bookkeeping for graph traversal.
///
/// States only move forward: `Unseen -> EnvironmentScoped`, `Unseen -> InApplication`
/// and `EnvironmentScoped -> InApplication`. Every change goes through
/// [`Membership::transition`], so an ID can be admitted to the application at most
/// once.
#[derive(Debug, Default)]
pub struct Membership {
    states: HashMap<String, MembershipState>,
    /// IDs in first-seen order.
    order: Vec<String>,
}

impl Membership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: &str) -> MembershipState {
        self.states
            .get(id)
            .copied()
            .unwrap_or(MembershipState::Unseen)
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    pub fn is_in_application(&self, id: &str) -> bool {
        self.state(id) == MembershipState::InApplication
    }

    /// Record an application-scoped resource. Returns false if the ID was already known.
    pub fn register_application(&mut self, id: &str) -> bool {
        self.is_unseen(id) && self.transition(id, MembershipState::InApplication)
    }

    /// Record an environment-scoped resource. Returns false if the ID was already known.
    pub fn register_environment(&mut self, id: &str) -> bool {
        self.transition(id, MembershipState::EnvironmentScoped)
    }

    /// Pull a connection target into the application. Returns true only when this call
    /// admitted it, meaning its own connections still need to be followed.
    pub fn admit(&mut self, id: &str) -> bool {
        self.transition(id, MembershipState::InApplication)
    }

    /// IDs in the application, in first-seen order.
    pub fn in_application(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|id| self.is_in_application(id))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn is_unseen(&self, id: &str) -> bool {
        !self.is_known(id)
    }

    fn transition(&mut self, id: &str, next: MembershipState) -> bool {
        use MembershipState::*;

        let current = self.state(id);
        let allowed = matches!(
            (current, next),
            (Unseen, EnvironmentScoped) | (Unseen, InApplication) | (EnvironmentScoped, InApplication)
        );
        if !allowed {
            return false;
        }

        if current == Unseen {
            self.order.push(id.to_string());
        }
        self.states.insert(id.to_string(), next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration() {
        let mut membership = Membership::new();
        assert!(membership.register_application("a"));
        assert!(membership.register_environment("b"));

        // Duplicates are rejected whichever list they come from.
        assert!(!membership.register_environment("a"));
        assert!(!membership.register_application("b"));
        assert!(!membership.register_application("a"));

        assert_eq!(membership.state("a"), MembershipState::InApplication);
        assert_eq!(membership.state("b"), MembershipState::EnvironmentScoped);
        assert_eq!(membership.state("c"), MembershipState::Unseen);
    }

    #[test]
    fn test_admit_transitions() {
        let mut membership = Membership::new();
        membership.register_environment("env");

        assert!(membership.admit("env"));
        assert!(membership.admit("cloud"));
        assert!(!membership.admit("env"));
        assert!(!membership.admit("cloud"));
        assert!(membership.is_in_application("cloud"));
    }

    #[test]
    fn test_never_demoted() {
        let mut membership = Membership::new();
        membership.register_application("a");
        assert!(!membership.register_environment("a"));
        assert!(!membership.admit("a"));
        assert_eq!(membership.state("a"), MembershipState::InApplication);
    }

    #[test]
    fn test_in_application_order() {
        let mut membership = Membership::new();
        membership.register_environment("z");
        membership.register_application("b");
        membership.register_environment("y");
        membership.admit("a");
        membership.admit("z");

        let ids: Vec<_> = membership.in_application().collect();
        assert_eq!(ids, vec!["z", "b", "a"]);
        assert_eq!(membership.len(), 4);
    }
}
