//! Voting subsystem - one vote at a time, per process, per room.

use std::collections::HashSet;

use crate::application::errors::VoteError;

/// The voting state machine. One subject, one set of up-voters, one set of
/// down-voters, all keyed by room nickname.
///
/// Invariants: a nickname sits in at most one of the two sets; the sets are
/// non-empty only while a subject is set; ending a vote clears everything.
/// Callers share the session behind a single mutex, so each operation is
/// atomic from the callers' perspective.
#[derive(Debug, Default)]
pub struct VoteSession {
    subject: Option<String>,
    up: HashSet<String>,
    down: HashSet<String>,
}

impl VoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.subject.is_some()
    }

    /// Start a new vote on `subject`.
    pub fn start(&mut self, subject: &str) -> Result<String, VoteError> {
        if self.subject.is_some() {
            return Err(VoteError::AlreadyRunning);
        }
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(VoteError::EmptySubject);
        }
        self.subject = Some(subject.to_string());
        Ok("Voting started".to_string())
    }

    /// Register an up-vote for `voter`. A repeated up-vote is a notice, not
    /// a mutation; an earlier down-vote is moved over.
    pub fn vote_up(&mut self, voter: &str) -> Result<String, VoteError> {
        if self.subject.is_none() {
            return Err(VoteError::NoActiveVote);
        }
        if self.up.contains(voter) {
            return Ok("You already voted up".to_string());
        }
        self.down.remove(voter);
        self.up.insert(voter.to_string());
        Ok(format!("{} voted up", voter))
    }

    /// Register a down-vote for `voter`. Symmetric to [`vote_up`].
    ///
    /// [`vote_up`]: VoteSession::vote_up
    pub fn vote_down(&mut self, voter: &str) -> Result<String, VoteError> {
        if self.subject.is_none() {
            return Err(VoteError::NoActiveVote);
        }
        if self.down.contains(voter) {
            return Ok("You already voted down".to_string());
        }
        self.up.remove(voter);
        self.down.insert(voter.to_string());
        Ok(format!("{} voted down", voter))
    }

    /// Current subject and tallies. Counts only, never voter identities.
    pub fn stat(&self) -> Result<String, VoteError> {
        match &self.subject {
            Some(subject) => Ok(format!(
                "Subject: \"{}\". Votes up: {}. Votes down: {}",
                subject,
                self.up.len(),
                self.down.len()
            )),
            None => Err(VoteError::NoActiveVote),
        }
    }

    /// End the vote: report the final tallies and clear all state.
    pub fn end(&mut self) -> Result<String, VoteError> {
        let subject = self.subject.take().ok_or(VoteError::NoActiveVote)?;
        let result = format!(
            "Voting \"{}\" ended. {} votes up. {} votes down",
            subject,
            self.up.len(),
            self.down.len()
        );
        self.up.clear();
        self.down.clear();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_sets_subject() {
        let mut session = VoteSession::new();
        assert_eq!(session.start("pizza").unwrap(), "Voting started");
        assert!(session.is_active());
    }

    #[test]
    fn start_while_active_fails_regardless_of_subject() {
        let mut session = VoteSession::new();
        session.start("pizza").unwrap();
        assert_eq!(session.start("pasta"), Err(VoteError::AlreadyRunning));
        assert_eq!(session.start(""), Err(VoteError::AlreadyRunning));
    }

    #[test]
    fn start_rejects_blank_subject() {
        let mut session = VoteSession::new();
        assert_eq!(session.start("   "), Err(VoteError::EmptySubject));
        assert!(!session.is_active());
    }

    #[test]
    fn vote_without_active_vote_fails() {
        let mut session = VoteSession::new();
        assert_eq!(session.vote_up("alice"), Err(VoteError::NoActiveVote));
        assert_eq!(session.vote_down("alice"), Err(VoteError::NoActiveVote));
        assert_eq!(session.stat(), Err(VoteError::NoActiveVote));
        assert_eq!(session.end(), Err(VoteError::NoActiveVote));
    }

    #[test]
    fn up_then_down_leaves_voter_only_in_down() {
        let mut session = VoteSession::new();
        session.start("pizza").unwrap();
        session.vote_up("alice").unwrap();
        session.vote_down("alice").unwrap();
        assert_eq!(
            session.stat().unwrap(),
            "Subject: \"pizza\". Votes up: 0. Votes down: 1"
        );
    }

    #[test]
    fn repeated_vote_is_a_notice_without_mutation() {
        let mut session = VoteSession::new();
        session.start("pizza").unwrap();
        session.vote_up("alice").unwrap();
        assert_eq!(session.vote_up("alice").unwrap(), "You already voted up");
        assert_eq!(
            session.stat().unwrap(),
            "Subject: \"pizza\". Votes up: 1. Votes down: 0"
        );
    }

    #[test]
    fn end_reports_counts_and_clears_state() {
        let mut session = VoteSession::new();
        session.start("X").unwrap();
        session.vote_up("a").unwrap();
        session.vote_down("b").unwrap();
        assert_eq!(
            session.end().unwrap(),
            "Voting \"X\" ended. 1 votes up. 1 votes down"
        );
        assert_eq!(session.stat(), Err(VoteError::NoActiveVote));
        // A fresh vote starts from a clean slate.
        session.start("Y").unwrap();
        assert_eq!(
            session.stat().unwrap(),
            "Subject: \"Y\". Votes up: 0. Votes down: 0"
        );
    }
}
