//! Reconciliation of per-command exit codes into a single outcome.

use crate::core::types::FailurePolicy;

/// Whether the executor should dispatch the next planned command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Proceed,
    Halt,
}

/// Failure recorded for a planned command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    /// Position of the command in the plan.
    pub index: usize,
    pub code: i32,
}

/// Final result of running a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// `first` is authoritative; `later` lists failures seen after it.
    Failed { first: Failure, later: Vec<Failure> },
}

/// Folds exit codes in plan order.
///
/// Any non-zero code is a failure, including the negative NTSTATUS codes
/// Windows reports for crashed processes. The first failure wins regardless
/// of policy.
#[derive(Debug)]
pub struct Tally {
    policy: FailurePolicy,
    first: Option<Failure>,
    later: Vec<Failure>,
}

impl Tally {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            first: None,
            later: Vec::new(),
        }
    }

    pub fn record(&mut self, index: usize, code: i32) -> Flow {
        if code == 0 {
            return Flow::Proceed;
        }
        let failure = Failure { index, code };
        if self.first.is_none() {
            self.first = Some(failure);
        } else {
            self.later.push(failure);
        }
        match self.policy {
            FailurePolicy::Continue => Flow::Proceed,
            FailurePolicy::Stop => Flow::Halt,
        }
    }

    pub fn finish(self) -> RunOutcome {
        match self.first {
            None => RunOutcome::Success,
            Some(first) => RunOutcome::Failed {
                first,
                later: self.later,
            },
        }
    }
}
