use serde::Serialize;

/// Process exit codes reserved by the dispatcher.
///
/// Actions should avoid returning these values if callers inspect exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_PARAMETERS: i32 = -1;
    pub const DEFAULT_ACTION_USED: i32 = -2;
    pub const TOO_MANY_GROUP_CANDIDATES: i32 = -3;
    pub const NOT_ENOUGH_GROUP_CANDIDATES: i32 = -4;
    pub const HELP_GROUP_NOT_FOUND: i32 = -5;
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "code", rename_all = "snake_case")]
pub enum Outcome {
    /// Help was rendered instead of running anything.
    HelpDisplayed,
    /// An action overload ran and returned this code.
    CandidateFound(i32),
    /// No overload matched; the group's default action returned this code.
    DefaultActionUsed(i32),
    /// More than one candidate group matched the primary option.
    TooManyGroupCandidates,
    /// No candidate group matched the primary option.
    NotEnoughGroupCandidates,
    /// A supplied value failed to convert to its parameter type.
    InvalidParameters,
}

impl Outcome {
    /// The reserved sentinel for this outcome, if it has one.
    pub fn reserved_code(&self) -> Option<i32> {
        match self {
            Outcome::InvalidParameters => Some(exit_code::INVALID_PARAMETERS),
            Outcome::DefaultActionUsed(_) => Some(exit_code::DEFAULT_ACTION_USED),
            Outcome::TooManyGroupCandidates => Some(exit_code::TOO_MANY_GROUP_CANDIDATES),
            Outcome::NotEnoughGroupCandidates => Some(exit_code::NOT_ENOUGH_GROUP_CANDIDATES),
            Outcome::HelpDisplayed | Outcome::CandidateFound(_) => None,
        }
    }

    /// Returns true if an action or default action ran.
    pub fn is_handled(&self) -> bool {
        matches!(
            self,
            Outcome::CandidateFound(_) | Outcome::DefaultActionUsed(_)
        )
    }
}

/// An outcome paired with the process exit code it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dispatched {
    pub outcome: Outcome,
    pub exit_code: i32,
}

impl Dispatched {
    pub(crate) fn new(outcome: Outcome, exit_code: i32) -> Self {
        Self { outcome, exit_code }
    }

    /// Pairs a routing outcome with its reserved code.
    pub(crate) fn reserved(outcome: Outcome) -> Self {
        let exit_code = outcome.reserved_code().unwrap_or(exit_code::SUCCESS);
        Self { outcome, exit_code }
    }
}
