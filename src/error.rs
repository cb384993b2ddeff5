use std::fmt;

/// Failure modes shared by every attack in the crate.
///
/// Attacks either succeed with a proven-correct answer or fail with one of
/// these; there is no partial-success mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackError {
    /// A bounded search space was exhausted without a match (block size not
    /// found, seed not found, key length not found, ...).
    OracleQueryExhausted(String),
    /// An internal algebraic invariant failed, meaning the oracle did not
    /// behave according to the assumed contract.
    InvariantViolation(String),
    /// CBC padding-oracle byte recovery found multiple plausible candidates
    /// and the tie-break heuristic could not separate them.
    AmbiguousByte { block: usize, candidates: Vec<u8> },
    /// A caller-imposed query budget was hit before the attack finished.
    BudgetExceeded { queries: u64 },
}

impl fmt::Display for AttackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackError::OracleQueryExhausted(what) => {
                write!(f, "oracle query space exhausted: {what}")
            }
            AttackError::InvariantViolation(what) => {
                write!(f, "attack invariant violated: {what}")
            }
            AttackError::AmbiguousByte { block, candidates } => {
                write!(
                    f,
                    "ambiguous plaintext byte in block {block}: {} candidates remain",
                    candidates.len()
                )
            }
            AttackError::BudgetExceeded { queries } => {
                write!(f, "query budget exceeded after {queries} oracle queries")
            }
        }
    }
}

impl std::error::Error for AttackError {}
