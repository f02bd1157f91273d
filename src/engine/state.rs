/// Pipeline lifecycle.
///
/// ```text
/// Running ──(budget exhausted | cancellation observed | invariant error)──► Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Ticks are being executed.
    Running,
    /// Terminal; no further ticks.
    Stopped,
}

/// Why a run reached [`RunState::Stopped`] without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured number of ticks ran.
    BudgetExhausted,
    /// The cancellation token was observed at a tick boundary.
    Cancelled,
}

impl StopReason {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            StopReason::BudgetExhausted => "budget_exhausted",
            StopReason::Cancelled => "cancelled",
        }
    }
}
