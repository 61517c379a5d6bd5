//! Interactive confirmation hook for destructive commands.

/// Asks the person using the tracker to approve a destructive action.
///
/// Any `Fn(&str) -> bool` closure is a confirmation hook, which keeps tests
/// and embedders free of terminal or dialog code:
///
/// ```
/// use bar_tab::Confirm;
///
/// let always = |_: &str| true;
/// assert!(always.confirm("Delete custom item Shot?"));
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Confirm {
    /// Shows `prompt` and returns `true` when the action is approved.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
