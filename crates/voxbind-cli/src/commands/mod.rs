pub mod extract;
pub mod generate;
pub mod inspect;

/// How a command finished when it did not abort with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    /// Ran to the end, but this many isolated items failed.
    CompletedWithFailures(usize),
}

impl CommandOutcome {
    pub fn from_failures(failures: usize) -> Self {
        if failures == 0 {
            CommandOutcome::Completed
        } else {
            CommandOutcome::CompletedWithFailures(failures)
        }
    }
}
