mod canceller;
mod client;
mod plan;
mod types;


pub use canceller::{Action, CancelOptions, PipelineCanceller, RunOutcome, RunReport};

#[cfg(test)]
pub use canceller::ReportEntry;
#[cfg(test)]
pub use plan::SkipReason;
