mod styling;
mod summary;
mod tables;

use styling::{dim, magenta_bold};
pub use summary::print_summary;

/// Prints the `ciprune` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🧹 ciprune"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Cancel superseded GitLab CI pipelines")
    );
}
