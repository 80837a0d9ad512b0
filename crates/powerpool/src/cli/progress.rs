//! Progress bar for pipeline stages.

use indicatif::{ProgressBar, ProgressStyle};
use powerpool_core::Stage;

/// Create a progress bar that advances once per pipeline stage.
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Mark the previous stage complete and show the one about to start.
pub fn advance(pb: &ProgressBar, completed: &mut u64, stage: Stage) {
    pb.set_position(*completed);
    pb.set_message(stage.to_string());
    *completed += 1;
}
