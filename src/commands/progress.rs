//! Progress reporting using indicatif

use std::time::Duration;

use fpgaflash_core::driver::ProgressReport;
use indicatif::{ProgressBar, ProgressStyle};

/// Drives a spinner for the erase phase and byte-granular bars for the
/// write/read phases.
pub(crate) struct IndicatifProgress {
    current_bar: Option<ProgressBar>,
}

impl IndicatifProgress {
    pub(crate) fn new() -> Self {
        Self { current_bar: None }
    }

    fn create_bar(&mut self, total: u64, phase: &'static str) {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                    phase
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.current_bar = Some(pb);
    }

    fn create_spinner(&mut self, message: String) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.current_bar = Some(pb);
    }

    fn finish(&mut self, message: &'static str) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_with_message(message);
        }
    }
}

impl ProgressReport for IndicatifProgress {
    fn erasing(&mut self, sectors: usize) {
        self.create_spinner(format!("Erasing {} sectors...", sectors));
    }

    fn sector_erased(&mut self, sectors_done: usize) {
        if let Some(pb) = &self.current_bar {
            pb.set_message(format!("Erased {} sectors...", sectors_done));
        }
    }

    fn writing(&mut self, total_bytes: usize) {
        self.finish("Erase complete");
        self.create_bar(total_bytes as u64, "Writing");
    }

    fn bytes_written(&mut self, bytes_done: usize) {
        if let Some(pb) = &self.current_bar {
            pb.set_position(bytes_done as u64);
        }
    }

    fn reading(&mut self, total_bytes: usize) {
        self.create_bar(total_bytes as u64, "Reading");
    }

    fn bytes_read(&mut self, bytes_done: usize) {
        if let Some(pb) = &self.current_bar {
            pb.set_position(bytes_done as u64);
        }
    }

    fn complete(&mut self) {
        self.finish("Done");
    }
}
