use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// Byte-count progress bar advanced by the file codecs once per block.
///
/// The bar is shared by reference across worker threads; `indicatif` synchronizes it.
pub struct Bar {
    bar: ProgressBar,
}

impl Bar {
    pub fn new(total: u64, description: &str) -> Result<Self> {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
            .progress_chars("●○ ");

        bar.set_style(style);
        bar.set_message(description.to_owned());

        Ok(Self { bar })
    }

    /// A bar that never draws, for callers without a terminal.
    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden() }
    }

    #[inline]
    pub fn add(&self, delta: u64) {
        self.bar.inc(delta);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }
}

impl Drop for Bar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_counts() {
        let bar = Bar::hidden();
        bar.add(16);
        bar.add(2);
        assert_eq!(bar.position(), 18);
    }

    #[test]
    fn test_styled_bar_builds() {
        let bar = Bar::new(100, "Encrypting...").unwrap();
        bar.add(100);
        bar.finish();
    }
}
