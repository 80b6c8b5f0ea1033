use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use remotely_data::Progress;

pub trait TrackerBuilder<T: Tracker<U>, U> {
    fn build(self) -> T;
}

pub trait Tracker<Inc> {
    fn step(&self, step: Inc) -> &Self;
    fn finish(self);
    fn abandon(self, msg: &str);
}

const PB_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Progress bar fed with absolute transfer progress.
///
/// Upload and download both report from zero, so the bar restarts when the
/// response body starts arriving.
pub struct ProgressTracker {
    pb: ProgressBar,
    finish: Option<String>,
}

impl Tracker<Progress> for ProgressTracker {
    fn step(&self, progress: Progress) -> &Self {
        if let Some(total) = progress.total.filter(|total| self.pb.length() != Some(*total)) {
            self.pb.set_length(total);
        }
        self.pb.set_position(progress.loaded);
        self
    }

    fn finish(self) {
        match self.finish {
            Some(msg) => self.pb.finish_with_message(msg),
            None => self.pb.finish(),
        }
    }

    fn abandon(self, msg: &str) {
        self.pb.abandon_with_message(msg.to_string());
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTrackerBuilder {
    len: Option<u64>,
    prefix: Option<String>,
    finish: Option<String>,
    hidden: bool,
}

impl ProgressTrackerBuilder {
    pub fn with_len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_finish(mut self, finish: &str) -> Self {
        self.finish = Some(finish.to_string());
        self
    }

    /// Draw nothing; the bar still tracks its state.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

impl TrackerBuilder<ProgressTracker, Progress> for ProgressTrackerBuilder {
    fn build(self) -> ProgressTracker {
        let pb = match (self.hidden, self.len) {
            (true, len) => {
                let pb = ProgressBar::hidden();
                if let Some(len) = len {
                    pb.set_length(len);
                }
                pb
            }
            (false, Some(len)) => ProgressBar::new(len),
            (false, None) => ProgressBar::new_spinner(),
        };
        let pb = if let Some(style) = PB_TEMPLATE.as_ref() {
            pb.with_style(style.clone())
        } else {
            pb
        };

        if let Some(prefix) = self.prefix {
            pb.set_prefix(prefix);
        }
        ProgressTracker {
            pb,
            finish: self.finish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_is_valid() {
        assert!(PB_TEMPLATE.is_some());
    }

    #[test]
    fn test_step_follows_absolute_progress() {
        let tracker = ProgressTrackerBuilder::default().hidden().build();
        tracker.step(Progress::new(10, Some(40)));
        assert_eq!(tracker.pb.length(), Some(40));
        assert_eq!(tracker.pb.position(), 10);

        tracker.step(Progress::new(0, Some(90)));
        assert_eq!(tracker.pb.length(), Some(90));
        assert_eq!(tracker.pb.position(), 0);
    }

    #[test]
    fn test_unknown_total_keeps_length() {
        let tracker = ProgressTrackerBuilder::default().with_len(8).hidden().build();
        tracker.step(Progress::new(5, None));
        assert_eq!(tracker.pb.length(), Some(8));
        assert_eq!(tracker.pb.position(), 5);
        tracker.finish();
    }
}
