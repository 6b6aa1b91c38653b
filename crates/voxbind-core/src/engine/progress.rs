/// Events emitted while a workflow runs.
///
/// Item events may arrive from worker threads in any order; a stage's
/// `StageStart` always precedes its items and `StageFinish` follows them.
#[derive(Debug, Clone)]
pub enum Progress {
    StageStart { name: &'static str, total_items: u64 },
    ItemCompleted { label: String },
    ItemFailed { label: String, reason: String },
    StageFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    /// A reporter that drops every event.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    pub(crate) fn item_finished<T, E: std::fmt::Display>(
        &self,
        label: impl Into<String>,
        result: &Result<T, E>,
    ) {
        let label = label.into();
        match result {
            Ok(_) => self.report(Progress::ItemCompleted { label }),
            Err(e) => self.report(Progress::ItemFailed {
                label,
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        ProgressReporter::new().report(Progress::Message("ignored".to_string()));
    }

    #[test]
    fn item_finished_maps_results_to_events() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));

        reporter.item_finished("0001", &Ok::<(), String>(()));
        reporter.item_finished("0002", &Err::<(), String>("boom".to_string()));
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert!(matches!(&events[0], Progress::ItemCompleted { label } if label == "0001"));
        assert!(matches!(
            &events[1],
            Progress::ItemFailed { label, reason } if label == "0002" && reason == "boom"
        ));
    }
}
