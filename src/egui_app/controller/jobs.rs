use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::api::{ApiClient, ApiError, TimeRange};
use crate::egui_app::state::RecordKind;
use crate::model::{
    Experiment, Insight, Metric, MetricStats, RecordId, RecordList, Segment, SegmentStats,
    TimeseriesPoint,
};

/// Result of one background API call.
pub(crate) enum JobMessage {
    MetricsLoaded(Result<RecordList<Metric>, ApiError>),
    MetricStatsLoaded(Result<MetricStats, ApiError>),
    MetricLoaded {
        id: RecordId,
        result: Result<Metric, ApiError>,
    },
    TimeseriesLoaded {
        id: RecordId,
        range: TimeRange,
        result: Result<Vec<TimeseriesPoint>, ApiError>,
    },
    MetricSaved {
        editing: Option<RecordId>,
        result: Result<Metric, ApiError>,
    },
    PrioritiesSaved {
        failed: usize,
        total: usize,
    },
    SegmentsLoaded(Result<RecordList<Segment>, ApiError>),
    SegmentStatsLoaded(Result<SegmentStats, ApiError>),
    SegmentLoaded {
        id: RecordId,
        result: Result<Segment, ApiError>,
    },
    SegmentSaved {
        editing: Option<RecordId>,
        result: Result<Segment, ApiError>,
    },
    ExperimentsLoaded(Result<RecordList<Experiment>, ApiError>),
    ExperimentLoaded {
        id: RecordId,
        result: Result<Experiment, ApiError>,
    },
    ExperimentSaved {
        editing: Option<RecordId>,
        result: Result<Experiment, ApiError>,
    },
    InsightsLoaded(Result<RecordList<Insight>, ApiError>),
    InsightLoaded {
        id: RecordId,
        result: Result<Insight, ApiError>,
    },
    InsightCreated(Result<Insight, ApiError>),
    Deleted {
        kind: RecordKind,
        id: RecordId,
        result: Result<(), ApiError>,
    },
}

/// Channel that worker threads report back through.
pub(super) struct JobQueue {
    tx: Sender<JobMessage>,
    rx: Receiver<JobMessage>,
    repaint: Option<egui::Context>,
    in_flight: usize,
}

impl JobQueue {
    pub(super) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            repaint: None,
            in_flight: 0,
        }
    }

    pub(super) fn set_repaint(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub(super) fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(super) fn spawn<F>(&mut self, api: &ApiClient, job: F)
    where
        F: FnOnce(&ApiClient) -> JobMessage + Send + 'static,
    {
        let tx = self.tx.clone();
        let api = api.clone();
        let repaint = self.repaint.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let message = job(&api);
            if tx.send(message).is_ok() {
                if let Some(ctx) = repaint {
                    ctx.request_repaint();
                }
            }
        });
    }

    /// Next finished job, if any; never blocks.
    pub(super) fn try_recv(&mut self) -> Option<JobMessage> {
        let message = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(message)
    }
}
