//! Four-step insight authoring flow as a pure reducer.
//!
//! `SelectExperiment → ReviewResults → Author → Preview`. The state carries
//! everything collected so far; the UI only renders it and dispatches actions.

use thiserror::Error;

use crate::format::{format_lift, format_number};
use crate::model::{Experiment, NewInsight};

pub const DEFAULT_INSIGHT_TYPE: &str = "A/B Test";
pub const DEFAULT_IMPACT: u8 = 3;
pub const MIN_IMPACT: u8 = 1;
pub const MAX_IMPACT: u8 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    #[default]
    SelectExperiment,
    ReviewResults,
    Author,
    Preview,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::SelectExperiment,
        WizardStep::ReviewResults,
        WizardStep::Author,
        WizardStep::Preview,
    ];

    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SelectExperiment => "Select experiment",
            Self::ReviewResults => "Review results",
            Self::Author => "Write insight",
            Self::Preview => "Preview",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::SelectExperiment => Self::ReviewResults,
            Self::ReviewResults => Self::Author,
            Self::Author | Self::Preview => Self::Preview,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::SelectExperiment | Self::ReviewResults => Self::SelectExperiment,
            Self::Author => Self::ReviewResults,
            Self::Preview => Self::Author,
        }
    }
}

/// Free-text fields authored in the wizard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsightForm {
    pub title: String,
    pub category: String,
    pub insight_type: String,
    pub summary: String,
    pub findings: String,
    pub recommendations: String,
    pub impact_score: u8,
    pub attach_charts: bool,
}

impl Default for InsightForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: String::new(),
            insight_type: DEFAULT_INSIGHT_TYPE.to_string(),
            summary: String::new(),
            findings: String::new(),
            recommendations: String::new(),
            impact_score: DEFAULT_IMPACT,
            attach_charts: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WizardAction {
    SelectExperiment(Box<Experiment>),
    Next,
    Back,
    SetTitle(String),
    SetCategory(String),
    SetType(String),
    SetSummary(String),
    SetFindings(String),
    SetRecommendations(String),
    SetImpact(i64),
    SetAttachCharts(bool),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Select an experiment first")]
    NoExperiment,
    #[error("A title is required")]
    TitleRequired,
    #[error("Only analyzing or complete experiments can be summarized")]
    NotFinished,
    #[error("Experiments can only be chosen on the first step")]
    SelectionClosed,
    #[error("The insight can only be saved from the preview")]
    NotOnPreview,
}

/// Current step plus everything collected so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardState {
    pub step: WizardStep,
    pub experiment: Option<Experiment>,
    pub form: InsightForm,
}

/// Apply `action` to `state`, returning the next state.
pub fn reduce(state: &WizardState, action: WizardAction) -> Result<WizardState, WizardError> {
    let mut next = state.clone();
    match action {
        WizardAction::SelectExperiment(experiment) => {
            if state.step != WizardStep::SelectExperiment {
                return Err(WizardError::SelectionClosed);
            }
            if !experiment.status.is_finished() {
                return Err(WizardError::NotFinished);
            }
            next.form.category = experiment.objective.clone().unwrap_or_default();
            next.form.insight_type = experiment
                .experiment_type
                .clone()
                .unwrap_or_else(|| DEFAULT_INSIGHT_TYPE.to_string());
            next.form.summary = summary_sentence(&experiment);
            next.experiment = Some(*experiment);
            next.step = WizardStep::ReviewResults;
        }
        WizardAction::Next => {
            match state.step {
                WizardStep::SelectExperiment if state.experiment.is_none() => {
                    return Err(WizardError::NoExperiment);
                }
                WizardStep::Author if state.form.title.trim().is_empty() => {
                    return Err(WizardError::TitleRequired);
                }
                _ => {}
            }
            next.step = state.step.next();
        }
        WizardAction::Back => next.step = state.step.previous(),
        WizardAction::SetTitle(value) => next.form.title = value,
        WizardAction::SetCategory(value) => next.form.category = value,
        WizardAction::SetType(value) => next.form.insight_type = value,
        WizardAction::SetSummary(value) => next.form.summary = value,
        WizardAction::SetFindings(value) => next.form.findings = value,
        WizardAction::SetRecommendations(value) => next.form.recommendations = value,
        WizardAction::SetImpact(value) => {
            next.form.impact_score =
                value.clamp(i64::from(MIN_IMPACT), i64::from(MAX_IMPACT)) as u8;
        }
        WizardAction::SetAttachCharts(value) => next.form.attach_charts = value,
    }
    Ok(next)
}

impl WizardState {
    pub fn apply(&mut self, action: WizardAction) -> Result<(), WizardError> {
        *self = reduce(self, action)?;
        Ok(())
    }

    /// Package the collected fields; only allowed on the preview step.
    pub fn finish(&self) -> Result<NewInsight, WizardError> {
        if self.step != WizardStep::Preview {
            return Err(WizardError::NotOnPreview);
        }
        let experiment = self.experiment.as_ref().ok_or(WizardError::NoExperiment)?;
        let title = self.form.title.trim();
        if title.is_empty() {
            return Err(WizardError::TitleRequired);
        }
        Ok(NewInsight {
            title: title.to_string(),
            category: self.form.category.trim().to_string(),
            insight_type: self.form.insight_type.clone(),
            summary: self.form.summary.trim().to_string(),
            findings: self.form.findings.trim().to_string(),
            recommendations: self.form.recommendations.trim().to_string(),
            impact_score: self.form.impact_score,
            attach_charts: self.form.attach_charts,
            experiment_id: Some(experiment.id),
        })
    }
}

/// One-line result summary used to pre-fill the insight.
pub fn summary_sentence(experiment: &Experiment) -> String {
    let period = experiment.period_label();
    match &experiment.results {
        Some(results) => format!(
            "{} ran {}: {} moved from {}% to {}% ({}).",
            experiment.name,
            period,
            results.metric,
            format_number(Some(results.baseline_value), 2),
            format_number(Some(results.treatment_value), 2),
            format_lift(results.lift_percent()),
        ),
        None => format!("{} ran {}.", experiment.name, period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExperimentStatus;

    fn experiment() -> Experiment {
        serde_json::from_str(
            r#"{
                "id": 2, "name": "Onboarding flow", "objective": "First purchase conversion",
                "experiment_type": "A/B Test", "status": "complete",
                "start_date": "2024-11-15", "end_date": "2024-12-10",
                "results": {"metric": "CVR", "baseline_value": 10.0, "treatment_value": 15.0}
            }"#,
        )
        .unwrap()
    }

    fn at_author() -> WizardState {
        let state = WizardState::default();
        let state = reduce(&state, WizardAction::SelectExperiment(Box::new(experiment()))).unwrap();
        reduce(&state, WizardAction::Next).unwrap()
    }

    #[test]
    fn next_requires_an_experiment() {
        let state = WizardState::default();
        assert_eq!(reduce(&state, WizardAction::Next), Err(WizardError::NoExperiment));
        assert_eq!(reduce(&state, WizardAction::Back).unwrap().step, WizardStep::SelectExperiment);
    }

    #[test]
    fn selecting_prefills_and_advances() {
        let state = reduce(
            &WizardState::default(),
            WizardAction::SelectExperiment(Box::new(experiment())),
        )
        .unwrap();
        assert_eq!(state.step, WizardStep::ReviewResults);
        assert_eq!(state.form.category, "First purchase conversion");
        assert_eq!(state.form.insight_type, "A/B Test");
        assert_eq!(
            state.form.summary,
            "Onboarding flow ran 2024-11-15 ~ 2024-12-10: CVR moved from 10.00% to 15.00% (+50.0%)."
        );
        assert_eq!(
            reduce(&state, WizardAction::SelectExperiment(Box::new(experiment()))),
            Err(WizardError::SelectionClosed)
        );
    }

    #[test]
    fn only_finished_experiments_can_be_selected() {
        let mut running = experiment();
        running.status = ExperimentStatus::Running;
        assert_eq!(
            reduce(&WizardState::default(), WizardAction::SelectExperiment(Box::new(running))),
            Err(WizardError::NotFinished)
        );
        let mut analyzing = experiment();
        analyzing.status = ExperimentStatus::Analyzing;
        let state = reduce(
            &WizardState::default(),
            WizardAction::SelectExperiment(Box::new(analyzing)),
        )
        .unwrap();
        assert_eq!(state.step, WizardStep::ReviewResults);
    }

    #[test]
    fn author_step_requires_title() {
        let state = at_author();
        assert_eq!(state.step, WizardStep::Author);
        assert_eq!(reduce(&state, WizardAction::Next), Err(WizardError::TitleRequired));
        let state = reduce(&state, WizardAction::SetTitle("Shorter onboarding wins".into())).unwrap();
        assert_eq!(reduce(&state, WizardAction::Next).unwrap().step, WizardStep::Preview);
    }

    #[test]
    fn impact_is_clamped() {
        let mut state = at_author();
        state.apply(WizardAction::SetImpact(9)).unwrap();
        assert_eq!(state.form.impact_score, 5);
        state.apply(WizardAction::SetImpact(-2)).unwrap();
        assert_eq!(state.form.impact_score, 1);
    }

    #[test]
    fn finish_only_from_preview() {
        let mut state = at_author();
        state.apply(WizardAction::SetTitle(" Win ".into())).unwrap();
        state.apply(WizardAction::SetAttachCharts(false)).unwrap();
        assert_eq!(state.finish(), Err(WizardError::NotOnPreview));

        state.apply(WizardAction::Next).unwrap();
        let insight = state.finish().unwrap();
        assert_eq!(insight.title, "Win");
        assert_eq!(insight.experiment_id, Some(2));
        assert_eq!(insight.impact_score, DEFAULT_IMPACT);
        assert!(!insight.attach_charts);

        state.apply(WizardAction::Back).unwrap();
        assert_eq!(state.step, WizardStep::Author);
    }
}
