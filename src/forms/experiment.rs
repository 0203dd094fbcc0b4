use serde::Serialize;

use crate::buckets::{BucketBoard, BucketSpec, Capacity, Selection};
use crate::format::{iso_date, parse_date};
use crate::model::{DecodeError, Experiment, ExperimentStatus, RecordId};
use crate::traffic::VariantSet;

use super::{FormError, optional, required, text_of};

pub const EXPERIMENT_TEAMS: [&str; 4] = ["Data Team", "Product Team", "UX Team", "Marketing Team"];
pub const EXPERIMENT_TYPES: [&str; 3] = ["A/B Test", "Multivariate Test", "Marketing Campaign"];
pub const EXPERIMENT_OBJECTIVES: [&str; 5] = [
    "First purchase conversion",
    "Repeat purchase",
    "Churn prevention",
    "Premium conversion",
    "Purchase conversion",
];

/// Role a metric plays in an experiment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricRole {
    Primary,
    Secondary,
    Guardrail,
}

impl MetricRole {
    pub const ALL: [MetricRole; 3] = [MetricRole::Primary, MetricRole::Secondary, MetricRole::Guardrail];

    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Guardrail => "Guardrail",
        }
    }

    pub fn capacity(self) -> usize {
        match self {
            Self::Primary => 2,
            Self::Secondary | Self::Guardrail => 4,
        }
    }
}

fn metric_role_board(universe: Vec<RecordId>) -> BucketBoard<MetricRole, RecordId> {
    BucketBoard::new(
        universe,
        MetricRole::ALL
            .iter()
            .map(|role| BucketSpec::new(*role, role.label(), Capacity::AtMost(role.capacity())))
            .collect(),
    )
}

/// Editable experiment fields, variant list and metric/segment pickers.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentDraft {
    pub name: String,
    pub description: String,
    pub owner: String,
    pub team: String,
    pub experiment_type: String,
    pub status: ExperimentStatus,
    pub objective: String,
    pub hypothesis: String,
    pub background: String,
    pub start_date: String,
    pub end_date: String,
    pub ice_impact: Option<u32>,
    pub ice_confidence: Option<u32>,
    pub ice_ease: Option<u32>,
    pub significance_level: f64,
    pub statistical_power: f64,
    pub minimum_detectable_effect: f64,
    pub sample_size: Option<u64>,
    pub conditions: String,
    pub confounding_factors: String,
    pub variants: VariantSet,
    pub metrics: BucketBoard<MetricRole, RecordId>,
    pub segment: BucketBoard<Selection, RecordId>,
}

impl Default for ExperimentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            owner: String::new(),
            team: String::new(),
            experiment_type: EXPERIMENT_TYPES[0].to_string(),
            status: ExperimentStatus::Draft,
            objective: String::new(),
            hypothesis: String::new(),
            background: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            ice_impact: None,
            ice_confidence: None,
            ice_ease: None,
            significance_level: 95.0,
            statistical_power: 80.0,
            minimum_detectable_effect: 5.0,
            sample_size: None,
            conditions: String::new(),
            confounding_factors: String::new(),
            variants: VariantSet::default(),
            metrics: metric_role_board(Vec::new()),
            segment: BucketBoard::single_select(Vec::new(), "Target segment"),
        }
    }
}

/// Body of `POST /api/experiments` and `PUT /api/experiments/:id`.
///
/// `variants` and the metric id arrays are JSON-encoded strings; empty arrays
/// are sent as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExperimentPayload {
    pub name: String,
    pub description: Option<String>,
    pub owner: String,
    pub team: Option<String>,
    pub experiment_type: String,
    pub status: ExperimentStatus,
    pub objective: String,
    pub hypothesis: String,
    pub background: Option<String>,
    pub variants: String,
    pub primary_metric_id: RecordId,
    pub primary_metric_ids: Option<String>,
    pub secondary_metric_ids: Option<String>,
    pub guardrail_metric_ids: Option<String>,
    pub significance_level: f64,
    pub statistical_power: f64,
    pub minimum_detectable_effect: f64,
    pub sample_size: Option<u64>,
    pub start_date: String,
    pub end_date: String,
    pub target_segment_id: RecordId,
    pub ice_impact: Option<u32>,
    pub ice_confidence: Option<u32>,
    pub ice_ease: Option<u32>,
    pub conditions: Option<String>,
    pub confounding_factors: Option<String>,
}

impl ExperimentDraft {
    /// Seed the edit form from a fetched experiment.
    pub fn from_experiment(experiment: &Experiment) -> Result<Self, DecodeError> {
        let variants = experiment.decode_variants()?;
        let roles = [
            (MetricRole::Primary, experiment.decode_primary_metrics()?),
            (MetricRole::Secondary, experiment.decode_secondary_metrics()?),
            (MetricRole::Guardrail, experiment.decode_guardrail_metrics()?),
        ];

        let mut universe: Vec<RecordId> = Vec::new();
        for id in roles.iter().flat_map(|(_, ids)| ids.iter()) {
            if !universe.contains(id) {
                universe.push(*id);
            }
        }
        let mut metrics = metric_role_board(universe);
        for (role, ids) in roles {
            for id in ids {
                if let Err(err) = metrics.place(id, role) {
                    tracing::warn!("Experiment {}: skipping metric {id}: {err}", experiment.id);
                }
            }
        }
        let mut segment = BucketBoard::single_select(
            experiment.target_segment_id.into_iter().collect(),
            "Target segment",
        );
        if let Some(id) = experiment.target_segment_id {
            if let Err(err) = segment.place(id, Selection::Selected) {
                tracing::warn!("Experiment {}: skipping segment {id}: {err}", experiment.id);
            }
        }

        let defaults = Self::default();
        Ok(Self {
            name: experiment.name.clone(),
            description: text_of(&experiment.description),
            owner: text_of(&experiment.owner),
            team: text_of(&experiment.team),
            experiment_type: experiment
                .experiment_type
                .clone()
                .unwrap_or(defaults.experiment_type),
            status: experiment.status,
            objective: text_of(&experiment.objective),
            hypothesis: text_of(&experiment.hypothesis),
            background: text_of(&experiment.background),
            start_date: experiment
                .start_date
                .as_deref()
                .and_then(parse_date)
                .map(iso_date)
                .unwrap_or_default(),
            end_date: experiment
                .end_date
                .as_deref()
                .and_then(parse_date)
                .map(iso_date)
                .unwrap_or_default(),
            ice_impact: experiment.ice_impact,
            ice_confidence: experiment.ice_confidence,
            ice_ease: experiment.ice_ease,
            significance_level: experiment
                .significance_level
                .unwrap_or(defaults.significance_level),
            statistical_power: experiment
                .statistical_power
                .unwrap_or(defaults.statistical_power),
            minimum_detectable_effect: experiment
                .minimum_detectable_effect
                .unwrap_or(defaults.minimum_detectable_effect),
            sample_size: experiment.sample_size,
            conditions: text_of(&experiment.conditions),
            confounding_factors: text_of(&experiment.confounding_factors),
            variants: if variants.is_empty() {
                VariantSet::default()
            } else {
                VariantSet::from_variants(variants)
            },
            metrics,
            segment,
        })
    }

    /// Refresh picker universes after metrics and segments load; current
    /// selections are kept.
    pub fn set_universes(&mut self, metric_ids: Vec<RecordId>, segment_ids: Vec<RecordId>) {
        self.metrics
            .set_universe(keep_selected(metric_ids, self.metrics.assigned_ids()));
        self.segment
            .set_universe(keep_selected(segment_ids, self.segment.selected().to_vec()));
    }

    pub fn target_segment(&self) -> Option<RecordId> {
        self.segment.selected().first().copied()
    }

    /// Whole days from start to end, when both dates parse and end is later.
    pub fn duration_days(&self) -> Option<i64> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        let days = (end - start).whole_days();
        (days > 0).then_some(days)
    }

    pub fn ice_total(&self) -> Option<u32> {
        self.ice_impact?
            .checked_add(self.ice_confidence?)?
            .checked_add(self.ice_ease?)
    }

    pub fn validate(&self) -> Result<ExperimentPayload, FormError> {
        let name = required(&self.name, "Name")?;
        let owner = required(&self.owner, "Owner")?;
        let objective = required(&self.objective, "Objective")?;
        let hypothesis = required(&self.hypothesis, "Hypothesis")?;

        let primary = self.metrics.contents(MetricRole::Primary);
        let primary_metric_id = *primary.first().ok_or(FormError::NoPrimaryMetric)?;

        if self.start_date.trim().is_empty() || self.end_date.trim().is_empty() {
            return Err(FormError::MissingDates);
        }
        let start = parse_date(&self.start_date).ok_or(FormError::InvalidDate("Start date"))?;
        let end = parse_date(&self.end_date).ok_or(FormError::InvalidDate("End date"))?;
        if start >= end {
            return Err(FormError::DatesOutOfOrder);
        }

        let target_segment_id = self.target_segment().ok_or(FormError::NoTargetSegment)?;
        self.variants.validate()?;
        if self.variants.len() < 2 {
            return Err(FormError::TooFewVariants);
        }
        if !self.variants.has_control() {
            return Err(FormError::MissingControl);
        }

        Ok(ExperimentPayload {
            name,
            description: optional(&self.description),
            owner,
            team: optional(&self.team),
            experiment_type: self.experiment_type.clone(),
            status: self.status,
            objective,
            hypothesis,
            background: optional(&self.background),
            variants: self.variants.to_json(),
            primary_metric_id,
            primary_metric_ids: encode_ids(primary),
            secondary_metric_ids: encode_ids(self.metrics.contents(MetricRole::Secondary)),
            guardrail_metric_ids: encode_ids(self.metrics.contents(MetricRole::Guardrail)),
            significance_level: self.significance_level,
            statistical_power: self.statistical_power,
            minimum_detectable_effect: self.minimum_detectable_effect,
            sample_size: self.sample_size,
            start_date: iso_date(start),
            end_date: iso_date(end),
            target_segment_id,
            ice_impact: self.ice_impact,
            ice_confidence: self.ice_confidence,
            ice_ease: self.ice_ease,
            conditions: optional(&self.conditions),
            confounding_factors: optional(&self.confounding_factors),
        })
    }
}

fn keep_selected(mut universe: Vec<RecordId>, selected: Vec<RecordId>) -> Vec<RecordId> {
    for id in selected {
        if !universe.contains(&id) {
            universe.push(id);
        }
    }
    universe
}

fn encode_ids(ids: &[RecordId]) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    serde_json::to_string(ids).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::TrafficError;

    fn ready_draft() -> ExperimentDraft {
        let mut draft = ExperimentDraft {
            name: "Coupon".into(),
            owner: "Kim".into(),
            objective: "Repeat purchase".into(),
            hypothesis: "Coupons lift repeat purchases".into(),
            start_date: "2024-11-01".into(),
            end_date: "2024-11-30".into(),
            ..ExperimentDraft::default()
        };
        draft.set_universes(vec![1, 2, 3, 4, 5, 6, 7], vec![10, 20]);
        draft.metrics.place(1, MetricRole::Primary).unwrap();
        draft.segment.place(10, Selection::Selected).unwrap();
        draft
    }

    #[test]
    fn ready_draft_builds_encoded_payload() {
        let mut draft = ready_draft();
        draft.metrics.place(3, MetricRole::Secondary).unwrap();
        draft.metrics.place(2, MetricRole::Secondary).unwrap();
        let payload = draft.validate().unwrap();
        assert_eq!(payload.primary_metric_id, 1);
        assert_eq!(payload.primary_metric_ids.as_deref(), Some("[1]"));
        assert_eq!(payload.secondary_metric_ids.as_deref(), Some("[3,2]"));
        assert_eq!(payload.guardrail_metric_ids, None);
        assert_eq!(payload.target_segment_id, 10);
        assert!(payload.variants.starts_with("[{\"name\":\"Control\""));

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["guardrail_metric_ids"].is_null());
        assert_eq!(json["status"], "draft");
    }

    #[test]
    fn validation_runs_in_screen_order() {
        let mut draft = ready_draft();
        draft.hypothesis.clear();
        draft.metrics.clear();
        assert_eq!(draft.validate(), Err(FormError::Required("Hypothesis")));

        draft.hypothesis = "h".into();
        assert_eq!(draft.validate(), Err(FormError::NoPrimaryMetric));

        draft.metrics.place(1, MetricRole::Primary).unwrap();
        draft.end_date.clear();
        assert_eq!(draft.validate(), Err(FormError::MissingDates));

        draft.end_date = "2024-11-01".into();
        assert_eq!(draft.validate(), Err(FormError::DatesOutOfOrder));

        draft.end_date = "30/11/2024".into();
        assert_eq!(draft.validate(), Err(FormError::InvalidDate("End date")));

        draft.end_date = "2024-11-30".into();
        draft.segment.clear();
        assert_eq!(draft.validate(), Err(FormError::NoTargetSegment));
    }

    #[test]
    fn traffic_and_variant_rules() {
        let mut draft = ready_draft();
        draft.variants.set_allocation(1, 40).unwrap();
        assert_eq!(
            draft.validate(),
            Err(FormError::Traffic(TrafficError::NotFull(90)))
        );

        draft.variants.set_allocation(0, 100).unwrap();
        draft.variants.remove(1).unwrap();
        assert_eq!(draft.validate(), Err(FormError::TooFewVariants));
    }

    #[test]
    fn primary_role_is_capped_at_two() {
        let mut draft = ready_draft();
        draft.metrics.place(2, MetricRole::Primary).unwrap();
        draft.metrics.place(7, MetricRole::Guardrail).unwrap();
        assert!(draft.metrics.place(7, MetricRole::Primary).is_err());
        assert_eq!(draft.metrics.contents(MetricRole::Primary), &[1, 2]);
        assert_eq!(draft.metrics.bucket_of(&7), Some(MetricRole::Guardrail));
    }

    #[test]
    fn derived_readouts() {
        let mut draft = ready_draft();
        assert_eq!(draft.duration_days(), Some(29));
        assert_eq!(draft.ice_total(), None);
        draft.ice_impact = Some(8);
        draft.ice_confidence = Some(6);
        draft.ice_ease = Some(4);
        assert_eq!(draft.ice_total(), Some(18));
        draft.ice_impact = Some(u32::MAX);
        assert_eq!(draft.ice_total(), None);
    }

    #[test]
    fn edit_round_trips_through_experiment() {
        let experiment: Experiment = serde_json::from_str(
            r#"{
                "id": 4, "name": "Onboarding", "owner": "Lee", "objective": "o", "hypothesis": "h",
                "status": "running",
                "variants": "[{\"name\":\"Control\",\"traffic_allocation\":70},{\"name\":\"Variant A\",\"traffic_allocation\":30}]",
                "primary_metric_ids": "[5]", "guardrail_metric_ids": "[\"6\"]",
                "start_date": "2024-11-15", "end_date": "2024-12-10T00:00:00",
                "target_segment_id": 20
            }"#,
        )
        .unwrap();
        let mut draft = ExperimentDraft::from_experiment(&experiment).unwrap();
        assert_eq!(draft.status, ExperimentStatus::Running);
        assert_eq!(draft.end_date, "2024-12-10");
        assert_eq!(draft.variants.total(), 100);
        assert_eq!(draft.metrics.contents(MetricRole::Guardrail), &[6]);
        assert_eq!(draft.target_segment(), Some(20));

        draft.set_universes(vec![5, 6, 7], vec![10, 20, 30]);
        let payload = draft.validate().unwrap();
        assert_eq!(payload.target_segment_id, 20);
        assert_eq!(payload.guardrail_metric_ids.as_deref(), Some("[6]"));
    }
}
