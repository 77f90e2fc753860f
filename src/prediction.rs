//! Mock prediction service.
//!
//! Looks models up in the catalog and returns the canned result list for the
//! model's disease category after a simulated inference delay. The submitted
//! inputs are accepted but do not influence the output: two runs of the same
//! model always return the same sequence.
//!
//! Also derives the model-dashboard series: metric percentages, a synthetic
//! training curve and the fixed confusion matrix.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::mock_data;
use crate::models::{ModelMetadata, ModelPerformance, PredictionResult, SymptomInput};
use crate::task::PendingTask;

pub struct PredictionService {
    models: Vec<ModelMetadata>,
    delay: Duration,
}

impl PredictionService {
    /// Service over the demo model catalog.
    pub fn new(delay: Duration) -> Self {
        Self::with_models(mock_data::models(), delay)
    }

    pub fn with_models(models: Vec<ModelMetadata>, delay: Duration) -> Self {
        Self { models, delay }
    }

    pub fn list_models(&self) -> &[ModelMetadata] {
        &self.models
    }

    pub fn find_model(&self, model_id: &str) -> Option<&ModelMetadata> {
        self.models.iter().find(|m| m.id == model_id)
    }

    /// Canonical input template for a disease category; unknown → empty.
    pub fn get_symptom_template(&self, category: &str) -> Vec<SymptomInput> {
        mock_data::symptom_template(category)
    }

    /// Input template for a model's category; unknown model → empty.
    pub fn template_for_model(&self, model_id: &str) -> Vec<SymptomInput> {
        self.find_model(model_id)
            .map(|m| self.get_symptom_template(&m.disease_category))
            .unwrap_or_default()
    }

    /// Immediate prediction. Unknown model → empty, never an error.
    pub fn predict(&self, model_id: &str, inputs: &[SymptomInput]) -> Vec<PredictionResult> {
        let Some(model) = self.find_model(model_id) else {
            tracing::debug!(model_id, "Prediction requested for unknown model");
            return Vec::new();
        };
        tracing::debug!(
            model_id,
            category = %model.disease_category,
            inputs = inputs.len(),
            "Running mock prediction"
        );
        mock_data::canned_predictions(&model.disease_category)
    }

    /// `predict` after the simulated inference delay.
    pub fn run_prediction(
        self: &Arc<Self>,
        model_id: &str,
        inputs: Vec<SymptomInput>,
    ) -> PendingTask<Vec<PredictionResult>> {
        let service = Arc::clone(self);
        let model_id = model_id.to_string();
        PendingTask::delayed("prediction", self.delay, move || {
            service.predict(&model_id, &inputs)
        })
    }

    pub fn get_model_performance(&self, model_id: &str) -> Option<ModelPerformance> {
        self.find_model(model_id)?;
        mock_data::model_performance(model_id)
    }

    /// Radar-chart series: each score as a percentage.
    pub fn performance_metrics(&self, model_id: &str) -> Vec<MetricPoint> {
        let Some(perf) = self.get_model_performance(model_id) else {
            return Vec::new();
        };
        [
            ("Accuracy", perf.accuracy),
            ("Precision", perf.precision),
            ("Recall", perf.recall),
            ("F1 Score", perf.f1_score),
            ("AUC", perf.auc),
        ]
        .into_iter()
        .map(|(metric, value)| MetricPoint {
            metric: metric.to_string(),
            value: round_to(value * 100.0, 1),
        })
        .collect()
    }
}

// ═══════════════════════════════════════════════════════════
// Dashboard series
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub metric: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingEpoch {
    pub epoch: u32,
    pub accuracy: f64,
    pub loss: f64,
    pub val_accuracy: f64,
    pub val_loss: f64,
}

const INITIAL_ACCURACY: f64 = 0.65;
const INITIAL_LOSS: f64 = 0.75;
const ACCURACY_CAP: f64 = 0.98;
const LOSS_FLOOR: f64 = 0.05;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Synthetic training curve: accuracy climbs towards 0.98, loss falls towards 0.05.
pub fn training_history<R: Rng>(epochs: u32, rng: &mut R) -> Vec<TrainingEpoch> {
    let mut accuracy = INITIAL_ACCURACY;
    let mut loss = INITIAL_LOSS;

    (1..=epochs)
        .map(|epoch| {
            accuracy = (accuracy + rng.gen_range(0.0..0.03)).min(ACCURACY_CAP);
            loss = (loss - rng.gen_range(0.0..0.04)).max(LOSS_FLOOR);
            TrainingEpoch {
                epoch,
                accuracy: round_to(accuracy, 3),
                loss: round_to(loss, 3),
                val_accuracy: round_to(accuracy - rng.gen_range(0.0..0.05), 3),
                val_loss: round_to(loss + rng.gen_range(0.0..0.08), 3),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    /// `rows[actual][predicted]`
    pub rows: Vec<Vec<u32>>,
}

impl ConfusionMatrix {
    pub fn total(&self) -> u32 {
        self.rows.iter().flatten().sum()
    }

    /// Fraction of all samples on the diagonal.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: u32 = self.rows.iter().enumerate().map(|(i, row)| row[i]).sum();
        correct as f64 / total as f64
    }

    /// Recall per class, in label order.
    pub fn recall_per_class(&self) -> Vec<f64> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let actual: u32 = row.iter().sum();
                if actual == 0 {
                    0.0
                } else {
                    row[i] as f64 / actual as f64
                }
            })
            .collect()
    }
}

pub fn confusion_matrix() -> ConfusionMatrix {
    ConfusionMatrix {
        labels: mock_data::CONFUSION_LABELS.iter().map(|l| l.to_string()).collect(),
        rows: mock_data::CONFUSION_MATRIX.iter().map(|r| r.to_vec()).collect(),
    }
}
