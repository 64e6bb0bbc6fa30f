use super::{DashboardEvent, SelectionState};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::metrics::TrendView;
use crate::types::{BodyPart, DashboardConfig, ToggleMode};
use log::{debug, warn};
use std::sync::Arc;

/// State of one dashboard session
///
/// Owns the only mutable data in the core: the body-part selection and the
/// chosen patient. The dataset is a shared read-only snapshot. Sessions are
/// deliberately not `Clone`; each one is driven by its own sequential event
/// stream.
#[derive(Debug)]
pub struct DashboardSession {
    dataset: Arc<Dataset>,
    mode: ToggleMode,
    selection: SelectionState,
    patient: Option<String>,
}

impl DashboardSession {
    /// Opens a session with the initial `{Total}` selection and no patient
    pub fn new(dataset: Arc<Dataset>, config: &DashboardConfig) -> Self {
        Self {
            dataset,
            mode: config.toggle_mode,
            selection: SelectionState::default(),
            patient: None,
        }
    }

    /// Builder: Start with a patient already chosen
    pub fn with_patient(mut self, patient: impl Into<String>) -> Self {
        self.patient = Some(patient.into());
        self
    }

    /// Current body-part selection
    pub fn get_selection_state(&self) -> &SelectionState {
        &self.selection
    }

    /// Currently selected patient, if any
    pub fn patient(&self) -> Option<&str> {
        self.patient.as_deref()
    }

    /// Toggle semantics in effect for this session
    pub fn mode(&self) -> ToggleMode {
        self.mode
    }

    /// The snapshot this session reads from
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Applies a button click and returns the new selection
    pub fn toggle(&mut self, clicked: BodyPart) -> &SelectionState {
        let next = self.selection.toggle(clicked, self.mode);
        debug!("Toggle {}: {} -> {}", clicked, self.selection, next);
        self.selection = next;
        &self.selection
    }

    /// Changes (or clears) the selected patient
    pub fn set_patient(&mut self, patient: Option<String>) {
        if let Some(name) = patient.as_deref() {
            if !self.dataset.patients().iter().any(|p| p == name) {
                warn!("Patient '{}' has no rows in the dataset", name);
            }
        }
        self.patient = patient;
    }

    /// Applies a decoded event
    pub fn handle_event(&mut self, event: DashboardEvent) -> &SelectionState {
        match event {
            DashboardEvent::ButtonClick { body_part } => self.toggle(body_part),
            DashboardEvent::PatientChange { patient } => {
                self.set_patient(patient);
                &self.selection
            }
        }
    }

    /// Decodes and applies an event payload
    ///
    /// # Errors
    ///
    /// A payload that fails to decode is rejected and the session is left
    /// unchanged; see [`DashboardEvent::from_json`].
    pub fn handle_json(&mut self, payload: &str) -> Result<&SelectionState> {
        match DashboardEvent::from_json(payload) {
            Ok(event) => Ok(self.handle_event(event)),
            Err(e) => {
                warn!("Rejected event {}: {}", payload, e);
                Err(e)
            }
        }
    }

    /// Derives the body-part trend view for the current patient and selection
    ///
    /// # Errors
    ///
    /// Returns `NoData` when nothing matches; callers render
    /// [`DexaError::user_message`](crate::DexaError::user_message).
    pub fn trend_view(&self) -> Result<TrendView> {
        TrendView::build(self.dataset.scans(), self.patient(), &self.selection)
    }
}
