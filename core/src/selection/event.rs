use crate::error::{DexaError, Result};
use crate::types::BodyPart;
use serde::{Deserialize, Serialize};

/// User interaction delivered to a dashboard session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// A body-part toggle button was clicked
    ButtonClick { body_part: BodyPart },

    /// The patient dropdown changed (`None` clears it)
    PatientChange { patient: Option<String> },
}

/// Wire form of an event, before the body part is validated
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawEvent {
    ButtonClick { body_part: String },
    PatientChange {
        #[serde(default)]
        patient: Option<String>,
    },
}

impl DashboardEvent {
    /// Decodes an event from its JSON payload
    ///
    /// Payloads look like `{"kind": "button_click", "body_part": "Left Arm"}`
    /// or `{"kind": "patient_change", "patient": "Jane Doe"}`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEvent` for malformed JSON or an unknown kind, and
    /// `UnknownSelection` for a body part outside the button universe.
    ///
    /// # Example
    ///
    /// ```
    /// use dexa_core::{BodyPart, DashboardEvent};
    ///
    /// let event = DashboardEvent::from_json(r#"{"kind":"button_click","body_part":"Left Arm"}"#).unwrap();
    /// assert_eq!(event, DashboardEvent::ButtonClick { body_part: BodyPart::LeftArm });
    /// ```
    pub fn from_json(payload: &str) -> Result<Self> {
        let raw: RawEvent = serde_json::from_str(payload)?;
        match raw {
            RawEvent::ButtonClick { body_part } => Ok(DashboardEvent::ButtonClick {
                body_part: body_part.parse()?,
            }),
            RawEvent::PatientChange { patient } => Ok(DashboardEvent::PatientChange {
                patient: patient
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty()),
            }),
        }
    }

    /// Encodes the event as a JSON payload
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DexaError::InvalidEvent(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_button_click() {
        let event =
            DashboardEvent::from_json(r#"{"kind":"button_click","body_part":"gynoid"}"#).unwrap();
        assert_eq!(
            event,
            DashboardEvent::ButtonClick {
                body_part: BodyPart::Gynoid
            }
        );
    }

    #[test]
    fn test_decode_patient_change() {
        let event =
            DashboardEvent::from_json(r#"{"kind":"patient_change","patient":" Jane Doe "}"#)
                .unwrap();
        assert_eq!(
            event,
            DashboardEvent::PatientChange {
                patient: Some("Jane Doe".to_string())
            }
        );
    }

    #[test]
    fn test_decode_patient_cleared() {
        for payload in [
            r#"{"kind":"patient_change","patient":null}"#,
            r#"{"kind":"patient_change"}"#,
            r#"{"kind":"patient_change","patient":""}"#,
        ] {
            assert_eq!(
                DashboardEvent::from_json(payload).unwrap(),
                DashboardEvent::PatientChange { patient: None }
            );
        }
    }

    #[test]
    fn test_decode_unknown_body_part() {
        let err = DashboardEvent::from_json(r#"{"kind":"button_click","body_part":"Torso"}"#)
            .unwrap_err();
        assert!(matches!(err, DexaError::UnknownSelection(_)));
    }

    #[test]
    fn test_decode_malformed_payloads() {
        for payload in [
            "{'type': 'body-part-button', 'index': 'Total'}",
            r#"{"kind":"dropdown_open"}"#,
            r#"{"kind":"button_click"}"#,
            "",
        ] {
            let err = DashboardEvent::from_json(payload).unwrap_err();
            assert!(
                matches!(err, DexaError::InvalidEvent(_)),
                "{} should be rejected as invalid",
                payload
            );
        }
    }

    #[test]
    fn test_encode_uses_labels() {
        let event = DashboardEvent::ButtonClick {
            body_part: BodyPart::RightLeg,
        };
        let json = event.to_json().unwrap();
        assert_eq!(json, r#"{"kind":"button_click","body_part":"Right Leg"}"#);
        assert_eq!(DashboardEvent::from_json(&json).unwrap(), event);
    }
}
