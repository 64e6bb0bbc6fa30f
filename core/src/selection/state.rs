use crate::types::{BodyPart, BodyPartGroup, ToggleMode, BODY_PART_GROUPS};
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Active body-part buttons of one dashboard session
///
/// Never empty: a transition that would clear every button falls back to
/// `{Total}`. Total is exclusive; it is never selected together with
/// another part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SelectionState {
    parts: BTreeSet<BodyPart>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::total()
    }
}

impl SelectionState {
    /// The initial selection, `{Total}`
    pub fn total() -> Self {
        Self {
            parts: BTreeSet::from([BodyPart::Total]),
        }
    }

    /// Builds a selection from arbitrary parts, restoring the invariants
    ///
    /// Total wins over any other part and an empty input yields `{Total}`.
    pub fn from_parts(parts: impl IntoIterator<Item = BodyPart>) -> Self {
        let parts: BTreeSet<BodyPart> = parts.into_iter().collect();
        if parts.is_empty() || parts.contains(&BodyPart::Total) {
            Self::total()
        } else {
            Self { parts }
        }
    }

    /// Selected parts, in button order
    pub fn parts(&self) -> &BTreeSet<BodyPart> {
        &self.parts
    }

    /// Number of selected parts (always at least 1)
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Checks if a button is currently selected
    pub fn is_selected(&self, part: BodyPart) -> bool {
        self.parts.contains(&part)
    }

    /// Checks if the selection is exactly `{Total}`
    pub fn is_total(&self) -> bool {
        self.parts.len() == 1 && self.parts.contains(&BodyPart::Total)
    }

    /// Applies one button click and returns the resulting selection
    ///
    /// Pure and total: the receiver is left untouched and the result is
    /// always a valid, non-empty selection.
    ///
    /// # Example
    ///
    /// ```
    /// use dexa_core::{BodyPart, SelectionState, ToggleMode};
    ///
    /// let start = SelectionState::total();
    /// let arms = start
    ///     .toggle(BodyPart::LeftArm, ToggleMode::Accumulate)
    ///     .toggle(BodyPart::RightArm, ToggleMode::Accumulate);
    /// assert_eq!(arms.len(), 2);
    /// assert!(!arms.is_selected(BodyPart::Total));
    ///
    /// let back = arms.toggle(BodyPart::Total, ToggleMode::Accumulate);
    /// assert!(back.is_total());
    /// ```
    pub fn toggle(&self, clicked: BodyPart, mode: ToggleMode) -> SelectionState {
        if clicked.is_total() {
            return Self::total();
        }

        let mut parts = match mode {
            ToggleMode::Accumulate => {
                let mut parts = self.parts.clone();
                if !parts.remove(&clicked) {
                    parts.remove(&BodyPart::Total);
                    parts.insert(clicked);
                }
                parts
            }
            ToggleMode::Replace => {
                if self.parts.len() == 1 && self.parts.contains(&clicked) {
                    BTreeSet::new()
                } else {
                    BTreeSet::from([clicked])
                }
            }
        };

        if parts.is_empty() {
            debug!("Selection emptied by {}; falling back to Total", clicked);
            parts.insert(BodyPart::Total);
        }

        SelectionState { parts }
    }

    /// Selection flags for every button, in panel order
    ///
    /// This is the rendering projection: one entry per button, grouped as
    /// the panel lays them out.
    pub fn button_states(&self) -> Vec<ButtonState> {
        BODY_PART_GROUPS
            .iter()
            .flat_map(|group| {
                group.parts.iter().map(move |&part| ButtonState {
                    group: *group,
                    part,
                    selected: self.is_selected(part),
                })
            })
            .collect()
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.parts.iter().map(|part| part.label()).collect();
        write!(f, "{{{}}}", labels.join(", "))
    }
}

/// Visual state of one body-part button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub group: BodyPartGroup,
    pub part: BodyPart,
    pub selected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NON_TOTAL: [BodyPart; 6] = [
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
        BodyPart::Android,
        BodyPart::Gynoid,
    ];

    fn state(parts: &[BodyPart]) -> SelectionState {
        SelectionState::from_parts(parts.iter().copied())
    }

    /// Deterministic pseudo-random click stream
    fn click_stream(seed: u64, len: usize) -> Vec<BodyPart> {
        let mut x = seed;
        (0..len)
            .map(|_| {
                x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                BodyPart::ALL[((x >> 33) % BodyPart::ALL.len() as u64) as usize]
            })
            .collect()
    }

    #[test]
    fn test_initial_state_is_total() {
        let initial = SelectionState::default();
        assert!(initial.is_total());
        assert_eq!(initial.len(), 1);
    }

    #[test]
    fn test_from_parts_restores_invariants() {
        assert!(state(&[]).is_total());
        assert!(state(&[BodyPart::LeftArm, BodyPart::Total]).is_total());
        assert_eq!(state(&[BodyPart::LeftArm, BodyPart::Gynoid]).len(), 2);
    }

    #[rstest]
    #[case(ToggleMode::Accumulate)]
    #[case(ToggleMode::Replace)]
    fn test_total_click_always_yields_total(#[case] mode: ToggleMode) {
        let starts = [
            SelectionState::total(),
            state(&[BodyPart::LeftArm]),
            state(&[BodyPart::LeftArm, BodyPart::RightLeg, BodyPart::Android]),
        ];
        for start in starts {
            assert!(start.toggle(BodyPart::Total, mode).is_total());
        }
    }

    #[rstest]
    #[case(ToggleMode::Accumulate)]
    #[case(ToggleMode::Replace)]
    fn test_non_total_click_evicts_total(#[case] mode: ToggleMode) {
        let next = SelectionState::total().toggle(BodyPart::Android, mode);
        assert_eq!(next, state(&[BodyPart::Android]));
    }

    #[rstest]
    #[case(ToggleMode::Accumulate, 1)]
    #[case(ToggleMode::Accumulate, 7)]
    #[case(ToggleMode::Replace, 3)]
    #[case(ToggleMode::Replace, 11)]
    fn test_never_empty_for_click_sequences(#[case] mode: ToggleMode, #[case] seed: u64) {
        let mut current = SelectionState::default();
        for clicked in click_stream(seed, 500) {
            current = current.toggle(clicked, mode);
            assert!(!current.is_empty());
            assert!(current.len() >= 1);
            if current.is_selected(BodyPart::Total) {
                assert!(current.is_total(), "Total must be exclusive: {}", current);
            }
        }
    }

    #[test]
    fn test_accumulate_adds_and_removes() {
        let mode = ToggleMode::Accumulate;
        let arms = SelectionState::total()
            .toggle(BodyPart::LeftArm, mode)
            .toggle(BodyPart::RightArm, mode);
        assert_eq!(arms, state(&[BodyPart::LeftArm, BodyPart::RightArm]));

        let right_only = arms.toggle(BodyPart::LeftArm, mode);
        assert_eq!(right_only, state(&[BodyPart::RightArm]));
    }

    #[test]
    fn test_accumulate_removing_last_falls_back_to_total() {
        let next = state(&[BodyPart::Gynoid]).toggle(BodyPart::Gynoid, ToggleMode::Accumulate);
        assert!(next.is_total());
    }

    #[test]
    fn test_accumulate_double_toggle_is_identity() {
        let mode = ToggleMode::Accumulate;
        let start = state(&[BodyPart::LeftArm, BodyPart::RightLeg, BodyPart::Android]);
        for x in start.parts().clone() {
            let round_trip = start.toggle(x, mode).toggle(x, mode);
            assert_eq!(round_trip, start, "double toggle of {} changed state", x);
        }
    }

    #[test]
    fn test_replace_keeps_single_part() {
        let mode = ToggleMode::Replace;
        let left = SelectionState::total().toggle(BodyPart::LeftArm, mode);
        let right = left.toggle(BodyPart::RightLeg, mode);
        assert_eq!(right, state(&[BodyPart::RightLeg]));

        for x in NON_TOTAL {
            assert_eq!(right.toggle(x, mode).len(), 1);
        }
    }

    #[test]
    fn test_replace_deselecting_only_part_falls_back_to_total() {
        let next = state(&[BodyPart::LeftLeg]).toggle(BodyPart::LeftLeg, ToggleMode::Replace);
        assert!(next.is_total());
    }

    #[test]
    fn test_toggle_does_not_mutate_receiver() {
        let start = state(&[BodyPart::LeftArm]);
        let _ = start.toggle(BodyPart::RightArm, ToggleMode::Accumulate);
        assert_eq!(start, state(&[BodyPart::LeftArm]));
    }

    #[test]
    fn test_button_states_projection() {
        let selection = state(&[BodyPart::LeftArm, BodyPart::Gynoid]);
        let buttons = selection.button_states();

        assert_eq!(buttons.len(), BodyPart::ALL.len());
        let selected: Vec<BodyPart> = buttons
            .iter()
            .filter(|b| b.selected)
            .map(|b| b.part)
            .collect();
        assert_eq!(selected, vec![BodyPart::LeftArm, BodyPart::Gynoid]);
        assert_eq!(buttons[0].group.label, "Arms");
        assert_eq!(buttons[6].group.label, "Regions");
    }

    #[test]
    fn test_display() {
        let selection = state(&[BodyPart::RightArm, BodyPart::LeftArm]);
        assert_eq!(selection.to_string(), "{Left Arm, Right Arm}");
    }
}
