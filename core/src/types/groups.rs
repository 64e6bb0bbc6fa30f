use super::BodyPart;
use std::fmt;

/// Named group of body-part buttons
///
/// Groups are static layout configuration: the selection panel renders one
/// row of buttons per group, in the order of [`BODY_PART_GROUPS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyPartGroup {
    pub label: &'static str,
    pub parts: &'static [BodyPart],
}

impl BodyPartGroup {
    /// Creates a new BodyPartGroup
    pub const fn new(label: &'static str, parts: &'static [BodyPart]) -> Self {
        Self { label, parts }
    }

    /// Checks if the group contains a body part
    pub fn contains(&self, part: BodyPart) -> bool {
        self.parts.contains(&part)
    }
}

impl fmt::Display for BodyPartGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Button groups of the body-part selection panel
pub static BODY_PART_GROUPS: [BodyPartGroup; 4] = [
    BodyPartGroup::new("Arms", &[BodyPart::LeftArm, BodyPart::RightArm]),
    BodyPartGroup::new("Legs", &[BodyPart::LeftLeg, BodyPart::RightLeg]),
    BodyPartGroup::new("Total", &[BodyPart::Total]),
    BodyPartGroup::new("Regions", &[BodyPart::Android, BodyPart::Gynoid]),
];

/// Returns the group a body part is displayed in
pub fn group_of(part: BodyPart) -> Option<&'static BodyPartGroup> {
    BODY_PART_GROUPS.iter().find(|group| group.contains(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_cover_universe_once() {
        for part in BodyPart::ALL {
            let count = BODY_PART_GROUPS
                .iter()
                .filter(|group| group.contains(part))
                .count();
            assert_eq!(count, 1, "{} should be in exactly one group", part);
        }
    }

    #[test]
    fn test_group_order_matches_button_order() {
        let flattened: Vec<BodyPart> = BODY_PART_GROUPS
            .iter()
            .flat_map(|group| group.parts.iter().copied())
            .collect();
        assert_eq!(flattened, BodyPart::ALL.to_vec());
    }

    #[test]
    fn test_group_of() {
        assert_eq!(group_of(BodyPart::Gynoid).unwrap().label, "Regions");
        assert_eq!(group_of(BodyPart::LeftLeg).unwrap().to_string(), "Legs");
    }
}
