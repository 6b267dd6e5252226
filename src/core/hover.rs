use crate::core::{matcher::MatchResult, roster::Roster, Matcher};
use crate::models::Disaster;

/// What the display shows while a disaster is hovered
#[derive(Debug, Clone, PartialEq)]
pub struct HoverView {
    pub disaster: Disaster,
    pub result: MatchResult,
}

impl HoverView {
    /// Popup heading: "Best NGO: <name>" for one result, "Best NGOs:" for two
    pub fn headline(&self) -> String {
        headline(&self.result)
    }
}

pub fn headline(result: &MatchResult) -> String {
    match result.matches.as_slice() {
        [only] => format!("Best NGO: {}", only.ngo.name),
        _ => "Best NGOs:".to_string(),
    }
}

/// Display-owned slot holding the last hover result
///
/// Entering a disaster replaces the slot wholesale; leaving clears it.
#[derive(Debug, Default)]
pub struct HoverSlot {
    current: Option<HoverView>,
}

impl HoverSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, disaster: Disaster, roster: &Roster, matcher: &Matcher) -> &HoverView {
        let result = matcher.find_matches(&disaster, roster);
        tracing::debug!(
            "Hover on disaster {}: {} NGO(s) selected",
            disaster.id,
            result.matches.len()
        );
        self.current.insert(HoverView { disaster, result })
    }

    pub fn leave(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&HoverView> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ngo;

    fn roster() -> Roster {
        Roster::new(vec![
            Ngo {
                id: "1".to_string(),
                name: "Goonj".to_string(),
                latitude: 28.5245,
                longitude: 77.1855,
                resources: 80,
            },
            Ngo {
                id: "15".to_string(),
                name: "Pravah".to_string(),
                latitude: 28.6390,
                longitude: 77.2150,
                resources: 35,
            },
        ])
        .unwrap()
    }

    fn disaster(severity: &str) -> Disaster {
        Disaster {
            id: "delhi".to_string(),
            location: "Delhi".to_string(),
            severity_label: severity.to_string(),
            latitude: 28.6139,
            longitude: 77.2090,
        }
    }

    #[test]
    fn test_enter_and_leave() {
        let roster = roster();
        let matcher = Matcher::default();
        let mut slot = HoverSlot::new();

        let view = slot.enter(disaster("high"), &roster, &matcher);
        assert_eq!(view.headline(), "Best NGO: Pravah");

        slot.leave();
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_enter_replaces_previous() {
        let roster = roster();
        let matcher = Matcher::default();
        let mut slot = HoverSlot::new();

        slot.enter(disaster("high"), &roster, &matcher);
        slot.enter(disaster("moderate"), &roster, &matcher);

        let view = slot.current().unwrap();
        assert_eq!(view.result.matches.len(), 2);
        assert_eq!(view.headline(), "Best NGOs:");
    }
}
