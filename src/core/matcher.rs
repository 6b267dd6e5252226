use crate::core::{
    distance::{haversine_km, round_km, DistanceFn},
    roster::Roster,
};
use crate::models::{Disaster, MatchPolicy, MatchRole, Ngo, NgoMatch, Severity};

/// Result of the matching process
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub severity: Severity,
    /// Search radius used for the least-resourced pick; `None` for "high"
    pub radius_km: Option<f64>,
    /// One or two entries, closest first
    pub matches: Vec<NgoMatch>,
}

/// NGO matcher
///
/// Selects relief NGOs for a disaster from a fixed roster:
/// 1. Distance from the disaster to every NGO
/// 2. Globally closest NGO (first in roster order wins ties)
/// 3. For "high" severity, the closest NGO only
/// 4. Otherwise the closest NGO plus the least-resourced NGO within the
///    severity's search radius, if any
#[derive(Debug, Clone)]
pub struct Matcher {
    policy: MatchPolicy,
    distance: DistanceFn,
}

impl Matcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            distance: haversine_km,
        }
    }

    /// Matcher with a custom distance primitive
    pub fn with_distance(policy: MatchPolicy, distance: DistanceFn) -> Self {
        Self { policy, distance }
    }

    pub fn with_default_policy() -> Self {
        Self::new(MatchPolicy::default())
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Search radius in km for the given severity, `None` when only the
    /// closest NGO is returned
    pub fn radius_for(&self, severity: Severity) -> Option<f64> {
        match severity {
            Severity::High => None,
            Severity::Moderate => Some(self.policy.moderate_radius_km),
            Severity::Low | Severity::Severe | Severity::Unknown => {
                Some(self.policy.default_radius_km)
            }
        }
    }

    /// Find the best NGO(s) for a disaster
    pub fn find_matches(&self, disaster: &Disaster, roster: &Roster) -> MatchResult {
        let severity = disaster.severity();
        if !severity.is_recognized() {
            tracing::warn!(
                "Disaster {} has unrecognized severity {:?}, using default radius",
                disaster.id,
                disaster.severity_label
            );
        }

        let origin = disaster.coords();
        let measured: Vec<(&Ngo, f64)> = roster
            .iter()
            .map(|ngo| (ngo, (self.distance)(origin, ngo.coords())))
            .collect();

        // Roster is non-empty by construction
        let (closest, closest_km) = measured[1..]
            .iter()
            .fold(measured[0], |best, &candidate| {
                if candidate.1 < best.1 { candidate } else { best }
            });

        let closest_match = NgoMatch {
            ngo: closest.clone(),
            distance_km: round_km(closest_km),
            role: MatchRole::Closest,
        };

        let radius_km = self.radius_for(severity);
        let Some(radius) = radius_km else {
            return MatchResult {
                severity,
                radius_km,
                matches: vec![closest_match],
            };
        };

        let least_resourced = measured
            .iter()
            .filter(|(_, km)| *km <= radius)
            .fold(None, |least: Option<(&Ngo, f64)>, &candidate| match least {
                Some(current) if candidate.0.resources >= current.0.resources => Some(current),
                _ => Some(candidate),
            });

        let mut matches = vec![closest_match];
        match least_resourced {
            Some((ngo, _)) if self.policy.dedupe && ngo.id == closest.id => {}
            Some((ngo, km)) => matches.push(NgoMatch {
                ngo: ngo.clone(),
                distance_km: round_km(km),
                role: MatchRole::LeastResourced,
            }),
            None => {
                tracing::debug!(
                    "No NGO within {} km of disaster {}, returning closest only",
                    radius,
                    disaster.id
                );
            }
        }

        MatchResult {
            severity,
            radius_km,
            matches,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_policy()
    }
}
