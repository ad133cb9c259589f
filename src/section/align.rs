use serde::{Deserialize, Serialize};

use crate::section::similarity::token_set_similarity;
use crate::section::Section;
use crate::textutil::truncate_chars;

/// Body text beyond this many characters does not influence matching.
pub const BODY_WINDOW: usize = 500;

const LENIENT_FLOOR: f32 = 30.0;
const STRICT_FLOOR: f32 = 40.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignProfile {
    #[default]
    Lenient,
    Strict,
}

#[derive(Clone, Debug)]
pub struct AlignConfig {
    pub profile: AlignProfile,
    pub floor: f32,
    pub body_window: usize,
}

impl AlignConfig {
    pub fn lenient() -> Self {
        AlignConfig {
            profile: AlignProfile::Lenient,
            floor: LENIENT_FLOOR,
            body_window: BODY_WINDOW,
        }
    }

    pub fn strict() -> Self {
        AlignConfig {
            profile: AlignProfile::Strict,
            floor: STRICT_FLOOR,
            body_window: BODY_WINDOW,
        }
    }

    pub fn for_profile(profile: AlignProfile) -> Self {
        match profile {
            AlignProfile::Lenient => Self::lenient(),
            AlignProfile::Strict => Self::strict(),
        }
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreSignal {
    pub name: String,
    pub points: f32,
}

/// One draft section's match decision. `template_index: None` means the best
/// candidate stayed under the confidence floor: new content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentEdge {
    pub draft_index: usize,
    pub template_index: Option<usize>,
    pub score: f32,
    pub signals: Vec<ScoreSignal>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignmentMap {
    pub edges: Vec<AlignmentEdge>,
}

impl AlignmentMap {
    pub fn matched_template(&self, draft_index: usize) -> Option<usize> {
        self.edges.get(draft_index).and_then(|e| e.template_index)
    }

    /// Template sections no draft section claimed, in document order.
    pub fn unclaimed_template_indices(&self, template_count: usize) -> Vec<usize> {
        let mut claimed = vec![false; template_count];
        for e in &self.edges {
            if let Some(t) = e.template_index {
                if t < template_count {
                    claimed[t] = true;
                }
            }
        }
        (0..template_count).filter(|i| !claimed[*i]).collect()
    }
}

/// Greedy single pass in draft document order. Each draft section scores
/// every still-unclaimed template section and takes the best one at or above
/// the floor; strict `>` keeps the earliest candidate on ties. A claimed
/// template section is consumed for good, so an early mediocre match can
/// starve a later better one. That order dependence is part of the contract:
/// given identical inputs the map is identical.
pub fn align(template: &[Section], draft: &[Section], cfg: &AlignConfig) -> AlignmentMap {
    let mut claimed = vec![false; template.len()];
    let mut edges: Vec<AlignmentEdge> = Vec::with_capacity(draft.len());

    for (di, d) in draft.iter().enumerate() {
        let mut best: Option<(usize, f32, Vec<ScoreSignal>)> = None;
        for (ti, t) in template.iter().enumerate() {
            if claimed[ti] {
                continue;
            }
            let (score, signals) = score_pair(t, d, cfg);
            let take = match best.as_ref() {
                None => true,
                Some((_, best_score, _)) => score > *best_score,
            };
            if take {
                best = Some((ti, score, signals));
            }
        }

        let edge = match best {
            Some((ti, score, signals)) if score >= cfg.floor => {
                claimed[ti] = true;
                AlignmentEdge {
                    draft_index: di,
                    template_index: Some(ti),
                    score,
                    signals,
                }
            }
            Some((_, score, signals)) => AlignmentEdge {
                draft_index: di,
                template_index: None,
                score,
                signals,
            },
            None => AlignmentEdge {
                draft_index: di,
                template_index: None,
                score: 0.0,
                signals: Vec::new(),
            },
        };
        edges.push(edge);
    }

    AlignmentMap { edges }
}

fn push(signals: &mut Vec<ScoreSignal>, score: &mut f32, name: &str, points: f32) {
    *score += points;
    signals.push(ScoreSignal {
        name: name.to_string(),
        points,
    });
}

fn score_pair(template: &Section, draft: &Section, cfg: &AlignConfig) -> (f32, Vec<ScoreSignal>) {
    let mut score = 0.0f32;
    let mut signals: Vec<ScoreSignal> = Vec::new();

    match (template.number.as_deref(), draft.number.as_deref()) {
        (Some(tn), Some(dn)) if tn == dn => {
            push(&mut signals, &mut score, "number_exact", 100.0);
        }
        (Some(tn), Some(dn)) if tn.starts_with(dn) || dn.starts_with(tn) => {
            // Literal prefix on purpose: "3" also vouches for "32". Crude,
            // but it catches renumbered subsections more often than it lies.
            push(&mut signals, &mut score, "number_prefix", 50.0);
        }
        _ => {}
    }

    let t_title = template.title.as_deref().unwrap_or("");
    let d_title = draft.title.as_deref().unwrap_or("");
    match cfg.profile {
        AlignProfile::Lenient => {
            let sim = token_set_similarity(t_title, d_title);
            let points = sim as f32 * 0.8;
            if points > 0.0 {
                push(&mut signals, &mut score, "title_overlap", points);
            }
        }
        AlignProfile::Strict => {
            let tt = t_title.trim().to_lowercase();
            let dt = d_title.trim().to_lowercase();
            if !tt.is_empty() && tt == dt {
                push(&mut signals, &mut score, "title_exact", 80.0);
            } else if !tt.is_empty() && !dt.is_empty() && (tt.contains(&dt) || dt.contains(&tt)) {
                push(&mut signals, &mut score, "title_substring", 40.0);
            }
        }
    }

    let body_sim = token_set_similarity(
        truncate_chars(&template.body, cfg.body_window),
        truncate_chars(&draft.body, cfg.body_window),
    );
    push(
        &mut signals,
        &mut score,
        "body_overlap",
        body_sim as f32 * 0.2,
    );

    if template.level == draft.level {
        push(&mut signals, &mut score, "level_match", 10.0);
    }

    (score, signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sec(pos: usize, number: Option<&str>, title: Option<&str>, body: &str, level: u32) -> Section {
        Section {
            id: format!("sec-{pos}"),
            number: number.map(String::from),
            title: title.map(String::from),
            level,
            body: body.to_string(),
            paragraphs: Vec::new(),
            tables: Vec::new(),
            position: pos,
        }
    }

    #[test]
    fn exact_numbers_align_one_to_one() {
        let template = vec![
            sec(0, Some("1"), Some("Definitions"), "terms used herein", 1),
            sec(1, Some("2"), Some("Term"), "duration and renewal", 1),
            sec(2, Some("3"), Some("Payment"), "fees and invoices", 1),
        ];
        let draft = template.clone();

        let map = align(&template, &draft, &AlignConfig::lenient());
        for (i, edge) in map.edges.iter().enumerate() {
            assert_eq!(edge.template_index, Some(i));
            assert!(edge.score >= 200.0, "score was {}", edge.score);
        }

        // Injective: no template section claimed twice.
        let claimed: HashSet<usize> = map.edges.iter().filter_map(|e| e.template_index).collect();
        assert_eq!(claimed.len(), map.edges.len());
    }

    #[test]
    fn renumbering_survives_via_title_and_body() {
        let template = vec![
            sec(0, Some("1"), Some("Definitions"), "capitalized terms meanings", 1),
            sec(1, Some("2"), Some("Term"), "effective date two years", 1),
            sec(2, Some("3"), Some("Payment"), "invoices due thirty days", 1),
        ];
        let draft = vec![
            sec(0, Some("4"), Some("Definitions"), "capitalized terms meanings", 1),
            sec(1, Some("5"), Some("Term"), "effective date two years", 1),
            sec(2, Some("6"), Some("Payment"), "invoices due thirty days", 1),
        ];

        let map = align(&template, &draft, &AlignConfig::lenient());
        assert_eq!(map.matched_template(0), Some(0));
        assert_eq!(map.matched_template(1), Some(1));
        assert_eq!(map.matched_template(2), Some(2));
    }

    #[test]
    fn number_prefix_scores_half() {
        let template = vec![sec(0, Some("3"), Some("Payment"), "fees", 1)];
        let draft = vec![sec(0, Some("3.2"), Some("Payment"), "fees", 2)];

        let map = align(&template, &draft, &AlignConfig::lenient());
        let edge = &map.edges[0];
        assert_eq!(edge.template_index, Some(0));
        assert!(edge
            .signals
            .iter()
            .any(|s| s.name == "number_prefix" && s.points == 50.0));
        assert!(!edge.signals.iter().any(|s| s.name == "number_exact"));
    }

    #[test]
    fn greedy_claim_can_starve_a_better_later_match() {
        let template = vec![sec(0, Some("1"), Some("Payment Terms"), "", 1)];
        let draft = vec![
            sec(0, Some("1"), Some("Fees"), "", 1),
            sec(1, Some("1"), Some("Payment Terms"), "", 1),
        ];

        let map = align(&template, &draft, &AlignConfig::lenient());
        // The first draft section claims on number alone; the better match
        // arrives too late.
        assert_eq!(map.edges[0].template_index, Some(0));
        assert_eq!(map.edges[1].template_index, None);
    }

    #[test]
    fn below_floor_is_new_content() {
        let template = vec![sec(0, Some("1"), Some("Definitions"), "meanings of terms", 1)];
        let draft = vec![sec(
            0,
            Some("9"),
            Some("Insurance"),
            "coverage minimums apply",
            1,
        )];

        let map = align(&template, &draft, &AlignConfig::lenient());
        let edge = &map.edges[0];
        assert_eq!(edge.template_index, None);
        assert!(edge.score < LENIENT_FLOOR, "score was {}", edge.score);
    }

    #[test]
    fn untitled_sections_still_match_each_other() {
        // Implicit leading sections carry no number; shared emptiness counts.
        let template = vec![sec(0, None, None, "preamble text here", 1)];
        let draft = vec![sec(0, None, None, "preamble text here", 1)];

        let map = align(&template, &draft, &AlignConfig::lenient());
        assert_eq!(map.edges[0].template_index, Some(0));
        assert!(map.edges[0].score >= 100.0);
    }

    #[test]
    fn strict_profile_uses_exact_and_substring_tiers() {
        let cfg = AlignConfig::strict();
        assert_eq!(cfg.floor, STRICT_FLOOR);

        let template = vec![sec(0, None, Some("Payment Terms"), "fees invoices", 1)];

        let exact = vec![sec(0, None, Some("payment terms"), "fees invoices", 1)];
        let map = align(&template, &exact, &cfg);
        assert!(map.edges[0]
            .signals
            .iter()
            .any(|s| s.name == "title_exact" && s.points == 80.0));

        let partial = vec![sec(0, None, Some("Payment"), "fees invoices", 1)];
        let map = align(&template, &partial, &cfg);
        assert!(map.edges[0]
            .signals
            .iter()
            .any(|s| s.name == "title_substring" && s.points == 40.0));
        assert_eq!(map.edges[0].template_index, Some(0));

        // Strict gives empty titles nothing; weak pairs fall under the floor.
        let weak = vec![sec(0, None, None, "unrelated words entirely", 1)];
        let map = align(&template, &weak, &cfg);
        assert_eq!(map.edges[0].template_index, None);
    }

    #[test]
    fn body_window_caps_comparison() {
        let mut long_a = "shared opening words ".repeat(30);
        long_a.push_str(&"alpha ".repeat(200));
        let mut long_b = "shared opening words ".repeat(30);
        long_b.push_str(&"omega ".repeat(200));

        let template = vec![sec(0, Some("1"), Some("Scope"), &long_a, 1)];
        let draft = vec![sec(0, Some("1"), Some("Scope"), &long_b, 1)];

        // Divergence past the window is invisible: the pair still aligns.
        let map = align(&template, &draft, &AlignConfig::lenient());
        assert_eq!(map.edges[0].template_index, Some(0));
        let body = map.edges[0]
            .signals
            .iter()
            .find(|s| s.name == "body_overlap")
            .expect("body signal always recorded");
        assert_eq!(body.points, 20.0);
    }

    #[test]
    fn alignment_is_deterministic() {
        let template = vec![
            sec(0, Some("1"), Some("One"), "alpha beta", 1),
            sec(1, Some("2"), Some("Two"), "gamma delta", 1),
            sec(2, None, Some("Notices"), "addresses for notice", 1),
        ];
        let draft = vec![
            sec(0, Some("2"), Some("Two"), "gamma delta", 1),
            sec(1, None, Some("Notices"), "addresses for notice", 1),
            sec(2, Some("1"), Some("One"), "alpha beta", 1),
        ];

        let first = align(&template, &draft, &AlignConfig::lenient());
        let second = align(&template, &draft, &AlignConfig::lenient());
        assert_eq!(first, second);
    }

    #[test]
    fn unclaimed_template_sections_are_reported_in_order() {
        let template = vec![
            sec(0, Some("1"), Some("One"), "alpha", 1),
            sec(1, Some("2"), Some("Two"), "beta", 1),
            sec(2, Some("3"), Some("Three"), "gamma", 1),
        ];
        let draft = vec![sec(0, Some("2"), Some("Two"), "beta", 1)];

        let map = align(&template, &draft, &AlignConfig::lenient());
        assert_eq!(map.matched_template(0), Some(1));
        assert_eq!(map.unclaimed_template_indices(template.len()), vec![0, 2]);
    }
}
