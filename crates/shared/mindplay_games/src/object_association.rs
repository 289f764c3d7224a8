use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::scaling::OBJECT_PAIRS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectPair {
    pub object1: &'static str,
    pub object2: &'static str,
}

impl ObjectPair {
    const fn new(object1: &'static str, object2: &'static str) -> Self {
        Self { object1, object2 }
    }

    pub fn contains(&self, object: &str) -> bool {
        self.object1 == object || self.object2 == object
    }

    /// True when `a` and `b` are this pair's two objects, in either order.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.object1 == a && self.object2 == b) || (self.object1 == b && self.object2 == a)
    }
}

pub const PAIR_CATALOG: [ObjectPair; 10] = [
    ObjectPair::new("Key", "Lock"),
    ObjectPair::new("Pen", "Paper"),
    ObjectPair::new("Shoe", "Sock"),
    ObjectPair::new("Phone", "Charger"),
    ObjectPair::new("Book", "Bookmark"),
    ObjectPair::new("Cup", "Saucer"),
    ObjectPair::new("Toothbrush", "Toothpaste"),
    ObjectPair::new("Glasses", "Case"),
    ObjectPair::new("Remote", "TV"),
    ObjectPair::new("Umbrella", "Rain"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchColor {
    Purple,
    Blue,
    Green,
    Orange,
    Red,
}

pub const MATCH_COLORS: [MatchColor; 5] = [
    MatchColor::Purple,
    MatchColor::Blue,
    MatchColor::Green,
    MatchColor::Orange,
    MatchColor::Red,
];

#[derive(Debug, Clone, Serialize)]
pub struct AssociationStimulus {
    pub pairs: Vec<ObjectPair>,
    /// Flat, shuffled object list; empty until the matching phase begins.
    pub presentation: Vec<&'static str>,
}

impl AssociationStimulus {
    pub fn generate<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Self {
        let count = OBJECT_PAIRS.count(level);
        let pairs = PAIR_CATALOG
            .choose_multiple(rng, count)
            .copied()
            .collect();
        Self {
            pairs,
            presentation: Vec::new(),
        }
    }

    pub fn shuffle_presentation<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut flat: Vec<&'static str> = self
            .pairs
            .iter()
            .flat_map(|p| [p.object1, p.object2])
            .collect();
        flat.shuffle(rng);
        self.presentation = flat;
    }

    /// Map a client-supplied name onto the catalog entry it refers to.
    pub fn resolve(&self, object: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .flat_map(|p| [p.object1, p.object2])
            .find(|o| *o == object)
    }
}

/// What a single click did to the matching board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    /// Clicked an object that is already part of a matched pair.
    Ignored,
    /// First click of a pair attempt.
    Selected,
    /// Second click did not complete a known, unmatched pair.
    Mismatch,
    Matched,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchingState {
    pub selected: Option<&'static str>,
    pub selected_color: Option<MatchColor>,
    /// `object1` of every matched pair, in match order.
    pub matched: Vec<&'static str>,
    /// Color assigned to each matched pair, keyed by `object1`.
    pub pair_colors: BTreeMap<&'static str, MatchColor>,
}

impl MatchingState {
    pub fn is_matched(&self, stimulus: &AssociationStimulus, object: &str) -> bool {
        stimulus
            .pairs
            .iter()
            .any(|p| p.contains(object) && self.matched.contains(&p.object1))
    }

    pub fn is_complete(&self, stimulus: &AssociationStimulus) -> bool {
        self.matched.len() == stimulus.pairs.len()
    }

    /// `object` must come from [`AssociationStimulus::resolve`].
    pub fn click<R: Rng + ?Sized>(
        &mut self,
        stimulus: &AssociationStimulus,
        object: &'static str,
        rng: &mut R,
    ) -> ClickResult {
        if self.is_matched(stimulus, object) {
            return ClickResult::Ignored;
        }

        let Some(first) = self.selected else {
            self.selected = Some(object);
            self.selected_color = Some(self.pick_unused_color(rng));
            return ClickResult::Selected;
        };

        let pair = stimulus
            .pairs
            .iter()
            .find(|p| p.joins(first, object))
            .copied();
        let color = self.selected_color.take();
        self.selected = None;

        match pair {
            Some(p) if !self.matched.contains(&p.object1) => {
                self.pair_colors
                    .insert(p.object1, color.unwrap_or(MATCH_COLORS[0]));
                self.matched.push(p.object1);
                ClickResult::Matched
            }
            _ => ClickResult::Mismatch,
        }
    }

    fn pick_unused_color<R: Rng + ?Sized>(&self, rng: &mut R) -> MatchColor {
        let available: Vec<MatchColor> = MATCH_COLORS
            .iter()
            .copied()
            .filter(|c| !self.pair_colors.values().any(|used| used == c))
            .collect();
        available.choose(rng).copied().unwrap_or(MATCH_COLORS[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_stimulus() -> AssociationStimulus {
        AssociationStimulus {
            pairs: vec![PAIR_CATALOG[0], PAIR_CATALOG[1], PAIR_CATALOG[2]],
            presentation: Vec::new(),
        }
    }

    #[test]
    fn pairs_are_distinct_and_scaled() {
        let mut rng = StdRng::seed_from_u64(7);
        for level in 1..12 {
            let s = AssociationStimulus::generate(level, &mut rng);
            assert_eq!(s.pairs.len(), OBJECT_PAIRS.count(level));
            for (i, a) in s.pairs.iter().enumerate() {
                assert!(s.pairs[i + 1..].iter().all(|b| b != a));
            }
        }
    }

    #[test]
    fn presentation_holds_every_object_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = fixed_stimulus();
        s.shuffle_presentation(&mut rng);
        assert_eq!(s.presentation.len(), 6);
        let mut sorted = s.presentation.clone();
        sorted.sort_unstable();
        let mut expected = vec!["Key", "Lock", "Pen", "Paper", "Shoe", "Sock"];
        expected.sort_unstable();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn non_pair_click_resets_selection() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = fixed_stimulus();
        let mut m = MatchingState::default();

        assert_eq!(m.click(&s, "Key", &mut rng), ClickResult::Selected);
        assert!(m.selected_color.is_some());
        assert_eq!(m.click(&s, "Paper", &mut rng), ClickResult::Mismatch);
        assert!(m.matched.is_empty());
        assert_eq!(m.selected, None);
        assert_eq!(m.selected_color, None);
    }

    #[test]
    fn pair_matches_in_either_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = fixed_stimulus();
        let mut m = MatchingState::default();

        m.click(&s, "Lock", &mut rng);
        assert_eq!(m.click(&s, "Key", &mut rng), ClickResult::Matched);
        assert_eq!(m.matched, vec!["Key"]);
        assert!(m.pair_colors.contains_key("Key"));

        // Matched objects no longer take part.
        assert_eq!(m.click(&s, "Key", &mut rng), ClickResult::Ignored);
        assert_eq!(m.selected, None);
    }

    #[test]
    fn colors_are_not_reused_until_exhausted() {
        let mut rng = StdRng::seed_from_u64(11);
        let s = AssociationStimulus {
            pairs: PAIR_CATALOG[..5].to_vec(),
            presentation: Vec::new(),
        };
        let mut m = MatchingState::default();
        for p in &s.pairs {
            m.click(&s, p.object1, &mut rng);
            assert_eq!(m.click(&s, p.object2, &mut rng), ClickResult::Matched);
        }
        assert_eq!(m.pair_colors.len(), 5);
        for c in MATCH_COLORS {
            assert!(m.pair_colors.values().any(|u| *u == c));
        }
        assert!(m.is_complete(&s));
    }

    #[test]
    fn palette_falls_back_to_first_color() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut m = MatchingState::default();
        for (i, c) in MATCH_COLORS.iter().enumerate() {
            m.pair_colors.insert(PAIR_CATALOG[i].object1, *c);
        }
        assert_eq!(m.pick_unused_color(&mut rng), MatchColor::Purple);
    }
}
