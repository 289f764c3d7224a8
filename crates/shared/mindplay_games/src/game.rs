use serde::{Deserialize, Serialize};

use crate::scaling::PATTERN_RESPONSE_SECONDS;

/// Stable identifiers; these strings are also the keys of the persisted score blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    ObjectAssociation,
    PatternCompletion,
    QuantitativeRecall,
    SequenceRecall,
    SymbolMatching,
}

impl GameId {
    pub const ALL: [GameId; 5] = [
        GameId::ObjectAssociation,
        GameId::PatternCompletion,
        GameId::QuantitativeRecall,
        GameId::SequenceRecall,
        GameId::SymbolMatching,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameId::ObjectAssociation => "object-association",
            GameId::PatternCompletion => "pattern-completion",
            GameId::QuantitativeRecall => "quantitative-recall",
            GameId::SequenceRecall => "sequence-recall",
            GameId::SymbolMatching => "symbol-matching",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }

    pub fn descriptor(self) -> &'static VariantDescriptor {
        match self {
            GameId::ObjectAssociation => &OBJECT_ASSOCIATION,
            GameId::PatternCompletion => &PATTERN_COMPLETION,
            GameId::QuantitativeRecall => &QUANTITATIVE_RECALL,
            GameId::SequenceRecall => &SEQUENCE_RECALL,
            GameId::SymbolMatching => &SYMBOL_MATCHING,
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the phase in which a variant accepts answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Matching,
    Recall,
    Question,
    Playing,
}

/// Text shown on the pre-round instruction screen.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Instructions {
    pub heading: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub hints: &'static [&'static str],
    pub start_label: &'static str,
}

/// Everything the round engine needs to know about a variant beyond its
/// stimulus and evaluation rules.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VariantDescriptor {
    pub game: GameId,
    pub name: &'static str,
    /// Show the stimulus on a countdown, hide it, then ask.
    pub has_reveal_phase: bool,
    pub response_kind: ResponseKind,
    /// A countdown that runs while answering; expiry counts as incorrect.
    pub response_timeout_secs: Option<u32>,
    /// A correct answer at or beyond this level ends the campaign.
    pub final_level: Option<u32>,
    /// `next` starts the following round straight away instead of returning
    /// to the instruction screen.
    pub next_skips_instruction: bool,
    pub instructions: Instructions,
}

const HEADING: &str = "Instructions";
const START_LABEL: &str = "Start Round";

pub static OBJECT_ASSOCIATION: VariantDescriptor = VariantDescriptor {
    game: GameId::ObjectAssociation,
    name: "Object Association",
    has_reveal_phase: true,
    response_kind: ResponseKind::Matching,
    response_timeout_secs: None,
    final_level: None,
    next_skips_instruction: false,
    instructions: Instructions {
        heading: HEADING,
        title: "Remember the Pairs",
        description: "Remember which objects are paired together.",
        hints: &[
            "You'll see pairs of associated objects briefly.",
            "After they disappear, match the objects that belong together.",
            "Click two objects to match them!",
        ],
        start_label: START_LABEL,
    },
};

pub static PATTERN_COMPLETION: VariantDescriptor = VariantDescriptor {
    game: GameId::PatternCompletion,
    name: "Pattern Completion",
    has_reveal_phase: false,
    response_kind: ResponseKind::Playing,
    response_timeout_secs: Some(PATTERN_RESPONSE_SECONDS),
    final_level: Some(10),
    next_skips_instruction: true,
    instructions: Instructions {
        heading: HEADING,
        title: "Complete the Pattern",
        description: "Find the missing number that completes the sequence. Look for the pattern!",
        hints: &[
            "Look for the rule that connects the numbers.",
            "It could be adding, multiplying, or another pattern.",
            "Select the correct answer from the options!",
        ],
        start_label: START_LABEL,
    },
};

pub static QUANTITATIVE_RECALL: VariantDescriptor = VariantDescriptor {
    game: GameId::QuantitativeRecall,
    name: "Number Memory",
    has_reveal_phase: true,
    response_kind: ResponseKind::Question,
    response_timeout_secs: None,
    final_level: None,
    next_skips_instruction: false,
    instructions: Instructions {
        heading: HEADING,
        title: "Number Memory",
        description: "Remember the numbers and answer questions about them.",
        hints: &[
            "You'll see a set of numbers briefly.",
            "Then you'll be asked to calculate their sum, product, or difference.",
            "Type your answer and press Submit!",
        ],
        start_label: START_LABEL,
    },
};

pub static SEQUENCE_RECALL: VariantDescriptor = VariantDescriptor {
    game: GameId::SequenceRecall,
    name: "Sequence Recall",
    has_reveal_phase: true,
    response_kind: ResponseKind::Recall,
    response_timeout_secs: None,
    final_level: None,
    next_skips_instruction: false,
    instructions: Instructions {
        heading: HEADING,
        title: "Remember the Order",
        description: "Watch the sequence and repeat it in the correct order.",
        hints: &[
            "You'll see a sequence of colors, numbers, or letters.",
            "After it disappears, click items to rebuild the sequence.",
            "Order matters - get the exact sequence right!",
        ],
        start_label: START_LABEL,
    },
};

pub static SYMBOL_MATCHING: VariantDescriptor = VariantDescriptor {
    game: GameId::SymbolMatching,
    name: "Symbol Matching",
    has_reveal_phase: false,
    response_kind: ResponseKind::Playing,
    response_timeout_secs: None,
    final_level: None,
    next_skips_instruction: false,
    instructions: Instructions {
        heading: HEADING,
        title: "Match the Pattern",
        description: "Match symbols according to the rule shown.",
        hints: &[
            "Look at the sequence of symbols carefully.",
            "Identify the pattern connecting them.",
            "Select the symbol that completes the pattern!",
        ],
        start_label: START_LABEL,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        for g in GameId::ALL {
            assert_eq!(GameId::parse(g.as_str()), Some(g));
            assert_eq!(g.descriptor().game, g);
        }
        assert_eq!(GameId::parse(" Symbol-Matching "), Some(GameId::SymbolMatching));
        assert_eq!(GameId::parse("pong"), None);
    }

    #[test]
    fn immediate_variants_skip_reveal() {
        assert!(!GameId::PatternCompletion.descriptor().has_reveal_phase);
        assert!(!GameId::SymbolMatching.descriptor().has_reveal_phase);
        assert_eq!(
            GameId::PatternCompletion.descriptor().response_timeout_secs,
            Some(30)
        );
        assert!(GameId::SequenceRecall.descriptor().has_reveal_phase);
    }
}
