//! One round's payload plus the answer being built against it.
//!
//! Variants are dispatched by enum; the engine only sees [`Challenge`],
//! [`Input`] and [`Progress`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::GameId;
use crate::object_association::{AssociationStimulus, ClickResult, MatchingState};
use crate::pattern_completion::PatternStimulus;
use crate::quantitative_recall::QuantitativeStimulus;
use crate::sequence_recall::{RecallState, SeqItem, SequenceStimulus};
use crate::symbol_matching::SymbolStimulus;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum Stimulus {
    ObjectAssociation(AssociationStimulus),
    PatternCompletion(PatternStimulus),
    QuantitativeRecall(QuantitativeStimulus),
    SequenceRecall(SequenceStimulus),
    SymbolMatching(SymbolStimulus),
}

impl Stimulus {
    pub fn generate<R: Rng + ?Sized>(game: GameId, level: u32, rng: &mut R) -> Self {
        match game {
            GameId::ObjectAssociation => {
                Stimulus::ObjectAssociation(AssociationStimulus::generate(level, rng))
            }
            GameId::PatternCompletion => {
                Stimulus::PatternCompletion(PatternStimulus::generate(level, rng))
            }
            GameId::QuantitativeRecall => {
                Stimulus::QuantitativeRecall(QuantitativeStimulus::generate(level, rng))
            }
            GameId::SequenceRecall => {
                Stimulus::SequenceRecall(SequenceStimulus::generate(level, rng))
            }
            GameId::SymbolMatching => {
                Stimulus::SymbolMatching(SymbolStimulus::generate(level, rng))
            }
        }
    }

    pub fn game(&self) -> GameId {
        match self {
            Stimulus::ObjectAssociation(_) => GameId::ObjectAssociation,
            Stimulus::PatternCompletion(_) => GameId::PatternCompletion,
            Stimulus::QuantitativeRecall(_) => GameId::QuantitativeRecall,
            Stimulus::SequenceRecall(_) => GameId::SequenceRecall,
            Stimulus::SymbolMatching(_) => GameId::SymbolMatching,
        }
    }
}

/// A player action during the response phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Input {
    /// Click an object (object-association).
    Select { object: String },
    /// Add an item to the rebuilt sequence (sequence-recall).
    Append { item: SeqItem },
    /// Empty the rebuilt sequence (sequence-recall).
    Clear,
    /// Hand in the rebuilt sequence (sequence-recall).
    Submit,
    /// Typed numeric answer, kept as raw text (quantitative-recall).
    Enter { text: String },
    /// Chosen option value (pattern-completion).
    Choose { value: i64 },
    /// Chosen card index (symbol-matching).
    Pick { index: usize },
}

impl Input {
    pub fn name(&self) -> &'static str {
        match self {
            Input::Select { .. } => "select",
            Input::Append { .. } => "append",
            Input::Clear => "clear",
            Input::Submit => "submit",
            Input::Enter { .. } => "enter",
            Input::Choose { .. } => "choose",
            Input::Pick { .. } => "pick",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("input `{input}` is not accepted by {game}")]
    Unsupported { game: GameId, input: &'static str },
    #[error("`{0}` is not part of this round")]
    UnknownObject(String),
    #[error("option index {index} is out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },
}

/// Effect of one input on the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing changed (e.g. clicking a matched object, submitting nothing).
    Ignored,
    /// State changed but the answer is not final yet.
    Pending,
    /// A partial answer earned points; the round continues.
    Scored,
    Finished { correct: bool },
}

/// In-progress answer for the response phase.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseState {
    Matching(MatchingState),
    Recall(RecallState),
    Question { text: Option<String> },
    Choice { value: Option<i64> },
    Pick { index: Option<usize> },
}

impl ResponseState {
    fn for_game(game: GameId) -> Self {
        match game {
            GameId::ObjectAssociation => ResponseState::Matching(MatchingState::default()),
            GameId::SequenceRecall => ResponseState::Recall(RecallState::default()),
            GameId::QuantitativeRecall => ResponseState::Question { text: None },
            GameId::PatternCompletion => ResponseState::Choice { value: None },
            GameId::SymbolMatching => ResponseState::Pick { index: None },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Challenge {
    pub stimulus: Stimulus,
    pub response: ResponseState,
}

impl Challenge {
    pub fn generate<R: Rng + ?Sized>(game: GameId, level: u32, rng: &mut R) -> Self {
        Self::from_stimulus(Stimulus::generate(game, level, rng))
    }

    pub fn from_stimulus(stimulus: Stimulus) -> Self {
        let response = ResponseState::for_game(stimulus.game());
        Self { stimulus, response }
    }

    pub fn game(&self) -> GameId {
        self.stimulus.game()
    }

    /// Called once when the response phase opens.
    pub fn begin_response<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Stimulus::ObjectAssociation(s) = &mut self.stimulus {
            s.shuffle_presentation(rng);
        }
    }

    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        input: Input,
        rng: &mut R,
    ) -> Result<Progress, InputError> {
        let game = self.game();
        let unsupported = |input: &Input| InputError::Unsupported {
            game,
            input: input.name(),
        };

        match (&mut self.stimulus, &mut self.response, input) {
            (
                Stimulus::ObjectAssociation(s),
                ResponseState::Matching(m),
                Input::Select { object },
            ) => {
                let object = s
                    .resolve(&object)
                    .ok_or(InputError::UnknownObject(object))?;
                Ok(match m.click(s, object, rng) {
                    ClickResult::Ignored => Progress::Ignored,
                    ClickResult::Selected | ClickResult::Mismatch => Progress::Pending,
                    ClickResult::Matched if m.is_complete(s) => Progress::Finished { correct: true },
                    ClickResult::Matched => Progress::Scored,
                })
            }

            (Stimulus::SequenceRecall(_), ResponseState::Recall(r), Input::Append { item }) => {
                r.append(item);
                Ok(Progress::Pending)
            }
            (Stimulus::SequenceRecall(_), ResponseState::Recall(r), Input::Clear) => {
                r.clear();
                Ok(Progress::Pending)
            }
            (Stimulus::SequenceRecall(s), ResponseState::Recall(r), Input::Submit) => {
                if r.built.is_empty() {
                    return Ok(Progress::Ignored);
                }
                Ok(Progress::Finished {
                    correct: s.is_correct(&r.built),
                })
            }

            (
                Stimulus::QuantitativeRecall(s),
                ResponseState::Question { text: slot },
                Input::Enter { text },
            ) => {
                let correct = s.is_correct(&text);
                *slot = Some(text);
                Ok(Progress::Finished { correct })
            }

            (
                Stimulus::PatternCompletion(s),
                ResponseState::Choice { value: slot },
                Input::Choose { value },
            ) => {
                *slot = Some(value);
                Ok(Progress::Finished {
                    correct: s.is_correct(value),
                })
            }

            (
                Stimulus::SymbolMatching(s),
                ResponseState::Pick { index: slot },
                Input::Pick { index },
            ) => {
                let len = s.target_symbols.len();
                if index >= len {
                    return Err(InputError::OutOfRange { index, len });
                }
                *slot = Some(index);
                Ok(Progress::Finished {
                    correct: s.is_correct(index),
                })
            }

            (_, _, other) => Err(unsupported(&other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_association::PAIR_CATALOG;
    use crate::quantitative_recall::QuestionType;
    use crate::sequence_recall::ItemKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn generated_challenge_matches_game() {
        let mut rng = rng();
        for game in GameId::ALL {
            let c = Challenge::generate(game, 1, &mut rng);
            assert_eq!(c.game(), game);
        }
    }

    #[test]
    fn association_scores_each_pair_and_finishes_on_last() {
        let mut rng = rng();
        let mut c = Challenge::from_stimulus(Stimulus::ObjectAssociation(AssociationStimulus {
            pairs: vec![PAIR_CATALOG[0], PAIR_CATALOG[1]],
            presentation: Vec::new(),
        }));
        c.begin_response(&mut rng);

        let select = |o: &str| Input::Select {
            object: o.to_string(),
        };
        assert_eq!(c.apply(select("Key"), &mut rng), Ok(Progress::Pending));
        assert_eq!(c.apply(select("Lock"), &mut rng), Ok(Progress::Scored));
        assert_eq!(c.apply(select("Key"), &mut rng), Ok(Progress::Ignored));
        assert_eq!(c.apply(select("Paper"), &mut rng), Ok(Progress::Pending));
        assert_eq!(
            c.apply(select("Pen"), &mut rng),
            Ok(Progress::Finished { correct: true })
        );
        assert_eq!(
            c.apply(select("Nope"), &mut rng),
            Err(InputError::UnknownObject("Nope".to_string()))
        );
    }

    #[test]
    fn sequence_submit_needs_items() {
        let mut rng = rng();
        let mut c = Challenge::from_stimulus(Stimulus::SequenceRecall(SequenceStimulus {
            kind: ItemKind::Numbers,
            sequence: vec![SeqItem::Number(3), SeqItem::Number(9)],
        }));

        assert_eq!(c.apply(Input::Submit, &mut rng), Ok(Progress::Ignored));
        c.apply(Input::Append { item: SeqItem::Number(9) }, &mut rng).unwrap();
        c.apply(Input::Clear, &mut rng).unwrap();
        c.apply(Input::Append { item: SeqItem::Number(3) }, &mut rng).unwrap();
        c.apply(Input::Append { item: SeqItem::Number(9) }, &mut rng).unwrap();
        assert_eq!(
            c.apply(Input::Submit, &mut rng),
            Ok(Progress::Finished { correct: true })
        );
    }

    #[test]
    fn wrong_input_kind_is_rejected() {
        let mut rng = rng();
        let mut c = Challenge::from_stimulus(Stimulus::QuantitativeRecall(QuantitativeStimulus {
            numbers: vec![4, 7],
            question: QuestionType::Sum,
        }));
        assert_eq!(
            c.apply(Input::Pick { index: 0 }, &mut rng),
            Err(InputError::Unsupported {
                game: GameId::QuantitativeRecall,
                input: "pick",
            })
        );
        assert_eq!(
            c.apply(Input::Enter { text: "11".into() }, &mut rng),
            Ok(Progress::Finished { correct: true })
        );
    }

    #[test]
    fn symbol_pick_is_range_checked() {
        let mut rng = rng();
        let mut c = Challenge::generate(GameId::SymbolMatching, 1, &mut rng);
        assert_eq!(
            c.apply(Input::Pick { index: 2 }, &mut rng),
            Err(InputError::OutOfRange { index: 2, len: 2 })
        );
    }
}
