use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::scaling::SEQUENCE_ITEMS;

pub const COLORS: [&str; 8] = [
    "red", "blue", "green", "yellow", "purple", "orange", "pink", "cyan",
];
pub const MAX_NUMBER: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Colors,
    Numbers,
    Letters,
}

impl ItemKind {
    /// Two-step draw: colors a third of the time, then numbers vs letters.
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<f64>() < 0.33 {
            ItemKind::Colors
        } else if rng.gen::<f64>() < 0.66 {
            ItemKind::Numbers
        } else {
            ItemKind::Letters
        }
    }

    /// Every item a player can pick for this kind, in display order.
    pub fn palette(self) -> Vec<SeqItem> {
        match self {
            ItemKind::Colors => COLORS.iter().map(|c| SeqItem::Color(c.to_string())).collect(),
            ItemKind::Numbers => (1..=MAX_NUMBER).map(SeqItem::Number).collect(),
            ItemKind::Letters => ('A'..='Z').map(SeqItem::Letter).collect(),
        }
    }

    fn random_item<R: Rng + ?Sized>(self, rng: &mut R) -> SeqItem {
        match self {
            ItemKind::Colors => SeqItem::Color(COLORS[rng.gen_range(0..COLORS.len())].to_string()),
            ItemKind::Numbers => SeqItem::Number(rng.gen_range(1..=MAX_NUMBER)),
            ItemKind::Letters => SeqItem::Letter(char::from(b'A' + rng.gen_range(0..26u8))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeqItem {
    Color(String),
    Number(u8),
    Letter(char),
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceStimulus {
    pub kind: ItemKind,
    pub sequence: Vec<SeqItem>,
}

impl SequenceStimulus {
    pub fn generate<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Self {
        let kind = ItemKind::draw(rng);
        let len = SEQUENCE_ITEMS.count(level);
        let sequence = (0..len).map(|_| kind.random_item(rng)).collect();
        Self { kind, sequence }
    }

    pub fn palette(&self) -> Vec<SeqItem> {
        self.kind.palette()
    }

    /// Exact, ordered equality with the generated sequence.
    pub fn is_correct(&self, built: &[SeqItem]) -> bool {
        self.sequence == built
    }
}

/// The sequence a player builds one click at a time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecallState {
    pub built: Vec<SeqItem>,
}

impl RecallState {
    pub fn append(&mut self, item: SeqItem) {
        self.built.push(item);
    }

    pub fn clear(&mut self) {
        self.built.clear();
    }
}
