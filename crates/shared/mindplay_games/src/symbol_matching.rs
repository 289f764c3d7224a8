use rand::Rng;
use serde::Serialize;

use crate::scaling::SYMBOLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub id: &'static str,
    pub icon: &'static str,
    pub value: u8,
    pub border: &'static str,
}

const fn sym(id: &'static str, icon: &'static str, value: u8, border: &'static str) -> Symbol {
    Symbol {
        id,
        icon,
        value,
        border,
    }
}

pub const SYMBOL_CATALOG: [Symbol; 8] = [
    sym("ring-red", "⭕", 2, "red"),
    sym("square-blue", "■", 2, "blue"),
    sym("triangle-red", "▲", 4, "red"),
    sym("triangle-green", "▲", 3, "green"),
    sym("ring-green", "⭕", 4, "green"),
    sym("diamond-purple", "◆", 1, "purple"),
    sym("square-purple", "■", 1, "purple"),
    sym("ring-blue", "⭕", 3, "blue"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Same,
    Different,
    Sequence,
    Group,
}

impl MatchRule {
    pub const ALL: [MatchRule; 4] = [
        MatchRule::Same,
        MatchRule::Different,
        MatchRule::Sequence,
        MatchRule::Group,
    ];

    /// Index of the correct card in `target_symbols`. Fixed per rule.
    pub fn answer_index(self) -> usize {
        match self {
            MatchRule::Different => 1,
            MatchRule::Same | MatchRule::Sequence | MatchRule::Group => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolStimulus {
    pub rule: MatchRule,
    pub symbols: Vec<Symbol>,
    pub target_symbols: [Symbol; 2],
    pub answer: usize,
}

fn random_symbol<R: Rng + ?Sized>(rng: &mut R) -> Symbol {
    SYMBOL_CATALOG[rng.gen_range(0..SYMBOL_CATALOG.len())]
}

fn first_other(s: Symbol) -> Symbol {
    SYMBOL_CATALOG
        .iter()
        .copied()
        .find(|c| c.id != s.id)
        .unwrap_or(SYMBOL_CATALOG[0])
}

impl SymbolStimulus {
    pub fn generate<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Self {
        let rule = MatchRule::ALL[rng.gen_range(0..MatchRule::ALL.len())];
        Self::generate_rule(rule, level, rng)
    }

    pub fn generate_rule<R: Rng + ?Sized>(rule: MatchRule, level: u32, rng: &mut R) -> Self {
        let n = SYMBOLS.count(level).min(SYMBOL_CATALOG.len());

        let (symbols, target_symbols) = match rule {
            MatchRule::Same => {
                let s = random_symbol(rng);
                (vec![s; n], [s, first_other(s)])
            }
            MatchRule::Different => {
                let symbols: Vec<Symbol> = (0..n).map(|_| random_symbol(rng)).collect();
                let mut unique: Vec<Symbol> = Vec::with_capacity(n);
                for s in &symbols {
                    if !unique.iter().any(|u| u.id == s.id) {
                        unique.push(*s);
                    }
                }
                let first = unique[0];
                let second = unique.get(1).copied().unwrap_or(SYMBOL_CATALOG[0]);
                (symbols, [first, second])
            }
            MatchRule::Sequence => {
                let span = SYMBOL_CATALOG.len() - n;
                let start = if span == 0 { 0 } else { rng.gen_range(0..span) };
                let symbols = SYMBOL_CATALOG[start..start + n].to_vec();
                let next = SYMBOL_CATALOG
                    .get(start + n)
                    .copied()
                    .unwrap_or(SYMBOL_CATALOG[0]);
                let last = symbols[n - 1];
                (symbols, [next, last])
            }
            MatchRule::Group => {
                let g = random_symbol(rng);
                let symbols = (0..n)
                    .map(|i| if 2 * i < n { g } else { random_symbol(rng) })
                    .collect();
                (symbols, [g, first_other(g)])
            }
        };

        Self {
            rule,
            symbols,
            target_symbols,
            answer: rule.answer_index(),
        }
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.answer
    }
}
