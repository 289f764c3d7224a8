use rand::Rng;
use serde::Serialize;

use crate::scaling::RECALL_NUMBERS;

pub const MAX_VALUE: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Sum,
    Product,
    /// `first - second - third ...`, folded left to right.
    Difference,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [
        QuestionType::Sum,
        QuestionType::Product,
        QuestionType::Difference,
    ];

    pub fn prompt(self) -> &'static str {
        match self {
            QuestionType::Sum => "What is the sum of all the numbers?",
            QuestionType::Product => "What is the product of all the numbers?",
            QuestionType::Difference => "What is the difference (first - second - third...)?",
        }
    }

    pub fn aggregate(self, numbers: &[i64]) -> i64 {
        match self {
            QuestionType::Sum => numbers.iter().sum(),
            QuestionType::Product => numbers.iter().product(),
            QuestionType::Difference => match numbers.split_first() {
                Some((first, rest)) => rest.iter().fold(*first, |acc, n| acc - n),
                None => 0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuantitativeStimulus {
    pub numbers: Vec<i64>,
    pub question: QuestionType,
}

impl QuantitativeStimulus {
    pub fn generate<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Self {
        let count = RECALL_NUMBERS.count(level);
        let numbers = (0..count).map(|_| rng.gen_range(1..=MAX_VALUE)).collect();
        let question = QuestionType::ALL[rng.gen_range(0..QuestionType::ALL.len())];
        Self { numbers, question }
    }

    pub fn expected(&self) -> i64 {
        self.question.aggregate(&self.numbers)
    }

    /// Compare raw user text against the aggregate. Text that does not start
    /// with an integer is simply wrong.
    pub fn is_correct(&self, text: &str) -> bool {
        parse_leading_int(text) == Some(self.expected())
    }
}

/// Integer prefix of `text`: optional leading whitespace and sign, then at
/// least one ASCII digit. Trailing junk is ignored (`"12abc"` reads as 12).
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
