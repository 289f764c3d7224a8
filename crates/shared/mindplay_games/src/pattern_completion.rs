use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::scaling::PATTERN_TERMS;

pub const OPTION_COUNT: usize = 4;

/// Largest decoy offset from the answer, in either direction.
const DECOY_SPREAD: i64 = 10;

/// Random draws allowed per decoy before falling back to a nearest-value scan.
const DECOY_DRAWS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternFamily {
    Arithmetic,
    Geometric,
    Fibonacci,
    Alternating,
}

impl PatternFamily {
    pub const ALL: [PatternFamily; 4] = [
        PatternFamily::Arithmetic,
        PatternFamily::Geometric,
        PatternFamily::Fibonacci,
        PatternFamily::Alternating,
    ];

    pub fn terms<R: Rng + ?Sized>(self, len: usize, rng: &mut R) -> Vec<i64> {
        match self {
            PatternFamily::Arithmetic => {
                let diff: i64 = rng.gen_range(1..=5);
                let start: i64 = rng.gen_range(1..=10);
                (0..len as i64).map(|i| start + i * diff).collect()
            }
            PatternFamily::Geometric => {
                let ratio: i64 = rng.gen_range(2..=4);
                let start: i64 = rng.gen_range(1..=5);
                (0..len as u32).map(|i| start * ratio.pow(i)).collect()
            }
            PatternFamily::Fibonacci => {
                let mut out: Vec<i64> = vec![1, 1];
                while out.len() < len {
                    let n = out.len();
                    out.push(out[n - 1] + out[n - 2]);
                }
                out.truncate(len);
                out
            }
            PatternFamily::Alternating => {
                let start: i64 = rng.gen_range(1..=10);
                let diff: i64 = rng.gen_range(1..=5);
                (0..len as i64)
                    .map(|i| {
                        if i % 2 == 0 {
                            start + i * diff
                        } else {
                            start + (i - 1) * diff - diff
                        }
                    })
                    .collect()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternStimulus {
    pub family: PatternFamily,
    pub pattern: Vec<i64>,
    /// Always an interior position: never the first or last term.
    pub missing_index: usize,
    pub answer: i64,
    pub options: Vec<i64>,
}

impl PatternStimulus {
    pub fn generate<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Self {
        let family = PatternFamily::ALL[rng.gen_range(0..PatternFamily::ALL.len())];
        Self::generate_family(family, level, rng)
    }

    pub fn generate_family<R: Rng + ?Sized>(family: PatternFamily, level: u32, rng: &mut R) -> Self {
        let len = PATTERN_TERMS.count(level);
        let missing_index = rng.gen_range(1..len - 1);
        let pattern = family.terms(len, rng);
        let answer = pattern[missing_index];

        let mut options = decoys(answer, rng);
        options.push(answer);
        options.shuffle(rng);

        Self {
            family,
            pattern,
            missing_index,
            answer,
            options,
        }
    }

    pub fn is_correct(&self, value: i64) -> bool {
        value == self.answer
    }
}

/// Three distinct positive values near `answer`, none equal to it.
fn decoys<R: Rng + ?Sized>(answer: i64, rng: &mut R) -> Vec<i64> {
    let mut out = Vec::with_capacity(OPTION_COUNT);
    let usable = |v: i64, taken: &[i64]| v > 0 && v != answer && !taken.contains(&v);

    while out.len() < OPTION_COUNT - 1 {
        let mut found = None;
        for _ in 0..DECOY_DRAWS {
            let mut offset = rng.gen_range(-DECOY_SPREAD..DECOY_SPREAD);
            if offset >= 0 {
                offset += 1;
            }
            let v = answer + offset;
            if usable(v, &out) {
                found = Some(v);
                break;
            }
        }

        let v = match found {
            Some(v) => v,
            None => nearest_free(answer, &out),
        };
        out.push(v);
    }
    out
}

fn nearest_free(answer: i64, taken: &[i64]) -> i64 {
    let mut k = 1i64;
    loop {
        for v in [answer + k, answer - k] {
            if v > 0 && !taken.contains(&v) {
                return v;
            }
        }
        k += 1;
    }
}
