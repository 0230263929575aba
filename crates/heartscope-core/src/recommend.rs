#![forbid(unsafe_code)]

//! Recommendation narrative.
//!
//! The narrative is built from two sources, in this order:
//!
//! 1. Fixed threshold rules on the raw form values (cholesterol, resting
//!    blood pressure, age). Each rule contributes at most one sentence and
//!    marks its field as *covered*.
//! 2. One sentence about the highest-magnitude ranked factor. When that
//!    factor is already covered by a fired rule, [`DuplicatePolicy`] decides
//!    what happens, for both signs alike.
//!
//! A closing disclaimer is always attached. With no sentence at all, a
//! neutral "no specific notes" line stands in for the list.

use serde::Deserialize;

use crate::features::FeatureNameMap;
use crate::input::{FormInput, fields};
use crate::markup::Sentence;
use crate::ranking::{Direction, RankedFactor};

/// Cholesterol (mg/dl) at or above which the reading is very high.
pub const CHOL_VERY_HIGH: f64 = 240.0;
/// Cholesterol (mg/dl) at or above which the reading is borderline high.
pub const CHOL_BORDERLINE: f64 = 200.0;
/// Resting systolic pressure (mmHg) for hypertension.
pub const BP_HIGH: f64 = 140.0;
/// Resting systolic pressure (mmHg) for elevated.
pub const BP_ELEVATED: f64 = 130.0;
/// Resting systolic pressure (mmHg) for slightly elevated.
pub const BP_SLIGHTLY_ELEVATED: f64 = 120.0;
/// Age at or above which age itself is called out.
pub const AGE_RISK: f64 = 50.0;

/// What to do when the top-ranked factor is a field a rule already talked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Say nothing more about it.
    #[default]
    Suppress,
    /// Add a short sentence confirming the rule's finding.
    Confirm,
}

/// Severity of a note, used for styling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Warning,
    Caution,
    Note,
    Affirmation,
    Insight,
}

/// Where a note came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A threshold rule on the named form field.
    Rule(&'static str),
    /// The top-ranked factor, by feature key.
    TopFactor(String),
}

/// One bullet of the narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub source: Source,
    pub tone: Tone,
    pub sentence: Sentence,
}

/// The assembled narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    notes: Vec<Note>,
}

impl Recommendation {
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Sentences to show as the list body: the notes, or the neutral line
    /// when there are none.
    #[must_use]
    pub fn body(&self) -> Vec<&Sentence> {
        if self.notes.is_empty() {
            vec![no_notes()]
        } else {
            self.notes.iter().map(|n| &n.sentence).collect()
        }
    }

    #[must_use]
    pub fn disclaimer(&self) -> &'static Sentence {
        disclaimer()
    }

    /// Plain-text lines, body then disclaimer.
    #[must_use]
    pub fn to_plain_lines(&self) -> Vec<String> {
        let disclaimer: &Sentence = self.disclaimer();
        self.body()
            .into_iter()
            .chain(std::iter::once(disclaimer))
            .map(Sentence::to_plain_text)
            .collect()
    }

    #[must_use]
    pub fn top_factor_note(&self) -> Option<&Note> {
        self.notes
            .iter()
            .find(|n| matches!(n.source, Source::TopFactor(_)))
    }
}

fn no_notes() -> &'static Sentence {
    static NO_NOTES: std::sync::OnceLock<Sentence> = std::sync::OnceLock::new();
    NO_NOTES.get_or_init(|| {
        Sentence::new()
            .plain("Based on your data, there are no specific notes. Keep up a healthy lifestyle.")
    })
}

fn disclaimer() -> &'static Sentence {
    static DISCLAIMER: std::sync::OnceLock<Sentence> = std::sync::OnceLock::new();
    DISCLAIMER.get_or_init(|| {
        Sentence::new().strong("IMPORTANT:").plain(
            " This analysis is an informational aid and not a substitute for a professional \
             medical diagnosis or advice. Always consult your doctor.",
        )
    })
}

// ============================================================================
// Rules
// ============================================================================

fn cholesterol_rule(chol: f64) -> Note {
    let (tone, sentence) = if chol >= CHOL_VERY_HIGH {
        (
            Tone::Warning,
            Sentence::new()
                .strong("Your cholesterol is very high (≥ 240 mg/dl).")
                .plain(
                    " This is a major risk factor. Discuss diet and possible treatment \
                     with your doctor soon.",
                ),
        )
    } else if chol >= CHOL_BORDERLINE {
        (
            Tone::Caution,
            Sentence::new()
                .strong("Your cholesterol is borderline high (200-239 mg/dl).")
                .plain(
                    " Improving your diet, such as cutting saturated fat and eating more \
                     fiber, can help a lot.",
                ),
        )
    } else {
        (
            Tone::Affirmation,
            Sentence::new()
                .strong("Your cholesterol is in the normal range (< 200 mg/dl).")
                .plain(" Keep up a balanced diet to keep it there."),
        )
    };
    Note {
        source: Source::Rule(fields::CHOLESTEROL),
        tone,
        sentence,
    }
}

fn blood_pressure_rule(bp: f64) -> Note {
    let (tone, sentence) = if bp >= BP_HIGH {
        (
            Tone::Warning,
            Sentence::new()
                .strong("Your blood pressure is high (≥ 140 mmHg).")
                .plain(
                    " Please monitor it regularly and talk to your doctor about treatment \
                     or lifestyle changes (e.g. reducing salt).",
                ),
        )
    } else if bp >= BP_ELEVATED {
        (
            Tone::Caution,
            Sentence::new()
                .strong("Your blood pressure is elevated (130-139 mmHg).")
                .plain(
                    " Reducing salt, exercising regularly and managing stress can help \
                     bring it down.",
                ),
        )
    } else if bp >= BP_SLIGHTLY_ELEVATED {
        (
            Tone::Note,
            Sentence::new()
                .strong("Your blood pressure is slightly elevated (120-129 mmHg).")
                .plain(" Keep an eye on it and favour low-salt meals."),
        )
    } else {
        (
            Tone::Affirmation,
            Sentence::new()
                .strong("Your blood pressure is normal (< 120 mmHg).")
                .plain(" Keep it up."),
        )
    };
    Note {
        source: Source::Rule(fields::RESTING_BP),
        tone,
        sentence,
    }
}

fn age_rule(age: f64) -> Option<Note> {
    (age >= AGE_RISK).then(|| Note {
        source: Source::Rule(fields::AGE),
        tone: Tone::Note,
        sentence: Sentence::new().strong("Being 50 or older").plain(
            " is itself a risk factor for heart disease. Regular check-ups are recommended.",
        ),
    })
}

fn top_factor_note(
    factor: &RankedFactor,
    covered: bool,
    names: &FeatureNameMap,
    policy: DuplicatePolicy,
) -> Option<Note> {
    if factor.value == 0.0 || (covered && policy == DuplicatePolicy::Suppress) {
        return None;
    }
    let label = names.label(&factor.key).to_string();
    let sentence = match (factor.direction(), covered) {
        (Direction::Increases, false) => Sentence::new()
            .plain("AI analysis shows ")
            .strong(label)
            .plain(" is the unique factor contributing most to your current risk."),
        (Direction::Increases, true) => Sentence::new()
            .plain("As noted above, AI analysis confirms ")
            .strong(label)
            .plain(" is your largest risk contributor."),
        (Direction::Decreases, false) => Sentence::new()
            .plain("Good news! AI analysis shows ")
            .strong(label)
            .plain(" is the main factor ")
            .strong("lowering")
            .plain(" your risk. Keep it up!"),
        (Direction::Decreases, true) => Sentence::new()
            .plain("As noted above, AI analysis confirms ")
            .strong(label)
            .plain(" is the strongest factor lowering your risk."),
    };
    Some(Note {
        source: Source::TopFactor(factor.key.clone()),
        tone: Tone::Insight,
        sentence,
    })
}

/// Build the narrative for one prediction.
///
/// `ranked` must already be in rank order; only its first entry is used.
#[must_use]
pub fn recommend(
    input: &FormInput,
    ranked: &[RankedFactor],
    names: &FeatureNameMap,
    policy: DuplicatePolicy,
) -> Recommendation {
    let mut notes = Vec::new();
    notes.extend(input.get(fields::CHOLESTEROL).map(cholesterol_rule));
    notes.extend(input.get(fields::RESTING_BP).map(blood_pressure_rule));
    notes.extend(input.get(fields::AGE).and_then(age_rule));

    if let Some(top) = ranked.first() {
        let covered = notes
            .iter()
            .any(|n| matches!(n.source, Source::Rule(field) if field == top.key));
        notes.extend(top_factor_note(top, covered, names, policy));
    }

    tracing::debug!(notes = notes.len(), ?policy, "recommendation assembled");
    Recommendation { notes }
}
