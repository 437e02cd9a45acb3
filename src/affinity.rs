//! Declarative weight tables linking detected student state to teaching
//! styles, plus the emotion × intensity support table.
//!
//! Every selector reads from these statics instead of carrying its own
//! if/else ladder.

use crate::emotion::{EmotionalState, SupportLevel};
use crate::learning_style::LearningStyle;
use crate::teaching_style::TeachingStyle;
use crate::topic::TopicComplexity;

use crate::emotion::EmotionalState as E;
use crate::emotion::SupportLevel as S;
use crate::teaching_style::TeachingStyle as T;

pub struct AffinityMatrix<R: 'static, C: 'static> {
    rows: &'static [(R, &'static [(C, f64)])],
}

impl<R: Copy + PartialEq, C: Copy> AffinityMatrix<R, C> {
    pub const fn new(rows: &'static [(R, &'static [(C, f64)])]) -> Self {
        Self { rows }
    }

    /// Column weights for `row`; empty when the row has no entry.
    pub fn weights(&self, row: R) -> &'static [(C, f64)] {
        self.rows
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, weights)| *weights)
            .unwrap_or(&[])
    }

    pub fn weight(&self, row: R, column: C) -> f64
    where
        C: PartialEq,
    {
        self.weights(row)
            .iter()
            .filter(|(c, _)| *c == column)
            .map(|(_, w)| *w)
            .sum()
    }
}

pub static EMOTION_TEACHING: AffinityMatrix<EmotionalState, TeachingStyle> = AffinityMatrix::new(&[
    (E::Excited, &[(T::Playful, 3.0), (T::Socratic, 1.0)]),
    (E::Curious, &[(T::Socratic, 3.0), (T::Logical, 2.0), (T::Playful, 1.0)]),
    (
        E::Confused,
        &[(T::Logical, 3.0), (T::Encouraging, 2.0), (T::Adaptive, 1.0), (T::Socratic, -1.0)],
    ),
    (E::Frustrated, &[(T::Encouraging, 4.0), (T::Adaptive, 3.0), (T::Socratic, -1.0)]),
    (
        E::Overwhelmed,
        &[(T::Encouraging, 3.0), (T::Adaptive, 2.0), (T::Logical, 1.0), (T::Socratic, -2.0)],
    ),
    (E::Confident, &[(T::Socratic, 3.0), (T::Professional, 1.0), (T::Logical, 1.0)]),
    (E::Anxious, &[(T::Encouraging, 4.0), (T::Playful, 1.0), (T::Professional, -1.0)]),
    (E::Tired, &[(T::Playful, 2.0), (T::Encouraging, 2.0), (T::Socratic, -1.0)]),
    (E::Neutral, &[(T::Adaptive, 1.0)]),
]);

pub static LEARNING_TEACHING: AffinityMatrix<LearningStyle, TeachingStyle> = AffinityMatrix::new(&[
    (LearningStyle::Visual, &[(T::Playful, 1.0), (T::Logical, 1.0)]),
    (LearningStyle::Auditory, &[(T::Socratic, 2.0), (T::Encouraging, 1.0)]),
    (LearningStyle::Kinesthetic, &[(T::Playful, 2.0), (T::Adaptive, 1.0)]),
    (LearningStyle::Reading, &[(T::Professional, 2.0), (T::Logical, 2.0)]),
    (LearningStyle::Mixed, &[(T::Adaptive, 2.0)]),
]);

pub static COMPLEXITY_TEACHING: AffinityMatrix<TopicComplexity, TeachingStyle> = AffinityMatrix::new(&[
    (TopicComplexity::Low, &[(T::Playful, 1.0)]),
    (TopicComplexity::Medium, &[(T::Logical, 1.0), (T::Adaptive, 1.0)]),
    (
        TopicComplexity::High,
        &[(T::Logical, 2.0), (T::Encouraging, 1.0), (T::Professional, 1.0)],
    ),
]);

/// Support level per emotion for the intensity bands 1-3, 4-7 and 8-10.
static SUPPORT_TABLE: &[(EmotionalState, [SupportLevel; 3])] = &[
    (E::Excited, [S::Standard, S::Standard, S::Standard]),
    (E::Curious, [S::Standard, S::Standard, S::Standard]),
    (E::Confident, [S::Standard, S::Standard, S::Standard]),
    (E::Neutral, [S::Standard, S::Standard, S::Standard]),
    (E::Confused, [S::Elevated, S::Elevated, S::High]),
    (E::Tired, [S::Elevated, S::Elevated, S::High]),
    (E::Frustrated, [S::Elevated, S::High, S::Maximum]),
    (E::Overwhelmed, [S::Elevated, S::High, S::Maximum]),
    (E::Anxious, [S::Elevated, S::High, S::Maximum]),
];

pub fn support_level(emotion: EmotionalState, intensity: u8) -> SupportLevel {
    let band = match intensity {
        0..=3 => 0,
        4..=7 => 1,
        _ => 2,
    };
    SUPPORT_TABLE
        .iter()
        .find(|(e, _)| *e == emotion)
        .map(|(_, levels)| levels[band])
        .unwrap_or(S::Standard)
}
