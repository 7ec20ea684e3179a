//! Achievement ladder and encouragement messages.
//!
//! # Responsibility
//! - Evaluate the fixed day-count threshold ladder for a given elapsed-day
//!   count.
//! - Pick the milestone message shown on the home screen.
//!
//! # Invariants
//! - The ladder is strictly increasing, so met achievements are always a
//!   prefix: reaching 30 days implies every lower milestone.

/// Palette role assigned to an achievement badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Primary,
    Secondary,
    Accent,
    Success,
    Warning,
}

impl ColorTag {
    /// Stable wire label for boundary layers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Success => "success",
            Self::Warning => "warning",
        }
    }
}

/// One rung of the milestone ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    /// Elapsed days required to earn this milestone.
    pub threshold_days: u64,
    pub label: &'static str,
    /// Symbol name used by the badge rendering layer.
    pub icon: &'static str,
    pub color: ColorTag,
}

const LADDER: &[Achievement] = &[
    Achievement {
        threshold_days: 1,
        label: "First day",
        icon: "star.fill",
        color: ColorTag::Secondary,
    },
    Achievement {
        threshold_days: 3,
        label: "3 days",
        icon: "flame.fill",
        color: ColorTag::Warning,
    },
    Achievement {
        threshold_days: 7,
        label: "One week",
        icon: "trophy.fill",
        color: ColorTag::Primary,
    },
    Achievement {
        threshold_days: 14,
        label: "2 weeks",
        icon: "medal.fill",
        color: ColorTag::Accent,
    },
    Achievement {
        threshold_days: 30,
        label: "One month",
        icon: "crown.fill",
        color: ColorTag::Success,
    },
    Achievement {
        threshold_days: 90,
        label: "3 months",
        icon: "diamond.fill",
        color: ColorTag::Primary,
    },
    Achievement {
        threshold_days: 365,
        label: "One year",
        icon: "sparkles",
        color: ColorTag::Secondary,
    },
];

/// Returns the ladder prefix earned at `elapsed_days`, in threshold order.
pub fn achievements_for(elapsed_days: u64) -> Vec<Achievement> {
    LADDER
        .iter()
        .take_while(|achievement| achievement.threshold_days <= elapsed_days)
        .copied()
        .collect()
}

/// Milestone message for the home screen; `None` before the first full day.
///
/// Highest matching tier wins.
pub fn encouragement(elapsed_days: u64) -> Option<&'static str> {
    match elapsed_days {
        0 => None,
        1..=2 => Some("Every day counts!"),
        3..=6 => Some("Keep it up!"),
        7..=29 => Some("A whole week behind you!"),
        _ => Some("Great work! A month without it!"),
    }
}
