//! Built-in habit templates offered during onboarding.
//!
//! Selected templates become the user's first habits; see
//! [`crate::RewardLedger::complete_onboarding`].

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Health,
    Mind,
    Productivity,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
}

const CATALOGUE: &[HabitTemplate] = &[
    HabitTemplate { id: "water", name: "Drink 8 glasses of water", category: TemplateCategory::Health },
    HabitTemplate { id: "walk", name: "Take a 20 minute walk", category: TemplateCategory::Health },
    HabitTemplate { id: "sleep", name: "In bed before midnight", category: TemplateCategory::Health },
    HabitTemplate { id: "stretch", name: "Stretch for 5 minutes", category: TemplateCategory::Health },
    HabitTemplate { id: "read", name: "Read 10 pages", category: TemplateCategory::Mind },
    HabitTemplate { id: "meditate", name: "Meditate", category: TemplateCategory::Mind },
    HabitTemplate { id: "journal", name: "Write in a journal", category: TemplateCategory::Mind },
    HabitTemplate { id: "plan", name: "Plan tomorrow", category: TemplateCategory::Productivity },
    HabitTemplate { id: "tidy", name: "Tidy up for 10 minutes", category: TemplateCategory::Productivity },
    HabitTemplate { id: "call", name: "Message a friend", category: TemplateCategory::Social },
];

pub fn catalogue() -> &'static [HabitTemplate] {
    CATALOGUE
}

pub fn find_template(id: &str) -> Option<HabitTemplate> {
    CATALOGUE.iter().copied().find(|t| t.id.eq_ignore_ascii_case(id))
}
