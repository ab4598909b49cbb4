//! Admin dashboard statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_homepage_content: i64,
    pub total_team_members: i64,
    pub active_content: i64,
    pub featured_members: i64,
    pub section_breakdown: BTreeMap<String, i64>,
    pub category_breakdown: BTreeMap<String, i64>,
    pub hero_images: i64,
    pub active_hero_images: i64,
    pub announcements: i64,
    pub live_announcements: i64,
    pub registrations_by_status: BTreeMap<String, i64>,
    pub contact_messages: i64,
}

/// Result of seeding the content tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub hero_images: usize,
    pub team_members: usize,
    pub homepage_content: usize,
    pub site_settings: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.hero_images + self.team_members + self.homepage_content + self.site_settings
    }
}
