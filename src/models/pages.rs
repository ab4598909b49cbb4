//! Aggregates served to the public pages

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Announcement, HeroImage, HomepageContent, SiteSetting, TeamMember};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomePage {
    pub hero_images: Vec<HeroImage>,
    pub content: Vec<HomepageContent>,
    pub featured_members: Vec<TeamMember>,
    pub announcements: Vec<Announcement>,
    pub settings: BTreeMap<String, Option<String>>,
}

impl HomePage {
    /// Content block for a section, if one is active
    pub fn section(&self, section: &str) -> Option<&HomepageContent> {
        self.content.iter().find(|c| c.section == section)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutPage {
    pub about: Option<HomepageContent>,
    pub members_by_category: BTreeMap<String, Vec<TeamMember>>,
}

/// Public settings collapsed into a key/value map
pub fn settings_map(settings: &[SiteSetting]) -> BTreeMap<String, Option<String>> {
    settings
        .iter()
        .map(|s| (s.setting_key.clone(), s.setting_value.clone()))
        .collect()
}
