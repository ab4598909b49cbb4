//! Announcement bar feed
//!
//! Dismissals live only in this feed instance, so a refetch never brings a
//! dismissed announcement back during the same session.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use crate::client::http::ApiClient;
use crate::models::Announcement;
use crate::utils::errors::Result;

pub struct AnnouncementFeed {
    client: ApiClient,
    announcements: Vec<Announcement>,
    dismissed: HashSet<i64>,
}

impl AnnouncementFeed {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            announcements: Vec::new(),
            dismissed: HashSet::new(),
        }
    }

    /// Load the announcements that are live now
    pub async fn refetch(&mut self) -> Result<()> {
        self.announcements = self.client.get("/api/announcements").await?;
        Ok(())
    }

    pub fn all(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Announcements to show in the bar at `now`
    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<&Announcement> {
        self.announcements
            .iter()
            .filter(|a| a.show_on_all_pages && a.is_live(now) && !self.dismissed.contains(&a.id))
            .collect()
    }

    pub fn visible(&self) -> Vec<&Announcement> {
        self.visible_at(Utc::now())
    }

    pub fn dismiss(&mut self, id: i64) {
        self.dismissed.insert(id);
    }

    pub fn is_dismissed(&self, id: i64) -> bool {
        self.dismissed.contains(&id)
    }
}
