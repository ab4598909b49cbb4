//! Generic admin resource store
//!
//! Each admin screen follows the same cycle: list the records, submit a
//! form, then refetch so the list mirrors the server. [`ResourceEndpoint`]
//! describes one resource and [`ResourceStore`] runs that cycle for it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use crate::client::http::ApiClient;
use crate::client::notify::{Notification, Notifier};
use crate::models::{
    Announcement, AnnouncementQuery, CreateAnnouncementRequest, CreateHeroImageRequest, CreateHomepageContentRequest,
    CreateTeamMemberRequest, HeroImage, HeroImageQuery, HomepageContent, HomepageContentQuery, Page, TeamMember,
    TeamMemberQuery, UpdateAnnouncementRequest, UpdateHeroImageRequest, UpdateHomepageContentRequest,
    UpdateTeamMemberRequest,
};
use crate::utils::errors::{ConnectHubError, Result};
use crate::validation::Validate;

/// An admin collection reachable at `PATH` and `PATH/{id}`
pub trait ResourceEndpoint {
    type Record: DeserializeOwned + Clone;
    type Create: Serialize + Validate;
    type Update: Serialize + Validate;
    type Query: Serialize + Default;

    const PATH: &'static str;
    /// Human-readable name used in notifications
    const LABEL: &'static str;
}

#[derive(Debug, Clone, Copy)]
pub struct HeroImages;

impl ResourceEndpoint for HeroImages {
    type Record = HeroImage;
    type Create = CreateHeroImageRequest;
    type Update = UpdateHeroImageRequest;
    type Query = HeroImageQuery;

    const PATH: &'static str = "/api/admin/hero-images";
    const LABEL: &'static str = "Hero image";
}

#[derive(Debug, Clone, Copy)]
pub struct TeamMembers;

impl ResourceEndpoint for TeamMembers {
    type Record = TeamMember;
    type Create = CreateTeamMemberRequest;
    type Update = UpdateTeamMemberRequest;
    type Query = TeamMemberQuery;

    const PATH: &'static str = "/api/admin/members";
    const LABEL: &'static str = "Team member";
}

#[derive(Debug, Clone, Copy)]
pub struct Announcements;

impl ResourceEndpoint for Announcements {
    type Record = Announcement;
    type Create = CreateAnnouncementRequest;
    type Update = UpdateAnnouncementRequest;
    type Query = AnnouncementQuery;

    const PATH: &'static str = "/api/admin/announcements";
    const LABEL: &'static str = "Announcement";
}

#[derive(Debug, Clone, Copy)]
pub struct HomepageSections;

impl ResourceEndpoint for HomepageSections {
    type Record = HomepageContent;
    type Create = CreateHomepageContentRequest;
    type Update = UpdateHomepageContentRequest;
    type Query = HomepageContentQuery;

    const PATH: &'static str = "/api/admin/homepage";
    const LABEL: &'static str = "Homepage content";
}

/// Local view of one admin collection
pub struct ResourceStore<R: ResourceEndpoint> {
    client: ApiClient,
    query: R::Query,
    items: Vec<R::Record>,
    total: i64,
    loading: bool,
    error: Option<String>,
    notifier: Notifier,
}

impl<R: ResourceEndpoint> ResourceStore<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            query: R::Query::default(),
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            notifier: Notifier::new(),
        }
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifier.last()
    }

    /// Filters used by the next refetch
    pub fn set_query(&mut self, query: R::Query) {
        self.query = query;
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", R::PATH, id)
    }

    fn fail(&mut self, error: &ConnectHubError) {
        let message = match error {
            ConnectHubError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        self.error = Some(message.clone());
        self.notifier.error("Error", message);
    }

    fn check<T: Validate>(&mut self, request: &T) -> Result<()> {
        if let Err(errors) = request.validate() {
            self.notifier.error(
                "Please check the form",
                errors
                    .errors()
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_default(),
            );
            return Err(errors.into());
        }
        Ok(())
    }

    /// Reload the list from the server
    pub async fn refetch(&mut self) -> Result<()> {
        self.loading = true;
        let result = self
            .client
            .get_with_query::<Page<R::Record>, _>(R::PATH, &self.query)
            .await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.items = page.data;
                self.total = page.total;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    async fn refetch_after_write(&mut self) {
        if let Err(e) = self.refetch().await {
            warn!(resource = R::LABEL, error = %e, "Refetch after write failed");
        }
    }

    /// Create a record; invalid input is rejected before any request
    pub async fn create(&mut self, request: &R::Create) -> Result<R::Record> {
        self.check(request)?;

        match self.client.post::<_, R::Record>(R::PATH, request).await {
            Ok(record) => {
                self.notifier.success("Success", format!("{} created successfully", R::LABEL));
                self.refetch_after_write().await;
                Ok(record)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn update(&mut self, id: i64, request: &R::Update) -> Result<R::Record> {
        self.check(request)?;

        match self.client.put::<_, R::Record>(&Self::item_path(id), request).await {
            Ok(record) => {
                self.notifier.success("Success", format!("{} updated successfully", R::LABEL));
                self.refetch_after_write().await;
                Ok(record)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, id: i64) -> Result<()> {
        match self.client.delete::<i64>(&Self::item_path(id)).await {
            Ok(_) => {
                self.notifier.success("Success", format!("{} deleted successfully", R::LABEL));
                self.refetch_after_write().await;
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_paths() {
        assert_eq!(ResourceStore::<HeroImages>::item_path(4), "/api/admin/hero-images/4");
        assert_eq!(ResourceStore::<TeamMembers>::item_path(9), "/api/admin/members/9");
    }

    #[tokio::test]
    async fn test_invalid_create_never_leaves_the_client() {
        // Port 9 is discard; validation must fail before any connection attempt
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut store = ResourceStore::<HeroImages>::new(client);

        let result = store.create(&CreateHeroImageRequest::default()).await;
        assert!(matches!(result, Err(ConnectHubError::Validation(_))));
        assert!(store.last_notification().unwrap().is_error());
        assert!(store.error().is_none());
        assert!(store.items().is_empty());
    }
}
