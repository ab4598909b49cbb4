//! Public page content service
//!
//! Builds the aggregates behind the public home and about pages, caches them
//! through [`CacheService`], and seeds a fresh database with starter content.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};
use crate::database::DatabaseService;
use crate::models::{
    settings_map, AboutPage, Analytics, CreateHeroImageRequest, CreateHomepageContentRequest,
    CreateTeamMemberRequest, HeroImageQuery, HomePage, HomepageContentQuery, SeedReport,
    TeamMemberQuery, UpsertSiteSettingRequest,
};
use crate::services::redis::{CacheService, PUBLIC_NAMESPACE};
use crate::utils::errors::Result;
use crate::utils::logging::log_database_operation;
use crate::utils::helpers::MAX_PAGE_SIZE;

/// Content service for the public website
#[derive(Clone, Debug)]
pub struct ContentService {
    db: DatabaseService,
    cache: CacheService,
    use_cache: bool,
}

impl ContentService {
    pub fn new(db: DatabaseService, cache: CacheService, use_cache: bool) -> Self {
        Self { db, cache, use_cache }
    }

    fn cache_key(page: &str) -> String {
        format!("{}{}", PUBLIC_NAMESPACE, page)
    }

    /// Everything the home page renders
    pub async fn home(&self, now: DateTime<Utc>) -> Result<HomePage> {
        let key = Self::cache_key("home");
        if self.use_cache {
            if let Some(page) = self.cache.fetch::<HomePage>(&key).await {
                return Ok(page);
            }
        }

        let hero_query = HeroImageQuery { is_active: Some(true), limit: Some(MAX_PAGE_SIZE), offset: None };
        let content_query =
            HomepageContentQuery { is_active: Some(true), limit: Some(MAX_PAGE_SIZE), ..Default::default() };
        let member_query = TeamMemberQuery {
            is_active: Some(true),
            is_featured: Some(true),
            limit: Some(MAX_PAGE_SIZE),
            ..Default::default()
        };

        let (hero_images, content, featured_members, announcements, settings) = futures::try_join!(
            self.db.hero_images.list(&hero_query),
            self.db.homepage.list(&content_query),
            self.db.team_members.list(&member_query),
            self.db.announcements.list_live(now),
            self.db.settings.list_public()
        )?;

        let page = HomePage {
            hero_images: hero_images.data,
            content: content.data,
            featured_members: featured_members.data,
            announcements,
            settings: settings_map(&settings),
        };

        debug!(
            hero_images = page.hero_images.len(),
            sections = page.content.len(),
            announcements = page.announcements.len(),
            "Home page assembled"
        );

        if self.use_cache {
            self.cache.store(&key, &page).await;
        }
        Ok(page)
    }

    /// About section plus active team members grouped by category
    pub async fn about(&self) -> Result<AboutPage> {
        let key = Self::cache_key("about");
        if self.use_cache {
            if let Some(page) = self.cache.fetch::<AboutPage>(&key).await {
                return Ok(page);
            }
        }

        let about = self
            .db
            .homepage
            .list(&HomepageContentQuery {
                section: Some("about".to_string()),
                is_active: Some(true),
                limit: Some(1),
                offset: None,
            })
            .await?
            .data
            .into_iter()
            .next();

        let members = self
            .db
            .team_members
            .list(&TeamMemberQuery { is_active: Some(true), limit: Some(MAX_PAGE_SIZE), ..Default::default() })
            .await?
            .data;

        let mut members_by_category: BTreeMap<String, Vec<_>> = BTreeMap::new();
        for member in members {
            members_by_category.entry(member.category.clone()).or_default().push(member);
        }

        let page = AboutPage { about, members_by_category };
        if self.use_cache {
            self.cache.store(&key, &page).await;
        }
        Ok(page)
    }

    /// Dashboard statistics
    pub async fn analytics(&self, now: DateTime<Utc>) -> Result<Analytics> {
        let started = Instant::now();
        let result = self.db.analytics.collect(now).await;
        log_database_operation("collect", "analytics", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    /// Drop cached public pages after an admin write
    pub async fn invalidate(&self) {
        if self.use_cache {
            self.cache.invalidate_public().await;
        }
    }

    /// Fill empty content tables with starter data; tables that already hold
    /// rows are left untouched
    pub async fn seed(&self) -> Result<SeedReport> {
        let counts = self.db.analytics.seeded_table_counts().await?;
        let mut report = SeedReport::default();

        if counts.hero_images == 0 {
            for request in default_hero_images() {
                self.db.hero_images.create(request).await?;
                report.hero_images += 1;
            }
        }

        if counts.team_members == 0 {
            report.team_members = self.db.team_members.bulk_create(default_team_members()).await?.len();
        }

        if counts.homepage_content == 0 {
            for request in default_homepage_content() {
                self.db.homepage.create(request).await?;
                report.homepage_content += 1;
            }
        }

        if counts.site_settings == 0 {
            for request in default_site_settings() {
                self.db.settings.upsert(request).await?;
                report.site_settings += 1;
            }
        }

        if report.total() > 0 {
            self.invalidate().await;
        }

        info!(
            hero_images = report.hero_images,
            team_members = report.team_members,
            homepage_content = report.homepage_content,
            site_settings = report.site_settings,
            "Seed data applied"
        );
        Ok(report)
    }
}

fn default_hero_images() -> Vec<CreateHeroImageRequest> {
    vec![
        CreateHeroImageRequest {
            title: "Welcome to NAPPS Nasarawa State".to_string(),
            description: Some("National Association of Proprietors of Private Schools".to_string()),
            image_url: "/images/hero/welcome.jpg".to_string(),
            button_text: Some("Register your school".to_string()),
            button_link: Some("/register".to_string()),
            display_order: Some(1),
            is_active: Some(true),
        },
        CreateHeroImageRequest {
            title: "Quality private education across Nasarawa".to_string(),
            description: Some("Supporting proprietors in every chapter of the state".to_string()),
            image_url: "/images/hero/schools.jpg".to_string(),
            button_text: Some("About us".to_string()),
            button_link: Some("/about".to_string()),
            display_order: Some(2),
            is_active: Some(true),
        },
    ]
}

fn default_team_members() -> Vec<CreateTeamMemberRequest> {
    vec![
        CreateTeamMemberRequest {
            name: "Elder Ogah Omaku Ogiri".to_string(),
            position: "NAPPS Nasarawa State Chairman".to_string(),
            category: Some("executive".to_string()),
            display_order: Some(1),
            is_active: Some(true),
            is_featured: Some(true),
            ..Default::default()
        },
        CreateTeamMemberRequest {
            name: "State Secretary".to_string(),
            position: "Secretary".to_string(),
            category: Some("executive".to_string()),
            display_order: Some(2),
            is_active: Some(true),
            is_featured: Some(false),
            ..Default::default()
        },
    ]
}

fn default_homepage_content() -> Vec<CreateHomepageContentRequest> {
    vec![
        CreateHomepageContentRequest {
            section: "about".to_string(),
            title: "Welcome to NAPPS Nasarawa Chapter".to_string(),
            subtitle: Some("National Association of Proprietors of Private Schools".to_string()),
            content: "We bring together proprietors of private schools across Nasarawa State to raise standards and speak with one voice.".to_string(),
            display_order: Some(1),
            is_active: Some(true),
            ..Default::default()
        },
        CreateHomepageContentRequest {
            section: "elder-omaku".to_string(),
            title: "A word from the Chairman".to_string(),
            content: "Our association exists to serve every proprietor and every child in our schools.".to_string(),
            display_order: Some(2),
            is_active: Some(true),
            metadata: Some(json!({ "signature": "Elder Ogah Omaku Ogiri" })),
            ..Default::default()
        },
    ]
}

fn default_site_settings() -> Vec<UpsertSiteSettingRequest> {
    let setting = |key: &str, value: &str| UpsertSiteSettingRequest {
        setting_key: key.to_string(),
        setting_value: Some(value.to_string()),
        setting_type: None,
        description: None,
        is_public: Some(true),
    };

    vec![
        setting("site_name", "NAPPS Nasarawa"),
        setting("site_title", "NAPPS Nasarawa State"),
        setting(
            "site_description",
            "National Association of Proprietors of Private Schools - Nasarawa State Chapter",
        ),
        setting("primary_color", "#2563eb"),
        setting("secondary_color", "#64748b"),
        setting("logo_url", "/logo.png"),
        setting("contact_email", "info@nappsnasarawa.com"),
        setting("contact_address", "Lafia, Nasarawa State, Nigeria"),
        setting("hero_title", "Welcome to NAPPS Nasarawa State"),
        setting("hero_subtitle", "National Association of Proprietors of Private Schools"),
        setting("seo_keywords", "NAPPS, Nasarawa, private schools, education, Nigeria"),
    ]
}
