//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod analytics;
pub mod announcement;
pub mod contact;
pub mod hero_image;
pub mod homepage;
pub mod proprietor;
pub mod site_setting;
pub mod team_member;

// Re-export repositories
pub use analytics::{AnalyticsRepository, SeededCounts};
pub use announcement::AnnouncementRepository;
pub use contact::ContactRepository;
pub use hero_image::HeroImageRepository;
pub use homepage::HomepageContentRepository;
pub use proprietor::ProprietorRepository;
pub use site_setting::SiteSettingRepository;
pub use team_member::TeamMemberRepository;
