//! Typed client for the ConnectHub API
//!
//! Used by front ends and integration tests to drive the public site, the
//! registration wizard and the admin panel.

pub mod announcements;
pub mod http;
pub mod notify;
pub mod registration;
pub mod resource;

pub use announcements::AnnouncementFeed;
pub use http::{path_segment, ApiClient};
pub use notify::{Notification, NotificationKind, Notifier};
pub use registration::{RegistrationWizard, WizardStep};
pub use resource::{Announcements, HeroImages, HomepageSections, ResourceEndpoint, ResourceStore, TeamMembers};
