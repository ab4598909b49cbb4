//! Data models for ConnectHub
//!
//! This module contains all the data structures used throughout the application.

pub mod analytics;
pub mod announcement;
pub mod chapters;
pub mod contact;
pub mod hero_image;
pub mod homepage;
pub mod pages;
pub mod pagination;
pub mod proprietor;
pub mod site_setting;
pub mod team_member;

pub use analytics::*;
pub use announcement::*;
pub use chapters::{ChapterCount, CHAPTERS};
pub use contact::*;
pub use hero_image::*;
pub use homepage::*;
pub use pages::*;
pub use pagination::*;
pub use proprietor::*;
pub use site_setting::*;
pub use team_member::*;
