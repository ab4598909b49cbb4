//! Association chapters
//!
//! Proprietors belong to one or more of these local chapters.

use serde::{Deserialize, Serialize};

pub const CHAPTERS: [&str; 18] = [
    "Asakioo",
    "Karu 1",
    "Doma",
    "Karu 2",
    "Mararaba Udege",
    "Masaka Ado",
    "Panda",
    "Akwanga",
    "Lafia A",
    "Shabu",
    "Lafia B",
    "Keffi",
    "Kokona",
    "Mararaba Guruku",
    "Jenkwe",
    "Uke Chapter",
    "Nasarawa Eggon",
    "Nas Poly",
];

/// Filter value that selects proprietors without any chapter
pub const UNASSIGNED: &str = "unassigned";

pub fn is_valid_chapter(name: &str) -> bool {
    CHAPTERS.contains(&name)
}

/// Ordered set union of two chapter lists
pub fn merge_chapters(existing: &[String], added: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for chapter in added {
        if !merged.contains(chapter) {
            merged.push(chapter.clone());
        }
    }
    merged
}

/// Proprietor count for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChapterCount {
    pub chapter: String,
    pub count: i64,
}
