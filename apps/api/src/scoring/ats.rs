//! ATS compatibility heuristic.
//!
//! Six weighted sub-scores whose maxima add up to exactly 100, so the total
//! never needs clamping:
//!
//! | component      | max |
//! |----------------|-----|
//! | personal       | 20  |
//! | experience     | 25  |
//! | education      | 15  |
//! | skills         | 20  |
//! | summary        | 10  |
//! | certifications | 10  |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::cv::{CvDocument, Experience, PersonalInfo};
use crate::scoring::completion::summary_is_substantial;

pub const PERSONAL_MAX: u32 = 20;
pub const EXPERIENCE_BASE: u32 = 15;
pub const EXPERIENCE_DETAIL_BONUS: u32 = 10;
pub const EDUCATION_POINTS: u32 = 15;
pub const SKILLS_BASE: u32 = 10;
pub const SKILLS_BREADTH_BONUS: u32 = 5;
pub const SKILLS_CATEGORY_BONUS: u32 = 5;
pub const SUMMARY_POINTS: u32 = 10;
pub const CERTIFICATION_POINTS_EACH: u32 = 3;
pub const CERTIFICATIONS_MAX: u32 = 10;

/// A description bullet longer than this reads as keyword-rich.
pub const DETAILED_BULLET_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtsBreakdown {
    pub personal: u32,
    pub experience: u32,
    pub education: u32,
    pub skills: u32,
    pub summary: u32,
    pub certifications: u32,
    pub total: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AtsRating {
    Excellent,
    Good,
    NeedsWork,
}

impl AtsRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => AtsRating::Excellent,
            s if s >= 60 => AtsRating::Good,
            _ => AtsRating::NeedsWork,
        }
    }
}

fn personal_score(info: &PersonalInfo) -> u32 {
    let fields = [
        &info.full_name,
        &info.email,
        &info.phone,
        &info.title,
        &info.location,
    ];
    let filled = fields.iter().filter(|f| !f.is_empty()).count() as u32;
    filled * PERSONAL_MAX / fields.len() as u32
}

fn has_detailed_bullet(exp: &Experience) -> bool {
    exp.description
        .iter()
        .any(|bullet| bullet.chars().count() > DETAILED_BULLET_CHARS)
}

fn experience_score(experience: &[Experience]) -> u32 {
    if experience.is_empty() {
        return 0;
    }
    if experience.iter().any(has_detailed_bullet) {
        EXPERIENCE_BASE + EXPERIENCE_DETAIL_BONUS
    } else {
        EXPERIENCE_BASE
    }
}

fn skills_score(doc: &CvDocument) -> u32 {
    let count = doc.skills.len();
    let mut score = 0;
    if count >= 3 {
        score += SKILLS_BASE;
    }
    if count >= 6 {
        score += SKILLS_BREADTH_BONUS;
    }
    let categories: HashSet<_> = doc.skills.iter().map(|s| s.category).collect();
    if categories.len() >= 2 {
        score += SKILLS_CATEGORY_BONUS;
    }
    score
}

fn certifications_score(count: usize) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count
        .saturating_mul(CERTIFICATION_POINTS_EACH)
        .min(CERTIFICATIONS_MAX)
}

pub fn compute_ats_breakdown(doc: &CvDocument) -> AtsBreakdown {
    let personal = personal_score(&doc.personal_info);
    let experience = experience_score(&doc.experience);
    let education = if doc.education.is_empty() {
        0
    } else {
        EDUCATION_POINTS
    };
    let skills = skills_score(doc);
    let summary = if summary_is_substantial(&doc.personal_info.summary) {
        SUMMARY_POINTS
    } else {
        0
    };
    let certifications = certifications_score(doc.certifications.len());

    let total = personal + experience + education + skills + summary + certifications;

    AtsBreakdown {
        personal,
        experience,
        education,
        skills,
        summary,
        certifications,
        total: total as u8,
    }
}

/// ATS compatibility score in `0..=100`.
pub fn compute_ats_score(doc: &CvDocument) -> u8 {
    compute_ats_breakdown(doc).total
}
