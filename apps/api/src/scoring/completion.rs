use serde::{Deserialize, Serialize};

use crate::models::cv::{CvDocument, Section};

/// Minimum summary length, in characters, for it to count as written.
pub const SUMMARY_MIN_CHARS: usize = 100;
pub const MIN_SKILLS: usize = 3;
pub const MIN_LANGUAGES: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    PersonalDetails,
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
    Template,
}

const CHECKPOINTS: [Checkpoint; 8] = [
    Checkpoint::PersonalDetails,
    Checkpoint::Summary,
    Checkpoint::Experience,
    Checkpoint::Education,
    Checkpoint::Skills,
    Checkpoint::Languages,
    Checkpoint::Certifications,
    Checkpoint::Template,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointStatus {
    pub checkpoint: Checkpoint,
    pub met: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionProgress {
    pub section: Section,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionReport {
    pub percentage: u8,
    pub checkpoints_met: usize,
    pub checkpoints: Vec<CheckpointStatus>,
    pub sections: Vec<SectionProgress>,
}

/// True when the summary is non-empty and at least `SUMMARY_MIN_CHARS` long.
pub fn summary_is_substantial(summary: &str) -> bool {
    !summary.is_empty() && summary.chars().count() >= SUMMARY_MIN_CHARS
}

fn has_personal_details(doc: &CvDocument) -> bool {
    let p = &doc.personal_info;
    !p.full_name.is_empty() && !p.email.is_empty() && !p.phone.is_empty() && !p.title.is_empty()
}

pub fn checkpoint_met(doc: &CvDocument, checkpoint: Checkpoint) -> bool {
    match checkpoint {
        Checkpoint::PersonalDetails => has_personal_details(doc),
        Checkpoint::Summary => summary_is_substantial(&doc.personal_info.summary),
        Checkpoint::Experience => !doc.experience.is_empty(),
        Checkpoint::Education => !doc.education.is_empty(),
        Checkpoint::Skills => doc.skills.len() >= MIN_SKILLS,
        Checkpoint::Languages => doc.languages.len() >= MIN_LANGUAGES,
        Checkpoint::Certifications => !doc.certifications.is_empty(),
        Checkpoint::Template => !doc.current_template.is_empty(),
    }
}

/// Whether an editor section counts as done in the sidebar.
pub fn section_completed(doc: &CvDocument, section: Section) -> bool {
    match section {
        Section::Personal => checkpoint_met(doc, Checkpoint::PersonalDetails),
        Section::Summary => checkpoint_met(doc, Checkpoint::Summary),
        Section::Experience => checkpoint_met(doc, Checkpoint::Experience),
        Section::Education => checkpoint_met(doc, Checkpoint::Education),
        Section::Skills => checkpoint_met(doc, Checkpoint::Skills),
        Section::Languages => checkpoint_met(doc, Checkpoint::Languages),
        Section::Certifications => checkpoint_met(doc, Checkpoint::Certifications),
        Section::Projects => !doc.projects.is_empty(),
    }
}

fn percentage(met: usize) -> u8 {
    ((met as f64 / CHECKPOINTS.len() as f64) * 100.0).round() as u8
}

/// Share of the eight checkpoints met, rounded to the nearest whole percent.
pub fn compute_completion(doc: &CvDocument) -> u8 {
    let met = CHECKPOINTS
        .iter()
        .filter(|c| checkpoint_met(doc, **c))
        .count();
    percentage(met)
}

pub fn compute_completion_report(doc: &CvDocument) -> CompletionReport {
    let checkpoints: Vec<CheckpointStatus> = CHECKPOINTS
        .iter()
        .map(|&checkpoint| CheckpointStatus {
            checkpoint,
            met: checkpoint_met(doc, checkpoint),
        })
        .collect();
    let checkpoints_met = checkpoints.iter().filter(|c| c.met).count();

    let sections = Section::ALL
        .iter()
        .map(|&section| SectionProgress {
            section,
            completed: section_completed(doc, section),
        })
        .collect();

    CompletionReport {
        percentage: percentage(checkpoints_met),
        checkpoints_met,
        checkpoints,
        sections,
    }
}
