//! The CV state container.
//!
//! One `CvStore` owns all CV content plus the interface state around it and
//! the two derived metrics. It is created once at startup and handed to the
//! presentation layer; all writes go through the methods below.
//!
//! Which mutations refresh which metric:
//!
//! | operation                         | completion | ATS |
//! |-----------------------------------|------------|-----|
//! | `update_personal_info`            | yes        | yes |
//! | `add_experience`, `add_education` | yes        | yes |
//! | other `add_*` (not projects)      | yes        | no  |
//! | `remove_*` (not projects)         | yes        | no  |
//! | `update_*` (not personal info)    | no         | no  |
//! | project operations, UI setters    | no         | no  |
//!
//! Metrics therefore go stale after the operations marked "no" until the
//! next `calculate_*` call.

pub mod collection;
pub mod direction;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::cv::{
    seed_languages, Certification, CvDocument, Education, Experience, Identified, Language,
    PersonalInfo, Project, Skill, UiLanguage,
};
use crate::models::patch::{
    CertificationPatch, EducationPatch, ExperiencePatch, LanguagePatch, Merge, PersonalInfoPatch,
    ProjectPatch, SkillPatch,
};
use crate::persistence::CvSnapshotState;
use crate::scoring::{compute_ats_score, compute_completion};

pub use collection::Collection;
pub use direction::{DirectionListener, LogDirectionListener, TextDirection};

/// Values a fresh store starts with when the application boots.
#[derive(Debug, Clone)]
pub struct StoreDefaults {
    pub template: String,
    pub phone: String,
}

#[derive(Clone)]
pub struct CvStore {
    document: CvDocument,
    language: UiLanguage,
    current_section: String,
    completion_percentage: u8,
    ats_score: u8,
    direction_listener: Arc<dyn DirectionListener>,
}

impl Default for CvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CvStore {
    /// An empty CV: no template, blank personal info, and the two seed
    /// languages. Metrics start at zero until first computed.
    pub fn new() -> Self {
        Self {
            document: CvDocument {
                languages: seed_languages(),
                ..Default::default()
            },
            language: UiLanguage::default(),
            current_section: "personal".to_string(),
            completion_percentage: 0,
            ats_score: 0,
            direction_listener: Arc::new(LogDirectionListener),
        }
    }

    pub fn with_defaults(defaults: &StoreDefaults) -> Self {
        let mut store = Self::new();
        store.document.current_template = defaults.template.clone();
        store.document.personal_info.phone = defaults.phone.clone();
        store
    }

    pub fn with_direction_listener(mut self, listener: Arc<dyn DirectionListener>) -> Self {
        self.direction_listener = listener;
        self
    }

    // ── read API ────────────────────────────────────────────────────────────

    pub fn document(&self) -> &CvDocument {
        &self.document
    }

    pub fn personal_info(&self) -> &PersonalInfo {
        &self.document.personal_info
    }

    pub fn experience(&self) -> &[Experience] {
        &self.document.experience
    }

    pub fn education(&self) -> &[Education] {
        &self.document.education
    }

    pub fn skills(&self) -> &[Skill] {
        &self.document.skills
    }

    pub fn languages(&self) -> &[Language] {
        &self.document.languages
    }

    pub fn certifications(&self) -> &[Certification] {
        &self.document.certifications
    }

    pub fn projects(&self) -> &[Project] {
        &self.document.projects
    }

    pub fn current_template(&self) -> &str {
        &self.document.current_template
    }

    pub fn language(&self) -> UiLanguage {
        self.language
    }

    pub fn direction(&self) -> TextDirection {
        self.language.into()
    }

    pub fn current_section(&self) -> &str {
        &self.current_section
    }

    pub fn completion_percentage(&self) -> u8 {
        self.completion_percentage
    }

    pub fn ats_score(&self) -> u8 {
        self.ats_score
    }

    // ── personal info ───────────────────────────────────────────────────────

    pub fn update_personal_info(&mut self, patch: PersonalInfoPatch) {
        self.document.personal_info.merge(patch);
        self.calculate_completion();
        self.calculate_ats_score();
    }

    // ── experience ──────────────────────────────────────────────────────────

    pub fn add_experience(&mut self, experience: Experience) {
        append(&mut self.document.experience, experience, "experience");
        self.calculate_completion();
        self.calculate_ats_score();
    }

    pub fn update_experience(&mut self, id: &str, patch: ExperiencePatch) {
        merge_by_id(&mut self.document.experience, id, patch, "experience");
    }

    pub fn remove_experience(&mut self, id: &str) {
        remove_by_id(&mut self.document.experience, id, "experience");
        self.calculate_completion();
    }

    // ── education ───────────────────────────────────────────────────────────

    pub fn add_education(&mut self, education: Education) {
        append(&mut self.document.education, education, "education");
        self.calculate_completion();
        self.calculate_ats_score();
    }

    pub fn update_education(&mut self, id: &str, patch: EducationPatch) {
        merge_by_id(&mut self.document.education, id, patch, "education");
    }

    pub fn remove_education(&mut self, id: &str) {
        remove_by_id(&mut self.document.education, id, "education");
        self.calculate_completion();
    }

    // ── skills ──────────────────────────────────────────────────────────────

    pub fn add_skill(&mut self, skill: Skill) {
        append(&mut self.document.skills, skill, "skill");
        self.calculate_completion();
    }

    pub fn update_skill(&mut self, id: &str, patch: SkillPatch) {
        merge_by_id(&mut self.document.skills, id, patch, "skill");
    }

    pub fn remove_skill(&mut self, id: &str) {
        remove_by_id(&mut self.document.skills, id, "skill");
        self.calculate_completion();
    }

    // ── languages ───────────────────────────────────────────────────────────

    pub fn add_language(&mut self, language: Language) {
        append(&mut self.document.languages, language, "language");
        self.calculate_completion();
    }

    pub fn update_language(&mut self, id: &str, patch: LanguagePatch) {
        merge_by_id(&mut self.document.languages, id, patch, "language");
    }

    pub fn remove_language(&mut self, id: &str) {
        remove_by_id(&mut self.document.languages, id, "language");
        self.calculate_completion();
    }

    // ── certifications ──────────────────────────────────────────────────────

    pub fn add_certification(&mut self, certification: Certification) {
        append(
            &mut self.document.certifications,
            certification,
            "certification",
        );
        self.calculate_completion();
    }

    pub fn update_certification(&mut self, id: &str, patch: CertificationPatch) {
        merge_by_id(&mut self.document.certifications, id, patch, "certification");
    }

    pub fn remove_certification(&mut self, id: &str) {
        remove_by_id(&mut self.document.certifications, id, "certification");
        self.calculate_completion();
    }

    // ── projects (not scored) ───────────────────────────────────────────────

    pub fn add_project(&mut self, project: Project) {
        append(&mut self.document.projects, project, "project");
    }

    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) {
        merge_by_id(&mut self.document.projects, id, patch, "project");
    }

    pub fn remove_project(&mut self, id: &str) {
        remove_by_id(&mut self.document.projects, id, "project");
    }

    // ── interface state ─────────────────────────────────────────────────────

    pub fn set_current_template(&mut self, template: impl Into<String>) {
        self.document.current_template = template.into();
    }

    pub fn set_language(&mut self, language: UiLanguage) {
        self.language = language;
        self.direction_listener
            .direction_changed(language, language.into());
    }

    pub fn set_current_section(&mut self, section: impl Into<String>) {
        self.current_section = section.into();
    }

    // ── derived metrics ─────────────────────────────────────────────────────

    pub fn calculate_completion(&mut self) -> u8 {
        self.completion_percentage = compute_completion(&self.document);
        debug!(
            completion = self.completion_percentage,
            "Recalculated completion"
        );
        self.completion_percentage
    }

    pub fn calculate_ats_score(&mut self) -> u8 {
        self.ats_score = compute_ats_score(&self.document);
        debug!(ats_score = self.ats_score, "Recalculated ATS score");
        self.ats_score
    }

    /// Refreshes both metrics.
    pub fn recalculate(&mut self) {
        self.calculate_completion();
        self.calculate_ats_score();
    }

    // ── snapshot / restore ──────────────────────────────────────────────────

    pub fn snapshot_state(&self) -> CvSnapshotState {
        CvSnapshotState {
            personal_info: self.document.personal_info.clone(),
            experience: self.document.experience.clone(),
            education: self.document.education.clone(),
            skills: self.document.skills.clone(),
            languages: self.document.languages.clone(),
            certifications: self.document.certifications.clone(),
            projects: self.document.projects.clone(),
            current_template: self.document.current_template.clone(),
            language: self.language,
            current_section: self.current_section.clone(),
            completion_percentage: self.completion_percentage,
            ats_score: self.ats_score,
        }
    }

    /// Replaces all state with a restored snapshot. The persisted metrics are
    /// taken as-is; call `recalculate` to refresh them. The direction
    /// listener is kept.
    pub fn restore(&mut self, state: CvSnapshotState) {
        self.document = CvDocument {
            personal_info: state.personal_info,
            experience: state.experience,
            education: state.education,
            skills: state.skills,
            languages: state.languages,
            certifications: state.certifications,
            projects: state.projects,
            current_template: state.current_template,
        };
        self.language = state.language;
        self.current_section = state.current_section;
        self.completion_percentage = state.completion_percentage.min(100);
        self.ats_score = state.ats_score.min(100);
    }
}

/// Appends even when the id is already present; callers own id uniqueness.
fn append<T: Identified>(items: &mut Vec<T>, item: T, kind: &str) {
    if items.iter().any(|existing| existing.id() == item.id()) {
        warn!("Adding {kind} with duplicate id {}", item.id());
    }
    items.push(item);
}

/// Applies the patch to every element carrying `id`.
fn merge_by_id<T: Identified + Merge>(items: &mut [T], id: &str, patch: T::Patch, kind: &str) {
    let mut matched = false;
    for item in items.iter_mut().filter(|item| item.id() == id) {
        item.merge(patch.clone());
        matched = true;
    }
    if !matched {
        warn!("Ignoring update of unknown {kind} {id}");
    }
}

fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str, kind: &str) {
    let before = items.len();
    items.retain(|item| item.id() != id);
    if items.len() == before {
        warn!("Ignoring removal of unknown {kind} {id}");
    }
}
