//! Partial updates. Every patch field is optional; an absent field leaves the
//! record untouched. Fields that are themselves optional on the record take
//! `Option<Option<T>>`: absent keeps the value, `null` clears it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::models::cv::{
    Certification, Education, Experience, GpaScale, Language, PersonalInfo, Proficiency, Project,
    Skill, SkillCategory, SkillLevel,
};

/// Merges a patch into a record in place.
pub trait Merge {
    type Patch: DeserializeOwned + Clone + Send + 'static;

    fn merge(&mut self, patch: Self::Patch);
}

/// Distinguishes a present `null` from an absent key.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub full_name_ar: Option<Option<String>>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub summary_ar: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub profile_photo: Option<Option<String>>,
    pub nationality: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub linked_in: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub portfolio: Option<Option<String>>,
}

impl Merge for PersonalInfo {
    type Patch = PersonalInfoPatch;

    fn merge(&mut self, patch: PersonalInfoPatch) {
        set(&mut self.full_name, patch.full_name);
        set(&mut self.full_name_ar, patch.full_name_ar);
        set(&mut self.email, patch.email);
        set(&mut self.phone, patch.phone);
        set(&mut self.location, patch.location);
        set(&mut self.title, patch.title);
        set(&mut self.summary, patch.summary);
        set(&mut self.summary_ar, patch.summary_ar);
        set(&mut self.profile_photo, patch.profile_photo);
        set(&mut self.nationality, patch.nationality);
        set(&mut self.linked_in, patch.linked_in);
        set(&mut self.portfolio, patch.portfolio);
    }
}

/// The id is not patchable; a patch carrying one is ignored for that key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub description: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
}

impl Merge for Experience {
    type Patch = ExperiencePatch;

    fn merge(&mut self, patch: ExperiencePatch) {
        set(&mut self.company, patch.company);
        set(&mut self.position, patch.position);
        set(&mut self.location, patch.location);
        set(&mut self.start_date, patch.start_date);
        set(&mut self.end_date, patch.end_date);
        set(&mut self.current, patch.current);
        set(&mut self.description, patch.description);
        set(&mut self.achievements, patch.achievements);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationPatch {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub gpa: Option<Option<String>>,
    pub gpa_scale: Option<GpaScale>,
    pub graduation_date: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub relevant_coursework: Option<Option<Vec<String>>>,
}

impl Merge for Education {
    type Patch = EducationPatch;

    fn merge(&mut self, patch: EducationPatch) {
        set(&mut self.institution, patch.institution);
        set(&mut self.degree, patch.degree);
        set(&mut self.field_of_study, patch.field_of_study);
        set(&mut self.gpa, patch.gpa);
        set(&mut self.gpa_scale, patch.gpa_scale);
        set(&mut self.graduation_date, patch.graduation_date);
        set(&mut self.location, patch.location);
        set(&mut self.relevant_coursework, patch.relevant_coursework);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub category: Option<SkillCategory>,
    pub level: Option<SkillLevel>,
}

impl Merge for Skill {
    type Patch = SkillPatch;

    fn merge(&mut self, patch: SkillPatch) {
        set(&mut self.name, patch.name);
        set(&mut self.category, patch.category);
        set(&mut self.level, patch.level);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LanguagePatch {
    pub name: Option<String>,
    pub proficiency: Option<Proficiency>,
    #[serde(deserialize_with = "nullable")]
    pub certification: Option<Option<String>>,
}

impl Merge for Language {
    type Patch = LanguagePatch;

    fn merge(&mut self, patch: LanguagePatch) {
        set(&mut self.name, patch.name);
        set(&mut self.proficiency, patch.proficiency);
        set(&mut self.certification, patch.certification);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificationPatch {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date_obtained: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub expiry_date: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub credential_id: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub url: Option<Option<String>>,
}

impl Merge for Certification {
    type Patch = CertificationPatch;

    fn merge(&mut self, patch: CertificationPatch) {
        set(&mut self.name, patch.name);
        set(&mut self.issuer, patch.issuer);
        set(&mut self.date_obtained, patch.date_obtained);
        set(&mut self.expiry_date, patch.expiry_date);
        set(&mut self.credential_id, patch.credential_id);
        set(&mut self.url, patch.url);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    #[serde(deserialize_with = "nullable")]
    pub url: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub repository: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub team_size: Option<Option<String>>,
    pub achievements: Option<Vec<String>>,
}

impl Merge for Project {
    type Patch = ProjectPatch;

    fn merge(&mut self, patch: ProjectPatch) {
        set(&mut self.title, patch.title);
        set(&mut self.description, patch.description);
        set(&mut self.technologies, patch.technologies);
        set(&mut self.role, patch.role);
        set(&mut self.start_date, patch.start_date);
        set(&mut self.end_date, patch.end_date);
        set(&mut self.current, patch.current);
        set(&mut self.url, patch.url);
        set(&mut self.repository, patch.repository);
        set(&mut self.team_size, patch.team_size);
        set(&mut self.achievements, patch.achievements);
    }
}
