use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::cv::{Certification, Education, Experience, Identified, Language, Project, Skill};
use crate::models::patch::Merge;
use crate::store::CvStore;

/// Routes a generic collection operation to the store's named method for
/// that entity, so adapters can be written once for all six collections.
pub trait Collection:
    Identified + Merge + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Plural path segment, e.g. `skills`.
    const NAME: &'static str;

    fn add(store: &mut CvStore, entry: Self);
    fn update(store: &mut CvStore, id: &str, patch: Self::Patch);
    fn remove(store: &mut CvStore, id: &str);
}

macro_rules! collection {
    ($ty:ty, $name:literal, $add:ident, $update:ident, $remove:ident) => {
        impl Collection for $ty {
            const NAME: &'static str = $name;

            fn add(store: &mut CvStore, entry: Self) {
                store.$add(entry);
            }

            fn update(store: &mut CvStore, id: &str, patch: Self::Patch) {
                store.$update(id, patch);
            }

            fn remove(store: &mut CvStore, id: &str) {
                store.$remove(id);
            }
        }
    };
}

collection!(Experience, "experience", add_experience, update_experience, remove_experience);
collection!(Education, "education", add_education, update_education, remove_education);
collection!(Skill, "skills", add_skill, update_skill, remove_skill);
collection!(Language, "languages", add_language, update_language, remove_language);
collection!(
    Certification,
    "certifications",
    add_certification,
    update_certification,
    remove_certification
);
collection!(Project, "projects", add_project, update_project, remove_project);
