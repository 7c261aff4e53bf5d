//! Truthy-overwrite merge rules for document updates.
//!
//! An incoming value replaces the stored one only when it is truthy: empty
//! strings, `0` and `false` count as absent. Callers rely on this to send whole
//! forms with blank fields, so a checkbox or counter can never be reset through
//! an update.

use chrono::{DateTime, Utc};

use crate::documents::ids::IdSequence;
use crate::documents::payload::{
    DocumentPatch, EducationPatch, ExperiencePatch, PersonalInfoPatch, SkillPatch,
};
use crate::models::document::{Document, DocumentStatus};
use crate::models::sections::{Education, Experience, PersonalInfo, SectionRecord, Skill};

pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for i32 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for i64 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for DocumentStatus {
    fn is_truthy(&self) -> bool {
        true
    }
}

/// Overwrites `slot` when `incoming` is truthy.
pub fn merge_field<T: Truthy>(slot: &mut T, incoming: Option<T>) {
    if let Some(value) = incoming.filter(Truthy::is_truthy) {
        *slot = value;
    }
}

pub fn merge_optional<T: Truthy>(slot: &mut Option<T>, incoming: Option<T>) {
    if let Some(value) = incoming.filter(Truthy::is_truthy) {
        *slot = Some(value);
    }
}

/// Applies the scalar part of a patch and stamps `updated_at`.
/// `updated_at` never moves backwards even if the clock does.
pub fn apply_document_patch(doc: &mut Document, patch: &DocumentPatch, now: DateTime<Utc>) {
    merge_field(&mut doc.title, patch.title.clone());
    merge_optional(&mut doc.summary, patch.summary.clone());
    merge_optional(&mut doc.thumbnail, patch.thumbnail.clone());
    merge_field(&mut doc.theme_color, patch.theme_color.clone());
    merge_field(&mut doc.status, patch.status);
    merge_field(&mut doc.current_position, patch.current_position);
    touch(doc, now);
}

pub fn touch(doc: &mut Document, now: DateTime<Utc>) {
    doc.updated_at = doc.updated_at.max(now);
}

/// A partial section record as sent by the client.
pub trait SectionPatch {
    type Record: SectionRecord;

    /// The record this patch targets, if any. `0` counts as no id.
    fn target_id(&self) -> Option<i64>;

    fn apply(self, record: &mut Self::Record);
}

impl SectionPatch for PersonalInfoPatch {
    type Record = PersonalInfo;

    fn target_id(&self) -> Option<i64> {
        None
    }

    fn apply(self, record: &mut PersonalInfo) {
        merge_optional(&mut record.first_name, self.first_name);
        merge_optional(&mut record.last_name, self.last_name);
        merge_optional(&mut record.job_title, self.job_title);
        merge_optional(&mut record.address, self.address);
        merge_optional(&mut record.phone, self.phone);
        merge_optional(&mut record.email, self.email);
    }
}

impl SectionPatch for ExperiencePatch {
    type Record = Experience;

    fn target_id(&self) -> Option<i64> {
        self.id.filter(Truthy::is_truthy)
    }

    fn apply(self, record: &mut Experience) {
        merge_optional(&mut record.title, self.title);
        merge_optional(&mut record.company_name, self.company_name);
        merge_optional(&mut record.city, self.city);
        merge_optional(&mut record.state, self.state);
        merge_field(&mut record.currently_working, self.currently_working);
        merge_optional(&mut record.work_summary, self.work_summary);
        merge_optional(&mut record.start_date, self.start_date);
        merge_optional(&mut record.end_date, self.end_date);
    }
}

impl SectionPatch for EducationPatch {
    type Record = Education;

    fn target_id(&self) -> Option<i64> {
        self.id.filter(Truthy::is_truthy)
    }

    fn apply(self, record: &mut Education) {
        merge_optional(&mut record.university_name, self.university_name);
        merge_optional(&mut record.degree, self.degree);
        merge_optional(&mut record.major, self.major);
        merge_optional(&mut record.description, self.description);
        merge_optional(&mut record.start_date, self.start_date);
        merge_optional(&mut record.end_date, self.end_date);
    }
}

impl SectionPatch for SkillPatch {
    type Record = Skill;

    fn target_id(&self) -> Option<i64> {
        self.id.filter(Truthy::is_truthy)
    }

    fn apply(self, record: &mut Skill) {
        merge_optional(&mut record.name, self.name);
        merge_field(&mut record.rating, self.rating);
    }
}

/// Shallow-merges into the document's existing record, or creates one.
pub fn upsert_personal_info(
    existing: Option<&PersonalInfo>,
    doc_id: i64,
    patch: PersonalInfoPatch,
    ids: &IdSequence,
) -> PersonalInfo {
    let mut record = match existing {
        Some(current) => current.clone(),
        None => PersonalInfo::blank(ids.next_id(), doc_id),
    };
    patch.apply(&mut record);
    record
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionMerge<R> {
    /// Records to write back, in the order the patches touched them.
    pub upserts: Vec<R>,
    /// Ids that named no record of this document.
    pub dropped: Vec<i64>,
}

/// Resolves a list of section patches against the document's current records.
///
/// A patch with an id merges into the record with that id and `doc_id`; when
/// there is none the patch is dropped without error. A patch without an id
/// becomes a new record.
pub fn merge_section<P: SectionPatch>(
    existing: &[P::Record],
    doc_id: i64,
    patches: Vec<P>,
    ids: &IdSequence,
) -> SectionMerge<P::Record> {
    let mut upserts: Vec<P::Record> = Vec::new();
    let mut dropped = Vec::new();

    for patch in patches {
        match patch.target_id() {
            Some(id) => {
                if let Some(pos) = upserts.iter().position(|r| r.id() == id) {
                    patch.apply(&mut upserts[pos]);
                } else if let Some(current) = existing
                    .iter()
                    .find(|r| r.id() == id && r.doc_id() == doc_id)
                {
                    let mut record = current.clone();
                    patch.apply(&mut record);
                    upserts.push(record);
                } else {
                    dropped.push(id);
                }
            }
            None => {
                let mut record = P::Record::blank(ids.next_id(), doc_id);
                patch.apply(&mut record);
                upserts.push(record);
            }
        }
    }

    SectionMerge { upserts, dropped }
}
