//! Curriculum tree: modules → topics → subtopics.
//!
//! The tree is validated once on construction and is immutable afterwards.
//! Documents are read through [`RawCurriculum`], where the nested
//! collections may be absent, and converted with `TryFrom`.

mod raw;

pub use raw::{RawCurriculum, RawModule, RawTopic};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{InvalidTreeError, Result};

/// Atomic unit of progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub has_learn: bool,
    #[serde(default)]
    pub has_quiz: bool,
    #[serde(default)]
    pub has_code_challenge: bool,
    /// Study time estimate; pacing falls back to its configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

impl Subtopic {
    /// Create a subtopic with a learn page and nothing else
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            has_learn: true,
            has_quiz: false,
            has_code_challenge: false,
            estimated_minutes: None,
        }
    }

    pub fn with_quiz(mut self) -> Self {
        self.has_quiz = true;
        self
    }

    pub fn with_code_challenge(mut self) -> Self {
        self.has_code_challenge = true;
        self
    }

    pub fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub subtopics: Vec<Subtopic>,
}

impl Topic {
    pub fn new(title: impl Into<String>, subtopics: Vec<Subtopic>) -> Self {
        Self {
            title: title.into(),
            subtopics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub title: String,
    pub topics: Vec<Topic>,
}

impl Module {
    pub fn new(title: impl Into<String>, topics: Vec<Topic>) -> Self {
        Self {
            title: title.into(),
            topics,
        }
    }

    /// Number of subtopics across all topics of this module
    pub fn subtopic_count(&self) -> usize {
        self.topics.iter().map(|t| t.subtopics.len()).sum()
    }

    /// Subtopics of this module in document order
    pub fn subtopics(&self) -> impl Iterator<Item = &Subtopic> {
        self.topics.iter().flat_map(|t| t.subtopics.iter())
    }
}

/// Position of a subtopic inside the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub module_index: usize,
    pub topic_index: usize,
    pub subtopic_index: usize,
    /// Index in the flattened document order
    pub position: usize,
}

/// A subtopic together with its owning topic and module.
#[derive(Debug, Clone, Copy)]
pub struct SubtopicRef<'a> {
    pub location: Location,
    pub module: &'a Module,
    pub topic: &'a Topic,
    pub subtopic: &'a Subtopic,
}

/// Validated, immutable curriculum.
///
/// Subtopic ids are unique across the whole tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCurriculum")]
pub struct CurriculumTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    modules: Vec<Module>,
    #[serde(skip)]
    index: HashMap<String, Location>,
}

impl PartialEq for CurriculumTree {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.subject == other.subject && self.modules == other.modules
    }
}

impl CurriculumTree {
    /// Build a tree, rejecting duplicate subtopic ids.
    pub fn new(modules: Vec<Module>) -> std::result::Result<Self, InvalidTreeError> {
        let index = build_index(&modules)?;
        Ok(Self {
            title: None,
            subject: None,
            modules,
            index,
        })
    }

    /// Tree with no modules at all
    pub fn empty() -> Self {
        Self {
            title: None,
            subject: None,
            modules: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Parse and validate a JSON curriculum document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`](crate::CoreError::Json) for malformed JSON
    /// and [`CoreError::InvalidTree`](crate::CoreError::InvalidTree) when a
    /// module or topic lacks its nested collection.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCurriculum = serde_json::from_str(json)?;
        Ok(Self::try_from(raw)?)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total subtopic count, summed depth-first
    pub fn subtopic_count(&self) -> usize {
        self.modules.iter().map(Module::subtopic_count).sum()
    }

    pub fn contains(&self, subtopic_id: &str) -> bool {
        self.index.contains_key(subtopic_id)
    }

    pub fn locate(&self, subtopic_id: &str) -> Option<Location> {
        self.index.get(subtopic_id).copied()
    }

    /// Look up a subtopic with its owning topic and module
    pub fn get(&self, subtopic_id: &str) -> Option<SubtopicRef<'_>> {
        let location = self.locate(subtopic_id)?;
        let module = &self.modules[location.module_index];
        let topic = &module.topics[location.topic_index];
        Some(SubtopicRef {
            location,
            module,
            topic,
            subtopic: &topic.subtopics[location.subtopic_index],
        })
    }

    /// All subtopics in document order
    pub fn subtopics(&self) -> impl Iterator<Item = SubtopicRef<'_>> {
        self.modules
            .iter()
            .enumerate()
            .flat_map(|(module_index, module)| {
                module
                    .topics
                    .iter()
                    .enumerate()
                    .flat_map(move |(topic_index, topic)| {
                        topic.subtopics.iter().enumerate().map(move |(subtopic_index, subtopic)| {
                            (module_index, module, topic_index, topic, subtopic_index, subtopic)
                        })
                    })
            })
            .enumerate()
            .map(
                |(position, (module_index, module, topic_index, topic, subtopic_index, subtopic))| {
                    SubtopicRef {
                        location: Location {
                            module_index,
                            topic_index,
                            subtopic_index,
                            position,
                        },
                        module,
                        topic,
                        subtopic,
                    }
                },
            )
    }
}

fn build_index(modules: &[Module]) -> std::result::Result<HashMap<String, Location>, InvalidTreeError> {
    let mut index: HashMap<String, Location> = HashMap::new();
    let mut position = 0;

    for (module_index, module) in modules.iter().enumerate() {
        for (topic_index, topic) in module.topics.iter().enumerate() {
            for (subtopic_index, subtopic) in topic.subtopics.iter().enumerate() {
                let location = Location {
                    module_index,
                    topic_index,
                    subtopic_index,
                    position,
                };
                if let Some(first) = index.insert(subtopic.id.clone(), location) {
                    return Err(InvalidTreeError::DuplicateSubtopicId {
                        id: subtopic.id.clone(),
                        first_module: first.module_index,
                        second_module: module_index,
                    });
                }
                position += 1;
            }
        }
    }

    Ok(index)
}
