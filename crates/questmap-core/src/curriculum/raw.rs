//! Unvalidated curriculum documents as produced by the content generator.

use serde::Deserialize;

use super::{build_index, CurriculumTree, Module, Subtopic, Topic};
use crate::error::InvalidTreeError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurriculum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub modules: Vec<RawModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModule {
    #[serde(default)]
    pub title: String,
    /// `None` when the document has no `topics` key or it is `null`
    #[serde(default)]
    pub topics: Option<Vec<RawTopic>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTopic {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtopics: Option<Vec<Subtopic>>,
}

impl TryFrom<RawCurriculum> for CurriculumTree {
    type Error = InvalidTreeError;

    fn try_from(raw: RawCurriculum) -> Result<Self, Self::Error> {
        let mut modules = Vec::with_capacity(raw.modules.len());

        for (module_index, raw_module) in raw.modules.into_iter().enumerate() {
            let raw_topics = raw_module
                .topics
                .ok_or_else(|| InvalidTreeError::MissingTopics {
                    module_index,
                    module_title: raw_module.title.clone(),
                })?;

            let mut topics = Vec::with_capacity(raw_topics.len());
            for (topic_index, raw_topic) in raw_topics.into_iter().enumerate() {
                let subtopics = raw_topic
                    .subtopics
                    .ok_or_else(|| InvalidTreeError::MissingSubtopics {
                        module_index,
                        topic_index,
                        topic_title: raw_topic.title.clone(),
                    })?;
                topics.push(Topic {
                    title: raw_topic.title,
                    subtopics,
                });
            }

            modules.push(Module {
                title: raw_module.title,
                topics,
            });
        }

        let index = build_index(&modules)?;
        Ok(CurriculumTree {
            title: raw.title,
            subject: raw.subject,
            modules,
            index,
        })
    }
}
