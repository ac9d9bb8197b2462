//! Language fallback policy for picking one transcript among the tracks a
//! video offers.
//!
//! The policy is split in two: [`TranscriptSelector::plan`] is a pure function
//! that orders the candidates, and [`TranscriptSelector::fetch_best`] walks that
//! order against a [`TranscriptSource`] and stops at the first candidate that
//! yields segments.

use std::collections::HashSet;

use crate::config::LanguageConfig;
use crate::youtube::{Segment, TranscriptList, TranscriptSource};
use crate::FetcherError;

/// Which rule of the policy produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Manually created track in a preferred language
    Manual,
    /// Auto-generated track in a preferred language
    Generated,
    /// Track in a secondary fallback language
    Fallback,
    /// Translatable track machine-translated into a preferred language
    Translated,
    /// Any remaining track, regardless of language
    AnyAvailable,
}

/// One attempt in the fallback walk
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Index into `TranscriptList::tracks`
    pub track: usize,
    pub translate_to: Option<String>,
    pub stage: Stage,
}

/// The transcript that won the fallback walk
#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    /// Source language code when the segments were machine-translated
    pub translated_from: Option<String>,
    pub stage: Stage,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
pub struct TranscriptSelector {
    preferred: Vec<String>,
    fallback: Vec<String>,
}

impl TranscriptSelector {
    pub fn new(preferred: Vec<String>, fallback: Vec<String>) -> Self {
        Self { preferred, fallback }
    }

    /// Build from config, letting a non-empty command-line list replace the preferences
    pub fn from_config(config: &LanguageConfig, languages: &[String]) -> Self {
        let preferred = if languages.is_empty() {
            config.preferred.clone()
        } else {
            languages.to_vec()
        };
        Self::new(preferred, config.fallback.clone())
    }

    pub fn preferred(&self) -> &[String] {
        &self.preferred
    }

    /// Order every candidate worth trying, without touching the network
    pub fn plan(&self, list: &TranscriptList) -> Vec<Candidate> {
        let mut plan = Plan::default();

        for code in &self.preferred {
            if let Some(index) = list.find_manual(code) {
                plan.push(index, None, Stage::Manual);
            }
        }

        for code in &self.preferred {
            if let Some(index) = list.find_generated(code) {
                plan.push(index, None, Stage::Generated);
            }
        }

        for code in &self.fallback {
            if let Some(index) = list.find_manual(code) {
                plan.push(index, None, Stage::Fallback);
            }
            if let Some(index) = list.find_generated(code) {
                plan.push(index, None, Stage::Fallback);
            }
        }

        let translatable = list
            .tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| track.is_translatable)
            .min_by_key(|(_, track)| track.is_generated)
            .map(|(index, _)| index);
        let target = self.preferred.iter().find(|code| list.can_translate_to(code));

        if let (Some(index), Some(target)) = (translatable, target) {
            plan.push(index, Some(target.clone()), Stage::Translated);
        }

        for index in 0..list.tracks.len() {
            plan.push(index, None, Stage::AnyAvailable);
        }

        plan.candidates
    }

    /// Walk the plan and return the first candidate that yields segments.
    ///
    /// Failed and empty candidates are logged and skipped. Rate limiting
    /// aborts the walk because every later request would hit it too.
    pub async fn fetch_best(
        &self,
        source: &dyn TranscriptSource,
        list: &TranscriptList,
    ) -> Result<FetchedTranscript, FetcherError> {
        for candidate in self.plan(list) {
            let track = &list.tracks[candidate.track];
            tracing::debug!(
                "Trying {:?} candidate {} (translate_to={:?})",
                candidate.stage,
                track.language_code,
                candidate.translate_to
            );

            let segments = match source
                .fetch_segments(track, candidate.translate_to.clone())
                .await
            {
                Ok(segments) => segments,
                Err(FetcherError::RateLimited) => return Err(FetcherError::RateLimited),
                Err(e) => {
                    tracing::warn!("Error fetching transcript {}: {}", track.language_code, e);
                    continue;
                }
            };

            if segments.is_empty() {
                tracing::warn!("Transcript {} has no segments, skipping", track.language_code);
                continue;
            }

            tracing::info!(
                "Selected {} transcript {} with {} segments",
                if track.is_generated { "generated" } else { "manual" },
                track.language_code,
                segments.len()
            );

            return Ok(match candidate.translate_to {
                Some(target) => FetchedTranscript {
                    language: translation_name(list, &target),
                    language_code: target,
                    is_generated: track.is_generated,
                    translated_from: Some(track.language_code.clone()),
                    stage: candidate.stage,
                    segments,
                },
                None => FetchedTranscript {
                    language: track.language.clone(),
                    language_code: track.language_code.clone(),
                    is_generated: track.is_generated,
                    translated_from: None,
                    stage: candidate.stage,
                    segments,
                },
            });
        }

        Err(FetcherError::NoSuitableTranscript)
    }
}

fn translation_name(list: &TranscriptList, code: &str) -> String {
    list.translation_languages
        .iter()
        .find(|l| l.language_code == code)
        .map(|l| l.language.clone())
        .unwrap_or_else(|| code.to_string())
}

/// Candidate list that keeps each (track, translation) pair once
#[derive(Default)]
struct Plan {
    candidates: Vec<Candidate>,
    seen: HashSet<(usize, Option<String>)>,
}

impl Plan {
    fn push(&mut self, track: usize, translate_to: Option<String>, stage: Stage) {
        if self.seen.insert((track, translate_to.clone())) {
            self.candidates.push(Candidate {
                track,
                translate_to,
                stage,
            });
        }
    }
}
