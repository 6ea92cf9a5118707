//! The production blueprint document and its section types.
//!
//! One blueprint instance is owned by the orchestrator and replaced
//! wholesale at the start of each run. Stages merge whole sections into it;
//! a failed stage leaves every previously merged section intact.

use reelsmith_error::{PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize};

/// Fallback duration for the final scene, which has no successor tag to
/// derive its length from.
const DEFAULT_LAST_SCENE_SECONDS: u32 = 10;

/// SEO research output: ranked keywords and the chosen title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoData {
    /// Ordered keywords, strongest first
    pub keywords: Vec<String>,
    /// The title selected for the video
    pub selected_title: String,
}

/// One scene of the script, parsed from the director's informal
/// `[15s] visual description {Voiceover: spoken line}` notation into a
/// structured record so nothing downstream re-parses bracket syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Offset of the scene from the start of the video, in seconds
    pub start_seconds: u32,
    /// Scene length, derived from the next scene's start tag
    pub duration_seconds: u32,
    /// What is on screen
    pub visual_description: String,
    /// What is spoken over the scene
    pub voiceover_text: String,
}

impl Scene {
    /// Parse a full scene breakdown in timeline order.
    ///
    /// Each entry must carry a `[<n>s]` start tag; the voiceover segment
    /// (`{Voiceover: ...}`) is optional and defaults to empty. Durations are
    /// derived from consecutive start tags; the last scene gets a fixed
    /// default.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry is missing its start tag or the tags
    /// are not monotonically increasing.
    pub fn parse_breakdown(entries: &[String]) -> Result<Vec<Scene>, PipelineError> {
        let mut parsed = Vec::with_capacity(entries.len());

        for entry in entries {
            parsed.push(Self::parse_entry(entry)?);
        }

        // Derive durations from consecutive start tags
        for i in 0..parsed.len() {
            let (start, next_start) = (
                parsed[i].start_seconds,
                parsed.get(i + 1).map(|s: &Scene| s.start_seconds),
            );
            parsed[i].duration_seconds = match next_start {
                Some(next) if next > start => next - start,
                Some(next) => {
                    return Err(PipelineError::new(PipelineErrorKind::SceneNotation(
                        format!("scene at {}s is followed by earlier tag {}s", start, next),
                    )));
                }
                None => DEFAULT_LAST_SCENE_SECONDS,
            };
        }

        Ok(parsed)
    }

    /// Parse a single `[15s] description {Voiceover: text}` entry.
    fn parse_entry(entry: &str) -> Result<Scene, PipelineError> {
        let trimmed = entry.trim();

        let tag_end = trimmed.find(']').ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::SceneNotation(format!(
                "missing [<n>s] start tag in '{}'",
                trimmed
            )))
        })?;
        if !trimmed.starts_with('[') {
            return Err(PipelineError::new(PipelineErrorKind::SceneNotation(
                format!("scene must begin with a [<n>s] tag: '{}'", trimmed),
            )));
        }

        let tag = trimmed[1..tag_end].trim();
        let start_seconds: u32 = tag
            .strip_suffix('s')
            .unwrap_or(tag)
            .trim()
            .parse()
            .map_err(|_| {
                PipelineError::new(PipelineErrorKind::SceneNotation(format!(
                    "unparseable start tag '[{}]'",
                    tag
                )))
            })?;

        let rest = &trimmed[tag_end + 1..];

        // Voiceover segment: {Voiceover: ...}, case-insensitive marker
        let (visual, voiceover) = match rest.find('{') {
            Some(open) => {
                // Only a brace after the opener closes the segment; a stray
                // earlier brace must not produce a backwards range.
                let close = rest[open + 1..]
                    .rfind('}')
                    .map(|i| open + 1 + i)
                    .unwrap_or(rest.len());
                let inner = rest[open + 1..close].trim();
                let spoken = inner
                    .strip_prefix("Voiceover:")
                    .or_else(|| inner.strip_prefix("voiceover:"))
                    .unwrap_or(inner)
                    .trim();
                (rest[..open].trim(), spoken.to_string())
            }
            None => (rest.trim(), String::new()),
        };

        Ok(Scene {
            start_seconds,
            duration_seconds: 0,
            visual_description: visual.to_string(),
            voiceover_text: voiceover,
        })
    }
}

/// Script content produced by the director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptContent {
    /// Opening hook (first seconds of the video)
    pub hook: String,
    /// Main script body
    pub body: String,
    /// Call to action
    pub cta: String,
    /// Structured scene breakdown in timeline order
    pub scenes: Vec<Scene>,
}

/// Visual plan produced by the visual designer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualPlan {
    /// Prompt for the thumbnail image
    pub thumbnail_prompt: String,
    /// One image prompt per scene (reconciled to the scene count)
    pub image_prompts: Vec<String>,
    /// Motion prompts for short video clips
    pub video_prompts: Vec<String>,
}

/// Outcome of the declarative logic validation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValidationStatus {
    /// Not yet validated
    #[default]
    Pending,
    /// Funnel logic checks out
    Valid,
    /// Funnel logic is inconsistent
    Invalid,
}

/// Marketing plan produced by the marketer and refined by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingData {
    /// Destination URL for the call to action
    pub target_url: String,
    /// Offer category (lead magnet, tripwire, core offer, ...)
    pub offer_type: String,
    /// Declarative validation outcome
    pub validation_status: ValidationStatus,
    /// Validator's report, when the logic stage has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logic_report: Option<String>,
}

/// The per-slot aggregate document produced by the pipeline.
///
/// Sections are only ever additively merged per stage; `None` means the
/// corresponding stage has not completed for this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    /// Slot number this blueprint belongs to
    pub video_number: u32,
    /// Label copied from the topic ledger entry for the slot
    pub video_type: String,
    /// Researcher output
    pub seo: Option<SeoData>,
    /// Director output
    pub script: Option<ScriptContent>,
    /// Visual designer output
    pub visuals: Option<VisualPlan>,
    /// Marketer/validator output
    pub marketing: Option<MarketingData>,
}

impl Blueprint {
    /// Fresh blueprint for a slot, replacing any prior document.
    pub fn for_slot(video_number: u32, video_type: impl Into<String>) -> Self {
        Self {
            video_number,
            video_type: video_type.into(),
            ..Self::default()
        }
    }

    /// Merge the research section.
    pub fn merge_seo(&mut self, seo: SeoData) {
        self.seo = Some(seo);
    }

    /// Merge the script section.
    pub fn merge_script(&mut self, script: ScriptContent) {
        self.script = Some(script);
    }

    /// Merge the visual plan section.
    pub fn merge_visuals(&mut self, visuals: VisualPlan) {
        self.visuals = Some(visuals);
    }

    /// Merge the marketing section.
    pub fn merge_marketing(&mut self, marketing: MarketingData) {
        self.marketing = Some(marketing);
    }

    /// Record the logic validator's verdict on the marketing section.
    ///
    /// # Errors
    ///
    /// Returns an error if the marketing stage has not merged yet.
    pub fn record_validation(
        &mut self,
        is_valid: bool,
        report: impl Into<String>,
    ) -> Result<(), PipelineError> {
        let marketing = self.marketing.as_mut().ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::StageOutput {
                stage: "logic".to_string(),
                message: "validation arrived before the marketing stage merged".to_string(),
            })
        })?;
        marketing.validation_status = if is_valid {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        };
        marketing.logic_report = Some(report.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scene_with_voiceover() {
        let scene = Scene::parse_entry(
            "[15s] Close-up of rising dough {Voiceover: This is where the magic happens}",
        )
        .unwrap();
        assert_eq!(scene.start_seconds, 15);
        assert_eq!(scene.visual_description, "Close-up of rising dough");
        assert_eq!(scene.voiceover_text, "This is where the magic happens");
    }

    #[test]
    fn parse_scene_without_voiceover() {
        let scene = Scene::parse_entry("[0s] Title card over b-roll").unwrap();
        assert_eq!(scene.start_seconds, 0);
        assert_eq!(scene.visual_description, "Title card over b-roll");
        assert!(scene.voiceover_text.is_empty());
    }

    #[test]
    fn durations_derive_from_consecutive_tags() {
        let entries = vec![
            "[0s] Hook shot {Voiceover: Stop scrolling}".to_string(),
            "[8s] Demo step one {Voiceover: First, mix}".to_string(),
            "[30s] Final reveal {Voiceover: And done}".to_string(),
        ];
        let scenes = Scene::parse_breakdown(&entries).unwrap();
        assert_eq!(scenes[0].duration_seconds, 8);
        assert_eq!(scenes[1].duration_seconds, 22);
        assert_eq!(scenes[2].duration_seconds, DEFAULT_LAST_SCENE_SECONDS);
    }

    #[test]
    fn stray_closing_brace_before_voiceover_does_not_panic() {
        let entries = vec!["[5s] odd } text {Voiceover: hi".to_string()];
        let scenes = Scene::parse_breakdown(&entries).unwrap();
        assert_eq!(scenes[0].visual_description, "odd } text");
        assert_eq!(scenes[0].voiceover_text, "hi");
    }

    #[test]
    fn missing_tag_is_an_error() {
        let entries = vec!["A scene with no timestamp".to_string()];
        assert!(Scene::parse_breakdown(&entries).is_err());
    }

    #[test]
    fn non_monotonic_tags_are_an_error() {
        let entries = vec!["[10s] later".to_string(), "[5s] earlier".to_string()];
        assert!(Scene::parse_breakdown(&entries).is_err());
    }

    #[test]
    fn merges_are_additive() {
        let mut blueprint = Blueprint::for_slot(3, "Tutorial / Sourdough");
        blueprint.merge_seo(SeoData {
            keywords: vec!["sourdough".to_string()],
            selected_title: "Title".to_string(),
        });
        blueprint.merge_marketing(MarketingData {
            target_url: "https://example.com".to_string(),
            offer_type: "lead magnet".to_string(),
            validation_status: ValidationStatus::Pending,
            logic_report: None,
        });

        assert!(blueprint.seo.is_some());
        assert!(blueprint.script.is_none());

        blueprint.record_validation(false, "URL mismatch").unwrap();
        let marketing = blueprint.marketing.as_ref().unwrap();
        assert_eq!(marketing.validation_status, ValidationStatus::Invalid);
        assert_eq!(marketing.logic_report.as_deref(), Some("URL mismatch"));
    }

    #[test]
    fn validation_before_marketing_fails() {
        let mut blueprint = Blueprint::for_slot(1, "Vlog / Day one");
        assert!(blueprint.record_validation(true, "fine").is_err());
    }
}
