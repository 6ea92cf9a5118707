//! The six stateless agents behind the production pipeline.
//!
//! Each agent is an async function: typed inputs in, typed section out.
//! An agent builds its instruction text, sends one request through the
//! driver (which owns retry behavior), and parses the response. Agents
//! never call each other; sequencing belongs to the orchestrator.

use std::collections::BTreeMap;

use reelsmith_core::{GenerateRequestBuilder, Message, Role};
use reelsmith_error::{PipelineError, PipelineErrorKind, ReelsmithResult};
use reelsmith_interface::ReelsmithDriver;
use serde::{Deserialize, Serialize};

use crate::blueprint::{MarketingData, Scene, ScriptContent, SeoData, ValidationStatus, VisualPlan};
use crate::extraction::{extract_json, parse_json};

/// Title returned when the researcher's response cannot be parsed.
pub const RESEARCH_FALLBACK_TITLE: &str = "Research Failed - Retry";

const PLACEHOLDER_BODY: &str = "[Script body missing - regenerate this section]";
const PLACEHOLDER_CTA: &str = "Follow for more.";

/// Per-call configuration for the agents.
///
/// Everything an agent needs beyond its typed inputs arrives here: model
/// overrides, sampling temperature, and the funnel URLs the marketer works
/// with. Agents read nothing from ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default)]
pub struct AgentConfig {
    /// Model override for research and planning calls (driver default when `None`)
    pub model: Option<String>,
    /// Sampling temperature for creative stages
    pub temperature: Option<f32>,
    /// Destination URL for early-funnel slots
    pub lead_magnet_url: String,
    /// Destination URL for later-funnel slots
    pub core_offer_url: String,
    /// Number of slots (from slot 1) that point at the lead magnet
    pub lead_magnet_slots: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: Some(0.7),
            lead_magnet_url: "https://example.com/free-guide".to_string(),
            core_offer_url: "https://example.com/course".to_string(),
            lead_magnet_slots: 3,
        }
    }
}

fn stage_output_error(stage: &str, message: impl Into<String>) -> PipelineError {
    PipelineError::new(PipelineErrorKind::StageOutput {
        stage: stage.to_string(),
        message: message.into(),
    })
}

/// Send one agent request and return the raw response text.
async fn call_agent(
    driver: &dyn ReelsmithDriver,
    config: &AgentConfig,
    stage: &str,
    persona: &str,
    content: String,
    response_schema: Option<serde_json::Value>,
    search_grounding: bool,
) -> ReelsmithResult<String> {
    let request = GenerateRequestBuilder::default()
        .messages(vec![
            Message::text(Role::System, persona),
            Message::text(Role::User, content),
        ])
        .model(config.model.clone())
        .temperature(config.temperature)
        .response_schema(response_schema)
        .search_grounding(search_grounding)
        .build()
        .map_err(|e| stage_output_error(stage, format!("request construction: {e}")))?;

    let response = driver.generate(&request).await?;
    let text = response.text();
    if text.is_empty() {
        return Err(stage_output_error(stage, "response carried no text").into());
    }
    Ok(text)
}

/// Research a topic: SEO keywords plus a selected title.
///
/// Uses search grounding, so the response arrives as free text and goes
/// through the extraction envelope. A malformed response does not fail the
/// pipeline; it yields the fixed fallback object so the run can be retried
/// from the top.
#[tracing::instrument(skip(driver, config))]
pub async fn researcher(
    driver: &dyn ReelsmithDriver,
    config: &AgentConfig,
    topic: &str,
) -> ReelsmithResult<SeoData> {
    let persona = "You are an SEO researcher for short-form video. \
        You study what is currently ranking and reply with compact JSON only.";
    let content = format!(
        "Research the topic \"{topic}\" for a short-form video. \
         Find the 5 strongest search keywords and pick one click-worthy title \
         under 60 characters. \
         Respond with JSON: {{\"keywords\": [5 strings], \"selectedTitle\": string}}"
    );

    let text = call_agent(driver, config, "research", persona, content, None, true).await?;

    match parse_json::<SeoData>(&extract_json(&text)) {
        Ok(seo) => Ok(seo),
        Err(e) => {
            tracing::warn!(error = %e, "research response unparseable, using fallback");
            Ok(SeoData {
                keywords: Vec::new(),
                selected_title: RESEARCH_FALLBACK_TITLE.to_string(),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectorResponse {
    hook: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    cta: String,
    scene_breakdown: Vec<String>,
}

/// Script a video: hook, body, call to action, and a scene breakdown.
///
/// Requests structured JSON output, so the response parses directly without
/// the extraction envelope. Empty `body`/`cta` fields are back-filled with
/// fixed placeholders. Scene-count and duration limits are prompt
/// instructions; the breakdown itself is parsed into structured [`Scene`]
/// records and bad notation is a stage error.
#[tracing::instrument(skip(driver, config, keywords))]
pub async fn director(
    driver: &dyn ReelsmithDriver,
    config: &AgentConfig,
    title: &str,
    video_type: &str,
    keywords: &[String],
) -> ReelsmithResult<ScriptContent> {
    let persona = "You are a short-form video director. You write tight scripts \
        with a strong first-second hook and respond in JSON only.";
    let content = format!(
        "Write a script for a {video_type} video titled \"{title}\". \
         Work in these keywords naturally: {}. \
         Use at most 20 scenes, each 8-30 seconds. Each sceneBreakdown entry \
         must follow the notation \"[<start>s] <visual> {{Voiceover: <spoken>}}\". \
         Respond with JSON: {{\"hook\": string, \"body\": string, \"cta\": string, \
         \"sceneBreakdown\": [strings]}}",
        keywords.join(", ")
    );
    let schema = serde_json::json!({
        "type": "object",
        "properties": {
            "hook": {"type": "string"},
            "body": {"type": "string"},
            "cta": {"type": "string"},
            "sceneBreakdown": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["hook", "sceneBreakdown"]
    });

    let text = call_agent(driver, config, "script", persona, content, Some(schema), false).await?;
    let parsed: DirectorResponse = parse_json(&text)?;

    let scenes = Scene::parse_breakdown(&parsed.scene_breakdown)?;

    Ok(ScriptContent {
        hook: parsed.hook,
        body: if parsed.body.is_empty() {
            PLACEHOLDER_BODY.to_string()
        } else {
            parsed.body
        },
        cta: if parsed.cta.is_empty() {
            PLACEHOLDER_CTA.to_string()
        } else {
            parsed.cta
        },
        scenes,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisualResponse {
    thumbnail_prompt: String,
    image_prompts: Vec<String>,
    #[serde(default)]
    video_prompts: Vec<String>,
}

/// Plan the visuals: one image prompt per scene plus a thumbnail and three
/// motion prompts.
///
/// The model is instructed to return exactly one image prompt per scene,
/// but that is not reliable, so the count is reconciled here: extras are
/// truncated, a shortfall is padded by repeating the last prompt, and an
/// empty prompt list for a non-empty scene list is a stage error.
#[tracing::instrument(skip(driver, config, scenes), fields(scene_count = scenes.len()))]
pub async fn visual_designer(
    driver: &dyn ReelsmithDriver,
    config: &AgentConfig,
    scenes: &[Scene],
) -> ReelsmithResult<VisualPlan> {
    let persona = "You are a visual designer for short-form video. You write \
        vivid, camera-ready image generation prompts and respond in JSON only.";
    let scene_list: String = scenes
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}\n", i + 1, s.visual_description))
        .collect();
    let content = format!(
        "Design visuals for these {} scenes:\n{scene_list}\
         Write exactly one image prompt per scene, in order, plus one \
         thumbnail prompt and 3 short video motion prompts. \
         Respond with JSON: {{\"thumbnailPrompt\": string, \
         \"imagePrompts\": [strings], \"videoPrompts\": [3 strings]}}",
        scenes.len()
    );

    let text = call_agent(driver, config, "visual", persona, content, None, false).await?;
    let parsed: VisualResponse = parse_json(&extract_json(&text))?;

    let mut image_prompts = parsed.image_prompts;
    if image_prompts.is_empty() && !scenes.is_empty() {
        return Err(stage_output_error("visual", "no image prompts returned").into());
    }
    image_prompts.truncate(scenes.len());
    while image_prompts.len() < scenes.len() {
        let last = image_prompts[image_prompts.len() - 1].clone();
        tracing::warn!(
            have = image_prompts.len(),
            want = scenes.len(),
            "padding image prompts to scene count"
        );
        image_prompts.push(last);
    }

    Ok(VisualPlan {
        thumbnail_prompt: parsed.thumbnail_prompt,
        image_prompts,
        video_prompts: parsed.video_prompts,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketerResponse {
    target_url: String,
    offer_type: String,
}

/// Choose the funnel destination for a slot.
///
/// Early slots (up to `lead_magnet_slots`) are steered to the lead magnet
/// by instruction; later slots to the core offer. The returned section
/// starts in [`ValidationStatus::Pending`] until the logic stage runs.
#[tracing::instrument(skip(driver, config))]
pub async fn marketer(
    driver: &dyn ReelsmithDriver,
    config: &AgentConfig,
    video_number: u32,
) -> ReelsmithResult<MarketingData> {
    let persona = "You are a funnel marketer for a content channel. \
        You match each video to one offer and respond in JSON only.";
    let content = format!(
        "Pick the call-to-action destination for video #{video_number}. \
         Videos 1 through {} must use the lead magnet at {} (offerType \
         \"lead magnet\"); later videos use the core offer at {} (offerType \
         \"core offer\"). \
         Respond with JSON: {{\"targetUrl\": string, \"offerType\": string}}",
        config.lead_magnet_slots, config.lead_magnet_url, config.core_offer_url
    );

    let text = call_agent(driver, config, "marketing", persona, content, None, false).await?;
    let parsed: MarketerResponse = parse_json(&extract_json(&text))?;

    Ok(MarketingData {
        target_url: parsed.target_url,
        offer_type: parsed.offer_type,
        validation_status: ValidationStatus::Pending,
        logic_report: None,
    })
}

/// Logic validator verdict: declarative, no independent check is performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    /// Whether the funnel logic holds for this slot
    pub is_valid: bool,
    /// One-paragraph justification
    pub report: String,
}

/// Validate the funnel logic for a slot.
///
/// The verdict is whatever the model reports; an `is_valid: false` result
/// is a successful stage outcome, not an error.
#[tracing::instrument(skip(driver, config))]
pub async fn logic_validator(
    driver: &dyn ReelsmithDriver,
    config: &AgentConfig,
    target_url: &str,
    video_number: u32,
) -> ReelsmithResult<Validation> {
    let persona = "You are a funnel logic auditor. You check that a video's \
        call to action fits its place in the funnel and respond in JSON only.";
    let content = format!(
        "Video #{video_number} sends viewers to {target_url}. Videos 1 through \
         {} belong to the lead-magnet stage ({}); later videos to the core \
         offer ({}). Does this destination fit? \
         Respond with JSON: {{\"isValid\": boolean, \"report\": string}}",
        config.lead_magnet_slots, config.lead_magnet_url, config.core_offer_url
    );

    let text = call_agent(driver, config, "logic", persona, content, None, false).await?;
    Ok(parse_json(&extract_json(&text))?)
}

/// Plan the next phase: topics for slots `last_slot+1 ..= last_slot+5`.
///
/// The response maps slot numbers (as JSON object keys) to
/// `"<type> / <title>"` labels. Keys that are not numbers are a stage
/// error; range validation happens when the batch is merged into the
/// ledger.
#[tracing::instrument(skip(driver, config))]
pub async fn strategist(
    driver: &dyn ReelsmithDriver,
    config: &AgentConfig,
    last_slot: u32,
) -> ReelsmithResult<BTreeMap<u32, String>> {
    let persona = "You are a content strategist. You plan coherent batches of \
        short-form video topics and respond in JSON only.";
    let content = format!(
        "The channel has planned videos 1 through {last_slot}. Plan the next 5: \
         videos {} through {}. Each value is \"<type> / <title>\" where type is \
         one of Educational, Tutorial, Story, Promo. \
         Respond with a single JSON object mapping each video number to its \
         label, e.g. {{\"{}\": \"Educational / ...\"}}",
        last_slot + 1,
        last_slot + 5,
        last_slot + 1
    );

    let text = call_agent(driver, config, "strategy", persona, content, None, false).await?;
    let raw: BTreeMap<String, String> = parse_json(&extract_json(&text))?;

    let mut batch = BTreeMap::new();
    for (key, label) in raw {
        let slot: u32 = key.trim().parse().map_err(|_| {
            stage_output_error("strategy", format!("non-numeric slot key '{key}'"))
        })?;
        batch.insert(slot, label);
    }
    Ok(batch)
}
