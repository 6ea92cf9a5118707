//! Shared test utilities for pipeline integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

pub mod mock_driver;

pub use mock_driver::{MockDriver, ScriptedReply};

use reelsmith_core::{GenerateRequest, Input};
use std::path::PathBuf;

/// Concatenated user-message text of a captured request.
pub fn user_text(req: &GenerateRequest) -> String {
    req.messages
        .iter()
        .filter(|m| m.role == reelsmith_core::Role::User)
        .flat_map(|m| m.content.iter())
        .filter_map(|input| match input {
            Input::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-test ledger file path.
pub fn ledger_path(test_name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("reelsmith-{}-{}", test_name, std::process::id()))
        .join("ledger.json")
}

/// Like [`ledger_path`], but clears any leftover from a previous run so the
/// test starts from an empty ledger.
pub fn temp_ledger_path(test_name: &str) -> PathBuf {
    let path = ledger_path(test_name);
    std::fs::remove_file(&path).ok();
    path
}

/// Canned researcher reply, fenced to exercise the extraction path.
pub fn research_reply(title: &str) -> String {
    format!(
        "Here is the research:\n```json\n{{\"keywords\": [\"k1\", \"k2\", \"k3\", \"k4\", \"k5\"], \"selectedTitle\": \"{title}\"}}\n```"
    )
}

/// Canned director reply: bare JSON, as the structured-output path returns.
pub fn director_reply() -> String {
    serde_json::json!({
        "hook": "Stop scrolling.",
        "body": "Three steps, thirty seconds each.",
        "cta": "Grab the free guide.",
        "sceneBreakdown": [
            "[0s] Flour hitting the bowl {Voiceover: Stop scrolling}",
            "[10s] Dough rising in time lapse {Voiceover: Now we wait}"
        ]
    })
    .to_string()
}

/// Canned visual designer reply with `n` image prompts.
pub fn visual_reply(n: usize) -> String {
    let prompts: Vec<String> = (1..=n).map(|i| format!("Macro shot {i}")).collect();
    serde_json::json!({
        "thumbnailPrompt": "Golden loaf on a dark table",
        "imagePrompts": prompts,
        "videoPrompts": ["Slow push in", "Whip pan", "Overhead orbit"]
    })
    .to_string()
}

/// Canned marketer reply.
pub fn marketer_reply(url: &str) -> String {
    serde_json::json!({ "targetUrl": url, "offerType": "lead magnet" }).to_string()
}

/// Canned logic validator reply.
pub fn logic_reply(is_valid: bool, report: &str) -> String {
    serde_json::json!({ "isValid": is_valid, "report": report }).to_string()
}

/// Canned strategist reply covering slots `start ..= start + 4`.
pub fn strategist_reply(start: u32) -> String {
    let map: serde_json::Map<String, serde_json::Value> = (start..start + 5)
        .map(|i| {
            (
                i.to_string(),
                serde_json::Value::String(format!("Educational / Planned topic {i}")),
            )
        })
        .collect();
    serde_json::Value::Object(map).to_string()
}
