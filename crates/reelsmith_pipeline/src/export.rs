//! Flat-text export of a production blueprint.
//!
//! The export is a human-readable shooting document with fixed section
//! headers; sections whose stage never ran are marked as pending rather
//! than omitted, so a partial run still exports something reviewable.

use std::fmt::Write;

use crate::blueprint::Blueprint;

const PENDING: &str = "(not yet generated)";

/// Render a blueprint as a flat text document with fixed section headers.
pub fn render_blueprint(blueprint: &Blueprint) -> String {
    let mut doc = String::new();

    let _ = writeln!(
        doc,
        "PRODUCTION BLUEPRINT - VIDEO #{}",
        blueprint.video_number
    );
    let _ = writeln!(doc, "Type: {}", blueprint.video_type);
    doc.push('\n');

    doc.push_str("[SEO & TITLE]\n");
    match &blueprint.seo {
        Some(seo) => {
            let _ = writeln!(doc, "Title: {}", seo.selected_title);
            let _ = writeln!(doc, "Keywords: {}", seo.keywords.join(", "));
        }
        None => doc.push_str(PENDING),
    }
    doc.push('\n');

    doc.push_str("\n[SCRIPT]\n");
    match &blueprint.script {
        Some(script) => {
            let _ = writeln!(doc, "Hook: {}", script.hook);
            let _ = writeln!(doc, "Body: {}", script.body);
            let _ = writeln!(doc, "CTA: {}", script.cta);
        }
        None => {
            doc.push_str(PENDING);
            doc.push('\n');
        }
    }

    doc.push_str("\n[SCENE BREAKDOWN & VOICEOVER]\n");
    match &blueprint.script {
        Some(script) if !script.scenes.is_empty() => {
            for (i, scene) in script.scenes.iter().enumerate() {
                let _ = writeln!(
                    doc,
                    "Scene {} ({}s, {}s long): {}",
                    i + 1,
                    scene.start_seconds,
                    scene.duration_seconds,
                    scene.visual_description
                );
                if !scene.voiceover_text.is_empty() {
                    let _ = writeln!(doc, "  Voiceover: {}", scene.voiceover_text);
                }
            }
        }
        _ => {
            doc.push_str(PENDING);
            doc.push('\n');
        }
    }

    doc.push_str("\n[VISUAL PLAN]\n");
    match &blueprint.visuals {
        Some(visuals) => {
            let _ = writeln!(doc, "Thumbnail: {}", visuals.thumbnail_prompt);
            for (i, prompt) in visuals.image_prompts.iter().enumerate() {
                let _ = writeln!(doc, "Image {}: {}", i + 1, prompt);
            }
            for (i, prompt) in visuals.video_prompts.iter().enumerate() {
                let _ = writeln!(doc, "Motion {}: {}", i + 1, prompt);
            }
        }
        None => {
            doc.push_str(PENDING);
            doc.push('\n');
        }
    }

    doc.push_str("\n[MARKETING & FUNNEL]\n");
    match &blueprint.marketing {
        Some(marketing) => {
            let _ = writeln!(doc, "Target URL: {}", marketing.target_url);
            let _ = writeln!(doc, "Offer: {}", marketing.offer_type);
            let _ = writeln!(doc, "Validation: {}", marketing.validation_status);
            if let Some(report) = &marketing.logic_report {
                let _ = writeln!(doc, "Report: {report}");
            }
        }
        None => {
            doc.push_str(PENDING);
            doc.push('\n');
        }
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{MarketingData, Scene, ScriptContent, SeoData, ValidationStatus};

    #[test]
    fn full_blueprint_renders_every_section() {
        let mut blueprint = Blueprint::for_slot(2, "Tutorial / Sourdough");
        blueprint.merge_seo(SeoData {
            keywords: vec!["sourdough".to_string(), "starter".to_string()],
            selected_title: "Sourdough in 5 Minutes".to_string(),
        });
        blueprint.merge_script(ScriptContent {
            hook: "Stop buying bread.".to_string(),
            body: "Mix, wait, bake.".to_string(),
            cta: "Grab the free guide.".to_string(),
            scenes: vec![Scene {
                start_seconds: 0,
                duration_seconds: 8,
                visual_description: "Flour hitting the bowl".to_string(),
                voiceover_text: "Stop buying bread".to_string(),
            }],
        });
        blueprint.merge_marketing(MarketingData {
            target_url: "https://example.com/free-guide".to_string(),
            offer_type: "lead magnet".to_string(),
            validation_status: ValidationStatus::Valid,
            logic_report: Some("Destination fits the funnel stage".to_string()),
        });

        let doc = render_blueprint(&blueprint);
        assert!(doc.contains("VIDEO #2"));
        assert!(doc.contains("[SCRIPT]"));
        assert!(doc.contains("[SCENE BREAKDOWN & VOICEOVER]"));
        assert!(doc.contains("Scene 1 (0s, 8s long): Flour hitting the bowl"));
        assert!(doc.contains("Validation: valid"));
    }

    #[test]
    fn partial_blueprint_marks_missing_sections() {
        let blueprint = Blueprint::for_slot(1, "Story / Origin");
        let doc = render_blueprint(&blueprint);
        assert!(doc.contains("[VISUAL PLAN]"));
        assert!(doc.contains("(not yet generated)"));
    }
}
