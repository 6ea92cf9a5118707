//! Integration tests for the studio orchestrator: stage sequencing,
//! partial-failure behavior, the busy guard, and ledger mutation paths.

mod test_utils;

use std::sync::Arc;

use anyhow::Result;
use reelsmith_error::GeminiErrorKind;
use reelsmith_pipeline::{
    AgentConfig, LedgerStore, LogLevel, RunOutcome, Studio, ValidationStatus,
    RESEARCH_FALLBACK_TITLE,
};
use test_utils::{
    director_reply, ledger_path, logic_reply, marketer_reply, research_reply, strategist_reply,
    temp_ledger_path, user_text, visual_reply, MockDriver, ScriptedReply,
};
use tokio::sync::Semaphore;

fn studio_with_topics(
    test_name: &str,
    topics: u32,
    driver: MockDriver,
) -> Result<Studio<MockDriver>> {
    let store = LedgerStore::new(temp_ledger_path(test_name));
    let studio = Studio::new(driver, AgentConfig::default(), store)?;
    for i in 1..=topics {
        studio.add_topic(format!("Educational / Topic {i}"))?;
    }
    Ok(studio)
}

fn full_run_script() -> Vec<ScriptedReply> {
    vec![
        ScriptedReply::Text(research_reply("Sourdough in 5 Minutes")),
        ScriptedReply::Text(director_reply()),
        ScriptedReply::Text(visual_reply(2)),
        ScriptedReply::Text(marketer_reply("https://example.com/free-guide")),
        ScriptedReply::Text(logic_reply(true, "Destination fits the funnel stage")),
    ]
}

#[tokio::test]
async fn full_run_populates_blueprint_in_stage_order() -> Result<()> {
    let driver = MockDriver::new(full_run_script());
    let requests = driver.request_log();
    let studio = studio_with_topics("full-run", 1, driver)?;

    let outcome = studio.run_protocol(1).await?;
    assert_eq!(outcome, RunOutcome::Completed);

    let blueprint = studio.blueprint();
    assert_eq!(blueprint.video_number, 1);
    assert!(blueprint.seo.is_some());
    assert!(blueprint.script.is_some());
    assert!(blueprint.visuals.is_some());
    assert!(blueprint.marketing.is_some());

    // Each stage's request was built from the previous stage's merged
    // output, so the captured requests prove strict sequencing.
    let captured = requests.lock().unwrap();
    assert_eq!(captured.len(), 5);
    assert!(captured[0].search_grounding, "research uses search grounding");
    assert!(
        user_text(&captured[1]).contains("Sourdough in 5 Minutes"),
        "director request carries the researched title"
    );
    assert!(
        captured[1].response_schema.is_some(),
        "director requests structured output"
    );
    assert!(
        user_text(&captured[2]).contains("Dough rising in time lapse"),
        "visual request carries the parsed scenes"
    );
    assert!(
        user_text(&captured[4]).contains("https://example.com/free-guide"),
        "logic request carries the marketer's target URL"
    );
    drop(captured);

    // Slot marked completed and persisted
    assert!(studio.ledger().is_completed(1));
    let reloaded = LedgerStore::new(ledger_path("full-run")).load()?;
    assert!(reloaded.is_completed(1));

    // Scenes were parsed into structured records with derived durations
    let scenes = &blueprint.script.as_ref().unwrap().scenes;
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].duration_seconds, 10);
    Ok(())
}

#[tokio::test]
async fn completed_stages_log_success_entries() -> Result<()> {
    let studio = studio_with_topics("stage-success-log", 1, MockDriver::new(full_run_script()))?;
    assert_eq!(studio.run_protocol(1).await?, RunOutcome::Completed);

    // One success entry per finished stage, distinct from progress entries
    let log = studio.log();
    let successes: Vec<&str> = log
        .entries()
        .iter()
        .filter(|e| *e.level() == LogLevel::Success)
        .map(|e| e.agent().as_str())
        .collect();
    assert_eq!(
        successes,
        vec!["researcher", "director", "visual_designer", "marketer", "logic_validator", "studio"]
    );
    Ok(())
}

#[tokio::test]
async fn visual_failure_halts_and_preserves_merged_sections() -> Result<()> {
    let script = vec![
        ScriptedReply::Text(research_reply("Sourdough in 5 Minutes")),
        ScriptedReply::Text(director_reply()),
        ScriptedReply::Fail(GeminiErrorKind::ApiRequest("model refused".to_string())),
    ];
    let studio = studio_with_topics("visual-fail", 1, MockDriver::new(script))?;

    let outcome = studio.run_protocol(1).await?;
    assert_eq!(outcome, RunOutcome::Halted);

    let blueprint = studio.blueprint();
    assert!(blueprint.seo.is_some(), "research result survives the halt");
    assert!(blueprint.script.is_some(), "script result survives the halt");
    assert!(blueprint.visuals.is_none());
    assert!(blueprint.marketing.is_none());

    // Slot not marked completed; failure surfaced as a log entry
    assert!(!studio.ledger().is_completed(1));
    let log = studio.log();
    let last = log.entries().last().unwrap();
    assert_eq!(*last.level(), LogLevel::Error);
    assert!(last.message().contains("halted"));
    Ok(())
}

#[tokio::test]
async fn invalid_verdict_is_recorded_but_run_completes() -> Result<()> {
    let mut script = full_run_script();
    script[4] = ScriptedReply::Text(logic_reply(false, "Slot 1 must use the lead magnet"));
    let studio = studio_with_topics("invalid-verdict", 1, MockDriver::new(script))?;

    let outcome = studio.run_protocol(1).await?;
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(studio.validation_status(), ValidationStatus::Invalid);
    assert!(studio.ledger().is_completed(1));

    let log = studio.log();
    assert!(log.entries().iter().any(|e| {
        *e.level() == LogLevel::Error
            && e.message().contains("Slot 1 must use the lead magnet")
    }));
    Ok(())
}

#[tokio::test]
async fn malformed_research_falls_back_and_run_continues() -> Result<()> {
    let mut script = full_run_script();
    script[0] = ScriptedReply::Text("no structured data here at all".to_string());
    let studio = studio_with_topics("research-fallback", 1, MockDriver::new(script))?;

    let outcome = studio.run_protocol(1).await?;
    assert_eq!(outcome, RunOutcome::Completed);

    let seo = studio.blueprint().seo.unwrap();
    assert!(seo.keywords.is_empty());
    assert_eq!(seo.selected_title, RESEARCH_FALLBACK_TITLE);
    Ok(())
}

#[tokio::test]
async fn second_invocation_while_running_is_ignored() -> Result<()> {
    let gate = Arc::new(Semaphore::new(0));
    let mut script = full_run_script();
    script[0] = ScriptedReply::GatedText(
        Arc::clone(&gate),
        research_reply("Sourdough in 5 Minutes"),
    );
    let studio = Arc::new(studio_with_topics("busy-guard", 1, MockDriver::new(script))?);

    let runner = {
        let studio = Arc::clone(&studio);
        tokio::spawn(async move { studio.run_protocol(1).await })
    };

    // Let the run reach the gated research call
    while !studio.is_busy() {
        tokio::task::yield_now().await;
    }

    assert_eq!(studio.run_protocol(1).await?, RunOutcome::Busy);
    assert_eq!(studio.unlock_next_phase().await?, RunOutcome::Busy);

    gate.add_permits(1);
    let outcome = runner.await??;
    assert_eq!(outcome, RunOutcome::Completed);
    assert!(!studio.is_busy());
    Ok(())
}

#[tokio::test]
async fn unknown_slot_is_a_caller_error() -> Result<()> {
    let studio = studio_with_topics("unknown-slot", 2, MockDriver::new(full_run_script()))?;
    assert!(studio.run_protocol(9).await.is_err());
    assert!(!studio.is_busy(), "flag released on the error path");
    Ok(())
}

#[tokio::test]
async fn unlock_extends_ledger_by_exactly_one_phase() -> Result<()> {
    let script = vec![ScriptedReply::Text(strategist_reply(6))];
    let studio = studio_with_topics("unlock", 5, MockDriver::new(script))?;

    let outcome = studio.unlock_next_phase().await?;
    assert_eq!(outcome, RunOutcome::Completed);

    let ledger = studio.ledger();
    assert_eq!(ledger.last_slot(), 10);
    assert_eq!(
        ledger.topics().keys().copied().collect::<Vec<_>>(),
        (1..=10).collect::<Vec<_>>()
    );
    Ok(())
}

#[tokio::test]
async fn unlock_halts_on_wrong_strategist_range() -> Result<()> {
    // Covers slots 7..=11 instead of 6..=10
    let script = vec![ScriptedReply::Text(strategist_reply(7))];
    let studio = studio_with_topics("unlock-range", 5, MockDriver::new(script))?;

    let outcome = studio.unlock_next_phase().await?;
    assert_eq!(outcome, RunOutcome::Halted);
    assert_eq!(studio.ledger().last_slot(), 5, "ledger untouched");
    Ok(())
}

#[tokio::test]
async fn phase_completion_exposes_unlock_capability() -> Result<()> {
    // Five consecutive full runs, one per slot of the first phase
    let script: Vec<ScriptedReply> = (0..5).flat_map(|_| full_run_script()).collect();
    let studio = studio_with_topics("phase-complete", 5, MockDriver::new(script))?;

    for slot in 1..=4 {
        assert_eq!(studio.run_protocol(slot).await?, RunOutcome::Completed);
    }
    assert!(!studio.can_unlock(), "one slot still open");

    assert_eq!(studio.run_protocol(5).await?, RunOutcome::Completed);
    assert!(studio.can_unlock(), "completing the phase exposes the unlock");
    Ok(())
}
