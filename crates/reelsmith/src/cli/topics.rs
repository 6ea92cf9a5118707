//! Topic ledger command handlers. These work on the ledger document
//! directly and need no API key.

use reelsmith_error::ReelsmithResult;
use reelsmith_pipeline::{LedgerStore, PHASE_SIZE};

use reelsmith::Settings;

/// Append one topic to the ledger.
pub fn add_topic(settings: &Settings, label: &str) -> ReelsmithResult<()> {
    let store = LedgerStore::new(settings.ledger_path());
    let mut ledger = store.load()?;
    let slot = ledger.add_topic(label);
    store.save(&mut ledger)?;
    println!("Added slot {slot}: {label}");
    Ok(())
}

/// Print the ledger with completion markers, grouped by phase.
pub fn list_topics(settings: &Settings) -> ReelsmithResult<()> {
    let store = LedgerStore::new(settings.ledger_path());
    let ledger = store.load()?;

    if ledger.topics().is_empty() {
        println!("No topics planned yet. Add one with `reelsmith add-topic`.");
        return Ok(());
    }

    for (slot, label) in ledger.topics() {
        if (slot - 1) % PHASE_SIZE == 0 {
            println!("Phase {}:", (slot - 1) / PHASE_SIZE + 1);
        }
        let marker = if ledger.is_completed(*slot) { "x" } else { " " };
        println!("  [{marker}] {slot}. {label}");
    }

    if ledger.current_phase_complete() {
        println!("\nPhase complete. Run `reelsmith unlock` to plan the next five topics.");
    }
    Ok(())
}
