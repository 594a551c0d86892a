//! Stable Matching - Binary Entry Point
//!
//! Generates random preferences, optionally replays the run one proposal at
//! a time, then prints the stable matching and its receipt.

use clap::Parser;
use log::info;
use serde_json::json;

use stable_matching::engine::{advance_step, EngineState, MatchingEngine, StepSnapshot};
use stable_matching::types::{PreferenceModel, PreferenceSource, RandomPreferences};
use stable_matching::SimulationConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SimulationConfig::parse().validate()?;
    info!("generating {} pairs with seed {}", config.pairs, config.seed);

    let model = RandomPreferences::seeded(config.seed).model(config.pairs)?;

    if config.json {
        println!("{}", json!({ "preferences": &model }));
    } else {
        println!("---------------------------------------------------------------------------");
        print!("{}", model);
        println!("---------------------------------------------------------------------------");
    }

    if config.frames {
        replay_frames(&model, config.json)?;
    }

    let mut engine = MatchingEngine::new(&model);
    while engine.step()?.is_some() {}
    let matching = engine.matching()?;
    let receipt = engine.receipt()?;

    if config.json {
        println!(
            "{}",
            json!({
                "matching": &matching,
                "proposals": receipt.proposals,
                "rejections": receipt.rejections,
                "rejection_rate": receipt.rejection_rate(),
                "digest": receipt.digest_hex(),
            })
        );
    } else {
        print!("{}", matching);
        println!("---------------------------------------------------------------------------");
        println!("  Proposals:   {:>8}", receipt.proposals);
        println!("  Rejections:  {:>8}", receipt.rejections);
        if let Some(rate) = receipt.rejection_rate() {
            println!("  Reject rate: {:>8.3}", rate);
        }
        println!("  Digest:      {}", receipt.digest_hex());
    }

    Ok(())
}

/// Print one snapshot per proposal until the run completes.
fn replay_frames(model: &PreferenceModel, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = EngineState::new(model.n());
    let mut cursor = 0;
    let mut target = 0;

    loop {
        target += 1;
        let (next, snapshot) = advance_step(model, state, target, cursor)?;
        state = next;
        cursor = snapshot.inner_cursor;

        if as_json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            print_frame(&snapshot);
        }

        if snapshot.done {
            return Ok(());
        }
    }
}

fn print_frame(snapshot: &StepSnapshot) {
    let n = snapshot.pairs;
    let proposal = match snapshot.last_event {
        Some(event) => format!(
            "{} -> W{} {}",
            event.proposer(),
            event.reviewer().to_raw(n),
            if event.is_accepted() { "accepted" } else { "rejected" }
        ),
        None => "-".to_string(),
    };
    let engaged: Vec<String> = snapshot
        .engagement_log
        .iter()
        .map(|(w, m)| format!("{}-W{}", m, w.to_raw(n)))
        .collect();
    let free: Vec<String> = snapshot.free_proposers().iter().map(|m| m.to_string()).collect();

    println!(
        "step {:>4} | {} | engaged [{}] | free [{}]",
        snapshot.steps_taken,
        proposal,
        engaged.join(" "),
        free.join(" ")
    );
}
