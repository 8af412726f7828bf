//! Duck Life - headless demo
//!
//! Hatches a duck, lets it live unattended for a few simulated days in hourly
//! steps, and prints what happened. Set RUST_LOG=duck_life=debug for detail.

use chrono::{Duration, Utc};
use clap::Parser;
use std::path::PathBuf;

use duck_life::core::config::load_config;
use duck_life::core::types::MINUTES_PER_DAY;
use duck_life::entity::needs::NeedKind;
use duck_life::simulation::context::{EnvironmentContext, Location, Structure, Weather};
use duck_life::{Creature, CreatureConfig};

/// Run an unattended duck for a number of days
#[derive(Parser, Debug)]
#[command(name = "duck-life")]
#[command(about = "Simulate a virtual pet duck and print its state")]
struct Args {
    /// Name of the duck
    #[arg(long, default_value = "Puddles")]
    name: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated days to run
    #[arg(long, default_value_t = 3.0)]
    days: f64,

    /// Minutes per simulation step
    #[arg(long, default_value_t = 60.0)]
    step: f64,

    /// Optional TOML file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Give the duck a pond to swim in
    #[arg(long)]
    pond: bool,

    /// Keep a storm raging the whole time
    #[arg(long)]
    stormy: bool,

    /// Tend to whichever need becomes urgent
    #[arg(long)]
    caretaker: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> duck_life::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => CreatureConfig::default(),
    };

    let birth = Utc::now() - Duration::minutes((args.days.max(0.0) * MINUTES_PER_DAY) as i64);
    let mut duck = Creature::create_with(args.name.clone(), seed, birth, config);

    let weather = if args.stormy { Weather::Stormy } else { Weather::Sunny };
    let mut env = EnvironmentContext::new(weather, Location::Garden);
    if args.pond {
        env = env.with_structure(Structure::Pond);
    }

    let step = args.step.max(1.0);
    let steps = (args.days.max(0.0) * MINUTES_PER_DAY / step).ceil() as u64;
    let mut actions = 0u32;

    for _ in 0..steps {
        if let Some(transition) = duck.update(step) {
            println!(
                "[{}] {} is now a {}",
                duck.age_string(),
                duck.name(),
                transition.to.display_name()
            );
        }

        if args.caretaker {
            if let Some(urgent) = duck.urgent_need() {
                let interaction = match urgent.need {
                    NeedKind::Hunger => "feed",
                    NeedKind::Energy => "sleep",
                    NeedKind::Fun => "play",
                    NeedKind::Cleanliness => "clean",
                    NeedKind::Social => "talk",
                };
                duck.interact(interaction);
            }
        }

        if let Some(decision) = duck.select_autonomous_action(&env) {
            duck.apply_decision(&decision);
            actions += 1;
            tracing::debug!("{} chose {}", duck.name(), decision.action.name());
        }
    }

    let summary = duck.summary();
    println!();
    println!("{} ({}), {}", summary.name, summary.stage, summary.age);
    println!("Personality: {}", summary.personality);
    println!("Mood: {:?} - {}", summary.mood, summary.mood_description);
    match summary.urgent_need {
        Some(need) => println!("Needs attention: {}", need.key()),
        None => println!("Needs attention: nothing"),
    }
    println!("Autonomous actions taken: {}", actions);

    if args.json {
        println!("{}", duck.to_json()?);
    }

    Ok(())
}
