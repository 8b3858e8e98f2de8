//! Headless Lance Runner
//!
//! Runs a lance through a stretch of campaign days against the in-memory
//! host and prints what became of it.

use std::path::PathBuf;

use clap::Parser;
use lance_sim::core::LanceConfig;
use lance_sim::host::{PlayerRecord, StandaloneHost};
use lance_sim::simulation::{BattleReport, EncounterKind, LanceEvent, LanceSession};
use tracing_subscriber::EnvFilter;

/// Headless Lance Runner - simulate a lance for a number of days
#[derive(Parser, Debug)]
#[command(name = "lance_sim")]
#[command(about = "Simulate a lance of soldiers day by day and print a summary")]
struct Args {
    /// Number of campaign days to simulate
    #[arg(long, default_value_t = 180)]
    days: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML tuning file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// The lord's faction is at war
    #[arg(long)]
    at_war: bool,

    /// Fight a field battle every N days (0 disables battles)
    #[arg(long, default_value_t = 0)]
    battle_every: u32,

    /// Start as a veteran who qualifies for promotion
    #[arg(long)]
    veteran: bool,

    /// Print the final save as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

/// Text-mode run totals
#[derive(Default)]
struct RunTotals {
    injuries: u32,
    deaths: u32,
    cover_requests: u32,
    battles: u32,
    leaders_appointed: u32,
}

impl RunTotals {
    fn tally(&mut self, events: &[LanceEvent]) {
        for event in events {
            match event {
                LanceEvent::Injured { .. } => self.injuries += 1,
                LanceEvent::Died { .. } => self.deaths += 1,
                LanceEvent::CoverRequested { .. } => self.cover_requests += 1,
                LanceEvent::BattleEndured { .. } => self.battles += 1,
                LanceEvent::LeaderAppointed { .. } => self.leaders_appointed += 1,
                _ => {}
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lance_sim=info")))
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => match LanceConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LanceConfig::default(),
    };

    let player = if args.veteran {
        PlayerRecord::veteran()
    } else {
        PlayerRecord::default()
    };
    let mut host = StandaloneHost::enlisted().with_player(PlayerRecord {
        at_war: args.at_war,
        ..player
    });
    let mut session = LanceSession::enlist(config, seed);
    let mut totals = RunTotals::default();

    tracing::info!("Simulating {} days with seed {}", args.days, seed);
    for day in 1..=args.days {
        host.serve_day();
        let events = session.run_daily_tick(&mut host);
        totals.tally(&events);

        if args.battle_every > 0 && day % args.battle_every == 0 {
            let report = BattleReport::new(EncounterKind::FieldBattle, 400, 350);
            let events = session.process_battle_outcome(&mut host, &report);
            totals.tally(&events);
        }

        if session.state().promotion_offered {
            session.accept_promotion(&mut host);
        }
    }

    if args.json {
        match session.save().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode save: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let summary = session.summary();
    println!("=== Lance after {} days (seed {}) ===", args.days, seed);
    println!(
        "Members: {} active, {} available, {} injured, {} on leave",
        summary.total, summary.available, summary.injured, summary.on_leave
    );
    match session.roster().leader() {
        Some(leader) => println!("Leader: {} (tier {})", leader.name, leader.rank_tier()),
        None if session.state().player_leads_lance => println!("Leader: the player"),
        None => println!("Leader: vacant"),
    }
    println!(
        "Injuries: {}  Deaths: {}  Cover requests: {}  Battles: {}  New leaders: {}",
        totals.injuries, totals.deaths, totals.cover_requests, totals.battles, totals.leaders_appointed
    );
    println!("Player notifications: {}", host.inbox.len());

    for member in session.roster().all() {
        let status = if member.is_dead() {
            format!("fallen ({})", member.death_cause().map(|c| c.to_string()).unwrap_or_default())
        } else {
            format!("{} / {:?}", member.health(), member.activity())
        };
        println!(
            "  {:<24} {:<12} tier {}  {:>4} days  {:>3} battles  relation {:>4}  {}",
            member.name,
            member.formation.name(),
            member.rank_tier(),
            member.days_in_service,
            member.battles_participated,
            member.relation(),
            status
        );
    }
}
