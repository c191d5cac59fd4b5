use std::path::Path;

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use delve_core::{ActionType, PlayerId, RoomCategory, SessionStatus};
use delve_engine::SessionManager;

/// How the simulated player picks an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Fight in combat rooms, search in search rooms
    Room,
    /// Always fight
    Combat,
    /// Always search
    Search,
    /// Always flee
    Flee,
    /// Pick uniformly at random
    Random,
}

#[derive(Debug, Default)]
struct Summary {
    runs: usize,
    completed: usize,
    failed: usize,
    rooms_cleared: u64,
    total_score: i64,
    best: Option<i64>,
    worst: Option<i64>,
}

impl Summary {
    fn record(&mut self, status: SessionStatus, score: i64, rooms: u32) {
        self.runs += 1;
        match status {
            SessionStatus::Completed => self.completed += 1,
            SessionStatus::Failed => self.failed += 1,
            SessionStatus::InProgress | SessionStatus::Abandoned => {}
        }
        self.rooms_cleared += u64::from(rooms);
        self.total_score += score;
        self.best = Some(self.best.map_or(score, |b| b.max(score)));
        self.worst = Some(self.worst.map_or(score, |w| w.min(score)));
    }

    fn rate(&self, count: usize) -> String {
        if self.runs == 0 {
            return "--".to_string();
        }
        format!("{:.1}%", count as f64 * 100.0 / self.runs as f64)
    }

    fn mean(&self, total: f64) -> String {
        if self.runs == 0 {
            return "--".to_string();
        }
        format!("{:.1}", total / self.runs as f64)
    }
}

pub fn run(
    runs: usize,
    strategy: Strategy,
    seed: u64,
    rewards: Option<&Path>,
    rooms: Option<&Path>,
) -> Result<(), String> {
    if runs == 0 {
        return Err("--runs must be at least 1".to_string());
    }

    let manager = super::build_engine(rewards, rooms, Some(seed))?;
    let mut picker = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut summary = Summary::default();

    for _ in 0..runs {
        let (status, score, cleared) = play_one(&manager, strategy, &mut picker)?;
        summary.record(status, score, cleared);
    }

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({runs} sessions, strategy={strategy:?}, seed={seed})").dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Completed".to_string(), summary.rate(summary.completed)]);
    table.add_row(vec!["Failed".to_string(), summary.rate(summary.failed)]);
    table.add_row(vec![
        "Mean score".to_string(),
        summary.mean(summary.total_score as f64),
    ]);
    table.add_row(vec![
        "Best score".to_string(),
        summary.best.map_or("--".to_string(), |s| s.to_string()),
    ]);
    table.add_row(vec![
        "Worst score".to_string(),
        summary.worst.map_or("--".to_string(), |s| s.to_string()),
    ]);
    table.add_row(vec![
        "Mean rooms cleared".to_string(),
        summary.mean(summary.rooms_cleared as f64),
    ]);

    println!("{table}");
    Ok(())
}

fn play_one(
    manager: &SessionManager,
    strategy: Strategy,
    picker: &mut StdRng,
) -> Result<(SessionStatus, i64, u32), String> {
    let session = manager
        .create_session(PlayerId::new())
        .map_err(|e| e.to_string())?;
    let rooms = manager
        .session_rooms(session.id)
        .map_err(|e| e.to_string())?;

    let mut current = session;
    while manager.can_continue(&current) {
        let category = rooms
            .get(current.current_room_index as usize)
            .and_then(Option::as_ref)
            .map(|r| r.category);
        let action = pick(strategy, category, picker);
        manager
            .process_action(current.id, action)
            .map_err(|e| e.to_string())?;
        current = manager
            .get_session(current.id)
            .map_err(|e| e.to_string())?;
    }

    Ok((current.status, current.score, current.current_room_index))
}

fn pick(strategy: Strategy, category: Option<RoomCategory>, rng: &mut StdRng) -> ActionType {
    match strategy {
        Strategy::Room => match category {
            Some(RoomCategory::Combat) => ActionType::Combat,
            Some(RoomCategory::Search) => ActionType::Search,
            None => ActionType::Flee,
        },
        Strategy::Combat => ActionType::Combat,
        Strategy::Search => ActionType::Search,
        Strategy::Flee => ActionType::Flee,
        Strategy::Random => ActionType::ALL[rng.random_range(0..ActionType::ALL.len())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_tracks_extremes() {
        let mut s = Summary::default();
        s.record(SessionStatus::Completed, 120, 5);
        s.record(SessionStatus::Failed, -30, 2);
        s.record(SessionStatus::Completed, 45, 5);
        assert_eq!(s.runs, 3);
        assert_eq!(s.completed, 2);
        assert_eq!(s.failed, 1);
        assert_eq!(s.best, Some(120));
        assert_eq!(s.worst, Some(-30));
        assert_eq!(s.rooms_cleared, 12);
        assert_eq!(s.rate(s.completed), "66.7%");
        assert_eq!(s.mean(s.total_score as f64), "45.0");
    }

    #[test]
    fn empty_summary_has_no_rates() {
        let s = Summary::default();
        assert_eq!(s.rate(0), "--");
        assert_eq!(s.mean(0.0), "--");
    }

    #[test]
    fn room_strategy_follows_category() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            pick(Strategy::Room, Some(RoomCategory::Combat), &mut rng),
            ActionType::Combat
        );
        assert_eq!(
            pick(Strategy::Room, Some(RoomCategory::Search), &mut rng),
            ActionType::Search
        );
        assert_eq!(pick(Strategy::Room, None, &mut rng), ActionType::Flee);
        assert_eq!(pick(Strategy::Flee, Some(RoomCategory::Combat), &mut rng), ActionType::Flee);
    }
}
