use std::path::PathBuf;

use colored::Colorize;

use delve_core::{ActionOutcome, ActionType, PlayerId, RoomCategory, RoomDefinition, SessionStatus};
use delve_engine::EngineError;

pub struct PlayOptions {
    pub actions: Vec<String>,
    pub seed: Option<u64>,
    pub abandon_after: Option<usize>,
    pub rewards: Option<PathBuf>,
    pub rooms: Option<PathBuf>,
    pub json: bool,
}

pub fn run(opts: PlayOptions) -> Result<(), String> {
    let manager = super::build_engine(opts.rewards.as_deref(), opts.rooms.as_deref(), opts.seed)?;

    let scripted = opts
        .actions
        .iter()
        .map(|a| a.parse::<ActionType>().map_err(EngineError::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let session = manager
        .create_session(PlayerId::new())
        .map_err(|e| e.to_string())?;
    let rooms = manager
        .session_rooms(session.id)
        .map_err(|e| e.to_string())?;

    if !opts.json {
        println!(
            "  {} {} {}",
            "Session".bold(),
            session.id,
            format!(
                "({} rooms, {} health)",
                session.total_rooms(),
                session.current_health
            )
            .dimmed()
        );
        println!();
    }

    let mut script = scripted.into_iter();
    let mut taken = 0;
    loop {
        let current = manager
            .get_session(session.id)
            .map_err(|e| e.to_string())?;
        if !manager.can_continue(&current) {
            break;
        }
        if opts.abandon_after == Some(taken) {
            manager
                .abandon_session(session.id)
                .map_err(|e| e.to_string())?;
            break;
        }

        let room = rooms
            .get(current.current_room_index as usize)
            .and_then(Option::as_ref);
        let action_type = script.next().unwrap_or_else(|| default_action(room));
        let action = manager
            .process_action(session.id, action_type)
            .map_err(|e| e.to_string())?;
        taken += 1;

        if !opts.json {
            let after = manager
                .get_session(session.id)
                .map_err(|e| e.to_string())?;
            let room_name = room.map(|r| r.name.as_str()).unwrap_or("(removed room)");
            println!(
                "  {} {:<18} {:<7} {} {:>+5} pts {:>+5} hp   {}",
                format!("[{}/{}]", action.room_number, after.total_rooms()).dimmed(),
                room_name,
                action.action_type,
                colorize_outcome(action.outcome),
                action.points_change,
                action.health_change,
                format!("score {} health {}", after.score, after.current_health).dimmed()
            );
        }
    }

    let finished = manager
        .get_session(session.id)
        .map_err(|e| e.to_string())?;
    let unused = script.count();

    if opts.json {
        let actions = manager
            .list_actions(session.id)
            .map_err(|e| e.to_string())?;
        let doc = serde_json::json!({
            "session": finished,
            "actions": actions,
        });
        let out = serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!();
    println!(
        "  {}  score {}, health {}, rooms {}/{}",
        colorize_status(finished.status),
        finished.score,
        finished.current_health,
        finished.current_room_index,
        finished.total_rooms()
    );
    if unused > 0 {
        println!(
            "  {}",
            format!("{unused} scripted action(s) not used").dimmed()
        );
    }

    Ok(())
}

/// The action a room invites when the script has run out.
fn default_action(room: Option<&RoomDefinition>) -> ActionType {
    match room.map(|r| r.category) {
        Some(RoomCategory::Combat) => ActionType::Combat,
        Some(RoomCategory::Search) => ActionType::Search,
        None => ActionType::Flee,
    }
}

fn colorize_outcome(outcome: ActionOutcome) -> colored::ColoredString {
    let label = format!("{outcome:<15}");
    match outcome {
        ActionOutcome::Victory | ActionOutcome::FoundTreasure | ActionOutcome::FoundPotion => {
            label.green()
        }
        ActionOutcome::Defeat | ActionOutcome::TriggeredTrap => label.red(),
        ActionOutcome::Escaped => label.yellow(),
    }
}

fn colorize_status(status: SessionStatus) -> colored::ColoredString {
    let label = status.to_string().to_uppercase();
    match status {
        SessionStatus::Completed => label.green().bold(),
        SessionStatus::Failed => label.red().bold(),
        SessionStatus::Abandoned => label.yellow().bold(),
        SessionStatus::InProgress => label.normal(),
    }
}
