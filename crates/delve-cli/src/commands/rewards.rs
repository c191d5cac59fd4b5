use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(file: Option<&Path>, json: bool) -> Result<(), String> {
    let table = super::load_rewards(file)?;
    table.validate().map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&table).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let mut grid = Table::new();
    grid.set_content_arrangement(ContentArrangement::Dynamic);
    grid.set_header(vec!["Field", "Min", "Max"]);
    for (field, range) in table.ranges() {
        grid.add_row(vec![
            field.to_string(),
            range.min().to_string(),
            range.max().to_string(),
        ]);
    }

    println!("{grid}");
    println!();
    println!("  room_count: {}", table.room_count);
    println!("  starting_health: {}", table.starting_health);

    let violations = table.admin_violations();
    if violations.is_empty() {
        println!("  {}", "within admin limits".green());
    } else {
        println!();
        for v in &violations {
            println!("  {}  {v}", "WARN".yellow().bold());
        }
    }

    Ok(())
}
