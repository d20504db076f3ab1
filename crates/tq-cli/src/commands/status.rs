use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tq_core::Completion;

use super::{WorldOptions, open};

pub async fn run(options: &WorldOptions) -> Result<(), String> {
    let (session, player_name) = open(options).await?;
    let game = session.game();
    let realm = session.realm();
    let player = &game.player;

    println!("  {} ({})", game.name.bold(), game.id);
    println!(
        "  {player_name} in {} at ({}, {}), health {}",
        realm.name, player.location.x, player.location.y, player.health
    );
    let explored = player.visited.get(&realm.id).map_or(0, |v| v.len());
    println!(
        "  Explored {explored} of {} locations, carrying {} items",
        realm.locations.len(),
        player.inventory.len()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Objective", "Details", "Status"]);
    for objective in realm.objectives.iter().filter(|o| !o.is_start()) {
        let details: Vec<String> = objective
            .params
            .iter()
            .map(|p| format!("{}={}", p.name, p.value))
            .collect();
        let status = match objective.completed {
            Completion::Satisfied => "done",
            Completion::Unsatisfied => "open",
            Completion::Unevaluated => "unchecked",
        };
        table.add_row(vec![objective.kind.clone(), details.join(", "), status.to_string()]);
    }
    println!("{table}");

    let done = realm
        .objectives
        .iter()
        .filter(|o| o.completed.is_satisfied())
        .count();
    let total = realm.objectives.iter().filter(|o| !o.is_start()).count();
    println!();
    println!("  {done}/{total} objectives complete");

    Ok(())
}
