use std::io::{self, BufRead, Write};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tq_engine::parser::{VERBS, suggest_verb};
use tq_engine::{ActionResult, GameSession};

use super::{WorldOptions, open, print_result};

const HELP: &str = "\
  move <direction>            north, south, east, west, northeast, ...
  take <item>                 pick something up
  take <item> from <npc>      ask for something a character carries
  buy <item> from <npc>       trade for it
  give <item> to <npc>        hand something over
  drop <item>                 put something down
  use <item>                  equip an item
  fight <npc> [for <item>]    one round of combat
  look | inventory | help | quit

  Pick among several of a kind with an ordinal: take 2nd coin";

pub async fn run(options: &WorldOptions) -> Result<(), String> {
    let (mut session, player) = open(options).await?;

    println!("  {} {}", "Playing".bold(), session.game().name);
    println!("  You are {player}. Type 'help' for commands, 'quit' to exit.\n");
    look(&session);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        match input.to_lowercase().as_str() {
            "" => continue,
            "quit" | "q" => break,
            "help" | "?" => println!("{HELP}"),
            "look" | "l" => look(&session),
            "inventory" | "i" => inventory(&session),
            _ => {
                let outcome = session.route(input, &player).await;
                for result in outcome.envelopes() {
                    print_result(result);
                }
                if let ActionResult::Failure { .. } = outcome.result {
                    hint(input);
                }
                if session.game().player.is_dead() {
                    println!("  {}", "You have fallen.".red().bold());
                }
            }
        }
        println!();
    }

    Ok(())
}

/// Offer the nearest verb when the first word is not one.
fn hint(input: &str) {
    let verb = input.split_whitespace().next().unwrap_or_default();
    if VERBS.contains(&verb.to_lowercase().as_str()) {
        return;
    }
    if let Some(suggestion) = suggest_verb(verb) {
        println!("  Did you mean '{}'?", suggestion.cyan());
    }
}

fn look(session: &GameSession) {
    let at = session.game().player.location;
    let Some(here) = session.realm().location_at(at.x, at.y) else {
        println!("  You are nowhere on the map.");
        return;
    };
    let registry = session.registry();

    println!(
        "  {} ({}, {}), {}",
        session.realm().name.bold(),
        at.x,
        at.y,
        here.environment.kind
    );
    if let Some(description) = registry.environment_description(&here.environment) {
        println!("  {description}");
    }
    if !here.items.is_empty() {
        let names: Vec<String> = here.items.iter().map(|i| registry.item_name(i)).collect();
        println!("  You see: {}", names.join(", "));
    }
    for npc in &here.characters {
        println!(
            "  {} is here ({} health).",
            npc.display_name().bold(),
            npc.health
        );
    }
}

fn inventory(session: &GameSession) {
    let player = &session.game().player;
    if player.inventory.is_empty() {
        println!("  You carry nothing.");
        return;
    }

    let registry = session.registry();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Item", "Damage", "From", ""]);
    for item in &player.inventory {
        let damage = registry
            .item_damage(item)
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        let from = item
            .source
            .as_ref()
            .map_or_else(|| "-".to_string(), |s| format!("{} {}", s.reason.as_str(), s.from));
        let equipped = if player.using == Some(item.id) { "equipped" } else { "" };
        table.add_row(vec![registry.item_name(item), damage, from, equipped.to_string()]);
    }
    println!("{table}");
    println!("  Health: {}", player.health);
}
