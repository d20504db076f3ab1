use std::fs;
use std::path::Path;

use tq_core::{
    Character, Environment, Game, GameId, Item, MapLocation, Objective, Player, PlayerLocation,
    Realm, RealmId,
};
use tq_engine::plugin::{Attributes, BehaviorName, BehaviorSpec, Category, Manifest, ModuleSpec};
use tq_engine::{JsonFileStore, Store};

pub async fn run(dir: &Path) -> Result<(), String> {
    if dir.exists() {
        return Err(format!("directory '{}' already exists", dir.display()));
    }
    fs::create_dir_all(dir).map_err(|e| format!("cannot create directory: {e}"))?;

    let manifest = sample_manifest()
        .to_json_pretty()
        .map_err(|e| format!("cannot render plugins.json: {e}"))?;
    fs::write(dir.join("plugins.json"), manifest)
        .map_err(|e| format!("cannot write plugins.json: {e}"))?;

    let realm = sample_realm();
    let game = sample_game(&realm);
    let store = JsonFileStore::new(dir);
    store
        .save_game(&game)
        .await
        .map_err(|e| format!("cannot write game: {e}"))?;
    store
        .save_realm(&realm)
        .await
        .map_err(|e| format!("cannot write realm: {e}"))?;

    println!("Created game '{}' in {}/", game.name, dir.display());
    println!("  plugins.json           behaviors and catalog");
    println!("  games/{}.json", game.id);
    println!("  realms/{}.json", realm.id);
    println!();
    println!("Get started:");
    println!("  tq play -d {}", dir.display());
    println!("  tq status -d {}", dir.display());

    Ok(())
}

fn meadow() -> Environment {
    Environment::new("meadow", "terrain", "plains")
}

fn forest() -> Environment {
    Environment::new("forest", "terrain", "woods")
}

fn coin() -> Item {
    Item::new("coin", "loot", "valuables")
}

fn sample_realm() -> Realm {
    let mut realm = Realm::new(RealmId::new(), "Hollow Vale", 3, 3);
    for x in 0..3 {
        for y in 0..3 {
            let environment = if y == 2 { forest() } else { meadow() };
            realm = realm.with_location(MapLocation::new(x, y, environment));
        }
    }

    if let Some(origin) = realm.location_at_mut(0, 0) {
        origin.items.push(Item::new("short sword", "arms", "blades"));
        origin.items.push(Item::new("food", "loot", "provisions"));
    }
    if let Some(field) = realm.location_at_mut(1, 0) {
        field.items.extend([coin(), coin()]);
    }
    if let Some(market) = realm.location_at_mut(0, 1) {
        market.characters.push(
            Character::new("merchant", "folk", "traders", 10, 1)
                .with_item(Item::new("healing potion", "loot", "potions")),
        );
    }
    if let Some(lair) = realm.location_at_mut(1, 1) {
        lair.characters.push(
            Character::new("Giant", "creatures", "giants", 30, 6)
                .with_item(Item::new("club", "arms", "clubs")),
        );
        lair.characters.push(
            Character::new("night spider", "creatures", "spiders", 4, 3)
                .with_drop(Item::new("spider silk", "loot", "valuables")),
        );
    }

    realm
        .with_objective(Objective::new(Objective::START_AT, "quests", "travel"))
        .with_objective(
            Objective::new("Navigate to", "quests", "travel").with_param("location", "2_2"),
        )
        .with_objective(
            Objective::new("Acquire item", "quests", "hoard")
                .with_param("item", "coin")
                .with_param("count", "2"),
        )
        .with_objective(
            Objective::new("Acquire from", "quests", "deeds")
                .with_param("item", "club")
                .with_param("reason", "take from")
                .with_param("from", "Giant"),
        )
}

fn sample_game(realm: &Realm) -> Game {
    let player = Player::new(
        "Wanderer",
        20,
        2,
        PlayerLocation {
            realm_id: realm.id,
            x: 0,
            y: 0,
        },
    );
    Game::new(GameId::new(), "The Hollow Vale", player).with_realm(realm.id, &realm.name)
}

fn sample_manifest() -> Manifest {
    Manifest::default()
        .with_module(
            ModuleSpec::new("terrain", "plains", Category::Environment).with_attributes(
                Attributes::new("meadow").with_description("Tall grass sways around you."),
            ),
        )
        .with_module(
            ModuleSpec::new("terrain", "woods", Category::Environment).with_attributes(
                Attributes::new("forest").with_description("Old pines close in overhead."),
            ),
        )
        .with_module(
            ModuleSpec::new("arms", "blades", Category::Item)
                .with_attributes(Attributes::new("short sword").with_damage(5))
                .with_handler("use", BehaviorSpec::new(BehaviorName::Accept)),
        )
        .with_module(
            ModuleSpec::new("arms", "clubs", Category::Item)
                .with_attributes(Attributes::new("club").with_damage(4))
                .with_handler("use", BehaviorSpec::new(BehaviorName::Accept)),
        )
        .with_module(
            ModuleSpec::new("folk", "traders", Category::Character)
                .with_handler("buy from", BehaviorSpec::sell("coin"))
                .with_handler("give", BehaviorSpec::new(BehaviorName::Accept)),
        )
        .with_module(
            ModuleSpec::new("creatures", "giants", Category::Character)
                .with_handler("give", BehaviorSpec::new(BehaviorName::Accept))
                .with_handler(
                    "take from",
                    BehaviorSpec::new(BehaviorName::Refuse)
                        .with_message("The Giant clutches its club tighter."),
                ),
        )
        .with_module(ModuleSpec::new("creatures", "spiders", Category::Character))
        .with_module(
            ModuleSpec::new("quests", "travel", Category::Objective)
                .with_objective(BehaviorSpec::new(BehaviorName::NavigateTo)),
        )
        .with_module(
            ModuleSpec::new("quests", "hoard", Category::Objective)
                .with_objective(BehaviorSpec::new(BehaviorName::AcquireItem)),
        )
        .with_module(
            ModuleSpec::new("quests", "deeds", Category::Objective)
                .with_objective(BehaviorSpec::new(BehaviorName::AcquireFrom)),
        )
}
