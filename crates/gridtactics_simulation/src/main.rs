//! Headless симуляция GRIDTACTICS
//!
//! Маленький бой без рендера: герой и Nergal против двух грантов,
//! ввод: seeded random, ход передаёт round-robin.
//! Аргументы: [seed] [ticks] [config.toml]

use gridtactics_simulation::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let ticks: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(3000);

    let config = match args.next() {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("{}: {}", path, err));
                std::process::exit(1);
            }
        },
        None => TacticsConfig::default(),
    };

    println!("Starting GRIDTACTICS headless battle (seed: {})", seed);

    let mut app = create_headless_app_with_config(seed, config.clone());
    app.add_plugins((SimulationPlugin, RoundRobinTurnOrderPlugin, RandomInputPlugin));

    let roster = [
        (1, Faction::Party, "hero", (2, 2), true),
        (2, Faction::Party, "wyvern_lord", (2, 4), true),
        (3, Faction::Enemy, "grunt", (6, 2), false),
        (4, Faction::Enemy, "grunt", (7, 4), false),
    ];

    let mut order = Vec::new();
    let mut factions = Vec::new();
    for (id, faction, key, (x, y), player) in roster {
        let Some(archetype) = UnitArchetype::by_key(key) else {
            log_error(&format!("unknown archetype '{}'", key));
            continue;
        };
        // Маршруты по клику обходят союзников
        let allies = roster
            .iter()
            .filter(|(other, other_faction, ..)| *other != id && *other_faction == faction)
            .map(|(other, ..)| UnitId(*other));
        let bundle = TurnActorBundle::new(
            UnitId(id),
            faction,
            &archetype,
            bevy::prelude::IVec2::new(x, y),
            &config,
        )
        .with_filters(PathingFilters::avoiding(allies));
        let mut entity = app.world_mut().spawn(bundle);
        if player {
            entity.insert(Player);
        }
        order.push(entity.id());
        factions.push(faction);
    }

    {
        let mut ctx = app.world_mut().resource_mut::<TurnContext>();
        ctx.start_battle(order.clone());
        ctx.select(order.first().copied());
    }

    for tick in 0..ticks {
        app.update();

        if tick % 500 == 0 {
            let in_battle = app.world().resource::<TurnContext>().is_battle_active();
            println!(
                "Tick {}: {} entities, battle active: {}",
                tick,
                app.world().entities().len(),
                in_battle
            );
        }
    }

    for (entity, faction) in order.into_iter().zip(factions) {
        match draw_info(app.world(), entity) {
            Some(info) => println!(
                "{:?} [{}]: pos {} hp {:.0}% turn_used {}",
                entity,
                faction.tag(),
                info.position,
                info.health_fraction * 100.0,
                info.turn_used
            ),
            None => println!("{:?} [{}]: defeated", entity, faction.tag()),
        }
    }

    println!("Simulation complete!");
}

fn load_config(path: &str) -> std::result::Result<TacticsConfig, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    Ok(TacticsConfig::from_toml_str(&source)?)
}
