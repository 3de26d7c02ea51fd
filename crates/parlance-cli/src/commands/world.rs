use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use parlance_core::{Entity, EntityKind};

pub fn run(path: &Path, as_json: bool) -> Result<(), String> {
    let def = super::load_def(path)?;
    let world = def
        .clone()
        .build()
        .map_err(|e| format!("invalid world definition: {e}"))?;

    if as_json {
        let json = serde_json::to_string_pretty(&def).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    let mut entities: Vec<&Entity> = world.entities().collect();
    entities.sort_by_key(|entity| (kind_rank(&entity.kind), entity.name.to_lowercase()));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Kind", "Where", "Traits", "Description"]);

    for entity in &entities {
        let whereabouts = match world.holder(entity.id) {
            Some(holder) if holder == world.player() => "carried".to_string(),
            Some(holder) => world
                .entity(holder)
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            None => "—".to_string(),
        };
        table.add_row(vec![
            entity.name.clone(),
            entity.kind.to_string(),
            whereabouts,
            traits(entity),
            clip(&entity.description),
        ]);
    }

    println!("{table}");
    println!();

    let exits: usize = world
        .locations()
        .iter()
        .map(|location| world.exits_from(location.id).len())
        .sum();
    let start = world
        .start()
        .and_then(|id| world.entity(id))
        .map(|e| e.name.clone())
        .unwrap_or_default();
    println!("  {} entities, {exits} exits | start: {start}", entities.len());

    Ok(())
}

fn kind_rank(kind: &EntityKind) -> u8 {
    match kind {
        EntityKind::Location => 0,
        EntityKind::Character => 1,
        EntityKind::Item => 2,
        EntityKind::Custom(_) => 3,
    }
}

fn traits(entity: &Entity) -> String {
    let caps = &entity.caps;
    let flags = [
        (caps.portable, "portable"),
        (caps.talkable, "talkable"),
        (caps.enterable, "enterable"),
        (caps.container, "container"),
        (caps.light_source, "light source"),
        (caps.device, "device"),
        (caps.plural, "plural"),
        (caps.dark, "dark"),
    ];
    let set: Vec<&str> = flags
        .iter()
        .filter_map(|(on, name)| on.then_some(*name))
        .collect();
    if set.is_empty() {
        "—".to_string()
    } else {
        set.join(", ")
    }
}

fn clip(description: &str) -> String {
    if description.is_empty() {
        return "—".to_string();
    }
    match description.char_indices().nth(57) {
        Some((cut, _)) if description.len() > 60 => format!("{}...", &description[..cut]),
        _ => description.to_string(),
    }
}
