use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use supplygen_core::{
    select_supply, sort_cards, Card, Catalog, RandomizerRule, SessionRegistry, SortKey, Supply,
};
use supplygen_data::{load_catalog, load_expansion_order, load_rule, order_expansions};

const DEFAULT_SEED: u64 = 0x5EED;
const SESSION_ID: &str = "local";
const SAVE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone)]
struct CliOptions {
    cards: PathBuf,
    rule: PathBuf,
    expansions: PathBuf,
    seed: u64,
    count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedSupply {
    version: u32,
    seed: u64,
    cards: Vec<String>,
}

struct App {
    catalog: Catalog,
    rule: RandomizerRule,
    expansion_order: Vec<String>,
    registry: SessionRegistry,
    sort: SortKey,
    target: usize,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", usage());
            std::process::exit(1);
        }
    };
    if let Err(err) = run(options) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn usage() -> &'static str {
    "usage: supplygen [--cards PATH] [--rule PATH] [--expansions PATH] [--seed N] [--count N]"
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        cards: PathBuf::from("assets/cards.json"),
        rule: PathBuf::from("assets/randomizer.json"),
        expansions: PathBuf::from("assets/expansions.json"),
        seed: DEFAULT_SEED,
        count: None,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--cards" => options.cards = PathBuf::from(next_value(&mut iter, "--cards")?),
            "--rule" => options.rule = PathBuf::from(next_value(&mut iter, "--rule")?),
            "--expansions" => {
                options.expansions = PathBuf::from(next_value(&mut iter, "--expansions")?);
            }
            "--seed" => {
                let raw = next_value(&mut iter, "--seed")?;
                options.seed = raw
                    .parse()
                    .map_err(|_| format!("invalid seed: {raw}"))?;
            }
            "--count" => {
                let raw = next_value(&mut iter, "--count")?;
                options.count = Some(raw.parse().map_err(|_| format!("invalid count: {raw}"))?);
            }
            "--help" | "-h" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => return Err(format!("unknown option {other}")),
        }
    }
    Ok(options)
}

fn next_value<'a>(
    iter: &mut std::slice::Iter<'a, String>,
    flag: &str,
) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn run(options: CliOptions) -> Result<(), String> {
    let catalog = load_catalog(&options.cards).map_err(|err| err.to_string())?;
    let rule = if options.rule.exists() {
        load_rule(&options.rule).map_err(|err| err.to_string())?
    } else {
        RandomizerRule::default()
    };
    let expansion_order = if options.expansions.exists() {
        let order = load_expansion_order(&options.expansions).map_err(|err| err.to_string())?;
        order_expansions(&catalog.expansions(), &order)
    } else {
        catalog.expansions()
    };

    let target = options.count.unwrap_or(rule.target_count);
    let mut app = App {
        catalog,
        rule,
        expansion_order,
        registry: SessionRegistry::new(),
        sort: SortKey::Cost,
        target,
    };
    app.registry
        .create(SESSION_ID, Supply::default(), options.seed)
        .map_err(|err| err.to_string())?;

    println!(
        "loaded {} cards across {} expansions (seed {})",
        app.catalog.len(),
        app.expansion_order.len(),
        options.seed
    );
    new_supply(&mut app);
    command_loop(&mut app)
}

fn command_loop(app: &mut App) -> Result<(), String> {
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().map_err(|err| err.to_string())?;
        let mut line = String::new();
        let read = stdin.read_line(&mut line).map_err(|err| err.to_string())?;
        if read == 0 {
            return Ok(());
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = tokens.split_first() else {
            continue;
        };
        match command {
            "show" | "s" => print_supply(app),
            "sort" => set_sort(app, rest),
            "new" | "n" => new_supply(app),
            "reroll" | "r" => reroll(app, rest),
            "blank" | "b" => blank(app, rest),
            "fill" | "f" => fill_empties(app),
            "expansions" | "x" => print_expansions(app),
            "seed" => print_seed(app),
            "save" => save_supply(app, rest),
            "load" | "l" => load_supply(app, rest),
            "help" | "?" => print_help(),
            "quit" | "q" | "exit" => return Ok(()),
            other => println!("unknown command: {other} (try 'help')"),
        }
    }
}

fn print_help() {
    println!("show            print the current supply");
    println!("sort cost|name  change the display ordering");
    println!("new             draw a fresh supply");
    println!("reroll ID...    redraw the named cards, keeping the rest");
    println!("blank ID...     turn the named cards into empty slots");
    println!("fill            redraw cards for the empty slots");
    println!("expansions      list expansions in display order");
    println!("seed            print the session seed");
    println!("save PATH       write the supply to a JSON file");
    println!("load PATH       restore a supply from a JSON file");
    println!("quit            leave");
}

fn session_supply(app: &App) -> &Supply {
    &app.registry.get(SESSION_ID).expect("session exists").supply
}

fn print_supply(app: &App) {
    let supply = session_supply(app);
    let mut cards: Vec<Card> = supply
        .card_ids()
        .iter()
        .filter_map(|id| app.catalog.card_by_id(id).cloned())
        .collect();
    sort_cards(&mut cards, app.sort);
    for card in &cards {
        println!(
            "{:>2}  {:<16} {:<18} {:<12} {}",
            card.cost,
            card.id,
            card.name,
            card.expansion,
            card.categories.join("/")
        );
    }
    for _ in 0..supply.empty_slots() {
        println!(" -  (empty slot)");
    }
}

fn set_sort(app: &mut App, rest: &[&str]) {
    match rest.first() {
        Some(&"cost") => app.sort = SortKey::Cost,
        Some(&"name") => app.sort = SortKey::Name,
        _ => {
            println!("sort cost|name");
            return;
        }
    }
    print_supply(app);
}

fn new_supply(app: &mut App) {
    let spec = app.rule.spec();
    let target = app.target;
    let App { catalog, registry, .. } = &mut *app;
    let session = registry.get_mut(SESSION_ID).expect("session exists");
    match select_supply(&catalog.cards, &[], &HashSet::new(), &spec, target, &mut session.rng) {
        Ok(ids) => {
            session.supply = Supply::from_ids(ids);
            print_supply(app);
        }
        Err(err) => println!("draw failed: {err}"),
    }
}

/// Resolve command arguments against the current supply, complaining about
/// anything that is not an occupied slot.
fn selected_ids(app: &App, rest: &[&str]) -> Option<HashSet<String>> {
    if rest.is_empty() {
        println!("name at least one card id");
        return None;
    }
    let supply = session_supply(app);
    let mut selected = HashSet::new();
    for id in rest {
        if !supply.contains(id) {
            println!("not in the supply: {id}");
            return None;
        }
        selected.insert(id.to_string());
    }
    Some(selected)
}

fn reroll(app: &mut App, rest: &[&str]) {
    let Some(selected) = selected_ids(app, rest) else {
        return;
    };
    let kept: Vec<Card> = session_supply(app)
        .card_ids()
        .iter()
        .filter(|id| !selected.contains(id.as_str()))
        .filter_map(|id| app.catalog.card_by_id(id).cloned())
        .collect();
    let target = kept.len() + selected.len();
    let spec = app.rule.spec();
    let App { catalog, registry, .. } = &mut *app;
    let session = registry.get_mut(SESSION_ID).expect("session exists");
    match select_supply(&catalog.cards, &kept, &selected, &spec, target, &mut session.rng) {
        Ok(ids) => {
            let drawn: Vec<String> = ids[kept.len()..].to_vec();
            session.supply.replace_selected(&selected, drawn);
            print_supply(app);
        }
        Err(err) => println!("reroll failed: {err}"),
    }
}

fn blank(app: &mut App, rest: &[&str]) {
    let Some(selected) = selected_ids(app, rest) else {
        return;
    };
    let session = app.registry.get_mut(SESSION_ID).expect("session exists");
    let blanked = session.supply.blank(&selected);
    println!("blanked {blanked} slots");
    print_supply(app);
}

fn fill_empties(app: &mut App) {
    let empties = session_supply(app).empty_slots();
    if empties == 0 {
        println!("no empty slots");
        return;
    }
    let kept: Vec<Card> = session_supply(app)
        .card_ids()
        .iter()
        .filter_map(|id| app.catalog.card_by_id(id).cloned())
        .collect();
    let target = kept.len() + empties;
    let spec = app.rule.spec();
    let App { catalog, registry, .. } = &mut *app;
    let session = registry.get_mut(SESSION_ID).expect("session exists");
    match select_supply(&catalog.cards, &kept, &HashSet::new(), &spec, target, &mut session.rng) {
        Ok(ids) => {
            let drawn: Vec<String> = ids[kept.len()..].to_vec();
            session.supply.fill_empty(drawn);
            print_supply(app);
        }
        Err(err) => println!("fill failed: {err}"),
    }
}

fn print_expansions(app: &App) {
    for name in &app.expansion_order {
        let count = app
            .catalog
            .cards
            .iter()
            .filter(|card| card.expansion == *name)
            .count();
        println!("{name} ({count} cards)");
    }
}

fn print_seed(app: &App) {
    let session = app.registry.get(SESSION_ID).expect("session exists");
    println!("seed {}", session.rng.seed());
}

fn save_supply(app: &App, rest: &[&str]) {
    let Some(path) = rest.first() else {
        println!("save PATH");
        return;
    };
    let session = app.registry.get(SESSION_ID).expect("session exists");
    let saved = SavedSupply {
        version: SAVE_SCHEMA_VERSION,
        seed: session.rng.seed(),
        cards: session.supply.card_ids(),
    };
    let raw = match serde_json::to_string_pretty(&saved) {
        Ok(raw) => raw,
        Err(err) => {
            println!("save failed: {err}");
            return;
        }
    };
    match std::fs::write(Path::new(path), raw) {
        Ok(()) => println!("saved {} cards to {path}", saved.cards.len()),
        Err(err) => println!("save failed: {err}"),
    }
}

fn load_supply(app: &mut App, rest: &[&str]) {
    let Some(path) = rest.first() else {
        println!("load PATH");
        return;
    };
    let raw = match std::fs::read_to_string(Path::new(path)) {
        Ok(raw) => raw,
        Err(err) => {
            println!("load failed: {err}");
            return;
        }
    };
    let saved: SavedSupply = match serde_json::from_str(&raw) {
        Ok(saved) => saved,
        Err(err) => {
            println!("load failed: {err}");
            return;
        }
    };
    if saved.version != SAVE_SCHEMA_VERSION {
        println!("load failed: unsupported save version {}", saved.version);
        return;
    }
    for id in &saved.cards {
        if !app.catalog.contains(id) {
            println!("load failed: unknown card {id}");
            return;
        }
    }
    let session = app.registry.get_mut(SESSION_ID).expect("session exists");
    session.supply = Supply::from_ids(saved.cards);
    print_supply(app);
}
