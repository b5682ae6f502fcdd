use balanced_collections::{Balance, BalancedMap, OrderedMap};
use log::{info, warn};
use simplelog::{Config, LevelFilter, SimpleLogger};
use std::env;

const LOG_VAR: &str = "BALANCED_COLLECTIONS_LOG";

fn log_level() -> LevelFilter {
    match env::var(LOG_VAR) {
        Ok(level) => level.parse().unwrap_or_else(|_| {
            eprintln!("Unrecognized {} value {:?}, using info.", LOG_VAR, level);
            LevelFilter::Info
        }),
        Err(_) => LevelFilter::Info,
    }
}

fn replay(balance: Balance, removed: &[u32]) {
    let mut map: BalancedMap<u32, String> = BalancedMap::new(balance);
    for key in &[5, 2, 8, 4, 3, 6, 10, 9, 1] {
        map.insert(*key, format!("value {}", key));
    }
    info!("{:?} map after inserts:\n{}", balance, map.dump());

    for key in removed {
        match map.remove(key) {
            Ok(Some(_)) => info!("removed {}", key),
            Ok(None) => warn!("key {} was not in the map", key),
            Err(err) => warn!("could not remove {}: {}", key, err),
        }
    }

    println!("{:?} map:", balance);
    print!("{}", map.dump());
    match map.find(&3) {
        Ok(value) => println!("find(3) = {}", value),
        Err(err) => println!("find(3) failed: {}", err),
    }
    println!();
}

fn main() {
    if let Err(err) = SimpleLogger::init(log_level(), Config::default()) {
        eprintln!("Could not install logger: {}", err);
    }

    replay(Balance::RedBlack, &[6, 9]);
    replay(Balance::Avl, &[6, 9, 5]);
}
