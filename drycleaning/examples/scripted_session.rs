//! Scripted session - runs independently on an in-memory store.
//!
//! Run: `cargo run --example scripted_session`

use anyhow::Result;
use drycleaning::{DocumentStore, Filter, LineConsole, Session, SqliteStore};

/// Add an item, then an order that embeds it, then list the orders.
const SCRIPT: &str = "\
6
2
Shirt
Cotton
5.0
6
2
2
Smith drop-off
c-1
2024-01-01
Y
Shirt
N
1
6
7
";

fn main() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let mut console = LineConsole::scripted(SCRIPT);

    Session::new(&store, &mut console).run()?;
    print!("{}", console.output());

    if let Some(order) = store.find_first("Orders", &Filter::by_name("Smith drop-off"))? {
        println!("\nStored order: {}", serde_json::to_string_pretty(&order)?);
    }
    Ok(())
}
