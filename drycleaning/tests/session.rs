//! Scripted sessions against an in-memory SQLite store.

use drycleaning::store::Direction;
use drycleaning::{
    Collection, DocumentStore, DryCleaningError, Filter, LineConsole, MenuState, Record, Result,
    Session, Sort, SqliteStore,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// Run a whole session fed by `lines`, returning what it printed.
fn run_script(store: &impl DocumentStore, lines: &[&str]) -> String {
    let mut script = lines.join("\n");
    script.push('\n');
    let mut console = LineConsole::scripted(script);
    let mut session = Session::new(store, &mut console);
    session.run().unwrap();
    assert_eq!(session.state(), MenuState::Terminated);
    console.output()
}

/// Lines of output that are printed records.
fn printed_records(output: &str) -> Vec<Value> {
    output
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn names(records: &[Value]) -> Vec<&str> {
    records.iter().map(|r| r["name"].as_str().unwrap()).collect()
}

#[test]
fn add_then_find_returns_what_was_entered() {
    let store = SqliteStore::open_in_memory().unwrap();
    let output = run_script(
        &store,
        &["1", "2", "Ann", "ann@example.com", "4", "Ann", "6", "7"],
    );

    let expected = json!({"name": "Ann", "email": "ann@example.com"});
    let found = store
        .find_first("Customers", &Filter::by_name("Ann"))
        .unwrap()
        .unwrap();
    assert_eq!(Value::Object(found), expected);
    assert_eq!(printed_records(&output), vec![expected]);
    assert!(output.contains("Document added successfully."));
}

#[test]
fn every_collection_stores_its_form_fields() {
    let store = SqliteStore::open_in_memory().unwrap();
    run_script(
        &store,
        &[
            "3", "2", "o-1", "March", "2024-03-01", "6", //
            "4", "2", "Pressing", "7.25", "6", //
            "5", "2", "Bob", "presser", "6", //
            "2", "2", "Empty order", "c-1", "2024-03-02", "N", "6", //
            "7",
        ],
    );

    let first = |collection: &str, name: &str| {
        Value::Object(
            store
                .find_first(collection, &Filter::by_name(name))
                .unwrap()
                .unwrap(),
        )
    };

    assert_eq!(
        first("Invoices", "March"),
        json!({"order_id": "o-1", "name": "March", "date": "2024-03-01", "status": "pending"})
    );
    assert_eq!(first("Services", "Pressing"), json!({"name": "Pressing", "price": 7.25}));
    assert_eq!(first("Employees", "Bob"), json!({"name": "Bob", "position": "presser"}));
    assert_eq!(
        first("Orders", "Empty order"),
        json!({"name": "Empty order", "customer_id": "c-1", "date": "2024-03-02", "items": []})
    );
}

#[test]
fn find_miss_reports_not_found() {
    let store = SqliteStore::open_in_memory().unwrap();
    let output = run_script(&store, &["1", "4", "Nobody", "6", "7"]);
    assert!(output.contains("Document not found."));
    assert!(printed_records(&output).is_empty());
}

#[test]
fn deleting_a_missing_name_reports_success_and_changes_nothing() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert("Customers", record(json!({"name": "Ann"}))).unwrap();

    let output = run_script(&store, &["1", "3", "Zed", "6", "7"]);

    assert!(output.contains("Document deleted successfully."));
    assert_eq!(store.find("Customers", None).unwrap().len(), 1);
}

#[test]
fn delete_removes_only_the_first_duplicate() {
    let store = SqliteStore::open_in_memory().unwrap();
    for position in ["presser", "cashier"] {
        store
            .insert("Employees", record(json!({"name": "Ann", "position": position})))
            .unwrap();
    }

    run_script(&store, &["5", "3", "Ann", "6", "7"]);

    let left = store.find("Employees", None).unwrap();
    assert_eq!(
        left.into_iter().map(Value::Object).collect::<Vec<_>>(),
        vec![json!({"name": "Ann", "position": "cashier"})]
    );
}

#[test]
fn delete_is_case_sensitive() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert("Items", record(json!({"name": "Shirt"}))).unwrap();
    run_script(&store, &["6", "3", "shirt", "6", "7"]);
    assert_eq!(store.find("Items", None).unwrap().len(), 1);
}

#[test]
fn display_all_prints_in_storage_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    for name in ["Zoe", "Ann", "Max"] {
        store.insert("Customers", record(json!({"name": name}))).unwrap();
    }

    let output = run_script(&store, &["1", "1", "6", "7"]);
    assert_eq!(names(&printed_records(&output)), ["Zoe", "Ann", "Max"]);
}

#[test]
fn display_all_on_empty_collection() {
    let store = SqliteStore::open_in_memory().unwrap();
    let output = run_script(&store, &["2", "1", "6", "7"]);
    assert!(output.contains("No documents in Orders."));
}

#[test]
fn sort_orders_ascending_by_the_chosen_field() {
    let store = SqliteStore::open_in_memory().unwrap();
    for (name, price) in [("three", 3), ("one", 1), ("two", 2)] {
        store
            .insert("Services", record(json!({"name": name, "price": price})))
            .unwrap();
    }

    let output = run_script(&store, &["4", "5", "price", "6", "7"]);
    assert_eq!(names(&printed_records(&output)), ["one", "two", "three"]);
}

#[test]
fn sort_by_missing_field_puts_those_records_first() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert("Items", record(json!({"name": "b", "price": 2.0}))).unwrap();
    store.insert("Items", record(json!({"name": "no-price"}))).unwrap();
    store.insert("Items", record(json!({"name": "a", "price": 1.0}))).unwrap();

    let output = run_script(&store, &["6", "5", "price", "6", "7"]);
    assert_eq!(names(&printed_records(&output)), ["no-price", "a", "b"]);
}

#[test]
fn order_embeds_found_items_in_entry_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    let shirt = json!({"name": "Shirt", "description": "Cotton", "price": 5.0});
    let coat = json!({"name": "Coat", "description": "Wool", "price": 12.5});
    store.insert("Items", record(shirt.clone())).unwrap();
    store.insert("Items", record(coat.clone())).unwrap();

    let output = run_script(
        &store,
        &[
            "2", "2", "Smith", "c-42", "2024-05-01", //
            "Y", "Coat", //
            "y", "Scarf", //
            "Y", "Shirt", //
            "n", //
            "6", "7",
        ],
    );

    assert!(output.contains("Item not found. Please enter a valid item name."));
    let order = store
        .find_first("Orders", &Filter::by_name("Smith"))
        .unwrap()
        .unwrap();
    assert_eq!(order["items"], json!([coat, shirt]));
    assert_eq!(order["customer_id"], json!("c-42"));
}

#[test]
fn shirt_order_end_to_end() {
    let store = SqliteStore::open_in_memory().unwrap();
    run_script(
        &store,
        &[
            "6", "2", "Shirt", "Cotton", "5.0", "6", //
            "2", "2", "First order", "c-1", "2024-01-01", "Y", "Shirt", "N", "6", //
            "7",
        ],
    );

    let order = store
        .find_first("Orders", &Filter::by_name("First order"))
        .unwrap()
        .unwrap();
    assert_eq!(
        order["items"],
        json!([{"name": "Shirt", "description": "Cotton", "price": 5.0}])
    );
}

#[test]
fn later_item_changes_do_not_touch_existing_orders() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .insert("Items", record(json!({"name": "Shirt", "price": 5.0})))
        .unwrap();
    run_script(
        &store,
        &[
            "2", "2", "o1", "c-1", "2024-01-01", "Y", "Shirt", "N", "6", //
            "6", "3", "Shirt", "6", //
            "7",
        ],
    );

    assert!(store.find("Items", None).unwrap().is_empty());
    let order = store.find_first("Orders", &Filter::by_name("o1")).unwrap().unwrap();
    assert_eq!(order["items"], json!([{"name": "Shirt", "price": 5.0}]));
}

#[test]
fn bad_menu_answers_reprompt_at_the_same_level() {
    let store = SqliteStore::open_in_memory().unwrap();
    let output = run_script(&store, &["0", "abc", "8", "1", "9", "x", "", "6", "7"]);

    assert_eq!(
        output
            .matches("Invalid collection choice. Please try again.")
            .count(),
        3
    );
    assert_eq!(output.matches("Invalid option. Please try again.").count(), 3);
    assert!(output.contains("Exiting..."));
}

#[test]
fn undecodable_answers_reprompt_instead_of_failing() {
    let store = SqliteStore::open_in_memory().unwrap();
    let script = b"\xff\xfe\n1\n\xff\n2\nAnn\n\xe9@example.com\n6\n7\n".to_vec();
    let mut console = LineConsole::new(std::io::Cursor::new(script), Vec::new());
    let mut session = Session::new(&store, &mut console);
    session.run().unwrap();
    assert_eq!(session.state(), MenuState::Terminated);

    let output = console.output();
    assert_eq!(
        output
            .matches("Invalid collection choice. Please try again.")
            .count(),
        1
    );
    assert_eq!(output.matches("Invalid option. Please try again.").count(), 1);
    assert!(output.contains("Exiting..."));

    let ann = store
        .find_first("Customers", &Filter::by_name("Ann"))
        .unwrap()
        .unwrap();
    assert_eq!(ann["email"], json!("\u{fffd}@example.com"));
}

#[test]
fn input_ending_mid_form_ends_the_session_without_inserting() {
    let store = SqliteStore::open_in_memory().unwrap();
    let output = run_script(&store, &["1", "2", "Ann"]);
    assert!(!output.contains("Exiting..."));
    assert!(store.find("Customers", None).unwrap().is_empty());
}

/// Store whose every call fails.
#[derive(Debug)]
struct BrokenStore;

impl DocumentStore for BrokenStore {
    fn insert(&self, _: &str, _: Record) -> Result<()> {
        Err(DryCleaningError::Conversion("disk on fire".into()))
    }

    fn find(&self, _: &str, _: Option<&Filter>) -> Result<Vec<Record>> {
        Err(DryCleaningError::Conversion("disk on fire".into()))
    }

    fn delete_one(&self, _: &str, _: &Filter) -> Result<u64> {
        Err(DryCleaningError::Conversion("disk on fire".into()))
    }

    fn find_sorted(&self, _: &str, sort: &Sort) -> Result<Vec<Record>> {
        assert_eq!(sort.direction, Direction::Ascending);
        Err(DryCleaningError::Conversion("disk on fire".into()))
    }
}

#[test]
fn store_failures_are_reported_and_the_menu_continues() {
    let output = run_script(
        &BrokenStore,
        &["1", "1", "2", "Ann", "a@b", "3", "Ann", "4", "Ann", "5", "name", "6", "7"],
    );

    assert_eq!(output.matches("disk on fire").count(), 5);
    assert!(!output.contains("Document added successfully."));
    assert!(output.contains("Exiting..."));
}

#[test]
fn collections_are_selected_by_menu_number() {
    let store = SqliteStore::open_in_memory().unwrap();
    for collection in Collection::ALL {
        let mut console = LineConsole::scripted(format!("{}\n", collection.index()));
        let mut session = Session::new(&store, &mut console);
        assert_eq!(
            session.step().unwrap(),
            MenuState::AwaitingOperationChoice(collection)
        );
    }
}
