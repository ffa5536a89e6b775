//! The interactive menu as a state machine.
//!
//! A [`Session`] alternates between the collection menu and the operation
//! menu of the chosen collection until the operator picks exit or input runs
//! out. Bad answers and lookup misses print a message and leave the state
//! unchanged; store failures during an operation are reported the same way.

use tracing::{debug, warn};

use crate::console::Console;
use crate::error::{DryCleaningError, Result};
use crate::formatter::{
    collection_menu, error, format_record, note, operation_menu, success, warning,
};
use crate::forms::{Answer, Answers, NewRecord};
use crate::registry::{Collection, CollectionChoice, FieldKind, FieldSpec, parse_menu_number};
use crate::store::{DocumentStore, Filter, Record, Sort};

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MenuState {
    /// Showing the collection menu.
    AwaitingCollectionChoice,
    /// Showing the operation menu of a collection.
    AwaitingOperationChoice(Collection),
    /// Done.
    Terminated,
}

/// Entry of the operation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Operation {
    /// Print every record.
    DisplayAll,
    /// Prompt for a new record and insert it.
    Add,
    /// Delete the first record with a given name.
    Delete,
    /// Print the first record with a given name.
    Find,
    /// Print every record ordered by a field.
    Sort,
    /// Return to the collection menu.
    Back,
}

impl Operation {
    /// All entries in menu order.
    pub const ALL: [Self; 6] = [
        Self::DisplayAll,
        Self::Add,
        Self::Delete,
        Self::Find,
        Self::Sort,
        Self::Back,
    ];

    /// Operation for a menu number between 1 and 6.
    pub fn from_index(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| DryCleaningError::InvalidMenuChoice(index.to_string()))
    }

    /// Interpret a raw operation menu answer.
    pub fn parse(input: &str) -> Result<Self> {
        parse_menu_number(input).and_then(Self::from_index)
    }

    /// Menu number.
    pub const fn index(self) -> i64 {
        match self {
            Self::DisplayAll => 1,
            Self::Add => 2,
            Self::Delete => 3,
            Self::Find => 4,
            Self::Sort => 5,
            Self::Back => 6,
        }
    }

    /// Menu text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::DisplayAll => "Display all documents",
            Self::Add => "Add a document",
            Self::Delete => "Delete a document",
            Self::Find => "Find a document",
            Self::Sort => "Sort documents",
            Self::Back => "Back to collections",
        }
    }
}

/// One operator session over a store and a console.
#[derive(Debug)]
pub struct Session<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    console: &'a mut C,
    state: MenuState,
}

impl<'a, S, C> Session<'a, S, C>
where
    S: DocumentStore + ?Sized,
    C: Console + ?Sized,
{
    /// Start at the collection menu.
    pub fn new(store: &'a S, console: &'a mut C) -> Self {
        Self {
            store,
            console,
            state: MenuState::AwaitingCollectionChoice,
        }
    }

    /// Current state.
    pub const fn state(&self) -> MenuState {
        self.state
    }

    /// Drive the menus until exit or end of input.
    pub fn run(&mut self) -> Result<()> {
        while self.state != MenuState::Terminated {
            match self.step() {
                Ok(_) => {}
                Err(DryCleaningError::InputClosed) => {
                    debug!(state = ?self.state, "input closed, ending session");
                    self.state = MenuState::Terminated;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Show the current menu, read one answer and act on it.
    pub fn step(&mut self) -> Result<MenuState> {
        self.state = match self.state {
            MenuState::AwaitingCollectionChoice => self.choose_collection()?,
            MenuState::AwaitingOperationChoice(collection) => self.choose_operation(collection)?,
            MenuState::Terminated => MenuState::Terminated,
        };
        Ok(self.state)
    }

    fn say(&mut self, line: &str) -> Result<()> {
        self.console.write_line(line)
    }

    fn say_all(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    fn choose_collection(&mut self) -> Result<MenuState> {
        self.say_all(&collection_menu())?;
        let answer = self.console.read_line()?;
        match CollectionChoice::parse(&answer) {
            Ok(CollectionChoice::Exit) => {
                self.say("Exiting...")?;
                Ok(MenuState::Terminated)
            }
            Ok(CollectionChoice::Open(collection)) => {
                debug!(%collection, "collection selected");
                Ok(MenuState::AwaitingOperationChoice(collection))
            }
            Err(e) => {
                debug!(error = %e, "bad collection choice");
                self.say(&warning("Invalid collection choice. Please try again."))?;
                Ok(MenuState::AwaitingCollectionChoice)
            }
        }
    }

    fn choose_operation(&mut self, collection: Collection) -> Result<MenuState> {
        self.say_all(&operation_menu(collection))?;
        let answer = self.console.read_line()?;
        let operation = match Operation::parse(&answer) {
            Ok(Operation::Back) => return Ok(MenuState::AwaitingCollectionChoice),
            Ok(operation) => operation,
            Err(e) => {
                debug!(error = %e, "bad operation choice");
                self.say(&warning("Invalid option. Please try again."))?;
                return Ok(MenuState::AwaitingOperationChoice(collection));
            }
        };

        match self.execute(collection, operation) {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                warn!(%collection, ?operation, error = %e, "operation failed");
                self.say(&error(&e.to_string()))?;
            }
            Err(e) => return Err(e),
        }
        Ok(MenuState::AwaitingOperationChoice(collection))
    }

    /// Run one operation against `collection`. [`Operation::Back`] does nothing.
    pub fn execute(&mut self, collection: Collection, operation: Operation) -> Result<()> {
        debug!(%collection, ?operation, "execute");
        match operation {
            Operation::DisplayAll => self.display_all(collection),
            Operation::Add => self.add_document(collection),
            Operation::Delete => self.delete_document(collection),
            Operation::Find => self.find_document(collection),
            Operation::Sort => self.sort_documents(collection),
            Operation::Back => Ok(()),
        }
    }

    fn print_records(&mut self, collection: Collection, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return self.say(&note(&format!("No documents in {collection}.")));
        }
        for record in records {
            self.say(&format_record(record)?)?;
        }
        Ok(())
    }

    fn display_all(&mut self, collection: Collection) -> Result<()> {
        let records = self.store.find(collection.name(), None)?;
        self.print_records(collection, &records)
    }

    fn add_document(&mut self, collection: Collection) -> Result<()> {
        let answers = self.read_answers(collection)?;
        let record = NewRecord::from_answers(collection, answers)?.into_record()?;
        self.store.insert(collection.name(), record)?;
        self.say(&success("Document added successfully."))
    }

    fn delete_document(&mut self, collection: Collection) -> Result<()> {
        let name = self.console.prompt("Enter document NAME to delete:")?;
        let deleted = self
            .store
            .delete_one(collection.name(), &Filter::by_name(name))?;
        debug!(%collection, deleted, "delete finished");
        self.say(&success("Document deleted successfully."))
    }

    fn find_document(&mut self, collection: Collection) -> Result<()> {
        let name = self.console.prompt("Enter document name to find:")?;
        match self
            .store
            .find_first(collection.name(), &Filter::by_name(name.as_str()))?
        {
            Some(record) => self.say(&format_record(&record)?),
            None => {
                let miss = DryCleaningError::LookupMiss {
                    collection: collection.name().to_string(),
                    name,
                };
                debug!(%miss, "find");
                self.say(&warning("Document not found."))
            }
        }
    }

    fn sort_documents(&mut self, collection: Collection) -> Result<()> {
        let field = self.console.prompt("Enter field to sort by:")?;
        let records = self
            .store
            .find_sorted(collection.name(), &Sort::ascending(field.trim()))?;
        self.print_records(collection, &records)
    }

    /// Ask every field of `collection`'s form in order.
    fn read_answers(&mut self, collection: Collection) -> Result<Answers> {
        let mut answers = Answers::new();
        for spec in collection.fields() {
            let answer = match spec.kind {
                FieldKind::Text => Answer::Text(self.console.prompt(spec.prompt)?),
                FieldKind::Number => Answer::Number(self.read_number(spec)?),
                FieldKind::EmbeddedItems => Answer::Items(self.add_items_to_order(spec)?),
            };
            answers.push(spec.name, answer);
        }
        Ok(answers)
    }

    /// Ask until the answer parses as a finite number.
    fn read_number(&mut self, spec: &FieldSpec) -> Result<f64> {
        loop {
            let raw = self.console.prompt(spec.prompt)?;
            match parse_number(&raw) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!(field = spec.name, error = %e, "bad number");
                    self.say(&warning("Invalid number. Please enter a numeric value."))?;
                }
            }
        }
    }

    /// Look items up by name and collect copies until the operator answers `N`.
    fn add_items_to_order(&mut self, spec: &FieldSpec) -> Result<Vec<Record>> {
        let mut items = Vec::new();
        loop {
            let choice = self.console.prompt(spec.prompt)?;
            if choice.trim().eq_ignore_ascii_case("n") {
                break;
            }
            let name = self.console.prompt("Enter item name:")?;
            let filter = Filter::by_name(name.as_str());
            match self.store.find_first(Collection::Items.name(), &filter)? {
                Some(item) => {
                    debug!(item = %name, "item added to order");
                    items.push(item);
                }
                None => {
                    self.say(&warning("Item not found. Please enter a valid item name."))?;
                }
            }
        }
        Ok(items)
    }
}

/// Parse a price answer.
fn parse_number(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| DryCleaningError::InvalidNumber(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::LineConsole;
    use crate::store::SqliteStore;

    #[test]
    fn operation_menu_numbers() {
        assert_eq!(Operation::from_index(1).unwrap(), Operation::DisplayAll);
        assert_eq!(Operation::from_index(5).unwrap(), Operation::Sort);
        assert_eq!(Operation::parse("6").unwrap(), Operation::Back);
        for op in Operation::ALL {
            assert_eq!(Operation::from_index(op.index()).unwrap(), op);
        }
        assert!(Operation::from_index(0).is_err());
        assert!(Operation::from_index(7).is_err());
        assert!(Operation::parse("add").is_err());
    }

    #[test]
    fn numbers_must_be_finite() {
        assert_eq!(parse_number(" 5 ").unwrap(), 5.0);
        assert_eq!(parse_number("12.50").unwrap(), 12.5);
        for bad in ["", "five", "NaN", "inf", "1,5"] {
            assert!(matches!(parse_number(bad), Err(DryCleaningError::InvalidNumber(_))));
        }
    }

    #[test]
    fn step_walks_the_state_machine() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut console = LineConsole::scripted("9\n2\n0\n6\n7\n");
        let mut session = Session::new(&store, &mut console);

        assert_eq!(session.state(), MenuState::AwaitingCollectionChoice);
        assert_eq!(session.step().unwrap(), MenuState::AwaitingCollectionChoice);
        assert_eq!(
            session.step().unwrap(),
            MenuState::AwaitingOperationChoice(Collection::Orders)
        );
        assert_eq!(
            session.step().unwrap(),
            MenuState::AwaitingOperationChoice(Collection::Orders)
        );
        assert_eq!(session.step().unwrap(), MenuState::AwaitingCollectionChoice);
        assert_eq!(session.step().unwrap(), MenuState::Terminated);
        assert_eq!(session.step().unwrap(), MenuState::Terminated);
    }

    #[test]
    fn end_of_input_terminates_the_run() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut console = LineConsole::scripted("1\n");
        let mut session = Session::new(&store, &mut console);
        session.run().unwrap();
        assert_eq!(session.state(), MenuState::Terminated);
    }

    #[test]
    fn invalid_price_reprompts() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut console = LineConsole::scripted("Wash\nabc\n4.5\n");
        let mut session = Session::new(&store, &mut console);
        session.execute(Collection::Services, Operation::Add).unwrap();

        let services = store.find("Services", None).unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0]["price"], serde_json::json!(4.5));
        assert!(console.output().contains("Invalid number"));
    }
}
