use std::collections::HashMap;
use thiserror::Error;

/// Default number of variables the table can hold
pub const DEFAULT_CAPACITY: usize = 64;

/// Bytes per memory slot on the target machine
pub const WORD_SIZE: usize = 4;

/// Variables present before any statement runs, each defined as 0
pub const BUILTIN_VARIABLES: [&str; 3] = ["x", "y", "z"];

/// Symbol table error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("Out of memory: cannot register '{name}', table holds {capacity} variables")]
    TableFull { name: String, capacity: usize },
}

/// Variable symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// `None` until the variable is first assigned
    pub value: Option<i32>,
    /// Creation order index, never reused
    pub slot: usize,
}

impl Symbol {
    /// Memory address used by load/store instructions
    #[must_use]
    pub fn address(&self) -> usize {
        self.slot * WORD_SIZE
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

/// Fixed-capacity variable store. Unseen names are registered on first touch.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    capacity: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a table holding at most `capacity` variables, built-ins included.
    /// Built-ins that do not fit are left out.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut table = Self {
            symbols: Vec::new(),
            index: HashMap::new(),
            capacity,
        };
        for name in BUILTIN_VARIABLES.iter().take(capacity) {
            table.symbols.push(Symbol {
                name: (*name).to_string(),
                value: Some(0),
                slot: table.symbols.len(),
            });
            table.index.insert((*name).to_string(), table.symbols.len() - 1);
        }
        table
    }

    /// Find or create the entry for `name`
    fn entry(&mut self, name: &str) -> Result<&mut Symbol, SymbolError> {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                if self.symbols.len() >= self.capacity {
                    return Err(SymbolError::TableFull {
                        name: name.to_string(),
                        capacity: self.capacity,
                    });
                }
                let slot = self.symbols.len();
                self.symbols.push(Symbol {
                    name: name.to_string(),
                    value: None,
                    slot,
                });
                self.index.insert(name.to_string(), slot);
                slot
            }
        };
        Ok(&mut self.symbols[slot])
    }

    /// Current value of `name`, `None` if never assigned
    /// # Errors
    /// If `name` is new and the table is full
    pub fn get(&mut self, name: &str) -> Result<Option<i32>, SymbolError> {
        Ok(self.entry(name)?.value)
    }

    /// Assign `value` to `name` and return it
    /// # Errors
    /// If `name` is new and the table is full
    pub fn set(&mut self, name: &str, value: i32) -> Result<i32, SymbolError> {
        self.entry(name)?.value = Some(value);
        Ok(value)
    }

    /// Stable slot index of `name`
    /// # Errors
    /// If `name` is new and the table is full
    pub fn slot_of(&mut self, name: &str) -> Result<usize, SymbolError> {
        Ok(self.entry(name)?.slot)
    }

    /// Memory address of `name` for load/store instructions
    /// # Errors
    /// If `name` is new and the table is full
    pub fn address_of(&mut self, name: &str) -> Result<usize, SymbolError> {
        Ok(self.entry(name)?.address())
    }

    /// Look up a variable without registering it
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&slot| &self.symbols[slot])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
