use arch::word::{Are, Word};
use indexmap::IndexMap;

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Code,
    Data,
    Extern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub address: u16,
    pub feature: Feature,
    pub is_entry: bool,
}

impl Symbol {
    /// Operand word of a direct reference to this symbol.
    pub fn operand_word(&self) -> Word {
        match self.feature {
            Feature::Code | Feature::Data => Word::address(self.address, Are::Relocatable),
            Feature::Extern => Word::address(self.address, Are::External),
        }
    }
}

// ----------------------------------------------------------------------------
// Symbol table

/// Labels in definition order, unique by name.
#[derive(Debug, Clone, Default)]
pub struct Symbols(IndexMap<String, Symbol>);

impl Symbols {
    pub fn new() -> Self {
        Symbols(IndexMap::new())
    }

    pub fn insert(&mut self, name: &str, address: u16, feature: Feature) -> Result<(), ErrorKind> {
        if self.0.contains_key(name) {
            return Err(ErrorKind::LabelAlreadyExists);
        }
        let symbol = Symbol {
            name: name.to_string(),
            address,
            feature,
            is_entry: false,
        };
        self.0.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn mark_entry(&mut self, name: &str) -> Result<(), ErrorKind> {
        match self.0.get_mut(name) {
            Some(symbol) => {
                symbol.is_entry = true;
                Ok(())
            }
            None => Err(ErrorKind::EntryLabelDoesntExist),
        }
    }

    /// Move data symbols behind the code segment.
    pub fn rebase_data(&mut self, offset: u16) {
        self.0
            .values_mut()
            .filter(|symbol| symbol.feature == Feature::Data)
            .for_each(|symbol| symbol.address += offset);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.0.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|symbol| symbol.is_entry)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Extern references

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternEvent {
    pub name: String,
    pub address: u16,
}

/// Every use of an external symbol, in the order they were recorded.
#[derive(Debug, Clone, Default)]
pub struct Externs(Vec<ExternEvent>);

impl Externs {
    pub fn new() -> Self {
        Externs(Vec::new())
    }

    pub fn record(&mut self, name: &str, address: u16) {
        self.0.push(ExternEvent {
            name: name.to_string(),
            address,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternEvent> {
        self.0.iter()
    }

    pub fn latest_first(&self) -> impl Iterator<Item = &ExternEvent> {
        self.0.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
