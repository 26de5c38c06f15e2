//! Program price catalogue.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::EngineError;

/// Monthly price of one training program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramPrice {
    pub monthly_rate: Decimal,
    /// Processor price the subscription is created against.
    pub price_id: String,
}

/// Programs by name. Lookups ignore case and surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramCatalog {
    programs: HashMap<String, ProgramPrice>,
}

impl ProgramCatalog {
    pub fn new<I, K>(programs: I) -> Self
    where
        I: IntoIterator<Item = (K, ProgramPrice)>,
        K: AsRef<str>,
    {
        Self {
            programs: programs
                .into_iter()
                .map(|(name, price)| (normalize(name.as_ref()), price))
                .collect(),
        }
    }

    pub fn get(&self, program: &str) -> Option<&ProgramPrice> {
        self.programs.get(&normalize(program))
    }

    /// Price for a member's program, or a validation failure naming it.
    pub fn price_for(&self, program: &str) -> Result<&ProgramPrice, EngineError> {
        self.get(program).ok_or_else(|| {
            EngineError::validation("program", format!("no price configured for program '{}'", program))
        })
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
