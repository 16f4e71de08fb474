//! Setup / family / batch lookup structure.
//!
//! The three rule tables arrive as flat lists. They are joined once, at
//! engine start, into a single read-only index keyed by `(machine, item)`
//! so each step does at most two hash lookups.

use std::collections::HashMap;

use tracing::warn;

use crate::models::{BatchRule, ItemFamily, SetupRule};

/// Rules that apply when `item` runs on `machine`.
#[derive(Debug, Clone, Default)]
pub(crate) struct MachineItemRules {
    /// Explicit changeovers into this item, keyed by the previous item.
    pub setups_from: HashMap<String, SetupRule>,
    /// Batch rule for this item on this machine.
    pub batch: Option<BatchRule>,
}

/// Read-only cost lookup built from the supplied rule tables.
#[derive(Debug, Clone, Default)]
pub struct CostTables {
    rules: HashMap<(String, String), MachineItemRules>,
    family_of: HashMap<String, usize>,
    families: Vec<ItemFamily>,
}

impl CostTables {
    /// Creates empty tables (no setups, no batch rules).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index. Later duplicates replace earlier ones.
    pub fn build(
        setup_rules: &[SetupRule],
        families: &[ItemFamily],
        batch_rules: &[BatchRule],
    ) -> Self {
        let mut rules: HashMap<(String, String), MachineItemRules> = HashMap::new();

        for rule in setup_rules {
            let slot = rules
                .entry((rule.machine_id.clone(), rule.to_item.clone()))
                .or_default();
            if slot
                .setups_from
                .insert(rule.from_item.clone(), rule.clone())
                .is_some()
            {
                warn!(
                    machine = %rule.machine_id,
                    from = %rule.from_item,
                    to = %rule.to_item,
                    "duplicate setup rule, keeping the last one"
                );
            }
        }

        for rule in batch_rules {
            let slot = rules
                .entry((rule.machine_id.clone(), rule.item_id.clone()))
                .or_default();
            if slot.batch.replace(rule.clone()).is_some() {
                warn!(
                    machine = %rule.machine_id,
                    item = %rule.item_id,
                    "duplicate batch rule, keeping the last one"
                );
            }
        }

        let mut family_of = HashMap::new();
        for (idx, family) in families.iter().enumerate() {
            for item in &family.items {
                if let Some(prev) = family_of.insert(item.clone(), idx) {
                    warn!(
                        item = %item,
                        previous = %families[prev].id,
                        current = %family.id,
                        "item listed in several families, keeping the last one"
                    );
                }
            }
        }

        Self {
            rules,
            family_of,
            families: families.to_vec(),
        }
    }

    fn rules_for(&self, machine_id: &str, item_id: &str) -> Option<&MachineItemRules> {
        self.rules
            .get(&(machine_id.to_string(), item_id.to_string()))
    }

    /// Explicit changeover rule, if one exists.
    pub fn setup_rule(
        &self,
        machine_id: &str,
        from_item: &str,
        to_item: &str,
    ) -> Option<&SetupRule> {
        self.rules_for(machine_id, to_item)
            .and_then(|r| r.setups_from.get(from_item))
    }

    /// Batch rule for an item on a machine, if one exists.
    pub fn batch_rule(&self, machine_id: &str, item_id: &str) -> Option<&BatchRule> {
        self.rules_for(machine_id, item_id)
            .and_then(|r| r.batch.as_ref())
    }

    /// Family an item belongs to.
    pub fn family(&self, item_id: &str) -> Option<&ItemFamily> {
        self.family_of.get(item_id).map(|&idx| &self.families[idx])
    }

    /// Number of `(machine, item)` keys with at least one rule.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no setup or batch rule is defined.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
