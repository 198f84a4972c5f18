//! Rule diff between desired and live entries
//!
//! Rule numbers are the only identity within a direction. Entries present on
//! both sides are replaced unconditionally, without comparing content.

use crate::action::Action;
use crate::model::{Direction, LiveRuleEntry, RESERVED_RULE_NUMBER, RuleEntry};
use std::collections::{BTreeSet, HashMap};

/// Drop earlier duplicates of the same (direction, number), keeping the last.
///
/// The surviving rules stay in input order.
pub fn dedup_rules(rules: Vec<RuleEntry>) -> Vec<RuleEntry> {
    let last: HashMap<(Direction, i32), usize> = rules
        .iter()
        .enumerate()
        .map(|(i, r)| ((r.direction, r.number), i))
        .collect();

    rules
        .into_iter()
        .enumerate()
        .filter_map(|(i, rule)| {
            if last[&(rule.direction, rule.number)] == i {
                Some(rule)
            } else {
                tracing::warn!(
                    "Duplicate {} rule #{} in desired state, a later definition wins",
                    rule.direction,
                    rule.number
                );
                None
            }
        })
        .collect()
}

/// Compute the entry actions that turn `current` into `desired`.
///
/// Ingress is processed before egress. Within a direction, creates and
/// replaces follow desired order and deletes follow ascending rule number.
pub fn diff_rules(desired: &[RuleEntry], current: &[LiveRuleEntry]) -> Vec<Action> {
    let mut actions = Vec::new();

    for direction in Direction::ALL {
        actions.extend(diff_direction(direction, desired, current));
    }

    actions
}

fn diff_direction(
    direction: Direction,
    desired: &[RuleEntry],
    current: &[LiveRuleEntry],
) -> Vec<Action> {
    let current_numbers: BTreeSet<i32> = current
        .iter()
        .filter(|e| e.direction == direction)
        .map(|e| e.number)
        .collect();
    let mut retained = BTreeSet::new();
    let mut actions = Vec::new();

    for rule in desired.iter().filter(|r| r.direction == direction) {
        if current_numbers.contains(&rule.number) {
            retained.insert(rule.number);
            actions.push(Action::ReplaceEntry(rule.clone()));
        } else {
            actions.push(Action::CreateEntry(rule.clone()));
        }
    }

    for &number in current_numbers.difference(&retained) {
        if number < RESERVED_RULE_NUMBER {
            actions.push(Action::DeleteEntry { number, direction });
        } else {
            tracing::debug!("Leaving reserved {} rule #{} in place", direction, number);
        }
    }

    actions
}
