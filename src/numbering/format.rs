use std::fmt;

use super::hierarchy::HierarchyGroup;
use crate::model::work_item::WorkItem;

pub const EPIC_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemNumber {
    Epic(u32),
    Task { epic: u32, position: usize },
}

impl ItemNumber {
    pub fn is_epic(&self) -> bool {
        matches!(self, ItemNumber::Epic(_))
    }
}

impl fmt::Display for ItemNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemNumber::Epic(n) => write!(f, "{n}"),
            ItemNumber::Task { epic, position } => write!(f, "{epic}.{position}"),
        }
    }
}

#[derive(Debug)]
pub struct Assignment<'a> {
    pub item: &'a WorkItem,
    pub number: ItemNumber,
}

/// Flatten groups into processing order: each epic followed by its tasks.
pub fn assign_numbers<'a>(groups: &[HierarchyGroup<'a>]) -> Vec<Assignment<'a>> {
    let mut out = Vec::new();
    for (idx, group) in groups.iter().enumerate() {
        let epic = EPIC_STEP * (idx as u32 + 1);
        out.push(Assignment {
            item: group.epic,
            number: ItemNumber::Epic(epic),
        });
        out.extend(group.tasks.iter().enumerate().map(|(i, task)| Assignment {
            item: *task,
            number: ItemNumber::Task {
                epic,
                position: i + 1,
            },
        }));
    }
    out
}

/// Remove a leading `12.` / `12.3.` / `12.3` numbering prefix.
pub fn strip_number_prefix(name: &str) -> &str {
    let Some((head, rest)) = name.split_once(' ') else {
        return name;
    };
    let candidate = head.strip_suffix('.').unwrap_or(head);
    let rest = rest.trim_start();
    if is_number_prefix(candidate) && !rest.is_empty() {
        rest
    } else {
        name
    }
}

fn is_number_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) if first.is_ascii_digit() && last.is_ascii_digit() => {
            bytes.iter().all(|b| b.is_ascii_digit() || *b == b'.')
        }
        _ => false,
    }
}

pub fn numbered_name(number: ItemNumber, name: &str) -> String {
    format!("{number}. {}", strip_number_prefix(name))
}
