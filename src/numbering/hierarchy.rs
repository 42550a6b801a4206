use std::collections::HashMap;

use crate::model::work_item::WorkItem;

/// An epic with its direct children, both in ordering-key order.
#[derive(Debug)]
pub struct HierarchyGroup<'a> {
    pub epic: &'a WorkItem,
    pub tasks: Vec<&'a WorkItem>,
}

/// Group a flat task list into epics and their direct subtasks.
///
/// Items whose parent is not an epic in `items` (orphans, grandchildren) are left out.
pub fn organize(items: &[WorkItem]) -> Vec<HierarchyGroup<'_>> {
    let mut epics: Vec<&WorkItem> = Vec::new();
    let mut children: HashMap<&str, Vec<&WorkItem>> = HashMap::new();

    for item in items {
        match item.parent_id() {
            None => epics.push(item),
            Some(parent) => children.entry(parent).or_default().push(item),
        }
    }

    sort_by_order(&mut epics);

    epics
        .into_iter()
        .map(|epic| {
            let mut tasks = children.remove(epic.id.as_str()).unwrap_or_default();
            sort_by_order(&mut tasks);
            HierarchyGroup { epic, tasks }
        })
        .collect()
}

// sort_by is stable, so equal keys keep their input order.
fn sort_by_order(items: &mut [&WorkItem]) {
    items.sort_by(|a, b| a.order_index.total_cmp(&b.order_index));
}
