//! Structural clean-up after a mutation
//!
//! - empty tabsets are removed when delete-when-empty applies
//! - empty rows are removed
//! - a row with a single child is replaced by that child (a single row child
//!   is spliced in with its weights rescaled to the removed row's weight)
//! - a root whose only child is a row takes over that row's children and
//!   the window's root orientation flips
//! - an empty main-window root receives a fresh empty tabset, unless its lone
//!   empty tabset is `keep` (it was already empty before the mutation)

use super::attributes::GlobalAttributes;
use super::node::{NodeId, Row, RowChild, TabSet};
use super::window::LayoutWindow;

/// Tidy one window's tree. `fresh_id` supplies ids for synthesized tabsets.
///
/// Returns `false` when a floating window has no tabs left and should close.
pub(crate) fn tidy_window(
    window: &mut LayoutWindow,
    global: &GlobalAttributes,
    keep: Option<&NodeId>,
    fresh_id: &mut dyn FnMut() -> NodeId,
) -> bool {
    let lone_empty = window.is_main()
        && matches!(
            window.root.children.as_slice(),
            [RowChild::Tabset(ts)] if ts.children.is_empty() && Some(&ts.id) == keep
        );
    if !lone_empty {
        tidy_row(&mut window.root, global);
    }

    loop {
        let single_row = window.root.children.len() == 1
            && matches!(window.root.children[0], RowChild::Row(_));
        if !single_row {
            break;
        }
        if let Some(RowChild::Row(inner)) = window.root.children.pop() {
            window.root.children = inner.children;
            window.root_orientation = window.root_orientation.flip();
        }
    }

    if !window.is_main() && window.root.tab_count() == 0 {
        return false;
    }

    if window.root.children.is_empty() {
        let tabset = TabSet::new(fresh_id());
        window.active_tabset = Some(tabset.id.clone());
        window.root.children.push(RowChild::Tabset(tabset));
    }

    window.prune_references();
    true
}

fn tidy_row(row: &mut Row, global: &GlobalAttributes) {
    for child in &mut row.children {
        if let RowChild::Row(inner) = child {
            tidy_row(inner, global);
        }
    }

    let mut i = 0;
    while i < row.children.len() {
        let fix = match &row.children[i] {
            RowChild::Tabset(ts) if ts.children.is_empty() && ts.delete_when_empty(global) => {
                Fix::Remove
            }
            RowChild::Row(inner) if inner.children.is_empty() => Fix::Remove,
            RowChild::Row(inner) if inner.children.len() == 1 => Fix::Hoist,
            _ => Fix::Keep,
        };
        match fix {
            Fix::Keep => i += 1,
            Fix::Remove => {
                row.children.remove(i);
            }
            Fix::Hoist => {
                if let RowChild::Row(mut inner) = row.children.remove(i) {
                    hoist_only_child(row, i, inner.weight, inner.children.remove(0));
                }
                // position i is examined again
            }
        }
    }
}

enum Fix {
    Keep,
    Remove,
    Hoist,
}

/// Put the only child of a removed row at `index`, taking over its weight
fn hoist_only_child(row: &mut Row, index: usize, weight: f64, only: RowChild) {
    match only {
        RowChild::Row(grandchild) => {
            let total: f64 = grandchild.children.iter().map(RowChild::weight).sum();
            let count = grandchild.children.len();
            for (j, mut great) in grandchild.children.into_iter().enumerate() {
                let w = if total > 0.0 {
                    weight * great.weight() / total
                } else {
                    weight / count as f64
                };
                great.set_weight(w);
                row.children.insert(index + j, great);
            }
        }
        mut tabset => {
            tabset.set_weight(weight);
            row.children.insert(index, tabset);
        }
    }
}
