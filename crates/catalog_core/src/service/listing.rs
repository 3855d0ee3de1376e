//! Paginated and nested views of the category hierarchy.
//!
//! # Responsibility
//! - Serve the flat ordered page: top-level first, then name per direction.
//! - Assemble the nested tree and its indented text rendering.
//!
//! # Invariants
//! - Sibling order matches the flat page: case-insensitive name in the
//!   requested direction, then ascending id.
//! - Tree assembly never enters a node twice, even over corrupt parent links.

use crate::model::category::Category;
use crate::model::page::{Page, PageRequest, SortDirection};
use crate::repo::category_repo::CategoryRepository;
use crate::service::error::CatalogResult;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

const DEPTH_MARKER: &str = "--";

/// Category with its children attached recursively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// Loads one page of categories ordered top-level first.
pub fn list_page<C>(
    categories: &C,
    request: PageRequest,
    direction: SortDirection,
) -> CatalogResult<Page<Category>>
where
    C: CategoryRepository + ?Sized,
{
    let items = categories.list_ordered(request, direction)?;
    let total = categories.count_categories()?;
    Ok(Page::new(items, request, total))
}

/// Builds the full category forest starting at top-level entries.
pub fn build_tree<C>(categories: &C, direction: SortDirection) -> CatalogResult<Vec<CategoryNode>>
where
    C: CategoryRepository + ?Sized,
{
    let mut visited = HashSet::new();
    attach_children(categories, None, direction, &mut visited)
}

fn attach_children<C>(
    categories: &C,
    parent: Option<&Category>,
    direction: SortDirection,
    visited: &mut HashSet<i64>,
) -> CatalogResult<Vec<CategoryNode>>
where
    C: CategoryRepository + ?Sized,
{
    let mut siblings = categories.list_children(parent.map(|category| category.id))?;
    sort_siblings(&mut siblings, direction);

    let mut nodes = Vec::with_capacity(siblings.len());
    for category in siblings {
        if !visited.insert(category.id) {
            continue;
        }
        let children = attach_children(categories, Some(&category), direction, visited)?;
        nodes.push(CategoryNode { category, children });
    }
    Ok(nodes)
}

/// Sorts siblings by ASCII case-insensitive name in `direction`, then by id.
pub fn sort_siblings(siblings: &mut [Category], direction: SortDirection) {
    siblings.sort_by(|left, right| compare_siblings(left, right, direction));
}

fn compare_siblings(left: &Category, right: &Category, direction: SortDirection) -> Ordering {
    let by_name = left
        .name
        .to_ascii_lowercase()
        .cmp(&right.name.to_ascii_lowercase());
    let by_name = match direction {
        SortDirection::Asc => by_name,
        SortDirection::Desc => by_name.reverse(),
    };
    by_name.then(left.id.cmp(&right.id))
}

/// Renders one line per node, prefixed by `--` per depth level.
pub fn render_hierarchy(nodes: &[CategoryNode]) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(nodes, 0, &mut lines);
    lines
}

fn push_lines(nodes: &[CategoryNode], depth: usize, lines: &mut Vec<String>) {
    for node in nodes {
        lines.push(format!("{}{}", DEPTH_MARKER.repeat(depth), node.category.name));
        push_lines(&node.children, depth + 1, lines);
    }
}
