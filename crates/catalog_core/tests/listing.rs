mod common;

use catalog_core::{CategoryDraft, SortDirection};
use common::Catalog;

fn names<'a>(items: impl IntoIterator<Item = &'a catalog_core::Category>) -> Vec<&'a str> {
    items.into_iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn desc_page_lists_top_level_first() {
    let catalog = Catalog::new();
    let service = catalog.categories();

    let a = service.create(CategoryDraft::named("A")).unwrap();
    service.create(CategoryDraft::named("B")).unwrap();
    service
        .create(CategoryDraft::named("C").with_parent(a.id))
        .unwrap();

    let page = service.list_page(Some(0), Some(5), "desc").unwrap();
    assert_eq!(names(&page.items), vec!["B", "A", "C"]);
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 1);

    let page = service.list_page(Some(0), Some(5), "ASC").unwrap();
    assert_eq!(names(&page.items), vec!["A", "B", "C"]);

    let page = service.list_page(None, None, "sideways").unwrap();
    assert_eq!(names(&page.items), vec!["A", "B", "C"]);
}

#[test]
fn pagination_uses_default_size_and_offsets() {
    let catalog = Catalog::new();
    let service = catalog.categories();

    for name in ["g", "f", "e", "d", "c", "b", "a"] {
        service.create(CategoryDraft::named(name)).unwrap();
    }

    let first = service.list_page(None, None, "asc").unwrap();
    assert_eq!(first.size, 5);
    assert_eq!(names(&first.items), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(first.total_items, 7);
    assert_eq!(first.total_pages, 2);

    let second = service.list_page(Some(1), None, "asc").unwrap();
    assert_eq!(names(&second.items), vec!["f", "g"]);

    let beyond = service.list_page(Some(9), Some(5), "asc").unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_items, 7);

    let three = catalog.categories().with_default_page_size(3);
    assert_eq!(three.list_page(None, None, "asc").unwrap().items.len(), 3);
}

#[test]
fn name_order_is_case_insensitive_with_id_tie_break() {
    let catalog = Catalog::new();
    let service = catalog.categories();

    let music = service.create(CategoryDraft::named("music")).unwrap();
    service.create(CategoryDraft::named("Books")).unwrap();
    service
        .create(CategoryDraft::named("zines").with_parent(music.id))
        .unwrap();
    service
        .create(CategoryDraft::named("Audio").with_parent(music.id))
        .unwrap();

    let page = service.list_page(None, Some(10), "asc").unwrap();
    assert_eq!(names(&page.items), vec!["Books", "music", "Audio", "zines"]);

    let page = service.list_page(None, Some(10), "desc").unwrap();
    assert_eq!(names(&page.items), vec!["music", "Books", "zines", "Audio"]);
}

#[test]
fn tree_nests_children_and_sorts_siblings_by_direction() {
    let catalog = Catalog::new();
    let service = catalog.categories();

    let raiz = service.create(CategoryDraft::named("Raiz")).unwrap();
    let filho = service
        .create(CategoryDraft::named("Filho").with_parent(raiz.id))
        .unwrap();
    service
        .create(CategoryDraft::named("Neto").with_parent(filho.id))
        .unwrap();
    service
        .create(CategoryDraft::named("Irmao").with_parent(raiz.id))
        .unwrap();
    service.create(CategoryDraft::named("Outra")).unwrap();

    let tree = service.tree(SortDirection::Asc).unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].category.name, "Outra");
    assert_eq!(tree[1].category.name, "Raiz");
    let children: Vec<&str> = tree[1]
        .children
        .iter()
        .map(|node| node.category.name.as_str())
        .collect();
    assert_eq!(children, vec!["Filho", "Irmao"]);
    assert_eq!(tree[1].children[0].children[0].category.name, "Neto");

    assert_eq!(
        service.hierarchy_text(SortDirection::Desc).unwrap(),
        "Raiz\n--Irmao\n--Filho\n----Neto\nOutra"
    );
}

#[test]
fn tree_view_serializes_nested_children() {
    let catalog = Catalog::new();
    let service = catalog.categories();

    let raiz = service.create(CategoryDraft::named("Raiz")).unwrap();
    service
        .create(CategoryDraft::named("Filho").with_parent(raiz.id))
        .unwrap();

    let tree = service.tree(SortDirection::Asc).unwrap();
    let json = serde_json::to_value(service.tree_view(&tree)).unwrap();
    assert_eq!(json[0]["name"], "Raiz");
    assert_eq!(json[0]["image_url"], serde_json::Value::Null);
    assert_eq!(json[0]["children"][0]["name"], "Filho");
    assert_eq!(json[0]["children"][0]["parent_id"], raiz.id);
}
