mod common;

use catalog_core::{
    resolve_category_ref, CatalogError, CategoryDraft, ProductDraft, SqliteCategoryRepository,
};
use common::mocks::FlakyAssetStore;
use common::{upload, Catalog};

#[test]
fn referenced_category_cannot_be_deleted() {
    let catalog = Catalog::new();
    let categories = catalog.categories();

    let vinyl = categories.create(CategoryDraft::named("Vinyl")).unwrap();
    catalog
        .products()
        .create(ProductDraft::named("Kind of Blue").in_category("Vinyl"))
        .unwrap();

    let err = categories.delete(vinyl.id).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::CategoryInUse { id, ref name } if id == vinyl.id && name == "Vinyl"
    ));
    assert!(matches!(
        categories.can_delete(vinyl.id),
        Err(CatalogError::CategoryInUse { .. })
    ));
    assert_eq!(categories.get(vinyl.id).unwrap(), vinyl);
}

#[test]
fn unreferenced_category_is_deleted_and_no_longer_resolves() {
    let catalog = Catalog::new();
    let categories = catalog.categories();

    let vinyl = categories
        .create(CategoryDraft {
            name: "Vinyl".to_string(),
            image: Some(upload("cover.png", b"png")),
            ..CategoryDraft::default()
        })
        .unwrap();
    catalog
        .products()
        .create(ProductDraft::named("Walkman").in_category("Players"))
        .unwrap();
    assert_eq!(catalog.stored_files().len(), 1);

    categories.can_delete(vinyl.id).unwrap();
    categories.delete(vinyl.id).unwrap();

    assert!(matches!(
        categories.get(vinyl.id),
        Err(CatalogError::NotFound { .. })
    ));
    let repo = SqliteCategoryRepository::try_new(&catalog.conn).unwrap();
    assert!(matches!(
        resolve_category_ref(&repo, &vinyl.id.to_string()),
        Err(CatalogError::CategoryNotFound(_))
    ));
    assert!(catalog.stored_files().is_empty());
}

#[test]
fn category_with_children_cannot_be_deleted() {
    let catalog = Catalog::new();
    let categories = catalog.categories();

    let music = categories.create(CategoryDraft::named("Music")).unwrap();
    let rock = categories
        .create(CategoryDraft::named("Rock").with_parent(music.id))
        .unwrap();

    assert!(matches!(
        categories.delete(music.id),
        Err(CatalogError::CategoryHasChildren(id)) if id == music.id
    ));

    categories.delete(rock.id).unwrap();
    categories.delete(music.id).unwrap();
}

#[test]
fn failed_image_release_does_not_abort_the_delete() {
    let catalog = Catalog::new();
    let flaky = FlakyAssetStore::failing_deletes(&catalog.assets);
    let categories = catalog.categories_with(&flaky);

    let vinyl = categories
        .create(CategoryDraft {
            name: "Vinyl".to_string(),
            image: Some(upload("cover.png", b"png")),
            ..CategoryDraft::default()
        })
        .unwrap();

    categories.delete(vinyl.id).unwrap();

    assert_eq!(flaky.delete_attempts(), 1);
    assert!(categories.get(vinyl.id).is_err());
    // The blob stays behind as an orphan.
    assert_eq!(catalog.stored_files().len(), 1);
}

#[test]
fn deleting_missing_category_is_not_found() {
    let catalog = Catalog::new();
    assert!(matches!(
        catalog.categories().delete(5),
        Err(CatalogError::NotFound { id: 5, .. })
    ));
}
