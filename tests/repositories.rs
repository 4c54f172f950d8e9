use async_trait::async_trait;
use craftsheet::models::item::{Item, ItemDraft};
use craftsheet::models::recipe::{Ingredient, RecipeDraft};
use craftsheet::models::types::{ItemId, RecipeId};
use craftsheet::repo::{ItemRepo, ItemRepository, RecipeRepo, RecipeRepository, Source};
use craftsheet::sheets::{FetchError, RemoteSheetFetcher, SheetSource, parse_sheet_body};
use craftsheet::store::error::StoreError;
use craftsheet::store::{CsvStore, MemoryStore, Table, TabularStore};
use std::collections::HashSet;
use std::sync::Arc;

const ITEMS_CSV: &str = "\
id,name,description,type,rarity,price,stackable,max_stack,logo_prompt,logo_url
6f1c1f8e-3c59-4a51-9d43-6f3a9a6c2b10,Iron Ore,Raw ore,material,common,5,true,64,,
0b6f4d5e-8f8a-4d0e-a7de-2a3c2f0d9e21,Iron Sword,Sharp,weapon,rare,120,false,1,a sword,
";

const ORE: &str = "6f1c1f8e-3c59-4a51-9d43-6f3a9a6c2b10";
const SWORD: &str = "0b6f4d5e-8f8a-4d0e-a7de-2a3c2f0d9e21";

fn item_id(raw: &str) -> ItemId {
    raw.parse().unwrap()
}

fn draft(name: &str) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        description: "test item".to_string(),
        item_type: "material".to_string(),
        rarity: "common".to_string(),
        price: 3,
        stackable: true,
        max_stack: 99,
        logo_prompt: None,
        logo_url: None,
    }
}

fn recipe_draft(result: ItemId, ingredients: Vec<Ingredient>) -> RecipeDraft {
    RecipeDraft {
        name: "Forge sword".to_string(),
        result_item_id: result,
        result_quantity: 1,
        ingredients,
        crafting_time: 30,
        experience_gain: 15,
    }
}

fn seeded_items() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::seeded(Table::from_csv_str(ITEMS_CSV).unwrap()))
}

const RECIPES_CSV: &str = "\
id,name,result_item_id,result_quantity,required_items,required_quantities,crafting_time,experience_gain
9a0c4e55-1b7e-4c1a-8f61-3d2b7c9e0f42,Forge sword,0b6f4d5e-8f8a-4d0e-a7de-2a3c2f0d9e21,1,6f1c1f8e-3c59-4a51-9d43-6f3a9a6c2b10,3,30,15
";

/// Serves the same body for every sheet name
struct StaticSource(&'static str);

#[async_trait]
impl SheetSource for StaticSource {
    fn describe(&self, sheet: &str) -> String {
        format!("static:{sheet}")
    }

    async fn fetch(&self, _sheet: &str) -> Result<Table, FetchError> {
        parse_sheet_body(self.0)
    }
}

/// Serves a body only for one sheet name
struct NamedSource {
    sheet: &'static str,
    body: &'static str,
}

#[async_trait]
impl SheetSource for NamedSource {
    fn describe(&self, sheet: &str) -> String {
        format!("named:{sheet}")
    }

    async fn fetch(&self, sheet: &str) -> Result<Table, FetchError> {
        if sheet == self.sheet {
            parse_sheet_body(self.body)
        } else {
            Err(FetchError::Status(404))
        }
    }
}

/// Reads like a memory store, but every write fails
struct FailingStore(MemoryStore);

impl TabularStore for FailingStore {
    fn read(&self) -> Result<Option<Table>, StoreError> {
        self.0.read()
    }

    fn write(&self, _table: &Table) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

#[tokio::test]
async fn create_assigns_fresh_id_and_grows_table() {
    let store = seeded_items();
    let repo = ItemRepository::load(None, store.clone()).await.unwrap();
    assert_eq!(repo.source(), Source::LocalFile);

    let before = repo.get_all().await.unwrap().len();
    let created = repo.create(draft("Copper Ore")).await.unwrap();

    assert_eq!(repo.get_all().await.unwrap().len(), before + 1);
    assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(created.clone()));
    assert!(![item_id(ORE), item_id(SWORD)].contains(&created.id));

    // The store holds the new row as well
    assert_eq!(store.snapshot().unwrap().len(), before + 1);
}

#[tokio::test]
async fn delete_then_lookup_is_absent() {
    let repo = ItemRepository::load(None, seeded_items()).await.unwrap();

    assert!(repo.delete(item_id(ORE)).await.unwrap());
    assert_eq!(repo.get_by_id(item_id(ORE)).await.unwrap(), None);
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_ids_leave_table_untouched() {
    let store = seeded_items();
    let repo = ItemRepository::load(None, store.clone()).await.unwrap();
    let unknown = ItemId::new();

    assert!(!repo.delete(unknown).await.unwrap());
    assert_eq!(repo.update(unknown, draft("Ghost")).await.unwrap(), None);
    assert_eq!(repo.get_all().await.unwrap().len(), 2);
    assert_eq!(store.snapshot().unwrap().len(), 2);
}

#[tokio::test]
async fn update_replaces_every_field_but_the_id() {
    let repo = ItemRepository::load(None, seeded_items()).await.unwrap();
    let mut changed = draft("Refined Ore");
    changed.stackable = false;
    changed.logo_url = Some("https://example.com/ore.png".to_string());
    let expected = Item::from_draft(item_id(ORE), changed.clone());

    let updated = repo.update(item_id(ORE), changed).await.unwrap();
    assert_eq!(updated, Some(expected.clone()));
    assert_eq!(repo.get_by_id(item_id(ORE)).await.unwrap(), Some(expected));
    assert_eq!(repo.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn get_by_ids_returns_exactly_the_known_ones() {
    let repo = ItemRepository::load(None, seeded_items()).await.unwrap();
    let missing = ItemId::new();

    let found = repo.get_by_ids(&[item_id(ORE), missing, item_id(SWORD)]).await.unwrap();
    let ids: HashSet<ItemId> = found.iter().map(|item| item.id).collect();
    assert_eq!(found.len(), 2);
    assert_eq!(ids, HashSet::from([item_id(ORE), item_id(SWORD)]));
}

#[tokio::test]
async fn detail_view_reports_dangling_references() {
    let items: Arc<dyn ItemRepo> = Arc::new(ItemRepository::load(None, seeded_items()).await.unwrap());
    let recipes = RecipeRepository::load(None, Arc::new(MemoryStore::new()), items.clone())
        .await
        .unwrap();
    assert_eq!(recipes.source(), Source::Empty);

    let missing = ItemId::new();
    let recipe = recipes
        .create(recipe_draft(
            item_id(SWORD),
            vec![
                Ingredient {
                    item_id: item_id(ORE),
                    quantity: 3,
                },
                Ingredient {
                    item_id: missing,
                    quantity: 1,
                },
            ],
        ))
        .await
        .unwrap();

    assert!(items.delete(item_id(SWORD)).await.unwrap());

    let detailed = recipes.get_by_id_with_details(recipe.id).await.unwrap().unwrap();
    assert_eq!(detailed.recipe, recipe);
    assert_eq!(detailed.result_item, None);
    assert_eq!(detailed.required_item_details.len(), 1);
    assert_eq!(detailed.unresolved_item_ids, vec![missing]);

    assert_eq!(recipes.get_all_with_details().await.unwrap().len(), 1);
    assert_eq!(recipes.get_by_id_with_details(RecipeId::new()).await.unwrap(), None);
}

#[tokio::test]
async fn absent_file_without_remote_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CsvStore::new(dir.path().join("items.csv")));

    let repo = ItemRepository::load(None, store).await.unwrap();
    assert_eq!(repo.source(), Source::Empty);
    assert!(repo.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_file_without_remote_has_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.csv");
    std::fs::write(&path, "").unwrap();

    let repo = ItemRepository::load(None, Arc::new(CsvStore::new(&path))).await.unwrap();
    assert_eq!(repo.source(), Source::LocalFile);
    assert!(repo.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn html_only_remote_falls_back_to_local_file() {
    let fetcher = RemoteSheetFetcher::new(vec![
        Arc::new(StaticSource("<!DOCTYPE html><html><body>Sign in</body></html>")) as Arc<dyn SheetSource>,
        Arc::new(StaticSource("<html><head></head></html>")),
    ]);

    let repo = ItemRepository::load(Some(&fetcher), seeded_items()).await.unwrap();
    assert_eq!(repo.source(), Source::LocalFile);
    assert_eq!(repo.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn usable_remote_wins_over_local_file() {
    let fetcher = RemoteSheetFetcher::new(vec![
        Arc::new(StaticSource("")) as Arc<dyn SheetSource>,
        Arc::new(StaticSource(ITEMS_CSV)),
    ]);

    let store = Arc::new(MemoryStore::seeded(Table::with_columns(&["id", "name"])));
    let repo = ItemRepository::load(Some(&fetcher), store).await.unwrap();
    assert_eq!(repo.source(), Source::Remote);
    assert_eq!(repo.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn changes_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("items.csv");

    let created = {
        let repo = ItemRepository::load(None, Arc::new(CsvStore::new(&path))).await.unwrap();
        repo.create(draft("Copper Ore")).await.unwrap()
    };

    let repo = ItemRepository::load(None, Arc::new(CsvStore::new(&path))).await.unwrap();
    assert_eq!(repo.source(), Source::LocalFile);
    assert_eq!(repo.get_all().await.unwrap(), vec![created]);
}

#[tokio::test]
async fn malformed_local_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.csv");
    std::fs::write(&path, ITEMS_CSV.replace(",5,true,", ",five,true,")).unwrap();

    let store = CsvStore::new(&path);
    assert!(store.read().unwrap().is_some());

    let err = ItemRepository::load(None, Arc::new(store)).await.err().unwrap();
    assert!(matches!(err, StoreError::InvalidCell { column: "price", .. }));
}

#[tokio::test]
async fn remote_tables_of_the_wrong_shape_are_skipped() {
    // The first source always exports the first tab, which holds items
    let fetcher = RemoteSheetFetcher::new(vec![
        Arc::new(StaticSource(ITEMS_CSV)) as Arc<dyn SheetSource>,
        Arc::new(NamedSource {
            sheet: "Recipes",
            body: RECIPES_CSV,
        }),
    ]);

    let items: Arc<dyn ItemRepo> = Arc::new(ItemRepository::load(Some(&fetcher), Arc::new(MemoryStore::new())).await.unwrap());
    let recipes = RecipeRepository::load(Some(&fetcher), Arc::new(MemoryStore::new()), items)
        .await
        .unwrap();

    assert_eq!(recipes.source(), Source::Remote);
    let all = recipes.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].result_item_id, item_id(SWORD));
    assert_eq!(all[0].ingredients, vec![Ingredient { item_id: item_id(ORE), quantity: 3 }]);
}

#[tokio::test]
async fn failed_writes_leave_records_unchanged() {
    let seed = Table::from_csv_str(ITEMS_CSV).unwrap();
    let repo = ItemRepository::load(None, Arc::new(FailingStore(MemoryStore::seeded(seed))))
        .await
        .unwrap();
    let before = repo.get_all().await.unwrap();

    assert!(repo.create(draft("Copper Ore")).await.is_err());
    assert!(repo.update(item_id(ORE), draft("Refined Ore")).await.is_err());
    assert!(repo.delete(item_id(SWORD)).await.is_err());

    assert_eq!(repo.get_all().await.unwrap(), before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_are_all_kept() {
    const WRITERS: usize = 32;

    let store = Arc::new(MemoryStore::new());
    let repo = Arc::new(ItemRepository::load(None, store.clone()).await.unwrap());

    let mut handles = Vec::new();
    for n in 0..WRITERS {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move { repo.create(draft(&format!("Item {n}"))).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let all = repo.get_all().await.unwrap();
    assert_eq!(all.len(), WRITERS);
    assert_eq!(all.iter().map(|item| item.id).collect::<HashSet<_>>().len(), WRITERS);
    assert_eq!(store.snapshot().unwrap().len(), WRITERS);
}
