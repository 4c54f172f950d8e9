use crate::models::types::ItemId;
use crate::store::{Record, RowView, StoreResult};
use serde::{Deserialize, Serialize};

/// Catalog item as served by the API and stored in the items table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    /// Display name (e.g., "Iron Sword")
    pub name: String,
    pub description: String,

    /// Free form category (e.g., "weapon", "material")
    #[serde(rename = "type")]
    pub item_type: String,
    pub rarity: String,
    pub price: i64,

    /// Whether multiple units can share an inventory slot
    pub stackable: bool,
    pub max_stack: i32,

    /// Prompt used to generate the item logo
    #[serde(default)]
    pub logo_prompt: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Item fields as submitted on create and update. The id is assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub rarity: String,
    pub price: i64,
    pub stackable: bool,
    pub max_stack: i32,
    #[serde(default)]
    pub logo_prompt: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Item {
    pub fn from_draft(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            item_type: draft.item_type,
            rarity: draft.rarity,
            price: draft.price,
            stackable: draft.stackable,
            max_stack: draft.max_stack,
            // Empty strings are "no value", the same as on read
            logo_prompt: draft.logo_prompt.filter(|s| !s.is_empty()),
            logo_url: draft.logo_url.filter(|s| !s.is_empty()),
        }
    }
}

impl Record for Item {
    type Id = ItemId;

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "type",
        "rarity",
        "price",
        "stackable",
        "max_stack",
        "logo_prompt",
        "logo_url",
    ];

    fn id(&self) -> ItemId {
        self.id
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.item_type.clone(),
            self.rarity.clone(),
            self.price.to_string(),
            self.stackable.to_string(),
            self.max_stack.to_string(),
            self.logo_prompt.clone().unwrap_or_default(),
            self.logo_url.clone().unwrap_or_default(),
        ]
    }

    fn from_row(row: &RowView<'_>) -> StoreResult<Self> {
        Ok(Self {
            id: row.parse("id")?,
            name: row.text("name").to_string(),
            description: row.text("description").to_string(),
            item_type: row.text("type").to_string(),
            rarity: row.text("rarity").to_string(),
            price: row.int("price")?,
            stackable: row.bool("stackable")?,
            max_stack: row.int("max_stack")?,
            logo_prompt: row.optional("logo_prompt"),
            logo_url: row.optional("logo_url"),
        })
    }
}
