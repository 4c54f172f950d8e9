use crate::models::item::Item;
use crate::models::types::{ItemId, RecipeId};
use crate::store::error::StoreError;
use crate::store::{Record, RowView, StoreResult};
use serde::{Deserialize, Serialize};

/// One required input of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item_id: ItemId,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,

    /// Item produced by crafting
    pub result_item_id: ItemId,
    pub result_quantity: i32,

    /// Required inputs, in the order they were declared
    pub ingredients: Vec<Ingredient>,

    pub crafting_time: i32,
    pub experience_gain: i32,
}

/// Recipe fields as submitted on create and update.
///
/// Ingredients are given either as `ingredients` pairs or, as older clients send them, as the
/// comma separated `required_items` and `required_quantities` strings. Not both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecipeDraftBody")]
pub struct RecipeDraft {
    pub name: String,
    pub result_item_id: ItemId,
    pub result_quantity: i32,
    pub ingredients: Vec<Ingredient>,
    pub crafting_time: i32,
    pub experience_gain: i32,
}

#[derive(Deserialize)]
struct RecipeDraftBody {
    name: String,
    result_item_id: ItemId,
    result_quantity: i32,
    ingredients: Option<Vec<Ingredient>>,
    required_items: Option<String>,
    required_quantities: Option<String>,
    crafting_time: i32,
    experience_gain: i32,
}

impl TryFrom<RecipeDraftBody> for RecipeDraft {
    type Error = String;

    fn try_from(body: RecipeDraftBody) -> Result<Self, Self::Error> {
        let ingredients = match (body.ingredients, body.required_items, body.required_quantities) {
            (Some(pairs), None, None) => pairs,
            (Some(_), _, _) => return Err("give either ingredients or required_items, not both".to_string()),
            (None, items, quantities) => {
                decode_ingredients(items.as_deref().unwrap_or(""), quantities.as_deref().unwrap_or(""))?
            }
        };

        Ok(Self {
            name: body.name,
            result_item_id: body.result_item_id,
            result_quantity: body.result_quantity,
            ingredients,
            crafting_time: body.crafting_time,
            experience_gain: body.experience_gain,
        })
    }
}

/// Recipe with its referenced items resolved against the current item set.
///
/// References that do not resolve are not errors: a dangling result item leaves `result_item`
/// empty, and missing ingredient items are left out of `required_item_details` and listed in
/// `unresolved_item_ids` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeWithDetails {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub result_item: Option<Item>,
    pub required_item_details: Vec<Item>,
    pub unresolved_item_ids: Vec<ItemId>,
}

impl Recipe {
    pub fn from_draft(id: RecipeId, draft: RecipeDraft) -> Self {
        Self {
            id,
            name: draft.name,
            result_item_id: draft.result_item_id,
            result_quantity: draft.result_quantity,
            ingredients: draft.ingredients,
            crafting_time: draft.crafting_time,
            experience_gain: draft.experience_gain,
        }
    }

    pub fn ingredient_ids(&self) -> Vec<ItemId> {
        self.ingredients.iter().map(|i| i.item_id).collect()
    }
}

impl Record for Recipe {
    type Id = RecipeId;

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "result_item_id",
        "result_quantity",
        "required_items",
        "required_quantities",
        "crafting_time",
        "experience_gain",
    ];

    fn id(&self) -> RecipeId {
        self.id
    }

    fn to_row(&self) -> Vec<String> {
        let (items, quantities) = encode_ingredients(&self.ingredients);
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.result_item_id.to_string(),
            self.result_quantity.to_string(),
            items,
            quantities,
            self.crafting_time.to_string(),
            self.experience_gain.to_string(),
        ]
    }

    fn from_row(row: &RowView<'_>) -> StoreResult<Self> {
        let ingredients = decode_ingredients(
            row.text("required_items"),
            row.text("required_quantities"),
        )
        .map_err(|message| StoreError::MalformedReference {
            row: row.number(),
            message,
        })?;

        Ok(Self {
            id: row.parse("id")?,
            name: row.text("name").to_string(),
            result_item_id: row.parse("result_item_id")?,
            result_quantity: row.int("result_quantity")?,
            ingredients,
            crafting_time: row.int("crafting_time")?,
            experience_gain: row.int("experience_gain")?,
        })
    }
}

/// Encodes ingredients as the two parallel comma separated columns used on disk.
pub fn encode_ingredients(ingredients: &[Ingredient]) -> (String, String) {
    let items = ingredients
        .iter()
        .map(|i| i.item_id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let quantities = ingredients
        .iter()
        .map(|i| i.quantity.to_string())
        .collect::<Vec<_>>()
        .join(",");
    (items, quantities)
}

/// Decodes the parallel comma separated id and quantity lists. Both lists must have the same
/// length; a blank cell is an empty list.
pub fn decode_ingredients(items: &str, quantities: &str) -> Result<Vec<Ingredient>, String> {
    let ids = split_list(items)
        .map(|s| s.parse::<ItemId>().map_err(|e| format!("item id '{s}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    let amounts = split_list(quantities)
        .map(|s| parse_quantity(s).ok_or_else(|| format!("quantity '{s}' is not an integer")))
        .collect::<Result<Vec<_>, _>>()?;

    if ids.len() != amounts.len() {
        return Err(format!(
            "{} item ids but {} quantities",
            ids.len(),
            amounts.len()
        ));
    }

    Ok(ids
        .into_iter()
        .zip(amounts)
        .map(|(item_id, quantity)| Ingredient { item_id, quantity })
        .collect())
}

fn split_list(s: &str) -> impl Iterator<Item = &str> {
    let s = s.trim();
    s.split(',').map(str::trim).filter(move |_| !s.is_empty())
}

fn parse_quantity(s: &str) -> Option<i32> {
    s.parse::<i32>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
            .map(|f| f as i32)
    })
}
