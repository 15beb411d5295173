use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smart_budget_core::{
    Clock, CoreError, CoreResult, ItemStore, ItemTable, ManualOrderAssignment, SystemClock,
};
use smart_budget_domain::{BudgetSettings, ItemPatch, NewItem, ShoppingItem, BUDGET_SETTINGS_KEY};
use tokio::{fs, sync::Mutex};
use uuid::Uuid;

pub const STORE_SCHEMA_VERSION: u32 = 1;
pub const STORE_FILE_NAME: &str = "shopping-list.json";
const TMP_SUFFIX: &str = "tmp";

/// On-disk layout: the `items` collection keyed by id and the `settings`
/// collection keyed by a fixed identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub items: BTreeMap<Uuid, ShoppingItem>,
    #[serde(default)]
    pub settings: BTreeMap<String, BudgetSettings>,
}

impl StoreDocument {
    fn from_table(table: &ItemTable) -> Self {
        let mut settings = BTreeMap::new();
        if let Some(budget) = table.budget() {
            settings.insert(BUDGET_SETTINGS_KEY.to_string(), budget.clone());
        }
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            items: table.items().clone(),
            settings,
        }
    }

    fn into_table(mut self) -> ItemTable {
        let budget = self.settings.remove(BUDGET_SETTINGS_KEY);
        ItemTable::from_parts(self.items.into_values(), budget)
    }
}

/// Filesystem-backed JSON persistence for the shopping list.
///
/// The whole document is rewritten on every mutation through a temp file and a
/// rename. A write that fails leaves both the file and the in-memory view
/// untouched.
pub struct JsonItemStore {
    path: PathBuf,
    table: Mutex<ItemTable>,
    clock: Arc<dyn Clock>,
}

impl JsonItemStore {
    /// Opens the store at `path`, starting empty when the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock)).await
    }

    /// Opens `shopping-list.json` inside `dir`.
    pub async fn open_in_dir(dir: &Path) -> CoreResult<Self> {
        fs::create_dir_all(dir).await?;
        Self::open(dir.join(STORE_FILE_NAME)).await
    }

    pub async fn open_with_clock(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> CoreResult<Self> {
        let path = path.into();
        let table = load_document(&path).await?.into_table();
        tracing::info!(path = %path.display(), items = table.len(), "shopping list opened");
        Ok(Self {
            path,
            table: Mutex::new(table),
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `op` on a copy of the table, persists the copy and only then commits it.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut ItemTable) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        let value = op(&mut next)?;
        if next != *table {
            save_document(&self.path, &StoreDocument::from_table(&next)).await?;
            *table = next;
        }
        Ok(value)
    }
}

#[async_trait]
impl ItemStore for JsonItemStore {
    async fn add(&self, item: NewItem) -> CoreResult<Uuid> {
        let now = self.clock.now();
        let stored = self.mutate(|table| table.insert(item, now)).await?;
        tracing::debug!(id = %stored.id, category = %stored.category, "item persisted");
        Ok(stored.id)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<ShoppingItem>> {
        Ok(self.table.lock().await.get(id).cloned())
    }

    async fn list(&self) -> CoreResult<Vec<ShoppingItem>> {
        Ok(self.table.lock().await.list())
    }

    async fn update(&self, id: Uuid, patch: ItemPatch) -> CoreResult<()> {
        let now = self.clock.now();
        let updated = self.mutate(|table| table.update(id, patch, now)).await?;
        if !updated {
            tracing::debug!(%id, "update skipped for missing item");
        }
        Ok(())
    }

    async fn set_manual_orders(&self, assignments: &[ManualOrderAssignment]) -> CoreResult<usize> {
        let now = self.clock.now();
        let changed = self
            .mutate(|table| table.assign_manual_orders(assignments, now))
            .await?;
        tracing::debug!(changed, "manual ranks persisted");
        Ok(changed)
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        self.mutate(|table| Ok(table.remove(id))).await?;
        Ok(())
    }

    async fn clear(&self) -> CoreResult<usize> {
        self.mutate(|table| Ok(table.clear())).await
    }

    async fn restore(&self, item: ShoppingItem) -> CoreResult<()> {
        self.mutate(|table| {
            table.restore(item);
            Ok(())
        })
        .await
    }

    async fn get_budget(&self) -> CoreResult<Option<BudgetSettings>> {
        Ok(self.table.lock().await.budget().cloned())
    }

    async fn set_budget(&self, amount: f64) -> CoreResult<()> {
        let now = self.clock.now();
        self.mutate(|table| table.set_budget(amount, now)).await?;
        Ok(())
    }
}

/// Loads a store document, returning an empty one when `path` does not exist.
pub async fn load_document(path: &Path) -> CoreResult<StoreDocument> {
    if !fs::try_exists(path).await? {
        return Ok(StoreDocument {
            schema_version: STORE_SCHEMA_VERSION,
            items: BTreeMap::new(),
            settings: BTreeMap::new(),
        });
    }
    let data = fs::read_to_string(path).await?;
    let document: StoreDocument =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if document.schema_version > STORE_SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "`{}` was written by a newer schema version ({})",
            path.display(),
            document.schema_version
        )));
    }
    Ok(document)
}

/// Writes the document to `path` atomically.
pub async fn save_document(path: &Path, document: &StoreDocument) -> CoreResult<()> {
    let json =
        serde_json::to_string_pretty(document).map_err(|err| CoreError::Serde(err.to_string()))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, json.as_bytes()).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
