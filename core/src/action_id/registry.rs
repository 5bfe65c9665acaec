//! Display-data lookups for spell and item ids.
//!
//! [`IdentityResolver`] is the seam between the metrics tree and whatever
//! knows spell/item names. [`IconRegistry`] serves them from a CSV export and
//! [`CachedResolver`] memoizes any resolver for repeated lookups.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use async_trait::async_trait;
use hashbrown::HashMap;
use raidsim_types::DEFAULT_ICON_BASE_URL;
use tokio::sync::RwLock;

use super::error::ResolveError;

/// Display data for one spell or item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconData {
    pub name: String,
    /// Icon label, without host or extension.
    pub icon: String,
    pub rank: i32,
}

/// Source of display names and icons for raw action ids.
///
/// Implementations must be idempotent: the same id always yields the same
/// data for the lifetime of the resolver.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn spell_data(&self, spell_id: i32) -> Result<IconData, ResolveError>;

    async fn item_data(&self, item_id: i32) -> Result<IconData, ResolveError>;

    /// Prefix joined with an icon label to form the icon URL.
    fn icon_base_url(&self) -> &str {
        DEFAULT_ICON_BASE_URL
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSV Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry mapping spell and item ids to display data.
///
/// CSV format: `kind,id,name,icon,rank` where kind is `spell` or `item`.
#[derive(Debug)]
pub struct IconRegistry {
    spells: HashMap<i32, IconData>,
    items: HashMap<i32, IconData>,
    icon_base_url: String,
    /// Unknown ids fail instead of resolving to a placeholder.
    strict: bool,
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IconRegistry {
    pub fn new() -> Self {
        Self {
            spells: HashMap::new(),
            items: HashMap::new(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            strict: false,
        }
    }

    pub fn with_icon_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.icon_base_url = base_url.into();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn load_from_csv(path: &Path) -> Result<Self, ResolveError> {
        let file = std::fs::File::open(path).map_err(|source| ResolveError::Registry {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_reader(file).map_err(|source| ResolveError::Registry {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            spells = registry.spells.len(),
            items = registry.items.len(),
            "Loaded icon registry"
        );
        Ok(registry)
    }

    pub fn from_reader(reader: impl Read) -> std::io::Result<Self> {
        let reader = BufReader::new(reader);
        let mut registry = Self::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;

            // Skip header and empty lines
            if line_num == 0 || line.trim().is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.splitn(5, ',').collect();
            if parts.len() < 4 {
                continue;
            }

            let kind = parts[0].trim().trim_start_matches('\u{feff}');
            let Ok(id) = parts[1].trim().parse::<i32>() else {
                continue;
            };
            let data = IconData {
                name: parts[2].trim().to_string(),
                icon: parts[3].trim().to_string(),
                rank: parts
                    .get(4)
                    .and_then(|r| r.trim().parse().ok())
                    .unwrap_or(0),
            };

            match kind {
                "spell" => registry.spells.insert(id, data),
                "item" => registry.items.insert(id, data),
                _ => continue,
            };
        }

        Ok(registry)
    }

    pub fn insert_spell(&mut self, spell_id: i32, data: IconData) {
        self.spells.insert(spell_id, data);
    }

    pub fn insert_item(&mut self, item_id: i32, data: IconData) {
        self.items.insert(item_id, data);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spells.len() + self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spells.is_empty() && self.items.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for IconRegistry {
    async fn spell_data(&self, spell_id: i32) -> Result<IconData, ResolveError> {
        if let Some(data) = self.spells.get(&spell_id) {
            return Ok(data.clone());
        }
        if self.strict {
            return Err(ResolveError::UnknownSpell(spell_id));
        }
        tracing::debug!(spell_id, "No registry entry for spell");
        Ok(IconData {
            name: format!("Spell {spell_id}"),
            ..Default::default()
        })
    }

    async fn item_data(&self, item_id: i32) -> Result<IconData, ResolveError> {
        if let Some(data) = self.items.get(&item_id) {
            return Ok(data.clone());
        }
        if self.strict {
            return Err(ResolveError::UnknownItem(item_id));
        }
        tracing::debug!(item_id, "No registry entry for item");
        Ok(IconData {
            name: format!("Item {item_id}"),
            ..Default::default()
        })
    }

    fn icon_base_url(&self) -> &str {
        &self.icon_base_url
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Caching
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LookupKey {
    Spell(i32),
    Item(i32),
}

/// Memoizing wrapper around another resolver.
pub struct CachedResolver<R> {
    inner: R,
    cache: RwLock<HashMap<LookupKey, IconData>>,
}

impl<R: IdentityResolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn lookup(&self, key: LookupKey) -> Result<IconData, ResolveError> {
        // Fast path: read lock only
        {
            let cache = self.cache.read().await;
            if let Some(data) = cache.get(&key) {
                return Ok(data.clone());
            }
        }

        let data = match key {
            LookupKey::Spell(id) => self.inner.spell_data(id).await?,
            LookupKey::Item(id) => self.inner.item_data(id).await?,
        };

        let mut cache = self.cache.write().await;
        // Another task may have filled the entry while we were resolving
        let entry = cache.entry(key).or_insert(data);
        Ok(entry.clone())
    }
}

#[async_trait]
impl<R: IdentityResolver> IdentityResolver for CachedResolver<R> {
    async fn spell_data(&self, spell_id: i32) -> Result<IconData, ResolveError> {
        self.lookup(LookupKey::Spell(spell_id)).await
    }

    async fn item_data(&self, item_id: i32) -> Result<IconData, ResolveError> {
        self.lookup(LookupKey::Item(item_id)).await
    }

    fn icon_base_url(&self) -> &str {
        self.inner.icon_base_url()
    }
}
