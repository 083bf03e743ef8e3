use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

pub(crate) const NEW_GAME_COINS: u32 = 100;

#[derive(Debug, Error)]
pub(crate) enum ProfileError {
    #[error("failed to read profile '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse profile '{path}' at {location}: {message}")]
    Parse {
        path: PathBuf,
        location: String,
        message: String,
    },
    #[error("failed to encode profile: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write profile '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Which owned-id list an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Collection {
    Hats,
    Decorations,
    Aquarium,
    MiniGames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PurchaseOutcome {
    Purchased,
    AlreadyOwned,
    NotEnoughCoins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EquipOutcome {
    Equipped,
    Unequipped,
    NotOwned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerProfile {
    pub(crate) coins: u32,
    #[serde(default, deserialize_with = "deserialize_equipped_hat")]
    pub(crate) equipped_hat: Option<String>,
    #[serde(default)]
    pub(crate) unlocked_hats: Vec<String>,
    #[serde(default)]
    pub(crate) owned_decorations: Vec<String>,
    #[serde(default)]
    pub(crate) aquarium_contents: Vec<String>,
    #[serde(default)]
    pub(crate) owned_mini_games: Vec<String>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new_game()
    }
}

impl PlayerProfile {
    pub(crate) fn new_game() -> Self {
        Self {
            coins: NEW_GAME_COINS,
            equipped_hat: None,
            unlocked_hats: Vec::new(),
            owned_decorations: Vec::new(),
            aquarium_contents: Vec::new(),
            owned_mini_games: Vec::new(),
        }
    }

    pub(crate) fn owned(&self, collection: Collection) -> &[String] {
        match collection {
            Collection::Hats => &self.unlocked_hats,
            Collection::Decorations => &self.owned_decorations,
            Collection::Aquarium => &self.aquarium_contents,
            Collection::MiniGames => &self.owned_mini_games,
        }
    }

    fn owned_mut(&mut self, collection: Collection) -> &mut Vec<String> {
        match collection {
            Collection::Hats => &mut self.unlocked_hats,
            Collection::Decorations => &mut self.owned_decorations,
            Collection::Aquarium => &mut self.aquarium_contents,
            Collection::MiniGames => &mut self.owned_mini_games,
        }
    }

    pub(crate) fn owns(&self, collection: Collection, item_id: &str) -> bool {
        self.owned(collection).iter().any(|owned| owned == item_id)
    }

    /// Buying something already owned is a no-op, so a repeated confirm never double-charges.
    pub(crate) fn purchase(
        &mut self,
        collection: Collection,
        item_id: &str,
        price: u32,
    ) -> PurchaseOutcome {
        if self.owns(collection, item_id) {
            return PurchaseOutcome::AlreadyOwned;
        }
        let Some(remaining) = self.coins.checked_sub(price) else {
            return PurchaseOutcome::NotEnoughCoins;
        };
        self.coins = remaining;
        self.owned_mut(collection).push(item_id.to_string());
        PurchaseOutcome::Purchased
    }

    pub(crate) fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Equips `hat_id`, or unequips it when it is already worn. Only owned hats can be worn.
    pub(crate) fn toggle_hat(&mut self, hat_id: &str) -> EquipOutcome {
        if !self.owns(Collection::Hats, hat_id) {
            return EquipOutcome::NotOwned;
        }
        if self.equipped_hat.as_deref() == Some(hat_id) {
            self.equipped_hat = None;
            EquipOutcome::Unequipped
        } else {
            self.equipped_hat = Some(hat_id.to_string());
            EquipOutcome::Equipped
        }
    }

    /// Drops blank and repeated ids (first occurrence wins) and clears an equipped hat that is
    /// not in the owned list.
    fn normalize(&mut self) {
        for collection in [
            Collection::Hats,
            Collection::Decorations,
            Collection::Aquarium,
            Collection::MiniGames,
        ] {
            let mut seen = HashSet::new();
            let owned = self.owned_mut(collection);
            let before = owned.len();
            owned.retain(|id| !id.is_empty() && seen.insert(id.clone()));
            if owned.len() != before {
                warn!(
                    collection = ?collection,
                    dropped = before - owned.len(),
                    "profile_owned_ids_cleaned"
                );
            }
        }

        let Some(hat) = self.equipped_hat.as_deref() else {
            return;
        };
        if !self.owns(Collection::Hats, hat) {
            warn!(equipped_hat = hat, "profile_equipped_hat_not_owned_cleared");
            self.equipped_hat = None;
        }
    }
}

fn deserialize_equipped_hat<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty() && value != "none"))
}

pub(crate) fn parse_profile_json(path: &Path, raw: &str) -> Result<PlayerProfile, ProfileError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let mut profile = serde_path_to_error::deserialize::<_, PlayerProfile>(&mut deserializer)
        .map_err(|error| {
            let location = error.path().to_string();
            ProfileError::Parse {
                path: path.to_path_buf(),
                location,
                message: error.into_inner().to_string(),
            }
        })?;
    profile.normalize();
    Ok(profile)
}

pub(crate) fn load_profile(path: &Path) -> Result<PlayerProfile, ProfileError> {
    let raw = fs::read_to_string(path).map_err(|source| ProfileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_profile_json(path, &raw)
}

pub(crate) fn save_profile(path: &Path, profile: &PlayerProfile) -> Result<(), ProfileError> {
    let json = serde_json::to_string_pretty(profile).map_err(ProfileError::Encode)?;
    engine::write_text_atomic(path, &json).map_err(|source| ProfileError::Write {
        path: path.to_path_buf(),
        source,
    })
}
