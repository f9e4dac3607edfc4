//! Favorites actions

use tracing::info;

use crate::common::{DictionaryEntryId, MemberId, ServiceError, ServiceResult};
use crate::domains::dictionary::models::DictionaryEntry;
use crate::domains::favorites::data::FavoritePage;
use crate::domains::favorites::models::Favorite;
use crate::domains::member::Member;
use crate::kernel::ServerDeps;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Clamp paging input: negative pages become 0, unusable sizes the default,
/// oversized requests the maximum.
pub fn normalize_page(page: i64, size: i64) -> (i64, i64) {
    let size = if size <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        size.min(MAX_PAGE_SIZE)
    };
    (page.max(0), size)
}

async fn ensure_member_and_entry(
    member_id: MemberId,
    entry_id: DictionaryEntryId,
    deps: &ServerDeps,
) -> ServiceResult<()> {
    if !Member::exists(member_id, &deps.db_pool).await? {
        return Err(ServiceError::not_found("Member", member_id));
    }
    if DictionaryEntry::find_by_id(entry_id, &deps.db_pool).await?.is_none() {
        return Err(ServiceError::not_found("DictionaryEntry", entry_id));
    }
    Ok(())
}

/// Add or remove a favorite. Returns true when the entry is now favorited.
pub async fn toggle_favorite(
    member_id: MemberId,
    entry_id: DictionaryEntryId,
    deps: &ServerDeps,
) -> ServiceResult<bool> {
    ensure_member_and_entry(member_id, entry_id, deps).await?;

    if Favorite::delete(member_id, entry_id, &deps.db_pool).await? {
        info!(member_id = %member_id, entry_id = %entry_id, "Favorite removed");
        return Ok(false);
    }

    Favorite::insert(member_id, entry_id, &deps.db_pool).await?;
    info!(member_id = %member_id, entry_id = %entry_id, "Favorite added");
    Ok(true)
}

pub async fn list_favorites(
    member_id: MemberId,
    page: i64,
    size: i64,
    deps: &ServerDeps,
) -> ServiceResult<FavoritePage> {
    let (page, size) = normalize_page(page, size);
    let pool = &deps.db_pool;

    let items = Favorite::find_entries_for_member(member_id, size, page * size, pool).await?;
    let total = Favorite::count_for_member(member_id, pool).await?;

    Ok(FavoritePage {
        items,
        page,
        size,
        total,
    })
}

pub async fn is_favorite(
    member_id: MemberId,
    entry_id: DictionaryEntryId,
    deps: &ServerDeps,
) -> ServiceResult<bool> {
    Ok(Favorite::exists(member_id, entry_id, &deps.db_pool).await?)
}
