use crate::expect_deleted;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use wedding_error::{storage::StorageError, StorageResult};
use wedding_models::{
    domain::prelude::{ChangeMediaFlags, NewMediaItem, UpdateMediaItem},
    entities::prelude::{MediaItem, MediaItemColumn, MediaItemModel},
};

pub struct MediaRepository;

impl MediaRepository {
    /// Every row in insertion order. Gallery order is applied by the caller.
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> StorageResult<Vec<MediaItemModel>> {
        Ok(MediaItem::find()
            .order_by_asc(MediaItemColumn::Id)
            .all(db)
            .await?)
    }

    pub async fn find_visible<C: ConnectionTrait>(db: &C) -> StorageResult<Vec<MediaItemModel>> {
        Ok(MediaItem::find()
            .filter(MediaItemColumn::Visible.eq(true))
            .order_by_asc(MediaItemColumn::Id)
            .all(db)
            .await?)
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        id: i32,
        db: &C,
    ) -> StorageResult<Option<MediaItemModel>> {
        Ok(MediaItem::find_by_id(id).one(db).await?)
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> StorageResult<u64> {
        Ok(MediaItem::find().count(db).await?)
    }

    pub async fn create<C: ConnectionTrait>(
        new: NewMediaItem,
        db: &C,
    ) -> StorageResult<MediaItemModel> {
        Ok(new.into_active_model().insert(db).await?)
    }

    pub async fn update<C: ConnectionTrait>(
        update: UpdateMediaItem,
        db: &C,
    ) -> StorageResult<MediaItemModel> {
        let id = update.id;
        if Self::find_by_id(id, db).await?.is_none() {
            return Err(StorageError::EntityNotFound(format!("media {id}")));
        }
        let mut item = update.into_active_model();
        if let Some(category) = item.category.try_as_ref().map(|c| c.trim().to_string()) {
            item.category = Set(category);
        }
        Ok(item.update(db).await?)
    }

    /// Flags missing from `change` keep their stored value.
    pub async fn change_flags<C: ConnectionTrait>(
        change: ChangeMediaFlags,
        db: &C,
    ) -> StorageResult<MediaItemModel> {
        let current = Self::find_by_id(change.id, db)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(format!("media {}", change.id)))?;
        if change.featured.is_none() && change.visible.is_none() {
            return Ok(current);
        }
        Ok(change.into_active_model().update(db).await?)
    }

    /// Deletes the row and hands it back so the caller can remove the file.
    pub async fn delete<C: ConnectionTrait>(id: i32, db: &C) -> StorageResult<MediaItemModel> {
        let item = Self::find_by_id(id, db)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(format!("media {id}")))?;
        let result = MediaItem::delete_by_id(id).exec(db).await?;
        expect_deleted(result, || format!("media {id}"))?;
        Ok(item)
    }
}
