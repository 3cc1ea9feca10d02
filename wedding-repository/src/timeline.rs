use crate::expect_deleted;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use wedding_error::{storage::StorageError, StorageResult};
use wedding_models::{
    domain::prelude::{NewTimelineEvent, UpdateTimelineEvent},
    entities::prelude::{TimelineEvent, TimelineEventColumn, TimelineEventModel},
};

pub struct TimelineRepository;

impl TimelineRepository {
    /// Admin view: every event in story order.
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> StorageResult<Vec<TimelineEventModel>> {
        Ok(TimelineEvent::find()
            .order_by_asc(TimelineEventColumn::OccurredAt)
            .order_by_asc(TimelineEventColumn::SortOrder)
            .order_by_asc(TimelineEventColumn::Id)
            .all(db)
            .await?)
    }

    /// Public view: visible events only, optionally the first `limit`.
    pub async fn find_visible<C: ConnectionTrait>(
        limit: Option<u64>,
        db: &C,
    ) -> StorageResult<Vec<TimelineEventModel>> {
        Ok(TimelineEvent::find()
            .filter(TimelineEventColumn::Visible.eq(true))
            .order_by_asc(TimelineEventColumn::OccurredAt)
            .order_by_asc(TimelineEventColumn::SortOrder)
            .order_by_asc(TimelineEventColumn::Id)
            .limit(limit)
            .all(db)
            .await?)
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        id: i32,
        db: &C,
    ) -> StorageResult<Option<TimelineEventModel>> {
        Ok(TimelineEvent::find_by_id(id).one(db).await?)
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> StorageResult<u64> {
        Ok(TimelineEvent::find().count(db).await?)
    }

    pub async fn create<C: ConnectionTrait>(
        new: NewTimelineEvent,
        db: &C,
    ) -> StorageResult<TimelineEventModel> {
        Ok(new.into_active_model().insert(db).await?)
    }

    pub async fn update<C: ConnectionTrait>(
        update: UpdateTimelineEvent,
        db: &C,
    ) -> StorageResult<TimelineEventModel> {
        let id = update.id;
        if Self::find_by_id(id, db).await?.is_none() {
            return Err(StorageError::EntityNotFound(format!("timeline event {id}")));
        }
        Ok(update.into_active_model().update(db).await?)
    }

    pub async fn delete<C: ConnectionTrait>(id: i32, db: &C) -> StorageResult<()> {
        let result = TimelineEvent::delete_by_id(id).exec(db).await?;
        expect_deleted(result, || format!("timeline event {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wedding_storage::connect_in_memory;

    fn event(title: &str, year: i32, visible: bool, sort_order: i32) -> NewTimelineEvent {
        NewTimelineEvent {
            title: title.into(),
            description: None,
            occurred_at: Utc.with_ymd_and_hms(year, 5, 1, 0, 0, 0).unwrap(),
            location: None,
            image_url: None,
            visible,
            sort_order,
        }
    }

    #[tokio::test]
    async fn test_story_order_and_visibility() {
        let db = connect_in_memory().await.unwrap();
        for e in [
            event("Engaged", 2024, true, 0),
            event("First date", 2019, true, 1),
            event("Met", 2019, true, 0),
            event("Draft", 2020, false, 0),
        ] {
            TimelineRepository::create(e, &db).await.unwrap();
        }

        let titles = |events: Vec<TimelineEventModel>| -> Vec<String> {
            events.into_iter().map(|e| e.title).collect()
        };
        assert_eq!(
            titles(TimelineRepository::find_visible(None, &db).await.unwrap()),
            vec!["Met", "First date", "Engaged"]
        );
        assert_eq!(
            titles(TimelineRepository::find_visible(Some(1), &db).await.unwrap()),
            vec!["Met"]
        );
        assert_eq!(TimelineRepository::find_all(&db).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = connect_in_memory().await.unwrap();
        let created = TimelineRepository::create(event("Met", 2019, true, 0), &db)
            .await
            .unwrap();
        let updated = TimelineRepository::update(
            UpdateTimelineEvent {
                id: created.id,
                title: "We met".into(),
                description: Some("At a friend's party".into()),
                occurred_at: created.occurred_at,
                location: Some("Lisbon".into()),
                image_url: None,
                visible: false,
                sort_order: 0,
            },
            &db,
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "We met");
        assert!(!updated.visible);

        TimelineRepository::delete(created.id, &db).await.unwrap();
        assert!(matches!(
            TimelineRepository::delete(created.id, &db).await,
            Err(StorageError::EntityNotFound(_))
        ));
        assert_eq!(TimelineRepository::count(&db).await.unwrap(), 0);
    }
}
