use crate::expect_deleted;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QueryTrait, Set,
};
use tracing::debug;
use wedding_error::{storage::StorageError, StorageResult};
use wedding_models::{
    domain::prelude::{ChangeGuestAttendance, GuestPageParams, NewGuest, PageResult, UpdateGuest},
    entities::prelude::{SimpleGuest, SimpleGuestActiveModel, SimpleGuestColumn, SimpleGuestModel},
    enums::common::Attendance,
};
use wedding_utils::code::normalize_code;

pub struct GuestRepository;

/// Linked codes are stored the same way invitation codes are.
fn normalize_link(code: Option<String>) -> Option<String> {
    code.map(|c| normalize_code(&c)).filter(|c| !c.is_empty())
}

impl GuestRepository {
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> StorageResult<Vec<SimpleGuestModel>> {
        Ok(SimpleGuest::find()
            .order_by_asc(SimpleGuestColumn::Id)
            .all(db)
            .await?)
    }

    pub async fn page<C: ConnectionTrait>(
        params: &GuestPageParams,
        db: &C,
    ) -> StorageResult<PageResult<SimpleGuestModel>> {
        let name = params
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let code = params
            .invitation_code
            .as_deref()
            .map(normalize_code)
            .filter(|s| !s.is_empty());
        let query = SimpleGuest::find()
            .apply_if(name, |q, name| q.filter(SimpleGuestColumn::Name.contains(name)))
            .apply_if(params.attendance, |q, attendance| {
                q.filter(SimpleGuestColumn::Attendance.eq(attendance))
            })
            .apply_if(code, |q, code| {
                q.filter(SimpleGuestColumn::InvitationCode.eq(code))
            })
            .order_by_asc(SimpleGuestColumn::Id);

        let (page, page_size) = params.page.resolve();
        let total = query.clone().count(db).await?;
        let records = query.paginate(db, page_size).fetch_page(page).await?;
        Ok(PageResult::new(
            records,
            total,
            (page + 1) as u32,
            page_size as u32,
        ))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        id: i32,
        db: &C,
    ) -> StorageResult<Option<SimpleGuestModel>> {
        Ok(SimpleGuest::find_by_id(id).one(db).await?)
    }

    /// Guests linked to one invitation, lowest id first.
    pub async fn find_by_invitation_code<C: ConnectionTrait>(
        code: &str,
        db: &C,
    ) -> StorageResult<Vec<SimpleGuestModel>> {
        Ok(SimpleGuest::find()
            .filter(SimpleGuestColumn::InvitationCode.eq(normalize_code(code)))
            .order_by_asc(SimpleGuestColumn::Id)
            .all(db)
            .await?)
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> StorageResult<u64> {
        Ok(SimpleGuest::find().count(db).await?)
    }

    pub async fn create<C: ConnectionTrait>(
        new: NewGuest,
        db: &C,
    ) -> StorageResult<SimpleGuestModel> {
        let link = normalize_link(new.invitation_code.clone());
        let mut guest = new.into_active_model();
        guest.name = Set(guest.name.take().unwrap_or_default().trim().to_string());
        guest.invitation_code = Set(link);
        Ok(guest.insert(db).await?)
    }

    pub async fn update<C: ConnectionTrait>(
        update: UpdateGuest,
        db: &C,
    ) -> StorageResult<SimpleGuestModel> {
        let id = update.id;
        if Self::find_by_id(id, db).await?.is_none() {
            return Err(StorageError::EntityNotFound(format!("guest {id}")));
        }
        let link = normalize_link(update.invitation_code.clone());
        let mut guest = update.into_active_model();
        guest.invitation_code = Set(link);
        Ok(guest.update(db).await?)
    }

    pub async fn change_attendance<C: ConnectionTrait>(
        change: ChangeGuestAttendance,
        db: &C,
    ) -> StorageResult<SimpleGuestModel> {
        let guest = Self::find_by_id(change.id, db)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(format!("guest {}", change.id)))?;
        let mut guest = guest.into_active_model();
        guest.attendance = Set(change.attendance);
        if change.attendance != Attendance::Yes {
            guest.plus_ones = Set(0);
        }
        Ok(guest.update(db).await?)
    }

    pub async fn delete<C: ConnectionTrait>(id: i32, db: &C) -> StorageResult<()> {
        let result = SimpleGuest::delete_by_id(id).exec(db).await?;
        expect_deleted(result, || format!("guest {id}"))
    }

    pub async fn delete_many<C: ConnectionTrait>(ids: &[i32], db: &C) -> StorageResult<u64> {
        Ok(SimpleGuest::delete_many()
            .filter(SimpleGuestColumn::Id.is_in(ids.iter().copied()))
            .exec(db)
            .await?
            .rows_affected)
    }

    /// Copies an RSVP answer onto every guest linked to `code`.
    ///
    /// Moves every guest linked to one of `from` over to `to`; `None` unlinks them.
    pub async fn relink<C: ConnectionTrait>(
        from: &[String],
        to: Option<&str>,
        db: &C,
    ) -> StorageResult<u64> {
        if from.is_empty() {
            return Ok(0);
        }
        let moved = SimpleGuest::update_many()
            .col_expr(
                SimpleGuestColumn::InvitationCode,
                Expr::value(to.map(str::to_string)),
            )
            .filter(SimpleGuestColumn::InvitationCode.is_in(from.iter().cloned()))
            .exec(db)
            .await?
            .rows_affected;
        debug!(?from, ?to, moved, "Relinked guests");
        Ok(moved)
    }

    /// The first linked guest carries the seats the linked guests do not
    /// cover themselves as plus-ones. Declines and pending answers clear them.
    pub async fn sync_with_invitation<C: ConnectionTrait>(
        code: &str,
        attendance: Attendance,
        confirmed: i32,
        db: &C,
    ) -> StorageResult<usize> {
        let guests = Self::find_by_invitation_code(code, db).await?;
        let linked = guests.len() as i32;
        let extra = if attendance == Attendance::Yes {
            (confirmed - linked).max(0)
        } else {
            0
        };

        for (index, guest) in guests.iter().enumerate() {
            let plus_ones = if index == 0 { extra } else { 0 };
            if guest.attendance == attendance && guest.plus_ones == plus_ones {
                continue;
            }
            let model = SimpleGuestActiveModel {
                id: Set(guest.id),
                attendance: Set(attendance),
                plus_ones: Set(plus_ones),
                ..Default::default()
            };
            model.update(db).await?;
        }
        debug!(code, linked = guests.len(), %attendance, "Synced linked guests");
        Ok(guests.len())
    }
}
