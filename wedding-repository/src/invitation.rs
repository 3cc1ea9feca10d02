use crate::{expect_deleted, guest::GuestRepository};
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QueryTrait, Set, TransactionTrait,
};
use tracing::debug;
use wedding_error::{storage::StorageError, StorageResult};
use wedding_models::{
    domain::prelude::{
        InvitationPageParams, NewInvitation, PageResult, RsvpRequest, SelfRegistration,
        UpdateInvitation,
    },
    entities::prelude::{Invitation, InvitationActiveModel, InvitationColumn, InvitationModel},
    enums::common::{Attendance, Relationship},
};
use wedding_utils::code::{invitation_code, normalize_code};

/// Attempts at drawing an unused random code before giving up.
const CODE_ATTEMPTS: usize = 16;

pub struct InvitationRepository;

impl InvitationRepository {
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> StorageResult<Vec<InvitationModel>> {
        Ok(Invitation::find()
            .order_by_asc(InvitationColumn::Id)
            .all(db)
            .await?)
    }

    pub async fn page<C: ConnectionTrait>(
        params: &InvitationPageParams,
        db: &C,
    ) -> StorageResult<PageResult<InvitationModel>> {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let query = Invitation::find()
            .apply_if(non_blank(&params.guest_name), |q, name| {
                q.filter(InvitationColumn::GuestName.contains(name))
            })
            .apply_if(non_blank(&params.code), |q, code| {
                q.filter(InvitationColumn::Code.contains(code.to_ascii_uppercase()))
            })
            .apply_if(params.relationship, |q, relationship| {
                q.filter(InvitationColumn::Relationship.eq(relationship))
            })
            .apply_if(params.attendance, |q, attendance| {
                q.filter(InvitationColumn::Attendance.eq(attendance))
            })
            .order_by_asc(InvitationColumn::Id);

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
    ) -> StorageResult<Option<InvitationModel>> {
        Ok(Invitation::find_by_id(id).one(db).await?)
    }

    /// Lookup by code, ignoring case and surrounding whitespace.
    pub async fn find_by_code<C: ConnectionTrait>(
        code: &str,
        db: &C,
    ) -> StorageResult<Option<InvitationModel>> {
        Ok(Invitation::find()
            .filter(InvitationColumn::Code.eq(normalize_code(code)))
            .one(db)
            .await?)
    }

    pub async fn require_by_code<C: ConnectionTrait>(
        code: &str,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        Self::find_by_code(code, db)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(format!("invitation {code}")))
    }

    /// Whether `code` is taken, optionally by an invitation other than `exclude_id`.
    pub async fn exists_by_code<C: ConnectionTrait>(
        code: &str,
        exclude_id: Option<i32>,
        db: &C,
    ) -> StorageResult<bool> {
        Ok(Invitation::find()
            .filter(InvitationColumn::Code.eq(normalize_code(code)))
            .apply_if(exclude_id, |q, id| q.filter(InvitationColumn::Id.ne(id)))
            .count(db)
            .await?
            > 0)
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> StorageResult<u64> {
        Ok(Invitation::find().count(db).await?)
    }

    pub async fn generate_code<C: ConnectionTrait>(len: usize, db: &C) -> StorageResult<String> {
        for _ in 0..CODE_ATTEMPTS {
            let code = invitation_code(len);
            if !Self::exists_by_code(&code, None, db).await? {
                return Ok(code);
            }
            debug!(code, "Generated invitation code already taken");
        }
        Err(DbErr::Custom(format!(
            "no free invitation code after {CODE_ATTEMPTS} attempts"
        ))
        .into())
    }

    /// Inserts `new`, generating a code of `code_len` characters when none is given.
    pub async fn create<C: ConnectionTrait>(
        new: NewInvitation,
        code_len: usize,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        let code = match new.code.as_deref().map(normalize_code) {
            Some(code) if !code.is_empty() => code,
            _ => Self::generate_code(code_len, db).await?,
        };
        let mut invitation = new.into_active_model();
        invitation.code = Set(code);
        Ok(invitation.insert(db).await?)
    }

    /// Creates the invitation for a guest who signed up from the public site.
    pub async fn register<C: ConnectionTrait>(
        registration: SelfRegistration,
        code_len: usize,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        let invitation = InvitationActiveModel {
            code: Set(Self::generate_code(code_len, db).await?),
            guest_name: Set(registration.guest_name.trim().to_string()),
            partner_name: Set(registration.partner_name),
            email: Set(registration.email),
            phone: Set(registration.phone),
            relationship: Set(registration.relationship.unwrap_or(Relationship::Other)),
            party_size: Set(registration.party_size.unwrap_or(1)),
            self_registered: Set(true),
            ..Default::default()
        };
        Ok(invitation.insert(db).await?)
    }

    /// Guests linked by the old code follow a code change.
    pub async fn update<C: TransactionTrait>(
        update: UpdateInvitation,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        let id = update.id;
        let txn = db.begin().await?;
        let existing = Self::find_by_id(id, &txn)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(format!("invitation {id}")))?;
        let code = normalize_code(&update.code);
        let mut invitation = update.into_active_model();
        invitation.code = Set(code.clone());
        let updated = invitation.update(&txn).await?;
        if existing.code != code {
            GuestRepository::relink(&[existing.code], Some(&code), &txn).await?;
        }
        txn.commit().await?;
        Ok(updated)
    }

    /// Linked guests are kept but unlinked.
    pub async fn delete<C: TransactionTrait>(id: i32, db: &C) -> StorageResult<()> {
        let txn = db.begin().await?;
        let existing = Self::find_by_id(id, &txn).await?;
        let result = Invitation::delete_by_id(id).exec(&txn).await?;
        expect_deleted(result, || format!("invitation {id}"))?;
        if let Some(invitation) = existing {
            GuestRepository::relink(&[invitation.code], None, &txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    pub async fn delete_many<C: TransactionTrait>(ids: &[i32], db: &C) -> StorageResult<u64> {
        let txn = db.begin().await?;
        let codes: Vec<String> = Invitation::find()
            .filter(InvitationColumn::Id.is_in(ids.iter().copied()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|i| i.code)
            .collect();
        let removed = Invitation::delete_many()
            .filter(InvitationColumn::Id.is_in(ids.iter().copied()))
            .exec(&txn)
            .await?
            .rows_affected;
        GuestRepository::relink(&codes, None, &txn).await?;
        txn.commit().await?;
        Ok(removed)
    }

    /// Zeroes the open counters so tracking starts over.
    pub async fn reset_tracking<C: ConnectionTrait>(
        id: i32,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        let invitation = Self::find_by_id(id, db)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(format!("invitation {id}")))?;
        let mut invitation = invitation.into_active_model();
        invitation.open_count = Set(0);
        invitation.first_opened_at = Set(None);
        invitation.last_opened_at = Set(None);
        Ok(invitation.update(db).await?)
    }

    /// Counts one view of the invitation page. The counter is bumped in SQL so
    /// concurrent opens are not lost; `first_opened_at` is only ever set once.
    pub async fn record_open<C: ConnectionTrait>(
        code: &str,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        let invitation = Self::require_by_code(code, db).await?;
        let now = Utc::now();
        Invitation::update_many()
            .col_expr(
                InvitationColumn::OpenCount,
                Expr::col(InvitationColumn::OpenCount).add(1),
            )
            .col_expr(
                InvitationColumn::FirstOpenedAt,
                Func::coalesce([
                    Expr::col(InvitationColumn::FirstOpenedAt).into(),
                    Expr::value(now),
                ])
                .into(),
            )
            .col_expr(InvitationColumn::LastOpenedAt, Expr::value(now))
            .filter(InvitationColumn::Id.eq(invitation.id))
            .exec(db)
            .await?;

        Self::find_by_id(invitation.id, db)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(format!("invitation {code}")))
    }

    /// Stores the guest's answer and copies it onto guests linked by the code.
    ///
    /// Callers check the RSVP window and party size limits beforehand.
    pub async fn submit_rsvp<C: TransactionTrait>(
        code: &str,
        rsvp: &RsvpRequest,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        let txn = db.begin().await?;
        let invitation = Self::require_by_code(code, &txn).await?;

        let attendance = Attendance::from_attending(rsvp.attending.unwrap_or(false));
        let confirmed = rsvp.confirmed_party_size();
        let mut active = invitation.into_active_model();
        active.attendance = Set(attendance);
        active.confirmed_party_size = Set(Some(confirmed));
        active.dietary_notes = Set(rsvp.dietary_notes.clone());
        if rsvp.message.is_some() {
            active.message = Set(rsvp.message.clone());
        }
        active.rsvp_completed = Set(true);
        active.responded_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        GuestRepository::sync_with_invitation(&updated.code, attendance, confirmed, &txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    pub async fn mark_gift<C: ConnectionTrait>(
        code: &str,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        let mut invitation = Self::require_by_code(code, db).await?.into_active_model();
        invitation.gift_completed = Set(true);
        Ok(invitation.update(db).await?)
    }

    pub async fn mark_photo<C: ConnectionTrait>(
        code: &str,
        db: &C,
    ) -> StorageResult<InvitationModel> {
        let mut invitation = Self::require_by_code(code, db).await?.into_active_model();
        invitation.photo_completed = Set(true);
        Ok(invitation.update(db).await?)
    }
}
