//! SQLite Invitation Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, parse_optional_uuid, parse_timestamp, parse_uuid};
use super::DbPool;
use crate::application::ports::{InvitationRepositoryPort, RepositoryError};
use crate::domain::family::{FamilyId, Invitation, KinshipRole};

/// SQLite Invitation Repository
pub struct SqliteInvitationRepository {
    pool: DbPool,
}

impl SqliteInvitationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct InvitationRow {
    id: String,
    family_id: String,
    recipient_id: Option<String>,
    sender_id: Option<String>,
    email: String,
    role: Option<String>,
    message: String,
    accepted_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<InvitationRow> for Invitation {
    type Error = RepositoryError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        Ok(Invitation::restore(
            parse_uuid(&row.id)?,
            FamilyId::from_uuid(parse_uuid(&row.family_id)?),
            parse_optional_uuid(row.recipient_id.as_deref())?,
            parse_optional_uuid(row.sender_id.as_deref())?,
            row.email,
            row.role.as_deref().and_then(KinshipRole::from_str),
            row.message,
            row.accepted_at.as_deref().map(parse_timestamp).transpose()?,
            parse_timestamp(&row.created_at)?,
            parse_timestamp(&row.updated_at)?,
        ))
    }
}

const SELECT_INVITATIONS: &str = r#"
    SELECT id, family_id, recipient_id, sender_id, email, role, message,
           accepted_at, created_at, updated_at
    FROM invitations
"#;

#[async_trait]
impl InvitationRepositoryPort for SqliteInvitationRepository {
    async fn save(&self, invitation: &Invitation) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO invitations (
                id, family_id, recipient_id, sender_id, email, role, message,
                accepted_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                sender_id = excluded.sender_id,
                email = excluded.email,
                role = excluded.role,
                message = excluded.message,
                accepted_at = excluded.accepted_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(invitation.id().to_string())
        .bind(invitation.family_id().to_string())
        .bind(invitation.recipient_id().map(|id| id.to_string()))
        .bind(invitation.sender_id().map(|id| id.to_string()))
        .bind(invitation.email())
        .bind(invitation.role().map(|role| role.as_str()))
        .bind(invitation.message())
        .bind(invitation.accepted_at().map(|at| at.to_rfc3339()))
        .bind(invitation.created_at().to_rfc3339())
        .bind(invitation.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>, RepositoryError> {
        let row: Option<InvitationRow> =
            sqlx::query_as(&format!("{} WHERE id = ?", SELECT_INVITATIONS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(Invitation::try_from).transpose()
    }

    async fn find_by_recipient(
        &self,
        family_id: FamilyId,
        recipient_id: Uuid,
    ) -> Result<Option<Invitation>, RepositoryError> {
        let row: Option<InvitationRow> = sqlx::query_as(&format!(
            "{} WHERE family_id = ? AND recipient_id = ? ORDER BY created_at DESC LIMIT 1",
            SELECT_INVITATIONS
        ))
        .bind(family_id.to_string())
        .bind(recipient_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(Invitation::try_from).transpose()
    }

    async fn find_by_ids(
        &self,
        family_id: FamilyId,
        ids: &[Uuid],
    ) -> Result<Vec<Invitation>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // 构建 IN 子句的占位符
        let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
        let sql = format!(
            "{} WHERE family_id = ? AND id IN ({}) ORDER BY created_at",
            SELECT_INVITATIONS,
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, InvitationRow>(&sql).bind(family_id.to_string());
        for id in ids {
            query = query.bind(id.to_string());
        }

        let rows = query.fetch_all(&self.pool).await.map_err(db_error)?;
        rows.into_iter().map(Invitation::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::FamilyRepositoryPort;
    use crate::domain::family::Family;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteFamilyRepository,
    };

    async fn setup() -> (SqliteInvitationRepository, Family) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let family = Family::new("The Smiths", false).unwrap();
        SqliteFamilyRepository::new(pool.clone())
            .save(&family)
            .await
            .unwrap();

        (SqliteInvitationRepository::new(pool), family)
    }

    #[tokio::test]
    async fn test_save_and_reassign() {
        let (repo, family) = setup().await;
        let recipient = Uuid::new_v4();
        let sender = Uuid::new_v4();

        let mut invitation = Invitation::new(family.id(), Some(recipient));
        invitation.assign("carol@example.com", Some(KinshipRole::Member), "hi", sender);
        repo.save(&invitation).await.unwrap();

        let mut found = repo
            .find_by_recipient(family.id(), recipient)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), invitation.id());
        assert_eq!(found.role(), Some(KinshipRole::Member));
        assert_eq!(found.sender_id(), Some(sender));

        found.assign("carol@example.com", Some(KinshipRole::Guest), "", sender);
        repo.save(&found).await.unwrap();

        let reloaded = repo.find_by_id(invitation.id()).await.unwrap().unwrap();
        assert_eq!(reloaded.role(), Some(KinshipRole::Guest));
        assert_eq!(reloaded.message(), "");
    }

    #[tokio::test]
    async fn test_find_by_ids_scoped_to_family() {
        let (repo, family) = setup().await;
        let sender = Uuid::new_v4();

        let mut first = Invitation::new(family.id(), None);
        first.assign("a@example.com", Some(KinshipRole::Member), "", sender);
        let mut second = Invitation::new(family.id(), None);
        second.assign("b@example.com", Some(KinshipRole::Guest), "", sender);
        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        let found = repo
            .find_by_ids(family.id(), &[first.id(), Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email(), "a@example.com");

        let other_family = repo
            .find_by_ids(FamilyId::new(), &[first.id(), second.id()])
            .await
            .unwrap();
        assert!(other_family.is_empty());
        assert!(repo.find_by_ids(family.id(), &[]).await.unwrap().is_empty());
    }
}
