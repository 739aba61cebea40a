//! SQLite Family Repository - 家庭与成员关系

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, parse_timestamp, parse_uuid};
use super::DbPool;
use crate::application::ports::{FamilyRepositoryPort, RepositoryError};
use crate::domain::family::{Family, FamilyId, Kinship, KinshipRole};

/// SQLite Family Repository
pub struct SqliteFamilyRepository {
    pool: DbPool,
}

impl SqliteFamilyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct FamilyRow {
    id: String,
    name: String,
    personal_access: bool,
    created_at: String,
}

impl TryFrom<FamilyRow> for Family {
    type Error = RepositoryError;

    fn try_from(row: FamilyRow) -> Result<Self, Self::Error> {
        Ok(Family::restore(
            FamilyId::from_uuid(parse_uuid(&row.id)?),
            row.name,
            row.personal_access,
            parse_timestamp(&row.created_at)?,
        ))
    }
}

#[derive(FromRow)]
struct KinshipRow {
    id: String,
    user_id: String,
    family_id: String,
    role: String,
}

impl TryFrom<KinshipRow> for Kinship {
    type Error = RepositoryError;

    fn try_from(row: KinshipRow) -> Result<Self, Self::Error> {
        let role = KinshipRole::from_str(&row.role).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown kinship role: {}", row.role))
        })?;
        Ok(Kinship::restore(
            parse_uuid(&row.id)?,
            parse_uuid(&row.user_id)?,
            FamilyId::from_uuid(parse_uuid(&row.family_id)?),
            role,
        ))
    }
}

const KINSHIP_COLUMNS: &str = "SELECT id, user_id, family_id, role FROM kinships";

#[async_trait]
impl FamilyRepositoryPort for SqliteFamilyRepository {
    async fn save(&self, family: &Family) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO families (id, name, personal_access, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                personal_access = excluded.personal_access
            "#,
        )
        .bind(family.id().to_string())
        .bind(family.name())
        .bind(family.personal_access())
        .bind(family.created_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: FamilyId) -> Result<Option<Family>, RepositoryError> {
        let row: Option<FamilyRow> = sqlx::query_as(
            "SELECT id, name, personal_access, created_at FROM families WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(Family::try_from).transpose()
    }

    async fn save_kinship(&self, kinship: &Kinship) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO kinships (id, user_id, family_id, role)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                role = excluded.role
            "#,
        )
        .bind(kinship.id().to_string())
        .bind(kinship.user_id().to_string())
        .bind(kinship.family_id().to_string())
        .bind(kinship.role().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(format!(
                    "user {} is already a member of family {}",
                    kinship.user_id(),
                    kinship.family_id()
                ))
            }
            other => db_error(other),
        })?;

        Ok(())
    }

    async fn find_kinship(&self, id: Uuid) -> Result<Option<Kinship>, RepositoryError> {
        let row: Option<KinshipRow> = sqlx::query_as(&format!("{} WHERE id = ?", KINSHIP_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(Kinship::try_from).transpose()
    }

    async fn find_membership(
        &self,
        family_id: FamilyId,
        user_id: Uuid,
    ) -> Result<Option<Kinship>, RepositoryError> {
        let row: Option<KinshipRow> = sqlx::query_as(&format!(
            "{} WHERE family_id = ? AND user_id = ?",
            KINSHIP_COLUMNS
        ))
        .bind(family_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(Kinship::try_from).transpose()
    }

    async fn find_members(&self, family_id: FamilyId) -> Result<Vec<Kinship>, RepositoryError> {
        let rows: Vec<KinshipRow> = sqlx::query_as(&format!(
            "{} WHERE family_id = ? ORDER BY rowid",
            KINSHIP_COLUMNS
        ))
        .bind(family_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Kinship::try_from).collect()
    }
}
