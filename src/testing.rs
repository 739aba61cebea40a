//! 测试夹具：内存 SQLite + 记录型邮件发送器

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    FamilyRepositoryPort, InvitationRepositoryPort, StoryRepositoryPort, UserRecord,
    UserRepositoryPort,
};
use crate::domain::family::{Family, FamilyId, Kinship, KinshipRole};
use crate::infrastructure::adapters::RecordingMailer;
use crate::infrastructure::http::AppState;
use crate::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, DbPool, SqliteFamilyRepository,
    SqliteInvitationRepository, SqliteStoryRepository, SqliteUserRepository,
};

pub(crate) struct TestContext {
    #[allow(dead_code)]
    pub pool: DbPool,
    pub user_repo: Arc<dyn UserRepositoryPort>,
    pub story_repo: Arc<dyn StoryRepositoryPort>,
    pub family_repo: Arc<dyn FamilyRepositoryPort>,
    pub invitation_repo: Arc<dyn InvitationRepositoryPort>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestContext {
    pub async fn new() -> Self {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        Self {
            user_repo: Arc::new(SqliteUserRepository::new(pool.clone())),
            story_repo: Arc::new(SqliteStoryRepository::new(pool.clone())),
            family_repo: Arc::new(SqliteFamilyRepository::new(pool.clone())),
            invitation_repo: Arc::new(SqliteInvitationRepository::new(pool.clone())),
            mailer: Arc::new(RecordingMailer::new()),
            pool,
        }
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Uuid {
        let user = UserRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_lowercase(),
            created_at: Utc::now(),
        };
        self.user_repo.save(&user).await.unwrap();
        user.id
    }

    async fn insert_family(&self, owner: Uuid, name: &str, personal_access: bool) -> Uuid {
        let family = Family::new(name, personal_access).unwrap();
        self.family_repo.save(&family).await.unwrap();

        let kinship = Kinship::new(owner, family.id(), KinshipRole::Admin);
        self.family_repo.save_kinship(&kinship).await.unwrap();
        *family.id().as_uuid()
    }

    /// 创建家庭，owner 成为 admin
    pub async fn create_family(&self, owner: Uuid, name: &str) -> Uuid {
        self.insert_family(owner, name, false).await
    }

    pub async fn create_personal_family(&self, owner: Uuid, name: &str) -> Uuid {
        self.insert_family(owner, name, true).await
    }

    /// 以 member 身份加入家庭，返回 kinship id
    pub async fn add_member(&self, family_id: Uuid, user_id: Uuid) -> Uuid {
        let family_id = FamilyId::from_uuid(family_id);
        let kinship = Kinship::new(user_id, family_id, KinshipRole::Member);
        self.family_repo.save_kinship(&kinship).await.unwrap();
        kinship.id()
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.user_repo.clone(),
            self.story_repo.clone(),
            self.family_repo.clone(),
            self.invitation_repo.clone(),
            self.mailer.clone(),
        )
    }
}
