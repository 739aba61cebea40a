//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、Mailer）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - access: 成员身份与故事归属检查
//! - error: 应用层错误定义

pub mod access;
pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Story commands
    AddSection,
    CreateStory,
    DateInput,
    DeleteStory,
    PublishStory,
    RemoveContributor,
    UpdateStory,
    // Family commands
    CreateFamily,
    CreateInvitations,
    InviteeParams,
    ResendInvitations,
    UpdateKinshipRole,
    // User commands
    CreateUser,
    // Handlers
    handlers::{
        AddSectionHandler, CreateFamilyHandler, CreateInvitationsHandler, CreateStoryHandler,
        CreateUserHandler, DeleteStoryHandler, FamilyResponse, InvitationOutcomes,
        KinshipResponse, PublishStoryHandler, RemoveContributorHandler,
        RemoveContributorResponse, ResendInvitationsHandler, ResendOutcome,
        UpdateKinshipRoleHandler, UpdateStoryHandler, UserResponse,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Mailer
    Mail,
    MailerError,
    MailerPort,
    // Repositories
    FamilyRepositoryPort,
    InvitationRepositoryPort,
    RepositoryError,
    StoryRepositoryPort,
    StoryScope,
    UserRecord,
    UserRepositoryPort,
};

pub use queries::{
    GetStory,
    ListStories,
    // Handlers
    handlers::{
        GetStoryHandler, ListStoriesHandler, PublicationResponse, SectionResponse, StoryResponse,
    },
};
