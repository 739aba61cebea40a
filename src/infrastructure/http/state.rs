//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AddSectionHandler, CreateFamilyHandler, CreateInvitationsHandler, CreateStoryHandler,
    CreateUserHandler, DeleteStoryHandler, PublishStoryHandler, RemoveContributorHandler,
    ResendInvitationsHandler, UpdateKinshipRoleHandler, UpdateStoryHandler,
    // Query handlers
    GetStoryHandler, ListStoriesHandler,
    // Ports
    FamilyRepositoryPort, InvitationRepositoryPort, MailerPort, StoryRepositoryPort,
    UserRepositoryPort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub user_repo: Arc<dyn UserRepositoryPort>,
    pub story_repo: Arc<dyn StoryRepositoryPort>,
    pub family_repo: Arc<dyn FamilyRepositoryPort>,
    pub invitation_repo: Arc<dyn InvitationRepositoryPort>,
    pub mailer: Arc<dyn MailerPort>,

    // ========== Command Handlers ==========
    pub create_user_handler: CreateUserHandler,
    pub create_story_handler: CreateStoryHandler,
    pub update_story_handler: UpdateStoryHandler,
    pub delete_story_handler: DeleteStoryHandler,
    pub add_section_handler: AddSectionHandler,
    pub remove_contributor_handler: RemoveContributorHandler,
    pub publish_story_handler: PublishStoryHandler,
    pub create_family_handler: CreateFamilyHandler,
    pub update_kinship_role_handler: UpdateKinshipRoleHandler,
    pub create_invitations_handler: CreateInvitationsHandler,
    pub resend_invitations_handler: ResendInvitationsHandler,

    // ========== Query Handlers ==========
    pub get_story_handler: GetStoryHandler,
    pub list_stories_handler: ListStoriesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        story_repo: Arc<dyn StoryRepositoryPort>,
        family_repo: Arc<dyn FamilyRepositoryPort>,
        invitation_repo: Arc<dyn InvitationRepositoryPort>,
        mailer: Arc<dyn MailerPort>,
    ) -> Self {
        Self {
            // Ports
            user_repo: user_repo.clone(),
            story_repo: story_repo.clone(),
            family_repo: family_repo.clone(),
            invitation_repo: invitation_repo.clone(),
            mailer: mailer.clone(),

            // Command handlers
            create_user_handler: CreateUserHandler::new(user_repo.clone()),
            create_story_handler: CreateStoryHandler::new(story_repo.clone()),
            update_story_handler: UpdateStoryHandler::new(story_repo.clone()),
            delete_story_handler: DeleteStoryHandler::new(story_repo.clone()),
            add_section_handler: AddSectionHandler::new(story_repo.clone(), family_repo.clone()),
            remove_contributor_handler: RemoveContributorHandler::new(story_repo.clone()),
            publish_story_handler: PublishStoryHandler::new(
                story_repo.clone(),
                family_repo.clone(),
            ),
            create_family_handler: CreateFamilyHandler::new(family_repo.clone()),
            update_kinship_role_handler: UpdateKinshipRoleHandler::new(
                family_repo.clone(),
                user_repo.clone(),
                mailer.clone(),
            ),
            create_invitations_handler: CreateInvitationsHandler::new(
                family_repo.clone(),
                user_repo.clone(),
                invitation_repo.clone(),
                mailer.clone(),
            ),
            resend_invitations_handler: ResendInvitationsHandler::new(
                family_repo.clone(),
                user_repo.clone(),
                invitation_repo.clone(),
                mailer.clone(),
            ),

            // Query handlers
            get_story_handler: GetStoryHandler::new(story_repo.clone(), family_repo.clone()),
            list_stories_handler: ListStoriesHandler::new(story_repo),
        }
    }
}
