use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::model::{
    CreateGroupPayload, GoalOption, Group, GroupDetails, GroupId, SubjectOption, User,
    UserFilters,
};

pub type Result<T> = std::result::Result<T, DomainError>;

/// Port to the study-group backend. Storage, sessions and auth live
/// behind it; every call resolves to data, `AuthRequired`, or an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Logged-in user for the current session.
    async fn current_user(&self) -> Result<User>;

    async fn subjects(&self) -> Result<Vec<SubjectOption>>;

    async fn goals(&self) -> Result<Vec<GoalOption>>;

    /// Groups matching the filters; unconstrained filters are not sent.
    async fn find_groups(&self, filters: &UserFilters) -> Result<Vec<Group>>;

    /// Groups the viewer created or joined, tagged with their membership.
    async fn my_groups(&self) -> Result<Vec<Group>>;

    async fn group_details(&self, id: &GroupId) -> Result<GroupDetails>;

    /// Returns the new group id when the backend reports one.
    async fn create_group(&self, payload: &CreateGroupPayload) -> Result<Option<GroupId>>;

    async fn join_group(&self, id: &GroupId) -> Result<()>;

    async fn delete_group(&self, id: &GroupId) -> Result<()>;

    /// Server-side matches for the viewer.
    async fn auto_match(&self) -> Result<Vec<Group>>;
}

#[async_trait]
impl GroupRepository for Box<dyn GroupRepository> {
    async fn current_user(&self) -> Result<User> {
        (**self).current_user().await
    }

    async fn subjects(&self) -> Result<Vec<SubjectOption>> {
        (**self).subjects().await
    }

    async fn goals(&self) -> Result<Vec<GoalOption>> {
        (**self).goals().await
    }

    async fn find_groups(&self, filters: &UserFilters) -> Result<Vec<Group>> {
        (**self).find_groups(filters).await
    }

    async fn my_groups(&self) -> Result<Vec<Group>> {
        (**self).my_groups().await
    }

    async fn group_details(&self, id: &GroupId) -> Result<GroupDetails> {
        (**self).group_details(id).await
    }

    async fn create_group(&self, payload: &CreateGroupPayload) -> Result<Option<GroupId>> {
        (**self).create_group(payload).await
    }

    async fn join_group(&self, id: &GroupId) -> Result<()> {
        (**self).join_group(id).await
    }

    async fn delete_group(&self, id: &GroupId) -> Result<()> {
        (**self).delete_group(id).await
    }

    async fn auto_match(&self) -> Result<Vec<Group>> {
        (**self).auto_match().await
    }
}
