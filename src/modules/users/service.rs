use shelfwise_core::AppError;
use shelfwise_db::LibraryStore;
use shelfwise_models::{CreateUserDto, User, UserFilterParams};
use tracing::{debug, info, instrument, warn};

pub struct UserService;

impl UserService {
    #[instrument(skip(store, filters), fields(filter.department = ?filters.department, filter.search = ?filters.search))]
    pub async fn list_users(
        store: &dyn LibraryStore,
        filters: UserFilterParams,
    ) -> Result<Vec<User>, AppError> {
        let users = store.list_users(&filters).await?;
        debug!(returned = users.len(), "Users fetched");
        Ok(users)
    }

    #[instrument(skip(store, dto), fields(user.id = %dto.user_id))]
    pub async fn create_user(store: &dyn LibraryStore, dto: CreateUserDto) -> Result<User, AppError> {
        let user = User::try_from(dto).map_err(AppError::unprocessable)?;

        if let Err(e) = store.insert_user(&user).await {
            warn!(user.id = %user.user_id, error = %e, "User creation rejected");
            return Err(e.into());
        }

        info!(user.id = %user.user_id, user.department = %user.department, "User created");
        Ok(user)
    }

    pub async fn departments(store: &dyn LibraryStore) -> Result<Vec<String>, AppError> {
        Ok(store.departments().await?)
    }
}
