use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserResponse> {
        validate_username(&request.username)?;
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.as_str()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Username already registered".to_string()));
        }

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.as_str()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;

        let user = users::ActiveModel {
            username: Set(request.username),
            email: Set(request.email),
            password_hash: Set(password_hash),
            is_active: Set(true),
            is_admin: Set(false),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(UserResponse::from(user))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        // One generic failure for unknown username and wrong password, so
        // login cannot be used to enumerate accounts.
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Incorrect username or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Incorrect username or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Inactive user".to_string()));
        }

        let access_token = self.jwt_service.generate_access_token(&user.username)?;
        let expires_in = self.jwt_service.get_access_token_expires_in();

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        })
    }

    /// Maps a verified token subject back to a live account. A valid token
    /// for a deleted account is still `Unauthorized`; a disabled account is
    /// `Forbidden`.
    pub async fn resolve_active_user(&self, username: &str) -> AppResult<users::Model> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Could not validate credentials".to_string()))?;

        if !user.is_active {
            return Err(AppError::Forbidden("Inactive user".to_string()));
        }

        Ok(user)
    }

    pub async fn update_profile(
        &self,
        user: users::Model,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        if request.username.is_none() && request.email.is_none() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        if let Some(username) = &request.username {
            validate_username(username)?;
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .filter(users::Column::Id.ne(user.id))
                .one(&self.pool)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Username already registered".to_string()));
            }
        }

        if let Some(email) = &request.email {
            validate_email(email)?;
            let taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .filter(users::Column::Id.ne(user.id))
                .one(&self.pool)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }

        let mut model = user.into_active_model();
        if let Some(username) = request.username {
            model.username = Set(username);
        }
        if let Some(email) = request.email {
            model.email = Set(email);
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(UserResponse::from(updated))
    }

    pub async fn change_password(
        &self,
        user: users::Model,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Current password is incorrect".to_string(),
            ));
        }
        validate_password(&request.new_password)?;

        let password_hash = hash_password(&request.new_password)?;
        let mut model = user.into_active_model();
        model.password_hash = Set(password_hash);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        Ok(())
    }
}
