//! Administrative division service.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use wilaiety_common::{AppError, AppResult, IdGenerator};
use wilaiety_db::entities::administrative_division::{self, DivisionType};
use wilaiety_db::repositories::{DivisionFilter, DivisionRepository};

use crate::policy::{Permission, Policy, Principal};
use crate::services::{check_gps, non_blank, required_name};

/// Deepest ancestor chain walked when checking for cycles.
const MAX_DEPTH: usize = 16;

/// Input for creating a division.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDivisionInput {
    #[validate(length(min = 1, max = 256))]
    pub name_fr: String,
    #[validate(length(min = 1, max = 256))]
    pub name_ar: String,
    pub division_type: DivisionType,
    pub parent_id: Option<String>,
    #[validate(length(max = 32))]
    pub code: Option<String>,
    pub gps_coordinates: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Partial edit of a division.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDivisionInput {
    #[validate(length(min = 1, max = 256))]
    pub name_fr: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub name_ar: Option<String>,
    pub division_type: Option<DivisionType>,
    /// Blank string detaches the division from its parent.
    pub parent_id: Option<String>,
    #[validate(length(max = 32))]
    pub code: Option<String>,
    pub gps_coordinates: Option<String>,
    pub is_active: Option<bool>,
}

/// Division service.
#[derive(Clone)]
pub struct DivisionService {
    division_repo: DivisionRepository,
    id_gen: IdGenerator,
}

impl DivisionService {
    /// Create a new division service.
    #[must_use]
    pub const fn new(division_repo: DivisionRepository) -> Self {
        Self {
            division_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Divisions matching `filter`.
    pub async fn list(
        &self,
        filter: &DivisionFilter,
    ) -> AppResult<Vec<administrative_division::Model>> {
        self.division_repo.find(filter).await
    }

    /// Get a division by ID.
    pub async fn get(&self, id: &str) -> AppResult<administrative_division::Model> {
        self.division_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Division not found: {id}")))
    }

    /// Direct children of a division.
    pub async fn children(&self, id: &str) -> AppResult<Vec<administrative_division::Model>> {
        self.get(id).await?;
        self.division_repo.find_children(id).await
    }

    /// Create a division.
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateDivisionInput,
    ) -> AppResult<administrative_division::Model> {
        Policy::authorize(principal, Permission::ManageDivisions)?;
        input.validate()?;

        let name_fr = required_name(&input.name_fr, "name_fr")?;
        let name_ar = required_name(&input.name_ar, "name_ar")?;

        let id = self.id_gen.generate();
        let parent_id = non_blank(input.parent_id);
        self.check_parent(&id, parent_id.as_deref()).await?;
        let gps_coordinates = non_blank(input.gps_coordinates);
        check_gps(gps_coordinates.as_deref())?;

        let division = self
            .division_repo
            .create(administrative_division::ActiveModel {
                id: Set(id),
                parent_id: Set(parent_id),
                name_fr: Set(name_fr),
                name_ar: Set(name_ar),
                code: Set(non_blank(input.code)),
                division_type: Set(input.division_type),
                gps_coordinates: Set(gps_coordinates),
                is_active: Set(input.is_active),
                created_at: Set(Utc::now()),
                updated_at: Set(None),
            })
            .await?;

        tracing::info!(division_id = %division.id, "Division created");
        Ok(division)
    }

    /// Edit a division.
    pub async fn update(
        &self,
        principal: &Principal,
        id: &str,
        input: UpdateDivisionInput,
    ) -> AppResult<administrative_division::Model> {
        Policy::authorize(principal, Permission::ManageDivisions)?;
        input.validate()?;

        let existing = self.get(id).await?;
        let mut active: administrative_division::ActiveModel = existing.into();

        if let Some(parent_id) = input.parent_id {
            let parent_id = non_blank(Some(parent_id));
            self.check_parent(id, parent_id.as_deref()).await?;
            active.parent_id = Set(parent_id);
        }
        if let Some(gps) = input.gps_coordinates {
            let gps = non_blank(Some(gps));
            check_gps(gps.as_deref())?;
            active.gps_coordinates = Set(gps);
        }
        if let Some(name_fr) = &input.name_fr {
            active.name_fr = Set(required_name(name_fr, "name_fr")?);
        }
        if let Some(name_ar) = &input.name_ar {
            active.name_ar = Set(required_name(name_ar, "name_ar")?);
        }
        if let Some(division_type) = input.division_type {
            active.division_type = Set(division_type);
        }
        if let Some(code) = input.code {
            active.code = Set(non_blank(Some(code)));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        self.division_repo.update(active).await
    }

    /// Activate or deactivate a division.
    pub async fn set_active(
        &self,
        principal: &Principal,
        id: &str,
        is_active: bool,
    ) -> AppResult<administrative_division::Model> {
        self.update(
            principal,
            id,
            UpdateDivisionInput {
                is_active: Some(is_active),
                ..UpdateDivisionInput::default()
            },
        )
        .await
    }

    /// The parent must exist and must not be `id` or one of its descendants.
    async fn check_parent(&self, id: &str, parent_id: Option<&str>) -> AppResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        if parent_id == id {
            return Err(AppError::Validation(
                "A division cannot be its own parent".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut current = Some(parent_id.to_string());
        while let Some(cursor) = current {
            if cursor == id {
                return Err(AppError::Validation(
                    "A division cannot be placed under one of its descendants".to_string(),
                ));
            }
            if !seen.insert(cursor.clone()) || seen.len() > MAX_DEPTH {
                break;
            }
            let node = self.division_repo.find_by_id(&cursor).await?.ok_or_else(|| {
                AppError::Validation(format!("Parent division not found: {cursor}"))
            })?;
            current = node.parent_id;
        }
        Ok(())
    }
}
