// Merchant create/edit form validation

use console_domain::{normalize_optional_text, CreateMerchantDto, MerchantStatus, UpdateMerchantDto};

use crate::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchantDraft {
    pub name: String,
    pub description: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub status: Option<String>,
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    normalize_optional_text(Some(value.to_string()))
        .ok_or_else(|| AppError::validation(format!("{field} is required")))
}

pub fn build_create_merchant(draft: &MerchantDraft) -> Result<CreateMerchantDto, AppError> {
    let name = required(&draft.name, "merchant name")?;
    let admin_email = required(&draft.admin_email, "admin email")?;
    if !admin_email.contains('@') {
        return Err(AppError::validation("admin email is not a valid email address"));
    }
    if draft.admin_password.is_empty() {
        return Err(AppError::validation("admin password is required"));
    }
    let admin_name = required(&draft.admin_name, "admin name")?;

    Ok(CreateMerchantDto {
        name,
        description: normalize_optional_text(Some(draft.description.clone())),
        admin_email,
        admin_password: draft.admin_password.clone(),
        admin_name,
    })
}

pub fn build_update_merchant(draft: &MerchantDraft) -> Result<UpdateMerchantDto, AppError> {
    let name = required(&draft.name, "merchant name")?;
    let status = match normalize_optional_text(draft.status.clone()) {
        Some(raw) => Some(
            MerchantStatus::parse(&raw)
                .ok_or_else(|| AppError::validation(format!("unknown merchant status: {raw}")))?,
        ),
        None => None,
    };

    Ok(UpdateMerchantDto {
        name: Some(name),
        description: normalize_optional_text(Some(draft.description.clone())),
        status,
    })
}
