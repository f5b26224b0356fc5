//! "My info" page: profile, contact details, password and career history.

use validator::Validate;

use crate::domain::member::{Career, MemberPatch, MemberProfile};
use crate::forms::FormError;
use crate::forms::member::{
    AddressForm, CareerForm, CareerYearsForm, CharacterForm, PasswordForm, PhoneForm,
};
use crate::repository::errors::RepositoryError;
use crate::repository::{MemberReader, MemberWriter};
use crate::services::{ServiceError, ServiceResult};

pub async fn load_my_info<R>(repo: &R) -> ServiceResult<MemberProfile>
where
    R: MemberReader + ?Sized,
{
    repo.get_me().await.map_err(|err| {
        log::error!("Failed to load member profile: {err}");
        ServiceError::from(err)
    })
}

async fn apply_patch<R>(repo: &R, patch: MemberPatch) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    repo.update_me(&patch).await.map_err(|err| {
        log::error!("Failed to update member profile: {err}");
        ServiceError::from(err)
    })
}

pub async fn change_character<R>(repo: &R, form: CharacterForm) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    apply_patch(repo, form.into_patch()?).await
}

pub async fn update_phone<R>(repo: &R, form: PhoneForm) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    apply_patch(repo, form.into_patch()?).await
}

pub async fn update_address<R>(repo: &R, form: AddressForm) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    apply_patch(repo, form.into_patch()?).await
}

/// Changes the password; a rejected current password maps to
/// [`ServiceError::WrongPassword`].
pub async fn change_password<R>(repo: &R, form: PasswordForm) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    let change = form.into_change()?;
    repo.change_password(&change).await.map_err(|err| match err {
        RepositoryError::BadRequest(body) => {
            log::warn!("Password change rejected: {body}");
            ServiceError::WrongPassword
        }
        other => {
            log::error!("Failed to change password: {other}");
            ServiceError::from(other)
        }
    })
}

pub async fn update_career_years<R>(repo: &R, form: CareerYearsForm) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    form.validate().map_err(FormError::from)?;
    let patch = MemberPatch {
        career_years: Some(form.career_years),
        ..MemberPatch::default()
    };
    apply_patch(repo, patch).await
}

/// Sends the whole career list with the current career years.
async fn save_careers<R>(repo: &R, profile: &mut MemberProfile, careers: Vec<Career>) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    let patch = MemberPatch {
        career_years: Some(profile.career_years),
        careers: Some(careers.clone()),
        ..MemberPatch::default()
    };
    apply_patch(repo, patch).await?;
    profile.careers = careers;
    Ok(())
}

/// Appends a career entry; `profile` is only changed once the backend accepts it.
pub async fn add_career<R>(repo: &R, profile: &mut MemberProfile, form: CareerForm) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    let career = form.into_career()?;
    let mut careers = profile.careers.clone();
    careers.push(career);
    save_careers(repo, profile, careers).await
}

pub async fn save_career<R>(
    repo: &R,
    profile: &mut MemberProfile,
    index: usize,
    form: CareerForm,
) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    let career = form.into_career()?;
    let mut careers = profile.careers.clone();
    let slot = careers.get_mut(index).ok_or(ServiceError::NotFound)?;
    *slot = career;
    save_careers(repo, profile, careers).await
}

pub async fn delete_career<R>(repo: &R, profile: &mut MemberProfile, index: usize) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    if index >= profile.careers.len() {
        return Err(ServiceError::NotFound);
    }
    let mut careers = profile.careers.clone();
    careers.remove(index);
    save_careers(repo, profile, careers).await
}
