use crate::dto::StatusResponse;
use crate::repository::HealthReader;
use crate::services::ServiceResult;

/// Liveness check; touches the database so a broken pool is reported.
pub fn check_health<R>(repo: &R) -> ServiceResult<StatusResponse>
where
    R: HealthReader + ?Sized,
{
    repo.ping().map_err(|err| {
        log::error!("Health check failed: {err}");
        err
    })?;

    Ok(StatusResponse::OK)
}
