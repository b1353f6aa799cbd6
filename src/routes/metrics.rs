use actix_web::{Responder, get, web};

use crate::forms::commissions::DateRangeParams;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::ok;
use crate::services::metrics;

/// Manager dashboard over `?from=&to=` (inclusive dates).
#[get("/metrics/dashboard")]
pub async fn dashboard(
    params: web::Query<DateRangeParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(metrics::dashboard(params.into_inner(), &user, repo.get_ref()))
}

#[get("/metrics/salespeople")]
pub async fn salesperson_performance(
    params: web::Query<DateRangeParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(metrics::salesperson_performance(
        params.into_inner(),
        &user,
        repo.get_ref(),
    ))
}
