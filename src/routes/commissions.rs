use actix_web::{Responder, get, post, put, web};

use crate::forms::commissions::{
    CommissionRuleForm, CommissionStatusForm, DateRangeParams, RegisterSaleForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::commissions;

#[get("/commission-rules")]
pub async fn list_commission_rules(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(commissions::list_commission_rules(&user, repo.get_ref()))
}

/// Creates or replaces the rule for the form's sale type.
#[put("/commission-rules")]
pub async fn set_commission_rule(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CommissionRuleForm>,
) -> impl Responder {
    ok(commissions::set_commission_rule(form, &user, repo.get_ref()))
}

#[post("/sales")]
pub async fn register_sale(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegisterSaleForm>,
) -> impl Responder {
    created(commissions::register_sale(form, &user, repo.get_ref()))
}

#[get("/commissions")]
pub async fn list_commissions(
    params: web::Query<DateRangeParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(commissions::list_commissions(
        params.into_inner(),
        &user,
        repo.get_ref(),
    ))
}

#[get("/commissions/summary")]
pub async fn commission_summary(
    params: web::Query<DateRangeParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(commissions::commission_summary(
        params.into_inner(),
        &user,
        repo.get_ref(),
    ))
}

#[put("/commissions/{commission_id}/status")]
pub async fn set_commission_status(
    commission_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CommissionStatusForm>,
) -> impl Responder {
    ok(commissions::set_commission_status(
        commission_id.into_inner(),
        form,
        &user,
        repo.get_ref(),
    ))
}
