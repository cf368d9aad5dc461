use rocket::fairing::AdHoc;

pub mod admin;
pub mod proof;
pub mod tasks;
pub mod user;
pub mod withdrawal;

pub fn mount() -> AdHoc {
    AdHoc::on_ignite("Attaching Routes", |rocket| async {
        rocket.mount(
            "/",
            routes![
                admin::adjudicate,
                admin::pending_verifications,
                admin::settle_withdrawal,
                admin::stats,
                proof::submit_proof,
                proof::user_verifications,
                tasks::list,
                user::activate,
                user::get_user,
                user::register,
                withdrawal::list_withdrawals,
                withdrawal::request_withdrawal
            ],
        )
    })
}
