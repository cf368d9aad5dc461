use crate::dto::{
    ProofKind, ResponseData, SubmitProofRequest, VerificationDetails, RESPONSE_BAD_REQUEST,
    RESPONSE_INTERNAL_ERROR, RESPONSE_OK,
};
use crate::pool::Db;
use crate::sql_stmt;
use crate::verification::{self, ProofSubmission};
use rocket::serde::json::Json;
use sea_orm::{ConnectionTrait, Statement};
use sea_orm_rocket::Connection;
use tracing::warn;

#[post("/submit_proof", format = "application/json", data = "<submit_request>")]
pub async fn submit_proof(
    conn: Connection<'_, Db>,
    submit_request: Json<SubmitProofRequest>,
) -> Json<ResponseData<i32>> {
    let db = conn.into_inner();
    let submit_request = submit_request.into_inner();
    // The proof reference matching the declared kind has to be present.
    let missing_proof = match submit_request.proof_kind {
        ProofKind::Link => submit_request.proof_url.as_deref().unwrap_or("").is_empty(),
        ProofKind::Screenshot => submit_request
            .screenshot_path
            .as_deref()
            .unwrap_or("")
            .is_empty(),
    };
    if submit_request.user_address.is_empty() || missing_proof {
        return Json(ResponseData::new(
            RESPONSE_BAD_REQUEST,
            "Missing required fields".to_owned(),
            None,
        ));
    }
    let submission = ProofSubmission {
        user_address: submit_request.user_address,
        task_id: submit_request.task_id,
        proof_kind: submit_request.proof_kind,
        proof_url: submit_request.proof_url,
        screenshot_path: submit_request.screenshot_path,
        user_name: submit_request.user_name,
        additional_notes: submit_request.additional_notes,
    };
    match verification::submit_proof(db, submission).await {
        Ok(verification_id) => Json(ResponseData::new(
            RESPONSE_OK,
            "Proof submitted successfully".to_owned(),
            Some(verification_id),
        )),
        Err(error) => Json(error.into_response()),
    }
}

#[get(
    "/user_verifications?<wallet_address>",
    format = "application/json"
)]
pub async fn user_verifications(
    conn: Connection<'_, Db>,
    wallet_address: String,
) -> Json<ResponseData<Vec<VerificationDetails>>> {
    let db = conn.into_inner();
    let rows = db
        .query_all(Statement::from_sql_and_values(
            db.get_database_backend(),
            sql_stmt::USER_VERIFICATIONS,
            vec![wallet_address.to_owned().into()],
        ))
        .await;
    match rows {
        Ok(rows) => {
            let verifications = rows.iter().map(VerificationDetails::new).collect();
            Json(ResponseData::new(
                RESPONSE_OK,
                "".to_owned(),
                Some(verifications),
            ))
        }
        Err(error) => {
            warn!(
                "Error fetching verifications for {}: {:?}",
                wallet_address, error
            );
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Failed to fetch verifications".to_owned(),
                None,
            ))
        }
    }
}
