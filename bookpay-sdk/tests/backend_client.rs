//! Integration tests for the backend client using mockito

use bookpay_sdk::client::{BackendClient, ClientError};
use bookpay_sdk::objects::{
    BookingPaymentRequest, NearbyQuery, OrderCode, PaymentMethod, RatingRequest,
    UpdateTimeStatusRequest, WalletDepositRequest,
};
use mockito::Matcher;
use url::Url;

fn client_for(server: &mockito::Server) -> BackendClient {
    let base = Url::parse(&format!("{}/api", server.url())).expect("valid mock url");
    BackendClient::new(base).with_access_token("token-1")
}

#[tokio::test]
async fn test_wallet_deposit_issues_checkout() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/users/wallet/deposit")
        .match_header("authorization", "Bearer token-1")
        .match_body(Matcher::Json(serde_json::json!({
            "walletId": "w-7",
            "amount": 100000,
            "method": "bank_transfer"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"orderCode": 991, "checkoutUrl": "https://pay.payos.vn/web/991"}"#)
        .create_async()
        .await;

    let resp = client_for(&server)
        .create_wallet_deposit(&WalletDepositRequest {
            wallet_id: "w-7".to_string(),
            amount: 100_000,
            method: PaymentMethod::BankTransfer,
        })
        .await
        .expect("deposit should succeed");

    assert_eq!(resp.order_code, OrderCode::new("991"));
    assert_eq!(resp.checkout_url.host_str(), Some("pay.payos.vn"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_booking_payment_rejected() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/users/booking/payment")
        .with_status(422)
        .with_body("amount too small")
        .create_async()
        .await;

    let result = client_for(&server)
        .create_booking_payment(&BookingPaymentRequest {
            booking_id: 42,
            amount: 1,
            method: PaymentMethod::BankTransfer,
        })
        .await;

    match result {
        Err(err @ ClientError::Api { .. }) => {
            assert!(!err.is_retryable());
            if let ClientError::Api { status, body } = err {
                assert_eq!(status.as_u16(), 422);
                assert_eq!(body, "amount too small");
            }
        }
        other => panic!("Expected ClientError::Api, got {other:?}"),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_time_status_ignores_body() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("PUT", "/api/users/booking/updatetimestatus")
        .match_body(Matcher::Json(serde_json::json!({
            "bookingId": 42,
            "orderCode": "ABC"
        })))
        .with_status(200)
        .with_body("OK")
        .create_async()
        .await;

    client_for(&server)
        .update_time_status(&UpdateTimeStatusRequest {
            booking_id: 42,
            order_code: OrderCode::new("ABC"),
        })
        .await
        .expect("update should succeed");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_time_status_server_error_is_retryable() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("PUT", "/api/users/booking/updatetimestatus")
        .with_status(503)
        .create_async()
        .await;

    let err = client_for(&server)
        .update_time_status(&UpdateTimeStatusRequest {
            booking_id: 42,
            order_code: OrderCode::new("ABC"),
        })
        .await
        .expect_err("503 must surface as an error");

    assert!(err.is_retryable());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_nearby_sends_coordinates() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/workspaces/nearby")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("lat".into(), "10.77".into()),
            Matcher::UrlEncoded("lng".into(), "106.7".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1}]"#)
        .create_async()
        .await;

    let value = client_for(&server)
        .nearby_workspaces(NearbyQuery {
            lat: 10.77,
            lng: 106.7,
        })
        .await
        .expect("nearby should succeed");

    assert_eq!(value[0]["id"], 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ratings_for_workspace() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/users/rating/getallratingbyworkspaceid/ws-17")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let value = client_for(&server)
        .ratings_for_workspace("ws-17")
        .await
        .expect("ratings should succeed");

    assert!(value.as_array().is_some_and(|a| a.is_empty()));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_rating() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/users/booking/rating")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "bookingId": 42,
            "rate": 5,
            "images": ["https://cdn.example.com/a.jpg"]
        })))
        .with_status(201)
        .with_body(r#"{"status": "created"}"#)
        .create_async()
        .await;

    let value = client_for(&server)
        .submit_rating(&RatingRequest {
            booking_id: 42,
            rate: 5,
            comment: "quiet and bright".to_string(),
            images: vec!["https://cdn.example.com/a.jpg".to_string()],
        })
        .await
        .expect("rating should succeed");

    assert_eq!(value["status"], "created");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bad_json_response() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/workspaces")
        .with_status(200)
        .with_body("<html>")
        .create_async()
        .await;

    let result = client_for(&server).list_workspaces().await;
    assert!(matches!(result, Err(ClientError::Json(_))));

    mock.assert_async().await;
}
