//! Typed client for the booking backend REST API.
//!
//! Listing endpoints return opaque JSON; only the payment-related endpoints
//! are typed, since those are the ones the app acts on.

use reqwest::{Client, Method, RequestBuilder};
use url::Url;

use super::ClientError;
use crate::objects::booking::{RatingRequest, UpdateTimeStatusRequest};
use crate::objects::payment::{BookingPaymentRequest, CheckoutResponse, WalletDepositRequest};
use crate::objects::upload::UploadResponse;
use crate::objects::workspace::NearbyQuery;

/// An image to send to the media endpoint.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Typed HTTP client for the booking backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl BackendClient {
    /// Create a new `BackendClient` rooted at `base_url`.
    ///
    /// Endpoint paths are joined relative to the base, so a base of
    /// `https://api.example.com/v1` resolves `users/booking/rating` to
    /// `https://api.example.com/v1/users/booking/rating`.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http: Client::new(),
            base_url,
            access_token: None,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// `GET /users/searchbyrate` – workspaces ordered by rating.
    pub async fn search_by_rate(&self) -> Result<serde_json::Value, ClientError> {
        let resp = self.request(Method::GET, "users/searchbyrate")?.send().await?;
        parse_response(resp).await
    }

    /// `GET /workspaces` – all workspaces.
    pub async fn list_workspaces(&self) -> Result<serde_json::Value, ClientError> {
        let resp = self.request(Method::GET, "workspaces")?.send().await?;
        parse_response(resp).await
    }

    /// `GET /workspaces/nearby?lat&lng` – workspaces close to a point.
    pub async fn nearby_workspaces(
        &self,
        query: NearbyQuery,
    ) -> Result<serde_json::Value, ClientError> {
        let resp = self
            .request(Method::GET, "workspaces/nearby")?
            .query(&query)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /users/searchbyownername?name=` – workspaces by owner name.
    pub async fn search_by_owner_name(
        &self,
        name: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let resp = self
            .request(Method::GET, "users/searchbyownername")?
            .query(&[("name", name)])
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /users/rating/getallratingbyworkspaceid/{id}` – reviews of one workspace.
    pub async fn ratings_for_workspace(
        &self,
        workspace_id: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let path = format!(
            "users/rating/getallratingbyworkspaceid/{}",
            urlencoding::encode(workspace_id)
        );
        let resp = self.request(Method::GET, &path)?.send().await?;
        parse_response(resp).await
    }

    /// `POST /users/booking/rating` – submit a review.
    pub async fn submit_rating(
        &self,
        rating: &RatingRequest,
    ) -> Result<serde_json::Value, ClientError> {
        let resp = self
            .request(Method::POST, "users/booking/rating")?
            .json(rating)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /images/upload` – multipart upload, one `images` part per file.
    pub async fn upload_images(&self, files: Vec<ImageFile>) -> Result<UploadResponse, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part("images", part);
        }

        let resp = self
            .request(Method::POST, "images/upload")?
            .multipart(form)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `PUT /users/booking/updatetimestatus` – release a booking's held slot.
    pub async fn update_time_status(
        &self,
        body: &UpdateTimeStatusRequest,
    ) -> Result<(), ClientError> {
        let resp = self
            .request(Method::PUT, "users/booking/updatetimestatus")?
            .json(body)
            .send()
            .await?;
        expect_success(resp).await
    }

    /// `POST /users/wallet/deposit` – issue a checkout for a wallet deposit.
    pub async fn create_wallet_deposit(
        &self,
        body: &WalletDepositRequest,
    ) -> Result<CheckoutResponse, ClientError> {
        let resp = self
            .request(Method::POST, "users/wallet/deposit")?
            .json(body)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /users/booking/payment` – issue a checkout for a booking.
    pub async fn create_booking_payment(
        &self,
        body: &BookingPaymentRequest,
    ) -> Result<CheckoutResponse, ClientError> {
        let resp = self
            .request(Method::POST, "users/booking/payment")?
            .json(body)
            .send()
            .await?;
        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

async fn expect_success(resp: reqwest::Response) -> Result<(), ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    Ok(())
}
