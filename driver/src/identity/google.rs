use error_stack::{Report, ResultExt};
use kernel::interface::identity::IdentityProvider;
use kernel::prelude::entity::{AuthorizationCode, OAuthProfile, OAuthState, UserEmail, UserName};
use kernel::KernelError;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::env;
use crate::error::ConvertError;

const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
const GOOGLE_CALLBACK_URL: &str = "GOOGLE_CALLBACK_URL";

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPE: &str = "openid email profile";

pub struct GoogleIdentityProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    callback_url: String,
}

impl GoogleIdentityProvider {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self {
            client: Client::new(),
            client_id: env(GOOGLE_CLIENT_ID)?,
            client_secret: env(GOOGLE_CLIENT_SECRET)?,
            callback_url: env(GOOGLE_CALLBACK_URL)?,
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    email: String,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<UserInfo> for OAuthProfile {
    type Error = Report<KernelError>;
    fn try_from(info: UserInfo) -> Result<Self, Self::Error> {
        if !info.email_verified {
            return Err(Report::new(KernelError::Unauthorized)
                .attach_printable(format!("Email {} is not verified", info.email)));
        }
        let name = info
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| info.email.clone());
        Ok(OAuthProfile::new(UserName::new(name), UserEmail::new(info.email)))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self, state: &OAuthState) -> error_stack::Result<String, KernelError> {
        let url = Url::parse_with_params(
            AUTHORIZE_ENDPOINT,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("state", state.as_ref().as_str()),
            ],
        )
        .change_context_lazy(|| KernelError::Internal)?;
        Ok(url.into())
    }

    #[tracing::instrument(skip_all)]
    async fn fetch_profile(
        &self,
        code: &AuthorizationCode,
    ) -> error_stack::Result<OAuthProfile, KernelError> {
        let token: TokenResponse = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code.as_ref().as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .convert_error()?
            .json()
            .await
            .convert_error()?;

        let info: UserInfo = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(token.access_token)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .convert_error()?
            .json()
            .await
            .convert_error()?;

        OAuthProfile::try_from(info)
    }
}

impl<T> ConvertError for Result<T, reqwest::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = if error.is_timeout() {
                KernelError::Timeout
            } else if error.status().is_some_and(|status| status.is_client_error()) {
                KernelError::Unauthorized
            } else {
                KernelError::Internal
            };
            Report::new(error).change_context(context)
        })
    }
}
