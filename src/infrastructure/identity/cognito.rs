use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
  AuthUrl, AuthorizationCode, ClientId, CsrfToken, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::identity::{
  AuthTokens, IdentityClaims, IdentityError, IdentityProvider, Password, SignUpOutcome,
  SignUpRequest, SocialProvider, Username,
};

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Connection settings for a Cognito user pool app client
#[derive(Debug, Clone)]
pub struct CognitoSettings {
  pub region: String,
  pub user_pool_id: String,
  /// Public app client (no secret), as used by browser SDKs
  pub client_id: String,
  /// Hosted UI domain, e.g. `https://digilaw.auth.ap-south-1.amazoncognito.com`
  pub hosted_ui_domain: Option<String>,
  /// Where the hosted UI sends the authorization code
  pub redirect_url: String,
  pub request_timeout_seconds: u64,
}

/// Cognito user pool client.
///
/// Account operations use the user pool JSON API directly; the hosted UI
/// code exchange goes through `oauth2`.
pub struct CognitoIdentityProvider {
  http: reqwest::Client,
  endpoint: String,
  client_id: String,
  oauth: Option<BasicClient>,
}

impl CognitoIdentityProvider {
  pub fn new(settings: CognitoSettings) -> Result<Self, IdentityError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(settings.request_timeout_seconds))
      .build()
      .map_err(|e| IdentityError::NotConfigured(e.to_string()))?;

    let oauth = settings
      .hosted_ui_domain
      .as_deref()
      .map(|domain| hosted_ui_client(domain, &settings.client_id, &settings.redirect_url))
      .transpose()?;

    if oauth.is_none() {
      tracing::warn!("Cognito hosted UI domain not configured, social login disabled");
    }

    tracing::info!(
      user_pool_id = %settings.user_pool_id,
      region = %settings.region,
      "Cognito identity provider ready"
    );

    Ok(Self {
      http,
      endpoint: format!("https://cognito-idp.{}.amazonaws.com/", settings.region),
      client_id: settings.client_id,
      oauth,
    })
  }

  async fn call<B, R>(&self, operation: &str, body: &B) -> Result<R, IdentityError>
  where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
  {
    let payload = serde_json::to_vec(body).map_err(|e| IdentityError::Provider(e.to_string()))?;

    let response = self
      .http
      .post(&self.endpoint)
      .header(CONTENT_TYPE, AMZ_JSON)
      .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, operation))
      .body(payload)
      .send()
      .await
      .map_err(|e| {
        tracing::error!("Cognito {} request failed: {}", operation, e);
        IdentityError::Provider(e.to_string())
      })?;

    let status = response.status();
    let bytes = response
      .bytes()
      .await
      .map_err(|e| IdentityError::Provider(e.to_string()))?;

    if status.is_success() {
      return serde_json::from_slice(&bytes).map_err(|e| {
        IdentityError::Provider(format!("unexpected {} response: {}", operation, e))
      });
    }

    let error: CognitoErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
    let mapped = map_cognito_error(
      error.error_type.as_deref().unwrap_or_default(),
      error.message.as_deref().unwrap_or_default(),
    );
    tracing::warn!(
      operation,
      status = status.as_u16(),
      error_type = ?error.error_type,
      "Cognito rejected request"
    );
    Err(mapped)
  }
}

fn hosted_ui_client(
  domain: &str,
  client_id: &str,
  redirect_url: &str,
) -> Result<BasicClient, IdentityError> {
  let domain = domain.trim_end_matches('/');
  let invalid = |what: &str, e: oauth2::url::ParseError| {
    IdentityError::NotConfigured(format!("invalid {}: {}", what, e))
  };

  Ok(
    BasicClient::new(
      ClientId::new(client_id.to_string()),
      None,
      AuthUrl::new(format!("{}/oauth2/authorize", domain)).map_err(|e| invalid("auth URL", e))?,
      Some(TokenUrl::new(format!("{}/oauth2/token", domain)).map_err(|e| invalid("token URL", e))?),
    )
    .set_redirect_uri(
      RedirectUrl::new(redirect_url.to_string()).map_err(|e| invalid("redirect URL", e))?,
    ),
  )
}

/// Maps a Cognito `__type` to a domain error
fn map_cognito_error(error_type: &str, message: &str) -> IdentityError {
  // Some endpoints prefix the type with a namespace: "com.amazon...#Type"
  let error_type = error_type.rsplit('#').next().unwrap_or(error_type);

  match error_type {
    "UsernameExistsException" | "AliasExistsException" => IdentityError::UsernameExists,
    "NotAuthorizedException" | "UserNotFoundException" => IdentityError::InvalidCredentials,
    "UserNotConfirmedException" => IdentityError::NotConfirmed,
    "CodeMismatchException" | "ExpiredCodeException" => IdentityError::InvalidCode,
    "InvalidPasswordException" => IdentityError::Provider(message.to_string()),
    "" => IdentityError::Provider("empty error response".to_string()),
    other => IdentityError::Provider(format!("{}: {}", other, message)),
  }
}

/// Treats an authentication failure on a token as an expired session
fn session_error(error: IdentityError) -> IdentityError {
  match error {
    IdentityError::InvalidCredentials => IdentityError::InvalidSession,
    other => other,
  }
}

#[derive(Debug, Default, Deserialize)]
struct CognitoErrorBody {
  #[serde(rename = "__type")]
  error_type: Option<String>,
  #[serde(alias = "Message")]
  message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType<'a> {
  name: &'a str,
  value: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpBody<'a> {
  client_id: &'a str,
  username: &'a str,
  password: &'a str,
  user_attributes: Vec<AttributeType<'a>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
  user_confirmed: bool,
  user_sub: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmSignUpBody<'a> {
  client_id: &'a str,
  username: &'a str,
  confirmation_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthBody<'a> {
  auth_flow: &'static str,
  client_id: &'a str,
  auth_parameters: HashMap<&'static str, &'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
  authentication_result: Option<AuthenticationResult>,
  challenge_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
  access_token: String,
  id_token: Option<String>,
  refresh_token: Option<String>,
  expires_in: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AccessTokenBody<'a> {
  access_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserResponse {
  user_attributes: Vec<UserAttribute>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserAttribute {
  name: String,
  value: Option<String>,
}

#[derive(Deserialize)]
struct EmptyResponse {}

impl GetUserResponse {
  fn into_claims(self) -> Result<IdentityClaims, IdentityError> {
    let attributes: HashMap<String, String> = self
      .user_attributes
      .into_iter()
      .filter_map(|attr| attr.value.map(|value| (attr.name, value)))
      .collect();

    let flag = |name: &str| attributes.get(name).is_some_and(|v| v == "true");

    let subject_id = attributes
      .get("sub")
      .cloned()
      .ok_or_else(|| IdentityError::Provider("GetUser returned no sub attribute".to_string()))?;

    Ok(IdentityClaims {
      subject_id,
      email: attributes.get("email").cloned(),
      name: attributes.get("name").cloned(),
      phone_number: attributes.get("phone_number").cloned(),
      email_verified: flag("email_verified"),
      phone_verified: flag("phone_number_verified"),
    })
  }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
  async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, IdentityError> {
    let body = SignUpBody {
      client_id: &self.client_id,
      username: request.username.as_str(),
      password: request.password.expose(),
      user_attributes: vec![
        AttributeType {
          name: "name",
          value: &request.name,
        },
        AttributeType {
          name: "phone_number",
          value: &request.phone_number,
        },
        AttributeType {
          name: "email",
          value: &request.email,
        },
      ],
    };

    let response: SignUpResponse = self.call("SignUp", &body).await?;

    Ok(SignUpOutcome {
      subject_id: response.user_sub,
      confirmed: response.user_confirmed,
    })
  }

  async fn confirm_sign_up(&self, username: &Username, code: &str) -> Result<(), IdentityError> {
    let body = ConfirmSignUpBody {
      client_id: &self.client_id,
      username: username.as_str(),
      confirmation_code: code,
    };

    let _: EmptyResponse = self.call("ConfirmSignUp", &body).await?;
    Ok(())
  }

  async fn sign_in(
    &self,
    username: &Username,
    password: &Password,
  ) -> Result<AuthTokens, IdentityError> {
    let body = InitiateAuthBody {
      auth_flow: "USER_PASSWORD_AUTH",
      client_id: &self.client_id,
      auth_parameters: HashMap::from([
        ("USERNAME", username.as_str()),
        ("PASSWORD", password.expose()),
      ]),
    };

    let response: InitiateAuthResponse = self.call("InitiateAuth", &body).await?;

    match (response.authentication_result, response.challenge_name) {
      (Some(result), _) => Ok(AuthTokens {
        access_token: result.access_token,
        id_token: result.id_token,
        refresh_token: result.refresh_token,
        expires_in_seconds: result.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
      }),
      (None, Some(challenge)) => Err(IdentityError::Provider(format!(
        "unsupported authentication challenge {}",
        challenge
      ))),
      (None, None) => Err(IdentityError::Provider(
        "InitiateAuth returned no tokens".to_string(),
      )),
    }
  }

  async fn current_user(&self, access_token: &str) -> Result<IdentityClaims, IdentityError> {
    let response: GetUserResponse = self
      .call("GetUser", &AccessTokenBody { access_token })
      .await
      .map_err(session_error)?;

    response.into_claims()
  }

  async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
    let _: EmptyResponse = self
      .call("GlobalSignOut", &AccessTokenBody { access_token })
      .await
      .map_err(session_error)?;
    Ok(())
  }

  fn authorization_url(
    &self,
    provider: SocialProvider,
    state: &str,
  ) -> Result<String, IdentityError> {
    let oauth = self
      .oauth
      .as_ref()
      .ok_or_else(|| IdentityError::NotConfigured("hosted UI domain".to_string()))?;

    let state = state.to_string();
    let (url, _) = oauth
      .authorize_url(move || CsrfToken::new(state))
      .add_scope(Scope::new("openid".to_string()))
      .add_scope(Scope::new("email".to_string()))
      .add_scope(Scope::new("profile".to_string()))
      // Required for GetUser with a hosted UI access token
      .add_scope(Scope::new("aws.cognito.signin.user.admin".to_string()))
      .add_extra_param("identity_provider", provider.pool_name())
      .url();

    Ok(url.to_string())
  }

  async fn exchange_code(&self, code: &str) -> Result<(AuthTokens, IdentityClaims), IdentityError> {
    let oauth = self
      .oauth
      .as_ref()
      .ok_or_else(|| IdentityError::NotConfigured("hosted UI domain".to_string()))?;

    let token_response = oauth
      .exchange_code(AuthorizationCode::new(code.to_string()))
      .request_async(async_http_client)
      .await
      .map_err(|e| IdentityError::CodeExchange(e.to_string()))?;

    let tokens = AuthTokens {
      access_token: token_response.access_token().secret().clone(),
      id_token: None,
      refresh_token: token_response.refresh_token().map(|t| t.secret().clone()),
      expires_in_seconds: token_response
        .expires_in()
        .map(|d| d.as_secs())
        .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
    };

    let claims = self.current_user(&tokens.access_token).await?;
    Ok((tokens, claims))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn settings(hosted_ui_domain: Option<&str>) -> CognitoSettings {
    CognitoSettings {
      region: "ap-south-1".to_string(),
      user_pool_id: "ap-south-1_example".to_string(),
      client_id: "client-123".to_string(),
      hosted_ui_domain: hosted_ui_domain.map(str::to_string),
      redirect_url: "http://localhost:8080/api/auth/social-callback".to_string(),
      request_timeout_seconds: 10,
    }
  }

  #[test]
  fn test_error_mapping() {
    assert!(matches!(
      map_cognito_error("UsernameExistsException", "User already exists"),
      IdentityError::UsernameExists
    ));
    assert!(matches!(
      map_cognito_error(
        "com.amazonaws.cognito#NotAuthorizedException",
        "Incorrect username or password."
      ),
      IdentityError::InvalidCredentials
    ));
    assert!(matches!(
      map_cognito_error("UserNotConfirmedException", ""),
      IdentityError::NotConfirmed
    ));
    assert!(matches!(
      map_cognito_error("ExpiredCodeException", ""),
      IdentityError::InvalidCode
    ));
    assert!(matches!(
      map_cognito_error("TooManyRequestsException", "slow down"),
      IdentityError::Provider(msg) if msg.contains("slow down")
    ));
  }

  #[test]
  fn test_sign_up_body_uses_cognito_field_names() {
    let body = SignUpBody {
      client_id: "client-123",
      username: "9876543210@digilaw.temp",
      password: "Secret123!",
      user_attributes: vec![AttributeType {
        name: "name",
        value: "Asha",
      }],
    };

    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["ClientId"], "client-123");
    assert_eq!(json["Username"], "9876543210@digilaw.temp");
    assert_eq!(json["UserAttributes"][0]["Name"], "name");
    assert_eq!(json["UserAttributes"][0]["Value"], "Asha");
  }

  #[test]
  fn test_get_user_attributes_to_claims() {
    let response: GetUserResponse = serde_json::from_str(
      r#"{
        "Username": "9876543210@digilaw.temp",
        "UserAttributes": [
          {"Name": "sub", "Value": "abc-123"},
          {"Name": "email", "Value": "9876543210@digilaw.temp"},
          {"Name": "phone_number", "Value": "+919876543210"},
          {"Name": "phone_number_verified", "Value": "true"},
          {"Name": "email_verified", "Value": "false"}
        ]
      }"#,
    )
    .unwrap();

    let claims = response.into_claims().unwrap();
    assert_eq!(claims.subject_id, "abc-123");
    assert_eq!(claims.phone_number.as_deref(), Some("+919876543210"));
    assert!(claims.phone_verified);
    assert!(!claims.email_verified);
    assert!(claims.name.is_none());
  }

  #[test]
  fn test_authorization_url_requires_hosted_ui() {
    let provider = CognitoIdentityProvider::new(settings(None)).unwrap();
    assert!(matches!(
      provider.authorization_url(SocialProvider::Google, "abc"),
      Err(IdentityError::NotConfigured(_))
    ));
  }

  #[test]
  fn test_authorization_url_targets_hosted_ui() {
    let provider = CognitoIdentityProvider::new(settings(Some(
      "https://digilaw.auth.ap-south-1.amazoncognito.com/",
    )))
    .unwrap();

    let url = provider
      .authorization_url(SocialProvider::Google, "state-xyz")
      .unwrap();

    assert!(url.starts_with("https://digilaw.auth.ap-south-1.amazoncognito.com/oauth2/authorize?"));
    assert!(url.contains("identity_provider=Google"));
    assert!(url.contains("state=state-xyz"));
    assert!(url.contains("client_id=client-123"));
  }
}
