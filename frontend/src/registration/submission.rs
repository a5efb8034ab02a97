use std::cell::Cell;
use std::future::Future;

use futures::future::{select, Either};
use futures::pin_mut;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::draft::{Field, ProfileDraft, ProfilePayload};
use crate::config;

pub const NETWORK_FAILURE: &str =
    "Something went wrong while sending your data. Please try again later.";
pub const SAVE_FAILED: &str = "Failed to save your profile";
pub const PROFILE_SAVED: &str = "Your profile has been saved.";
pub const USERNAME_TAKEN: &str = "A user with this Telegram username is already registered";
pub const USERNAME_CHECK_FAILED: &str = "Could not verify the username. Please try again later";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("field `{}` cannot be serialized", .0.name())]
    Payload(Field),
    #[error("unreadable response: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionResult {
    Success { message: String, bot_link: String },
    Failure { message: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    /// Another submission was already in flight; nothing was sent.
    Ignored,
    Completed(SubmissionResult),
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SaveProfileResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub bot_link: Option<String>,
    pub error: Option<String>,
}

/// Status plus the body, if it was JSON at all.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Option<SaveProfileResponse>,
}

#[derive(Serialize)]
struct CheckUsernameRequest<'a> {
    telegram_username: &'a str,
}

#[derive(Deserialize)]
struct CheckUsernameResponse {
    exists: bool,
}

/// The two backend endpoints the form talks to.
// Futures stay on the browser's single thread, so no `Send` bound is wanted.
#[allow(async_fn_in_trait)]
pub trait ProfileApi {
    async fn save_profile(&self, payload: &ProfilePayload) -> Result<ApiReply, SubmitError>;
    async fn username_exists(&self, username: &str) -> Result<bool, SubmitError>;
}

pub struct HttpProfileApi {
    base_url: String,
    timeout_ms: u32,
}

impl HttpProfileApi {
    pub fn new() -> Self {
        Self {
            base_url: config::get_backend_url().to_string(),
            timeout_ms: config::SUBMIT_TIMEOUT_MS,
        }
    }

    async fn post_profile(&self, payload: &ProfilePayload) -> Result<ApiReply, SubmitError> {
        let response = Request::post(&format!("{}{}", self.base_url, config::SAVE_PROFILE_PATH))
            .json(payload)
            .map_err(|e| SubmitError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;
        let status = response.status();
        let body = match response.json::<SaveProfileResponse>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Profile response with status {} was not JSON: {}", status, e);
                None
            }
        };
        Ok(ApiReply { status, body })
    }

    async fn post_username_check(&self, username: &str) -> Result<bool, SubmitError> {
        let response = Request::post(&format!("{}{}", self.base_url, config::CHECK_USERNAME_PATH))
            .json(&CheckUsernameRequest { telegram_username: username })
            .map_err(|e| SubmitError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;
        if !response.ok() {
            return Err(SubmitError::Network(format!("status {}", response.status())));
        }
        response
            .json::<CheckUsernameResponse>()
            .await
            .map(|body| body.exists)
            .map_err(|e| SubmitError::Decode(e.to_string()))
    }
}

impl Default for HttpProfileApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileApi for HttpProfileApi {
    async fn save_profile(&self, payload: &ProfilePayload) -> Result<ApiReply, SubmitError> {
        with_timeout(self.post_profile(payload), TimeoutFuture::new(self.timeout_ms)).await
    }

    async fn username_exists(&self, username: &str) -> Result<bool, SubmitError> {
        with_timeout(self.post_username_check(username), TimeoutFuture::new(self.timeout_ms)).await
    }
}

/// Resolves to `SubmitError::Timeout` when `timer` finishes before `request`.
pub async fn with_timeout<T, F, D>(request: F, timer: D) -> Result<T, SubmitError>
where
    F: Future<Output = Result<T, SubmitError>>,
    D: Future<Output = ()>,
{
    pin_mut!(request);
    pin_mut!(timer);
    match select(request, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(SubmitError::Timeout),
    }
}

pub fn interpret_reply(reply: ApiReply) -> SubmissionResult {
    let ApiReply { status, body } = reply;
    let body = match body {
        Some(body) => body,
        None if (200..300).contains(&status) => {
            error!("Profile endpoint answered {} without a readable body", status);
            return SubmissionResult::Failure {
                message: NETWORK_FAILURE.to_string(),
            };
        }
        None => SaveProfileResponse::default(),
    };

    let rejected = !(200..300).contains(&status) || body.success == Some(false) || body.error.is_some();
    if rejected {
        warn!("Profile rejected with status {}: {:?}", status, body.error);
        return SubmissionResult::Failure {
            message: body
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| SAVE_FAILED.to_string()),
        };
    }

    SubmissionResult::Success {
        message: body.message.unwrap_or_else(|| PROFILE_SAVED.to_string()),
        bot_link: body.bot_link.unwrap_or_else(|| config::BOT_LINK.to_string()),
    }
}

/// Clears the in-flight flag however the submission ends.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Sends drafts to the backend, at most one at a time.
pub struct SubmissionClient<A> {
    api: A,
    in_flight: Cell<bool>,
}

impl<A: ProfileApi> SubmissionClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            in_flight: Cell::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    pub async fn submit(&self, draft: &ProfileDraft) -> Submission {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            info!("Submission already in flight, ignoring");
            return Submission::Ignored;
        };

        let payload = match draft.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                error!("Could not build profile payload: {}", e);
                return Submission::Completed(SubmissionResult::Failure {
                    message: SAVE_FAILED.to_string(),
                });
            }
        };

        let result = match self.api.save_profile(&payload).await {
            Ok(reply) => interpret_reply(reply),
            Err(e) => {
                error!("Error sending profile: {}", e);
                SubmissionResult::Failure {
                    message: NETWORK_FAILURE.to_string(),
                }
            }
        };
        if let SubmissionResult::Success { .. } = result {
            info!("Profile saved for {}", payload.telegram_username);
        }
        Submission::Completed(result)
    }

    /// `Err` carries the message to show under the username field.
    pub async fn check_username(&self, username: &str) -> Result<(), String> {
        match self.api.username_exists(username.trim()).await {
            Ok(false) => Ok(()),
            Ok(true) => Err(USERNAME_TAKEN.to_string()),
            Err(e) => {
                error!("Error checking telegram username: {}", e);
                Err(USERNAME_CHECK_FAILED.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::draft::complete_draft;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::{pending, ready};
    use std::cell::RefCell;

    /// Answers every call with the next queued reply, optionally waiting on a gate first.
    struct FakeApi {
        calls: Cell<usize>,
        replies: RefCell<Vec<Result<ApiReply, SubmitError>>>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
        taken: Vec<&'static str>,
    }

    impl FakeApi {
        fn replying(replies: Vec<Result<ApiReply, SubmitError>>) -> Self {
            Self {
                calls: Cell::new(0),
                replies: RefCell::new(replies),
                gate: RefCell::new(None),
                taken: vec!["@taken"],
            }
        }
    }

    impl ProfileApi for FakeApi {
        async fn save_profile(&self, _payload: &ProfilePayload) -> Result<ApiReply, SubmitError> {
            self.calls.set(self.calls.get() + 1);
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.replies.borrow_mut().remove(0)
        }

        async fn username_exists(&self, username: &str) -> Result<bool, SubmitError> {
            if username == "@offline" {
                return Err(SubmitError::Network("offline".into()));
            }
            Ok(self.taken.iter().any(|taken| *taken == username))
        }
    }

    fn ok_reply() -> Result<ApiReply, SubmitError> {
        Ok(ApiReply {
            status: 200,
            body: Some(SaveProfileResponse {
                message: Some("Profile saved".into()),
                bot_link: Some("https://t.me/RunTrainerBot?start=42".into()),
                ..Default::default()
            }),
        })
    }

    #[test]
    fn double_submit_sends_once() {
        let (release, gate) = oneshot::channel();
        let api = FakeApi::replying(vec![ok_reply(), ok_reply()]);
        *api.gate.borrow_mut() = Some(gate);
        let client = SubmissionClient::new(api);
        let draft = complete_draft();

        let (first, second, ()) = block_on(async {
            futures::join!(client.submit(&draft), client.submit(&draft), async {
                let _ = release.send(());
            })
        });

        assert_eq!(client.api.calls.get(), 1);
        assert!(matches!(first, Submission::Completed(SubmissionResult::Success { .. })));
        assert_eq!(second, Submission::Ignored);
        assert!(!client.is_in_flight());
    }

    #[test]
    fn flag_clears_after_failure_so_resubmit_is_allowed() {
        let api = FakeApi::replying(vec![Err(SubmitError::Network("connection reset".into())), ok_reply()]);
        let client = SubmissionClient::new(api);
        let draft = complete_draft();

        let first = block_on(client.submit(&draft));
        assert_eq!(
            first,
            Submission::Completed(SubmissionResult::Failure {
                message: NETWORK_FAILURE.to_string()
            })
        );
        assert!(!client.is_in_flight());

        let second = block_on(client.submit(&draft));
        assert_eq!(
            second,
            Submission::Completed(SubmissionResult::Success {
                message: "Profile saved".into(),
                bot_link: "https://t.me/RunTrainerBot?start=42".into(),
            })
        );
        assert_eq!(client.api.calls.get(), 2);
    }

    #[test]
    fn timeout_is_a_network_failure() {
        let client = SubmissionClient::new(FakeApi::replying(vec![Err(SubmitError::Timeout)]));
        match block_on(client.submit(&complete_draft())) {
            Submission::Completed(SubmissionResult::Failure { message }) => assert!(!message.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unserializable_draft_never_hits_the_network() {
        let client = SubmissionClient::new(FakeApi::replying(vec![]));
        let mut draft = complete_draft();
        draft.update_field(Field::Height, "tall");
        let outcome = block_on(client.submit(&draft));
        assert_eq!(
            outcome,
            Submission::Completed(SubmissionResult::Failure {
                message: SAVE_FAILED.to_string()
            })
        );
        assert_eq!(client.api.calls.get(), 0);
    }

    #[test]
    fn with_timeout_prefers_whichever_finishes_first() {
        let fast = block_on(with_timeout(ready(Ok::<_, SubmitError>(7)), pending::<()>()));
        assert_eq!(fast.unwrap(), 7);

        let slow = block_on(with_timeout(pending::<Result<u8, SubmitError>>(), ready(())));
        assert!(matches!(slow, Err(SubmitError::Timeout)));
    }

    #[test]
    fn server_error_message_is_surfaced() {
        let result = interpret_reply(ApiReply {
            status: 409,
            body: Some(SaveProfileResponse {
                error: Some("Profile already exists".into()),
                ..Default::default()
            }),
        });
        assert_eq!(
            result,
            SubmissionResult::Failure {
                message: "Profile already exists".into()
            }
        );
    }

    #[test]
    fn failure_payload_on_2xx_is_rejected() {
        let result = interpret_reply(ApiReply {
            status: 200,
            body: Some(SaveProfileResponse {
                success: Some(false),
                ..Default::default()
            }),
        });
        assert_eq!(
            result,
            SubmissionResult::Failure {
                message: SAVE_FAILED.into()
            }
        );
    }

    #[test]
    fn non_json_error_falls_back_to_generic_message() {
        let result = interpret_reply(ApiReply { status: 502, body: None });
        assert_eq!(
            result,
            SubmissionResult::Failure {
                message: SAVE_FAILED.into()
            }
        );
        let garbled = interpret_reply(ApiReply { status: 200, body: None });
        assert_eq!(
            garbled,
            SubmissionResult::Failure {
                message: NETWORK_FAILURE.into()
            }
        );
    }

    #[test]
    fn missing_bot_link_uses_configured_bot() {
        let result = interpret_reply(ApiReply {
            status: 201,
            body: Some(SaveProfileResponse {
                success: Some(true),
                ..Default::default()
            }),
        });
        assert_eq!(
            result,
            SubmissionResult::Success {
                message: PROFILE_SAVED.into(),
                bot_link: config::BOT_LINK.into(),
            }
        );
    }

    #[test]
    fn username_check_maps_each_outcome() {
        let client = SubmissionClient::new(FakeApi::replying(vec![]));
        assert_eq!(block_on(client.check_username("@free")), Ok(()));
        assert_eq!(block_on(client.check_username(" @taken ")), Err(USERNAME_TAKEN.to_string()));
        assert_eq!(
            block_on(client.check_username("@offline")),
            Err(USERNAME_CHECK_FAILED.to_string())
        );
    }
}
