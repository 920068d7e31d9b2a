//! Login page supporting sign-in and account registration.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::failure_message;
use crate::config::ClientConfig;
use crate::net::error::ApiError;
use crate::routes::resume_path;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    SignIn,
    Register,
}

impl FormMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::Register,
            Self::Register => Self::SignIn,
        }
    }
}

/// Validated form fields ready to submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub username: String,
    pub password: String,
    /// Register only; `None` when left blank.
    pub nickname: Option<String>,
}

/// What the page does once a submission settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Navigate(String),
    Show(String),
    /// Already surfaced as a notice.
    Quiet,
}

/// Trim and require both sign-in fields.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter both username and password.");
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Registration needs a matching confirmation and a minimum password length.
pub fn validate_register_input(
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(String, String), &'static str> {
    let (username, password) = validate_login_input(username, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok((username, password))
}

/// Validate the form for `mode`. Confirmation and nickname only count when
/// registering.
pub fn validate_submission(
    mode: FormMode,
    username: &str,
    password: &str,
    confirm: &str,
    nickname: &str,
) -> Result<Submission, &'static str> {
    match mode {
        FormMode::SignIn => {
            let (username, password) = validate_login_input(username, password)?;
            Ok(Submission { username, password, nickname: None })
        }
        FormMode::Register => {
            let (username, password) = validate_register_input(username, password, confirm)?;
            let nickname = Some(nickname.trim()).filter(|n| !n.is_empty()).map(str::to_owned);
            Ok(Submission { username, password, nickname })
        }
    }
}

/// Registration signs in too, so success resumes the intended route in
/// either mode.
pub fn submit_outcome(result: Result<(), ApiError>, config: &ClientConfig, redirect: Option<&str>) -> SubmitOutcome {
    match result {
        Ok(()) => SubmitOutcome::Navigate(resume_path(config, redirect)),
        Err(err) => failure_message(&err).map_or(SubmitOutcome::Quiet, SubmitOutcome::Show),
    }
}

#[cfg(feature = "csr")]
pub use view::LoginPage;

#[cfg(feature = "csr")]
mod view {
    use leptos::prelude::*;
    use leptos_router::NavigateOptions;
    use leptos_router::hooks::{use_navigate, use_query_map};

    use super::{FormMode, SubmitOutcome, submit_outcome, validate_submission};
    use crate::app::AppContextStore;

    #[component]
    pub fn LoginPage() -> impl IntoView {
        let ctx = expect_context::<AppContextStore>();
        let navigate = use_navigate();
        let query = use_query_map();

        let mode = RwSignal::new(FormMode::SignIn);
        let username = RwSignal::new(String::new());
        let password = RwSignal::new(String::new());
        let confirm = RwSignal::new(String::new());
        let nickname = RwSignal::new(String::new());
        let info = RwSignal::new(String::new());
        let busy = RwSignal::new(false);

        let on_submit = move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let current_mode = mode.get();
            let submission = match validate_submission(
                current_mode,
                &username.get(),
                &password.get(),
                &confirm.get(),
                &nickname.get(),
            ) {
                Ok(submission) => submission,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
            busy.set(true);
            info.set(String::new());

            let ctx = ctx.get_value();
            let navigate = navigate.clone();
            let redirect = query.with_untracked(|q| q.get("redirect"));
            leptos::task::spawn_local(async move {
                let result = match current_mode {
                    FormMode::SignIn => ctx.session.login(&submission.username, &submission.password).await,
                    FormMode::Register => {
                        ctx.session
                            .register(&submission.username, &submission.password, submission.nickname.as_deref())
                            .await
                    }
                };
                busy.set(false);
                match submit_outcome(result, &ctx.config, redirect.as_deref()) {
                    SubmitOutcome::Navigate(to) => {
                        navigate(&to, NavigateOptions { replace: true, ..NavigateOptions::default() });
                    }
                    SubmitOutcome::Show(message) => info.set(message),
                    SubmitOutcome::Quiet => {}
                }
            });
        };

        let toggle_mode = move |_| {
            mode.update(|m| *m = m.toggled());
            info.set(String::new());
        };

        view! {
            <div class="login-page">
                <div class="login-card">
                    <h1>"Paper Citations"</h1>
                    <p class="login-card__subtitle">
                        {move || if mode.get() == FormMode::SignIn { "Sign in" } else { "Create an account" }}
                    </p>
                    <form class="login-form" on:submit=on_submit>
                        <input
                            class="login-input"
                            type="text"
                            placeholder="Username"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                        <Show when=move || mode.get() == FormMode::Register>
                            <input
                                class="login-input"
                                type="text"
                                placeholder="Nickname (optional)"
                                prop:value=move || nickname.get()
                                on:input=move |ev| nickname.set(event_target_value(&ev))
                            />
                        </Show>
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <Show when=move || mode.get() == FormMode::Register>
                            <input
                                class="login-input"
                                type="password"
                                placeholder="Confirm password"
                                prop:value=move || confirm.get()
                                on:input=move |ev| confirm.set(event_target_value(&ev))
                            />
                        </Show>
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            {move || if mode.get() == FormMode::SignIn { "Sign In" } else { "Register" }}
                        </button>
                    </form>
                    <Show when=move || !info.get().is_empty()>
                        <p class="login-message">{move || info.get()}</p>
                    </Show>
                    <button class="login-link" type="button" on:click=toggle_mode>
                        {move || {
                            if mode.get() == FormMode::SignIn {
                                "Need an account? Register"
                            } else {
                                "Have an account? Sign in"
                            }
                        }}
                    </button>
                </div>
            </div>
        }
    }
}
