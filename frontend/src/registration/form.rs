use std::rc::Rc;

use gloo_console::log;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::sparkles::Sparkles;
use crate::config;
use crate::registration::controller::{validate_step, FormAction, FormSession, Step};
use crate::registration::draft::{
    ComfortablePace, Experience, Field, Gender, GoalDistance, Weekday, TRAINING_DAYS_OPTIONS,
};
use crate::registration::submission::{HttpProfileApi, Submission, SubmissionClient};

type Dispatcher = UseReducerDispatcher<FormSession>;

fn field_error(session: &FormSession, field: Field) -> Html {
    match session.error_for(field) {
        Some(message) => html! { <div class="field-error">{message}</div> },
        None => html! {},
    }
}

fn input_class(session: &FormSession, field: Field) -> Classes {
    classes!("form-control", session.error_for(field).map(|_| "is-invalid"))
}

fn text_input(
    session: &FormSession,
    dispatcher: &Dispatcher,
    field: Field,
    kind: &'static str,
    placeholder: &'static str,
) -> Html {
    let oninput = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatcher.dispatch(FormAction::Update(field, input.value()));
        })
    };
    html! {
        <div class="form-group">
            <label for={field.name()}>{field.label()}</label>
            <input
                type={kind}
                id={field.name()}
                name={field.name()}
                class={input_class(session, field)}
                value={session.draft.value(field)}
                {placeholder}
                {oninput}
                disabled={session.submitting || (field == Field::TelegramUsername && session.is_checking_username())}
            />
            {field_error(session, field)}
        </div>
    }
}

fn select_input(
    session: &FormSession,
    dispatcher: &Dispatcher,
    field: Field,
    options: Vec<(&'static str, &'static str)>,
) -> Html {
    let onchange = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            dispatcher.dispatch(FormAction::Update(field, select.value()));
        })
    };
    let current = session.draft.value(field);
    html! {
        <div class="form-group">
            <label for={field.name()}>{field.label()}</label>
            <select
                id={field.name()}
                name={field.name()}
                class={input_class(session, field)}
                {onchange}
                disabled={session.submitting}
            >
                <option value="" selected={current.is_empty()}>{"Choose..."}</option>
                {
                    options.into_iter().map(|(value, label)| html! {
                        <option {value} selected={current == value}>{label}</option>
                    }).collect::<Html>()
                }
            </select>
            {field_error(session, field)}
        </div>
    }
}

fn weekday_picker(session: &FormSession, dispatcher: &Dispatcher) -> Html {
    html! {
        <div class="form-group">
            <label>{Field::PreferredTrainingDays.label()}</label>
            <div class="weekday-options">
                {
                    Weekday::ALL.iter().map(|&day| {
                        let onchange = {
                            let dispatcher = dispatcher.clone();
                            Callback::from(move |_: Event| {
                                dispatcher.dispatch(FormAction::Update(
                                    Field::PreferredTrainingDays,
                                    day.token().to_string(),
                                ));
                            })
                        };
                        let id = format!("day-{}", day.token());
                        html! {
                            <div class="form-check">
                                <input
                                    type="checkbox"
                                    id={id.clone()}
                                    value={day.token()}
                                    checked={session.draft.has_day(day)}
                                    {onchange}
                                    disabled={session.submitting}
                                />
                                <label for={id}>{day.label()}</label>
                            </div>
                        }
                    }).collect::<Html>()
                }
            </div>
        </div>
    }
}

fn choices<T: Copy>(all: &[T], token: fn(T) -> &'static str, label: fn(T) -> &'static str) -> Vec<(&'static str, &'static str)> {
    all.iter().map(|&choice| (token(choice), label(choice))).collect()
}

fn step_fields(session: &FormSession, dispatcher: &Dispatcher) -> Html {
    match session.step {
        Step::Personal => html! {
            <>
                {text_input(session, dispatcher, Field::TelegramUsername, "text", "@username")}
                {
                    match &session.username_hint {
                        Some(hint) => html! { <div class="field-hint">{hint}</div> },
                        None => html! {},
                    }
                }
                {text_input(session, dispatcher, Field::Name, "text", "Ivan")}
                {select_input(session, dispatcher, Field::Gender, choices(Gender::ALL, Gender::token, Gender::label))}
                {text_input(session, dispatcher, Field::Age, "number", "30")}
                {text_input(session, dispatcher, Field::Height, "number", "175")}
                {text_input(session, dispatcher, Field::Weight, "number", "70")}
            </>
        },
        Step::Experience => html! {
            <>
                {select_input(session, dispatcher, Field::Experience, choices(Experience::ALL, Experience::token, Experience::label))}
                {text_input(session, dispatcher, Field::WeeklyVolume, "number", "20")}
                {select_input(session, dispatcher, Field::ComfortablePace, choices(ComfortablePace::ALL, ComfortablePace::token, ComfortablePace::label))}
            </>
        },
        Step::Goal => html! {
            <>
                {select_input(session, dispatcher, Field::GoalDistance, choices(GoalDistance::ALL, GoalDistance::token, GoalDistance::label))}
                {text_input(session, dispatcher, Field::GoalDate, "date", "")}
                {text_input(session, dispatcher, Field::TargetTime, "text", "1:45:00")}
                {select_input(
                    session,
                    dispatcher,
                    Field::TrainingDaysPerWeek,
                    TRAINING_DAYS_OPTIONS.iter().map(|&days| (days, days)).collect(),
                )}
                {weekday_picker(session, dispatcher)}
            </>
        },
    }
}

#[function_component(RegistrationForm)]
pub fn registration_form() -> Html {
    let session = use_reducer(FormSession::default);
    let client = use_memo(|_| SubmissionClient::new(HttpProfileApi::new()), ());
    // Set synchronously so a double click cannot start a second check before re-render
    let check_guard = use_mut_ref(|| false);

    // Send the runner on to the bot once the profile is stored
    {
        let bot_link = session.success.as_ref().map(|view| view.bot_link.clone());
        use_effect_with_deps(
            move |bot_link: &Option<String>| {
                if let Some(link) = bot_link.clone() {
                    spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(config::REDIRECT_DELAY_MS).await;
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().set_href(&link);
                        }
                    });
                }
                || ()
            },
            bot_link,
        );
    }

    let on_next = {
        let session = session.clone();
        let client = Rc::clone(&client);
        let check_guard = check_guard.clone();
        Callback::from(move |_: ()| {
            if session.step != Step::Personal {
                session.dispatch(FormAction::Next);
                return;
            }
            if *check_guard.borrow() || session.is_checking_username() {
                return;
            }
            let errors = validate_step(Step::Personal, &session.draft);
            if !errors.is_empty() {
                session.dispatch(FormAction::ShowErrors(errors));
                return;
            }

            // The username must not be registered yet
            let dispatcher = session.dispatcher();
            let client = Rc::clone(&client);
            let check_guard = check_guard.clone();
            let username = session.draft.telegram_username.clone();
            *check_guard.borrow_mut() = true;
            session.dispatch(FormAction::UsernameCheckStarted(username.clone()));
            spawn_local(async move {
                let outcome = client.check_username(&username).await;
                *check_guard.borrow_mut() = false;
                dispatcher.dispatch(FormAction::UsernameChecked { username, outcome });
            });
        })
    };

    let on_back = {
        let session = session.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            session.dispatch(FormAction::Back);
        })
    };

    let on_submit = {
        let session = session.clone();
        let client = Rc::clone(&client);
        let on_next = on_next.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if session.step != Step::Goal {
                on_next.emit(());
                return;
            }
            if session.submitting || session.is_finished() || client.is_in_flight() {
                return;
            }
            let errors = validate_step(Step::Goal, &session.draft);
            if !errors.is_empty() {
                session.dispatch(FormAction::ShowErrors(errors));
                return;
            }

            session.dispatch(FormAction::SubmitStarted);
            let dispatcher = session.dispatcher();
            let client = Rc::clone(&client);
            let draft = session.draft.clone();
            spawn_local(async move {
                match client.submit(&draft).await {
                    Submission::Completed(result) => {
                        log!("Profile submission finished");
                        dispatcher.dispatch(FormAction::SubmitFinished(result));
                    }
                    Submission::Ignored => log!("Duplicate submit ignored"),
                }
            });
        })
    };

    let dispatcher = session.dispatcher();

    html! {
        <div class="registration-card">
            <style>
                {r#"
                .registration-card {
                    position: relative;
                    max-width: 720px;
                    margin: 0 auto;
                    background: rgba(30, 30, 30, 0.8);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 16px;
                    overflow: hidden;
                }
                .registration-header {
                    position: relative;
                    padding: 2rem;
                    background: #0d47a1;
                    text-align: center;
                }
                .registration-header h2, .registration-header p {
                    position: relative;
                    z-index: 1;
                    margin: 0.5rem 0;
                }
                .registration-body {
                    padding: 2rem;
                }
                .progress {
                    height: 8px;
                    background: rgba(255, 255, 255, 0.1);
                    border-radius: 4px;
                    margin-bottom: 2rem;
                }
                .progress-bar {
                    height: 100%;
                    background: #2e7d32;
                    border-radius: 4px;
                    transition: width 0.3s ease;
                }
                .form-group {
                    display: flex;
                    flex-direction: column;
                    gap: 0.4rem;
                    margin-bottom: 1.2rem;
                }
                .form-control {
                    padding: 0.7rem;
                    border-radius: 8px;
                    border: 1px solid rgba(255, 255, 255, 0.2);
                    background: rgba(0, 0, 0, 0.3);
                    color: #fff;
                }
                .form-control.is-invalid {
                    border-color: #e53935;
                }
                .field-error { color: #ef5350; font-size: 0.85rem; }
                .field-hint { color: #66bb6a; font-size: 0.85rem; margin-top: -0.8rem; margin-bottom: 1rem; }
                .weekday-options { display: flex; flex-wrap: wrap; gap: 1rem; }
                .form-actions { display: flex; justify-content: space-between; margin-top: 2rem; }
                .form-actions .spacer { flex: 1; }
                .submit-error {
                    background: rgba(229, 57, 53, 0.15);
                    border: 1px solid #e53935;
                    border-radius: 8px;
                    padding: 1rem;
                    margin-bottom: 1.5rem;
                }
                .success-panel { text-align: center; padding: 1rem 0; }
                .loading-spinner {
                    display: inline-block;
                    width: 14px;
                    height: 14px;
                    margin-right: 0.5rem;
                    border: 2px solid rgba(255,255,255,.3);
                    border-radius: 50%;
                    border-top-color: #fff;
                    animation: spin 1s ease-in-out infinite;
                }
                @keyframes spin { to { transform: rotate(360deg); } }
                "#}
            </style>
            <div class="registration-header">
                <Sparkles />
                <h2>{"Create your running plan"}</h2>
                <p>{"Your personal AI coach will build a plan just for you"}</p>
            </div>
            <div class="registration-body">
                <div class="progress">
                    <div
                        class="progress-bar"
                        role="progressbar"
                        style={format!("width: {}%;", session.step.progress_percent())}
                        aria-valuenow={session.step.index().to_string()}
                        aria-valuemin="0"
                        aria-valuemax={Step::COUNT.to_string()}
                    ></div>
                </div>
                {
                    if let Some(success) = session.success.as_ref() {
                        html! {
                            <div class="success-panel">
                                <h3>{"Profile created!"}</h3>
                                <p>{&success.message}</p>
                                <p>{"Continue in the Telegram bot to start training. Redirecting..."}</p>
                                <a href={success.bot_link.clone()} class="cta-button" target="_blank" rel="noopener noreferrer">
                                    {"Open Telegram"}
                                </a>
                            </div>
                        }
                    } else {
                        html! {
                            <>
                                {
                                    match &session.submit_error {
                                        Some(message) => html! { <div class="submit-error" role="alert">{message}</div> },
                                        None => html! {},
                                    }
                                }
                                <form onsubmit={on_submit}>
                                    <h3>{session.step.title()}</h3>
                                    {step_fields(&session, &dispatcher)}
                                    <div class="form-actions">
                                        {
                                            if session.step != Step::Personal {
                                                html! {
                                                    <button type="button" class="secondary-button" onclick={on_back} disabled={session.submitting}>
                                                        {"← Back"}
                                                    </button>
                                                }
                                            } else {
                                                html! { <span class="spacer"></span> }
                                            }
                                        }
                                        {
                                            if session.step == Step::Goal {
                                                html! {
                                                    <button type="submit" class="cta-button" disabled={session.submitting}>
                                                        if session.submitting {
                                                            <span class="loading-spinner"></span>{"Processing..."}
                                                        } else {
                                                            {"Create plan ✓"}
                                                        }
                                                    </button>
                                                }
                                            } else {
                                                html! {
                                                    <button
                                                        type="button"
                                                        class="cta-button"
                                                        onclick={on_next.reform(|e: MouseEvent| e.prevent_default())}
                                                        disabled={session.is_checking_username()}
                                                    >
                                                        if session.is_checking_username() {
                                                            <span class="loading-spinner"></span>{"Checking..."}
                                                        } else {
                                                            {"Next →"}
                                                        }
                                                    </button>
                                                }
                                            }
                                        }
                                    </div>
                                </form>
                            </>
                        }
                    }
                }
            </div>
        </div>
    }
}
