use yew::prelude::*;
use yew_hooks::use_mount;
use yew_router::prelude::*;

use crate::components::particles::SparkleConfig;
use crate::components::sparkles::Sparkles;
use crate::config;
use crate::Route;

struct Feature {
    title: &'static str,
    text: &'static str,
}

const FEATURES: &[Feature] = &[
    Feature {
        title: "Personalized",
        text: "A training plan built around your current fitness, your goal and your schedule.",
    },
    Feature {
        title: "Adaptive",
        text: "The plan adjusts itself based on your results and how each workout felt.",
    },
    Feature {
        title: "Supportive",
        text: "Workout reminders and practical advice for improving your results.",
    },
];

const STEPS: &[(&str, &str)] = &[
    ("1", "Tell us about yourself, your running experience and your goal race."),
    ("2", "Your AI coach builds a week-by-week plan for the race date."),
    ("3", "Train with daily workouts and feedback right in Telegram."),
];

#[function_component(Landing)]
pub fn landing() -> Html {
    // Scroll to top only on initial mount
    use_mount(|| {
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    });

    let hero_sparkles = SparkleConfig {
        min_size: 0.5,
        max_size: 1.5,
        ..SparkleConfig::default()
    };

    html! {
        <div class="landing">
            <style>
                {r#"
                .landing {
                    min-height: 100vh;
                    background: #000;
                    color: #fff;
                    overflow-x: hidden;
                }
                .hero {
                    position: relative;
                    height: 100vh;
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    text-align: center;
                    overflow: hidden;
                }
                .hero__content {
                    position: relative;
                    z-index: 2;
                    padding: 0 1.25rem;
                    pointer-events: none;
                }
                .hero__content a, .hero__content button { pointer-events: auto; }
                .hero h1 {
                    font-size: 5rem;
                    font-weight: 700;
                    margin-bottom: 2rem;
                }
                .hero p {
                    max-width: 48rem;
                    margin: 0 auto 3rem;
                    color: #d1d5db;
                    font-size: 1.25rem;
                }
                .hero__actions { display: flex; gap: 1rem; justify-content: center; flex-wrap: wrap; }
                .features, .how-it-works, .cta-section { padding: 5rem 1.25rem; }
                .features { background: #111827; }
                .features h2, .how-it-works h2, .cta-section h2 { text-align: center; font-size: 2.25rem; margin-bottom: 3rem; }
                .features-grid {
                    display: grid;
                    grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
                    gap: 2rem;
                    max-width: 1100px;
                    margin: 0 auto;
                }
                .feature-item { background: #1f2937; border-radius: 8px; padding: 1.5rem; }
                .feature-item p { color: #d1d5db; }
                .how-it-works ol { list-style: none; max-width: 720px; margin: 0 auto; padding: 0; }
                .how-it-works li { display: flex; gap: 1rem; align-items: baseline; margin-bottom: 1.5rem; }
                .step-number { font-size: 2rem; font-weight: 700; color: #7EB2FF; }
                .cta-button, .secondary-button {
                    display: inline-block;
                    padding: 0.9rem 1.8rem;
                    border-radius: 8px;
                    border: none;
                    font-size: 1rem;
                    cursor: pointer;
                    text-decoration: none;
                }
                .cta-button { background: #1E90FF; color: #fff; }
                .cta-button:disabled { opacity: 0.6; cursor: default; }
                .secondary-button { background: transparent; color: #fff; border: 1px solid rgba(255,255,255,0.4); }
                @media (max-width: 768px) {
                    .hero h1 { font-size: 3rem; }
                }
                "#}
            </style>

            <section class="hero">
                <Sparkles config={hero_sparkles} />
                <div class="hero__content">
                    <h1>{"RunTrainer.AI"}</h1>
                    <p>
                        {"Artificial intelligence builds a personal training plan around your fitness, your goals and your schedule."}
                    </p>
                    <div class="hero__actions">
                        <Link<Route> to={Route::Register} classes="cta-button">
                            {"Create my plan"}
                        </Link<Route>>
                        <a href={config::BOT_LINK} class="secondary-button" target="_blank" rel="noopener noreferrer">
                            {"Start in Telegram"}
                        </a>
                    </div>
                </div>
            </section>

            <section class="features">
                <h2>{"A personal coach in your phone"}</h2>
                <div class="features-grid">
                    {
                        FEATURES.iter().map(|feature| html! {
                            <div class="feature-item">
                                <h3>{feature.title}</h3>
                                <p>{feature.text}</p>
                            </div>
                        }).collect::<Html>()
                    }
                </div>
            </section>

            <section class="how-it-works">
                <h2>{"How it works"}</h2>
                <ol>
                    {
                        STEPS.iter().map(|(number, text)| html! {
                            <li>
                                <span class="step-number">{*number}</span>
                                <span>{*text}</span>
                            </li>
                        }).collect::<Html>()
                    }
                </ol>
            </section>

            <section class="cta-section">
                <h2>{"Ready for your next race?"}</h2>
                <div class="hero__actions">
                    <Link<Route> to={Route::Register} classes="cta-button">
                        {"Get started"}
                    </Link<Route>>
                </div>
            </section>
        </div>
    }
}
