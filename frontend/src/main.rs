use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod config;
mod components {
    pub mod particles;
    pub mod sparkles;
}
mod pages {
    pub mod landing;
}
mod registration {
    pub mod controller;
    pub mod draft;
    pub mod form;
    pub mod submission;
    pub mod validators;
}

use pages::landing::Landing;
use registration::form::RegistrationForm;


#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/register")]
    Register,
    #[not_found]
    #[at("/404")]
    NotFound,
}


fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Landing /> }
        },
        Route::Register => {
            info!("Rendering Register page");
            html! {
                <div class="register-page">
                    <RegistrationForm />
                </div>
            }
        },
        Route::NotFound => {
            info!("Unknown route, redirecting home");
            html! { <Redirect<Route> to={Route::Home} /> }
        },
    }
}


/// The nav gets a solid background once the page leaves the very top.
const NAV_SCROLL_THRESHOLD: f64 = 80.0;

fn nav_is_scrolled(scroll_y: f64) -> bool {
    scroll_y > NAV_SCROLL_THRESHOLD
}


#[function_component]
pub fn Nav() -> Html {
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let window = web_sys::window();
            let scroll_callback = window.as_ref().map(|window| {
                let scroll_window = window.clone();
                let callback = Closure::wrap(Box::new(move || {
                    let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
                    is_scrolled.set(nav_is_scrolled(scroll_y));
                }) as Box<dyn FnMut()>);
                let _ = window.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref());
                callback
            });

            move || {
                if let (Some(window), Some(callback)) = (web_sys::window(), scroll_callback) {
                    let _ = window.remove_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref());
                }
            }
        }, ());
    }

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <style>
                {r#"
                body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; background: #000; }
                .top-nav {
                    position: fixed;
                    top: 0;
                    left: 0;
                    right: 0;
                    z-index: 10;
                    transition: background 0.3s ease;
                }
                .top-nav.scrolled { background: rgba(0, 0, 0, 0.85); backdrop-filter: blur(10px); }
                .nav-content { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; }
                .nav-logo, .nav-link { color: #fff; text-decoration: none; }
                .nav-logo { font-weight: 700; font-size: 1.25rem; }
                .register-page { min-height: 100vh; padding: 6rem 1rem 3rem; color: #fff; }
                "#}
            </style>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"RunTrainer.AI"}
                </Link<Route>>
                <Link<Route> to={Route::Register} classes="nav-link">
                    {"Create plan"}
                </Link<Route>>
            </div>
        </nav>
    }
}


#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}


fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_turns_solid_past_threshold() {
        assert!(!nav_is_scrolled(0.0));
        assert!(!nav_is_scrolled(NAV_SCROLL_THRESHOLD));
        assert!(nav_is_scrolled(NAV_SCROLL_THRESHOLD + 1.0));
    }
}
