use yew::prelude::*;
use rand::thread_rng;

use crate::components::particles::{self, Particle, SparkleConfig};

#[derive(Properties, PartialEq)]
pub struct SparklesProps {
    #[prop_or_default]
    pub config: SparkleConfig,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(Sparkles)]
pub fn sparkles(props: &SparklesProps) -> Html {
    let particles = use_state(Vec::<Particle>::new);

    // (Re)start the field whenever the config changes
    {
        let particles = particles.clone();
        use_effect_with_deps(
            move |config: &SparkleConfig| {
                particles.set(particles::field(config, &mut thread_rng()));
                || ()
            },
            props.config.clone(),
        );
    }

    let onclick = {
        let particles = particles.clone();
        let config = props.config.clone();
        Callback::from(move |e: MouseEvent| {
            let mut next = (*particles).clone();
            next.extend(particles::burst(
                &config,
                &mut thread_rng(),
                e.offset_x() as f64,
                e.offset_y() as f64,
            ));
            particles.set(next);
        })
    };

    html! {
        <div class={classes!("sparkles", props.class.clone())} {onclick}>
            <style>
                {r#"
                .sparkles {
                    position: absolute;
                    inset: 0;
                    overflow: hidden;
                }
                .sparkle {
                    position: absolute;
                    border-radius: 50%;
                    pointer-events: none;
                }
                @keyframes sparkle-drift {
                    from { transform: translate(0, 0); }
                    to { transform: translate(var(--drift-x), var(--drift-y)); }
                }
                @keyframes sparkle-twinkle {
                    0%, 100% { filter: brightness(1); }
                    50% { filter: brightness(0.4); }
                }
                "#}
            </style>
            {
                particles.iter().map(|p| html! {
                    <span class="sparkle" style={p.style(props.config.color)}></span>
                }).collect::<Html>()
            }
        </div>
    }
}
