pub mod config;
pub mod deck;
pub mod gallery;
pub mod gesture;
pub mod profiles;
pub mod state;

use config::load_config;
use deck::{Card, CardPhase};
use gallery::Gallery;
use gesture::{
    drag_transform, label_opacity, snap_back_transition, Direction, GestureConfig, KeyCommand,
    LabelOpacity,
};
use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use profiles::{generate_profiles, PLACEHOLDER_IMAGE};
use state::{AppAction, AppState};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsCast;
use yew::functional::UseReducerDispatcher;
use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    let store = use_reducer(|| {
        let config = load_config();
        AppState::new(config, generate_profiles(config.deck_size))
    });
    let top_card_ref = use_node_ref();
    let gallery_close_ref = use_node_ref();

    {
        let dispatcher = store.dispatcher();
        use_effect_with_deps(
            move |_| {
                let listener = web_sys::window()
                    .and_then(|window| window.document())
                    .map(|document| {
                        EventListener::new(&document, "keydown", move |event| {
                            if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                                if event.key() == "Escape" {
                                    dispatcher.dispatch(AppAction::CloseGallery);
                                }
                            }
                        })
                    });
                move || drop(listener)
            },
            (),
        );
    }

    // Keyboard focus follows whichever card is on top.
    {
        let top_card_ref = top_card_ref.clone();
        let top_id = store.deck.top().map(|card| card.id().to_string());
        use_effect_with_deps(
            move |_| {
                if let Some(element) = top_card_ref.cast::<web_sys::HtmlElement>() {
                    let _ = element.focus();
                }
                || ()
            },
            top_id,
        );
    }

    {
        let gallery_close_ref = gallery_close_ref.clone();
        let open_for = store.gallery.as_ref().map(|gallery| gallery.profile_id.clone());
        use_effect_with_deps(
            move |open_for: &Option<String>| {
                if open_for.is_some() {
                    if let Some(button) = gallery_close_ref.cast::<web_sys::HtmlElement>() {
                        let _ = button.focus();
                    }
                }
                || ()
            },
            open_for,
        );
    }

    // Cards normally leave on `transitionend`; the timer covers pages where
    // the transition never runs.
    {
        let dispatcher = store.dispatcher();
        let fallback_ms = store.config.exit_fallback_ms;
        use_effect_with_deps(
            move |leaving: &Vec<String>| {
                let timeouts: Vec<Timeout> = leaving
                    .iter()
                    .cloned()
                    .map(|card_id| {
                        let dispatcher = dispatcher.clone();
                        Timeout::new(fallback_ms, move || {
                            dispatcher.dispatch(AppAction::TransitionFinished { card_id });
                        })
                    })
                    .collect();
                move || drop(timeouts)
            },
            store.deck.leaving_ids(),
        );
    }

    let on_shuffle = {
        let store = store.clone();
        Callback::from(move |_: MouseEvent| {
            store.dispatch(AppAction::Reset(generate_profiles(store.config.deck_size)));
        })
    };

    let dismiss_button = |direction: Direction| {
        let store = store.clone();
        Callback::from(move |_: MouseEvent| store.dispatch(AppAction::DismissTop(direction)))
    };

    let on_close_gallery = {
        let store = store.clone();
        Callback::from(move |_| store.dispatch(AppAction::CloseGallery))
    };

    let deck_markup = if store.deck.is_exhausted() {
        render_empty_state()
    } else {
        let dispatcher = store.dispatcher();
        html! {
            <>
                { for store.deck.cards().iter().map(|card| {
                    let is_top = store.deck.is_top(card.id());
                    let node_ref = if is_top { top_card_ref.clone() } else { NodeRef::default() };
                    render_card(card, is_top, store.deck.config(), &dispatcher, node_ref)
                }) }
            </>
        }
    };

    html! {
        <div class="app-container">
            <header class="topbar">
                <h1 class="brand">{ "Swipe" }</h1>
                <button id="shuffleBtn" class="btn btn--ghost" onclick={on_shuffle}>{ "Shuffle" }</button>
            </header>
            <main class="content">
                <section id="deck" class="deck" aria-live="polite">
                    { deck_markup }
                </section>
                <nav class="controls">
                    <button id="nopeBtn" class="ctrl ctrl--nope" aria-label="Nope"
                        onclick={dismiss_button(Direction::Left)}>{ "✕" }</button>
                    <button id="superLikeBtn" class="ctrl ctrl--super" aria-label="Super like"
                        onclick={dismiss_button(Direction::Up)}>{ "★" }</button>
                    <button id="likeBtn" class="ctrl ctrl--like" aria-label="Like"
                        onclick={dismiss_button(Direction::Right)}>{ "♥" }</button>
                </nav>
            </main>
            { render_gallery(store.gallery.as_ref(), &gallery_close_ref, on_close_gallery) }
        </div>
    }
}

fn render_card(
    card: &Card,
    is_top: bool,
    config: &GestureConfig,
    dispatcher: &UseReducerDispatcher<AppState>,
    node_ref: NodeRef,
) -> Html {
    let profile = card.profile();
    let id = profile.id.clone();
    let dragging = matches!(card.phase(), CardPhase::Dragging(_));

    let (classes, style, labels) = match card.phase() {
        CardPhase::Idle => (classes!("card"), String::new(), LabelOpacity::default()),
        CardPhase::Dragging(session) => {
            let (dx, dy) = session.delta();
            (
                classes!("card", "card--dragging"),
                format!("transform: {};", drag_transform(dx, dy)),
                label_opacity(dx, dy, config),
            )
        }
        CardPhase::SnappingBack => (
            classes!("card"),
            format!("transition: {};", snap_back_transition(config)),
            LabelOpacity::default(),
        ),
        CardPhase::Leaving(direction) => (
            classes!("card", "card--leaving", direction.fly_class()),
            String::new(),
            LabelOpacity::for_direction(*direction),
        ),
    };

    let pointer_down = {
        let dispatcher = dispatcher.clone();
        let id = id.clone();
        Callback::from(move |event: web_sys::PointerEvent| {
            if is_top {
                event.prevent_default();
                if let Some(target) = event_element(&event) {
                    let _ = target.set_pointer_capture(event.pointer_id());
                }
            }
            dispatcher.dispatch(AppAction::PointerDown {
                card_id: id.clone(),
                pointer_id: event.pointer_id(),
                x: event.client_x() as f64,
                y: event.client_y() as f64,
                time_ms: event.time_stamp(),
            });
        })
    };

    let pointer_move = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |event: web_sys::PointerEvent| {
            if !dragging {
                return;
            }
            event.prevent_default();
            dispatcher.dispatch(AppAction::PointerMove {
                pointer_id: event.pointer_id(),
                x: event.client_x() as f64,
                y: event.client_y() as f64,
            });
        })
    };

    let pointer_up = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |event: web_sys::PointerEvent| {
            if !dragging {
                return;
            }
            release_capture(&event);
            dispatcher.dispatch(AppAction::PointerUp {
                pointer_id: event.pointer_id(),
                x: event.client_x() as f64,
                y: event.client_y() as f64,
            });
        })
    };

    let pointer_cancel = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |event: web_sys::PointerEvent| {
            if !dragging {
                return;
            }
            release_capture(&event);
            dispatcher.dispatch(AppAction::PointerCancel {
                pointer_id: event.pointer_id(),
            });
        })
    };

    let key_down = {
        let dispatcher = dispatcher.clone();
        let id = id.clone();
        Callback::from(move |event: web_sys::KeyboardEvent| {
            if !is_top {
                return;
            }
            let key = event.key();
            if KeyCommand::from_key(&key).is_some() {
                event.prevent_default();
                dispatcher.dispatch(AppAction::Key {
                    card_id: id.clone(),
                    key,
                });
            }
        })
    };

    let transition_end = {
        let dispatcher = dispatcher.clone();
        let id = id.clone();
        Callback::from(move |event: web_sys::TransitionEvent| {
            if event.property_name() != "transform" {
                return;
            }
            dispatcher.dispatch(AppAction::TransitionFinished {
                card_id: id.clone(),
            });
        })
    };

    let on_image_error =
        Callback::from(|event: web_sys::Event| swap_in_placeholder(&event, Some("Photo unavailable")));

    let label_style = |opacity: f64| format!("opacity: {:.2};", opacity);

    html! {
        <article key={id.clone()}
            ref={node_ref}
            class={classes}
            style={style}
            data-id={id.clone()}
            tabindex={if is_top { "0" } else { "-1" }}
            aria-label={format!("{}, {}", profile.name, profile.age)}
            onpointerdown={pointer_down}
            onpointermove={pointer_move}
            onpointerup={pointer_up}
            onpointercancel={pointer_cancel}
            onkeydown={key_down}
            ontransitionend={transition_end}>
            <div class="swipe-label swipe-label--like" style={label_style(labels.like)}>{ "LIKE" }</div>
            <div class="swipe-label swipe-label--nope" style={label_style(labels.nope)}>{ "NOPE" }</div>
            <div class="swipe-label swipe-label--super" style={label_style(labels.superlike)}>{ "SUPER" }</div>
            <img class="card__media"
                src={profile.cover_image().to_string()}
                alt={format!("{} profile photo", profile.name)}
                draggable="false"
                onerror={on_image_error} />
            <div class="card__body">
                <div class="title-row">
                    <h2 class="card__title">{ &profile.name }</h2>
                    <span class="card__age">{ profile.age.to_string() }</span>
                </div>
                <div class="card__meta">{ format!("{} • {}", profile.title, profile.city) }</div>
                <div class="card__chips">
                    { for profile.tags.iter().take(4).map(|tag| html! { <span class="chip">{ tag }</span> }) }
                </div>
            </div>
        </article>
    }
}

fn render_empty_state() -> Html {
    html! {
        <div class="deck__empty">
            <span class="deck__empty-icon">{ "🔥" }</span>
            <p>{ "You've seen everyone" }</p>
            <p class="deck__empty-hint">{ "Hit Shuffle to load more" }</p>
        </div>
    }
}

fn render_gallery(gallery: Option<&Gallery>, close_ref: &NodeRef, on_close: Callback<()>) -> Html {
    let Some(gallery) = gallery else {
        return html! {};
    };

    let stop_click = Callback::from(|event: web_sys::MouseEvent| event.stop_propagation());
    let close_click = {
        let on_close = on_close.clone();
        Callback::from(move |_: web_sys::MouseEvent| on_close.emit(()))
    };

    html! {
        <div id="galleryModal" class="gallery" role="dialog" aria-modal="true"
            aria-label={format!("Photos of {}", gallery.name)}
            onclick={close_click.clone()}>
            <div class="gallery__panel" onclick={stop_click}>
                <button id="galleryClose" class="gallery__close" aria-label="Close gallery"
                    ref={close_ref.clone()}
                    onclick={close_click}>{ "×" }</button>
                <div id="galleryTrack" class="gallery__track">
                    { for gallery.images.iter().map(|image| html! {
                        <img class="gallery__img"
                            src={image.src.clone()}
                            alt={image.alt.clone()}
                            onerror={Callback::from(|event: web_sys::Event| swap_in_placeholder(&event, None))} />
                    }) }
                </div>
            </div>
        </div>
    }
}

fn event_element(event: &web_sys::Event) -> Option<web_sys::Element> {
    event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
}

fn release_capture(event: &web_sys::PointerEvent) {
    if let Some(target) = event_element(event) {
        let _ = target.release_pointer_capture(event.pointer_id());
    }
}

fn swap_in_placeholder(event: &web_sys::Event, alt: Option<&str>) {
    let Some(image) = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::HtmlImageElement>().ok())
    else {
        return;
    };
    if image.src() == PLACEHOLDER_IMAGE {
        return;
    }
    image.set_src(PLACEHOLDER_IMAGE);
    if let Some(alt) = alt {
        image.set_alt(alt);
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    yew::Renderer::<App>::new().render();
}
