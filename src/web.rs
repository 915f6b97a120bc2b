//! Browser presentation layer.
//!
//! Mounts a start screen (name entry), a header (score, target, "new number"
//! button, feedback phrase) and a canvas with the bubble grid. Every animation
//! frame advances the controller clock, draws a snapshot and refreshes the DOM
//! overlays. Input handlers advance the clock first so deferred effects that
//! are already due land before the click is judged.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement, window,
};

use crate::audio::WebAudioFeedback;
use crate::bubble::{BubbleId, BubbleState};
use crate::config::GameConfig;
use crate::controller::{FeedbackKind, RoundController, Snapshot};
use crate::error::{GameError, Result};
use crate::layout::Grid;
use crate::performance_now;
use crate::random::entropy_rng;

const START_ID: &str = "cn-start";
const NAME_INPUT_ID: &str = "cn-name";
const PLAY_BUTTON_ID: &str = "cn-play";
const HEADER_ID: &str = "cn-header";
const SCORE_ID: &str = "cn-score";
const TARGET_ID: &str = "cn-target";
const SKIP_BUTTON_ID: &str = "cn-skip";
const FEEDBACK_ID: &str = "cn-feedback";
const CANVAS_ID: &str = "cn-canvas";
const FOOTER_ID: &str = "cn-footer";

const CANVAS_WIDTH: u32 = 800;
const CANVAS_HEIGHT: u32 = 640;
const BACKGROUND: &str = "#ecfeff";

const START_STYLE: &str = "position:fixed; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:14px; background:#cffafe; font-family:'Fredoka', 'Comic Sans MS', sans-serif; color:#155e75; z-index:50;";
const HEADER_STYLE: &str = "position:fixed; top:0; left:0; right:0; display:flex; align-items:center; justify-content:space-between; gap:12px; padding:10px 18px; background:#ffffff; box-shadow:0 2px 12px rgba(8,145,178,0.18); font-family:'Fredoka', 'Comic Sans MS', sans-serif; color:#155e75; z-index:40;";
const CANVAS_STYLE: &str = "position:fixed; left:50%; top:54%; transform:translate(-50%,-50%); max-width:96vw; max-height:76vh; border-radius:24px; background:#ecfeff; z-index:20;";
const FOOTER_STYLE: &str = "position:fixed; bottom:8px; left:0; right:0; text-align:center; font-family:'Fredoka', 'Comic Sans MS', sans-serif; font-size:14px; font-weight:bold; color:rgba(21,94,117,0.5); z-index:30;";
const FEEDBACK_BASE_STYLE: &str = "min-width:220px; text-align:center; font-size:22px; font-weight:bold; padding:6px 14px; border-radius:14px;";
const HIDDEN: &str = "display:none;";

type Controller = RoundController<StdRng, WebAudioFeedback>;

struct WebGame {
    controller: Controller,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    hover_slot: Option<usize>,
    drawn_round: u64,
    // when each bubble entered its current visual state, for animations
    since: HashMap<BubbleId, (BubbleState, f64)>,
}

thread_local! {
    static GAME: RefCell<Option<WebGame>> = RefCell::new(None);
    static LISTENERS_BOUND: Cell<bool> = Cell::new(false);
    static LOOP_RUNNING: Cell<bool> = Cell::new(false);
}

/// Mounts the game into the current page (reusing elements left by an
/// earlier mount) and shows the start screen.
pub fn mount(config: GameConfig) -> Result<()> {
    config.validate()?;
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;
    let body = doc.body().ok_or(GameError::NoBody)?;

    build_start_screen(&doc, &body)?;
    build_header(&doc, &body)?;
    ensure_element(&doc, &body, "div", FOOTER_ID, FOOTER_STYLE)?;

    let canvas: HtmlCanvasElement = ensure_element(&doc, &body, "canvas", CANVAS_ID, CANVAS_STYLE)?
        .dyn_into()
        .map_err(|_| GameError::Dom(format!("#{CANVAS_ID} is not a canvas")))?;
    canvas.set_width(CANVAS_WIDTH);
    canvas.set_height(CANVAS_HEIGHT);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(GameError::dom)?
        .ok_or(GameError::NoCanvasContext)?
        .dyn_into()
        .map_err(|_| GameError::NoCanvasContext)?;
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    show_game(&doc, false);

    let controller = RoundController::new(config, entropy_rng(), WebAudioFeedback::new());
    let previous = GAME.with(|cell| {
        cell.replace(Some(WebGame {
            controller,
            canvas: canvas.clone(),
            ctx,
            hover_slot: None,
            drawn_round: 0,
            since: HashMap::new(),
        }))
    });
    if let Some(mut old) = previous {
        old.controller.teardown();
    }

    if !LISTENERS_BOUND.with(|bound| bound.replace(true)) {
        bind_listeners(&doc, &canvas)?;
    }
    start_frame_loop();
    log::info!("caza-numeros mounted");
    Ok(())
}

/// Tears the session down and returns to the start screen. The controller
/// stays mounted so the start form can begin a fresh session.
pub fn unmount() {
    with_game(|game| {
        game.controller.teardown();
        game.hover_slot = None;
    });
    if let Some(doc) = window().and_then(|w| w.document()) {
        show_game(&doc, false);
    }
}

// --- DOM construction --------------------------------------------------------

fn ensure_element(
    doc: &Document,
    parent: &Element,
    tag: &str,
    id: &str,
    style: &str,
) -> Result<Element> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag).map_err(GameError::dom)?;
    el.set_id(id);
    if !style.is_empty() {
        el.set_attribute("style", style).map_err(GameError::dom)?;
    }
    parent.append_child(&el).map_err(GameError::dom)?;
    Ok(el)
}

fn build_start_screen(doc: &Document, body: &Element) -> Result<()> {
    if doc.get_element_by_id(START_ID).is_some() {
        return Ok(());
    }
    let screen = ensure_element(doc, body, "div", START_ID, START_STYLE)?;
    let title = doc.create_element("h1").map_err(GameError::dom)?;
    title.set_text_content(Some("Caza-Números"));
    title
        .set_attribute("style", "font-size:56px; margin:0; color:#0891b2;")
        .map_err(GameError::dom)?;
    screen.append_child(&title).map_err(GameError::dom)?;

    let prompt = doc.create_element("p").map_err(GameError::dom)?;
    prompt.set_text_content(Some("¿Cómo te llamas?"));
    prompt
        .set_attribute("style", "font-size:24px; margin:0;")
        .map_err(GameError::dom)?;
    screen.append_child(&prompt).map_err(GameError::dom)?;

    let input = ensure_element(
        doc,
        &screen,
        "input",
        NAME_INPUT_ID,
        "font-size:24px; padding:10px 16px; border-radius:16px; border:3px solid #67e8f9; text-align:center; outline:none;",
    )?;
    input
        .set_attribute("placeholder", "Tu nombre")
        .map_err(GameError::dom)?;
    input.set_attribute("maxlength", "20").map_err(GameError::dom)?;

    let play = ensure_element(
        doc,
        &screen,
        "button",
        PLAY_BUTTON_ID,
        "font-size:26px; font-weight:bold; padding:10px 28px; border:none; border-radius:18px; background:#f59e0b; color:#ffffff; cursor:pointer;",
    )?;
    play.set_text_content(Some("¡A jugar!"));
    Ok(())
}

fn build_header(doc: &Document, body: &Element) -> Result<()> {
    if doc.get_element_by_id(HEADER_ID).is_some() {
        return Ok(());
    }
    let header = ensure_element(doc, body, "div", HEADER_ID, HEADER_STYLE)?;
    ensure_element(
        doc,
        &header,
        "div",
        SCORE_ID,
        "font-size:22px; font-weight:bold; color:#ca8a04;",
    )?;
    ensure_element(
        doc,
        &header,
        "div",
        TARGET_ID,
        "font-size:30px; font-weight:bold;",
    )?;
    ensure_element(doc, &header, "div", FEEDBACK_ID, FEEDBACK_BASE_STYLE)?;
    let skip = ensure_element(
        doc,
        &header,
        "button",
        SKIP_BUTTON_ID,
        "font-size:18px; font-weight:bold; padding:8px 16px; border:none; border-radius:14px; background:#06b6d4; color:#ffffff; cursor:pointer;",
    )?;
    skip.set_text_content(Some("Nuevo número"));
    Ok(())
}

fn set_visible(doc: &Document, id: &str, style: &str, visible: bool) {
    if let Some(el) = doc.get_element_by_id(id) {
        let css = if visible {
            style.to_string()
        } else {
            format!("{style}{HIDDEN}")
        };
        el.set_attribute("style", &css).ok();
    }
}

fn show_game(doc: &Document, playing: bool) {
    set_visible(doc, START_ID, START_STYLE, !playing);
    set_visible(doc, HEADER_ID, HEADER_STYLE, playing);
    set_visible(doc, CANVAS_ID, CANVAS_STYLE, playing);
    set_visible(doc, FOOTER_ID, FOOTER_STYLE, playing);
}

// --- Input -------------------------------------------------------------------

fn bind_listeners(doc: &Document, canvas: &HtmlCanvasElement) -> Result<()> {
    if let Some(play) = doc.get_element_by_id(PLAY_BUTTON_ID) {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            start_from_form();
        }) as Box<dyn FnMut(_)>);
        play.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(GameError::dom)?;
        closure.forget();
    }

    if let Some(input) = doc.get_element_by_id(NAME_INPUT_ID) {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key() == "Enter" {
                start_from_form();
            }
        }) as Box<dyn FnMut(_)>);
        input
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
            .map_err(GameError::dom)?;
        closure.forget();
    }

    if let Some(skip) = doc.get_element_by_id(SKIP_BUTTON_ID) {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            let now = performance_now();
            with_game(|game| {
                game.controller.advance_to(now);
                game.controller.skip_to_new_number();
            });
        }) as Box<dyn FnMut(_)>);
        skip.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(GameError::dom)?;
        closure.forget();
    }

    {
        let canvas_press = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (x, y) = canvas_point(&canvas_press, &evt);
            let now = performance_now();
            with_game(|game| {
                game.controller.advance_to(now);
                let grid = game.grid();
                let bubbles = game.controller.bubbles();
                if let Some(bubble) = grid.hit(x, y, bubbles.len()).map(|slot| bubbles[slot]) {
                    game.controller.handle_bubble_click(bubble.id, bubble.value);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())
            .map_err(GameError::dom)?;
        closure.forget();
    }

    {
        let canvas_move = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (x, y) = canvas_point(&canvas_move, &evt);
            let hovering = with_game(|game| {
                let count = game.controller.bubbles().len();
                game.hover_slot = game.grid().hit(x, y, count);
                game.hover_slot.is_some()
            })
            .unwrap_or(false);
            let cursor = if hovering { "pointer" } else { "default" };
            let css = format!("{CANVAS_STYLE}cursor:{cursor};");
            canvas_move.set_attribute("style", &css).ok();
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            .map_err(GameError::dom)?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_game(|game| game.hover_slot = None);
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())
            .map_err(GameError::dom)?;
        closure.forget();
    }
    Ok(())
}

fn with_game<T>(f: impl FnOnce(&mut WebGame) -> T) -> Option<T> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Mouse position in canvas pixels (the element may be CSS-scaled).
fn canvas_point(canvas: &HtmlCanvasElement, evt: &web_sys::MouseEvent) -> (f64, f64) {
    let sx = if canvas.client_width() > 0 {
        canvas.width() as f64 / canvas.client_width() as f64
    } else {
        1.0
    };
    let sy = if canvas.client_height() > 0 {
        canvas.height() as f64 / canvas.client_height() as f64
    } else {
        1.0
    };
    (evt.offset_x() as f64 * sx, evt.offset_y() as f64 * sy)
}

fn start_from_form() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let name = doc
        .get_element_by_id(NAME_INPUT_ID)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    let now = performance_now();
    let started = with_game(|game| {
        game.controller.advance_to(now);
        game.controller.start_session(name);
    });
    if started.is_some() {
        show_game(&doc, true);
    }
}

// --- Frame loop & rendering --------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    if LOOP_RUNNING.with(|running| running.replace(true)) {
        return;
    }
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if with_game(|game| game.tick(ts)).is_none() {
            // unmounted: stop scheduling frames
            LOOP_RUNNING.with(|running| running.set(false));
            let _ = f.borrow_mut().take();
            return;
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

impl WebGame {
    fn grid(&self) -> Grid {
        Grid::new(
            self.canvas.width() as f64,
            self.canvas.height() as f64,
            self.controller.bubbles().len(),
        )
    }

    fn tick(&mut self, now: f64) {
        self.controller.advance_to(now);
        let snap = self.controller.snapshot();
        self.track_states(&snap, now);
        self.render(&snap, now);
        if let Some(doc) = window().and_then(|w| w.document()) {
            update_overlays(&doc, &snap);
        }
    }

    fn track_states(&mut self, snap: &Snapshot, now: f64) {
        if snap.round != self.drawn_round {
            self.drawn_round = snap.round;
            self.since.clear();
        }
        for (bubble, state) in snap.bubbles.iter().zip(&snap.states) {
            match self.since.get(&bubble.id) {
                Some((prev, _)) if prev == state => {}
                _ => {
                    self.since.insert(bubble.id, (*state, now));
                }
            }
        }
    }

    fn render(&self, snap: &Snapshot, now: f64) {
        let ctx = &self.ctx;
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        let config = self.controller.config();
        let pop_ms = config.regeneration_delay_ms.max(1.0);
        // three wiggles per error reset
        let wiggle_ms = (config.error_reset_delay_ms / 3.0).max(1.0);
        let grid = Grid::new(w, h, snap.bubbles.len());

        for (slot, (bubble, state)) in snap.bubbles.iter().zip(&snap.states).enumerate() {
            let (mut cx, cy) = grid.center(slot);
            let elapsed = self
                .since
                .get(&bubble.id)
                .map(|(_, t)| now - t)
                .unwrap_or(0.0);
            let mut r = grid.radius();
            let mut alpha = 1.0;
            match state {
                BubbleState::Idle => {
                    if self.hover_slot == Some(slot) {
                        r *= 1.08;
                    }
                }
                BubbleState::Error => {
                    cx += (elapsed / wiggle_ms * TAU).sin() * 8.0;
                }
                BubbleState::Popped => {
                    let p = (elapsed / pop_ms).clamp(0.0, 1.0);
                    r *= 1.0 + 0.5 * p;
                    alpha = 1.0 - p;
                }
            }
            ctx.set_global_alpha(alpha);

            ctx.set_fill_style_str(bubble.color.css());
            ctx.begin_path();
            ctx.arc(cx, cy, r, 0.0, TAU).ok();
            ctx.fill();

            // glossy highlight
            ctx.set_fill_style_str("rgba(255,255,255,0.35)");
            ctx.begin_path();
            ctx.arc(cx - r * 0.35, cy - r * 0.35, r * 0.22, 0.0, TAU).ok();
            ctx.fill();

            if *state == BubbleState::Error {
                ctx.set_stroke_style_str("#ef4444");
                ctx.set_line_width(5.0);
                ctx.begin_path();
                ctx.arc(cx, cy, r, 0.0, TAU).ok();
                ctx.stroke();
            }

            let label = bubble.value.to_string();
            ctx.set_font(&format!(
                "bold {}px 'Fredoka', 'Comic Sans MS', sans-serif",
                (r * 0.8) as u32
            ));
            ctx.set_line_width(4.0);
            ctx.set_stroke_style_str("rgba(0,0,0,0.25)");
            ctx.set_fill_style_str("#ffffff");
            ctx.stroke_text(&label, cx, cy).ok();
            ctx.fill_text(&label, cx, cy).ok();
        }
        ctx.set_global_alpha(1.0);
    }
}

fn update_overlays(doc: &Document, snap: &Snapshot) {
    if let Some(el) = doc.get_element_by_id(SCORE_ID) {
        el.set_text_content(Some(&format!("⭐ {}", snap.score)));
    }
    if let Some(el) = doc.get_element_by_id(TARGET_ID) {
        el.set_text_content(Some(&format!("Busca el {}", snap.target_value)));
    }
    if let Some(el) = doc.get_element_by_id(FEEDBACK_ID) {
        match &snap.feedback {
            Some(msg) => {
                let colors = match msg.kind {
                    FeedbackKind::Success => "color:#15803d; background:#dcfce7;",
                    FeedbackKind::Error => "color:#c2410c; background:#ffedd5;",
                };
                el.set_text_content(Some(&msg.text));
                el.set_attribute("style", &format!("{FEEDBACK_BASE_STYLE}{colors}"))
                    .ok();
            }
            None => {
                el.set_text_content(None);
                el.set_attribute("style", &format!("{FEEDBACK_BASE_STYLE}visibility:hidden;"))
                    .ok();
            }
        }
    }
    if let Some(el) = doc.get_element_by_id(FOOTER_ID) {
        el.set_text_content(Some(&format!(
            "Jugando como: {} • Caza-Números",
            snap.player_name
        )));
    }
}
